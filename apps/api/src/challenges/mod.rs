// Challenge engine: ordered keyword dispatch over per-kind checkers, with
// point totals recomputed from completed challenges after every batch.
// Only `dispatcher` touches the store during evaluation; checkers are pure.

pub mod badges;
pub mod checkers;
pub mod clock;
pub mod criteria;
pub mod dispatcher;
pub mod events;
pub mod handlers;
pub mod points;
pub mod profile;
pub mod registry;
