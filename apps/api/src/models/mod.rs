pub mod badge;
pub mod challenge;
pub mod user;
