//! Persistence seam for the gamification engine.
//!
//! The engine only ever talks to `dyn GamificationStore`; `PgStore` backs it
//! in production and `MemoryStore` in tests.

pub mod postgres;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::badge::AwardedBadgeRow;
use crate::models::challenge::{ChallengeRow, TrackedChallenge, UserChallengeRow};
use crate::models::user::{LeaderboardEntry, UserFacts};

#[async_trait]
pub trait GamificationStore: Send + Sync {
    /// Challenges whose inclusive date window contains `day`.
    async fn active_challenges(&self, day: NaiveDate) -> Result<Vec<ChallengeRow>, AppError>;

    /// Returns the progress row for (user, challenge), creating it if absent.
    /// Never creates a second row for the same pair.
    async fn get_or_create_progress(
        &self,
        user_id: Uuid,
        challenge_id: Uuid,
    ) -> Result<UserChallengeRow, AppError>;

    /// `None` if the user does not exist.
    async fn load_user_facts(&self, user_id: Uuid) -> Result<Option<UserFacts>, AppError>;

    /// All of the user's progress rows with their challenge, in creation order.
    async fn tracked_challenges(&self, user_id: Uuid) -> Result<Vec<TrackedChallenge>, AppError>;

    /// Writes the progress snapshot. Completion is merged monotonically:
    /// once a row is stored as completed, its `is_completed`, `completed_at`
    /// and progress snapshot are never overwritten.
    async fn save_progress(&self, row: &UserChallengeRow) -> Result<(), AppError>;

    /// Sum of challenge points over the user's completed rows.
    async fn completed_challenge_points(&self, user_id: Uuid) -> Result<i64, AppError>;

    async fn save_user_totals(
        &self,
        user_id: Uuid,
        points: i32,
        profile_completion: i32,
    ) -> Result<(), AppError>;

    async fn badge_id_by_slug(&self, slug: &str) -> Result<Option<Uuid>, AppError>;

    /// Returns `true` if the badge was newly awarded.
    async fn award_badge(&self, user_id: Uuid, badge_id: Uuid) -> Result<bool, AppError>;

    async fn user_badges(&self, user_id: Uuid) -> Result<Vec<AwardedBadgeRow>, AppError>;

    async fn leaderboard(&self, limit: i64) -> Result<Vec<LeaderboardEntry>, AppError>;
}
