use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Catalog entry. Immutable while challenges are being evaluated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChallengeRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Inclusive.
    pub start_date: NaiveDate,
    /// Inclusive.
    pub end_date: NaiveDate,
    pub points: i32,
    pub badge_id: Option<Uuid>,
    /// Open key/value map; keys are interpreted by the checker the name routes to.
    pub criteria: Value,
}

/// Snapshot of the last evaluation. `current` always lies in `[0, target]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub current: i64,
    pub target: i64,
}

impl Progress {
    pub fn clamped(live: i64, target: i64) -> Self {
        let target = target.max(0);
        Progress {
            current: live.clamp(0, target),
            target,
        }
    }
}

/// One row per (user, challenge) pair.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserChallengeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub challenge_id: Uuid,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub progress: Json<Progress>,
    pub created_at: DateTime<Utc>,
}

impl UserChallengeRow {
    pub fn new(user_id: Uuid, challenge_id: Uuid, created_at: DateTime<Utc>) -> Self {
        UserChallengeRow {
            id: Uuid::new_v4(),
            user_id,
            challenge_id,
            is_completed: false,
            completed_at: None,
            progress: Json(Progress::default()),
            created_at,
        }
    }
}

/// A progress row joined with the catalog entry it tracks.
#[derive(Debug, Clone, Serialize)]
pub struct TrackedChallenge {
    pub progress: UserChallengeRow,
    pub challenge: ChallengeRow,
}
