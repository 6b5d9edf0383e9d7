use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfileRow {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub profile_picture: Option<String>,
    pub resume_key: Option<String>,
    pub gpa: Option<f64>,
    pub points: i32,
    pub num_applications: i32,
    pub profile_completion: i32,
    pub created_at: DateTime<Utc>,
}

/// Everything the checkers read about a user, loaded once per evaluation batch.
/// Relation fields are live row counts, not cached flags.
#[derive(Debug, Clone)]
pub struct UserFacts {
    pub profile: UserProfileRow,
    pub skill_count: i64,
    pub reference_count: i64,
    pub education_count: i64,
    pub favorited_job_count: i64,
    pub received_message_count: i64,
    pub unread_message_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LeaderboardEntry {
    pub user_id: Uuid,
    pub username: String,
    pub points: i32,
    pub completed_challenges: i64,
}
