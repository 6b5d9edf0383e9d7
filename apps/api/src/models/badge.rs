use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A badge joined with the moment it was awarded to a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AwardedBadgeRow {
    pub badge_id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub awarded_at: DateTime<Utc>,
}
