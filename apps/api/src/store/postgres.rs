use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::badge::AwardedBadgeRow;
use crate::models::challenge::{ChallengeRow, Progress, TrackedChallenge, UserChallengeRow};
use crate::models::user::{LeaderboardEntry, UserFacts, UserProfileRow};
use crate::store::GamificationStore;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Flat row of `user_challenges JOIN challenges`.
#[derive(FromRow)]
struct TrackedRow {
    id: Uuid,
    user_id: Uuid,
    challenge_id: Uuid,
    is_completed: bool,
    completed_at: Option<DateTime<Utc>>,
    progress: Json<Progress>,
    created_at: DateTime<Utc>,
    name: String,
    description: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    points: i32,
    badge_id: Option<Uuid>,
    criteria: Value,
}

impl From<TrackedRow> for TrackedChallenge {
    fn from(r: TrackedRow) -> Self {
        TrackedChallenge {
            progress: UserChallengeRow {
                id: r.id,
                user_id: r.user_id,
                challenge_id: r.challenge_id,
                is_completed: r.is_completed,
                completed_at: r.completed_at,
                progress: r.progress,
                created_at: r.created_at,
            },
            challenge: ChallengeRow {
                id: r.challenge_id,
                name: r.name,
                description: r.description,
                start_date: r.start_date,
                end_date: r.end_date,
                points: r.points,
                badge_id: r.badge_id,
                criteria: r.criteria,
            },
        }
    }
}

#[async_trait]
impl GamificationStore for PgStore {
    async fn active_challenges(&self, day: NaiveDate) -> Result<Vec<ChallengeRow>, AppError> {
        Ok(sqlx::query_as::<_, ChallengeRow>(
            r#"
            SELECT id, name, description, start_date, end_date, points, badge_id, criteria
            FROM challenges
            WHERE start_date <= $1 AND end_date >= $1
            ORDER BY start_date, name
            "#,
        )
        .bind(day)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_or_create_progress(
        &self,
        user_id: Uuid,
        challenge_id: Uuid,
    ) -> Result<UserChallengeRow, AppError> {
        let fresh = UserChallengeRow::new(user_id, challenge_id, Utc::now());
        let inserted = sqlx::query(
            r#"
            INSERT INTO user_challenges
                (id, user_id, challenge_id, is_completed, completed_at, progress, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id, challenge_id) DO NOTHING
            "#,
        )
        .bind(fresh.id)
        .bind(fresh.user_id)
        .bind(fresh.challenge_id)
        .bind(fresh.is_completed)
        .bind(fresh.completed_at)
        .bind(&fresh.progress)
        .bind(fresh.created_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted > 0 {
            debug!("Enrolled user {user_id} in challenge {challenge_id}");
        }

        Ok(sqlx::query_as::<_, UserChallengeRow>(
            r#"
            SELECT id, user_id, challenge_id, is_completed, completed_at, progress, created_at
            FROM user_challenges
            WHERE user_id = $1 AND challenge_id = $2
            "#,
        )
        .bind(user_id)
        .bind(challenge_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn load_user_facts(&self, user_id: Uuid) -> Result<Option<UserFacts>, AppError> {
        let profile: Option<UserProfileRow> = sqlx::query_as(
            r#"
            SELECT id, username, first_name, last_name, email, profile_picture, resume_key,
                   gpa, points, num_applications, profile_completion, created_at
            FROM user_profiles
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(profile) = profile else {
            return Ok(None);
        };

        let (skills, references, education, favorites, received, unread): (
            i64,
            i64,
            i64,
            i64,
            i64,
            i64,
        ) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM user_skills WHERE user_id = $1),
                (SELECT COUNT(*) FROM user_references WHERE user_id = $1),
                (SELECT COUNT(*) FROM user_education WHERE user_id = $1),
                (SELECT COUNT(*) FROM favorited_jobs WHERE user_id = $1),
                (SELECT COUNT(*) FROM messages WHERE recipient_id = $1),
                (SELECT COUNT(*) FROM messages WHERE recipient_id = $1 AND NOT is_read)
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Some(UserFacts {
            profile,
            skill_count: skills,
            reference_count: references,
            education_count: education,
            favorited_job_count: favorites,
            received_message_count: received,
            unread_message_count: unread,
        }))
    }

    async fn tracked_challenges(&self, user_id: Uuid) -> Result<Vec<TrackedChallenge>, AppError> {
        let rows = sqlx::query_as::<_, TrackedRow>(
            r#"
            SELECT uc.id, uc.user_id, uc.challenge_id, uc.is_completed, uc.completed_at,
                   uc.progress, uc.created_at,
                   c.name, c.description, c.start_date, c.end_date, c.points, c.badge_id,
                   c.criteria
            FROM user_challenges uc
            JOIN challenges c ON c.id = uc.challenge_id
            WHERE uc.user_id = $1
            ORDER BY uc.created_at, uc.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TrackedChallenge::from).collect())
    }

    async fn save_progress(&self, row: &UserChallengeRow) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE user_challenges
            SET progress = CASE WHEN is_completed THEN progress ELSE $2 END,
                is_completed = is_completed OR $3,
                completed_at = COALESCE(completed_at, $4)
            WHERE id = $1
            "#,
        )
        .bind(row.id)
        .bind(&row.progress)
        .bind(row.is_completed)
        .bind(row.completed_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn completed_challenge_points(&self, user_id: Uuid) -> Result<i64, AppError> {
        Ok(sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(c.points), 0)::BIGINT
            FROM user_challenges uc
            JOIN challenges c ON c.id = uc.challenge_id
            WHERE uc.user_id = $1 AND uc.is_completed
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn save_user_totals(
        &self,
        user_id: Uuid,
        points: i32,
        profile_completion: i32,
    ) -> Result<(), AppError> {
        let updated = sqlx::query(
            "UPDATE user_profiles SET points = $2, profile_completion = $3 WHERE id = $1",
        )
        .bind(user_id)
        .bind(points)
        .bind(profile_completion)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(AppError::NotFound(format!("User {user_id} not found")));
        }
        Ok(())
    }

    async fn badge_id_by_slug(&self, slug: &str) -> Result<Option<Uuid>, AppError> {
        Ok(sqlx::query_scalar("SELECT id FROM badges WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn award_badge(&self, user_id: Uuid, badge_id: Uuid) -> Result<bool, AppError> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO user_badges (user_id, badge_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, badge_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(badge_id)
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(inserted > 0)
    }

    async fn user_badges(&self, user_id: Uuid) -> Result<Vec<AwardedBadgeRow>, AppError> {
        Ok(sqlx::query_as::<_, AwardedBadgeRow>(
            r#"
            SELECT b.id AS badge_id, b.slug, b.name, b.description, b.icon, ub.awarded_at
            FROM user_badges ub
            JOIN badges b ON b.id = ub.badge_id
            WHERE ub.user_id = $1
            ORDER BY ub.awarded_at, b.slug
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn leaderboard(&self, limit: i64) -> Result<Vec<LeaderboardEntry>, AppError> {
        Ok(sqlx::query_as::<_, LeaderboardEntry>(
            r#"
            SELECT u.id AS user_id, u.username, u.points,
                   COUNT(uc.id) FILTER (WHERE uc.is_completed) AS completed_challenges
            FROM user_profiles u
            LEFT JOIN user_challenges uc ON uc.user_id = u.id
            GROUP BY u.id
            ORDER BY u.points DESC, u.username ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }
}
