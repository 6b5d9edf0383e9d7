use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::challenges::dispatcher::BatchOutcome;
use crate::challenges::events::{record_activity, GamificationEvent};
use crate::errors::AppError;
use crate::models::badge::AwardedBadgeRow;
use crate::models::challenge::TrackedChallenge;
use crate::models::user::LeaderboardEntry;
use crate::state::AppState;

const DEFAULT_LEADERBOARD_LIMIT: i64 = 10;
const MAX_LEADERBOARD_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct ActivityRequest {
    pub event: GamificationEvent,
}

#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub accepted: bool,
    pub outcome: Option<BatchOutcome>,
}

/// POST /api/v1/users/:user_id/activity
/// Always 202: challenge evaluation never fails the caller's action.
pub async fn handle_activity(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<ActivityRequest>,
) -> (StatusCode, Json<ActivityResponse>) {
    let outcome = record_activity(&state, user_id, req.event).await;
    (
        StatusCode::ACCEPTED,
        Json(ActivityResponse {
            accepted: true,
            outcome,
        }),
    )
}

/// GET /api/v1/users/:user_id/challenges
pub async fn handle_user_challenges(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<TrackedChallenge>>, AppError> {
    if state.store.load_user_facts(user_id).await?.is_none() {
        return Err(AppError::NotFound(format!("User {user_id} not found")));
    }
    Ok(Json(state.store.tracked_challenges(user_id).await?))
}

/// GET /api/v1/users/:user_id/badges
pub async fn handle_user_badges(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<AwardedBadgeRow>>, AppError> {
    if state.store.load_user_facts(user_id).await?.is_none() {
        return Err(AppError::NotFound(format!("User {user_id} not found")));
    }
    Ok(Json(state.store.user_badges(user_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<i64>,
}

/// GET /api/v1/leaderboard
pub async fn handle_leaderboard(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT);
    if !(1..=MAX_LEADERBOARD_LIMIT).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_LEADERBOARD_LIMIT}"
        )));
    }
    Ok(Json(state.store.leaderboard(limit).await?))
}
