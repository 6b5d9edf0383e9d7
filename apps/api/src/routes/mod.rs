pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::challenges::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Notifications from the profile, application, inbox and favourites flows
        .route(
            "/api/v1/users/:user_id/activity",
            post(handlers::handle_activity),
        )
        .route(
            "/api/v1/users/:user_id/challenges",
            get(handlers::handle_user_challenges),
        )
        .route(
            "/api/v1/users/:user_id/badges",
            get(handlers::handle_user_badges),
        )
        .route("/api/v1/leaderboard", get(handlers::handle_leaderboard))
        .with_state(state)
}
