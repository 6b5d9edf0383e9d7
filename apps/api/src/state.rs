use std::sync::Arc;

use crate::challenges::dispatcher::ChallengeEngine;
use crate::store::GamificationStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Postgres-backed in production; the in-memory store in tests.
    pub store: Arc<dyn GamificationStore>,
    pub engine: Arc<ChallengeEngine>,
}
