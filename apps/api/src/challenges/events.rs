use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::challenges::badges::award_badges;
use crate::challenges::dispatcher::BatchOutcome;
use crate::state::AppState;

/// Actions elsewhere in the job board that can move a user's challenges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamificationEvent {
    ProfileSaved,
    JobApplied,
    MessageReceived,
    MessageRead,
    ReferenceAdded,
    EducationAdded,
    JobFavorited,
}

/// Runs the challenge engine and badge awards for `user_id` after `event`.
///
/// Best-effort: a failure is logged and reported as `None`, never returned,
/// so the action that triggered it is not affected.
pub async fn record_activity(
    state: &AppState,
    user_id: Uuid,
    event: GamificationEvent,
) -> Option<BatchOutcome> {
    info!("Activity {event:?} for user {user_id}");

    let outcome = match state
        .engine
        .update_all_challenges_for_user(state.store.as_ref(), user_id)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("Challenge update after {event:?} for user {user_id} failed: {e}");
            return None;
        }
    };

    if let Err(e) = award_badges(state.store.as_ref(), &outcome).await {
        warn!("Badge awards for user {user_id} failed: {e}");
    }
    Some(outcome)
}
