//! Badge awards driven by engine outcomes.
//!
//! Not part of challenge evaluation: this runs after a successful batch and
//! only ever adds badges.

use tracing::{debug, info};
use uuid::Uuid;

use crate::challenges::dispatcher::BatchOutcome;
use crate::errors::AppError;
use crate::store::GamificationStore;

/// (minimum profile completion %, badge slug)
pub const PROFILE_BADGES: &[(i32, &str)] = &[(50, "profile-halfway"), (100, "profile-complete")];

/// (minimum completed challenges, badge slug)
pub const CHALLENGE_BADGES: &[(usize, &str)] = &[
    (1, "first-quest"),
    (5, "quest-adept"),
    (10, "quest-master"),
];

/// Slugs of every threshold badge the outcome qualifies for.
pub fn earned_threshold_badges(profile_completion: i32, completed_total: usize) -> Vec<&'static str> {
    let profile = PROFILE_BADGES
        .iter()
        .filter(|(min, _)| profile_completion >= *min)
        .map(|(_, slug)| *slug);
    let challenges = CHALLENGE_BADGES
        .iter()
        .filter(|(min, _)| completed_total >= *min)
        .map(|(_, slug)| *slug);
    profile.chain(challenges).collect()
}

/// Awards threshold badges and badges linked to completed challenges.
/// Returns the ids of badges that were newly awarded.
pub async fn award_badges(
    store: &dyn GamificationStore,
    outcome: &BatchOutcome,
) -> Result<Vec<Uuid>, AppError> {
    let mut candidates = outcome.linked_badges.clone();
    for slug in earned_threshold_badges(outcome.profile_completion, outcome.completed_total) {
        match store.badge_id_by_slug(slug).await? {
            Some(id) => candidates.push(id),
            None => debug!("Badge '{slug}' is not in the catalog; skipping"),
        }
    }
    candidates.sort();
    candidates.dedup();

    let mut awarded = Vec::new();
    for badge_id in candidates {
        if store.award_badge(outcome.user_id, badge_id).await? {
            info!("Awarded badge {badge_id} to user {}", outcome.user_id);
            awarded.push(badge_id);
        }
    }
    Ok(awarded)
}
