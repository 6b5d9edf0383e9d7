//! Challenge dispatcher.
//!
//! `update_all_challenges_for_user` is the engine's single entry point. The
//! rule evaluation itself (`evaluate_batch`) is synchronous and pure; the
//! async shell around it only loads rows and writes them back.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::challenges::checkers::{ChallengeKind, CheckContext};
use crate::challenges::clock::Clock;
use crate::challenges::points::recalculate_user_points;
use crate::challenges::profile::profile_completion_percentage;
use crate::challenges::registry::CheckerRegistry;
use crate::errors::AppError;
use crate::models::challenge::TrackedChallenge;
use crate::models::user::UserFacts;
use crate::store::GamificationStore;

/// Result of evaluating one batch in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchEvaluation {
    /// Indices of rows that were routed to a checker and must be persisted.
    pub routed: Vec<usize>,
    pub unroutable: usize,
    pub malformed: usize,
    /// Challenge ids completed during this batch, in completion order.
    pub newly_completed: Vec<Uuid>,
}

/// What one dispatcher run did, returned to callers and logged.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub user_id: Uuid,
    pub evaluated: usize,
    pub unroutable: usize,
    pub malformed: usize,
    pub newly_completed: Vec<Uuid>,
    pub completed_total: usize,
    pub points: i32,
    pub profile_completion: i32,
    /// Badges linked to any of the user's completed challenges.
    pub linked_badges: Vec<Uuid>,
}

/// Evaluates every incomplete row of one user's batch, in order.
///
/// Meta checkers count completions from `tracked` itself, excluding their own
/// row, so completions earlier in the batch are visible to later rows. The
/// meta rows are then re-evaluated while that keeps completing something, so
/// a meta challenge unlocked by a row after it still flips in this batch.
/// Completion is monotonic, which bounds the extra passes by the row count.
pub fn evaluate_batch(
    registry: &CheckerRegistry,
    facts: &UserFacts,
    tracked: &mut [TrackedChallenge],
    now: DateTime<Utc>,
) -> BatchEvaluation {
    let mut eval = BatchEvaluation::default();
    let mut pending: Vec<(usize, ChallengeKind)> = Vec::new();

    for (idx, t) in tracked.iter().enumerate() {
        if t.progress.is_completed {
            continue;
        }
        match registry.route(&t.challenge.name) {
            Some(kind) => pending.push((idx, kind)),
            None => {
                debug!(
                    "No checker matches challenge '{}'; skipping",
                    t.challenge.name
                );
                eval.unroutable += 1;
            }
        }
    }
    eval.routed = pending.iter().map(|(idx, _)| *idx).collect();

    let mut malformed = vec![false; tracked.len()];
    let mut first_pass = true;
    loop {
        let mut completed_this_pass = false;
        for &(idx, kind) in &pending {
            if !first_pass && (!kind.is_meta() || tracked[idx].progress.is_completed) {
                continue;
            }
            let completed_elsewhere =
                completed_count(tracked) - i64::from(tracked[idx].progress.is_completed);
            let ctx = CheckContext {
                facts,
                completed_elsewhere,
                now,
            };

            let t = &mut tracked[idx];
            let was_completed = t.progress.is_completed;
            match kind.check(&ctx, &t.challenge, &mut t.progress) {
                Ok(()) => {
                    if !was_completed && t.progress.is_completed {
                        info!(
                            "User {} completed challenge '{}' (+{} points)",
                            t.progress.user_id, t.challenge.name, t.challenge.points
                        );
                        eval.newly_completed.push(t.challenge.id);
                        completed_this_pass = true;
                    }
                }
                Err(e) => {
                    if !malformed[idx] {
                        warn!(
                            "Skipping challenge '{}' with malformed criteria: {e}",
                            t.challenge.name
                        );
                        malformed[idx] = true;
                        eval.malformed += 1;
                    }
                }
            }
        }
        first_pass = false;
        if !completed_this_pass {
            break;
        }
    }

    eval
}

fn completed_count(tracked: &[TrackedChallenge]) -> i64 {
    tracked.iter().filter(|t| t.progress.is_completed).count() as i64
}

/// Drives challenge evaluation for one user at a time.
pub struct ChallengeEngine {
    registry: CheckerRegistry,
    clock: Arc<dyn Clock>,
}

impl ChallengeEngine {
    pub fn new(registry: CheckerRegistry, clock: Arc<dyn Clock>) -> Self {
        Self { registry, clock }
    }

    pub fn registry(&self) -> &CheckerRegistry {
        &self.registry
    }

    /// Re-evaluates all of the user's incomplete challenges and recomputes
    /// their point total. Safe to call any number of times: a second call
    /// with unchanged facts changes nothing.
    pub async fn update_all_challenges_for_user(
        &self,
        store: &dyn GamificationStore,
        user_id: Uuid,
    ) -> Result<BatchOutcome, AppError> {
        let now = self.clock.now();

        let facts = store
            .load_user_facts(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;

        // 1. Make sure a progress row exists for every active challenge
        for challenge in store.active_challenges(now.date_naive()).await? {
            store.get_or_create_progress(user_id, challenge.id).await?;
        }

        // 2. Evaluate in memory
        let mut tracked = store.tracked_challenges(user_id).await?;
        let eval = evaluate_batch(&self.registry, &facts, &mut tracked, now);

        // 3. Persist every routed row once
        for &idx in &eval.routed {
            store.save_progress(&tracked[idx].progress).await?;
        }

        // 4. Totals from the store, written once
        let points = recalculate_user_points(store, user_id).await?;
        let profile_completion = profile_completion_percentage(&facts);
        store
            .save_user_totals(user_id, points, profile_completion)
            .await?;

        let completed: Vec<&TrackedChallenge> = tracked
            .iter()
            .filter(|t| t.progress.is_completed)
            .collect();
        let outcome = BatchOutcome {
            user_id,
            evaluated: eval.routed.len(),
            unroutable: eval.unroutable,
            malformed: eval.malformed,
            newly_completed: eval.newly_completed,
            completed_total: completed.len(),
            points,
            profile_completion,
            linked_badges: completed
                .iter()
                .filter_map(|t| t.challenge.badge_id)
                .collect(),
        };

        info!(
            "Challenge batch for user {user_id}: {} evaluated, {} newly completed, {} points, profile {}%",
            outcome.evaluated,
            outcome.newly_completed.len(),
            outcome.points,
            outcome.profile_completion
        );
        Ok(outcome)
    }
}
