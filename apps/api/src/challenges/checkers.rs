//! Per-challenge checkers.
//!
//! Every checker follows the same shape: read the target from the criteria
//! (failing before anything is written), write a clamped progress snapshot,
//! then flip completion only if the row is not already completed. Calling a
//! checker again after completion refreshes nothing but the snapshot.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;

use crate::challenges::criteria::{integer_target, CriteriaError};
use crate::challenges::profile::profile_completion_percentage;
use crate::models::challenge::{ChallengeRow, Progress, UserChallengeRow};
use crate::models::user::UserFacts;

/// What a checker may read while evaluating one progress row.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    pub facts: &'a UserFacts,
    /// Completed challenges of this user, not counting the row under evaluation.
    pub completed_elsewhere: i64,
    pub now: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeKind {
    FirstChallenge,
    MultipleChallenges,
    Applications,
    ProfileCompletion,
    InboxZero,
    ResumeUploaded,
    MessageReceived,
    ReferenceAdded,
    JobFavorited,
}

impl ChallengeKind {
    /// Evaluates `row` against the user's current facts.
    /// On `Err` the row has not been touched.
    pub fn check(
        self,
        ctx: &CheckContext<'_>,
        challenge: &ChallengeRow,
        row: &mut UserChallengeRow,
    ) -> Result<(), CriteriaError> {
        let facts = ctx.facts;
        let (live, target, met) = match self {
            ChallengeKind::FirstChallenge => {
                let done = ctx.completed_elsewhere;
                (done, 1, done >= 1)
            }
            ChallengeKind::MultipleChallenges => {
                let target = integer_target(&challenge.criteria, "count", 1)?;
                let done = ctx.completed_elsewhere;
                (done, target, done >= target)
            }
            ChallengeKind::Applications => {
                let target = integer_target(&challenge.criteria, "count", 1)?;
                let applied = i64::from(facts.profile.num_applications);
                (applied, target, applied >= target)
            }
            ChallengeKind::ProfileCompletion => {
                let target = integer_target(&challenge.criteria, "percentage", 100)?;
                let percentage = i64::from(profile_completion_percentage(facts));
                (percentage, target, percentage >= target)
            }
            ChallengeKind::InboxZero => {
                let clear = facts.unread_message_count == 0;
                (i64::from(clear), 1, clear)
            }
            ChallengeKind::ResumeUploaded => {
                let has_resume = facts
                    .profile
                    .resume_key
                    .as_deref()
                    .is_some_and(|k| !k.is_empty());
                binary(has_resume)
            }
            ChallengeKind::MessageReceived => binary(facts.received_message_count > 0),
            ChallengeKind::ReferenceAdded => binary(facts.reference_count > 0),
            ChallengeKind::JobFavorited => binary(facts.favorited_job_count > 0),
        };

        row.progress = Json(Progress::clamped(live, target));
        if !row.is_completed && met {
            row.is_completed = true;
            row.completed_at = Some(ctx.now);
        }
        Ok(())
    }

    /// Kinds whose live fact is the user's own completion count.
    pub fn is_meta(self) -> bool {
        matches!(
            self,
            ChallengeKind::FirstChallenge | ChallengeKind::MultipleChallenges
        )
    }
}

fn binary(present: bool) -> (i64, i64, bool) {
    (i64::from(present), 1, present)
}
