use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::store::GamificationStore;

/// Recomputes the user's score from scratch: the sum of points over every
/// completed challenge. Never patched incrementally, so replays and
/// out-of-order events cannot drift it.
pub async fn recalculate_user_points(
    store: &dyn GamificationStore,
    user_id: Uuid,
) -> Result<i32, AppError> {
    let sum = store.completed_challenge_points(user_id).await?;
    Ok(clamp_points(user_id, sum))
}

fn clamp_points(user_id: Uuid, sum: i64) -> i32 {
    let clamped = sum.clamp(0, i64::from(i32::MAX));
    if clamped != sum {
        warn!("Point total {sum} for user {user_id} out of range; clamped to {clamped}");
    }
    clamped as i32
}
