use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::badge::AwardedBadgeRow;
use crate::models::challenge::{ChallengeRow, TrackedChallenge, UserChallengeRow};
use crate::models::user::{LeaderboardEntry, UserFacts};
use crate::store::GamificationStore;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, UserFacts>,
    challenges: Vec<ChallengeRow>,
    // insertion order doubles as creation order
    progress: Vec<UserChallengeRow>,
    // (id, slug)
    badges: Vec<(Uuid, String)>,
    awards: Vec<(Uuid, Uuid, chrono::DateTime<Utc>)>,
    progress_writes: usize,
    total_writes: usize,
}

/// Store backed by plain collections, for engine and router tests.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_user(&self, facts: UserFacts) {
        let mut t = self.tables.lock().unwrap();
        t.users.insert(facts.profile.id, facts);
    }

    /// Applies `f` to the stored facts of `user_id`.
    pub fn edit_user(&self, user_id: Uuid, f: impl FnOnce(&mut UserFacts)) {
        let mut t = self.tables.lock().unwrap();
        f(t.users.get_mut(&user_id).expect("unknown user"));
    }

    pub fn user(&self, user_id: Uuid) -> UserFacts {
        self.tables.lock().unwrap().users[&user_id].clone()
    }

    pub fn put_challenge(&self, challenge: ChallengeRow) {
        self.tables.lock().unwrap().challenges.push(challenge);
    }

    pub fn put_badge(&self, slug: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.tables
            .lock()
            .unwrap()
            .badges
            .push((id, slug.to_string()));
        id
    }

    pub fn progress_rows(&self, user_id: Uuid) -> Vec<UserChallengeRow> {
        self.tables
            .lock()
            .unwrap()
            .progress
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn progress_for(&self, user_id: Uuid, challenge_id: Uuid) -> UserChallengeRow {
        self.progress_rows(user_id)
            .into_iter()
            .find(|r| r.challenge_id == challenge_id)
            .expect("no progress row")
    }

    /// Marks (user, challenge) completed directly, bypassing the engine.
    pub fn force_complete(&self, user_id: Uuid, challenge_id: Uuid) {
        let mut t = self.tables.lock().unwrap();
        let row = t
            .progress
            .iter_mut()
            .find(|r| r.user_id == user_id && r.challenge_id == challenge_id)
            .expect("no progress row");
        row.is_completed = true;
        row.completed_at.get_or_insert_with(Utc::now);
    }

    /// (progress saves, user total saves) since creation.
    pub fn write_counts(&self) -> (usize, usize) {
        let t = self.tables.lock().unwrap();
        (t.progress_writes, t.total_writes)
    }
}

#[async_trait]
impl GamificationStore for MemoryStore {
    async fn active_challenges(&self, day: NaiveDate) -> Result<Vec<ChallengeRow>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.challenges
            .iter()
            .filter(|c| c.start_date <= day && day <= c.end_date)
            .cloned()
            .collect())
    }

    async fn get_or_create_progress(
        &self,
        user_id: Uuid,
        challenge_id: Uuid,
    ) -> Result<UserChallengeRow, AppError> {
        let mut t = self.tables.lock().unwrap();
        if let Some(row) = t
            .progress
            .iter()
            .find(|r| r.user_id == user_id && r.challenge_id == challenge_id)
        {
            return Ok(row.clone());
        }
        let row = UserChallengeRow::new(user_id, challenge_id, Utc::now());
        t.progress.push(row.clone());
        Ok(row)
    }

    async fn load_user_facts(&self, user_id: Uuid) -> Result<Option<UserFacts>, AppError> {
        Ok(self.tables.lock().unwrap().users.get(&user_id).cloned())
    }

    async fn tracked_challenges(&self, user_id: Uuid) -> Result<Vec<TrackedChallenge>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.progress
            .iter()
            .filter(|r| r.user_id == user_id)
            .filter_map(|r| {
                t.challenges
                    .iter()
                    .find(|c| c.id == r.challenge_id)
                    .map(|c| TrackedChallenge {
                        progress: r.clone(),
                        challenge: c.clone(),
                    })
            })
            .collect())
    }

    async fn save_progress(&self, row: &UserChallengeRow) -> Result<(), AppError> {
        let mut t = self.tables.lock().unwrap();
        t.progress_writes += 1;
        let stored = t
            .progress
            .iter_mut()
            .find(|r| r.id == row.id)
            .ok_or_else(|| AppError::NotFound(format!("Progress row {} not found", row.id)))?;
        // a completed row keeps the snapshot it completed with
        if !stored.is_completed {
            stored.progress = row.progress.clone();
        }
        stored.is_completed = stored.is_completed || row.is_completed;
        stored.completed_at = stored.completed_at.or(row.completed_at);
        Ok(())
    }

    async fn completed_challenge_points(&self, user_id: Uuid) -> Result<i64, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.progress
            .iter()
            .filter(|r| r.user_id == user_id && r.is_completed)
            .filter_map(|r| t.challenges.iter().find(|c| c.id == r.challenge_id))
            .map(|c| i64::from(c.points))
            .sum())
    }

    async fn save_user_totals(
        &self,
        user_id: Uuid,
        points: i32,
        profile_completion: i32,
    ) -> Result<(), AppError> {
        let mut t = self.tables.lock().unwrap();
        t.total_writes += 1;
        let user = t
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;
        user.profile.points = points;
        user.profile.profile_completion = profile_completion;
        Ok(())
    }

    async fn badge_id_by_slug(&self, slug: &str) -> Result<Option<Uuid>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.badges.iter().find(|(_, s)| s == slug).map(|(id, _)| *id))
    }

    async fn award_badge(&self, user_id: Uuid, badge_id: Uuid) -> Result<bool, AppError> {
        let mut t = self.tables.lock().unwrap();
        if t.awards.iter().any(|(u, b, _)| *u == user_id && *b == badge_id) {
            return Ok(false);
        }
        t.awards.push((user_id, badge_id, Utc::now()));
        Ok(true)
    }

    async fn user_badges(&self, user_id: Uuid) -> Result<Vec<AwardedBadgeRow>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.awards
            .iter()
            .filter(|(u, _, _)| *u == user_id)
            .filter_map(|(_, badge_id, awarded_at)| {
                t.badges
                    .iter()
                    .find(|(id, _)| id == badge_id)
                    .map(|(id, slug)| AwardedBadgeRow {
                        badge_id: *id,
                        slug: slug.clone(),
                        name: slug.clone(),
                        description: String::new(),
                        icon: "trophy".to_string(),
                        awarded_at: *awarded_at,
                    })
            })
            .collect())
    }

    async fn leaderboard(&self, limit: i64) -> Result<Vec<LeaderboardEntry>, AppError> {
        let t = self.tables.lock().unwrap();
        let mut entries: Vec<LeaderboardEntry> = t
            .users
            .values()
            .map(|u| LeaderboardEntry {
                user_id: u.profile.id,
                username: u.profile.username.clone(),
                points: u.profile.points,
                completed_challenges: t
                    .progress
                    .iter()
                    .filter(|r| r.user_id == u.profile.id && r.is_completed)
                    .count() as i64,
            })
            .collect();
        entries.sort_by(|a, b| b.points.cmp(&a.points).then(a.username.cmp(&b.username)));
        entries.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(entries)
    }
}
