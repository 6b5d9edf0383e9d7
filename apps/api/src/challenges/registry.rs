use crate::challenges::checkers::ChallengeKind;

/// Ordered (keyword, checker) pairs. The first keyword contained in a
/// challenge's lower-cased name wins, so more specific keywords must come
/// before the general ones that would also match.
#[derive(Debug, Clone)]
pub struct CheckerRegistry {
    entries: Vec<(String, ChallengeKind)>,
}

const DEFAULT_ORDER: &[(&str, ChallengeKind)] = &[
    ("first challenge", ChallengeKind::FirstChallenge),
    // "Challenge Champion", "Complete 5 Challenges"
    ("challenge", ChallengeKind::MultipleChallenges),
    ("apply", ChallengeKind::Applications),
    ("profile", ChallengeKind::ProfileCompletion),
    ("inbox zero", ChallengeKind::InboxZero),
    ("resume", ChallengeKind::ResumeUploaded),
    ("message", ChallengeKind::MessageReceived),
    ("reference", ChallengeKind::ReferenceAdded),
    ("favorite", ChallengeKind::JobFavorited),
];

impl Default for CheckerRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_ORDER.iter().copied())
    }
}

impl CheckerRegistry {
    pub fn new<'a>(entries: impl IntoIterator<Item = (&'a str, ChallengeKind)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(keyword, kind)| (keyword.to_lowercase(), kind))
                .collect(),
        }
    }

    /// Returns the checker for a challenge name, or `None` if no keyword matches.
    pub fn route(&self, challenge_name: &str) -> Option<ChallengeKind> {
        let name = challenge_name.to_lowercase();
        self.entries
            .iter()
            .find(|(keyword, _)| name.contains(keyword.as_str()))
            .map(|(_, kind)| *kind)
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}
