use chrono::{DateTime, Utc};

/// Source of "now" for stamping completions and picking active challenges.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Manually advanced clock.
    #[derive(Debug)]
    pub(crate) struct FixedClock(Mutex<DateTime<Utc>>);

    impl FixedClock {
        pub(crate) fn at(now: DateTime<Utc>) -> Self {
            FixedClock(Mutex::new(now))
        }

        pub(crate) fn advance(&self, by: chrono::Duration) {
            let mut now = self.0.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }
}
