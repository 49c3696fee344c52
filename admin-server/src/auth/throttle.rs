//! Failed-Login Throttle
//!
//! Lock-free per-username counters over a DashMap. The threshold comes
//! from the security settings at check time, so committing a new
//! configuration takes effect on the next attempt without a restart.

use dashmap::DashMap;

use crate::utils::time::now_millis;

/// Window after which a username's failure streak resets (millis)
const WINDOW_MS: i64 = 15 * 60 * 1000;

#[derive(Debug, Clone, Copy)]
struct FailureStreak {
    count: u32,
    window_start: i64,
}

/// Per-username failed-login tracking
#[derive(Debug, Default)]
pub struct LoginThrottle {
    streaks: DashMap<String, FailureStreak>,
}

impl LoginThrottle {
    pub fn new() -> Self {
        Self {
            streaks: DashMap::new(),
        }
    }

    /// Whether this username is currently locked out
    pub fn is_locked(&self, username: &str, max_failed_logins: u32) -> bool {
        match self.streaks.get(username) {
            Some(streak) => {
                now_millis() - streak.window_start < WINDOW_MS && streak.count >= max_failed_logins
            }
            None => false,
        }
    }

    /// Record a failed attempt, returning the streak length
    pub fn record_failure(&self, username: &str) -> u32 {
        let now = now_millis();
        let mut entry = self
            .streaks
            .entry(username.to_string())
            .or_insert(FailureStreak {
                count: 0,
                window_start: now,
            });

        if now - entry.window_start >= WINDOW_MS {
            entry.count = 0;
            entry.window_start = now;
        }
        entry.count += 1;
        entry.count
    }

    /// Clear the streak after a successful login
    pub fn record_success(&self, username: &str) {
        self.streaks.remove(username);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locks_after_threshold() {
        let throttle = LoginThrottle::new();
        assert!(!throttle.is_locked("jdoe", 3));

        throttle.record_failure("jdoe");
        throttle.record_failure("jdoe");
        assert!(!throttle.is_locked("jdoe", 3));

        throttle.record_failure("jdoe");
        assert!(throttle.is_locked("jdoe", 3));

        // Another username is unaffected
        assert!(!throttle.is_locked("asmith", 3));
    }

    #[test]
    fn success_clears_streak() {
        let throttle = LoginThrottle::new();
        for _ in 0..5 {
            throttle.record_failure("jdoe");
        }
        assert!(throttle.is_locked("jdoe", 5));

        throttle.record_success("jdoe");
        assert!(!throttle.is_locked("jdoe", 5));
    }
}
