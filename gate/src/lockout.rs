//! Per-user timed lockout after a failed challenge.

use gatebot_types::{Timestamp, UserId};
use std::collections::HashMap;

/// Tracks per-user unblock deadlines.
///
/// Lockouts are never explicitly cleared: they self-expire by timestamp
/// comparison and the entry is dropped lazily on the next query. No entry
/// ever causes a permanent block. Repeated `lock` calls are last-writer-wins.
#[derive(Debug, Default)]
pub struct LockoutTracker {
    deadlines: HashMap<UserId, Timestamp>,
}

impl LockoutTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `user` is locked out, and the seconds remaining if so.
    ///
    /// An expired entry is removed on observation and reported unlocked.
    pub fn is_locked(&mut self, user: UserId, now: Timestamp) -> (bool, u64) {
        match self.deadlines.get(&user) {
            Some(deadline) => {
                let remaining = deadline.remaining_since(now);
                if remaining == 0 {
                    self.deadlines.remove(&user);
                }
                (remaining > 0, remaining)
            }
            None => (false, 0),
        }
    }

    /// Arm (or re-arm) the lockout: unblock at `now + duration_secs`.
    pub fn lock(&mut self, user: UserId, duration_secs: u64, now: Timestamp) {
        self.deadlines.insert(user, now.add_secs(duration_secs));
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}
