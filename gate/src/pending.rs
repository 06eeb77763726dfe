//! At-most-one outstanding challenge per user.

use gatebot_types::{ArithmeticChallenge, Timestamp, UserId};
use std::collections::HashMap;

/// A challenge awaiting its answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingChallenge {
    pub challenge: ArithmeticChallenge,
    pub issued_at: Timestamp,
}

/// Holds the latest outstanding challenge per user.
///
/// Issuing unconditionally overwrites: a new /start invalidates a stale
/// challenge instead of stacking a second one, so a response always
/// validates against the latest challenge only. There is no TTL clock; a
/// challenge dies when it is consumed or superseded.
#[derive(Debug, Default)]
pub struct PendingChallenges {
    entries: HashMap<UserId, PendingChallenge>,
}

impl PendingChallenges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `challenge` for `user`, replacing any outstanding one.
    pub fn issue(&mut self, user: UserId, challenge: ArithmeticChallenge, now: Timestamp) {
        self.entries.insert(
            user,
            PendingChallenge {
                challenge,
                issued_at: now,
            },
        );
    }

    /// The outstanding challenge, if any, without consuming it.
    pub fn peek(&self, user: UserId) -> Option<&PendingChallenge> {
        self.entries.get(&user)
    }

    /// Remove and return the outstanding challenge.
    ///
    /// `None` means "expired or never issued"; the caller answers with an
    /// explicit re-prompt, never a crash.
    pub fn consume(&mut self, user: UserId) -> Option<PendingChallenge> {
        self.entries.remove(&user)
    }

    pub fn has_pending(&self, user: UserId) -> bool {
        self.entries.contains_key(&user)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
