//! Outcomes returned by the access gate to its caller.

use gatebot_types::{ArithmeticChallenge, ChannelId, UserId};

/// Result of the pre-network half of an entry event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryStage {
    /// Lockout active. Entry is refused and no subscription probe runs.
    Locked { remaining_secs: u64 },
    /// Lockout clear; the caller runs the subscription probe and finishes
    /// with [`crate::AccessGate::complete_entry`].
    Proceed,
}

/// Result of a completed entry event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Required channels the user has not joined. Entry refused; gate state
    /// untouched.
    Unsubscribed { unmet: Vec<ChannelId> },
    /// Verified in this or an earlier session; full access.
    AlreadyVerified,
    /// A fresh challenge was issued, replacing any outstanding one.
    ChallengeIssued { challenge: ArithmeticChallenge },
}

/// Result of a challenge response event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// Correct answer: the user is verified. Carries the referral reward if
    /// one was credited on this transition.
    Verified { reward: Option<RewardCredit> },
    /// Wrong answer: challenge consumed, lockout armed.
    WrongAnswer { locked_for_secs: u64 },
    /// Non-numeric input: the challenge stays outstanding and no lockout is
    /// armed; the caller re-prompts for a number.
    Malformed,
    /// No outstanding challenge (consumed or superseded); the caller tells
    /// the user to restart.
    Expired,
}

/// A reward credited to a referrer on the verification edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RewardCredit {
    pub referrer: UserId,
    pub amount: u64,
    /// Referrer balance after the credit.
    pub new_balance: u64,
}
