//! Verification-and-reward state machine for the gatebot onboarding gate.
//!
//! Before a user may use the bot, it must pass a channel-subscription check
//! and a one-time arithmetic challenge, and any referral relationship must be
//! recorded and rewarded exactly once. This crate holds that core: the
//! challenge source, the per-user lockout tracker, the pending-challenge
//! store, and the [`AccessGate`] orchestrator that ties them to the durable
//! ledgers.
//!
//! The crate is synchronous and transport-free; the bot layer runs the
//! subscription probe between [`AccessGate::begin_entry`] and
//! [`AccessGate::complete_entry`] and delivers messages for the outcomes.

pub mod challenge;
pub mod error;
pub mod lockout;
pub mod orchestrator;
pub mod outcomes;
pub mod pending;

pub use challenge::RandomChallengeSource;
pub use error::GateError;
pub use lockout::LockoutTracker;
pub use orchestrator::{AccessGate, GateEvent};
pub use outcomes::{EntryOutcome, EntryStage, ResponseOutcome, RewardCredit};
pub use pending::{PendingChallenge, PendingChallenges};
