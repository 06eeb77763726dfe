//! Fundamental types for the gatebot onboarding gate.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! user and channel identifiers, timestamps, gate parameters, the per-user gate state,
//! and the arithmetic challenge used for human verification.

pub mod challenge;
pub mod ids;
pub mod params;
pub mod state;
pub mod time;

pub use challenge::{ArithmeticChallenge, ChallengeSource, Operator};
pub use ids::{ChannelId, ChatId, UserId};
pub use params::GateParams;
pub use state::GateState;
pub use time::Timestamp;
