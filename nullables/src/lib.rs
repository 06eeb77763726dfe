//! Nullable infrastructure for deterministic testing.
//!
//! Every external dependency of the bot (clock, Telegram transport,
//! storage, challenge randomness, the assistant) sits behind a trait.
//! This crate provides implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod challenge;
pub mod clock;
pub mod network;
pub mod store;

pub use challenge::FixedChallengeSource;
pub use clock::NullClock;
pub use network::{NullAssistant, NullSubscriptionProbe, NullTransport};
pub use store::{MemoryChannelStore, MemoryTextStore, MemoryUserStore};
