//! Abstract storage traits for the gatebot onboarding gate.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the workspace depends only on the traits.

pub mod channels;
pub mod error;
pub mod referral;
pub mod texts;
pub mod user;
pub mod verification;

pub use channels::ChannelStore;
pub use error::StoreError;
pub use referral::ReferralLedger;
pub use texts::TextStore;
pub use user::{UserRecord, UserStore};
pub use verification::VerificationLedger;
