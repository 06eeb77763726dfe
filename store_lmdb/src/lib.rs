//! LMDB storage backend for the gatebot onboarding gate.
//!
//! Implements all storage traits from `gatebot-store` using the `heed` LMDB
//! bindings. Each logical store maps to one named LMDB database within a
//! single environment.

pub mod channels;
pub mod environment;
pub mod error;
pub mod texts;
pub mod user;

pub use channels::LmdbChannelStore;
pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use texts::LmdbTextStore;
pub use user::LmdbUserStore;
