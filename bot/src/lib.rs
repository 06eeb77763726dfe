//! The gatebot service layer: everything between the Telegram wire and the
//! access gate:
//! - Routes long-poll updates to entry, answer, command, and callback handlers
//! - Renders replies from the admin-editable text catalog
//! - Runs admin operations (grants, broadcast, channel list, text overrides)
//! - Serves health and Prometheus metrics endpoints
//! - Coordinates graceful shutdown across the poll loop and the ops server

pub mod admin;
pub mod bot;
pub mod broadcast;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod ops;
pub mod shutdown;
pub mod texts;

pub use admin::{AdminAction, AdminOps};
pub use bot::GateBot;
pub use broadcast::BroadcastReport;
pub use config::{AssistantConfig, BotConfig};
pub use dispatcher::Dispatcher;
pub use error::BotError;
pub use logging::{init_logging, LogFormat};
pub use metrics::BotMetrics;
pub use ops::OpsServer;
pub use shutdown::ShutdownController;
pub use texts::{TextCatalog, TextKey};
