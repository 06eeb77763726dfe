//! Bot configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use gatebot_types::GateParams;

use crate::BotError;

/// Configuration for the bot.
///
/// Can be loaded from a TOML file via [`BotConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BotConfig {
    /// Bot API token. Must come from the config file, a CLI flag, or the
    /// `GATEBOT_TOKEN` environment variable.
    #[serde(default)]
    pub bot_token: String,

    /// Bot API base URL, overridable for self-hosted API servers and tests.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Bot username for referral links. Resolved via `getMe` when empty.
    #[serde(default)]
    pub bot_username: String,

    /// Data directory for LMDB storage.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// How long `getUpdates` holds the connection open, in seconds.
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,

    /// Referral reward credited on a verified referral.
    #[serde(default = "default_reward_amount")]
    pub reward_amount: u64,

    /// Lockout after a wrong challenge answer, in seconds.
    #[serde(default = "default_lockout_secs")]
    pub lockout_secs: u64,

    /// Smallest challenge operand (inclusive).
    #[serde(default = "default_operand_min")]
    pub challenge_operand_min: i64,

    /// Largest challenge operand (inclusive).
    #[serde(default = "default_operand_max")]
    pub challenge_operand_max: i64,

    /// How many users the leaderboard shows.
    #[serde(default = "default_leaderboard_size")]
    pub leaderboard_size: usize,

    /// User ids allowed to run admin commands.
    #[serde(default)]
    pub admin_ids: Vec<i64>,

    /// Whether to run the health/metrics HTTP server.
    #[serde(default = "default_true")]
    pub enable_ops: bool,

    /// Listen address for the health/metrics server.
    #[serde(default = "default_ops_listen_addr")]
    pub ops_listen_addr: String,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Assistant settings for free-form messages.
    #[serde(default)]
    pub assistant: AssistantConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Whether free-form messages go to the assistant at all.
    #[serde(default)]
    pub enabled: bool,

    /// OpenAI-compatible API base URL.
    #[serde(default = "default_assistant_api_base")]
    pub api_base: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_assistant_model")]
    pub model: String,

    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./gatebot-data")
}

fn default_poll_timeout() -> u64 {
    30
}

fn default_reward_amount() -> u64 {
    GateParams::DEFAULT_REWARD
}

fn default_lockout_secs() -> u64 {
    GateParams::DEFAULT_LOCKOUT_SECS
}

fn default_operand_min() -> i64 {
    1
}

fn default_operand_max() -> i64 {
    9
}

fn default_leaderboard_size() -> usize {
    10
}

fn default_true() -> bool {
    true
}

fn default_ops_listen_addr() -> String {
    "127.0.0.1:9615".to_string()
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_assistant_api_base() -> String {
    "https://api.openai.com".to_string()
}

fn default_assistant_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_system_prompt() -> String {
    "You are the support assistant of a Telegram community bot. Keep answers short and friendly."
        .to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl BotConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &std::path::Path) -> Result<Self, BotError> {
        let content = std::fs::read_to_string(path).map_err(|e| BotError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, BotError> {
        toml::from_str(s).map_err(|e| BotError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("BotConfig is always serializable to TOML")
    }

    /// The gate tunables carried by this config.
    pub fn gate_params(&self) -> GateParams {
        GateParams {
            reward_amount: self.reward_amount,
            lockout_secs: self.lockout_secs,
            challenge_operand_min: self.challenge_operand_min,
            challenge_operand_max: self.challenge_operand_max,
            leaderboard_size: self.leaderboard_size,
        }
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_ids.contains(&user_id)
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            api_base: default_api_base(),
            bot_username: String::new(),
            data_dir: default_data_dir(),
            poll_timeout_secs: default_poll_timeout(),
            reward_amount: default_reward_amount(),
            lockout_secs: default_lockout_secs(),
            challenge_operand_min: default_operand_min(),
            challenge_operand_max: default_operand_max(),
            leaderboard_size: default_leaderboard_size(),
            admin_ids: Vec::new(),
            enable_ops: default_true(),
            ops_listen_addr: default_ops_listen_addr(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            assistant: AssistantConfig::default(),
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_base: default_assistant_api_base(),
            api_key: String::new(),
            model: default_assistant_model(),
            system_prompt: default_system_prompt(),
        }
    }
}
