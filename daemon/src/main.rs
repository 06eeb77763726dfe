//! Gatebot daemon: entry point for running the onboarding bot.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use gatebot_bot::{init_logging, BotConfig, GateBot, LogFormat};

#[derive(Parser)]
#[command(name = "gatebot-daemon", about = "Telegram onboarding-gate bot daemon")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings are
    /// used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bot API token.
    #[arg(long, env = "GATEBOT_TOKEN")]
    token: Option<String>,

    /// Bot API base URL, for self-hosted API servers.
    #[arg(long, env = "GATEBOT_API_BASE")]
    api_base: Option<String>,

    /// Data directory for LMDB storage.
    #[arg(long, env = "GATEBOT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Long-poll hold time for getUpdates, in seconds.
    #[arg(long, env = "GATEBOT_POLL_TIMEOUT")]
    poll_timeout: Option<u64>,

    /// Admin user ids (comma-separated: "111,222").
    #[arg(long, env = "GATEBOT_ADMIN_IDS", value_delimiter = ',')]
    admin_ids: Vec<i64>,

    /// Disable the health/metrics HTTP server (enabled by default).
    #[arg(long, env = "GATEBOT_NO_OPS")]
    no_ops: bool,

    /// Listen address for the health/metrics server.
    #[arg(long, env = "GATEBOT_OPS_ADDR")]
    ops_listen_addr: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "GATEBOT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "GATEBOT_LOG_FORMAT")]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => BotConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => BotConfig::default(),
    };

    // CLI flags and env vars override the file.
    if let Some(token) = cli.token {
        config.bot_token = token;
    }
    if let Some(api_base) = cli.api_base {
        config.api_base = api_base;
    }
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(poll_timeout) = cli.poll_timeout {
        config.poll_timeout_secs = poll_timeout;
    }
    if !cli.admin_ids.is_empty() {
        config.admin_ids = cli.admin_ids;
    }
    if cli.no_ops {
        config.enable_ops = false;
    }
    if let Some(addr) = cli.ops_listen_addr {
        config.ops_listen_addr = addr;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    init_logging(LogFormat::from_config(&config.log_format), &config.log_level);

    if config.bot_token.is_empty() {
        anyhow::bail!(
            "no bot token: set bot_token in the config file, pass --token, or set GATEBOT_TOKEN"
        );
    }
    if let Some(path) = &cli.config {
        tracing::info!("loaded config from {}", path.display());
    }
    tracing::info!(
        data_dir = %config.data_dir.display(),
        ops = config.enable_ops,
        assistant = config.assistant.enabled,
        admins = config.admin_ids.len(),
        "starting gatebot"
    );

    let bot = GateBot::new(config).context("assembling the bot")?;
    bot.run().await?;

    tracing::info!("gatebot exited cleanly");
    Ok(())
}
