//! Bot assembly and the long-poll loop.
//!
//! [`GateBot::new`] opens the LMDB environment and wires the stores, the
//! Telegram client, the gate, and the dispatcher together; [`GateBot::run`]
//! confirms the token, starts the ops server, and polls for updates until
//! shutdown.

use std::sync::Arc;
use std::time::Duration;

use gatebot_assistant::{Assistant, OpenAiAssistant};
use gatebot_gate::{AccessGate, RandomChallengeSource};
use gatebot_store_lmdb::LmdbEnvironment;
use gatebot_telegram::{SubscriptionProbe, TelegramClient, Transport};

use crate::admin::AdminOps;
use crate::config::{AssistantConfig, BotConfig};
use crate::dispatcher::Dispatcher;
use crate::error::BotError;
use crate::metrics::BotMetrics;
use crate::ops::OpsServer;
use crate::shutdown::ShutdownController;
use crate::texts::TextCatalog;

/// Named databases the environment must accommodate.
const MAX_DBS: u32 = 8;

/// 256 MiB map size. User records are tiny; this lasts for millions of users.
const MAP_SIZE: usize = 256 * 1024 * 1024;

/// Pause before retrying a failed `getUpdates` call.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(3);

pub struct GateBot {
    config: BotConfig,
    client: Arc<TelegramClient>,
    dispatcher: Arc<Dispatcher>,
    shutdown: Arc<ShutdownController>,
    metrics: Arc<BotMetrics>,
}

impl GateBot {
    /// Open storage and wire every component. Does not touch the network.
    pub fn new(config: BotConfig) -> Result<Self, BotError> {
        let env = LmdbEnvironment::open(&config.data_dir, MAX_DBS, MAP_SIZE)?;
        let users = Arc::new(env.user_store());
        let channels = Arc::new(env.channel_store());
        let texts = Arc::new(TextCatalog::new(Arc::new(env.text_store())));

        let client = Arc::new(TelegramClient::with_base_url(
            &config.api_base,
            &config.bot_token,
        ));
        let transport: Arc<dyn Transport> = client.clone();
        let probe: Arc<dyn SubscriptionProbe> = client.clone();

        let params = config.gate_params();
        let gate = AccessGate::new(
            params.clone(),
            Box::new(RandomChallengeSource::new(&params)),
            users.clone(),
            users.clone(),
            users.clone(),
        );

        let metrics = Arc::new(BotMetrics::new());
        let admin = AdminOps::new(
            config.admin_ids.iter().copied(),
            users.clone(),
            users.clone(),
            channels.clone(),
            texts.clone(),
            transport.clone(),
            metrics.clone(),
        );
        let dispatcher = Arc::new(Dispatcher::new(
            gate,
            users,
            channels,
            texts,
            transport,
            probe,
            build_assistant(&config.assistant),
            admin,
            metrics.clone(),
            config.bot_username.clone(),
        ));

        Ok(Self {
            config,
            client,
            dispatcher,
            shutdown: Arc::new(ShutdownController::new()),
            metrics,
        })
    }

    /// For triggering shutdown from outside the poll loop.
    pub fn shutdown_handle(&self) -> Arc<ShutdownController> {
        self.shutdown.clone()
    }

    /// Confirm the token, start the ops server and signal handler, then poll
    /// until shutdown.
    pub async fn run(&self) -> Result<(), BotError> {
        let me = self.client.get_me().await?;
        let username = me.username.unwrap_or_else(|| me.first_name.clone());
        tracing::info!(bot = %username, "bot account confirmed");
        if self.config.bot_username.is_empty() {
            self.dispatcher.set_bot_username(&username);
        }

        if self.config.enable_ops {
            let addr = self.config.ops_listen_addr.parse().map_err(|e| {
                BotError::Ops(format!(
                    "bad ops_listen_addr {:?}: {e}",
                    self.config.ops_listen_addr
                ))
            })?;
            let ops = OpsServer::new(addr, self.metrics.clone());
            let shutdown_rx = self.shutdown.subscribe();
            tokio::spawn(async move {
                if let Err(err) = ops.serve(shutdown_rx).await {
                    tracing::error!(%err, "ops server failed");
                }
            });
        }

        let signals = self.shutdown.clone();
        tokio::spawn(async move { signals.wait_for_signal().await });

        self.poll_loop().await
    }

    /// Long-poll `getUpdates` and feed the dispatcher. Transport errors delay
    /// and retry; per-update errors are logged and skipped.
    async fn poll_loop(&self) -> Result<(), BotError> {
        let mut shutdown_rx = self.shutdown.subscribe();
        let mut offset = 0i64;
        tracing::info!("entering update loop");

        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => {
                    tracing::info!("update loop stopped");
                    return Ok(());
                }
                polled = self.client.get_updates(offset, self.config.poll_timeout_secs) => {
                    match polled {
                        Ok(updates) => {
                            for update in updates {
                                offset = offset.max(update.update_id + 1);
                                self.metrics.updates_received.inc();
                                if let Err(err) = self.dispatcher.handle_update(update).await {
                                    tracing::error!(%err, "update handling failed");
                                }
                            }
                            self.dispatcher.refresh_gauges();
                        }
                        Err(err) => {
                            tracing::warn!(%err, "getUpdates failed, retrying");
                            tokio::time::sleep(POLL_RETRY_DELAY).await;
                        }
                    }
                }
            }
        }
    }
}

/// The assistant, if one is both enabled and usable.
fn build_assistant(config: &AssistantConfig) -> Option<Arc<dyn Assistant>> {
    if !config.enabled {
        return None;
    }
    if config.api_key.is_empty() {
        tracing::warn!("assistant enabled without an api key, leaving it off");
        return None;
    }
    Some(Arc::new(OpenAiAssistant::with_base_url(
        &config.api_base,
        &config.api_key,
        &config.model,
        &config.system_prompt,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bot_assembles_from_a_fresh_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = BotConfig {
            bot_token: "123:abc".to_string(),
            data_dir: dir.path().to_path_buf(),
            ..BotConfig::default()
        };

        let bot = GateBot::new(config).unwrap();
        assert_eq!(bot.config.bot_token, "123:abc");
        assert!(dir.path().join("data.mdb").exists());
    }

    #[test]
    fn assistant_requires_both_flag_and_key() {
        let mut config = AssistantConfig::default();
        assert!(build_assistant(&config).is_none());

        config.enabled = true;
        assert!(build_assistant(&config).is_none());

        config.api_key = "sk-test".to_string();
        assert!(build_assistant(&config).is_some());
    }
}
