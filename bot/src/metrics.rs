//! Prometheus metrics for the bot.
//!
//! Counters and gauges covering update handling, the verification gate,
//! referral rewards, and outbound messaging. The [`BotMetrics`] struct owns
//! a dedicated [`Registry`] that the ops `/metrics` endpoint encodes into
//! the Prometheus text exposition format.

use prometheus::{
    register_int_counter_with_registry, register_int_gauge_with_registry, IntCounter, IntGauge,
    Opts, Registry,
};

/// Central collection of all bot-level Prometheus metrics.
pub struct BotMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Total updates received from long polling.
    pub updates_received: IntCounter,
    /// Total commands handled (including admin commands).
    pub commands_handled: IntCounter,
    /// Total arithmetic challenges issued.
    pub challenges_issued: IntCounter,
    /// Total users who passed verification.
    pub verifications: IntCounter,
    /// Total referral rewards credited.
    pub rewards_credited: IntCounter,
    /// Total lockouts armed after wrong answers.
    pub lockouts_armed: IntCounter,
    /// Total outbound messages delivered.
    pub messages_sent: IntCounter,
    /// Total outbound messages that failed to deliver.
    pub send_failures: IntCounter,
    /// Total assistant completions delivered.
    pub assistant_replies: IntCounter,
    /// Total assistant calls that failed.
    pub assistant_failures: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Current number of known users.
    pub known_users: IntGauge,
    /// Current number of verified users.
    pub verified_users: IntGauge,
}

impl BotMetrics {
    /// Create a fresh set of metrics, all registered under a new
    /// [`Registry`].
    pub fn new() -> Self {
        let registry = Registry::new();

        let updates_received = register_int_counter_with_registry!(
            Opts::new("gatebot_updates_received_total", "Total updates received"),
            registry
        )
        .expect("failed to register updates_received counter");

        let commands_handled = register_int_counter_with_registry!(
            Opts::new("gatebot_commands_handled_total", "Total commands handled"),
            registry
        )
        .expect("failed to register commands_handled counter");

        let challenges_issued = register_int_counter_with_registry!(
            Opts::new(
                "gatebot_challenges_issued_total",
                "Total arithmetic challenges issued"
            ),
            registry
        )
        .expect("failed to register challenges_issued counter");

        let verifications = register_int_counter_with_registry!(
            Opts::new(
                "gatebot_verifications_total",
                "Total users who passed verification"
            ),
            registry
        )
        .expect("failed to register verifications counter");

        let rewards_credited = register_int_counter_with_registry!(
            Opts::new(
                "gatebot_rewards_credited_total",
                "Total referral rewards credited"
            ),
            registry
        )
        .expect("failed to register rewards_credited counter");

        let lockouts_armed = register_int_counter_with_registry!(
            Opts::new(
                "gatebot_lockouts_armed_total",
                "Total lockouts armed after wrong answers"
            ),
            registry
        )
        .expect("failed to register lockouts_armed counter");

        let messages_sent = register_int_counter_with_registry!(
            Opts::new("gatebot_messages_sent_total", "Total messages delivered"),
            registry
        )
        .expect("failed to register messages_sent counter");

        let send_failures = register_int_counter_with_registry!(
            Opts::new(
                "gatebot_send_failures_total",
                "Total messages that failed to deliver"
            ),
            registry
        )
        .expect("failed to register send_failures counter");

        let assistant_replies = register_int_counter_with_registry!(
            Opts::new(
                "gatebot_assistant_replies_total",
                "Total assistant completions delivered"
            ),
            registry
        )
        .expect("failed to register assistant_replies counter");

        let assistant_failures = register_int_counter_with_registry!(
            Opts::new(
                "gatebot_assistant_failures_total",
                "Total assistant calls that failed"
            ),
            registry
        )
        .expect("failed to register assistant_failures counter");

        let known_users = register_int_gauge_with_registry!(
            Opts::new("gatebot_known_users", "Current number of known users"),
            registry
        )
        .expect("failed to register known_users gauge");

        let verified_users = register_int_gauge_with_registry!(
            Opts::new(
                "gatebot_verified_users",
                "Current number of verified users"
            ),
            registry
        )
        .expect("failed to register verified_users gauge");

        Self {
            registry,
            updates_received,
            commands_handled,
            challenges_issued,
            verifications,
            rewards_credited,
            lockouts_armed,
            messages_sent,
            send_failures,
            assistant_replies,
            assistant_failures,
            known_users,
            verified_users,
        }
    }
}

impl Default for BotMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_register_and_count() {
        let metrics = BotMetrics::new();
        metrics.updates_received.inc();
        metrics.updates_received.inc();
        assert_eq!(metrics.updates_received.get(), 2);

        let families = metrics.registry.gather();
        assert!(families
            .iter()
            .any(|f| f.get_name() == "gatebot_updates_received_total"));
    }
}
