//! Gate parameters: every tunable the onboarding flow consumes.

use serde::{Deserialize, Serialize};

/// Tunable parameters of the onboarding gate.
///
/// All values have working defaults; deployments override them through the
/// bot configuration file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateParams {
    /// Units credited to a referrer when their referred user verifies.
    pub reward_amount: u64,

    /// Lockout duration (seconds) after a wrong challenge answer.
    pub lockout_secs: u64,

    /// Inclusive lower bound for challenge operands.
    pub challenge_operand_min: i64,

    /// Inclusive upper bound for challenge operands.
    pub challenge_operand_max: i64,

    /// Number of entries shown on the balance leaderboard.
    pub leaderboard_size: usize,
}

impl GateParams {
    /// Fallback reward when no amount is configured.
    pub const DEFAULT_REWARD: u64 = 10;

    /// Fixed lockout applied after a failed challenge.
    pub const DEFAULT_LOCKOUT_SECS: u64 = 60;

    /// The stock configuration: small single-digit challenges, 60 s lockout,
    /// 10-unit referral reward.
    pub fn gate_defaults() -> Self {
        Self {
            reward_amount: Self::DEFAULT_REWARD,
            lockout_secs: Self::DEFAULT_LOCKOUT_SECS,
            challenge_operand_min: 1,
            challenge_operand_max: 9,
            leaderboard_size: 10,
        }
    }
}

impl Default for GateParams {
    fn default() -> Self {
        Self::gate_defaults()
    }
}
