//! Broadcast fan-out: one message to every known user, paced to stay
//! under the Bot API rate limit.

use std::sync::Arc;
use std::time::Duration;

use gatebot_telegram::Transport;
use gatebot_types::{ChatId, UserId};

/// Delay between consecutive sends. ~28 messages per second keeps the bot
/// safely below the global sending limit.
const SEND_PACING: Duration = Duration::from_millis(35);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub sent: u64,
    pub failed: u64,
}

/// Send `text` to every user in `recipients`, pacing sends.
///
/// Per-user failures (blocked bot, deleted account) are logged and counted,
/// never fatal.
pub async fn broadcast(
    transport: &Arc<dyn Transport>,
    recipients: &[UserId],
    text: &str,
) -> BroadcastReport {
    let mut report = BroadcastReport::default();
    for (i, user) in recipients.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(SEND_PACING).await;
        }
        match transport.send_message(ChatId::from(*user), text).await {
            Ok(()) => report.sent += 1,
            Err(err) => {
                tracing::debug!(%user, %err, "broadcast delivery failed");
                report.failed += 1;
            }
        }
    }
    report
}
