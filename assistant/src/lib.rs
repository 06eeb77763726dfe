//! Free-form message assistant.
//!
//! Messages that are neither commands nor challenge answers get handed to an
//! [`Assistant`]. The production implementation calls an OpenAI-compatible
//! chat-completion endpoint; the bot falls back to a fixed apology when the
//! call fails, so this crate only reports errors and never invents text.

pub mod openai;

pub use openai::OpenAiAssistant;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("http request failed: {0}")]
    Http(String),

    #[error("assistant api error: {0}")]
    Api(String),

    #[error("completion came back empty")]
    EmptyCompletion,
}

/// Produces replies to free-form user messages.
#[async_trait]
pub trait Assistant: Send + Sync {
    async fn reply(&self, user_text: &str) -> Result<String, AssistantError>;
}
