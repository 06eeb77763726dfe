//! OpenAI-compatible chat-completion client.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Assistant, AssistantError};

const OPENAI_API_URL: &str = "https://api.openai.com";

/// Completions can take a while under load; allow well beyond the usual
/// method-call timeout before giving up.
const COMPLETION_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}

pub struct OpenAiAssistant {
    base_url: String,
    api_key: String,
    model: String,
    system_prompt: String,
    client: reqwest::Client,
}

impl OpenAiAssistant {
    pub fn new(api_key: &str, model: &str, system_prompt: &str) -> Self {
        Self::with_base_url(OPENAI_API_URL, api_key, model, system_prompt)
    }

    /// Point at a compatible non-OpenAI endpoint.
    pub fn with_base_url(base_url: &str, api_key: &str, model: &str, system_prompt: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            system_prompt: system_prompt.to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

#[async_trait::async_trait]
impl Assistant for OpenAiAssistant {
    async fn reply(&self, user_text: &str) -> Result<String, AssistantError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_text,
                },
            ],
        };

        let resp = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .timeout(COMPLETION_TIMEOUT)
            .send()
            .await
            .map_err(|e| AssistantError::Http(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(AssistantError::Api(format!(
                "HTTP {} from {}",
                resp.status(),
                self.completions_url()
            )));
        }

        let completion: ChatResponse = resp
            .json()
            .await
            .map_err(|e| AssistantError::Api(e.to_string()))?;

        let text = completion
            .choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(AssistantError::EmptyCompletion);
        }
        Ok(text)
    }
}
