use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelegramError {
    /// The Bot API answered with `ok: false`.
    #[error("telegram api error {code}: {description}")]
    Api { code: i64, description: String },

    #[error("http request failed: {0}")]
    Http(String),

    #[error("malformed api response: {0}")]
    MalformedResponse(String),
}
