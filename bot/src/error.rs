use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("gate error: {0}")]
    Gate(#[from] gatebot_gate::GateError),

    #[error("store error: {0}")]
    Store(#[from] gatebot_store::StoreError),

    #[error("storage backend error: {0}")]
    Lmdb(#[from] gatebot_store_lmdb::LmdbError),

    #[error("telegram error: {0}")]
    Telegram(#[from] gatebot_telegram::TelegramError),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ops server error: {0}")]
    Ops(String),
}
