use gatebot_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GateError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
