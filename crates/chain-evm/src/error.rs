use thiserror::Error;

/// EVM primitive errors.
#[derive(Debug, Error)]
pub enum EvmError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}
