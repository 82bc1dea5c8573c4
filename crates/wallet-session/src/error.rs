use chain_evm::error::EvmError;
use thiserror::Error;

use crate::provider::ProviderError;

/// Session-level failure taxonomy.
///
/// `Unavailable` and `AccessDenied` are terminal for the session: the first
/// needs action outside the app (install a wallet), the second an explicit
/// user re-initiation. The validation variants are recoverable by fixing the
/// input. Nothing here is ever retried automatically; transfers and
/// registrations are not safely re-playable without user confirmation.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no wallet provider detected")]
    Unavailable,

    #[error("user denied account access")]
    AccessDenied,

    #[error("invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid network descriptor: {0}")]
    InvalidNetwork(String),

    #[error("provider rejected the request: {0}")]
    ProviderRejected(String),
}

impl From<EvmError> for SessionError {
    fn from(err: EvmError) -> Self {
        match err {
            EvmError::InvalidAddress(msg) => SessionError::InvalidRecipient(msg),
            EvmError::InvalidAmount(msg) => SessionError::InvalidAmount(msg),
        }
    }
}

impl From<ProviderError> for SessionError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Denied => SessionError::AccessDenied,
            ProviderError::Rejected(msg) => SessionError::ProviderRejected(msg),
        }
    }
}
