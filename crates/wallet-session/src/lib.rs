//! Session-state reconciliation and transaction submission for a
//! browser-hosted wallet client.
//!
//! The host environment injects a [`Provider`] (the wallet extension's
//! capability surface) and a [`NetworkNameCache`]; this crate keeps the
//! reconciled {account, network, balance} view consistent across provider
//! change events, and validates and submits native-currency transfers and
//! custom network registrations.
//!
//! Everything runs on one cooperative task: a provider call returns when
//! the RPC response or the user's decision is available. Events are queued
//! per session and applied strictly in arrival order.

pub mod error;
pub mod provider;
pub mod registry;
pub mod session;
pub mod submit;

pub use error::SessionError;
pub use provider::{
    bind, ChainId, Provider, ProviderError, ProviderEvent, ProviderHandle, TransferParams,
};
pub use registry::{register_with_provider, NetworkDescriptor, NetworkRegistry};
pub use session::{BalanceResolution, MemoryNameCache, NetworkNameCache, Session, SessionStatus};
pub use submit::{Submitter, TransferReceipt, TransferRequest};
