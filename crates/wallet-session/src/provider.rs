use std::fmt;
use std::rc::Rc;
use std::sync::mpsc::Sender;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::SessionError;

/// Opaque, provider-supplied identifier of the active network.
///
/// Carried as a string because providers do not guarantee a numeric or
/// stable format; it is only parsed where a specific encoding is required
/// (network registration).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainId(pub String);

impl ChainId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChainId {
    fn from(id: &str) -> Self {
        ChainId(id.to_string())
    }
}

/// Failures surfaced by the injected provider itself.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The user declined the request in the host UI.
    #[error("request denied by user")]
    Denied,

    /// The provider refused or failed to execute the request.
    #[error("{0}")]
    Rejected(String),
}

/// Notifications pushed by the provider while a session is bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// The active network changed underneath the application.
    NetworkChanged(ChainId),
    /// The provider connection is gone (e.g. the user locked the wallet).
    Disconnected,
}

/// Identifier of an active event subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(pub u64);

/// Parameters of a native-currency transfer handed to the provider.
#[derive(Debug, Clone, Serialize)]
pub struct TransferParams {
    pub from: String,
    pub to: String,
    /// Transfer value in wei.
    pub value: U256,
}

/// Capability surface of an injected wallet provider.
///
/// Calls are cooperative: a method that needs an RPC round-trip or a user
/// decision returns once that outcome is available. A prompt the user
/// dismisses resolves to an error rather than hanging; no timeout is
/// enforced on this side.
pub trait Provider {
    /// Requests authorization for account access, suspending until the user
    /// approves or denies in the host UI.
    fn request_accounts(&self) -> Result<Vec<String>, ProviderError>;

    /// Returns the identifier of the currently active network.
    fn chain_id(&self) -> Result<ChainId, ProviderError>;

    /// Returns the list of authorized accounts.
    fn accounts(&self) -> Result<Vec<String>, ProviderError>;

    /// Returns the native-currency balance of `address` in wei.
    fn balance_of(&self, address: &str) -> Result<U256, ProviderError>;

    /// Submits a native transfer, suspending until the provider returns a
    /// result or the user rejects it. The result carries the transaction
    /// hash under `transactionHash`.
    fn send_transfer(&self, params: &TransferParams) -> Result<serde_json::Value, ProviderError>;

    /// Asks the provider to register a network definition.
    fn add_chain(&self, payload: &serde_json::Value) -> Result<(), ProviderError>;

    /// Registers an event sink for network-change and disconnect
    /// notifications.
    fn subscribe(&self, sink: Sender<ProviderEvent>) -> SubscriptionId;

    /// Removes a previously registered event sink.
    fn unsubscribe(&self, id: SubscriptionId);
}

/// An authorized connection to a wallet provider.
///
/// Only a successful [`bind`] produces a handle. Cloning shares the same
/// underlying provider; the session and the submitter both consume it
/// read-only.
#[derive(Clone)]
pub struct ProviderHandle {
    provider: Rc<dyn Provider>,
}

impl ProviderHandle {
    pub fn provider(&self) -> &dyn Provider {
        self.provider.as_ref()
    }

    fn share(&self) -> Rc<dyn Provider> {
        Rc::clone(&self.provider)
    }
}

impl fmt::Debug for ProviderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderHandle").finish_non_exhaustive()
    }
}

/// Detects and authorizes an injected provider.
///
/// `injected` is whatever the host environment exposes, `None` when no
/// wallet extension is present. Absence is terminal and never retried (the
/// surrounding UI shows an installation prompt). A denial is likewise not
/// retried here: re-initiation is an explicit user action, not a transient
/// fault.
pub fn bind(injected: Option<Rc<dyn Provider>>) -> Result<ProviderHandle, SessionError> {
    let provider = injected.ok_or(SessionError::Unavailable)?;

    match provider.request_accounts() {
        Ok(accounts) => {
            tracing::info!(accounts = accounts.len(), "provider bound");
            Ok(ProviderHandle { provider })
        }
        Err(ProviderError::Denied) => {
            tracing::warn!("user denied account access");
            Err(SessionError::AccessDenied)
        }
        Err(ProviderError::Rejected(msg)) => Err(SessionError::ProviderRejected(msg)),
    }
}

/// Scoped subscription to provider events.
///
/// Dropping the guard removes the sink from the provider, so a rebound
/// session can never accumulate duplicate handlers.
pub struct EventSubscription {
    provider: Rc<dyn Provider>,
    id: SubscriptionId,
}

impl EventSubscription {
    pub fn new(handle: &ProviderHandle, sink: Sender<ProviderEvent>) -> Self {
        let id = handle.provider().subscribe(sink);
        Self {
            provider: handle.share(),
            id,
        }
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.provider.unsubscribe(self.id);
    }
}
