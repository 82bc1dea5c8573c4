use std::collections::HashMap;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver};

use chain_evm::{chains, units};

use crate::error::SessionError;
use crate::provider::{
    self, ChainId, EventSubscription, Provider, ProviderEvent, ProviderHandle,
};

/// Keyed persistence for resolved network display names.
///
/// Keying by chain identifier (rather than one global "last known" slot)
/// lets multiple sessions and test runs coexist without leaking state into
/// each other. Implementations may persist across reloads; the cache only
/// ever holds display names, never balances or accounts.
pub trait NetworkNameCache {
    fn get(&self, chain: &ChainId) -> Option<String>;
    fn put(&mut self, chain: &ChainId, name: &str);
}

/// In-process cache. Suitable for tests and for hosts without durable
/// storage.
#[derive(Debug, Default)]
pub struct MemoryNameCache {
    entries: HashMap<ChainId, String>,
}

impl MemoryNameCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NetworkNameCache for MemoryNameCache {
    fn get(&self, chain: &ChainId) -> Option<String> {
        self.entries.get(chain).cloned()
    }

    fn put(&mut self, chain: &ChainId, name: &str) {
        self.entries.insert(chain.clone(), name.to_string());
    }
}

/// Lifecycle of a session's provider binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No live binding; also entered when the provider disconnects.
    Unbound,
    /// An authorized provider connection is live.
    Bound,
    /// The user declined authorization. Terminal until the user
    /// re-initiates binding.
    Denied,
    /// No provider is injected in the host environment. Terminal.
    Unavailable,
}

/// A balance lookup tagged with the state it was computed against.
///
/// The tags are what make out-of-order completion safe: a resolution whose
/// chain or account no longer matches the session at apply time is
/// discarded, so a lookup that raced a network switch can never overwrite
/// state derived from the newer network.
#[derive(Debug, Clone)]
pub struct BalanceResolution {
    chain: ChainId,
    account: String,
    /// Balance in decimal ether units.
    balance: String,
}

impl BalanceResolution {
    /// The chain this resolution was computed for.
    pub fn computed_for(&self) -> &ChainId {
        &self.chain
    }
}

/// The reconciled view of {account, network, balance} for one provider
/// binding.
///
/// All mutation funnels through either an explicit resolve call or
/// [`Session::process_events`]; events are applied strictly in arrival
/// order.
pub struct Session<C: NetworkNameCache> {
    status: SessionStatus,
    handle: Option<ProviderHandle>,
    account: Option<String>,
    chain: Option<ChainId>,
    network_name: Option<String>,
    balance: Option<String>,
    cache: C,
    subscription: Option<EventSubscription>,
    events: Option<Receiver<ProviderEvent>>,
}

impl<C: NetworkNameCache> Session<C> {
    pub fn new(cache: C) -> Self {
        Self {
            status: SessionStatus::Unbound,
            handle: None,
            account: None,
            chain: None,
            network_name: None,
            balance: None,
            cache,
            subscription: None,
            events: None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    pub fn chain(&self) -> Option<&ChainId> {
        self.chain.as_ref()
    }

    pub fn network_name(&self) -> Option<&str> {
        self.network_name.as_deref()
    }

    /// Balance of the active account in decimal ether units, if resolved
    /// against the current account and chain.
    pub fn balance(&self) -> Option<&str> {
        self.balance.as_deref()
    }

    pub fn handle(&self) -> Option<&ProviderHandle> {
        self.handle.as_ref()
    }

    /// Attempts to bind to the injected provider and subscribe to its
    /// change events.
    ///
    /// Any previous subscription is released before the new one is
    /// installed, so there is exactly one active listener per bound handle
    /// no matter how often the session is rebound. The reconciled view is
    /// cleared up front: account, chain, name, and balance all belong to
    /// the previous binding and must be re-resolved against the new
    /// provider, whether or not the rebind succeeds.
    pub fn bind(&mut self, injected: Option<Rc<dyn Provider>>) -> Result<(), SessionError> {
        self.subscription = None;
        self.events = None;
        self.handle = None;
        self.account = None;
        self.chain = None;
        self.network_name = None;
        self.balance = None;

        match provider::bind(injected) {
            Ok(handle) => {
                let (sink, events) = mpsc::channel();
                self.subscription = Some(EventSubscription::new(&handle, sink));
                self.events = Some(events);
                self.handle = Some(handle);
                self.status = SessionStatus::Bound;
                Ok(())
            }
            Err(err) => {
                self.status = match err {
                    SessionError::Unavailable => SessionStatus::Unavailable,
                    SessionError::AccessDenied => SessionStatus::Denied,
                    _ => SessionStatus::Unbound,
                };
                Err(err)
            }
        }
    }

    fn bound_handle(&self) -> Result<ProviderHandle, SessionError> {
        match (&self.status, &self.handle) {
            (SessionStatus::Bound, Some(handle)) => Ok(handle.clone()),
            (SessionStatus::Denied, _) => Err(SessionError::AccessDenied),
            _ => Err(SessionError::Unavailable),
        }
    }

    /// Resolves the active network to `(chain id, display name)`.
    ///
    /// A cached name for the current chain short-circuits the provider
    /// query; otherwise the live identifier is fetched, named via the
    /// catalog, and written through the cache. The trade-off is the same as
    /// the cached-label design it replaces: no redundant round-trip per
    /// re-render, at the cost of staleness handled by the change events.
    pub fn resolve_network(&mut self) -> Result<(ChainId, String), SessionError> {
        let handle = self.bound_handle()?;

        if let Some(chain) = &self.chain {
            if let Some(name) = self.cache.get(chain) {
                self.network_name = Some(name.clone());
                return Ok((chain.clone(), name));
            }
        }

        let chain = handle.provider().chain_id()?;
        let name = self
            .cache
            .get(&chain)
            .unwrap_or_else(|| chains::name_for(chain.as_str()).to_string());
        self.cache.put(&chain, &name);

        if self.chain.as_ref() != Some(&chain) {
            // The chain moved since the last resolution; the old balance no
            // longer means anything.
            self.balance = None;
        }
        self.chain = Some(chain.clone());
        self.network_name = Some(name.clone());
        tracing::debug!(chain = %chain, name = %name, "network resolved");
        Ok((chain, name))
    }

    /// Applies a provider-initiated network change.
    ///
    /// Repeated delivery of the same identifier is a no-op. A real change
    /// renames the network, overwrites the cached name, and drops the
    /// balance until it is re-resolved against the new chain.
    pub fn on_network_changed(&mut self, chain: ChainId) {
        if self.chain.as_ref() == Some(&chain) {
            return;
        }

        let name = chains::name_for(chain.as_str()).to_string();
        self.cache.put(&chain, &name);
        tracing::info!(chain = %chain, name = %name, "network changed");
        self.chain = Some(chain);
        self.network_name = Some(name);
        self.balance = None;
    }

    /// Resolves the active account: the first entry of the provider's
    /// authorized account list. An empty list leaves the account unset.
    pub fn resolve_account(&mut self) -> Result<Option<String>, SessionError> {
        let handle = self.bound_handle()?;
        let active = handle.provider().accounts()?.into_iter().next();

        if active != self.account {
            // Balance belongs to the previous account.
            self.balance = None;
        }
        self.account = active.clone();
        Ok(active)
    }

    /// Starts a balance lookup for the current account and chain.
    ///
    /// Returns `Ok(None)` when there is no active account or no resolved
    /// chain to tag the result with. Hosts that interleave provider calls
    /// with event processing use this split form together with
    /// [`Session::apply_balance_resolution`]; [`Session::resolve_balance`]
    /// is the two steps back to back.
    pub fn begin_balance_resolution(&self) -> Result<Option<BalanceResolution>, SessionError> {
        let handle = self.bound_handle()?;
        let Some(account) = self.account.clone() else {
            return Ok(None);
        };
        let Some(chain) = self.chain.clone() else {
            return Ok(None);
        };

        let wei = handle.provider().balance_of(&account)?;
        Ok(Some(BalanceResolution {
            chain,
            account,
            balance: units::format_ether(wei),
        }))
    }

    /// Applies a finished balance lookup, unless its tags no longer match
    /// the session. Stale results are discarded silently, never surfaced as
    /// a user-facing error.
    pub fn apply_balance_resolution(&mut self, resolution: BalanceResolution) -> Option<&str> {
        if self.chain.as_ref() != Some(&resolution.chain)
            || self.account.as_deref() != Some(resolution.account.as_str())
        {
            tracing::debug!(
                computed_for = %resolution.chain,
                current = self.chain.as_ref().map(ChainId::as_str).unwrap_or("-"),
                "discarding stale balance resolution"
            );
            return None;
        }

        self.balance = Some(resolution.balance);
        self.balance.as_deref()
    }

    /// Resolves the balance of the active account in decimal ether units.
    ///
    /// Recomputed from the provider on every call; callers invoke this
    /// after any account or network change, never reuse an old value.
    pub fn resolve_balance(&mut self) -> Result<Option<String>, SessionError> {
        let Some(resolution) = self.begin_balance_resolution()? else {
            self.balance = None;
            return Ok(None);
        };
        Ok(self.apply_balance_resolution(resolution).map(str::to_string))
    }

    /// Drains pending provider events in arrival order.
    ///
    /// Network changes update the reconciled view; a disconnect tears the
    /// binding down and returns the session to `Unbound`.
    pub fn process_events(&mut self) {
        let Some(events) = self.events.take() else {
            return;
        };

        while let Ok(event) = events.try_recv() {
            match event {
                ProviderEvent::NetworkChanged(chain) => self.on_network_changed(chain),
                ProviderEvent::Disconnected => {
                    self.on_disconnected();
                    return;
                }
            }
        }
        self.events = Some(events);
    }

    /// Tears the binding down after a provider disconnect notification.
    ///
    /// The subscription guard is released here, so the provider drops its
    /// reference to this session's sink.
    pub fn on_disconnected(&mut self) {
        tracing::info!("provider disconnected");
        self.subscription = None;
        self.events = None;
        self.handle = None;
        self.account = None;
        self.chain = None;
        self.network_name = None;
        self.balance = None;
        self.status = SessionStatus::Unbound;
    }
}
