use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::SessionError;
use crate::provider::ProviderHandle;

/// A user-supplied definition of an EVM network.
///
/// The chain identifier is carried as the decimal string the user typed;
/// it is only re-encoded when a provider payload is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    pub name: String,
    pub rpc_url: String,
    pub chain_id: String,
    pub currency_symbol: String,
    pub block_explorer_url: String,
}

impl NetworkDescriptor {
    /// Rejects descriptors with any empty (or whitespace-only) field before
    /// they reach the registry or the provider.
    pub fn validate(&self) -> Result<(), SessionError> {
        let fields = [
            ("name", &self.name),
            ("rpc_url", &self.rpc_url),
            ("chain_id", &self.chain_id),
            ("currency_symbol", &self.currency_symbol),
            ("block_explorer_url", &self.block_explorer_url),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(SessionError::InvalidNetwork(format!(
                    "missing field: {field}"
                )));
            }
        }
        Ok(())
    }

    /// Builds the provider-native registration payload
    /// (`wallet_addEthereumChain` shape, chain id 0x-hex encoded).
    fn registration_payload(&self) -> Result<serde_json::Value, SessionError> {
        let id: u64 = self.chain_id.trim().parse().map_err(|_| {
            SessionError::InvalidNetwork(format!(
                "chain id is not a decimal integer: {}",
                self.chain_id
            ))
        })?;

        Ok(json!({
            "chainId": format!("0x{id:x}"),
            "chainName": self.name,
            "nativeCurrency": {
                "name": "ETH",
                "symbol": self.currency_symbol,
                "decimals": 18,
            },
            "rpcUrls": [self.rpc_url],
            "blockExplorerUrls": [self.block_explorer_url],
        }))
    }
}

/// Insertion-ordered list of user-defined networks.
///
/// Records what the user entered: duplicate chain identifiers are allowed,
/// no deduplication happens here.
#[derive(Debug, Default)]
pub struct NetworkRegistry {
    networks: Vec<NetworkDescriptor>,
}

impl NetworkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and appends a descriptor.
    pub fn add(&mut self, descriptor: NetworkDescriptor) -> Result<(), SessionError> {
        descriptor.validate()?;
        tracing::debug!(
            name = %descriptor.name,
            chain_id = %descriptor.chain_id,
            "network added to registry"
        );
        self.networks.push(descriptor);
        Ok(())
    }

    pub fn networks(&self) -> &[NetworkDescriptor] {
        &self.networks
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

/// Asks the provider to register `descriptor`, suspending until the user
/// confirms or declines.
///
/// Deliberately independent of [`NetworkRegistry::add`]: a provider refusal
/// leaves any in-memory entry in place, and adding locally does not imply a
/// provider request.
pub fn register_with_provider(
    handle: &ProviderHandle,
    descriptor: &NetworkDescriptor,
) -> Result<(), SessionError> {
    descriptor.validate()?;
    let payload = descriptor.registration_payload()?;
    handle.provider().add_chain(&payload)?;
    tracing::info!(name = %descriptor.name, chain_id = %descriptor.chain_id, "network registered with provider");
    Ok(())
}
