use serde::Serialize;

/// A chain identifier / display name pair recognized by the wallet.
///
/// Identifiers are kept as strings: they arrive straight from the provider
/// and are not guaranteed to be numeric or stable in format.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct KnownNetwork {
    pub chain_id: &'static str,
    pub name: &'static str,
}

/// Display name returned for any identifier outside the catalog.
pub const UNKNOWN_NETWORK: &str = "Unknown Network";

/// All networks the wallet can name. Adding a network is a table edit, not
/// a logic change.
const KNOWN_NETWORKS: &[KnownNetwork] = &[
    KnownNetwork { chain_id: "1", name: "Mainnet" },
    KnownNetwork { chain_id: "3", name: "Ropsten" },
    KnownNetwork { chain_id: "4", name: "Rinkeby" },
    KnownNetwork { chain_id: "5", name: "Goerli" },
    KnownNetwork { chain_id: "42", name: "Kovan" },
    KnownNetwork { chain_id: "56", name: "BSC Mainnet" },
    KnownNetwork { chain_id: "97", name: "BSC Testnet" },
    KnownNetwork { chain_id: "1284", name: "Moonbeam Testnet" },
    KnownNetwork { chain_id: "80001", name: "Mumbai Testnet (Polygon)" },
    KnownNetwork { chain_id: "137", name: "Matic Mainnet (Polygon)" },
    KnownNetwork { chain_id: "1666700000", name: "Fantom Opera Mainnet" },
    KnownNetwork { chain_id: "250", name: "Fantom Testnet" },
];

/// Returns the display name for a chain identifier.
///
/// Total over all inputs: unrecognized identifiers map to
/// [`UNKNOWN_NETWORK`] rather than an error.
pub fn name_for(chain_id: &str) -> &'static str {
    KNOWN_NETWORKS
        .iter()
        .find(|n| n.chain_id == chain_id)
        .map(|n| n.name)
        .unwrap_or(UNKNOWN_NETWORK)
}

/// Whether the identifier is in the catalog.
pub fn is_known(chain_id: &str) -> bool {
    KNOWN_NETWORKS.iter().any(|n| n.chain_id == chain_id)
}

/// All catalog entries, for enumeration by the presentation layer.
pub fn known_networks() -> &'static [KnownNetwork] {
    KNOWN_NETWORKS
}
