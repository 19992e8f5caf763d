//! Static table of chains the widget can trade on

use lazy_static::lazy_static;

use crate::errors::{SwapError, SwapResult};
use crate::types::{NativeCurrency, Network, NetworkWalletParams};

/// Native-asset decimals reported to the wallet on add-chain requests.
const NATIVE_DECIMALS: u8 = 18;

lazy_static! {
    static ref NETWORKS: Vec<Network> = vec![
        Network {
            id: 1,
            chain_id_hex: "0x1".to_string(),
            name_net: "mainnet".to_string(),
            name: "Ethereum".to_string(),
            rpc: "https://cloudflare-eth.com".to_string(),
            symbol: "ETH".to_string(),
            explorer: "https://etherscan.io".to_string(),
        },
        Network {
            id: 56,
            chain_id_hex: "0x38".to_string(),
            name_net: "bsc".to_string(),
            name: "BNB Chain".to_string(),
            rpc: "https://bsc-dataseed.binance.org".to_string(),
            symbol: "BNB".to_string(),
            explorer: "https://bscscan.com".to_string(),
        },
        Network {
            id: 137,
            chain_id_hex: "0x89".to_string(),
            name_net: "polygon".to_string(),
            name: "Polygon".to_string(),
            rpc: "https://polygon-rpc.com".to_string(),
            symbol: "MATIC".to_string(),
            explorer: "https://polygonscan.com".to_string(),
        },
        Network {
            id: 42161,
            chain_id_hex: "0xa4b1".to_string(),
            name_net: "arbitrum".to_string(),
            name: "Arbitrum One".to_string(),
            rpc: "https://arb1.arbitrum.io/rpc".to_string(),
            symbol: "ETH".to_string(),
            explorer: "https://arbiscan.io".to_string(),
        },
    ];
}

/// Pure lookup over the static chain table. No mutable state after
/// construction; cheap to clone and share.
#[derive(Debug, Clone, Default)]
pub struct NetworkRegistry;

impl NetworkRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Resolves a numeric chain id to its network definition.
    pub fn resolve(&self, chain_id: u64) -> SwapResult<&'static Network> {
        NETWORKS
            .iter()
            .find(|n| n.id == chain_id)
            .ok_or(SwapError::UnknownNetwork { chain_id })
    }

    /// All supported networks in declaration order, for UI population.
    pub fn list(&self) -> &'static [Network] {
        &NETWORKS
    }

    /// Maps a network onto the wallet provider's add-chain schema:
    /// urls become single-element arrays and the native currency is a
    /// `{name, symbol, decimals}` struct with decimals fixed at 18.
    pub fn wallet_add_params(&self, network: &Network) -> NetworkWalletParams {
        NetworkWalletParams {
            chain_id: network.chain_id_hex.clone(),
            block_explorer_urls: Some(vec![network.explorer.clone()]),
            chain_name: Some(network.name.clone()),
            icon_urls: None,
            native_currency: Some(NativeCurrency {
                name: network.name.clone(),
                symbol: network.symbol.clone(),
                decimals: NATIVE_DECIMALS,
            }),
            rpc_urls: Some(vec![network.rpc.clone()]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_chain() {
        let registry = NetworkRegistry::new();
        let mainnet = registry.resolve(1).unwrap();
        assert_eq!(mainnet.name_net, "mainnet");
        assert_eq!(mainnet.chain_id_hex, "0x1");
    }

    #[test]
    fn unknown_chain_is_rejected() {
        let registry = NetworkRegistry::new();
        let err = registry.resolve(9999).unwrap_err();
        assert!(matches!(err, SwapError::UnknownNetwork { chain_id: 9999 }));
    }

    #[test]
    fn list_is_ordered_and_stable() {
        let registry = NetworkRegistry::new();
        let ids: Vec<u64> = registry.list().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 56, 137, 42161]);
    }

    #[test]
    fn wallet_params_wrap_urls_in_arrays() {
        let registry = NetworkRegistry::new();
        let polygon = registry.resolve(137).unwrap();
        let params = registry.wallet_add_params(polygon);

        assert_eq!(params.chain_id, "0x89");
        assert_eq!(params.rpc_urls, Some(vec![polygon.rpc.clone()]));
        assert_eq!(params.block_explorer_urls, Some(vec![polygon.explorer.clone()]));
        let currency = params.native_currency.unwrap();
        assert_eq!(currency.decimals, 18);
        assert_eq!(currency.symbol, "MATIC");
    }
}
