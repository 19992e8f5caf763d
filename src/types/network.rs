//! Supported network definitions and the wallet add-chain schema

use serde::{Deserialize, Serialize};

/// A supported chain as known to the widget. Static data owned by the
/// `NetworkRegistry`; everything else sees borrows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub id: u64,
    /// Hex-encoded chain id as wallets expect it, e.g. "0x1".
    pub chain_id_hex: String,
    pub name_net: String,
    pub name: String,
    pub rpc: String,
    pub symbol: String,
    pub explorer: String,
}

/// Native currency description inside [`NetworkWalletParams`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// The wallet provider's `wallet_addEthereumChain` parameter schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkWalletParams {
    pub chain_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_explorer_urls: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_urls: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_currency: Option<NativeCurrency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpc_urls: Option<Vec<String>>,
}
