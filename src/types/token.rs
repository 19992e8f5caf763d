//! Token metadata

use serde::{Deserialize, Serialize};

/// An ERC-20 token as presented in the widget's token picker. Identified
/// by (chain id, address); immutable once selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub name: String,
    pub symbol: String,
    pub address: String,
    pub decimals: u8,
}

impl Token {
    pub fn new(name: &str, symbol: &str, address: &str, decimals: u8) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            address: address.to_string(),
            decimals,
        }
    }
}
