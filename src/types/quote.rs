//! Quote request/response types and the aggregator wire schema

use serde::{Deserialize, Serialize};
use rust_decimal::Decimal;

/// One quote attempt, serialized onto the aggregator's exact query-parameter
/// names. Constructed fresh per attempt and never mutated after issue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteRequest {
    #[serde(rename = "fromTokenAddress")]
    pub from_token_address: String,
    #[serde(rename = "fromTokenDecimals")]
    pub from_token_decimals: u8,
    #[serde(rename = "toTokenAddress")]
    pub to_token_address: String,
    #[serde(rename = "toTokenDecimals")]
    pub to_token_decimals: u8,
    #[serde(rename = "fromAmount")]
    pub from_amount: String,
    pub slippage: Decimal,
    #[serde(rename = "userAddr")]
    pub user_addr: String,
    #[serde(rename = "chainId")]
    pub chain_id: u64,
    pub rpc: String,
    #[serde(rename = "deadLine", skip_serializing_if = "Option::is_none")]
    pub dead_line: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Raw aggregator response envelope. `data` is absent on rejections, where
/// some deployments put a human-readable reason in `msg` instead.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteResponse {
    pub status: i64,
    pub data: Option<RouteData>,
    pub msg: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteData {
    #[serde(rename = "resAmount")]
    pub res_amount: String,
    #[serde(rename = "resPricePerToToken")]
    pub res_price_per_to_token: String,
    #[serde(rename = "resPricePerFromToken")]
    pub res_price_per_from_token: String,
    #[serde(rename = "priceImpact")]
    pub price_impact: String,
    #[serde(rename = "targetApproveAddr")]
    pub target_approve_addr: String,
    pub to: String,
    pub data: String,
}

/// Normalized result of one successful `QuoteRequest`. Immutable; the
/// engine ties it back to the request that produced it via the request
/// sequence number it stamped at issue time.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub status: i64,
    pub result_amount: String,
    pub result_price_per_to_token: String,
    pub result_price_per_from_token: String,
    pub price_impact: String,
    pub target_approve_address: String,
    pub to_address: String,
    pub call_data: String,
}

impl Quote {
    pub fn from_route(status: i64, data: RouteData) -> Self {
        Self {
            status,
            result_amount: data.res_amount,
            result_price_per_to_token: data.res_price_per_to_token,
            result_price_per_from_token: data.res_price_per_from_token,
            price_impact: data.price_impact,
            target_approve_address: data.target_approve_addr,
            to_address: data.to,
            call_data: data.data,
        }
    }
}

/// On-chain call parameters for the approval + swap pair, derived
/// deterministically from a `Quote` and never constructed independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRequest {
    pub target_approve_address: String,
    pub proxy_address: String,
    pub call_data: String,
}
