//! Engine and quote-service error taxonomy

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::TradePhase;

#[derive(Error, Debug)]
pub enum SwapError {
    #[error("Invalid amount: {amount:?} is not a positive decimal")]
    InvalidAmount { amount: String },

    #[error("Invalid slippage: {slippage} is outside [0, 1)")]
    InvalidSlippage { slippage: Decimal },

    #[error("Invalid address: {field} = {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("Unknown network: chain id {chain_id} is not in the registry")]
    UnknownNetwork { chain_id: u64 },

    #[error("Quote rejected by aggregator: status {status} - {reason}")]
    QuoteRejected { status: i64, reason: String },

    #[error("Quote service unavailable: {message}")]
    QuoteUnavailable {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    #[error("Token pair incomplete or identical")]
    SamePair,

    #[error("{action} is not allowed while {phase:?}")]
    InvalidTransition {
        phase: TradePhase,
        action: &'static str,
    },
}

pub type SwapResult<T> = Result<T, SwapError>;
