//! Trade lifecycle types

use crate::types::{Quote, QuoteRequest, Token, TransactionRequest};

/// Where the trade currently stands. Linear happy path
/// `Idle → Quoting → Quoted → Approving → Swapping → Settled`; any
/// working phase can drop to `Failed`, and `reset` returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TradePhase {
    #[default]
    Idle,
    Quoting,
    Quoted,
    Approving,
    Swapping,
    Settled,
    Failed,
}

impl TradePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradePhase::Idle => "idle",
            TradePhase::Quoting => "quoting",
            TradePhase::Quoted => "quoted",
            TradePhase::Approving => "approving",
            TradePhase::Swapping => "swapping",
            TradePhase::Settled => "settled",
            TradePhase::Failed => "failed",
        }
    }
}

/// What became of a completed quote call once handed back to the engine.
/// `Failed` leaves the error attached to the `Failed` phase for display;
/// `Stale` is the discard path for superseded requests - it never touches
/// trade state and is never surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteOutcome {
    Applied,
    Failed,
    Stale,
}

/// The single mutable aggregate of the widget, owned exclusively by the
/// `TradeEngine`. Everything outside the engine sees read-only views.
#[derive(Debug, Clone, Default)]
pub struct TradeState {
    pub token_from: Option<Token>,
    pub token_to: Option<Token>,
    pub amount_from: String,
    pub amount_to: String,
    pub quote_request: Option<QuoteRequest>,
    pub quote: Option<Quote>,
    pub transaction_request: Option<TransactionRequest>,
    pub phase: TradePhase,
}
