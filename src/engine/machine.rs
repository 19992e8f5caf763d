//! The quote-and-trade state machine
//!
//! Owns the widget's single mutable aggregate (`TradeState`) and drives it
//! through `Idle → Quoting → Quoted → Approving → Swapping → Settled`.
//! Quote completion is split into `begin_quote` / `apply_quote` so a result
//! arriving after the user changed inputs can be recognized as stale and
//! dropped without touching state.

use chrono::Utc;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{debug, info};

use crate::config::{DEFAULT_SLIPPAGE, MAX_SLIPPAGE, QUOTE_DEADLINE_SECS};
use crate::errors::{SwapError, SwapResult};
use crate::network::NetworkRegistry;
use crate::quote::QuoteClient;
use crate::types::{
    Quote, QuoteOutcome, QuoteRequest, Token, TradePhase, TradeState, TransactionRequest,
};

/// Handle for one in-flight quote. `seq` is the staleness stamp: only the
/// most recently issued sequence number may mutate state on completion.
#[derive(Debug, Clone)]
pub struct PendingQuote {
    pub seq: u64,
    pub request: QuoteRequest,
}

pub struct TradeEngine {
    state: TradeState,
    last_error: Option<SwapError>,
    slippage: Decimal,
    chain_id: u64,
    user_address: String,
    source_tag: Option<String>,
    registry: NetworkRegistry,
    issued_seq: u64,
    approved: bool,
}

impl TradeEngine {
    pub fn new(
        registry: NetworkRegistry,
        chain_id: u64,
        user_address: impl Into<String>,
        source_tag: Option<String>,
    ) -> Self {
        Self {
            state: TradeState::default(),
            last_error: None,
            slippage: DEFAULT_SLIPPAGE,
            chain_id,
            user_address: user_address.into(),
            source_tag,
            registry,
            issued_seq: 0,
            approved: false,
        }
    }

    pub fn state(&self) -> &TradeState {
        &self.state
    }

    pub fn phase(&self) -> TradePhase {
        self.state.phase
    }

    /// The error attached to the `Failed` phase, if any.
    pub fn last_error(&self) -> Option<&SwapError> {
        self.last_error.as_ref()
    }

    pub fn slippage(&self) -> Decimal {
        self.slippage
    }

    pub fn set_slippage(&mut self, slippage: Decimal) -> SwapResult<()> {
        if slippage < Decimal::ZERO || slippage >= MAX_SLIPPAGE {
            return Err(SwapError::InvalidSlippage { slippage });
        }
        self.slippage = slippage;
        Ok(())
    }

    /// Selects the trade pair. Allowed from any phase; any in-flight or
    /// completed quote is invalidated and the machine returns to `Idle`.
    pub fn select_pair(&mut self, token_from: Token, token_to: Token) -> SwapResult<()> {
        if token_from.address.eq_ignore_ascii_case(&token_to.address) {
            return Err(SwapError::SamePair);
        }
        self.clear_derived();
        self.state.token_from = Some(token_from);
        self.state.token_to = Some(token_to);
        self.state.phase = TradePhase::Idle;
        Ok(())
    }

    /// Sets the input amount. Allowed from any phase; invalidates any
    /// in-flight or completed quote and returns to `Idle`.
    pub fn set_amount(&mut self, amount: &str) {
        self.clear_derived();
        self.state.amount_from = amount.to_string();
        self.state.phase = TradePhase::Idle;
    }

    /// Issues a new quote request. Validation failures reject
    /// synchronously, before any service call, leaving the phase at `Idle`.
    pub fn begin_quote(&mut self) -> SwapResult<PendingQuote> {
        if self.state.phase != TradePhase::Idle {
            return Err(SwapError::InvalidTransition {
                phase: self.state.phase,
                action: "request_quote",
            });
        }

        let (token_from, token_to) = match (&self.state.token_from, &self.state.token_to) {
            (Some(from), Some(to)) => (from, to),
            _ => return Err(SwapError::SamePair),
        };

        let amount = Decimal::from_str(&self.state.amount_from).map_err(|_| {
            SwapError::InvalidAmount {
                amount: self.state.amount_from.clone(),
            }
        })?;
        if amount <= Decimal::ZERO {
            return Err(SwapError::InvalidAmount {
                amount: self.state.amount_from.clone(),
            });
        }

        let network = self.registry.resolve(self.chain_id)?;

        let request = QuoteRequest {
            from_token_address: token_from.address.clone(),
            from_token_decimals: token_from.decimals,
            to_token_address: token_to.address.clone(),
            to_token_decimals: token_to.decimals,
            from_amount: self.state.amount_from.clone(),
            slippage: self.slippage,
            user_addr: self.user_address.clone(),
            chain_id: self.chain_id,
            rpc: network.rpc.clone(),
            dead_line: Some(Utc::now().timestamp() + QUOTE_DEADLINE_SECS),
            source: self.source_tag.clone(),
        };

        self.issued_seq += 1;
        self.state.quote_request = Some(request.clone());
        self.state.phase = TradePhase::Quoting;
        info!(
            "Quote #{} requested: {} {} -> {}",
            self.issued_seq,
            self.state.amount_from,
            token_from.symbol,
            token_to.symbol
        );

        Ok(PendingQuote {
            seq: self.issued_seq,
            request,
        })
    }

    /// Completion side of a quote call. A result whose sequence number is
    /// not the latest issued, or that arrives after the inputs changed, is
    /// discarded without mutating state.
    pub fn apply_quote(&mut self, seq: u64, result: SwapResult<Quote>) -> QuoteOutcome {
        if seq != self.issued_seq || self.state.phase != TradePhase::Quoting {
            debug!(
                "Discarding stale quote #{} (latest #{}, phase {})",
                seq,
                self.issued_seq,
                self.state.phase.as_str()
            );
            return QuoteOutcome::Stale;
        }

        match result {
            Ok(quote) => {
                self.state.amount_to = quote.result_amount.clone();
                self.state.transaction_request = Some(derive_transaction_request(&quote));
                self.state.quote = Some(quote);
                self.state.phase = TradePhase::Quoted;
                info!("Quote #{} applied: amountTo = {}", seq, self.state.amount_to);
                QuoteOutcome::Applied
            }
            Err(error) => {
                info!("Quote #{} failed: {}", seq, error);
                self.last_error = Some(error);
                self.state.phase = TradePhase::Failed;
                QuoteOutcome::Failed
            }
        }
    }

    /// Convenience composition: issue, call the service, apply. The await
    /// holds `&mut self`, so within one engine nothing can interleave; the
    /// sequence stamp still guards against results applied out of band.
    pub async fn request_quote(&mut self, client: &QuoteClient) -> SwapResult<QuoteOutcome> {
        let pending = self.begin_quote()?;
        let result = client.get_route(&pending.request).await;
        Ok(self.apply_quote(pending.seq, result))
    }

    pub fn begin_approval(&mut self) -> SwapResult<()> {
        self.expect_phase(TradePhase::Quoted, "begin_approval")?;
        self.state.phase = TradePhase::Approving;
        Ok(())
    }

    pub fn approval_confirmed(&mut self) -> SwapResult<()> {
        self.expect_phase(TradePhase::Approving, "approval_confirmed")?;
        self.approved = true;
        Ok(())
    }

    pub fn begin_swap(&mut self) -> SwapResult<()> {
        self.expect_phase(TradePhase::Approving, "begin_swap")?;
        if !self.approved {
            return Err(SwapError::InvalidTransition {
                phase: self.state.phase,
                action: "begin_swap",
            });
        }
        self.state.phase = TradePhase::Swapping;
        Ok(())
    }

    pub fn swap_confirmed(&mut self) -> SwapResult<()> {
        self.expect_phase(TradePhase::Swapping, "swap_confirmed")?;
        self.state.phase = TradePhase::Settled;
        info!("Swap settled: {} received", self.state.amount_to);
        Ok(())
    }

    /// Records a failure reported by the host (wallet layer, broadcast)
    /// from any working phase.
    pub fn mark_failed(&mut self, error: SwapError) {
        self.last_error = Some(error);
        self.state.phase = TradePhase::Failed;
    }

    /// Returns from `Failed` or `Settled` to `Idle`, clearing all derived
    /// fields. Token pair and input amount survive the reset.
    pub fn reset(&mut self) -> SwapResult<()> {
        match self.state.phase {
            TradePhase::Failed | TradePhase::Settled => {
                self.clear_derived();
                self.state.phase = TradePhase::Idle;
                Ok(())
            }
            phase => Err(SwapError::InvalidTransition {
                phase,
                action: "reset",
            }),
        }
    }

    fn expect_phase(&self, expected: TradePhase, action: &'static str) -> SwapResult<()> {
        if self.state.phase != expected {
            return Err(SwapError::InvalidTransition {
                phase: self.state.phase,
                action,
            });
        }
        Ok(())
    }

    fn clear_derived(&mut self) {
        self.state.amount_to = String::new();
        self.state.quote_request = None;
        self.state.quote = None;
        self.state.transaction_request = None;
        self.last_error = None;
        self.approved = false;
    }
}

/// Pure derivation of the on-chain call parameters from a quote. Same
/// quote in, same transaction request out.
pub fn derive_transaction_request(quote: &Quote) -> TransactionRequest {
    TransactionRequest {
        target_approve_address: quote.target_approve_address.clone(),
        proxy_address: quote.to_address.clone(),
        call_data: quote.call_data.clone(),
    }
}

/// Guaranteed-minimum display amount: `resAmount * (1 - slippage)`. The
/// quote amount itself is not slippage-adjusted here - the aggregator
/// already applied slippage inside the embedded call data, so adjusting
/// `amount_to` as well would double-apply it.
pub fn minimum_received(quote: &Quote, slippage: Decimal) -> SwapResult<Decimal> {
    let amount = Decimal::from_str(&quote.result_amount).map_err(|_| SwapError::InvalidAmount {
        amount: quote.result_amount.clone(),
    })?;
    Ok(amount * (Decimal::ONE - slippage))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    const USDC: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
    const DAI: &str = "0x6B175474E89094C44Da98b954EedeAC495271d0F";
    const USER: &str = "0x0000000000000000000000000000000000000001";

    fn usdc() -> Token {
        Token::new("USD Coin", "USDC", USDC, 6)
    }

    fn dai() -> Token {
        Token::new("Dai Stablecoin", "DAI", DAI, 18)
    }

    fn engine_on(chain_id: u64) -> TradeEngine {
        TradeEngine::new(NetworkRegistry::new(), chain_id, USER, None)
    }

    fn ready_engine() -> TradeEngine {
        let mut engine = engine_on(1);
        engine.select_pair(usdc(), dai()).unwrap();
        engine.set_amount("100");
        engine
    }

    fn quote(res_amount: &str) -> Quote {
        Quote {
            status: 200,
            result_amount: res_amount.to_string(),
            result_price_per_to_token: "1.006".to_string(),
            result_price_per_from_token: "0.994".to_string(),
            price_impact: "0.01".to_string(),
            target_approve_address: "0xAAA".to_string(),
            to_address: "0xBBB".to_string(),
            call_data: "0xdeadbeef".to_string(),
        }
    }

    #[tokio::test]
    async fn scenario_quote_success_reaches_quoted() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/getdodoroute")
            .match_query(mockito::Matcher::Any)
            .with_body(
                r#"{"status":200,"data":{"resAmount":"99.4","resPricePerToToken":"1.006","resPricePerFromToken":"0.994","priceImpact":"0.01","targetApproveAddr":"0xAAA","to":"0xBBB","data":"0xdeadbeef"}}"#,
            )
            .create_async()
            .await;
        let config = Config {
            aggregator_base_url: server.url(),
            ..Config::default()
        };
        let client = QuoteClient::new(&config, NetworkRegistry::new()).unwrap();

        let mut engine = ready_engine();
        engine.set_slippage(dec!(0.005)).unwrap();
        let outcome = engine.request_quote(&client).await.unwrap();

        assert_eq!(outcome, QuoteOutcome::Applied);
        assert_eq!(engine.phase(), TradePhase::Quoted);
        assert_eq!(engine.state().amount_to, "99.4");
        assert_eq!(
            engine.state().transaction_request,
            Some(TransactionRequest {
                target_approve_address: "0xAAA".to_string(),
                proxy_address: "0xBBB".to_string(),
                call_data: "0xdeadbeef".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn scenario_aggregator_rejection_reaches_failed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/getdodoroute")
            .match_query(mockito::Matcher::Any)
            .with_body(r#"{"status":400}"#)
            .create_async()
            .await;
        let config = Config {
            aggregator_base_url: server.url(),
            ..Config::default()
        };
        let client = QuoteClient::new(&config, NetworkRegistry::new()).unwrap();

        let mut engine = ready_engine();
        let outcome = engine.request_quote(&client).await.unwrap();

        assert_eq!(outcome, QuoteOutcome::Failed);
        assert_eq!(engine.phase(), TradePhase::Failed);
        assert!(engine.state().transaction_request.is_none());
        assert!(matches!(
            engine.last_error(),
            Some(SwapError::QuoteRejected { status: 400, .. })
        ));
    }

    #[test]
    fn scenario_unregistered_chain_fails_before_issue() {
        let mut engine = engine_on(9999);
        engine.select_pair(usdc(), dai()).unwrap();
        engine.set_amount("100");

        let err = engine.begin_quote().unwrap_err();
        assert!(matches!(err, SwapError::UnknownNetwork { chain_id: 9999 }));
        assert_eq!(engine.phase(), TradePhase::Idle);
        assert!(engine.state().quote_request.is_none());
    }

    #[test]
    fn zero_amount_fails_fast() {
        let mut engine = ready_engine();
        engine.set_amount("0");

        let err = engine.begin_quote().unwrap_err();
        assert!(matches!(err, SwapError::InvalidAmount { .. }));
        assert_eq!(engine.phase(), TradePhase::Idle);
        assert!(engine.state().quote_request.is_none());
    }

    #[test]
    fn identical_pair_is_rejected() {
        let mut engine = engine_on(1);
        let err = engine.select_pair(usdc(), usdc()).unwrap_err();
        assert!(matches!(err, SwapError::SamePair));
    }

    #[test]
    fn superseded_quote_never_overwrites_state() {
        let mut engine = ready_engine();
        let first = engine.begin_quote().unwrap();

        // User edits the amount while the first request is in flight.
        engine.set_amount("250");
        let second = engine.begin_quote().unwrap();

        assert_eq!(
            engine.apply_quote(second.seq, Ok(quote("248.7"))),
            QuoteOutcome::Applied
        );
        let settled_state = engine.state().clone();

        // The first result arrives late and must be dropped whole.
        assert_eq!(
            engine.apply_quote(first.seq, Ok(quote("99.4"))),
            QuoteOutcome::Stale
        );
        assert_eq!(engine.state().amount_to, settled_state.amount_to);
        assert_eq!(
            engine.state().transaction_request,
            settled_state.transaction_request
        );
        assert_eq!(engine.phase(), TradePhase::Quoted);
    }

    #[test]
    fn quote_arriving_after_reset_is_stale() {
        let mut engine = ready_engine();
        let pending = engine.begin_quote().unwrap();
        engine.set_amount("42");

        assert_eq!(
            engine.apply_quote(pending.seq, Ok(quote("99.4"))),
            QuoteOutcome::Stale
        );
        assert_eq!(engine.phase(), TradePhase::Idle);
        assert!(engine.state().quote.is_none());
    }

    #[test]
    fn stale_failure_is_also_discarded() {
        let mut engine = ready_engine();
        let pending = engine.begin_quote().unwrap();
        engine.set_amount("42");

        let late_error = SwapError::QuoteUnavailable {
            message: "timed out".to_string(),
            source: None,
        };
        assert_eq!(
            engine.apply_quote(pending.seq, Err(late_error)),
            QuoteOutcome::Stale
        );
        assert_eq!(engine.phase(), TradePhase::Idle);
        assert!(engine.last_error().is_none());
    }

    #[test]
    fn linear_progression_to_settled() {
        let mut engine = ready_engine();
        let pending = engine.begin_quote().unwrap();
        engine.apply_quote(pending.seq, Ok(quote("99.4")));

        engine.begin_approval().unwrap();
        engine.approval_confirmed().unwrap();
        engine.begin_swap().unwrap();
        engine.swap_confirmed().unwrap();
        assert_eq!(engine.phase(), TradePhase::Settled);
    }

    #[test]
    fn out_of_order_transitions_are_rejected() {
        let mut engine = ready_engine();
        assert!(matches!(
            engine.begin_approval().unwrap_err(),
            SwapError::InvalidTransition { action: "begin_approval", .. }
        ));

        let pending = engine.begin_quote().unwrap();
        // A second quote while one is in flight is not allowed.
        assert!(matches!(
            engine.begin_quote().unwrap_err(),
            SwapError::InvalidTransition { action: "request_quote", .. }
        ));

        engine.apply_quote(pending.seq, Ok(quote("99.4")));
        engine.begin_approval().unwrap();
        // Swapping before the approval confirms is out of order.
        assert!(matches!(
            engine.begin_swap().unwrap_err(),
            SwapError::InvalidTransition { action: "begin_swap", .. }
        ));
    }

    #[test]
    fn reset_clears_derived_fields() {
        let mut engine = ready_engine();
        let pending = engine.begin_quote().unwrap();
        engine.apply_quote(pending.seq, Ok(quote("99.4")));
        engine.mark_failed(SwapError::QuoteUnavailable {
            message: "wallet disconnected".to_string(),
            source: None,
        });

        engine.reset().unwrap();
        assert_eq!(engine.phase(), TradePhase::Idle);
        assert!(engine.state().quote.is_none());
        assert!(engine.state().transaction_request.is_none());
        assert!(engine.last_error().is_none());
        // Inputs survive so the user can retry the same trade.
        assert_eq!(engine.state().amount_from, "100");
        assert!(engine.state().token_from.is_some());
    }

    #[test]
    fn reset_outside_terminal_phases_is_rejected() {
        let mut engine = ready_engine();
        engine.begin_quote().unwrap();
        assert!(matches!(
            engine.reset().unwrap_err(),
            SwapError::InvalidTransition { action: "reset", .. }
        ));
    }

    #[test]
    fn derivation_round_trips_raw_response_fields() {
        let raw: crate::types::RouteResponse = serde_json::from_str(
            r#"{"status":200,"data":{"resAmount":"99.4","resPricePerToToken":"1.006","resPricePerFromToken":"0.994","priceImpact":"0.01","targetApproveAddr":"0xAAA","to":"0xBBB","data":"0xdeadbeef"}}"#,
        )
        .unwrap();
        let data = raw.data.unwrap();
        let (approve, to, call_data) =
            (data.target_approve_addr.clone(), data.to.clone(), data.data.clone());

        let tx = derive_transaction_request(&Quote::from_route(raw.status, data));
        assert_eq!(tx.target_approve_address, approve);
        assert_eq!(tx.proxy_address, to);
        assert_eq!(tx.call_data, call_data);
    }

    #[test]
    fn minimum_received_applies_slippage_once() {
        let min = minimum_received(&quote("99.4"), dec!(0.005)).unwrap();
        assert_eq!(min, dec!(98.903));
    }

    #[test]
    fn slippage_bounds_are_enforced() {
        let mut engine = engine_on(1);
        assert!(engine.set_slippage(dec!(0)).is_ok());
        assert!(engine.set_slippage(dec!(0.999)).is_ok());
        assert!(matches!(
            engine.set_slippage(dec!(1)).unwrap_err(),
            SwapError::InvalidSlippage { .. }
        ));
        assert!(matches!(
            engine.set_slippage(dec!(-0.1)).unwrap_err(),
            SwapError::InvalidSlippage { .. }
        ));
    }

    proptest! {
        #[test]
        fn derivation_is_deterministic(
            approve in "0x[0-9a-f]{40}",
            to in "0x[0-9a-f]{40}",
            call_data in "0x[0-9a-f]{8,64}",
        ) {
            let mut q = quote("99.4");
            q.target_approve_address = approve.clone();
            q.to_address = to.clone();
            q.call_data = call_data.clone();

            let first = derive_transaction_request(&q);
            let second = derive_transaction_request(&q);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.target_approve_address, approve);
            prop_assert_eq!(first.proxy_address, to);
            prop_assert_eq!(first.call_data, call_data);
        }

        #[test]
        fn earlier_request_never_wins(first_amount in 1u32..1_000_000, second_amount in 1u32..1_000_000) {
            let mut engine = ready_engine();
            engine.set_amount(&first_amount.to_string());
            let first = engine.begin_quote().unwrap();

            engine.set_amount(&second_amount.to_string());
            let second = engine.begin_quote().unwrap();

            prop_assert_eq!(engine.apply_quote(second.seq, Ok(quote("7.5"))), QuoteOutcome::Applied);
            prop_assert_eq!(engine.apply_quote(first.seq, Ok(quote("3.1"))), QuoteOutcome::Stale);
            prop_assert_eq!(engine.state().amount_to.as_str(), "7.5");
            prop_assert_eq!(engine.phase(), TradePhase::Quoted);
        }
    }
}
