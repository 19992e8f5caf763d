//! Swap Widget Engine - demo driver
//!
//! Stands in for the widget's bootstrap layer: wires the session config,
//! network registry, quote client and trade engine together and runs one
//! quote flow end to end against the live aggregator.

use anyhow::Result;
use std::env;
use swap_widget_engine::*;
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let config = Config::load();
    let _logging_guard = utils::setup_logging(config.debug)?;
    utils::setup_output_directories()?;

    info!("🧩 Swap Widget Engine v0.3.0");
    info!("📋 Session:");
    info!("   Aggregator: {}", config.aggregator_base_url);
    info!("   Debug: {}", config.debug);

    let chain_id: u64 = env::var("CHAIN_ID")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(1);
    let user_address = env::var("WALLET_ADDRESS")
        .unwrap_or_else(|_| "0x0000000000000000000000000000000000000001".to_string());
    let amount = env::var("TRADE_AMOUNT").unwrap_or_else(|_| "100".to_string());

    let registry = network::NetworkRegistry::new();
    let network = registry.resolve(chain_id)?;
    info!("🔗 Network: {} (chain id {})", network.name, network.id);

    let client = quote::QuoteClient::new(&config, registry.clone())?;
    let mut engine = engine::TradeEngine::new(
        registry,
        chain_id,
        user_address,
        config.source_tag.clone(),
    );

    engine.select_pair(
        Token::new(
            "USD Coin",
            "USDC",
            "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
            6,
        ),
        Token::new(
            "Dai Stablecoin",
            "DAI",
            "0x6B175474E89094C44Da98b954EedeAC495271d0F",
            18,
        ),
    )?;
    engine.set_amount(&amount);

    match engine.request_quote(&client).await? {
        QuoteOutcome::Applied => {
            let state = engine.state();
            let quote = state.quote.as_ref().expect("quoted state carries a quote");
            info!("✅ Quote received:");
            info!("   Amount out: {} DAI", state.amount_to);
            info!("   Price impact: {}", quote.price_impact);
            info!(
                "   Minimum received: {} DAI",
                engine::minimum_received(quote, engine.slippage())?
            );
            if let Some(tx) = &state.transaction_request {
                info!("   Approve target: {}", tx.target_approve_address);
                info!("   Proxy: {}", tx.proxy_address);
            }
        }
        QuoteOutcome::Failed => {
            if let Some(error) = engine.last_error() {
                warn!("❌ Quote failed: {}", error);
            }
        }
        QuoteOutcome::Stale => {
            // Single sequential flow; a stale result here would be a bug.
            warn!("Quote discarded as stale");
        }
    }

    Ok(())
}
