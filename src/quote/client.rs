//! HTTP client for the swap-routing aggregator's quote endpoint

use alloy::primitives::Address;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::{AGGREGATOR_SUCCESS_STATUS, Config, MAX_SLIPPAGE, QUOTE_DEADLINE_SECS};
use crate::errors::{SwapError, SwapResult};
use crate::network::NetworkRegistry;
use crate::types::{Quote, QuoteRequest, RouteResponse};

const ROUTE_PATH: &str = "/getdodoroute";
const HTTP_TIMEOUT_SECS: u64 = 10;

/// Issues one aggregator call per `get_route` invocation. Stateless apart
/// from the connection pool; retry policy belongs to the caller.
pub struct QuoteClient {
    http: reqwest::Client,
    base_url: String,
    registry: NetworkRegistry,
    debug: bool,
}

impl QuoteClient {
    pub fn new(config: &Config, registry: NetworkRegistry) -> SwapResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| SwapError::QuoteUnavailable {
                message: "Failed to build HTTP client".to_string(),
                source: Some(e.into()),
            })?;

        Ok(Self {
            http,
            base_url: config.aggregator_base_url.trim_end_matches('/').to_string(),
            registry,
            debug: config.debug,
        })
    }

    /// Fetches and normalizes one route quote. All validation happens
    /// before any outbound call; transport failures map to
    /// `QuoteUnavailable`, aggregator rejections to `QuoteRejected`.
    pub async fn get_route(&self, req: &QuoteRequest) -> SwapResult<Quote> {
        validate_request(req, &self.registry)?;

        let mut req = req.clone();
        if req.dead_line.is_none() {
            req.dead_line = Some(chrono::Utc::now().timestamp() + QUOTE_DEADLINE_SECS);
        }

        if self.debug {
            debug!("Requesting route: {:?}", req);
        }

        let url = format!("{}{}", self.base_url, ROUTE_PATH);
        let response = self
            .http
            .get(&url)
            .query(&req)
            .send()
            .await
            .map_err(|e| SwapError::QuoteUnavailable {
                message: "Quote request failed".to_string(),
                source: Some(e.into()),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Aggregator returned HTTP {}: {}", status, body);
            return Err(SwapError::QuoteUnavailable {
                message: format!("Aggregator returned HTTP {status}"),
                source: None,
            });
        }

        let route: RouteResponse =
            response
                .json()
                .await
                .map_err(|e| SwapError::QuoteUnavailable {
                    message: "Failed to parse aggregator response".to_string(),
                    source: Some(e.into()),
                })?;

        if route.status != AGGREGATOR_SUCCESS_STATUS {
            let reason = route
                .msg
                .unwrap_or_else(|| format!("aggregator status {}", route.status));
            return Err(SwapError::QuoteRejected {
                status: route.status,
                reason,
            });
        }

        let data = route.data.ok_or_else(|| SwapError::QuoteUnavailable {
            message: "Aggregator success response missing route data".to_string(),
            source: None,
        })?;

        if self.debug {
            debug!(
                "Route received: resAmount={} priceImpact={}",
                data.res_amount, data.price_impact
            );
        }

        Ok(Quote::from_route(route.status, data))
    }
}

fn validate_request(req: &QuoteRequest, registry: &NetworkRegistry) -> SwapResult<()> {
    let amount = Decimal::from_str(&req.from_amount).map_err(|_| SwapError::InvalidAmount {
        amount: req.from_amount.clone(),
    })?;
    if amount <= Decimal::ZERO {
        return Err(SwapError::InvalidAmount {
            amount: req.from_amount.clone(),
        });
    }

    if req.slippage < Decimal::ZERO || req.slippage >= MAX_SLIPPAGE {
        return Err(SwapError::InvalidSlippage {
            slippage: req.slippage,
        });
    }

    for (field, value) in [
        ("fromTokenAddress", &req.from_token_address),
        ("toTokenAddress", &req.to_token_address),
        ("userAddr", &req.user_addr),
    ] {
        Address::from_str(value).map_err(|_| SwapError::InvalidAddress {
            field,
            value: value.clone(),
        })?;
    }

    registry.resolve(req.chain_id)?;
    Ok(())
}
