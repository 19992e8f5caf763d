//! Session settings and environment variable handling
//!
//! The host page supplies these once at bootstrap; after `load()` the
//! config is read-only for the process lifetime and handed by reference
//! to every component that needs it.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::env;

// Quote request constants
pub const QUOTE_DEADLINE_SECS: i64 = 600; // 10 minutes, advisory only
pub const AGGREGATOR_SUCCESS_STATUS: i64 = 200;

// Slippage bounds (fraction of 1)
pub const DEFAULT_SLIPPAGE: Decimal = dec!(0.005);
pub const MAX_SLIPPAGE: Decimal = dec!(1);

pub const DEFAULT_AGGREGATOR_BASE_URL: &str = "https://dodo-route.dodoex.io/dodoapi";

#[derive(Debug, Clone)]
pub struct Config {
    pub debug: bool,
    pub aggregator_base_url: String,
    pub price_base_url: String,
    pub target_element_id: String,
    /// Optional fee-attribution tag forwarded on every quote request.
    pub source_tag: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        Self {
            debug: env::var("WIDGET_DEBUG")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            aggregator_base_url: env::var("AGGREGATOR_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_AGGREGATOR_BASE_URL.to_string()),
            price_base_url: env::var("PRICE_BASE_URL").unwrap_or_default(),
            target_element_id: env::var("TARGET_ELEMENT_ID").unwrap_or_default(),
            source_tag: env::var("SOURCE_TAG").ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            aggregator_base_url: DEFAULT_AGGREGATOR_BASE_URL.to_string(),
            price_base_url: String::new(),
            target_element_id: String::new(),
            source_tag: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_public_aggregator() {
        let config = Config::default();
        assert!(!config.debug);
        assert_eq!(config.aggregator_base_url, DEFAULT_AGGREGATOR_BASE_URL);
        assert!(config.source_tag.is_none());
    }
}
