//! Maps wallet-provider failures onto user-facing copy
//!
//! Total over the closed `WalletError` set and pure with respect to trade
//! state: classification never touches the engine.

use tracing::error;

use crate::errors::WalletError;

pub const MSG_NO_PROVIDER: &str = "No Ethereum browser extension detected, install MetaMask on desktop or visit from a dApp browser on mobile.";
pub const MSG_UNSUPPORTED_CHAIN: &str = "You're connected to an unsupported network.";
pub const MSG_USER_REJECTED: &str =
    "Please authorize this website to access your Ethereum account.";
pub const MSG_UNKNOWN: &str = "An unknown error occurred. Check the console for more details.";

/// Fixed display string for a wallet failure. Unknown errors are logged
/// and collapsed into the generic fallback.
pub fn classify(error: &WalletError) -> &'static str {
    match error {
        WalletError::NoProvider => MSG_NO_PROVIDER,
        WalletError::UnsupportedChain => MSG_UNSUPPORTED_CHAIN,
        WalletError::UserRejected => MSG_USER_REJECTED,
        WalletError::Unknown { detail } => {
            error!("Unclassified wallet error: {}", detail);
            MSG_UNKNOWN
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_a_fixed_message() {
        assert_eq!(classify(&WalletError::NoProvider), MSG_NO_PROVIDER);
        assert_eq!(
            classify(&WalletError::UnsupportedChain),
            MSG_UNSUPPORTED_CHAIN
        );
        assert_eq!(classify(&WalletError::UserRejected), MSG_USER_REJECTED);
        assert_eq!(
            classify(&WalletError::Unknown {
                detail: "eth_requestAccounts exploded".to_string()
            }),
            MSG_UNKNOWN
        );
    }

    #[test]
    fn classification_ignores_trade_phase() {
        use crate::engine::TradeEngine;
        use crate::errors::SwapError;
        use crate::network::NetworkRegistry;
        use crate::types::TradePhase;

        let mut engine = TradeEngine::new(
            NetworkRegistry::new(),
            1,
            "0x0000000000000000000000000000000000000001",
            None,
        );
        engine.mark_failed(SwapError::QuoteUnavailable {
            message: "offline".to_string(),
            source: None,
        });

        assert_eq!(classify(&WalletError::NoProvider), MSG_NO_PROVIDER);
        assert_eq!(engine.phase(), TradePhase::Failed);
    }

    #[test]
    fn classification_is_stable_across_calls() {
        // The host UI compares these strings; they must never vary.
        assert_eq!(
            classify(&WalletError::NoProvider),
            classify(&WalletError::NoProvider)
        );
    }
}
