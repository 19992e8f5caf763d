//! Wallet-provider failure categories
//!
//! Closed set: every way the wallet integration can fail lands in exactly
//! one of these. The classifier in `wallet` matches them exhaustively.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("no ethereum provider detected")]
    NoProvider,

    #[error("connected to an unsupported chain")]
    UnsupportedChain,

    #[error("user rejected the request")]
    UserRejected,

    #[error("unknown wallet error: {detail}")]
    Unknown { detail: String },
}
