//! Swap Widget Engine - quote-and-trade orchestration core for an
//! embeddable token-swap widget
//!
//! Given a connected wallet and a chosen token pair, the engine obtains a
//! price quote from a swap-routing aggregator, derives the approval/swap
//! transaction parameters from it, and exposes the result for the host UI
//! to present for wallet signature. Rendering, theming, and transaction
//! broadcast are external collaborators and live outside this crate.

pub mod config;
pub mod types;
pub mod errors;
pub mod network;
pub mod quote;
pub mod engine;
pub mod wallet;
pub mod utils;

// Re-export commonly used items
pub use config::Config;
pub use errors::{SwapError, SwapResult, WalletError};
pub use types::*;
