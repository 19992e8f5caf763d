//! Wallet-provider error classification

pub mod classifier;

pub use classifier::*;
