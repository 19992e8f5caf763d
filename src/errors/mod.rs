//! Error types for the widget engine

pub mod swap_error;
pub mod wallet_error;

pub use swap_error::*;
pub use wallet_error::*;
