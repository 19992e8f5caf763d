//! Core data types and structures

pub mod network;
pub mod quote;
pub mod token;
pub mod trade;

pub use network::*;
pub use quote::*;
pub use token::*;
pub use trade::*;
