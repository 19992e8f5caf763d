//! Supported-network registry

pub mod registry;

pub use registry::*;
