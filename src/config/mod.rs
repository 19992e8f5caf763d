//! Session configuration for the widget engine

pub mod settings;

pub use settings::*;
