//! Aggregator quote service

pub mod client;

pub use client::*;
