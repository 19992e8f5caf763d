//! Trade orchestration state machine

pub mod machine;

pub use machine::*;
