//! Core types and constants for position fixing and frame conversion

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
