//! Core types and constants for the direction-finding error model

pub mod types;
pub mod constants;
pub mod float_text;

pub use types::*;
pub use constants::*;
