//! Input validation for front ends

pub mod input;

pub use input::{Bounds, InputLimits, ScenarioInput, ScenarioValidator, ValidationError};
