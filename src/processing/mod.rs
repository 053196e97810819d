//! Batch evaluation of scenario grids

pub mod study;

pub use study::{ParametricStudy, StudyRow};
