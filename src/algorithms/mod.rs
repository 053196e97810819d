//! Error model and geometry assessment

pub mod position_error;
pub mod gdop;

pub use position_error::{evaluate, ErrorReport, FixBranch};
pub use gdop::{assess_geometry, AdvisoryThresholds, GeometryAdvisory, GeometryQuality};
