//! RDF Position Error Model
//!
//! Position-error estimate for a two-sensor, bearing-only radio direction
//! finding fix in a flat 2D plane. Given two sensor positions, a target
//! position and a bearing error budget, the model reports ranges, bearings,
//! intersection angle, per-sensor lateral errors, GDOP and the resulting
//! maximum position error.

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod validation;
pub mod utils;
pub mod api;

// Re-export commonly used types
pub use crate::core::{BearingErrorBudget, Point2D, Scenario};
pub use algorithms::{
    assess_geometry, evaluate, AdvisoryThresholds, ErrorReport, FixBranch, GeometryAdvisory,
    GeometryQuality,
};
pub use processing::{ParametricStudy, StudyRow};
pub use validation::{InputLimits, ScenarioInput, ScenarioValidator, ValidationError};
pub use utils::{AnalysisConfig, ConfigError, ConfigurationManager};
pub use api::{
    ApiError, ApiResult, ExportFormat, FormattedReport, JsonFormatter, OutputFormat,
    ReportFormatter, TabularExporter, TextFormatter, Workbook,
};
