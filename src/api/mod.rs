//! Presentation and persistence adapters
//!
//! Formatting of single evaluations for the console and tabular export of
//! evaluations and parametric studies.

pub mod types;
pub mod formatting;
pub mod export;

// Re-export commonly used API types
pub use types::{ApiError, ApiResult, OutputFormat};
pub use formatting::{
    format_value, FormattedReport, JsonFormatter, ReportFormatter, ResultsTable, TextFormatter,
};
pub use export::{Cell, ExportFormat, Sheet, TabularExporter, Workbook};
