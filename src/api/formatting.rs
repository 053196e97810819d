//! Report output formatting and serialization
//!
//! Turns a scenario and its error report into an ordered table of labeled,
//! fixed-precision strings, then renders that table as text or JSON.
//! Non-finite values are shown as `∞` rather than clamped.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::algorithms::{assess_geometry, AdvisoryThresholds, ErrorReport, GeometryQuality};
use crate::core::{Point2D, Scenario};
use crate::processing::StudyRow;

pub const LABEL_SENSOR1: &str = "Sensor 1 Position (m)";
pub const LABEL_SENSOR2: &str = "Sensor 2 Position (m)";
pub const LABEL_TARGET: &str = "Target Position (m)";
pub const LABEL_BEARING_ERROR: &str = "Bearing Error (deg)";
pub const LABEL_BASELINE: &str = "Baseline Distance (m)";
pub const LABEL_RANGE1: &str = "Range to Sensor 1 (m)";
pub const LABEL_RANGE2: &str = "Range to Sensor 2 (m)";
pub const LABEL_INTERSECTION: &str = "Intersection Angle (deg)";
pub const LABEL_GDOP: &str = "GDOP";
pub const LABEL_LATERAL1: &str = "Lateral Error S1 (m)";
pub const LABEL_LATERAL2: &str = "Lateral Error S2 (m)";
pub const LABEL_MAX_ERROR: &str = "Max Position Error (m)";
pub const LABEL_RATIO: &str = "Error/Range Ratio (%)";

const BANNER_WIDTH: usize = 60;

/// Fixed-precision rendering that keeps infinities visible
pub fn format_value(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "∞".to_string() } else { "-∞".to_string() }
    } else {
        format!("{:.*}", decimals, value)
    }
}

fn format_point(point: Point2D) -> String {
    format!("({}, {})", format_value(point.x, 1), format_value(point.y, 1))
}

/// Ordered label/value pairs. Serializes as a JSON object in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultsTable {
    entries: Vec<(String, String)>,
}

impl ResultsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.entries.push((label.into(), value.into()));
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == label)
            .map(|(_, value)| value.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ResultsTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, value) in &self.entries {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

/// Display-ready report with advisory warnings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedReport {
    pub results: ResultsTable,
    pub geometry_quality: GeometryQuality,
    /// Advisory messages; empty for good geometry
    pub warnings: Vec<String>,
}

impl FormattedReport {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Builds [`FormattedReport`]s from evaluated scenarios
#[derive(Debug, Clone, Default)]
pub struct ReportFormatter {
    pub thresholds: AdvisoryThresholds,
}

impl ReportFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(thresholds: AdvisoryThresholds) -> Self {
        Self { thresholds }
    }

    /// Results table in presentation order
    pub fn results_table(&self, scenario: &Scenario, report: &ErrorReport) -> ResultsTable {
        let mut table = ResultsTable::new();
        table.push(LABEL_SENSOR1, format_point(scenario.sensor1));
        table.push(LABEL_SENSOR2, format_point(scenario.sensor2));
        table.push(LABEL_TARGET, format_point(scenario.target));
        table.push(LABEL_BEARING_ERROR, format_value(scenario.bearing_error.degrees(), 2));
        table.push(LABEL_BASELINE, format_value(report.baseline, 1));
        table.push(LABEL_RANGE1, format_value(report.range1, 1));
        table.push(LABEL_RANGE2, format_value(report.range2, 1));
        table.push(LABEL_INTERSECTION, format_value(report.intersection_angle_deg, 1));
        table.push(LABEL_GDOP, format_value(report.gdop, 2));
        table.push(LABEL_LATERAL1, format_value(report.lateral_error1, 1));
        table.push(LABEL_LATERAL2, format_value(report.lateral_error2, 1));
        table.push(LABEL_MAX_ERROR, format_value(report.max_position_error, 1));
        table.push(LABEL_RATIO, format_value(report.error_range_ratio_percent(), 2));
        table
    }

    pub fn format(&self, scenario: &Scenario, report: &ErrorReport) -> FormattedReport {
        FormattedReport {
            results: self.results_table(scenario, report),
            geometry_quality: GeometryQuality::from_gdop(report.gdop),
            warnings: assess_geometry(report, &self.thresholds)
                .iter()
                .map(|advisory| advisory.message())
                .collect(),
        }
    }
}

/// Human-readable text formatter
#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    /// Short summary panel instead of the full table
    pub compact: bool,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compact() -> Self {
        Self { compact: true }
    }

    pub fn format_text(&self, formatted: &FormattedReport) -> String {
        if self.compact {
            return self.format_summary(formatted);
        }

        let rule = "=".repeat(BANNER_WIDTH);
        let mut output = String::new();
        output.push_str(&rule);
        output.push('\n');
        output.push_str("RDF POSITION ERROR ANALYSIS RESULTS\n");
        output.push_str(&rule);
        output.push('\n');
        for (label, value) in formatted.results.iter() {
            output.push_str(&format!("{:.<40} {:>15}\n", label, value));
        }
        output.push_str(&rule);
        output.push('\n');

        for warning in &formatted.warnings {
            output.push_str(&format!("\nWARNING: {}\n", warning));
        }
        output
    }

    fn format_summary(&self, formatted: &FormattedReport) -> String {
        let field = |label: &str| formatted.results.get(label).unwrap_or("-").to_string();
        let status = if formatted.has_warnings() {
            formatted.warnings.join(" ")
        } else {
            "Good geometry".to_string()
        };

        format!(
            "Max error: {} m | Angle: {}° | GDOP: {} | Error/Range: {}% | {}",
            field(LABEL_MAX_ERROR),
            field(LABEL_INTERSECTION),
            field(LABEL_GDOP),
            field(LABEL_RATIO),
            status
        )
    }

    /// Fixed-width table of study rows. `limit` caps the rows shown; the
    /// total count always covers every row.
    pub fn format_study(&self, rows: &[StudyRow], limit: Option<usize>) -> String {
        let rule = "=".repeat(BANNER_WIDTH);
        let mut output = format!("{rule}\nPARAMETRIC STUDY RESULTS\n{rule}\n");
        output.push_str(&format!(
            "{:>9} {:>10} {:>8} {:>7} {:>12} {:>9}\n",
            "Err (deg)", "Range (m)", "Angle", "GDOP", "Max Err (m)", "Err/R (%)"
        ));

        let shown = limit.unwrap_or(rows.len()).min(rows.len());
        for row in &rows[..shown] {
            output.push_str(&format!(
                "{:>9} {:>10} {:>8} {:>7} {:>12} {:>9}\n",
                format_value(row.bearing_error_deg, 2),
                format_value(row.target_range_m, 0),
                format_value(row.report.intersection_angle_deg, 1),
                format_value(row.report.gdop, 2),
                format_value(row.report.max_position_error, 1),
                format_value(row.report.error_range_ratio_percent(), 2),
            ));
        }

        output.push_str(&rule);
        output.push_str(&format!("\nTotal scenarios tested: {}\n", rows.len()));
        output
    }
}

/// JSON formatter for structured output
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn format_json(&self, formatted: &FormattedReport) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(formatted)
        } else {
            serde_json::to_string(formatted)
        }
    }
}
