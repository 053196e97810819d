//! Tabular export of evaluated scenarios
//!
//! A [`Workbook`] is a list of named sheets with one row per scenario. It can
//! be written as sectioned CSV or as JSON. Non-finite numbers are written as
//! text (`inf`, `-inf`, `NaN`) so they stay visible in the artifact.

use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::algorithms::ErrorReport;
use crate::api::types::{ApiError, ApiResult};
use crate::core::{float_text, Scenario};
use crate::processing::StudyRow;

pub const SHEET_CONFIGURATION: &str = "Configuration";
pub const SHEET_RESULTS: &str = "Results";
pub const SHEET_STUDY: &str = "Parametric Study";

/// A single table cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    fn render(&self) -> String {
        match self {
            Cell::Number(value) => match float_text::label(*value) {
                Some(text) => text.to_string(),
                None => value.to_string(),
            },
            Cell::Text(text) => text.clone(),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<usize> for Cell {
    fn from(value: usize) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::Text(text.to_string())
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Number(value) => float_text::serialize(value, serializer),
            Cell::Text(text) => serializer.serialize_str(text),
        }
    }
}

/// Named table with a header row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: &str, columns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }
}

/// Ordered collection of sheets written as one artifact
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Configuration and Results sheets, one row per scenario
    pub fn from_evaluations(evaluations: &[(Scenario, ErrorReport)]) -> Self {
        let mut configuration = Sheet::new(
            SHEET_CONFIGURATION,
            &[
                "Scenario",
                "Sensor 1 X (m)",
                "Sensor 1 Y (m)",
                "Sensor 2 X (m)",
                "Sensor 2 Y (m)",
                "Target X (m)",
                "Target Y (m)",
                "Bearing Error (deg)",
            ],
        );
        let mut results = Sheet::new(
            SHEET_RESULTS,
            &[
                "Scenario",
                "Baseline Distance (m)",
                "Range to Sensor 1 (m)",
                "Range to Sensor 2 (m)",
                "Intersection Angle (deg)",
                "GDOP",
                "Lateral Error S1 (m)",
                "Lateral Error S2 (m)",
                "Max Position Error (m)",
                "Error/Range Ratio (%)",
            ],
        );

        for (index, (scenario, report)) in evaluations.iter().enumerate() {
            let id = Cell::from(index + 1);
            configuration.push_row(vec![
                id.clone(),
                scenario.sensor1.x.into(),
                scenario.sensor1.y.into(),
                scenario.sensor2.x.into(),
                scenario.sensor2.y.into(),
                scenario.target.x.into(),
                scenario.target.y.into(),
                scenario.bearing_error.degrees().into(),
            ]);
            results.push_row(vec![
                id,
                report.baseline.into(),
                report.range1.into(),
                report.range2.into(),
                report.intersection_angle_deg.into(),
                report.gdop.into(),
                report.lateral_error1.into(),
                report.lateral_error2.into(),
                report.max_position_error.into(),
                report.error_range_ratio_percent().into(),
            ]);
        }

        Self {
            sheets: vec![configuration, results],
        }
    }

    /// Single sheet with the parametric study rows
    pub fn from_study(rows: &[StudyRow]) -> Self {
        let mut sheet = Sheet::new(
            SHEET_STUDY,
            &[
                "Bearing Error (deg)",
                "Target Range (m)",
                "Baseline (m)",
                "Intersection Angle (deg)",
                "GDOP",
                "Max Position Error (m)",
                "Error/Range (%)",
            ],
        );
        for row in rows {
            sheet.push_row(vec![
                row.bearing_error_deg.into(),
                row.target_range_m.into(),
                row.baseline_m.into(),
                row.report.intersection_angle_deg.into(),
                row.report.gdop.into(),
                row.report.max_position_error.into(),
                row.report.error_range_ratio_percent().into(),
            ]);
        }

        Self { sheets: vec![sheet] }
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }
}

/// Persisted artifact format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Pick the format from a file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> ApiResult<Self> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") => Ok(ExportFormat::Csv),
            Some("json") => Ok(ExportFormat::Json),
            Some(other) => Err(ApiError::UnsupportedFormat(other.to_string())),
            None => Err(ApiError::UnsupportedFormat(
                path.as_ref().to_string_lossy().to_string(),
            )),
        }
    }
}

fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Writes workbooks as CSV or JSON
#[derive(Debug, Clone, Copy)]
pub struct TabularExporter {
    pub format: ExportFormat,
}

impl TabularExporter {
    pub fn new(format: ExportFormat) -> Self {
        Self { format }
    }

    pub fn for_path<P: AsRef<Path>>(path: P) -> ApiResult<Self> {
        Ok(Self::new(ExportFormat::from_path(path)?))
    }

    /// Sections start with `# <sheet name>` and are separated by a blank line
    pub fn render_csv(workbook: &Workbook) -> String {
        let mut output = String::new();
        for (index, sheet) in workbook.sheets.iter().enumerate() {
            if index > 0 {
                output.push('\n');
            }
            output.push_str(&format!("# {}\n", sheet.name));

            let header: Vec<String> = sheet.columns.iter().map(|c| escape_csv(c)).collect();
            output.push_str(&format!("{}\n", header.join(",")));

            for row in &sheet.rows {
                let cells: Vec<String> = row.iter().map(|cell| escape_csv(&cell.render())).collect();
                output.push_str(&format!("{}\n", cells.join(",")));
            }
        }
        output
    }

    pub fn render_json(workbook: &Workbook) -> ApiResult<String> {
        Ok(serde_json::to_string_pretty(workbook)?)
    }

    pub fn render(&self, workbook: &Workbook) -> ApiResult<String> {
        match self.format {
            ExportFormat::Csv => Ok(Self::render_csv(workbook)),
            ExportFormat::Json => Self::render_json(workbook),
        }
    }

    pub fn write<P: AsRef<Path>>(&self, workbook: &Workbook, path: P) -> ApiResult<()> {
        let content = self.render(workbook)?;
        fs::write(&path, content)?;

        let rows: usize = workbook.sheets.iter().map(|sheet| sheet.rows.len()).sum();
        info!(
            path = %path.as_ref().display(),
            format = ?self.format,
            sheets = workbook.sheets.len(),
            rows,
            "results exported"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::ParametricStudy;
    use std::path::PathBuf;

    fn evaluations() -> Vec<(Scenario, ErrorReport)> {
        [Scenario::default(), Scenario::symmetric(0.0, 1000.0, 1.0)]
            .into_iter()
            .map(|scenario| (scenario, scenario.evaluate()))
            .collect()
    }

    #[test]
    fn test_two_sections_one_row_per_scenario() {
        let workbook = Workbook::from_evaluations(&evaluations());

        assert_eq!(workbook.sheets.len(), 2);
        let configuration = workbook.sheet(SHEET_CONFIGURATION).unwrap();
        let results = workbook.sheet(SHEET_RESULTS).unwrap();
        assert_eq!(configuration.rows.len(), 2);
        assert_eq!(results.rows.len(), 2);
        assert_eq!(configuration.rows[0][1], Cell::Number(-5000.0));
        assert_eq!(results.rows[0][1], Cell::Number(10000.0));
    }

    #[test]
    fn test_csv_sections_and_infinity() {
        let csv = TabularExporter::render_csv(&Workbook::from_evaluations(&evaluations()));
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "# Configuration");
        assert!(lines[1].starts_with("Scenario,Sensor 1 X (m)"));
        assert_eq!(lines[2], "1,-5000,0,5000,0,0,8000,2");
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "# Results");

        let degenerate_row: Vec<&str> = lines[8].split(',').collect();
        assert_eq!(degenerate_row[0], "2");
        assert_eq!(degenerate_row[5], "inf");
    }

    #[test]
    fn test_json_keeps_infinity_visible() {
        let json = TabularExporter::render_json(&Workbook::from_evaluations(&evaluations())).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let results = &value["sheets"][1];
        assert_eq!(results["name"], SHEET_RESULTS);
        assert_eq!(results["rows"][1][5], "inf");
        assert!(results["rows"][0][5].is_f64());
    }

    #[test]
    fn test_study_sheet() {
        let rows = ParametricStudy::new(10000.0, vec![1.0, 2.0], vec![5000.0, 10000.0]).run();
        let workbook = Workbook::from_study(&rows);
        let sheet = workbook.sheet(SHEET_STUDY).unwrap();

        assert_eq!(sheet.rows.len(), 4);
        assert_eq!(sheet.rows[1][0], Cell::Number(1.0));
        assert_eq!(sheet.rows[1][1], Cell::Number(10000.0));
        assert_eq!(sheet.rows[2][0], Cell::Number(2.0));
    }

    #[test]
    fn test_csv_escaping() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ExportFormat::from_path("out.csv").unwrap(), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path("OUT.JSON").unwrap(), ExportFormat::Json);
        assert!(matches!(
            ExportFormat::from_path("out.xlsx"),
            Err(ApiError::UnsupportedFormat(ext)) if ext == "xlsx"
        ));
        assert!(ExportFormat::from_path("noextension").is_err());
    }

    #[test]
    fn test_write_to_file() {
        let path: PathBuf = std::env::temp_dir().join(format!("rdf_export_{}.csv", std::process::id()));
        let exporter = TabularExporter::for_path(&path).unwrap();
        exporter
            .write(&Workbook::from_evaluations(&evaluations()), &path)
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# Configuration\n"));
        assert!(content.contains("# Results\n"));

        let _ = fs::remove_file(path);
    }
}
