use serde::{Deserialize, Serialize};
use std::fmt;

use crate::algorithms::position_error::ErrorReport;
use crate::core::{HIGH_GDOP_THRESHOLD, POOR_GEOMETRY_ANGLE_DEG};

/// Geometry quality bands derived from GDOP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryQuality {
    /// GDOP < 2.0
    Excellent,
    /// GDOP < 5.0
    Good,
    /// GDOP < 10.0
    Acceptable,
    /// Finite GDOP >= 10.0
    Poor,
    /// Parallel bearing lines, no usable fix
    Degenerate,
}

impl GeometryQuality {
    pub fn from_gdop(gdop: f64) -> Self {
        if gdop < 2.0 {
            GeometryQuality::Excellent
        } else if gdop < 5.0 {
            GeometryQuality::Good
        } else if gdop < 10.0 {
            GeometryQuality::Acceptable
        } else if gdop.is_finite() {
            GeometryQuality::Poor
        } else {
            GeometryQuality::Degenerate
        }
    }

    pub fn is_acceptable(&self) -> bool {
        matches!(self, GeometryQuality::Excellent | GeometryQuality::Good | GeometryQuality::Acceptable)
    }
}

impl fmt::Display for GeometryQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GeometryQuality::Excellent => "Excellent",
            GeometryQuality::Good => "Good",
            GeometryQuality::Acceptable => "Acceptable",
            GeometryQuality::Poor => "Poor",
            GeometryQuality::Degenerate => "Degenerate",
        };
        f.write_str(label)
    }
}

/// Thresholds for the advisory warnings attached to a report
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryThresholds {
    /// Intersection angles below this are flagged as poor geometry (degrees)
    pub poor_geometry_angle_deg: f64,
    /// GDOP above this is flagged as high dilution
    pub high_gdop: f64,
}

impl Default for AdvisoryThresholds {
    fn default() -> Self {
        Self {
            poor_geometry_angle_deg: POOR_GEOMETRY_ANGLE_DEG,
            high_gdop: HIGH_GDOP_THRESHOLD,
        }
    }
}

/// Non-fatal geometry warning. Never raised as an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeometryAdvisory {
    PoorGeometry { intersection_angle_deg: f64, threshold_deg: f64 },
    HighDilution { gdop: f64, threshold: f64 },
}

impl GeometryAdvisory {
    pub fn message(&self) -> String {
        match self {
            GeometryAdvisory::PoorGeometry { threshold_deg, .. } => format!(
                "Poor geometry! Intersection angle < {:.0}°. Consider repositioning sensors for better accuracy.",
                threshold_deg
            ),
            GeometryAdvisory::HighDilution { .. } => {
                "High GDOP indicates geometry amplifies errors.".to_string()
            }
        }
    }
}

impl fmt::Display for GeometryAdvisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Collect the advisories that apply to a report. Both may fire at once.
pub fn assess_geometry(report: &ErrorReport, thresholds: &AdvisoryThresholds) -> Vec<GeometryAdvisory> {
    let mut advisories = Vec::new();

    if report.intersection_angle_deg < thresholds.poor_geometry_angle_deg {
        advisories.push(GeometryAdvisory::PoorGeometry {
            intersection_angle_deg: report.intersection_angle_deg,
            threshold_deg: thresholds.poor_geometry_angle_deg,
        });
    }

    // +inf compares greater, so parallel rays are flagged too
    if report.gdop > thresholds.high_gdop {
        advisories.push(GeometryAdvisory::HighDilution {
            gdop: report.gdop,
            threshold: thresholds.high_gdop,
        });
    }

    advisories
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Scenario;

    #[test]
    fn test_quality_bands() {
        assert_eq!(GeometryQuality::from_gdop(1.0), GeometryQuality::Excellent);
        assert_eq!(GeometryQuality::from_gdop(3.0), GeometryQuality::Good);
        assert_eq!(GeometryQuality::from_gdop(7.5), GeometryQuality::Acceptable);
        assert_eq!(GeometryQuality::from_gdop(42.0), GeometryQuality::Poor);
        assert_eq!(GeometryQuality::from_gdop(f64::INFINITY), GeometryQuality::Degenerate);
        assert!(!GeometryQuality::Poor.is_acceptable());
    }

    #[test]
    fn test_good_geometry_has_no_advisories() {
        let report = Scenario::default().evaluate();
        assert!(assess_geometry(&report, &AdvisoryThresholds::default()).is_empty());
    }

    #[test]
    fn test_narrow_geometry_raises_both() {
        // Target far beyond a short baseline: ~0.57° intersection
        let report = Scenario::symmetric(1000.0, 100_000.0, 1.0).evaluate();
        let advisories = assess_geometry(&report, &AdvisoryThresholds::default());

        assert_eq!(advisories.len(), 2);
        assert!(matches!(advisories[0], GeometryAdvisory::PoorGeometry { .. }));
        assert!(matches!(advisories[1], GeometryAdvisory::HighDilution { .. }));
    }

    #[test]
    fn test_poor_angle_without_high_dilution() {
        // 25° intersection: gdop ≈ 2.37
        let report = Scenario::symmetric(10000.0, 5000.0 / 12.5f64.to_radians().tan(), 1.0).evaluate();
        let advisories = assess_geometry(&report, &AdvisoryThresholds::default());

        assert_eq!(advisories.len(), 1);
        assert!(advisories[0].message().starts_with("Poor geometry"));
    }

    #[test]
    fn test_infinite_gdop_is_flagged() {
        let report = Scenario::symmetric(0.0, 1000.0, 1.0).evaluate();
        let advisories = assess_geometry(&report, &AdvisoryThresholds::default());

        assert!(advisories
            .iter()
            .any(|a| matches!(a, GeometryAdvisory::HighDilution { gdop, .. } if gdop.is_infinite())));
    }

    #[test]
    fn test_custom_thresholds() {
        let report = Scenario::default().evaluate();
        let strict = AdvisoryThresholds {
            poor_geometry_angle_deg: 70.0,
            high_gdop: 1.05,
        };
        assert_eq!(assess_geometry(&report, &strict).len(), 2);
    }
}
