//! Input checks applied by front ends before a scenario is evaluated

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{BearingErrorBudget, Point2D, Scenario};

/// Rejected front-end input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be a finite number")]
    NonFinite { field: String },

    #[error("bearing error must not be negative, got {value}°")]
    NegativeBearingError { value: f64 },

    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange { field: String, value: f64, min: f64, max: f64 },

    #[error("{field} must contain at least one value")]
    EmptySweep { field: String },
}

/// Checks that a scenario can be handed to the model
pub struct ScenarioValidator;

impl ScenarioValidator {
    pub fn validate(scenario: &Scenario) -> Result<(), ValidationError> {
        Self::check_point("sensor1", scenario.sensor1)?;
        Self::check_point("sensor2", scenario.sensor2)?;
        Self::check_point("target", scenario.target)?;
        Self::check_bearing_error(scenario.bearing_error.degrees())
    }

    pub fn check_bearing_error(degrees: f64) -> Result<(), ValidationError> {
        if !degrees.is_finite() {
            return Err(ValidationError::NonFinite {
                field: "bearing_error_deg".to_string(),
            });
        }
        if degrees < 0.0 {
            return Err(ValidationError::NegativeBearingError { value: degrees });
        }
        Ok(())
    }

    /// Checks the inputs of a parametric sweep
    pub fn validate_sweep(
        baseline_m: f64,
        bearing_errors_deg: &[f64],
        ranges_m: &[f64],
    ) -> Result<(), ValidationError> {
        check_finite("baseline_m", baseline_m)?;
        if bearing_errors_deg.is_empty() {
            return Err(ValidationError::EmptySweep {
                field: "bearing_errors_deg".to_string(),
            });
        }
        if ranges_m.is_empty() {
            return Err(ValidationError::EmptySweep {
                field: "ranges_m".to_string(),
            });
        }
        for &err in bearing_errors_deg {
            Self::check_bearing_error(err)?;
        }
        for &range in ranges_m {
            check_finite("ranges_m", range)?;
        }
        Ok(())
    }

    fn check_point(name: &str, point: Point2D) -> Result<(), ValidationError> {
        check_finite(&format!("{}.x", name), point.x)?;
        check_finite(&format!("{}.y", name), point.y)
    }
}

fn check_finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFinite {
            field: field.to_string(),
        })
    }
}

/// Inclusive bounds for one input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn check(&self, field: &str, value: f64) -> Result<(), ValidationError> {
        check_finite(field, value)?;
        if value < self.min || value > self.max {
            return Err(ValidationError::OutOfRange {
                field: field.to_string(),
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Control limits for interactive front ends. Positions are in kilometers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputLimits {
    pub sensor_km: Bounds,
    pub target_x_km: Bounds,
    pub target_y_km: Bounds,
    pub bearing_error_deg: Bounds,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            sensor_km: Bounds::new(-20.0, 20.0),
            target_x_km: Bounds::new(-20.0, 20.0),
            target_y_km: Bounds::new(0.0, 30.0),
            bearing_error_deg: Bounds::new(0.1, 10.0),
        }
    }
}

/// Raw control values as a front end collects them (kilometers, degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInput {
    pub sensor1_km: (f64, f64),
    pub sensor2_km: (f64, f64),
    pub target_km: (f64, f64),
    pub bearing_error_deg: f64,
}

impl ScenarioInput {
    /// Check against `limits` and build a scenario in meters
    pub fn to_scenario(&self, limits: &InputLimits) -> Result<Scenario, ValidationError> {
        limits.sensor_km.check("sensor1.x_km", self.sensor1_km.0)?;
        limits.sensor_km.check("sensor1.y_km", self.sensor1_km.1)?;
        limits.sensor_km.check("sensor2.x_km", self.sensor2_km.0)?;
        limits.sensor_km.check("sensor2.y_km", self.sensor2_km.1)?;
        limits.target_x_km.check("target.x_km", self.target_km.0)?;
        limits.target_y_km.check("target.y_km", self.target_km.1)?;
        limits.bearing_error_deg.check("bearing_error_deg", self.bearing_error_deg)?;

        let to_m = |(x, y): (f64, f64)| Point2D::new(x * 1000.0, y * 1000.0);
        Ok(Scenario::new(
            to_m(self.sensor1_km),
            to_m(self.sensor2_km),
            to_m(self.target_km),
            BearingErrorBudget::from_degrees(self.bearing_error_deg),
        ))
    }
}
