//! Core data types for the direction-finding error model

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use super::constants::{
    DEFAULT_BEARING_ERROR_DEG, DEFAULT_SENSOR1, DEFAULT_SENSOR2, DEFAULT_TARGET,
};

/// Planar position in meters (x east, y north)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    /// Euclidean distance to another point (meters)
    pub fn distance_to(self, other: Point2D) -> f64 {
        (other.to_vector() - self.to_vector()).norm()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<Vector2<f64>> for Point2D {
    fn from(v: Vector2<f64>) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Angular uncertainty of a single bearing measurement, in degrees.
///
/// Applied identically to both sensors. Zero is allowed and yields zero
/// lateral error.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearingErrorBudget(f64);

impl BearingErrorBudget {
    pub const fn from_degrees(degrees: f64) -> Self {
        Self(degrees)
    }

    pub fn degrees(self) -> f64 {
        self.0
    }

    pub fn radians(self) -> f64 {
        self.0.to_radians()
    }
}

impl From<f64> for BearingErrorBudget {
    fn from(degrees: f64) -> Self {
        Self::from_degrees(degrees)
    }
}

/// Complete input to one evaluation of the error model.
///
/// Scenarios are plain values: changing a parameter means building a new
/// scenario (see the `with_*` methods) and evaluating it again.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub sensor1: Point2D,
    pub sensor2: Point2D,
    pub target: Point2D,
    #[serde(rename = "bearing_error_deg")]
    pub bearing_error: BearingErrorBudget,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new(
            DEFAULT_SENSOR1,
            DEFAULT_SENSOR2,
            DEFAULT_TARGET,
            BearingErrorBudget::from_degrees(DEFAULT_BEARING_ERROR_DEG),
        )
    }
}

impl Scenario {
    pub fn new(
        sensor1: Point2D,
        sensor2: Point2D,
        target: Point2D,
        bearing_error: BearingErrorBudget,
    ) -> Self {
        Self {
            sensor1,
            sensor2,
            target,
            bearing_error,
        }
    }

    /// Sensors at (-baseline/2, 0) and (+baseline/2, 0), target on the
    /// perpendicular bisector at (0, range).
    pub fn symmetric(baseline_m: f64, range_m: f64, bearing_error_deg: f64) -> Self {
        let half = baseline_m / 2.0;
        Self::new(
            Point2D::new(-half, 0.0),
            Point2D::new(half, 0.0),
            Point2D::new(0.0, range_m),
            BearingErrorBudget::from_degrees(bearing_error_deg),
        )
    }

    pub fn with_sensor1(self, sensor1: Point2D) -> Self {
        Self { sensor1, ..self }
    }

    pub fn with_sensor2(self, sensor2: Point2D) -> Self {
        Self { sensor2, ..self }
    }

    pub fn with_target(self, target: Point2D) -> Self {
        Self { target, ..self }
    }

    pub fn with_bearing_error(self, bearing_error_deg: f64) -> Self {
        Self {
            bearing_error: BearingErrorBudget::from_degrees(bearing_error_deg),
            ..self
        }
    }
}
