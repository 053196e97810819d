//! Two-sensor bearing-only position error model.
//!
//! Bearings follow the navigation convention: 0 rad points along +Y (north)
//! and angles increase clockwise toward +X (east), i.e. `atan2(dx, dy)`.

use std::f64::consts::PI;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::core::{Point2D, Scenario, DEGENERATE_PENALTY_FACTOR, DEGENERATE_SINE_THRESHOLD};

/// Formula used to derive the maximum position error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixBranch {
    /// sqrt(l1² + l2²) / sin(intersection)
    Nominal,
    /// max(l1, l2) * 10 for nearly parallel bearing lines
    Degenerate,
}

/// Derived error metrics for one scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Distance from sensor 1 to target (meters)
    pub range1: f64,
    /// Distance from sensor 2 to target (meters)
    pub range2: f64,
    /// Bearing from sensor 1 to target (radians, signed)
    pub bearing1: f64,
    /// Bearing from sensor 2 to target (radians, signed)
    pub bearing2: f64,
    /// Angle between the two bearing rays, 0..=180 degrees
    pub intersection_angle_deg: f64,
    /// Sensor separation (meters)
    pub baseline: f64,
    pub lateral_error1: f64,
    pub lateral_error2: f64,
    /// |sin| of the intersection angle as used for the branch decision
    pub sin_intersection: f64,
    /// 1 / sin(intersection); +inf when the rays are exactly parallel
    #[serde(with = "crate::core::float_text")]
    pub gdop: f64,
    pub max_position_error: f64,
    pub error_range_ratio: f64,
    pub branch: FixBranch,
}

impl ErrorReport {
    pub fn error_range_ratio_percent(&self) -> f64 {
        self.error_range_ratio * 100.0
    }

    pub fn is_degenerate(&self) -> bool {
        self.branch == FixBranch::Degenerate
    }
}

/// Bearing from `from` to `to`. A zero delta returns 0 by convention.
pub fn bearing(from: Point2D, to: Point2D) -> f64 {
    bearing_of(to.to_vector() - from.to_vector())
}

fn bearing_of(delta: Vector2<f64>) -> f64 {
    if delta.x == 0.0 && delta.y == 0.0 {
        return 0.0;
    }
    delta.x.atan2(delta.y)
}

/// Separation of two bearings folded into [0, π]
pub fn intersection_angle(bearing1: f64, bearing2: f64) -> f64 {
    let angle = (bearing1 - bearing2).abs();
    if angle > PI {
        2.0 * PI - angle
    } else {
        angle
    }
}

/// Evaluate the error model for a scenario.
///
/// Never fails for finite input. Only `gdop` can be non-finite (+inf when the
/// bearing rays are exactly parallel, including a zero baseline).
pub fn evaluate(scenario: &Scenario) -> ErrorReport {
    let sensor1 = scenario.sensor1.to_vector();
    let sensor2 = scenario.sensor2.to_vector();
    let target = scenario.target.to_vector();

    let delta1 = target - sensor1;
    let delta2 = target - sensor2;
    let range1 = delta1.norm();
    let range2 = delta2.norm();
    let bearing1 = bearing_of(delta1);
    let bearing2 = bearing_of(delta2);

    let intersection_angle_deg = intersection_angle(bearing1, bearing2).to_degrees();
    let baseline = (sensor2 - sensor1).norm();

    let tan_error = scenario.bearing_error.radians().tan();
    let lateral_error1 = range1 * tan_error;
    let lateral_error2 = range2 * tan_error;

    // The sine is taken from the degree value, not the raw radian difference.
    // This decides the branch near the threshold and must not be shortcut.
    let sin_intersection = intersection_angle_deg.to_radians().sin().abs();

    let gdop = if sin_intersection > 0.0 {
        1.0 / sin_intersection
    } else {
        f64::INFINITY
    };

    let (max_position_error, branch) = if sin_intersection < DEGENERATE_SINE_THRESHOLD {
        (
            lateral_error1.max(lateral_error2) * DEGENERATE_PENALTY_FACTOR,
            FixBranch::Degenerate,
        )
    } else {
        (
            (lateral_error1.powi(2) + lateral_error2.powi(2)).sqrt() / sin_intersection,
            FixBranch::Nominal,
        )
    };

    let max_range = range1.max(range2);
    let error_range_ratio = if max_range > 0.0 {
        max_position_error / max_range
    } else {
        0.0
    };

    ErrorReport {
        range1,
        range2,
        bearing1,
        bearing2,
        intersection_angle_deg,
        baseline,
        lateral_error1,
        lateral_error2,
        sin_intersection,
        gdop,
        max_position_error,
        error_range_ratio,
        branch,
    }
}

impl Scenario {
    /// Shorthand for [`evaluate`]
    pub fn evaluate(&self) -> ErrorReport {
        evaluate(self)
    }
}
