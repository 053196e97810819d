//! Model constants and default analysis parameters

use super::types::Point2D;

/// Below this |sin(intersection angle)| the fix is treated as degenerate
pub const DEGENERATE_SINE_THRESHOLD: f64 = 0.1;

/// Multiplier applied to the larger lateral error on the degenerate branch
pub const DEGENERATE_PENALTY_FACTOR: f64 = 10.0;

/// Intersection angles below this (degrees) are reported as poor geometry
pub const POOR_GEOMETRY_ANGLE_DEG: f64 = 30.0;

/// GDOP values above this are reported as high dilution
pub const HIGH_GDOP_THRESHOLD: f64 = 5.0;

pub const DEFAULT_SENSOR1: Point2D = Point2D::new(-5000.0, 0.0);
pub const DEFAULT_SENSOR2: Point2D = Point2D::new(5000.0, 0.0);
pub const DEFAULT_TARGET: Point2D = Point2D::new(0.0, 8000.0);
pub const DEFAULT_BEARING_ERROR_DEG: f64 = 2.0;

// Parametric study defaults
pub const DEFAULT_STUDY_BASELINE_M: f64 = 10_000.0;
pub const DEFAULT_STUDY_BEARING_ERRORS_DEG: [f64; 5] = [0.5, 1.0, 2.0, 3.0, 5.0];
pub const DEFAULT_STUDY_RANGES_M: [f64; 5] = [5_000.0, 10_000.0, 15_000.0, 20_000.0, 30_000.0];
