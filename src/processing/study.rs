//! Parametric study over bearing error and target range.
//!
//! Every grid point is an independent symmetric scenario, so the grid can be
//! evaluated on several threads without coordination. Output order is always
//! bearing error (outer) then range (inner).

use std::num::NonZeroUsize;
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::algorithms::{evaluate, ErrorReport};
use crate::core::{
    Scenario, DEFAULT_STUDY_BASELINE_M, DEFAULT_STUDY_BEARING_ERRORS_DEG, DEFAULT_STUDY_RANGES_M,
};

/// Sweep definition: sensors `baseline_m` apart, target on the bisector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParametricStudy {
    pub baseline_m: f64,
    pub bearing_errors_deg: Vec<f64>,
    pub ranges_m: Vec<f64>,
}

/// One evaluated grid point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StudyRow {
    pub bearing_error_deg: f64,
    pub target_range_m: f64,
    pub baseline_m: f64,
    pub scenario: Scenario,
    pub report: ErrorReport,
}

impl Default for ParametricStudy {
    fn default() -> Self {
        Self {
            baseline_m: DEFAULT_STUDY_BASELINE_M,
            bearing_errors_deg: DEFAULT_STUDY_BEARING_ERRORS_DEG.to_vec(),
            ranges_m: DEFAULT_STUDY_RANGES_M.to_vec(),
        }
    }
}

impl ParametricStudy {
    pub fn new(baseline_m: f64, bearing_errors_deg: Vec<f64>, ranges_m: Vec<f64>) -> Self {
        Self {
            baseline_m,
            bearing_errors_deg,
            ranges_m,
        }
    }

    /// Number of grid points
    pub fn len(&self) -> usize {
        self.bearing_errors_deg.len() * self.ranges_m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grid points in output order
    pub fn grid(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.bearing_errors_deg
            .iter()
            .flat_map(move |&err| self.ranges_m.iter().map(move |&range| (err, range)))
    }

    fn evaluate_point(&self, bearing_error_deg: f64, target_range_m: f64) -> StudyRow {
        let scenario = Scenario::symmetric(self.baseline_m, target_range_m, bearing_error_deg);
        StudyRow {
            bearing_error_deg,
            target_range_m,
            baseline_m: self.baseline_m,
            scenario,
            report: evaluate(&scenario),
        }
    }

    /// Evaluate the whole grid on the calling thread
    pub fn run(&self) -> Vec<StudyRow> {
        info!(
            baseline_m = self.baseline_m,
            scenarios = self.len(),
            "running parametric study"
        );

        let rows: Vec<StudyRow> = self
            .grid()
            .map(|(err, range)| self.evaluate_point(err, range))
            .collect();

        debug!(degenerate = rows.iter().filter(|r| r.report.is_degenerate()).count(), "study complete");
        rows
    }

    /// Evaluate the grid on up to `workers` scoped threads.
    ///
    /// The grid is split into contiguous chunks and the chunk results are
    /// concatenated, so the output is identical to [`run`](Self::run).
    pub fn run_parallel(&self, workers: NonZeroUsize) -> Vec<StudyRow> {
        let points: Vec<(f64, f64)> = self.grid().collect();
        if points.is_empty() || workers.get() == 1 {
            return self.run();
        }

        let chunk_size = points.len().div_ceil(workers.get());
        info!(
            baseline_m = self.baseline_m,
            scenarios = points.len(),
            workers = workers.get(),
            chunk_size,
            "running parametric study in parallel"
        );

        thread::scope(|scope| {
            let handles: Vec<_> = points
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|&(err, range)| self.evaluate_point(err, range))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| match handle.join() {
                    Ok(rows) => rows,
                    // Evaluation is panic-free for finite input; re-raise anything else
                    Err(payload) => std::panic::resume_unwind(payload),
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Point2D;

    #[test]
    fn test_default_grid_size() {
        let study = ParametricStudy::default();
        assert_eq!(study.len(), 25);
        assert_eq!(study.run().len(), 25);
    }

    #[test]
    fn test_iteration_order() {
        let study = ParametricStudy::new(10000.0, vec![1.0, 2.0], vec![5000.0, 10000.0, 20000.0]);
        let order: Vec<(f64, f64)> = study
            .run()
            .iter()
            .map(|row| (row.bearing_error_deg, row.target_range_m))
            .collect();

        assert_eq!(
            order,
            vec![
                (1.0, 5000.0),
                (1.0, 10000.0),
                (1.0, 20000.0),
                (2.0, 5000.0),
                (2.0, 10000.0),
                (2.0, 20000.0),
            ]
        );
    }

    #[test]
    fn test_rows_use_symmetric_scenarios() {
        let study = ParametricStudy::new(8000.0, vec![2.0], vec![12000.0]);
        let row = study.run()[0];

        assert_eq!(row.scenario.sensor1, Point2D::new(-4000.0, 0.0));
        assert_eq!(row.scenario.sensor2, Point2D::new(4000.0, 0.0));
        assert_eq!(row.scenario.target, Point2D::new(0.0, 12000.0));
        assert_eq!(row.baseline_m, 8000.0);
        assert_eq!(row.report, evaluate(&row.scenario));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let study = ParametricStudy::new(
            10000.0,
            vec![0.5, 1.0, 2.0, 3.0, 5.0, 7.5, 10.0],
            vec![1000.0, 5000.0, 10000.0, 15000.0, 20000.0, 30000.0],
        );
        let sequential = study.run();

        for workers in [1, 2, 3, 8, 64] {
            let parallel = study.run_parallel(NonZeroUsize::new(workers).unwrap());
            assert_eq!(parallel, sequential, "workers = {}", workers);
        }
    }

    #[test]
    fn test_degenerate_row_round_trips_through_json() {
        let row = ParametricStudy::new(0.0, vec![1.0], vec![1000.0]).run()[0];
        assert!(row.report.gdop.is_infinite());

        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains(r#""gdop":"inf""#));
        let back: StudyRow = serde_json::from_str(&json).unwrap();
        assert_eq!(back.report.gdop, f64::INFINITY);
        assert_eq!(back.scenario, row.scenario);
        assert_eq!(back.target_range_m, 1000.0);
    }

    #[test]
    fn test_empty_sweep() {
        let study = ParametricStudy::new(10000.0, vec![], vec![1000.0]);
        assert!(study.is_empty());
        assert!(study.run().is_empty());
        assert!(study.run_parallel(NonZeroUsize::new(4).unwrap()).is_empty());
    }

    #[test]
    fn test_error_grows_with_range() {
        let study = ParametricStudy::new(10000.0, vec![2.0], vec![5000.0, 10000.0, 20000.0, 30000.0]);
        let rows = study.run();

        for pair in rows.windows(2) {
            assert!(pair[1].report.max_position_error > pair[0].report.max_position_error);
            assert!(pair[1].report.intersection_angle_deg < pair[0].report.intersection_angle_deg);
        }
    }
}
