//! Pipeline configuration.
//!
//! All fields have defaults matching the classic two-exams-per-day rule,
//! so a config can be deserialized from a partial document.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// Tunables for [`ExamScheduler`](crate::pipeline::ExamScheduler).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Maximum exams packed into one day bin.
    pub day_capacity: usize,
    /// Maximum exams a student may sit on one day before it counts as a violation.
    pub max_exams_per_day: usize,
    /// Relative convergence threshold passed to the symmetric eigensolver.
    pub eigen_epsilon: f64,
    /// λ₂ at or below this value marks the conflict graph as disconnected.
    pub connectivity_tolerance: f64,
    /// Iteration cap for the eigensolver. `None` scales the cap with the
    /// number of exams; `Some(0)` removes it.
    pub max_iterations: Option<usize>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            day_capacity: 2,
            max_exams_per_day: 2,
            eigen_epsilon: f64::EPSILON,
            connectivity_tolerance: 1e-9,
            max_iterations: None,
        }
    }
}

impl SchedulerConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the day bin capacity.
    pub fn with_day_capacity(mut self, capacity: usize) -> Self {
        self.day_capacity = capacity;
        self
    }

    /// Sets the per-student daily exam limit.
    pub fn with_max_exams_per_day(mut self, max: usize) -> Self {
        self.max_exams_per_day = max;
        self
    }

    /// Sets the eigensolver convergence threshold.
    pub fn with_eigen_epsilon(mut self, epsilon: f64) -> Self {
        self.eigen_epsilon = epsilon;
        self
    }

    /// Sets the λ₂ threshold for disconnected-graph detection.
    pub fn with_connectivity_tolerance(mut self, tolerance: f64) -> Self {
        self.connectivity_tolerance = tolerance;
        self
    }

    /// Sets the eigensolver iteration cap. `0` removes the cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Rejects configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.day_capacity == 0 {
            return Err(ScheduleError::invalid_input("day capacity must be at least 1"));
        }
        if self.max_exams_per_day == 0 {
            return Err(ScheduleError::invalid_input(
                "max exams per day must be at least 1",
            ));
        }
        if !(self.eigen_epsilon.is_finite() && self.eigen_epsilon > 0.0) {
            return Err(ScheduleError::invalid_input(format!(
                "eigen epsilon must be a positive finite number, got {}",
                self.eigen_epsilon
            )));
        }
        if !(self.connectivity_tolerance.is_finite() && self.connectivity_tolerance >= 0.0) {
            return Err(ScheduleError::invalid_input(format!(
                "connectivity tolerance must be a non-negative finite number, got {}",
                self.connectivity_tolerance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = SchedulerConfig::default();
        assert_eq!(c.day_capacity, 2);
        assert_eq!(c.max_exams_per_day, 2);
        assert_eq!(c.max_iterations, None);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let c = SchedulerConfig::new()
            .with_day_capacity(3)
            .with_max_exams_per_day(1)
            .with_eigen_epsilon(1e-12)
            .with_connectivity_tolerance(1e-6)
            .with_max_iterations(500);
        assert_eq!(c.day_capacity, 3);
        assert_eq!(c.max_exams_per_day, 1);
        assert!((c.eigen_epsilon - 1e-12).abs() < 1e-24);
        assert!((c.connectivity_tolerance - 1e-6).abs() < 1e-18);
        assert_eq!(c.max_iterations, Some(500));
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let err = SchedulerConfig::new().with_day_capacity(0).validate().unwrap_err();
        assert!(err.is_invalid_input());
        assert!(SchedulerConfig::new()
            .with_max_exams_per_day(0)
            .validate()
            .is_err());
        assert!(SchedulerConfig::new()
            .with_eigen_epsilon(0.0)
            .validate()
            .is_err());
        assert!(SchedulerConfig::new()
            .with_connectivity_tolerance(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let c: SchedulerConfig = serde_json::from_str(r#"{ "day_capacity": 3 }"#).unwrap();
        assert_eq!(c.day_capacity, 3);
        assert_eq!(c.max_exams_per_day, 2);
        assert_eq!(c.max_iterations, None);

        let c: SchedulerConfig = serde_json::from_str(r#"{ "max_iterations": 0 }"#).unwrap();
        assert_eq!(c.max_iterations, Some(0));
    }
}
