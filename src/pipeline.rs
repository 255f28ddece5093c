//! End-to-end exam scheduling pipeline.
//!
//! # Stages
//!
//! 1. [`ConflictGraphBuilder`]: enrollments → conflict matrix
//! 2. [`LaplacianPartitioner`]: conflict matrix → two exam groups
//! 3. [`DayScheduler`]: groups → day schedule
//! 4. [`ConstraintValidator`]: enrollments + day schedule → violation count
//!
//! Stages run strictly in order; each consumes the previous stage's output
//! by shared reference and returns a new value. There is no retry and no
//! partial result: the first failing stage aborts the run.

use tracing::info;

use crate::config::SchedulerConfig;
use crate::error::Result;
use crate::generator::{EnrollmentBounds, EnrollmentSource};
use crate::models::{ConflictMatrix, DaySchedule, EnrollmentMatrix, Partition};
use crate::scheduler::{DayScheduler, ScheduleKpi};
use crate::spectral::{ConflictGraphBuilder, LaplacianPartitioner};
use crate::validation::ConstraintValidator;

/// Everything one pipeline run produced.
#[derive(Debug, Clone)]
pub struct ScheduleOutcome {
    /// Stage 1 output.
    pub conflicts: ConflictMatrix,
    /// Stage 2 output.
    pub partition: Partition,
    /// Stage 3 output.
    pub schedule: DaySchedule,
    /// Stage 4 output: (student, day) cells over the daily limit.
    pub violations: usize,
    /// Summary metrics.
    pub kpi: ScheduleKpi,
}

impl ScheduleOutcome {
    /// Whether no student exceeds the daily limit.
    pub fn is_violation_free(&self) -> bool {
        self.violations == 0
    }
}

/// Spectral exam scheduler.
///
/// # Example
///
/// ```
/// use u_exam_schedule::models::EnrollmentMatrix;
/// use u_exam_schedule::pipeline::ExamScheduler;
///
/// let enrollment = EnrollmentMatrix::from_student_exams(4, vec![
///     vec![0, 1],
///     vec![0, 1],
///     vec![2, 3],
///     vec![1, 2],
/// ]).unwrap();
///
/// let outcome = ExamScheduler::default().run(&enrollment).unwrap();
/// assert_eq!(outcome.schedule.num_exams(), 4);
/// assert!(outcome.schedule.max_exams_per_day() <= 2);
/// assert_eq!(outcome.violations, 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExamScheduler {
    config: SchedulerConfig,
}

impl ExamScheduler {
    /// Creates a scheduler with the given configuration.
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Runs all four stages on `enrollment`.
    ///
    /// # Errors
    /// - `InvalidInput` for an unusable configuration or an enrollment
    ///   matrix with zero students or zero exams.
    /// - `Numerical` if the eigensolver fails to converge within the
    ///   configured iteration cap.
    pub fn run(&self, enrollment: &EnrollmentMatrix) -> Result<ScheduleOutcome> {
        self.config.validate()?;

        let conflicts = ConflictGraphBuilder::new().build(enrollment)?;

        let mut partitioner = LaplacianPartitioner::new()
            .with_epsilon(self.config.eigen_epsilon)
            .with_connectivity_tolerance(self.config.connectivity_tolerance);
        if let Some(cap) = self.config.max_iterations {
            partitioner = partitioner.with_max_iterations(cap);
        }
        let partition = partitioner.partition(&conflicts)?;

        let schedule = DayScheduler::try_with_capacity(self.config.day_capacity)?
            .schedule(&partition);

        let violations = ConstraintValidator::new()
            .with_max_exams_per_day(self.config.max_exams_per_day)
            .count_violations(enrollment, &schedule);

        let kpi = ScheduleKpi::calculate(
            enrollment,
            &conflicts,
            &partition,
            &schedule,
            self.config.max_exams_per_day,
        )?;

        info!(
            students = enrollment.num_students(),
            exams = enrollment.num_exams(),
            days = schedule.num_days(),
            violations,
            cut_weight = kpi.cut_weight,
            "exam schedule complete"
        );

        Ok(ScheduleOutcome {
            conflicts,
            partition,
            schedule,
            violations,
            kpi,
        })
    }

    /// Draws enrollments from `source`, then runs the pipeline on them.
    ///
    /// Returns the generated matrix alongside the outcome so callers can
    /// re-check or render it.
    pub fn run_with_source<S: EnrollmentSource + ?Sized>(
        &self,
        source: &mut S,
        num_students: usize,
        num_exams: usize,
        bounds: EnrollmentBounds,
    ) -> Result<(EnrollmentMatrix, ScheduleOutcome)> {
        let enrollment = source.generate(num_students, num_exams, bounds)?;
        let outcome = self.run(&enrollment)?;
        Ok((enrollment, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{FixtureEnrollment, RandomEnrollment};
    use crate::validation::validate_schedule;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn brute_force_violations(
        enrollment: &EnrollmentMatrix,
        schedule: &DaySchedule,
        limit: usize,
    ) -> usize {
        let mut count = 0;
        for s in 0..enrollment.num_students() {
            for exams in schedule.days() {
                if exams.iter().filter(|&&e| enrollment.is_enrolled(s, e)).count() > limit {
                    count += 1;
                }
            }
        }
        count
    }

    fn expected_days(p: &Partition) -> usize {
        p.group1().len().div_ceil(2) + p.group2().len().div_ceil(2)
    }

    #[test]
    fn test_no_students_is_invalid_input() {
        let enrollment = EnrollmentMatrix::new(0, 4);
        let err = ExamScheduler::default().run(&enrollment).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_no_exams_is_invalid_input() {
        let enrollment = EnrollmentMatrix::new(3, 0);
        assert!(ExamScheduler::default()
            .run(&enrollment)
            .unwrap_err()
            .is_invalid_input());
    }

    #[test]
    fn test_bad_config_is_invalid_input() {
        let enrollment = EnrollmentMatrix::from_rows(vec![vec![true]]).unwrap();
        let scheduler = ExamScheduler::new(SchedulerConfig::new().with_day_capacity(0));
        assert!(scheduler.run(&enrollment).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_eigensolver_cap_is_numerical_error() {
        let mut rng = SmallRng::seed_from_u64(21);
        let rows = (0..40)
            .map(|_| (0..10).map(|_| rng.random_bool(0.3)).collect())
            .collect();
        let enrollment = EnrollmentMatrix::from_rows(rows).unwrap();

        let capped = ExamScheduler::new(SchedulerConfig::new().with_max_iterations(1));
        let err = capped.run(&enrollment).unwrap_err();
        assert!(err.is_numerical(), "{err}");

        let outcome = ExamScheduler::default().run(&enrollment).unwrap();
        assert!(outcome.partition.covers(10));
    }

    #[test]
    fn test_no_conflicts() {
        // Four students, one exam each: the conflict matrix is all zero.
        let enrollment =
            EnrollmentMatrix::from_student_exams(4, vec![vec![0], vec![1], vec![2], vec![3]])
                .unwrap();
        let outcome = ExamScheduler::default().run(&enrollment).unwrap();

        assert!(outcome.conflicts.is_conflict_free());
        assert!(outcome.partition.covers(4));
        assert_eq!(outcome.schedule.num_days(), expected_days(&outcome.partition));
        assert_eq!(outcome.schedule.num_days(), 2);
        assert_eq!(outcome.violations, 0);
        assert!(validate_schedule(&outcome.partition, &outcome.schedule, 2).is_ok());
    }

    #[test]
    fn test_complete_conflict() {
        // Three students, each in all four exams.
        let enrollment = EnrollmentMatrix::from_rows(vec![vec![true; 4]; 3]).unwrap();
        let outcome = ExamScheduler::default().run(&enrollment).unwrap();

        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(outcome.conflicts.get(i, j), if i == j { 0 } else { 3 });
            }
        }
        let p = &outcome.partition;
        assert!(p.covers(4));
        // A Fiedler vector is orthogonal to the all-ones vector, so it has
        // components of both signs.
        assert!(!p.group1().is_empty());
        assert!(!p.group2().is_empty());
        assert_eq!(outcome.schedule.num_days(), expected_days(p));
        assert!((2..=3).contains(&outcome.schedule.num_days()));
        assert_eq!(
            outcome.violations,
            brute_force_violations(&enrollment, &outcome.schedule, 2)
        );
    }

    #[test]
    fn test_single_exam() {
        let enrollment = EnrollmentMatrix::from_rows(vec![vec![true]; 5]).unwrap();
        let outcome = ExamScheduler::default().run(&enrollment).unwrap();

        assert_eq!(outcome.partition.group1(), &[0]);
        assert!(outcome.partition.group2().is_empty());
        assert_eq!(outcome.schedule.num_days(), 1);
        assert_eq!(outcome.violations, 0);
        assert!(outcome.is_violation_free());
    }

    #[test]
    fn test_random_runs_hold_invariants() {
        let scheduler = ExamScheduler::default();
        let mut source = RandomEnrollment::seeded(2024);
        for _ in 0..10 {
            let (enrollment, outcome) = scheduler
                .run_with_source(&mut source, 50, 10, EnrollmentBounds::default())
                .unwrap();

            assert!(outcome.conflicts.is_symmetric());
            assert!(outcome.partition.covers(10));
            assert!(outcome.schedule.max_exams_per_day() <= 2);
            assert_eq!(
                outcome.schedule.num_days(),
                expected_days(&outcome.partition)
            );
            assert!(validate_schedule(&outcome.partition, &outcome.schedule, 2).is_ok());
            assert_eq!(
                outcome.violations,
                brute_force_violations(&enrollment, &outcome.schedule, 2)
            );
            assert_eq!(outcome.kpi.violation_count, outcome.violations);
        }
    }

    #[test]
    fn test_tighter_limit_counts_violations() {
        // Capacity 3 with limit 1: a student in all three same-day exams violates.
        let enrollment = EnrollmentMatrix::from_rows(vec![vec![true; 3]]).unwrap();
        let config = SchedulerConfig::new()
            .with_day_capacity(3)
            .with_max_exams_per_day(1);
        let outcome = ExamScheduler::new(config).run(&enrollment).unwrap();
        assert_eq!(
            outcome.violations,
            brute_force_violations(&enrollment, &outcome.schedule, 1)
        );
        assert!(outcome.violations >= 1);
    }

    #[test]
    fn test_fixture_source() {
        let matrix =
            EnrollmentMatrix::from_student_exams(3, vec![vec![0, 1], vec![1, 2]]).unwrap();
        let mut source = FixtureEnrollment::new(matrix.clone());
        let (enrollment, outcome) = ExamScheduler::default()
            .run_with_source(&mut source, 2, 3, EnrollmentBounds::default())
            .unwrap();
        assert_eq!(enrollment, matrix);
        assert!(outcome.partition.covers(3));
    }

    #[test]
    fn test_deterministic_for_same_input() {
        let enrollment = RandomEnrollment::seeded(5)
            .generate(40, 8, EnrollmentBounds::default())
            .unwrap();
        let a = ExamScheduler::default().run(&enrollment).unwrap();
        let b = ExamScheduler::default().run(&enrollment).unwrap();
        assert_eq!(a.schedule, b.schedule);
        assert_eq!(a.violations, b.violations);
    }
}
