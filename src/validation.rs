//! Schedule validation.
//!
//! Two independent checks:
//!
//! - [`ConstraintValidator`] recomputes every student's daily exam load from
//!   the original enrollments and counts the (student, day) cells over the
//!   limit. This is informational: a non-zero count is an expected outcome
//!   of the heuristic, not a failure.
//! - [`validate_schedule`] checks the structural guarantees of the day
//!   packing (each exam exactly once, capacity respected, groups never
//!   mixed, no empty days) and reports every problem found.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::models::{DaySchedule, EnrollmentMatrix, ExamGroup, LoadViolation, Partition};

/// Per-student daily load checker.
///
/// # Example
///
/// ```
/// use u_exam_schedule::models::{DaySchedule, EnrollmentMatrix};
/// use u_exam_schedule::validation::ConstraintValidator;
///
/// // One student takes all three exams, all held on day 0.
/// let enrollment = EnrollmentMatrix::from_rows(vec![vec![true, true, true]]).unwrap();
/// let schedule = DaySchedule::from_days(3, vec![vec![0, 1, 2]]).unwrap();
///
/// assert_eq!(ConstraintValidator::new().count_violations(&enrollment, &schedule), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ConstraintValidator {
    max_exams_per_day: usize,
}

impl ConstraintValidator {
    /// Default daily limit per student.
    pub const DEFAULT_MAX_EXAMS_PER_DAY: usize = 2;

    /// Creates a validator allowing two exams per student per day.
    pub fn new() -> Self {
        Self {
            max_exams_per_day: Self::DEFAULT_MAX_EXAMS_PER_DAY,
        }
    }

    /// Sets the daily limit.
    pub fn with_max_exams_per_day(mut self, max: usize) -> Self {
        self.max_exams_per_day = max;
        self
    }

    /// Daily limit.
    pub fn max_exams_per_day(&self) -> usize {
        self.max_exams_per_day
    }

    /// Student × day exam counts.
    ///
    /// Enrollments in exams the schedule does not place are ignored.
    pub fn load_matrix(
        &self,
        enrollment: &EnrollmentMatrix,
        schedule: &DaySchedule,
    ) -> Vec<Vec<usize>> {
        let mut load = vec![vec![0usize; schedule.num_days()]; enrollment.num_students()];
        for (s, row) in load.iter_mut().enumerate() {
            for e in enrollment.exams_of(s) {
                if let Some(day) = schedule.day_of(e) {
                    row[day] += 1;
                }
            }
        }
        load
    }

    /// Number of (student, day) cells whose load exceeds the limit.
    pub fn count_violations(&self, enrollment: &EnrollmentMatrix, schedule: &DaySchedule) -> usize {
        let count = self
            .load_matrix(enrollment, schedule)
            .iter()
            .flatten()
            .filter(|&&c| c > self.max_exams_per_day)
            .count();
        if count > 0 {
            warn!(
                violations = count,
                limit = self.max_exams_per_day,
                "students over the daily exam limit"
            );
        } else {
            debug!(limit = self.max_exams_per_day, "no daily load violations");
        }
        count
    }

    /// Every over-limit cell, ordered by student then day.
    pub fn report(&self, enrollment: &EnrollmentMatrix, schedule: &DaySchedule) -> Vec<LoadViolation> {
        let mut violations = Vec::new();
        for s in 0..enrollment.num_students() {
            let exams = enrollment.exams_of(s);
            for day in 0..schedule.num_days() {
                let on_day: Vec<_> = exams
                    .iter()
                    .copied()
                    .filter(|&e| schedule.day_of(e) == Some(day))
                    .collect();
                if on_day.len() > self.max_exams_per_day {
                    violations.push(LoadViolation {
                        student: s,
                        day,
                        exam_count: on_day.len(),
                        exams: on_day,
                    });
                }
            }
        }
        violations
    }
}

impl Default for ConstraintValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Structural validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A structural defect in a day schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of structural defects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Schedule and partition disagree on the number of exams.
    ExamCountMismatch,
    /// An exam of the partition is on no day.
    MissingExam,
    /// An exam is on more than one day, or twice on the same day.
    DuplicateExam,
    /// A day holds more exams than the bin capacity.
    CapacityExceeded,
    /// A day holds exams from both groups.
    MixedGroups,
    /// A day index holds no exams.
    EmptyDay,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Checks a day schedule against the partition it was packed from.
///
/// Checks:
/// 1. Same number of exams in schedule and partition
/// 2. Every exam appears on exactly one day
/// 3. No day exceeds `capacity`
/// 4. No day mixes the two groups
/// 5. Day indices are contiguous (no empty day)
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_schedule(
    partition: &Partition,
    schedule: &DaySchedule,
    capacity: usize,
) -> ValidationResult {
    let mut errors = Vec::new();

    if schedule.num_exams() != partition.num_exams() {
        errors.push(ValidationError::new(
            ValidationErrorKind::ExamCountMismatch,
            format!(
                "Schedule places {} exams, partition has {}",
                schedule.num_exams(),
                partition.num_exams()
            ),
        ));
    }

    let mut placed = HashSet::new();
    for (day, exams) in schedule.iter() {
        if exams.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyDay,
                format!("Day {day} holds no exams"),
            ));
        }
        if exams.len() > capacity {
            errors.push(ValidationError::new(
                ValidationErrorKind::CapacityExceeded,
                format!("Day {day} holds {} exams, capacity is {capacity}", exams.len()),
            ));
        }
        for &e in exams {
            if !placed.insert(e) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateExam,
                    format!("Exam {e} is scheduled more than once"),
                ));
            }
        }
        let groups: HashSet<Option<ExamGroup>> =
            exams.iter().map(|&e| partition.group_of(e)).collect();
        if groups.len() > 1 {
            errors.push(ValidationError::new(
                ValidationErrorKind::MixedGroups,
                format!("Day {day} mixes exams from both groups"),
            ));
        }
    }

    for &e in partition.group1().iter().chain(partition.group2()) {
        if !placed.contains(&e) {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingExam,
                format!("Exam {e} is not scheduled"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
