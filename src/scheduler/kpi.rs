//! Exam timetable quality metrics (KPIs).
//!
//! Computes summary indicators from a finished day schedule, the partition
//! it was packed from, and the original enrollments.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Days | Number of day bins used |
//! | Max Daily Load | Most exams any student sits on one day |
//! | Violations | (student, day) cells over the daily limit |
//! | Students Affected | Students with at least one violating day |
//! | Same-Day Conflict | Shared students between exam pairs on the same day |
//! | Cut Weight | Conflict weight crossing the bisection |
//! | Avg Exams/Day | Exams divided by days |

use std::collections::HashSet;

use crate::error::{Result, ScheduleError};
use crate::models::{ConflictMatrix, DaySchedule, EnrollmentMatrix, Partition};
use crate::validation::ConstraintValidator;

/// Exam timetable performance indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleKpi {
    /// Days used.
    pub num_days: usize,
    /// Largest number of exams any student sits on a single day.
    pub max_daily_load: usize,
    /// (student, day) cells over the daily limit.
    pub violation_count: usize,
    /// Distinct students with at least one over-limit day.
    pub students_affected: usize,
    /// Sum of conflict weight over exam pairs sharing a day.
    pub same_day_conflict_weight: u64,
    /// Conflict weight between the two partition groups.
    pub cut_weight: u64,
    /// Mean exams per day (0.0 for an empty schedule).
    pub avg_exams_per_day: f64,
}

impl ScheduleKpi {
    /// Computes KPIs for a finished schedule.
    ///
    /// # Arguments
    /// * `enrollment` - Original enrollments (for per-student loads).
    /// * `conflicts` - Conflict graph built from `enrollment`.
    /// * `partition` - Bisection the schedule was packed from.
    /// * `schedule` - The day schedule.
    /// * `max_exams_per_day` - Daily limit per student.
    ///
    /// # Errors
    /// `InvalidInput` if `conflicts` covers fewer exams than the schedule
    /// or the partition.
    pub fn calculate(
        enrollment: &EnrollmentMatrix,
        conflicts: &ConflictMatrix,
        partition: &Partition,
        schedule: &DaySchedule,
        max_exams_per_day: usize,
    ) -> Result<Self> {
        if conflicts.size() < schedule.num_exams() {
            return Err(ScheduleError::invalid_input(format!(
                "conflict matrix covers {} exams, schedule has {}",
                conflicts.size(),
                schedule.num_exams()
            )));
        }
        let cut_weight = partition.cut_weight(conflicts)?;
        let validator = ConstraintValidator::new().with_max_exams_per_day(max_exams_per_day);
        let load = validator.load_matrix(enrollment, schedule);

        let max_daily_load = load.iter().flatten().copied().max().unwrap_or(0);
        let mut violation_count = 0;
        let mut affected = HashSet::new();
        for (s, row) in load.iter().enumerate() {
            for &count in row {
                if count > max_exams_per_day {
                    violation_count += 1;
                    affected.insert(s);
                }
            }
        }

        let same_day_conflict_weight = schedule
            .days()
            .iter()
            .map(|exams| {
                exams
                    .iter()
                    .enumerate()
                    .flat_map(|(k, &i)| exams[k + 1..].iter().map(move |&j| (i, j)))
                    .map(|(i, j)| u64::from(conflicts.get(i, j)))
                    .sum::<u64>()
            })
            .sum();

        let avg_exams_per_day = if schedule.num_days() == 0 {
            0.0
        } else {
            schedule.num_exams() as f64 / schedule.num_days() as f64
        };

        Ok(Self {
            num_days: schedule.num_days(),
            max_daily_load,
            violation_count,
            students_affected: affected.len(),
            same_day_conflict_weight,
            cut_weight,
            avg_exams_per_day,
        })
    }

    /// Whether the schedule meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_violations: usize, max_days: usize) -> bool {
        self.violation_count <= max_violations && self.num_days <= max_days
    }
}
