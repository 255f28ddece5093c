//! Day schedule (solution) model.
//!
//! A day schedule maps each contiguous 0-based day index to the exams held
//! that day, and keeps the inverse exam → day lookup. Load violations found
//! by validation are recorded separately as [`LoadViolation`] values.

use serde::{Deserialize, Serialize};

use super::{DayIndex, ExamId, StudentId};
use crate::error::{Result, ScheduleError};

/// Assignment of every exam to exactly one day.
///
/// Built once by the [`DayScheduler`](crate::scheduler::DayScheduler) and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScheduleParts")]
pub struct DaySchedule {
    /// Day → exams held that day, in packing order.
    days: Vec<Vec<ExamId>>,
    /// Exam → day.
    exam_day: Vec<DayIndex>,
}

/// Serialized form of [`DaySchedule`]; both directions must agree.
#[derive(Deserialize)]
struct ScheduleParts {
    days: Vec<Vec<ExamId>>,
    exam_day: Vec<DayIndex>,
}

impl TryFrom<ScheduleParts> for DaySchedule {
    type Error = ScheduleError;

    fn try_from(parts: ScheduleParts) -> Result<Self> {
        let schedule = Self::from_days(parts.exam_day.len(), parts.days)?;
        if schedule.exam_day != parts.exam_day {
            return Err(ScheduleError::invalid_input(
                "exam -> day index disagrees with the day lists",
            ));
        }
        Ok(schedule)
    }
}

/// A (student, day) cell whose exam count exceeds the daily limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadViolation {
    /// Affected student.
    pub student: StudentId,
    /// Overloaded day.
    pub day: DayIndex,
    /// Exams the student sits that day.
    pub exam_count: usize,
    /// Those exams, ascending.
    pub exams: Vec<ExamId>,
}

impl DaySchedule {
    /// Wraps day lists and their inverse produced by the day scheduler.
    pub(crate) fn from_parts(days: Vec<Vec<ExamId>>, exam_day: Vec<DayIndex>) -> Self {
        Self { days, exam_day }
    }

    /// Builds a schedule from its day lists, deriving the exam → day index.
    ///
    /// # Errors
    /// `InvalidInput` unless the days mention every exam `0..num_exams`
    /// exactly once.
    pub fn from_days(num_exams: usize, days: Vec<Vec<ExamId>>) -> Result<Self> {
        let mut exam_day: Vec<Option<DayIndex>> = vec![None; num_exams];
        for (day, exams) in days.iter().enumerate() {
            for &e in exams {
                let slot = exam_day.get_mut(e).ok_or_else(|| {
                    ScheduleError::invalid_input(format!(
                        "day {day} holds exam {e}, but only {num_exams} exams exist"
                    ))
                })?;
                if let Some(prev) = slot.replace(day) {
                    return Err(ScheduleError::invalid_input(format!(
                        "exam {e} scheduled on both day {prev} and day {day}"
                    )));
                }
            }
        }
        let exam_day = exam_day
            .into_iter()
            .enumerate()
            .map(|(e, d)| {
                d.ok_or_else(|| ScheduleError::invalid_input(format!("exam {e} has no day")))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { days, exam_day })
    }

    /// Number of days used.
    #[inline]
    pub fn num_days(&self) -> usize {
        self.days.len()
    }

    /// Number of exams scheduled.
    #[inline]
    pub fn num_exams(&self) -> usize {
        self.exam_day.len()
    }

    /// Exams held on `day`. Empty for days past the end.
    pub fn exams_on(&self, day: DayIndex) -> &[ExamId] {
        self.days.get(day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Day assigned to exam `e`.
    pub fn day_of(&self, e: ExamId) -> Option<DayIndex> {
        self.exam_day.get(e).copied()
    }

    /// Day → exams mapping.
    pub fn days(&self) -> &[Vec<ExamId>] {
        &self.days
    }

    /// Exam → day mapping, indexed by exam id.
    pub fn exam_days(&self) -> &[DayIndex] {
        &self.exam_day
    }

    /// Iterates `(day, exams)` in day order.
    pub fn iter(&self) -> impl Iterator<Item = (DayIndex, &[ExamId])> {
        self.days.iter().enumerate().map(|(d, exams)| (d, exams.as_slice()))
    }

    /// Largest number of exams placed on a single day.
    pub fn max_exams_per_day(&self) -> usize {
        self.days.iter().map(Vec::len).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schedule() -> DaySchedule {
        DaySchedule::from_days(5, vec![vec![0, 2], vec![4], vec![1, 3]]).unwrap()
    }

    #[test]
    fn test_lookup() {
        let s = sample_schedule();
        assert_eq!(s.num_days(), 3);
        assert_eq!(s.num_exams(), 5);
        assert_eq!(s.exams_on(1), &[4]);
        assert!(s.exams_on(7).is_empty());
        assert_eq!(s.day_of(3), Some(2));
        assert_eq!(s.day_of(99), None);
        assert_eq!(s.exam_days(), &[0, 2, 0, 2, 1]);
        assert_eq!(s.max_exams_per_day(), 2);
    }

    #[test]
    fn test_iter_order() {
        let s = sample_schedule();
        let days: Vec<DayIndex> = s.iter().map(|(d, _)| d).collect();
        assert_eq!(days, vec![0, 1, 2]);
    }

    #[test]
    fn test_duplicate_exam_rejected() {
        let err = DaySchedule::from_days(2, vec![vec![0, 1], vec![1]]).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_missing_exam_rejected() {
        assert!(DaySchedule::from_days(3, vec![vec![0, 1]]).is_err());
    }

    #[test]
    fn test_unknown_exam_rejected() {
        assert!(DaySchedule::from_days(1, vec![vec![0, 1]]).is_err());
    }

    #[test]
    fn test_json_is_checked() {
        let s = sample_schedule();
        let back: DaySchedule = serde_json::from_str(&serde_json::to_string(&s).unwrap()).unwrap();
        assert_eq!(back, s);

        let stale_index = r#"{"days":[[0],[1]],"exam_day":[1,0]}"#;
        assert!(serde_json::from_str::<DaySchedule>(stale_index).is_err());
        let unknown_exam = r#"{"days":[[0,7]],"exam_day":[0]}"#;
        assert!(serde_json::from_str::<DaySchedule>(unknown_exam).is_err());
    }

    #[test]
    fn test_empty_schedule() {
        let s = DaySchedule::from_days(0, vec![]).unwrap();
        assert_eq!(s.num_days(), 0);
        assert_eq!(s.max_exams_per_day(), 0);
    }
}
