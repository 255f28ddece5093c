//! Student × exam enrollment matrix.
//!
//! The pipeline treats an enrollment matrix as read-only input. It may be
//! filled through [`EnrollmentMatrix::enroll`] while it is being built,
//! then handed to [`ExamScheduler`](crate::pipeline::ExamScheduler) by
//! shared reference.

use serde::{Deserialize, Serialize};

use super::{ExamId, StudentId};
use crate::error::{Result, ScheduleError};

/// Dense boolean enrollment relation over (student, exam).
///
/// `is_enrolled(s, e)` is true iff student `s` takes exam `e`.
/// Stored row-major: one row per student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EnrollmentParts")]
pub struct EnrollmentMatrix {
    num_students: usize,
    num_exams: usize,
    cells: Vec<bool>,
}

/// Serialized form of [`EnrollmentMatrix`], shape-checked on the way in.
#[derive(Deserialize)]
struct EnrollmentParts {
    num_students: usize,
    num_exams: usize,
    cells: Vec<bool>,
}

impl TryFrom<EnrollmentParts> for EnrollmentMatrix {
    type Error = ScheduleError;

    fn try_from(parts: EnrollmentParts) -> Result<Self> {
        let expected = parts
            .num_students
            .checked_mul(parts.num_exams)
            .ok_or_else(|| {
                ScheduleError::invalid_input(format!(
                    "{}x{} enrollment matrix is too large",
                    parts.num_students, parts.num_exams
                ))
            })?;
        if parts.cells.len() != expected {
            return Err(ScheduleError::invalid_input(format!(
                "{}x{} enrollment matrix needs {expected} cells, got {}",
                parts.num_students,
                parts.num_exams,
                parts.cells.len()
            )));
        }
        Ok(Self {
            num_students: parts.num_students,
            num_exams: parts.num_exams,
            cells: parts.cells,
        })
    }
}

impl EnrollmentMatrix {
    /// Creates a matrix with nobody enrolled anywhere.
    pub fn new(num_students: usize, num_exams: usize) -> Self {
        Self {
            num_students,
            num_exams,
            cells: vec![false; num_students * num_exams],
        }
    }

    /// Builds a matrix from one boolean row per student.
    ///
    /// # Errors
    /// `InvalidInput` if the rows have differing lengths.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self> {
        let num_students = rows.len();
        let num_exams = rows.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(num_students * num_exams);
        for (s, row) in rows.into_iter().enumerate() {
            if row.len() != num_exams {
                return Err(ScheduleError::invalid_input(format!(
                    "student {s} has {} exam columns, expected {num_exams}",
                    row.len()
                )));
            }
            cells.extend(row);
        }
        Ok(Self {
            num_students,
            num_exams,
            cells,
        })
    }

    /// Builds a matrix from a sparse student → exam-set mapping.
    ///
    /// Duplicate exam ids within one student are harmless.
    ///
    /// # Errors
    /// `InvalidInput` if any exam id is `>= num_exams`.
    pub fn from_student_exams(num_exams: usize, students: Vec<Vec<ExamId>>) -> Result<Self> {
        let mut matrix = Self::new(students.len(), num_exams);
        for (s, exams) in students.iter().enumerate() {
            for &e in exams {
                if e >= num_exams {
                    return Err(ScheduleError::invalid_input(format!(
                        "student {s} references exam {e}, but only {num_exams} exams exist"
                    )));
                }
                matrix.enroll(s, e);
            }
        }
        Ok(matrix)
    }

    /// Enrolls student `s` in exam `e`.
    ///
    /// # Panics
    /// Panics if either index is out of range.
    pub fn enroll(&mut self, s: StudentId, e: ExamId) {
        assert!(
            s < self.num_students && e < self.num_exams,
            "enrollment ({s}, {e}) out of range for {}x{} matrix",
            self.num_students,
            self.num_exams
        );
        self.cells[s * self.num_exams + e] = true;
    }

    /// Number of students (rows).
    #[inline]
    pub fn num_students(&self) -> usize {
        self.num_students
    }

    /// Number of exams (columns).
    #[inline]
    pub fn num_exams(&self) -> usize {
        self.num_exams
    }

    /// Whether the matrix has no students or no exams.
    pub fn is_empty(&self) -> bool {
        self.num_students == 0 || self.num_exams == 0
    }

    /// Whether student `s` takes exam `e`. Out-of-range indices yield `false`.
    #[inline]
    pub fn is_enrolled(&self, s: StudentId, e: ExamId) -> bool {
        s < self.num_students && e < self.num_exams && self.cells[s * self.num_exams + e]
    }

    /// Boolean row of student `s`.
    pub fn row(&self, s: StudentId) -> &[bool] {
        let start = s * self.num_exams;
        &self.cells[start..start + self.num_exams]
    }

    /// Exams taken by student `s`, ascending.
    pub fn exams_of(&self, s: StudentId) -> Vec<ExamId> {
        self.row(s)
            .iter()
            .enumerate()
            .filter_map(|(e, &taken)| taken.then_some(e))
            .collect()
    }

    /// Students sitting exam `e`, ascending.
    pub fn students_of(&self, e: ExamId) -> Vec<StudentId> {
        (0..self.num_students)
            .filter(|&s| self.is_enrolled(s, e))
            .collect()
    }

    /// Total number of (student, exam) enrollments.
    pub fn enrollment_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Exams that nobody takes. These are legal but isolated in the conflict graph.
    pub fn unattended_exams(&self) -> Vec<ExamId> {
        (0..self.num_exams)
            .filter(|&e| (0..self.num_students).all(|s| !self.is_enrolled(s, e)))
            .collect()
    }
}
