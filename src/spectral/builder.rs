//! Conflict graph construction.
//!
//! # Algorithm
//!
//! `conflict = Eᵀ · E` with the diagonal forced to zero, where `E` is the
//! 0/1 enrollment matrix. Computed student by student: every pair of exams
//! a student takes gains one unit of weight, which is the same product
//! without touching the zero entries of `E`.
//!
//! # Complexity
//! O(N · k²) where N = students and k = exams per student.

use tracing::debug;

use crate::error::{Result, ScheduleError};
use crate::models::{ConflictMatrix, EnrollmentMatrix};

/// Derives the weighted exam conflict graph from enrollments.
///
/// # Example
///
/// ```
/// use u_exam_schedule::models::EnrollmentMatrix;
/// use u_exam_schedule::spectral::ConflictGraphBuilder;
///
/// let enrollment = EnrollmentMatrix::from_student_exams(3, vec![
///     vec![0, 1],
///     vec![0, 1, 2],
/// ]).unwrap();
///
/// let conflicts = ConflictGraphBuilder::new().build(&enrollment).unwrap();
/// assert_eq!(conflicts.get(0, 1), 2);
/// assert_eq!(conflicts.get(1, 2), 1);
/// assert_eq!(conflicts.get(2, 2), 0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictGraphBuilder;

impl ConflictGraphBuilder {
    /// Creates a builder.
    pub fn new() -> Self {
        Self
    }

    /// Builds the M × M conflict matrix.
    ///
    /// # Errors
    /// `InvalidInput` if the enrollment matrix has zero students or zero exams.
    pub fn build(&self, enrollment: &EnrollmentMatrix) -> Result<ConflictMatrix> {
        let n = enrollment.num_students();
        let m = enrollment.num_exams();
        if n == 0 {
            return Err(ScheduleError::invalid_input(format!(
                "enrollment matrix has no students ({m} exams)"
            )));
        }
        if m == 0 {
            return Err(ScheduleError::invalid_input(format!(
                "enrollment matrix has no exams ({n} students)"
            )));
        }

        let mut weights = vec![0u32; m * m];
        for s in 0..n {
            let exams = enrollment.exams_of(s);
            for (k, &i) in exams.iter().enumerate() {
                for &j in &exams[k + 1..] {
                    weights[i * m + j] += 1;
                    weights[j * m + i] += 1;
                }
            }
        }

        let conflicts = ConflictMatrix::from_raw(m, weights);
        debug!(
            students = n,
            exams = m,
            total_weight = conflicts.total_weight(),
            "built conflict graph"
        );
        Ok(conflicts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    /// Literal `Eᵀ · E` with the diagonal zeroed.
    fn brute_force(enrollment: &EnrollmentMatrix) -> Vec<Vec<u32>> {
        let m = enrollment.num_exams();
        let mut out = vec![vec![0u32; m]; m];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                if i == j {
                    continue;
                }
                *cell = (0..enrollment.num_students())
                    .filter(|&s| enrollment.is_enrolled(s, i) && enrollment.is_enrolled(s, j))
                    .count() as u32;
            }
        }
        out
    }

    fn random_enrollment(rng: &mut SmallRng, n: usize, m: usize) -> EnrollmentMatrix {
        let rows = (0..n)
            .map(|_| (0..m).map(|_| rng.random_bool(0.4)).collect())
            .collect();
        EnrollmentMatrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_matches_matrix_product() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..20 {
            let e = random_enrollment(&mut rng, 12, 6);
            let c = ConflictGraphBuilder::new().build(&e).unwrap();
            let expected = brute_force(&e);
            for (i, row) in expected.iter().enumerate() {
                assert_eq!(c.row(i), row.as_slice());
            }
        }
    }

    #[test]
    fn test_symmetric_zero_diagonal() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..20 {
            let e = random_enrollment(&mut rng, 30, 9);
            let c = ConflictGraphBuilder::new().build(&e).unwrap();
            assert!(c.is_symmetric());
            for i in 0..c.size() {
                assert_eq!(c.get(i, i), 0);
            }
        }
    }

    #[test]
    fn test_complete_conflict() {
        let e = EnrollmentMatrix::from_rows(vec![vec![true; 4]; 3]).unwrap();
        let c = ConflictGraphBuilder::new().build(&e).unwrap();
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(c.get(i, j), if i == j { 0 } else { 3 });
            }
        }
    }

    #[test]
    fn test_no_students_rejected() {
        let e = EnrollmentMatrix::new(0, 4);
        let err = ConflictGraphBuilder::new().build(&e).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_no_exams_rejected() {
        let e = EnrollmentMatrix::new(5, 0);
        assert!(ConflictGraphBuilder::new().build(&e).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_unattended_exam_is_isolated() {
        let e = EnrollmentMatrix::from_student_exams(3, vec![vec![0, 1]]).unwrap();
        let c = ConflictGraphBuilder::new().build(&e).unwrap();
        assert_eq!(c.degree(2), 0);
        assert_eq!(c.get(0, 1), 1);
    }
}
