//! Enrollment sources.
//!
//! The scheduling pipeline consumes an [`EnrollmentMatrix`] and does not
//! care where it came from. [`EnrollmentSource`] is the seam: a seeded
//! random generator for experiments, and a fixture wrapper for tests.

use rand::rngs::SmallRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ScheduleError};
use crate::models::EnrollmentMatrix;

/// How many exams each generated student takes (inclusive range).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentBounds {
    /// Fewest exams per student.
    pub min_exams: usize,
    /// Most exams per student.
    pub max_exams: usize,
}

impl EnrollmentBounds {
    /// Creates bounds `[min_exams, max_exams]`.
    pub fn new(min_exams: usize, max_exams: usize) -> Self {
        Self {
            min_exams,
            max_exams,
        }
    }

    /// Checks the bounds against the number of exams on offer.
    pub fn validate(&self, num_exams: usize) -> Result<()> {
        if self.min_exams > self.max_exams {
            return Err(ScheduleError::invalid_input(format!(
                "min exams per student ({}) exceeds max ({})",
                self.min_exams, self.max_exams
            )));
        }
        if self.max_exams > num_exams {
            return Err(ScheduleError::invalid_input(format!(
                "max exams per student ({}) exceeds the {num_exams} exams on offer",
                self.max_exams
            )));
        }
        Ok(())
    }
}

impl Default for EnrollmentBounds {
    fn default() -> Self {
        Self::new(2, 5)
    }
}

/// Supplier of enrollment matrices.
pub trait EnrollmentSource {
    /// Produces an `num_students × num_exams` enrollment matrix.
    fn generate(
        &mut self,
        num_students: usize,
        num_exams: usize,
        bounds: EnrollmentBounds,
    ) -> Result<EnrollmentMatrix>;
}

/// Seeded random enrollments.
///
/// Each student draws a uniform exam count in `bounds`, then that many
/// distinct exams uniformly without replacement.
///
/// # Example
///
/// ```
/// use u_exam_schedule::generator::{EnrollmentBounds, EnrollmentSource, RandomEnrollment};
///
/// let mut source = RandomEnrollment::seeded(42);
/// let enrollment = source.generate(50, 10, EnrollmentBounds::default()).unwrap();
///
/// assert_eq!(enrollment.num_students(), 50);
/// for s in 0..50 {
///     let k = enrollment.exams_of(s).len();
///     assert!((2..=5).contains(&k));
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RandomEnrollment {
    rng: SmallRng,
}

impl RandomEnrollment {
    /// Reproducible generator.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }
}

impl EnrollmentSource for RandomEnrollment {
    fn generate(
        &mut self,
        num_students: usize,
        num_exams: usize,
        bounds: EnrollmentBounds,
    ) -> Result<EnrollmentMatrix> {
        bounds.validate(num_exams)?;
        let mut matrix = EnrollmentMatrix::new(num_students, num_exams);
        for s in 0..num_students {
            let k = self.rng.random_range(bounds.min_exams..=bounds.max_exams);
            for e in index::sample(&mut self.rng, num_exams, k) {
                matrix.enroll(s, e);
            }
        }
        debug!(
            students = num_students,
            exams = num_exams,
            enrollments = matrix.enrollment_count(),
            "generated random enrollments"
        );
        Ok(matrix)
    }
}

/// Literal enrollment matrix, returned as-is.
#[derive(Debug, Clone)]
pub struct FixtureEnrollment {
    matrix: EnrollmentMatrix,
}

impl FixtureEnrollment {
    /// Wraps a fixed matrix.
    pub fn new(matrix: EnrollmentMatrix) -> Self {
        Self { matrix }
    }
}

impl EnrollmentSource for FixtureEnrollment {
    /// Returns the fixture. Bounds are not enforced on literal data.
    ///
    /// # Errors
    /// `InvalidInput` if the requested shape differs from the fixture's.
    fn generate(
        &mut self,
        num_students: usize,
        num_exams: usize,
        _bounds: EnrollmentBounds,
    ) -> Result<EnrollmentMatrix> {
        if self.matrix.num_students() != num_students || self.matrix.num_exams() != num_exams {
            return Err(ScheduleError::invalid_input(format!(
                "fixture is {}x{}, requested {num_students}x{num_exams}",
                self.matrix.num_students(),
                self.matrix.num_exams()
            )));
        }
        Ok(self.matrix.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_is_reproducible() {
        let bounds = EnrollmentBounds::default();
        let a = RandomEnrollment::seeded(7).generate(30, 10, bounds).unwrap();
        let b = RandomEnrollment::seeded(7).generate(30, 10, bounds).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_respects_bounds() {
        let mut source = RandomEnrollment::seeded(1);
        let m = source.generate(200, 6, EnrollmentBounds::new(1, 3)).unwrap();
        for s in 0..200 {
            let k = m.exams_of(s).len();
            assert!((1..=3).contains(&k), "student {s} has {k} exams");
        }
    }

    #[test]
    fn test_exact_count() {
        let mut source = RandomEnrollment::seeded(2);
        let m = source.generate(10, 4, EnrollmentBounds::new(4, 4)).unwrap();
        assert_eq!(m.enrollment_count(), 40);
    }

    #[test]
    fn test_invalid_bounds() {
        let mut source = RandomEnrollment::seeded(3);
        assert!(source
            .generate(5, 4, EnrollmentBounds::new(3, 2))
            .unwrap_err()
            .is_invalid_input());
        assert!(source
            .generate(5, 4, EnrollmentBounds::new(2, 5))
            .unwrap_err()
            .is_invalid_input());
    }

    #[test]
    fn test_fixture_round_trip() {
        let matrix = EnrollmentMatrix::from_rows(vec![vec![true, false], vec![true, true]]).unwrap();
        let mut source = FixtureEnrollment::new(matrix.clone());
        let out = source.generate(2, 2, EnrollmentBounds::default()).unwrap();
        assert_eq!(out, matrix);
        assert!(source.generate(3, 2, EnrollmentBounds::default()).is_err());
    }
}
