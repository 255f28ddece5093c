//! Exam timetabling domain models.
//!
//! Provides the data types flowing through the pipeline. Every derived
//! value is built once from an immutable enrollment matrix and handed on
//! by shared reference.
//!
//! # Pipeline Mapping
//!
//! | Stage | Consumes | Produces |
//! |-------|----------|----------|
//! | Conflict graph | `EnrollmentMatrix` | `ConflictMatrix` |
//! | Spectral bisection | `ConflictMatrix` | `Partition` |
//! | Day packing | `Partition` | `DaySchedule` |
//! | Load validation | `EnrollmentMatrix`, `DaySchedule` | violation count, `LoadViolation`s |

mod conflict;
mod enrollment;
mod partition;
mod schedule;

pub use conflict::ConflictMatrix;
pub use enrollment::EnrollmentMatrix;
pub use partition::{ExamGroup, Partition};
pub use schedule::{DaySchedule, LoadViolation};

/// Exam identifier: column index in the enrollment matrix.
pub type ExamId = usize;

/// Student identifier: row index in the enrollment matrix.
pub type StudentId = usize;

/// 0-based day index.
pub type DayIndex = usize;
