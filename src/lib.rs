//! Spectral exam timetabling.
//!
//! Assigns exams to days so that students rarely sit more than two exams
//! on the same day. Exams are split by spectral bisection of the student
//! conflict graph, each half is packed greedily into two-exam days, and
//! the result is checked against every student's daily load.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `EnrollmentMatrix`, `ConflictMatrix`,
//!   `Partition`, `DaySchedule`, `LoadViolation`
//! - **`spectral`**: Conflict graph construction, Laplacian, Fiedler bisection
//! - **`scheduler`**: Greedy day packing and schedule KPIs
//! - **`validation`**: Per-student load violations and structural checks
//! - **`generator`**: Injectable enrollment sources (seeded random, fixtures)
//! - **`pipeline`**: The four stages wired end to end
//!
//! The pipeline is a heuristic: it does not guarantee zero violations and
//! does not minimise the number of days beyond the greedy pack.
//!
//! # References
//!
//! - Fiedler (1973), "Algebraic connectivity of graphs"
//! - Pothen, Simon & Liou (1990), "Partitioning sparse matrices with
//!   eigenvectors of graphs"
//! - Carter, Laporte & Lee (1996), "Examination timetabling"

pub mod config;
pub mod error;
pub mod generator;
pub mod models;
pub mod pipeline;
pub mod scheduler;
pub mod spectral;
pub mod validation;

pub use config::SchedulerConfig;
pub use error::{Result, ScheduleError};
pub use pipeline::{ExamScheduler, ScheduleOutcome};
