//! Greedy day packing and KPI evaluation.
//!
//! # Algorithm
//!
//! `DayScheduler` fills fixed-capacity day bins from each partition group
//! in ascending exam id. It never consults per-student load; the
//! validation stage measures that afterwards.
//!
//! # KPI
//!
//! `ScheduleKpi` summarises day count, student loads, violations, and
//! conflict weight kept apart or placed together.
//!
//! # References
//!
//! - Carter, Laporte & Lee (1996), "Examination timetabling: Algorithmic
//!   strategies and applications"

mod day;
mod kpi;

pub use day::DayScheduler;
pub use kpi::ScheduleKpi;
