//! Greedy day packing.
//!
//! # Algorithm
//!
//! 1. Walk group 1, then group 2, each in ascending exam id.
//! 2. Take exams `capacity` at a time and give each chunk the next unused
//!    day index. The counter is shared, so group 2's days start right after
//!    group 1's: no gaps, no day mixing groups.
//!
//! The conflict matrix is not consulted. Same-day conflicts inside a group
//! are possible and are what the load validator measures.
//!
//! # Complexity
//! O(M) where M = exams.

use tracing::debug;

use crate::error::{Result, ScheduleError};
use crate::models::{DayIndex, DaySchedule, ExamId, Partition};

/// Packs partition groups into fixed-capacity day bins.
///
/// # Example
///
/// ```
/// use u_exam_schedule::models::Partition;
/// use u_exam_schedule::scheduler::DayScheduler;
///
/// let partition = Partition::from_groups(5, vec![0, 2, 4], vec![1, 3]).unwrap();
/// let schedule = DayScheduler::new().schedule(&partition);
///
/// assert_eq!(schedule.days(), &[vec![0, 2], vec![4], vec![1, 3]]);
/// assert_eq!(schedule.day_of(3), Some(2));
/// ```
#[derive(Debug, Clone)]
pub struct DayScheduler {
    capacity: usize,
}

impl DayScheduler {
    /// Default exams per day.
    pub const DEFAULT_CAPACITY: usize = 2;

    /// Creates a scheduler with two exams per day.
    pub fn new() -> Self {
        Self {
            capacity: Self::DEFAULT_CAPACITY,
        }
    }

    /// Creates a scheduler with `capacity` exams per day.
    ///
    /// # Errors
    /// `InvalidInput` if `capacity` is zero.
    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(ScheduleError::invalid_input("day capacity must be at least 1"));
        }
        Ok(Self { capacity })
    }

    /// Sets the day bin capacity.
    ///
    /// # Panics
    /// Panics if `capacity` is zero. Use [`Self::try_with_capacity`] for
    /// capacities that come from callers.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "day capacity must be at least 1");
        self.capacity = capacity;
        self
    }

    /// Day bin capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of days `schedule` will use for `partition`:
    /// `⌈|group1| / c⌉ + ⌈|group2| / c⌉`.
    pub fn day_count(&self, partition: &Partition) -> usize {
        partition
            .groups()
            .iter()
            .map(|g| g.len().div_ceil(self.capacity))
            .sum()
    }

    /// Assigns every exam of `partition` to a day.
    pub fn schedule(&self, partition: &Partition) -> DaySchedule {
        let num_exams = partition.num_exams();
        let mut days: Vec<Vec<ExamId>> = Vec::with_capacity(self.day_count(partition));
        let mut exam_day: Vec<DayIndex> = vec![0; num_exams];

        for group in partition.groups() {
            for chunk in group.chunks(self.capacity) {
                let day = days.len();
                for &e in chunk {
                    exam_day[e] = day;
                }
                days.push(chunk.to_vec());
            }
        }

        debug!(
            days = days.len(),
            exams = num_exams,
            capacity = self.capacity,
            "packed exams into days"
        );
        DaySchedule::from_parts(days, exam_day)
    }
}

impl Default for DayScheduler {
    fn default() -> Self {
        Self::new()
    }
}
