//! Spectral bisection result.
//!
//! A partition splits the exam set into two disjoint groups by the sign of
//! the Fiedler vector, and keeps the sorted Laplacian spectrum it came from.

use serde::{Deserialize, Serialize};

use super::{ConflictMatrix, ExamId};
use crate::error::{Result, ScheduleError};

/// Which side of the bisection an exam falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExamGroup {
    /// Fiedler component `>= 0`.
    First,
    /// Fiedler component `< 0`.
    Second,
}

/// Two disjoint exam groups covering every exam exactly once.
///
/// Group members are listed in ascending exam id, which is also the order
/// the day scheduler packs them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PartitionParts")]
pub struct Partition {
    group1: Vec<ExamId>,
    group2: Vec<ExamId>,
    /// Laplacian eigenvalues, ascending. Empty for hand-built partitions.
    eigenvalues: Vec<f64>,
    /// Eigenvector of the second-smallest eigenvalue.
    fiedler: Vec<f64>,
}

/// Serialized form of [`Partition`]. Groups go through
/// [`Partition::from_groups`], so lookups can rely on sorted disjoint groups.
#[derive(Deserialize)]
struct PartitionParts {
    group1: Vec<ExamId>,
    group2: Vec<ExamId>,
    #[serde(default)]
    eigenvalues: Vec<f64>,
    #[serde(default)]
    fiedler: Vec<f64>,
}

impl TryFrom<PartitionParts> for Partition {
    type Error = ScheduleError;

    fn try_from(parts: PartitionParts) -> Result<Self> {
        let num_exams = parts.group1.len() + parts.group2.len();
        let mut partition = Self::from_groups(num_exams, parts.group1, parts.group2)?;
        for (name, values) in [("eigenvalues", &parts.eigenvalues), ("fiedler", &parts.fiedler)] {
            if !values.is_empty() && values.len() != num_exams {
                return Err(ScheduleError::invalid_input(format!(
                    "partition of {num_exams} exams carries {} {name}",
                    values.len()
                )));
            }
        }
        partition.eigenvalues = parts.eigenvalues;
        partition.fiedler = parts.fiedler;
        Ok(partition)
    }
}

impl Partition {
    /// Splits exams by the sign of `fiedler`: `>= 0` → group1, `< 0` → group2.
    ///
    /// Negative zero compares equal to zero and therefore lands in group1.
    pub fn from_fiedler(fiedler: Vec<f64>, eigenvalues: Vec<f64>) -> Self {
        let (group1, group2): (Vec<ExamId>, Vec<ExamId>) =
            (0..fiedler.len()).partition(|&e| fiedler[e] >= 0.0);
        Self {
            group1,
            group2,
            eigenvalues,
            fiedler,
        }
    }

    /// Builds a partition from explicit groups, for fixtures and replays.
    ///
    /// Groups are sorted ascending.
    ///
    /// # Errors
    /// `InvalidInput` unless the groups are disjoint and cover `0..num_exams`.
    pub fn from_groups(
        num_exams: usize,
        mut group1: Vec<ExamId>,
        mut group2: Vec<ExamId>,
    ) -> Result<Self> {
        group1.sort_unstable();
        group2.sort_unstable();
        let mut seen = vec![false; num_exams];
        for &e in group1.iter().chain(group2.iter()) {
            if e >= num_exams {
                return Err(ScheduleError::invalid_input(format!(
                    "exam {e} out of range for {num_exams} exams"
                )));
            }
            if seen[e] {
                return Err(ScheduleError::invalid_input(format!(
                    "exam {e} appears more than once in the partition"
                )));
            }
            seen[e] = true;
        }
        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(ScheduleError::invalid_input(format!(
                "exam {missing} is not assigned to either group"
            )));
        }
        Ok(Self {
            group1,
            group2,
            eigenvalues: Vec::new(),
            fiedler: Vec::new(),
        })
    }

    /// Exams with a non-negative Fiedler component.
    pub fn group1(&self) -> &[ExamId] {
        &self.group1
    }

    /// Exams with a negative Fiedler component.
    pub fn group2(&self) -> &[ExamId] {
        &self.group2
    }

    /// Both groups, in packing order.
    pub fn groups(&self) -> [&[ExamId]; 2] {
        [self.group1.as_slice(), self.group2.as_slice()]
    }

    /// Sorted Laplacian spectrum.
    pub fn eigenvalues(&self) -> &[f64] {
        &self.eigenvalues
    }

    /// The Fiedler vector, one component per exam.
    pub fn fiedler(&self) -> &[f64] {
        &self.fiedler
    }

    /// Total number of exams across both groups.
    pub fn num_exams(&self) -> usize {
        self.group1.len() + self.group2.len()
    }

    /// Second-smallest Laplacian eigenvalue (λ₂).
    ///
    /// `None` with fewer than two exams or for hand-built partitions.
    pub fn algebraic_connectivity(&self) -> Option<f64> {
        self.eigenvalues.get(1).copied()
    }

    /// Whether λ₂ exceeds `tolerance`, i.e. the conflict graph is connected.
    ///
    /// When it is not, the sign pattern of the Fiedler vector reflects the
    /// eigensolver's choice of basis for the null space rather than a
    /// meaningful cut.
    pub fn is_connected(&self, tolerance: f64) -> bool {
        self.algebraic_connectivity()
            .is_some_and(|lambda| lambda > tolerance)
    }

    /// Side of the bisection holding exam `e`.
    pub fn group_of(&self, e: ExamId) -> Option<ExamGroup> {
        if self.group1.binary_search(&e).is_ok() {
            Some(ExamGroup::First)
        } else if self.group2.binary_search(&e).is_ok() {
            Some(ExamGroup::Second)
        } else {
            None
        }
    }

    /// Whether the groups are disjoint and together equal `0..num_exams`.
    pub fn covers(&self, num_exams: usize) -> bool {
        let mut seen = vec![false; num_exams];
        for &e in self.group1.iter().chain(self.group2.iter()) {
            if e >= num_exams || seen[e] {
                return false;
            }
            seen[e] = true;
        }
        seen.into_iter().all(|s| s)
    }

    /// Conflict weight crossing the cut: shared students between exam pairs
    /// that ended up in different groups.
    ///
    /// # Errors
    /// `InvalidInput` if `conflicts` covers fewer exams than the partition.
    pub fn cut_weight(&self, conflicts: &ConflictMatrix) -> Result<u64> {
        if conflicts.size() < self.num_exams() {
            return Err(ScheduleError::invalid_input(format!(
                "conflict matrix covers {} exams, partition has {}",
                conflicts.size(),
                self.num_exams()
            )));
        }
        Ok(self
            .group1
            .iter()
            .flat_map(|&i| self.group2.iter().map(move |&j| (i, j)))
            .map(|(i, j)| u64::from(conflicts.get(i, j)))
            .sum())
    }
}
