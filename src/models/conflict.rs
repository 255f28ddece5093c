//! Exam conflict graph.
//!
//! Weighted, undirected graph over exams: the weight of edge (i, j) is
//! the number of students enrolled in both i and j.

use serde::{Deserialize, Serialize};

use super::ExamId;
use crate::error::{Result, ScheduleError};

/// Square symmetric conflict matrix with a zero diagonal.
///
/// `get(i, j)` = |{ s : enrolled[s][i] ∧ enrolled[s][j] }| for i ≠ j.
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ConflictParts")]
pub struct ConflictMatrix {
    size: usize,
    weights: Vec<u32>,
}

/// Serialized form of [`ConflictMatrix`], checked like [`ConflictMatrix::from_rows`].
#[derive(Deserialize)]
struct ConflictParts {
    size: usize,
    weights: Vec<u32>,
}

impl TryFrom<ConflictParts> for ConflictMatrix {
    type Error = ScheduleError;

    fn try_from(parts: ConflictParts) -> Result<Self> {
        if Some(parts.weights.len()) != parts.size.checked_mul(parts.size) {
            return Err(ScheduleError::invalid_input(format!(
                "conflict matrix of size {} cannot hold {} weights",
                parts.size,
                parts.weights.len()
            )));
        }
        Self::checked(parts.size, parts.weights)
    }
}

impl ConflictMatrix {
    /// Wraps a row-major weight buffer produced by the graph builder.
    pub(crate) fn from_raw(size: usize, weights: Vec<u32>) -> Self {
        debug_assert_eq!(weights.len(), size * size);
        Self { size, weights }
    }

    /// Builds a conflict matrix from explicit rows.
    ///
    /// # Errors
    /// `InvalidInput` if the rows are not square, not symmetric, or carry
    /// a non-zero diagonal.
    pub fn from_rows(rows: Vec<Vec<u32>>) -> Result<Self> {
        let size = rows.len();
        let mut weights = Vec::with_capacity(size * size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(ScheduleError::invalid_input(format!(
                    "conflict row {i} has {} entries, expected {size}",
                    row.len()
                )));
            }
            weights.extend(row);
        }
        Self::checked(size, weights)
    }

    /// Rejects a square weight buffer with a non-zero diagonal or asymmetry.
    fn checked(size: usize, weights: Vec<u32>) -> Result<Self> {
        let matrix = Self { size, weights };
        for i in 0..size {
            if matrix.get(i, i) != 0 {
                return Err(ScheduleError::invalid_input(format!(
                    "conflict diagonal entry ({i}, {i}) must be zero"
                )));
            }
        }
        if !matrix.is_symmetric() {
            return Err(ScheduleError::invalid_input("conflict matrix is not symmetric"));
        }
        Ok(matrix)
    }

    /// Number of exams.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Shared-student count between exams `i` and `j`.
    #[inline]
    pub fn get(&self, i: ExamId, j: ExamId) -> u32 {
        self.weights[i * self.size + j]
    }

    /// Row `i` of the matrix.
    pub fn row(&self, i: ExamId) -> &[u32] {
        let start = i * self.size;
        &self.weights[start..start + self.size]
    }

    /// Weighted degree of exam `i` (row sum).
    pub fn degree(&self, i: ExamId) -> u64 {
        self.row(i).iter().map(|&w| u64::from(w)).sum()
    }

    /// Weighted degree of every exam.
    pub fn degrees(&self) -> Vec<u64> {
        (0..self.size).map(|i| self.degree(i)).collect()
    }

    /// Exams sharing at least one student with `i`, ascending.
    pub fn neighbors(&self, i: ExamId) -> Vec<ExamId> {
        self.row(i)
            .iter()
            .enumerate()
            .filter_map(|(j, &w)| (w > 0).then_some(j))
            .collect()
    }

    /// Whether `get(i, j) == get(j, i)` for all pairs.
    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|i| (i + 1..self.size).all(|j| self.get(i, j) == self.get(j, i)))
    }

    /// Total edge weight, each unordered pair counted once.
    pub fn total_weight(&self) -> u64 {
        (0..self.size)
            .flat_map(|i| (i + 1..self.size).map(move |j| (i, j)))
            .map(|(i, j)| u64::from(self.get(i, j)))
            .sum()
    }

    /// Whether no two exams share a student.
    pub fn is_conflict_free(&self) -> bool {
        self.weights.iter().all(|&w| w == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> ConflictMatrix {
        ConflictMatrix::from_rows(vec![vec![0, 2, 1], vec![2, 0, 0], vec![1, 0, 0]]).unwrap()
    }

    #[test]
    fn test_degrees_and_weight() {
        let c = triangle();
        assert_eq!(c.size(), 3);
        assert_eq!(c.degrees(), vec![3, 2, 1]);
        assert_eq!(c.total_weight(), 3);
        assert_eq!(c.neighbors(0), vec![1, 2]);
        assert_eq!(c.neighbors(1), vec![0]);
        assert!(!c.is_conflict_free());
    }

    #[test]
    fn test_rejects_asymmetric() {
        let err = ConflictMatrix::from_rows(vec![vec![0, 1], vec![2, 0]]).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_rejects_diagonal() {
        assert!(ConflictMatrix::from_rows(vec![vec![1, 0], vec![0, 0]]).is_err());
    }

    #[test]
    fn test_rejects_non_square() {
        assert!(ConflictMatrix::from_rows(vec![vec![0, 1, 0], vec![1, 0, 0]]).is_err());
    }

    #[test]
    fn test_json_is_checked() {
        let c = triangle();
        let back: ConflictMatrix = serde_json::from_str(&serde_json::to_string(&c).unwrap()).unwrap();
        assert_eq!(back, c);

        let short = r#"{"size":3,"weights":[0,1,1,0]}"#;
        assert!(serde_json::from_str::<ConflictMatrix>(short).is_err());
        let asymmetric = r#"{"size":2,"weights":[0,1,2,0]}"#;
        assert!(serde_json::from_str::<ConflictMatrix>(asymmetric).is_err());
        let diagonal = r#"{"size":2,"weights":[3,0,0,0]}"#;
        assert!(serde_json::from_str::<ConflictMatrix>(diagonal).is_err());
    }

    #[test]
    fn test_all_zero() {
        let c = ConflictMatrix::from_rows(vec![vec![0; 4]; 4]).unwrap();
        assert!(c.is_conflict_free());
        assert_eq!(c.total_weight(), 0);
        assert!(c.neighbors(2).is_empty());
    }
}
