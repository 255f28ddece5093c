//! Graph Laplacian and spectral bisection.
//!
//! # Algorithm
//!
//! 1. `D = diag(row sums of C)`
//! 2. `L = D - C` (symmetric, positive semi-definite, zero row sums)
//! 3. Full symmetric eigen-decomposition of `L`, eigenpairs sorted by
//!    ascending eigenvalue.
//! 4. The eigenvector of the second-smallest eigenvalue (the Fiedler
//!    vector) is a relaxation of the minimum-weight balanced bisection.
//! 5. Exams with a Fiedler component `>= 0` form group 1, the rest group 2.
//!
//! # Tie-breaking
//!
//! Eigenpairs are ordered with a stable sort on the eigenvalue, so equal
//! eigenvalues keep the column order `nalgebra::SymmetricEigen` returned
//! them in. When λ₂ is repeated, or zero because the conflict graph is
//! disconnected, the Fiedler vector is one arbitrary member of an
//! eigenspace and the resulting split carries no cut-quality guarantee.
//! The groups are still disjoint and cover every exam.
//!
//! # Reference
//! Fiedler (1973), "Algebraic connectivity of graphs";
//! Pothen, Simon & Liou (1990), "Partitioning sparse matrices with
//! eigenvectors of graphs"

use nalgebra::{DMatrix, SymmetricEigen};
use tracing::{debug, warn};

use crate::error::{Result, ScheduleError};
use crate::models::{ConflictMatrix, Partition};

/// Graph Laplacian `L = D - C` of a conflict matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Laplacian {
    matrix: DMatrix<f64>,
}

impl Laplacian {
    /// Builds the Laplacian of `conflicts`.
    pub fn from_conflicts(conflicts: &ConflictMatrix) -> Self {
        let degrees = conflicts.degrees();
        let matrix = DMatrix::from_fn(conflicts.size(), conflicts.size(), |i, j| {
            if i == j {
                degrees[i] as f64
            } else {
                -f64::from(conflicts.get(i, j))
            }
        });
        Self { matrix }
    }

    /// Dimension (number of exams).
    pub fn size(&self) -> usize {
        self.matrix.nrows()
    }

    /// Entry `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.matrix[(i, j)]
    }

    /// Sum of each row. Exactly zero for integer conflict weights.
    pub fn row_sums(&self) -> Vec<f64> {
        self.matrix.row_iter().map(|row| row.sum()).collect()
    }

    /// Underlying dense matrix.
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }
}

/// Laplacian eigenpairs, sorted by ascending eigenvalue.
#[derive(Debug, Clone)]
pub struct Spectrum {
    /// Eigenvalues, ascending.
    pub eigenvalues: Vec<f64>,
    /// Column `k` is the unit eigenvector of `eigenvalues[k]`.
    pub eigenvectors: DMatrix<f64>,
}

impl Spectrum {
    /// Eigenvector of the second-smallest eigenvalue.
    ///
    /// With a single exam there is no second eigenpair; the zero vector is
    /// returned so the lone exam falls into group 1.
    pub fn fiedler_vector(&self) -> Vec<f64> {
        if self.eigenvalues.len() < 2 {
            return vec![0.0; self.eigenvectors.nrows()];
        }
        self.eigenvectors.column(1).iter().copied().collect()
    }
}

/// Bisects the exam set using the Fiedler vector of the conflict Laplacian.
///
/// # Example
///
/// ```
/// use u_exam_schedule::models::ConflictMatrix;
/// use u_exam_schedule::spectral::LaplacianPartitioner;
///
/// // Two tightly coupled pairs joined by one weak link.
/// let conflicts = ConflictMatrix::from_rows(vec![
///     vec![0, 9, 0, 0],
///     vec![9, 0, 1, 0],
///     vec![0, 1, 0, 9],
///     vec![0, 0, 9, 0],
/// ]).unwrap();
///
/// let partition = LaplacianPartitioner::new().partition(&conflicts).unwrap();
/// let mut groups = [partition.group1().to_vec(), partition.group2().to_vec()];
/// groups.sort();
/// assert_eq!(groups, [vec![0, 1], vec![2, 3]]);
/// ```
#[derive(Debug, Clone)]
pub struct LaplacianPartitioner {
    epsilon: f64,
    max_iterations: Option<usize>,
    connectivity_tolerance: f64,
}

impl LaplacianPartitioner {
    /// QR sweeps allowed per exam when no explicit cap is set.
    pub const ITERATIONS_PER_EXAM: usize = 30;

    /// Creates a partitioner with machine-epsilon convergence and an
    /// iteration cap of [`Self::ITERATIONS_PER_EXAM`] sweeps per exam.
    pub fn new() -> Self {
        Self {
            epsilon: f64::EPSILON,
            max_iterations: None,
            connectivity_tolerance: 1e-9,
        }
    }

    /// Sets the eigensolver's relative convergence threshold.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Caps eigensolver iterations. `0` lifts the cap entirely, so a
    /// non-converging solve never returns.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Iteration cap applied to an `n × n` Laplacian.
    pub fn iteration_cap(&self, n: usize) -> usize {
        self.max_iterations
            .unwrap_or_else(|| Self::ITERATIONS_PER_EXAM.saturating_mul(n))
    }

    /// Sets the λ₂ threshold used to report a disconnected conflict graph.
    pub fn with_connectivity_tolerance(mut self, tolerance: f64) -> Self {
        self.connectivity_tolerance = tolerance;
        self
    }

    /// Full eigen-decomposition of `laplacian`, sorted ascending.
    ///
    /// # Errors
    /// - `InvalidInput` for an empty Laplacian.
    /// - `Numerical` if the solver fails to converge within the iteration
    ///   cap or yields non-finite eigenvalues.
    pub fn decompose(&self, laplacian: &Laplacian) -> Result<Spectrum> {
        let n = laplacian.size();
        if n == 0 {
            return Err(ScheduleError::invalid_input("cannot decompose an empty Laplacian"));
        }
        let max_iterations = self.iteration_cap(n);
        let eigen = SymmetricEigen::try_new(laplacian.matrix().clone(), self.epsilon, max_iterations)
            .ok_or_else(|| {
                ScheduleError::numerical(format!(
                    "symmetric eigensolver did not converge on {n}x{n} Laplacian \
                     (max_iterations = {max_iterations})"
                ))
            })?;

        if eigen.eigenvalues.iter().any(|v| !v.is_finite()) {
            return Err(ScheduleError::numerical(
                "symmetric eigensolver produced a non-finite eigenvalue",
            ));
        }

        let mut order: Vec<usize> = (0..n).collect();
        // Stable: equal eigenvalues keep the solver's column order.
        order.sort_by(|&a, &b| {
            eigen.eigenvalues[a]
                .partial_cmp(&eigen.eigenvalues[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let eigenvalues = order.iter().map(|&k| eigen.eigenvalues[k]).collect();
        let eigenvectors = DMatrix::from_fn(n, n, |r, c| eigen.eigenvectors[(r, order[c])]);
        Ok(Spectrum {
            eigenvalues,
            eigenvectors,
        })
    }

    /// Splits the exams of `conflicts` into two disjoint groups.
    ///
    /// A disconnected conflict graph (λ₂ ≈ 0) is not an error: the groups
    /// are still well formed, only the cut-quality guarantee is lost.
    ///
    /// # Errors
    /// `InvalidInput` for an empty matrix, `Numerical` if the
    /// eigen-decomposition fails.
    pub fn partition(&self, conflicts: &ConflictMatrix) -> Result<Partition> {
        let laplacian = Laplacian::from_conflicts(conflicts);
        let spectrum = self.decompose(&laplacian)?;
        let fiedler = spectrum.fiedler_vector();
        let partition = Partition::from_fiedler(fiedler, spectrum.eigenvalues);
        let cut_weight = partition.cut_weight(conflicts)?;

        if let Some(lambda2) = partition.algebraic_connectivity() {
            if lambda2 <= self.connectivity_tolerance {
                warn!(
                    lambda2,
                    "conflict graph is disconnected; bisection follows the eigensolver's null-space basis"
                );
            }
        }
        debug!(
            group1 = partition.group1().len(),
            group2 = partition.group2().len(),
            lambda2 = ?partition.algebraic_connectivity(),
            cut_weight,
            "spectral bisection"
        );
        Ok(partition)
    }
}

impl Default for LaplacianPartitioner {
    fn default() -> Self {
        Self::new()
    }
}
