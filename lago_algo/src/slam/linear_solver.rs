//! Sparse weighted least squares for scalar linear systems
//!
//! Each equation of the system relates a handful of scalar unknowns:
//!
//! ```text
//! Σ a_k x_k = b    with standard deviation σ
//! ```
//!
//! Rows are whitened by 1/σ and stacked into a sparse Jacobian `A`. The
//! solution minimizes `‖A x - b‖²` through the normal equations
//! `AᵀA x = Aᵀb`. For orientation graphs every relative equation touches only
//! two unknowns, so `A` has at most two non-zeros per row.

use super::key::Key;
use crate::error::{Error, Result};
use log::debug;
use nalgebra::{DMatrix, DVector};
use sprs::{CsMat, TriMat};
use std::collections::BTreeMap;

/// One scalar equation `Σ coefficient * x[key] = rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearEquation {
    pub terms: Vec<(Key, f64)>,
    pub rhs: f64,
    /// Standard deviation of the right-hand side
    pub sigma: f64,
}

impl LinearEquation {
    /// `x[key2] - x[key1] = delta`
    pub fn relative(key1: Key, key2: Key, delta: f64, sigma: f64) -> Self {
        Self {
            terms: vec![(key1, -1.0), (key2, 1.0)],
            rhs: delta,
            sigma,
        }
    }

    /// `x[key] = value`
    pub fn unary(key: Key, value: f64, sigma: f64) -> Self {
        Self {
            terms: vec![(key, 1.0)],
            rhs: value,
            sigma,
        }
    }

    /// Residual `Σ a_k x_k - b` before whitening
    pub fn residual(&self, solution: &BTreeMap<Key, f64>) -> Option<f64> {
        let mut lhs = 0.0;
        for (key, coeff) in &self.terms {
            lhs += coeff * solution.get(key)?;
        }
        Some(lhs - self.rhs)
    }
}

/// Ordered list of scalar equations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearSystem {
    equations: Vec<LinearEquation>,
}

impl LinearSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, equation: LinearEquation) {
        self.equations.push(equation);
    }

    pub fn len(&self) -> usize {
        self.equations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }

    pub fn equations(&self) -> &[LinearEquation] {
        &self.equations
    }

    /// Unknowns of the system in column order
    pub fn ordering(&self) -> Vec<Key> {
        let mut keys: Vec<Key> = self
            .equations
            .iter()
            .flat_map(|eq| eq.terms.iter().map(|(key, _)| *key))
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }

    /// Whitened sparse Jacobian and right-hand side
    ///
    /// Row `i` is equation `i` divided by its standard deviation; columns
    /// follow [`LinearSystem::ordering`].
    pub fn jacobian(&self) -> (CsMat<f64>, DVector<f64>) {
        let ordering = self.ordering();
        let column: BTreeMap<Key, usize> = ordering.iter().enumerate().map(|(c, k)| (*k, c)).collect();

        let n_rows = self.equations.len();
        let mut a = TriMat::with_capacity((n_rows, ordering.len()), n_rows * 2);
        let mut rhs = DVector::zeros(n_rows);

        for (row, eq) in self.equations.iter().enumerate() {
            let weight = 1.0 / eq.sigma;
            for (key, coeff) in &eq.terms {
                a.add_triplet(row, column[key], coeff * weight);
            }
            rhs[row] = eq.rhs * weight;
        }

        (a.to_csr(), rhs)
    }

    /// Sum of whitened squared residuals at `solution`
    pub fn error(&self, solution: &BTreeMap<Key, f64>) -> Option<f64> {
        let mut total = 0.0;
        for eq in &self.equations {
            let r = eq.residual(solution)? / eq.sigma;
            total += r * r;
        }
        Some(total)
    }
}

/// Solves a linear system for one scalar per key
pub trait LinearSolver {
    /// Weighted least-squares solution, or [`Error::SingularSystem`] when the
    /// system does not determine every unknown
    fn solve(&self, system: &LinearSystem) -> Result<BTreeMap<Key, f64>>;
}

/// Configuration for sparse solver
#[derive(Debug, Clone)]
pub struct SparseSolverConfig {
    /// Added to the diagonal of the normal equations (0 disables)
    pub regularization: f64,
    /// Smallest accepted Cholesky pivot relative to the largest one
    pub pivot_tolerance: f64,
}

impl Default for SparseSolverConfig {
    fn default() -> Self {
        Self {
            regularization: 0.0,
            pivot_tolerance: 1e-10,
        }
    }
}

/// Normal-equation solver over a sparse whitened Jacobian
#[derive(Debug, Clone, Default)]
pub struct SparseOrientationSolver {
    config: SparseSolverConfig,
}

impl SparseOrientationSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SparseSolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SparseSolverConfig {
        &self.config
    }

    /// Solve `AᵀA x = Aᵀb` for a whitened Jacobian
    ///
    /// Returns None if the normal equations are not positive definite.
    pub fn solve_normal_equations(&self, jacobian: &CsMat<f64>, rhs: &DVector<f64>) -> Option<DVector<f64>> {
        let n_vars = jacobian.cols();
        if n_vars == 0 {
            return Some(DVector::zeros(0));
        }

        let jt = jacobian.transpose_view();
        let jtj = &jt * jacobian;

        let mut jtr = DVector::zeros(n_vars);
        for (val, (row, col)) in jacobian.iter() {
            jtr[col] += val * rhs[row];
        }

        let mut h = DMatrix::zeros(n_vars, n_vars);
        for (val, (row, col)) in jtj.iter() {
            h[(row, col)] = *val;
        }
        for i in 0..n_vars {
            h[(i, i)] += self.config.regularization;
        }

        let chol = h.cholesky()?;
        let pivots = chol.l_dirty().diagonal();
        let max_pivot = pivots.max();
        if pivots.iter().any(|p| *p <= max_pivot * self.config.pivot_tolerance) {
            return None;
        }
        Some(chol.solve(&jtr))
    }

}

impl LinearSolver for SparseOrientationSolver {
    fn solve(&self, system: &LinearSystem) -> Result<BTreeMap<Key, f64>> {
        let ordering = system.ordering();
        let (jacobian, rhs) = system.jacobian();
        debug!("Solving orientation system: {}", SparsityStats::of(&jacobian));

        let x = self
            .solve_normal_equations(&jacobian, &rhs)
            .ok_or(Error::SingularSystem {
                unknowns: ordering.len(),
            })?;

        Ok(ordering.into_iter().zip(x.iter().copied()).collect())
    }
}

/// Shape and fill of a whitened Jacobian
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparsityStats {
    pub equations: usize,
    pub unknowns: usize,
    pub nnz: usize,
}

impl SparsityStats {
    pub fn of(jacobian: &CsMat<f64>) -> Self {
        Self {
            equations: jacobian.rows(),
            unknowns: jacobian.cols(),
            nnz: jacobian.nnz(),
        }
    }

    /// Fraction of stored entries, 0 for an empty matrix
    pub fn density(&self) -> f64 {
        match self.equations * self.unknowns {
            0 => 0.0,
            total => self.nnz as f64 / total as f64,
        }
    }
}

impl std::fmt::Display for SparsityStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} equations, {} unknowns, {} non-zeros ({:.2}% dense)",
            self.equations,
            self.unknowns,
            self.nnz,
            self.density() * 100.0
        )
    }
}
