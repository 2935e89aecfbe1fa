//! LAGO: linear approximation for planar pose graph orientation
//!
//! Nonlinear pose graph optimizers need an initial guess, and in the plane the
//! hardest part of that guess is the heading of each pose: angles wrap around,
//! so summing relative rotations along different paths can disagree by whole
//! turns. LAGO resolves this in closed form:
//!
//! 1. Keep only the relative-orientation measurements; priors become edges
//!    from a fictitious anchor node
//! 2. Build a spanning tree and accumulate unwrapped headings along it
//! 3. Shift every chord (non-tree edge) by the number of full turns that makes
//!    its cycle consistent with the tree
//! 4. Solve the resulting linear least-squares problem with the root pinned
//!    at zero
//!
//! The result can replace the headings of an initial guess whose
//! translations come from elsewhere.
//!
//! ## References
//! - [A fast and accurate approximation for planar pose graph optimization](https://doi.org/10.1177/0278364914523689)
//! - [A linear approximation for graph-based simultaneous localization and mapping](https://www.roboticsproceedings.org/rss07/p04.pdf)

pub mod orientation_system;
pub mod propagate;
pub mod reconstruct;
pub mod subgraph;
pub mod symbolic;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use orientation_system::{build_orientation_system, regularize_chord, RegularizedChord, DEFAULT_ANCHOR_VARIANCE};
pub use propagate::{compute_theta_to_root, compute_thetas_to_root};
pub use reconstruct::reconstruct_poses;
pub use subgraph::{build_pose2_graph, MeasurementKind, OrientationEdge, PoseSubgraph};
pub use symbolic::{get_symbolic_graph, SymbolicGraph};

use crate::error::Result;
use crate::slam::{
    FactorGraph, Key, LinearSolver, PrimSpanningTree, SparseOrientationSolver, SparseSolverConfig,
    SpanningTreeService, Values,
};
use log::debug;
use std::collections::BTreeMap;

/// Solved heading per key
///
/// Contains the anchor (at approximately zero) whenever the graph has priors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrientationEstimate {
    thetas: BTreeMap<Key, f64>,
}

impl OrientationEstimate {
    pub fn get(&self, key: Key) -> Option<f64> {
        self.thetas.get(&key).copied()
    }

    pub fn contains(&self, key: Key) -> bool {
        self.thetas.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.thetas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thetas.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Key, f64)> + '_ {
        self.thetas.iter().map(|(k, t)| (*k, *t))
    }

    /// Same estimate without the anchor entry
    pub fn without_anchor(&self) -> Self {
        self.iter().filter(|(key, _)| !key.is_anchor()).collect()
    }
}

impl From<BTreeMap<Key, f64>> for OrientationEstimate {
    fn from(thetas: BTreeMap<Key, f64>) -> Self {
        Self { thetas }
    }
}

impl FromIterator<(Key, f64)> for OrientationEstimate {
    fn from_iter<I: IntoIterator<Item = (Key, f64)>>(iter: I) -> Self {
        Self {
            thetas: iter.into_iter().collect(),
        }
    }
}

/// Configuration for LAGO initialization
#[derive(Debug, Clone)]
pub struct LagoConfig {
    /// Variance of the equation fixing the root heading to zero
    pub anchor_variance: f64,
    /// Settings of the default orientation solver
    pub solver: SparseSolverConfig,
}

impl Default for LagoConfig {
    fn default() -> Self {
        Self {
            anchor_variance: DEFAULT_ANCHOR_VARIANCE,
            solver: SparseSolverConfig::default(),
        }
    }
}

/// Orientation initializer with pluggable spanning tree and linear solver
#[derive(Debug, Clone, Default)]
pub struct LagoInitializer<T = PrimSpanningTree, S = SparseOrientationSolver> {
    pub config: LagoConfig,
    tree_service: T,
    solver: S,
}

impl LagoInitializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LagoConfig) -> Self {
        Self {
            solver: SparseOrientationSolver::with_config(config.solver.clone()),
            tree_service: PrimSpanningTree::new(),
            config,
        }
    }
}

impl<T: SpanningTreeService, S: LinearSolver> LagoInitializer<T, S> {
    /// Custom tree and solver; `config.solver` is not applied to `solver`
    pub fn with_services(config: LagoConfig, tree_service: T, solver: S) -> Self {
        Self {
            config,
            tree_service,
            solver,
        }
    }

    /// Headings of every node of the pose subgraph of `graph`
    ///
    /// A graph without relative or prior orientation measurements yields an
    /// empty estimate.
    pub fn initialize_orientations(&self, graph: &FactorGraph) -> Result<OrientationEstimate> {
        let subgraph = build_pose2_graph(graph)?;
        if subgraph.is_empty() {
            debug!("No orientation measurements in {} factors", graph.len());
            return Ok(OrientationEstimate::default());
        }

        let edges: Vec<(Key, Key)> = subgraph.iter().map(|e| e.keys()).collect();
        let tree = self.tree_service.spanning_tree(&edges)?;

        let symbolic = get_symbolic_graph(&tree, &subgraph)?;

        // Unwrapped headings along the tree, used to correct chord wraparound
        let orientations_to_root = compute_thetas_to_root(&symbolic.delta_theta, &tree)?;

        let system = build_orientation_system(
            &symbolic,
            &subgraph,
            &orientations_to_root,
            &tree,
            self.config.anchor_variance,
        )?;

        let thetas = self.solver.solve(&system)?;
        debug!(
            "LAGO: {} nodes from {} edges ({} chords)",
            thetas.len(),
            subgraph.len(),
            symbolic.num_chords()
        );
        Ok(thetas.into())
    }

    /// `initial_guess` with headings replaced by the LAGO estimate
    pub fn initialize_poses(&self, graph: &FactorGraph, initial_guess: &Values) -> Result<Values> {
        let orientations = self.initialize_orientations(graph)?;
        reconstruct_poses(&orientations, initial_guess)
    }
}

/// Headings of the pose subgraph using the default tree and solver
pub fn initialize_orientations(graph: &FactorGraph) -> Result<OrientationEstimate> {
    LagoInitializer::new().initialize_orientations(graph)
}

/// `initial_guess` with headings replaced, using the default tree and solver
pub fn initialize_poses(graph: &FactorGraph, initial_guess: &Values) -> Result<Values> {
    LagoInitializer::new().initialize_poses(graph, initial_guess)
}
