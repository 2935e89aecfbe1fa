//! Shared fixtures for the orientation initialization tests
//!
//! Four poses on a loop:
//!
//! ```text
//!                 x2            edges
//!               / | \           0: x0 -> x1
//!              /  |  \          1: x1 -> x2
//!            x3   |   x1        2: x2 -> x3
//!              \  |  /          3: x2 -> x0
//!               \ | /           4: x0 -> x3
//!                 x0
//! ```

use super::subgraph::{build_pose2_graph, OrientationEdge};
use crate::slam::{FactorGraph, Key, NoiseModel, Pose2D, PredecessorMap, PrimSpanningTree, SpanningTreeService};
use std::f64::consts::{FRAC_PI_2, PI};

pub fn x(i: u64) -> Key {
    Key::symbol('x', i)
}

pub fn ground_truth() -> [Pose2D; 4] {
    [
        Pose2D::new(0.0, 0.0, 0.0),
        Pose2D::new(1.0, 1.0, FRAC_PI_2),
        Pose2D::new(0.0, 2.0, PI),
        Pose2D::new(-1.0, 1.0, 1.5 * PI),
    ]
}

pub fn model() -> NoiseModel {
    NoiseModel::isotropic(3, 0.1)
}

/// Relative pose from pose `i` to pose `j` with an exact heading delta
fn measured(i: usize, j: usize, theta: f64) -> Pose2D {
    let poses = ground_truth();
    poses[i].between(&poses[j]).with_theta(theta)
}

/// The five loop edges, without priors
pub fn loop_graph() -> FactorGraph {
    let mut graph = FactorGraph::new();
    graph.add_between(x(0), x(1), measured(0, 1, FRAC_PI_2), model());
    graph.add_between(x(1), x(2), measured(1, 2, FRAC_PI_2), model());
    graph.add_between(x(2), x(3), measured(2, 3, FRAC_PI_2), model());
    graph.add_between(x(2), x(0), measured(2, 0, PI), model());
    graph.add_between(x(0), x(3), measured(0, 3, -FRAC_PI_2), model());
    graph
}

/// The loop plus a zero prior on x0
pub fn simple_graph() -> FactorGraph {
    let mut graph = loop_graph();
    graph.add_prior(x(0), ground_truth()[0], model());
    graph
}

pub fn simple_subgraph() -> Vec<OrientationEdge> {
    build_pose2_graph(&loop_graph()).unwrap()
}

pub fn simple_tree() -> PredecessorMap {
    let edges: Vec<_> = simple_subgraph().iter().map(|e| e.keys()).collect();
    PrimSpanningTree::new()
        .spanning_tree(&edges)
        .expect("loop graph is connected")
}
