//! Spanning-tree edges and chords
//!
//! Given a spanning tree, every edge of the pose subgraph either joins a node
//! to its parent (a tree edge) or closes a cycle (a chord). Tree edges also
//! give the relative orientation of each child with respect to its parent.

use super::subgraph::OrientationEdge;
use crate::error::Result;
use crate::slam::{Key, PredecessorMap};
use log::debug;
use std::collections::BTreeMap;

/// Partition of the subgraph with respect to a spanning tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolicGraph {
    /// Subgraph slots of tree edges, in subgraph order
    pub spanning_tree_ids: Vec<usize>,
    /// Subgraph slots of chords, in subgraph order
    pub chord_ids: Vec<usize>,
    /// theta(child) - theta(parent) for every child reached by a tree edge
    pub delta_theta: BTreeMap<Key, f64>,
}

impl SymbolicGraph {
    pub fn num_tree_edges(&self) -> usize {
        self.spanning_tree_ids.len()
    }

    pub fn num_chords(&self) -> usize {
        self.chord_ids.len()
    }
}

/// Split `subgraph` into tree edges and chords of `tree`
///
/// Parallel edges between a parent and its child are all tree edges; the
/// first one in subgraph order defines the child's delta. Self-loops are
/// always chords.
pub fn get_symbolic_graph(tree: &PredecessorMap, subgraph: &[OrientationEdge]) -> Result<SymbolicGraph> {
    let mut symbolic = SymbolicGraph::default();

    for (id, edge) in subgraph.iter().enumerate() {
        let (key1, key2) = edge.keys();
        let parent1 = tree.parent(key1)?;
        let parent2 = tree.parent(key2)?;

        let in_tree = if key1 == key2 {
            false
        } else if parent2 == key1 {
            symbolic.delta_theta.entry(key2).or_insert(edge.delta);
            true
        } else if parent1 == key2 {
            symbolic.delta_theta.entry(key1).or_insert(-edge.delta);
            true
        } else {
            false
        };

        if in_tree {
            symbolic.spanning_tree_ids.push(id);
        } else {
            symbolic.chord_ids.push(id);
        }
    }

    debug!(
        "Symbolic graph: {} tree edges, {} chords",
        symbolic.num_tree_edges(),
        symbolic.num_chords()
    );
    Ok(symbolic)
}
