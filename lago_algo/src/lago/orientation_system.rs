//! Linear orientation system with regularized chords
//!
//! A chord `(a, b)` with measurement `d` closes the cycle formed with the tree
//! path from `b` back to `a`. Summing the measurement and the path gives
//!
//! ```text
//! k2π = d + θ_root(a) - θ_root(b)
//! ```
//!
//! which must be a multiple of 2π in the noiseless case. The chord is replaced
//! by `d - 2kπ` with `k` the nearest integer, so every equation of the system
//! agrees with the unwrapped tree orientations.
//!
//! Rounding assumes the accumulated cycle error is less than half a turn; a
//! chord that drifted by more than π is corrected to the wrong turn.

use super::subgraph::OrientationEdge;
use super::symbolic::SymbolicGraph;
use crate::error::{Error, Result};
use crate::slam::{Key, LinearEquation, LinearSystem, PredecessorMap};
use log::{debug, trace};
use std::collections::BTreeMap;
use std::f64::consts::TAU;

/// Variance of the equation pinning the root orientation to zero
pub const DEFAULT_ANCHOR_VARIANCE: f64 = 1e-8;

/// Chord measurement with its wraparound removed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegularizedChord {
    pub delta: f64,
    /// Number of full turns removed from the raw measurement
    pub turns: f64,
}

/// Remove the nearest multiple of 2π from the cycle closed by a chord
///
/// `theta1` and `theta2` are the unwrapped orientations of the chord's
/// endpoints relative to the root. Half turns round away from zero.
pub fn regularize_chord(delta: f64, theta1: f64, theta2: f64) -> RegularizedChord {
    let k2pi = delta + theta1 - theta2;
    let turns = (k2pi / TAU).round();
    RegularizedChord {
        delta: delta - turns * TAU,
        turns,
    }
}

fn theta_of(theta_to_root: &BTreeMap<Key, f64>, key: Key) -> Result<f64> {
    theta_to_root.get(&key).copied().ok_or(Error::NotInTree(key))
}

/// Assemble one equation per subgraph edge plus the root anchor
///
/// Equations are ordered as tree edges, then chords (both in subgraph order),
/// then the anchor.
pub fn build_orientation_system(
    symbolic: &SymbolicGraph,
    subgraph: &[OrientationEdge],
    theta_to_root: &BTreeMap<Key, f64>,
    tree: &PredecessorMap,
    anchor_variance: f64,
) -> Result<LinearSystem> {
    if !(anchor_variance > 0.0 && anchor_variance.is_finite()) {
        return Err(Error::InvalidAnchorVariance(anchor_variance));
    }
    let mut system = LinearSystem::new();

    for &id in &symbolic.spanning_tree_ids {
        let edge = &subgraph[id];
        system.push(LinearEquation::relative(
            edge.key1,
            edge.key2,
            edge.delta,
            edge.angular_sigma()?,
        ));
    }

    for &id in &symbolic.chord_ids {
        let edge = &subgraph[id];
        let sigma = edge.angular_sigma()?;
        let chord = regularize_chord(
            edge.delta,
            theta_of(theta_to_root, edge.key1)?,
            theta_of(theta_to_root, edge.key2)?,
        );
        if chord.turns != 0.0 {
            trace!(
                "Chord ({}, {}): removed {} turns, {:.6} -> {:.6}",
                edge.key1,
                edge.key2,
                chord.turns,
                edge.delta,
                chord.delta
            );
        }
        system.push(LinearEquation::relative(edge.key1, edge.key2, chord.delta, sigma));
    }

    if let Some(root) = tree.root() {
        system.push(LinearEquation::unary(root, 0.0, anchor_variance.sqrt()));
    }

    debug!("Orientation system: {} equations", system.len());
    Ok(system)
}
