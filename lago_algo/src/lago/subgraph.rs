//! Measurement subgraph extraction
//!
//! Reduces a heterogeneous factor graph to relative-orientation edges between
//! poses. Absolute priors become edges from [`ANCHOR_KEY`] to the constrained
//! node, so the rest of the pipeline only ever sees one edge type.

use crate::error::{Error, Result};
use crate::slam::{normalize_angle, Factor, FactorGraph, Key, NoiseModel, ANCHOR_KEY};
use log::{debug, trace};

/// Component of a `Pose2D` measurement holding the rotation
const POSE2_ROTATION_COMPONENT: usize = 2;
/// Component of a rotation-only measurement holding the rotation
const ROT2_ROTATION_COMPONENT: usize = 0;

/// Origin of a relative-orientation edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementKind {
    PoseBetween,
    RotationBetween,
    PosePrior,
    RotationPrior,
}

impl MeasurementKind {
    /// Index of the rotation in the measurement vector of this kind
    pub fn rotation_component(&self) -> usize {
        match self {
            MeasurementKind::PoseBetween | MeasurementKind::PosePrior => POSE2_ROTATION_COMPONENT,
            MeasurementKind::RotationBetween | MeasurementKind::RotationPrior => {
                ROT2_ROTATION_COMPONENT
            }
        }
    }

    pub fn is_prior(&self) -> bool {
        matches!(self, MeasurementKind::PosePrior | MeasurementKind::RotationPrior)
    }
}

/// Relative orientation measured from `key1` to `key2`
#[derive(Debug, Clone, PartialEq)]
pub struct OrientationEdge {
    pub key1: Key,
    pub key2: Key,
    /// theta(key2) - theta(key1), wrapped to (-π, π]
    pub delta: f64,
    pub noise: NoiseModel,
    pub kind: MeasurementKind,
    /// Slot of the originating factor in the input graph
    pub source: usize,
}

impl OrientationEdge {
    /// Standard deviation of the angular part of the measurement
    pub fn angular_sigma(&self) -> Result<f64> {
        self.noise
            .sigma(self.kind.rotation_component())
            .map_err(|reason| Error::InvalidNoiseModel {
                key1: self.key1,
                key2: self.key2,
                reason,
            })
    }

    pub fn keys(&self) -> (Key, Key) {
        (self.key1, self.key2)
    }
}

/// Relative-orientation subgraph in input order
pub type PoseSubgraph = Vec<OrientationEdge>;

/// Map a single factor to a relative-orientation edge, if it carries one
fn to_orientation_edge(source: usize, factor: &Factor) -> Result<Option<OrientationEdge>> {
    let (key1, key2, theta, noise, kind) = match factor {
        Factor::BetweenPose2 {
            from,
            to,
            measured,
            noise,
        } => (*from, *to, measured.theta, noise, MeasurementKind::PoseBetween),
        Factor::BetweenRot2 {
            from,
            to,
            measured,
            noise,
        } => (*from, *to, *measured, noise, MeasurementKind::RotationBetween),
        Factor::PriorPose2 { key, prior, noise } => {
            (ANCHOR_KEY, *key, prior.theta, noise, MeasurementKind::PosePrior)
        }
        Factor::PriorRot2 { key, prior, noise } => {
            (ANCHOR_KEY, *key, *prior, noise, MeasurementKind::RotationPrior)
        }
        Factor::PriorPoint2 { .. } | Factor::BearingRange { .. } => return Ok(None),
    };

    if !theta.is_finite() {
        return Err(Error::InvalidMeasurement { key1, key2 });
    }

    Ok(Some(OrientationEdge {
        key1,
        key2,
        delta: normalize_angle(theta),
        noise: noise.clone(),
        kind,
        source,
    }))
}

/// Select the planar pose subgraph and turn priors into anchor edges
///
/// Fails on the first factor whose rotation is not finite.
pub fn build_pose2_graph(graph: &FactorGraph) -> Result<PoseSubgraph> {
    let mut subgraph = Vec::with_capacity(graph.len());
    for (source, factor) in graph.iter().enumerate() {
        match to_orientation_edge(source, factor)? {
            Some(edge) => subgraph.push(edge),
            None => trace!("Skipping factor {} on {:?}: no orientation", source, factor.keys()),
        }
    }

    debug!(
        "Pose subgraph: {} of {} factors ({} anchor edges)",
        subgraph.len(),
        graph.len(),
        subgraph.iter().filter(|e| e.kind.is_prior()).count()
    );
    Ok(subgraph)
}
