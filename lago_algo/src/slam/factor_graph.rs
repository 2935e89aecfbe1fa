//! Planar factor graph container
//!
//! This module holds the measurements of a planar pose graph:
//! - Between factors: relative pose or rotation between two nodes (odometry,
//!   loop closures)
//! - Prior factors: absolute pose or rotation of one node
//! - Landmark factors: point priors and bearing-range observations
//!
//! Factors are stored in insertion order. Downstream stages refer to factors
//! by their slot in this order, so the order is part of the graph's identity.

use super::key::Key;
use super::noise::NoiseModel;
use super::pose::Pose2D;
use crate::error::{Error, Result};
use nalgebra::Vector2;
use std::collections::BTreeMap;

/// A measurement in the factor graph
#[derive(Debug, Clone, PartialEq)]
pub enum Factor {
    /// Relative pose of `to` in the frame of `from`
    BetweenPose2 {
        from: Key,
        to: Key,
        measured: Pose2D,
        noise: NoiseModel,
    },
    /// Relative rotation from `from` to `to` (radians)
    BetweenRot2 {
        from: Key,
        to: Key,
        measured: f64,
        noise: NoiseModel,
    },
    /// Absolute pose of `key`
    PriorPose2 {
        key: Key,
        prior: Pose2D,
        noise: NoiseModel,
    },
    /// Absolute heading of `key` (radians)
    PriorRot2 {
        key: Key,
        prior: f64,
        noise: NoiseModel,
    },
    /// Absolute position of a landmark
    PriorPoint2 {
        key: Key,
        prior: Vector2<f64>,
        noise: NoiseModel,
    },
    /// Bearing and range from a pose to a landmark
    BearingRange {
        pose: Key,
        landmark: Key,
        bearing: f64,
        range: f64,
        noise: NoiseModel,
    },
}

impl Factor {
    /// Keys this factor constrains, in measurement order
    pub fn keys(&self) -> Vec<Key> {
        match self {
            Factor::BetweenPose2 { from, to, .. } | Factor::BetweenRot2 { from, to, .. } => {
                vec![*from, *to]
            }
            Factor::PriorPose2 { key, .. }
            | Factor::PriorRot2 { key, .. }
            | Factor::PriorPoint2 { key, .. } => vec![*key],
            Factor::BearingRange { pose, landmark, .. } => vec![*pose, *landmark],
        }
    }

    pub fn noise(&self) -> &NoiseModel {
        match self {
            Factor::BetweenPose2 { noise, .. }
            | Factor::BetweenRot2 { noise, .. }
            | Factor::PriorPose2 { noise, .. }
            | Factor::PriorRot2 { noise, .. }
            | Factor::PriorPoint2 { noise, .. }
            | Factor::BearingRange { noise, .. } => noise,
        }
    }
}

/// Ordered collection of factors
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactorGraph {
    factors: Vec<Factor>,
}

impl FactorGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a factor, returns its slot
    pub fn add(&mut self, factor: Factor) -> usize {
        let idx = self.factors.len();
        self.factors.push(factor);
        idx
    }

    /// Add a relative pose measurement between two poses
    pub fn add_between(&mut self, from: Key, to: Key, measured: Pose2D, noise: NoiseModel) -> usize {
        self.add(Factor::BetweenPose2 {
            from,
            to,
            measured,
            noise,
        })
    }

    /// Add a relative rotation measurement between two poses
    pub fn add_between_rot(&mut self, from: Key, to: Key, measured: f64, noise: NoiseModel) -> usize {
        self.add(Factor::BetweenRot2 {
            from,
            to,
            measured,
            noise,
        })
    }

    /// Add an absolute pose prior
    pub fn add_prior(&mut self, key: Key, prior: Pose2D, noise: NoiseModel) -> usize {
        self.add(Factor::PriorPose2 { key, prior, noise })
    }

    /// Add an absolute heading prior
    pub fn add_prior_rot(&mut self, key: Key, prior: f64, noise: NoiseModel) -> usize {
        self.add(Factor::PriorRot2 { key, prior, noise })
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Factor> {
        self.factors.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Factor> {
        self.factors.iter()
    }
}

impl FromIterator<Factor> for FactorGraph {
    fn from_iter<I: IntoIterator<Item = Factor>>(iter: I) -> Self {
        Self {
            factors: iter.into_iter().collect(),
        }
    }
}

/// Pose estimates indexed by key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Values {
    poses: BTreeMap<Key, Pose2D>,
}

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the pose of `key`
    pub fn insert(&mut self, key: Key, pose: Pose2D) -> Option<Pose2D> {
        self.poses.insert(key, pose)
    }

    pub fn get(&self, key: Key) -> Option<&Pose2D> {
        self.poses.get(&key)
    }

    /// Pose of `key`, failing if the key has no value
    pub fn at(&self, key: Key) -> Result<Pose2D> {
        self.poses
            .get(&key)
            .copied()
            .ok_or(Error::MissingInitialValue(key))
    }

    pub fn contains(&self, key: Key) -> bool {
        self.poses.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.poses.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Key, &Pose2D)> {
        self.poses.iter().map(|(k, p)| (*k, p))
    }
}

impl FromIterator<(Key, Pose2D)> for Values {
    fn from_iter<I: IntoIterator<Item = (Key, Pose2D)>>(iter: I) -> Self {
        Self {
            poses: iter.into_iter().collect(),
        }
    }
}
