//! Planar rigid-body poses

use nalgebra::{Rotation2, Vector2};
use std::f64::consts::{PI, TAU};

/// Normalize angle to (-π, π]
///
/// Angles already in range are returned bit-for-bit. Non-finite input yields NaN.
pub fn normalize_angle(angle: f64) -> f64 {
    if angle > -PI && angle <= PI {
        return angle;
    }
    // rem_euclid may round up to TAU itself
    let wrapped = PI - (PI - angle).rem_euclid(TAU);
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// A robot pose in the plane (x, y, theta)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose2D {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
}

impl Pose2D {
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }

    pub fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn translation(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    /// Same translation with the heading replaced
    pub fn with_theta(&self, theta: f64) -> Self {
        Self { theta, ..*self }
    }

    /// Relative pose of `other` expressed in this pose's frame
    ///
    /// The heading of the result is wrapped to (-π, π].
    pub fn between(&self, other: &Pose2D) -> Pose2D {
        let local = Rotation2::new(self.theta).inverse() * (other.translation() - self.translation());
        Pose2D::new(local[0], local[1], normalize_angle(other.theta - self.theta))
    }

    /// Compose this pose with a relative motion expressed in its frame
    pub fn compose(&self, delta: &Pose2D) -> Pose2D {
        let t = self.translation() + Rotation2::new(self.theta) * delta.translation();
        Pose2D::new(t[0], t[1], normalize_angle(self.theta + delta.theta))
    }
}
