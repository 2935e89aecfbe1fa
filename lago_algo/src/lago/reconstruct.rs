//! Merge solved orientations into pose estimates

use super::OrientationEstimate;
use crate::error::Result;
use crate::slam::Values;

/// Replace the heading of every solved pose in `initial_guess`
///
/// Translations are copied unchanged. The anchor is skipped; any other solved
/// key missing from `initial_guess` is an error.
pub fn reconstruct_poses(orientations: &OrientationEstimate, initial_guess: &Values) -> Result<Values> {
    let mut poses = Values::new();
    for (key, theta) in orientations.iter() {
        if key.is_anchor() {
            continue;
        }
        let pose = initial_guess.at(key)?;
        poses.insert(key, pose.with_theta(theta));
    }
    Ok(poses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::lago::test_fixtures::x;
    use crate::slam::{Pose2D, ANCHOR_KEY};

    #[test]
    fn test_translation_untouched() {
        let orientations: OrientationEstimate =
            vec![(ANCHOR_KEY, 0.0), (x(0), 0.1), (x(1), -2.0)].into_iter().collect();
        let initial: Values = vec![
            (x(0), Pose2D::new(0.123456789, -9.87654321, 3.0)),
            (x(1), Pose2D::new(1e-17, 4e12, 0.0)),
            (x(2), Pose2D::new(5.0, 5.0, 5.0)),
        ]
        .into_iter()
        .collect();

        let poses = reconstruct_poses(&orientations, &initial).unwrap();
        assert_eq!(poses.len(), 2);
        assert!(!poses.contains(ANCHOR_KEY));
        assert!(!poses.contains(x(2)));

        let p0 = poses.at(x(0)).unwrap();
        assert_eq!(p0.x.to_bits(), 0.123456789f64.to_bits());
        assert_eq!(p0.y.to_bits(), (-9.87654321f64).to_bits());
        assert_eq!(p0.theta, 0.1);

        let p1 = poses.at(x(1)).unwrap();
        assert_eq!(p1.x.to_bits(), 1e-17f64.to_bits());
        assert_eq!(p1.y.to_bits(), 4e12f64.to_bits());
        assert_eq!(p1.theta, -2.0);
    }

    #[test]
    fn test_missing_initial_value() {
        let orientations: OrientationEstimate = vec![(x(0), 0.0), (x(4), 1.0)].into_iter().collect();
        let initial: Values = vec![(x(0), Pose2D::origin())].into_iter().collect();
        assert_eq!(
            reconstruct_poses(&orientations, &initial),
            Err(Error::MissingInitialValue(x(4)))
        );
    }
}
