//! Cumulative orientation along the spanning tree
//!
//! Orientations are accumulated from each node up to the root without
//! wrapping, so a node reached through several quarter turns keeps the full
//! count of turns. Chord regularization relies on that.

use crate::error::{Error, Result};
use crate::slam::{Key, PredecessorMap};
use std::collections::BTreeMap;

/// Orientation of `node` relative to the root of `tree`
///
/// Walks parent pointers summing tree-edge deltas, and stops early as soon as
/// it reaches a node whose orientation is already in `theta_to_root`.
pub fn compute_theta_to_root(
    node: Key,
    tree: &PredecessorMap,
    delta_theta: &BTreeMap<Key, f64>,
    theta_to_root: &BTreeMap<Key, f64>,
) -> Result<f64> {
    let mut node_theta = 0.0;
    let mut child = node;
    let mut steps = 0usize;

    loop {
        let parent = tree.parent(child)?;
        if parent == child {
            break;
        }

        node_theta += delta_theta.get(&child).ok_or(Error::MissingDelta(child))?;

        if let Some(parent_theta) = theta_to_root.get(&parent) {
            node_theta += parent_theta;
            break;
        }

        child = parent;
        steps += 1;
        if steps > tree.len() {
            return Err(Error::CyclicPredecessorMap(node));
        }
    }

    Ok(node_theta)
}

/// Orientation relative to the root for the root and every node with a delta
pub fn compute_thetas_to_root(delta_theta: &BTreeMap<Key, f64>, tree: &PredecessorMap) -> Result<BTreeMap<Key, f64>> {
    let mut theta_to_root = BTreeMap::new();
    if let Some(root) = tree.root() {
        theta_to_root.insert(root, 0.0);
    }

    for &node in delta_theta.keys() {
        if theta_to_root.contains_key(&node) {
            continue;
        }
        let node_theta = compute_theta_to_root(node, tree, delta_theta, &theta_to_root)?;
        theta_to_root.insert(node, node_theta);
    }

    Ok(theta_to_root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lago::symbolic::get_symbolic_graph;
    use crate::lago::test_fixtures::{simple_subgraph, simple_tree, x};
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_orientations_over_spanning_tree() {
        let tree = simple_tree();
        assert_eq!(tree.parent(x(0)), Ok(x(0)));
        assert_eq!(tree.parent(x(1)), Ok(x(0)));
        assert_eq!(tree.parent(x(2)), Ok(x(0)));
        assert_eq!(tree.parent(x(3)), Ok(x(0)));

        let symbolic = get_symbolic_graph(&tree, &simple_subgraph()).unwrap();
        let actual = compute_thetas_to_root(&symbolic.delta_theta, &tree).unwrap();

        assert_abs_diff_eq!(actual[&x(0)], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(actual[&x(1)], FRAC_PI_2, epsilon = 1e-6);
        // x0->x2 traversed backwards wrt edge (x2, x0)
        assert_abs_diff_eq!(actual[&x(2)], -PI, epsilon = 1e-6);
        assert_abs_diff_eq!(actual[&x(3)], -FRAC_PI_2, epsilon = 1e-6);
    }

    #[test]
    fn test_no_wrapping_along_chain() {
        let tree: PredecessorMap = (0..6).map(|i| (x(i), x(i.saturating_sub(1)))).collect();
        let delta: BTreeMap<Key, f64> = (1..6).map(|i| (x(i), FRAC_PI_2)).collect();

        let theta = compute_thetas_to_root(&delta, &tree).unwrap();
        assert_abs_diff_eq!(theta[&x(5)], 2.5 * PI, epsilon = 1e-12);
        assert_abs_diff_eq!(theta[&x(4)], 2.0 * PI, epsilon = 1e-12);
    }

    #[test]
    fn test_matches_direct_summation_on_random_trees() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let n = rng.gen_range(2..60u64);
            let mut tree = PredecessorMap::new();
            let mut delta = BTreeMap::new();
            tree.insert(x(0), x(0));
            for i in 1..n {
                tree.insert(x(i), x(rng.gen_range(0..i)));
                delta.insert(x(i), rng.gen_range(-PI..PI));
            }

            let theta = compute_thetas_to_root(&delta, &tree).unwrap();
            for i in 0..n {
                let mut expected = 0.0;
                let mut node = x(i);
                while !tree.is_root(node) {
                    expected += delta[&node];
                    node = tree.get(node).unwrap();
                }
                assert_abs_diff_eq!(theta[&x(i)], expected, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_cycle_detected() {
        let tree: PredecessorMap = vec![(x(0), x(0)), (x(1), x(2)), (x(2), x(1))].into_iter().collect();
        let delta: BTreeMap<Key, f64> = vec![(x(1), 0.1), (x(2), 0.2)].into_iter().collect();
        assert_eq!(
            compute_thetas_to_root(&delta, &tree),
            Err(Error::CyclicPredecessorMap(x(1)))
        );
    }

    #[test]
    fn test_missing_delta() {
        let tree: PredecessorMap = vec![(x(0), x(0)), (x(1), x(0)), (x(2), x(1))].into_iter().collect();
        let delta: BTreeMap<Key, f64> = vec![(x(2), 0.2)].into_iter().collect();
        assert_eq!(
            compute_theta_to_root(x(2), &tree, &delta, &BTreeMap::new()),
            Err(Error::MissingDelta(x(1)))
        );
    }

    #[test]
    fn test_root_is_zero() {
        let tree: PredecessorMap = vec![(x(3), x(3))].into_iter().collect();
        let theta = compute_theta_to_root(x(3), &tree, &BTreeMap::new(), &BTreeMap::new()).unwrap();
        assert_eq!(theta, 0.0);
    }
}
