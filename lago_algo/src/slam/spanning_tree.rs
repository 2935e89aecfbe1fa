//! Spanning trees over pose graphs
//!
//! A spanning tree is stored as a predecessor map: every node points to its
//! parent and the root points to itself.
//!
//! The default service grows the tree from the smallest key. All edges carry
//! the same weight, so Prim's algorithm reduces to expanding candidate edges
//! in the order they are discovered. Ties are therefore broken by the input
//! order of the edges and the resulting tree is deterministic.

use super::key::Key;
use crate::error::{Error, Result};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Parent pointer for every node of a rooted tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredecessorMap {
    parents: BTreeMap<Key, Key>,
}

impl PredecessorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the parent of `child`; a node that is its own parent is a root
    pub fn insert(&mut self, child: Key, parent: Key) {
        self.parents.insert(child, parent);
    }

    pub fn get(&self, key: Key) -> Option<Key> {
        self.parents.get(&key).copied()
    }

    /// Parent of `key`, failing if the key is not in the tree
    pub fn parent(&self, key: Key) -> Result<Key> {
        self.get(key).ok_or(Error::MissingPredecessor(key))
    }

    pub fn is_root(&self, key: Key) -> bool {
        self.get(key) == Some(key)
    }

    /// First node that is its own parent
    pub fn root(&self) -> Option<Key> {
        self.parents
            .iter()
            .find(|(child, parent)| child == parent)
            .map(|(child, _)| *child)
    }

    pub fn contains(&self, key: Key) -> bool {
        self.parents.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Key, Key)> + '_ {
        self.parents.iter().map(|(c, p)| (*c, *p))
    }
}

impl FromIterator<(Key, Key)> for PredecessorMap {
    fn from_iter<I: IntoIterator<Item = (Key, Key)>>(iter: I) -> Self {
        Self {
            parents: iter.into_iter().collect(),
        }
    }
}

/// Builds a rooted spanning tree over an undirected edge list
pub trait SpanningTreeService {
    /// Return a predecessor map covering every node of `edges`
    ///
    /// Implementations must produce exactly one root and fail if some node
    /// cannot be reached from it.
    fn spanning_tree(&self, edges: &[(Key, Key)]) -> Result<PredecessorMap>;
}

/// Uniform-weight Prim spanning tree rooted at the smallest key
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimSpanningTree;

impl PrimSpanningTree {
    pub fn new() -> Self {
        Self
    }
}

impl SpanningTreeService for PrimSpanningTree {
    fn spanning_tree(&self, edges: &[(Key, Key)]) -> Result<PredecessorMap> {
        // Adjacency lists keep the input order of the edges
        let mut neighbors: BTreeMap<Key, Vec<Key>> = BTreeMap::new();
        for &(a, b) in edges {
            neighbors.entry(a).or_default();
            neighbors.entry(b).or_default();
            if a != b {
                neighbors.entry(a).or_default().push(b);
                neighbors.entry(b).or_default().push(a);
            }
        }

        let mut tree = PredecessorMap::new();
        let root = match neighbors.keys().next() {
            Some(&root) => root,
            None => return Ok(tree),
        };

        let mut open_set = VecDeque::new();
        let mut closed_set = BTreeSet::new();
        open_set.push_back((root, root));

        while let Some((node, parent)) = open_set.pop_front() {
            if !closed_set.insert(node) {
                continue;
            }
            tree.insert(node, parent);

            for &next in &neighbors[&node] {
                if !closed_set.contains(&next) {
                    open_set.push_back((next, node));
                }
            }
        }

        if let Some(&key) = neighbors.keys().find(|k| !closed_set.contains(*k)) {
            return Err(Error::DisconnectedGraph { key });
        }

        Ok(tree)
    }
}
