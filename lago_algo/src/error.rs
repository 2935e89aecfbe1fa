//! Error types for orientation initialization

use crate::slam::Key;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or solving the orientation system
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The noise model of a measurement has no usable angular standard deviation
    #[error("Invalid noise model on factor ({key1}, {key2}): {reason}")]
    InvalidNoiseModel {
        /// First key of the offending measurement
        key1: Key,
        /// Second key of the offending measurement
        key2: Key,
        /// Why the noise model was rejected
        reason: String,
    },

    /// The rotation measured by a factor is NaN or infinite
    #[error("Non-finite orientation measurement on factor ({key1}, {key2})")]
    InvalidMeasurement {
        /// First key of the offending measurement
        key1: Key,
        /// Second key of the offending measurement
        key2: Key,
    },

    /// The anchor variance is not a positive finite number
    #[error("Invalid anchor variance {0}: must be positive and finite")]
    InvalidAnchorVariance(f64),

    /// A solved node has no entry in the caller-supplied initial guess
    #[error("Missing initial value for {0}")]
    MissingInitialValue(Key),

    /// The linear orientation system could not be factorized
    #[error("Singular orientation system ({unknowns} unknowns)")]
    SingularSystem {
        /// Number of unknowns in the system
        unknowns: usize,
    },

    /// A node cannot be reached from the spanning tree root
    #[error("Node {key} is not connected to the spanning tree root")]
    DisconnectedGraph {
        /// First unreachable node
        key: Key,
    },

    /// A node has no parent in the predecessor map
    #[error("No predecessor for {0}")]
    MissingPredecessor(Key),

    /// A non-root node has no tree-edge delta
    #[error("No tree-edge orientation delta for {0}")]
    MissingDelta(Key),

    /// Walking parent pointers from a node never reached the root
    #[error("Predecessor map contains a cycle reachable from {0}")]
    CyclicPredecessorMap(Key),

    /// A chord endpoint has no orientation relative to the root
    #[error("Node {0} is not covered by the spanning tree")]
    NotInTree(Key),
}
