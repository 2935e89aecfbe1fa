pub mod error;
pub mod lago;
pub mod slam;

pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::lago::{
        initialize_orientations, initialize_poses, LagoConfig, LagoInitializer, OrientationEstimate,
    };
    pub use crate::slam::{
        FactorGraph, Key, NoiseModel, Pose2D, PrimSpanningTree, SparseOrientationSolver, Values, ANCHOR_KEY,
    };
    pub use nalgebra;
}

pub use prelude::*;
