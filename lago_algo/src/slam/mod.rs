pub mod factor_graph;
pub mod key;
pub mod linear_solver;
pub mod noise;
pub mod pose;
pub mod spanning_tree;

pub use factor_graph::*;
pub use key::*;
pub use linear_solver::*;
pub use noise::*;
pub use pose::*;
pub use spanning_tree::*;
