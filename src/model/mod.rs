//! Tree data model: arena [Tree](tree::Tree) of [Vertex](vertex::Vertex) values.

/// Phylogenetic tree structure and operations
pub mod tree;
/// Tree vertices and branch lengths
pub mod vertex;

pub use tree::{Tree, VertexIndex};
pub use vertex::{BranchLength, Vertex};
