//! # ember_structures - Spatial Grouping Structures
//!
//! Scene-processing containers that sit on top of the math kernel:
//! - UnionFind: disjoint sets with union by rank and path compression
//! - kruskal: minimum spanning forest over weighted edges
//! - DepthCluster: back-to-front sort with material run extraction

pub mod depth_cluster;
pub mod union_find;

pub use depth_cluster::{DepthCluster, DepthEntry};
pub use union_find::{kruskal, Edge, MinimumSpanningTree, UnionFind};

pub mod prelude {
    pub use crate::depth_cluster::{DepthCluster, DepthEntry};
    pub use crate::union_find::{kruskal, Edge, MinimumSpanningTree, UnionFind};
}
