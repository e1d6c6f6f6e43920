//! Constrained Delaunay triangulation and its dual graph.
//!
//! [`Delaunay`] is the entry point: construct from a point set, call
//! [`triangulate`](Delaunay::triangulate), force obstacle edges with
//! [`add_constraint`](Delaunay::add_constraint), carve the exterior with
//! [`classify_regions`](Delaunay::classify_regions), then read the
//! triangles or export the dual graph.

mod constraint;
mod debug;
mod delaunay;
mod graph;
mod mesh;

pub use delaunay::Delaunay;
pub use graph::GraphNode;
pub use mesh::{Triangle, EMPTY};
