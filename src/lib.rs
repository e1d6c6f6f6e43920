//! tessella - Constrained Delaunay triangulation for navigable maps
//!
//! Builds a triangle mesh over a point set, forces polygon edges into it as
//! constraints, carves away the regions outside the constrained loops, and
//! exposes the dual (Voronoi) graph for pathfinding on the result.
//!
//! # Example
//!
//! ```
//! use tessella::{Delaunay, Point2};
//!
//! let points: Vec<Point2<f64>> = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(10.0, 0.0),
//!     Point2::new(10.0, 10.0),
//!     Point2::new(0.0, 10.0),
//! ];
//!
//! let mut mesh = Delaunay::new(&points).unwrap();
//! mesh.triangulate();
//! assert_eq!(mesh.triangles().len(), 2);
//!
//! // Force the diagonal and keep only the interior of the square.
//! let u = mesh.find_vertex(Point2::new(0.0, 0.0)).unwrap();
//! let v = mesh.find_vertex(Point2::new(10.0, 10.0)).unwrap();
//! mesh.add_constraint(u, v).unwrap();
//!
//! let graph = mesh.export_graph();
//! assert_eq!(graph.len(), 2);
//! ```

pub mod error;
pub mod primitives;
pub mod tolerance;
pub mod triangulation;

pub use error::TessellaError;
pub use primitives::{Point2, Vec2};
pub use tolerance::{
    in_circumcircle, orient2d, orientation, point_on_segment, segments_intersect_properly,
    Orientation, EPSILON,
};
pub use triangulation::{Delaunay, GraphNode, Triangle, EMPTY};
