//! Dual-graph export for pathfinding.
//!
//! Each triangle contributes one node placed at its circumcentre (the
//! Voronoi vertex dual to the triangle); edges connect triangles sharing a
//! mesh edge. Downstream consumers supply their own cost metric.

use std::collections::HashMap;

use num_traits::Float;

use crate::triangulation::delaunay::Delaunay;
use crate::triangulation::mesh::EMPTY;

/// A node of the dual graph: one per active triangle, placed at the
/// triangle's circumcentre.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode<F> {
    /// Triangle index this node was derived from.
    pub id: usize,
    /// Circumcentre x coordinate.
    pub x: F,
    /// Circumcentre y coordinate.
    pub y: F,
    /// Indices of the active neighbouring triangles.
    pub neighbors: Vec<usize>,
}

impl<F: Float> Delaunay<F> {
    /// Exports the dual (Voronoi) graph of the active triangles.
    ///
    /// Triangles too close to degenerate for a stable circumcentre are
    /// skipped. Neighbour lists only reference triangles that produced a
    /// node themselves.
    ///
    /// # Example
    ///
    /// ```
    /// use tessella::{Delaunay, Point2};
    ///
    /// let points: Vec<Point2<f64>> = vec![
    ///     Point2::new(0.0, 0.0),
    ///     Point2::new(1.0, 0.0),
    ///     Point2::new(0.0, 1.0),
    /// ];
    /// let mut mesh = Delaunay::new(&points).unwrap();
    /// mesh.triangulate();
    ///
    /// let graph = mesh.export_graph();
    /// assert_eq!(graph.len(), 1);
    ///
    /// // The circumcentre of a right triangle is the hypotenuse midpoint.
    /// let node = &graph[&0];
    /// assert!((node.x - 0.5).abs() < 1e-9);
    /// assert!((node.y - 0.5).abs() < 1e-9);
    /// ```
    pub fn export_graph(&self) -> HashMap<usize, GraphNode<F>> {
        let two = F::from(2.0).unwrap();
        let mut graph = HashMap::new();

        for (i, t) in self.triangles.iter().enumerate() {
            if !t.active {
                continue;
            }

            let p1 = self.points[t.vertices[0]];
            let p2 = self.points[t.vertices[1]];
            let p3 = self.points[t.vertices[2]];

            let d = two * (p1.x * (p2.y - p3.y) + p2.x * (p3.y - p1.y) + p3.x * (p1.y - p2.y));
            if d.abs() < self.eps {
                continue;
            }

            let sq1 = p1.x * p1.x + p1.y * p1.y;
            let sq2 = p2.x * p2.x + p2.y * p2.y;
            let sq3 = p3.x * p3.x + p3.y * p3.y;

            let ux = (sq1 * (p2.y - p3.y) + sq2 * (p3.y - p1.y) + sq3 * (p1.y - p2.y)) / d;
            let uy = (sq1 * (p3.x - p2.x) + sq2 * (p1.x - p3.x) + sq3 * (p2.x - p1.x)) / d;

            let neighbors = t
                .neighbors
                .iter()
                .copied()
                .filter(|&n| n != EMPTY && self.triangles[n].active)
                .collect();

            graph.insert(
                i,
                GraphNode {
                    id: i,
                    x: ux,
                    y: uy,
                    neighbors,
                },
            );
        }
        graph
    }
}
