//! Segment constraint enforcement and region carving.
//!
//! Constraints are forced into an existing triangulation by Sloan's method:
//! walk the mesh along the segment collecting every crossed edge, then flip
//! crossed edges whose surrounding quadrilateral is convex until none
//! remain, and finally mark the surviving edge on both sides. No
//! re-legalisation happens afterwards; the constrained-Delaunay property
//! replaces the pure one along forced edges.

use std::collections::VecDeque;

use num_traits::Float;

use crate::error::TessellaError;
use crate::tolerance::{orient2d, point_on_segment, segments_intersect_properly};
use crate::triangulation::delaunay::Delaunay;
use crate::triangulation::mesh::{self, EMPTY};

/// Identifies a directed mesh edge: the edge of triangle `tri` opposite
/// vertex slot `edge`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EdgeRef {
    pub tri: usize,
    pub edge: usize,
}

impl<F: Float> Delaunay<F> {
    /// Forces the segment between vertices `u` and `v` into the mesh as a
    /// constrained edge.
    ///
    /// Call after [`triangulate`](Delaunay::triangulate) and before
    /// [`classify_regions`](Delaunay::classify_regions). Adding an already
    /// constrained edge again is a no-op. When the segment passes through
    /// another vertex, it is split there and both halves are enforced.
    ///
    /// # Errors
    ///
    /// [`TessellaError::IndexOutOfRange`] for an invalid vertex index, and
    /// the `Trace*` variants when the walk cannot complete. Flips performed
    /// before a failure are not rolled back.
    ///
    /// # Example
    ///
    /// ```
    /// use tessella::{Delaunay, Point2};
    ///
    /// let points: Vec<Point2<f64>> = vec![
    ///     Point2::new(0.0, 0.0),
    ///     Point2::new(10.0, 0.0),
    ///     Point2::new(10.0, 10.0),
    ///     Point2::new(0.0, 10.0),
    /// ];
    /// let mut mesh = Delaunay::new(&points).unwrap();
    /// mesh.triangulate();
    ///
    /// let u = mesh.find_vertex(Point2::new(0.0, 0.0)).unwrap();
    /// let v = mesh.find_vertex(Point2::new(10.0, 10.0)).unwrap();
    /// mesh.add_constraint(u, v).unwrap();
    /// ```
    pub fn add_constraint(&mut self, u: usize, v: usize) -> Result<(), TessellaError> {
        let len = self.points.len();
        if u >= len {
            return Err(TessellaError::IndexOutOfRange { index: u, len });
        }
        if v >= len {
            return Err(TessellaError::IndexOutOfRange { index: v, len });
        }
        if u == v {
            return Ok(());
        }

        // Segments still to enforce. A collinear mid-vertex splits the
        // current segment in two; pushing the halves to the front keeps
        // them in order without recursing.
        let mut pending = VecDeque::new();
        pending.push_back((u, v));

        'segments: while let Some((a, b)) = pending.pop_front() {
            if a == b {
                continue;
            }
            loop {
                let (crossings, split) = self.find_intersecting_edges(a, b)?;

                if let Some(k) = split {
                    pending.push_front((k, b));
                    pending.push_front((a, k));
                    continue 'segments;
                }
                if crossings.is_empty() {
                    break;
                }
                self.resolve_intersections(a, b, &crossings)?;
            }
            self.mark_constraint(a, b);
        }
        Ok(())
    }

    /// Classifies triangles into interior and exterior and drops the
    /// exterior ones.
    ///
    /// Every active triangle starts as interior; a BFS seeded from hull
    /// triangles with an unconstrained boundary edge floods outward-reachable
    /// triangles across unconstrained edges and marks them exterior. The
    /// survivors are compacted and their neighbour indices remapped.
    ///
    /// Assumes constraints form closed loops: the flood leaks through any
    /// gap in an open chain and removes the triangles behind it.
    pub fn classify_regions(&mut self) {
        for t in &mut self.triangles {
            t.inside = true;
        }

        let len = self.triangles.len();
        let mut visited = vec![false; len];
        let mut queue = VecDeque::new();

        for i in 0..len {
            if !self.triangles[i].active {
                continue;
            }
            let t = &self.triangles[i];
            let leaky = (0..3).any(|s| t.neighbors[s] == EMPTY && !t.constrained[s]);
            if leaky {
                visited[i] = true;
                self.triangles[i].inside = false;
                queue.push_back(i);
            }
        }

        while let Some(i) = queue.pop_front() {
            let neighbors = self.triangles[i].neighbors;
            let constrained = self.triangles[i].constrained;
            for s in 0..3 {
                let n = neighbors[s];
                if n == EMPTY || constrained[s] || visited[n] {
                    continue;
                }
                visited[n] = true;
                self.triangles[n].inside = false;
                queue.push_back(n);
            }
        }

        mesh::compact(&mut self.triangles, |t| t.active && t.inside);
        self.last_created = 0;
    }

    /// Walks from `u` toward `v`, collecting every edge the segment strictly
    /// crosses.
    ///
    /// Returns the crossed edges and, when the segment passes through a
    /// vertex short of `v`, that vertex as a split point.
    pub(crate) fn find_intersecting_edges(
        &self,
        u: usize,
        v: usize,
    ) -> Result<(Vec<EdgeRef>, Option<usize>), TessellaError> {
        if u == v {
            return Ok((Vec::new(), None));
        }
        let pu = self.points[u];
        let pv = self.points[v];

        // Find a triangle incident to u whose angular cone faces v; its
        // opposite edge is the first candidate crossing.
        let mut start = None;
        for (i, t) in self.triangles.iter().enumerate() {
            if !t.active {
                continue;
            }
            let slot = match t.slot_of_vertex(u) {
                Some(slot) => slot,
                None => continue,
            };
            let (ia, ib) = t.edge(slot);
            if orient2d(pu, self.points[ia], pv) >= -self.eps
                && orient2d(pu, self.points[ib], pv) <= self.eps
            {
                // A neighbour of u sitting on the segment is a split vertex
                // the walk below would otherwise step straight past.
                if ia != v && point_on_segment(self.points[ia], pu, pv, self.eps) {
                    return Ok((Vec::new(), Some(ia)));
                }
                if ib != v && point_on_segment(self.points[ib], pu, pv, self.eps) {
                    return Ok((Vec::new(), Some(ib)));
                }
                start = Some(EdgeRef { tri: i, edge: slot });
                break;
            }
        }
        let mut curr = match start {
            Some(e) => e,
            None => return Err(TessellaError::TraceStart { vertex: u }),
        };

        let mut crossings = Vec::new();
        let limit = self.triangles.len();

        for _ in 0..limit {
            let t = &self.triangles[curr.tri];
            let (p1, p2) = t.edge(curr.edge);

            if p1 == v || p2 == v {
                return Ok((crossings, None));
            }

            crossings.push(curr);

            let n_idx = t.neighbors[curr.edge];
            if n_idx == EMPTY {
                return Err(TessellaError::TraceBoundary { target: v });
            }

            let nt = &self.triangles[n_idx];
            let mut entry = 2;
            for slot in 0..2 {
                let (a, b) = nt.edge(slot);
                if (a == p1 && b == p2) || (a == p2 && b == p1) {
                    entry = slot;
                    break;
                }
            }

            let opp = nt.vertices[entry];
            if opp != v && opp != u && point_on_segment(self.points[opp], pu, pv, self.eps) {
                return Ok((crossings, Some(opp)));
            }

            let e1 = (entry + 1) % 3;
            let e2 = (entry + 2) % 3;
            let (a1, b1) = nt.edge(e1);
            let (a2, b2) = nt.edge(e2);

            if segments_intersect_properly(pu, pv, self.points[a1], self.points[b1]) {
                curr = EdgeRef { tri: n_idx, edge: e1 };
            } else if segments_intersect_properly(pu, pv, self.points[a2], self.points[b2]) {
                curr = EdgeRef { tri: n_idx, edge: e2 };
            } else {
                // Neither exit edge strictly crosses, so the segment is
                // passing through the vertex between them even when the
                // on-segment test waved it off.
                if opp == v {
                    return Ok((crossings, None));
                }
                if opp == u {
                    return Err(TessellaError::TraceCycle { start: u });
                }
                return Ok((crossings, Some(opp)));
            }
        }
        Err(TessellaError::TraceLimit { limit })
    }

    /// Flips one flippable crossed edge, preferring the candidate whose new
    /// diagonal is shortest so near-degenerate quadrilaterals are rotated
    /// away from collapse.
    fn resolve_intersections(
        &mut self,
        u: usize,
        v: usize,
        crossings: &[EdgeRef],
    ) -> Result<(), TessellaError> {
        let mut best: Option<(EdgeRef, F)> = None;
        for &e in crossings {
            if !self.is_convex(e) {
                continue;
            }
            let t = &self.triangles[e.tri];
            let n_idx = t.neighbors[e.edge];
            let n = &self.triangles[n_idx];
            let nslot = n
                .slot_of_neighbor(e.tri)
                .expect("neighbour symmetry invariant violated");
            let p = self.points[t.vertices[e.edge]];
            let q = self.points[n.vertices[nslot]];
            let diagonal = p.distance_squared(q);
            if best.map_or(true, |(_, d)| diagonal < d) {
                best = Some((e, diagonal));
            }
        }

        match best {
            Some((e, _)) => {
                let n_idx = self.triangles[e.tri].neighbors[e.edge];
                self.flip_edge(e.tri, n_idx);
                Ok(())
            }
            None => Err(TessellaError::TraceStuck { u, v }),
        }
    }

    /// Relaxed convexity test for the quadrilateral around a crossed edge:
    /// the opposite vertices must lie on opposite sides of the edge and of
    /// each other's diagonal, allowing collinearity within tolerance.
    fn is_convex(&self, e: EdgeRef) -> bool {
        let t = &self.triangles[e.tri];
        let n_idx = t.neighbors[e.edge];
        if n_idx == EMPTY {
            return false;
        }
        let n = &self.triangles[n_idx];

        let (ui, vi) = t.edge(e.edge);
        let u = self.points[ui];
        let v = self.points[vi];
        let p = self.points[t.vertices[e.edge]];

        let nslot = n
            .slot_of_neighbor(e.tri)
            .expect("neighbour symmetry invariant violated");
        let q = self.points[n.vertices[nslot]];

        orient2d(u, v, p) * orient2d(u, v, q) <= self.eps
            && orient2d(p, q, u) * orient2d(p, q, v) <= self.eps
    }

    /// Sets the constrained flag on both triangles flanking the edge `u-v`.
    fn mark_constraint(&mut self, u: usize, v: usize) {
        for t in &mut self.triangles {
            if !t.active {
                continue;
            }
            for slot in 0..3 {
                let (a, b) = t.edge(slot);
                if (a == u && b == v) || (a == v && b == u) {
                    t.constrained[slot] = true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Point2;
    use crate::triangulation::delaunay::checks::{assert_delaunay, assert_topology};

    fn pts(coords: &[(f64, f64)]) -> Vec<Point2<f64>> {
        coords.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    fn triangulated(coords: &[(f64, f64)]) -> Delaunay<f64> {
        let mut d = Delaunay::new(&pts(coords)).unwrap();
        d.triangulate();
        d
    }

    fn vertex(d: &Delaunay<f64>, x: f64, y: f64) -> usize {
        d.find_vertex(Point2::new(x, y)).unwrap()
    }

    fn constrain(d: &mut Delaunay<f64>, a: (f64, f64), b: (f64, f64)) {
        let u = vertex(d, a.0, a.1);
        let v = vertex(d, b.0, b.1);
        d.add_constraint(u, v).unwrap();
    }

    /// Number of (triangle, slot) pairs marking the edge u-v as constrained.
    fn constrained_sides(d: &Delaunay<f64>, u: usize, v: usize) -> usize {
        let mut sides = 0;
        for t in d.triangles() {
            if !t.active {
                continue;
            }
            for slot in 0..3 {
                let (a, b) = t.edge(slot);
                if t.constrained[slot] && ((a == u && b == v) || (a == v && b == u)) {
                    sides += 1;
                }
            }
        }
        sides
    }

    fn total_area(d: &Delaunay<f64>) -> f64 {
        d.triangles()
            .iter()
            .filter(|t| t.active)
            .map(|t| {
                let [a, b, c] = t.vertices;
                orient2d(d.points()[a], d.points()[b], d.points()[c]) / 2.0
            })
            .sum()
    }

    const SQUARE: [(f64, f64); 4] = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];

    #[test]
    fn test_forced_diagonal() {
        let mut d = triangulated(&SQUARE);
        let u = vertex(&d, 0.0, 0.0);
        let v = vertex(&d, 10.0, 10.0);

        d.add_constraint(u, v).unwrap();

        // The trace must no longer cross anything.
        let (crossings, split) = d.find_intersecting_edges(u, v).unwrap();
        assert!(crossings.is_empty());
        assert_eq!(split, None);

        // Exactly one edge carries the constraint, marked on both sides.
        assert_eq!(constrained_sides(&d, u, v), 2);

        assert_topology(&d);
        assert_delaunay(&d);
    }

    #[test]
    fn test_constraint_is_idempotent() {
        let mut d = triangulated(&SQUARE);
        let u = vertex(&d, 0.0, 0.0);
        let v = vertex(&d, 10.0, 10.0);

        d.add_constraint(u, v).unwrap();
        let before: Vec<_> = d.triangles().to_vec();
        d.add_constraint(u, v).unwrap();
        assert_eq!(d.triangles(), &before[..]);
    }

    #[test]
    fn test_constraint_rejects_bad_index() {
        let mut d = triangulated(&SQUARE);
        let len = d.points().len();
        assert_eq!(
            d.add_constraint(len, 0).unwrap_err(),
            TessellaError::IndexOutOfRange { index: len, len }
        );
        assert_eq!(
            d.add_constraint(0, len + 5).unwrap_err(),
            TessellaError::IndexOutOfRange {
                index: len + 5,
                len
            }
        );
    }

    #[test]
    fn test_constraint_same_vertex_is_noop() {
        let mut d = triangulated(&SQUARE);
        d.add_constraint(1, 1).unwrap();
        assert!(d
            .triangles()
            .iter()
            .all(|t| t.constrained.iter().all(|&f| !f)));
    }

    #[test]
    fn test_constraint_splits_at_collinear_vertex() {
        // (10, 0) sits exactly on the segment from (0,0) to (20,0), so the
        // constraint is enforced as two sub-segments meeting there.
        let mut d = triangulated(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (10.0, 8.0), (10.0, -8.0)]);
        let a = vertex(&d, 0.0, 0.0);
        let mid = vertex(&d, 10.0, 0.0);
        let b = vertex(&d, 20.0, 0.0);

        d.add_constraint(a, b).unwrap();

        assert_eq!(constrained_sides(&d, a, mid), 2);
        assert_eq!(constrained_sides(&d, mid, b), 2);
        assert_eq!(constrained_sides(&d, a, b), 0);
        assert_topology(&d);
    }

    #[test]
    fn test_carve_constrained_square() {
        let mut d = triangulated(&SQUARE);
        for i in 0..4 {
            constrain(&mut d, SQUARE[i], SQUARE[(i + 1) % 4]);
        }
        d.classify_regions();

        assert_eq!(d.triangles().len(), 2);
        assert!(d.triangles().iter().all(|t| t.inside));
        assert!((total_area(&d) - 100.0).abs() < 1e-9);
        assert_topology(&d);
    }

    #[test]
    fn test_carve_without_constraints_removes_everything() {
        // With no constrained loop, the exterior flood covers the whole
        // mesh from the hull inwards.
        let mut d = triangulated(&SQUARE);
        d.classify_regions();
        assert!(d.triangles().is_empty());
    }

    #[test]
    fn test_open_chain_leaks() {
        // Three constrained sides leave a gap; the flood pours through the
        // fourth and empties the square.
        let mut d = triangulated(&SQUARE);
        for i in 0..3 {
            constrain(&mut d, SQUARE[i], SQUARE[(i + 1) % 4]);
        }
        d.classify_regions();
        assert!(d.triangles().is_empty());
    }

    const L_SHAPE: [(f64, f64); 6] = [
        (0.0, 0.0),
        (20.0, 0.0),
        (20.0, 10.0),
        (10.0, 10.0),
        (10.0, 20.0),
        (0.0, 20.0),
    ];

    fn carved_l_shape() -> Delaunay<f64> {
        let mut d = triangulated(&L_SHAPE);
        for i in 0..L_SHAPE.len() {
            constrain(&mut d, L_SHAPE[i], L_SHAPE[(i + 1) % L_SHAPE.len()]);
        }
        d.classify_regions();
        d
    }

    #[test]
    fn test_carve_l_shape() {
        // The convex hull covers the notch; carving must remove exactly the
        // notch triangle outside the constrained loop.
        let d = carved_l_shape();
        assert_eq!(d.triangles().len(), 4);
        assert!((total_area(&d) - 300.0).abs() < 1e-9);
        assert_topology(&d);
    }

    #[test]
    fn test_trace_hits_carved_boundary() {
        // The segment leaves the carved region through the notch edge.
        let mut d = carved_l_shape();
        let u = vertex(&d, 20.0, 0.0);
        let v = vertex(&d, 10.0, 20.0);
        assert_eq!(
            d.add_constraint(u, v).unwrap_err(),
            TessellaError::TraceBoundary { target: v }
        );
    }

    #[test]
    fn test_trace_start_outside_fan() {
        // After carving, no triangle around the notch corner faces the far
        // notch vertex at all.
        let mut d = carved_l_shape();
        let u = vertex(&d, 20.0, 10.0);
        let v = vertex(&d, 10.0, 20.0);
        assert_eq!(
            d.add_constraint(u, v).unwrap_err(),
            TessellaError::TraceStart { vertex: u }
        );
    }

    #[test]
    fn test_constraint_across_dense_interior() {
        // Force a long diagonal through a grid interior; the resolver must
        // clear every crossing and the final trace must be clean.
        let mut coords = Vec::new();
        for x in 0..6 {
            for y in 0..6 {
                coords.push((x as f64 * 10.0, y as f64 * 10.0));
            }
        }
        let mut d = triangulated(&coords);
        let u = vertex(&d, 0.0, 10.0);
        let v = vertex(&d, 50.0, 40.0);

        d.add_constraint(u, v).unwrap();

        let (crossings, split) = d.find_intersecting_edges(u, v).unwrap();
        assert!(crossings.is_empty());
        assert_eq!(split, None);
        assert_eq!(constrained_sides(&d, u, v), 2);
        assert_topology(&d);
    }
}
