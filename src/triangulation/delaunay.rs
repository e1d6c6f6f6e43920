//! Incremental constrained Delaunay triangulation.
//!
//! Points are inserted one at a time into a super triangle that encloses the
//! whole input, locating each by a directed walk and restoring the Delaunay
//! property with Lawson edge flips. Insertion order follows the x-sorted
//! vertex list, which keeps each walk short (Sloan's unidimensional binning
//! approximation) and total construction near O(N^5/4).
//!
//! # Example
//!
//! ```
//! use tessella::{Delaunay, Point2};
//!
//! // Square with a centre point
//! let points: Vec<Point2<f64>> = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(10.0, 0.0),
//!     Point2::new(10.0, 10.0),
//!     Point2::new(0.0, 10.0),
//!     Point2::new(5.0, 5.0),
//! ];
//!
//! let mut mesh = Delaunay::new(&points).unwrap();
//! mesh.triangulate();
//!
//! // Four triangles fan around the centre
//! assert_eq!(mesh.triangles().len(), 4);
//! ```

use std::cmp::Ordering;

use num_traits::Float;

use crate::error::TessellaError;
use crate::primitives::Point2;
use crate::tolerance::{in_circumcircle, orientation, Orientation, EPSILON};
use crate::triangulation::mesh::{self, Triangle, EMPTY};

/// A constrained Delaunay triangulation under construction or completed.
///
/// The mesh exclusively owns its vertex and triangle arrays; triangles refer
/// to vertices and to each other by index only. A `Delaunay` value is not
/// safe for concurrent mutation, but independent meshes may be built in
/// parallel, and cloning before [`add_constraint`](Delaunay::add_constraint)
/// gives callers an atomicity fallback.
#[derive(Debug, Clone)]
pub struct Delaunay<F> {
    pub(crate) points: Vec<Point2<F>>,
    pub(crate) triangles: Vec<Triangle>,
    pub(crate) super_vertices: [usize; 3],
    /// Walk-start cache: the most recently created triangle.
    pub(crate) last_created: usize,
    pub(crate) eps: F,
}

impl<F: Float> Delaunay<F> {
    /// Initialises the mesh from an input point set.
    ///
    /// Rejects non-finite coordinates, welds duplicates (points whose x and
    /// y both lie within [`EPSILON`]), sorts the survivors by x, and seeds
    /// the mesh with a super triangle that strictly encloses them all.
    ///
    /// # Errors
    ///
    /// [`TessellaError::NonFinitePoint`] if any coordinate is NaN or
    /// infinite, [`TessellaError::TooFewPoints`] if fewer than three unique
    /// points remain after welding.
    ///
    /// # Example
    ///
    /// ```
    /// use tessella::{Delaunay, Point2, TessellaError};
    ///
    /// let two = vec![Point2::new(0.0_f64, 0.0), Point2::new(1.0, 0.0)];
    /// assert_eq!(
    ///     Delaunay::new(&two).unwrap_err(),
    ///     TessellaError::TooFewPoints { count: 2 }
    /// );
    /// ```
    pub fn new(input: &[Point2<F>]) -> Result<Self, TessellaError> {
        let eps = F::from(EPSILON).unwrap();

        for (index, p) in input.iter().enumerate() {
            if !p.is_finite() {
                return Err(TessellaError::NonFinitePoint { index });
            }
        }

        let mut unique = deduplicate_points(input, eps);
        if unique.len() < 3 {
            return Err(TessellaError::TooFewPoints {
                count: unique.len(),
            });
        }

        // Unidimensional sorting approximates spatial binning: x-ordered
        // insertion keeps consecutive walk starts close to their targets.
        unique.sort_by(|p, q| p.x.partial_cmp(&q.x).unwrap_or(Ordering::Equal));

        let n = unique.len();
        let mut points = Vec::with_capacity(n + 3);
        points.extend_from_slice(&unique);

        let mut min_x = unique[0].x;
        let mut min_y = unique[0].y;
        let mut max_x = min_x;
        let mut max_y = min_y;
        for p in &unique[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        let two = F::from(2.0).unwrap();
        let delta = (max_x - min_x).max(max_y - min_y) * F::from(10.0).unwrap();
        let mid_x = (min_x + max_x) / two;
        let mid_y = (min_y + max_y) / two;

        let super_vertices = [n, n + 1, n + 2];
        points.push(Point2::new(mid_x - delta, mid_y - delta));
        points.push(Point2::new(mid_x + delta, mid_y - delta));
        points.push(Point2::new(mid_x, mid_y + delta));

        // Roughly 2N triangles survive for large N (Euler's formula); the
        // extra headroom absorbs churn from flips and splits.
        let mut triangles = Vec::with_capacity(n * 5 / 2 + 100);
        triangles.push(Triangle::new(super_vertices, [EMPTY; 3]));

        Ok(Self {
            points,
            triangles,
            super_vertices,
            last_created: 0,
            eps,
        })
    }

    /// Inserts every input vertex, then removes the super triangle.
    ///
    /// Call once after construction; terminates unconditionally for valid
    /// input. Afterwards the active triangles cover exactly the convex hull
    /// of the inserted points.
    pub fn triangulate(&mut self) {
        let real = self.points.len() - 3;
        for i in 0..real {
            self.insert_point(i);
        }
        self.cleanup();
    }

    /// The mesh's vertices: the deduplicated, x-sorted input followed by the
    /// three super-triangle vertices.
    #[inline]
    pub fn points(&self) -> &[Point2<F>] {
        &self.points
    }

    /// The mesh's triangle array. After [`triangulate`](Delaunay::triangulate)
    /// every stored triangle is active.
    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Looks up the vertex index holding exactly the given coordinates.
    ///
    /// Construction reorders and welds the input, so callers resolve
    /// constraint endpoints through this lookup rather than input positions.
    pub fn find_vertex(&self, p: Point2<F>) -> Option<usize> {
        self.points
            .iter()
            .position(|q| q.x == p.x && q.y == p.y)
    }

    /// Inserts one vertex: locate, then split 1-to-3 (interior) or 2-to-4
    /// (on an edge), then legalise the affected edges.
    fn insert_point(&mut self, p_idx: usize) {
        let p = self.points[p_idx];

        let mut t_idx = self.walk_locate(p, self.last_created);
        if t_idx == EMPTY {
            // The walk landed on a dead triangle or ran out of steps; fall
            // back to a linear scan.
            for i in 0..self.triangles.len() {
                if self.triangles[i].active && self.contains(i, p) {
                    t_idx = i;
                    break;
                }
            }
            if t_idx == EMPTY {
                return;
            }
        }

        let t = self.triangles[t_idx].clone();

        // A point coinciding with an existing vertex is a duplicate the
        // welding pass missed; never feed it to the edge split.
        for &v in &t.vertices {
            let q = self.points[v];
            if (p.x - q.x).abs() <= self.eps && (p.y - q.y).abs() <= self.eps {
                return;
            }
        }

        for slot in 0..3 {
            let (u, v) = t.edge(slot);
            if orientation(self.points[u], self.points[v], p, self.eps) == Orientation::Collinear {
                self.split_edge(p_idx, t_idx, slot);
                return;
            }
        }

        // Interior: replace the triangle with three sharing the new apex,
        // each keeping one original edge with its outer neighbour.
        self.triangles[t_idx].active = false;

        let [a, b, c] = t.vertices;
        let [n1, n2, n3] = t.neighbors;
        let base = self.triangles.len();

        let mut t1 = Triangle::new([b, c, p_idx], [base + 1, base + 2, n1]);
        t1.constrained[2] = t.constrained[0];
        let mut t2 = Triangle::new([c, a, p_idx], [base + 2, base, n2]);
        t2.constrained[2] = t.constrained[1];
        let mut t3 = Triangle::new([a, b, p_idx], [base, base + 1, n3]);
        t3.constrained[2] = t.constrained[2];
        self.triangles.push(t1);
        self.triangles.push(t2);
        self.triangles.push(t3);

        self.last_created = base;

        self.update_neighbor(n1, t_idx, base);
        self.update_neighbor(n2, t_idx, base + 1);
        self.update_neighbor(n3, t_idx, base + 2);

        self.legalise(vec![(base, n1), (base + 1, n2), (base + 2, n3)]);
    }

    /// Splits the edge at `slot` of triangle `t_idx` around the on-edge
    /// point `p_idx`, fanning four new triangles (two when the edge lies on
    /// the boundary).
    fn split_edge(&mut self, p_idx: usize, t_idx: usize, slot: usize) {
        let t = self.triangles[t_idx].clone();
        self.triangles[t_idx].active = false;

        let o = t.vertices[slot];
        let (u, v) = t.edge(slot);
        let n_idx = t.neighbors[slot];

        let n_vo = t.neighbors[(slot + 1) % 3];
        let n_ou = t.neighbors[(slot + 2) % 3];
        let f_vo = t.constrained[(slot + 1) % 3];
        let f_ou = t.constrained[(slot + 2) % 3];

        let t1_idx = self.triangles.len();
        let t2_idx = t1_idx + 1;

        // The two halves of T; slot 2 of each faces the neighbour's halves
        // across the split edge and is patched below.
        let mut t1 = Triangle::new([p_idx, v, o], [n_vo, t2_idx, EMPTY]);
        t1.constrained[0] = f_vo;
        let mut t2 = Triangle::new([u, p_idx, o], [t1_idx, n_ou, EMPTY]);
        t2.constrained[1] = f_ou;
        self.triangles.push(t1);
        self.triangles.push(t2);

        self.last_created = t1_idx;
        self.update_neighbor(n_vo, t_idx, t1_idx);
        self.update_neighbor(n_ou, t_idx, t2_idx);

        let mut seeds = vec![(t1_idx, n_vo), (t2_idx, n_ou)];

        if n_idx != EMPTY {
            let n = self.triangles[n_idx].clone();
            self.triangles[n_idx].active = false;

            // The shared edge appears reversed in the neighbour; sn is the
            // slot of the vertex opposite it.
            let sn = if n.vertices[0] == v && n.vertices[1] == u {
                2
            } else if n.vertices[1] == v && n.vertices[2] == u {
                0
            } else {
                1
            };
            let o_n = n.vertices[sn];
            let n_uon = n.neighbors[(sn + 1) % 3];
            let n_onv = n.neighbors[(sn + 2) % 3];
            let f_uon = n.constrained[(sn + 1) % 3];
            let f_onv = n.constrained[(sn + 2) % 3];

            let n1_idx = self.triangles.len();
            let n2_idx = n1_idx + 1;

            let mut half1 = Triangle::new([p_idx, u, o_n], [n_uon, n2_idx, t2_idx]);
            half1.constrained[0] = f_uon;
            let mut half2 = Triangle::new([v, p_idx, o_n], [n1_idx, n_onv, t1_idx]);
            half2.constrained[1] = f_onv;
            self.triangles.push(half1);
            self.triangles.push(half2);

            self.triangles[t1_idx].neighbors[2] = n2_idx;
            self.triangles[t2_idx].neighbors[2] = n1_idx;

            self.update_neighbor(n_uon, n_idx, n1_idx);
            self.update_neighbor(n_onv, n_idx, n2_idx);

            seeds.push((n1_idx, n_uon));
            seeds.push((n2_idx, n_onv));
        }

        self.legalise(seeds);
    }

    /// Lawson legalisation over an explicit work stack.
    ///
    /// Each entry is a triangle and the neighbour across the edge to test.
    /// Flip cascades can reach depth Θ(N) on adversarial input, which is why
    /// this is a loop rather than recursion.
    fn legalise(&mut self, seeds: Vec<(usize, usize)>) {
        let mut stack = seeds;
        while let Some((t_idx, n_idx)) = stack.pop() {
            if n_idx == EMPTY {
                continue;
            }
            // An earlier flip may have detached the pair; skip stale entries.
            let nslot = match self.triangles[n_idx].slot_of_neighbor(t_idx) {
                Some(slot) => slot,
                None => continue,
            };
            let q = self.points[self.triangles[n_idx].vertices[nslot]];

            let [a, b, c] = self.triangles[t_idx].vertices;
            if in_circumcircle(self.points[a], self.points[b], self.points[c], q, self.eps) {
                self.flip_edge(t_idx, n_idx);

                let tn = self.triangles[t_idx].neighbors;
                stack.push((t_idx, tn[0]));
                stack.push((t_idx, tn[2]));
                let nn = self.triangles[n_idx].neighbors;
                stack.push((n_idx, nn[0]));
                stack.push((n_idx, nn[1]));
            }
        }
    }

    /// Rotates the diagonal of the quadrilateral formed by two adjacent
    /// triangles, rewiring the four outer neighbours and carrying their
    /// constraint flags along.
    pub(crate) fn flip_edge(&mut self, t_idx: usize, n_idx: usize) {
        let t = self.triangles[t_idx].clone();
        let n = self.triangles[n_idx].clone();

        // Symmetry breakage here is a programmer error; flipping against a
        // guessed slot would corrupt the mesh silently.
        let tslot = t
            .slot_of_neighbor(n_idx)
            .expect("neighbour symmetry invariant violated");
        let nslot = n
            .slot_of_neighbor(t_idx)
            .expect("neighbour symmetry invariant violated");

        // T = (p, u, v) with p opposite the shared edge u-v;
        // N = (q, v, u) with q opposite it.
        let p = t.vertices[tslot];
        let u = t.vertices[(tslot + 1) % 3];
        let v = t.vertices[(tslot + 2) % 3];
        let q = n.vertices[nslot];

        let n_uq = n.neighbors[(nslot + 1) % 3];
        let n_qv = n.neighbors[(nslot + 2) % 3];
        let t_vp = t.neighbors[(tslot + 1) % 3];
        let t_pu = t.neighbors[(tslot + 2) % 3];

        let f_uq = n.constrained[(nslot + 1) % 3];
        let f_qv = n.constrained[(nslot + 2) % 3];
        let f_vp = t.constrained[(tslot + 1) % 3];
        let f_pu = t.constrained[(tslot + 2) % 3];

        // The diagonal rotates from u-v to p-q.
        self.triangles[t_idx] = Triangle {
            vertices: [p, u, q],
            neighbors: [n_uq, n_idx, t_pu],
            constrained: [f_uq, false, f_pu],
            active: t.active,
            inside: t.inside,
        };
        self.triangles[n_idx] = Triangle {
            vertices: [p, q, v],
            neighbors: [n_qv, t_vp, t_idx],
            constrained: [f_qv, f_vp, false],
            active: n.active,
            inside: n.inside,
        };

        self.update_neighbor(n_uq, n_idx, t_idx);
        self.update_neighbor(t_vp, t_idx, n_idx);
    }

    /// Sloan's directed walk: move from `start` toward `p` through whichever
    /// edge has `p` strictly on its right, until a containing triangle is
    /// found or the hull boundary blocks the way.
    ///
    /// Returns [`EMPTY`] when the walk lands on an inactive triangle or
    /// exceeds its step budget; callers fall back to a linear scan.
    fn walk_locate(&self, p: Point2<F>, start: usize) -> usize {
        if start >= self.triangles.len() {
            return EMPTY;
        }

        let mut curr = start;
        for _ in 0..self.triangles.len() {
            let t = &self.triangles[curr];
            if !t.active {
                return EMPTY;
            }

            let a = self.points[t.vertices[0]];
            let b = self.points[t.vertices[1]];
            let c = self.points[t.vertices[2]];

            let next = if orientation(b, c, p, self.eps) == Orientation::Clockwise {
                t.neighbors[0]
            } else if orientation(c, a, p, self.eps) == Orientation::Clockwise {
                t.neighbors[1]
            } else if orientation(a, b, p, self.eps) == Orientation::Clockwise {
                t.neighbors[2]
            } else {
                // On or left of every edge: inside.
                return curr;
            };

            if next == EMPTY {
                // Outside the hull; this is the nearest boundary triangle.
                return curr;
            }
            curr = next;
        }
        EMPTY
    }

    /// Closed-triangle containment test.
    fn contains(&self, t_idx: usize, p: Point2<F>) -> bool {
        let t = &self.triangles[t_idx];
        let a = self.points[t.vertices[0]];
        let b = self.points[t.vertices[1]];
        let c = self.points[t.vertices[2]];
        orientation(a, b, p, self.eps) != Orientation::Clockwise
            && orientation(b, c, p, self.eps) != Orientation::Clockwise
            && orientation(c, a, p, self.eps) != Orientation::Clockwise
    }

    /// Removes every triangle incident to a super vertex and remaps the
    /// survivors' neighbour links.
    fn cleanup(&mut self) {
        let supers = self.super_vertices;
        mesh::compact(&mut self.triangles, |t| {
            t.active && !supers.iter().any(|&s| t.has_vertex(s))
        });
        self.last_created = 0;
    }

    pub(crate) fn update_neighbor(&mut self, t_idx: usize, old: usize, new: usize) {
        if t_idx != EMPTY {
            self.triangles[t_idx].replace_neighbor(old, new);
        }
    }
}

/// Drops NaN-free duplicate points: lexicographic sort, then weld runs of
/// consecutive points whose x and y both lie within `eps`.
fn deduplicate_points<F: Float>(points: &[Point2<F>], eps: F) -> Vec<Point2<F>> {
    if points.is_empty() {
        return Vec::new();
    }

    let mut sorted = points.to_vec();
    sorted.sort_by(|p, q| {
        p.x.partial_cmp(&q.x)
            .unwrap_or(Ordering::Equal)
            .then(p.y.partial_cmp(&q.y).unwrap_or(Ordering::Equal))
    });

    let mut unique = Vec::with_capacity(sorted.len());
    unique.push(sorted[0]);
    for &curr in &sorted[1..] {
        let prev = unique[unique.len() - 1];
        if (curr.x - prev.x).abs() > eps || (curr.y - prev.y).abs() > eps {
            unique.push(curr);
        }
    }
    unique
}
