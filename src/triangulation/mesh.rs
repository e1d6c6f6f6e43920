//! Indexed triangle storage.
//!
//! Triangles reference vertices and each other purely through indices into
//! flat arrays, so the cyclic adjacency graph never needs shared ownership.
//! Deletions are logical (`active = false`) until a compaction pass rewrites
//! the array and remaps surviving neighbour links.

/// Marks the absence of a neighbour: the edge lies on the convex-hull
/// boundary (or, after carving, on a constrained region boundary).
pub const EMPTY: usize = usize::MAX;

/// A triangle of the mesh, stored as indices.
///
/// `vertices` are in counter-clockwise order. `neighbors[i]` is the triangle
/// sharing the edge *opposite* `vertices[i]` (slot 0 is the edge from
/// `vertices[1]` to `vertices[2]`, and so on), or [`EMPTY`] on the boundary.
/// `constrained` flags are aligned with the neighbour slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triangle {
    /// Vertex indices in counter-clockwise order.
    pub vertices: [usize; 3],
    /// Neighbour triangle indices, slot `i` opposite `vertices[i]`.
    pub neighbors: [usize; 3],
    /// Per-edge constraint flags, aligned with `neighbors`.
    pub constrained: [bool; 3],
    /// Logical-deletion flag; inactive triangles await compaction.
    pub active: bool,
    /// Set by region classification for triangles inside the carved map.
    pub inside: bool,
}

impl Triangle {
    /// Creates an active, unconstrained triangle.
    pub(crate) fn new(vertices: [usize; 3], neighbors: [usize; 3]) -> Self {
        Self {
            vertices,
            neighbors,
            constrained: [false; 3],
            active: true,
            inside: false,
        }
    }

    /// Returns the directed edge opposite vertex slot `slot`, in CCW order.
    #[inline]
    pub fn edge(&self, slot: usize) -> (usize, usize) {
        (self.vertices[(slot + 1) % 3], self.vertices[(slot + 2) % 3])
    }

    /// Checks if the triangle uses vertex `v`.
    #[inline]
    pub fn has_vertex(&self, v: usize) -> bool {
        self.vertices.contains(&v)
    }

    /// Returns the slot holding vertex `v`, if present.
    #[inline]
    pub(crate) fn slot_of_vertex(&self, v: usize) -> Option<usize> {
        self.vertices.iter().position(|&x| x == v)
    }

    /// Returns the slot whose neighbour is triangle `n`, if any.
    #[inline]
    pub(crate) fn slot_of_neighbor(&self, n: usize) -> Option<usize> {
        self.neighbors.iter().position(|&x| x == n)
    }

    /// Rewrites the neighbour slot pointing at `old` to point at `new`.
    ///
    /// Neighbour symmetry guarantees at most one slot matches.
    pub(crate) fn replace_neighbor(&mut self, old: usize, new: usize) {
        if let Some(slot) = self.slot_of_neighbor(old) {
            self.neighbors[slot] = new;
        }
    }
}

/// Compacts the triangle array in place, keeping only triangles accepted by
/// `keep`, and remaps surviving neighbour indices. Links into removed
/// triangles become [`EMPTY`].
pub(crate) fn compact<K>(triangles: &mut Vec<Triangle>, keep: K)
where
    K: Fn(&Triangle) -> bool,
{
    let mut remap = vec![EMPTY; triangles.len()];
    let mut next = 0;
    for (i, t) in triangles.iter().enumerate() {
        if keep(t) {
            remap[i] = next;
            next += 1;
        }
    }

    let mut compacted = Vec::with_capacity(next);
    for (i, t) in triangles.iter().enumerate() {
        if remap[i] == EMPTY {
            continue;
        }
        let mut t = t.clone();
        for n in &mut t.neighbors {
            if *n != EMPTY {
                *n = remap[*n];
            }
        }
        compacted.push(t);
    }
    *triangles = compacted;
}
