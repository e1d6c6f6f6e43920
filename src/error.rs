//! Error types for triangulation operations.

use thiserror::Error;

/// Errors that can occur while building or constraining a triangulation.
///
/// Construction errors abort construction. Constraint errors return from
/// [`Delaunay::add_constraint`](crate::Delaunay::add_constraint) without
/// undoing flips already performed; callers that need atomicity should
/// clone the mesh first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TessellaError {
    /// An input point carried a NaN or infinite coordinate.
    #[error("input point {index} has a non-finite coordinate")]
    NonFinitePoint {
        /// Position of the offending point in the input slice.
        index: usize,
    },

    /// Fewer than three unique points survived deduplication.
    #[error("need at least 3 unique points after deduplication, got {count}")]
    TooFewPoints {
        /// Number of unique points that remained.
        count: usize,
    },

    /// A constraint endpoint does not name a vertex of the mesh.
    #[error("vertex index {index} is out of range for {len} vertices")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of vertices in the mesh.
        len: usize,
    },

    /// No triangle incident to the start vertex faces the constraint target.
    #[error("no triangle incident to vertex {vertex} faces the constraint target")]
    TraceStart {
        /// The constraint's starting vertex.
        vertex: usize,
    },

    /// A constraint walk fell off the convex hull before reaching its target.
    #[error("constraint walk hit the hull boundary before reaching vertex {target}")]
    TraceBoundary {
        /// The vertex the walk was heading for.
        target: usize,
    },

    /// The constraint walk revisited its starting vertex.
    #[error("constraint walk circled back to vertex {start}")]
    TraceCycle {
        /// The vertex the walk restarted from.
        start: usize,
    },

    /// No flippable edge remained while crossings were still unresolved.
    ///
    /// Indicates non-simple input (crossing constraints) or a numerical
    /// failure in the convexity test.
    #[error("failed to resolve crossings for segment {u}-{v}: stuck")]
    TraceStuck {
        /// First endpoint of the segment being enforced.
        u: usize,
        /// Second endpoint of the segment being enforced.
        v: usize,
    },

    /// The constraint walk exceeded its step budget.
    #[error("constraint walk exceeded {limit} steps")]
    TraceLimit {
        /// The step budget, one step per mesh triangle.
        limit: usize,
    },
}
