//! Geometric predicates with explicit tolerance.
//!
//! All mesh decisions go through these predicates so the tolerance is
//! applied consistently at decision boundaries.

mod predicates;

pub use predicates::{
    in_circumcircle, orient2d, orientation, point_on_segment, segments_intersect_properly,
    Orientation,
};

/// Shared tolerance for orientation, in-circle, and coincidence tests.
///
/// Chosen empirically for map-scale coordinates. Inputs with wildly varying
/// scale should be pre-scaled toward the unit box before triangulation.
pub const EPSILON: f64 = 1e-9;
