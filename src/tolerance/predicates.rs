//! Orientation, in-circle, and segment predicates.

use crate::primitives::Point2;
use num_traits::Float;

/// Result of an orientation test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Points are counter-clockwise (positive area).
    CounterClockwise,
    /// Points are clockwise (negative area).
    Clockwise,
    /// Points are collinear (within tolerance).
    Collinear,
}

/// Computes twice the signed area of the triangle `(a, b, c)`.
///
/// Positive when the points wind counter-clockwise, negative when they wind
/// clockwise, and near zero when they are collinear. This is the raw value;
/// use [`orientation`] for a tolerance-classified result.
#[inline]
pub fn orient2d<F: Float>(a: Point2<F>, b: Point2<F>, c: Point2<F>) -> F {
    (b - a).cross(c - a)
}

/// Classifies the orientation of three points with tolerance.
///
/// Returns the orientation of the triangle formed by points `a`, `b`, `c`:
/// - `CounterClockwise` if `c` is to the left of the line from `a` to `b`
/// - `Clockwise` if `c` is to the right of the line from `a` to `b`
/// - `Collinear` if `c` is on the line (within `eps` tolerance)
///
/// `eps` is compared against the absolute value of the cross product, which
/// equals twice the signed area of the triangle.
#[inline]
pub fn orientation<F: Float>(a: Point2<F>, b: Point2<F>, c: Point2<F>, eps: F) -> Orientation {
    let cross = orient2d(a, b, c);
    if cross > eps {
        Orientation::CounterClockwise
    } else if cross < -eps {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Tests if point `p` lies strictly inside the circumcircle of the
/// counter-clockwise triangle `(a, b, c)`.
///
/// Uses the determinant test, which is more numerically stable than
/// explicitly computing the circumcenter. Returns `true` only when the
/// determinant exceeds `eps`, so points on (or within tolerance of) the
/// circle count as outside.
///
/// # Example
///
/// ```
/// use tessella::{in_circumcircle, Point2, EPSILON};
///
/// let a = Point2::new(0.0_f64, 0.0);
/// let b = Point2::new(1.0, 0.0);
/// let c = Point2::new(0.5, 0.866);
///
/// let center = Point2::new(0.5, 0.29);
/// assert!(in_circumcircle(a, b, c, center, EPSILON));
///
/// let far = Point2::new(10.0, 10.0);
/// assert!(!in_circumcircle(a, b, c, far, EPSILON));
/// ```
pub fn in_circumcircle<F: Float>(
    a: Point2<F>,
    b: Point2<F>,
    c: Point2<F>,
    p: Point2<F>,
    eps: F,
) -> bool {
    // Determinant test:
    // | ax-px  ay-py  (ax-px)²+(ay-py)² |
    // | bx-px  by-py  (bx-px)²+(by-py)² | > eps  iff p is inside (CCW triangle)
    // | cx-px  cy-py  (cx-px)²+(cy-py)² |
    let ax = a.x - p.x;
    let ay = a.y - p.y;
    let bx = b.x - p.x;
    let by = b.y - p.y;
    let cx = c.x - p.x;
    let cy = c.y - p.y;

    let aa = ax * ax + ay * ay;
    let bb = bx * bx + by * by;
    let cc = cx * cx + cy * cy;

    let det = ax * (by * cc - cy * bb) - ay * (bx * cc - cx * bb) + aa * (bx * cy - cx * by);

    det > eps
}

/// Checks if point `p` lies on the segment from `a` to `b` within tolerance.
///
/// `p` must be collinear with the segment (cross product within `eps`) and
/// its projection onto the segment must fall between the endpoints, with
/// `eps` slack at both ends.
pub fn point_on_segment<F: Float>(p: Point2<F>, a: Point2<F>, b: Point2<F>, eps: F) -> bool {
    if orientation(a, b, p, eps) != Orientation::Collinear {
        return false;
    }
    let ab = b - a;
    let dp = (p - a).dot(ab);
    if dp < -eps {
        return false;
    }
    dp <= ab.magnitude_squared() + eps
}

/// Tests if segments `ab` and `cd` properly intersect.
///
/// A proper intersection is a single crossing point interior to both
/// segments: the endpoints of each segment must lie strictly on opposite
/// sides of the other. Touching at an endpoint or overlapping collinearly
/// does not count.
pub fn segments_intersect_properly<F: Float>(
    a: Point2<F>,
    b: Point2<F>,
    c: Point2<F>,
    d: Point2<F>,
) -> bool {
    let o1 = orient2d(a, b, c);
    let o2 = orient2d(a, b, d);
    let o3 = orient2d(c, d, a);
    let o4 = orient2d(c, d, b);

    let zero = F::zero();
    ((o1 > zero && o2 < zero) || (o1 < zero && o2 > zero))
        && ((o3 > zero && o4 < zero) || (o3 < zero && o4 > zero))
}
