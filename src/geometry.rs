//! Planar geometry primitives.
//!
//! Longitude and latitude are treated as a flat Cartesian plane (x = longitude,
//! y = latitude). Distances come back in degrees, not meters. This is only a
//! reasonable approximation over small regional extents.

use geo::Coord;

/// Euclidean distance between two coordinates, in coordinate units.
pub fn planar_distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Distance from `p` to the closest point on the closed segment `[a, b]`.
///
/// `p` is projected onto the line through `a` and `b`, the projection parameter
/// is clamped to `[0, 1]`, and the distance to the clamped point is returned.
/// A degenerate segment (`a == b`) falls back to the distance from `p` to `a`.
///
/// # Example
/// ```
/// use geo::coord;
/// use road_matcher::geometry::distance_to_segment;
///
/// let d = distance_to_segment(
///     coord! { x: 1.0, y: 1.0 },
///     coord! { x: 0.0, y: 0.0 },
///     coord! { x: 2.0, y: 0.0 },
/// );
/// assert_eq!(d, 1.0);
/// ```
pub fn distance_to_segment(p: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> f64 {
    let ab = b - a;
    let length_sq = ab.x * ab.x + ab.y * ab.y;
    if length_sq == 0.0 {
        return planar_distance(p, a);
    }

    let ap = p - a;
    let t = ((ap.x * ab.x + ap.y * ab.y) / length_sq).clamp(0.0, 1.0);
    planar_distance(p, a + ab * t)
}
