//! Vertex-containment triangle overlap test
//!
//! Two triangles are reported as overlapping when any vertex of one lies
//! inside the other. Edge-only crossings (no vertex inside either
//! triangle) are not detected. A point counts as inside only when it lies
//! on the triangle's plane and its barycentric coordinates are all
//! non-negative.

use cncsim_core::Point3;
use glam::DVec3;

/// Tolerance for barycentric bounds and degenerate triangles
const EPS: f64 = 1e-9;

/// Three vertices
pub type Triangle = [Point3; 3];

/// Whether `p` falls inside `triangle`, edges included.
///
/// Degenerate (zero-area) triangles contain nothing. Points off the
/// triangle's plane by more than the tolerance, scaled by the triangle
/// and point extent, are outside.
pub fn point_in_triangle(p: Point3, triangle: &Triangle) -> bool {
    let [a, b, c] = (*triangle).map(Point3::to_dvec3);
    let p: DVec3 = p.into();

    let v0 = c - a;
    let v1 = b - a;
    let v2 = p - a;

    let normal = v1.cross(v0);
    let normal_length = normal.length();
    if normal_length < EPS {
        return false;
    }
    let extent = v0.length().max(v1.length()).max(v2.length());
    if (normal.dot(v2) / normal_length).abs() > EPS * (1.0 + extent) {
        return false;
    }

    let d00 = v0.dot(v0);
    let d01 = v0.dot(v1);
    let d11 = v1.dot(v1);
    let d20 = v2.dot(v0);
    let d21 = v2.dot(v1);

    let denom = d00 * d11 - d01 * d01;
    if denom.abs() < EPS {
        return false;
    }
    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    let u = 1.0 - v - w;
    u >= -EPS && v >= -EPS && w >= -EPS
}

/// Symmetric triangle overlap test
pub fn triangle_intersects(a: &Triangle, b: &Triangle) -> bool {
    a.iter().any(|&p| point_in_triangle(p, b)) || b.iter().any(|&p| point_in_triangle(p, a))
}
