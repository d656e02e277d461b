//! Geometry primitives
//!
//! `Point3` is the serialized `{x, y, z}` shape used in machine
//! descriptors, commands and trajectory samples. Vector math is done with
//! `glam::DVec3`; the conversions are free.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// A point or vector in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_dvec3(self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point3) -> f64 {
        self.to_dvec3().distance(other.to_dvec3())
    }

    /// Linear interpolation, `u = 0` yields `self` and `u = 1` yields `other`
    pub fn lerp(self, other: Point3, u: f64) -> Point3 {
        Point3::new(
            self.x + (other.x - self.x) * u,
            self.y + (other.y - self.y) * u,
            self.z + (other.z - self.z) * u,
        )
    }
}

impl From<DVec3> for Point3 {
    fn from(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Point3> for DVec3 {
    fn from(p: Point3) -> Self {
        p.to_dvec3()
    }
}

impl Add for Point3 {
    type Output = Point3;

    fn add(self, rhs: Point3) -> Point3 {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Point3;

    fn sub(self, rhs: Point3) -> Point3 {
        Point3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Point3,
    pub max: Point3,
}

impl Aabb {
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Inclusive containment test with zero tolerance
    pub fn contains(&self, p: Point3) -> bool {
        self.intersects_inflated(p, 0.0)
    }

    /// Whether the cube of half-width `radius` centered on `p` touches the
    /// box, faces included.
    pub fn intersects_inflated(&self, p: Point3, radius: f64) -> bool {
        p.x + radius >= self.min.x
            && p.x - radius <= self.max.x
            && p.y + radius >= self.min.y
            && p.y - radius <= self.max.y
            && p.z + radius >= self.min.z
            && p.z - radius <= self.max.z
    }

    /// True when `min <= max` on every axis
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_arithmetic() {
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(10.0, 20.0, 30.0);
        assert_eq!(a + b, Point3::new(11.0, 22.0, 33.0));
        assert_eq!(b - a, Point3::new(9.0, 18.0, 27.0));
        assert_eq!(Point3::ZERO.distance(Point3::new(3.0, 4.0, 0.0)), 5.0);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(10.0, -4.0, 2.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Point3::new(5.0, -2.0, 1.0));
    }

    #[test]
    fn test_aabb_boundaries_are_inclusive() {
        let bb = Aabb::new(Point3::ZERO, Point3::new(10.0, 10.0, 10.0));
        assert!(bb.contains(Point3::new(10.0, 0.0, 5.0)));
        assert!(!bb.contains(Point3::new(10.001, 0.0, 5.0)));
        assert!(bb.intersects_inflated(Point3::new(12.0, 5.0, 5.0), 2.0));
        assert!(!bb.intersects_inflated(Point3::new(12.1, 5.0, 5.0), 2.0));
    }

    #[test]
    fn test_inflated_point_is_a_cube() {
        let bb = Aabb::new(Point3::ZERO, Point3::new(10.0, 10.0, 10.0));
        // corner gap of 2*sqrt(3) is still within the cube's reach
        assert!(bb.intersects_inflated(Point3::new(12.0, 12.0, 12.0), 2.0));
        assert!(!bb.intersects_inflated(Point3::new(12.0, 12.5, 12.0), 2.0));
    }

    #[test]
    fn test_point_serde_shape() {
        let json = serde_json::to_string(&Point3::new(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(json, r#"{"x":1.0,"y":2.0,"z":3.0}"#);
    }
}
