//! Stateless geometry kernel: distances, area-to-radius conversion and
//! circle-circle intersections.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A placed circle. Immutable once it is part of a packing.
///
/// Serialized as a bare `[x, y, radius]` triple, which is the cache
/// artifact's on-disk shape.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Circle {
    pub pos: DVec2,
    pub radius: f64,
}

impl Circle {
    pub fn new(pos: DVec2, radius: f64) -> Self {
        Self { pos, radius }
    }

    /// Edge-to-edge gap: `0` when tangent, negative when overlapping.
    #[inline]
    pub fn gap(&self, other: &Circle) -> f64 {
        distance(self.pos, other.pos) - self.radius - other.radius
    }

    /// Returns `true` if the two circles overlap by more than `epsilon`.
    #[inline]
    pub fn collides(&self, other: &Circle, epsilon: f64) -> bool {
        distance(self.pos, other.pos) + epsilon < self.radius + other.radius
    }

    /// Distance from the origin to the far edge of the circle.
    #[inline]
    pub fn reach(&self) -> f64 {
        norm(self.pos) + self.radius
    }
}

impl From<[f64; 3]> for Circle {
    fn from([x, y, radius]: [f64; 3]) -> Self {
        Self::new(DVec2::new(x, y), radius)
    }
}

impl From<Circle> for [f64; 3] {
    fn from(c: Circle) -> Self {
        [c.pos.x, c.pos.y, c.radius]
    }
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(p: DVec2, q: DVec2) -> f64 {
    (p - q).length()
}

/// Distance of `p` from the origin.
#[inline]
pub fn norm(p: DVec2) -> f64 {
    p.length()
}

/// Radius of a circle whose area is `|area|`.
#[inline]
pub fn radius_from_area(area: f64) -> f64 {
    (area.abs() / PI).sqrt()
}

/// Computes where a circle of `extra_radius` can sit tangent to both `c1`
/// and `c2`.
///
/// Both circles are inflated by `extra_radius`, and the crossing points of
/// the inflated boundaries are returned. Apart, nested or coincident circles
/// yield nothing. `epsilon` is added under the square root so a grazing
/// contact never produces a negative radicand.
///
/// When the two crossing points are equally far from the origin (within
/// `epsilon`) both are returned; otherwise only the one farther out, so the
/// packing grows outward.
///
/// ### Returns
/// Zero, one or two candidate centers, in a fixed order.
pub fn intersections(c1: &Circle, c2: &Circle, extra_radius: f64, epsilon: f64) -> Vec<DVec2> {
    let r0 = c1.radius + extra_radius;
    let r1 = c2.radius + extra_radius;

    let delta = c2.pos - c1.pos;
    let d = delta.length();

    // Apart.
    if d > r0 + r1 {
        return Vec::new();
    }
    // One inside the other.
    if d < (r0 - r1).abs() {
        return Vec::new();
    }
    // Same circle.
    if d == 0.0 && r0 == r1 {
        return Vec::new();
    }

    let a = (r0 * r0 - r1 * r1 + d * d) / (2.0 * d);
    let h = (r0 * r0 - a * a + epsilon).max(0.0).sqrt();

    let mid = c1.pos + delta * (a / d);
    let perp = DVec2::new(delta.y, -delta.x) * (h / d);
    let p3 = mid + perp;
    let p4 = mid - perp;

    let (n3, n4) = (norm(p3), norm(p4));
    if (n3 - n4).abs() < epsilon {
        vec![p3, p4]
    } else if n3 > n4 {
        vec![p3]
    } else {
        vec![p4]
    }
}
