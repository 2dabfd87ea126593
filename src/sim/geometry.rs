//! Circle geometry kernel
//!
//! Angles are measured on a unit circle centered at the reference point with
//! the y-axis inverted, so they increase counter-clockwise on screen where y
//! grows downward.

use glam::DVec2;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::normalize_angle;

/// Canvas extents (origin at top-left)
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether a circle lies fully inside the canvas
    pub fn contains_circle(&self, center: DVec2, radius: f64) -> bool {
        center.x - radius >= 0.0
            && center.x + radius <= self.width
            && center.y - radius >= 0.0
            && center.y + radius <= self.height
    }
}

/// Quadrant of an angle on the (y-up) unit circle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    First,
    Second,
    Third,
    Fourth,
}

impl Quadrant {
    /// Classify an angle in radians (any range)
    pub fn of(angle: f64) -> Self {
        match (normalize_angle(angle) / FRAC_PI_2).floor() as u32 {
            0 => Quadrant::First,
            1 => Quadrant::Second,
            2 => Quadrant::Third,
            _ => Quadrant::Fourth,
        }
    }

    /// Direction pointing away from the circle center, in screen coordinates
    pub fn outward_sign(&self) -> DVec2 {
        match self {
            Quadrant::First => DVec2::new(1.0, -1.0),
            Quadrant::Second => DVec2::new(-1.0, -1.0),
            Quadrant::Third => DVec2::new(-1.0, 1.0),
            Quadrant::Fourth => DVec2::new(1.0, 1.0),
        }
    }
}

/// Points where two circle boundaries cross
///
/// Returns `None` when the circles are disjoint, one contains the other, or
/// the centers coincide. Tangent circles yield the same point twice.
pub fn intersect_circles(c1: DVec2, r1: f64, c2: DVec2, r2: f64) -> Option<[DVec2; 2]> {
    let delta = c2 - c1;
    let d = delta.length();

    if d > r1 + r2 || d < (r1 - r2).abs() || d < crate::consts::DEGENERATE_DISTANCE {
        return None;
    }

    // Distance from c1 to the radical line along the center line
    let a = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    let base = c1 + delta * (a / d);
    // Half-chord; clamp absorbs rounding at tangency
    let h = (r1 * r1 - a * a).max(0.0).sqrt();
    let offset = DVec2::new(-delta.y, delta.x) * (h / d);

    Some([base + offset, base - offset])
}

/// Loose overlap test (touching or nested counts)
#[inline]
pub fn circles_overlap(c1: DVec2, r1: f64, c2: DVec2, r2: f64) -> bool {
    c1.distance(c2) <= r1 + r2
}

/// Whether the circle boundaries actually cross
#[inline]
pub fn circles_intersect_properly(c1: DVec2, r1: f64, c2: DVec2, r2: f64) -> bool {
    let d = c1.distance(c2);
    (r1 - r2).abs() <= d && d <= r1 + r2
}

/// Angle of `point` around `center`, in [0, 2π)
pub fn point_to_angle(point: DVec2, center: DVec2) -> f64 {
    let rel = point - center;
    normalize_angle((-rel.y).atan2(rel.x))
}

/// Point on the circle at `angle`; inverse of [`point_to_angle`]
pub fn angle_to_point(angle: f64, center: DVec2, radius: f64) -> DVec2 {
    center + DVec2::new(angle.cos(), -angle.sin()) * radius
}

/// Area of a circle
#[inline]
pub fn circle_area(r: f64) -> f64 {
    PI * r * r
}

/// Overlap area of two circles with radii `r`, `big_r` and center distance `d`
pub fn lens_area(r: f64, big_r: f64, d: f64) -> f64 {
    if d >= r + big_r {
        return 0.0;
    }
    if d <= (big_r - r).abs() {
        return circle_area(r.min(big_r));
    }

    let alpha = ((d * d + r * r - big_r * big_r) / (2.0 * d * r)).clamp(-1.0, 1.0);
    let beta = ((d * d + big_r * big_r - r * r) / (2.0 * d * big_r)).clamp(-1.0, 1.0);
    let kite = (-d + r + big_r) * (d + r - big_r) * (d - r + big_r) * (d + r + big_r);

    r * r * alpha.acos() + big_r * big_r * beta.acos() - 0.5 * kite.max(0.0).sqrt()
}

/// Angular distance travelled counter-clockwise from `from` to `to`
#[inline]
pub fn ccw_span(from: f64, to: f64) -> f64 {
    let span = (to - from).rem_euclid(TAU);
    if span >= TAU { 0.0 } else { span }
}
