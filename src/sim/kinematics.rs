//! Gravity, Euler integration and wall reflection
//!
//! One tick is one unit of time: `velocity += acceleration`,
//! `position += velocity`.

use glam::DVec2;
use std::collections::BTreeMap;

use super::geometry::Bounds;
use super::state::{Body, BodyId};
use crate::consts::DEGENERATE_DISTANCE;

/// Result of a force solve
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Accelerations {
    /// Net acceleration per participating body (newborns are absent)
    pub by_id: BTreeMap<BodyId, DVec2>,
    /// Ordered pairs skipped because their centers coincided
    pub degenerate_pairs: usize,
}

impl Accelerations {
    pub fn get(&self, id: BodyId) -> Option<DVec2> {
        self.by_id.get(&id).copied()
    }
}

/// Direct O(N²) gravitational acceleration
///
/// Newborn bodies neither attract nor are attracted. Pairs closer than
/// [`DEGENERATE_DISTANCE`] contribute nothing.
pub fn compute_accelerations(bodies: &[Body], g: f64) -> Accelerations {
    let mut result = Accelerations::default();

    for body in bodies.iter().filter(|b| !b.state.is_newborn()) {
        let mut acc = DVec2::ZERO;

        for other in bodies.iter().filter(|b| !b.state.is_newborn()) {
            if other.id == body.id {
                continue;
            }

            let delta = other.position - body.position;
            let r = delta.length();
            if r < DEGENERATE_DISTANCE {
                log::debug!("Coincident centers {} and {}; skipping pair", body.id, other.id);
                result.degenerate_pairs += 1;
                continue;
            }

            let force = g * body.mass * other.mass / (r * r);
            acc += delta / r * (force / body.mass);
        }

        result.by_id.insert(body.id, acc);
    }

    result
}

/// Apply accelerations to velocities; bodies without an entry keep theirs
pub fn integrate(bodies: &mut [Body], accelerations: &Accelerations) {
    for body in bodies.iter_mut() {
        if let Some(acc) = accelerations.get(body.id) {
            body.acceleration = acc;
            body.velocity += acc;
        }
    }
}

/// Advance position by velocity, then bounce off the canvas edges
pub fn advance(body: &mut Body, bounds: Bounds) {
    body.position += body.velocity;
    reflect_at_walls(body, bounds);
}

/// Clamp a body that crossed a wall back inside and flip that axis
///
/// The direction of travel on each axis decides which wall is checked.
/// Axes are handled independently, so corners bounce both ways.
pub fn reflect_at_walls(body: &mut Body, bounds: Bounds) {
    let radius = body.radius;
    reflect_axis(&mut body.position.x, &mut body.velocity.x, radius, bounds.width);
    reflect_axis(&mut body.position.y, &mut body.velocity.y, radius, bounds.height);
}

fn reflect_axis(pos: &mut f64, vel: &mut f64, radius: f64, bound: f64) {
    if *vel > 0.0 {
        if *pos >= bound - radius {
            *pos = bound - radius;
            *vel = -*vel;
        }
    } else if *pos <= radius {
        *pos = radius;
        *vel = -*vel;
    }
}
