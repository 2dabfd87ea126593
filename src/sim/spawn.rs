//! Debris aging, random arrivals, and body creation

use glam::DVec2;
use rand::Rng;
use rand::seq::SliceRandom;

use super::color::Rgba;
use super::geometry::{Bounds, circles_overlap};
use super::merge::frames_for;
use super::state::{Body, BodyId, BodyState, Debris, SimulationState};
use crate::consts::*;
use crate::radius_of;

/// Drift existing debris, drop expired particles, then append new ones
pub fn age_debris(current: Vec<Debris>, emitted: Vec<Debris>) -> Vec<Debris> {
    let mut debris: Vec<Debris> = current
        .into_iter()
        .filter_map(|mut d| {
            d.position += d.velocity;
            d.remaining_frames = d.remaining_frames.saturating_sub(1);
            (d.remaining_frames > 0).then_some(d)
        })
        .collect();
    debris.extend(emitted);
    debris
}

/// Roll for a new body drifting in from the canvas edge
///
/// Fires with probability `spawn_rate / ticks_per_second` per tick.
pub fn maybe_spawn<R: Rng + ?Sized>(
    id: BodyId,
    bounds: Bounds,
    spawn_rate: f64,
    ticks_per_second: f64,
    rng: &mut R,
) -> Option<Body> {
    if ticks_per_second <= 0.0 {
        return None;
    }
    let chance = spawn_rate / ticks_per_second;
    // Unvalidated configs can carry NaN or infinities
    let chance = if chance.is_finite() { chance.clamp(0.0, 1.0) } else { 0.0 };
    if !rng.random_bool(chance) {
        return None;
    }
    Some(edge_body(id, bounds, ticks_per_second, rng))
}

/// A newborn body just outside one edge, heading into the canvas
pub fn edge_body<R: Rng + ?Sized>(
    id: BodyId,
    bounds: Bounds,
    ticks_per_second: f64,
    rng: &mut R,
) -> Body {
    let mass = rng.random_range(SPAWN_MASS_MIN..SPAWN_MASS_MAX);
    let radius = radius_of(mass);

    let mut speed = || rng.random_range(SPAWN_SPEED_MIN..SPAWN_SPEED_MAX);
    let (sx, sy) = (speed(), speed());

    let x_inside = rng.random_bool(0.5);
    let past_far_edge = rng.random_bool(0.5);

    let (position, velocity) = if x_inside {
        let x = uniform_within(0.0, bounds.width, radius, rng);
        let (y, vy) = outside(bounds.height, radius, past_far_edge, sy);
        let vx = if x > bounds.width / 2.0 { -sx } else { sx };
        (DVec2::new(x, y), DVec2::new(vx, vy))
    } else {
        let y = uniform_within(0.0, bounds.height, radius, rng);
        let (x, vx) = outside(bounds.width, radius, past_far_edge, sx);
        let vy = if y > bounds.height / 2.0 { -sy } else { sy };
        (DVec2::new(x, y), DVec2::new(vx, vy))
    };

    log::debug!("Spawned body {id} (mass {mass:.1}) at ({:.0}, {:.0})", position.x, position.y);

    Body::new(id, position, velocity, mass, Rgba::random(rng)).with_state(BodyState::Newborn {
        remaining_frames: frames_for(SPAWN_NEWBORN_SECONDS, ticks_per_second),
    })
}

/// Coordinate and inward speed for the axis placed off-canvas
fn outside(bound: f64, radius: f64, past_far_edge: bool, speed: f64) -> (f64, f64) {
    if past_far_edge {
        (bound + radius, -speed)
    } else {
        (-radius, speed)
    }
}

/// Uniform coordinate in `[lo + margin, hi - margin)`, or the midpoint if
/// the span is too narrow
fn uniform_within<R: Rng + ?Sized>(lo: f64, hi: f64, margin: f64, rng: &mut R) -> f64 {
    let (lo, hi) = (lo + margin, hi - margin);
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        (lo + hi) / 2.0
    }
}

/// Optional fixed properties for [`preview_body`]
#[derive(Debug, Clone, Default)]
pub struct BodyOverrides {
    pub position: Option<DVec2>,
    pub velocity: Option<DVec2>,
    pub mass: Option<f64>,
    pub color: Option<Rgba>,
    pub state: Option<BodyState>,
}

/// Build a body, placing it clear of `existing` unless a position is given
pub fn preview_body<R: Rng + ?Sized>(
    id: BodyId,
    existing: &[Body],
    bounds: Bounds,
    overrides: BodyOverrides,
    rng: &mut R,
) -> Body {
    let mass = overrides
        .mass
        .unwrap_or_else(|| rng.random_range(INITIAL_MASS_MIN..INITIAL_MASS_MAX));
    let radius = radius_of(mass);
    let color = overrides.color.unwrap_or_else(|| Rgba::random(rng));
    let velocity = overrides.velocity.unwrap_or_else(|| {
        DVec2::new(
            rng.random_range(-INITIAL_SPEED..INITIAL_SPEED),
            rng.random_range(-INITIAL_SPEED..INITIAL_SPEED),
        )
    });
    let position = overrides
        .position
        .unwrap_or_else(|| free_position(existing, bounds, radius, rng));

    Body::new(id, position, velocity, mass, color)
        .with_state(overrides.state.unwrap_or(BodyState::Normal))
}

/// Random position that overlaps no existing body
fn free_position<R: Rng + ?Sized>(existing: &[Body], bounds: Bounds, radius: f64, rng: &mut R) -> DVec2 {
    let mut candidate = DVec2::ZERO;
    for _ in 0..PLACEMENT_ATTEMPTS {
        candidate = DVec2::new(
            uniform_within(0.0, bounds.width, radius, rng),
            uniform_within(0.0, bounds.height, radius, rng),
        );
        let clear = existing
            .iter()
            .all(|b| !circles_overlap(candidate, radius, b.position, b.radius));
        if clear {
            return candidate;
        }
    }
    log::warn!("No free spot found after {PLACEMENT_ATTEMPTS} attempts; placing anyway");
    candidate
}

/// Stratified starting population
///
/// Each body gets its own column and row slot so the initial layout is
/// spread over the canvas.
pub fn initial_state<R: Rng + ?Sized>(bounds: Bounds, count: u32, rng: &mut R) -> SimulationState {
    let count = count.max(1);
    let mut xs = slot_coordinates(bounds.width, count, rng);
    let mut ys = slot_coordinates(bounds.height, count, rng);
    xs.shuffle(rng);
    ys.shuffle(rng);

    let mut state = SimulationState::new();
    for (x, y) in xs.into_iter().zip(ys) {
        let id = state.next_body_id();
        let overrides = BodyOverrides {
            position: Some(DVec2::new(x, y)),
            ..Default::default()
        };
        let body = preview_body(id, &state.bodies, bounds, overrides, rng);
        state.insert_body(body);
    }

    log::info!(
        "Initial population: {} bodies on {}x{}",
        state.bodies.len(),
        bounds.width,
        bounds.height
    );
    state
}

fn slot_coordinates<R: Rng + ?Sized>(extent: f64, count: u32, rng: &mut R) -> Vec<f64> {
    let slot = (extent / count as f64).floor();
    (0..count)
        .map(|i| {
            let lo = i as f64 * slot;
            let hi = lo + slot;
            if hi - lo > 2.0 * INITIAL_SLOT_MARGIN {
                uniform_within(lo, hi, INITIAL_SLOT_MARGIN, rng)
            } else {
                uniform_within(0.0, extent, 0.0, rng)
            }
        })
        .collect()
}

/// Grow a held preview body by one tick's worth of mass
pub fn grow_preview(body: &mut Body, ticks_per_second: f64) {
    if ticks_per_second > 0.0 {
        body.set_mass(body.mass + PREVIEW_GROWTH_PER_SECOND / ticks_per_second);
    }
}

/// Turn a held preview into a newborn with a random diagonal push
pub fn release_preview<R: Rng + ?Sized>(mut body: Body, ticks_per_second: f64, rng: &mut R) -> Body {
    let mut sign = || if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    body.velocity = DVec2::new(sign(), sign()) * RELEASE_SPEED;
    body.state = BodyState::Newborn {
        remaining_frames: frames_for(RELEASE_NEWBORN_SECONDS, ticks_per_second),
    };
    body
}
