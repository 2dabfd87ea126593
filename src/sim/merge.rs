//! Per-tick state labelling and mass-absorbing merges

use glam::DVec2;
use rand::Rng;
use std::collections::{BTreeMap, HashMap};
use std::f64::consts::TAU;

use super::arc::ArcSegment;
use super::collision::IntersectionMap;
use super::color::Rgba;
use super::geometry::{
    Bounds, Quadrant, angle_to_point, ccw_span, circle_area, circles_overlap, lens_area,
    point_to_angle,
};
use super::state::{Body, BodyId, BodyState, Debris, Growth};
use crate::consts::*;

/// Number of frames a duration covers at the given tick rate
#[inline]
pub fn frames_for(seconds: f64, ticks_per_second: f64) -> u32 {
    (seconds * ticks_per_second).round().max(1.0) as u32
}

/// Whether an overlap ratio is large enough to merge
#[inline]
pub fn exceeds_merge_threshold(ratio: f64) -> bool {
    ratio > MERGE_THRESHOLD
}

/// Assign this tick's state tag to every body
///
/// Bodies with resolved arcs become `Colliding`. Newborns fully inside the
/// canvas and clear of every other body count down their grace timer and
/// graduate to `Normal` with a fresh color. Everything else is `Normal`.
pub fn assign_states<R: Rng + ?Sized>(
    bodies: &mut [Body],
    arcs: &BTreeMap<BodyId, Vec<ArcSegment>>,
    bounds: Bounds,
    rng: &mut R,
) {
    for i in 0..bodies.len() {
        if let Some(body_arcs) = arcs.get(&bodies[i].id).filter(|a| !a.is_empty()) {
            bodies[i].state = BodyState::Colliding {
                arcs: body_arcs.clone(),
            };
            continue;
        }

        let BodyState::Newborn { remaining_frames } = bodies[i].state else {
            bodies[i].state = BodyState::Normal;
            continue;
        };

        let body = &bodies[i];
        // Grace is extended while still entering the scene or overlapping
        if !bounds.contains_circle(body.position, body.radius) {
            continue;
        }
        let overlapping = bodies.iter().enumerate().any(|(j, other)| {
            j != i && circles_overlap(body.position, body.radius, other.position, other.radius)
        });
        if overlapping {
            continue;
        }

        let remaining = remaining_frames.saturating_sub(1);
        if remaining == 0 {
            log::trace!("Body {} settled", bodies[i].id);
            bodies[i].color = Rgba::random(rng);
            bodies[i].state = BodyState::Normal;
        } else {
            bodies[i].state = BodyState::Newborn {
                remaining_frames: remaining,
            };
        }
    }
}

/// Outcome of merge resolution
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    pub bodies: Vec<Body>,
    pub debris: Vec<Debris>,
    pub merges: usize,
}

/// Resolve merges among colliding bodies
///
/// Bodies are visited from last to first. A colliding body that is strictly
/// heavier than every surviving neighbor stays. Otherwise the first neighbor
/// (by id) whose overlap exceeds [`MERGE_THRESHOLD`] of the body's own area
/// absorbs it: momentum is added to the absorber's velocity, a growth record
/// starts on the absorber, debris is emitted, and the body is removed.
///
/// # Panics
///
/// Panics if `intersections` names a body that is not in `bodies`; that is
/// a bookkeeping bug upstream.
pub fn resolve_merges<R: Rng + ?Sized>(
    mut bodies: Vec<Body>,
    intersections: &IntersectionMap,
    ticks_per_second: f64,
    rng: &mut R,
) -> MergeOutcome {
    let index: HashMap<BodyId, usize> = bodies.iter().enumerate().map(|(i, b)| (b.id, i)).collect();
    let index_of = |id: BodyId| -> usize {
        match index.get(&id) {
            Some(&i) => i,
            None => panic!("merge references unknown body {id}"),
        }
    };

    let mut removed = vec![false; bodies.len()];
    let mut debris = Vec::new();
    let mut merges = 0;

    for i in (0..bodies.len()).rev() {
        if !bodies[i].state.is_colliding() {
            continue;
        }
        let Some(neighbors) = intersections.get(&bodies[i].id) else {
            continue;
        };

        let live: Vec<(usize, &[DVec2; 2])> = neighbors
            .iter()
            .map(|(&id, points)| (index_of(id), points))
            .filter(|&(j, _)| !removed[j])
            .collect();

        let is_biggest = live.iter().all(|&(j, _)| bodies[i].mass > bodies[j].mass);
        if is_biggest {
            continue;
        }

        for &(j, points) in &live {
            let (body, other) = (&bodies[i], &bodies[j]);
            let overlap = lens_area(body.radius, other.radius, body.position.distance(other.position));
            let ratio = overlap / circle_area(body.radius);
            if !exceeds_merge_threshold(ratio) {
                continue;
            }

            let absorbed = bodies[i].clone();
            let absorber = &mut bodies[j];
            absorb(absorber, &absorbed, ticks_per_second);
            debris.extend(emit_debris(absorber, &absorbed, points, ticks_per_second, rng));

            log::debug!(
                "Body {} (mass {:.1}) merged into {} (ratio {:.2})",
                absorbed.id,
                absorbed.mass,
                absorber.id,
                ratio
            );
            removed[i] = true;
            merges += 1;
            break;
        }
    }

    let bodies = bodies
        .into_iter()
        .zip(removed)
        .filter_map(|(body, gone)| (!gone).then_some(body))
        .collect();

    MergeOutcome {
        bodies,
        debris,
        merges,
    }
}

/// Fold the vanishing body's momentum into the absorber and start growth
///
/// Mass is not added here; it is phased in by the growth record.
fn absorb(absorber: &mut Body, absorbed: &Body, ticks_per_second: f64) {
    absorber.velocity += absorbed.momentum() / absorber.mass;

    let total_frames = frames_for(GROWTH_SECONDS, ticks_per_second);
    absorber.growth = Some(Growth {
        remaining_frames: total_frames,
        total_frames,
        original_color: absorber.color,
        incoming_color: absorbed.color,
        mass_delta_per_frame: GROWTH_MASS_FRACTION * (absorbed.mass - BASE_MASS)
            / total_frames as f64,
    });
}

/// Scatter debris along the absorber's boundary on the side facing the
/// absorbed body
fn emit_debris<R: Rng + ?Sized>(
    absorber: &Body,
    absorbed: &Body,
    points: &[DVec2; 2],
    ticks_per_second: f64,
    rng: &mut R,
) -> Vec<Debris> {
    let a = point_to_angle(points[0], absorber.position);
    let b = point_to_angle(points[1], absorber.position);
    let (rad_min, rad_max) = (a.min(b), a.max(b));

    let probe = angle_to_point(rad_min + (rad_max - rad_min) / 2.0, absorber.position, absorber.radius);
    let (start, span) =
        if probe.distance(absorbed.position) < probe.distance(absorber.position) {
            (rad_min, rad_max - rad_min)
        } else {
            (rad_max, ccw_span(rad_max, rad_min))
        };

    let count = (absorbed.radius * rng.random::<f64>()).ceil().max(0.0) as usize;
    let frames = frames_for(DEBRIS_SECONDS, ticks_per_second);

    (0..count)
        .map(|_| {
            let radius = span * (0.5 + rng.random::<f64>());
            let angle = (start + radius + rng.random::<f64>() * (span - 2.0 * radius)).rem_euclid(TAU);
            let bias = Quadrant::of(angle).outward_sign() * DEBRIS_OUTWARD_BIAS;
            let jitter = DVec2::new(rng.random::<f64>(), rng.random::<f64>());

            Debris {
                position: angle_to_point(angle, absorber.position, absorber.radius),
                velocity: absorber.velocity + bias + jitter,
                radius,
                remaining_frames: frames,
                total_frames: frames,
            }
        })
        .collect()
}
