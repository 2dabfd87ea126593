//! One simulation step
//!
//! Phases run in a fixed order: growth aging, movement, interaction
//! resolution, debris aging, spawning.

use rand::Rng;

use super::arc::resolve_arcs;
use super::collision::find_intersections;
use super::geometry::Bounds;
use super::kinematics::{advance, compute_accelerations, integrate};
use super::merge::{assign_states, resolve_merges};
use super::spawn::{age_debris, maybe_spawn};
use super::state::SimulationState;
use crate::config::Config;

/// Advance the simulation by one tick, returning the new state
///
/// The input state is left untouched. Given the same inputs and the same
/// random sequence the output is identical.
pub fn step<R: Rng + ?Sized>(
    state: &SimulationState,
    config: &Config,
    bounds: Bounds,
    rng: &mut R,
) -> SimulationState {
    let mut next = state.clone();
    let tps = config.ticks_per_second;

    for body in &mut next.bodies {
        body.age_growth();
    }

    let accelerations = compute_accelerations(&next.bodies, config.gravitational_constant);
    if accelerations.degenerate_pairs > 0 {
        log::debug!("{} degenerate force pairs this tick", accelerations.degenerate_pairs);
    }
    integrate(&mut next.bodies, &accelerations);
    for body in &mut next.bodies {
        advance(body, bounds);
    }

    let intersections = find_intersections(&next.bodies);
    let arcs = resolve_arcs(&next.bodies, &intersections);
    assign_states(&mut next.bodies, &arcs, bounds, rng);
    let outcome = resolve_merges(std::mem::take(&mut next.bodies), &intersections, tps, rng);
    next.bodies = outcome.bodies;

    next.debris = age_debris(std::mem::take(&mut next.debris), outcome.debris);

    let id = next.peek_body_id();
    if let Some(body) = maybe_spawn(id, bounds, config.spawn_rate, tps, rng) {
        next.insert_body(body);
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::color::Rgba;
    use crate::sim::state::{Body, BodyId, BodyState, Debris};
    use glam::DVec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const BOUNDS: Bounds = Bounds::new(400.0, 300.0);

    fn quiet_config() -> Config {
        Config {
            spawn_rate: 0.0,
            ..Config::default()
        }
    }

    fn body(id: u64, x: f64, y: f64, mass: f64) -> Body {
        Body::new(BodyId(id), DVec2::new(x, y), DVec2::ZERO, mass, Rgba::new(150, 150, 150, 255))
    }

    #[test]
    fn test_wall_bounce_scenario() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = SimulationState::new();
        let mut b = body(1, BOUNDS.width - 2.0, BOUNDS.height / 2.0, 100.0);
        b.velocity = DVec2::new(1.0, 0.0);
        state.insert_body(b);

        let next = step(&state, &quiet_config(), BOUNDS, &mut rng);
        assert_eq!(next.bodies[0].position.x, BOUNDS.width - 5.0);
        assert_eq!(next.bodies[0].velocity.x, -1.0);
        // Input untouched
        assert_eq!(state.bodies[0].position.x, BOUNDS.width - 2.0);
    }

    #[test]
    fn test_empty_state_still_ages_debris_and_spawns() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut state = SimulationState::new();
        state.debris.push(Debris {
            position: DVec2::ZERO,
            velocity: DVec2::new(1.0, 1.0),
            radius: 1.0,
            remaining_frames: 2,
            total_frames: 2,
        });

        let next = step(&state, &quiet_config(), BOUNDS, &mut rng);
        assert!(next.bodies.is_empty());
        assert_eq!(next.debris[0].remaining_frames, 1);

        let always = Config {
            spawn_rate: 50.0,
            ticks_per_second: 50.0,
            ..Config::default()
        };
        let next = step(&next, &always, BOUNDS, &mut rng);
        assert_eq!(next.bodies.len(), 1);
        assert!(next.bodies[0].state.is_newborn());
        assert!(next.debris.is_empty());
    }

    #[test]
    fn test_overlapping_pair_merges_within_a_tick() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut state = SimulationState::new();
        state.insert_body(body(1, 100.0, 100.0, 200.0));
        state.insert_body(body(2, 125.0, 100.0, 400.0));

        let next = step(&state, &quiet_config(), BOUNDS, &mut rng);
        assert_eq!(next.bodies.len(), 1);
        assert_eq!(next.bodies[0].id, BodyId(2));
        assert!(next.bodies[0].growth.is_some());
    }

    #[test]
    fn test_growth_applies_on_following_ticks() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut state = SimulationState::new();
        state.insert_body(body(1, 100.0, 100.0, 200.0));
        state.insert_body(body(2, 125.0, 100.0, 400.0));
        let config = quiet_config();

        let mut next = step(&state, &config, BOUNDS, &mut rng);
        let mass_after_merge = next.bodies[0].mass;
        for _ in 0..10 {
            next = step(&next, &config, BOUNDS, &mut rng);
        }
        assert!(next.bodies[0].mass > mass_after_merge);
    }

    #[test]
    fn test_newborn_does_not_feel_gravity() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut state = SimulationState::new();
        state.insert_body(body(1, 100.0, 150.0, 400.0));
        state.insert_body(
            body(2, 300.0, 150.0, 400.0).with_state(BodyState::Newborn { remaining_frames: 100 }),
        );
        let config = Config {
            gravitational_constant: 10.0,
            ..quiet_config()
        };

        let next = step(&state, &config, BOUNDS, &mut rng);
        assert_eq!(next.bodies[0].velocity, DVec2::ZERO);
        assert_eq!(next.bodies[1].velocity, DVec2::ZERO);
    }

    #[test]
    fn test_deterministic_with_same_seed() {
        let config = Config {
            spawn_rate: 5.0,
            ..Config::default()
        };
        let bounds = Bounds::new(800.0, 600.0);
        let run = |seed: u64| {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut state = crate::sim::initial_state(bounds, 8, &mut rng);
            for _ in 0..300 {
                state = step(&state, &config, bounds, &mut rng);
            }
            state
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_body_count_never_grows_without_spawns() {
        let mut rng = Pcg32::seed_from_u64(6);
        let bounds = Bounds::new(500.0, 500.0);
        let config = Config {
            gravitational_constant: 1.0,
            ..quiet_config()
        };
        let mut state = crate::sim::initial_state(bounds, 10, &mut rng);
        let mut count = state.bodies.len();
        for _ in 0..500 {
            state = step(&state, &config, bounds, &mut rng);
            assert!(state.bodies.len() <= count);
            count = state.bodies.len();
            for b in &state.bodies {
                assert!(b.position.is_finite());
                assert!(b.velocity.is_finite());
                assert_eq!(b.radius, crate::radius_of(b.mass));
            }
        }
    }
}
