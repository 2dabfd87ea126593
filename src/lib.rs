//! Planet Merge - a 2D gravity sandbox
//!
//! Core modules:
//! - `sim`: Deterministic simulation (gravity, collisions, merges, debris)
//! - `engine`: Fixed-interval driver and interactive body creation
//! - `config`: User-editable simulation parameters
//! - `render`: Read-only snapshot handed to a drawing collaborator

pub mod config;
pub mod engine;
pub mod error;
pub mod render;
pub mod sim;

pub use config::{Config, ConfigField};
pub use engine::Simulation;
pub use error::ConfigError;
pub use sim::{Bounds, SimulationState, step};

use std::f64::consts::TAU;

/// Simulation constants
pub mod consts {
    /// Mass at which `radius_of` yields the base radius
    pub const BASE_MASS: f64 = 100.0;
    /// Radius of a body of `BASE_MASS`
    pub const BASE_RADIUS: f64 = 5.0;
    /// Mass per radius step
    pub const MASS_PER_RADIUS_STEP: f64 = 10.0;

    /// Center distance below which a pair exerts no force
    pub const DEGENERATE_DISTANCE: f64 = 1e-9;

    /// Overlap/area ratio that must be exceeded before a merge fires
    pub const MERGE_THRESHOLD: f64 = 0.3;
    /// Seconds over which an absorber grows after a merge
    pub const GROWTH_SECONDS: f64 = 10.0;
    /// Fraction of the absorbed body's excess mass phased into the absorber
    pub const GROWTH_MASS_FRACTION: f64 = 0.1;
    /// Upper bound (exclusive) of the color blend during growth
    pub const GROWTH_MAX_BLEND: f64 = 0.3;

    /// Debris lifetime in seconds
    pub const DEBRIS_SECONDS: f64 = 5.0;
    /// Outward velocity bias applied to debris per axis
    pub const DEBRIS_OUTWARD_BIAS: f64 = 0.2;

    /// Newborn grace period for spawned bodies (seconds)
    pub const SPAWN_NEWBORN_SECONDS: f64 = 3.0;
    /// Spawned body mass range
    pub const SPAWN_MASS_MIN: f64 = 120.0;
    pub const SPAWN_MASS_MAX: f64 = 500.0;
    /// Spawned body speed range (per axis)
    pub const SPAWN_SPEED_MIN: f64 = 0.15;
    pub const SPAWN_SPEED_MAX: f64 = 0.3;

    /// Initial population mass range
    pub const INITIAL_MASS_MIN: f64 = 100.0;
    pub const INITIAL_MASS_MAX: f64 = 430.0;
    /// Initial population speed bound (per axis, symmetric)
    pub const INITIAL_SPEED: f64 = 0.3;
    /// Inset of each body inside its placement slot
    pub const INITIAL_SLOT_MARGIN: f64 = 50.0;
    /// Attempts at finding a free spot before giving up
    pub const PLACEMENT_ATTEMPTS: u32 = 1000;

    /// Preview body starting mass
    pub const PREVIEW_MASS: f64 = 100.0;
    /// Preview mass gained per second while held
    pub const PREVIEW_GROWTH_PER_SECOND: f64 = 250.0;
    /// Speed (per axis) given to a released preview body
    pub const RELEASE_SPEED: f64 = 0.2;
    /// Newborn grace period for released bodies (seconds)
    pub const RELEASE_NEWBORN_SECONDS: f64 = 2.0;

    /// Random color channel range
    pub const COLOR_CHANNEL_MIN: u8 = 100;
    pub const COLOR_CHANNEL_MAX: u8 = 230;

    /// Maximum ticks per driver update to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
}

/// Normalize an angle to [0, 2π)
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Convert a unit-circle angle (counter-clockwise, y up) to a canvas arc
/// angle (clockwise, y down)
#[inline]
pub fn unit_circle_to_canvas(angle: f64) -> f64 {
    TAU - angle
}

/// Mass to radius mapping used for every body
#[inline]
pub fn radius_of(mass: f64) -> f64 {
    use consts::*;
    BASE_RADIUS + ((mass - BASE_MASS) / MASS_PER_RADIUS_STEP).floor()
}
