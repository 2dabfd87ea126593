//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - One unit of time per tick
//! - Injected RNG only
//! - Stable iteration order (by index or body ID)
//! - No rendering or platform dependencies

pub mod arc;
pub mod collision;
pub mod color;
pub mod geometry;
pub mod kinematics;
pub mod merge;
pub mod spawn;
pub mod state;
pub mod tick;

pub use arc::{ArcSegment, merge_arcs, resolve_arcs};
pub use collision::{IntersectionMap, find_intersections};
pub use color::{Rgba, blend};
pub use geometry::{
    Bounds, Quadrant, angle_to_point, circle_area, circles_intersect_properly, circles_overlap,
    intersect_circles, lens_area, point_to_angle,
};
pub use kinematics::{Accelerations, compute_accelerations, integrate, reflect_at_walls};
pub use merge::{MergeOutcome, assign_states, resolve_merges};
pub use spawn::{BodyOverrides, age_debris, initial_state, maybe_spawn, preview_body};
pub use state::{Body, BodyId, BodyState, Debris, Growth, SimulationState};
pub use tick::step;
