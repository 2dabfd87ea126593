//! Simulation state and core body types
//!
//! Everything carried from one tick to the next lives here.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::arc::ArcSegment;
use super::color::{Rgba, blend};
use crate::consts::GROWTH_MAX_BLEND;
use crate::radius_of;

/// Stable body identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u64);

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Per-tick body state tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BodyState {
    /// Regular gravitating body
    Normal,
    /// Freshly created; ignored by gravity and collisions until settled
    Newborn { remaining_frames: u32 },
    /// Crossing at least one other body this tick
    Colliding { arcs: Vec<ArcSegment> },
}

impl BodyState {
    #[inline]
    pub fn is_newborn(&self) -> bool {
        matches!(self, BodyState::Newborn { .. })
    }

    #[inline]
    pub fn is_colliding(&self) -> bool {
        matches!(self, BodyState::Colliding { .. })
    }
}

/// Gradual post-merge mass and color shift
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Growth {
    pub remaining_frames: u32,
    pub total_frames: u32,
    pub original_color: Rgba,
    pub incoming_color: Rgba,
    pub mass_delta_per_frame: f64,
}

impl Growth {
    /// Color blend amount for the frame about to be applied, in [0, 0.3)
    pub fn blend_amount(&self) -> f64 {
        let total = self.total_frames.max(1) as f64;
        GROWTH_MAX_BLEND * (1.0 - self.remaining_frames as f64 / total)
    }
}

/// A simulated planet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub position: DVec2,
    pub velocity: DVec2,
    pub acceleration: DVec2,
    pub mass: f64,
    pub radius: f64,
    pub color: Rgba,
    pub state: BodyState,
    #[serde(default)]
    pub growth: Option<Growth>,
}

impl Body {
    pub fn new(id: BodyId, position: DVec2, velocity: DVec2, mass: f64, color: Rgba) -> Self {
        Self {
            id,
            position,
            velocity,
            acceleration: DVec2::ZERO,
            mass,
            radius: radius_of(mass),
            color,
            state: BodyState::Normal,
            growth: None,
        }
    }

    pub fn with_state(mut self, state: BodyState) -> Self {
        self.state = state;
        self
    }

    /// Change mass, keeping radius in sync
    pub fn set_mass(&mut self, mass: f64) {
        self.mass = mass;
        self.radius = radius_of(mass);
    }

    #[inline]
    pub fn momentum(&self) -> DVec2 {
        self.velocity * self.mass
    }

    /// Apply one frame of an active growth record
    pub fn age_growth(&mut self) {
        let Some(growth) = self.growth.as_mut() else {
            return;
        };

        if growth.remaining_frames > 0 {
            let amount = growth.blend_amount();
            let delta = growth.mass_delta_per_frame;
            growth.remaining_frames -= 1;
            let color = blend(growth.original_color, growth.incoming_color, amount);
            let done = growth.remaining_frames == 0;

            self.set_mass(self.mass + delta);
            self.color = color;
            if done {
                self.growth = None;
            }
        } else {
            self.growth = None;
        }
    }
}

/// Short-lived decorative particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debris {
    pub position: DVec2,
    pub velocity: DVec2,
    pub radius: f64,
    pub remaining_frames: u32,
    pub total_frames: u32,
}

impl Debris {
    /// Remaining life as a fraction (1 = fresh)
    pub fn life(&self) -> f64 {
        self.remaining_frames as f64 / self.total_frames.max(1) as f64
    }
}

/// Complete simulation state (immutable between ticks)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub bodies: Vec<Body>,
    pub debris: Vec<Debris>,
    /// Next body ID
    next_id: u64,
}

impl SimulationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new body ID
    pub fn next_body_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    /// The ID the next allocation will return
    pub fn peek_body_id(&self) -> BodyId {
        BodyId(self.next_id)
    }

    /// Append a body, bumping the ID counter past it if needed
    pub fn insert_body(&mut self, body: Body) {
        debug_assert!(self.body(body.id).is_none(), "duplicate body id {}", body.id);
        self.next_id = self.next_id.max(body.id.0 + 1);
        self.bodies.push(body);
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    /// Sum of all body masses
    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(|b| b.mass).sum()
    }
}
