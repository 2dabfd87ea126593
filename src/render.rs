//! Read-only rendering contract
//!
//! A drawing backend receives a [`RenderFrame`] and turns it into pixels.
//! Nothing here mutates simulation state.

use bytemuck::{Pod, Zeroable};
use glam::{DVec2, Vec2};

use crate::sim::{ArcSegment, Body, BodyId, BodyState, Rgba, SimulationState};
use crate::unit_circle_to_canvas;

/// Debris tint (alpha fades with remaining life)
pub const DEBRIS_COLOR: Rgba = Rgba::new(120, 120, 130, 255);

/// One circle for instanced drawing
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CircleInstance {
    pub center: Vec2,
    pub radius: f32,
    pub color: [f32; 4],
}

impl CircleInstance {
    pub fn new(center: DVec2, radius: f64, color: Rgba) -> Self {
        Self {
            center: center.as_vec2(),
            radius: radius as f32,
            color: color.to_f32_array(),
        }
    }
}

/// Stroke arc in canvas orientation (clockwise angles, y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineArc {
    pub body: BodyId,
    pub center: DVec2,
    pub radius: f64,
    /// Canvas start angle
    pub start: f64,
    /// Canvas end angle
    pub end: f64,
    pub color: Rgba,
}

/// Everything a drawing collaborator needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct RenderFrame<'a> {
    pub state: &'a SimulationState,
    pub show_diagnostics: bool,
    pub preview: Option<&'a Body>,
}

impl<'a> RenderFrame<'a> {
    /// Filled circles: bodies, then debris, then the preview on top
    pub fn circles(&self) -> Vec<CircleInstance> {
        let bodies = self
            .state
            .bodies
            .iter()
            .map(|b| CircleInstance::new(b.position, b.radius, b.color));
        let debris = self
            .state
            .debris
            .iter()
            .map(|d| CircleInstance::new(d.position, d.radius, DEBRIS_COLOR.with_alpha(d.life())));
        let preview = self
            .preview
            .map(|b| CircleInstance::new(b.position, b.radius, b.color));

        bodies.chain(debris).chain(preview).collect()
    }

    /// Outline strokes: visible arcs of colliding bodies, full circles otherwise
    ///
    /// The arcs are drawn counter-clockwise on screen, so each unit-circle
    /// interval `[a, b]` becomes the canvas interval `[2π - a, 2π - b]`.
    pub fn outline_arcs(&self) -> Vec<OutlineArc> {
        let mut out = Vec::new();
        for body in self.state.bodies.iter().chain(self.preview) {
            let full = [ArcSegment::FULL];
            let arcs: &[ArcSegment] = match &body.state {
                BodyState::Colliding { arcs } => arcs,
                _ => &full,
            };
            out.extend(arcs.iter().map(|arc| OutlineArc {
                body: body.id,
                center: body.position,
                radius: body.radius,
                start: unit_circle_to_canvas(arc.start),
                end: unit_circle_to_canvas(arc.end),
                color: body.color,
            }));
        }
        out
    }

    /// Per-body information bars, when enabled
    pub fn diagnostics(&self) -> Option<Diagnostics> {
        self.show_diagnostics
            .then(|| Diagnostics::from_bodies(&self.state.bodies))
    }
}

/// Diagnostic readings for one body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyReadout {
    pub id: BodyId,
    pub acceleration: DVec2,
    pub velocity: DVec2,
    pub acceleration_magnitude: f64,
    pub velocity_magnitude: f64,
    /// Per-axis absolute momentum
    pub momentum: DVec2,
    /// Bar fill fractions in [0, 1]
    pub acceleration_bar: f64,
    pub velocity_bar: f64,
    pub momentum_bar: DVec2,
}

/// Information-bar data for all bodies
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    pub max_acceleration: f64,
    pub max_velocity: f64,
    pub max_momentum: DVec2,
    pub readouts: Vec<BodyReadout>,
}

impl Diagnostics {
    pub fn from_bodies(bodies: &[Body]) -> Self {
        let max_acceleration = bodies.iter().map(|b| b.acceleration.length()).fold(0.0, f64::max);
        let max_velocity = bodies.iter().map(|b| b.velocity.length()).fold(0.0, f64::max);
        let max_momentum = bodies
            .iter()
            .map(|b| b.momentum().abs())
            .fold(DVec2::ZERO, DVec2::max);

        let readouts = bodies
            .iter()
            .map(|b| {
                let acceleration_magnitude = b.acceleration.length();
                let velocity_magnitude = b.velocity.length();
                let momentum = b.momentum().abs();
                BodyReadout {
                    id: b.id,
                    acceleration: b.acceleration,
                    velocity: b.velocity,
                    acceleration_magnitude,
                    velocity_magnitude,
                    momentum,
                    acceleration_bar: fraction(acceleration_magnitude, max_acceleration),
                    velocity_bar: fraction(velocity_magnitude, max_velocity),
                    momentum_bar: DVec2::new(
                        fraction(momentum.x, max_momentum.x),
                        fraction(momentum.y, max_momentum.y),
                    ),
                }
            })
            .collect();

        Self {
            max_acceleration,
            max_velocity,
            max_momentum,
            readouts,
        }
    }
}

#[inline]
fn fraction(value: f64, max: f64) -> f64 {
    if max > 0.0 { value / max } else { 0.0 }
}
