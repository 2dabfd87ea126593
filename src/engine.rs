//! Fixed-interval simulation driver
//!
//! Owns the state, config and RNG, and turns wall-clock time into ticks.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use std::time::Duration;

use crate::config::Config;
use crate::consts::{MAX_SUBSTEPS, PREVIEW_MASS};
use crate::render::RenderFrame;
use crate::sim::spawn::{grow_preview, release_preview};
use crate::sim::{Body, BodyOverrides, Bounds, SimulationState, initial_state, preview_body, step};

/// A running simulation
pub struct Simulation {
    state: SimulationState,
    config: Config,
    bounds: Bounds,
    rng: Pcg32,
    preview: Option<Body>,
    accumulator: Duration,
    ticks: u64,
}

impl Simulation {
    pub fn new(config: Config, bounds: Bounds, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let state = initial_state(bounds, config.initial_body_count, &mut rng);
        Self {
            state,
            config,
            bounds,
            rng,
            preview: None,
            accumulator: Duration::ZERO,
            ticks: 0,
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn preview(&self) -> Option<&Body> {
        self.preview.as_ref()
    }

    /// Ticks run since construction
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run exactly one step
    pub fn tick(&mut self) {
        self.state = step(&self.state, &self.config, self.bounds, &mut self.rng);
        if let Some(preview) = self.preview.as_mut() {
            grow_preview(preview, self.config.ticks_per_second);
        }
        self.ticks += 1;
    }

    /// Run as many ticks as fit in the accumulated time
    ///
    /// At most [`MAX_SUBSTEPS`] ticks run per call; leftover time beyond
    /// that is dropped. Returns the number of ticks run.
    pub fn update(&mut self, elapsed: Duration) -> u32 {
        let interval = self.config.tick_interval();
        self.accumulator = self.accumulator.saturating_add(elapsed);

        let mut substeps = 0;
        while self.accumulator >= interval && substeps < MAX_SUBSTEPS {
            self.tick();
            self.accumulator -= interval;
            substeps += 1;
        }

        if self.accumulator >= interval {
            log::debug!(
                "Dropping {:?} of simulation time after {MAX_SUBSTEPS} substeps",
                self.accumulator
            );
            self.accumulator = Duration::ZERO;
        }
        substeps
    }

    /// Rebuild the starting population
    pub fn reset(&mut self) {
        self.state = initial_state(self.bounds, self.config.initial_body_count, &mut self.rng);
        self.preview = None;
        self.accumulator = Duration::ZERO;
    }

    /// Replace the config, rebuilding the population if the body count changed
    pub fn set_config(&mut self, config: Config) {
        let rebuild = config.initial_body_count != self.config.initial_body_count;
        self.config = config;
        if rebuild {
            self.reset();
        }
    }

    pub fn resize(&mut self, bounds: Bounds) {
        log::info!("Canvas resized to {}x{}", bounds.width, bounds.height);
        self.bounds = bounds;
    }

    /// Start holding a new body at `point`
    pub fn begin_preview(&mut self, point: DVec2) {
        let overrides = BodyOverrides {
            position: Some(point),
            velocity: Some(DVec2::ZERO),
            mass: Some(PREVIEW_MASS),
            ..Default::default()
        };
        let id = self.state.peek_body_id();
        self.preview = Some(preview_body(
            id,
            &self.state.bodies,
            self.bounds,
            overrides,
            &mut self.rng,
        ));
    }

    pub fn move_preview(&mut self, point: DVec2) {
        if let Some(preview) = self.preview.as_mut() {
            preview.position = point;
        }
    }

    /// Let go of the held body, adding it to the simulation
    pub fn release_preview(&mut self) -> Option<&Body> {
        let body = self.preview.take()?;
        let mut body = release_preview(body, self.config.ticks_per_second, &mut self.rng);
        // Spawns may have taken the reserved ID while the body was held
        body.id = self.state.next_body_id();
        self.state.insert_body(body);
        self.state.bodies.last()
    }

    /// Read-only snapshot for drawing
    pub fn frame(&self, show_diagnostics: bool) -> RenderFrame<'_> {
        RenderFrame {
            state: &self.state,
            show_diagnostics,
            preview: self.preview.as_ref(),
        }
    }
}
