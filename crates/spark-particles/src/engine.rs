//! Engine: owns one pool, one active list and the frame loop that drives them

use crate::config::EngineConfig;
use crate::emit::Emitter;
use crate::particle::{Particle, ParticlePool};
use crate::profile::{EmissionProfile, ProfileRegistry};
use crate::rand::ParticleRng;
use crate::render;
use crate::simulate::{self, StepParams};
use crate::surface::Surface;
use spark_core::Vec2;
use spark_runtime::{FrameClock, FrameHandle, FrameScheduler};

/// Frame loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

/// Running totals since construction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Particles born by any emission call
    pub emitted: u64,
    /// Particles that died of old age
    pub expired: u64,
    /// Particles removed by `clear`
    pub cleared: u64,
    /// Frames run by the loop
    pub frames: u64,
}

/// A self-contained particle effect instance.
///
/// Without a surface the engine still simulates; it just never draws.
/// Independent effects must use independent engines.
pub struct Engine<S: Surface> {
    surface: Option<S>,
    config: EngineConfig,
    profiles: ProfileRegistry,
    pool: ParticlePool,
    active: Vec<Particle>,
    rng: ParticleRng,
    clock: FrameClock,
    frame: Option<FrameHandle>,
    stats: EngineStats,
}

impl<S: Surface> Engine<S> {
    /// Engine with the builtin profiles and default settings
    pub fn new(surface: Option<S>, constrained: bool) -> Self {
        Self::with_config(
            surface,
            EngineConfig::constrained(constrained),
            ProfileRegistry::builtin(),
        )
    }

    pub fn with_config(surface: Option<S>, config: EngineConfig, profiles: ProfileRegistry) -> Self {
        let rng = match config.seed {
            Some(seed) => ParticleRng::new(seed),
            None => ParticleRng::from_entropy(),
        };
        let clock = match config.max_frame_delta_ms {
            Some(max) => FrameClock::with_max_delta(max),
            None => FrameClock::new(),
        };
        if surface.is_none() {
            tracing::debug!("engine created without a surface; rendering disabled");
        }
        Self {
            surface,
            pool: ParticlePool::new(config.pool_capacity),
            active: Vec::new(),
            rng,
            clock,
            frame: None,
            stats: EngineStats::default(),
            config,
            profiles,
        }
    }

    // ── Emission ──

    /// Radial burst of the named profile at `(x, y)`. Returns particles emitted.
    pub fn explosion(&mut self, x: f32, y: f32, profile: &str) -> usize {
        match self.lookup(profile) {
            Some(p) => self.explosion_with(Vec2::new(x, y), &p),
            None => 0,
        }
    }

    /// Cursor-follow burst of the named profile around `(x, y)`
    pub fn trail(&mut self, x: f32, y: f32, profile: &str) -> usize {
        match self.lookup(profile) {
            Some(p) => self.trail_with(Vec2::new(x, y), &p),
            None => 0,
        }
    }

    /// One particle of the named profile heading along `angle`
    pub fn flow(&mut self, x: f32, y: f32, angle: f32, profile: &str) -> usize {
        match self.lookup(profile) {
            Some(p) => self.flow_with(Vec2::new(x, y), angle, &p),
            None => 0,
        }
    }

    pub fn explosion_with(&mut self, origin: Vec2, profile: &EmissionProfile) -> usize {
        let n = self.emitter().explosion(origin, profile);
        self.stats.emitted += n as u64;
        n
    }

    pub fn trail_with(&mut self, origin: Vec2, profile: &EmissionProfile) -> usize {
        let n = self.emitter().trail(origin, profile);
        self.stats.emitted += n as u64;
        n
    }

    pub fn flow_with(&mut self, origin: Vec2, angle: f32, profile: &EmissionProfile) -> usize {
        let n = self.emitter().flow(origin, angle, profile);
        self.stats.emitted += n as u64;
        n
    }

    fn lookup(&self, name: &str) -> Option<std::sync::Arc<EmissionProfile>> {
        let found = self.profiles.get(name).cloned();
        if found.is_none() {
            tracing::debug!("unknown emission profile '{name}'; nothing emitted");
        }
        found
    }

    fn emitter(&mut self) -> Emitter<'_> {
        Emitter {
            pool: &mut self.pool,
            active: &mut self.active,
            rng: &mut self.rng,
            constrained: self.config.constrained,
        }
    }

    // ── Simulation and drawing ──

    /// Advance every active particle by `delta_ms`
    pub fn update(&mut self, delta_ms: f32) {
        let expired = simulate::step(
            &mut self.active,
            &mut self.pool,
            delta_ms,
            &self.config.physics,
        );
        self.stats.expired += expired as u64;
    }

    /// Draw the active particles; a no-op without a surface
    pub fn render(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            render::render(&self.active, surface);
        }
    }

    /// One loop iteration: clear, simulate, draw
    pub fn tick(&mut self, delta_ms: f32) {
        if let Some(surface) = self.surface.as_mut() {
            surface.clear();
        }
        self.update(delta_ms);
        self.render();
        self.stats.frames += 1;
    }

    // ── Lifecycle ──

    /// Begin the frame loop. Does nothing if already running.
    pub fn start(&mut self, frames: &mut dyn FrameScheduler) {
        if self.frame.is_some() {
            return;
        }
        self.clock.reset(frames.now_ms());
        self.frame = Some(frames.request_frame());
        tracing::debug!("particle loop started");
    }

    /// Cancel the pending frame. Safe to call when stopped.
    pub fn stop(&mut self, frames: &mut dyn FrameScheduler) {
        if let Some(handle) = self.frame.take() {
            frames.cancel_frame(handle);
            tracing::debug!("particle loop stopped");
        }
    }

    /// Handle a fired frame. Returns `false` for a handle this engine does not
    /// own (a stale or foreign frame), which is ignored.
    pub fn on_frame(&mut self, frames: &mut dyn FrameScheduler, handle: FrameHandle, time_ms: f64) -> bool {
        if self.frame != Some(handle) {
            return false;
        }
        let delta = self.clock.tick(time_ms);
        self.tick(delta as f32);
        self.frame = Some(frames.request_frame());
        true
    }

    /// Return every active particle to the pool. The loop keeps running.
    pub fn clear(&mut self) {
        let n = self.active.len();
        for p in self.active.drain(..) {
            self.pool.release(p);
        }
        self.stats.cleared += n as u64;
    }

    /// Stop the loop and drop all particles
    pub fn teardown(&mut self, frames: &mut dyn FrameScheduler) {
        self.stop(frames);
        self.clear();
    }

    // ── Accessors ──

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.active
    }

    pub fn is_running(&self) -> bool {
        self.frame.is_some()
    }

    pub fn state(&self) -> LoopState {
        if self.is_running() {
            LoopState::Running
        } else {
            LoopState::Stopped
        }
    }

    pub fn is_constrained(&self) -> bool {
        self.config.constrained
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn profiles(&self) -> &ProfileRegistry {
        &self.profiles
    }

    pub fn physics(&self) -> &StepParams {
        &self.config.physics
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    /// Surface dimensions, or zero without a surface
    pub fn viewport(&self) -> Vec2 {
        self.surface.as_ref().map(|s| s.size()).unwrap_or(Vec2::ZERO)
    }

    /// Random source shared with compositions driving this engine
    pub fn rng_mut(&mut self) -> &mut ParticleRng {
        &mut self.rng
    }
}
