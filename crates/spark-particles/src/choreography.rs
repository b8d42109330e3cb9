//! Success fireworks: a primary burst followed by timed secondary bursts
//!
//! ```text
//! Idle ──trigger──▶ Priming ──▶ Bursting ──max bursts──▶ Draining
//!   ▲                               │                        │
//!   └──────────── duration timeout ─┴────────────────────────┘
//! ```
//!
//! The controller owns at most two timer handles (the burst interval and the
//! teardown timeout) and cancels both on completion or `cancel`.

use crate::engine::Engine;
use crate::rand::ParticleRng;
use crate::surface::Surface;
use serde::{Deserialize, Serialize};
use spark_core::{Result, SparkError, Vec2};
use spark_runtime::{Haptics, TimerHandle, TimerScheduler};

/// Timing and shape of the celebration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoreographyConfig {
    /// Profile used for every burst
    pub profile: String,
    pub burst_interval_ms: f64,
    /// Secondary bursts after the primary one
    pub max_bursts: u32,
    /// Time from trigger to teardown
    pub duration_ms: f64,
    /// Fraction of each surface dimension secondary bursts land within, centered
    pub burst_region: f32,
    /// Vibration pattern played on trigger
    pub haptic_pattern: Vec<u32>,
}

impl Default for ChoreographyConfig {
    fn default() -> Self {
        Self {
            profile: "fireworks".into(),
            burst_interval_ms: 300.0,
            max_bursts: 8,
            duration_ms: 3000.0,
            burst_region: 0.6,
            haptic_pattern: vec![100, 50, 100, 50, 200],
        }
    }
}

impl ChoreographyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.burst_interval_ms.is_nan() || self.burst_interval_ms <= 0.0 {
            return Err(SparkError::InvalidConfig(
                "choreography.burst_interval_ms must be positive".into(),
            ));
        }
        if self.duration_ms.is_nan() || self.duration_ms < 0.0 {
            return Err(SparkError::InvalidConfig(
                "choreography.duration_ms must not be negative".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.burst_region) {
            return Err(SparkError::InvalidConfig(
                "choreography.burst_region must be within [0, 1]".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoreographyState {
    Idle,
    /// Primary burst being emitted; only observable from inside `trigger`
    Priming,
    Bursting,
    /// No more bursts scheduled; waiting for the teardown timeout
    Draining,
}

/// What a timer wakeup did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoreographyEvent {
    /// The handle is not one this controller holds
    Ignored,
    /// Secondary burst number `n` (1-based) was emitted
    Burst(u32),
    /// Teardown ran and the controller is idle again
    Completed,
}

pub struct SuccessFireworks {
    config: ChoreographyConfig,
    state: ChoreographyState,
    bursts: u32,
    burst_timer: Option<TimerHandle>,
    drain_timer: Option<TimerHandle>,
    rng: ParticleRng,
    on_complete: Option<Box<dyn FnMut()>>,
}

impl SuccessFireworks {
    pub fn new(config: ChoreographyConfig) -> Self {
        Self::with_rng(config, ParticleRng::from_entropy())
    }

    pub fn with_rng(config: ChoreographyConfig, rng: ParticleRng) -> Self {
        Self {
            config,
            state: ChoreographyState::Idle,
            bursts: 0,
            burst_timer: None,
            drain_timer: None,
            rng,
            on_complete: None,
        }
    }

    /// Register the callback invoked each time teardown completes
    pub fn on_complete(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> ChoreographyState {
        self.state
    }

    pub fn config(&self) -> &ChoreographyConfig {
        &self.config
    }

    /// Secondary bursts emitted since the last trigger
    pub fn bursts_fired(&self) -> u32 {
        self.bursts
    }

    /// Timer handles this controller currently holds
    pub fn pending_timers(&self) -> usize {
        self.burst_timer.is_some() as usize + self.drain_timer.is_some() as usize
    }

    /// Start the celebration. Ignored unless idle; returns whether it started.
    pub fn trigger<S: Surface>(
        &mut self,
        engine: &mut Engine<S>,
        timers: &mut dyn TimerScheduler,
        haptics: &mut dyn Haptics,
    ) -> bool {
        if self.state != ChoreographyState::Idle {
            tracing::debug!("fireworks already running ({:?}); trigger ignored", self.state);
            return false;
        }
        self.state = ChoreographyState::Priming;
        self.bursts = 0;

        let center = engine.viewport() * 0.5;
        let emitted = engine.explosion(center.x, center.y, &self.config.profile);
        spark_runtime::pulse(haptics, &self.config.haptic_pattern);

        self.drain_timer = Some(timers.set_timeout(self.config.duration_ms));
        if self.config.max_bursts > 0 {
            self.burst_timer = Some(timers.set_interval(self.config.burst_interval_ms));
            self.state = ChoreographyState::Bursting;
        } else {
            self.state = ChoreographyState::Draining;
        }
        tracing::info!("fireworks triggered: primary burst of {emitted} particles");
        true
    }

    /// Handle a fired timer
    pub fn on_timer<S: Surface>(
        &mut self,
        handle: TimerHandle,
        engine: &mut Engine<S>,
        timers: &mut dyn TimerScheduler,
    ) -> ChoreographyEvent {
        if self.burst_timer == Some(handle) {
            return self.burst(engine, timers);
        }
        if self.drain_timer == Some(handle) {
            self.drain_timer = None;
            self.finish(engine, timers);
            return ChoreographyEvent::Completed;
        }
        ChoreographyEvent::Ignored
    }

    /// Cancel every pending timer and go idle without clearing particles
    /// or running the completion callback (e.g. the host is unmounting).
    pub fn cancel(&mut self, timers: &mut dyn TimerScheduler) {
        self.release_timers(timers);
        self.state = ChoreographyState::Idle;
    }

    fn burst<S: Surface>(&mut self, engine: &mut Engine<S>, timers: &mut dyn TimerScheduler) -> ChoreographyEvent {
        let viewport = engine.viewport();
        let margin = (1.0 - self.config.burst_region) / 2.0;
        let origin = Vec2::new(
            viewport.x * (margin + self.rng.next_f32() * self.config.burst_region),
            viewport.y * (margin + self.rng.next_f32() * self.config.burst_region),
        );

        if let Some(profile) = engine.profiles().get(&self.config.profile).cloned() {
            let smaller = profile.with_count(profile.count / 2);
            engine.explosion_with(origin, &smaller);
        }
        self.bursts += 1;

        if self.bursts >= self.config.max_bursts {
            if let Some(h) = self.burst_timer.take() {
                timers.clear_interval(h);
            }
            self.state = ChoreographyState::Draining;
            tracing::debug!("fireworks draining after {} bursts", self.bursts);
        }
        ChoreographyEvent::Burst(self.bursts)
    }

    fn finish<S: Surface>(&mut self, engine: &mut Engine<S>, timers: &mut dyn TimerScheduler) {
        self.release_timers(timers);
        engine.clear();
        self.state = ChoreographyState::Idle;
        tracing::info!("fireworks complete");
        if let Some(callback) = self.on_complete.as_mut() {
            callback();
        }
    }

    fn release_timers(&mut self, timers: &mut dyn TimerScheduler) {
        if let Some(h) = self.burst_timer.take() {
            timers.clear_interval(h);
        }
        if let Some(h) = self.drain_timer.take() {
            timers.clear_timeout(h);
        }
    }
}
