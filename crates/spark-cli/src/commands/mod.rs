pub mod profiles;
pub mod render;
pub mod simulate;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use spark_particles::rand::ParticleRng;
use spark_particles::{ChoreographyEvent, Engine, SparkConfig, SuccessFireworks, Surface};
use spark_runtime::{Haptics, HapticsError, ManualScheduler, Wakeup};
use std::path::Path;

/// Effect name that runs the success fireworks instead of a single profile
pub const SUCCESS_EFFECT: &str = "success";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Toml,
}

/// How a single-profile effect is emitted at the viewport center
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Pattern {
    Explosion,
    Trail,
    Flow,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Profile {
        name: String,
        pattern: Pattern,
        angle_deg: f32,
    },
    Success,
}

impl Effect {
    pub fn label(&self) -> &str {
        match self {
            Effect::Profile { name, .. } => name,
            Effect::Success => SUCCESS_EFFECT,
        }
    }
}

/// Haptics device for a terminal: reports the pattern through the log
struct LoggedHaptics;

impl Haptics for LoggedHaptics {
    fn vibrate(&mut self, pattern: &[u32]) -> Result<(), HapticsError> {
        tracing::info!("haptic pulse {:?}", pattern);
        Ok(())
    }
}

/// An engine plus the deterministic clock driving it
pub struct Session<S: Surface> {
    pub engine: Engine<S>,
    pub scheduler: ManualScheduler,
    fireworks: SuccessFireworks,
    completed_at_ms: Option<f64>,
}

pub struct SessionOptions<'a> {
    pub config: Option<&'a Path>,
    pub constrained: bool,
    pub seed: Option<u64>,
}

impl<S: Surface> Session<S> {
    /// Load configuration, build the engine around `surface` and start its loop
    pub fn open(surface: S, options: &SessionOptions<'_>) -> Result<Self> {
        let config = SparkConfig::load_or_default(options.config)
            .context("Failed to load configuration")?;
        let profiles = config
            .profile_registry()
            .context("Invalid profile configuration")?;

        let mut engine_config = config.engine.clone();
        engine_config.constrained |= options.constrained;
        if options.seed.is_some() {
            engine_config.seed = options.seed;
        }

        let scheduler = ManualScheduler::new(engine_config.physics.frame_interval_ms as f64);
        let fireworks = match engine_config.seed {
            Some(seed) => SuccessFireworks::with_rng(
                config.choreography.clone(),
                ParticleRng::new(seed.wrapping_add(1)),
            ),
            None => SuccessFireworks::new(config.choreography.clone()),
        };
        let mut session = Self {
            engine: Engine::with_config(Some(surface), engine_config, profiles),
            scheduler,
            fireworks,
            completed_at_ms: None,
        };
        session.engine.start(&mut session.scheduler);
        Ok(session)
    }

    /// Resolve an effect name against the engine's profiles
    pub fn resolve(&self, name: &str, pattern: Pattern, angle_deg: f32) -> Result<Effect> {
        if name == SUCCESS_EFFECT {
            return Ok(Effect::Success);
        }
        if !self.engine.profiles().contains(name) {
            let known: Vec<&str> = self.engine.profiles().names().collect();
            bail!(
                "unknown effect '{}'; expected '{}' or one of: {}",
                name,
                SUCCESS_EFFECT,
                known.join(", ")
            );
        }
        Ok(Effect::Profile {
            name: name.to_string(),
            pattern,
            angle_deg,
        })
    }

    /// Emit the effect at the center of the viewport; returns particles emitted
    pub fn play(&mut self, effect: &Effect) -> usize {
        let center = self.engine.viewport() * 0.5;
        match effect {
            Effect::Profile {
                name,
                pattern,
                angle_deg,
            } => match pattern {
                Pattern::Explosion => self.engine.explosion(center.x, center.y, name),
                Pattern::Trail => self.engine.trail(center.x, center.y, name),
                Pattern::Flow => {
                    self.engine
                        .flow(center.x, center.y, angle_deg.to_radians(), name)
                }
            },
            Effect::Success => {
                let before = self.engine.stats().emitted;
                self.fireworks
                    .trigger(&mut self.engine, &mut self.scheduler, &mut LoggedHaptics);
                (self.engine.stats().emitted - before) as usize
            }
        }
    }

    /// Deliver every frame and timer due up to `deadline_ms`
    pub fn run_until(&mut self, deadline_ms: f64) {
        while let Some(wakeups) = self.scheduler.poll_until(deadline_ms) {
            for wakeup in wakeups {
                match wakeup {
                    Wakeup::Frame { handle, time_ms } => {
                        self.engine.on_frame(&mut self.scheduler, handle, time_ms);
                    }
                    Wakeup::Timer { handle, time_ms } => {
                        let event =
                            self.fireworks
                                .on_timer(handle, &mut self.engine, &mut self.scheduler);
                        if event == ChoreographyEvent::Completed {
                            tracing::info!("fireworks completed at {time_ms}ms");
                            self.completed_at_ms = Some(time_ms);
                        }
                    }
                }
            }
        }
    }

    /// Time the success fireworks finished, if they have
    pub fn completed_at_ms(&self) -> Option<f64> {
        self.completed_at_ms
    }

    pub fn close(mut self) -> Engine<S> {
        self.fireworks.cancel(&mut self.scheduler);
        self.engine.stop(&mut self.scheduler);
        self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spark_particles::RecordingSurface;

    fn open(constrained: bool) -> Session<RecordingSurface> {
        let options = SessionOptions {
            config: None,
            constrained,
            seed: Some(11),
        };
        Session::open(RecordingSurface::new(800.0, 600.0), &options).unwrap()
    }

    #[test]
    fn resolve_effects() {
        let session = open(false);
        assert_eq!(
            session.resolve("success", Pattern::Explosion, 0.0).unwrap(),
            Effect::Success
        );
        assert!(matches!(
            session.resolve("rain", Pattern::Flow, -90.0).unwrap(),
            Effect::Profile { pattern: Pattern::Flow, .. }
        ));
        let err = session.resolve("confetti", Pattern::Explosion, 0.0).unwrap_err();
        assert!(err.to_string().contains("explosion"));
    }

    #[test]
    fn explosion_runs_and_expires() {
        let mut session = open(false);
        let effect = session.resolve("explosion", Pattern::Explosion, 0.0).unwrap();
        assert_eq!(session.play(&effect), 80);
        session.run_until(100.0);
        assert!(session.engine.active_count() > 0);
        // Explosion particles live at most 1000ms
        session.run_until(1200.0);
        assert_eq!(session.engine.active_count(), 0);
        assert!(session.engine.is_running());
    }

    #[test]
    fn success_completes_at_duration() {
        let mut session = open(true);
        assert_eq!(session.play(&Effect::Success), 75);
        session.run_until(2999.0);
        assert_eq!(session.completed_at_ms(), None);
        assert!(session.engine.active_count() > 0);
        session.run_until(3100.0);
        assert_eq!(session.completed_at_ms(), Some(3000.0));
        assert_eq!(session.engine.active_count(), 0);

        let engine = session.close();
        assert!(!engine.is_running());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let options = SessionOptions {
            config: Some(Path::new("/nonexistent/spark.toml")),
            constrained: false,
            seed: None,
        };
        assert!(Session::open(RecordingSurface::new(10.0, 10.0), &options).is_err());
    }
}
