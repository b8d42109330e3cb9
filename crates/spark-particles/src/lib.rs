//! Spark Particles - pooled 2D particle effects
//!
//! Provides short-lived decorative particle bursts with:
//! - LIFO record pool so bursts do not allocate once warm
//! - Named emission profiles (explosion, trail, flow, fireworks, ...)
//! - Frame-rate independent simulation with gravity, friction, rotation and trails
//! - Surface-agnostic rendering in trail → glow → body order
//! - An engine owning its own frame loop, and the success fireworks choreography

pub mod choreography;
pub mod config;
pub mod emit;
pub mod engine;
pub mod particle;
pub mod profile;
pub mod rand;
pub mod render;
pub mod simulate;
pub mod surface;

pub use choreography::{ChoreographyConfig, ChoreographyEvent, ChoreographyState, SuccessFireworks};
pub use config::{EngineConfig, SparkConfig};
pub use engine::{Engine, EngineStats, LoopState};
pub use particle::{Particle, ParticlePool, Rotation};
pub use profile::{EmissionProfile, ProfilePatch, ProfileRegistry};
pub use simulate::StepParams;
pub use surface::{ColorStop, DrawCommand, RecordingSurface, StopColor, Surface};
