//! Emission profiles: named, declarative descriptions of how particles are born

use serde::{Deserialize, Serialize};
use spark_core::{Color, Result, SparkError};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Angular jitter applied to explosions whose profile leaves `spread` unset
pub const DEFAULT_SPREAD: f32 = 0.5;

/// Configuration for one visual effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionProfile {
    /// Particles per emission at full fidelity
    pub count: u32,
    /// Initial speed range [min, max]
    pub speed: [f32; 2],
    /// Size range [min, max]
    pub size: [f32; 2],
    pub colors: Vec<Color>,
    #[serde(default)]
    pub gravity: bool,
    #[serde(default)]
    pub glow: bool,
    #[serde(default)]
    pub trail: bool,
    /// Particle lifetime in milliseconds
    pub lifespan: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spread: Option<f32>,
}

impl EmissionProfile {
    /// Same profile with a different particle count
    pub fn with_count(&self, count: u32) -> Self {
        Self {
            count,
            ..self.clone()
        }
    }

    pub fn spread_or_default(&self) -> f32 {
        self.spread.unwrap_or(DEFAULT_SPREAD)
    }

    /// Reject profiles the emitter cannot sample from
    pub fn validate(&self, name: &str) -> Result<()> {
        if !self.speed.iter().chain(&self.size).all(|v| v.is_finite()) {
            return Err(SparkError::invalid_profile(name, "speed and size must be finite"));
        }
        if self.colors.is_empty() {
            return Err(SparkError::invalid_profile(name, "colors must not be empty"));
        }
        if self.lifespan == 0 {
            return Err(SparkError::invalid_profile(name, "lifespan must be positive"));
        }
        if self.speed[0] > self.speed[1] {
            return Err(SparkError::invalid_profile(name, "speed min exceeds max"));
        }
        if self.size[0] > self.size[1] {
            return Err(SparkError::invalid_profile(name, "size min exceeds max"));
        }
        if self.size[0] <= 0.0 {
            return Err(SparkError::invalid_profile(name, "size must be positive"));
        }
        if self.speed[0] < 0.0 {
            return Err(SparkError::invalid_profile(name, "speed must not be negative"));
        }
        Ok(())
    }
}

/// Partial profile read from a configuration file.
///
/// Fields left out fall back to the builtin profile of the same name; a patch
/// for a name with no builtin must provide every required field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilePatch {
    pub count: Option<u32>,
    pub speed: Option<[f32; 2]>,
    pub size: Option<[f32; 2]>,
    pub colors: Option<Vec<Color>>,
    pub gravity: Option<bool>,
    pub glow: Option<bool>,
    pub trail: Option<bool>,
    pub lifespan: Option<u32>,
    pub spread: Option<f32>,
}

impl ProfilePatch {
    pub fn apply(&self, name: &str, base: Option<&EmissionProfile>) -> Result<EmissionProfile> {
        let missing = |field: &str| SparkError::invalid_profile(name, format!("missing field `{field}`"));

        let profile = EmissionProfile {
            count: self
                .count
                .or(base.map(|b| b.count))
                .ok_or_else(|| missing("count"))?,
            speed: self
                .speed
                .or(base.map(|b| b.speed))
                .ok_or_else(|| missing("speed"))?,
            size: self
                .size
                .or(base.map(|b| b.size))
                .ok_or_else(|| missing("size"))?,
            colors: self
                .colors
                .clone()
                .or_else(|| base.map(|b| b.colors.clone()))
                .ok_or_else(|| missing("colors"))?,
            gravity: self.gravity.or(base.map(|b| b.gravity)).unwrap_or(false),
            glow: self.glow.or(base.map(|b| b.glow)).unwrap_or(false),
            trail: self.trail.or(base.map(|b| b.trail)).unwrap_or(false),
            lifespan: self
                .lifespan
                .or(base.map(|b| b.lifespan))
                .ok_or_else(|| missing("lifespan"))?,
            spread: self.spread.or(base.and_then(|b| b.spread)),
        };
        profile.validate(name)?;
        Ok(profile)
    }
}

/// Name → profile lookup table. Profiles are shared, never mutated in place.
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, Arc<EmissionProfile>>,
}

impl ProfileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The reference effect set
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for (name, profile) in builtin_profiles() {
            registry.profiles.insert(name.to_string(), Arc::new(profile));
        }
        registry
    }

    /// Add or replace a profile after validating it
    pub fn insert(&mut self, name: &str, profile: EmissionProfile) -> Result<()> {
        profile.validate(name)?;
        self.profiles.insert(name.to_string(), Arc::new(profile));
        Ok(())
    }

    /// Merge a configuration patch over whatever is registered under `name`
    pub fn apply_patch(&mut self, name: &str, patch: &ProfilePatch) -> Result<()> {
        let merged = patch.apply(name, self.get(name).map(|p| p.as_ref()))?;
        self.insert(name, merged)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<EmissionProfile>> {
        self.profiles.get(name)
    }

    /// Like `get`, but an unknown name is an error
    pub fn require(&self, name: &str) -> Result<&Arc<EmissionProfile>> {
        self.get(name)
            .ok_or_else(|| SparkError::UnknownProfile(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EmissionProfile)> {
        self.profiles.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

fn colors(tokens: &[&str]) -> Vec<Color> {
    tokens.iter().map(|t| Color::new(t)).collect()
}

#[allow(clippy::too_many_arguments)]
fn profile(
    count: u32,
    speed: [f32; 2],
    size: [f32; 2],
    palette: &[&str],
    gravity: bool,
    glow: bool,
    trail: bool,
    lifespan: u32,
    spread: f32,
) -> EmissionProfile {
    EmissionProfile {
        count,
        speed,
        size,
        colors: colors(palette),
        gravity,
        glow,
        trail,
        lifespan,
        spread: Some(spread),
    }
}

fn builtin_profiles() -> Vec<(&'static str, EmissionProfile)> {
    vec![
        (
            "explosion",
            profile(80, [5.0, 15.0], [2.0, 6.0], &["#00DC82", "#FFD700", "#FFFFFF"], true, true, true, 1000, 0.5),
        ),
        (
            "trail",
            profile(5, [1.0, 3.0], [1.0, 3.0], &["#00DC82", "#80ffcc"], false, true, false, 500, 1.0),
        ),
        (
            "flow",
            profile(1, [2.0, 5.0], [1.0, 2.0], &["#00DC82"], false, true, true, 2000, 0.1),
        ),
        (
            "rain",
            profile(1, [1.0, 3.0], [1.0, 2.0], &["#00DC82", "#80ffcc"], true, true, true, 3000, 0.3),
        ),
        (
            "fireworks",
            profile(
                150,
                [8.0, 20.0],
                [2.0, 8.0],
                &["#FF0080", "#FF8C00", "#FFD700", "#00DC82", "#00BFFF", "#8A2BE2"],
                true,
                true,
                true,
                2000,
                0.3,
            ),
        ),
        (
            "input",
            profile(3, [1.0, 2.0], [1.0, 2.0], &["#FFD700", "#FFA500"], false, true, false, 800, 0.5),
        ),
        (
            "hover",
            profile(5, [1.0, 4.0], [1.0, 3.0], &["#00DC82", "#FFD700"], false, true, true, 1500, 0.8),
        ),
        (
            "loading",
            profile(20, [3.0, 8.0], [1.0, 3.0], &["#00DC82", "#80ffcc", "#FFFFFF"], false, true, true, 1500, 0.2),
        ),
        (
            "error",
            profile(30, [4.0, 10.0], [2.0, 5.0], &["#FF4444", "#FF8888", "#AA0000"], true, true, true, 1200, 0.5),
        ),
    ]
}
