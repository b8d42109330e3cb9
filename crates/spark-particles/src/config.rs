//! Engine configuration, loadable from a `spark.toml` file
//!
//! ```toml
//! [engine]
//! constrained = false
//! pool_capacity = 1000
//! seed = 7
//!
//! [engine.physics]
//! gravity = 0.3
//!
//! [choreography]
//! max_bursts = 8
//!
//! [profiles.explosion]
//! count = 120
//! ```

use crate::choreography::ChoreographyConfig;
use crate::particle::DEFAULT_POOL_CAPACITY;
use crate::profile::{ProfilePatch, ProfileRegistry};
use crate::simulate::StepParams;
use serde::{Deserialize, Serialize};
use spark_core::{Result, SparkError};
use std::collections::BTreeMap;
use std::path::Path;

/// Settings fixed at engine construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Reduced-cost mode for small or low-power hosts
    pub constrained: bool,
    /// Idle records the pool retains
    pub pool_capacity: usize,
    pub physics: StepParams,
    /// Clamp for a single measured frame delta
    pub max_frame_delta_ms: Option<f64>,
    /// Fixed RNG seed; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            constrained: false,
            pool_capacity: DEFAULT_POOL_CAPACITY,
            physics: StepParams::default(),
            max_frame_delta_ms: None,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn constrained(constrained: bool) -> Self {
        Self {
            constrained,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        let interval = self.physics.frame_interval_ms;
        if !interval.is_finite() || interval <= 0.0 {
            return Err(SparkError::InvalidConfig(
                "physics.frame_interval_ms must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.physics.friction) {
            return Err(SparkError::InvalidConfig(
                "physics.friction must be within [0, 1]".into(),
            ));
        }
        if !self.physics.gravity.is_finite() {
            return Err(SparkError::InvalidConfig(
                "physics.gravity must be finite".into(),
            ));
        }
        if self
            .max_frame_delta_ms
            .is_some_and(|d| !d.is_finite() || d <= 0.0)
        {
            return Err(SparkError::InvalidConfig(
                "max_frame_delta_ms must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparkConfig {
    pub engine: EngineConfig,
    pub choreography: ChoreographyConfig,
    /// Overrides of builtin profiles and additional named profiles
    pub profiles: BTreeMap<String, ProfilePatch>,
}

impl SparkConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.engine.validate()?;
        config.choreography.validate()?;
        if config.engine.pool_capacity == 0 {
            tracing::warn!("pool_capacity is 0; released particles will be dropped");
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(
            "loaded {} ({} profile override(s))",
            path.display(),
            config.profiles.len()
        );
        Ok(config)
    }

    /// Load `path` if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Builtin profiles with this file's patches applied
    pub fn profile_registry(&self) -> Result<ProfileRegistry> {
        let mut registry = ProfileRegistry::builtin();
        for (name, patch) in &self.profiles {
            registry.apply_patch(name, patch)?;
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_is_all_defaults() {
        let config = SparkConfig::from_toml_str("").unwrap();
        assert_eq!(config, SparkConfig::default());
        assert_eq!(config.engine.pool_capacity, 1000);
        assert_eq!(config.engine.physics.frame_interval_ms, 16.0);
        assert_eq!(config.choreography.max_bursts, 8);
    }

    #[test]
    fn parse_full_file() {
        let toml_str = r##"
[engine]
constrained = true
pool_capacity = 250
seed = 9

[engine.physics]
gravity = 0.5

[choreography]
max_bursts = 3
duration_ms = 1500

[profiles.explosion]
count = 12

[profiles.sparkle]
count = 4
speed = [1, 2]
size = [1, 1]
colors = ["#FFFFFF", "#FFD700"]
lifespan = 400
"##;
        let config = SparkConfig::from_toml_str(toml_str).unwrap();
        assert!(config.engine.constrained);
        assert_eq!(config.engine.pool_capacity, 250);
        assert_eq!(config.engine.seed, Some(9));
        assert!((config.engine.physics.gravity - 0.5).abs() < 1e-6);
        // Unset physics keys keep their defaults
        assert!((config.engine.physics.friction - 0.98).abs() < 1e-6);
        assert_eq!(config.choreography.max_bursts, 3);
        assert_eq!(config.choreography.duration_ms, 1500.0);

        let registry = config.profile_registry().unwrap();
        assert_eq!(registry.get("explosion").unwrap().count, 12);
        assert_eq!(registry.get("sparkle").unwrap().colors.len(), 2);
        assert_eq!(registry.len(), 10);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(SparkConfig::from_toml_str("[engine.physics]\nfriction = 1.5").is_err());
        assert!(SparkConfig::from_toml_str("[engine.physics]\nframe_interval_ms = 0").is_err());
        assert!(SparkConfig::from_toml_str("[engine]\npool_capacity = \"lots\"").is_err());
        assert!(SparkConfig::from_toml_str("[engine]\nmax_frame_delta_ms = nan").is_err());
        assert!(SparkConfig::from_toml_str("[engine]\nmax_frame_delta_ms = inf").is_err());
        assert!(SparkConfig::from_toml_str("[engine.physics]\nframe_interval_ms = inf").is_err());
        assert!(SparkConfig::from_toml_str("[engine]\nmax_frame_delta_ms = 50").is_ok());

        let config =
            SparkConfig::from_toml_str("[profiles.explosion]\ncolors = []").unwrap();
        assert!(config.profile_registry().is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[engine]\nconstrained = true").unwrap();
        let config = SparkConfig::load(file.path()).unwrap();
        assert!(config.engine.constrained);

        let missing = SparkConfig::load(Path::new("/nonexistent/spark.toml"));
        assert!(matches!(missing, Err(SparkError::IoError(_))));
    }
}
