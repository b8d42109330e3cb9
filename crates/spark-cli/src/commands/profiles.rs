//! List the emission profiles available to effects

use super::OutputFormat;
use anyhow::{Context, Result};
use spark_particles::{EmissionProfile, ProfileRegistry, SparkConfig};
use std::collections::BTreeMap;
use std::path::Path;

pub fn run(config: Option<&Path>, format: OutputFormat) -> Result<()> {
    let config = SparkConfig::load_or_default(config).context("Failed to load configuration")?;
    let registry = config
        .profile_registry()
        .context("Invalid profile configuration")?;
    print!("{}", describe(&registry, format)?);
    Ok(())
}

pub fn describe(registry: &ProfileRegistry, format: OutputFormat) -> Result<String> {
    let profiles: BTreeMap<&str, &EmissionProfile> = registry.iter().collect();
    let out = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&profiles)? + "\n",
        OutputFormat::Toml => toml::to_string_pretty(&profiles)?,
        OutputFormat::Text => {
            let mut out = format!(
                "{:<12} {:>5} {:>11} {:>9} {:>8}  {}\n",
                "NAME", "COUNT", "SPEED", "SIZE", "LIFE", "FLAGS"
            );
            for (name, p) in &profiles {
                let mut flags = Vec::new();
                if p.gravity {
                    flags.push("gravity");
                }
                if p.glow {
                    flags.push("glow");
                }
                if p.trail {
                    flags.push("trail");
                }
                out.push_str(&format!(
                    "{:<12} {:>5} {:>11} {:>9} {:>6}ms  {}\n",
                    name,
                    p.count,
                    format!("{}-{}", p.speed[0], p.speed[1]),
                    format!("{}-{}", p.size[0], p.size[1]),
                    p.lifespan,
                    flags.join(",")
                ));
            }
            out
        }
    };
    Ok(out)
}
