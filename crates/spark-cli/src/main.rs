//! Spark CLI - preview particle effects without a display

mod commands;
mod raster;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{profiles, render, simulate, OutputFormat, Pattern};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "spark")]
#[command(about = "Headless preview of pooled 2D particle effects", long_about = None)]
#[command(version)]
struct Cli {
    /// Log engine activity (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List emission profiles, including overrides from a config file
    Profiles {
        /// Path to a spark.toml
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Run an effect on a virtual clock and report particle counts
    Simulate {
        /// Profile name, or "success" for the fireworks celebration
        effect: String,

        /// Path to a spark.toml
        #[arg(long)]
        config: Option<PathBuf>,

        /// Use constrained (low-power) mode
        #[arg(long)]
        constrained: bool,

        /// Simulated time to run
        #[arg(long, default_value = "3500")]
        duration_ms: f64,

        /// Interval between reported samples
        #[arg(long, default_value = "250")]
        sample_ms: f64,

        /// Emission pattern for a profile effect
        #[arg(long, value_enum, default_value = "explosion")]
        pattern: Pattern,

        /// Flow direction in degrees (-90 is up)
        #[arg(long, default_value = "-90", allow_hyphen_values = true)]
        angle: f32,

        /// Fixed random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Viewport width in pixels
        #[arg(long, default_value = "1280")]
        width: u32,

        /// Viewport height in pixels
        #[arg(long, default_value = "720")]
        height: u32,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Render one frame of an effect to a PNG image
    Render {
        /// Profile name, or "success" for the fireworks celebration
        effect: String,

        /// Output image path
        #[arg(short, long, default_value = "spark.png")]
        output: PathBuf,

        /// Image width in pixels
        #[arg(long, default_value = "1280")]
        width: u32,

        /// Image height in pixels
        #[arg(long, default_value = "720")]
        height: u32,

        /// Simulated time of the captured frame
        #[arg(long, default_value = "400")]
        at_ms: f64,

        /// Use constrained (low-power) mode
        #[arg(long)]
        constrained: bool,

        /// Path to a spark.toml
        #[arg(long)]
        config: Option<PathBuf>,

        /// Emission pattern for a profile effect
        #[arg(long, value_enum, default_value = "explosion")]
        pattern: Pattern,

        /// Flow direction in degrees (-90 is up)
        #[arg(long, default_value = "-90", allow_hyphen_values = true)]
        angle: f32,

        /// Fixed random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Transparent background instead of black
        #[arg(long)]
        transparent: bool,
    },
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "info" } else { "warn" }));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Profiles { config, format } => profiles::run(config.as_deref(), format),
        Commands::Simulate {
            effect,
            config,
            constrained,
            duration_ms,
            sample_ms,
            pattern,
            angle,
            seed,
            width,
            height,
            format,
        } => simulate::run(simulate::SimulateArgs {
            effect,
            config,
            constrained,
            duration_ms,
            sample_ms,
            pattern,
            angle,
            seed,
            width,
            height,
            format,
        }),
        Commands::Render {
            effect,
            output,
            width,
            height,
            at_ms,
            constrained,
            config,
            pattern,
            angle,
            seed,
            transparent,
        } => render::run(render::RenderArgs {
            effect,
            output,
            width,
            height,
            at_ms,
            constrained,
            config,
            pattern,
            angle,
            seed,
            transparent,
        }),
    }
}
