//! billow CLI: run, inspect and validate cloth sketches.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "billow")]
#[command(version, about = "billow: wind-blown cloth sketches on a position-based solver")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a sketch headless for a number of frames.
    Run {
        /// Preset to run (billow, settle). Ignored when --config is given.
        #[arg(short, long, default_value = "billow")]
        variant: String,

        /// Sketch config (TOML) to run instead of a preset.
        #[arg(short, long)]
        config: Option<String>,

        /// Frames to run.
        #[arg(short, long, default_value_t = 300)]
        frames: u64,

        /// Frame rate of the simulated display.
        #[arg(long, default_value_t = 60.0)]
        fps: f64,

        /// Use the wall clock and sleep between frames instead of a
        /// stepped clock.
        #[arg(long)]
        realtime: bool,

        /// Write every frame's vertices to this JSON file.
        #[arg(short, long)]
        output: Option<String>,

        /// Pointer position in normalized device coordinates, `x,y`.
        #[arg(long, value_parser = commands::parse_pointer)]
        pointer: Option<(f32, f32)>,

        /// Seed for the preset's random wind strength and noise seed.
        #[arg(long)]
        seed: Option<u64>,

        /// Log every telemetry event.
        #[arg(long)]
        events: bool,
    },

    /// Print a preset's config as TOML.
    Config {
        /// Preset (billow, settle).
        #[arg(short, long, default_value = "billow")]
        variant: String,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Validate a sketch config file.
    Validate {
        /// Path to config file (TOML).
        path: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            variant,
            config,
            frames,
            fps,
            realtime,
            output,
            pointer,
            seed,
            events,
        } => commands::run(commands::RunOptions {
            variant,
            config,
            frames,
            fps,
            realtime,
            output,
            pointer,
            seed,
            events,
        }),
        Commands::Config { variant, seed } => commands::print_config(&variant, seed),
        Commands::Validate { path } => commands::validate(&path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
