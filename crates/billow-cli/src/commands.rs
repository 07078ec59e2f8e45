//! CLI command implementations.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use billow_field::{PointerSample, PointerState};
use billow_render::{HeadlessRenderer, JsonFrameExporter, Renderer};
use billow_scene::{Clock, ClothSketch, FrameLoop, SketchConfig, SteppedClock, SystemClock, Variant};
use billow_telemetry::TracingSink;

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Options for `billow run`.
pub struct RunOptions {
    pub variant: String,
    pub config: Option<String>,
    pub frames: u64,
    pub fps: f64,
    pub realtime: bool,
    pub output: Option<String>,
    pub pointer: Option<(f32, f32)>,
    pub seed: Option<u64>,
    pub events: bool,
}

/// Parse `x,y` into a pointer position.
pub fn parse_pointer(text: &str) -> Result<(f32, f32), String> {
    let (x, y) = text
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{text}`"))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad x: {e}"))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad y: {e}"))?;
    Ok((x, y))
}

fn parse_variant(name: &str) -> Result<Variant, Box<dyn std::error::Error>> {
    Variant::all()
        .iter()
        .copied()
        .find(|v| v.name() == name)
        .ok_or_else(|| {
            let available: Vec<&str> = Variant::all().iter().map(|v| v.name()).collect();
            format!("Unknown variant: '{name}'. Available: {}", available.join(", ")).into()
        })
}

fn preset(name: &str, seed: Option<u64>) -> Result<SketchConfig, Box<dyn std::error::Error>> {
    let variant = parse_variant(name)?;
    let mut rng: Box<dyn RngCore> = match seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::thread_rng()),
    };
    Ok(SketchConfig::for_variant(variant, rng.as_mut()))
}

/// Run a sketch headless.
pub fn run(options: RunOptions) -> CliResult {
    let config = match &options.config {
        Some(path) => SketchConfig::load(path)?,
        None => preset(&options.variant, options.seed)?,
    };

    let pointer = Arc::new(PointerState::new());
    if let Some((x, y)) = options.pointer {
        pointer.set(PointerSample::new(x, y));
    }

    println!("billow");
    println!("──────");
    println!(
        "Lattice: {}×{} segments, {:?} weave, wind {} (strength {:.2})",
        config.cloth.segments_x,
        config.cloth.segments_y,
        config.cloth.weave,
        if config.wind.enabled { "on" } else { "off" },
        config.wind.strength,
    );

    let mut sketch = ClothSketch::setup(config, pointer)?;
    if options.events {
        sketch.add_sink(Box::new(TracingSink::new()));
    }

    let mut clock: Box<dyn Clock> = if options.realtime {
        Box::new(SystemClock::new())
    } else {
        Box::new(SteppedClock::at_fps(options.fps))
    };
    let mut renderer: Box<dyn Renderer> = match &options.output {
        Some(path) => Box::new(JsonFrameExporter::new(path)),
        None => Box::new(HeadlessRenderer::new()),
    };

    let mut frame_loop = FrameLoop::new(options.frames);
    if options.realtime {
        frame_loop = frame_loop.paced(options.fps);
    }
    let summary = frame_loop.run(&mut sketch, clock.as_mut(), renderer.as_mut())?;
    sketch.dispose();

    println!();
    println!("Frames:            {}", summary.frames);
    println!("Fixed steps:       {}", summary.steps);
    println!(
        "Capped frames:     {} ({:.3}s dropped)",
        summary.capped_frames, summary.dropped_time
    );
    println!("Kinetic energy:    {:.4}", summary.final_kinetic_energy);
    println!("Constraint error:  {:.2e}", summary.final_constraint_error);
    println!("Wall time:         {:.3}s", summary.total_wall_time);
    if let Some(path) = &options.output {
        println!("Frames written to: {path}");
    }
    Ok(())
}

/// Print a preset's config as TOML.
pub fn print_config(variant: &str, seed: Option<u64>) -> CliResult {
    let config = preset(variant, seed)?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}

/// Validate a sketch config file.
pub fn validate(path: &str) -> CliResult {
    println!("Validating: {path}");
    let config = SketchConfig::load(path)?;
    config.validate()?;
    let lattice = config.lattice()?;
    println!(
        "  ✓ {} particles, {} anchors, wind {}",
        lattice.particle_count(),
        config.anchors.len(),
        if config.wind.enabled { "on" } else { "off" }
    );
    Ok(())
}
