// snapshot - Render background frames to PNG
//
// Runs the engine offscreen on the software raster at a fixed frame rate
// and writes each frame as frame-NNNN.png.
//
// Usage: cargo run --bin snapshot -- [--config variant.json] [--frames 30] [--seed 7]

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use image::RgbaImage;

use aquaspace_engine::driver::{MAX_STEP_DT, ManualScheduler};
use aquaspace_engine::random::{ambient, seeded};
use aquaspace_engine::render::Raster;
use aquaspace_engine::{ConfigOverride, Engine};

#[derive(Parser, Debug, Clone)]
#[command(name = "snapshot", version, about = "Render background frames to PNG")]
struct Args {
    #[arg(long, help = "JSON file of configuration overrides")]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 1280, help = "Surface width in pixels")]
    width: u32,

    #[arg(long, default_value_t = 720, help = "Surface height in pixels")]
    height: u32,

    #[arg(long, default_value_t = 1, help = "Number of frames to write")]
    frames: u32,

    #[arg(long, default_value_t = 30.0, help = "Frames per second of simulated time")]
    fps: f64,

    #[arg(long, default_value_t = 0.0, help = "Seconds to simulate before the first frame")]
    warmup: f64,

    #[arg(long, default_value = ".", help = "Output directory")]
    out: PathBuf,

    #[arg(long, help = "Seed for repeatable placements")]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    if !(args.fps > 0.0) {
        return Err("--fps must be positive".into());
    }
    if !args.warmup.is_finite() {
        return Err("--warmup must be finite".into());
    }

    let overrides = match &args.config {
        Some(path) => ConfigOverride::from_json(&fs::read_to_string(path)?)?,
        None => ConfigOverride::default(),
    };
    let rng = match args.seed {
        Some(seed) => seeded(seed),
        None => ambient(),
    };

    println!(
        "Rendering {} frame(s) at {}x{} ({} override key(s))...",
        args.frames,
        args.width,
        args.height,
        overrides.keys().len()
    );

    let surface = Raster::new(args.width, args.height);
    let mut engine = Engine::create(surface, overrides, rng, ManualScheduler::default());

    // Warm up in maximum-size steps so transient populations show up.
    let (steps, tail) = warmup_plan(args.warmup);
    for _ in 0..steps {
        engine.step(MAX_STEP_DT);
    }
    if tail > 0.0 {
        engine.step(tail);
    }

    fs::create_dir_all(&args.out)?;
    engine.start()?;
    let interval = 1000.0 / args.fps;
    for n in 0..args.frames {
        engine.frame(n as f64 * interval)?;

        let raster = engine.surface();
        let img = RgbaImage::from_raw(raster.width(), raster.height(), raster.pixels().to_vec())
            .ok_or("raster buffer does not match its dimensions")?;
        let path = args.out.join(format!("frame-{n:04}.png"));
        img.save(&path)?;
        println!("  {}", path.display());
    }

    println!("Done!");
    Ok(())
}

/// Split `seconds` of warmup into whole maximum-size steps plus a shorter
/// final step.
fn warmup_plan(seconds: f64) -> (u64, f32) {
    if !(seconds > 0.0) {
        return (0, 0.0);
    }
    let max = MAX_STEP_DT as f64;
    let steps = (seconds / max).floor();
    let tail = (seconds - steps * max).max(0.0) as f32;
    (steps as u64, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warmup_splits_into_max_steps() {
        assert_eq!(warmup_plan(0.0), (0, 0.0));
        assert_eq!(warmup_plan(-3.0), (0, 0.0));

        let (steps, tail) = warmup_plan(0.12);
        assert_eq!(steps, 2);
        assert!((tail - 0.02).abs() < 1e-5);
    }

    #[test]
    fn long_warmup_has_a_finite_step_count() {
        // far beyond where subtracting one step from an f32 stops changing it
        let (steps, tail) = warmup_plan(4.0e6);
        assert!((79_999_990..=80_000_000).contains(&steps));
        assert!(tail >= 0.0 && tail < MAX_STEP_DT);
    }
}
