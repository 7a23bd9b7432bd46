#![deny(unsafe_code)]
//! CLI binary for the liquid reveal effect.
//!
//! Subcommands:
//! - `render`: drive a scripted gesture over two images, write the final frame as PNG
//! - `gestures`: print available gestures
//! - `params`: print default parameters and their schema

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use liquid_reveal_core::{EffectConfig, EffectController, ImageSource, SolidColor, Texture};
use liquid_reveal_host::snapshot::{load_texture, write_field_png, write_png};
use liquid_reveal_host::{FrameDriver, GestureKind};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

/// Frame size used when no image supplies one.
const DEFAULT_SIZE: usize = 512;

#[derive(Parser)]
#[command(name = "liquid-reveal", about = "Liquid reveal effect renderer")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Drive a gesture for N frames and write the last frame as PNG.
    Render {
        /// Image revealed under the trail.
        #[arg(long)]
        background: Option<PathBuf>,

        /// Image shown everywhere else.
        #[arg(long)]
        overlay: Option<PathBuf>,

        /// Gesture name (still, sweep, circle, zigzag, tap).
        #[arg(short, long, default_value = "sweep")]
        gesture: String,

        /// Number of frames to step.
        #[arg(short, long, default_value_t = 90)]
        frames: u64,

        /// Frame rate of the simulated display.
        #[arg(long, default_value_t = 60)]
        fps: u32,

        /// Pointer samples delivered between two frames.
        #[arg(long, default_value_t = 4)]
        samples: u32,

        /// Output width in pixels (defaults to the background width).
        #[arg(short = 'W', long)]
        width: Option<usize>,

        /// Output height in pixels (defaults to the background height).
        #[arg(short = 'H', long)]
        height: Option<usize>,

        /// Effect parameters as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,

        /// Also write the metaball energy field as a grayscale PNG.
        #[arg(long)]
        energy_output: Option<PathBuf>,
    },
    /// List available gestures.
    Gestures,
    /// Print default parameters and the parameter schema.
    Params,
}

fn load(path: Option<&Path>) -> Result<Option<Texture>, CliError> {
    path.map(load_texture).transpose().map_err(CliError::from)
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Gestures => {
            let names = GestureKind::list_gestures();
            if cli.json {
                let info: Vec<_> = names
                    .iter()
                    .filter_map(|n| GestureKind::from_name(n).ok())
                    .map(|g| {
                        serde_json::json!({
                            "name": g.name(),
                            "duration_ms": g.duration().as_millis() as u64,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Gestures:");
                for name in names {
                    println!("  {name}");
                }
            }
        }
        Command::Params => {
            let defaults = EffectConfig::default().params();
            if cli.json {
                let info = serde_json::json!({
                    "defaults": defaults,
                    "schema": EffectConfig::param_schema(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else if let Some(map) = defaults.as_object() {
                for (key, value) in map {
                    println!("  {key} = {value}");
                }
            }
        }
        Command::Render {
            background,
            overlay,
            gesture,
            frames,
            fps,
            samples,
            width,
            height,
            params,
            output,
            energy_output,
        } => {
            let params: serde_json::Value = serde_json::from_str(&params)
                .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
            let config = EffectConfig::from_json(&params)?;
            let gesture_kind = GestureKind::from_name(&gesture)?;
            let driver = FrameDriver::new(fps, samples)?;

            let bg = load(background.as_deref())?;
            let top = load(overlay.as_deref())?;
            let sized = bg.as_ref().or(top.as_ref());
            let width = width
                .or(sized.map(Texture::width))
                .unwrap_or(DEFAULT_SIZE);
            let height = height
                .or(sized.map(Texture::height))
                .unwrap_or(DEFAULT_SIZE);

            let fallback = config.fallback_color;
            let mut controller = EffectController::new(config)?;
            match (bg, top) {
                (None, None) => log::warn!("no images given, rendering the fallback color"),
                (bg, top) => {
                    let as_source = |t: Option<Texture>| -> Arc<dyn ImageSource> {
                        match t {
                            Some(t) => Arc::new(t),
                            None => Arc::new(SolidColor(fallback)),
                        }
                    };
                    controller.set_images(as_source(bg), as_source(top));
                }
            }

            let (frame, summary) = driver.run(&mut controller, gesture_kind, frames, width, height)?;
            write_png(&frame, &output)?;
            let mut energy_range = None;
            if let Some(path) = &energy_output {
                let energy = controller.energy_field(width, height)?;
                energy_range = Some(energy.range());
                write_field_png(&energy, path)?;
            }

            if cli.json {
                let info = serde_json::json!({
                    "gesture": gesture,
                    "width": width,
                    "height": height,
                    "frames": summary.frames,
                    "samples": summary.samples,
                    "peak_intensity": summary.peak_intensity,
                    "intensity": summary.last.intensity,
                    "radius": summary.last.radius,
                    "output": output.display().to_string(),
                    "energy_output": energy_output.as_ref().map(|p| p.display().to_string()),
                    "energy_range": energy_range.map(|(lo, hi)| [lo, hi]),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {gesture} ({width}x{height}, {} frames, intensity {:.3}) -> {}",
                    summary.frames,
                    summary.last.intensity,
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
