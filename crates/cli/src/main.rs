#![deny(unsafe_code)]
//! CLI for running the particle-field backdrop without a browser.
//!
//! Subcommands:
//! - `render` — run the field N ticks on a pixel surface, write PNG
//! - `simulate` — print per-tick particle and edge counts
//! - `presets` — print style presets and the default configuration

mod error;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use error::CliError;
use particle_field_core::{Backdrop, Bounds, FieldConfig, FieldStyle, RecordingSurface, Rgb};
use particle_field_raster::PixelSurface;
use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "particle-field", about = "Particle backdrop renderer")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct FieldArgs {
    /// Surface width in pixels.
    #[arg(short = 'W', long, default_value_t = 1200)]
    width: usize,

    /// Surface height in pixels.
    #[arg(short = 'H', long, default_value_t = 800)]
    height: usize,

    /// Number of frames to run.
    #[arg(short, long, default_value_t = 60)]
    ticks: usize,

    /// PRNG seed for deterministic output.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Style preset (primary, subtle). Overrides `style` in --params.
    #[arg(long)]
    style: Option<String>,

    /// Field overrides as a JSON object.
    #[arg(long, default_value = "{}")]
    params: String,
}

#[derive(Subcommand)]
enum Command {
    /// Run the field and write the final frame as PNG.
    Render {
        #[command(flatten)]
        field: FieldArgs,

        /// Background color the frame is flattened onto.
        #[arg(short, long, default_value = "#0f1419")]
        background: String,

        /// Output file path.
        #[arg(short, long, default_value = "particles.png")]
        output: PathBuf,
    },
    /// Run the field and report what each frame drew.
    Simulate {
        #[command(flatten)]
        field: FieldArgs,
    },
    /// List style presets and configuration defaults.
    Presets,
}

fn build_config(args: &FieldArgs) -> Result<FieldConfig, CliError> {
    let mut params: Value = serde_json::from_str(&args.params)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    let Some(map) = params.as_object_mut() else {
        return Err(CliError::Input("--params must be a JSON object".into()));
    };
    if let Some(style) = &args.style {
        map.insert("style".into(), Value::String(style.clone()));
    }
    Ok(FieldConfig::from_json(&params)?)
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Presets => {
            let styles = FieldStyle::list_names();
            if cli.json {
                let info = serde_json::json!({
                    "styles": styles,
                    "defaults": FieldConfig::default(),
                    "schema": FieldConfig::param_schema(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Styles:");
                for name in styles {
                    let style = FieldStyle::from_name(name)?;
                    println!(
                        "  {name:<8} line opacity {:.1}, glow edge alpha {:.1}",
                        style.line_opacity, style.glow_edge_alpha
                    );
                }
                println!("Defaults:");
                println!("{}", serde_json::to_string_pretty(&FieldConfig::default())?);
            }
        }
        Command::Render {
            field,
            background,
            output,
        } => {
            let config = build_config(&field)?;
            let background = Rgb::from_hex(&background)?;
            let surface = PixelSurface::new(field.width, field.height)?;
            let viewport = Bounds::new(field.width as f64, field.height as f64);
            let mut backdrop = Backdrop::new(surface, &viewport, config, field.seed);

            let mut last = None;
            for _ in 0..field.ticks {
                last = backdrop.frame();
            }
            particle_field_raster::snapshot::write_png(backdrop.surface(), background, &output)?;
            info!(path = %output.display(), frames = backdrop.field().frames(), "wrote snapshot");

            let edges = last.map_or(0, |s| s.edges);
            if cli.json {
                let info = serde_json::json!({
                    "width": field.width,
                    "height": field.height,
                    "ticks": field.ticks,
                    "seed": field.seed,
                    "particles": backdrop.field().len(),
                    "edges": edges,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} particles, {edges} edges ({}x{}, {} ticks, seed {}) -> {}",
                    backdrop.field().len(),
                    field.width,
                    field.height,
                    field.ticks,
                    field.seed,
                    output.display()
                );
            }
        }
        Command::Simulate { field } => {
            let config = build_config(&field)?;
            let viewport = Bounds::new(field.width as f64, field.height as f64);
            let mut backdrop =
                Backdrop::new(RecordingSurface::default(), &viewport, config, field.seed);

            let mut frames = Vec::with_capacity(field.ticks);
            for _ in 0..field.ticks {
                if let Some(stats) = backdrop.frame() {
                    frames.push(stats);
                }
                let calls = backdrop.surface_mut().take();
                debug!(calls = calls.len(), "frame drawn");
            }

            if cli.json {
                let info = serde_json::json!({
                    "width": field.width,
                    "height": field.height,
                    "seed": field.seed,
                    "frames": frames,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                for (i, stats) in frames.iter().enumerate() {
                    println!("frame {:>4}: {} particles, {} edges", i + 1, stats.particles, stats.edges);
                }
            }
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

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
