//! Cadence CLI
//!
//! Terminal front end for the animation engine:
//! - List the available easing curves
//! - Plot a curve as ASCII art
//! - Run animations from cadence.toml (or flags) on a real or simulated clock
//! - Scaffold a sample cadence.toml

mod config;
mod render;
mod runner;

use anyhow::Result;
use cadence_animation::Easing;
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::{AnimationSpec, CadenceConfig};
use crate::runner::TimeMode;

/// Preview easing curves and run animations in the terminal
#[derive(Parser, Debug)]
#[command(name = "cadence")]
#[command(about = "Preview easing curves and run animations in the terminal")]
#[command(version)]
struct Cli {
    /// Log level filter (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every easing function
    Easings,

    /// Plot an easing curve
    Curve {
        /// Easing name, e.g. inOutCubic
        easing: String,

        /// Plot width in columns
        #[arg(long, default_value = "60")]
        width: usize,

        /// Plot height in rows
        #[arg(long, default_value = "20")]
        height: usize,
    },

    /// Run animations and print one line per frame
    Run {
        /// Configuration file or directory containing cadence.toml
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Property to animate when no config is given
        #[arg(long, default_value = "x")]
        property: String,

        /// Start value when no config is given
        #[arg(long)]
        from: Option<f64>,

        /// End value when no config is given
        #[arg(long, default_value = "100")]
        to: f64,

        /// Duration in milliseconds when no config is given
        #[arg(long, default_value = "1000")]
        duration: f64,

        /// Easing name when no config is given
        #[arg(long, default_value = "linear")]
        easing: String,

        /// Override the configured frame rate
        #[arg(long)]
        fps: Option<u32>,

        /// Advance a virtual clock instead of sleeping between frames
        #[arg(long)]
        simulate: bool,

        /// Width of each property's progress bar
        #[arg(long, default_value = "30")]
        bar_width: usize,
    },

    /// Write a sample cadence.toml
    Init {
        /// Directory to write into
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Command::Easings => cmd_easings(),
        Command::Curve {
            easing,
            width,
            height,
        } => cmd_curve(&easing, width, height),
        Command::Run {
            config,
            property,
            from,
            to,
            duration,
            easing,
            fps,
            simulate,
            bar_width,
        } => {
            let mut config = match config {
                Some(path) => CadenceConfig::load(&path)?,
                None => {
                    let config = CadenceConfig::single(AnimationSpec {
                        property,
                        from,
                        to,
                        duration,
                        easing,
                    });
                    config.validate()?;
                    config
                }
            };
            if let Some(fps) = fps {
                config.clock.fps = fps;
                config.validate()?;
            }
            let mode = if simulate {
                TimeMode::Simulated
            } else {
                TimeMode::Realtime
            };
            cmd_run(&config, mode, bar_width)
        }
        Command::Init { path, force } => cmd_init(path, force),
    }
}

fn cmd_easings() -> Result<()> {
    for easing in Easing::ALL {
        let midpoint = easing.apply(0.5, 0.0, 1.0, 1.0);
        println!("{:<16} f(0.5) = {:.4}", easing.name(), midpoint);
    }
    Ok(())
}

fn cmd_curve(name: &str, width: usize, height: usize) -> Result<()> {
    let easing: Easing = name.parse()?;
    print!("{}", render::plot_curve(easing, width, height));
    Ok(())
}

fn cmd_run(config: &CadenceConfig, mode: TimeMode, bar_width: usize) -> Result<()> {
    if config.animations.is_empty() {
        anyhow::bail!("No animations configured");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = runner::run(config, mode, bar_width, &mut out)?;

    println!();
    println!(
        "{} frame(s), {}/{} animation(s) complete",
        summary.frames,
        summary.completed,
        config.animations.len()
    );
    for (property, value) in &summary.values {
        println!("  {} = {:.3}", property, value);
    }
    Ok(())
}

fn cmd_init(path: PathBuf, force: bool) -> Result<()> {
    let file = CadenceConfig::write_sample(&path, force)?;
    println!("Created {}", file.display());
    println!("Run it with: cadence run --config {}", path.display());
    Ok(())
}
