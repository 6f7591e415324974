mod app;
mod assets;
mod car;
mod color;
mod graphics;
mod input;
mod math;
mod model;
mod overlay;
mod render;
mod scene;
mod state;
mod terminal;
mod vertex;

use anyhow::Context;
use app::{App, AppOptions};
use assets::AssetStore;
use car::{Catalog, Garage};
use clap::Parser;
use input::KeyboardJoypad;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use terminal::TerminalRenderer;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// A console-based 3D car showcase
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Directory holding the packaged assets (rom:/ paths)
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// JSON car catalog to show instead of the built-in lineup
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Target frames per second
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=240))]
    fps: u32,

    /// Exit after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Where log output is written
    #[arg(long, default_value = "carshow.log")]
    log_file: PathBuf,

    /// Show version, angle and FPS
    #[arg(short, long)]
    debug: bool,

    /// Frames a key press keeps the stick deflected
    #[arg(long, default_value_t = 8)]
    hold_frames: u32,
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}!", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

/// Main function
fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let catalog = match &args.catalog {
        Some(path) => Catalog::from_file(path)?,
        None => Catalog::builtin(),
    };
    let store = AssetStore::new(&args.assets);
    info!(
        "Loading {} cars from {}",
        catalog.cars.len(),
        store.root().display()
    );
    let garage = Garage::load(catalog, &store);

    let options = AppOptions {
        frame_time: Some(Duration::from_secs_f64(1.0 / args.fps as f64)),
        max_frames: args.frames,
        debug: args.debug,
    };
    let renderer = TerminalRenderer::stdout()?;
    let joypad = KeyboardJoypad::new(args.hold_frames);
    App::new(garage, joypad, renderer, options).run()?;
    Ok(())
}
