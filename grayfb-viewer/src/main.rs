//! grayfb viewer
//!
//! Shows the 2-bit grayscale framebuffer streamed by a device over a serial
//! link. Each frame on the wire is one sentinel byte followed by the packed
//! raster; the viewer resynchronizes on the sentinel, decodes the samples,
//! and presents them upscaled at a fixed rate until the window is closed or
//! the link goes away.
//!
//! # Usage
//!
//! ```bash
//! # Live device at the default 921600 baud
//! grayfb-viewer --port /dev/ttyACM0
//!
//! # Replay a capture without a window, keeping the last frame as a PPM
//! grayfb-viewer --port file:capture.bin --headless --snapshot last.ppm
//!
//! # Pipe frames from the test cartridge
//! grayfb-cart --port - | grayfb-viewer --port - --frames 200 --headless
//! ```

mod config;
mod link;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use grayfb_core::{ShutdownReason, Viewer, ViewerConfig};
use grayfb_display::{DisplaySink, HeadlessSink};
use grayfb_hal::Ticker;
use log::{error, info, warn};

use crate::config::Overrides;

/// Serial framebuffer viewer
#[derive(Parser)]
#[command(name = "grayfb-viewer")]
#[command(version)]
#[command(about = "Display a 2-bit grayscale framebuffer streamed over serial")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serial device, `-` for stdin, or `file:<path>` for a capture
    #[arg(short, long)]
    port: Option<String>,

    /// Baud rate
    #[arg(short, long)]
    baud: Option<u32>,

    /// Integer upscale factor
    #[arg(long)]
    scale: Option<u32>,

    /// Presentation rate in frames per second
    #[arg(long)]
    fps: Option<u32>,

    /// Stop after presenting this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Run without a window
    #[arg(long)]
    headless: bool,

    /// Write the latest frame to this PPM file (headless only)
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&cli) {
        Ok(reason) if reason.is_clean() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ShutdownReason> {
    let overrides = Overrides {
        port: cli.port.clone(),
        baud_rate: cli.baud,
        scale: cli.scale,
        tick_hz: cli.fps,
    };
    let config = config::load(cli.config.as_deref(), &overrides)?;

    let geometry = config
        .raster
        .geometry()
        .map_err(|e| anyhow!("invalid raster geometry: {}", e))?;
    let tick_period = config
        .display
        .tick_period()
        .map_err(|e| anyhow!("invalid tick rate: {}", e))?;

    let mut source = link::open(&config.link).context("failed to open frame source")?;
    let mut sink = open_display(cli, &config).context("failed to open display")?;

    let mut viewer = Viewer::new(
        source.as_mut(),
        sink.as_mut(),
        Ticker::every(tick_period),
        geometry,
        config.raster.sentinel,
    );
    if let Some(frames) = cli.frames {
        viewer = viewer.with_frame_limit(frames);
    }

    let summary = viewer.run().map_err(|e| anyhow!("viewer failed: {}", e))?;
    info!("Shutdown: {}", summary.reason);
    Ok(summary.reason)
}

fn open_display(cli: &Cli, config: &ViewerConfig) -> Result<Box<dyn DisplaySink>> {
    let width = config.raster.width as usize;
    let height = config.raster.height as usize;
    let scale = config.display.scale;

    if !cli.headless {
        if let Some(window) = open_window(config)? {
            if cli.snapshot.is_some() {
                warn!("--snapshot is ignored when a window is open");
            }
            return Ok(window);
        }
    }

    let mut sink =
        HeadlessSink::new(width, height, scale).map_err(|e| anyhow!("{}", e))?;
    if let Some(path) = &cli.snapshot {
        sink = sink.with_snapshot(path);
    }
    Ok(Box::new(sink))
}

#[cfg(feature = "simulator")]
fn open_window(config: &ViewerConfig) -> Result<Option<Box<dyn DisplaySink>>> {
    let window = grayfb_display::SimulatorSink::create_window(
        &config.display.title,
        config.raster.width as usize,
        config.raster.height as usize,
        config.display.scale,
    )
    .map_err(|e| anyhow!("{}", e))?;
    Ok(Some(Box::new(window)))
}

#[cfg(not(feature = "simulator"))]
fn open_window(_config: &ViewerConfig) -> Result<Option<Box<dyn DisplaySink>>> {
    warn!("Built without window support; running headless");
    Ok(None)
}
