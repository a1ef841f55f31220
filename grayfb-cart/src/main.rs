//! grayfb test cartridge
//!
//! Device-side stand-in that streams a looping demo reel in the viewer's
//! wire format: a sentinel byte followed by 64x64 2-bit samples packed four
//! to a byte. Frames go to a serial port, to stdout (`-`), or to a capture
//! file (`file:<path>`) that the viewer can replay later.
//!
//! ```bash
//! # Pipe straight into the viewer
//! grayfb-cart | grayfb-viewer --port -
//!
//! # Record one pass of the fireworks demo
//! grayfb-cart --port file:fireworks.bin --scene fireworks --loops 1 --interval-ms 0
//! ```

mod emitter;
mod framebuffer;
mod scenes;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use grayfb_hal::{Pacer, Ticker, Unpaced};
use grayfb_protocol::{FrameGeometry, FRAME_SYNC};
use log::{error, info};

use crate::emitter::Emitter;
use crate::framebuffer::FrameBuffer;
use crate::scenes::{demo_reel, DEMO_NAMES};

/// Default time between frames
const DEFAULT_INTERVAL_MS: u64 = 41;

/// Test cartridge
#[derive(Parser)]
#[command(name = "grayfb-cart")]
#[command(version)]
#[command(about = "Stream a demo reel of 2-bit grayscale frames")]
struct Cli {
    /// Serial device, `-` for stdout, or `file:<path>`
    #[arg(short, long, default_value = "-")]
    port: String,

    /// Baud rate for serial devices
    #[arg(short, long, default_value_t = 921_600)]
    baud: u32,

    /// Milliseconds between frames (0 for as fast as possible)
    #[arg(long, default_value_t = DEFAULT_INTERVAL_MS)]
    interval_ms: u64,

    /// Play only this demo
    #[arg(long)]
    scene: Option<String>,

    /// Number of passes over the reel (forever if omitted)
    #[arg(long)]
    loops: Option<u64>,

    /// Seed for the fireworks
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Frame sentinel byte
    #[arg(long, default_value_t = FRAME_SYNC)]
    sentinel: u8,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if is_hangup(&e) => {
            info!("Receiver hung up");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    if let Some(name) = &cli.scene {
        if !DEMO_NAMES.contains(&name.as_str()) {
            bail!(
                "unknown scene '{}', expected one of: {}",
                name,
                DEMO_NAMES.join(", ")
            );
        }
    }

    let out = open_output(&cli.port, cli.baud)?;
    let mut pacer: Box<dyn Pacer> = if cli.interval_ms == 0 {
        Box::new(Unpaced)
    } else {
        Box::new(Ticker::every(Duration::from_millis(cli.interval_ms)))
    };
    let mut emitter = Emitter::new(out, pacer.as_mut(), cli.sentinel);
    let mut fb = FrameBuffer::new(FrameGeometry::default());

    let mut pass = 0u64;
    while cli.loops.map_or(true, |loops| pass < loops) {
        let mut reel = demo_reel(cli.seed.wrapping_add(pass), cli.scene.as_deref());
        emitter.play_reel(&mut reel, &mut fb)?;
        pass += 1;
        info!("Pass {} done, {} frames sent", pass, emitter.frames());
    }
    Ok(())
}

fn open_output(port: &str, baud: u32) -> Result<Box<dyn Write>> {
    if port == "-" {
        return Ok(Box::new(io::stdout().lock()));
    }
    if let Some(path) = port.strip_prefix("file:") {
        let file = File::create(path).with_context(|| format!("cannot create {}", path))?;
        info!("Recording to {}", path);
        return Ok(Box::new(BufWriter::new(file)));
    }
    let serial = serialport::new(port, baud)
        .open()
        .with_context(|| format!("cannot open serial port {}", port))?;
    info!("Streaming to {} at {} baud", port, baud);
    Ok(Box::new(serial))
}

fn is_hangup(e: &anyhow::Error) -> bool {
    e.chain()
        .filter_map(|cause| cause.downcast_ref::<io::Error>())
        .any(|io| io.kind() == io::ErrorKind::BrokenPipe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["grayfb-cart"]).unwrap();
        assert_eq!(cli.port, "-");
        assert_eq!(cli.interval_ms, 41);
        assert_eq!(cli.sentinel, 0x26);
        assert!(cli.loops.is_none());
    }

    #[test]
    fn test_records_capture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        let port = format!("file:{}", path.display());
        let cli = Cli::try_parse_from([
            "grayfb-cart",
            "--port",
            port.as_str(),
            "--scene",
            "pulsating-blob",
            "--loops",
            "1",
            "--interval-ms",
            "0",
        ])
        .unwrap();

        run(&cli).unwrap();
        let len = std::fs::metadata(&path).unwrap().len();
        assert_eq!(len, (24 + 150 + 9) * 1025);
    }

    #[test]
    fn test_unknown_scene_rejected() {
        let cli = Cli::try_parse_from(["grayfb-cart", "--scene", "tetris", "--loops", "1"]).unwrap();
        let err = run(&cli).unwrap_err();
        assert!(err.to_string().contains("unknown scene"));
    }

    #[test]
    fn test_broken_pipe_is_hangup() {
        let err = anyhow::Error::new(io::Error::from(io::ErrorKind::BrokenPipe))
            .context("failed to write frame");
        assert!(is_hangup(&err));
        assert!(!is_hangup(&anyhow::anyhow!("other")));
    }
}
