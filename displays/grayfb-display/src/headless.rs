//! Headless display sink
//!
//! Stands in for a window when none is available (CI, remote hosts, builds
//! without SDL2). Every presented raster is rendered and counted; when a
//! snapshot path is set, the latest frame is written there as a binary PPM.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use grayfb_protocol::Raster;
use log::{debug, info, warn};

use crate::backend::{DisplayError, DisplaySink};
use crate::screen::Screen;

/// Display sink without a window
pub struct HeadlessSink {
    screen: Screen,
    snapshot: Option<PathBuf>,
    frames: u64,
}

impl HeadlessSink {
    /// Create a sink for `width`×`height` rasters upscaled by `scale`
    pub fn new(width: usize, height: usize, scale: u32) -> Result<Self, DisplayError> {
        let screen = Screen::new(width, height, scale)?;
        info!("Headless display {}x{} (x{})", width, height, scale.max(1));
        Ok(Self {
            screen,
            snapshot: None,
            frames: 0,
        })
    }

    /// Write the latest frame to `path` after every present
    pub fn with_snapshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot = Some(path.into());
        self
    }

    /// Number of rasters presented so far
    #[cfg(test)]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl DisplaySink for HeadlessSink {
    fn present(&mut self, raster: &Raster) -> Result<(), DisplayError> {
        self.screen.render(raster)?;
        self.frames += 1;
        debug!(
            "Frame {}: level histogram {:?}",
            self.frames,
            raster.histogram()
        );

        if let Some(path) = &self.snapshot {
            write_snapshot(path, &self.screen).map_err(|e| {
                warn!("Failed to write snapshot {}: {}", path.display(), e);
                DisplayError::Output
            })?;
        }
        Ok(())
    }

    fn poll_close_event(&mut self) -> bool {
        false
    }

    fn destroy(&mut self) {
        info!("Headless display closed after {} frames", self.frames);
    }
}

/// Write the screen as a binary PPM (P6)
///
/// The image is written next to `path` first and renamed into place, so a
/// viewer polling the file never sees a half-written frame.
pub fn write_snapshot(path: &Path, screen: &Screen) -> io::Result<()> {
    let tmp = path.with_extension("ppm.tmp");
    {
        let mut out = BufWriter::new(File::create(&tmp)?);
        write_ppm(&mut out, screen)?;
        out.flush()?;
    }
    fs::rename(&tmp, path)
}

/// Serialize the screen as a binary PPM (P6)
pub fn write_ppm<W: Write>(out: &mut W, screen: &Screen) -> io::Result<()> {
    let (w, h) = screen.dimensions();
    write!(out, "P6\n{} {}\n255\n", w, h)?;
    for px in screen.pixels() {
        out.write_all(px)?;
    }
    Ok(())
}
