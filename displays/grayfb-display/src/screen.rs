//! Upscaled RGB screen buffer
//!
//! Maps each 2-bit sample to gray `(s*85, s*85, s*85)` and blows every raster
//! pixel up into a `scale`×`scale` block.

use alloc::vec;
use alloc::vec::Vec;

use grayfb_protocol::{luma8, Raster};

use crate::backend::DisplayError;

/// Default integer upscale factor
pub const DEFAULT_SCALE: u32 = 8;

/// 8-bit RGB triple
pub type Rgb = [u8; 3];

/// Upscaled RGB rendering of a raster
#[derive(Debug, Clone)]
pub struct Screen {
    /// Source raster width in pixels
    width: usize,
    /// Source raster height in pixels
    height: usize,
    /// Upscale factor
    scale: usize,
    /// Output pixels, row-major, `width*scale` per row
    pixels: Vec<Rgb>,
}

impl Screen {
    /// Create a black screen for a `width`×`height` raster at `scale`
    ///
    /// A scale of zero is treated as one. Fails with
    /// [`DisplayError::TooLarge`] when the output pixel count overflows.
    pub fn new(width: usize, height: usize, scale: u32) -> Result<Self, DisplayError> {
        let scale = scale.max(1) as usize;
        let len = width
            .checked_mul(scale)
            .and_then(|w| w.checked_mul(height))
            .and_then(|n| n.checked_mul(scale))
            .ok_or(DisplayError::TooLarge)?;
        Ok(Self {
            width,
            height,
            scale,
            pixels: vec![[0, 0, 0]; len],
        })
    }

    /// Render a raster into the buffer
    pub fn render(&mut self, raster: &Raster) -> Result<(), DisplayError> {
        if raster.width() != self.width || raster.height() != self.height {
            return Err(DisplayError::GeometryMismatch);
        }

        let out_width = self.width * self.scale;
        for (y, row) in raster.rows().enumerate() {
            let first_line = y * self.scale * out_width;
            let line = &mut self.pixels[first_line..first_line + out_width];
            for (x, &sample) in row.iter().enumerate() {
                let l = luma8(sample);
                line[x * self.scale..(x + 1) * self.scale].fill([l, l, l]);
            }
            // Replicate the first output line down the block
            for dy in 1..self.scale {
                let dst = first_line + dy * out_width;
                self.pixels.copy_within(first_line..first_line + out_width, dst);
            }
        }

        Ok(())
    }

    /// Output size in pixels (width, height)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width * self.scale, self.height * self.scale)
    }

    /// Output pixel at (`x`, `y`)
    #[cfg(test)]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        let (w, h) = self.dimensions();
        if x >= w || y >= h {
            return None;
        }
        Some(self.pixels[y * w + x])
    }

    /// All output pixels, row-major
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }
}
