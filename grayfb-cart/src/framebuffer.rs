//! 2-bit framebuffer
//!
//! One byte per pixel holding a luminance level 0..=3. Drawing goes through
//! `embedded-graphics` with [`Gray2`] colors; out-of-bounds pixels are
//! clipped silently.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::{Gray2, GrayColor};
use embedded_graphics::prelude::*;
use grayfb_protocol::{Frame, FrameError, FrameGeometry};

/// Highest luminance level
pub const MAX_LEVEL: u8 = 3;

/// W×H grid of 2-bit levels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    geometry: FrameGeometry,
    levels: Vec<u8>,
}

impl FrameBuffer {
    /// Create an all-black framebuffer
    pub fn new(geometry: FrameGeometry) -> Self {
        Self {
            geometry,
            levels: vec![0; geometry.sample_count()],
        }
    }

    pub fn width(&self) -> i32 {
        self.geometry.width() as i32
    }

    pub fn height(&self) -> i32 {
        self.geometry.height() as i32
    }

    /// Set every pixel to `level`
    pub fn fill(&mut self, level: u8) {
        self.levels.fill(level & MAX_LEVEL);
    }

    /// Set one pixel; ignored outside the buffer
    pub fn set(&mut self, x: i32, y: i32, level: u8) {
        if let Some(i) = self.index(x, y) {
            self.levels[i] = level & MAX_LEVEL;
        }
    }

    /// Level at `(x, y)`
    #[cfg(test)]
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        self.index(x, y).map(|i| self.levels[i])
    }

    /// Scale every level by `step / steps`
    pub fn dim(&mut self, step: u8, steps: u8) {
        if steps == 0 {
            return;
        }
        for level in &mut self.levels {
            *level = (*level as u16 * step as u16 / steps as u16) as u8;
        }
    }

    /// Row-major levels
    #[cfg(test)]
    pub fn levels(&self) -> &[u8] {
        &self.levels
    }

    /// Number of lit pixels
    pub fn lit(&self) -> usize {
        self.levels.iter().filter(|&&l| l > 0).count()
    }

    /// Wire frame introduced by `sentinel`
    pub fn to_frame(&self, sentinel: u8) -> Result<Frame, FrameError> {
        Frame::from_samples_with_sentinel(self.geometry, sentinel, &self.levels)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return None;
        }
        Some(y as usize * self.geometry.width() as usize + x as usize)
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.geometry.width() as u32, self.geometry.height() as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Gray2;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set(point.x, point.y, color.luma());
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color.luma());
        Ok(())
    }
}
