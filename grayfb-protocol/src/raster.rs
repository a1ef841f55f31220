//! Decoded raster
//!
//! A raster is one frame's worth of 2-bit samples laid out row-major:
//! sample `i` belongs to row `i / width`, column `i % width`. The receive
//! loop keeps a single raster and overwrites it every frame.

use alloc::vec;
use alloc::vec::Vec;

use crate::frame::{FrameError, FrameGeometry};
use crate::pixel;

/// W×H grid of 2-bit luminance samples
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    geometry: FrameGeometry,
    samples: Vec<u8>,
}

impl Raster {
    /// Create an all-black raster
    pub fn new(geometry: FrameGeometry) -> Self {
        Self {
            geometry,
            samples: vec![0u8; geometry.sample_count()],
        }
    }

    /// Decode a complete payload into a new raster
    pub fn from_payload(geometry: FrameGeometry, payload: &[u8]) -> Result<Self, FrameError> {
        let mut raster = Self::new(geometry);
        raster.fill_from_payload(payload)?;
        Ok(raster)
    }

    /// Overwrite this raster with a decoded payload
    ///
    /// The payload must be exactly one frame long; partial payloads are
    /// rejected rather than decoded.
    pub fn fill_from_payload(&mut self, payload: &[u8]) -> Result<(), FrameError> {
        if payload.len() != self.geometry.payload_len() {
            return Err(FrameError::SampleCountMismatch);
        }
        pixel::decode_into(payload, &mut self.samples);
        Ok(())
    }

    /// Raster geometry
    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.geometry.width()
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.geometry.height()
    }

    /// All samples, row-major
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Sample at column `x`, row `y`
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        self.samples.get(y * self.width() + x).copied()
    }

    /// Iterate over rows
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.samples.chunks_exact(self.width())
    }

    /// Count samples at each of the four levels
    pub fn histogram(&self) -> [usize; 4] {
        let mut counts = [0usize; 4];
        for &s in &self.samples {
            counts[(s & 0x03) as usize] += 1;
        }
        counts
    }

    /// Set every sample to `level`
    pub fn fill(&mut self, level: u8) {
        self.samples.fill(level & 0x03);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_black() {
        let raster = Raster::new(FrameGeometry::default());
        assert_eq!(raster.samples().len(), 4096);
        assert_eq!(raster.histogram(), [4096, 0, 0, 0]);
    }

    #[test]
    fn test_row_major_layout() {
        let g = FrameGeometry::new(8, 2).unwrap();
        // Row 0: 0,1,2,3,3,2,1,0  Row 1: all 3
        let payload = [0b0001_1011, 0b1110_0100, 0xFF, 0xFF];
        let raster = Raster::from_payload(g, &payload).unwrap();

        assert_eq!(raster.get(0, 0), Some(0));
        assert_eq!(raster.get(3, 0), Some(3));
        assert_eq!(raster.get(7, 0), Some(0));
        assert_eq!(raster.get(0, 1), Some(3));
        assert_eq!(raster.get(8, 0), None);
        assert_eq!(raster.get(0, 2), None);

        let rows: std::vec::Vec<&[u8]> = raster.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], &[0, 1, 2, 3, 3, 2, 1, 0]);
        assert_eq!(rows[1], &[3; 8]);
    }

    #[test]
    fn test_partial_payload_rejected() {
        let mut raster = Raster::new(FrameGeometry::default());
        raster.fill(2);
        let result = raster.fill_from_payload(&[0xFF; 1023]);
        assert_eq!(result, Err(FrameError::SampleCountMismatch));
        // Untouched on rejection
        assert_eq!(raster.histogram(), [0, 0, 4096, 0]);
    }

    #[test]
    fn test_all_ones_payload_is_white() {
        let raster = Raster::from_payload(FrameGeometry::default(), &[0xFF; 1024]).unwrap();
        assert_eq!(raster.histogram(), [0, 0, 0, 4096]);
    }

    #[test]
    fn test_overwrite_in_place() {
        let g = FrameGeometry::new(4, 1).unwrap();
        let mut raster = Raster::from_payload(g, &[0xFF]).unwrap();
        raster.fill_from_payload(&[0x00]).unwrap();
        assert_eq!(raster.samples(), &[0, 0, 0, 0]);
    }
}
