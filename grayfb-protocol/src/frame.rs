//! Frame layout and encoding.
//!
//! Frame format:
//! - SENTINEL (1 byte): `&` (0x26) synchronization byte
//! - PAYLOAD (W*H/4 bytes): packed 2-bit samples, row-major, MSB pair first

use alloc::vec::Vec;
use core::fmt;

use grayfb_hal::SourceError;

use crate::pixel;

/// Frame synchronization byte (`&`)
pub const FRAME_SYNC: u8 = 0x26;

/// Default raster width in pixels
pub const DEFAULT_WIDTH: u16 = 64;

/// Default raster height in pixels
pub const DEFAULT_HEIGHT: u16 = 64;

/// Number of 2-bit samples packed into one payload byte
pub const SAMPLES_PER_BYTE: usize = 4;

/// Errors that can occur while receiving or encoding frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// The byte source closed before a frame was complete
    SourceClosed,
    /// The caller's interrupt hook asked the read to stop
    Interrupted,
    /// Sample count does not match the frame geometry
    SampleCountMismatch,
}

impl From<SourceError> for FrameError {
    fn from(e: SourceError) -> Self {
        match e {
            SourceError::Closed => FrameError::SourceClosed,
        }
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::SourceClosed => f.write_str("byte source closed mid-stream"),
            FrameError::Interrupted => f.write_str("frame read interrupted"),
            FrameError::SampleCountMismatch => {
                f.write_str("sample count does not match frame geometry")
            }
        }
    }
}

/// Invalid raster dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GeometryError {
    /// Width or height is zero
    Empty,
    /// Pixel count is not a multiple of [`SAMPLES_PER_BYTE`]
    UnalignedPixelCount,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::Empty => f.write_str("raster width and height must be non-zero"),
            GeometryError::UnalignedPixelCount => {
                f.write_str("raster pixel count must be a multiple of 4")
            }
        }
    }
}

/// Raster dimensions shared by sender and receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameGeometry {
    width: u16,
    height: u16,
}

impl Default for FrameGeometry {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl FrameGeometry {
    /// Create a geometry, checking that the pixel count packs into whole bytes
    pub fn new(width: u16, height: u16) -> Result<Self, GeometryError> {
        if width == 0 || height == 0 {
            return Err(GeometryError::Empty);
        }
        if (width as usize * height as usize) % SAMPLES_PER_BYTE != 0 {
            return Err(GeometryError::UnalignedPixelCount);
        }
        Ok(Self { width, height })
    }

    /// Raster width in pixels
    pub const fn width(&self) -> usize {
        self.width as usize
    }

    /// Raster height in pixels
    pub const fn height(&self) -> usize {
        self.height as usize
    }

    /// Number of samples in one raster
    pub const fn sample_count(&self) -> usize {
        self.width() * self.height()
    }

    /// Number of payload bytes in one frame
    pub const fn payload_len(&self) -> usize {
        self.sample_count() / SAMPLES_PER_BYTE
    }
}

/// A constructed frame, ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Sentinel byte introducing the frame
    pub sentinel: u8,
    /// Packed payload
    pub payload: Vec<u8>,
}

impl Frame {
    /// Pack a raster's worth of samples into a frame
    ///
    /// Samples are masked to their low two bits.
    pub fn from_samples(geometry: FrameGeometry, samples: &[u8]) -> Result<Self, FrameError> {
        Self::from_samples_with_sentinel(geometry, FRAME_SYNC, samples)
    }

    /// Pack samples into a frame introduced by a custom sentinel
    pub fn from_samples_with_sentinel(
        geometry: FrameGeometry,
        sentinel: u8,
        samples: &[u8],
    ) -> Result<Self, FrameError> {
        if samples.len() != geometry.sample_count() {
            return Err(FrameError::SampleCountMismatch);
        }
        Ok(Self {
            sentinel,
            payload: pixel::encode(samples),
        })
    }

    /// Encode this frame into a Vec, sentinel first
    pub fn encode_to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.payload.len());
        out.push(self.sentinel);
        out.extend_from_slice(&self.payload);
        out
    }
}
