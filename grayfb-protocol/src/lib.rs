//! Serial Framebuffer Protocol
//!
//! This crate defines the byte-level format a device uses to stream a 2-bit
//! grayscale framebuffer over a serial link, and the receive pipeline that
//! turns the raw stream back into rasters.
//!
//! # Protocol Overview
//!
//! The stream is a plain sequence of frames:
//! ```text
//! ┌──────────┬──────────────────────────────────┐
//! │ SENTINEL │ PAYLOAD                          │
//! │ 1B (&)   │ W*H/4 bytes, 4 samples per byte  │
//! └──────────┴──────────────────────────────────┘
//! ```
//!
//! There is no length prefix, no checksum and no terminator. A receiver that
//! starts mid-stream, or loses bytes, scans forward to the next sentinel and
//! then reads a fixed-size payload. Payload bytes are never inspected for the
//! sentinel value, so a sentinel-valued byte inside a payload is plain data.
//!
//! Each payload byte packs four samples, most significant pair first:
//! ```text
//!  bit  7 6   5 4   3 2   1 0
//!      ┌───┬─────┬─────┬─────┐
//!      │ s0│  s1 │  s2 │  s3 │
//!      └───┴─────┴─────┴─────┘
//! ```
//!
//! # Receive Pipeline
//!
//! 1. [`sync::find_next_frame`] discards bytes up to and including a sentinel
//! 2. [`accumulator::read_payload`] collects exactly one payload across short reads
//! 3. [`pixel::decode`] unpacks the payload into samples
//! 4. [`raster::Raster`] holds the samples as a row-major grid

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod accumulator;
pub mod frame;
pub mod pixel;
pub mod raster;
pub mod sync;

pub use accumulator::{read_payload, read_payload_into};
pub use frame::{
    Frame, FrameError, FrameGeometry, GeometryError, DEFAULT_HEIGHT, DEFAULT_WIDTH, FRAME_SYNC,
    SAMPLES_PER_BYTE,
};
pub use pixel::{decode, decode_into, encode, luma8, pack_samples, unpack_byte};
pub use raster::Raster;
pub use sync::{find_next_frame, find_next_frame_until, Interrupt, Uninterruptible};
