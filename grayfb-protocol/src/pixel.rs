//! 2-bit sample packing
//!
//! Samples are luminance levels 0..=3. Four samples share a byte, the first
//! sample in the most significant pair.

use alloc::vec;
use alloc::vec::Vec;

use crate::frame::SAMPLES_PER_BYTE;

/// Highest sample value
pub const MAX_SAMPLE: u8 = 3;

/// 8-bit luminance step between adjacent sample levels
pub const LUMA_STEP: u8 = 85;

/// Unpack one payload byte into its four samples, MSB pair first
#[inline]
pub const fn unpack_byte(byte: u8) -> [u8; SAMPLES_PER_BYTE] {
    [
        (byte >> 6) & 0x03,
        (byte >> 4) & 0x03,
        (byte >> 2) & 0x03,
        byte & 0x03,
    ]
}

/// Pack four samples into one payload byte, MSB pair first
///
/// Only the low two bits of each sample are used.
#[inline]
pub const fn pack_samples(samples: [u8; SAMPLES_PER_BYTE]) -> u8 {
    ((samples[0] & 0x03) << 6)
        | ((samples[1] & 0x03) << 4)
        | ((samples[2] & 0x03) << 2)
        | (samples[3] & 0x03)
}

/// Map a sample to 8-bit luminance (0, 85, 170, 255)
#[inline]
pub const fn luma8(sample: u8) -> u8 {
    (sample & 0x03) * LUMA_STEP
}

/// Decode a payload into `4 * payload.len()` samples
pub fn decode(payload: &[u8]) -> Vec<u8> {
    let mut samples = vec![0u8; payload.len() * SAMPLES_PER_BYTE];
    decode_into(payload, &mut samples);
    samples
}

/// Decode a payload into a caller-owned sample buffer
///
/// Writes `4 * payload.len()` samples to the front of `samples`.
///
/// # Panics
///
/// Panics if `samples` is shorter than `4 * payload.len()`.
pub fn decode_into(payload: &[u8], samples: &mut [u8]) {
    let out = &mut samples[..payload.len() * SAMPLES_PER_BYTE];
    for (&byte, quad) in payload.iter().zip(out.chunks_exact_mut(SAMPLES_PER_BYTE)) {
        quad.copy_from_slice(&unpack_byte(byte));
    }
}

/// Pack samples into payload bytes
///
/// A trailing group of fewer than four samples is padded with zeros.
pub fn encode(samples: &[u8]) -> Vec<u8> {
    samples
        .chunks(SAMPLES_PER_BYTE)
        .map(|chunk| {
            let mut quad = [0u8; SAMPLES_PER_BYTE];
            quad[..chunk.len()].copy_from_slice(chunk);
            pack_samples(quad)
        })
        .collect()
}
