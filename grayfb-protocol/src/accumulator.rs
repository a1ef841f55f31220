//! Payload accumulation
//!
//! Reads exactly one payload following a sentinel. Serial reads routinely
//! return less than requested, including nothing at all when the read timeout
//! expires, so the accumulator keeps asking for the remaining deficit until
//! the payload is complete. Byte values are never inspected: a payload byte
//! equal to the sentinel is data, not a new frame.

use alloc::vec;
use alloc::vec::Vec;

use grayfb_hal::ByteSource;
use log::trace;

use crate::frame::FrameError;
use crate::sync::{Interrupt, Uninterruptible};

/// Read exactly `expected_size` bytes from `source`
pub fn read_payload<S: ByteSource + ?Sized>(
    source: &mut S,
    expected_size: usize,
) -> Result<Vec<u8>, FrameError> {
    let mut payload = vec![0u8; expected_size];
    read_payload_into(source, &mut payload, &mut Uninterruptible)?;
    Ok(payload)
}

/// Fill `payload` completely from `source`
///
/// `interrupt` is checked after each read that timed out with no data. On
/// error the buffer holds a partial payload that must not be decoded.
pub fn read_payload_into<S, I>(
    source: &mut S,
    payload: &mut [u8],
    interrupt: &mut I,
) -> Result<(), FrameError>
where
    S: ByteSource + ?Sized,
    I: Interrupt + ?Sized,
{
    let mut filled = 0usize;
    let mut short_reads = 0u32;

    while filled < payload.len() {
        let n = source.read(&mut payload[filled..])?;
        if n == 0 {
            if interrupt.is_interrupted() {
                return Err(FrameError::Interrupted);
            }
            continue;
        }
        filled += n;
        if filled < payload.len() {
            short_reads += 1;
        }
    }

    if short_reads > 0 {
        trace!(
            "Payload of {} bytes took {} short reads",
            payload.len(),
            short_reads
        );
    }
    Ok(())
}
