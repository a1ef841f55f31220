//! Frame synchronization
//!
//! Locates the start of the next payload by scanning for the sentinel byte.
//! Everything before the sentinel is discarded unbuffered; this is the only
//! resynchronization mechanism, used both at start-up and after the receiver
//! falls behind or the stream is corrupted.

use grayfb_hal::ByteSource;
use log::trace;

use crate::frame::FrameError;

/// Hook consulted while a read is idle
///
/// The pipeline only asks after a read times out with no data, so a busy
/// link never pays for the check. Returning `true` aborts the current
/// operation with [`FrameError::Interrupted`].
pub trait Interrupt {
    /// Check whether the caller wants the pending read abandoned
    fn is_interrupted(&mut self) -> bool;
}

impl<F: FnMut() -> bool> Interrupt for F {
    fn is_interrupted(&mut self) -> bool {
        self()
    }
}

/// Interrupt hook that never fires
#[derive(Debug, Clone, Copy, Default)]
pub struct Uninterruptible;

impl Interrupt for Uninterruptible {
    fn is_interrupted(&mut self) -> bool {
        false
    }
}

/// Advance `source` past the next `sentinel` byte
///
/// Returns the number of bytes discarded before the sentinel. Read timeouts
/// are retried indefinitely; only a closed source ends the scan early.
pub fn find_next_frame<S: ByteSource + ?Sized>(
    source: &mut S,
    sentinel: u8,
) -> Result<usize, FrameError> {
    find_next_frame_until(source, sentinel, &mut Uninterruptible)
}

/// Advance `source` past the next `sentinel` byte, giving up when `interrupt` fires
///
/// `interrupt` is checked after each read that timed out with no data.
pub fn find_next_frame_until<S, I>(
    source: &mut S,
    sentinel: u8,
    interrupt: &mut I,
) -> Result<usize, FrameError>
where
    S: ByteSource + ?Sized,
    I: Interrupt + ?Sized,
{
    let mut discarded = 0usize;

    loop {
        match source.read_byte()? {
            Some(byte) if byte == sentinel => {
                if discarded > 0 {
                    trace!("Sync: skipped {} bytes before sentinel", discarded);
                }
                return Ok(discarded);
            }
            Some(_) => discarded += 1,
            None => {
                if interrupt.is_interrupted() {
                    return Err(FrameError::Interrupted);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FRAME_SYNC;
    use grayfb_hal::ScriptedSource;

    #[test]
    fn test_sentinel_first_byte() {
        let mut src = ScriptedSource::from_bytes(&[FRAME_SYNC, 0x01]);
        assert_eq!(find_next_frame(&mut src, FRAME_SYNC), Ok(0));
        assert_eq!(src.read_byte(), Ok(Some(0x01)));
    }

    #[test]
    fn test_skips_garbage_prefix_exactly() {
        let garbage = [0x00, 0xFF, 0x12, 0x34, 0x25, 0x27];
        let mut stream = garbage.to_vec();
        stream.push(FRAME_SYNC);
        stream.extend_from_slice(&[0xAB, 0xCD]);

        let mut src = ScriptedSource::from_bytes(&stream);
        assert_eq!(find_next_frame(&mut src, FRAME_SYNC), Ok(garbage.len()));
        // Cursor sits at the first payload byte
        assert_eq!(src.read_byte(), Ok(Some(0xAB)));
        assert_eq!(src.remaining(), 1);
    }

    #[test]
    fn test_only_one_sentinel_consumed() {
        let mut src = ScriptedSource::from_bytes(&[FRAME_SYNC, FRAME_SYNC, 0x00]);
        assert_eq!(find_next_frame(&mut src, FRAME_SYNC), Ok(0));
        assert_eq!(src.remaining(), 2);
    }

    #[test]
    fn test_retries_through_timeouts() {
        let mut src = ScriptedSource::new([
            std::vec![0x01u8],
            std::vec![],
            std::vec![],
            std::vec![0x02, FRAME_SYNC],
        ]);
        assert_eq!(find_next_frame(&mut src, FRAME_SYNC), Ok(2));
    }

    #[test]
    fn test_closed_source_fails() {
        let mut src = ScriptedSource::from_bytes(&[0x00, 0x01]);
        assert_eq!(
            find_next_frame(&mut src, FRAME_SYNC),
            Err(FrameError::SourceClosed)
        );
    }

    #[test]
    fn test_custom_sentinel() {
        let mut src = ScriptedSource::from_bytes(&[FRAME_SYNC, 0xA5, 0x10]);
        assert_eq!(find_next_frame(&mut src, 0xA5), Ok(1));
        assert_eq!(src.read_byte(), Ok(Some(0x10)));
    }

    #[test]
    fn test_interrupt_checked_only_when_idle() {
        let mut checks = 0;
        let mut src = ScriptedSource::from_bytes(&[0x00, 0x00, 0x00]).hold_open();
        let mut interrupt = || {
            checks += 1;
            checks >= 3
        };
        let result = find_next_frame_until(&mut src, FRAME_SYNC, &mut interrupt);
        assert_eq!(result, Err(FrameError::Interrupted));
        assert_eq!(checks, 3);
    }

    #[test]
    fn test_busy_stream_not_interrupted() {
        let mut src = ScriptedSource::from_bytes(&[0x00, 0x00, FRAME_SYNC]);
        let mut interrupt = || true;
        assert_eq!(
            find_next_frame_until(&mut src, FRAME_SYNC, &mut interrupt),
            Ok(2)
        );
    }
}
