//! Byte source abstraction
//!
//! A byte source is the receiving half of the serial link. Reads are bounded
//! by a source-defined timeout and may return fewer bytes than requested,
//! including none at all.

use core::fmt;

/// Permanent byte source failures
///
/// A timeout is not an error: it is reported as a zero-length read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SourceError {
    /// The link was closed or failed and will deliver no more data
    Closed,
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Closed => f.write_str("byte source closed"),
        }
    }
}

/// Timeout-bounded byte receiver
pub trait ByteSource {
    /// Read up to `buf.len()` bytes
    ///
    /// Blocks for at most the source's read timeout. Returns `Ok(0)` when the
    /// timeout elapsed with no data; this is not end-of-stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SourceError>;

    /// Read a single byte, or `None` if the read timed out
    fn read_byte(&mut self) -> Result<Option<u8>, SourceError> {
        let mut buf = [0u8; 1];
        match self.read(&mut buf)? {
            0 => Ok(None),
            _ => Ok(Some(buf[0])),
        }
    }

    /// Release the underlying link
    ///
    /// Called exactly once when the owner shuts down. Reads after `close`
    /// report [`SourceError::Closed`].
    fn close(&mut self) {}
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SourceError> {
        (**self).read(buf)
    }

    fn read_byte(&mut self) -> Result<Option<u8>, SourceError> {
        (**self).read_byte()
    }

    fn close(&mut self) {
        (**self).close()
    }
}
