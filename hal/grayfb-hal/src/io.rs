//! `std::io` adapter
//!
//! Wraps any [`std::io::Read`] (a serial port, stdin, a recorded capture) as a
//! [`ByteSource`]. Serial drivers report an expired read timeout as
//! `ErrorKind::TimedOut`; that becomes a zero-length read. End-of-file and any
//! other I/O error close the source permanently.

use std::io::{ErrorKind, Read};

use log::{debug, warn};

use crate::source::{ByteSource, SourceError};

/// Byte source over a blocking `std::io` reader
pub struct ReaderSource<R> {
    inner: Option<R>,
}

impl<R: Read> ReaderSource<R> {
    /// Wrap an open reader
    pub fn new(inner: R) -> Self {
        Self { inner: Some(inner) }
    }

    /// Check whether the source has been closed
    #[cfg(test)]
    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SourceError> {
        let Some(inner) = self.inner.as_mut() else {
            return Err(SourceError::Closed);
        };
        if buf.is_empty() {
            return Ok(0);
        }

        match inner.read(buf) {
            Ok(0) => {
                debug!("Reader reached end of stream");
                self.inner = None;
                Err(SourceError::Closed)
            }
            Ok(n) => Ok(n),
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                ) =>
            {
                Ok(0)
            }
            Err(e) => {
                warn!("Byte source read failed: {}", e);
                self.inner = None;
                Err(SourceError::Closed)
            }
        }
    }

    fn close(&mut self) {
        if self.inner.take().is_some() {
            debug!("Byte source released");
        }
    }
}
