//! Scripted byte source for tests
//!
//! Each call to `read` consumes the next scripted chunk. An empty chunk
//! simulates a read timeout. A chunk longer than the caller's buffer is split
//! and the remainder is delivered by the following read. Once the script is
//! exhausted the source reports closure, unless it was built with
//! [`ScriptedSource::hold_open`], in which case it keeps timing out.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::source::{ByteSource, SourceError};

/// Byte source delivering pre-scripted read results
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    chunks: VecDeque<Vec<u8>>,
    requests: Vec<usize>,
    hold_open: bool,
    closed: bool,
}

impl ScriptedSource {
    /// Create a source that delivers `chunks` one read at a time
    pub fn new<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Vec<u8>>,
    {
        Self {
            chunks: chunks.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Create a source that delivers `bytes` as a single stream
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::new([bytes.to_vec()])
    }

    /// Keep timing out instead of closing once the script runs dry
    pub fn hold_open(mut self) -> Self {
        self.hold_open = true;
        self
    }

    /// Buffer sizes requested by each `read` call, in order
    pub fn requests(&self) -> &[usize] {
        &self.requests
    }

    /// Number of scripted bytes not yet delivered
    pub fn remaining(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    /// Check whether `close` has been called
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl ByteSource for ScriptedSource {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SourceError> {
        if self.closed {
            return Err(SourceError::Closed);
        }
        self.requests.push(buf.len());

        let Some(mut chunk) = self.chunks.pop_front() else {
            return if self.hold_open {
                Ok(0)
            } else {
                Err(SourceError::Closed)
            };
        };

        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        if n < chunk.len() {
            let rest = chunk.split_off(n);
            self.chunks.push_front(rest);
        }
        Ok(n)
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunks_split_across_reads() {
        let mut src = ScriptedSource::new([alloc::vec![1u8, 2, 3, 4, 5]]);
        let mut buf = [0u8; 2];
        assert_eq!(src.read(&mut buf), Ok(2));
        assert_eq!(buf, [1, 2]);
        assert_eq!(src.remaining(), 3);
        assert_eq!(src.read(&mut buf), Ok(2));
        assert_eq!(buf, [3, 4]);
        assert_eq!(src.read(&mut buf), Ok(1));
        assert_eq!(buf[0], 5);
        assert_eq!(src.read(&mut buf), Err(SourceError::Closed));
        assert_eq!(src.requests(), &[2, 2, 2, 2]);
    }

    #[test]
    fn test_empty_chunk_is_timeout() {
        let mut src = ScriptedSource::new([alloc::vec![], alloc::vec![7u8]]);
        assert_eq!(src.read_byte(), Ok(None));
        assert_eq!(src.read_byte(), Ok(Some(7)));
    }

    #[test]
    fn test_hold_open_times_out_forever() {
        let mut src = ScriptedSource::from_bytes(&[1]).hold_open();
        assert_eq!(src.read_byte(), Ok(Some(1)));
        for _ in 0..10 {
            assert_eq!(src.read_byte(), Ok(None));
        }
    }

    #[test]
    fn test_close_is_recorded() {
        let mut src = ScriptedSource::from_bytes(&[1, 2]);
        assert!(!src.is_closed());
        src.close();
        assert!(src.is_closed());
        assert_eq!(src.read_byte(), Err(SourceError::Closed));
    }
}
