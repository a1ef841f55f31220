//! Events that trigger state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Progress through one frame
    /// Receive loop started
    Start,
    /// Sentinel byte observed on the link
    SentinelFound,
    /// Full payload accumulated
    PayloadComplete,
    /// Payload unpacked into the raster
    Decoded,
    /// Raster shown and tick elapsed
    Presented,

    // Termination
    /// Window closed or other stop signal
    StopRequested,
    /// Byte source reported closure
    SourceClosed,
    /// Configured number of frames presented
    FrameLimitReached,
    /// Display backend failed
    DisplayFailed,
}
