//! Receive loop
//!
//! [`Viewer`] owns the byte source, the display sink and the pacer, and
//! drives them through the lifecycle state machine:
//!
//! ```text
//!   Idle ─▶ Syncing ─▶ Accumulating ─▶ Decoding ─▶ Presenting ─┐
//!              ▲                                               │
//!              └───────────────────────────────────────────────┘
//! ```
//!
//! Each [`Viewer::step`] runs one phase. The stop signal (window close or
//! frame limit) is checked at the top of every sync, and again whenever a
//! read times out, so a silent link still notices a closed window within one
//! read timeout. Resources are released exactly once, on every exit path.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use grayfb_display::{DisplayError, DisplaySink};
use grayfb_hal::{ByteSource, Pacer};
use grayfb_protocol::{
    find_next_frame_until, read_payload_into, FrameError, FrameGeometry, Raster,
};
use log::{debug, info, trace, warn};

use crate::config::{ConfigError, ViewerConfig};
use crate::state::{Event, ShutdownReason, State};

/// Errors that end a run abnormally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ViewerError {
    /// Display backend failed
    Display(DisplayError),
    /// Frame could not be decoded
    Frame(FrameError),
}

impl From<DisplayError> for ViewerError {
    fn from(e: DisplayError) -> Self {
        ViewerError::Display(e)
    }
}

impl From<FrameError> for ViewerError {
    fn from(e: FrameError) -> Self {
        ViewerError::Frame(e)
    }
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerError::Display(e) => write!(f, "display error: {}", e),
            ViewerError::Frame(e) => write!(f, "frame error: {}", e),
        }
    }
}

/// Running counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ViewerStats {
    /// Frames presented
    pub frames: u64,
    /// Bytes thrown away while looking for a sentinel
    pub bytes_discarded: u64,
    /// Syncs that had to skip at least one byte
    pub resyncs: u64,
}

/// Outcome of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RunSummary {
    /// Why the loop stopped
    pub reason: ShutdownReason,
    /// Counters at shutdown
    pub stats: ViewerStats,
}

/// Serial framebuffer viewer
pub struct Viewer<S: ByteSource, D: DisplaySink, P: Pacer> {
    source: S,
    sink: D,
    pacer: P,
    sentinel: u8,
    frame_limit: Option<u64>,
    state: State,
    stats: ViewerStats,
    payload: Vec<u8>,
    raster: Raster,
    released: bool,
}

impl<S: ByteSource, D: DisplaySink, P: Pacer> Viewer<S, D, P> {
    /// Create a viewer for frames of `geometry` introduced by `sentinel`
    pub fn new(source: S, sink: D, pacer: P, geometry: FrameGeometry, sentinel: u8) -> Self {
        Self {
            source,
            sink,
            pacer,
            sentinel,
            frame_limit: None,
            state: State::Idle,
            stats: ViewerStats::default(),
            payload: vec![0u8; geometry.payload_len()],
            raster: Raster::new(geometry),
            released: false,
        }
    }

    /// Create a viewer from a validated configuration
    pub fn from_config(
        config: &ViewerConfig,
        source: S,
        sink: D,
        pacer: P,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let geometry = config.raster.geometry()?;
        Ok(Self::new(source, sink, pacer, geometry, config.raster.sentinel))
    }

    /// Stop after presenting `frames` frames
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    /// Current lifecycle state
    pub fn state(&self) -> State {
        self.state
    }

    /// Counters so far
    pub fn stats(&self) -> ViewerStats {
        self.stats
    }

    /// Run the current phase and advance the state machine
    ///
    /// Returns the new state. A display failure moves to
    /// `Shutdown(DisplayFailed)` and is also returned as an error.
    pub fn step(&mut self) -> Result<State, ViewerError> {
        let event = match self.state {
            State::Idle => {
                info!(
                    "Viewer started: {}x{} raster, sentinel 0x{:02x}",
                    self.raster.width(),
                    self.raster.height(),
                    self.sentinel
                );
                Event::Start
            }
            State::Syncing => self.sync(),
            State::Accumulating => self.accumulate(),
            State::Decoding => {
                self.raster.fill_from_payload(&self.payload)?;
                trace!("Decoded frame {}", self.stats.frames + 1);
                Event::Decoded
            }
            State::Presenting => match self.sink.present(&self.raster) {
                Ok(()) => {
                    self.stats.frames += 1;
                    debug!(
                        "Presented frame {} (histogram {:?})",
                        self.stats.frames,
                        self.raster.histogram()
                    );
                    self.pacer.wait_for_tick();
                    Event::Presented
                }
                Err(e) => {
                    warn!("Display failed: {}", e);
                    self.state = self.state.transition(Event::DisplayFailed);
                    return Err(e.into());
                }
            },
            State::Shutdown(_) => return Ok(self.state),
        };

        self.state = self.state.transition(event);
        Ok(self.state)
    }

    /// Run until shutdown, then release the source and the display
    pub fn run(mut self) -> Result<RunSummary, ViewerError> {
        let result = loop {
            match self.step() {
                Ok(State::Shutdown(reason)) => {
                    break Ok(RunSummary {
                        reason,
                        stats: self.stats,
                    })
                }
                Ok(_) => {}
                Err(e) => break Err(e),
            }
        };

        self.release();
        if let Ok(summary) = &result {
            info!(
                "Viewer stopped ({}): {} frames, {} bytes discarded over {} resyncs",
                summary.reason,
                summary.stats.frames,
                summary.stats.bytes_discarded,
                summary.stats.resyncs
            );
        }
        result
    }

    fn stop_requested(&mut self) -> Option<Event> {
        if let Some(limit) = self.frame_limit {
            if self.stats.frames >= limit {
                return Some(Event::FrameLimitReached);
            }
        }
        if self.sink.poll_close_event() {
            return Some(Event::StopRequested);
        }
        None
    }

    fn sync(&mut self) -> Event {
        if let Some(event) = self.stop_requested() {
            return event;
        }

        let sink = &mut self.sink;
        let mut interrupt = || sink.poll_close_event();
        match find_next_frame_until(&mut self.source, self.sentinel, &mut interrupt) {
            Ok(discarded) => {
                if discarded > 0 {
                    self.stats.bytes_discarded += discarded as u64;
                    self.stats.resyncs += 1;
                    debug!("Resynchronized after {} bytes", discarded);
                }
                Event::SentinelFound
            }
            Err(e) => Self::termination(e),
        }
    }

    fn accumulate(&mut self) -> Event {
        let sink = &mut self.sink;
        let mut interrupt = || sink.poll_close_event();
        match read_payload_into(&mut self.source, &mut self.payload, &mut interrupt) {
            Ok(()) => Event::PayloadComplete,
            Err(e) => Self::termination(e),
        }
    }

    fn termination(e: FrameError) -> Event {
        match e {
            FrameError::Interrupted => Event::StopRequested,
            _ => {
                info!("Source closed: {}", e);
                Event::SourceClosed
            }
        }
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.source.close();
        self.sink.destroy();
    }
}

impl<S: ByteSource, D: DisplaySink, P: Pacer> Drop for Viewer<S, D, P> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grayfb_hal::{ScriptedSource, Unpaced};

    #[derive(Default)]
    struct RecordingSink {
        presented: Vec<Vec<u8>>,
        polls: usize,
        close_after_polls: Option<usize>,
        fail_present: bool,
        destroyed: usize,
    }

    impl DisplaySink for RecordingSink {
        fn present(&mut self, raster: &Raster) -> Result<(), DisplayError> {
            if self.fail_present {
                return Err(DisplayError::Output);
            }
            self.presented.push(raster.samples().to_vec());
            Ok(())
        }

        fn poll_close_event(&mut self) -> bool {
            self.polls += 1;
            matches!(self.close_after_polls, Some(n) if self.polls > n)
        }

        fn destroy(&mut self) {
            self.destroyed += 1;
        }
    }

    #[derive(Default)]
    struct CountingPacer {
        ticks: usize,
    }

    impl Pacer for CountingPacer {
        fn wait_for_tick(&mut self) {
            self.ticks += 1;
        }
    }

    fn frame(payload_byte: u8) -> Vec<u8> {
        let mut bytes = vec![0x26];
        bytes.extend(core::iter::repeat(payload_byte).take(1024));
        bytes
    }

    fn viewer<'a>(
        source: &'a mut ScriptedSource,
        sink: &'a mut RecordingSink,
    ) -> Viewer<&'a mut ScriptedSource, &'a mut RecordingSink, Unpaced> {
        Viewer::new(source, sink, Unpaced, FrameGeometry::default(), 0x26)
    }

    #[test]
    fn test_all_black_frame() {
        let mut source = ScriptedSource::from_bytes(&frame(0x00));
        let mut sink = RecordingSink::default();

        let summary = viewer(&mut source, &mut sink).run().unwrap();

        assert_eq!(summary.reason, ShutdownReason::SourceClosed);
        assert_eq!(summary.stats.frames, 1);
        assert_eq!(sink.presented.len(), 1);
        assert_eq!(sink.presented[0].len(), 4096);
        assert!(sink.presented[0].iter().all(|&s| s == 0));
    }

    #[test]
    fn test_all_white_after_garbage() {
        let mut bytes = vec![0xFF];
        bytes.extend(frame(0xFF));
        let mut source = ScriptedSource::from_bytes(&bytes);
        let mut sink = RecordingSink::default();

        let summary = viewer(&mut source, &mut sink).run().unwrap();

        assert_eq!(summary.stats.frames, 1);
        assert_eq!(summary.stats.bytes_discarded, 1);
        assert_eq!(summary.stats.resyncs, 1);
        assert!(sink.presented[0].iter().all(|&s| s == 3));
    }

    #[test]
    fn test_sentinel_valued_payload_is_data() {
        let mut bytes = frame(0x26);
        bytes.extend(frame(0x26));
        let mut source = ScriptedSource::from_bytes(&bytes);
        let mut sink = RecordingSink::default();

        let summary = viewer(&mut source, &mut sink).run().unwrap();

        assert_eq!(summary.stats.frames, 2);
        assert_eq!(summary.stats.bytes_discarded, 0);
        for samples in &sink.presented {
            assert_eq!(&samples[..4], &[0, 2, 1, 2]);
        }
    }

    #[test]
    fn test_fragmented_frame() {
        let full = frame(0x55);
        let mut source = ScriptedSource::new([
            full[..2].to_vec(),
            vec![],
            vec![],
            full[2..].to_vec(),
        ]);
        let mut sink = RecordingSink::default();

        let summary = viewer(&mut source, &mut sink).run().unwrap();

        assert_eq!(summary.stats.frames, 1);
        assert!(sink.presented[0].iter().all(|&s| s == 1));
    }

    #[test]
    fn test_closed_mid_payload_presents_nothing() {
        let full = frame(0xFF);
        let mut source = ScriptedSource::from_bytes(&full[..500]);
        let mut sink = RecordingSink::default();

        let summary = viewer(&mut source, &mut sink).run().unwrap();

        assert_eq!(summary.reason, ShutdownReason::SourceClosed);
        assert_eq!(summary.stats.frames, 0);
        assert!(sink.presented.is_empty());
    }

    #[test]
    fn test_close_event_stops_silent_link() {
        let mut source = ScriptedSource::new(Vec::<Vec<u8>>::new()).hold_open();
        let mut sink = RecordingSink {
            close_after_polls: Some(3),
            ..RecordingSink::default()
        };

        let summary = viewer(&mut source, &mut sink).run().unwrap();

        assert_eq!(summary.reason, ShutdownReason::StopRequested);
        assert_eq!(summary.stats.frames, 0);
        assert_eq!(sink.destroyed, 1);
        assert!(source.is_closed());
    }

    #[test]
    fn test_close_event_during_payload() {
        let full = frame(0x00);
        let mut source = ScriptedSource::from_bytes(&full[..100]).hold_open();
        let mut sink = RecordingSink {
            close_after_polls: Some(2),
            ..RecordingSink::default()
        };

        let summary = viewer(&mut source, &mut sink).run().unwrap();

        assert_eq!(summary.reason, ShutdownReason::StopRequested);
        assert!(sink.presented.is_empty());
    }

    #[test]
    fn test_frame_limit() {
        let mut bytes = Vec::new();
        for _ in 0..3 {
            bytes.extend(frame(0xAA));
        }
        let mut source = ScriptedSource::from_bytes(&bytes);
        let mut sink = RecordingSink::default();
        let mut pacer = CountingPacer::default();

        let summary = Viewer::new(
            &mut source,
            &mut sink,
            &mut pacer,
            FrameGeometry::default(),
            0x26,
        )
        .with_frame_limit(2)
        .run()
        .unwrap();

        assert_eq!(summary.reason, ShutdownReason::FrameLimitReached);
        assert_eq!(summary.stats.frames, 2);
        assert_eq!(pacer.ticks, 2);
        assert_eq!(source.remaining(), 1025);
    }

    #[test]
    fn test_display_failure_releases_resources() {
        let mut source = ScriptedSource::from_bytes(&frame(0x00));
        let mut sink = RecordingSink {
            fail_present: true,
            ..RecordingSink::default()
        };

        let result = viewer(&mut source, &mut sink).run();

        assert_eq!(result, Err(ViewerError::Display(DisplayError::Output)));
        assert_eq!(sink.destroyed, 1);
        assert!(source.is_closed());
    }

    #[test]
    fn test_step_sequence() {
        let mut source = ScriptedSource::from_bytes(&frame(0x00));
        let mut sink = RecordingSink::default();
        let mut viewer = viewer(&mut source, &mut sink);

        assert_eq!(viewer.state(), State::Idle);
        let expected = [
            State::Syncing,
            State::Accumulating,
            State::Decoding,
            State::Presenting,
            State::Syncing,
            State::Shutdown(ShutdownReason::SourceClosed),
            State::Shutdown(ShutdownReason::SourceClosed),
        ];
        for state in expected {
            assert_eq!(viewer.step(), Ok(state));
        }
        assert_eq!(viewer.stats().frames, 1);
    }

    #[test]
    fn test_drop_releases_once() {
        let mut source = ScriptedSource::from_bytes(&frame(0x00));
        let mut sink = RecordingSink::default();
        {
            let mut viewer = viewer(&mut source, &mut sink);
            viewer.step().unwrap();
        }
        assert_eq!(sink.destroyed, 1);
        assert!(source.is_closed());
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let mut config = ViewerConfig::default();
        config.display.scale = 0;
        let result = Viewer::from_config(
            &config,
            ScriptedSource::default(),
            RecordingSink::default(),
            Unpaced,
        );
        assert!(matches!(result, Err(ConfigError::ScaleOutOfRange)));
    }
}
