//! State machine definition

use super::events::Event;

/// Viewer states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Created, nothing read yet
    Idle,
    /// Discarding bytes until the sentinel
    Syncing,
    /// Collecting the fixed-size payload
    Accumulating,
    /// Unpacking samples into the raster
    Decoding,
    /// Rendering and waiting for the next tick
    Presenting,
    /// Terminal; resources released
    Shutdown(ShutdownReason),
}

/// Why the viewer stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShutdownReason {
    /// Window closed by the user
    StopRequested,
    /// Link hung up or reached end of input
    SourceClosed,
    /// Frame limit reached
    FrameLimitReached,
    /// Display backend error
    DisplayFailed,
}

impl ShutdownReason {
    /// Whether this is an orderly stop rather than a failure
    pub fn is_clean(&self) -> bool {
        !matches!(self, ShutdownReason::DisplayFailed)
    }
}

impl core::fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ShutdownReason::StopRequested => f.write_str("stop requested"),
            ShutdownReason::SourceClosed => f.write_str("source closed"),
            ShutdownReason::FrameLimitReached => f.write_str("frame limit reached"),
            ShutdownReason::DisplayFailed => f.write_str("display failed"),
        }
    }
}

impl State {
    /// Check if this is the terminal state
    pub fn is_shutdown(&self) -> bool {
        matches!(self, State::Shutdown(_))
    }

    /// Reason for stopping, once terminal
    pub fn shutdown_reason(&self) -> Option<ShutdownReason> {
        match self {
            State::Shutdown(reason) => Some(*reason),
            _ => None,
        }
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            // Terminal state absorbs everything
            (Shutdown(_), _) => self,

            // Termination from any live state
            (_, Event::StopRequested) => Shutdown(ShutdownReason::StopRequested),
            (_, Event::SourceClosed) => Shutdown(ShutdownReason::SourceClosed),
            (_, Event::FrameLimitReached) => Shutdown(ShutdownReason::FrameLimitReached),
            (_, Event::DisplayFailed) => Shutdown(ShutdownReason::DisplayFailed),

            (Idle, Start) => Syncing,
            (Syncing, SentinelFound) => Accumulating,
            (Accumulating, PayloadComplete) => Decoding,
            (Decoding, Decoded) => Presenting,
            (Presenting, Presented) => Syncing,

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TERMINATIONS: [(Event, ShutdownReason); 4] = [
        (Event::StopRequested, ShutdownReason::StopRequested),
        (Event::SourceClosed, ShutdownReason::SourceClosed),
        (Event::FrameLimitReached, ShutdownReason::FrameLimitReached),
        (Event::DisplayFailed, ShutdownReason::DisplayFailed),
    ];

    #[test]
    fn test_frame_cycle() {
        let mut state = State::Idle;
        let steps = [
            (Event::Start, State::Syncing),
            (Event::SentinelFound, State::Accumulating),
            (Event::PayloadComplete, State::Decoding),
            (Event::Decoded, State::Presenting),
            (Event::Presented, State::Syncing),
        ];
        for (event, expected) in steps {
            state = state.transition(event);
            assert_eq!(state, expected);
        }
    }

    #[test]
    fn test_shutdown_from_any_live_state() {
        let states = [
            State::Idle,
            State::Syncing,
            State::Accumulating,
            State::Decoding,
            State::Presenting,
        ];
        for state in states {
            for (event, reason) in TERMINATIONS {
                assert_eq!(state.transition(event), State::Shutdown(reason));
            }
        }
    }

    #[test]
    fn test_shutdown_is_absorbing() {
        let state = State::Shutdown(ShutdownReason::SourceClosed);
        let events = [
            Event::Start,
            Event::SentinelFound,
            Event::Presented,
            Event::StopRequested,
            Event::DisplayFailed,
        ];
        for event in events {
            assert_eq!(state.transition(event), state);
        }
    }

    #[test]
    fn test_unlisted_transitions_ignored() {
        assert_eq!(State::Idle.transition(Event::Decoded), State::Idle);
        assert_eq!(State::Syncing.transition(Event::PayloadComplete), State::Syncing);
        assert_eq!(State::Accumulating.transition(Event::Start), State::Accumulating);
        assert_eq!(State::Presenting.transition(Event::SentinelFound), State::Presenting);
    }

    #[test]
    fn test_helpers() {
        assert!(!State::Syncing.is_shutdown());
        assert!(State::Shutdown(ShutdownReason::StopRequested).is_shutdown());
        assert_eq!(State::Decoding.shutdown_reason(), None);
        assert_eq!(
            State::Shutdown(ShutdownReason::FrameLimitReached).shutdown_reason(),
            Some(ShutdownReason::FrameLimitReached)
        );
        assert!(ShutdownReason::SourceClosed.is_clean());
        assert!(!ShutdownReason::DisplayFailed.is_clean());
    }
}
