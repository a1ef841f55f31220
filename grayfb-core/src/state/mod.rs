//! Viewer lifecycle state machine
//!
//! The receive loop is an explicit, finite, deterministic state machine.
//! Every suspension point belongs to exactly one state, and shutdown is
//! terminal.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::{ShutdownReason, State};
