//! Platform-agnostic core of the grayfb viewer
//!
//! This crate contains all viewer logic that does not depend on a specific
//! serial driver or window system:
//!
//! - Configuration type definitions and validation
//! - Lifecycle state machine (sync, accumulate, decode, present, shutdown)
//! - The receive loop driving a `ByteSource` into a `DisplaySink`

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod config;
pub mod controller;
pub mod state;

pub use config::{ConfigError, ViewerConfig};
pub use controller::{RunSummary, Viewer, ViewerError, ViewerStats};
pub use state::{Event, ShutdownReason, State};
