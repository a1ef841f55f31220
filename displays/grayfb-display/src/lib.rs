//! Display sink abstraction and shared renderer for grayfb
//!
//! This crate provides:
//! - `DisplaySink` trait for anything that can show a decoded raster
//! - `Screen`, the grayscale-to-RGB mapper and integer upscaler
//! - `HeadlessSink` (feature `std`) for running without a window
//! - `SimulatorSink` (feature `simulator`) for an SDL2 desktop window
//!
//! # Architecture
//!
//! The lifecycle controller only talks to `DisplaySink`. Backends own their
//! window or output file, render through a `Screen`, and report the user's
//! request to close through `poll_close_event`.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod backend;
#[cfg(feature = "std")]
pub mod headless;
pub mod screen;
#[cfg(feature = "simulator")]
pub mod simulator;

// Re-export key types
pub use backend::{DisplayError, DisplaySink};
#[cfg(feature = "std")]
pub use headless::HeadlessSink;
pub use screen::{Rgb, Screen, DEFAULT_SCALE};
#[cfg(feature = "simulator")]
pub use simulator::SimulatorSink;
