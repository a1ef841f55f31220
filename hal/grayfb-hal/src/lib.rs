//! grayfb Hardware Abstraction Layer
//!
//! This crate defines the platform seams the frame pipeline runs against.
//! The framing and decoding code only ever sees these traits, so the same
//! logic runs over a host serial port, a recorded capture, or a scripted
//! source in tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  grayfb-core controller / grayfb-cart   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  grayfb-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ ReaderSource  │       │ ScriptedSource│
//! │ (std::io)     │       │ (tests)       │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`source::ByteSource`] - Timeout-bounded byte reads
//! - [`time::Pacer`] - Fixed-cadence waiting

#![no_std]
#![deny(unsafe_code)]

#[cfg(any(feature = "std", feature = "mock", test))]
extern crate std;

#[cfg(any(feature = "mock", test))]
extern crate alloc;

#[cfg(any(feature = "std", test))]
pub mod io;
#[cfg(any(feature = "mock", test))]
pub mod mock;
pub mod source;
pub mod time;

// Re-export key traits at crate root for convenience
pub use source::{ByteSource, SourceError};
pub use time::{Pacer, Unpaced};

#[cfg(any(feature = "std", test))]
pub use io::ReaderSource;
#[cfg(any(feature = "mock", test))]
pub use mock::ScriptedSource;
#[cfg(any(feature = "std", test))]
pub use time::Ticker;
