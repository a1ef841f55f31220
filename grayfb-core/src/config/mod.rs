//! Configuration types
//!
//! Viewer configuration: raster geometry, presentation and serial link
//! settings. Loaded from TOML by the viewer binary.

pub mod types;

pub use types::*;
