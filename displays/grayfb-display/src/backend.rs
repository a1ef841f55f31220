//! Display sink trait
//!
//! Defines the interface between the frame pipeline and whatever shows the
//! frames. Creating the backend creates its window.

use core::fmt;

use grayfb_protocol::Raster;

/// Display sink errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Window could not be created or has gone away
    WindowUnavailable,
    /// Raster does not match the sink's geometry
    GeometryMismatch,
    /// Writing output failed
    Output,
    /// Upscaled output does not fit in memory
    TooLarge,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::WindowUnavailable => f.write_str("display window unavailable"),
            DisplayError::GeometryMismatch => {
                f.write_str("raster geometry does not match display")
            }
            DisplayError::Output => f.write_str("display output failed"),
            DisplayError::TooLarge => f.write_str("upscaled display size overflows"),
        }
    }
}

/// Presentation surface for decoded rasters
pub trait DisplaySink {
    /// Map, upscale and show one raster
    fn present(&mut self, raster: &Raster) -> Result<(), DisplayError>;

    /// Poll pending window events
    ///
    /// Returns `true` once the user has asked to close the display. Stays
    /// `true` after that.
    fn poll_close_event(&mut self) -> bool;

    /// Tear down the window
    ///
    /// Called exactly once when the owner shuts down.
    fn destroy(&mut self) {}
}

impl<D: DisplaySink + ?Sized> DisplaySink for &mut D {
    fn present(&mut self, raster: &Raster) -> Result<(), DisplayError> {
        (**self).present(raster)
    }

    fn poll_close_event(&mut self) -> bool {
        (**self).poll_close_event()
    }

    fn destroy(&mut self) {
        (**self).destroy()
    }
}
