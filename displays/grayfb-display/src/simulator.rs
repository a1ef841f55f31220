//! SDL2 window backend
//!
//! Renders through `embedded-graphics-simulator`. The raster is upscaled by
//! [`Screen`] and drawn 1:1 into an `Rgb888` simulator display, which the
//! window then shows.

use alloc::string::String;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use grayfb_protocol::Raster;
use log::{debug, info};

use crate::backend::{DisplayError, DisplaySink};
use crate::screen::Screen;

/// Desktop window showing the decoded stream
pub struct SimulatorSink {
    display: SimulatorDisplay<Rgb888>,
    window: Window,
    screen: Screen,
    title: String,
    closed: bool,
}

impl SimulatorSink {
    /// Create the window for `width`×`height` rasters upscaled by `scale`
    pub fn create_window(
        title: &str,
        width: usize,
        height: usize,
        scale: u32,
    ) -> Result<Self, DisplayError> {
        let screen = Screen::new(width, height, scale)?;
        let (w, h) = screen.dimensions();
        let mut display: SimulatorDisplay<Rgb888> =
            SimulatorDisplay::new(Size::new(w as u32, h as u32));
        display.clear(Rgb888::BLACK).ok();

        let output_settings = OutputSettingsBuilder::new().scale(1).build();
        let mut window = Window::new(title, &output_settings);
        // The SDL window only exists after the first update
        window.update(&display);
        info!("Window \"{}\" opened at {}x{}", title, w, h);

        Ok(Self {
            display,
            window,
            screen,
            title: String::from(title),
            closed: false,
        })
    }
}

impl DisplaySink for SimulatorSink {
    fn present(&mut self, raster: &Raster) -> Result<(), DisplayError> {
        if self.closed {
            return Err(DisplayError::WindowUnavailable);
        }
        self.screen.render(raster)?;

        let (w, _) = self.screen.dimensions();
        let pixels = self.screen.pixels().iter().enumerate().map(|(i, &[r, g, b])| {
            Pixel(
                Point::new((i % w) as i32, (i / w) as i32),
                Rgb888::new(r, g, b),
            )
        });
        self.display.draw_iter(pixels).ok();
        self.window.update(&self.display);
        Ok(())
    }

    fn poll_close_event(&mut self) -> bool {
        if self.closed {
            return true;
        }
        // Drain the whole queue so stale events don't pile up
        for event in self.window.events() {
            if matches!(event, SimulatorEvent::Quit) {
                debug!("Window close requested");
                self.closed = true;
            }
        }
        self.closed
    }

    fn destroy(&mut self) {
        info!("Window \"{}\" closed", self.title);
    }
}
