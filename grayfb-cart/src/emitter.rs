//! Frame emitter
//!
//! Encodes the framebuffer and writes one frame per tick.

use std::io::Write;

use anyhow::{anyhow, Context, Result};
use grayfb_hal::Pacer;
use log::{debug, info};

use crate::framebuffer::FrameBuffer;
use crate::scenes::Scene;

/// Paced frame writer
pub struct Emitter<W: Write, P: Pacer> {
    out: W,
    pacer: P,
    sentinel: u8,
    frames: u64,
}

impl<W: Write, P: Pacer> Emitter<W, P> {
    pub fn new(out: W, pacer: P, sentinel: u8) -> Self {
        Self {
            out,
            pacer,
            sentinel,
            frames: 0,
        }
    }

    /// Frames written so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Write the current framebuffer contents and wait for the next tick
    pub fn send(&mut self, fb: &FrameBuffer) -> Result<()> {
        let frame = fb
            .to_frame(self.sentinel)
            .map_err(|e| anyhow!("cannot encode frame: {}", e))?;
        self.out
            .write_all(&frame.encode_to_vec())
            .context("failed to write frame")?;
        self.out.flush().context("failed to flush frame")?;
        self.frames += 1;
        self.pacer.wait_for_tick();
        Ok(())
    }

    /// Render and send every frame of `scene`
    pub fn play(&mut self, scene: &mut dyn Scene, fb: &mut FrameBuffer) -> Result<()> {
        debug!("Playing {} ({} frames)", scene.name(), scene.frame_count());
        for frame in 0..scene.frame_count() {
            scene.render(frame, fb);
            self.send(fb)?;
        }
        debug!("{} finished with {} pixels lit", scene.name(), fb.lit());
        Ok(())
    }

    /// Play the whole reel once
    pub fn play_reel(&mut self, reel: &mut [Box<dyn Scene>], fb: &mut FrameBuffer) -> Result<()> {
        for scene in reel.iter_mut() {
            if scene.name() != "title" && scene.name() != "fade" {
                info!("Scene: {}", scene.name());
            }
            self.play(scene.as_mut(), fb)?;
        }
        Ok(())
    }

    /// Give back the output
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}
