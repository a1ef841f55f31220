//! Demo reel
//!
//! Each demo is introduced by a title card and followed by a fade to black:
//!
//! ```text
//!   TitleCard (24) ─▶ demo (150) ─▶ FadeToBlack (9) ─▶ next demo ...
//! ```
//!
//! Scenes draw into a [`FrameBuffer`] one frame at a time; the emitter sends
//! whatever the buffer holds after each call.

use embedded_graphics::mono_font::ascii::FONT_4X6;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::{Gray2, GrayColor};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::framebuffer::{FrameBuffer, MAX_LEVEL};

/// Frames a title card is shown
pub const TITLE_FRAMES: usize = 24;

/// Frames each demo runs
pub const DEMO_FRAMES: usize = 150;

/// Dimming steps when fading out
pub const FADE_STEPS: u8 = 8;

/// One segment of the reel
pub trait Scene {
    /// Short identifier, e.g. `bouncing-ball`
    fn name(&self) -> &'static str;

    /// Number of frames this scene produces
    fn frame_count(&self) -> usize;

    /// Draw frame `frame` into `fb`
    ///
    /// Called with `frame` counting up from zero. `fb` still holds the
    /// previous scene's last frame on the first call.
    fn render(&mut self, frame: usize, fb: &mut FrameBuffer);
}

/// Build the reel, optionally restricted to the demo called `only`
pub fn demo_reel(seed: u64, only: Option<&str>) -> Vec<Box<dyn Scene>> {
    let demos: Vec<(&'static str, Box<dyn Scene>)> = vec![
        ("BOUNCING BALL", Box::new(BouncingBall::default())),
        ("SPINNING RING", Box::new(SpinningRing::default())),
        ("FIREWORKS", Box::new(Fireworks::new(seed))),
        ("DIAGONAL WAVE", Box::new(DiagonalWave)),
        ("MULTIPLE BALLS", Box::new(MultipleBalls::default())),
        ("PULSATING BLOB", Box::new(PulsatingBlob)),
        ("ROTATING STRIPES", Box::new(RotatingStripes)),
    ];

    let mut reel: Vec<Box<dyn Scene>> = Vec::new();
    for (title, demo) in demos {
        if only.is_some_and(|name| name != demo.name()) {
            continue;
        }
        reel.push(Box::new(TitleCard::new(title)));
        reel.push(demo);
        reel.push(Box::new(FadeToBlack::new(FADE_STEPS)));
    }
    reel
}

/// Names of every demo in reel order
pub const DEMO_NAMES: [&str; 7] = [
    "bouncing-ball",
    "spinning-ring",
    "fireworks",
    "diagonal-wave",
    "multiple-balls",
    "pulsating-blob",
    "rotating-stripes",
];

/// Centered caption on black
pub struct TitleCard {
    title: &'static str,
}

impl TitleCard {
    pub fn new(title: &'static str) -> Self {
        Self { title }
    }
}

impl Scene for TitleCard {
    fn name(&self) -> &'static str {
        "title"
    }

    fn frame_count(&self) -> usize {
        TITLE_FRAMES
    }

    fn render(&mut self, _frame: usize, fb: &mut FrameBuffer) {
        fb.fill(0);
        let center = Point::new(fb.width() / 2, fb.height() / 2);
        let character_style = MonoTextStyle::new(&FONT_4X6, Gray2::WHITE);
        let text_style = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();
        let _ = Text::with_text_style(self.title, center, character_style, text_style).draw(fb);
    }
}

/// Dims the previous scene's last frame to black
///
/// Frame `n` scales the buffer left by frame `n - 1` by `(steps - n) / steps`,
/// so the dimming compounds.
pub struct FadeToBlack {
    steps: u8,
}

impl FadeToBlack {
    pub fn new(steps: u8) -> Self {
        Self {
            steps: steps.max(1),
        }
    }
}

impl Scene for FadeToBlack {
    fn name(&self) -> &'static str {
        "fade"
    }

    fn frame_count(&self) -> usize {
        self.steps as usize + 1
    }

    fn render(&mut self, frame: usize, fb: &mut FrameBuffer) {
        let step = self.steps.saturating_sub(frame.min(u8::MAX as usize) as u8);
        fb.dim(step, self.steps);
    }
}

/// Single pixel bouncing off the edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ball {
    x: i32,
    y: i32,
    dx: i32,
    dy: i32,
}

impl Ball {
    fn advance(&mut self, width: i32, height: i32) {
        self.x += self.dx;
        self.y += self.dy;
        if self.x <= 0 || self.x >= width - 1 {
            self.dx = -self.dx;
        }
        if self.y <= 0 || self.y >= height - 1 {
            self.dy = -self.dy;
        }
    }
}

pub struct BouncingBall {
    ball: Ball,
}

impl Default for BouncingBall {
    fn default() -> Self {
        Self {
            ball: Ball {
                x: 0,
                y: 0,
                dx: 1,
                dy: 1,
            },
        }
    }
}

impl Scene for BouncingBall {
    fn name(&self) -> &'static str {
        "bouncing-ball"
    }

    fn frame_count(&self) -> usize {
        DEMO_FRAMES
    }

    fn render(&mut self, _frame: usize, fb: &mut FrameBuffer) {
        fb.fill(0);
        fb.set(self.ball.x, self.ball.y, MAX_LEVEL);
        self.ball.advance(fb.width(), fb.height());
    }
}

/// Ring of 36 dots rotating 5° per frame
#[derive(Default)]
pub struct SpinningRing {
    angle: f32,
}

const RING_RADIUS: f32 = 20.0;

impl Scene for SpinningRing {
    fn name(&self) -> &'static str {
        "spinning-ring"
    }

    fn frame_count(&self) -> usize {
        DEMO_FRAMES
    }

    fn render(&mut self, _frame: usize, fb: &mut FrameBuffer) {
        fb.fill(0);
        let (cx, cy) = (fb.width() / 2, fb.height() / 2);
        for i in (0..360).step_by(10) {
            let rad = (i as f32 + self.angle).to_radians();
            let px = cx + (RING_RADIUS * rad.cos()) as i32;
            let py = cy + (RING_RADIUS * rad.sin()) as i32;
            fb.set(px, py, MAX_LEVEL);
        }
        self.angle += 5.0;
        if self.angle >= 360.0 {
            self.angle -= 360.0;
        }
    }
}

const MAX_PARTICLES: usize = 20;
const MAX_EXPLOSIONS: usize = 3;
const MAX_AGE: i32 = 8;

#[derive(Debug, Clone, Copy, Default)]
struct Particle {
    x: i32,
    y: i32,
    dx: i32,
    dy: i32,
    age: i32,
    brightness: u8,
    active: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct Explosion {
    particles: [Particle; MAX_PARTICLES],
    active: bool,
}

impl Explosion {
    fn ignite(&mut self, rng: &mut SmallRng, width: i32, height: i32) {
        let cx = rng.gen_range(0..width);
        let cy = rng.gen_range(0..height);
        self.active = true;
        for p in &mut self.particles {
            *p = Particle {
                x: cx,
                y: cy,
                dx: rng.gen_range(-3..=3),
                dy: rng.gen_range(-3..=3),
                age: 0,
                brightness: MAX_LEVEL,
                active: true,
            };
        }
    }

    fn update(&mut self, width: i32, height: i32) {
        let mut alive = 0;
        for p in self.particles.iter_mut().filter(|p| p.active) {
            p.x += p.dx;
            p.y += p.dy;
            p.age += 1;
            if p.age > MAX_AGE || p.x < 0 || p.x >= width || p.y < 0 || p.y >= height {
                p.active = false;
            } else {
                p.brightness = (3 - p.age * 3 / MAX_AGE) as u8;
                alive += 1;
            }
        }
        if alive == 0 {
            self.active = false;
        }
    }
}

/// Random bursts of fading particles
pub struct Fireworks {
    rng: SmallRng,
    explosions: [Explosion; MAX_EXPLOSIONS],
}

impl Fireworks {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            explosions: [Explosion::default(); MAX_EXPLOSIONS],
        }
    }

    #[cfg(test)]
    fn active(&self) -> usize {
        self.explosions.iter().filter(|e| e.active).count()
    }
}

impl Scene for Fireworks {
    fn name(&self) -> &'static str {
        "fireworks"
    }

    fn frame_count(&self) -> usize {
        DEMO_FRAMES
    }

    fn render(&mut self, _frame: usize, fb: &mut FrameBuffer) {
        fb.fill(0);
        let (w, h) = (fb.width(), fb.height());
        for ex in &mut self.explosions {
            if !ex.active && self.rng.gen_range(0..20) == 0 {
                ex.ignite(&mut self.rng, w, h);
            }
            if ex.active {
                ex.update(w, h);
                for p in ex.particles.iter().filter(|p| p.active) {
                    fb.set(p.x, p.y, p.brightness);
                }
            }
        }
    }
}

/// One lit pixel per row, sliding right each frame
pub struct DiagonalWave;

impl Scene for DiagonalWave {
    fn name(&self) -> &'static str {
        "diagonal-wave"
    }

    fn frame_count(&self) -> usize {
        DEMO_FRAMES
    }

    fn render(&mut self, frame: usize, fb: &mut FrameBuffer) {
        fb.fill(0);
        let w = fb.width();
        for y in 0..fb.height() {
            fb.set((y + frame as i32) % w, y, MAX_LEVEL);
        }
    }
}

/// Four balls starting from the corners
pub struct MultipleBalls {
    balls: [Ball; 4],
}

impl Default for MultipleBalls {
    fn default() -> Self {
        let ball = |x, y, dx, dy| Ball { x, y, dx, dy };
        Self {
            balls: [
                ball(0, 0, 1, 1),
                ball(63, 0, -1, 1),
                ball(0, 63, 1, -1),
                ball(63, 63, -1, -1),
            ],
        }
    }
}

impl Scene for MultipleBalls {
    fn name(&self) -> &'static str {
        "multiple-balls"
    }

    fn frame_count(&self) -> usize {
        DEMO_FRAMES
    }

    fn render(&mut self, _frame: usize, fb: &mut FrameBuffer) {
        fb.fill(0);
        let (w, h) = (fb.width(), fb.height());
        for ball in &mut self.balls {
            fb.set(ball.x, ball.y, MAX_LEVEL);
            ball.advance(w, h);
        }
    }
}

/// Filled disc cycling through radii 5..=14
pub struct PulsatingBlob;

impl Scene for PulsatingBlob {
    fn name(&self) -> &'static str {
        "pulsating-blob"
    }

    fn frame_count(&self) -> usize {
        DEMO_FRAMES
    }

    fn render(&mut self, frame: usize, fb: &mut FrameBuffer) {
        fb.fill(0);
        let radius = 5 + (frame % 10) as u32;
        let center = Point::new(fb.width() / 2, fb.height() / 2);
        let _ = Circle::with_center(center, 2 * radius + 1)
            .into_styled(PrimitiveStyle::with_fill(Gray2::WHITE))
            .draw(fb);
    }
}

/// 4-pixel diagonal stripes drifting one pixel per frame
pub struct RotatingStripes;

impl Scene for RotatingStripes {
    fn name(&self) -> &'static str {
        "rotating-stripes"
    }

    fn frame_count(&self) -> usize {
        DEMO_FRAMES
    }

    fn render(&mut self, frame: usize, fb: &mut FrameBuffer) {
        for y in 0..fb.height() {
            for x in 0..fb.width() {
                let lit = (x as usize + y as usize + frame) % 8 < 4;
                fb.set(x, y, if lit { MAX_LEVEL } else { 0 });
            }
        }
    }
}
