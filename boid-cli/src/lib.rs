//! Headless presentation layer: render sinks that need no window and a session that drives a
//! live flock frame by frame.

use anyhow::{bail, Result};
use boid_core::{Boid, Color, Flock, LiveTuning, RenderSink, Vector2D, Viewport};
use boid_shared::Knob;
use rand::{rngs::StdRng, SeedableRng};

/// Accumulates per-frame numbers instead of drawing
#[derive(Debug, Default, Clone)]
pub struct FrameStats {
    pub points: usize,
    intensity_sum: f32,
}

impl FrameStats {
    /// Average brightness of the drawn points; 1 is all white (slow), 0 all black (fast)
    pub fn mean_intensity(&self) -> f32 {
        if self.points == 0 {
            0.0
        } else {
            self.intensity_sum / self.points as f32
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl RenderSink for FrameStats {
    fn draw_point(&mut self, _position: Vector2D, color: Color) {
        self.points += 1;
        self.intensity_sum += color.intensity();
    }
}

const SHADES: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Rasterizes points onto a character grid; faster (darker) boids get denser glyphs
#[derive(Debug, Clone)]
pub struct AsciiCanvas {
    cols: usize,
    rows: usize,
    world: (f32, f32),
    cells: Vec<char>,
}

impl AsciiCanvas {
    pub fn new(cols: usize, rows: usize, world: (f32, f32)) -> Self {
        Self {
            cols,
            rows,
            world,
            cells: vec![' '; cols * rows],
        }
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = ' ');
    }

    pub fn set_world(&mut self, world: (f32, f32)) {
        self.world = world;
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<char> {
        (col < self.cols && row < self.rows).then(|| self.cells[row * self.cols + col])
    }

    fn shade(color: Color) -> char {
        let darkness = 1.0 - color.intensity();
        let idx = (darkness * (SHADES.len() - 1) as f32).round() as usize;
        SHADES[idx.min(SHADES.len() - 1)]
    }

    pub fn render(&self) -> String {
        let mut out = String::with_capacity((self.cols + 1) * self.rows);
        for row in self.cells.chunks(self.cols.max(1)) {
            out.extend(row.iter());
            out.push('\n');
        }
        out
    }
}

impl RenderSink for AsciiCanvas {
    fn draw_point(&mut self, position: Vector2D, color: Color) {
        let (width, height) = self.world;
        if self.cols == 0 || self.rows == 0 || width <= 0.0 || height <= 0.0 {
            return;
        }

        let col = (position.x / width * self.cols as f32) as usize;
        let row = (position.y / height * self.rows as f32) as usize;
        if col < self.cols && row < self.rows {
            self.cells[row * self.cols + col] = Self::shade(color);
        }
    }
}

/// An interactive flock: the tuning knobs, the viewport and the generator that drives it
pub struct Session {
    pub flock: Flock,
    pub tuning: LiveTuning,
    viewport: (f32, f32),
    rng: StdRng,
    frame: usize,
}

impl Session {
    pub fn new(viewport: (f32, f32), boids: usize, seed: Option<u64>) -> Result<Self> {
        let (width, height) = viewport.size();
        if !(width > 0.0 && height > 0.0) {
            bail!("viewport must have a positive size, got {width}x{height}");
        }

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let flock = Flock::from_viewport(&viewport, boids, &mut rng);
        log::info!("Session started with {boids} boids on {width}x{height}");

        Ok(Self {
            flock,
            tuning: LiveTuning::default(),
            viewport,
            rng,
            frame: 0,
        })
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn viewport(&self) -> (f32, f32) {
        self.viewport
    }

    /// Feed one key press to the tuning knobs
    pub fn press(&mut self, key: char) -> Option<Knob> {
        let knob = self.tuning.handle_key(key)?;
        log::debug!(
            "{knob:?} modifier now {} (strength {:.3})",
            self.tuning.modifier(knob),
            self.tuning.strength(knob)
        );
        Some(knob)
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = (width, height);
    }

    /// Add fresh boids; they pick up the tuning in effect at their first frame
    pub fn spawn(&mut self, count: usize) {
        let (width, height) = self.viewport;
        for _ in 0..count {
            let boid = Boid::random(width, height, &mut self.rng);
            self.flock.add_boid(boid);
        }
    }

    /// Replace every boid so the current tuning applies to the whole flock
    pub fn respawn(&mut self) {
        let count = self.flock.len();
        self.flock.boids.clear();
        self.spawn(count);
    }

    /// Step the flock once and draw it into `sink`
    pub fn advance<S: RenderSink>(&mut self, sink: &mut S) {
        self.flock.fit_viewport(&self.viewport);
        self.flock.step(&self.tuning, &mut self.rng);
        self.flock.render(sink);
        self.frame += 1;
    }
}
