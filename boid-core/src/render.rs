//! The boundary between the simulation and whatever draws it.

use crate::{Boid, Vector2D};

/// RGBA colour with 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Linear interpolation from `self` (t = 0) to `other` (t = 1), `t` clamped to `[0, 1]`
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
        Color {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
            a: channel(self.a, other.a),
        }
    }

    /// Mean of the RGB channels in `[0, 1]`
    pub fn intensity(&self) -> f32 {
        (self.r as f32 + self.g as f32 + self.b as f32) / (3.0 * 255.0)
    }
}

/// Colour for a boid: white when still, black at its max speed
pub fn speed_color(boid: &Boid) -> Color {
    let max_speed = boid.params.max_speed;
    let t = if max_speed > 0.0 {
        boid.speed() / max_speed
    } else {
        1.0
    };
    Color::WHITE.lerp(Color::BLACK, t)
}

/// Anything that can draw a coloured point
pub trait RenderSink {
    fn draw_point(&mut self, position: Vector2D, color: Color);
}

/// Source of the current world size
pub trait Viewport {
    fn size(&self) -> (f32, f32);
}

impl Viewport for (f32, f32) {
    fn size(&self) -> (f32, f32) {
        *self
    }
}
