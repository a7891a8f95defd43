//! Flocking simulation: vector math, boids and the flock that steps them.

mod boid;
mod flock;
pub mod render;
mod vector;

pub use boid::{Boid, MIN_SPEED};
pub use boid_shared::{BoidParams, LiveTuning};
pub use flock::Flock;
pub use render::{speed_color, Color, RenderSink, Viewport};
pub use vector::Vector2D;
