use crate::{
    render::{speed_color, RenderSink, Viewport},
    Boid,
};
use boid_shared::{BoidParams, LiveTuning};
use rand::Rng;

/// A collection of boids sharing a wrapping `width` x `height` world
#[derive(Debug, Clone)]
pub struct Flock {
    pub boids: Vec<Boid>,
    pub width: f32,
    pub height: f32,
}

impl Flock {
    /// `count` live boids at random positions
    pub fn new<R: Rng>(width: f32, height: f32, count: usize, rng: &mut R) -> Self {
        let boids = (0..count)
            .map(|_| Boid::random(width, height, rng))
            .collect();

        Self {
            boids,
            width,
            height,
        }
    }

    /// `count` boids at random positions, all pinned to `params`
    pub fn with_params<R: Rng>(
        width: f32,
        height: f32,
        count: usize,
        params: BoidParams,
        rng: &mut R,
    ) -> Self {
        let boids = (0..count)
            .map(|_| Boid::random_with_params(width, height, params, rng))
            .collect();

        Self {
            boids,
            width,
            height,
        }
    }

    pub fn from_viewport<V: Viewport, R: Rng>(viewport: &V, count: usize, rng: &mut R) -> Self {
        let (width, height) = viewport.size();
        Self::new(width, height, count, rng)
    }

    /// Advance one step. Each boid computes its forces and moves before the next one starts, so
    /// later boids see the already-moved state of earlier ones.
    pub fn step<R: Rng>(&mut self, tuning: &LiveTuning, rng: &mut R) {
        for idx in 0..self.boids.len() {
            let (before, rest) = self.boids.split_at_mut(idx);
            if let Some((boid, after)) = rest.split_first_mut() {
                boid.update_forces(before.iter().chain(after.iter()), tuning, rng);
                boid.update_move(self.width, self.height);
            }
        }
    }

    /// Draw every boid once, coloured by speed
    pub fn render<S: RenderSink>(&self, sink: &mut S) {
        for boid in &self.boids {
            sink.draw_point(boid.position, speed_color(boid));
        }
    }

    pub fn add_boid(&mut self, boid: Boid) {
        self.boids.push(boid);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn fit_viewport<V: Viewport>(&mut self, viewport: &V) {
        let (width, height) = viewport.size();
        self.resize(width, height);
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    /// Average speed over all boids, 0 for an empty flock
    pub fn mean_speed(&self) -> f32 {
        if self.boids.is_empty() {
            return 0.0;
        }
        self.boids.iter().map(Boid::speed).sum::<f32>() / self.boids.len() as f32
    }
}
