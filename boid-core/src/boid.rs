use crate::Vector2D;
use boid_shared::{BoidParams, LiveTuning};
use core::f32::consts::PI;
use rand::Rng;

/// Speeds below this are boosted back up after the force update
pub const MIN_SPEED: f32 = 1.0;

/// Width of the heading noise band, in radians
const NOISE_SPREAD: f32 = PI * 0.5 * 0.11;

/// A single boid entity
#[derive(Debug, Clone)]
pub struct Boid {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub params: BoidParams,
    initialized: bool,
    pinned: bool,
}

impl Boid {
    /// A live boid with default coefficients. Its strengths and max speed are taken from the
    /// [`LiveTuning`] in effect when it first updates.
    pub fn new(position: Vector2D, velocity: Vector2D) -> Self {
        Self {
            position,
            velocity,
            params: BoidParams::default(),
            initialized: false,
            pinned: false,
        }
    }

    /// A boid whose coefficients come from a genome and survive initialization
    pub fn with_params(position: Vector2D, velocity: Vector2D, params: BoidParams) -> Self {
        Self {
            params,
            pinned: true,
            ..Self::new(position, velocity)
        }
    }

    /// Random position inside `width` x `height` and a velocity in `[-20, 20)` per axis
    pub fn random<R: Rng>(width: f32, height: f32, rng: &mut R) -> Self {
        let (position, velocity) = random_motion(width, height, rng);
        Self::new(position, velocity)
    }

    /// Like [`Boid::random`], pinned to `params`
    pub fn random_with_params<R: Rng>(
        width: f32,
        height: f32,
        params: BoidParams,
        rng: &mut R,
    ) -> Self {
        let (position, velocity) = random_motion(width, height, rng);
        Self::with_params(position, velocity, params)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn speed(&self) -> f32 {
        self.velocity.magnitude()
    }

    /// One-time setup run at the top of the first force update: the velocity is redrawn in
    /// `[-1, 1)` per axis and unpinned boids adopt `tuning`. Returns false if already done.
    pub fn initialize<R: Rng>(&mut self, tuning: &LiveTuning, rng: &mut R) -> bool {
        if self.initialized {
            return false;
        }

        self.velocity = Vector2D::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
        if !self.pinned {
            self.params = tuning.apply(self.params);
        }
        self.initialized = true;
        true
    }

    /// Steer by separation, alignment and cohesion against `others`, then clamp the speed.
    ///
    /// `others` must not contain this boid.
    pub fn update_forces<'a, I, R>(&mut self, others: I, tuning: &LiveTuning, rng: &mut R)
    where
        I: Iterator<Item = &'a Boid>,
        R: Rng,
    {
        self.initialize(tuning, rng);

        let mut separation = Vector2D::zero();
        let mut alignment = Vector2D::zero();
        let mut cohesion = Vector2D::zero();
        let mut neighbors = 0usize;

        for other in others {
            let distance = self.position.distance(&other.position);

            // a coincident neighbour gives no direction to flee in
            if distance < self.params.close_radius && distance > 0.0 {
                separation += (self.position - other.position) / distance;
            }

            if distance < self.params.radius {
                alignment += other.velocity;
                cohesion += other.position;
                neighbors += 1;
            }
        }

        if neighbors > 0 {
            let count = neighbors as f32;
            let separation = separation * self.params.separation;
            let alignment = (alignment / count - self.velocity) * self.params.alignment;
            let cohesion = (cohesion / count - self.position) * self.params.cohesion;

            self.velocity += separation + alignment + cohesion;

            let angle = (rng.gen::<f32>() - 0.5) * NOISE_SPREAD;
            self.velocity = self.velocity.rotate(angle);
        }

        self.limit_speed();
    }

    /// Slow boids get `normalize(v) * MIN_SPEED / speed`, which lands at `1 / speed` and so above
    /// the floor. Fast boids are cut to exactly `max_speed`. A zero velocity has no direction and
    /// is left alone.
    fn limit_speed(&mut self) {
        let speed = self.velocity.magnitude();
        if speed == 0.0 {
            return;
        }

        if speed < MIN_SPEED {
            self.velocity = self.velocity.normalize() * (MIN_SPEED / speed);
        }

        if self.velocity.magnitude() > self.params.max_speed {
            self.velocity = self.velocity.normalize() * self.params.max_speed;
        }
    }

    /// Advance by the current velocity and wrap each axis into `[0, width) x [0, height)`
    pub fn update_move(&mut self, width: f32, height: f32) {
        self.position += self.velocity;
        self.position.x = wrap_axis(self.position.x, width);
        self.position.y = wrap_axis(self.position.y, height);
    }
}

fn random_motion<R: Rng>(width: f32, height: f32, rng: &mut R) -> (Vector2D, Vector2D) {
    let position = Vector2D::new(rng.gen::<f32>() * width, rng.gen::<f32>() * height);
    let velocity = Vector2D::new(rng.gen_range(-20.0..20.0), rng.gen_range(-20.0..20.0));
    (position, velocity)
}

/// Single-step wrap: overflow restarts at 0, underflow lands on the far edge
fn wrap_axis(value: f32, bound: f32) -> f32 {
    if value >= bound {
        0.0
    } else if value < 0.0 {
        far_edge(bound)
    } else {
        value
    }
}

/// Largest coordinate that still sits inside the half-open range `[0, bound)`
fn far_edge(bound: f32) -> f32 {
    (bound - bound * f32::EPSILON).max(0.0)
}
