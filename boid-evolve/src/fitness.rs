//! Scoring a genome by simulating a flock that carries it.

use boid_core::{BoidParams, Flock, LiveTuning};
use boid_shared::EvolutionConfig;
use rand::Rng;

/// Scores a genome; higher is better
pub trait Fitness {
    fn evaluate<R: Rng>(&self, params: &BoidParams, rng: &mut R) -> f32;
}

impl<F: Fn(&BoidParams) -> f32> Fitness for F {
    fn evaluate<R: Rng>(&self, params: &BoidParams, _rng: &mut R) -> f32 {
        self(params)
    }
}

/// Mean final speed of a headless flock in which every boid carries the genome
#[derive(Debug, Clone, PartialEq)]
pub struct FlockSpeed {
    pub flock_size: usize,
    pub steps: usize,
    pub width: f32,
    pub height: f32,
}

impl Default for FlockSpeed {
    fn default() -> Self {
        Self::from_config(&EvolutionConfig::default())
    }
}

impl FlockSpeed {
    pub fn from_config(config: &EvolutionConfig) -> Self {
        Self {
            flock_size: config.flock_size,
            steps: config.steps,
            width: config.world_width,
            height: config.world_height,
        }
    }
}

impl Fitness for FlockSpeed {
    fn evaluate<R: Rng>(&self, params: &BoidParams, rng: &mut R) -> f32 {
        let mut flock = Flock::with_params(self.width, self.height, self.flock_size, *params, rng);
        // pinned boids ignore the tuning
        let tuning = LiveTuning::default();
        for _ in 0..self.steps {
            flock.step(&tuning, rng);
        }
        flock.mean_speed()
    }
}
