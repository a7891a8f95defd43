//! Parameter types shared by the simulation, the optimizer and the CLI.

use core::fmt;
use rand::Rng;
use serde::{Deserialize, Serialize};

mod config;
mod tuning;

pub use config::{EvolutionConfig, MutationConfig, MutationPolicy};
pub use tuning::{Knob, LiveTuning, LIVE_MAX_SPEED};

/// Number of evolvable fields in [`BoidParams`]
pub const PARAM_COUNT: usize = 6;

/// Behavioural coefficients of a single boid.
///
/// The same six values describe a boid during an interactive session and act as the genome
/// searched by the optimizer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoidParams {
    /// Weight of the repulsion from boids inside `close_radius`
    pub separation: f32,
    /// Weight of the pull toward the mean neighbour position
    pub cohesion: f32,
    /// Weight of the steering toward the mean neighbour velocity
    pub alignment: f32,
    /// Distance below which separation applies
    pub close_radius: f32,
    /// Distance below which another boid counts as a neighbour
    pub radius: f32,
    /// Upper clamp on speed
    pub max_speed: f32,
}

impl Default for BoidParams {
    fn default() -> Self {
        let tuning = LiveTuning::default();
        Self {
            separation: tuning.strength(Knob::Separation),
            cohesion: tuning.strength(Knob::Cohesion),
            alignment: tuning.strength(Knob::Alignment),
            close_radius: 20.0,
            radius: 30.0,
            max_speed: 10.0,
        }
    }
}

impl BoidParams {
    /// Draw a random genome, every field from its own uniform range
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            separation: rng.gen_range(0.0..0.1),
            cohesion: rng.gen_range(0.0..0.1),
            alignment: rng.gen_range(0.0..0.1),
            close_radius: rng.gen_range(10.0..40.0),
            radius: rng.gen_range(30.0..80.0),
            max_speed: rng.gen_range(1.0..5.0),
        }
    }

    pub fn to_array(&self) -> [f32; PARAM_COUNT] {
        [
            self.separation,
            self.cohesion,
            self.alignment,
            self.close_radius,
            self.radius,
            self.max_speed,
        ]
    }

    pub fn from_array(fields: [f32; PARAM_COUNT]) -> Self {
        let [separation, cohesion, alignment, close_radius, radius, max_speed] = fields;
        Self {
            separation,
            cohesion,
            alignment,
            close_radius,
            radius,
            max_speed,
        }
    }

    fn fields_mut(&mut self) -> [&mut f32; PARAM_COUNT] {
        [
            &mut self.separation,
            &mut self.cohesion,
            &mut self.alignment,
            &mut self.close_radius,
            &mut self.radius,
            &mut self.max_speed,
        ]
    }

    /// Field-wise arithmetic mean of two parents
    pub fn crossover(&self, other: &BoidParams) -> Self {
        let (a, b) = (self.to_array(), other.to_array());
        let mut child = [0.0; PARAM_COUNT];
        for (idx, field) in child.iter_mut().enumerate() {
            *field = (a[idx] + b[idx]) / 2.0;
        }
        Self::from_array(child)
    }

    /// Scale fields by a random factor according to `mutation`. Returns how many fields changed.
    pub fn mutate<R: Rng>(&mut self, mutation: &MutationConfig, rng: &mut R) -> usize {
        let candidates = match mutation.policy {
            MutationPolicy::AllFields => PARAM_COUNT,
            MutationPolicy::SeparationOnly => 1,
        };

        let mut mutated = 0;
        for field in self.fields_mut().into_iter().take(candidates) {
            if rng.gen::<f32>() < mutation.rate {
                *field *= mutation.factor(rng);
                mutated += 1;
            }
        }
        mutated
    }
}

impl fmt::Display for BoidParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sep={:.4} coh={:.4} ali={:.4} close={:.2} radius={:.2} max_speed={:.2}",
            self.separation,
            self.cohesion,
            self.alignment,
            self.close_radius,
            self.radius,
            self.max_speed
        )
    }
}
