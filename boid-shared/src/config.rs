use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which genome fields a mutation may touch
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MutationPolicy {
    /// Every field rolls independently
    #[default]
    AllFields,
    /// Only the separation strength may change
    SeparationOnly,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MutationConfig {
    /// Probability that a candidate field is scaled
    pub rate: f32,
    pub min_factor: f32,
    pub max_factor: f32,
    pub policy: MutationPolicy,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            rate: 0.1,
            min_factor: 0.75,
            max_factor: 1.25,
            policy: MutationPolicy::default(),
        }
    }
}

impl MutationConfig {
    /// Uniform factor in `[min_factor, max_factor)`
    pub fn factor<R: Rng>(&self, rng: &mut R) -> f32 {
        self.min_factor + rng.gen::<f32>() * (self.max_factor - self.min_factor)
    }
}

/// Settings for an evolutionary search run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EvolutionConfig {
    pub generations: usize,
    pub population_size: usize,
    /// Boids per fitness evaluation
    pub flock_size: usize,
    /// Simulation steps per fitness evaluation
    pub steps: usize,
    pub world_width: f32,
    pub world_height: f32,
    pub mutation: MutationConfig,
    /// Seed for the master generator; drawn from entropy when absent
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            generations: 50,
            population_size: 100,
            flock_size: 50,
            steps: 1000,
            world_width: 1600.0,
            world_height: 900.0,
            mutation: MutationConfig::default(),
            seed: None,
        }
    }
}

impl EvolutionConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
