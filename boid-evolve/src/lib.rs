//! Genetic search for boid coefficients that make a flock fly fast.

mod error;
pub mod fitness;
pub mod optimizer;

pub use error::EvolveError;
pub use fitness::{Fitness, FlockSpeed};
pub use optimizer::{evolve, rank, Evolution, GenerationReport, Optimizer};
