use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EvolveError {
    #[error("population of {0} cannot be split into elites and offspring, at least 2 are needed")]
    PopulationTooSmall(usize),
    #[error("world must have a positive size, got {width}x{height}")]
    EmptyWorld { width: f32, height: f32 },
}
