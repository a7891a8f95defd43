//! Elitist genetic search over [`BoidParams`].
//!
//! Every generation the population is scored, sorted best first, the top half is kept verbatim
//! and the bottom half is refilled with averaged children of random elites.

use crate::{EvolveError, Fitness, FlockSpeed};
use boid_shared::{BoidParams, EvolutionConfig};
use log::{debug, info, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Sort genomes best first. NaN fitness ranks below everything else.
pub fn rank(population: &[BoidParams], fitnesses: &[f32]) -> Vec<(BoidParams, f32)> {
    let mut ranked: Vec<(BoidParams, f32)> = population
        .iter()
        .zip(fitnesses)
        .map(|(params, fitness)| {
            let fitness = if fitness.is_nan() {
                warn!("NaN fitness for {params}, ranking it last");
                f32::NEG_INFINITY
            } else {
                *fitness
            };
            (*params, fitness)
        })
        .collect();
    ranked.sort_by(|(_, a), (_, b)| b.total_cmp(a));
    ranked
}

/// The scored, sorted population of one generation
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub generation: usize,
    pub ranked: Vec<(BoidParams, f32)>,
}

impl GenerationReport {
    pub fn best(&self) -> Option<&(BoidParams, f32)> {
        self.ranked.first()
    }

    pub fn best_fitness(&self) -> Option<f32> {
        self.best().map(|(_, fitness)| *fitness)
    }

    pub fn fitnesses(&self) -> impl Iterator<Item = f32> + '_ {
        self.ranked.iter().map(|(_, fitness)| *fitness)
    }
}

/// Outcome of a full run
#[derive(Debug, Clone)]
pub struct Evolution {
    /// Population after the last generation, elites first
    pub population: Vec<BoidParams>,
    pub history: Vec<GenerationReport>,
}

impl Evolution {
    pub fn best(&self) -> Option<&BoidParams> {
        self.population.first()
    }
}

pub struct Optimizer<F: Fitness> {
    config: EvolutionConfig,
    fitness: F,
    rng: StdRng,
}

impl Optimizer<FlockSpeed> {
    /// Optimizer scoring genomes with the flock simulation described by `config`
    pub fn flock_speed(config: EvolutionConfig) -> Result<Self, EvolveError> {
        let fitness = FlockSpeed::from_config(&config);
        Self::new(config, fitness)
    }
}

impl<F: Fitness + Sync> Optimizer<F> {
    pub fn new(config: EvolutionConfig, fitness: F) -> Result<Self, EvolveError> {
        if config.population_size < 2 {
            return Err(EvolveError::PopulationTooSmall(config.population_size));
        }
        if !(config.world_width > 0.0 && config.world_height > 0.0) {
            return Err(EvolveError::EmptyWorld {
                width: config.world_width,
                height: config.world_height,
            });
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            config,
            fitness,
            rng,
        })
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn initial_population(&mut self) -> Vec<BoidParams> {
        (0..self.config.population_size)
            .map(|_| BoidParams::random(&mut self.rng))
            .collect()
    }

    /// Fitness of every genome. Each evaluation runs on its own generator seeded from the master
    /// generator up front, so the values do not depend on evaluation order.
    pub fn score(&mut self, population: &[BoidParams]) -> Vec<f32> {
        let seeds: Vec<u64> = population.iter().map(|_| self.rng.gen()).collect();
        let fitness = &self.fitness;
        let eval = |(params, seed): (&BoidParams, &u64)| {
            fitness.evaluate(params, &mut StdRng::seed_from_u64(*seed))
        };

        #[cfg(feature = "parallel")]
        let scores = population.par_iter().zip(seeds.par_iter()).map(eval).collect();
        #[cfg(not(feature = "parallel"))]
        let scores = population.iter().zip(seeds.iter()).map(eval).collect();

        scores
    }

    /// Keep the top half of `ranked` and refill the rest with children of two random elites
    pub fn breed(&mut self, ranked: &[(BoidParams, f32)], generation: usize) -> Vec<BoidParams> {
        let elites = ranked.len() / 2;
        let mut next: Vec<BoidParams> = ranked[..elites].iter().map(|(p, _)| *p).collect();
        if elites == 0 {
            return next;
        }

        for slot in elites..ranked.len() {
            let (left, _) = &ranked[self.rng.gen_range(0..elites)];
            let (right, _) = &ranked[self.rng.gen_range(0..elites)];
            let mut child = left.crossover(right);
            let mutated = child.mutate(&self.config.mutation, &mut self.rng);
            debug!("generation {generation}, child {slot} ({mutated} mutated): {child}");
            next.push(child);
        }

        next
    }

    /// Score, rank and breed one generation
    pub fn generation(
        &mut self,
        population: &[BoidParams],
        generation: usize,
    ) -> (GenerationReport, Vec<BoidParams>) {
        let fitnesses = self.score(population);
        let ranked = rank(population, &fitnesses);
        let next = self.breed(&ranked, generation);

        let report = GenerationReport { generation, ranked };
        if let Some((best, fitness)) = report.best() {
            info!("best fitness in generation {generation}: {fitness:.4} ({best})");
        }

        (report, next)
    }

    pub fn run(&mut self) -> Evolution {
        info!(
            "evolving {} genomes for {} generations",
            self.config.population_size, self.config.generations
        );

        let mut population = self.initial_population();
        let mut history = Vec::with_capacity(self.config.generations);
        for generation in 0..self.config.generations {
            let (report, next) = self.generation(&population, generation);
            history.push(report);
            population = next;
        }

        Evolution {
            population,
            history,
        }
    }
}

/// Run the flock-speed search with default settings and return the fittest genome
pub fn evolve(generations: usize, population_size: usize) -> Result<BoidParams, EvolveError> {
    let config = EvolutionConfig {
        generations,
        population_size,
        ..EvolutionConfig::default()
    };
    let evolution = Optimizer::flock_speed(config)?.run();
    evolution
        .best()
        .copied()
        .ok_or(EvolveError::PopulationTooSmall(population_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use boid_shared::{MutationConfig, MutationPolicy};

    fn by_max_speed(params: &BoidParams) -> f32 {
        params.max_speed
    }

    fn config(population_size: usize) -> EvolutionConfig {
        EvolutionConfig {
            generations: 3,
            population_size,
            seed: Some(17),
            ..EvolutionConfig::default()
        }
    }

    #[test]
    fn test_rank_descending() {
        let population: Vec<BoidParams> = (0..5)
            .map(|i| BoidParams {
                max_speed: i as f32,
                ..BoidParams::default()
            })
            .collect();
        let ranked = rank(&population, &[0.3, 2.0, f32::NAN, 1.5, -1.0]);

        let order: Vec<f32> = ranked.iter().map(|(p, _)| p.max_speed).collect();
        assert_eq!(order, vec![1.0, 3.0, 0.0, 4.0, 2.0]);
        assert_eq!(ranked[4].1, f32::NEG_INFINITY);
    }

    #[test]
    fn test_rank_keeps_infinities() {
        let population = vec![BoidParams::default(); 3];
        let ranked = rank(&population, &[f32::NEG_INFINITY, 1.0, f32::INFINITY]);
        let fitnesses: Vec<f32> = ranked.iter().map(|(_, f)| *f).collect();
        assert_eq!(fitnesses, vec![f32::INFINITY, 1.0, f32::NEG_INFINITY]);
    }

    #[test]
    fn test_population_too_small() {
        for size in [0, 1] {
            let err = Optimizer::new(config(size), by_max_speed).err();
            assert_eq!(err, Some(EvolveError::PopulationTooSmall(size)));
        }
        assert!(Optimizer::new(config(2), by_max_speed).is_ok());
    }

    #[test]
    fn test_empty_world() {
        let config = EvolutionConfig {
            world_width: 0.0,
            ..config(4)
        };
        assert!(matches!(
            Optimizer::flock_speed(config),
            Err(EvolveError::EmptyWorld { .. })
        ));
    }

    #[test]
    fn test_ranked_generation_is_monotonic() {
        let mut optimizer = Optimizer::new(config(30), by_max_speed).unwrap();
        let evolution = optimizer.run();

        assert_eq!(evolution.history.len(), 3);
        for report in &evolution.history {
            let fitnesses: Vec<f32> = report.fitnesses().collect();
            assert!(fitnesses.windows(2).all(|w| w[0] >= w[1]));
        }
    }

    #[test]
    fn test_elites_survive_verbatim() {
        let mut optimizer = Optimizer::new(config(9), by_max_speed).unwrap();
        let population = optimizer.initial_population();

        let (report, next) = optimizer.generation(&population, 0);
        assert_eq!(next.len(), 9);
        for (idx, (elite, _)) in report.ranked.iter().take(4).enumerate() {
            assert_eq!(next[idx], *elite);
        }

        let (second, _) = optimizer.generation(&next, 1);
        for (elite, _) in report.ranked.iter().take(4) {
            assert!(second.ranked.iter().any(|(p, _)| p == elite));
        }
    }

    #[test]
    fn test_children_average_elites() {
        let mut cfg = config(6);
        cfg.mutation = MutationConfig {
            rate: 0.0,
            ..MutationConfig::default()
        };
        let mut optimizer = Optimizer::new(cfg, by_max_speed).unwrap();
        let population = optimizer.initial_population();
        let (report, next) = optimizer.generation(&population, 0);

        let elites: Vec<BoidParams> = report.ranked.iter().take(3).map(|(p, _)| *p).collect();
        for child in &next[3..] {
            let found = elites
                .iter()
                .any(|a| elites.iter().any(|b| a.crossover(b) == *child));
            assert!(found, "{child} is not a midpoint of two elites");
        }
    }

    #[test]
    fn test_fitness_never_regresses_with_elitism() {
        let mut optimizer = Optimizer::new(config(20), by_max_speed).unwrap();
        let evolution = optimizer.run();
        let best: Vec<f32> = evolution
            .history
            .iter()
            .filter_map(GenerationReport::best_fitness)
            .collect();
        assert!(best.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_zero_generations_returns_initial() {
        let cfg = EvolutionConfig {
            generations: 0,
            ..config(4)
        };
        let mut optimizer = Optimizer::new(cfg.clone(), by_max_speed).unwrap();
        let evolution = optimizer.run();
        assert!(evolution.history.is_empty());

        let mut fresh = Optimizer::new(cfg, by_max_speed).unwrap();
        assert_eq!(evolution.population, fresh.initial_population());
    }

    #[test]
    fn test_separation_only_policy() {
        let mut cfg = config(4);
        cfg.mutation = MutationConfig {
            rate: 1.0,
            policy: MutationPolicy::SeparationOnly,
            ..MutationConfig::default()
        };
        let mut optimizer = Optimizer::new(cfg, by_max_speed).unwrap();
        let population = optimizer.initial_population();
        let (report, next) = optimizer.generation(&population, 0);

        let elites: Vec<BoidParams> = report.ranked.iter().take(2).map(|(p, _)| *p).collect();
        for child in &next[2..] {
            let parent_mean = elites
                .iter()
                .flat_map(|a| elites.iter().map(move |b| a.crossover(b)))
                .find(|mean| mean.to_array()[1..] == child.to_array()[1..]);
            assert!(parent_mean.is_some());
        }
    }
}
