//! Generic genetic algorithm framework.
//!
//! The evolutionary loop is domain-agnostic: a [`GaProblem`] supplies the
//! individual construction, crossover, mutation, and evaluation operators,
//! and the [`GaRunner`] drives selection, elitism, and generation bookkeeping.
//! Operators live on the problem rather than the individual because they
//! need problem context (the room bounds) that a bare chromosome does not
//! carry.
//!
//! The runner owns its RNG, seeded from [`GaConfig::seed`]; no global random
//! state is touched, so a fixed seed reproduces a run bit for bit.

use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Configuration for the genetic algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaConfig {
    /// Population size (>= 2).
    pub population_size: usize,
    /// Number of generations to run. Fixed budget, no early convergence stop.
    pub max_generations: u32,
    /// Probability that a mating pair produces a crossover child.
    pub crossover_rate: f64,
    /// Per-gene mutation probability.
    pub mutation_rate: f64,
    /// Tournament size for selection (1 <= k <= population size).
    pub tournament_size: usize,
    /// Random seed for reproducible runs.
    pub seed: u64,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: 100,
            crossover_rate: 0.85,
            mutation_rate: 0.2,
            tournament_size: 3,
            seed: 0,
        }
    }
}

impl GaConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the generation count.
    pub fn with_max_generations(mut self, generations: u32) -> Self {
        self.max_generations = generations;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validates the configuration. Fails fast before any generation runs.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(Error::InvalidConfiguration(format!(
                "population size must be >= 2, got {}",
                self.population_size
            )));
        }
        if self.max_generations < 1 {
            return Err(Error::InvalidConfiguration(
                "generation count must be >= 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(Error::InvalidConfiguration(format!(
                "crossover rate must be in [0, 1], got {}",
                self.crossover_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(Error::InvalidConfiguration(format!(
                "mutation rate must be in [0, 1], got {}",
                self.mutation_rate
            )));
        }
        if self.tournament_size < 1 || self.tournament_size > self.population_size {
            return Err(Error::InvalidConfiguration(format!(
                "tournament size must be in [1, {}], got {}",
                self.population_size, self.tournament_size
            )));
        }
        Ok(())
    }
}

/// Trait for individuals in the genetic algorithm.
pub trait Individual: Clone + Send + Sync {
    /// Fitness of this individual, higher is better. `NEG_INFINITY` until
    /// evaluated.
    fn fitness(&self) -> f64;

    /// Secondary comparison key for deterministic tie-breaking, higher is
    /// preferred. Defaults to no preference.
    fn tie_breaker(&self) -> f64 {
        0.0
    }
}

/// Trait for problem-specific GA operators.
pub trait GaProblem: Send + Sync {
    /// The individual type for this problem.
    type Individual: Individual;

    /// Creates a random individual.
    fn random_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;

    /// Produces one offspring from two parents.
    fn crossover<R: Rng>(
        &self,
        a: &Self::Individual,
        b: &Self::Individual,
        rng: &mut R,
    ) -> Self::Individual;

    /// Mutates an individual in place. Per-gene gating happens inside.
    fn mutate<R: Rng>(&self, individual: &mut Self::Individual, rng: &mut R);

    /// Evaluates the fitness of one individual.
    fn evaluate(&self, individual: &mut Self::Individual);

    /// Evaluates a whole population. Default runs in parallel; evaluation is
    /// pure per individual, so order does not affect results.
    fn evaluate_population(&self, individuals: &mut [Self::Individual]) {
        individuals.par_iter_mut().for_each(|ind| self.evaluate(ind));
    }

    /// Called after each generation, for progress reporting.
    fn on_generation(&self, _generation: u32, _best: &Self::Individual) {}
}

/// Best and average fitness of one generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Best fitness in the generation's population.
    pub best: f64,
    /// Average fitness of the generation's population.
    pub avg: f64,
}

/// Result of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// Deep copy of the best individual ever seen.
    pub best: I,
    /// Generations actually executed.
    pub generations: u32,
    /// Total elapsed time.
    pub elapsed: Duration,
    /// Per-generation best/average fitness, in generation order.
    pub history: Vec<GenerationStats>,
    /// Whether the run was cancelled before the configured budget.
    pub cancelled: bool,
}

/// Returns true if `a` ranks strictly above `b`.
///
/// Exact fitness ties fall through to the tie-breaker so selection stays
/// deterministic under a fixed seed.
fn ranks_above<I: Individual>(a: &I, b: &I) -> bool {
    a.fitness() > b.fitness()
        || (a.fitness() == b.fitness() && a.tie_breaker() > b.tie_breaker())
}

/// Genetic algorithm runner.
pub struct GaRunner<P: GaProblem> {
    config: GaConfig,
    problem: P,
    cancelled: Arc<AtomicBool>,
}

impl<P: GaProblem> GaRunner<P> {
    /// Creates a new runner. The configuration must already be validated.
    pub fn new(config: GaConfig, problem: P) -> Self {
        Self::with_cancel(config, problem, Arc::new(AtomicBool::new(false)))
    }

    /// Creates a runner sharing an external cancellation flag.
    pub fn with_cancel(config: GaConfig, problem: P, cancelled: Arc<AtomicBool>) -> Self {
        Self {
            config,
            problem,
            cancelled,
        }
    }

    /// Returns a handle that cancels the run at the next generation boundary.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    /// Returns the problem.
    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// Runs the genetic algorithm to its configured generation budget.
    pub fn run(&self) -> GaResult<P::Individual> {
        let start = Instant::now();
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let pop_size = self.config.population_size;

        let mut population: Vec<P::Individual> = (0..pop_size)
            .map(|_| self.problem.random_individual(&mut rng))
            .collect();
        self.problem.evaluate_population(&mut population);

        let mut best_ever = population[best_index(&population)].clone();
        let mut history = Vec::with_capacity(self.config.max_generations as usize);
        let mut generation = 0u32;

        while generation < self.config.max_generations {
            if self.cancelled.load(Ordering::Relaxed) {
                break;
            }

            let elite = population[best_index(&population)].clone();

            let mut offspring: Vec<P::Individual> = Vec::with_capacity(pop_size);
            for _ in 0..pop_size {
                let parent_a = self.tournament_select(&population, &mut rng);
                let parent_b = self.tournament_select(&population, &mut rng);

                let mut child = if rng.gen::<f64>() < self.config.crossover_rate {
                    self.problem.crossover(parent_a, parent_b, &mut rng)
                } else {
                    parent_a.clone()
                };

                self.problem.mutate(&mut child, &mut rng);
                offspring.push(child);
            }

            self.problem.evaluate_population(&mut offspring);

            // Elitism: the previous generation's best replaces the worst
            // offspring, so the best fitness never regresses.
            let worst = worst_index(&offspring);
            offspring[worst] = elite;

            let gen_best = &offspring[best_index(&offspring)];
            if ranks_above(gen_best, &best_ever) {
                best_ever = gen_best.clone();
            }

            let avg = offspring.iter().map(|i| i.fitness()).sum::<f64>() / pop_size as f64;
            history.push(GenerationStats {
                best: gen_best.fitness(),
                avg,
            });

            self.problem.on_generation(generation, &best_ever);

            population = offspring;
            generation += 1;
        }

        GaResult {
            best: best_ever,
            generations: generation,
            elapsed: start.elapsed(),
            history,
            cancelled: self.cancelled.load(Ordering::Relaxed),
        }
    }

    /// Tournament selection: sample `k` distinct individuals, keep the one
    /// that ranks highest.
    fn tournament_select<'a, R: Rng>(
        &self,
        population: &'a [P::Individual],
        rng: &mut R,
    ) -> &'a P::Individual {
        let picks = rand::seq::index::sample(rng, population.len(), self.config.tournament_size);

        let mut winner = picks.index(0);
        for idx in picks.iter().skip(1) {
            if ranks_above(&population[idx], &population[winner]) {
                winner = idx;
            }
        }
        &population[winner]
    }
}

fn best_index<I: Individual>(population: &[I]) -> usize {
    let mut best = 0;
    for i in 1..population.len() {
        if ranks_above(&population[i], &population[best]) {
            best = i;
        }
    }
    best
}

fn worst_index<I: Individual>(population: &[I]) -> usize {
    let mut worst = 0;
    for i in 1..population.len() {
        if ranks_above(&population[worst], &population[i]) {
            worst = i;
        }
    }
    worst
}
