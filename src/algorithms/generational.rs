use crate::allocation::Allocation;
use crate::population::initialize;
use crate::{Candidate, Error, Evaluator, Evolver, Result};
use rand::SeedableRng;
use rand::seq::index;
use rand_pcg::Pcg64; // Specific, serializable generator
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::instrument;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Compare two f64 values, treating NaN as less than all other values.
/// This ensures NaN fitness individuals sort to the end (lowest priority).
fn cmp_f64_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub generations: usize,
    pub pop_size: usize,
    /// `None` seeds from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            generations: 50,
            pop_size: 20,
            seed: None,
        }
    }
}

impl SearchConfig {
    /// Children are bred in pairs from at least two survivors, so the
    /// population must be even and hold four or more allocations.
    pub fn validate(&self) -> Result<()> {
        validate_pop_size(self.pop_size)
    }

    fn rng(&self) -> Pcg64 {
        match self.seed {
            Some(seed) => Pcg64::seed_from_u64(seed),
            None => Pcg64::from_rng(&mut rand::rng()),
        }
    }
}

fn validate_pop_size(pop_size: usize) -> Result<()> {
    if pop_size < 4 || pop_size % 2 != 0 {
        return Err(Error::InvalidPopulationSize(pop_size));
    }
    Ok(())
}

/// Every allocation must carry the same, non-zero number of genes.
fn validate_genes<'a>(mut allocations: impl Iterator<Item = &'a Allocation>) -> Result<()> {
    let Some(first) = allocations.next() else {
        return Err(Error::EmptyPopulation);
    };
    let genes = first.len();
    if genes == 0 {
        return Err(Error::NoEligibleCrops);
    }
    if let Some(bad) = allocations.find(|a| a.len() != genes) {
        return Err(Error::RaggedPopulation {
            expected: genes,
            found: bad.len(),
        });
    }
    Ok(())
}

/// Truncation-selection GA: each generation the better half survives and
/// refills the population with mutated single-point crossover children.
///
/// Deserialization runs the same checks as [`GenerationalSearch::from_rng`],
/// so a tampered checkpoint cannot resume with a broken population.
#[derive(Serialize, Deserialize)]
#[serde(try_from = "RawGenerationalSearch")]
pub struct GenerationalSearch {
    population: Vec<Candidate>,
    pop_size: usize,
    /// Farm size; mutation draws genes from `0..=acres/2`.
    acres: u32,
    generation: usize,
    rng: Pcg64,
}

#[derive(Deserialize)]
struct RawGenerationalSearch {
    population: Vec<Candidate>,
    pop_size: usize,
    acres: u32,
    generation: usize,
    rng: Pcg64,
}

impl TryFrom<RawGenerationalSearch> for GenerationalSearch {
    type Error = Error;

    fn try_from(raw: RawGenerationalSearch) -> Result<Self> {
        validate_pop_size(raw.pop_size)?;
        if raw.population.len() != raw.pop_size {
            return Err(Error::InvalidPopulationSize(raw.population.len()));
        }
        validate_genes(raw.population.iter().map(|c| &c.allocation))?;
        Ok(Self {
            population: raw.population,
            pop_size: raw.pop_size,
            acres: raw.acres,
            generation: raw.generation,
            rng: raw.rng,
        })
    }
}

impl GenerationalSearch {
    pub fn new(initial_pop: Vec<Allocation>, acres: u32, seed: u64) -> Result<Self> {
        Self::from_rng(initial_pop, acres, Pcg64::seed_from_u64(seed))
    }

    pub fn from_rng(initial_pop: Vec<Allocation>, acres: u32, rng: Pcg64) -> Result<Self> {
        let pop_size = initial_pop.len();
        validate_pop_size(pop_size)?;
        validate_genes(initial_pop.iter())?;
        let population = initial_pop
            .into_iter()
            .map(|allocation| Candidate {
                allocation,
                fitness: 0.0,
            })
            .collect();

        Ok(Self {
            population,
            pop_size,
            acres,
            generation: 0,
            rng,
        })
    }

    pub fn pop_size(&self) -> usize {
        self.pop_size
    }

    pub fn acres(&self) -> u32 {
        self.acres
    }

    /// Number of completed generations.
    pub fn generation(&self) -> usize {
        self.generation
    }

    fn evaluate_all<E: Evaluator>(&mut self, evaluator: &E) {
        #[cfg(feature = "parallel")]
        self.population.par_iter_mut().for_each(|c| {
            c.fitness = evaluator.evaluate(&c.allocation);
        });
        #[cfg(not(feature = "parallel"))]
        for c in &mut self.population {
            c.fitness = evaluator.evaluate(&c.allocation);
        }
    }

    /// Scores the current population and returns the fittest candidate.
    /// Ties go to the earliest one.
    pub fn best<E: Evaluator>(&mut self, evaluator: &E) -> Option<Candidate> {
        self.evaluate_all(evaluator);
        let mut best: Option<&Candidate> = None;
        for c in &self.population {
            match best {
                Some(b) if cmp_f64_nan_last(c.fitness, b.fitness) != Ordering::Greater => {}
                _ => best = Some(c),
            }
        }
        best.cloned()
    }
}

impl Evolver for GenerationalSearch {
    fn step<E: Evaluator>(&mut self, evaluator: &E) {
        if self.population.len() < 2 {
            return;
        }

        self.evaluate_all(evaluator);

        // Stable: equal fitness keeps the earlier candidate first
        self.population
            .sort_by(|a, b| cmp_f64_nan_last(b.fitness, a.fitness));

        let survivors = (self.pop_size / 2).clamp(2, self.population.len());
        self.population.truncate(survivors);
        tracing::debug!(
            generation = self.generation,
            best_fitness = self.population[0].fitness,
            "generation evaluated"
        );

        let mut next_gen = Vec::with_capacity(self.pop_size + 1);
        while next_gen.len() < self.pop_size {
            let picks = index::sample(&mut self.rng, survivors, 2);
            let p_a = &self.population[picks.index(0)].allocation;
            let p_b = &self.population[picks.index(1)].allocation;
            let (mut c_a, mut c_b) = p_a.crossover(p_b, &mut self.rng);
            c_a.mutate(&mut self.rng, self.acres);
            c_b.mutate(&mut self.rng, self.acres);
            next_gen.push(Candidate {
                allocation: c_a,
                fitness: 0.0,
            });
            next_gen.push(Candidate {
                allocation: c_b,
                fitness: 0.0,
            });
        }
        next_gen.truncate(self.pop_size);
        self.population = next_gen;
        self.generation += 1;
    }

    fn population(&self) -> &[Candidate] {
        &self.population
    }
}

/// Runs the full fixed schedule and returns the best allocation of the
/// final population.
#[instrument(level = "info", skip(config, evaluator), fields(generations = config.generations, pop_size = config.pop_size, seed = ?config.seed))]
pub fn optimize<E: Evaluator>(
    config: &SearchConfig,
    crop_count: usize,
    acres: u32,
    evaluator: &E,
) -> Result<Candidate> {
    config.validate()?;
    if crop_count == 0 {
        return Err(Error::NoEligibleCrops);
    }

    let mut rng = config.rng();
    let initial_pop = initialize(&mut rng, config.pop_size, crop_count, acres);
    let mut engine = GenerationalSearch::from_rng(initial_pop, acres, rng)?;
    for _ in 0..config.generations {
        engine.step(evaluator);
    }

    let best = engine.best(evaluator).ok_or(Error::EmptyPopulation)?;
    tracing::info!(
        fitness = best.fitness,
        allocation = ?best.allocation.genes(),
        "search finished"
    );
    Ok(best)
}
