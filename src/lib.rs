//! Profit-maximising acreage allocation across eligible crops, searched with
//! a generational genetic algorithm under a budget penalty and a crop
//! diversity bonus.

use serde::{Deserialize, Serialize};

pub use allocation::Allocation;
pub use error::{Error, Result};

/// An allocation together with the fitness it scored in its generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub allocation: Allocation,
    pub fitness: f64,
}

/// A trait for systems that can score an allocation.
/// Higher is better; scores may be negative.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, allocation: &Allocation) -> f64;
}

/// The master engine trait.
pub trait Evolver {
    fn step<E: Evaluator>(&mut self, evaluator: &E);
    fn population(&self) -> &[Candidate];
}

pub mod algorithms {
    pub mod generational;
}
pub mod allocation;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod fitness;
pub mod history;
pub mod model;
pub mod population;
pub mod pricing;
pub mod recommend;
