use rand::Rng;
use serde::{Deserialize, Serialize};

/// Whole acres assigned to each eligible crop, in eligible-crop order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Allocation(pub Vec<u32>);

/// Largest value a single gene may take when a farm has `acres` acres.
pub fn gene_max(acres: u32) -> u32 {
    acres / 2
}

impl Allocation {
    /// Every gene drawn uniformly from `0..=acres/2`.
    pub fn random<R: Rng>(rng: &mut R, len: usize, acres: u32) -> Self {
        let max = gene_max(acres);
        Allocation((0..len).map(|_| rng.random_range(0..=max)).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn genes(&self) -> &[u32] {
        &self.0
    }

    pub fn total_acres(&self) -> u64 {
        self.0.iter().map(|&a| a as u64).sum()
    }

    /// Single-point crossover: heads before `point` are kept, tails swapped.
    pub fn crossover_at(&self, other: &Self, point: usize) -> (Self, Self) {
        let point = point.min(self.0.len()).min(other.0.len());
        let mut first = self.0[..point].to_vec();
        first.extend_from_slice(&other.0[point..]);
        let mut second = other.0[..point].to_vec();
        second.extend_from_slice(&self.0[point..]);
        (Allocation(first), Allocation(second))
    }

    /// Crossover at a cut drawn from `1..len`. With fewer than two genes
    /// there is no cut that takes material from both parents, so the
    /// parents are returned unchanged.
    pub fn crossover<R: Rng>(&self, other: &Self, rng: &mut R) -> (Self, Self) {
        let len = self.0.len().min(other.0.len());
        if len < 2 {
            return (self.clone(), other.clone());
        }
        let point = rng.random_range(1..len);
        self.crossover_at(other, point)
    }

    /// Replaces one uniformly chosen gene with a fresh value in
    /// `0..=acres/2`. Returns the mutated index.
    pub fn mutate<R: Rng>(&mut self, rng: &mut R, acres: u32) -> Option<usize> {
        if self.0.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.0.len());
        self.0[index] = rng.random_range(0..=gene_max(acres));
        Some(index)
    }
}
