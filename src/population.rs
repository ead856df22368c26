use crate::allocation::Allocation;
use rand::Rng;

/// Generation zero: `pop_size` allocations of `crop_count` genes, each gene
/// uniform in `0..=acres/2`.
pub fn initialize<R: Rng>(
    rng: &mut R,
    pop_size: usize,
    crop_count: usize,
    acres: u32,
) -> Vec<Allocation> {
    (0..pop_size)
        .map(|_| Allocation::random(rng, crop_count, acres))
        .collect()
}
