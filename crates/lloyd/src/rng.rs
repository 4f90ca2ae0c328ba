use crate::VectorSet;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

// pi * 100_000
const RANDOM_SEED: u64 = 314159;

pub fn new() -> Xoshiro256PlusPlus {
    Xoshiro256PlusPlus::seed_from_u64(RANDOM_SEED)
}

/// `n` points dealt round-robin over `centers`, each coordinate jittered by up to `noise / 2`.
pub fn clustered(rng: &mut impl Rng, centers: &[&[f64]], n: usize, noise: f64) -> VectorSet {
    let rows: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            centers[i % centers.len()]
                .iter()
                .map(|c| c + (rng.random::<f64>() - 0.5) * noise)
                .collect()
        })
        .collect();
    VectorSet::from_rows(rows).unwrap()
}
