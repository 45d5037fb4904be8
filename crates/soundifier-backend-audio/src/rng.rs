//! Random sources for voice choice and pitch jitter.
//!
//! Renders are random by default. Passing a seed makes them reproducible:
//! every draw then comes from a PCG32 stream derived from that seed.

use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Creates a PCG32 RNG from a seed.
///
/// # Arguments
/// * `seed` - Seed value; equal seeds yield equal streams
pub fn create_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Creates a PCG32 RNG seeded from operating system entropy.
pub fn entropy_rng() -> Pcg32 {
    Pcg32::from_entropy()
}

/// Creates a seeded RNG when a seed is given, otherwise an entropy-seeded one.
pub fn rng_for(seed: Option<u64>) -> Pcg32 {
    match seed {
        Some(seed) => create_rng(seed),
        None => entropy_rng(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_rng_determinism() {
        let mut rng1 = create_rng(42);
        let mut rng2 = create_rng(42);

        let values1: Vec<f64> = (0..100).map(|_| rng1.gen()).collect();
        let values2: Vec<f64> = (0..100).map(|_| rng2.gen()).collect();

        assert_eq!(values1, values2);
    }

    #[test]
    fn test_different_seeds_produce_different_sequences() {
        let mut rng1 = create_rng(42);
        let mut rng2 = create_rng(43);

        let values1: Vec<f64> = (0..10).map(|_| rng1.gen()).collect();
        let values2: Vec<f64> = (0..10).map(|_| rng2.gen()).collect();

        assert_ne!(values1, values2);
    }

    #[test]
    fn test_rng_for_seed_matches_create_rng() {
        let mut a = rng_for(Some(7));
        let mut b = create_rng(7);
        assert_eq!(a.gen::<u32>(), b.gen::<u32>());
    }
}
