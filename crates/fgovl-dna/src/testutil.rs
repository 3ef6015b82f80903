//! Seeded random sequences for tests.

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use crate::UPPER_BASES;

/// Generates an uppercase DNA sequence of `len` bases.
///
/// The same `seed` always yields the same sequence.
#[must_use]
pub fn random_sequence(len: usize, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| char::from(UPPER_BASES[rng.random_range(0..4)])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_sequence_is_seeded() {
        let seq = random_sequence(500, 42);
        assert_eq!(seq.len(), 500);
        assert!(seq.bytes().all(|b| UPPER_BASES.contains(&b)));
        assert_eq!(seq, random_sequence(500, 42));
        assert_ne!(seq, random_sequence(500, 43));
    }
}
