//! Random pairing of individuals for kinetic exchange.
//!
//! Every timestep draws a fresh partition of the population into disjoint
//! pairs. Nothing about who traded with whom survives between calls.

use rand::Rng;
use rand::seq::SliceRandom;

/// Two index arrays of equal length; `a[k]` trades with `b[k]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    pub a: Vec<usize>,
    pub b: Vec<usize>,
}

impl Pairing {
    /// Number of pairs (N / 2).
    pub fn len(&self) -> usize {
        self.a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }

    /// Iterate over `(a_k, b_k)` index pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.a.iter().copied().zip(self.b.iter().copied())
    }
}

/// Partition `0..n` into `n / 2` uniformly random unordered pairs.
///
/// Panics if `n` is odd: an unpaired individual is a caller bug, not a
/// recoverable condition.
pub fn random_pairing<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Pairing {
    assert!(n % 2 == 0, "individual count must be even, got {n}");

    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);
    let b = order.split_off(n / 2);

    Pairing { a: order, b }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_pairing_covers_every_index_once() {
        let mut rng = StdRng::seed_from_u64(7);

        for n in [2, 4, 10, 100, 1000] {
            for _ in 0..20 {
                let pairing = random_pairing(&mut rng, n);
                assert_eq!(pairing.a.len(), n / 2);
                assert_eq!(pairing.b.len(), n / 2);

                let mut seen = vec![false; n];
                for idx in pairing.a.iter().chain(pairing.b.iter()) {
                    assert!(!seen[*idx], "index {} appears twice (n = {})", idx, n);
                    seen[*idx] = true;
                }
                assert!(seen.iter().all(|s| *s), "pairing missed an index (n = {})", n);
            }
        }
    }

    #[test]
    fn test_pairing_is_fresh_each_call() {
        let mut rng = StdRng::seed_from_u64(11);
        let first = random_pairing(&mut rng, 64);
        let second = random_pairing(&mut rng, 64);
        // 32! orderings; a repeat here means the generator is not advancing
        assert_ne!(first, second);
    }

    #[test]
    fn test_empty_population() {
        let mut rng = StdRng::seed_from_u64(0);
        let pairing = random_pairing(&mut rng, 0);
        assert!(pairing.is_empty());
        assert_eq!(pairing.iter().count(), 0);
    }

    #[test]
    #[should_panic(expected = "must be even")]
    fn test_odd_count_panics() {
        let mut rng = StdRng::seed_from_u64(0);
        let _ = random_pairing(&mut rng, 5);
    }
}
