//! Per-individual income generation.

use rand::Rng;

use crate::exchange::exchange_in_place;
use crate::pairing::random_pairing;

/// Build an income vector of `n` entries with mean `growth`.
///
/// Starts from a flat `growth` for everyone and runs a single kinetic
/// exchange pass over a random pairing, so incomes become unequal while the
/// total stays `n * growth`.
pub fn income_distribution<R: Rng + ?Sized>(rng: &mut R, n: usize, growth: f64) -> Vec<f64> {
    let mut incomes = vec![growth; n];
    let pairing = random_pairing(rng, n);
    exchange_in_place(rng, &mut incomes, &pairing);
    incomes
}
