//! One simulation timestep.
//!
//! Sequence:
//! 1. Capital return: every wealth grows by `1 + r`
//! 2. Pairing: fresh random partition of the population
//! 3. Exchange: kinetic exchange within each pair
//! 4. Income: each individual adds its fixed income
//! 5. Normalization: rescale so mean wealth is exactly 1.0

use rand::Rng;

use crate::exchange::exchange_in_place;
use crate::pairing::random_pairing;

/// Advance `wealth` by one timestep in place.
///
/// `incomes` is read-only and must match `wealth` in length. The length check
/// runs before any mutation. An odd population panics inside pairing after
/// the capital return has already been applied.
///
/// A zero total before normalization (only reachable with `r = -1` and no
/// income) divides by zero and leaves the vector non-finite.
pub fn timestep<R: Rng + ?Sized>(
    rng: &mut R,
    wealth: &mut [f64],
    incomes: &[f64],
    return_on_capital: f64,
) {
    assert_eq!(
        wealth.len(),
        incomes.len(),
        "wealth and income vectors must have equal length"
    );

    // 1. CAPITAL RETURN
    let growth = 1.0 + return_on_capital;
    for w in wealth.iter_mut() {
        *w *= growth;
    }

    // 2-3. PAIRING + EXCHANGE
    let pairing = random_pairing(rng, wealth.len());
    exchange_in_place(rng, wealth, &pairing);

    // 4. INCOME
    for (w, income) in wealth.iter_mut().zip(incomes) {
        *w += income;
    }

    // 5. NORMALIZATION
    let total: f64 = wealth.iter().sum();
    let scale = wealth.len() as f64 / total;
    for w in wealth.iter_mut() {
        *w *= scale;
    }

    #[cfg(feature = "instrument")]
    tracing::trace!(
        target: "timestep",
        individuals = wealth.len() as u64,
        total = total,
        scale = scale,
    );
}
