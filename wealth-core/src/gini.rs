//! Gini coefficient of a wealth snapshot.

/// Gini coefficient of `wealth`.
///
/// Sorts a copy ascending and applies the rank form
/// `G = 2 * sum(i * w_i) / (N * sum(w)) - (1 + 1/N)` with ranks `i = 1..=N`.
///
/// Entries are expected to be non-negative with a positive sum. A zero sum
/// yields NaN. Very small `N` gives values with no useful meaning (`N = 1`
/// always returns 0). Neither case is guarded.
pub fn gini(wealth: &[f64]) -> f64 {
    let n = wealth.len() as f64;

    let mut sorted = wealth.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut weighted = 0.0;
    let mut total = 0.0;
    for (rank, w) in sorted.iter().enumerate() {
        weighted += (rank + 1) as f64 * w;
        total += w;
    }

    2.0 * (weighted / (n * total)) - (1.0 + 1.0 / n)
}
