//! Kinetic wealth exchange between paired individuals.
//!
//! Each pair pools its wealth and splits the pot by an independent uniform
//! fraction. The pooled total of every pair is conserved.

use rand::Rng;

use crate::pairing::Pairing;

/// Exchange wealth across pair slots.
///
/// `a[k]` and `b[k]` are the wealths of the two members of pair `k`. Returns
/// the post-exchange `(a', b')` where `a'_k = f_k * (a_k + b_k)` and
/// `b'_k = (1 - f_k) * (a_k + b_k)` with `f_k` uniform in `[0, 1)`.
///
/// Panics if the slices differ in length.
pub fn kinetic_exchange<R: Rng + ?Sized>(
    rng: &mut R,
    a: &[f64],
    b: &[f64],
) -> (Vec<f64>, Vec<f64>) {
    assert_eq!(a.len(), b.len(), "exchange sides must have equal length");

    let mut a_new = Vec::with_capacity(a.len());
    let mut b_new = Vec::with_capacity(b.len());
    for (&wa, &wb) in a.iter().zip(b) {
        let fraction: f64 = rng.random();
        let pot = wa + wb;
        a_new.push(fraction * pot);
        b_new.push((1.0 - fraction) * pot);
    }
    (a_new, b_new)
}

/// Gather `values` by the pairing, exchange, and scatter results back to
/// the owning individuals.
pub fn exchange_in_place<R: Rng + ?Sized>(rng: &mut R, values: &mut [f64], pairing: &Pairing) {
    let a: Vec<f64> = pairing.a.iter().map(|&i| values[i]).collect();
    let b: Vec<f64> = pairing.b.iter().map(|&i| values[i]).collect();

    let (a_new, b_new) = kinetic_exchange(rng, &a, &b);

    for (&i, v) in pairing.a.iter().zip(a_new) {
        values[i] = v;
    }
    for (&i, v) in pairing.b.iter().zip(b_new) {
        values[i] = v;
    }
}
