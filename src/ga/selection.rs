//! Parent selection.

use rand::Rng;

use super::chromosome::GiantTour;

/// Tournament selection: draws `k` individuals with replacement and returns
/// the index of the best-ranked one.
///
/// # Panics
/// Panics if `population` is empty.
pub fn tournament<R: Rng>(population: &[GiantTour], k: usize, rng: &mut R) -> usize {
    assert!(
        !population.is_empty(),
        "cannot select from empty population"
    );
    let k = k.max(1);
    let n = population.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if population[idx].rank_cmp(&population[best_idx]).is_lt() {
            best_idx = idx;
        }
    }
    best_idx
}
