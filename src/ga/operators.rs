//! Permutation operators for giant tours.
//!
//! Giant tours hold customer node indices, which are not a dense `0..n`
//! range (the depot and charging stations sit in the same node table), so
//! the crossover bookkeeping is sized by the largest index present.
//!
//! # Crossover
//!
//! - [`order_crossover`] (OX): Davis (1985), preserves relative order
//!
//! # Mutation
//!
//! - [`swap_mutation`]: exchange two random positions, O(1)
//! - [`insert_mutation`]: remove and reinsert at a random position, O(n)
//! - [`invert_mutation`]: reverse a random segment, O(n)
//!
//! [`Mutation::apply`] draws one of the three uniformly.

use rand::Rng;

/// Order Crossover (OX) for permutations of arbitrary distinct indices.
///
/// 1. Select a random segment `[start, end]`
/// 2. Copy the segment from the template parent to the same positions
/// 3. Fill the remaining positions from the donor parent, in its order
///    starting after `end`, skipping elements already copied
///
/// Parents shorter than two elements are returned unchanged.
///
/// # Examples
///
/// ```
/// use evrp_search::ga::order_crossover;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let (a, b) = order_crossover(&[3, 5, 9, 4], &[9, 4, 5, 3], &mut rng);
/// let mut sorted = a.clone();
/// sorted.sort();
/// assert_eq!(sorted, vec![3, 4, 5, 9]);
/// assert_eq!(b.len(), 4);
/// ```
///
/// # Panics
/// Panics if the parents have different lengths.
pub fn order_crossover<R: Rng>(
    parent1: &[usize],
    parent2: &[usize],
    rng: &mut R,
) -> (Vec<usize>, Vec<usize>) {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");

    if n < 2 {
        return (parent1.to_vec(), parent2.to_vec());
    }

    let (start, end) = random_segment(n, rng);
    let universe = parent1.iter().copied().max().map_or(0, |m| m + 1);

    (
        ox_build_child(parent1, parent2, start, end, universe),
        ox_build_child(parent2, parent1, start, end, universe),
    )
}

fn ox_build_child(
    template: &[usize],
    donor: &[usize],
    start: usize,
    end: usize,
    universe: usize,
) -> Vec<usize> {
    let n = template.len();
    let mut child = vec![usize::MAX; n];
    let mut in_segment = vec![false; universe];

    for i in start..=end {
        child[i] = template[i];
        in_segment[template[i]] = true;
    }

    let mut pos = (end + 1) % n;
    for offset in 0..n {
        let val = donor[(end + 1 + offset) % n];
        if !in_segment[val] {
            child[pos] = val;
            pos = (pos + 1) % n;
        }
    }

    child
}

/// Swap mutation: exchange two random positions.
pub fn swap_mutation<R: Rng>(perm: &mut [usize], rng: &mut R) {
    let n = perm.len();
    if n < 2 {
        return;
    }
    let i = rng.random_range(0..n);
    let j = rng.random_range(0..n);
    perm.swap(i, j);
}

/// Insert mutation: remove an element and reinsert it at a random position.
pub fn insert_mutation<R: Rng>(perm: &mut Vec<usize>, rng: &mut R) {
    let n = perm.len();
    if n < 2 {
        return;
    }
    let from = rng.random_range(0..n);
    let item = perm.remove(from);
    let to = rng.random_range(0..n);
    perm.insert(to, item);
}

/// Invert mutation: reverse a random segment.
pub fn invert_mutation<R: Rng>(perm: &mut [usize], rng: &mut R) {
    let n = perm.len();
    if n < 2 {
        return;
    }
    let (start, end) = random_segment(n, rng);
    perm[start..=end].reverse();
}

/// The mutation moves available to the hybrid search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Swap,
    Invert,
    Insert,
}

impl Mutation {
    pub const ALL: [Mutation; 3] = [Mutation::Swap, Mutation::Invert, Mutation::Insert];

    /// Applies one uniformly drawn mutation and returns which one ran.
    pub fn apply<R: Rng>(perm: &mut Vec<usize>, rng: &mut R) -> Mutation {
        let kind = Self::ALL[rng.random_range(0..Self::ALL.len())];
        match kind {
            Mutation::Swap => swap_mutation(perm, rng),
            Mutation::Invert => invert_mutation(perm, rng),
            Mutation::Insert => insert_mutation(perm, rng),
        }
        kind
    }
}

/// Pick a random segment `[start, end]` within `0..n` where `start <= end`.
fn random_segment<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
