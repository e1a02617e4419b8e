//! Giant tour chromosome for EVRP genetic algorithms.
//!
//! A giant tour encodes a solution as a single permutation of all customer
//! node indices, with no depot or charging stations. Decoding splits the
//! permutation into capacity-feasible vehicle tours and inserts the charging
//! stations each tour needs.
//!
//! # Reference
//!
//! Prins, C. (2004). "A simple and effective evolutionary algorithm for the
//! vehicle routing problem", *Computers & Operations Research* 31(12), 1985-2002.

use std::cmp::Ordering;

/// A giant tour: a permutation of customer node indices.
///
/// Fitness is the decoded solution's distance plus the weighted violation
/// penalty. Lower is better; feasible individuals always rank ahead of
/// infeasible ones.
///
/// # Examples
///
/// ```
/// use evrp_search::ga::GiantTour;
///
/// let tour = GiantTour::new(vec![3, 1, 2]);
/// assert_eq!(tour.customers(), &[3, 1, 2]);
/// assert_eq!(tour.fitness(), f64::INFINITY);
/// assert!(!tour.is_feasible());
/// ```
#[derive(Debug, Clone)]
pub struct GiantTour {
    customers: Vec<usize>,
    fitness: f64,
    feasible: bool,
}

impl GiantTour {
    /// Creates an unevaluated giant tour from a customer permutation.
    pub fn new(customers: Vec<usize>) -> Self {
        Self {
            customers,
            fitness: f64::INFINITY,
            feasible: false,
        }
    }

    pub fn customers(&self) -> &[usize] {
        &self.customers
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn is_feasible(&self) -> bool {
        self.feasible
    }

    /// Records the result of decoding and evaluating this tour.
    pub fn set_evaluation(&mut self, fitness: f64, feasible: bool) {
        self.fitness = fitness;
        self.feasible = feasible;
    }

    /// Orders individuals best first: feasible before infeasible, then by
    /// ascending fitness.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .feasible
            .cmp(&self.feasible)
            .then_with(|| self.fitness.total_cmp(&other.fitness))
    }
}
