//! Solution and violation types.

use serde::{Deserialize, Serialize};

use super::problem::{Problem, DEPOT};
use crate::error::EvrpError;

/// A type of constraint violation in a solution.
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationType {
    /// Total demand on a vehicle tour exceeds the vehicle capacity.
    CapacityExceeded {
        /// Vehicle tour index in the solution.
        tour_index: usize,
        /// Load carried on that tour.
        load: i32,
        /// Vehicle capacity.
        capacity: i32,
    },
    /// Battery would drop below zero on arrival at `node`.
    BatteryDepleted {
        /// Vehicle tour index in the solution.
        tour_index: usize,
        /// Node reached with a negative battery.
        node: usize,
        /// Missing energy on arrival.
        deficit: f64,
    },
    /// Customer never visited.
    CustomerMissing {
        /// Customer node.
        node: usize,
    },
    /// Customer visited more than once.
    CustomerRepeated {
        /// Customer node.
        node: usize,
        /// Number of visits.
        visits: usize,
    },
    /// The flat sequence does not start and end at the depot.
    MalformedShape,
    /// A sequence entry lies outside the problem's node table.
    UnknownNode {
        /// Position in the flat sequence.
        position: usize,
        /// The out-of-range entry.
        node: usize,
    },
}

/// A constraint violation in a solution.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }

    /// How far the solution is from satisfying this constraint.
    ///
    /// Capacity excess in load units, battery deficit in energy units, one per
    /// missing customer and per extra visit. A malformed shape or an unknown
    /// node is infinite.
    pub fn magnitude(&self) -> f64 {
        match self.kind {
            ViolationType::CapacityExceeded { load, capacity, .. } => (load - capacity) as f64,
            ViolationType::BatteryDepleted { deficit, .. } => deficit,
            ViolationType::CustomerMissing { .. } => 1.0,
            ViolationType::CustomerRepeated { visits, .. } => visits.saturating_sub(1) as f64,
            ViolationType::MalformedShape | ViolationType::UnknownNode { .. } => f64::INFINITY,
        }
    }
}

/// One candidate answer: a flat sequence of node-table positions.
///
/// The sequence starts and ends at the depot; interior depot entries close one
/// vehicle tour and open the next. For example `[D, A, B, D, C, D]` is two
/// vehicle tours, `[D, A, B, D]` and `[D, C, D]`.
///
/// Tour length is recomputed on every request from the problem's distance
/// matrix, so replacing the sequence never leaves a stale value behind.
///
/// # Examples
///
/// ```
/// use evrp_search::models::Solution;
///
/// let mut sol = Solution::new();
/// sol.set(vec![0, 1, 2, 0, 3, 0]);
/// let tours = sol.vehicle_tours().unwrap();
/// assert_eq!(tours, vec![vec![0, 1, 2, 0], vec![0, 3, 0]]);
///
/// let mut rebuilt = Solution::new();
/// rebuilt.set_vehicle_tours(&tours).unwrap();
/// assert_eq!(rebuilt, sol);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    tours: Vec<usize>,
}

impl Solution {
    /// Creates an empty solution.
    pub fn new() -> Self {
        Self { tours: Vec::new() }
    }

    /// Creates a solution from a flat node sequence.
    pub fn from_sequence(tours: Vec<usize>) -> Self {
        Self { tours }
    }

    /// Appends one node to the end of the sequence.
    pub fn append(&mut self, node: usize) {
        self.tours.push(node);
    }

    /// Replaces the whole sequence.
    pub fn set(&mut self, tours: Vec<usize>) {
        self.tours = tours;
    }

    /// Node at `index` in the flat sequence.
    pub fn get(&self, index: usize) -> Result<usize, EvrpError> {
        self.tours
            .get(index)
            .copied()
            .ok_or(EvrpError::IndexOutOfBounds {
                index,
                len: self.tours.len(),
            })
    }

    /// The flat sequence.
    pub fn as_slice(&self) -> &[usize] {
        &self.tours
    }

    pub fn len(&self) -> usize {
        self.tours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tours.is_empty()
    }

    /// Returns `true` if the sequence holds at least two nodes and starts and
    /// ends at the depot. A lone depot closes no vehicle tour.
    pub fn is_depot_bounded(&self) -> bool {
        self.tours.len() >= 2
            && matches!((self.tours.first(), self.tours.last()), (Some(&DEPOT), Some(&DEPOT)))
    }

    /// Sum of distances between consecutive nodes of the flat sequence.
    ///
    /// Depot-to-depot legs between vehicle tours are included. Zero for
    /// sequences shorter than two nodes.
    ///
    /// # Panics
    ///
    /// Panics if an entry is not a position in `problem`'s node table; see
    /// [`Solution::unknown_node`].
    pub fn tour_length(&self, problem: &Problem) -> f64 {
        self.tours
            .windows(2)
            .map(|w| problem.distance(w[0], w[1]))
            .sum()
    }

    /// Splits the flat sequence into depot-bounded vehicle tours.
    ///
    /// Returns `None` if the sequence is shorter than two nodes or does not
    /// start and end at the depot. Two consecutive depot entries yield an
    /// empty tour `[D, D]`.
    pub fn vehicle_tours(&self) -> Option<Vec<Vec<usize>>> {
        if !self.is_depot_bounded() {
            return None;
        }

        let mut vehicle_tours = Vec::new();
        let mut tour = vec![DEPOT];
        for &node in &self.tours[1..] {
            tour.push(node);
            if node == DEPOT {
                vehicle_tours.push(std::mem::replace(&mut tour, vec![DEPOT]));
            }
        }
        Some(vehicle_tours)
    }

    /// Rebuilds the flat sequence from vehicle tours.
    ///
    /// The first tour is copied whole; each later tour drops its leading depot,
    /// which duplicates the previous tour's trailing depot. Every tour must
    /// start and end at the depot; otherwise the solution is left unchanged
    /// and [`EvrpError::MalformedTour`] names the first offending tour.
    pub fn set_vehicle_tours(&mut self, tours: &[Vec<usize>]) -> Result<(), EvrpError> {
        if let Some(tour_index) = tours.iter().position(|t| {
            t.len() < 2 || t.first() != Some(&DEPOT) || t.last() != Some(&DEPOT)
        }) {
            return Err(EvrpError::MalformedTour { tour_index });
        }

        let mut flat = Vec::with_capacity(tours.iter().map(Vec::len).sum());
        if let Some((first, rest)) = tours.split_first() {
            flat.extend_from_slice(first);
            for tour in rest {
                flat.extend_from_slice(&tour[1..]);
            }
        }
        self.tours = flat;
        Ok(())
    }

    /// Number of vehicle tours, or `None` if the shape is malformed.
    pub fn num_vehicle_tours(&self) -> Option<usize> {
        if !self.is_depot_bounded() {
            return None;
        }
        Some(self.tours[1..].iter().filter(|&&n| n == DEPOT).count())
    }

    /// First entry that is not a position in `problem`'s node table, as
    /// `(position, node)`.
    pub fn unknown_node(&self, problem: &Problem) -> Option<(usize, usize)> {
        self.tours
            .iter()
            .copied()
            .enumerate()
            .find(|&(_, n)| n >= problem.num_nodes())
    }

    /// Customers in visit order, skipping the depot and charging stations.
    pub fn customers(&self, problem: &Problem) -> Vec<usize> {
        self.tours
            .iter()
            .copied()
            .filter(|&n| problem.is_customer(n))
            .collect()
    }

    /// Dataset ids of the flat sequence, in order.
    ///
    /// # Panics
    ///
    /// Panics if an entry is not a position in `problem`'s node table.
    pub fn to_array(&self, problem: &Problem) -> Vec<usize> {
        self.tours.iter().map(|&n| problem.node(n).id()).collect()
    }

    /// Human-readable summary showing at most `max_visible_tours` nodes per
    /// vehicle tour.
    pub fn preview(&self, problem: &Problem, max_visible_tours: usize) -> String {
        let rule = "-".repeat(40);
        let mut out = String::new();
        out.push_str(&rule);
        out.push('\n');
        if let Some((position, node)) = self.unknown_node(problem) {
            out.push_str(&format!("Malformed: unknown node {node} at position {position}\n"));
            out.push_str(&rule);
            return out;
        }
        out.push_str(&format!("Tour length: {}\n", self.tour_length(problem)));

        match self.vehicle_tours() {
            Some(tours) => {
                for (i, tour) in tours.iter().enumerate() {
                    let shown: Vec<String> = tour
                        .iter()
                        .take(max_visible_tours)
                        .map(|&n| problem.node(n).to_string())
                        .collect();
                    out.push_str(&format!("Tour {}: {}", i, shown.join(" | ")));
                    if tour.len() > max_visible_tours {
                        out.push_str(" | ...");
                    }
                    out.push('\n');
                }
            }
            None => out.push_str("Malformed: sequence must start and end at the depot\n"),
        }

        out.push_str(&rule);
        out
    }
}
