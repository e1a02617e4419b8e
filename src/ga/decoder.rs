//! Giant tour decoding and fitness evaluation.
//!
//! # Pipeline
//!
//! giant tour → split DP on capacity → optional 2-opt per route → charging
//! station insertion per route → depot-bounded vehicle tours → flat
//! [`Solution`].
//!
//! # Reference
//!
//! Prins, C. (2004). "A simple and effective evolutionary algorithm for the
//! vehicle routing problem", *Computers & Operations Research* 31(12), 1985-2002.

use tracing::trace;

use crate::error::EvrpError;
use crate::evaluation::{insert_charging_stations, Evaluation};
use crate::local_search::two_opt_improve;
use crate::models::{Problem, Solution, DEPOT};

use super::chromosome::GiantTour;
use super::split::split;

/// Turns giant tours into EVRP solutions and scores them.
///
/// # Examples
///
/// ```
/// use evrp_search::models::{ElectricVehicle, Node, Problem};
/// use evrp_search::ga::{GiantTour, GiantTourDecoder};
///
/// let nodes = vec![
///     Node::depot(1, 0.0, 0.0),
///     Node::customer(2, 1.0, 0.0, 10),
///     Node::customer(3, 2.0, 0.0, 10),
///     Node::customer(4, 3.0, 0.0, 10),
/// ];
/// let problem = Problem::new(nodes, ElectricVehicle::new(30, 100.0, 1.0).unwrap()).unwrap();
///
/// let decoder = GiantTourDecoder::new(&problem, 1000.0);
/// let solution = decoder.decode(&[3, 1, 2]).unwrap();
/// assert_eq!(solution.as_slice(), &[0, 1, 2, 3, 0]);
///
/// let mut tour = GiantTour::new(vec![3, 1, 2]);
/// decoder.evaluate(&mut tour).unwrap();
/// assert!(tour.is_feasible());
/// assert!((tour.fitness() - 6.0).abs() < 1e-10);
/// ```
pub struct GiantTourDecoder<'a> {
    problem: &'a Problem,
    penalty_weight: f64,
    local_search: bool,
}

impl<'a> GiantTourDecoder<'a> {
    /// Creates a decoder with 2-opt route improvement enabled.
    pub fn new(problem: &'a Problem, penalty_weight: f64) -> Self {
        Self {
            problem,
            penalty_weight,
            local_search: true,
        }
    }

    /// Enables or disables 2-opt on the split routes.
    pub fn with_local_search(mut self, enabled: bool) -> Self {
        self.local_search = enabled;
        self
    }

    /// Decodes a customer permutation into a depot-bounded solution.
    ///
    /// A permutation with no customers decodes to the single empty tour
    /// `[0, 0]`.
    pub fn decode(&self, customers: &[usize]) -> Result<Solution, EvrpError> {
        let split = split(customers, self.problem);
        trace!(
            routes = split.routes.len(),
            distance = split.total_distance,
            "giant tour split"
        );
        let routes = split.routes;
        if routes.is_empty() {
            return Ok(Solution::from_sequence(vec![DEPOT, DEPOT]));
        }

        let tours: Vec<Vec<usize>> = routes
            .into_iter()
            .map(|route| {
                let route = if self.local_search {
                    two_opt_improve(&route, self.problem).0
                } else {
                    route
                };
                insert_charging_stations(self.problem, &route)
            })
            .collect();

        let mut solution = Solution::default();
        solution.set_vehicle_tours(&tours)?;
        Ok(solution)
    }

    /// Decodes and evaluates a solution.
    pub fn decode_evaluated(&self, customers: &[usize]) -> Result<(Solution, Evaluation), EvrpError> {
        let solution = self.decode(customers)?;
        let evaluation = self.problem.evaluate(&solution);
        Ok((solution, evaluation))
    }

    /// Decodes `tour` and stores its penalised fitness and feasibility.
    pub fn evaluate(&self, tour: &mut GiantTour) -> Result<(), EvrpError> {
        let (_, evaluation) = self.decode_evaluated(tour.customers())?;
        tour.set_evaluation(
            evaluation.fitness(self.penalty_weight),
            evaluation.is_feasible(),
        );
        Ok(())
    }
}
