//! Greedy baseline search.

use std::sync::Arc;

use tracing::{debug, info};

use crate::constructive::nearest_neighbor;
use crate::error::EvrpError;
use crate::models::{Problem, Solution};

/// Nearest-neighbor construction with charging detours, run as a search
/// algorithm.
///
/// Deterministic: every run on the same problem yields the same solution.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use evrp_search::algorithm::GreedySearch;
/// use evrp_search::models::{ElectricVehicle, Node, Problem};
///
/// let nodes = vec![Node::depot(1, 0.0, 0.0), Node::customer(2, 1.0, 0.0, 50)];
/// let problem = Arc::new(Problem::new(nodes, ElectricVehicle::new(50, 10.0, 1.0).unwrap()).unwrap());
///
/// let mut greedy = GreedySearch::new();
/// greedy.set_problem(problem.clone());
/// let solution = greedy.run(false).unwrap();
/// assert_eq!(solution.as_slice(), &[0, 1, 0]);
/// assert!(problem.check_valid_solution(&solution));
/// ```
#[derive(Debug, Clone, Default)]
pub struct GreedySearch {
    problem: Option<Arc<Problem>>,
    last: Option<Solution>,
}

impl GreedySearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the problem subsequent runs operate on.
    pub fn set_problem(&mut self, problem: Arc<Problem>) {
        self.problem = Some(problem);
        self.last = None;
    }

    pub fn problem(&self) -> Option<&Arc<Problem>> {
        self.problem.as_ref()
    }

    /// Solution produced by the most recent run, until [`free`](Self::free).
    pub fn last_solution(&self) -> Option<&Solution> {
        self.last.as_ref()
    }

    pub fn run(&mut self, verbose: bool) -> Result<Solution, EvrpError> {
        let problem = self.problem.as_ref().ok_or(EvrpError::ProblemNotSet)?;
        let solution = nearest_neighbor(problem);

        let length = solution.tour_length(problem);
        let vehicle_tours = solution.num_vehicle_tours().unwrap_or(0);
        let feasible = problem.check_valid_solution(&solution);
        if verbose {
            info!(problem = problem.name(), length, vehicle_tours, feasible, "greedy search finished");
        } else {
            debug!(problem = problem.name(), length, vehicle_tours, feasible, "greedy search finished");
        }

        self.last = Some(solution.clone());
        Ok(solution)
    }

    /// Drops run-scoped state; the bound problem stays.
    pub fn free(&mut self) {
        self.last = None;
    }
}
