//! EVRP problem instance.

use crate::distance::DistanceMatrix;
use crate::error::EvrpError;
use crate::evaluation::{self, Evaluation};

use super::{ElectricVehicle, Node, NodeKind, Solution};

/// Position of the depot in every node table.
pub const DEPOT: usize = 0;

/// An electric vehicle routing problem instance.
///
/// Owns the node table (depot at index 0), the fleet parameters, and the
/// precomputed distance matrix. A `Problem` is immutable once built; share it
/// between algorithms with `Arc<Problem>`.
///
/// # Examples
///
/// ```
/// use evrp_search::models::{ElectricVehicle, Node, Problem, Solution};
///
/// let nodes = vec![
///     Node::depot(1, 0.0, 0.0),
///     Node::customer(2, 3.0, 4.0, 10),
///     Node::charging_station(3, 3.0, 0.0),
/// ];
/// let vehicle = ElectricVehicle::new(50, 20.0, 1.0).unwrap();
/// let problem = Problem::new(nodes, vehicle).unwrap();
///
/// let mut solution = Solution::new();
/// solution.set(vec![0, 1, 0]);
/// assert!(problem.check_valid_solution(&solution));
/// assert_eq!(problem.num_customers(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Problem {
    name: String,
    nodes: Vec<Node>,
    vehicle: ElectricVehicle,
    distances: DistanceMatrix,
    customers: Vec<usize>,
    stations: Vec<usize>,
    recharge_points: Vec<usize>,
}

impl Problem {
    /// Builds a problem from a node table and the fleet parameters.
    ///
    /// Node 0 must be the only depot. Customers must have non-negative demand;
    /// the depot and charging stations must have zero demand.
    pub fn new(nodes: Vec<Node>, vehicle: ElectricVehicle) -> Result<Self, EvrpError> {
        if nodes.is_empty() {
            return Err(EvrpError::EmptyProblem);
        }
        if !nodes[DEPOT].is_depot() {
            return Err(EvrpError::MissingDepot);
        }

        let mut customers = Vec::new();
        let mut stations = Vec::new();
        for (index, node) in nodes.iter().enumerate() {
            if !node.x().is_finite() || !node.y().is_finite() {
                return Err(EvrpError::InvalidNode {
                    index,
                    reason: "coordinates must be finite".into(),
                });
            }
            match node.kind() {
                NodeKind::Depot if index != DEPOT => {
                    return Err(EvrpError::MultipleDepots { index });
                }
                NodeKind::Depot => {}
                NodeKind::Customer => {
                    if node.demand() < 0 {
                        return Err(EvrpError::InvalidNode {
                            index,
                            reason: format!("negative demand {}", node.demand()),
                        });
                    }
                    customers.push(index);
                }
                NodeKind::ChargingStation => stations.push(index),
            }
            if node.recharges() && node.demand() != 0 {
                return Err(EvrpError::InvalidNode {
                    index,
                    reason: "depot and charging stations carry no demand".into(),
                });
            }
        }

        let mut recharge_points = Vec::with_capacity(stations.len() + 1);
        recharge_points.push(DEPOT);
        recharge_points.extend_from_slice(&stations);

        let distances = DistanceMatrix::from_nodes(&nodes);

        Ok(Self {
            name: String::new(),
            nodes,
            vehicle,
            distances,
            customers,
            stations,
            recharge_points,
        })
    }

    /// Attaches the instance name (e.g. the dataset file stem).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All nodes (index 0 = depot).
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Node at table position `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    pub fn vehicle(&self) -> &ElectricVehicle {
        &self.vehicle
    }

    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Table position of the depot.
    pub fn depot(&self) -> usize {
        DEPOT
    }

    /// Table positions of all customers, in table order.
    pub fn customers(&self) -> &[usize] {
        &self.customers
    }

    /// Table positions of all charging stations, in table order.
    pub fn charging_stations(&self) -> &[usize] {
        &self.stations
    }

    /// The depot followed by every charging station.
    pub fn recharge_points(&self) -> &[usize] {
        &self.recharge_points
    }

    pub fn num_customers(&self) -> usize {
        self.customers.len()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Demand of node `index` (0 for depot and stations).
    pub fn demand(&self, index: usize) -> i32 {
        self.nodes[index].demand()
    }

    pub fn is_customer(&self, index: usize) -> bool {
        self.nodes[index].is_customer()
    }

    /// Distance between two nodes.
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances.get(from, to)
    }

    /// Energy needed to drive from `from` to `to`.
    pub fn energy(&self, from: usize, to: usize) -> f64 {
        self.vehicle.energy_for(self.distance(from, to))
    }

    /// Nearest node where the battery can be recharged (depot or station).
    pub fn nearest_recharge(&self, from: usize) -> usize {
        self.distances
            .nearest(from, &self.recharge_points)
            .unwrap_or(DEPOT)
    }

    /// Returns `true` if the solution is depot-bounded, every vehicle tour
    /// respects load capacity and battery range, and every customer is
    /// visited exactly once.
    pub fn check_valid_solution(&self, solution: &Solution) -> bool {
        self.evaluate(solution).is_feasible()
    }

    /// Computes distance and constraint violations of a solution.
    pub fn evaluate(&self, solution: &Solution) -> Evaluation {
        evaluation::evaluate(self, solution)
    }
}
