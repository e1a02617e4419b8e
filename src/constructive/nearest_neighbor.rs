//! Nearest-neighbor construction with charging detours.
//!
//! Builds tours greedily: from the vehicle's current position, always visit
//! the nearest unvisited customer that still fits the remaining load. Before
//! each move the battery is checked; if it cannot cover the leg plus the
//! onward leg to a recharge point, the vehicle detours through charging
//! stations. When nothing fits, or the battery cannot be rescued, the vehicle
//! returns to the depot and a new vehicle tour starts.
//!
//! # Complexity
//!
//! O(n² + n·s) where n = customers and s = charging stations.

use tracing::trace;

use crate::evaluation::{can_reach, plan_detours};
use crate::models::{Problem, Solution, DEPOT};

/// Constructs an EVRP solution with the nearest-neighbor heuristic.
///
/// Every customer is visited exactly once and the returned sequence starts
/// and ends at the depot. When an instance cannot be served feasibly (a
/// demand above capacity, a customer out of battery range of every station)
/// the move is made anyway and evaluation reports the violation.
///
/// # Examples
///
/// ```
/// use evrp_search::models::{ElectricVehicle, Node, Problem};
/// use evrp_search::constructive::nearest_neighbor;
///
/// let nodes = vec![
///     Node::depot(1, 0.0, 0.0),
///     Node::customer(2, 1.0, 0.0, 10),
///     Node::customer(3, 2.0, 0.0, 10),
///     Node::customer(4, 3.0, 0.0, 10),
/// ];
/// let problem = Problem::new(nodes, ElectricVehicle::new(20, 100.0, 1.0).unwrap()).unwrap();
///
/// let solution = nearest_neighbor(&problem);
/// assert_eq!(solution.as_slice(), &[0, 1, 2, 0, 3, 0]);
/// assert!(problem.check_valid_solution(&solution));
/// ```
pub fn nearest_neighbor(problem: &Problem) -> Solution {
    NearestNeighbor::new(problem).build()
}

struct NearestNeighbor<'a> {
    problem: &'a Problem,
    visited: Vec<bool>,
    remaining: usize,
    solution: Solution,
    current: usize,
    load: i32,
    battery: f64,
}

impl<'a> NearestNeighbor<'a> {
    fn new(problem: &'a Problem) -> Self {
        Self {
            problem,
            visited: vec![false; problem.num_nodes()],
            remaining: problem.num_customers(),
            solution: Solution::from_sequence(vec![DEPOT]),
            current: DEPOT,
            load: 0,
            battery: problem.vehicle().battery_capacity(),
        }
    }

    fn build(mut self) -> Solution {
        let capacity = self.problem.vehicle().capacity();

        while self.remaining > 0 {
            let next = self.nearest_unvisited(|c| self.load + self.problem.demand(c) <= capacity);
            let next = match next {
                Some(c) => c,
                None if self.current == DEPOT => {
                    // Even an empty vehicle cannot carry what is left.
                    match self.nearest_unvisited(|_| true) {
                        Some(c) => c,
                        None => break,
                    }
                }
                None => {
                    self.return_to_depot();
                    continue;
                }
            };

            let mut detours = Vec::new();
            let (at, battery) =
                plan_detours(self.problem, self.current, next, self.battery, &mut detours);
            if !can_reach(self.problem, at, next, battery) && self.current != DEPOT {
                trace!(from = self.current, to = next, "battery exhausted, closing tour");
                self.return_to_depot();
                continue;
            }

            for station in detours {
                self.solution.append(station);
            }
            self.battery = battery - self.problem.energy(at, next);
            self.solution.append(next);
            self.visited[next] = true;
            self.remaining -= 1;
            self.load += self.problem.demand(next);
            self.current = next;
        }

        if self.current != DEPOT || self.solution.len() == 1 {
            self.return_to_depot();
        }
        self.solution
    }

    /// Nearest unvisited customer accepted by `fits`; ties go to the lower
    /// table position.
    fn nearest_unvisited(&self, fits: impl Fn(usize) -> bool) -> Option<usize> {
        let from = self.current;
        self.problem
            .customers()
            .iter()
            .copied()
            .filter(|&c| !self.visited[c] && fits(c))
            .min_by(|&a, &b| {
                self.problem
                    .distance(from, a)
                    .total_cmp(&self.problem.distance(from, b))
            })
    }

    fn return_to_depot(&mut self) {
        let mut detours = Vec::new();
        plan_detours(self.problem, self.current, DEPOT, self.battery, &mut detours);
        for station in detours {
            self.solution.append(station);
        }
        self.solution.append(DEPOT);
        self.current = DEPOT;
        self.load = 0;
        self.battery = self.problem.vehicle().battery_capacity();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ElectricVehicle, Node};

    fn problem(nodes: Vec<Node>, capacity: i32, battery: f64) -> Problem {
        Problem::new(
            nodes,
            ElectricVehicle::new(capacity, battery, 1.0).expect("valid"),
        )
        .expect("valid")
    }

    fn line(capacity: i32, battery: f64) -> Problem {
        problem(
            vec![
                Node::depot(1, 0.0, 0.0),
                Node::customer(2, 1.0, 0.0, 10),
                Node::customer(3, 2.0, 0.0, 10),
                Node::customer(4, 3.0, 0.0, 10),
            ],
            capacity,
            battery,
        )
    }

    fn visits_each_customer_once(p: &Problem, sol: &Solution) -> bool {
        let mut customers = sol.customers(p);
        customers.sort();
        customers == p.customers()
    }

    #[test]
    fn test_nn_all_on_one_tour() {
        let p = line(100, 100.0);
        let sol = nearest_neighbor(&p);
        assert_eq!(sol.as_slice(), &[0, 1, 2, 3, 0]);
        assert!((sol.tour_length(&p) - 6.0).abs() < 1e-10);
        assert!(p.check_valid_solution(&sol));
    }

    #[test]
    fn test_nn_each_customer_alone() {
        let p = line(10, 100.0);
        let sol = nearest_neighbor(&p);
        assert_eq!(sol.as_slice(), &[0, 1, 0, 2, 0, 3, 0]);
        assert_eq!(sol.num_vehicle_tours(), Some(3));
        assert!(p.check_valid_solution(&sol));
    }

    #[test]
    fn test_nn_chooses_nearest() {
        let p = problem(
            vec![
                Node::depot(1, 0.0, 0.0),
                Node::customer(2, 10.0, 0.0, 5),
                Node::customer(3, 1.0, 0.0, 5),
            ],
            100,
            100.0,
        );
        assert_eq!(nearest_neighbor(&p).as_slice(), &[0, 2, 1, 0]);
    }

    #[test]
    fn test_single_customer_scenario() {
        // Demand fills the vehicle exactly; one unit of distance away.
        let p = problem(
            vec![Node::depot(1, 0.0, 0.0), Node::customer(2, 1.0, 0.0, 50)],
            50,
            10.0,
        );
        let sol = nearest_neighbor(&p);
        assert_eq!(sol.as_slice(), &[0, 1, 0]);
        assert!(p.evaluate(&sol).violations.is_empty());
    }

    #[test]
    fn test_no_customers() {
        let p = problem(vec![Node::depot(1, 0.0, 0.0)], 10, 10.0);
        let sol = nearest_neighbor(&p);
        assert_eq!(sol.as_slice(), &[0, 0]);
        assert_eq!(sol.vehicle_tours(), Some(vec![vec![0, 0]]));
        assert!(p.check_valid_solution(&sol));
    }

    #[test]
    fn test_detours_through_station() {
        // Customer at x=10 needs 20 energy round trip; station at x=6 is
        // visited on the way out and on the way back.
        let p = problem(
            vec![
                Node::depot(1, 0.0, 0.0),
                Node::customer(2, 10.0, 0.0, 1),
                Node::charging_station(3, 6.0, 0.0),
            ],
            10,
            12.0,
        );
        let sol = nearest_neighbor(&p);
        assert_eq!(sol.as_slice(), &[0, 2, 1, 2, 0]);
        assert!(p.check_valid_solution(&sol));
    }

    #[test]
    fn test_battery_forces_new_tour() {
        // Two customers on opposite sides; battery covers one round trip only.
        let p = problem(
            vec![
                Node::depot(1, 0.0, 0.0),
                Node::customer(2, 4.0, 0.0, 1),
                Node::customer(3, -5.0, 0.0, 1),
            ],
            10,
            10.0,
        );
        let sol = nearest_neighbor(&p);
        assert_eq!(sol.as_slice(), &[0, 1, 0, 2, 0]);
        assert!(p.check_valid_solution(&sol));
    }

    #[test]
    fn test_oversized_demand_terminates() {
        let p = problem(
            vec![
                Node::depot(1, 0.0, 0.0),
                Node::customer(2, 1.0, 0.0, 30),
                Node::customer(3, 2.0, 0.0, 5),
            ],
            20,
            100.0,
        );
        let sol = nearest_neighbor(&p);
        assert!(sol.is_depot_bounded());
        assert!(visits_each_customer_once(&p, &sol));
        assert!(!p.check_valid_solution(&sol));
    }

    #[test]
    fn test_clustered_instance_is_feasible() {
        let mut nodes = vec![Node::depot(1, 50.0, 50.0)];
        for i in 0..12 {
            let angle = i as f64 * std::f64::consts::TAU / 12.0;
            nodes.push(Node::customer(
                i + 2,
                50.0 + 30.0 * angle.cos(),
                50.0 + 30.0 * angle.sin(),
                7,
            ));
        }
        nodes.push(Node::charging_station(20, 80.0, 50.0));
        nodes.push(Node::charging_station(21, 20.0, 50.0));
        nodes.push(Node::charging_station(22, 50.0, 80.0));
        nodes.push(Node::charging_station(23, 50.0, 20.0));
        let p = problem(nodes, 30, 90.0);

        let sol = nearest_neighbor(&p);
        assert!(visits_each_customer_once(&p, &sol));
        assert!(p.check_valid_solution(&sol), "{:?}", p.evaluate(&sol));
    }
}
