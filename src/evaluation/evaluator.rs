//! Tour evaluator that simulates load and battery along each vehicle tour.

use tracing::trace;

use crate::models::{Problem, Solution, Violation, ViolationType};

/// Battery levels within this tolerance of zero count as non-negative.
pub(crate) const ENERGY_EPS: f64 = 1e-9;

/// Distance and violations of a whole solution.
///
/// # Examples
///
/// ```
/// use evrp_search::models::{ElectricVehicle, Node, Problem, Solution};
///
/// let nodes = vec![Node::depot(1, 0.0, 0.0), Node::customer(2, 3.0, 4.0, 10)];
/// let problem = Problem::new(nodes, ElectricVehicle::new(5, 100.0, 1.0).unwrap()).unwrap();
///
/// let eval = problem.evaluate(&Solution::from_sequence(vec![0, 1, 0]));
/// assert!(!eval.is_feasible()); // demand 10 > capacity 5
/// assert!((eval.penalty() - 5.0).abs() < 1e-10);
/// assert!((eval.fitness(2.0) - 20.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Total travelled distance of the flat sequence.
    pub distance: f64,
    /// Every constraint violation found.
    pub violations: Vec<Violation>,
}

impl Evaluation {
    /// Returns `true` if no constraint is violated.
    pub fn is_feasible(&self) -> bool {
        self.violations.is_empty()
    }

    /// Sum of violation magnitudes.
    pub fn penalty(&self) -> f64 {
        self.violations.iter().map(Violation::magnitude).sum()
    }

    /// Distance plus `weight` times the violation magnitude. Lower is better.
    ///
    /// A malformed shape scores infinity whatever the weight.
    pub fn fitness(&self, weight: f64) -> f64 {
        let penalty = self.penalty();
        if penalty == 0.0 {
            self.distance
        } else if penalty.is_infinite() {
            f64::INFINITY
        } else {
            self.distance + weight * penalty
        }
    }
}

/// Load and battery figures of one vehicle tour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TourStats {
    /// Distance from the leading depot to the trailing depot.
    pub distance: f64,
    /// Total customer demand served.
    pub load: i32,
    /// Lowest battery level reached on arrival at any node.
    pub min_battery: f64,
}

/// Evaluates vehicle tours against the problem's capacity and battery limits.
///
/// The battery starts full at the depot, drops by the leg energy on every
/// move, and is refilled on arrival at the depot or a charging station.
pub struct TourEvaluator<'a> {
    problem: &'a Problem,
}

impl<'a> TourEvaluator<'a> {
    pub fn new(problem: &'a Problem) -> Self {
        Self { problem }
    }

    /// Simulates one depot-bounded vehicle tour.
    ///
    /// `tour_index` is stamped into the returned violations.
    pub fn evaluate_tour(&self, tour_index: usize, tour: &[usize]) -> (TourStats, Vec<Violation>) {
        let vehicle = self.problem.vehicle();
        let full = vehicle.battery_capacity();
        let mut violations = Vec::new();
        let mut battery = full;
        let mut min_battery = full;
        let mut load = 0i32;
        let mut distance = 0.0;

        for leg in tour.windows(2) {
            let (from, to) = (leg[0], leg[1]);
            distance += self.problem.distance(from, to);
            battery -= self.problem.energy(from, to);
            min_battery = min_battery.min(battery);

            if battery < -ENERGY_EPS {
                violations.push(Violation::new(ViolationType::BatteryDepleted {
                    tour_index,
                    node: to,
                    deficit: -battery,
                }));
                battery = 0.0;
            }
            if self.problem.node(to).recharges() {
                battery = full;
            }
            load += self.problem.demand(to);
        }

        if load > vehicle.capacity() {
            violations.push(Violation::new(ViolationType::CapacityExceeded {
                tour_index,
                load,
                capacity: vehicle.capacity(),
            }));
        }

        (
            TourStats {
                distance,
                load,
                min_battery,
            },
            violations,
        )
    }

    /// Evaluates a whole solution: shape, every vehicle tour, and customer
    /// coverage.
    ///
    /// An entry outside the node table yields a single
    /// [`ViolationType::UnknownNode`] and an infinite distance.
    pub fn evaluate_solution(&self, solution: &Solution) -> Evaluation {
        if let Some((position, node)) = solution.unknown_node(self.problem) {
            return Evaluation {
                distance: f64::INFINITY,
                violations: vec![Violation::new(ViolationType::UnknownNode { position, node })],
            };
        }

        let distance = solution.tour_length(self.problem);

        let Some(tours) = solution.vehicle_tours() else {
            return Evaluation {
                distance,
                violations: vec![Violation::new(ViolationType::MalformedShape)],
            };
        };

        let mut violations = Vec::new();
        for (idx, tour) in tours.iter().enumerate() {
            let (stats, mut tour_violations) = self.evaluate_tour(idx, tour);
            trace!(
                tour = idx,
                load = stats.load,
                min_battery = stats.min_battery,
                violations = tour_violations.len(),
                "vehicle tour evaluated"
            );
            violations.append(&mut tour_violations);
        }

        let mut visits = vec![0usize; self.problem.num_nodes()];
        for &node in solution.as_slice() {
            visits[node] += 1;
        }
        for &customer in self.problem.customers() {
            match visits[customer] {
                0 => violations.push(Violation::new(ViolationType::CustomerMissing {
                    node: customer,
                })),
                1 => {}
                n => violations.push(Violation::new(ViolationType::CustomerRepeated {
                    node: customer,
                    visits: n,
                })),
            }
        }

        Evaluation {
            distance,
            violations,
        }
    }
}

/// Evaluates `solution` against `problem`.
pub fn evaluate(problem: &Problem, solution: &Solution) -> Evaluation {
    TourEvaluator::new(problem).evaluate_solution(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ElectricVehicle, Node};

    // Depot at origin, customers on the x axis, station half way out.
    fn setup(capacity: i32, battery: f64) -> Problem {
        let nodes = vec![
            Node::depot(1, 0.0, 0.0),
            Node::customer(2, 3.0, 0.0, 10),
            Node::customer(3, 6.0, 0.0, 20),
            Node::charging_station(4, 5.0, 0.0),
            Node::customer(5, 0.0, 4.0, 15),
        ];
        let vehicle = ElectricVehicle::new(capacity, battery, 1.0).expect("valid");
        Problem::new(nodes, vehicle).expect("valid")
    }

    #[test]
    fn test_tour_within_limits() {
        let p = setup(50, 20.0);
        let eval = TourEvaluator::new(&p);
        let (stats, violations) = eval.evaluate_tour(0, &[0, 1, 2, 0]);
        assert!(violations.is_empty());
        assert_eq!(stats.load, 30);
        assert!((stats.distance - 12.0).abs() < 1e-10);
        assert!((stats.min_battery - 8.0).abs() < 1e-10);
    }

    #[test]
    fn test_capacity_exceeded() {
        let p = setup(25, 100.0);
        let eval = TourEvaluator::new(&p);
        let (_, violations) = eval.evaluate_tour(3, &[0, 1, 2, 0]);
        assert_eq!(
            violations,
            vec![Violation::new(ViolationType::CapacityExceeded {
                tour_index: 3,
                load: 30,
                capacity: 25,
            })]
        );
    }

    #[test]
    fn test_battery_depleted() {
        // 0 -> 2 is 6, 2 -> 0 is 6: needs 12 with battery 10
        let p = setup(100, 10.0);
        let eval = TourEvaluator::new(&p);
        let (_, violations) = eval.evaluate_tour(0, &[0, 2, 0]);
        assert_eq!(violations.len(), 1);
        match violations[0].kind {
            ViolationType::BatteryDepleted { node, deficit, .. } => {
                assert_eq!(node, 0);
                assert!((deficit - 2.0).abs() < 1e-10);
            }
            ref other => panic!("unexpected violation {other:?}"),
        }
    }

    #[test]
    fn test_charging_station_refills() {
        // 0 -> 2 (6), 2 -> station (1, full again), station -> 0 (5)
        let p = setup(100, 10.0);
        let eval = TourEvaluator::new(&p);
        let (stats, violations) = eval.evaluate_tour(0, &[0, 2, 3, 0]);
        assert!(violations.is_empty());
        assert!((stats.min_battery - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_exact_battery_is_enough() {
        let p = setup(100, 12.0);
        let (_, violations) = TourEvaluator::new(&p).evaluate_tour(0, &[0, 2, 0]);
        assert!(violations.is_empty());
    }

    #[test]
    fn test_solution_coverage() {
        let p = setup(100, 100.0);
        let sol = Solution::from_sequence(vec![0, 1, 0, 1, 2, 0]);
        let eval = evaluate(&p, &sol);
        assert!(!eval.is_feasible());
        assert!(eval.violations.contains(&Violation::new(
            ViolationType::CustomerRepeated { node: 1, visits: 2 }
        )));
        assert!(eval
            .violations
            .contains(&Violation::new(ViolationType::CustomerMissing { node: 4 })));
        assert!((eval.penalty() - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_feasible_solution() {
        let p = setup(100, 100.0);
        let sol = Solution::from_sequence(vec![0, 1, 2, 0, 4, 0]);
        let eval = evaluate(&p, &sol);
        assert!(eval.is_feasible());
        assert!((eval.distance - 20.0).abs() < 1e-10);
        assert!((eval.fitness(1000.0) - 20.0).abs() < 1e-10);
        assert!(p.check_valid_solution(&sol));
    }

    #[test]
    fn test_stations_may_repeat() {
        let p = setup(100, 100.0);
        let sol = Solution::from_sequence(vec![0, 3, 1, 3, 2, 0, 4, 0]);
        assert!(p.check_valid_solution(&sol));
    }

    #[test]
    fn test_malformed_solution() {
        let p = setup(100, 100.0);
        let eval = evaluate(&p, &Solution::from_sequence(vec![1, 2, 0]));
        assert_eq!(
            eval.violations,
            vec![Violation::new(ViolationType::MalformedShape)]
        );
        assert!(eval.fitness(1.0).is_infinite());
        assert_eq!(eval.fitness(0.0), f64::INFINITY);
        assert!(!p.check_valid_solution(&Solution::new()));
    }

    #[test]
    fn test_unknown_node_is_reported() {
        let nodes = vec![Node::depot(1, 0.0, 0.0), Node::customer(2, 3.0, 4.0, 1)];
        let vehicle = ElectricVehicle::new(10, 100.0, 1.0).expect("valid");
        let p = Problem::new(nodes, vehicle).expect("valid");

        let sol = Solution::from_sequence(vec![0, 7, 0]);
        assert!(!p.check_valid_solution(&sol));
        let eval = evaluate(&p, &sol);
        assert_eq!(
            eval.violations,
            vec![Violation::new(ViolationType::UnknownNode { position: 1, node: 7 })]
        );
        assert_eq!(eval.fitness(1000.0), f64::INFINITY);
    }
}
