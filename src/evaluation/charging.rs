//! Charging-station detours.
//!
//! A vehicle may continue from `from` to `to` when its battery covers the leg
//! and, if `to` is a customer, the onward leg to the nearest recharge point.
//! Otherwise it detours through a charging station that is reachable now and
//! either strictly closer to `to`, or (only while the battery is not full)
//! one from which `to` is reachable on a full charge. A non-progressing hop
//! leaves the battery full, so every later hop must make strict progress and
//! the number of detours stays bounded by the number of stations.

use tracing::trace;

use super::evaluator::ENERGY_EPS;
use crate::models::{Problem, DEPOT};

/// Returns `true` if a vehicle at `from` holding `battery` can reach `to` and
/// still get to a recharge point afterwards.
pub fn can_reach(problem: &Problem, from: usize, to: usize, battery: f64) -> bool {
    let mut needed = problem.energy(from, to);
    if !problem.node(to).recharges() {
        needed += problem.energy(to, problem.nearest_recharge(to));
    }
    battery + ENERGY_EPS >= needed
}

/// Picks the charging station to detour through on the way from `from` to
/// `to`.
///
/// Candidates are stations other than `from` reachable with `battery` that
/// are strictly closer to `to` than `from` is. While the battery is not full,
/// stations from which `to` can be reached on a full charge also qualify.
/// Among the candidates the one with the shortest `from → station → to` path
/// wins. `None` if no station qualifies.
pub fn detour_station(problem: &Problem, from: usize, to: usize, battery: f64) -> Option<usize> {
    let full = problem.vehicle().battery_capacity();
    let partly_drained = battery + ENERGY_EPS < full;
    let direct = problem.distance(from, to);
    problem
        .charging_stations()
        .iter()
        .copied()
        .filter(|&s| s != from)
        .filter(|&s| battery + ENERGY_EPS >= problem.energy(from, s))
        .filter(|&s| {
            problem.distance(s, to) < direct || (partly_drained && can_reach(problem, s, to, full))
        })
        .min_by(|&a, &b| {
            let via_a = problem.distance(from, a) + problem.distance(a, to);
            let via_b = problem.distance(from, b) + problem.distance(b, to);
            via_a.total_cmp(&via_b)
        })
}

/// Appends the charging stations needed before moving from `from` to `to`.
///
/// Returns the node the vehicle stands on and its battery after the detours
/// (the vehicle has not yet moved to `to`). When no station makes progress the
/// remaining gap is left for evaluation to report.
pub fn plan_detours(
    problem: &Problem,
    mut from: usize,
    to: usize,
    mut battery: f64,
    path: &mut Vec<usize>,
) -> (usize, f64) {
    let full = problem.vehicle().battery_capacity();
    while !can_reach(problem, from, to, battery) {
        match detour_station(problem, from, to, battery) {
            Some(station) => {
                trace!(from, to, station, "charging detour");
                path.push(station);
                from = station;
                battery = full;
            }
            None => break,
        }
    }
    (from, battery)
}

/// Turns a customer sequence into a depot-bounded vehicle tour, inserting
/// charging stations wherever the battery would otherwise run out.
///
/// # Examples
///
/// ```
/// use evrp_search::evaluation::insert_charging_stations;
/// use evrp_search::models::{ElectricVehicle, Node, Problem};
///
/// let nodes = vec![
///     Node::depot(1, 0.0, 0.0),
///     Node::customer(2, 10.0, 0.0, 1),
///     Node::charging_station(3, 6.0, 0.0),
/// ];
/// let problem = Problem::new(nodes, ElectricVehicle::new(10, 12.0, 1.0).unwrap()).unwrap();
///
/// // 0 -> 1 -> 0 needs 20 energy with a 12 battery: recharge both ways.
/// let tour = insert_charging_stations(&problem, &[1]);
/// assert_eq!(tour, vec![0, 2, 1, 2, 0]);
/// ```
pub fn insert_charging_stations(problem: &Problem, customers: &[usize]) -> Vec<usize> {
    let full = problem.vehicle().battery_capacity();
    let mut tour = Vec::with_capacity(customers.len() + 2);
    tour.push(DEPOT);

    let mut current = DEPOT;
    let mut battery = full;
    for &next in customers.iter().chain(std::iter::once(&DEPOT)) {
        let (at, left) = plan_detours(problem, current, next, battery, &mut tour);
        battery = left - problem.energy(at, next);
        tour.push(next);
        current = next;
        if problem.node(next).recharges() {
            battery = full;
        }
    }
    tour
}
