//! Intra-route 2-opt improvement.
//!
//! # Algorithm
//!
//! For each pair of edges (i, i+1) and (j, j+1) in a route, compute the
//! change in distance from reversing the segment between them:
//!
//! ```text
//! delta = d(r[i], r[j]) + d(r[i+1], r[j+1]) - d(r[i], r[i+1]) - d(r[j], r[j+1])
//! ```
//!
//! If delta < 0, reverse the segment and accept the improvement. Repeat until
//! no further improvement is found (first-improvement strategy).
//!
//! Routes are customer-only: charging stations are inserted after the
//! customer order is settled, so the search only shortens the plain
//! depot-to-depot path.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use crate::models::{Problem, DEPOT};

/// Applies 2-opt to a customer-only route that starts and ends at the depot.
///
/// Returns the improved customer order and its depot-to-depot distance.
///
/// # Examples
///
/// ```
/// use evrp_search::models::{ElectricVehicle, Node, Problem};
/// use evrp_search::local_search::two_opt_improve;
///
/// let nodes = vec![
///     Node::depot(1, 0.0, 0.0),
///     Node::customer(2, 1.0, 1.0, 1),
///     Node::customer(3, 2.0, 0.0, 1),
///     Node::customer(4, 1.0, -1.0, 1),
/// ];
/// let problem = Problem::new(nodes, ElectricVehicle::new(10, 100.0, 1.0).unwrap()).unwrap();
///
/// // 0 -> (1,1) -> (1,-1) -> (2,0) -> 0 crosses itself
/// let (improved, dist) = two_opt_improve(&[1, 3, 2], &problem);
/// assert_eq!(improved, vec![1, 2, 3]);
/// assert!(dist < 2f64.sqrt() * 4.0 + 1e-9);
/// ```
pub fn two_opt_improve(route: &[usize], problem: &Problem) -> (Vec<usize>, f64) {
    let mut current = route.to_vec();
    if current.len() < 2 {
        let dist = route_distance(&current, problem);
        return (current, dist);
    }

    let mut improved = true;
    while improved {
        improved = false;
        let n = current.len();

        for i in 0..n - 1 {
            for j in i + 1..n {
                if two_opt_delta(&current, problem, i, j) < -1e-10 {
                    current[i..=j].reverse();
                    improved = true;
                }
            }
        }
    }

    let dist = route_distance(&current, problem);
    (current, dist)
}

/// Distance change from reversing `route[i..=j]`.
///
/// Before: prev_i - route[i] ... route[j] - next_j
/// After:  prev_i - route[j] ... route[i] - next_j
fn two_opt_delta(route: &[usize], problem: &Problem, i: usize, j: usize) -> f64 {
    let n = route.len();
    let prev_i = if i == 0 { DEPOT } else { route[i - 1] };
    let next_j = if j == n - 1 { DEPOT } else { route[j + 1] };

    let old_cost = problem.distance(prev_i, route[i]) + problem.distance(route[j], next_j);
    let new_cost = problem.distance(prev_i, route[j]) + problem.distance(route[i], next_j);

    new_cost - old_cost
}

/// Distance of `depot → route[0] → … → route[n-1] → depot`; zero when empty.
pub fn route_distance(route: &[usize], problem: &Problem) -> f64 {
    let (Some(&first), Some(&last)) = (route.first(), route.last()) else {
        return 0.0;
    };
    let inner: f64 = route
        .windows(2)
        .map(|w| problem.distance(w[0], w[1]))
        .sum();
    problem.distance(DEPOT, first) + inner + problem.distance(last, DEPOT)
}
