//! Split algorithm for partitioning a giant tour into vehicle tours.
//!
//! # Algorithm
//!
//! Given a giant tour (permutation of customers), finds the partition into
//! consecutive sub-routes that respects vehicle load capacity and minimizes
//! the total depot-to-depot distance.
//!
//! Models the problem as a shortest-path problem on an auxiliary graph where
//! node i represents the boundary after customer i, and edge (i, j) represents
//! serving customers i+1..=j in one route.
//!
//! Battery range is not modelled here; charging stations are inserted into
//! each route after the split.
//!
//! # Complexity
//!
//! O(n²) worst case, much less in practice due to capacity pruning.
//!
//! # Reference
//!
//! Prins, C. (2004). "A simple and effective evolutionary algorithm for the
//! vehicle routing problem", *Computers & Operations Research* 31(12), 1985-2002.

use crate::models::{Problem, DEPOT};

/// Result of the split algorithm.
#[derive(Debug, Clone)]
pub struct SplitResult {
    /// Routes as sequences of customer node indices.
    pub routes: Vec<Vec<usize>>,
    /// Total distance of all routes, without charging detours.
    pub total_distance: f64,
}

/// Splits a giant tour into capacity-feasible routes using dynamic programming.
///
/// A customer whose demand alone exceeds the capacity still gets a route of
/// its own; evaluation reports the overload.
///
/// # Examples
///
/// ```
/// use evrp_search::models::{ElectricVehicle, Node, Problem};
/// use evrp_search::ga::split;
///
/// let nodes = vec![
///     Node::depot(1, 0.0, 0.0),
///     Node::customer(2, 1.0, 0.0, 10),
///     Node::customer(3, 2.0, 0.0, 10),
///     Node::customer(4, 3.0, 0.0, 10),
/// ];
/// let problem = Problem::new(nodes, ElectricVehicle::new(30, 100.0, 1.0).unwrap()).unwrap();
///
/// let result = split(&[1, 2, 3], &problem);
/// assert_eq!(result.routes.len(), 1);
/// assert!((result.total_distance - 6.0).abs() < 1e-10);
/// ```
pub fn split(tour: &[usize], problem: &Problem) -> SplitResult {
    let n = tour.len();
    if n == 0 {
        return SplitResult {
            routes: vec![],
            total_distance: 0.0,
        };
    }

    let capacity = problem.vehicle().capacity();

    // cost[i] = minimum distance to serve tour[0..i]
    // pred[i] = start of the last route ending at i
    let mut cost = vec![f64::INFINITY; n + 1];
    let mut pred = vec![0usize; n + 1];
    cost[0] = 0.0;

    for i in 0..n {
        if cost[i] == f64::INFINITY {
            continue;
        }

        let mut load = 0i32;
        let mut route_dist = 0.0;

        for j in i..n {
            let cid = tour[j];
            load += problem.demand(cid);
            if load > capacity && j > i {
                break;
            }

            if j == i {
                route_dist = problem.distance(DEPOT, cid);
            } else {
                route_dist += problem.distance(tour[j - 1], cid);
            }

            let new_cost = cost[i] + route_dist + problem.distance(cid, DEPOT);
            if new_cost < cost[j + 1] {
                cost[j + 1] = new_cost;
                pred[j + 1] = i;
            }
        }
    }

    let mut routes = Vec::new();
    let mut j = n;
    while j > 0 {
        let i = pred[j];
        routes.push(tour[i..j].to_vec());
        j = i;
    }
    routes.reverse();

    SplitResult {
        routes,
        total_distance: cost[n],
    }
}
