//! Node types: depot, customers, and charging stations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The role a node plays in an EVRP instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Start and end of every vehicle tour. Recharges the battery.
    Depot,
    /// Demand point that must be visited exactly once.
    Customer,
    /// Recharges the battery to full. May be visited any number of times.
    ChargingStation,
}

/// A location in a routing problem.
///
/// `id` is the identifier carried by the dataset; the node's position in the
/// [`Problem`](super::Problem) node table is what solutions store.
///
/// # Examples
///
/// ```
/// use evrp_search::models::{Node, NodeKind};
///
/// let depot = Node::depot(1, 35.0, 35.0);
/// assert!(depot.is_depot());
/// assert_eq!(depot.demand(), 0);
///
/// let c = Node::customer(2, 41.0, 49.0, 10);
/// assert_eq!(c.kind(), NodeKind::Customer);
/// assert_eq!(c.demand(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: usize,
    x: f64,
    y: f64,
    kind: NodeKind,
    demand: i32,
}

impl Node {
    /// Creates a node of any kind.
    pub fn new(id: usize, x: f64, y: f64, kind: NodeKind, demand: i32) -> Self {
        Self {
            id,
            x,
            y,
            kind,
            demand,
        }
    }

    /// Creates the depot (zero demand).
    pub fn depot(id: usize, x: f64, y: f64) -> Self {
        Self::new(id, x, y, NodeKind::Depot, 0)
    }

    /// Creates a customer with the given demand.
    pub fn customer(id: usize, x: f64, y: f64, demand: i32) -> Self {
        Self::new(id, x, y, NodeKind::Customer, demand)
    }

    /// Creates a charging station (zero demand).
    pub fn charging_station(id: usize, x: f64, y: f64) -> Self {
        Self::new(id, x, y, NodeKind::ChargingStation, 0)
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn demand(&self) -> i32 {
        self.demand
    }

    pub fn is_depot(&self) -> bool {
        self.kind == NodeKind::Depot
    }

    pub fn is_customer(&self) -> bool {
        self.kind == NodeKind::Customer
    }

    pub fn is_charging_station(&self) -> bool {
        self.kind == NodeKind::ChargingStation
    }

    /// Returns `true` if the battery is refilled on arrival (depot or station).
    pub fn recharges(&self) -> bool {
        !self.is_customer()
    }

    /// Euclidean distance to another node.
    pub fn distance_to(&self, other: &Node) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
