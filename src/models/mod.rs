//! Domain model types for electric vehicle routing problems.
//!
//! Provides nodes (depot, customers, charging stations), the electric fleet
//! parameters, the problem instance that ties them together, and the flat
//! tour encoding used by every search algorithm.

mod node;
mod problem;
mod solution;
mod vehicle;

pub use node::{Node, NodeKind};
pub use problem::{Problem, DEPOT};
pub use solution::{Solution, Violation, ViolationType};
pub use vehicle::ElectricVehicle;
