//! # evrp-search
//!
//! Electric vehicle routing: a fleet of battery-powered vehicles serves
//! customer demands from a single depot under load capacity and battery
//! range limits, detouring through charging stations to recharge.
//!
//! Solutions use a flat encoding: one sequence of node indices in which every
//! depot occurrence closes the current vehicle tour and opens the next.
//!
//! ## Modules
//!
//! - [`models`]: Domain model types (Node, ElectricVehicle, Problem, Solution)
//! - [`distance`]: Dense distance matrix
//! - [`evaluation`]: Load and battery simulation, violations, charging repair
//! - [`constructive`]: Nearest-neighbor construction with charging detours
//! - [`local_search`]: Intra-route 2-opt
//! - [`ga`]: Giant tour encoding, Prins split, permutation operators
//! - [`algorithm`]: Greedy and hybrid genetic searches
//! - [`experiment`]: Repeated runs with summary statistics
//! - [`error`]: Crate error type

pub mod algorithm;
pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod experiment;
pub mod ga;
pub mod local_search;
pub mod models;

pub use error::EvrpError;
