//! Constructive heuristics for building initial EVRP solutions.
//!
//! - [`nearest_neighbor`]: Greedy nearest-neighbor with charging detours, O(n²)

mod nearest_neighbor;

pub use nearest_neighbor::nearest_neighbor;
