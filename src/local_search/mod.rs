//! Local search used by the hybrid metaheuristic.
//!
//! - [`two_opt_improve`]: Intra-route 2-opt edge reversal

mod two_opt;

pub use two_opt::{route_distance, two_opt_improve};
