//! Genetic algorithm components for electric vehicle routing.
//!
//! - [`GiantTour`]: permutation chromosome encoding all customers
//! - [`split`]: Prins (2004) split DP to partition a giant tour into routes
//! - [`GiantTourDecoder`]: split, 2-opt and charging repair into a [`Solution`](crate::models::Solution)
//! - [`order_crossover`], [`Mutation`]: permutation operators
//! - [`tournament`]: parent selection
//! - [`HybridConfig`]: hyperparameters of the evolutionary loop

mod chromosome;
mod config;
mod decoder;
pub mod operators;
mod selection;
pub mod split;

pub use chromosome::GiantTour;
pub use config::HybridConfig;
pub use decoder::GiantTourDecoder;
pub use operators::{insert_mutation, invert_mutation, order_crossover, swap_mutation, Mutation};
pub use selection::tournament;
pub use split::{split, SplitResult};
