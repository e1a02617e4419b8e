//! Distance matrix.
//!
//! Pairwise node distances are computed once per problem instance and read
//! from the hot evaluation loops.

mod matrix;

pub use matrix::DistanceMatrix;
