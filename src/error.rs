//! Error type shared across the crate.

use std::fmt;

/// Errors raised while building problems, configuring algorithms, or
/// manipulating solutions.
///
/// Infeasible solutions are not errors: they are reported through
/// [`Evaluation`](crate::evaluation::Evaluation) violations. A solution that
/// is not depot-bounded yields `None` from
/// [`Solution::vehicle_tours`](crate::models::Solution::vehicle_tours).
#[derive(Debug, Clone, PartialEq)]
pub enum EvrpError {
    /// The node list is empty.
    EmptyProblem,
    /// Node 0 is not a depot.
    MissingDepot,
    /// More than one depot in the node list.
    MultipleDepots {
        /// Index of the second depot found.
        index: usize,
    },
    /// Vehicle parameters are out of range.
    InvalidVehicle(String),
    /// A node carries data inconsistent with its kind.
    InvalidNode {
        /// Position in the node table.
        index: usize,
        /// What is wrong with it.
        reason: String,
    },
    /// Algorithm name not recognised.
    UnknownAlgorithm(String),
    /// Hyperparameters failed validation.
    InvalidConfig(String),
    /// `run` was called before `set_problem`.
    ProblemNotSet,
    /// Position past the end of a solution sequence.
    IndexOutOfBounds {
        /// Requested position.
        index: usize,
        /// Sequence length.
        len: usize,
    },
    /// A vehicle tour does not start and end at the depot.
    MalformedTour {
        /// Position of the offending tour.
        tour_index: usize,
    },
}

impl fmt::Display for EvrpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvrpError::EmptyProblem => write!(f, "problem has no nodes"),
            EvrpError::MissingDepot => write!(f, "node 0 must be the depot"),
            EvrpError::MultipleDepots { index } => {
                write!(f, "only one depot allowed, found another at index {index}")
            }
            EvrpError::InvalidVehicle(msg) => write!(f, "invalid vehicle: {msg}"),
            EvrpError::InvalidNode { index, reason } => {
                write!(f, "invalid node at index {index}: {reason}")
            }
            EvrpError::UnknownAlgorithm(name) => write!(f, "invalid algorithm {name}"),
            EvrpError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            EvrpError::ProblemNotSet => write!(f, "no problem bound to the algorithm"),
            EvrpError::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for solution of length {len}")
            }
            EvrpError::MalformedTour { tour_index } => {
                write!(f, "vehicle tour {tour_index} must start and end at the depot")
            }
        }
    }
}

impl std::error::Error for EvrpError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            EvrpError::UnknownAlgorithm("ACO".into()).to_string(),
            "invalid algorithm ACO"
        );
        assert_eq!(
            EvrpError::IndexOutOfBounds { index: 5, len: 3 }.to_string(),
            "index 5 out of bounds for solution of length 3"
        );
    }

    #[test]
    fn test_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(EvrpError::ProblemNotSet);
        assert!(err.to_string().contains("no problem"));
    }
}
