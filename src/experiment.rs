//! Repeated independent runs with summary statistics.

use serde::Serialize;
use tracing::info;

use crate::algorithm::SearchAlgorithm;
use crate::error::EvrpError;
use crate::models::Solution;

/// Outcome of [`run_trials`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialSummary {
    /// Tour length of every run, feasible or not, in run order.
    pub lengths: Vec<f64>,
    /// Tour lengths of the feasible runs only.
    pub feasible_lengths: Vec<f64>,
    /// Shortest feasible solution; the first one wins ties.
    pub best: Option<Solution>,
    /// Mean of `feasible_lengths`.
    pub mean: Option<f64>,
    /// Population standard deviation of `feasible_lengths`.
    pub std_dev: Option<f64>,
}

impl TrialSummary {
    pub fn runs(&self) -> usize {
        self.lengths.len()
    }

    pub fn best_length(&self) -> Option<f64> {
        self.feasible_lengths
            .iter()
            .copied()
            .min_by(f64::total_cmp)
    }
}

/// Runs `algorithm` `runs` times on its bound problem, validating each
/// solution and calling `free()` after every run.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use evrp_search::algorithm::SearchAlgorithm;
/// use evrp_search::experiment::run_trials;
/// use evrp_search::ga::HybridConfig;
/// use evrp_search::models::{ElectricVehicle, Node, Problem};
///
/// let nodes = vec![Node::depot(1, 0.0, 0.0), Node::customer(2, 3.0, 4.0, 5)];
/// let problem = Arc::new(Problem::new(nodes, ElectricVehicle::new(10, 20.0, 1.0).unwrap()).unwrap());
///
/// let mut algo = SearchAlgorithm::from_name("greedy", HybridConfig::default()).unwrap();
/// algo.set_problem(problem);
///
/// let summary = run_trials(&mut algo, 3, false).unwrap();
/// assert_eq!(summary.lengths, vec![10.0, 10.0, 10.0]);
/// assert_eq!(summary.mean, Some(10.0));
/// assert_eq!(summary.std_dev, Some(0.0));
/// ```
pub fn run_trials(
    algorithm: &mut SearchAlgorithm,
    runs: usize,
    verbose: bool,
) -> Result<TrialSummary, EvrpError> {
    let problem = algorithm.problem().cloned().ok_or(EvrpError::ProblemNotSet)?;

    let mut lengths = Vec::with_capacity(runs);
    let mut feasible_lengths = Vec::new();
    let mut best: Option<(f64, Solution)> = None;

    for run in 0..runs {
        let solution = algorithm.run(verbose)?;
        let length = solution.tour_length(&problem);
        let feasible = problem.check_valid_solution(&solution);
        info!(
            problem = problem.name(),
            algorithm = algorithm.name(),
            run,
            length,
            feasible,
            "trial finished"
        );

        lengths.push(length);
        if feasible {
            feasible_lengths.push(length);
            if best.as_ref().map_or(true, |(b, _)| length < *b) {
                best = Some((length, solution));
            }
        }
        algorithm.free();
    }

    let (mean, std_dev) = match mean_std(&feasible_lengths) {
        Some((m, s)) => (Some(m), Some(s)),
        None => (None, None),
    };

    Ok(TrialSummary {
        lengths,
        feasible_lengths,
        best: best.map(|(_, s)| s),
        mean,
        std_dev,
    })
}

/// Mean and population standard deviation; `None` for an empty sample.
fn mean_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some((mean, var.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::HybridConfig;
    use crate::models::{ElectricVehicle, Node, Problem};
    use std::sync::Arc;

    #[test]
    fn test_mean_std_population() {
        let (m, s) = mean_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).expect("non-empty");
        assert!((m - 5.0).abs() < 1e-12);
        assert!((s - 2.0).abs() < 1e-12);
        assert!(mean_std(&[]).is_none());
    }

    #[test]
    fn test_requires_problem() {
        let mut algo = SearchAlgorithm::from_name("greedy", HybridConfig::default()).expect("known");
        assert_eq!(run_trials(&mut algo, 2, false), Err(EvrpError::ProblemNotSet));
    }

    #[test]
    fn test_infeasible_runs_are_recorded_but_not_summarised() {
        // Demand above capacity: every run is infeasible.
        let problem = Arc::new(
            Problem::new(
                vec![Node::depot(1, 0.0, 0.0), Node::customer(2, 1.0, 0.0, 30)],
                ElectricVehicle::new(10, 10.0, 1.0).expect("valid"),
            )
            .expect("valid"),
        );
        let mut algo = SearchAlgorithm::from_name("greedy", HybridConfig::default()).expect("known");
        algo.set_problem(problem);
        let summary = run_trials(&mut algo, 2, false).expect("runs");
        assert_eq!(summary.runs(), 2);
        assert!(summary.feasible_lengths.is_empty());
        assert_eq!(summary.best, None);
        assert_eq!(summary.mean, None);
        assert_eq!(summary.best_length(), None);
    }

    #[test]
    fn test_hybrid_trials_free_between_runs() {
        let nodes = vec![
            Node::depot(1, 0.0, 0.0),
            Node::customer(2, 1.0, 0.0, 10),
            Node::customer(3, 2.0, 0.0, 10),
            Node::customer(4, 3.0, 0.0, 10),
        ];
        let problem = Arc::new(
            Problem::new(nodes, ElectricVehicle::new(30, 100.0, 1.0).expect("valid"))
                .expect("valid"),
        );
        let config = HybridConfig::default()
            .with_population_size(6)
            .with_generations(3)
            .with_elite_size(1);
        let mut algo = SearchAlgorithm::from_name("HMAGS", config).expect("known");
        algo.set_problem(problem);
        let summary = run_trials(&mut algo, 3, false).expect("runs");
        assert_eq!(summary.feasible_lengths.len(), 3);
        assert!((summary.best_length().expect("feasible") - 6.0).abs() < 1e-9);
        match &algo {
            SearchAlgorithm::Hybrid(h) => assert!(h.history().is_empty()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_summary_serializes() {
        let summary = TrialSummary {
            lengths: vec![1.0],
            feasible_lengths: vec![1.0],
            best: None,
            mean: Some(1.0),
            std_dev: Some(0.0),
        };
        let json = serde_json::to_value(&summary).expect("serialize");
        assert_eq!(json["mean"], 1.0);
    }
}
