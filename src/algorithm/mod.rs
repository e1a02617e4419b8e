//! Search algorithms behind a common run/free lifecycle.
//!
//! - [`GreedySearch`]: deterministic nearest-neighbor baseline
//! - [`HybridMetaheuristic`]: genetic search over giant tours with elitism

mod greedy;
mod hybrid;

use std::sync::Arc;

pub use greedy::GreedySearch;
pub use hybrid::{GenerationStats, HybridMetaheuristic, RunState};

use crate::error::EvrpError;
use crate::ga::HybridConfig;
use crate::models::{Problem, Solution};

/// The closed set of search algorithms.
///
/// # Examples
///
/// ```
/// use evrp_search::algorithm::SearchAlgorithm;
/// use evrp_search::error::EvrpError;
/// use evrp_search::ga::HybridConfig;
///
/// let algo = SearchAlgorithm::from_name("HMAGS", HybridConfig::default()).unwrap();
/// assert_eq!(algo.name(), "HMAGS");
///
/// let err = SearchAlgorithm::from_name("Tabu", HybridConfig::default()).unwrap_err();
/// assert_eq!(err, EvrpError::UnknownAlgorithm("Tabu".into()));
/// ```
#[derive(Debug, Clone)]
pub enum SearchAlgorithm {
    Greedy(GreedySearch),
    Hybrid(HybridMetaheuristic),
}

impl SearchAlgorithm {
    /// Builds an algorithm by name, case-insensitively: `"GreedySearch"` or
    /// `"greedy"`, `"HMAGS"` or `"hybrid"`. `config` only applies to the
    /// hybrid search.
    pub fn from_name(name: &str, config: HybridConfig) -> Result<Self, EvrpError> {
        match name.to_ascii_lowercase().as_str() {
            "greedysearch" | "greedy" => Ok(SearchAlgorithm::Greedy(GreedySearch::new())),
            "hmags" | "hybrid" => Ok(SearchAlgorithm::Hybrid(HybridMetaheuristic::new(config))),
            _ => Err(EvrpError::UnknownAlgorithm(name.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SearchAlgorithm::Greedy(_) => "GreedySearch",
            SearchAlgorithm::Hybrid(_) => "HMAGS",
        }
    }

    pub fn set_problem(&mut self, problem: Arc<Problem>) {
        match self {
            SearchAlgorithm::Greedy(g) => g.set_problem(problem),
            SearchAlgorithm::Hybrid(h) => h.set_problem(problem),
        }
    }

    pub fn problem(&self) -> Option<&Arc<Problem>> {
        match self {
            SearchAlgorithm::Greedy(g) => g.problem(),
            SearchAlgorithm::Hybrid(h) => h.problem(),
        }
    }

    /// Runs one search on the bound problem.
    pub fn run(&mut self, verbose: bool) -> Result<Solution, EvrpError> {
        match self {
            SearchAlgorithm::Greedy(g) => g.run(verbose),
            SearchAlgorithm::Hybrid(h) => h.run(verbose),
        }
    }

    /// Releases run-scoped state so the next run starts fresh.
    pub fn free(&mut self) {
        match self {
            SearchAlgorithm::Greedy(g) => g.free(),
            SearchAlgorithm::Hybrid(h) => h.free(),
        }
    }
}

impl From<GreedySearch> for SearchAlgorithm {
    fn from(g: GreedySearch) -> Self {
        SearchAlgorithm::Greedy(g)
    }
}

impl From<HybridMetaheuristic> for SearchAlgorithm {
    fn from(h: HybridMetaheuristic) -> Self {
        SearchAlgorithm::Hybrid(h)
    }
}
