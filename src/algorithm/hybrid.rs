//! Hybrid genetic search with elitism.
//!
//! Evolves giant tours (customer permutations). Each individual is decoded
//! through the split DP, intra-route 2-opt and charging-station repair, then
//! scored by distance plus weighted violation magnitude.
//!
//! initialization → evaluation → selection → crossover → mutation → elitism → repeat

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use crate::constructive::nearest_neighbor;
use crate::error::EvrpError;
use crate::ga::{order_crossover, tournament, GiantTour, GiantTourDecoder, HybridConfig, Mutation};
use crate::models::{Problem, Solution};

/// Best individual of one generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationStats {
    /// 0 for the initial population.
    pub generation: usize,
    pub best_fitness: f64,
    pub feasible: bool,
}

impl GenerationStats {
    fn of(generation: usize, best: &GiantTour) -> Self {
        Self {
            generation,
            best_fitness: best.fitness(),
            feasible: best.is_feasible(),
        }
    }

    /// `true` if `self` is at least as good as `other`: feasibility first,
    /// then fitness.
    pub fn no_worse_than(&self, other: &Self) -> bool {
        match (self.feasible, other.feasible) {
            (true, false) => true,
            (false, true) => false,
            _ => self.best_fitness <= other.best_fitness,
        }
    }
}

/// Lifecycle of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Uninitialized,
    Populated,
    Evolving { generation: usize },
    Terminated,
}

/// Population-based hybrid metaheuristic.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use evrp_search::algorithm::HybridMetaheuristic;
/// use evrp_search::ga::HybridConfig;
/// use evrp_search::models::{ElectricVehicle, Node, Problem};
///
/// let nodes = vec![
///     Node::depot(1, 0.0, 0.0),
///     Node::customer(2, 1.0, 0.0, 10),
///     Node::customer(3, 2.0, 0.0, 10),
///     Node::customer(4, 3.0, 0.0, 10),
/// ];
/// let problem = Arc::new(Problem::new(nodes, ElectricVehicle::new(30, 100.0, 1.0).unwrap()).unwrap());
///
/// let config = HybridConfig::default()
///     .with_population_size(10)
///     .with_generations(5)
///     .with_elite_size(2)
///     .with_seed(42);
/// let mut hma = HybridMetaheuristic::new(config);
/// hma.set_problem(problem.clone());
///
/// let solution = hma.run(false).unwrap();
/// assert!(problem.check_valid_solution(&solution));
/// assert!((solution.tour_length(&problem) - 6.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct HybridMetaheuristic {
    config: HybridConfig,
    problem: Option<Arc<Problem>>,
    rng: Option<StdRng>,
    population: Vec<GiantTour>,
    history: Vec<GenerationStats>,
    state: RunState,
}

impl HybridMetaheuristic {
    pub fn new(config: HybridConfig) -> Self {
        Self {
            config,
            problem: None,
            rng: None,
            population: Vec::new(),
            history: Vec::new(),
            state: RunState::Uninitialized,
        }
    }

    pub fn config(&self) -> &HybridConfig {
        &self.config
    }

    /// Binds the problem subsequent runs operate on. Drops run-scoped state.
    pub fn set_problem(&mut self, problem: Arc<Problem>) {
        self.problem = Some(problem);
        self.free();
    }

    pub fn problem(&self) -> Option<&Arc<Problem>> {
        self.problem.as_ref()
    }

    /// Best individual per generation of the last run, initial population first.
    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    /// Final population of the last run, best first.
    pub fn population(&self) -> &[GiantTour] {
        &self.population
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Runs the search and returns the best feasible solution seen, or the
    /// best infeasible one when no feasible solution was found.
    pub fn run(&mut self, verbose: bool) -> Result<Solution, EvrpError> {
        self.config.validate()?;
        let problem = self.problem.clone().ok_or(EvrpError::ProblemNotSet)?;
        let config = self.config.clone();

        self.free();
        let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or_else(rand::random));
        let decoder = GiantTourDecoder::new(&problem, config.penalty_weight)
            .with_local_search(config.local_search);

        // 1. Initialize and evaluate
        let mut population = initial_population(&problem, config.population_size, &mut rng);
        for ind in &mut population {
            decoder.evaluate(ind)?;
        }
        population.sort_by(GiantTour::rank_cmp);
        self.state = RunState::Populated;

        let mut best = population[0].clone();
        self.history.push(GenerationStats::of(0, &best));
        log_generation(verbose, problem.name(), &self.history[0]);

        // 2. Evolutionary loop
        for generation in 1..=config.generations {
            self.state = RunState::Evolving { generation };

            let mut next_gen: Vec<GiantTour> = population[..config.elite_size].to_vec();

            while next_gen.len() < config.population_size {
                let p1 = tournament(&population, config.tournament_size, &mut rng);
                let p2 = tournament(&population, config.tournament_size, &mut rng);

                let children = if rng.random_range(0.0..1.0) < config.crossover_prob {
                    let (c1, c2) = order_crossover(
                        population[p1].customers(),
                        population[p2].customers(),
                        &mut rng,
                    );
                    vec![c1, c2]
                } else {
                    vec![population[p1].customers().to_vec()]
                };

                for mut child in children {
                    if next_gen.len() >= config.population_size {
                        break;
                    }
                    if rng.random_range(0.0..1.0) < config.mutation_prob {
                        Mutation::apply(&mut child, &mut rng);
                    }
                    let mut child = GiantTour::new(child);
                    decoder.evaluate(&mut child)?;
                    next_gen.push(child);
                }
            }

            // Stable: ties keep elites ahead of offspring.
            next_gen.sort_by(GiantTour::rank_cmp);
            population = next_gen;

            if population[0].rank_cmp(&best).is_lt() {
                best = population[0].clone();
            }

            let stats = GenerationStats::of(generation, &population[0]);
            log_generation(verbose, problem.name(), &stats);
            self.history.push(stats);
        }

        let solution = decoder.decode(best.customers())?;
        info!(
            problem = problem.name(),
            length = solution.tour_length(&problem),
            feasible = best.is_feasible(),
            generations = config.generations,
            "hybrid search finished"
        );

        self.population = population;
        self.rng = Some(rng);
        self.state = RunState::Terminated;
        Ok(solution)
    }

    /// Clears population, history and random state. Configuration and the
    /// bound problem persist.
    pub fn free(&mut self) {
        self.population.clear();
        self.history.clear();
        self.rng = None;
        self.state = RunState::Uninitialized;
    }
}

/// One chromosome seeded from the greedy solution's visit order, the rest
/// random permutations of the customers.
fn initial_population(problem: &Problem, size: usize, rng: &mut StdRng) -> Vec<GiantTour> {
    let mut population = Vec::with_capacity(size);
    population.push(GiantTour::new(nearest_neighbor(problem).customers(problem)));

    let customers = problem.customers().to_vec();
    while population.len() < size {
        let mut perm = customers.clone();
        perm.shuffle(rng);
        population.push(GiantTour::new(perm));
    }
    population
}

fn log_generation(verbose: bool, problem: &str, stats: &GenerationStats) {
    if verbose {
        info!(
            problem,
            generation = stats.generation,
            best_fitness = stats.best_fitness,
            feasible = stats.feasible,
            "generation complete"
        );
    } else {
        debug!(
            problem,
            generation = stats.generation,
            best_fitness = stats.best_fitness,
            feasible = stats.feasible,
            "generation complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ElectricVehicle, Node};

    fn clustered() -> Arc<Problem> {
        let mut nodes = vec![Node::depot(1, 50.0, 50.0)];
        for i in 0..12 {
            let angle = i as f64 * std::f64::consts::TAU / 12.0;
            nodes.push(Node::customer(
                i + 2,
                50.0 + 30.0 * angle.cos(),
                50.0 + 30.0 * angle.sin(),
                7,
            ));
        }
        nodes.push(Node::charging_station(20, 80.0, 50.0));
        nodes.push(Node::charging_station(21, 20.0, 50.0));
        nodes.push(Node::charging_station(22, 50.0, 80.0));
        nodes.push(Node::charging_station(23, 50.0, 20.0));
        Arc::new(
            Problem::new(nodes, ElectricVehicle::new(30, 90.0, 1.0).expect("valid"))
                .expect("valid")
                .with_name("ring"),
        )
    }

    fn small_config() -> HybridConfig {
        HybridConfig::default()
            .with_population_size(20)
            .with_generations(15)
            .with_elite_size(4)
            .with_crossover_prob(0.5)
            .with_seed(42)
    }

    fn hma(config: HybridConfig) -> HybridMetaheuristic {
        let mut h = HybridMetaheuristic::new(config);
        h.set_problem(clustered());
        h
    }

    #[test]
    fn test_run_without_problem() {
        let mut h = HybridMetaheuristic::new(small_config());
        assert_eq!(h.run(false), Err(EvrpError::ProblemNotSet));
        assert_eq!(h.state(), RunState::Uninitialized);
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let mut h = hma(small_config().with_elite_size(20));
        assert!(matches!(h.run(false), Err(EvrpError::InvalidConfig(_))));
        assert!(h.history().is_empty());
    }

    #[test]
    fn test_run_without_elites_is_rejected() {
        let mut h = hma(small_config().with_elite_size(0));
        assert!(matches!(h.run(false), Err(EvrpError::InvalidConfig(_))));
        assert_eq!(h.state(), RunState::Uninitialized);
    }

    #[test]
    fn test_single_elite_never_regresses_across_seeds() {
        for seed in 0..8 {
            let config = HybridConfig::default()
                .with_population_size(10)
                .with_generations(20)
                .with_elite_size(1)
                .with_seed(seed);
            let mut h = hma(config);
            h.run(false).expect("runs");
            for pair in h.history().windows(2) {
                assert!(pair[1].no_worse_than(&pair[0]), "seed {seed}: {pair:?}");
            }
        }
    }

    #[test]
    fn test_population_stays_permutations() {
        let mut h = hma(small_config());
        h.run(false).expect("runs");
        let problem = clustered();
        assert_eq!(h.population().len(), 20);
        for ind in h.population() {
            let mut c = ind.customers().to_vec();
            c.sort_unstable();
            assert_eq!(c, problem.customers());
        }
    }

    #[test]
    fn test_elitism_never_regresses() {
        let mut h = hma(small_config());
        h.run(false).expect("runs");
        let history = h.history();
        assert_eq!(history.len(), 16);
        for pair in history.windows(2) {
            assert!(pair[1].no_worse_than(&pair[0]), "{pair:?}");
        }
    }

    #[test]
    fn test_returns_feasible_solution() {
        let problem = clustered();
        let mut h = hma(small_config());
        let solution = h.run(false).expect("runs");
        assert!(problem.check_valid_solution(&solution), "{:?}", problem.evaluate(&solution));
        let last = h.history().last().expect("history");
        assert!(last.feasible);
        assert!((solution.tour_length(&problem) - last.best_fitness).abs() < 1e-6);
    }

    #[test]
    fn test_seeded_runs_reproduce() {
        let mut a = hma(small_config());
        let mut b = hma(small_config());
        let sa = a.run(false).expect("runs");
        let sb = b.run(true).expect("runs");
        assert_eq!(sa, sb);
        assert_eq!(a.history(), b.history());
    }

    #[test]
    fn test_free_clears_run_state() {
        let mut h = hma(small_config());
        h.run(false).expect("runs");
        assert_eq!(h.state(), RunState::Terminated);
        assert!(!h.history().is_empty());

        h.free();
        assert_eq!(h.state(), RunState::Uninitialized);
        assert!(h.history().is_empty());
        assert!(h.population().is_empty());
        assert!(h.problem().is_some());
        assert_eq!(h.config().population_size, 20);
    }

    #[test]
    fn test_mutation_only_defaults_shape() {
        let config = HybridConfig::default()
            .with_population_size(8)
            .with_generations(3)
            .with_elite_size(2)
            .with_seed(3);
        assert_eq!(config.crossover_prob, 0.0);
        let mut h = hma(config);
        let solution = h.run(false).expect("runs");
        assert!(solution.is_depot_bounded());
    }

    #[test]
    fn test_no_customers() {
        let problem = Arc::new(
            Problem::new(
                vec![Node::depot(1, 0.0, 0.0), Node::charging_station(2, 1.0, 1.0)],
                ElectricVehicle::new(10, 10.0, 1.0).expect("valid"),
            )
            .expect("valid"),
        );
        let mut h = HybridMetaheuristic::new(small_config());
        h.set_problem(problem.clone());
        let solution = h.run(false).expect("runs");
        assert_eq!(solution.as_slice(), &[0, 0]);
        assert!(problem.check_valid_solution(&solution));
    }
}
