//! Feasibility checking, fitness evaluation, and charging-station repair.

mod charging;
mod evaluator;

pub use charging::{can_reach, detour_station, insert_charging_stations, plan_detours};
pub use evaluator::{evaluate, Evaluation, TourEvaluator, TourStats};
