//! Test fixtures and helpers.
//!
//! Pre-built economies and problems for consistent testing.

use planner_core::data::{GameConstants, PlannerConfig};
use planner_core::economy::{Currency, Economy, GeneratorTimers, Producible, Resource, Tick};
use planner_core::problem::{
    EconomyModel, GeneratorGoalProblem, HeuristicMode, ProductionChainProblem,
};
use planner_core::search::Strategy;

/// Optimal finishing time of [`minimal_problem`]: one LC cycle.
pub const MINIMAL_OPTIMUM: Tick = 268;

/// The shipped balance table.
#[must_use]
pub fn constants() -> GameConstants {
    GameConstants::default()
}

/// The starting economy of the shipped balance table.
#[must_use]
pub fn starting_economy() -> Economy {
    Economy::from_constants(&constants())
}

/// An economy with the given stocks and LC generator timers.
#[must_use]
pub fn lc_economy(lc: Resource, qp: Resource, timers: Vec<Tick>) -> Economy {
    Economy::new(lc, qp).with_generators(Currency::Lc, GeneratorTimers::from_timers(timers))
}

/// Plenty of both currencies and a finished depot, but no generators.
#[must_use]
pub fn depot_economy(lc: Resource, qp: Resource) -> Economy {
    let mut economy = Economy::new(lc, qp);
    economy.add_completed(Producible::Depot, 1);
    economy
}

/// Reach `lc_target` LC and `qp_target` QP generators from the shipped start.
#[must_use]
pub fn generator_problem(
    lc_target: u32,
    qp_target: u32,
    heuristic: HeuristicMode,
) -> GeneratorGoalProblem {
    GeneratorGoalProblem::new(constants(), lc_target, qp_target, heuristic)
        .expect("shipped balance is valid")
}

/// Three LC generators must grow one QP generator.
///
/// Small enough for every engine even without a heuristic.
#[must_use]
pub fn minimal_problem(heuristic: HeuristicMode) -> GeneratorGoalProblem {
    generator_problem(3, 1, heuristic)
}

/// The full production chain with the shipped balance.
#[must_use]
pub fn chain_problem(pulser_goal: u32, heuristic: HeuristicMode) -> ProductionChainProblem {
    ProductionChainProblem::new(constants(), pulser_goal, heuristic)
        .expect("shipped balance fields this many pulsers")
}

/// A planner configuration for the minimal generator goal.
#[must_use]
pub fn minimal_config(strategy: Strategy, heuristic: HeuristicMode) -> PlannerConfig {
    PlannerConfig {
        model: EconomyModel::Generators {
            lc_target: 3,
            qp_target: 1,
        },
        strategy,
        heuristic,
        ..PlannerConfig::default()
    }
}
