//! Problem definitions: start state, goal test, bounds, heuristic and
//! successor generation.
//!
//! The search engines only see the [`Problem`] trait. Two problems ship with
//! the crate, selected at runtime through [`EconomyModel`]:
//!
//! - [`ProductionChainProblem`] - reach a number of upgraded pulsers.
//! - [`GeneratorGoalProblem`] - reach a generator count per currency.

mod generator_goal;
mod production_chain;

pub use generator_goal::GeneratorGoalProblem;
pub use production_chain::ProductionChainProblem;

use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::data::GameConstants;
use crate::economy::{gather_until, Currency, Economy, Resource, Tick};
use crate::error::Result;
use crate::node::SearchNode;

/// Cost reported for states that can never reach the goal.
///
/// Kept well below `Tick::MAX` so `elapsed + UNREACHABLE` cannot overflow.
pub const UNREACHABLE: Tick = Tick::MAX / 4;

/// Which lower bound the heuristic reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeuristicMode {
    /// Always 0 (blind search).
    Zero,
    /// Construction-time floor only.
    BuildTime,
    /// Maximum of the construction floor and the gathering bound.
    #[default]
    Combined,
}

/// Which goal the planner works towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EconomyModel {
    /// Full production chain: foundation, depot, vecgirs, pulsers, upgrades.
    ProductionChain {
        /// Upgraded pulsers (finished or in progress) required.
        pulser_goal: u32,
    },
    /// Generator counts only.
    Generators {
        /// LC generators required, including those under construction.
        lc_target: u32,
        /// QP generators required, including those under construction.
        qp_target: u32,
    },
}

impl Default for EconomyModel {
    fn default() -> Self {
        Self::ProductionChain { pulser_goal: 2 }
    }
}

/// A search problem over economy states.
pub trait Problem {
    /// Key identifying states in the closed set.
    type Key: Eq + Hash;

    /// The root node.
    fn start_node(&self) -> SearchNode;

    /// Goal test.
    fn is_goal(&self, node: &SearchNode) -> bool;

    /// Elapsed time of a known (usually poor) plan, plus one tick.
    fn upper_bound(&self) -> Result<Tick>;

    /// Lower bound on the remaining time from `node` to a goal.
    fn heuristic(&self, node: &SearchNode) -> Result<Tick>;

    /// Call `visitor` with every guarded successor of `node`, in a fixed
    /// order.
    fn visit_neighbors(
        &self,
        node: &SearchNode,
        visitor: &mut dyn FnMut(SearchNode) -> Result<()>,
    ) -> Result<()>;

    /// Closed-set key of a node.
    fn closed_key(&self, node: &SearchNode) -> Self::Key;

    /// All successors of `node` in visiting order.
    fn successors(&self, node: &SearchNode) -> Result<Vec<SearchNode>> {
        let mut children = Vec::new();
        self.visit_neighbors(node, &mut |child| {
            children.push(child);
            Ok(())
        })?;
        Ok(children)
    }
}

/// Apply `action` to `node` and hand the result to `visitor` if the guard
/// holds.
pub(crate) fn try_visit(
    action: Action,
    node: &SearchNode,
    constants: &GameConstants,
    visitor: &mut dyn FnMut(SearchNode) -> Result<()>,
) -> Result<()> {
    match action.check(node, constants) {
        Some(applicable) => visitor(applicable.apply()?),
        None => Ok(()),
    }
}

/// Apply a fixed sequence of actions, or `None` as soon as one is not
/// applicable.
pub(crate) fn run_plan(
    start: SearchNode,
    plan: impl IntoIterator<Item = Action>,
    constants: &GameConstants,
) -> Result<Option<SearchNode>> {
    let mut node = start;
    for action in plan {
        let Some(applicable) = action.check(&node, constants) else {
            return Ok(None);
        };
        node = applicable.apply()?;
    }
    Ok(Some(node))
}

/// Ticks until the LC stock of `economy` reaches `target`, or
/// [`UNREACHABLE`] if it never will.
fn time_to_lc(economy: &Economy, target: Resource, constants: &GameConstants) -> Result<Tick> {
    let mut scratch = economy.clone();
    Ok(gather_until(&mut scratch, Currency::Lc, target, constants)?.unwrap_or(UNREACHABLE))
}

/// Optimistic bound on the time needed to hold `lc_cost` LC.
///
/// Every QP generator is treated as if it had just been switched to LC.
/// Starting from that mix, LC generators are bought one at a time for as
/// long as each purchase strictly shortens the gathering time. The time spent
/// saving up for a purchase is not charged.
///
/// # Errors
///
/// Only fails if the simulator rejects an advance.
pub fn min_time_to_gather(
    economy: &Economy,
    lc_cost: Resource,
    constants: &GameConstants,
) -> Result<Tick> {
    if economy.stock(Currency::Lc) >= lc_cost {
        return Ok(0);
    }

    let mut relaxed = economy.clone();
    let converted = relaxed.generators_mut(Currency::Qp).clear();
    for _ in 0..converted {
        relaxed
            .generators_mut(Currency::Lc)
            .push_under_construction(constants.generator_switch_time);
    }

    let mut node = SearchNode::root(relaxed);
    let mut best = time_to_lc(node.economy(), lc_cost, constants)?;
    while let Some(purchase) = Action::BuildGenerator(Currency::Lc).check(&node, constants) {
        let next = purchase.apply()?;
        let time = time_to_lc(next.economy(), lc_cost, constants)?;
        if time >= best {
            break;
        }
        best = time;
        node = next;
    }
    Ok(best)
}

/// Earliest tick by which `count` more generators can all have been bought.
///
/// Relaxation: every QP generator produces LC once it has finished any
/// remaining construction and sat out the switch time, and every purchase is
/// an LC generator bought the moment its price is in stock. Buying as early
/// as possible is never slower, and the relaxed economy always holds at
/// least as much LC as the real one, so the result never exceeds the real
/// time of the last purchase.
///
/// Returns [`UNREACHABLE`] if the first purchase can never be paid for.
///
/// # Errors
///
/// Only fails if the simulator rejects an advance.
pub fn min_time_to_buy_generators(
    economy: &Economy,
    count: u32,
    constants: &GameConstants,
) -> Result<Tick> {
    let mut relaxed = economy.clone();
    let qp_timers = relaxed.generators(Currency::Qp).timers().to_vec();
    relaxed.generators_mut(Currency::Qp).clear();
    for timer in qp_timers {
        relaxed
            .generators_mut(Currency::Lc)
            .push_under_construction(constants.generator_switch_time - timer.min(0));
    }

    let mut node = SearchNode::root(relaxed);
    for _ in 0..count {
        let Some(purchase) = Action::BuildGenerator(Currency::Lc).check(&node, constants) else {
            return Ok(UNREACHABLE);
        };
        node = purchase.apply()?;
    }
    Ok(node.elapsed())
}
