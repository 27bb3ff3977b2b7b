use crate::actions::Action;
use crate::data::GameConstants;
use crate::economy::{Currency, Economy, Producible, Resource, Tick};
use crate::error::{PlannerError, Result};
use crate::node::SearchNode;

use super::{min_time_to_gather, run_plan, try_visit, HeuristicMode, Problem, UNREACHABLE};

/// Reach `pulser_goal` upgraded pulsers as fast as possible.
///
/// A single depot fields up to `units_per_depot` units, which covers every
/// goal this problem is meant for, so once a depot exists no further
/// foundation or depot is considered.
#[derive(Debug, Clone)]
pub struct ProductionChainProblem {
    constants: GameConstants,
    pulser_goal: u32,
    heuristic: HeuristicMode,
}

impl ProductionChainProblem {
    /// Create a problem starting from the balance table's initial economy.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::InvalidConfig`] if `constants` fails
    /// validation or one depot cannot field `pulser_goal` units.
    pub fn new(
        constants: GameConstants,
        pulser_goal: u32,
        heuristic: HeuristicMode,
    ) -> Result<Self> {
        constants.validate()?;
        if pulser_goal > constants.units_per_depot {
            return Err(PlannerError::InvalidConfig(format!(
                "pulser_goal {pulser_goal} exceeds the {} units one depot supports",
                constants.units_per_depot
            )));
        }
        Ok(Self {
            constants,
            pulser_goal,
            heuristic,
        })
    }

    /// Balance table in use.
    #[must_use]
    pub const fn constants(&self) -> &GameConstants {
        &self.constants
    }

    /// Upgraded pulsers required.
    #[must_use]
    pub const fn pulser_goal(&self) -> u32 {
        self.pulser_goal
    }

    fn missing(&self, kind: Producible, economy: &Economy) -> u32 {
        self.pulser_goal.saturating_sub(economy.produced(kind))
    }

    /// Construction time that must still pass and the LC that must still be
    /// spent, ignoring income.
    fn construction_floor(&self, economy: &Economy) -> (Tick, Resource) {
        let constants = &self.constants;
        let mut build_wait: Tick = 0;
        let mut lc_cost: Resource = 0;

        if economy.completed(Producible::Depot) == 0 {
            if let Some(remaining) = economy.queue(Producible::Depot).time_to_next_completion() {
                build_wait += remaining;
            } else {
                if !economy.has(Producible::Foundation) {
                    build_wait += constants.foundation.time;
                    lc_cost += constants.foundation.cost.lc;
                }
                build_wait += constants.depot.time;
                lc_cost += constants.depot.cost.lc;
            }
        }

        lc_cost += constants.upgrade.cost.lc * self.missing(Producible::UpgradedPulser, economy);

        let missing_pulsers = self.missing(Producible::Pulser, economy);
        if missing_pulsers > 0 {
            lc_cost += constants.pulser.cost.lc * missing_pulsers;
            build_wait += constants.pilot_time();
        }

        lc_cost += constants.vecgir.cost.lc * self.missing(Producible::Vecgir, economy);

        (build_wait, lc_cost)
    }
}

impl Problem for ProductionChainProblem {
    type Key = Economy;

    fn start_node(&self) -> SearchNode {
        SearchNode::root(Economy::from_constants(&self.constants))
    }

    fn is_goal(&self, node: &SearchNode) -> bool {
        node.economy().produced(Producible::UpgradedPulser) >= self.pulser_goal
    }

    fn upper_bound(&self) -> Result<Tick> {
        let goal = self.pulser_goal as usize;
        let plan = [
            Action::BuildGenerator(Currency::Qp),
            Action::BuildFoundation,
            Action::BuildDepot,
        ]
        .into_iter()
        .chain(std::iter::repeat(Action::BuildPulser).take(goal))
        .chain(std::iter::repeat(Action::UpgradePulser).take(goal));

        Ok(run_plan(self.start_node(), plan, &self.constants)?
            .filter(|node| self.is_goal(node))
            .map_or(UNREACHABLE, |node| node.elapsed() + 1))
    }

    fn heuristic(&self, node: &SearchNode) -> Result<Tick> {
        if self.heuristic == HeuristicMode::Zero || self.is_goal(node) {
            return Ok(0);
        }
        let (build_wait, lc_cost) = self.construction_floor(node.economy());
        if self.heuristic == HeuristicMode::BuildTime {
            return Ok(build_wait);
        }
        let gather = min_time_to_gather(node.economy(), lc_cost, &self.constants)?;
        Ok(build_wait.max(gather))
    }

    fn visit_neighbors(
        &self,
        node: &SearchNode,
        visitor: &mut dyn FnMut(SearchNode) -> Result<()>,
    ) -> Result<()> {
        let constants = &self.constants;
        let economy = node.economy();

        if !economy.has(Producible::Depot) {
            if !economy.has(Producible::Foundation) {
                try_visit(Action::BuildFoundation, node, constants, visitor)?;
            }
            try_visit(Action::BuildDepot, node, constants, visitor)?;
        }

        try_visit(Action::BuildVecgir, node, constants, visitor)?;
        // A spare vecgir is better piloted than paid for twice.
        if economy.completed(Producible::Vecgir) <= 1 {
            try_visit(Action::BuildPulser, node, constants, visitor)?;
        }
        try_visit(Action::PilotPulser, node, constants, visitor)?;
        try_visit(Action::UpgradePulser, node, constants, visitor)?;

        for currency in Currency::ALL {
            try_visit(Action::BuildGenerator(currency), node, constants, visitor)?;
        }
        for from in Currency::ALL {
            try_visit(Action::SwitchGenerator { from }, node, constants, visitor)?;
        }
        Ok(())
    }

    fn closed_key(&self, node: &SearchNode) -> Economy {
        node.economy().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(mode: HeuristicMode) -> ProductionChainProblem {
        ProductionChainProblem::new(GameConstants::default(), 2, mode).unwrap()
    }

    fn neighbor_actions(problem: &ProductionChainProblem, node: &SearchNode) -> Vec<Action> {
        problem
            .successors(node)
            .unwrap()
            .iter()
            .filter_map(SearchNode::action)
            .collect()
    }

    #[test]
    fn test_start_neighbors_in_fixed_order() {
        let problem = problem(HeuristicMode::Combined);
        let start = problem.start_node();

        assert_eq!(
            neighbor_actions(&problem, &start),
            vec![
                Action::BuildFoundation,
                Action::BuildGenerator(Currency::Lc),
                Action::BuildGenerator(Currency::Qp),
                Action::SwitchGenerator { from: Currency::Lc },
            ]
        );
    }

    #[test]
    fn test_no_second_foundation_or_depot() {
        let problem = problem(HeuristicMode::Combined);
        let mut economy = Economy::new(1000, 1000);
        economy.add_completed(Producible::Depot, 1);
        let node = SearchNode::root(economy);

        let actions = neighbor_actions(&problem, &node);
        assert!(!actions.contains(&Action::BuildFoundation));
        assert!(!actions.contains(&Action::BuildDepot));
        assert_eq!(
            actions,
            vec![
                Action::BuildVecgir,
                Action::BuildPulser,
                Action::BuildGenerator(Currency::Lc),
                Action::BuildGenerator(Currency::Qp),
            ]
        );
    }

    #[test]
    fn test_direct_pulser_skipped_with_spare_vecgirs() {
        let problem = problem(HeuristicMode::Combined);
        let mut economy = Economy::new(1000, 1000);
        economy.add_completed(Producible::Depot, 1);
        economy.add_completed(Producible::Vecgir, 2);
        let node = SearchNode::root(economy);

        let actions = neighbor_actions(&problem, &node);
        assert!(!actions.contains(&Action::BuildPulser));
        assert!(actions.contains(&Action::PilotPulser));
    }

    #[test]
    fn test_goal_counts_queued_upgrades() {
        let problem = problem(HeuristicMode::Combined);
        let mut economy = Economy::new(0, 0);
        economy.add_completed(Producible::UpgradedPulser, 1);
        economy.enqueue(Producible::UpgradedPulser, 100);
        let node = SearchNode::root(economy);

        assert!(problem.is_goal(&node));
        assert_eq!(problem.heuristic(&node).unwrap(), 0);
    }

    #[test]
    fn test_heuristic_modes() {
        let constants = GameConstants::default();
        let start = problem(HeuristicMode::Zero).start_node();

        assert_eq!(problem(HeuristicMode::Zero).heuristic(&start).unwrap(), 0);

        let floor = problem(HeuristicMode::BuildTime).heuristic(&start).unwrap();
        assert_eq!(
            floor,
            constants.foundation.time + constants.depot.time + constants.pilot_time()
        );

        let combined = problem(HeuristicMode::Combined).heuristic(&start).unwrap();
        assert!(combined >= floor);
    }

    #[test]
    fn test_heuristic_uses_queued_depot() {
        let constants = GameConstants::default();
        let problem = problem(HeuristicMode::BuildTime);
        let mut economy = Economy::new(0, 0);
        economy.enqueue(Producible::Depot, 300);
        let node = SearchNode::root(economy);

        assert_eq!(
            problem.heuristic(&node).unwrap(),
            300 + constants.pilot_time()
        );
    }

    #[test]
    fn test_upper_bound_is_a_reachable_plan() {
        let problem = problem(HeuristicMode::Combined);
        let bound = problem.upper_bound().unwrap();
        assert!(bound > 0);
        assert!(bound < UNREACHABLE);
        assert!(problem.heuristic(&problem.start_node()).unwrap() < bound);
    }

    #[test]
    fn test_upper_bound_unreachable_without_income() {
        let constants = GameConstants {
            initial_lc_generators: 0,
            initial_lc: 0,
            ..GameConstants::default()
        };
        let problem = ProductionChainProblem::new(constants, 1, HeuristicMode::Combined).unwrap();
        assert_eq!(problem.upper_bound().unwrap(), UNREACHABLE);
    }

    #[test]
    fn test_rejects_goal_beyond_one_depot() {
        let constants = GameConstants::default();
        let goal = constants.units_per_depot + 1;
        assert!(matches!(
            ProductionChainProblem::new(constants, goal, HeuristicMode::Combined),
            Err(PlannerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_zero_yield() {
        let mut constants = GameConstants::default();
        constants.lc_generator.yield_size = 0;
        assert!(ProductionChainProblem::new(constants, 1, HeuristicMode::Zero).is_err());
    }
}
