use crate::actions::Action;
use crate::data::GameConstants;
use crate::economy::{Currency, Economy, Tick};
use crate::error::Result;
use crate::node::SearchNode;

use super::{min_time_to_buy_generators, run_plan, try_visit, HeuristicMode, Problem, UNREACHABLE};

/// Reach a number of generators per currency as fast as possible.
///
/// Generators under construction count towards the targets.
#[derive(Debug, Clone)]
pub struct GeneratorGoalProblem {
    constants: GameConstants,
    start: Economy,
    lc_target: u32,
    qp_target: u32,
    heuristic: HeuristicMode,
}

impl GeneratorGoalProblem {
    /// Create a problem starting from the balance table's initial economy.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::InvalidConfig`](crate::error::PlannerError::InvalidConfig)
    /// if `constants` fails validation.
    pub fn new(
        constants: GameConstants,
        lc_target: u32,
        qp_target: u32,
        heuristic: HeuristicMode,
    ) -> Result<Self> {
        constants.validate()?;
        Ok(Self {
            start: Economy::from_constants(&constants),
            constants,
            lc_target,
            qp_target,
            heuristic,
        })
    }

    /// Start from a custom economy instead.
    #[must_use]
    pub fn with_start(mut self, start: Economy) -> Self {
        self.start = start;
        self
    }

    /// Balance table in use.
    #[must_use]
    pub const fn constants(&self) -> &GameConstants {
        &self.constants
    }

    fn missing(&self, economy: &Economy, currency: Currency) -> u32 {
        let target = match currency {
            Currency::Lc => self.lc_target,
            Currency::Qp => self.qp_target,
        };
        target.saturating_sub(economy.generators(currency).len() as u32)
    }

    /// Generators that still have to be bought. Switching only moves a
    /// generator between currencies, so the total can only grow by building.
    fn missing_builds(&self, economy: &Economy) -> u32 {
        self.lc_target
            .saturating_add(self.qp_target)
            .saturating_sub(economy.generator_count() as u32)
    }
}

impl Problem for GeneratorGoalProblem {
    type Key = Economy;

    fn start_node(&self) -> SearchNode {
        SearchNode::root(self.start.clone())
    }

    fn is_goal(&self, node: &SearchNode) -> bool {
        Currency::ALL
            .into_iter()
            .all(|currency| self.missing(node.economy(), currency) == 0)
    }

    fn upper_bound(&self) -> Result<Tick> {
        let start = self.start_node();
        let plan: Vec<Action> = Currency::ALL
            .into_iter()
            .flat_map(|currency| {
                let count = self.missing(start.economy(), currency) as usize;
                std::iter::repeat(Action::BuildGenerator(currency)).take(count)
            })
            .collect();

        Ok(run_plan(start, plan, &self.constants)?
            .map_or(UNREACHABLE, |node| node.elapsed() + 1))
    }

    /// Generators count as soon as they are bought, so the goal can be no
    /// closer than the last purchase it still needs. A goal reachable by
    /// switching alone gets no estimate.
    fn heuristic(&self, node: &SearchNode) -> Result<Tick> {
        if self.heuristic != HeuristicMode::Combined {
            return Ok(0);
        }
        min_time_to_buy_generators(
            node.economy(),
            self.missing_builds(node.economy()),
            &self.constants,
        )
    }

    fn visit_neighbors(
        &self,
        node: &SearchNode,
        visitor: &mut dyn FnMut(SearchNode) -> Result<()>,
    ) -> Result<()> {
        for currency in Currency::ALL {
            try_visit(Action::BuildGenerator(currency), node, &self.constants, visitor)?;
        }
        for from in Currency::ALL {
            try_visit(Action::SwitchGenerator { from }, node, &self.constants, visitor)?;
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
    use crate::economy::GeneratorTimers;

    fn minimal(lc_target: u32, qp_target: u32) -> GeneratorGoalProblem {
        GeneratorGoalProblem::new(
            GameConstants::default(),
            lc_target,
            qp_target,
            HeuristicMode::Combined,
        )
        .unwrap()
    }

    #[test]
    fn test_start_already_at_goal() {
        let problem = minimal(3, 0);
        let start = problem.start_node();
        assert!(problem.is_goal(&start));
        assert_eq!(problem.heuristic(&start).unwrap(), 0);
        assert_eq!(problem.upper_bound().unwrap(), 1);
    }

    #[test]
    fn test_one_missing_generator() {
        let problem = minimal(3, 1);
        let start = problem.start_node();
        assert!(!problem.is_goal(&start));
        assert_eq!(problem.heuristic(&start).unwrap(), 268);
        assert_eq!(problem.upper_bound().unwrap(), 268 + 1);
    }

    #[test]
    fn test_generators_under_construction_count() {
        let problem = minimal(3, 1);
        let start = problem.start_node();
        let child = problem
            .successors(&start)
            .unwrap()
            .into_iter()
            .find(|node| node.action() == Some(Action::BuildGenerator(Currency::Qp)))
            .unwrap();
        assert!(problem.is_goal(&child));
    }

    #[test]
    fn test_neighbor_order() {
        let problem = minimal(4, 1).with_start(
            Economy::new(200, 0)
                .with_generators(Currency::Lc, GeneratorTimers::operating(1))
                .with_generators(Currency::Qp, GeneratorTimers::operating(1)),
        );
        let actions: Vec<_> = problem
            .successors(&problem.start_node())
            .unwrap()
            .iter()
            .filter_map(SearchNode::action)
            .collect();
        assert_eq!(
            actions,
            vec![
                Action::BuildGenerator(Currency::Lc),
                Action::BuildGenerator(Currency::Qp),
                Action::SwitchGenerator { from: Currency::Lc },
                Action::SwitchGenerator { from: Currency::Qp },
            ]
        );
    }

    #[test]
    fn test_unreachable_without_income() {
        let problem = minimal(1, 1).with_start(Economy::new(10, 10));
        assert_eq!(problem.upper_bound().unwrap(), UNREACHABLE);
        assert_eq!(
            problem.heuristic(&problem.start_node()).unwrap(),
            UNREACHABLE
        );
    }

    #[test]
    fn test_non_combined_modes_are_blind() {
        let problem = GeneratorGoalProblem::new(
            GameConstants::default(),
            3,
            1,
            HeuristicMode::BuildTime,
        )
        .unwrap();
        assert_eq!(problem.heuristic(&problem.start_node()).unwrap(), 0);
    }

    #[test]
    fn test_heuristic_is_time_of_last_purchase() {
        // Two purchases from the starting economy; the second only lands
        // after the first new generator has yielded once.
        let problem = minimal(4, 1);
        assert_eq!(problem.heuristic(&problem.start_node()).unwrap(), 1072);
    }

    #[test]
    fn test_switch_only_goal_has_no_estimate() {
        let problem = minimal(2, 1);
        let start = problem.start_node();
        assert!(!problem.is_goal(&start));
        assert_eq!(problem.heuristic(&start).unwrap(), 0);
    }

    #[test]
    fn test_goal_needs_both_thresholds_in_either_order() {
        let constants = GameConstants::default();
        let problem = GeneratorGoalProblem::new(constants.clone(), 3, 5, HeuristicMode::Combined)
            .unwrap()
            .with_start(Economy::new(8 * constants.generator.cost.lc, 0));
        let start = problem.start_node();
        assert!(!problem.is_goal(&start));

        let lc = Action::BuildGenerator(Currency::Lc);
        let qp = Action::BuildGenerator(Currency::Qp);
        let orders = [[lc, lc, lc, qp, qp, qp, qp, qp], [qp, qp, qp, qp, qp, lc, lc, lc]];
        for order in orders {
            let mut node = start.clone();
            for (built, action) in order.into_iter().enumerate() {
                assert!(!problem.is_goal(&node), "goal after {built} of {order:?}");
                node = action.check(&node, &constants).unwrap().apply().unwrap();
            }
            assert!(problem.is_goal(&node));
            assert_eq!(node.economy().generators(Currency::Lc).len(), 3);
            assert_eq!(node.economy().generators(Currency::Qp).len(), 5);
            assert_eq!(node.elapsed(), 0);
        }
    }

    #[test]
    fn test_rejects_invalid_constants() {
        let mut constants = GameConstants::default();
        constants.lc_generator.cycle_length = 0;
        assert!(matches!(
            GeneratorGoalProblem::new(constants, 3, 1, HeuristicMode::Zero),
            Err(crate::error::PlannerError::InvalidConfig(_))
        ));
    }
}
