//! Iterative-deepening A*.
//!
//! Each iteration is a depth-first search that cuts off at `f > ceiling`.
//! The next ceiling is the smallest `f` that was cut off, so no state is
//! stored between iterations.

use crate::economy::Tick;
use crate::error::{PlannerError, Result};
use crate::node::{BuildOrder, SearchNode};
use crate::problem::Problem;

use super::{SearchStats, Solution, Strategy};

/// Result of one bounded depth-first descent.
enum Descent {
    Found(BuildOrder),
    /// Smallest `f` above the ceiling, `Tick::MAX` if nothing was cut off.
    Exceeded(Tick),
}

struct Deepening<'a, P> {
    problem: &'a P,
    path: Vec<SearchNode>,
    stats: SearchStats,
}

impl<P: Problem> Deepening<'_, P> {
    fn descend(&mut self, node: SearchNode, ceiling: Tick) -> Result<Descent> {
        let f = node
            .elapsed()
            .saturating_add(self.problem.heuristic(&node)?);
        if f > ceiling {
            return Ok(Descent::Exceeded(f));
        }
        if self.problem.is_goal(&node) {
            self.path.push(node);
            return Ok(Descent::Found(BuildOrder::from_path(&self.path)));
        }

        self.stats.expanded += 1;
        let children = self.problem.successors(&node)?;
        self.path.push(node);
        let mut next = Tick::MAX;
        for child in children {
            self.stats.generated += 1;
            match self.descend(child, ceiling)? {
                found @ Descent::Found(_) => return Ok(found),
                Descent::Exceeded(f) => next = next.min(f),
            }
        }
        self.path.pop();
        Ok(Descent::Exceeded(next))
    }
}

pub(super) fn solve<P: Problem>(problem: &P) -> Result<Solution> {
    let start = problem.start_node();
    let upper_bound = problem.upper_bound()?;
    let mut ceiling = problem.heuristic(&start)?;
    let mut search = Deepening {
        problem,
        path: Vec::new(),
        stats: SearchStats {
            generated: 1,
            ..SearchStats::default()
        },
    };

    loop {
        search.stats.iterations += 1;
        tracing::debug!(
            "IDA* iteration {} with ceiling {} ticks",
            search.stats.iterations,
            ceiling
        );
        search.path.clear();

        match search.descend(start.clone(), ceiling)? {
            Descent::Found(build_order) => {
                tracing::info!(
                    "IDA* reached the goal at {} ticks after {} iterations ({} expanded)",
                    build_order.total_time(),
                    search.stats.iterations,
                    search.stats.expanded
                );
                return Ok(Solution {
                    build_order,
                    stats: search.stats,
                });
            }
            Descent::Exceeded(next) if next >= upper_bound => {
                return Err(PlannerError::SearchExhausted {
                    strategy: Strategy::Ida.name(),
                    expanded: search.stats.expanded,
                });
            }
            Descent::Exceeded(next) => ceiling = next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::GameConstants;
    use crate::problem::{GeneratorGoalProblem, HeuristicMode};

    #[test]
    fn test_ceiling_rises_to_first_yield() {
        let problem =
            GeneratorGoalProblem::new(GameConstants::default(), 3, 1, HeuristicMode::Zero)
                .unwrap();
        let solution = solve(&problem).unwrap();

        // Ceilings 0 and 268: nothing can happen before the first cycle ends.
        assert_eq!(solution.stats.iterations, 2);
        assert_eq!(solution.total_time(), 268);
    }

    #[test]
    fn test_informed_heuristic_needs_one_iteration() {
        let problem =
            GeneratorGoalProblem::new(GameConstants::default(), 3, 1, HeuristicMode::Combined)
                .unwrap();
        let solution = solve(&problem).unwrap();
        assert_eq!(solution.stats.iterations, 1);
        assert_eq!(solution.total_time(), 268);
    }
}
