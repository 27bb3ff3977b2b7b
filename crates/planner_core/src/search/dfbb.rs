//! Depth-first branch and bound.
//!
//! The incumbent starts at the problem's upper bound and only ever shrinks.
//! A child is entered only while `elapsed + h` stays strictly below it.

use crate::economy::Tick;
use crate::error::{PlannerError, Result};
use crate::node::{BuildOrder, SearchNode};
use crate::problem::Problem;

use super::{SearchStats, Solution, Strategy};

struct BranchAndBound<'a, P> {
    problem: &'a P,
    incumbent: Tick,
    best: Option<BuildOrder>,
    /// Nodes from the root down to the parent of the node being visited.
    path: Vec<SearchNode>,
    stats: SearchStats,
}

impl<P: Problem> BranchAndBound<'_, P> {
    fn visit(&mut self, node: SearchNode) -> Result<()> {
        if self.problem.is_goal(&node) {
            if node.elapsed() < self.incumbent {
                self.incumbent = node.elapsed();
                self.stats.incumbents += 1;
                tracing::debug!(
                    "DFBB incumbent #{}: {} ticks",
                    self.stats.incumbents,
                    self.incumbent
                );
                self.path.push(node);
                self.best = Some(BuildOrder::from_path(&self.path));
                self.path.pop();
            }
            return Ok(());
        }

        self.stats.expanded += 1;
        let children = self.problem.successors(&node)?;
        self.path.push(node);
        for child in children {
            self.stats.generated += 1;
            let h = self.problem.heuristic(&child)?;
            if child.elapsed().saturating_add(h) < self.incumbent {
                self.visit(child)?;
            }
        }
        self.path.pop();
        Ok(())
    }
}

pub(super) fn solve<P: Problem>(problem: &P) -> Result<Solution> {
    let mut search = BranchAndBound {
        problem,
        incumbent: problem.upper_bound()?,
        best: None,
        path: Vec::new(),
        stats: SearchStats {
            generated: 1,
            ..SearchStats::default()
        },
    };
    tracing::debug!("DFBB initial bound: {} ticks", search.incumbent);

    search.visit(problem.start_node())?;

    match search.best {
        Some(build_order) => {
            tracing::info!(
                "DFBB finished at {} ticks ({} incumbents, {} expanded)",
                search.incumbent,
                search.stats.incumbents,
                search.stats.expanded
            );
            Ok(Solution {
                build_order,
                stats: search.stats,
            })
        }
        None => Err(PlannerError::SearchExhausted {
            strategy: Strategy::Dfbb.name(),
            expanded: search.stats.expanded,
        }),
    }
}
