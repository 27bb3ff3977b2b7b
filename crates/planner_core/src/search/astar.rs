//! Best-first search over an arena of nodes.
//!
//! There is no decrease-key: a state may sit in the frontier several times
//! and every copy after the first is skipped when popped.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::economy::Tick;
use crate::error::{PlannerError, Result};
use crate::node::{NodeArena, NodeId};
use crate::problem::{Problem, UNREACHABLE};

use super::{ClosedSet, SearchStats, Solution, Strategy};

/// Frontier entry. Ordered by `(f, h, depth, sequence)` ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenEntry {
    f: Tick,
    h: Tick,
    depth: u32,
    /// Insertion counter; the last tie-breaker, so ordering is total.
    sequence: u64,
    id: NodeId,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap, so compare other to self for min-heap behavior.
        (other.f, other.h, other.depth, other.sequence).cmp(&(
            self.f,
            self.h,
            self.depth,
            self.sequence,
        ))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub(super) fn solve<P: Problem>(problem: &P) -> Result<Solution> {
    let mut arena = NodeArena::new();
    let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
    let mut closed: ClosedSet<P::Key> = ClosedSet::new();
    let mut stats = SearchStats::default();
    let mut sequence: u64 = 0;

    let start = problem.start_node();
    let h = problem.heuristic(&start)?;
    open.push(OpenEntry {
        f: h,
        h,
        depth: 0,
        sequence,
        id: arena.insert(start),
    });
    stats.generated = 1;

    while let Some(entry) = open.pop() {
        let node = arena.get(entry.id);
        if !closed.insert(problem.closed_key(node)) {
            continue;
        }

        if problem.is_goal(node) {
            tracing::info!(
                "A* reached the goal at {} ticks ({} generated, {} expanded, {} closed)",
                node.elapsed(),
                stats.generated,
                stats.expanded,
                closed.len()
            );
            return Ok(Solution {
                build_order: arena.build_order(entry.id),
                stats,
            });
        }

        stats.expanded += 1;
        for child in problem.successors(node)? {
            if closed.contains(&problem.closed_key(&child)) {
                continue;
            }
            let h = problem.heuristic(&child)?;
            if h >= UNREACHABLE {
                continue;
            }
            sequence += 1;
            stats.generated += 1;
            open.push(OpenEntry {
                f: child.elapsed().saturating_add(h),
                h,
                depth: entry.depth + 1,
                sequence,
                id: arena.insert(child.with_parent(entry.id)),
            });
        }

        if stats.expanded % 10_000 == 0 {
            tracing::debug!(
                "A* expanded {} nodes, frontier {}, best f {}",
                stats.expanded,
                open.len(),
                entry.f
            );
        }
    }

    Err(PlannerError::SearchExhausted {
        strategy: Strategy::AStar.name(),
        expanded: stats.expanded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    use crate::data::GameConstants;
    use crate::economy::Economy;
    use crate::node::SearchNode;
    use crate::problem::{GeneratorGoalProblem, HeuristicMode};

    /// Delegates to a generator goal and records every expansion.
    struct CountingProblem {
        inner: GeneratorGoalProblem,
        expansions: RefCell<HashMap<Economy, u32>>,
    }

    impl Problem for CountingProblem {
        type Key = Economy;

        fn start_node(&self) -> SearchNode {
            self.inner.start_node()
        }

        fn is_goal(&self, node: &SearchNode) -> bool {
            self.inner.is_goal(node)
        }

        fn upper_bound(&self) -> Result<Tick> {
            self.inner.upper_bound()
        }

        fn heuristic(&self, node: &SearchNode) -> Result<Tick> {
            self.inner.heuristic(node)
        }

        fn visit_neighbors(
            &self,
            node: &SearchNode,
            visitor: &mut dyn FnMut(SearchNode) -> Result<()>,
        ) -> Result<()> {
            *self
                .expansions
                .borrow_mut()
                .entry(node.economy().clone())
                .or_default() += 1;
            self.inner.visit_neighbors(node, visitor)
        }

        fn closed_key(&self, node: &SearchNode) -> Economy {
            self.inner.closed_key(node)
        }
    }

    fn entry(f: Tick, h: Tick, depth: u32, sequence: u64) -> OpenEntry {
        let id = NodeArena::new().insert(SearchNode::root(Economy::new(0, 0)));
        OpenEntry {
            f,
            h,
            depth,
            sequence,
            id,
        }
    }

    #[test]
    fn test_open_entry_pops_lowest_first() {
        let mut heap = BinaryHeap::new();
        heap.push(entry(10, 0, 0, 0));
        heap.push(entry(5, 3, 2, 1));
        heap.push(entry(5, 3, 1, 2));
        heap.push(entry(5, 1, 4, 3));
        heap.push(entry(5, 3, 1, 4));

        let order: Vec<u64> = std::iter::from_fn(|| heap.pop().map(|e| e.sequence)).collect();
        // f first, then h, then depth, then insertion order.
        assert_eq!(order, vec![3, 2, 4, 1, 0]);
    }

    #[test]
    fn test_each_state_is_expanded_once() {
        // Switching back and forth and building in different orders reach
        // the same economies along several paths.
        let problem = CountingProblem {
            inner: GeneratorGoalProblem::new(GameConstants::default(), 4, 1, HeuristicMode::Zero)
                .unwrap(),
            expansions: RefCell::new(HashMap::new()),
        };
        let solution = solve(&problem).unwrap();

        let expansions = problem.expansions.borrow();
        assert_eq!(expansions.len() as u64, solution.stats.expanded);
        assert!(expansions.values().all(|&count| count == 1));
        assert!(solution.stats.generated > solution.stats.expanded);
    }
}
