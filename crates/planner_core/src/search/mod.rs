//! Search engines over a [`Problem`].
//!
//! All engines are deterministic and single-threaded: successors are visited
//! in the problem's fixed order and every tie is broken explicitly, so the
//! same problem always yields the same build order.

mod astar;
mod dfbb;
mod ida;

use std::collections::hash_map::RandomState;
use std::collections::HashSet;
use std::hash::{BuildHasher, Hash};

use serde::{Deserialize, Serialize};

use crate::economy::Tick;
use crate::error::Result;
use crate::node::BuildOrder;
use crate::problem::Problem;

/// Which engine to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Strategy {
    /// Best-first search with a closed set.
    #[default]
    AStar,
    /// Iterative-deepening A*.
    Ida,
    /// Depth-first branch and bound.
    Dfbb,
}

impl Strategy {
    /// Every strategy.
    pub const ALL: [Self; 3] = [Self::AStar, Self::Ida, Self::Dfbb];

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AStar => "A*",
            Self::Ida => "IDA*",
            Self::Dfbb => "DFBB",
        }
    }

    /// Run this engine on `problem`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::PlannerError::SearchExhausted`] if no goal is
    /// found, or any simulator error raised while expanding nodes.
    pub fn solve<P: Problem>(self, problem: &P) -> Result<Solution> {
        match self {
            Self::AStar => astar::solve(problem),
            Self::Ida => ida::solve(problem),
            Self::Dfbb => dfbb::solve(problem),
        }
    }
}

/// Counters collected during a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Nodes created (root included).
    pub generated: u64,
    /// Nodes whose successors were generated.
    pub expanded: u64,
    /// IDA* deepening iterations.
    pub iterations: u64,
    /// DFBB incumbent improvements.
    pub incumbents: u64,
}

/// A found plan together with the effort spent finding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    /// The plan.
    pub build_order: BuildOrder,
    /// Search counters.
    pub stats: SearchStats,
}

impl Solution {
    /// Time of the last action of the plan.
    #[must_use]
    pub fn total_time(&self) -> Tick {
        self.build_order.total_time()
    }
}

/// States already expanded.
#[derive(Debug, Clone)]
pub struct ClosedSet<K, S = RandomState> {
    keys: HashSet<K, S>,
}

impl<K: Eq + Hash> ClosedSet<K> {
    /// Create an empty set with the default hasher.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }
}

impl<K: Eq + Hash> Default for ClosedSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, S: BuildHasher> ClosedSet<K, S> {
    /// Create an empty set with an explicit hasher.
    #[must_use]
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            keys: HashSet::with_hasher(hasher),
        }
    }

    /// Close a key. Returns `false` if it was already closed.
    pub fn insert(&mut self, key: K) -> bool {
        self.keys.insert(key)
    }

    /// True if the key has been closed.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    /// Number of closed keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True if nothing has been closed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
