//! Search nodes, the node arena, and the extracted build order.
//!
//! Nodes are immutable once created. Parent links are indices into a
//! [`NodeArena`] owned by the search engine, never references, so the
//! arena can grow freely while parent chains stay valid.

use serde::Serialize;

use crate::actions::Action;
use crate::economy::{Currency, Economy, Resource, Tick};

/// Index of a node inside a [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in its arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One point in the search tree: an economy snapshot plus how it was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchNode {
    elapsed: Tick,
    economy: Economy,
    action: Option<Action>,
    parent: Option<NodeId>,
}

impl SearchNode {
    /// Create a root node at time zero.
    #[must_use]
    pub fn root(economy: Economy) -> Self {
        Self {
            elapsed: 0,
            economy,
            action: None,
            parent: None,
        }
    }

    /// Ticks since the root.
    #[must_use]
    pub const fn elapsed(&self) -> Tick {
        self.elapsed
    }

    /// Economy snapshot at this node.
    #[must_use]
    pub const fn economy(&self) -> &Economy {
        &self.economy
    }

    /// The action that produced this node (`None` for the root).
    #[must_use]
    pub const fn action(&self) -> Option<Action> {
        self.action
    }

    /// Arena index of the parent, once the node has been stored.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Link this node to its parent in an arena.
    #[must_use]
    pub fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Start a child of this node. Only the action catalog creates children.
    pub(crate) fn successor(&self, action: Action) -> Self {
        Self {
            elapsed: self.elapsed,
            economy: self.economy.clone(),
            action: Some(action),
            parent: None,
        }
    }

    pub(crate) fn economy_mut(&mut self) -> &mut Economy {
        &mut self.economy
    }

    /// Account for time already simulated on the economy.
    pub(crate) fn add_elapsed(&mut self, ticks: Tick) {
        self.elapsed += ticks;
    }

    /// Build-order record for this node, `None` for the root.
    #[must_use]
    pub fn to_step(&self) -> Option<BuildStep> {
        self.action.map(|action| BuildStep {
            elapsed: self.elapsed,
            action,
            label: action.label(),
            lc: self.economy.stock(Currency::Lc),
            qp: self.economy.stock(Currency::Qp),
        })
    }
}

/// Append-only node storage. Nodes never move once inserted.
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<SearchNode>,
}

impl NodeArena {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Store a node and return its index.
    pub fn insert(&mut self, node: SearchNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Look up a stored node.
    ///
    /// # Panics
    ///
    /// Panics if `id` came from a different arena.
    #[must_use]
    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }

    /// Number of stored nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walk parent links from `id` back to the root and return the steps in
    /// chronological order, root excluded.
    #[must_use]
    pub fn build_order(&self, id: NodeId) -> BuildOrder {
        let mut steps = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.get(node_id);
            steps.extend(node.to_step());
            current = node.parent;
        }
        steps.reverse();
        BuildOrder { steps }
    }
}

/// One line of a build order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BuildStep {
    /// Ticks since the start when the action was issued.
    pub elapsed: Tick,
    /// The action taken.
    pub action: Action,
    /// Human-readable description of the action.
    pub label: &'static str,
    /// LC stock right after the action.
    pub lc: Resource,
    /// QP stock right after the action.
    pub qp: Resource,
}

/// Chronological list of actions from the start to the goal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct BuildOrder {
    steps: Vec<BuildStep>,
}

impl BuildOrder {
    /// Build from a root-first path of nodes. The root contributes no step.
    #[must_use]
    pub fn from_path(path: &[SearchNode]) -> Self {
        Self {
            steps: path.iter().filter_map(SearchNode::to_step).collect(),
        }
    }

    /// All steps in order.
    #[must_use]
    pub fn steps(&self) -> &[BuildStep] {
        &self.steps
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True if the start already satisfied the goal.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Time of the last action, 0 for an empty order.
    #[must_use]
    pub fn total_time(&self) -> Tick {
        self.steps.last().map_or(0, |step| step.elapsed)
    }

    /// Actions in order, without timing.
    pub fn actions(&self) -> impl Iterator<Item = Action> + '_ {
        self.steps.iter().map(|step| step.action)
    }
}
