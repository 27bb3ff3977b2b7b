//! # Planner Core
//!
//! Deterministic build-order search for a single-base economy.
//!
//! This crate contains **only** deterministic logic:
//! - No IO
//! - No threads
//! - No randomness
//! - No floating-point math (integer ticks and resources)
//!
//! The same configuration always produces the same build order, which keeps
//! results reproducible and lets the engines be checked against each other.
//!
//! ## Crate Structure
//!
//! - [`economy`] - Discrete-event economy simulation
//! - [`actions`] - Guarded action catalog
//! - [`node`] - Search nodes, node arena and build orders
//! - [`problem`] - Goals, bounds, heuristics and successor generation
//! - [`search`] - A*, IDA* and depth-first branch and bound
//! - [`planner`] - Configured entry point
//! - [`data`] - Balance table and planner configuration (RON)

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod actions;
pub mod data;
pub mod economy;
pub mod error;
pub mod node;
pub mod planner;
pub mod problem;
pub mod search;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::actions::{Action, Applicable};
    pub use crate::data::{BuildSpec, Cost, GameConstants, GeneratorSpec, PlannerConfig};
    pub use crate::economy::{
        Currency, Economy, GeneratorTimers, Producible, ProductionQueue, Resource, Tick,
    };
    pub use crate::error::{PlannerError, Result};
    pub use crate::node::{BuildOrder, BuildStep, NodeArena, NodeId, SearchNode};
    pub use crate::planner::Planner;
    pub use crate::problem::{
        EconomyModel, GeneratorGoalProblem, HeuristicMode, Problem, ProductionChainProblem,
    };
    pub use crate::search::{SearchStats, Solution, Strategy};
}
