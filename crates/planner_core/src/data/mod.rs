//! Data structures for planner configuration.
//!
//! Everything here deserializes from RON and has compiled-in defaults.
//!
//! **Note:** This module contains no IO - it only defines data types.
//! File loading is handled by `planner_cli`.

mod game_constants;
mod planner_config;

pub use game_constants::{BuildSpec, Cost, GameConstants, GeneratorSpec};
pub use planner_config::PlannerConfig;
