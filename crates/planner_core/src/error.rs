//! Error types for the planner core.

use thiserror::Error;

use crate::economy::Tick;

/// Result type alias using [`PlannerError`].
pub type Result<T> = std::result::Result<T, PlannerError>;

/// Top-level error type for all planner errors.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// Time was advanced by a zero or negative delta. Always a caller bug.
    #[error("Cannot advance the economy by {dt} ticks (delta must be positive)")]
    InvalidAdvance {
        /// The rejected delta.
        dt: Tick,
    },

    /// An action needed an entity that is neither finished nor queued.
    /// Guards rule this out, so seeing it means a guard is wrong.
    #[error("Missing prerequisite: no {0} finished or in production")]
    MissingPrerequisite(&'static str),

    /// The search space was exhausted without reaching the goal.
    #[error("{strategy} search exhausted after expanding {expanded} nodes without reaching the goal")]
    SearchExhausted {
        /// Name of the strategy that gave up.
        strategy: &'static str,
        /// Nodes expanded before giving up.
        expanded: u64,
    },

    /// Configuration values are inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration text failed to parse.
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),

    /// Configuration failed to serialize.
    #[error("Failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] ron::Error),
}
