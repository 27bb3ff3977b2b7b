//! Error type for the command line.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop the CLI.
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file does not exist.
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    /// Configuration file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        /// File being read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The planner rejected the configuration or found no plan.
    #[error(transparent)]
    Planner(#[from] planner_core::error::PlannerError),

    /// JSON output failed.
    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}
