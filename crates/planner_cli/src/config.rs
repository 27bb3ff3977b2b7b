//! Configuration loading.

use std::path::Path;

use planner_core::data::PlannerConfig;

use crate::error::CliError;

/// Load a configuration from a RON file, or the compiled-in defaults when
/// no path is given.
///
/// # Errors
///
/// Returns [`CliError::FileNotFound`] or [`CliError::Read`] for IO problems
/// and [`CliError::Planner`] if the file does not parse or validate.
pub fn load_config(path: Option<&Path>) -> Result<PlannerConfig, CliError> {
    let Some(path) = path else {
        return Ok(PlannerConfig::default());
    };
    if !path.exists() {
        return Err(CliError::FileNotFound(path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(PlannerConfig::from_ron_str(&contents)?)
}
