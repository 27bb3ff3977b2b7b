//! Entry point tying configuration, problem and engine together.

use crate::data::PlannerConfig;
use crate::error::Result;
use crate::problem::{EconomyModel, GeneratorGoalProblem, ProductionChainProblem};
use crate::search::Solution;

/// Runs one configured solve.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    /// Create a planner for a configuration.
    #[must_use]
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Validate the configuration, build the problem and search it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::PlannerError::InvalidConfig`] for a bad
    /// configuration and [`crate::error::PlannerError::SearchExhausted`] if
    /// the goal cannot be reached.
    pub fn solve(&self) -> Result<Solution> {
        let config = &self.config;
        config.validate()?;
        tracing::info!(
            "Planning {:?} with {} ({:?} heuristic)",
            config.model,
            config.strategy.name(),
            config.heuristic
        );

        let result = match config.model {
            EconomyModel::ProductionChain { pulser_goal } => {
                let problem = ProductionChainProblem::new(
                    config.constants.clone(),
                    pulser_goal,
                    config.heuristic,
                )?;
                config.strategy.solve(&problem)
            }
            EconomyModel::Generators {
                lc_target,
                qp_target,
            } => {
                let problem = GeneratorGoalProblem::new(
                    config.constants.clone(),
                    lc_target,
                    qp_target,
                    config.heuristic,
                )?;
                config.strategy.solve(&problem)
            }
        };

        match &result {
            Ok(solution) => tracing::info!(
                "Found a {}-step build order finishing at {} ticks",
                solution.build_order.len(),
                solution.total_time()
            ),
            Err(e) => tracing::warn!("Planning failed: {e}"),
        }
        result
    }
}
