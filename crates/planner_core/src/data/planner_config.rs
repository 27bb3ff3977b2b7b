//! Top-level planner configuration.

use serde::{Deserialize, Serialize};

use super::GameConstants;
use crate::error::{PlannerError, Result};
use crate::problem::{EconomyModel, HeuristicMode};
use crate::search::Strategy;

/// Everything one solve needs: balance, goal, engine and heuristic.
///
/// Every field is optional in RON and falls back to its default.
///
/// # Example RON
///
/// ```ron
/// PlannerConfig(
///     model: Generators(lc_target: 4, qp_target: 2),
///     strategy: Dfbb,
///     heuristic: Combined,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Balance table.
    pub constants: GameConstants,
    /// Goal to plan for.
    pub model: EconomyModel,
    /// Search engine.
    pub strategy: Strategy,
    /// Heuristic strength.
    pub heuristic: HeuristicMode,
}

impl PlannerConfig {
    /// Parse a RON document and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::ConfigParse`] for malformed RON and
    /// [`PlannerError::InvalidConfig`] for values the simulator rejects.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        let config: Self = ron::from_str(ron)?;
        config.validate()?;
        Ok(config)
    }

    /// Render as pretty RON.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::ConfigSerialize`] if serialization fails.
    pub fn to_ron_string(&self) -> Result<String> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// Check the balance table and the goal.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> Result<()> {
        self.constants.validate()?;
        if let EconomyModel::ProductionChain { pulser_goal } = self.model {
            if pulser_goal > self.constants.units_per_depot {
                return Err(PlannerError::InvalidConfig(format!(
                    "pulser_goal {pulser_goal} exceeds the {} units one depot supports",
                    self.constants.units_per_depot
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trips_through_ron() {
        let config = PlannerConfig::default();
        let text = config.to_ron_string().unwrap();
        assert_eq!(PlannerConfig::from_ron_str(&text).unwrap(), config);
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let config = PlannerConfig::from_ron_str(
            "PlannerConfig(model: Generators(lc_target: 4, qp_target: 2), strategy: Dfbb)",
        )
        .unwrap();
        assert_eq!(
            config.model,
            EconomyModel::Generators {
                lc_target: 4,
                qp_target: 2
            }
        );
        assert_eq!(config.strategy, Strategy::Dfbb);
        assert_eq!(config.heuristic, HeuristicMode::Combined);
        assert_eq!(config.constants, GameConstants::default());
    }

    #[test]
    fn test_malformed_ron_is_a_parse_error() {
        assert!(matches!(
            PlannerConfig::from_ron_str("PlannerConfig(strategy: Sideways)"),
            Err(PlannerError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_invalid_constants_rejected() {
        let mut config = PlannerConfig::default();
        config.constants.lc_generator.yield_size = 0;
        let text = config.to_ron_string().unwrap();
        assert!(matches!(
            PlannerConfig::from_ron_str(&text),
            Err(PlannerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_goal_beyond_supply_rejected() {
        let config = PlannerConfig {
            model: EconomyModel::ProductionChain { pulser_goal: 8 },
            ..PlannerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
