//! Argument definitions and command dispatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use planner_core::data::{GameConstants, PlannerConfig};
use planner_core::planner::Planner;
use planner_core::problem::{EconomyModel, HeuristicMode};
use planner_core::search::Strategy;

use crate::config::load_config;
use crate::error::CliError;
use crate::format::{format_json, format_text};

/// Top-level arguments.
#[derive(Parser, Debug)]
#[command(name = "build-planner")]
#[command(about = "Minimum-time build orders for a single-base economy")]
pub struct Cli {
    /// Log search progress (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search for a build order and print it
    Solve(SolveArgs),
    /// Print the effective configuration as RON
    ShowConfig(ConfigArgs),
}

/// Configuration source plus command-line overrides.
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// RON configuration file (defaults are compiled in)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Search engine
    #[arg(short, long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Goal model
    #[arg(short, long, value_enum)]
    pub model: Option<ModelArg>,

    /// Upgraded pulsers to reach (production-chain model)
    #[arg(long)]
    pub pulsers: Option<u32>,

    /// LC generators to reach (generators model)
    #[arg(long)]
    pub lc_target: Option<u32>,

    /// QP generators to reach (generators model)
    #[arg(long)]
    pub qp_target: Option<u32>,

    /// Heuristic strength
    #[arg(long, value_enum)]
    pub heuristic: Option<HeuristicArg>,

    /// Use the corrected generator cycles of later patches
    #[arg(long)]
    pub patched: bool,
}

/// Arguments of `solve`.
#[derive(Args, Debug, Default)]
pub struct SolveArgs {
    /// Configuration and overrides
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Search engine choice.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyArg {
    /// A* with a closed set
    Astar,
    /// Iterative-deepening A*
    Ida,
    /// Depth-first branch and bound
    Dfbb,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Astar => Self::AStar,
            StrategyArg::Ida => Self::Ida,
            StrategyArg::Dfbb => Self::Dfbb,
        }
    }
}

/// Goal model choice.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelArg {
    /// Reach a number of upgraded pulsers
    ProductionChain,
    /// Reach a number of generators per currency
    Generators,
}

/// Heuristic choice.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeuristicArg {
    /// Blind search
    Zero,
    /// Construction-time floor only
    BuildTime,
    /// Construction floor and gathering bound
    Combined,
}

impl From<HeuristicArg> for HeuristicMode {
    fn from(arg: HeuristicArg) -> Self {
        match arg {
            HeuristicArg::Zero => Self::Zero,
            HeuristicArg::BuildTime => Self::BuildTime,
            HeuristicArg::Combined => Self::Combined,
        }
    }
}

/// Output format of `solve`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One `[Mm Ss Tt] <label> LC: X QP: Y` line per step
    #[default]
    Text,
    /// Pretty-printed JSON with steps and search counters
    Json,
}

const DEFAULT_PULSERS: u32 = 2;
const DEFAULT_LC_TARGET: u32 = 4;
const DEFAULT_QP_TARGET: u32 = 1;

impl ConfigArgs {
    /// Load the configuration file (if any) and apply the overrides.
    ///
    /// # Errors
    ///
    /// Returns any error from [`load_config`].
    pub fn resolve(&self) -> Result<PlannerConfig, CliError> {
        let mut config = load_config(self.config.as_deref())?;

        if self.patched {
            let patched = GameConstants::patched();
            config.constants.lc_generator = patched.lc_generator;
            config.constants.qp_generator = patched.qp_generator;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy.into();
        }
        if let Some(heuristic) = self.heuristic {
            config.heuristic = heuristic.into();
        }
        config.model = self.model_override(config.model);

        Ok(config)
    }

    /// Switch model if asked to, keeping configured targets where the model
    /// stays the same.
    fn model_override(&self, current: EconomyModel) -> EconomyModel {
        let wants_chain = match self.model {
            Some(ModelArg::ProductionChain) => true,
            Some(ModelArg::Generators) => false,
            None => matches!(current, EconomyModel::ProductionChain { .. }),
        };

        if wants_chain {
            let configured = match current {
                EconomyModel::ProductionChain { pulser_goal } => pulser_goal,
                EconomyModel::Generators { .. } => DEFAULT_PULSERS,
            };
            EconomyModel::ProductionChain {
                pulser_goal: self.pulsers.unwrap_or(configured),
            }
        } else {
            let (lc, qp) = match current {
                EconomyModel::Generators {
                    lc_target,
                    qp_target,
                } => (lc_target, qp_target),
                EconomyModel::ProductionChain { .. } => (DEFAULT_LC_TARGET, DEFAULT_QP_TARGET),
            };
            EconomyModel::Generators {
                lc_target: self.lc_target.unwrap_or(lc),
                qp_target: self.qp_target.unwrap_or(qp),
            }
        }
    }
}

/// Run a parsed command and return what should go to stdout.
///
/// # Errors
///
/// Returns configuration, search and output errors.
pub fn run(command: &Commands) -> Result<String, CliError> {
    match command {
        Commands::Solve(args) => {
            let config = args.config.resolve()?;
            let ticks_per_second = config.constants.ticks_per_second;
            let solution = Planner::new(config).solve()?;
            match args.format {
                OutputFormat::Text => Ok(format_text(&solution.build_order, ticks_per_second)),
                OutputFormat::Json => format_json(&solution, ticks_per_second),
            }
        }
        Commands::ShowConfig(args) => {
            let config = args.resolve()?;
            config.validate()?;
            Ok(config.to_ron_string()? + "\n")
        }
    }
}
