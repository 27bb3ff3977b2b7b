//! Game balance constants consumed by the simulator and the action catalog.

use serde::{Deserialize, Serialize};

use crate::economy::{Currency, Resource, Tick};
use crate::error::{PlannerError, Result};

/// Cycle definition of one generator type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorSpec {
    /// Ticks per yield cycle.
    pub cycle_length: Tick,
    /// Resources yielded at the end of every cycle.
    pub yield_size: Resource,
}

/// A price in both currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cost {
    /// LC part of the price.
    #[serde(default)]
    pub lc: Resource,
    /// QP part of the price.
    #[serde(default)]
    pub qp: Resource,
}

impl Cost {
    /// Create a new cost.
    #[must_use]
    pub const fn new(lc: Resource, qp: Resource) -> Self {
        Self { lc, qp }
    }

    /// Amount owed in the given currency.
    #[must_use]
    pub const fn get(self, currency: Currency) -> Resource {
        match currency {
            Currency::Lc => self.lc,
            Currency::Qp => self.qp,
        }
    }
}

impl std::ops::Add for Cost {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.lc + rhs.lc, self.qp + rhs.qp)
    }
}

/// Price and duration of something that gets built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSpec {
    /// Resources spent when construction starts.
    pub cost: Cost,
    /// Construction time in ticks.
    pub time: Tick,
}

impl BuildSpec {
    /// Create a new build spec.
    #[must_use]
    pub const fn new(cost: Cost, time: Tick) -> Self {
        Self { cost, time }
    }
}

/// Data-driven balance table.
///
/// Every number the simulator consumes lives here. The core never mutates
/// it; the CLI may load a replacement from RON.
///
/// # Example RON
///
/// ```ron
/// GameConstants(
///     ticks_per_second: 18,
///     initial_lc: 60,
///     initial_qp: 40,
///     initial_lc_generators: 3,
///     initial_qp_generators: 0,
///     lc_generator: GeneratorSpec(cycle_length: 268, yield_size: 8),
///     qp_generator: GeneratorSpec(cycle_length: 274, yield_size: 8),
///     generator_switch_time: 90,
///     generator: BuildSpec(cost: Cost(lc: 80), time: 360),
///     foundation: BuildSpec(cost: Cost(lc: 65), time: 144),
///     depot: BuildSpec(cost: Cost(lc: 50, qp: 40), time: 756),
///     units_per_depot: 7,
///     vecgir: BuildSpec(cost: Cost(lc: 36), time: 360),
///     pulser: BuildSpec(cost: Cost(lc: 29, qp: 15), time: 576),
///     upgrade: BuildSpec(cost: Cost(lc: 25, qp: 10), time: 540),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConstants {
    /// Simulation ticks per game second.
    pub ticks_per_second: Tick,
    /// Starting LC stock.
    pub initial_lc: Resource,
    /// Starting QP stock.
    pub initial_qp: Resource,
    /// Operating LC generators at the start (timers at zero).
    #[serde(default)]
    pub initial_lc_generators: u32,
    /// Operating QP generators at the start (timers at zero).
    #[serde(default)]
    pub initial_qp_generators: u32,
    /// LC generator cycle.
    pub lc_generator: GeneratorSpec,
    /// QP generator cycle.
    pub qp_generator: GeneratorSpec,
    /// Ticks a switched generator spends offline before producing again.
    pub generator_switch_time: Tick,
    /// Building a new generator of either currency.
    pub generator: BuildSpec,
    /// Foundation structure.
    pub foundation: BuildSpec,
    /// Depot structure (built on a foundation).
    pub depot: BuildSpec,
    /// Supply cap: units each depot can field.
    pub units_per_depot: u32,
    /// Vecgir (ZV) unit.
    pub vecgir: BuildSpec,
    /// Pulser (ZP) unit. The cost is what piloting a vecgir adds; building
    /// one directly pays vecgir + pulser and takes the full time.
    pub pulser: BuildSpec,
    /// Pulser upgrade.
    pub upgrade: BuildSpec,
}

impl GameConstants {
    /// Balance with the corrected generator cycles of later game patches.
    #[must_use]
    pub fn patched() -> Self {
        Self {
            lc_generator: GeneratorSpec {
                cycle_length: 217,
                yield_size: 8,
            },
            qp_generator: GeneratorSpec {
                cycle_length: 271,
                yield_size: 8,
            },
            ..Self::default()
        }
    }

    /// Cycle definition for a currency's generators.
    #[must_use]
    pub const fn generator_spec(&self, currency: Currency) -> GeneratorSpec {
        match currency {
            Currency::Lc => self.lc_generator,
            Currency::Qp => self.qp_generator,
        }
    }

    /// Ticks needed to pilot an existing vecgir into a pulser.
    #[must_use]
    pub const fn pilot_time(&self) -> Tick {
        self.pulser.time - self.vecgir.time
    }

    /// Price of building a pulser directly from a depot.
    #[must_use]
    pub fn direct_pulser_cost(&self) -> Cost {
        self.vecgir.cost + self.pulser.cost
    }

    /// Check the table for values the simulator cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> Result<()> {
        if self.ticks_per_second <= 0 {
            return Err(PlannerError::InvalidConfig(
                "ticks_per_second must be positive".into(),
            ));
        }
        for (name, spec) in [("lc", self.lc_generator), ("qp", self.qp_generator)] {
            if spec.cycle_length <= 0 {
                return Err(PlannerError::InvalidConfig(format!(
                    "{name}_generator.cycle_length must be positive, got {}",
                    spec.cycle_length
                )));
            }
            if spec.yield_size == 0 {
                return Err(PlannerError::InvalidConfig(format!(
                    "{name}_generator.yield_size must be positive"
                )));
            }
        }
        let builds = [
            ("generator", self.generator),
            ("foundation", self.foundation),
            ("depot", self.depot),
            ("vecgir", self.vecgir),
            ("pulser", self.pulser),
            ("upgrade", self.upgrade),
        ];
        for (name, spec) in builds {
            if spec.time <= 0 {
                return Err(PlannerError::InvalidConfig(format!(
                    "{name}.time must be positive, got {}",
                    spec.time
                )));
            }
        }
        if self.generator_switch_time <= 0 {
            return Err(PlannerError::InvalidConfig(
                "generator_switch_time must be positive".into(),
            ));
        }
        if self.pilot_time() <= 0 {
            return Err(PlannerError::InvalidConfig(format!(
                "pulser.time ({}) must exceed vecgir.time ({})",
                self.pulser.time, self.vecgir.time
            )));
        }
        if self.units_per_depot == 0 {
            return Err(PlannerError::InvalidConfig(
                "units_per_depot must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl Default for GameConstants {
    /// The shipped balance, including its slow generator cycles.
    fn default() -> Self {
        const TPS: Tick = 18;
        Self {
            ticks_per_second: TPS,
            initial_lc: 60,
            initial_qp: 40,
            initial_lc_generators: 3,
            initial_qp_generators: 0,
            lc_generator: GeneratorSpec {
                cycle_length: 268,
                yield_size: 8,
            },
            qp_generator: GeneratorSpec {
                cycle_length: 274,
                yield_size: 8,
            },
            generator_switch_time: 5 * TPS,
            generator: BuildSpec::new(Cost::new(80, 0), 20 * TPS),
            foundation: BuildSpec::new(Cost::new(65, 0), 8 * TPS),
            depot: BuildSpec::new(Cost::new(50, 40), 42 * TPS),
            units_per_depot: 7,
            vecgir: BuildSpec::new(Cost::new(36, 0), 20 * TPS),
            pulser: BuildSpec::new(Cost::new(29, 15), 32 * TPS),
            upgrade: BuildSpec::new(Cost::new(25, 10), 540),
        }
    }
}
