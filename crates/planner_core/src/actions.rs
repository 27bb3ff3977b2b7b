//! The action catalog: every state transition the planner may take.
//!
//! Each action has a guard and a transform. The transform can only be
//! reached through [`Action::check`], which returns an [`Applicable`] token
//! when the guard holds, so an action can never be applied to a node that
//! does not admit it.
//!
//! Transforms first wait for whatever they need (resources, a finished
//! prerequisite, an idle generator) and only then change the economy. They
//! always work on a fresh copy of the parent node.

use serde::{Deserialize, Serialize};

use crate::data::{Cost, GameConstants};
use crate::economy::{
    gather_until, wait_for_completion, wait_for_idle_generator, Currency, Economy, Producible,
    Resource,
};
use crate::error::{PlannerError, Result};
use crate::node::SearchNode;

/// A state transition the planner can choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Build a new generator of the given currency.
    BuildGenerator(Currency),
    /// Take a generator offline at its cycle boundary and re-tool it for
    /// the other currency.
    SwitchGenerator {
        /// Currency the generator currently produces.
        from: Currency,
    },
    /// Lay down a foundation.
    BuildFoundation,
    /// Build a depot on a foundation.
    BuildDepot,
    /// Produce a vecgir at a depot.
    BuildVecgir,
    /// Produce a pulser directly at a depot.
    BuildPulser,
    /// Pilot an existing vecgir into a pulser.
    PilotPulser,
    /// Upgrade a pulser.
    UpgradePulser,
}

impl Action {
    /// Human-readable description used in printed build orders.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BuildGenerator(Currency::Lc) => "Build LC generator",
            Self::BuildGenerator(Currency::Qp) => "Build QP generator",
            Self::SwitchGenerator { from: Currency::Lc } => "Switch LC generator to QP",
            Self::SwitchGenerator { from: Currency::Qp } => "Switch QP generator to LC",
            Self::BuildFoundation => "Build Foundation",
            Self::BuildDepot => "Build Depot",
            Self::BuildVecgir => "Build ZV",
            Self::BuildPulser => "Build ZP",
            Self::PilotPulser => "Pilot ZV into ZP",
            Self::UpgradePulser => "Upgrade ZP",
        }
    }

    /// Guard: can this action be taken from `economy`?
    #[must_use]
    pub fn can_apply(self, economy: &Economy, constants: &GameConstants) -> bool {
        match self {
            Self::BuildGenerator(_) => can_afford(economy, constants.generator.cost),
            Self::SwitchGenerator { from } => !economy.generators(from).is_empty(),
            Self::BuildFoundation => can_afford(economy, constants.foundation.cost),
            Self::BuildDepot => {
                economy.has(Producible::Foundation) && can_afford(economy, constants.depot.cost)
            }
            Self::BuildVecgir => {
                has_free_supply(economy, constants) && can_afford(economy, constants.vecgir.cost)
            }
            Self::BuildPulser => {
                has_free_supply(economy, constants)
                    && can_afford(economy, constants.direct_pulser_cost())
            }
            Self::PilotPulser => {
                economy.has(Producible::Vecgir) && can_afford(economy, constants.pulser.cost)
            }
            Self::UpgradePulser => {
                economy.has(Producible::Pulser) && can_afford(economy, constants.upgrade.cost)
            }
        }
    }

    /// Run the guard against `node`, returning a token that can apply the
    /// action if it holds.
    #[must_use]
    pub fn check<'a>(
        self,
        node: &'a SearchNode,
        constants: &'a GameConstants,
    ) -> Option<Applicable<'a>> {
        self.can_apply(node.economy(), constants)
            .then_some(Applicable {
                action: self,
                node,
                constants,
            })
    }
}

/// Proof that an action's guard held for a particular node.
#[derive(Debug, Clone, Copy)]
pub struct Applicable<'a> {
    action: Action,
    node: &'a SearchNode,
    constants: &'a GameConstants,
}

impl Applicable<'_> {
    /// The action this token applies.
    #[must_use]
    pub const fn action(&self) -> Action {
        self.action
    }

    /// Produce the successor node.
    ///
    /// # Errors
    ///
    /// Only fails if the simulator rejects an advance, which indicates a bug.
    pub fn apply(self) -> Result<SearchNode> {
        let constants = self.constants;
        let mut next = self.node.successor(self.action);

        match self.action {
            Action::BuildGenerator(currency) => {
                spend(&mut next, constants.generator.cost, constants)?;
                next.economy_mut()
                    .generators_mut(currency)
                    .push_under_construction(constants.generator.time);
            }
            Action::SwitchGenerator { from } => {
                let (index, waited) = wait_for_idle_generator(next.economy_mut(), from, constants)?
                    .ok_or(PlannerError::MissingPrerequisite(from.label()))?;
                next.add_elapsed(waited);
                let economy = next.economy_mut();
                economy.generators_mut(from).remove(index);
                economy
                    .generators_mut(from.other())
                    .push_under_construction(constants.generator_switch_time);
            }
            Action::BuildFoundation => {
                spend(&mut next, constants.foundation.cost, constants)?;
                next.economy_mut()
                    .enqueue(Producible::Foundation, constants.foundation.time);
            }
            Action::BuildDepot => {
                await_completion(&mut next, Producible::Foundation, constants)?;
                spend(&mut next, constants.depot.cost, constants)?;
                consume(&mut next, Producible::Foundation)?;
                next.economy_mut()
                    .enqueue(Producible::Depot, constants.depot.time);
            }
            Action::BuildVecgir => {
                await_completion(&mut next, Producible::Depot, constants)?;
                spend(&mut next, constants.vecgir.cost, constants)?;
                next.economy_mut()
                    .enqueue(Producible::Vecgir, constants.vecgir.time);
            }
            Action::BuildPulser => {
                await_completion(&mut next, Producible::Depot, constants)?;
                spend(&mut next, constants.direct_pulser_cost(), constants)?;
                next.economy_mut()
                    .enqueue(Producible::Pulser, constants.pulser.time);
            }
            Action::PilotPulser => {
                await_completion(&mut next, Producible::Vecgir, constants)?;
                spend(&mut next, constants.pulser.cost, constants)?;
                consume(&mut next, Producible::Vecgir)?;
                next.economy_mut()
                    .enqueue(Producible::Pulser, constants.pilot_time());
            }
            Action::UpgradePulser => {
                await_completion(&mut next, Producible::Pulser, constants)?;
                spend(&mut next, constants.upgrade.cost, constants)?;
                consume(&mut next, Producible::Pulser)?;
                next.economy_mut()
                    .enqueue(Producible::UpgradedPulser, constants.upgrade.time);
            }
        }

        Ok(next)
    }
}

/// Spending `amount` is possible now or eventually: either the stock already
/// covers it or a generator will refill it.
#[must_use]
pub fn can_spend(economy: &Economy, currency: Currency, amount: Resource) -> bool {
    economy.stock(currency) >= amount || !economy.generators(currency).is_empty()
}

/// Both parts of `cost` can eventually be paid.
#[must_use]
pub fn can_afford(economy: &Economy, cost: Cost) -> bool {
    Currency::ALL
        .into_iter()
        .all(|currency| can_spend(economy, currency, cost.get(currency)))
}

/// The depots (finished or queued) can field another unit.
fn has_free_supply(economy: &Economy, constants: &GameConstants) -> bool {
    economy.has(Producible::Depot)
        && economy.produced(Producible::Vecgir)
            < constants.units_per_depot * economy.produced(Producible::Depot)
}

/// Wait until `amount` of `currency` is available, then deduct it.
///
/// # Errors
///
/// Returns [`PlannerError::MissingPrerequisite`] if the stock is short and
/// the currency has no generator (the guard [`can_spend`] rules this out).
pub fn spend_resource(
    node: &mut SearchNode,
    currency: Currency,
    amount: Resource,
    constants: &GameConstants,
) -> Result<()> {
    let waited = gather_until(node.economy_mut(), currency, amount, constants)?
        .ok_or(PlannerError::MissingPrerequisite(currency.label()))?;
    if waited > 0 {
        node.add_elapsed(waited);
    }
    node.economy_mut().deduct(currency, amount);
    Ok(())
}

/// Pay a two-currency cost, LC first.
fn spend(node: &mut SearchNode, cost: Cost, constants: &GameConstants) -> Result<()> {
    for currency in Currency::ALL {
        let amount = cost.get(currency);
        if amount > 0 {
            spend_resource(node, currency, amount, constants)?;
        }
    }
    Ok(())
}

fn await_completion(
    node: &mut SearchNode,
    kind: Producible,
    constants: &GameConstants,
) -> Result<()> {
    let waited = wait_for_completion(node.economy_mut(), kind, constants)?;
    node.add_elapsed(waited);
    Ok(())
}

fn consume(node: &mut SearchNode, kind: Producible) -> Result<()> {
    if node.economy_mut().consume(kind) {
        Ok(())
    } else {
        Err(PlannerError::MissingPrerequisite(kind.label()))
    }
}
