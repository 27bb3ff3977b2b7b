//! Discrete-event economy simulation.
//!
//! Resource generators yield a fixed amount at the end of every cycle and
//! production queues count down to completion. Everything advances in whole
//! ticks through [`advance`]; the waiting helpers in this module are free
//! functions over an explicit [`Economy`] so they can be tested without a
//! search engine.
//!
//! All calculations use integer math for deterministic simulation.

use serde::{Deserialize, Serialize};

use crate::data::GameConstants;
use crate::error::{PlannerError, Result};

/// Signed tick count. Negative timers mean "still under construction".
pub type Tick = i64;

/// Non-negative stock quantity.
pub type Resource = u32;

/// The two independent currencies of the economy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Currency {
    /// Liquid crystal, the primary currency.
    Lc,
    /// Queue points, the secondary currency.
    Qp,
}

impl Currency {
    /// Both currencies in canonical order.
    pub const ALL: [Self; 2] = [Self::Lc, Self::Qp];

    /// The currency a generator of this type can be switched to.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Lc => Self::Qp,
            Self::Qp => Self::Lc,
        }
    }

    /// Short display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lc => "LC",
            Self::Qp => "QP",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Ticks until a generator reaches the cycle boundary where it can be
/// reassigned.
///
/// A generator still under construction is charged its remaining build time
/// plus one full cycle: it has to complete a cycle before switching it is
/// worth anything.
#[must_use]
pub const fn time_to_cycle_switch(timer: Tick, cycle_length: Tick) -> Tick {
    if timer >= 0 {
        cycle_length - timer
    } else {
        -timer + cycle_length
    }
}

/// Cyclic timers of every generator of one currency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneratorTimers(Vec<Tick>);

impl GeneratorTimers {
    /// Create an empty generator group.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Create `count` operating generators sitting at the start of a cycle.
    #[must_use]
    pub fn operating(count: u32) -> Self {
        Self(vec![0; count as usize])
    }

    /// Build a group from raw timer values.
    #[must_use]
    pub fn from_timers(timers: Vec<Tick>) -> Self {
        Self(timers)
    }

    /// Number of generators, operating or under construction.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the group has no generator at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw timer values.
    #[must_use]
    pub fn timers(&self) -> &[Tick] {
        &self.0
    }

    /// Add a generator that becomes operational after `build_time` ticks.
    pub fn push_under_construction(&mut self, build_time: Tick) {
        self.0.push(-build_time);
    }

    /// Remove the generator at `index`, returning its timer.
    pub fn remove(&mut self, index: usize) -> Tick {
        self.0.remove(index)
    }

    /// Drop every generator, returning how many were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.0.len();
        self.0.clear();
        count
    }

    /// Advance every timer by `dt` and return the resources yielded.
    ///
    /// Operating timers are reduced modulo the cycle length afterwards, so
    /// they always stay within `[0, cycle_length)`.
    pub fn advance(&mut self, dt: Tick, cycle_length: Tick, yield_size: Resource) -> Resource {
        let mut produced: Resource = 0;
        for timer in &mut self.0 {
            *timer += dt;
            if *timer >= 0 {
                produced += (*timer / cycle_length) as Resource * yield_size;
                *timer %= cycle_length;
            }
        }
        produced
    }

    /// The generator closest to its cycle boundary and the ticks until it
    /// gets there. Ties go to the first generator.
    #[must_use]
    pub fn nearest_cycle_switch(&self, cycle_length: Tick) -> Option<(usize, Tick)> {
        let mut nearest: Option<(usize, Tick)> = None;
        for (index, &timer) in self.0.iter().enumerate() {
            let wait = time_to_cycle_switch(timer, cycle_length);
            if nearest.map_or(true, |(_, best)| wait < best) {
                nearest = Some((index, wait));
            }
        }
        nearest
    }
}

/// Countdowns of everything of one kind currently being produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductionQueue(Vec<Tick>);

impl ProductionQueue {
    /// Create an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of entries in progress.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing is in progress.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw countdown values (all negative).
    #[must_use]
    pub fn countdowns(&self) -> &[Tick] {
        &self.0
    }

    /// Start producing something that takes `duration` ticks.
    pub fn push(&mut self, duration: Tick) {
        self.0.push(-duration);
    }

    /// Advance every entry by `dt`, removing and counting the finished ones.
    pub fn advance(&mut self, dt: Tick) -> u32 {
        let before = self.0.len();
        for countdown in &mut self.0 {
            *countdown += dt;
        }
        self.0.retain(|&countdown| countdown < 0);
        (before - self.0.len()) as u32
    }

    /// Ticks until the entry nearest to completion finishes.
    #[must_use]
    pub fn time_to_next_completion(&self) -> Option<Tick> {
        self.0.iter().max().map(|&countdown| -countdown)
    }
}

/// Structures and units of the production chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Producible {
    /// Foundation structure, consumed when a depot is built on it.
    Foundation,
    /// Depot structure; produces vecgirs and pulsers.
    Depot,
    /// Vecgir (ZV), consumed when piloted into a pulser.
    Vecgir,
    /// Pulser (ZP), consumed when upgraded.
    Pulser,
    /// Upgraded pulser.
    UpgradedPulser,
}

impl Producible {
    /// Every producible in chain order.
    pub const ALL: [Self; 5] = [
        Self::Foundation,
        Self::Depot,
        Self::Vecgir,
        Self::Pulser,
        Self::UpgradedPulser,
    ];

    /// What this entity turns into further down the chain, if anything.
    #[must_use]
    pub const fn successor(self) -> Option<Self> {
        match self {
            Self::Foundation => Some(Self::Depot),
            Self::Depot | Self::UpgradedPulser => None,
            Self::Vecgir => Some(Self::Pulser),
            Self::Pulser => Some(Self::UpgradedPulser),
        }
    }

    /// Display name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Foundation => "Foundation",
            Self::Depot => "Depot",
            Self::Vecgir => "ZV",
            Self::Pulser => "ZP",
            Self::UpgradedPulser => "upgraded ZP",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Complete economic state of the base.
///
/// Equality and hashing are structural over every field, including the full
/// contents of every timer group and queue. Two states that compare equal
/// are interchangeable for search pruning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Economy {
    stocks: [Resource; 2],
    generators: [GeneratorTimers; 2],
    completed: [u32; 5],
    queues: [ProductionQueue; 5],
}

impl Economy {
    /// Create an economy with the given stocks and nothing else.
    #[must_use]
    pub fn new(lc: Resource, qp: Resource) -> Self {
        Self {
            stocks: [lc, qp],
            ..Self::default()
        }
    }

    /// Create the starting economy described by the balance table.
    #[must_use]
    pub fn from_constants(constants: &GameConstants) -> Self {
        let mut economy = Self::new(constants.initial_lc, constants.initial_qp);
        economy.generators = [
            GeneratorTimers::operating(constants.initial_lc_generators),
            GeneratorTimers::operating(constants.initial_qp_generators),
        ];
        economy
    }

    /// Replace a currency's generator group.
    #[must_use]
    pub fn with_generators(mut self, currency: Currency, generators: GeneratorTimers) -> Self {
        self.generators[currency.index()] = generators;
        self
    }

    /// Current stock of a currency.
    #[must_use]
    pub const fn stock(&self, currency: Currency) -> Resource {
        self.stocks[currency.index()]
    }

    /// Remove `amount` from a stock that is known to hold it.
    pub fn deduct(&mut self, currency: Currency, amount: Resource) {
        let stock = &mut self.stocks[currency.index()];
        debug_assert!(*stock >= amount, "deducting more than the stock holds");
        *stock = stock.saturating_sub(amount);
    }

    /// Generators of a currency.
    #[must_use]
    pub const fn generators(&self, currency: Currency) -> &GeneratorTimers {
        &self.generators[currency.index()]
    }

    /// Generators of a currency, mutably.
    pub fn generators_mut(&mut self, currency: Currency) -> &mut GeneratorTimers {
        &mut self.generators[currency.index()]
    }

    /// Total generators across both currencies.
    #[must_use]
    pub fn generator_count(&self) -> usize {
        self.generators.iter().map(GeneratorTimers::len).sum()
    }

    /// Finished entities of a kind.
    #[must_use]
    pub const fn completed(&self, kind: Producible) -> u32 {
        self.completed[kind.index()]
    }

    /// In-progress entities of a kind.
    #[must_use]
    pub const fn queue(&self, kind: Producible) -> &ProductionQueue {
        &self.queues[kind.index()]
    }

    /// Start producing an entity that completes after `duration` ticks.
    pub fn enqueue(&mut self, kind: Producible, duration: Tick) {
        self.queues[kind.index()].push(duration);
    }

    /// Use up one finished entity. Returns `false` if none was available.
    pub fn consume(&mut self, kind: Producible) -> bool {
        let count = &mut self.completed[kind.index()];
        if *count == 0 {
            return false;
        }
        *count -= 1;
        true
    }

    /// Add finished entities directly, bypassing the queue.
    pub fn add_completed(&mut self, kind: Producible, count: u32) {
        self.completed[kind.index()] += count;
    }

    /// True if an entity of this kind is finished or on its way.
    #[must_use]
    pub fn has(&self, kind: Producible) -> bool {
        self.completed(kind) > 0 || !self.queue(kind).is_empty()
    }

    /// Everything of this kind ever started: finished, queued, or already
    /// turned into something further down the chain.
    ///
    /// This total never decreases along a valid action sequence.
    #[must_use]
    pub fn produced(&self, kind: Producible) -> u32 {
        let own = self.completed(kind) + self.queue(kind).len() as u32;
        own + kind.successor().map_or(0, |next| self.produced(next))
    }
}

/// Advance the economy by `dt` ticks.
///
/// Generators yield into their stocks and wrap modulo their cycle length;
/// every production queue counts down and finished entries become
/// completed entities.
///
/// # Errors
///
/// Returns [`PlannerError::InvalidAdvance`] if `dt` is not positive.
pub fn advance(economy: &mut Economy, dt: Tick, constants: &GameConstants) -> Result<()> {
    if dt <= 0 {
        return Err(PlannerError::InvalidAdvance { dt });
    }

    for currency in Currency::ALL {
        let spec = constants.generator_spec(currency);
        let produced = economy.generators[currency.index()].advance(
            dt,
            spec.cycle_length,
            spec.yield_size,
        );
        economy.stocks[currency.index()] += produced;
    }

    for kind in Producible::ALL {
        economy.completed[kind.index()] += economy.queues[kind.index()].advance(dt);
    }

    Ok(())
}

/// Advance to the nearest cycle boundary of a currency's generators.
///
/// Returns the index of the generator that reached its boundary first (ties
/// go to the first one) together with the ticks waited, or `None` when the
/// currency has no generators. Reassigning a generator only at a boundary
/// means no partial cycle is ever thrown away.
pub fn wait_for_idle_generator(
    economy: &mut Economy,
    currency: Currency,
    constants: &GameConstants,
) -> Result<Option<(usize, Tick)>> {
    let cycle_length = constants.generator_spec(currency).cycle_length;
    let Some((index, wait)) = economy.generators(currency).nearest_cycle_switch(cycle_length)
    else {
        return Ok(None);
    };
    advance(economy, wait, constants)?;
    Ok(Some((index, wait)))
}

/// Advance until the stock of `currency` reaches `target`.
///
/// Returns the ticks spent, or `None` if the stock is short and nothing will
/// ever refill it. Whole cycles that cannot possibly reach the target are
/// skipped in one jump; after that the economy steps from one yield event to
/// the next, which lands on exactly the tick single-tick stepping would.
pub fn gather_until(
    economy: &mut Economy,
    currency: Currency,
    target: Resource,
    constants: &GameConstants,
) -> Result<Option<Tick>> {
    if economy.stock(currency) >= target {
        return Ok(Some(0));
    }
    let generators = economy.generators(currency).len() as u64;
    if generators == 0 {
        return Ok(None);
    }

    let spec = constants.generator_spec(currency);
    let mut waited: Tick = 0;

    // n generators yield at most n * k * yield_size in k full cycles, so
    // k - 1 cycles always leave the stock strictly short of the target.
    let deficit = u64::from(target - economy.stock(currency));
    let full_cycles = deficit / (generators * u64::from(spec.yield_size));
    if full_cycles > 1 {
        let jump = (full_cycles - 1) as Tick * spec.cycle_length;
        advance(economy, jump, constants)?;
        waited += jump;
    }

    while economy.stock(currency) < target {
        let Some((_, step)) = economy
            .generators(currency)
            .nearest_cycle_switch(spec.cycle_length)
        else {
            return Ok(None);
        };
        advance(economy, step, constants)?;
        waited += step;
    }

    Ok(Some(waited))
}

/// Make sure a finished entity of `kind` exists, advancing to the nearest
/// completion in its queue if needed. Returns the ticks waited.
///
/// # Errors
///
/// Returns [`PlannerError::MissingPrerequisite`] if nothing of that kind is
/// finished or queued.
pub fn wait_for_completion(
    economy: &mut Economy,
    kind: Producible,
    constants: &GameConstants,
) -> Result<Tick> {
    if economy.completed(kind) > 0 {
        return Ok(0);
    }
    let wait = economy
        .queue(kind)
        .time_to_next_completion()
        .ok_or(PlannerError::MissingPrerequisite(kind.label()))?;
    advance(economy, wait, constants)?;
    Ok(wait)
}
