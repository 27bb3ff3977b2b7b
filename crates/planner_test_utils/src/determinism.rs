//! Determinism testing utilities.
//!
//! Provides a harness for verifying that the simulator and the search
//! engines produce identical results given identical inputs.
//!
//! # Testing Strategy
//!
//! Build orders must be reproducible: the same configuration has to yield
//! the same plan on every run and every machine. Sources of
//! non-determinism include:
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   The engines only use hashed sets for membership tests and never
//!   iterate them.
//!
//! - **Frontier ties**: equal `f` values must pop in a fixed order. The A*
//!   frontier breaks every tie down to insertion order.
//!
//! - **Floating-point math**: none. Ticks and resources are integers.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use planner_core::error::Result;
use planner_core::search::Solution;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of steps per run (0 for solver runs).
    pub steps: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic run).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that every run matched, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Runs are non-deterministic!\n\
                 Runs: {}\n\
                 Steps: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.steps,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a stepped computation multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to repeat
/// * `steps` - Number of steps per run
/// * `setup` - Function to create the initial state
/// * `step` - Function to advance the state by one step
/// * `hash` - Function to compute the state hash
///
/// # Example
///
/// ```ignore
/// use planner_test_utils::determinism::{compute_hash, verify_determinism};
///
/// let result = verify_determinism(
///     5,
///     100,
///     || starting_economy(),
///     |economy| advance(economy, 7, &constants).unwrap(),
///     compute_hash,
/// );
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    steps: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..steps {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        steps,
    }
}

/// Run a solver several times and verify every run returns the same build
/// order.
///
/// # Panics
///
/// Panics if any run fails.
pub fn verify_solver_determinism<F>(runs: usize, solve: F) -> DeterminismResult
where
    F: Fn() -> Result<Solution>,
{
    verify_determinism(
        runs,
        0,
        || match solve() {
            Ok(solution) => solution,
            Err(e) => panic!("solver failed: {e}"),
        },
        |_| {},
        |solution| compute_hash(&solution.build_order),
    )
}

/// Compare two stepped computations step-by-step, finding the first
/// divergence.
///
/// Useful for checking a fast path against a reference implementation.
///
/// # Returns
///
/// `None` if both stay identical, `Some(step)` at the first step where
/// they differ (0 for the initial state).
pub fn find_first_divergence<S, Setup, StepA, StepB>(
    setup: Setup,
    steps: u64,
    step_a: StepA,
    step_b: StepB,
) -> Option<u64>
where
    S: PartialEq,
    Setup: Fn() -> S,
    StepA: Fn(&mut S),
    StepB: Fn(&mut S),
{
    let mut a = setup();
    let mut b = setup();

    if a != b {
        return Some(0);
    }

    for step in 1..=steps {
        step_a(&mut a);
        step_b(&mut b);

        if a != b {
            return Some(step);
        }
    }

    None
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for simulator properties.
///
/// These strategies generate random but reproducible economies for
/// property-based testing of the simulator.
pub mod strategies {
    use planner_core::economy::{Currency, Economy, GeneratorTimers, Producible, Tick};
    use proptest::prelude::*;

    /// Cycle length of the default LC generator.
    const LC_CYCLE: Tick = 268;

    /// A single generator timer: under construction (negative) or somewhere
    /// inside its cycle.
    pub fn arb_timer() -> impl Strategy<Value = Tick> {
        prop_oneof![-720i64..0, 0..LC_CYCLE]
    }

    /// A group of up to `max_len` generators.
    pub fn arb_generator_timers(max_len: usize) -> impl Strategy<Value = GeneratorTimers> {
        proptest::collection::vec(arb_timer(), 0..=max_len).prop_map(GeneratorTimers::from_timers)
    }

    /// Remaining production time of a queued entity.
    pub fn arb_countdown() -> impl Strategy<Value = Tick> {
        1i64..1000
    }

    /// A positive time step.
    pub fn arb_dt() -> impl Strategy<Value = Tick> {
        1i64..2000
    }

    /// A resource target the starting stocks may or may not already cover.
    pub fn arb_target() -> impl Strategy<Value = u32> {
        0u32..400
    }

    /// An economy with random stocks, generators and queues.
    pub fn arb_economy() -> impl Strategy<Value = Economy> {
        (
            0u32..200,
            0u32..200,
            arb_generator_timers(5),
            arb_generator_timers(3),
            proptest::collection::vec(arb_countdown(), 0..3),
            proptest::collection::vec(arb_countdown(), 0..3),
        )
            .prop_map(|(lc, qp, lc_gens, qp_gens, vecgirs, pulsers)| {
                let mut economy = Economy::new(lc, qp)
                    .with_generators(Currency::Lc, lc_gens)
                    .with_generators(Currency::Qp, qp_gens);
                for countdown in vecgirs {
                    economy.enqueue(Producible::Vecgir, countdown);
                }
                for countdown in pulsers {
                    economy.enqueue(Producible::Pulser, countdown);
                }
                economy
            })
    }

    /// An economy with at least one LC generator, so LC gathering always
    /// terminates.
    pub fn arb_producing_economy() -> impl Strategy<Value = Economy> {
        (arb_economy(), proptest::collection::vec(arb_timer(), 1..4)).prop_map(
            |(economy, timers)| {
                economy.with_generators(Currency::Lc, GeneratorTimers::from_timers(timers))
            },
        )
    }
}
