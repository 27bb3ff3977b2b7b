//! Property tests for the economy simulator and the action catalog.

use planner_core::actions::Action;
use planner_core::economy::{advance, gather_until, time_to_cycle_switch, Currency, Producible};
use planner_core::node::SearchNode;
use planner_test_utils::determinism::strategies::{
    arb_dt, arb_economy, arb_producing_economy, arb_target, arb_timer,
};
use planner_test_utils::determinism::{compute_hash, find_first_divergence, verify_determinism};
use planner_test_utils::fixtures::{constants, lc_economy, starting_economy};
use proptest::prelude::*;

const ACTIONS: [Action; 10] = [
    Action::BuildGenerator(Currency::Lc),
    Action::BuildGenerator(Currency::Qp),
    Action::SwitchGenerator { from: Currency::Lc },
    Action::SwitchGenerator { from: Currency::Qp },
    Action::BuildFoundation,
    Action::BuildDepot,
    Action::BuildVecgir,
    Action::BuildPulser,
    Action::PilotPulser,
    Action::UpgradePulser,
];

#[test]
fn test_repeated_advance_is_deterministic() {
    let constants = constants();
    let result = verify_determinism(
        4,
        200,
        starting_economy,
        |economy| advance(economy, 7, &constants).unwrap(),
        compute_hash,
    );
    result.assert_deterministic();
}

#[test]
fn test_single_tick_and_bulk_advance_agree() {
    let constants = constants();
    // Advancing by one tick 268 times lands where one 268-tick advance does.
    let divergence = find_first_divergence(
        || lc_economy(0, 0, vec![0, 100, -50]),
        1,
        |economy| {
            for _ in 0..268 {
                advance(economy, 1, &constants).unwrap();
            }
        },
        |economy| advance(economy, 268, &constants).unwrap(),
    );
    assert_eq!(divergence, None);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Splitting an advance in two never changes the outcome.
    #[test]
    fn prop_advance_is_additive(
        economy in arb_economy(),
        a in arb_dt(),
        b in arb_dt(),
    ) {
        let constants = constants();
        let mut split = economy.clone();
        advance(&mut split, a, &constants).unwrap();
        advance(&mut split, b, &constants).unwrap();

        let mut whole = economy;
        advance(&mut whole, a + b, &constants).unwrap();

        prop_assert_eq!(split, whole);
    }

    /// Operating timers always stay inside their cycle.
    #[test]
    fn prop_operating_timers_stay_in_cycle(economy in arb_economy(), dt in arb_dt()) {
        let constants = constants();
        let mut economy = economy;
        advance(&mut economy, dt, &constants).unwrap();

        for currency in Currency::ALL {
            let cycle = constants.generator_spec(currency).cycle_length;
            for &timer in economy.generators(currency).timers() {
                prop_assert!(timer < cycle, "{:?} timer {} >= {}", currency, timer, cycle);
            }
        }
    }

    /// Waiting out `time_to_cycle_switch` always lands on a cycle boundary.
    #[test]
    fn prop_cycle_switch_lands_on_boundary(timer in arb_timer()) {
        let constants = constants();
        let wait = time_to_cycle_switch(timer, 268);
        prop_assert!(wait >= 1);

        let mut economy = lc_economy(0, 0, vec![timer]);
        advance(&mut economy, wait, &constants).unwrap();
        prop_assert_eq!(economy.generators(Currency::Lc).timers(), &[0]);
    }

    /// The bulk gathering path lands on the same tick as stepping one tick
    /// at a time.
    #[test]
    fn prop_gather_matches_tick_stepping(economy in arb_producing_economy(), target in arb_target()) {
        let constants = constants();
        let mut fast = economy.clone();
        let waited = gather_until(&mut fast, Currency::Lc, target, &constants)
            .unwrap()
            .unwrap();

        let mut slow = economy;
        let mut ticks = 0;
        while slow.stock(Currency::Lc) < target {
            advance(&mut slow, 1, &constants).unwrap();
            ticks += 1;
        }

        prop_assert_eq!(waited, ticks);
        prop_assert_eq!(fast, slow);
    }

    /// Along any sequence of applicable actions, nothing already produced is
    /// ever lost and time never runs backwards.
    #[test]
    fn prop_produced_counts_never_decrease(
        choices in proptest::collection::vec(0usize..ACTIONS.len(), 1..12),
        lc in 0u32..500,
        qp in 0u32..300,
    ) {
        let constants = constants();
        let mut node = SearchNode::root(lc_economy(lc, qp, vec![0, 0, 0]));

        for choice in choices {
            let Some(applicable) = ACTIONS[choice].check(&node, &constants) else {
                continue;
            };
            let next = applicable.apply().unwrap();

            prop_assert!(next.elapsed() >= node.elapsed());
            for kind in Producible::ALL {
                prop_assert!(
                    next.economy().produced(kind) >= node.economy().produced(kind),
                    "{:?} decreased after {:?}",
                    kind,
                    next.action()
                );
            }
            node = next;
        }
    }
}
