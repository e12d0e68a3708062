//! Sowing game integration tests.

use boardstake::core::{CaptureEvent, Side, SowingConfig, SowingStyle};
use boardstake::games::sowing::{
    pit_range, store_index, SowingEvaluator, SowingMove, SowingRules, SLOT_COUNT,
};
use boardstake::rules::{GameResult, RulesEngine};
use boardstake::search::{playout, MinimaxSearch, RandomPlayer};
use proptest::prelude::*;

fn rules(style: SowingStyle) -> SowingRules {
    SowingRules::new(SowingConfig::default().with_style(style))
}

// =============================================================================
// Worked Examples
// =============================================================================

#[test]
fn test_opening_sow_from_pit_zero() {
    let rules = rules(SowingStyle::Oware);
    let state = rules.initial_state();

    let next = rules
        .apply_move(&state, &SowingMove::new(Side::First, 0))
        .unwrap();

    assert_eq!(next.seeds(0), 0);
    assert_eq!(&next.slots()[1..5], &[5, 5, 5, 5]);
    assert_eq!(next.store(Side::First), 0);
    assert!(next.captures().is_empty());
    assert_eq!(next.to_move(), Side::Second);
}

#[test]
fn test_pit_zero_capture_into_opponent_row() {
    let rules = rules(SowingStyle::Oware);
    let mut slots = [0u16; SLOT_COUNT];
    slots[0] = 8; // 1..=5, own store, 7, 8
    slots[7] = 1;
    slots[8] = 2;
    slots[10] = 4;
    slots[store_index(Side::First)] = 3;
    let state = rules.position(slots, Side::First);
    let store_before = state.store(Side::First);

    let next = rules
        .apply_move(&state, &SowingMove::new(Side::First, 0))
        .unwrap();

    assert_eq!(next.seeds(8), 0);
    assert_eq!(next.seeds(7), 0);
    assert_eq!(next.store(Side::First), store_before + 1 + 3 + 2);
    assert_eq!(
        next.captures().iter().copied().collect::<Vec<_>>(),
        vec![
            CaptureEvent::new(Side::First, 3, 8),
            CaptureEvent::new(Side::First, 2, 7),
        ]
    );
    assert_eq!(next.total_seeds(), state.total_seeds());
}

#[test]
fn test_kalah_extra_turn_keeps_mover() {
    let rules = rules(SowingStyle::Kalah);
    let state = rules.initial_state();

    // Pit 2 holds 4 seeds: 3, 4, 5, store.
    let next = rules
        .apply_move(&state, &SowingMove::new(Side::First, 2))
        .unwrap();
    assert_eq!(next.store(Side::First), 1);
    assert_eq!(next.to_move(), Side::First);
    assert!(rules
        .apply_move(&next, &SowingMove::new(Side::Second, 7))
        .is_err());
}

#[test]
fn test_rejected_move_leaves_state_untouched() {
    let rules = rules(SowingStyle::Oware);
    let state = rules.initial_state();
    let snapshot = state.clone();

    assert!(rules
        .apply_move(&state, &SowingMove::new(Side::First, 9))
        .is_err());
    assert_eq!(state, snapshot);
}

// =============================================================================
// Full Games
// =============================================================================

#[test]
fn test_random_playout_reaches_an_end() {
    for style in [SowingStyle::Oware, SowingStyle::Kalah] {
        let rules = rules(style);
        let mut player = RandomPlayer::from_seed(11);
        let (state, _) = playout(&rules, &rules.initial_state(), &mut player, 2_000, |_, _, _| {});

        assert!(state.is_over(), "{style:?} playout did not finish");
        assert!(state.valid_moves().is_empty());
        for side in Side::BOTH {
            assert_eq!(state.seeds_in_pits(side), 0, "rows are swept at the end");
        }
    }
}

#[test]
fn test_search_beats_random() {
    let rules = rules(SowingStyle::Kalah);
    let mut search = MinimaxSearch::new(rules.clone(), SowingEvaluator);
    let mut random = RandomPlayer::from_seed(5);
    let mut state = rules.initial_state();

    while !state.is_over() {
        let mv = match state.to_move() {
            Side::First => search.best_move(&state, Side::First, 4),
            Side::Second => random.choose_move(&rules, &state),
        };
        let Some(mv) = mv else { break };
        state = rules.apply_move(&state, &mv).unwrap();
    }

    assert_eq!(state.result(), Some(GameResult::Winner(Side::First)));
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_seeds_are_conserved(seed in any::<u64>(), kalah in any::<bool>()) {
        let style = if kalah { SowingStyle::Kalah } else { SowingStyle::Oware };
        let rules = rules(style);
        let start = rules.initial_state();
        let total = start.total_seeds();
        let mut player = RandomPlayer::from_seed(seed);

        let mut violations = 0;
        playout(&rules, &start, &mut player, 300, |before, mv, after| {
            if after.total_seeds() != total {
                violations += 1;
            }
            // Captures only ever grow the mover's store.
            if after.store(mv.side) < before.store(mv.side) {
                violations += 1;
            }
        });
        prop_assert_eq!(violations, 0);
    }

    #[test]
    fn prop_moves_are_nonempty_own_pits(seed in any::<u64>(), plies in 0usize..60) {
        let rules = rules(SowingStyle::Oware);
        let mut player = RandomPlayer::from_seed(seed);
        let (state, _) = playout(&rules, &rules.initial_state(), &mut player, plies, |_, _, _| {});

        for mv in state.valid_moves() {
            prop_assert_eq!(mv.side, state.to_move());
            prop_assert!(pit_range(mv.side).contains(&mv.pit));
            prop_assert!(state.seeds(mv.pit) > 0);
        }
    }
}
