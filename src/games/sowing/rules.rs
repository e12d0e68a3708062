//! Sowing rules: distribution, captures, extra turns and the end sweep.

use tracing::{instrument, warn};

use crate::core::{CaptureEvent, CaptureHistory, MoveError, Side, SowingConfig, SowingStyle};
use crate::rules::{GameResult, RulesEngine};

use super::board::{
    opposite_pit, pit_owner, pit_range, store_index, SowingMove, SowingState, PITS_PER_SIDE,
    SLOT_COUNT,
};

/// Sowing rules engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SowingRules {
    config: SowingConfig,
}

impl SowingRules {
    /// Create rules from a configuration.
    pub fn new(config: SowingConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &SowingConfig {
        &self.config
    }

    /// Build a state from an arbitrary slot layout.
    ///
    /// Used for puzzles and tests. The end-of-game check runs immediately, so
    /// a layout with an empty row comes back already finished.
    pub fn position(&self, slots: [u16; SLOT_COUNT], to_move: Side) -> SowingState {
        let mut state = SowingState {
            slots,
            to_move,
            selected: None,
            valid_moves: Vec::new(),
            result: None,
            captures: CaptureHistory::new(),
            last_move: None,
        };
        self.finish_turn(&mut state);
        state
    }

    /// Highlight a pit; the pit must hold a legal move for the side to move.
    pub fn select(&self, state: &SowingState, pit: usize) -> Result<SowingState, MoveError> {
        if state.is_over() {
            return Err(MoveError::GameAlreadyOver);
        }
        if !state.valid_moves.iter().any(|mv| mv.pit == pit) {
            return Err(MoveError::invalid(format!("pit {pit} cannot be sown")));
        }
        let mut next = state.clone();
        next.selected = Some(pit);
        Ok(next)
    }

    /// Legal moves, optionally restricted to one pit.
    pub fn valid_moves(&self, state: &SowingState, pit: Option<usize>) -> Vec<SowingMove> {
        state
            .valid_moves
            .iter()
            .filter(|mv| pit.map_or(true, |p| mv.pit == p))
            .copied()
            .collect()
    }

    /// Non-empty pits of `side`, ascending.
    fn generate(slots: &[u16; SLOT_COUNT], side: Side) -> Vec<SowingMove> {
        pit_range(side)
            .filter(|&pit| slots[pit] > 0)
            .map(|pit| SowingMove::new(side, pit))
            .collect()
    }

    /// Oware capture: 2s and 3s chained backward through the opponent's row.
    fn capture_chain(state: &mut SowingState, side: Side, landing: usize) {
        let row = pit_range(side.opponent());
        let mut pit = landing;

        while row.contains(&pit) && matches!(state.slots[pit], 2 | 3) {
            let count = state.slots[pit];
            state.slots[pit] = 0;
            state.slots[store_index(side)] += count;
            state.captures.push_back(CaptureEvent::new(side, count, pit));

            if pit == row.start {
                break;
            }
            pit -= 1;
        }
    }

    /// Kalah capture: a lone seed in an own empty pit takes the facing pit.
    fn capture_opposite(state: &mut SowingState, side: Side, landing: usize) {
        if pit_owner(landing) != Some(side) || state.slots[landing] != 1 {
            return;
        }
        let facing = opposite_pit(landing);
        let count = state.slots[facing] + 1;
        state.slots[facing] = 0;
        state.slots[landing] = 0;
        state.slots[store_index(side)] += count;
        state.captures.push_back(CaptureEvent::new(side, count, facing));
    }

    /// End check, sweep and move regeneration after every transition.
    fn finish_turn(&self, state: &mut SowingState) {
        let row_empty = |side: Side| pit_range(side).all(|pit| state.slots[pit] == 0);

        if row_empty(Side::First) || row_empty(Side::Second) {
            for side in Side::BOTH {
                let remaining: u16 = pit_range(side).map(|pit| state.slots[pit]).sum();
                for pit in pit_range(side) {
                    state.slots[pit] = 0;
                }
                state.slots[store_index(side)] += remaining;
            }

            let first = state.store(Side::First);
            let second = state.store(Side::Second);
            state.result = Some(match first.cmp(&second) {
                std::cmp::Ordering::Greater => GameResult::Winner(Side::First),
                std::cmp::Ordering::Less => GameResult::Winner(Side::Second),
                std::cmp::Ordering::Equal => GameResult::Draw,
            });
            state.valid_moves.clear();
        } else {
            state.valid_moves = Self::generate(&state.slots, state.to_move);
        }
    }
}

impl RulesEngine for SowingRules {
    type State = SowingState;
    type Move = SowingMove;

    fn initial_state(&self) -> SowingState {
        let mut slots = [0u16; SLOT_COUNT];
        for side in Side::BOTH {
            for pit in pit_range(side).take(PITS_PER_SIDE) {
                slots[pit] = self.config.seeds_per_pit;
            }
        }
        self.position(slots, Side::First)
    }

    fn side_to_move(&self, state: &SowingState) -> Side {
        state.to_move
    }

    fn legal_moves(&self, state: &SowingState) -> Vec<SowingMove> {
        state.valid_moves.clone()
    }

    fn play(&self, state: &SowingState, mv: &SowingMove) -> SowingState {
        let mut next = state.clone();
        let side = mv.side;

        let mut seeds = next.slots[mv.pit];
        next.slots[mv.pit] = 0;

        let skipped = self
            .config
            .style
            .skips_opponent_store()
            .then(|| store_index(side.opponent()));

        let mut slot = mv.pit;
        while seeds > 0 {
            slot = (slot + 1) % SLOT_COUNT;
            if Some(slot) == skipped {
                continue;
            }
            next.slots[slot] += 1;
            seeds -= 1;
        }

        let mut extra_turn = false;
        match self.config.style {
            SowingStyle::Oware => Self::capture_chain(&mut next, side, slot),
            SowingStyle::Kalah => {
                if slot == store_index(side) {
                    extra_turn = true;
                } else {
                    Self::capture_opposite(&mut next, side, slot);
                }
            }
        }

        next.selected = None;
        next.last_move = Some(*mv);
        next.to_move = if extra_turn { side } else { side.opponent() };
        self.finish_turn(&mut next);
        next
    }

    #[instrument(skip(self, state), fields(side = %mv.side, pit = mv.pit))]
    fn apply_move(&self, state: &SowingState, mv: &SowingMove) -> Result<SowingState, MoveError> {
        if state.is_over() {
            return Err(MoveError::GameAlreadyOver);
        }
        if mv.side != state.to_move {
            return Err(MoveError::NotYourTurn {
                expected: state.to_move,
                actual: mv.side,
            });
        }
        if !state.valid_moves.contains(mv) {
            warn!("rejected sowing move");
            return Err(MoveError::invalid(format!(
                "pit {} is not a non-empty pit of {}",
                mv.pit, mv.side
            )));
        }
        Ok(self.play(state, mv))
    }

    fn result(&self, state: &SowingState) -> Option<GameResult> {
        state.result
    }
}
