//! Draughts rules: diagonal steps, single jumps, promotion and the quiet-move draw.

use tracing::{instrument, warn};

use crate::core::{CaptureEvent, DraughtsConfig, MoveError, Side};
use crate::rules::{GameResult, RulesEngine};

use super::board::{
    col_of, forward, is_playable, promotion_row, row_of, square, DraughtsMove, DraughtsState,
    Piece, BOARD_SIZE, SQUARE_COUNT,
};

/// Diagonal directions as (row, col) deltas, in generation order.
const DIRECTIONS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Rows each side fills at the start.
const START_ROWS: usize = 3;

/// Draughts rules engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DraughtsRules {
    config: DraughtsConfig,
}

/// Square `steps` diagonals away from `from`, if it stays on the board.
fn offset(from: usize, (dr, dc): (isize, isize), steps: isize) -> Option<usize> {
    let row = row_of(from).checked_add_signed(dr * steps)?;
    let col = col_of(from).checked_add_signed(dc * steps)?;
    (row < BOARD_SIZE && col < BOARD_SIZE).then(|| square(row, col))
}

impl DraughtsRules {
    /// Create rules from a configuration.
    pub fn new(config: DraughtsConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &DraughtsConfig {
        &self.config
    }

    /// Build a state from a piece list.
    ///
    /// Fails if a piece sits on an unplayable square.
    pub fn position(
        &self,
        pieces: &[(usize, Piece)],
        to_move: Side,
    ) -> Result<DraughtsState, MoveError> {
        let mut state = DraughtsState::empty(to_move);
        for &(sq, piece) in pieces {
            if !is_playable(sq) {
                return Err(MoveError::invalid(format!("square {sq} is not playable")));
            }
            state.set(sq, Some(piece));
        }
        self.finish_turn(&mut state);
        Ok(state)
    }

    /// Highlight one of the mover's pieces that has at least one legal move.
    pub fn select(&self, state: &DraughtsState, from: usize) -> Result<DraughtsState, MoveError> {
        if state.is_over() {
            return Err(MoveError::GameAlreadyOver);
        }
        if !state.valid_moves.iter().any(|mv| mv.from == from) {
            return Err(MoveError::invalid(format!("no legal move from square {from}")));
        }
        let mut next = state.clone();
        next.selected = Some(from);
        Ok(next)
    }

    /// Legal moves, optionally restricted to one origin square.
    pub fn valid_moves(&self, state: &DraughtsState, from: Option<usize>) -> Vec<DraughtsMove> {
        state
            .valid_moves
            .iter()
            .filter(|mv| from.map_or(true, |f| mv.from == f))
            .copied()
            .collect()
    }

    /// Steps and jumps for `side`, squares ascending then by direction.
    fn generate(&self, state: &DraughtsState, side: Side) -> Vec<DraughtsMove> {
        let mut moves = Vec::new();
        let mut any_jump = false;

        for (from, piece) in state.pieces().filter(|(_, p)| p.side == side) {
            for dir in DIRECTIONS {
                if !piece.king && dir.0 != forward(side) {
                    continue;
                }
                let Some(near) = offset(from, dir, 1) else {
                    continue;
                };
                match state.piece_at(near) {
                    None => moves.push(DraughtsMove::new(side, from, near)),
                    Some(other) if other.side != side => {
                        if let Some(far) = offset(from, dir, 2) {
                            if state.piece_at(far).is_none() {
                                moves.push(DraughtsMove::new(side, from, far));
                                any_jump = true;
                            }
                        }
                    }
                    Some(_) => {}
                }
            }
        }

        if self.config.forced_capture && any_jump {
            moves.retain(DraughtsMove::is_jump);
        }
        moves
    }

    /// Result check and move regeneration for the side now to move.
    fn finish_turn(&self, state: &mut DraughtsState) {
        let side = state.to_move;
        state.valid_moves = if state.piece_count(side) == 0 {
            Vec::new()
        } else {
            self.generate(state, side)
        };

        if state.valid_moves.is_empty() {
            state.result = Some(GameResult::Winner(side.opponent()));
        } else if self.config.quiet_move_limit > 0
            && state.quiet_plies >= self.config.quiet_move_limit
        {
            state.result = Some(GameResult::Draw);
            state.valid_moves.clear();
        }
    }
}

impl RulesEngine for DraughtsRules {
    type State = DraughtsState;
    type Move = DraughtsMove;

    fn initial_state(&self) -> DraughtsState {
        let mut state = DraughtsState::empty(Side::First);
        for sq in (0..SQUARE_COUNT).filter(|&sq| is_playable(sq)) {
            let row = row_of(sq);
            if row < START_ROWS {
                state.set(sq, Some(Piece::man(Side::Second)));
            } else if row >= BOARD_SIZE - START_ROWS {
                state.set(sq, Some(Piece::man(Side::First)));
            }
        }
        self.finish_turn(&mut state);
        state
    }

    fn side_to_move(&self, state: &DraughtsState) -> Side {
        state.to_move
    }

    fn legal_moves(&self, state: &DraughtsState) -> Vec<DraughtsMove> {
        state.valid_moves.clone()
    }

    fn play(&self, state: &DraughtsState, mv: &DraughtsMove) -> DraughtsState {
        let mut next = state.clone();
        let Some(mut piece) = next.piece_at(mv.from) else {
            return next;
        };
        next.set(mv.from, None);

        if let Some(jumped) = mv.jumped() {
            next.set(jumped, None);
            next.captures.push_back(CaptureEvent::new(mv.side, 1, jumped));
            next.quiet_plies = 0;
        } else {
            next.quiet_plies = next.quiet_plies.saturating_add(1);
        }

        if row_of(mv.to) == promotion_row(mv.side) {
            piece.king = true;
        }
        next.set(mv.to, Some(piece));

        next.selected = None;
        next.last_move = Some(*mv);
        next.to_move = mv.side.opponent();
        self.finish_turn(&mut next);
        next
    }

    #[instrument(skip(self, state), fields(side = %mv.side, from = mv.from, to = mv.to))]
    fn apply_move(
        &self,
        state: &DraughtsState,
        mv: &DraughtsMove,
    ) -> Result<DraughtsState, MoveError> {
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
            warn!("rejected draughts move");
            return Err(MoveError::invalid(format!(
                "{} -> {} is not a legal move for {}",
                mv.from, mv.to, mv.side
            )));
        }
        Ok(self.play(state, mv))
    }

    fn result(&self, state: &DraughtsState) -> Option<GameResult> {
        state.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> DraughtsRules {
        DraughtsRules::new(DraughtsConfig::default())
    }

    #[test]
    fn test_initial_state() {
        let state = rules().initial_state();
        assert_eq!(state.piece_count(Side::First), 12);
        assert_eq!(state.piece_count(Side::Second), 12);
        assert_eq!(state.to_move(), Side::First);
        // Only the front row (row 5) can move: 4 pieces, 7 diagonal steps.
        assert_eq!(state.valid_moves().len(), 7);
        assert!(state.valid_moves().iter().all(|mv| row_of(mv.from) == 5));
        assert!(state.valid_moves().iter().all(|mv| row_of(mv.to) == 4));
    }

    #[test]
    fn test_generation_order() {
        let state = rules().initial_state();
        let first = state.valid_moves()[0];
        assert_eq!(first, DraughtsMove::new(Side::First, square(5, 0), square(4, 1)));
        let second = state.valid_moves()[1];
        assert_eq!(second, DraughtsMove::new(Side::First, square(5, 2), square(4, 1)));
    }

    #[test]
    fn test_men_move_forward_only() {
        let rules = rules();
        let state = rules
            .position(
                &[
                    (square(4, 3), Piece::man(Side::First)),
                    (square(0, 7), Piece::man(Side::Second)),
                ],
                Side::First,
            )
            .unwrap();
        let targets: Vec<usize> = state.valid_moves().iter().map(|mv| mv.to).collect();
        assert_eq!(targets, vec![square(3, 2), square(3, 4)]);
    }

    #[test]
    fn test_king_moves_all_directions() {
        let rules = rules();
        let state = rules
            .position(
                &[
                    (square(4, 3), Piece::king(Side::First)),
                    (square(0, 7), Piece::man(Side::Second)),
                ],
                Side::First,
            )
            .unwrap();
        let moves = rules.valid_moves(&state, Some(square(4, 3)));
        assert_eq!(moves.len(), 4);
    }

    #[test]
    fn test_jump_removes_piece() {
        let rules = rules();
        let state = rules
            .position(
                &[
                    (square(5, 2), Piece::man(Side::First)),
                    (square(4, 3), Piece::man(Side::Second)),
                    (square(0, 1), Piece::man(Side::Second)),
                ],
                Side::First,
            )
            .unwrap();

        let jump = DraughtsMove::new(Side::First, square(5, 2), square(3, 4));
        assert!(state.valid_moves().contains(&jump));

        let next = rules.apply_move(&state, &jump).unwrap();
        assert_eq!(next.piece_at(square(4, 3)), None);
        assert_eq!(next.piece_at(square(3, 4)), Some(Piece::man(Side::First)));
        assert_eq!(next.piece_count(Side::Second), 1);
        assert_eq!(next.captured_by(Side::First), 1);
        assert_eq!(next.captures()[0], CaptureEvent::new(Side::First, 1, square(4, 3)));
        assert_eq!(next.quiet_plies(), 0);
        assert_eq!(next.to_move(), Side::Second);
    }

    #[test]
    fn test_forced_capture_filters_steps() {
        let pieces = [
            (square(5, 2), Piece::man(Side::First)),
            (square(5, 6), Piece::man(Side::First)),
            (square(4, 3), Piece::man(Side::Second)),
        ];

        let optional = rules().position(&pieces, Side::First).unwrap();
        assert!(optional.valid_moves().iter().any(|mv| !mv.is_jump()));

        let forced = DraughtsRules::new(DraughtsConfig::default().with_forced_capture(true));
        let state = forced.position(&pieces, Side::First).unwrap();
        assert_eq!(
            state.valid_moves(),
            &[DraughtsMove::new(Side::First, square(5, 2), square(3, 4))]
        );
    }

    #[test]
    fn test_promotion() {
        let rules = rules();
        let state = rules
            .position(
                &[
                    (square(1, 2), Piece::man(Side::First)),
                    (square(7, 0), Piece::man(Side::Second)),
                ],
                Side::First,
            )
            .unwrap();
        let next = rules
            .apply_move(&state, &DraughtsMove::new(Side::First, square(1, 2), square(0, 1)))
            .unwrap();
        assert_eq!(next.piece_at(square(0, 1)), Some(Piece::king(Side::First)));
    }

    #[test]
    fn test_last_capture_wins() {
        let rules = rules();
        let state = rules
            .position(
                &[
                    (square(5, 2), Piece::man(Side::First)),
                    (square(4, 3), Piece::man(Side::Second)),
                ],
                Side::First,
            )
            .unwrap();
        let next = rules
            .apply_move(&state, &DraughtsMove::new(Side::First, square(5, 2), square(3, 4)))
            .unwrap();
        assert_eq!(next.result(), Some(GameResult::Winner(Side::First)));
        assert!(next.valid_moves().is_empty());
    }

    #[test]
    fn test_blocked_side_loses() {
        let rules = rules();
        // Second's man on row 7 cannot move forward.
        let state = rules
            .position(
                &[
                    (square(7, 0), Piece::man(Side::Second)),
                    (square(5, 0), Piece::man(Side::First)),
                ],
                Side::Second,
            )
            .unwrap();
        assert_eq!(state.result(), Some(GameResult::Winner(Side::First)));
    }

    #[test]
    fn test_quiet_move_draw() {
        let rules = DraughtsRules::new(DraughtsConfig::default().with_quiet_move_limit(2));
        let state = rules
            .position(
                &[
                    (square(4, 1), Piece::king(Side::First)),
                    (square(0, 7), Piece::king(Side::Second)),
                ],
                Side::First,
            )
            .unwrap();
        let a = rules
            .apply_move(&state, &DraughtsMove::new(Side::First, square(4, 1), square(3, 0)))
            .unwrap();
        assert!(!a.is_over());
        let b = rules
            .apply_move(&a, &DraughtsMove::new(Side::Second, square(0, 7), square(1, 6)))
            .unwrap();
        assert_eq!(b.result(), Some(GameResult::Draw));
    }

    #[test]
    fn test_rejections() {
        let rules = rules();
        let state = rules.initial_state();

        let wrong_side = rules.apply_move(
            &state,
            &DraughtsMove::new(Side::Second, square(2, 1), square(3, 0)),
        );
        assert!(matches!(wrong_side, Err(MoveError::NotYourTurn { .. })));

        let backward = rules.apply_move(
            &state,
            &DraughtsMove::new(Side::First, square(5, 0), square(6, 1)),
        );
        assert!(matches!(backward, Err(MoveError::InvalidMove(_))));

        assert!(rules.position(&[(0, Piece::man(Side::First))], Side::First).is_err());
    }

    #[test]
    fn test_select() {
        let rules = rules();
        let state = rules.initial_state();
        let selected = rules.select(&state, square(5, 2)).unwrap();
        assert_eq!(selected.valid_destinations(), vec![square(4, 1), square(4, 3)]);
        assert!(rules.select(&state, square(6, 1)).is_err());
    }
}
