//! Mill rules: placement, sliding, flying and mill captures.

use tracing::{instrument, warn};

use crate::core::{CaptureEvent, CaptureHistory, MillConfig, MoveError, Side, SideMap};
use crate::rules::{GameResult, RulesEngine};

use super::board::{
    mills_through, neighbors, MillAction, MillMove, MillPhase, MillState, POINT_COUNT,
};

/// A side reduced below this many pieces (board plus hand) loses.
pub const MIN_PIECES: u8 = 3;

/// Mill rules engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MillRules {
    config: MillConfig,
}

impl MillRules {
    /// Create rules from a configuration.
    pub fn new(config: MillConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &MillConfig {
        &self.config
    }

    /// Build a state from placed pieces and pieces left in hand.
    pub fn position(
        &self,
        pieces: &[(usize, Side)],
        in_hand: SideMap<u8>,
        to_move: Side,
    ) -> Result<MillState, MoveError> {
        let mut points = [None; POINT_COUNT];
        for &(point, side) in pieces {
            if point >= POINT_COUNT {
                return Err(MoveError::invalid(format!("point {point} is off the board")));
            }
            points[point] = Some(side);
        }
        let mut state = MillState {
            points,
            to_move,
            phase: MillPhase::Placement,
            in_hand,
            selected: None,
            valid_moves: Vec::new(),
            result: None,
            captures: CaptureHistory::new(),
            last_move: None,
            first_mill: None,
            quiet_plies: 0,
        };
        self.finish_turn(&mut state, false);
        Ok(state)
    }

    /// Highlight a point: an own piece to move, an empty point to place on,
    /// or an opponent piece to capture.
    pub fn select(&self, state: &MillState, point: usize) -> Result<MillState, MoveError> {
        if state.is_over() {
            return Err(MoveError::GameAlreadyOver);
        }
        if !state.valid_moves.iter().any(|mv| mv.anchor() == point) {
            return Err(MoveError::invalid(format!("point {point} has no legal move")));
        }
        let mut next = state.clone();
        next.selected = Some(point);
        Ok(next)
    }

    /// Legal moves, optionally restricted to those anchored on one point.
    pub fn valid_moves(&self, state: &MillState, point: Option<usize>) -> Vec<MillMove> {
        state
            .valid_moves
            .iter()
            .filter(|mv| point.map_or(true, |p| mv.anchor() == p))
            .copied()
            .collect()
    }

    /// Phase a side is in, ignoring any pending capture.
    fn base_phase(&self, state: &MillState, side: Side) -> MillPhase {
        if state.in_hand[side] > 0 {
            MillPhase::Placement
        } else if state.on_board(side) <= self.config.flying_threshold {
            MillPhase::Flying
        } else {
            MillPhase::Movement
        }
    }

    /// Whether the piece now on `point` completes a mill for its owner.
    fn closes_mill(state: &MillState, point: usize, side: Side) -> bool {
        mills_through(point)
            .iter()
            .any(|mill| mill.iter().all(|&p| state.points[p] == Some(side)))
    }

    /// Opponent pieces outside mills, or every opponent piece if all are in mills.
    fn capturable(state: &MillState, side: Side) -> Vec<usize> {
        let enemy = side.opponent();
        let owned: Vec<usize> = (0..POINT_COUNT)
            .filter(|&p| state.points[p] == Some(enemy))
            .collect();
        let free: Vec<usize> = owned.iter().copied().filter(|&p| !state.in_mill(p)).collect();
        if free.is_empty() {
            owned
        } else {
            free
        }
    }

    fn generate(state: &MillState, side: Side) -> Vec<MillMove> {
        let empty = |p: usize| state.points[p].is_none();

        match state.phase {
            phase if phase.must_capture() => Self::capturable(state, side)
                .into_iter()
                .map(|at| MillMove::capture(side, at))
                .collect(),
            MillPhase::Placement => (0..POINT_COUNT)
                .filter(|&p| empty(p))
                .map(|to| MillMove::place(side, to))
                .collect(),
            MillPhase::Movement => (0..POINT_COUNT)
                .filter(|&p| state.points[p] == Some(side))
                .flat_map(|from| {
                    neighbors(from)
                        .into_iter()
                        .filter(|&to| empty(to))
                        .map(move |to| MillMove::slide(side, from, to))
                })
                .collect(),
            _ => (0..POINT_COUNT)
                .filter(|&p| state.points[p] == Some(side))
                .flat_map(|from| {
                    (0..POINT_COUNT)
                        .filter(|&to| empty(to))
                        .map(move |to| MillMove::slide(side, from, to))
                })
                .collect(),
        }
    }

    /// Phase, result and move regeneration after every transition.
    fn finish_turn(&self, state: &mut MillState, capture_pending: bool) {
        let side = state.to_move;

        if let Some(loser) = Side::BOTH
            .into_iter()
            .find(|&s| state.material(s) < MIN_PIECES)
        {
            state.result = Some(GameResult::Winner(loser.opponent()));
            state.valid_moves.clear();
            return;
        }

        let base = self.base_phase(state, side);
        state.phase = if capture_pending { base.with_capture() } else { base };
        state.valid_moves = Self::generate(state, side);

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

impl RulesEngine for MillRules {
    type State = MillState;
    type Move = MillMove;

    fn initial_state(&self) -> MillState {
        let per_side = self.config.pieces_per_side;
        let mut state = MillState {
            points: [None; POINT_COUNT],
            to_move: Side::First,
            phase: MillPhase::Placement,
            in_hand: SideMap::with_value(per_side),
            selected: None,
            valid_moves: Vec::new(),
            result: None,
            captures: CaptureHistory::new(),
            last_move: None,
            first_mill: None,
            quiet_plies: 0,
        };
        self.finish_turn(&mut state, false);
        state
    }

    fn side_to_move(&self, state: &MillState) -> Side {
        state.to_move
    }

    fn legal_moves(&self, state: &MillState) -> Vec<MillMove> {
        state.valid_moves.clone()
    }

    fn play(&self, state: &MillState, mv: &MillMove) -> MillState {
        let mut next = state.clone();
        let side = mv.side;
        next.selected = None;
        next.last_move = Some(*mv);

        let landed = match mv.action {
            MillAction::Place { to } => {
                next.in_hand[side] = next.in_hand[side].saturating_sub(1);
                next.points[to] = Some(side);
                Some(to)
            }
            MillAction::Slide { from, to } => {
                next.points[from] = None;
                next.points[to] = Some(side);
                if next.in_hand[Side::First] == 0 && next.in_hand[Side::Second] == 0 {
                    next.quiet_plies = next.quiet_plies.saturating_add(1);
                }
                Some(to)
            }
            MillAction::Capture { at } => {
                next.points[at] = None;
                next.captures.push_back(CaptureEvent::new(side, 1, at));
                next.quiet_plies = 0;
                None
            }
        };

        let mut capture_pending = false;
        if let Some(point) = landed {
            if Self::closes_mill(&next, point, side) {
                next.first_mill.get_or_insert(side);
                capture_pending = next.on_board(side.opponent()) > 0;
            }
        }

        if !capture_pending {
            next.to_move = side.opponent();
        }
        self.finish_turn(&mut next, capture_pending);
        next
    }

    #[instrument(skip(self, state), fields(side = %mv.side, action = ?mv.action))]
    fn apply_move(&self, state: &MillState, mv: &MillMove) -> Result<MillState, MoveError> {
        if state.is_over() {
            return Err(MoveError::GameAlreadyOver);
        }
        if state.must_capture() && !mv.is_capture() {
            return Err(MoveError::CaptureRequired);
        }
        if mv.side != state.to_move {
            return Err(MoveError::NotYourTurn {
                expected: state.to_move,
                actual: mv.side,
            });
        }
        if !state.valid_moves.contains(mv) {
            warn!("rejected mill move");
            return Err(MoveError::invalid(format!("{mv} is not legal here")));
        }
        Ok(self.play(state, mv))
    }

    fn result(&self, state: &MillState) -> Option<GameResult> {
        state.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> MillRules {
        MillRules::new(MillConfig::default())
    }

    fn play_all(rules: &MillRules, moves: &[MillMove]) -> MillState {
        moves.iter().fold(rules.initial_state(), |state, mv| {
            rules.apply_move(&state, mv).unwrap()
        })
    }

    #[test]
    fn test_initial_state() {
        let state = rules().initial_state();
        assert_eq!(state.phase(), MillPhase::Placement);
        assert_eq!(state.in_hand(Side::First), 9);
        assert_eq!(state.valid_moves().len(), POINT_COUNT);
        assert_eq!(state.valid_moves()[0], MillMove::place(Side::First, 0));
    }

    #[test]
    fn test_placement_alternates() {
        let rules = rules();
        let state = play_all(&rules, &[MillMove::place(Side::First, 0)]);
        assert_eq!(state.to_move(), Side::Second);
        assert_eq!(state.in_hand(Side::First), 8);
        assert_eq!(state.owner(0), Some(Side::First));
        assert_eq!(state.valid_moves().len(), POINT_COUNT - 1);
    }

    #[test]
    fn test_mill_sets_must_capture() {
        let rules = rules();
        let state = play_all(
            &rules,
            &[
                MillMove::place(Side::First, 0),
                MillMove::place(Side::Second, 8),
                MillMove::place(Side::First, 1),
                MillMove::place(Side::Second, 9),
                MillMove::place(Side::First, 2),
            ],
        );
        assert_eq!(state.phase(), MillPhase::PlacementMustCapture);
        assert_eq!(state.to_move(), Side::First);
        assert_eq!(state.first_mill(), Some(Side::First));
        assert_eq!(
            state.valid_moves(),
            &[MillMove::capture(Side::First, 8), MillMove::capture(Side::First, 9)]
        );

        // Nothing but a capture is accepted, from either side.
        assert_eq!(
            rules.apply_move(&state, &MillMove::place(Side::First, 5)),
            Err(MoveError::CaptureRequired)
        );
        assert_eq!(
            rules.apply_move(&state, &MillMove::place(Side::Second, 5)),
            Err(MoveError::CaptureRequired)
        );
        assert!(matches!(
            rules.apply_move(&state, &MillMove::capture(Side::Second, 0)),
            Err(MoveError::NotYourTurn { .. })
        ));

        let next = rules.apply_move(&state, &MillMove::capture(Side::First, 9)).unwrap();
        assert_eq!(next.owner(9), None);
        assert_eq!(next.phase(), MillPhase::Placement);
        assert_eq!(next.to_move(), Side::Second);
        assert_eq!(next.captured_by(Side::First), 1);
    }

    #[test]
    fn test_pieces_in_mill_protected() {
        let rules = rules();
        let state = rules
            .position(
                &[
                    (0, Side::First),
                    (1, Side::First),
                    (9, Side::First),
                    (16, Side::Second),
                    (17, Side::Second),
                    (18, Side::Second),
                    (20, Side::Second),
                ],
                SideMap::new(1, 3),
                Side::First,
            )
            .unwrap();
        let next = rules.apply_move(&state, &MillMove::place(Side::First, 2)).unwrap();
        assert!(next.must_capture());
        assert_eq!(next.valid_moves(), &[MillMove::capture(Side::First, 20)]);
    }

    #[test]
    fn test_all_in_mills_are_capturable() {
        let rules = rules();
        let state = rules
            .position(
                &[
                    (0, Side::First),
                    (1, Side::First),
                    (16, Side::Second),
                    (17, Side::Second),
                    (18, Side::Second),
                ],
                SideMap::new(2, 3),
                Side::First,
            )
            .unwrap();
        let next = rules.apply_move(&state, &MillMove::place(Side::First, 2)).unwrap();
        let targets: Vec<usize> = next.valid_moves().iter().map(|mv| mv.anchor()).collect();
        assert_eq!(targets, vec![16, 17, 18]);
    }

    #[test]
    fn test_movement_uses_adjacency() {
        let rules = rules();
        let state = rules
            .position(
                &[
                    (0, Side::First),
                    (3, Side::First),
                    (5, Side::First),
                    (7, Side::First),
                    (16, Side::Second),
                    (18, Side::Second),
                    (20, Side::Second),
                    (22, Side::Second),
                ],
                SideMap::with_value(0),
                Side::First,
            )
            .unwrap();
        assert_eq!(state.phase(), MillPhase::Movement);
        let from_zero = rules.valid_moves(&state, Some(0));
        assert_eq!(from_zero, vec![MillMove::slide(Side::First, 0, 1)]);

        let err = rules.apply_move(&state, &MillMove::slide(Side::First, 0, 12));
        assert!(matches!(err, Err(MoveError::InvalidMove(_))));
    }

    #[test]
    fn test_flying_with_three_pieces() {
        let rules = rules();
        let state = rules
            .position(
                &[
                    (0, Side::First),
                    (4, Side::First),
                    (13, Side::First),
                    (16, Side::Second),
                    (18, Side::Second),
                    (20, Side::Second),
                    (22, Side::Second),
                ],
                SideMap::with_value(0),
                Side::First,
            )
            .unwrap();
        assert_eq!(state.phase(), MillPhase::Flying);
        let from_zero = rules.valid_moves(&state, Some(0));
        assert_eq!(from_zero.len(), POINT_COUNT - 7);
        assert!(from_zero.contains(&MillMove::slide(Side::First, 0, 12)));
    }

    #[test]
    fn test_reduced_to_two_loses() {
        let rules = rules();
        let state = rules
            .position(
                &[
                    (0, Side::First),
                    (1, Side::First),
                    (4, Side::First),
                    (10, Side::Second),
                    (12, Side::Second),
                    (20, Side::Second),
                ],
                SideMap::with_value(0),
                Side::First,
            )
            .unwrap();
        let closing = rules.apply_move(&state, &MillMove::slide(Side::First, 4, 2)).unwrap();
        assert!(closing.must_capture());
        let done = rules.apply_move(&closing, &MillMove::capture(Side::First, 20)).unwrap();
        assert_eq!(done.result(), Some(GameResult::Winner(Side::First)));
        assert!(done.valid_moves().is_empty());
        assert_eq!(
            rules.apply_move(&done, &MillMove::slide(Side::Second, 10, 9)),
            Err(MoveError::GameAlreadyOver)
        );
    }

    #[test]
    fn test_blocked_side_loses() {
        let rules = MillRules::new(MillConfig::default().with_flying_threshold(0));
        let state = rules
            .position(
                &[
                    (0, Side::Second),
                    (2, Side::Second),
                    (6, Side::Second),
                    (1, Side::First),
                    (3, Side::First),
                    (5, Side::First),
                    (7, Side::First),
                ],
                SideMap::with_value(0),
                Side::Second,
            )
            .unwrap();
        assert_eq!(state.result(), Some(GameResult::Winner(Side::First)));
    }

    #[test]
    fn test_select() {
        let rules = rules();
        let state = rules.initial_state();
        let selected = rules.select(&state, 4).unwrap();
        assert_eq!(selected.selected(), Some(4));
        assert!(selected.valid_destinations().is_empty());
        assert!(rules.select(&state, 30).is_err());
    }
}
