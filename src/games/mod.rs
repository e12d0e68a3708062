//! Game variants and the variant-agnostic orchestrator.
//!
//! Each variant lives in its own module with a rules engine, a state type,
//! a move type and an evaluator. [`Game`] dispatches over the three so the
//! session and wager layers only ever see [`GameState`] and [`Move`].
//!
//! ```
//! use boardstake::core::{GameConfig, Side, Variant};
//! use boardstake::games::Game;
//! use boardstake::rules::RulesEngine;
//!
//! let game = Game::new(&GameConfig::default_for(Variant::Draughts));
//! let state = game.initial_state();
//! let reply = game.best_move(&state, Side::First, 2).unwrap();
//! let next = game.apply_player_move(&state, &reply).unwrap();
//! assert_eq!(next.to_move(), Side::Second);
//! ```

pub mod draughts;
pub mod mill;
pub mod sowing;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::core::{CaptureHistory, GameConfig, MoveError, Side, Variant};
use crate::rules::{GameResult, RulesEngine};
use crate::search::{Evaluator, MinimaxSearch, Score, SearchStats};

use draughts::{DraughtsEvaluator, DraughtsMove, DraughtsRules, DraughtsState};
use mill::{MillEvaluator, MillMove, MillRules, MillState};
use sowing::{SowingEvaluator, SowingMove, SowingRules, SowingState};

/// State of any variant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum GameState {
    Sowing(SowingState),
    Draughts(DraughtsState),
    Mill(MillState),
}

/// Move of any variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum Move {
    Sowing(SowingMove),
    Draughts(DraughtsMove),
    Mill(MillMove),
}

impl Move {
    /// The side making the move.
    #[must_use]
    pub fn side(&self) -> Side {
        match self {
            Move::Sowing(mv) => mv.side,
            Move::Draughts(mv) => mv.side,
            Move::Mill(mv) => mv.side,
        }
    }

    /// The variant this move belongs to.
    #[must_use]
    pub fn variant(&self) -> Variant {
        match self {
            Move::Sowing(_) => Variant::Sowing,
            Move::Draughts(_) => Variant::Draughts,
            Move::Mill(_) => Variant::Mill,
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Move::Sowing(mv) => std::fmt::Display::fmt(mv, f),
            Move::Draughts(mv) => std::fmt::Display::fmt(mv, f),
            Move::Mill(mv) => std::fmt::Display::fmt(mv, f),
        }
    }
}

macro_rules! each_state {
    ($state:expr, $s:ident => $body:expr) => {
        match $state {
            GameState::Sowing($s) => $body,
            GameState::Draughts($s) => $body,
            GameState::Mill($s) => $body,
        }
    };
}

impl GameState {
    /// The variant of this state.
    #[must_use]
    pub fn variant(&self) -> Variant {
        match self {
            GameState::Sowing(_) => Variant::Sowing,
            GameState::Draughts(_) => Variant::Draughts,
            GameState::Mill(_) => Variant::Mill,
        }
    }

    /// Side to move.
    #[must_use]
    pub fn to_move(&self) -> Side {
        each_state!(self, s => s.to_move())
    }

    /// Final result, if the game is over.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        each_state!(self, s => s.result())
    }

    /// Game-over flag.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.result().is_some()
    }

    /// Selected origin, if any.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        each_state!(self, s => s.selected())
    }

    /// Capture log.
    #[must_use]
    pub fn captures(&self) -> &CaptureHistory {
        each_state!(self, s => s.captures())
    }

    /// Seeds or pieces captured by a side.
    #[must_use]
    pub fn captured_by(&self, side: Side) -> u32 {
        each_state!(self, s => s.captured_by(side))
    }

    /// Side that closed the first mill (mill game only).
    #[must_use]
    pub fn first_mill(&self) -> Option<Side> {
        match self {
            GameState::Mill(s) => s.first_mill(),
            _ => None,
        }
    }

    /// Most recent move.
    #[must_use]
    pub fn last_move(&self) -> Option<Move> {
        match self {
            GameState::Sowing(s) => s.last_move().map(Move::Sowing),
            GameState::Draughts(s) => s.last_move().map(Move::Draughts),
            GameState::Mill(s) => s.last_move().map(Move::Mill),
        }
    }

    /// Every legal move for the side to move.
    #[must_use]
    pub fn valid_moves(&self) -> Vec<Move> {
        match self {
            GameState::Sowing(s) => s.valid_moves().iter().copied().map(Move::Sowing).collect(),
            GameState::Draughts(s) => s.valid_moves().iter().copied().map(Move::Draughts).collect(),
            GameState::Mill(s) => s.valid_moves().iter().copied().map(Move::Mill).collect(),
        }
    }

    fn end_by_forfeit(&mut self, loser: Side) {
        each_state!(self, s => {
            s.result = Some(GameResult::Forfeit { loser });
            s.valid_moves.clear();
            s.selected = None;
        })
    }
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameState::Sowing(s) => std::fmt::Display::fmt(s, f),
            GameState::Draughts(s) => std::fmt::Display::fmt(s, f),
            GameState::Mill(s) => {
                for (point, owner) in s.points().iter().enumerate() {
                    let mark = match owner {
                        Some(Side::First) => 'W',
                        Some(Side::Second) => 'B',
                        None => '.',
                    };
                    write!(f, "{mark}")?;
                    if point % 8 == 7 {
                        writeln!(f)?;
                    }
                }
                write!(f, "{:?}", s.phase())
            }
        }
    }
}

/// Outcome of one AI search.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    /// Chosen move, `None` if there is nothing to play.
    pub best: Option<Move>,
    /// Score of the chosen move from `Side::First`'s view.
    pub score: Option<Score>,
    /// Search counters.
    pub stats: SearchStats,
}

/// Variant-agnostic game orchestrator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Game {
    Sowing(SowingRules),
    Draughts(DraughtsRules),
    Mill(MillRules),
}

impl Game {
    /// Create the rules for a configuration.
    pub fn new(config: &GameConfig) -> Self {
        match config {
            GameConfig::Sowing(c) => Game::Sowing(SowingRules::new(c.clone())),
            GameConfig::Draughts(c) => Game::Draughts(DraughtsRules::new(c.clone())),
            GameConfig::Mill(c) => Game::Mill(MillRules::new(c.clone())),
        }
    }

    /// The variant being played.
    pub fn variant(&self) -> Variant {
        match self {
            Game::Sowing(_) => Variant::Sowing,
            Game::Draughts(_) => Variant::Draughts,
            Game::Mill(_) => Variant::Mill,
        }
    }

    /// Validate and apply a move.
    #[instrument(skip(self, state, mv), fields(variant = %self.variant(), mv = %mv))]
    pub fn apply_player_move(&self, state: &GameState, mv: &Move) -> Result<GameState, MoveError> {
        match (self, state, mv) {
            (Game::Sowing(r), GameState::Sowing(s), Move::Sowing(m)) => {
                r.apply_move(s, m).map(GameState::Sowing)
            }
            (Game::Draughts(r), GameState::Draughts(s), Move::Draughts(m)) => {
                r.apply_move(s, m).map(GameState::Draughts)
            }
            (Game::Mill(r), GameState::Mill(s), Move::Mill(m)) => {
                r.apply_move(s, m).map(GameState::Mill)
            }
            _ => Err(MoveError::VariantMismatch),
        }
    }

    /// Legal moves, optionally restricted to one pit, square or point.
    pub fn valid_moves(&self, state: &GameState, origin: Option<usize>) -> Vec<Move> {
        match (self, state) {
            (Game::Sowing(r), GameState::Sowing(s)) => {
                r.valid_moves(s, origin).into_iter().map(Move::Sowing).collect()
            }
            (Game::Draughts(r), GameState::Draughts(s)) => {
                r.valid_moves(s, origin).into_iter().map(Move::Draughts).collect()
            }
            (Game::Mill(r), GameState::Mill(s)) => {
                r.valid_moves(s, origin).into_iter().map(Move::Mill).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Highlight a pit, square or point for the side to move.
    pub fn select(&self, state: &GameState, index: usize) -> Result<GameState, MoveError> {
        match (self, state) {
            (Game::Sowing(r), GameState::Sowing(s)) => r.select(s, index).map(GameState::Sowing),
            (Game::Draughts(r), GameState::Draughts(s)) => {
                r.select(s, index).map(GameState::Draughts)
            }
            (Game::Mill(r), GameState::Mill(s)) => r.select(s, index).map(GameState::Mill),
            _ => Err(MoveError::VariantMismatch),
        }
    }

    /// End the game with `loser` forfeiting.
    pub fn forfeit(&self, state: &GameState, loser: Side) -> Result<GameState, MoveError> {
        if state.variant() != self.variant() {
            return Err(MoveError::VariantMismatch);
        }
        if state.is_over() {
            return Err(MoveError::GameAlreadyOver);
        }
        let mut next = state.clone();
        next.end_by_forfeit(loser);
        Ok(next)
    }

    /// Best move for `player` searched to `depth` plies.
    pub fn best_move(&self, state: &GameState, player: Side, depth: u8) -> Option<Move> {
        self.search(state, player, depth).best
    }

    /// Best move together with its score and search counters.
    #[instrument(skip(self, state, player), fields(variant = %self.variant(), player = %player))]
    pub fn search(&self, state: &GameState, player: Side, depth: u8) -> SearchOutcome {
        fn run<E, V>(
            engine: &E,
            evaluator: V,
            state: &E::State,
            player: Side,
            depth: u8,
            wrap: fn(E::Move) -> Move,
        ) -> SearchOutcome
        where
            E: RulesEngine + Clone,
            V: Evaluator<E>,
        {
            let mut search = MinimaxSearch::new(engine.clone(), evaluator);
            let found = search.best_move_scored(state, player, depth);
            SearchOutcome {
                score: found.as_ref().map(|(_, score)| *score),
                best: found.map(|(mv, _)| wrap(mv)),
                stats: search.stats().clone(),
            }
        }

        let outcome = match (self, state) {
            (Game::Sowing(r), GameState::Sowing(s)) => {
                run(r, SowingEvaluator, s, player, depth, Move::Sowing)
            }
            (Game::Draughts(r), GameState::Draughts(s)) => {
                run(r, DraughtsEvaluator, s, player, depth, Move::Draughts)
            }
            (Game::Mill(r), GameState::Mill(s)) => {
                run(r, MillEvaluator, s, player, depth, Move::Mill)
            }
            _ => SearchOutcome {
                best: None,
                score: None,
                stats: SearchStats::default(),
            },
        };
        debug!(best = ?outcome.best, score = ?outcome.score, nodes = outcome.stats.nodes, "ai move");
        outcome
    }
}

impl RulesEngine for Game {
    type State = GameState;
    type Move = Move;

    fn initial_state(&self) -> GameState {
        match self {
            Game::Sowing(r) => GameState::Sowing(r.initial_state()),
            Game::Draughts(r) => GameState::Draughts(r.initial_state()),
            Game::Mill(r) => GameState::Mill(r.initial_state()),
        }
    }

    fn side_to_move(&self, state: &GameState) -> Side {
        state.to_move()
    }

    fn legal_moves(&self, state: &GameState) -> Vec<Move> {
        if state.variant() == self.variant() {
            state.valid_moves()
        } else {
            Vec::new()
        }
    }

    fn play(&self, state: &GameState, mv: &Move) -> GameState {
        match (self, state, mv) {
            (Game::Sowing(r), GameState::Sowing(s), Move::Sowing(m)) => {
                GameState::Sowing(r.play(s, m))
            }
            (Game::Draughts(r), GameState::Draughts(s), Move::Draughts(m)) => {
                GameState::Draughts(r.play(s, m))
            }
            (Game::Mill(r), GameState::Mill(s), Move::Mill(m)) => GameState::Mill(r.play(s, m)),
            _ => state.clone(),
        }
    }

    fn apply_move(&self, state: &GameState, mv: &Move) -> Result<GameState, MoveError> {
        self.apply_player_move(state, mv)
    }

    fn result(&self, state: &GameState) -> Option<GameResult> {
        state.result()
    }
}
