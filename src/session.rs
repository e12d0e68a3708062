//! Match sessions: who controls each side and the synchronous turn loop.
//!
//! A [`Session`] owns one game. Human moves come in through
//! [`Session::submit`]; AI replies are searched and applied before `submit`
//! returns. Sessions share nothing, so any number can run on separate
//! threads.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::core::{GameConfig, MoveError, Side, Variant};
use crate::games::{Game, GameState, Move};
use crate::rules::{GameResult, RulesEngine};
use crate::search::{Difficulty, SearchConfig};

/// Unique identifier for a session.
pub type SessionId = String;

/// Who plays which side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MatchMode {
    /// One human against the AI.
    HumanVsAi {
        /// Side the human plays.
        human: Side,
        /// Strength of the AI opponent.
        difficulty: Difficulty,
    },
    /// Two humans.
    PeerVsPeer,
    /// Two AIs.
    AiVsAi {
        /// Strength of the AI playing `Side::First`.
        first: Difficulty,
        /// Strength of the AI playing `Side::Second`.
        second: Difficulty,
    },
}

/// Controller of one side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Controller {
    Human,
    Ai(Difficulty),
}

impl MatchMode {
    /// Who controls `side`.
    #[must_use]
    pub fn controller(&self, side: Side) -> Controller {
        match *self {
            MatchMode::HumanVsAi { human, difficulty } => {
                if side == human {
                    Controller::Human
                } else {
                    Controller::Ai(difficulty)
                }
            }
            MatchMode::PeerVsPeer => Controller::Human,
            MatchMode::AiVsAi { first, second } => Controller::Ai(match side {
                Side::First => first,
                Side::Second => second,
            }),
        }
    }

    /// Short name for logs and odds lookups.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            MatchMode::HumanVsAi { .. } => "human_vs_ai",
            MatchMode::PeerVsPeer => "peer_vs_peer",
            MatchMode::AiVsAi { .. } => "ai_vs_ai",
        }
    }
}

/// One game in progress.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    game: Game,
    mode: MatchMode,
    search: SearchConfig,
    state: GameState,
    history: Vec<Move>,
}

impl Session {
    /// Start a new game.
    ///
    /// Nothing is played yet; if the AI moves first, call
    /// [`advance_ai`](Self::advance_ai).
    #[instrument(skip_all, fields(variant = %config.variant()))]
    pub fn new(
        id: impl Into<SessionId>,
        config: &GameConfig,
        mode: MatchMode,
        search: SearchConfig,
    ) -> Self {
        let id = id.into();
        let game = Game::new(config);
        let state = game.initial_state();
        info!(session_id = %id, mode = mode.name(), "Creating session");
        Self {
            id,
            game,
            mode,
            search,
            state,
            history: Vec::new(),
        }
    }

    /// Continue from an existing position, e.g. after a scripted opening.
    pub fn resume(
        id: impl Into<SessionId>,
        config: &GameConfig,
        mode: MatchMode,
        search: SearchConfig,
        state: GameState,
    ) -> Result<Self, MoveError> {
        if state.variant() != config.variant() {
            return Err(MoveError::VariantMismatch);
        }
        Ok(Self {
            id: id.into(),
            game: Game::new(config),
            mode,
            search,
            state,
            history: Vec::new(),
        })
    }

    /// Session ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The rules being played.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Variant being played.
    pub fn variant(&self) -> Variant {
        self.game.variant()
    }

    /// Match mode.
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Current position.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Moves played through this session, in order.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Final result, if the game is over.
    pub fn result(&self) -> Option<GameResult> {
        self.state.result()
    }

    /// Legal moves, optionally restricted to one pit, square or point.
    pub fn valid_moves(&self, origin: Option<usize>) -> Vec<Move> {
        self.game.valid_moves(&self.state, origin)
    }

    /// Highlight a pit, square or point for the side to move.
    pub fn select(&mut self, index: usize) -> Result<&GameState, MoveError> {
        self.state = self.game.select(&self.state, index)?;
        Ok(&self.state)
    }

    /// Submit a human move, then let the AI reply.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn submit(&mut self, mv: Move) -> Result<&GameState, MoveError> {
        if self.state.is_over() {
            return Err(MoveError::GameAlreadyOver);
        }
        let expected = self.state.to_move();
        if mv.side() != expected {
            return Err(MoveError::NotYourTurn {
                expected,
                actual: mv.side(),
            });
        }
        if let Controller::Ai(_) = self.mode.controller(mv.side()) {
            warn!(side = %mv.side(), "Move submitted for an AI-controlled side");
            return Err(MoveError::invalid(format!(
                "{} is controlled by the AI",
                mv.side()
            )));
        }

        self.state = self.game.apply_player_move(&self.state, &mv)?;
        self.history.push(mv);
        info!(%mv, over = self.state.is_over(), "Move applied");

        self.advance_ai();
        Ok(&self.state)
    }

    /// Play one AI move if the AI is to move. Returns the move played.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn step_ai(&mut self) -> Option<Move> {
        if self.state.is_over() {
            return None;
        }
        let side = self.state.to_move();
        let Controller::Ai(difficulty) = self.mode.controller(side) else {
            return None;
        };

        let depth = self.search.depth_for(difficulty);
        let mv = self.game.best_move(&self.state, side, depth)?;
        self.state = self.game.play(&self.state, &mv);
        self.history.push(mv);
        debug!(%mv, %difficulty, depth, "AI moved");
        Some(mv)
    }

    /// Play AI moves until a human is to move or the game ends.
    ///
    /// Returns the number of moves played.
    pub fn advance_ai(&mut self) -> usize {
        let mut played = 0;
        while self.step_ai().is_some() {
            played += 1;
        }
        played
    }

    /// End the game with `side` forfeiting (abandonment or timeout).
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn forfeit(&mut self, side: Side) -> Result<&GameState, MoveError> {
        self.state = self.game.forfeit(&self.state, side)?;
        info!(loser = %side, "Session forfeited");
        Ok(&self.state)
    }
}
