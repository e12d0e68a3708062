//! Minimax search with alpha-beta pruning.
//!
//! Scores are always from `Side::First`'s point of view: `First` maximizes,
//! `Second` minimizes. Whose turn it is comes from the state, not from the
//! ply parity, so extra turns (Kalah store landings, pending mill captures)
//! need no special handling.

use std::time::Instant;

use tracing::{debug, instrument};

use crate::core::Side;
use crate::rules::{GameResult, RulesEngine};

use super::stats::SearchStats;

/// Position score. Positive favors `Side::First`.
pub type Score = i32;

/// Base magnitude of a decided game. Heuristic scores stay well below it.
pub const WIN_SCORE: Score = 1_000;

/// Heuristic position evaluation.
pub trait Evaluator<E: RulesEngine> {
    /// Score a non-terminal position. Positive favors `Side::First`.
    fn evaluate(&self, engine: &E, state: &E::State) -> Score;
}

/// Score of a finished game with `remaining` plies of search depth left.
///
/// Faster wins (more depth remaining) score higher than slower ones.
#[must_use]
pub fn terminal_score(result: GameResult, remaining: u8) -> Score {
    match result.winner() {
        Some(side) => side.sign() * (WIN_SCORE + Score::from(remaining)),
        None => 0,
    }
}

/// Depth-limited minimax search context.
///
/// Generic over the rules engine and the evaluator. The only mutable data is
/// the statistics of the last search; results depend solely on the inputs.
pub struct MinimaxSearch<E: RulesEngine, V: Evaluator<E>> {
    engine: E,
    evaluator: V,
    stats: SearchStats,
}

impl<E: RulesEngine, V: Evaluator<E>> MinimaxSearch<E, V> {
    /// Create a new search context.
    pub fn new(engine: E, evaluator: V) -> Self {
        Self {
            engine,
            evaluator,
            stats: SearchStats::default(),
        }
    }

    /// The rules engine being searched.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Statistics from the most recent search.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Best move for `player` using alpha-beta pruning.
    ///
    /// Returns `None` if the game is over, `player` is not to move, or there
    /// are no legal moves. Ties go to the earliest move in generation order.
    pub fn best_move(&mut self, state: &E::State, player: Side, depth: u8) -> Option<E::Move> {
        self.best_move_scored(state, player, depth).map(|(mv, _)| mv)
    }

    /// Like [`best_move`](Self::best_move), also returning the move's score.
    #[instrument(skip(self, state, player), fields(player = %player))]
    pub fn best_move_scored(
        &mut self,
        state: &E::State,
        player: Side,
        depth: u8,
    ) -> Option<(E::Move, Score)> {
        self.search_root(state, player, depth, true)
    }

    /// Best move using full minimax without pruning.
    ///
    /// Exponentially slower; exists to verify the pruned search.
    pub fn best_move_exhaustive(
        &mut self,
        state: &E::State,
        player: Side,
        depth: u8,
    ) -> Option<(E::Move, Score)> {
        self.search_root(state, player, depth, false)
    }

    fn search_root(
        &mut self,
        state: &E::State,
        player: Side,
        depth: u8,
        prune: bool,
    ) -> Option<(E::Move, Score)> {
        let start = Instant::now();
        self.stats.reset();

        if self.engine.is_terminal(state) || self.engine.side_to_move(state) != player {
            return None;
        }

        let depth = depth.max(1);
        self.stats.depth = depth;
        let maximizing = player == Side::First;

        let mut alpha = Score::MIN;
        let mut beta = Score::MAX;
        let mut best: Option<(E::Move, Score)> = None;

        for mv in self.engine.legal_moves(state) {
            let child = self.engine.play(state, &mv);
            let score = if prune {
                self.alpha_beta(&child, depth - 1, alpha, beta)
            } else {
                self.minimax(&child, depth - 1)
            };

            // Strict comparison: the earliest move keeps ties.
            let improves = match &best {
                None => true,
                Some((_, best_score)) if maximizing => score > *best_score,
                Some((_, best_score)) => score < *best_score,
            };
            if improves {
                best = Some((mv, score));
            }

            if maximizing {
                alpha = alpha.max(best.as_ref().map_or(Score::MIN, |(_, s)| *s));
            } else {
                beta = beta.min(best.as_ref().map_or(Score::MAX, |(_, s)| *s));
            }
        }

        self.stats.time_us = start.elapsed().as_micros() as u64;

        if let Some((mv, score)) = &best {
            debug!(
                ?mv,
                score,
                nodes = self.stats.nodes,
                cutoffs = self.stats.cutoffs,
                prune,
                "search complete"
            );
        }

        best
    }

    /// Fail-soft alpha-beta.
    fn alpha_beta(&mut self, state: &E::State, depth: u8, mut alpha: Score, mut beta: Score) -> Score {
        self.stats.nodes += 1;

        if let Some(result) = self.engine.result(state) {
            return terminal_score(result, depth);
        }
        if depth == 0 {
            return self.leaf(state);
        }

        let moves = self.engine.legal_moves(state);
        if moves.is_empty() {
            return self.leaf(state);
        }

        if self.engine.side_to_move(state) == Side::First {
            let mut value = Score::MIN;
            for mv in &moves {
                let child = self.engine.play(state, mv);
                value = value.max(self.alpha_beta(&child, depth - 1, alpha, beta));
                alpha = alpha.max(value);
                if alpha >= beta {
                    self.stats.cutoffs += 1;
                    break;
                }
            }
            value
        } else {
            let mut value = Score::MAX;
            for mv in &moves {
                let child = self.engine.play(state, mv);
                value = value.min(self.alpha_beta(&child, depth - 1, alpha, beta));
                beta = beta.min(value);
                if alpha >= beta {
                    self.stats.cutoffs += 1;
                    break;
                }
            }
            value
        }
    }

    /// Plain minimax, visiting every node to the given depth.
    fn minimax(&mut self, state: &E::State, depth: u8) -> Score {
        self.stats.nodes += 1;

        if let Some(result) = self.engine.result(state) {
            return terminal_score(result, depth);
        }
        if depth == 0 {
            return self.leaf(state);
        }

        let moves = self.engine.legal_moves(state);
        if moves.is_empty() {
            return self.leaf(state);
        }

        let maximizing = self.engine.side_to_move(state) == Side::First;
        let mut value = if maximizing { Score::MIN } else { Score::MAX };
        for mv in &moves {
            let child = self.engine.play(state, mv);
            let score = self.minimax(&child, depth - 1);
            value = if maximizing { value.max(score) } else { value.min(score) };
        }
        value
    }

    fn leaf(&mut self, state: &E::State) -> Score {
        self.stats.evaluations += 1;
        self.evaluator.evaluate(&self.engine, state)
    }
}

/// One-shot search: best move for `player` at `depth`.
///
/// Identical inputs always produce the identical move.
pub fn best_move<E, V>(engine: E, evaluator: V, state: &E::State, player: Side, depth: u8) -> Option<E::Move>
where
    E: RulesEngine,
    V: Evaluator<E>,
{
    MinimaxSearch::new(engine, evaluator).best_move(state, player, depth)
}
