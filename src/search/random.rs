//! Uniform random move selection and seeded playouts.

use crate::core::GameRng;
use crate::rules::RulesEngine;

/// Picks a uniformly random legal move.
#[derive(Clone, Debug)]
pub struct RandomPlayer {
    rng: GameRng,
}

impl RandomPlayer {
    /// Create a player drawing from the given RNG.
    pub fn new(rng: GameRng) -> Self {
        Self { rng }
    }

    /// Create a player from a seed.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(GameRng::new(seed))
    }

    /// A random legal move, or `None` if there is none.
    pub fn choose_move<E: RulesEngine>(&mut self, engine: &E, state: &E::State) -> Option<E::Move> {
        let moves = engine.legal_moves(state);
        self.rng.choose(&moves).cloned()
    }
}

/// Play random moves from `state` until the game ends or `max_plies` is hit.
///
/// `observe` sees every transition as (before, move, after). Returns the
/// final state and the number of plies played.
pub fn playout<E, F>(
    engine: &E,
    state: &E::State,
    player: &mut RandomPlayer,
    max_plies: usize,
    mut observe: F,
) -> (E::State, usize)
where
    E: RulesEngine,
    F: FnMut(&E::State, &E::Move, &E::State),
{
    let mut current = state.clone();
    let mut plies = 0;

    while plies < max_plies && !engine.is_terminal(&current) {
        let Some(mv) = player.choose_move(engine, &current) else {
            break;
        };
        let next = engine.play(&current, &mv);
        observe(&current, &mv, &next);
        current = next;
        plies += 1;
    }

    (current, plies)
}
