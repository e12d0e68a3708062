//! Sowing position evaluator.

use crate::core::Side;
use crate::search::{Evaluator, Score};

use super::board::SowingState;
use super::rules::SowingRules;

/// Store difference dominates; seeds still on a side's row break ties.
#[derive(Clone, Copy, Debug, Default)]
pub struct SowingEvaluator;

const STORE_WEIGHT: Score = 4;

impl Evaluator<SowingRules> for SowingEvaluator {
    fn evaluate(&self, _engine: &SowingRules, state: &SowingState) -> Score {
        let stores = Score::from(state.store(Side::First)) - Score::from(state.store(Side::Second));
        let rows = Score::from(state.seeds_in_pits(Side::First))
            - Score::from(state.seeds_in_pits(Side::Second));
        STORE_WEIGHT * stores + rows
    }
}
