//! Draughts position evaluator.

use crate::core::Side;
use crate::search::{Evaluator, Score};

use super::board::{promotion_row, row_of, DraughtsState};
use super::rules::DraughtsRules;

const MAN_VALUE: Score = 10;
const KING_VALUE: Score = 16;

/// Material plus a small bonus for men closing in on promotion.
#[derive(Clone, Copy, Debug, Default)]
pub struct DraughtsEvaluator;

impl Evaluator<DraughtsRules> for DraughtsEvaluator {
    fn evaluate(&self, _engine: &DraughtsRules, state: &DraughtsState) -> Score {
        state
            .pieces()
            .map(|(sq, piece)| {
                let value = if piece.king {
                    KING_VALUE
                } else {
                    let remaining = row_of(sq).abs_diff(promotion_row(piece.side));
                    // Rows advanced from the back rank, 0..=6 for a man.
                    MAN_VALUE + (7 - remaining as Score)
                };
                value * piece.side.sign()
            })
            .sum()
    }
}
