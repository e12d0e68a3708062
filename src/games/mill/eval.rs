//! Mill position evaluator.

use crate::core::Side;
use crate::search::{Evaluator, Score};

use super::board::{neighbors, MillState, POINT_COUNT};
use super::rules::MillRules;

const MATERIAL_WEIGHT: Score = 10;
const MILL_WEIGHT: Score = 4;
const PENDING_CAPTURE_BONUS: Score = 8;

/// Material, closed mills, mobility and an owed capture.
#[derive(Clone, Copy, Debug, Default)]
pub struct MillEvaluator;

/// Free adjacent points around a side's pieces.
fn mobility(state: &MillState, side: Side) -> Score {
    (0..POINT_COUNT)
        .filter(|&p| state.owner(p) == Some(side))
        .map(|p| {
            neighbors(p)
                .iter()
                .filter(|&&n| state.owner(n).is_none())
                .count() as Score
        })
        .sum()
}

impl Evaluator<MillRules> for MillEvaluator {
    fn evaluate(&self, _engine: &MillRules, state: &MillState) -> Score {
        let side_score = |side: Side| {
            MATERIAL_WEIGHT * Score::from(state.material(side))
                + MILL_WEIGHT * state.mill_count(side) as Score
                + mobility(state, side)
        };

        let mut score = side_score(Side::First) - side_score(Side::Second);
        if state.must_capture() {
            score += PENDING_CAPTURE_BONUS * state.to_move().sign();
        }
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MillConfig, SideMap};
    use crate::games::mill::MillMove;
    use crate::rules::RulesEngine;

    #[test]
    fn test_start_is_even() {
        let rules = MillRules::new(MillConfig::default());
        let state = rules.initial_state();
        assert_eq!(MillEvaluator.evaluate(&rules, &state), 0);
    }

    #[test]
    fn test_pending_capture_counts() {
        let rules = MillRules::new(MillConfig::default());
        let before = rules
            .position(
                &[(0, Side::First), (1, Side::First), (8, Side::Second)],
                SideMap::new(6, 8),
                Side::First,
            )
            .unwrap();
        let after = rules.apply_move(&before, &MillMove::place(Side::First, 2)).unwrap();
        assert!(after.must_capture());
        assert!(
            MillEvaluator.evaluate(&rules, &after) > MillEvaluator.evaluate(&rules, &before)
        );
    }
}
