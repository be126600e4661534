//! Player strategies.
//!
//! A strategy is a single capability: produce a move for a hand/table
//! snapshot. The scripted variant below drives the automatic opponent; an
//! interactive front end implements the same trait and feeds its choices
//! through the checked resolver entry points. Because `best_move` is pure,
//! it doubles as the hint query for a human player.

use crate::core::{Card, PlayerId};
use crate::engine::choice::TurnMove;
use crate::engine::search::{find_best_build, find_best_capture};
use crate::table::Table;

/// The one capability a player needs: pick a move.
pub trait Strategy {
    /// Choose a move for the acting player. `hand` is never empty.
    fn choose(&mut self, hand: &[Card], table: &Table, player: PlayerId) -> TurnMove;
}

/// The best move by the scripted opponent's rules.
///
/// Capture when the best capture strictly outscores the best build;
/// otherwise build; trail the first card when neither exists. An equal
/// score goes to the build, which keeps cards flowing onto the table.
#[must_use]
pub fn best_move(hand: &[Card], table: &Table, player: PlayerId) -> TurnMove {
    let capture = find_best_capture(hand, table).filter(|choice| !choice.is_empty());
    let build = find_best_build(hand, table, player);

    match (capture, build) {
        (None, None) => TurnMove::Trail(0),
        (Some(capture), None) => TurnMove::Capture(capture),
        (None, Some(build)) => TurnMove::Build(build),
        (Some(capture), Some(build)) => {
            if capture.score > build.score {
                TurnMove::Capture(capture)
            } else {
                TurnMove::Build(build)
            }
        }
    }
}

/// The scripted (automatic) player.
#[derive(Clone, Copy, Debug, Default)]
pub struct Scripted;

impl Strategy for Scripted {
    fn choose(&mut self, hand: &[Card], table: &Table, player: PlayerId) -> TurnMove {
        best_move(hand, table, player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::choice::BuildKind;
    use crate::table::Build;

    fn cards(symbols: &[&str]) -> Vec<Card> {
        symbols.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn test_trails_when_nothing_matches() {
        // No direct match, no set, and 9+4, 9+6, and 11+anything are not
        // covered by the other hand card.
        let mut table = Table::new();
        table.add_dealt_cards(cards(&["C4", "D6"]));
        let hand = cards(&["H9", "SJ"]);

        let mv = best_move(&hand, &table, PlayerId::new(0));

        assert_eq!(mv, TurnMove::Trail(0));
    }

    #[test]
    fn test_prefers_strictly_better_capture() {
        // Capturing the two fives (score 3) beats any build here.
        let mut table = Table::new();
        table.add_dealt_cards(cards(&["C5", "S5"]));
        let hand = cards(&["H5", "DX"]);

        match best_move(&hand, &table, PlayerId::new(0)) {
            TurnMove::Capture(choice) => {
                assert_eq!(choice.card, 0);
                assert_eq!(choice.score, 3);
            }
            other => panic!("expected a capture, got {other:?}"),
        }
    }

    #[test]
    fn test_equal_scores_go_to_the_build() {
        // Capture H7 → C7 scores 2; build H3 + C5 = 8 (covered by D8)
        // also scores 2. The tie goes to the build.
        let mut table = Table::new();
        table.add_dealt_cards(cards(&["C7", "C5"]));
        let hand = cards(&["H7", "H3", "D8"]);

        match best_move(&hand, &table, PlayerId::new(0)) {
            TurnMove::Build(choice) => {
                assert_eq!(choice.kind, BuildKind::Make);
                assert_eq!(choice.score, 2);
            }
            other => panic!("expected a build, got {other:?}"),
        }
    }

    #[test]
    fn test_scripted_increases_opposing_build() {
        let me = PlayerId::new(1);
        let mut table = Table::new();
        table.add_build(Build::new(cards(&["S3", "C4"]), 7, me.opponent()));
        let hand = cards(&["H3", "DX"]);

        match best_move(&hand, &table, me) {
            TurnMove::Build(choice) => assert_eq!(choice.kind, BuildKind::Increase),
            other => panic!("expected an increase, got {other:?}"),
        }
    }
}
