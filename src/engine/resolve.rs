//! Move resolution: the mutations that carry a chosen move out.
//!
//! Two surfaces share the primitive actions:
//!
//! - Checked entry points (`trail`, `make_build`, `add_to_build`,
//!   `increase_build`, `capture_set`, `capture_build`) for an interactive
//!   collaborator. They take pre-tokenized card symbols, reject only
//!   game-rule violations as [`RuleError`]s, and leave re-prompting to the
//!   caller. Malformed syntax never reaches them.
//! - Compound applies (`apply_capture`, `apply_build`, `apply_move`) for
//!   the scripted strategy, which executes a whole search result at once.
//!
//! A capture resolves in a fixed order: explicitly chosen sets first, then
//! every loose card matching the played rank, then every build *the actor
//! owns* matching the rank (the search may target anyone's builds, but
//! this automatic sweep never crosses ownership), and finally the played
//! card itself, marking the actor as last to capture.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::choice::{BuildChoice, BuildKind, CaptureChoice, TurnMove};
use crate::core::{Card, PlayerId, PlayerState, ACE_HIGH};
use crate::table::{Build, Table};

/// A game-rule violation. Never raised for malformed input; the input
/// collaborator validates syntax before calling in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleError {
    /// The played card matches a loose card or an own build; the move
    /// must be a capture.
    ForcedCapture,
    /// Trailing while owning an unresolved build.
    OwnsBuild,
    /// A new build needs at least one table card.
    EmptyBuild,
    /// Requested cards are not (all) among the loose cards.
    CardsNotOnTable,
    /// Requested cards name no build on the table.
    NoSuchBuild,
    /// The sums don't line up (capture set, build layer, or build capture).
    SumMismatch,
    /// No other card in hand can later capture the build.
    NoCoverCard,
    /// A multiple build cannot be increased.
    MultipleBuild,
    /// A player cannot increase their own build.
    OwnBuild,
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            RuleError::ForcedCapture => "a matching card or own build forces a capture",
            RuleError::OwnsBuild => "cannot trail while owning a build",
            RuleError::EmptyBuild => "a build needs at least one table card",
            RuleError::CardsNotOnTable => "those cards are not on the table",
            RuleError::NoSuchBuild => "no build matches those cards",
            RuleError::SumMismatch => "the values do not sum to the played card",
            RuleError::NoCoverCard => "no other card in hand covers that sum",
            RuleError::MultipleBuild => "a multiple build cannot be increased",
            RuleError::OwnBuild => "cannot increase an own build",
        };
        f.write_str(message)
    }
}

impl std::error::Error for RuleError {}

/// Whether the forced-capture rule binds this card: its value matches a
/// loose card, or a build the actor owns.
#[must_use]
pub fn forced_capture_applies(table: &Table, player: PlayerId, card: &Card) -> bool {
    table.value_matches_build(card.rank(), player) || table.value_matches_loose_card(card.rank())
}

/// Whether some card in hand other than the played one can later capture
/// a build of `sum`. A held ace covers 14.
#[must_use]
pub fn has_cover_card(hand: &[Card], played: usize, sum: u32) -> bool {
    hand.iter().enumerate().any(|(i, card)| {
        i != played
            && (u32::from(card.rank()) == sum || (card.is_ace() && sum == u32::from(ACE_HIGH)))
    })
}

// === Checked entry points ===

/// Trail: play the card face-up to the table.
pub fn trail(
    table: &mut Table,
    actor: &mut PlayerState,
    player: PlayerId,
    card_index: usize,
) -> Result<(), RuleError> {
    if forced_capture_applies(table, player, &actor.hand()[card_index]) {
        return Err(RuleError::ForcedCapture);
    }

    if table.player_owns_any_builds(player) {
        return Err(RuleError::OwnsBuild);
    }

    let card = actor.remove_from_hand(card_index);
    table.add_loose_card(card);

    Ok(())
}

/// Make a new build from the played card plus the named loose cards.
pub fn make_build(
    table: &mut Table,
    actor: &mut PlayerState,
    player: PlayerId,
    card_index: usize,
    table_symbols: &[&str],
) -> Result<(), RuleError> {
    if forced_capture_applies(table, player, &actor.hand()[card_index]) {
        return Err(RuleError::ForcedCapture);
    }

    if table_symbols.is_empty() {
        return Err(RuleError::EmptyBuild);
    }

    let positions = table
        .cards_on_table(table_symbols)
        .ok_or(RuleError::CardsNotOnTable)?;

    let sum = layer_sum(table, actor, card_index, &positions);

    if !has_cover_card(actor.hand(), card_index, sum) {
        return Err(RuleError::NoCoverCard);
    }

    let played = actor.remove_from_hand(card_index);
    let mut layer = vec![played];
    layer.extend(table.remove_loose_cards(&positions));
    table.add_build(Build::new(layer, sum as u8, player));

    Ok(())
}

/// Add a new layer (played card plus optional loose cards) to the build
/// named by `build_symbols`. The layer must match the build's sum exactly.
pub fn add_to_build(
    table: &mut Table,
    actor: &mut PlayerState,
    player: PlayerId,
    card_index: usize,
    table_symbols: &[&str],
    build_symbols: &[&str],
) -> Result<(), RuleError> {
    if forced_capture_applies(table, player, &actor.hand()[card_index]) {
        return Err(RuleError::ForcedCapture);
    }

    if table.builds().is_empty() {
        return Err(RuleError::NoSuchBuild);
    }

    let positions = if table_symbols.is_empty() {
        Vec::new()
    } else {
        table
            .cards_on_table(table_symbols)
            .ok_or(RuleError::CardsNotOnTable)?
    };

    let build_index = table
        .find_build(build_symbols)
        .ok_or(RuleError::NoSuchBuild)?;

    let sum = layer_sum(table, actor, card_index, &positions);

    if sum != u32::from(table.build(build_index).sum()) {
        return Err(RuleError::SumMismatch);
    }

    if !has_cover_card(actor.hand(), card_index, sum) {
        return Err(RuleError::NoCoverCard);
    }

    let played = actor.remove_from_hand(card_index);
    let mut layer = vec![played];
    layer.extend(table.remove_loose_cards(&positions));

    let build = table.build_mut(build_index);
    build.add_layer(layer);
    build.set_owner(player);

    Ok(())
}

/// Increase the single-layer build named by `build_symbols` with the
/// played card alone. The build must belong to the opponent; its new sum
/// is the old sum plus the played rank, and ownership transfers.
pub fn increase_build(
    table: &mut Table,
    actor: &mut PlayerState,
    player: PlayerId,
    card_index: usize,
    build_symbols: &[&str],
) -> Result<(), RuleError> {
    if forced_capture_applies(table, player, &actor.hand()[card_index]) {
        return Err(RuleError::ForcedCapture);
    }

    if table.builds().is_empty() {
        return Err(RuleError::NoSuchBuild);
    }

    let build_index = table
        .find_build(build_symbols)
        .ok_or(RuleError::NoSuchBuild)?;

    let new_sum =
        u32::from(actor.hand()[card_index].rank()) + u32::from(table.build(build_index).sum());

    if table.build(build_index).is_multiple() {
        return Err(RuleError::MultipleBuild);
    }

    if table.build(build_index).owner() == player {
        return Err(RuleError::OwnBuild);
    }

    if !has_cover_card(actor.hand(), card_index, new_sum) {
        return Err(RuleError::NoCoverCard);
    }

    let played = actor.remove_from_hand(card_index);
    let build = table.build_mut(build_index);
    build.push_to_single_layer(played);
    build.set_sum(new_sum as u8);
    build.set_owner(player);

    Ok(())
}

/// Capture the named loose cards as one set summing to the played value
/// (14 for an ace).
pub fn capture_set(
    table: &mut Table,
    actor: &mut PlayerState,
    card_index: usize,
    set_symbols: &[&str],
) -> Result<(), RuleError> {
    let positions = table
        .cards_on_table(set_symbols)
        .ok_or(RuleError::CardsNotOnTable)?;

    let sum: u32 = positions
        .iter()
        .map(|&p| u32::from(table.loose_cards()[p].rank()))
        .sum();

    let played = &actor.hand()[card_index];
    let ace_set = played.is_ace() && sum == u32::from(ACE_HIGH);

    if !ace_set && sum != u32::from(played.rank()) {
        return Err(RuleError::SumMismatch);
    }

    let captured = table.remove_loose_cards(&positions);
    actor.extend_pile(captured);

    Ok(())
}

/// Capture the build named by `build_symbols` whole. Legal when the
/// played rank equals the build's sum, or the sum is 14 and the played
/// card is an ace.
pub fn capture_build(
    table: &mut Table,
    actor: &mut PlayerState,
    card_index: usize,
    build_symbols: &[&str],
) -> Result<(), RuleError> {
    if table.builds().is_empty() {
        return Err(RuleError::NoSuchBuild);
    }

    let build_index = table
        .find_build(build_symbols)
        .ok_or(RuleError::NoSuchBuild)?;

    let played = &actor.hand()[card_index];
    let sum = table.build(build_index).sum();
    let ace_build = played.is_ace() && sum == ACE_HIGH;

    if !ace_build && sum != played.rank() {
        return Err(RuleError::SumMismatch);
    }

    let captured = table.take_build(build_index);
    actor.extend_pile(captured);

    Ok(())
}

// === Automatic sweeps and capture completion ===

/// Sweep every loose card matching the played card (equal rank, or both
/// aces) into the actor's pile. Returns whether anything moved.
pub fn capture_matching_loose(table: &mut Table, actor: &mut PlayerState, played: &Card) -> bool {
    let positions: Vec<usize> = table
        .loose_cards()
        .iter()
        .enumerate()
        .filter(|(_, card)| {
            (played.is_ace() && card.is_ace()) || played.rank() == card.rank()
        })
        .map(|(i, _)| i)
        .collect();

    let matched = !positions.is_empty();
    let captured = table.remove_loose_cards(&positions);
    actor.extend_pile(captured);

    matched
}

/// Sweep every build the actor owns whose sum matches the played card
/// (rank, or 14 for an ace) into the actor's pile. Returns whether
/// anything moved.
pub fn capture_matching_own_builds(
    table: &mut Table,
    actor: &mut PlayerState,
    player: PlayerId,
    played: &Card,
) -> bool {
    let positions = table.matching_own_builds(played, player);
    let matched = !positions.is_empty();
    let captured = table.remove_builds(&positions);
    actor.extend_pile(captured);

    matched
}

/// Finish a capture: the played card joins the pile and the actor becomes
/// the last to capture (awarded the table leftovers at round end).
pub fn finish_capture(
    table: &mut Table,
    actor: &mut PlayerState,
    player: PlayerId,
    card_index: usize,
) {
    let played = actor.remove_from_hand(card_index);
    actor.add_to_pile(played);
    table.set_last_capture(player);
}

// === Compound applies for the scripted strategy ===

/// Execute a whole capture plan.
pub fn apply_capture(
    table: &mut Table,
    actor: &mut PlayerState,
    player: PlayerId,
    choice: &CaptureChoice,
) {
    for set in &choice.sets {
        let captured = table.remove_loose_cards(set);
        actor.extend_pile(captured);
    }

    let played = actor.hand()[choice.card].clone();
    capture_matching_loose(table, actor, &played);
    capture_matching_own_builds(table, actor, player, &played);

    finish_capture(table, actor, player, choice.card);
}

/// Execute a whole build plan.
pub fn apply_build(
    table: &mut Table,
    actor: &mut PlayerState,
    player: PlayerId,
    choice: &BuildChoice,
) {
    match choice.kind {
        BuildKind::Make => {
            let positions: Vec<usize> = choice.loose.to_vec();
            let sum = layer_sum(table, actor, choice.card, &positions);

            let played = actor.remove_from_hand(choice.card);
            let mut layer = vec![played];
            layer.extend(table.remove_loose_cards(&positions));
            table.add_build(Build::new(layer, sum as u8, player));
        }
        BuildKind::Add => {
            let build_index = choice.build.expect("add targets a build");
            let positions: Vec<usize> = choice.loose.to_vec();

            let played = actor.remove_from_hand(choice.card);
            let mut layer = vec![played];
            layer.extend(table.remove_loose_cards(&positions));

            let build = table.build_mut(build_index);
            build.add_layer(layer);
            build.set_owner(player);
        }
        BuildKind::Increase => {
            let build_index = choice.build.expect("increase targets a build");
            let played = actor.remove_from_hand(choice.card);
            let new_sum = table.build(build_index).sum() + played.rank();

            let build = table.build_mut(build_index);
            build.push_to_single_layer(played);
            build.set_sum(new_sum);
            build.set_owner(player);
        }
    }
}

/// Execute a turn move. Trails go straight through: the scripted strategy
/// only trails when the search found nothing, so the checked preconditions
/// are already satisfied.
pub fn apply_move(table: &mut Table, actor: &mut PlayerState, player: PlayerId, mv: &TurnMove) {
    match mv {
        TurnMove::Trail(card_index) => {
            let card = actor.remove_from_hand(*card_index);
            table.add_loose_card(card);
        }
        TurnMove::Capture(choice) => apply_capture(table, actor, player, choice),
        TurnMove::Build(choice) => apply_build(table, actor, player, choice),
    }
}

fn layer_sum(table: &Table, actor: &PlayerState, card_index: usize, positions: &[usize]) -> u32 {
    u32::from(actor.hand()[card_index].rank())
        + positions
            .iter()
            .map(|&p| u32::from(table.loose_cards()[p].rank()))
            .sum::<u32>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::SmallVec;

    fn cards(symbols: &[&str]) -> Vec<Card> {
        symbols.iter().map(|s| s.parse().unwrap()).collect()
    }

    fn actor_with_hand(symbols: &[&str]) -> PlayerState {
        let mut actor = PlayerState::new();
        actor.replace_hand(cards(symbols));
        actor
    }

    fn total_cards(table: &Table, players: &[&PlayerState]) -> usize {
        table.card_count()
            + players
                .iter()
                .map(|p| p.hand().len() + p.pile().len())
                .sum::<usize>()
    }

    #[test]
    fn test_trail_moves_card_to_table() {
        let mut table = Table::new();
        table.add_loose_card("C9".parse().unwrap());
        let mut actor = actor_with_hand(&["H5"]);

        trail(&mut table, &mut actor, PlayerId::new(0), 0).unwrap();

        assert!(actor.hand().is_empty());
        assert_eq!(table.loose_cards().len(), 2);
    }

    #[test]
    fn test_trail_forced_capture() {
        let mut table = Table::new();
        table.add_loose_card("C5".parse().unwrap());
        let mut actor = actor_with_hand(&["H5"]);

        let err = trail(&mut table, &mut actor, PlayerId::new(0), 0);

        assert_eq!(err, Err(RuleError::ForcedCapture));
        assert_eq!(actor.hand().len(), 1);
    }

    #[test]
    fn test_trail_blocked_by_owned_build() {
        let me = PlayerId::new(0);
        let mut table = Table::new();
        table.add_build(Build::new(cards(&["H3", "C4"]), 7, me));
        let mut actor = actor_with_hand(&["H5"]);

        assert_eq!(trail(&mut table, &mut actor, me, 0), Err(RuleError::OwnsBuild));

        // The opponent may still trail past it.
        let mut other = actor_with_hand(&["D9"]);
        trail(&mut table, &mut other, me.opponent(), 0).unwrap();
    }

    #[test]
    fn test_make_build_validates_and_builds() {
        let me = PlayerId::new(0);
        let mut table = Table::new();
        table.add_dealt_cards(cards(&["C5", "D9"]));
        let mut actor = actor_with_hand(&["H3", "D8"]);

        // No cards named.
        assert_eq!(
            make_build(&mut table, &mut actor, me, 0, &[]),
            Err(RuleError::EmptyBuild)
        );

        // Card not on the table.
        assert_eq!(
            make_build(&mut table, &mut actor, me, 0, &["SK"]),
            Err(RuleError::CardsNotOnTable)
        );

        // 3 + 9 = 12 has no cover in hand.
        assert_eq!(
            make_build(&mut table, &mut actor, me, 0, &["D9"]),
            Err(RuleError::NoCoverCard)
        );

        // 3 + 5 = 8, covered by D8.
        make_build(&mut table, &mut actor, me, 0, &["C5"]).unwrap();

        assert_eq!(table.builds().len(), 1);
        let build = table.build(0);
        assert_eq!(build.sum(), 8);
        assert_eq!(build.owner(), me);
        assert_eq!(build.card_count(), 2);
        assert_eq!(table.loose_cards(), cards(&["D9"]).as_slice());
        assert_eq!(actor.hand(), cards(&["D8"]).as_slice());
    }

    #[test]
    fn test_add_to_build_matches_sum_and_transfers_owner() {
        let me = PlayerId::new(0);
        let mut table = Table::new();
        table.add_dealt_cards(cards(&["C2", "D9"]));
        table.add_build(Build::new(cards(&["H3", "C4"]), 7, me.opponent()));
        let mut actor = actor_with_hand(&["H5", "D7"]);

        // 5 + 9 = 14 is not the build's sum.
        assert_eq!(
            add_to_build(&mut table, &mut actor, me, 0, &["D9"], &["H3", "C4"]),
            Err(RuleError::SumMismatch)
        );

        add_to_build(&mut table, &mut actor, me, 0, &["C2"], &["H3", "C4"]).unwrap();

        let build = table.build(0);
        assert!(build.is_multiple());
        assert_eq!(build.sum(), 7);
        assert_eq!(build.owner(), me);
        assert_eq!(build.card_count(), 4);
    }

    #[test]
    fn test_increase_build_happy_path() {
        // Scenario: a single-layer seven owned by player 0; player 1 holds
        // a three and the ten that covers the new sum.
        let owner = PlayerId::new(0);
        let opponent = PlayerId::new(1);
        let mut table = Table::new();
        table.add_build(Build::new(cards(&["H3", "C4"]), 7, owner));
        let mut actor = actor_with_hand(&["D3", "HX"]);

        increase_build(&mut table, &mut actor, opponent, 0, &["H3", "C4"]).unwrap();

        let build = table.build(0);
        assert_eq!(build.sum(), 10);
        assert_eq!(build.owner(), opponent);
        assert_eq!(build.layer_count(), 1);
        assert_eq!(build.card_count(), 3);

        // The new owner cannot increase it again: self-owned builds are
        // off limits.
        let mut again = actor_with_hand(&["D2", "SQ"]);
        let err = increase_build(&mut table, &mut again, opponent, 0, &["H3", "C4", "D3"]);
        assert_eq!(err, Err(RuleError::OwnBuild));
    }

    #[test]
    fn test_increase_rejects_multiple_build() {
        let me = PlayerId::new(0);
        let mut table = Table::new();
        let mut build = Build::new(cards(&["H3", "C4"]), 7, me.opponent());
        build.add_layer(cards(&["D7"]));
        table.add_build(build);
        let mut actor = actor_with_hand(&["D3", "HX"]);

        let err = increase_build(&mut table, &mut actor, me, 0, &["H3", "C4", "D7"]);

        assert_eq!(err, Err(RuleError::MultipleBuild));
        assert_eq!(table.build(0).sum(), 7);
    }

    #[test]
    fn test_capture_set_checks_sum() {
        let mut table = Table::new();
        table.add_dealt_cards(cards(&["C4", "D5", "H2"]));
        let mut actor = actor_with_hand(&["S9"]);

        assert_eq!(
            capture_set(&mut table, &mut actor, 0, &["C4", "H2"]),
            Err(RuleError::SumMismatch)
        );

        capture_set(&mut table, &mut actor, 0, &["C4", "D5"]).unwrap();

        assert_eq!(actor.pile(), cards(&["C4", "D5"]).as_slice());
        assert_eq!(table.loose_cards(), cards(&["H2"]).as_slice());
    }

    #[test]
    fn test_ace_captures_14_set_and_build() {
        let mut table = Table::new();
        table.add_dealt_cards(cards(&["C9", "D5"]));
        table.add_build(Build::new(cards(&["HX", "C4"]), 14, PlayerId::new(1)));
        let mut actor = actor_with_hand(&["SA"]);

        capture_set(&mut table, &mut actor, 0, &["C9", "D5"]).unwrap();
        capture_build(&mut table, &mut actor, 0, &["HX", "C4"]).unwrap();

        assert_eq!(actor.pile().len(), 4);
        assert!(table.is_empty());
    }

    #[test]
    fn test_capture_build_rejects_wrong_sum() {
        let mut table = Table::new();
        table.add_build(Build::new(cards(&["H3", "C4"]), 7, PlayerId::new(1)));
        let mut actor = actor_with_hand(&["S9"]);

        assert_eq!(
            capture_build(&mut table, &mut actor, 0, &["H3", "C4"]),
            Err(RuleError::SumMismatch)
        );
    }

    #[test]
    fn test_apply_capture_order_and_own_build_sweep() {
        let me = PlayerId::new(0);
        let mut table = Table::new();
        table.add_dealt_cards(cards(&["H7", "C3", "D4"]));
        table.add_build(Build::new(cards(&["S3", "H4"]), 7, me));
        // The opponent's seven stays: the automatic sweep never crosses
        // ownership even though the search may target it explicitly.
        table.add_build(Build::new(cards(&["C5", "D2"]), 7, me.opponent()));
        let mut actor = actor_with_hand(&["D7"]);

        let choice = CaptureChoice {
            card: 0,
            score: 0,
            loose: SmallVec::from_slice(&[0]),
            builds: SmallVec::new(),
            sets: vec![vec![1, 2]],
        };

        apply_capture(&mut table, &mut actor, me, &choice);

        // Set {C3, D4}, then the loose seven, then the own build, then D7.
        assert_eq!(actor.pile(), cards(&["C3", "D4", "H7", "S3", "H4", "D7"]).as_slice());
        assert!(actor.hand().is_empty());
        assert_eq!(table.builds().len(), 1);
        assert_eq!(table.build(0).owner(), me.opponent());
        assert_eq!(table.last_capture(), Some(me));
    }

    #[test]
    fn test_apply_build_make_and_increase() {
        let me = PlayerId::new(0);
        let mut table = Table::new();
        table.add_dealt_cards(cards(&["C5"]));
        let mut actor = actor_with_hand(&["H3", "D8"]);

        apply_build(
            &mut table,
            &mut actor,
            me,
            &BuildChoice {
                card: 0,
                score: 0,
                kind: BuildKind::Make,
                build: None,
                loose: SmallVec::from_slice(&[0]),
            },
        );

        assert_eq!(table.build(0).sum(), 8);
        assert_eq!(table.build(0).owner(), me);
        assert!(table.loose_cards().is_empty());

        let mut opponent = actor_with_hand(&["H2", "DX"]);
        apply_build(
            &mut table,
            &mut opponent,
            me.opponent(),
            &BuildChoice {
                card: 0,
                score: 0,
                kind: BuildKind::Increase,
                build: Some(0),
                loose: SmallVec::new(),
            },
        );

        assert_eq!(table.build(0).sum(), 10);
        assert_eq!(table.build(0).owner(), me.opponent());
        assert_eq!(table.build(0).card_count(), 3);
    }

    #[test]
    fn test_moves_conserve_cards() {
        let me = PlayerId::new(0);
        let mut table = Table::new();
        table.add_dealt_cards(cards(&["H7", "C3", "D4", "SK"]));
        let mut actor = actor_with_hand(&["D7", "H2"]);
        let other = PlayerState::new();

        let before = total_cards(&table, &[&actor, &other]);

        let choice = CaptureChoice {
            card: 0,
            score: 0,
            loose: SmallVec::from_slice(&[0]),
            builds: SmallVec::new(),
            sets: vec![vec![1, 2]],
        };
        apply_capture(&mut table, &mut actor, me, &choice);

        assert_eq!(total_cards(&table, &[&actor, &other]), before);

        apply_move(&mut table, &mut actor, me, &TurnMove::Trail(0));

        assert_eq!(total_cards(&table, &[&actor, &other]), before);
        assert!(actor.hand().is_empty());
    }
}
