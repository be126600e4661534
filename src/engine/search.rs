//! Combinatorial move search: the best capture and the best build for a
//! hand/table snapshot.
//!
//! Everything here is pure and read-only, so a caller may run it
//! speculatively (the hint query does) without touching game state.
//!
//! ## Cost bound
//!
//! Set matching enumerates subsets of the loose cards (`2^n` for `n` loose
//! cards) and then subsets of the found sets (`2^s`). That is exponential
//! in principle and fine in practice: a real table rarely exceeds a dozen
//! loose cards. It is a combinatorial bound, not a throughput guarantee
//! for arbitrarily large tables.
//!
//! ## Capture scoring is greedy, on purpose
//!
//! `find_best_capture` augments the direct rank/sum matches with set
//! combinations one at a time, keeping a combination whenever it pushes
//! the running score past the best seen and backing it out otherwise. It
//! does not search all allocations of loose cards between direct matches
//! and sets jointly, so it is not a guaranteed-optimal allocator. The
//! scripted opponent's published behavior depends on exactly this
//! selection, so it stays.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use super::choice::{BuildChoice, BuildKind, CaptureChoice};
use crate::core::{Card, PlayerId, Suit, ACE_HIGH, ACE_LOW};
use crate::table::Table;

/// Heuristic worth of one card.
///
/// Ten of diamonds 4, aces 3, every spade 2 (the whole suit, not only the
/// two of spades), anything else 1.
#[must_use]
pub fn card_score(card: &Card) -> u32 {
    if card.suit() == Suit::Diamonds && card.rank() == 10 {
        return 4;
    }

    if card.is_ace() {
        return 3;
    }

    if card.suit() == Suit::Spades {
        return 2;
    }

    1
}

/// All subsets of at least two loose cards whose values sum to `value`,
/// or to 14 when `value` is the ace's low 1.
///
/// Each set is a list of ascending loose-card positions.
#[must_use]
pub fn all_valid_sets(value: u8, table: &Table) -> Vec<Vec<usize>> {
    let loose = table.loose_cards();
    let mut sets = Vec::new();

    for mask in 0usize..(1 << loose.len()) {
        let mut subset = Vec::new();
        let mut sum: u32 = 0;

        for (j, card) in loose.iter().enumerate() {
            if mask & (1 << j) != 0 {
                subset.push(j);
                sum += u32::from(card.rank());
            }
        }

        if (subset.len() > 1 && sum == u32::from(value))
            || (value == ACE_LOW && sum == u32::from(ACE_HIGH))
        {
            sets.push(subset);
        }
    }

    sets
}

/// Every way of combining the given sets without reusing a loose card,
/// each flattened into one position list. Includes the empty combination.
fn disjoint_set_unions(sets: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let mut unions = Vec::new();

    for mask in 0usize..(1 << sets.len()) {
        let mut union = Vec::new();
        let mut disjoint = true;
        let mut seen: FxHashSet<usize> = FxHashSet::default();

        for (j, set) in sets.iter().enumerate() {
            if mask & (1 << j) != 0 {
                for &position in set {
                    if !seen.insert(position) {
                        disjoint = false;
                    }
                    union.push(position);
                }
            }
        }

        if disjoint {
            unions.push(union);
        }
    }

    unions
}

/// Values a capture of some sum could be completed with by a card still in
/// hand, excluding the card at `played`. A held ace covers 14 as well.
fn values_held_elsewhere(hand: &[Card], played: usize) -> FxHashSet<u8> {
    let mut values = FxHashSet::default();

    for (i, card) in hand.iter().enumerate() {
        if i == played {
            continue;
        }

        if card.is_ace() {
            values.insert(ACE_HIGH);
        }

        values.insert(card.rank());
    }

    values
}

fn build_score(table: &Table, index: usize) -> u32 {
    table.build(index).cards().map(card_score).sum()
}

/// Find the highest-scoring capture across every card in hand.
///
/// Per hand card the candidates are: loose cards of equal rank (aces take
/// aces regardless of chosen value), builds whose sum equals the rank (14
/// for an ace, any owner), and disjoint combinations of matching sets,
/// folded in greedily as described in the module docs.
///
/// Returns `None` only for an empty hand. With no match anywhere the
/// choice has empty match lists and scores just the played card.
#[must_use]
pub fn find_best_capture(hand: &[Card], table: &Table) -> Option<CaptureChoice> {
    if hand.is_empty() {
        return None;
    }

    let loose = table.loose_cards();
    let builds = table.builds();

    let mut max_score = 0u32;
    let mut max_card = 0usize;
    let mut max_loose: SmallVec<[usize; 4]> = SmallVec::new();
    let mut max_builds: SmallVec<[usize; 2]> = SmallVec::new();
    let mut max_set: Vec<usize> = Vec::new();

    for (i, played) in hand.iter().enumerate() {
        let unions = disjoint_set_unions(&all_valid_sets(played.rank(), table));

        let mut loose_hits: SmallVec<[usize; 4]> = SmallVec::new();
        let mut build_hits: SmallVec<[usize; 2]> = SmallVec::new();
        let mut score = 0u32;

        for (j, card) in loose.iter().enumerate() {
            if (played.is_ace() && card.is_ace()) || played.rank() == card.rank() {
                loose_hits.push(j);
                score += card_score(card);
            }
        }

        for (j, build) in builds.iter().enumerate() {
            if (played.is_ace() && build.sum() == ACE_HIGH) || played.rank() == build.sum() {
                build_hits.push(j);
                score += build_score(table, j);
            }
        }

        // The empty union comes first, so the direct matches alone are a
        // candidate; each later union stacks onto the running score and is
        // backed out only when it fails to improve on the best seen.
        for union in unions {
            let set_score: u32 = union.iter().map(|&k| card_score(&loose[k])).sum();
            score += set_score;

            if score > max_score {
                max_score = score;
                max_card = i;
                max_loose = loose_hits.clone();
                max_builds = build_hits.clone();
                max_set = union;
            } else {
                score -= set_score;
            }
        }
    }

    let mut choice = CaptureChoice {
        card: max_card,
        score: max_score + card_score(&hand[max_card]),
        loose: max_loose,
        builds: max_builds,
        sets: Vec::new(),
    };

    if !max_set.is_empty() {
        choice.sets.push(max_set);
    }

    Some(choice)
}

/// Best new single-layer build for the card at `played`.
///
/// Skipped entirely when the played rank already matches a loose card:
/// an immediate capture of equal value exists, so proposing a build for
/// it would be wasted.
fn best_make(hand: &[Card], played: usize, table: &Table) -> Option<BuildChoice> {
    let loose = table.loose_cards();
    let card = &hand[played];
    let wanted = values_held_elsewhere(hand, played);

    let mut candidate_sets: Vec<Vec<usize>> = Vec::new();

    if !table.value_matches_loose_card(card.rank()) {
        for mask in 0usize..(1 << loose.len()) {
            let mut subset = Vec::new();
            let mut sum = u32::from(card.rank());

            for (j, loose_card) in loose.iter().enumerate() {
                if mask & (1 << j) != 0 {
                    subset.push(j);
                    sum += u32::from(loose_card.rank());
                }
            }

            if sum <= u32::from(u8::MAX) && wanted.contains(&(sum as u8)) {
                candidate_sets.push(subset);
            }
        }
    }

    let baseline = card_score(card);
    let mut best_score = baseline;
    let mut best_set: Option<Vec<usize>> = None;

    for set in candidate_sets {
        let score = baseline + set.iter().map(|&j| card_score(&loose[j])).sum::<u32>();

        if score > best_score {
            best_score = score;
            best_set = Some(set);
        }
    }

    best_set.map(|set| BuildChoice {
        card: played,
        score: best_score,
        kind: BuildKind::Make,
        build: None,
        loose: SmallVec::from_vec(set),
    })
}

/// Best extension of an existing build with a new layer.
///
/// As `best_make`, but the candidate sum must also be the sum of a build
/// already on the table; the layer goes onto that build.
fn best_add(hand: &[Card], played: usize, table: &Table) -> Option<BuildChoice> {
    let loose = table.loose_cards();
    let builds = table.builds();
    let card = &hand[played];
    let wanted = values_held_elsewhere(hand, played);

    let mut candidates: Vec<(usize, Vec<usize>)> = Vec::new();

    if !table.value_matches_loose_card(card.rank()) {
        for mask in 0usize..(1 << loose.len()) {
            let mut subset = Vec::new();
            let mut sum = u32::from(card.rank());

            for (j, loose_card) in loose.iter().enumerate() {
                if mask & (1 << j) != 0 {
                    subset.push(j);
                    sum += u32::from(loose_card.rank());
                }
            }

            if sum <= u32::from(u8::MAX) && wanted.contains(&(sum as u8)) {
                for (j, build) in builds.iter().enumerate() {
                    if u32::from(build.sum()) == sum {
                        candidates.push((j, subset.clone()));
                    }
                }
            }
        }
    }

    let baseline = card_score(card);
    let mut best_score = baseline;
    let mut best: Option<(usize, Vec<usize>)> = None;

    for (build_index, subset) in candidates {
        let score = baseline
            + build_score(table, build_index)
            + subset.iter().map(|&j| card_score(&loose[j])).sum::<u32>();

        if score > best_score {
            best_score = score;
            best = Some((build_index, subset));
        }
    }

    best.map(|(build_index, subset)| BuildChoice {
        card: played,
        score: best_score,
        kind: BuildKind::Add,
        build: Some(build_index),
        loose: SmallVec::from_vec(subset),
    })
}

/// Best increase of an opposing single-layer build by the played card
/// alone. Multiple builds and the actor's own builds are ineligible.
fn best_increase(
    hand: &[Card],
    played: usize,
    table: &Table,
    player: PlayerId,
) -> Option<BuildChoice> {
    let builds = table.builds();
    let card = &hand[played];
    let wanted = values_held_elsewhere(hand, played);

    let mut candidates: Vec<usize> = Vec::new();

    if !table.value_matches_loose_card(card.rank()) {
        for (j, build) in builds.iter().enumerate() {
            if build.owner() == player || build.is_multiple() {
                continue;
            }

            let sum = u32::from(card.rank()) + u32::from(build.sum());
            if sum <= u32::from(u8::MAX) && wanted.contains(&(sum as u8)) {
                candidates.push(j);
            }
        }
    }

    let baseline = card_score(card);
    let mut best_score = baseline;
    let mut best: Option<usize> = None;

    for build_index in candidates {
        let score = baseline + build_score(table, build_index);

        if score > best_score {
            best_score = score;
            best = Some(build_index);
        }
    }

    best.map(|build_index| BuildChoice {
        card: played,
        score: best_score,
        kind: BuildKind::Increase,
        build: Some(build_index),
        loose: SmallVec::new(),
    })
}

/// Find the highest-scoring build move across every card in hand.
///
/// Evaluates Make, Add, and Increase independently, then ranks their
/// winners by score. On equal scores the earlier strategy keeps the spot:
/// Make over Add over Increase. `None` means no viable build exists.
#[must_use]
pub fn find_best_build(hand: &[Card], table: &Table, player: PlayerId) -> Option<BuildChoice> {
    let mut best_of: [Option<BuildChoice>; 3] = [None, None, None];

    for played in 0..hand.len() {
        let found = [
            best_make(hand, played, table),
            best_add(hand, played, table),
            best_increase(hand, played, table, player),
        ];

        for (slot, candidate) in best_of.iter_mut().zip(found) {
            if let Some(candidate) = candidate {
                let improves = slot.as_ref().map_or(true, |held| candidate.score > held.score);
                if improves {
                    *slot = Some(candidate);
                }
            }
        }
    }

    let mut best: Option<BuildChoice> = None;
    for candidate in best_of.into_iter().flatten() {
        let improves = best.as_ref().map_or(true, |held| candidate.score > held.score);
        if improves {
            best = Some(candidate);
        }
    }

    best
}
