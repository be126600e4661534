//! The shared table: loose cards, active builds, last-capture marker.
//!
//! The table owns its cards. Every removal returns the removed cards by
//! value so a card leaving the table is always accounted for in its
//! destination; nothing is silently dropped or duplicated.

use serde::{Deserialize, Serialize};

use super::build::Build;
use crate::core::{Card, PlayerId, ACE_HIGH};

/// Table state for one round.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    loose: Vec<Card>,
    builds: Vec<Build>,
    last_capture: Option<PlayerId>,
}

impl Table {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a table from loaded state.
    #[must_use]
    pub fn from_parts(loose: Vec<Card>, builds: Vec<Build>, last_capture: Option<PlayerId>) -> Self {
        Self {
            loose,
            builds,
            last_capture,
        }
    }

    // === Accessors ===

    /// The loose cards, in table order.
    #[must_use]
    pub fn loose_cards(&self) -> &[Card] {
        &self.loose
    }

    /// The active builds, in creation order.
    #[must_use]
    pub fn builds(&self) -> &[Build] {
        &self.builds
    }

    /// One build by position.
    #[must_use]
    pub fn build(&self, index: usize) -> &Build {
        &self.builds[index]
    }

    pub(crate) fn build_mut(&mut self, index: usize) -> &mut Build {
        &mut self.builds[index]
    }

    /// Loose cards plus builds, as displayed fixtures.
    #[must_use]
    pub fn size(&self) -> usize {
        self.loose.len() + self.builds.len()
    }

    /// Whether the table holds nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loose.is_empty() && self.builds.is_empty()
    }

    /// Total cards on the table, builds included. Conservation checks use this.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.loose.len() + self.builds.iter().map(Build::card_count).sum::<usize>()
    }

    /// The player who captured most recently this round, if anyone has.
    #[must_use]
    pub fn last_capture(&self) -> Option<PlayerId> {
        self.last_capture
    }

    pub(crate) fn set_last_capture(&mut self, player: PlayerId) {
        self.last_capture = Some(player);
    }

    // === Adding cards ===

    /// Trail or deal a single card face-up.
    pub fn add_loose_card(&mut self, card: Card) {
        self.loose.push(card);
    }

    /// Append the cards dealt at the start of a round.
    pub fn add_dealt_cards(&mut self, dealt: Vec<Card>) {
        self.loose.extend(dealt);
    }

    /// Place a new build.
    pub fn add_build(&mut self, build: Build) {
        self.builds.push(build);
    }

    // === Removing cards ===

    /// Remove the loose cards at `positions`, preserving survivor order.
    ///
    /// Returns the removed cards in ascending position order. Positions
    /// must refer to current loose cards; anything else is a caller bug.
    pub fn remove_loose_cards(&mut self, positions: &[usize]) -> Vec<Card> {
        debug_assert!(positions.iter().all(|&p| p < self.loose.len()));

        let mut removed = Vec::with_capacity(positions.len());
        let mut kept = Vec::with_capacity(self.loose.len() - positions.len());

        for (i, card) in self.loose.drain(..).enumerate() {
            if positions.contains(&i) {
                removed.push(card);
            } else {
                kept.push(card);
            }
        }

        self.loose = kept;
        removed
    }

    /// Remove one build and flatten it into its cards, layer-then-card order.
    pub fn take_build(&mut self, index: usize) -> Vec<Card> {
        debug_assert!(index < self.builds.len());
        self.builds.remove(index).into_cards()
    }

    /// Remove the builds at `positions` and flatten them all, in build order.
    pub fn remove_builds(&mut self, positions: &[usize]) -> Vec<Card> {
        debug_assert!(positions.iter().all(|&p| p < self.builds.len()));

        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.builds.len() - positions.len());

        for (i, build) in self.builds.drain(..).enumerate() {
            if positions.contains(&i) {
                removed.extend(build.into_cards());
            } else {
                kept.push(build);
            }
        }

        self.builds = kept;
        removed
    }

    /// Round-end sweep: every remaining table card, loose and built.
    pub fn clear(&mut self) -> Vec<Card> {
        let mut cards = std::mem::take(&mut self.loose);
        for build in self.builds.drain(..) {
            cards.extend(build.into_cards());
        }

        cards
    }

    // === Lookups ===

    /// Find the positions of the requested card symbols among the loose
    /// cards. Succeeds only if every symbol is found. The input collaborator
    /// guarantees the request holds no duplicates.
    #[must_use]
    pub fn cards_on_table(&self, symbols: &[&str]) -> Option<Vec<usize>> {
        let mut positions = Vec::with_capacity(symbols.len());

        for (i, card) in self.loose.iter().enumerate() {
            if symbols.contains(&card.to_string().as_str()) {
                positions.push(i);
            }
        }

        (positions.len() == symbols.len()).then_some(positions)
    }

    /// Find the build whose cards, across all layers combined, exactly
    /// match the requested symbols. Partial submatches are rejected.
    #[must_use]
    pub fn find_build(&self, symbols: &[&str]) -> Option<usize> {
        self.builds.iter().position(|build| {
            build.card_count() == symbols.len()
                && build
                    .cards()
                    .all(|card| symbols.contains(&card.to_string().as_str()))
        })
    }

    /// Whether any loose card has this value. Drives the forced-capture rule.
    #[must_use]
    pub fn value_matches_loose_card(&self, value: u8) -> bool {
        self.loose.iter().any(|card| card.rank() == value)
    }

    /// Whether a build owned by `player` has this sum. Drives the
    /// forced-capture rule; builds of the other player do not compel.
    #[must_use]
    pub fn value_matches_build(&self, value: u8, player: PlayerId) -> bool {
        self.builds
            .iter()
            .any(|build| build.owner() == player && build.sum() == value)
    }

    /// Whether `player` owns any build. Owning one forbids trailing.
    #[must_use]
    pub fn player_owns_any_builds(&self, player: PlayerId) -> bool {
        self.builds.iter().any(|build| build.owner() == player)
    }

    /// Whether any loose card is an ace.
    #[must_use]
    pub fn has_aces(&self) -> bool {
        self.loose.iter().any(Card::is_ace)
    }

    /// Positions of builds `player` owns whose sum matches the played
    /// value (an ace also takes a 14 build). The automatic post-capture
    /// sweep uses this.
    #[must_use]
    pub fn matching_own_builds(&self, played: &Card, player: PlayerId) -> Vec<usize> {
        self.builds
            .iter()
            .enumerate()
            .filter(|(_, build)| {
                build.owner() == player
                    && (build.sum() == played.rank() || (played.is_ace() && build.sum() == ACE_HIGH))
            })
            .map(|(i, _)| i)
            .collect()
    }
}
