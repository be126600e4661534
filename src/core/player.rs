//! Player identity and per-player card holdings.
//!
//! The game is strictly two-player. `PlayerId` is a 0/1 newtype; the
//! persistence collaborator decides which index is the human seat.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::card::Card;

/// Number of players in a game.
pub const PLAYER_COUNT: usize = 2;

/// Player identifier, 0 or 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a player ID. `id` must be 0 or 1.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// The raw index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The other player.
    #[must_use]
    pub const fn opponent(self) -> PlayerId {
        PlayerId(1 - self.0)
    }

    /// Both player IDs, in index order.
    pub fn all() -> impl Iterator<Item = PlayerId> {
        (0..PLAYER_COUNT as u8).map(PlayerId)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// One player's cards and score.
///
/// The hand and pile own their cards; every mutation moves cards in or out
/// so the full card set stays accounted for across containers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    hand: Vec<Card>,
    pile: Vec<Card>,
    score: u32,
}

impl PlayerState {
    /// Create an empty player state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The cards currently in hand.
    #[must_use]
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    /// The capture pile.
    #[must_use]
    pub fn pile(&self) -> &[Card] {
        &self.pile
    }

    /// Accumulated tournament score.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Add round points to the score.
    pub fn add_score(&mut self, points: u32) {
        self.score += points;
    }

    /// Replace the hand with freshly dealt cards.
    pub fn replace_hand(&mut self, cards: Vec<Card>) {
        self.hand = cards;
    }

    /// Remove and return the card at `index` in the hand.
    pub fn remove_from_hand(&mut self, index: usize) -> Card {
        debug_assert!(index < self.hand.len(), "hand index out of range");
        self.hand.remove(index)
    }

    /// Move a card into the pile.
    pub fn add_to_pile(&mut self, card: Card) {
        self.pile.push(card);
    }

    /// Move several cards into the pile.
    pub fn extend_pile(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.pile.extend(cards);
    }

    /// Drain the pile (round reset).
    pub fn take_pile(&mut self) -> Vec<Card> {
        std::mem::take(&mut self.pile)
    }
}
