//! The deck: 52 cards, seeded shuffle, four-card deals.

use serde::{Deserialize, Serialize};

use super::card::{Card, Suit};
use super::rng::GameRng;

/// Number of cards in a full deck.
pub const DECK_SIZE: usize = 52;

/// Cards handed out per deal: four to a hand, four to the table.
pub const DEAL_SIZE: usize = 4;

/// A deck of cards, dealt from the back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Build a full 52-card deck and shuffle it with the given RNG.
    #[must_use]
    pub fn shuffled(rng: &mut GameRng) -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL {
            for rank in 1..=13 {
                cards.push(Card::new(suit, rank));
            }
        }

        rng.shuffle(&mut cards);

        Self { cards }
    }

    /// Rebuild a deck from loaded cards. The last card is dealt first.
    #[must_use]
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Remaining cards, bottom first.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Number of cards left.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the deck is exhausted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Deal the next `DEAL_SIZE` cards (fewer only if the deck runs dry,
    /// which a 52-card deck dealt in fours never does).
    pub fn deal_next(&mut self) -> Vec<Card> {
        let mut dealt = Vec::with_capacity(DEAL_SIZE);
        for _ in 0..DEAL_SIZE {
            match self.cards.pop() {
                Some(card) => dealt.push(card),
                None => break,
            }
        }

        dealt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_full_deck() {
        let mut rng = GameRng::new(42);
        let deck = Deck::shuffled(&mut rng);

        assert_eq!(deck.len(), DECK_SIZE);

        let unique: HashSet<String> = deck.cards().iter().map(Card::to_string).collect();
        assert_eq!(unique.len(), DECK_SIZE);
    }

    #[test]
    fn test_shuffle_is_seed_deterministic() {
        let mut rng1 = GameRng::new(7);
        let mut rng2 = GameRng::new(7);
        assert_eq!(Deck::shuffled(&mut rng1), Deck::shuffled(&mut rng2));

        let mut rng3 = GameRng::new(8);
        assert_ne!(Deck::shuffled(&mut rng1), Deck::shuffled(&mut rng3));
    }

    #[test]
    fn test_deal_next_takes_four_from_the_back() {
        let mut rng = GameRng::new(42);
        let mut deck = Deck::shuffled(&mut rng);
        let expected: Vec<Card> = deck.cards()[DECK_SIZE - DEAL_SIZE..]
            .iter()
            .rev()
            .cloned()
            .collect();

        let dealt = deck.deal_next();

        assert_eq!(dealt, expected);
        assert_eq!(deck.len(), DECK_SIZE - DEAL_SIZE);
    }

    #[test]
    fn test_deck_deals_out_evenly() {
        let mut rng = GameRng::new(42);
        let mut deck = Deck::shuffled(&mut rng);

        for _ in 0..13 {
            assert_eq!(deck.deal_next().len(), DEAL_SIZE);
        }
        assert!(deck.is_empty());
        assert!(deck.deal_next().is_empty());
    }

    #[test]
    fn test_serde_round_trip() {
        let mut rng = GameRng::new(42);
        let deck = Deck::shuffled(&mut rng);

        let json = serde_json::to_string(&deck).unwrap();
        let back: Deck = serde_json::from_str(&json).unwrap();

        assert_eq!(back, deck);
    }
}
