//! Core building blocks: cards, the deck, players, and the RNG.

pub mod card;
pub mod deck;
pub mod player;
pub mod rng;

pub use card::{Card, ParseCardError, Suit, ACE_HIGH, ACE_LOW};
pub use deck::{Deck, DEAL_SIZE, DECK_SIZE};
pub use player::{PlayerId, PlayerState, PLAYER_COUNT};
pub use rng::{GameRng, GameRngState};
