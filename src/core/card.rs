//! Card identity: suit, rank, and the two-character symbol form.
//!
//! ## Ace duality
//!
//! Rank 1 is the ace. It is stored as 1 everywhere, but counts as either
//! 1 (`ACE_LOW`) or 14 (`ACE_HIGH`) when matching captures and build sums.
//! No card ever *stores* 14; the high value only appears in sums.
//!
//! ## Symbol form
//!
//! Exactly two characters: suit letter (`H`, `S`, `C`, `D`) then rank token
//! (`A`, `2`..`9`, `X`, `J`, `Q`, `K`, where `X` is the ten). This form is
//! the canonical identity used by the input and persistence collaborators
//! and round-trips exactly through `Display`/`FromStr` and serde.
//!
//! ```
//! use cassino::core::Card;
//!
//! let card: Card = "DX".parse().unwrap();
//! assert_eq!(card.rank(), 10);
//! assert_eq!(card.to_string(), "DX");
//! ```

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The ace's low value, as stored on every ace.
pub const ACE_LOW: u8 = 1;

/// The ace's high value, used only when matching sums.
pub const ACE_HIGH: u8 = 14;

/// Card suit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Spades,
    Hearts,
    Clubs,
    Diamonds,
}

impl Suit {
    /// All four suits, in deck-construction order.
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Clubs, Suit::Diamonds];

    /// The suit's symbol letter.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Suit::Spades => 'S',
            Suit::Hearts => 'H',
            Suit::Clubs => 'C',
            Suit::Diamonds => 'D',
        }
    }

    /// Parse a suit letter.
    #[must_use]
    pub const fn from_letter(letter: char) -> Option<Suit> {
        match letter {
            'S' => Some(Suit::Spades),
            'H' => Some(Suit::Hearts),
            'C' => Some(Suit::Clubs),
            'D' => Some(Suit::Diamonds),
            _ => None,
        }
    }
}

/// A playing card.
///
/// Value-equal to any other card sharing suit and rank. Cards are created
/// at deck construction or state load and then *move* between containers
/// (hand, pile, table, build layer); nothing clones them on the play path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Card {
    suit: Suit,
    rank: u8,
}

impl Card {
    /// Create a card. `rank` must be in `1..=13`.
    #[must_use]
    pub fn new(suit: Suit, rank: u8) -> Self {
        debug_assert!((1..=13).contains(&rank), "rank out of range: {rank}");
        Self { suit, rank }
    }

    /// The card's suit.
    #[must_use]
    pub const fn suit(&self) -> Suit {
        self.suit
    }

    /// The card's rank, `1..=13`. Aces are always 1 here.
    #[must_use]
    pub const fn rank(&self) -> u8 {
        self.rank
    }

    /// Whether this card is an ace.
    #[must_use]
    pub const fn is_ace(&self) -> bool {
        self.rank == ACE_LOW
    }

    /// The rank token character of the symbol form.
    #[must_use]
    pub const fn rank_token(&self) -> char {
        match self.rank {
            1 => 'A',
            2 => '2',
            3 => '3',
            4 => '4',
            5 => '5',
            6 => '6',
            7 => '7',
            8 => '8',
            9 => '9',
            10 => 'X',
            11 => 'J',
            12 => 'Q',
            _ => 'K',
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.suit.letter(), self.rank_token())
    }
}

/// Error for a malformed card symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseCardError(pub String);

impl fmt::Display for ParseCardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid card symbol: {:?}", self.0)
    }
}

impl std::error::Error for ParseCardError {}

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(symbol: &str) -> Result<Self, Self::Err> {
        let mut chars = symbol.chars();
        let (suit_char, rank_char) = match (chars.next(), chars.next(), chars.next()) {
            (Some(s), Some(r), None) => (s, r),
            _ => return Err(ParseCardError(symbol.to_string())),
        };

        let suit = Suit::from_letter(suit_char).ok_or_else(|| ParseCardError(symbol.to_string()))?;
        let rank = match rank_char {
            'A' => 1,
            '2'..='9' => rank_char as u8 - b'0',
            'X' => 10,
            'J' => 11,
            'Q' => 12,
            'K' => 13,
            _ => return Err(ParseCardError(symbol.to_string())),
        };

        Ok(Card::new(suit, rank))
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let symbol = String::deserialize(deserializer)?;
        symbol.parse().map_err(DeError::custom)
    }
}
