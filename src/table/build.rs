//! Build fixture: layered card groups working toward one capturable sum.
//!
//! Every layer of a build sums to the same value. A build with more than
//! one layer is a *multiple build*: it can be extended with another layer
//! or captured whole, but never increased.

use serde::{Deserialize, Serialize};

use crate::core::{Card, PlayerId};

/// A build on the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    layers: Vec<Vec<Card>>,
    sum: u8,
    owner: PlayerId,
}

impl Build {
    /// Create a single-layer build.
    #[must_use]
    pub fn new(layer: Vec<Card>, sum: u8, owner: PlayerId) -> Self {
        debug_assert!(!layer.is_empty(), "a build layer must hold cards");
        Self {
            layers: vec![layer],
            sum,
            owner,
        }
    }

    /// The capturing value shared by every layer.
    #[must_use]
    pub fn sum(&self) -> u8 {
        self.sum
    }

    /// The player who last created, extended, or increased this build.
    #[must_use]
    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: PlayerId) {
        self.owner = owner;
    }

    pub(crate) fn set_sum(&mut self, sum: u8) {
        self.sum = sum;
    }

    /// The layers, oldest first.
    #[must_use]
    pub fn layers(&self) -> &[Vec<Card>] {
        &self.layers
    }

    /// Number of layers.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Whether this is a multiple build (more than one layer).
    #[must_use]
    pub fn is_multiple(&self) -> bool {
        self.layers.len() > 1
    }

    /// Every card in the build, in layer-then-card order.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.layers.iter().flatten()
    }

    /// Total number of cards across all layers.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }

    /// Append a new layer. The caller guarantees the layer matches `sum`.
    pub fn add_layer(&mut self, layer: Vec<Card>) {
        debug_assert!(!layer.is_empty(), "a build layer must hold cards");
        self.layers.push(layer);
    }

    /// Append a card to the sole layer (the increase path).
    ///
    /// Only meaningful on a single-layer build; callers check
    /// `is_multiple` first.
    pub fn push_to_single_layer(&mut self, card: Card) {
        debug_assert!(!self.is_multiple(), "cannot grow a layer of a multiple build");
        self.layers[0].push(card);
    }

    /// Flatten the build into its cards, layer-then-card order.
    pub(crate) fn into_cards(self) -> Vec<Card> {
        self.layers.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Suit;

    fn card(symbol: &str) -> Card {
        symbol.parse().unwrap()
    }

    #[test]
    fn test_single_layer_build() {
        let build = Build::new(vec![card("H3"), card("C4")], 7, PlayerId::new(0));

        assert_eq!(build.sum(), 7);
        assert_eq!(build.owner(), PlayerId::new(0));
        assert!(!build.is_multiple());
        assert_eq!(build.card_count(), 2);
    }

    #[test]
    fn test_add_layer_makes_multiple() {
        let mut build = Build::new(vec![card("H3"), card("C4")], 7, PlayerId::new(0));
        build.add_layer(vec![card("D7")]);

        assert!(build.is_multiple());
        assert_eq!(build.layer_count(), 2);
        assert_eq!(build.card_count(), 3);
    }

    #[test]
    fn test_cards_flatten_in_layer_order() {
        let mut build = Build::new(vec![card("H3"), card("C4")], 7, PlayerId::new(1));
        build.add_layer(vec![card("S2"), card("D5")]);

        let flat: Vec<String> = build.cards().map(Card::to_string).collect();
        assert_eq!(flat, vec!["H3", "C4", "S2", "D5"]);

        let owned: Vec<String> = build.into_cards().iter().map(Card::to_string).collect();
        assert_eq!(owned, vec!["H3", "C4", "S2", "D5"]);
    }

    #[test]
    fn test_push_to_single_layer() {
        let mut build = Build::new(vec![Card::new(Suit::Hearts, 7)], 7, PlayerId::new(0));
        build.push_to_single_layer(Card::new(Suit::Clubs, 3));
        build.set_sum(10);
        build.set_owner(PlayerId::new(1));

        assert_eq!(build.sum(), 10);
        assert_eq!(build.owner(), PlayerId::new(1));
        assert_eq!(build.layer_count(), 1);
        assert_eq!(build.card_count(), 2);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut build = Build::new(vec![card("H3"), card("C4")], 7, PlayerId::new(1));
        build.add_layer(vec![card("S7")]);

        let json = serde_json::to_string(&build).unwrap();
        let back: Build = serde_json::from_str(&json).unwrap();

        assert_eq!(back, build);
    }
}
