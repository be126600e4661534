//! Round lifecycle: dealing, turn application, and round-end scoring.
//!
//! The interactive menu loop lives outside this crate; it drives a
//! [`Round`] by checking `needs_redeal`/`is_over`, calling `play_turn`
//! with the active player's strategy, and `finish`ing the round when the
//! deck and both hands are empty. Every move is recorded in a persistent
//! history vector, so snapshots clone in O(1).

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::{Card, Deck, PlayerId, PlayerState, Suit};
use crate::engine::choice::TurnMove;
use crate::engine::resolve::apply_move;
use crate::strategy::Strategy;
use crate::table::Table;

/// First player to reach this score wins the tournament.
pub const WINNING_SCORE: u32 = 21;

/// One applied move, for history and replay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Who moved.
    pub player: PlayerId,
    /// Turn number within the round, starting at 1.
    pub turn: u32,
    /// The move as applied.
    pub mv: TurnMove,
}

/// A round in progress.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Round {
    table: Table,
    deck: Deck,
    players: [PlayerState; 2],
    current: PlayerId,
    number: u32,
    turn: u32,
    history: Vector<MoveRecord>,
}

impl Round {
    /// Start a fresh round: four cards to each hand in player order, four
    /// face-up to the table.
    #[must_use]
    pub fn new(number: u32, first: PlayerId, mut deck: Deck) -> Self {
        let mut players = [PlayerState::new(), PlayerState::new()];
        for player in &mut players {
            player.replace_hand(deck.deal_next());
        }

        let mut table = Table::new();
        table.add_dealt_cards(deck.deal_next());

        Self {
            table,
            deck,
            players,
            current: first,
            number,
            turn: 0,
            history: Vector::new(),
        }
    }

    /// Rebuild a round from loaded state (the persistence collaborator's
    /// entry point).
    #[must_use]
    pub fn from_parts(
        number: u32,
        current: PlayerId,
        table: Table,
        deck: Deck,
        players: [PlayerState; 2],
    ) -> Self {
        Self {
            table,
            deck,
            players,
            current,
            number,
            turn: 0,
            history: Vector::new(),
        }
    }

    // === Accessors ===

    /// The table.
    #[must_use]
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// The deck.
    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// One player's state.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> &PlayerState {
        &self.players[id.index()]
    }

    /// Whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    /// The round number, starting at 1.
    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Every move applied so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<MoveRecord> {
        &self.history
    }

    /// The most recent capturer this round, if anyone captured.
    #[must_use]
    pub fn last_capture(&self) -> Option<PlayerId> {
        self.table.last_capture()
    }

    // === Progression ===

    /// Whether both hands are empty.
    #[must_use]
    pub fn all_hands_empty(&self) -> bool {
        self.players.iter().all(|p| p.hand().is_empty())
    }

    /// Whether the hands ran out but the deck still has cards.
    #[must_use]
    pub fn needs_redeal(&self) -> bool {
        self.all_hands_empty() && !self.deck.is_empty()
    }

    /// Whether the round is over: hands and deck are both exhausted.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.all_hands_empty() && self.deck.is_empty()
    }

    /// Deal four fresh cards to each hand, in player order.
    pub fn deal_hands(&mut self) {
        for player in &mut self.players {
            player.replace_hand(self.deck.deal_next());
        }
    }

    /// Let the active player's strategy pick a move, apply it, record it,
    /// and pass the turn. Returns the applied move.
    ///
    /// The caller redeals first when `needs_redeal` reports so; the
    /// active player's hand must not be empty.
    pub fn play_turn(&mut self, strategy: &mut dyn Strategy) -> TurnMove {
        let player = self.current;
        debug_assert!(!self.players[player.index()].hand().is_empty());

        let mv = strategy.choose(self.players[player.index()].hand(), &self.table, player);
        apply_move(&mut self.table, &mut self.players[player.index()], player, &mv);

        self.turn += 1;
        self.history.push_back(MoveRecord {
            player,
            turn: self.turn,
            mv: mv.clone(),
        });

        self.current = player.opponent();
        mv
    }

    /// Finish the round: sweep the table leftovers to the last capturer
    /// (if nobody captured, the table keeps its cards), then score both
    /// piles. Returns the points awarded this round per player index.
    pub fn finish(&mut self) -> [u32; 2] {
        if let Some(last) = self.table.last_capture() {
            let leftovers = self.table.clear();
            self.players[last.index()].extend_pile(leftovers);
        }

        self.score_piles()
    }

    /// Pile points: +3 most cards (withheld on a tie), +1 most spades
    /// (likewise), +2 for the ten of diamonds, +1 for the two of spades,
    /// +1 per ace.
    fn score_piles(&mut self) -> [u32; 2] {
        let mut points = [0u32; 2];

        let sizes = [self.players[0].pile().len(), self.players[1].pile().len()];
        if sizes[0] != sizes[1] {
            points[usize::from(sizes[1] > sizes[0])] += 3;
        }

        let spade_count = |p: &PlayerState| {
            p.pile().iter().filter(|c| c.suit() == Suit::Spades).count()
        };
        let spades = [spade_count(&self.players[0]), spade_count(&self.players[1])];
        if spades[0] != spades[1] {
            points[usize::from(spades[1] > spades[0])] += 1;
        }

        for (index, player) in self.players.iter().enumerate() {
            for card in player.pile() {
                points[index] += card_points(card);
            }
        }

        for (player, earned) in self.players.iter_mut().zip(points) {
            player.add_score(earned);
        }

        points
    }

    /// Whether someone has reached the winning score.
    #[must_use]
    pub fn tournament_over(&self) -> bool {
        self.players.iter().any(|p| p.score() >= WINNING_SCORE)
    }

    /// Total cards across every container. Constant for a whole round;
    /// the conservation tests lean on this.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.deck.len()
            + self.table.card_count()
            + self
                .players
                .iter()
                .map(|p| p.hand().len() + p.pile().len())
                .sum::<usize>()
    }

    // === Snapshots ===

    /// Serialize the whole round to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Restore a round from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

fn card_points(card: &Card) -> u32 {
    if card.suit() == Suit::Diamonds && card.rank() == 10 {
        2
    } else if (card.suit() == Suit::Spades && card.rank() == 2) || card.is_ace() {
        1
    } else {
        0
    }
}
