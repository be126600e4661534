//! # cassino
//!
//! Rules and strategy engine for two-player Cassino: players trail, build,
//! and capture cards from a shared table, and a scripted opponent searches
//! for the best legal move each turn.
//!
//! ## Design Principles
//!
//! 1. **Cards move, never alias**: every container (hand, pile, table,
//!    build layer) owns its cards; removals return the removed cards so
//!    the 52-card set stays accounted for at all times.
//!
//! 2. **Pure search, explicit mutation**: the move search reads a
//!    snapshot and produces candidate records; only the resolver mutates
//!    state. The search therefore doubles as a side-effect-free hint.
//!
//! 3. **Deterministic by seed**: all randomness flows through an
//!    explicitly passed `GameRng`, so a fixed seed replays a full game.
//!
//! ## Modules
//!
//! - `core`: cards, the deck, players, RNG
//! - `table`: loose cards and builds, with their location invariants
//! - `engine`: move search, candidate records, and resolution
//! - `strategy`: the produce-a-move capability and the scripted player
//! - `round`: dealing, turn application, round-end scoring, snapshots

pub mod core;
pub mod engine;
pub mod round;
pub mod strategy;
pub mod table;

// Re-export commonly used types
pub use crate::core::{
    Card, Deck, GameRng, GameRngState, ParseCardError, PlayerId, PlayerState, Suit, ACE_HIGH,
    ACE_LOW, DEAL_SIZE, DECK_SIZE, PLAYER_COUNT,
};

pub use crate::table::{Build, Table};

pub use crate::engine::{
    card_score, find_best_build, find_best_capture, BuildChoice, BuildKind, CaptureChoice,
    RuleError, TurnMove,
};

pub use crate::strategy::{best_move, Scripted, Strategy};

pub use crate::round::{MoveRecord, Round, WINNING_SCORE};
