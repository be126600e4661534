//! Move-candidate records produced by the search and consumed by the
//! resolver: a capture plan, a build plan, or a trail.
//!
//! All positions are indices into the snapshot the search ran against:
//! `card` into the acting player's hand, `loose`/`sets` into the table's
//! loose cards, `build` into the table's build list. They stay valid until
//! the move is resolved.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A proposed capture and its heuristic score.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureChoice {
    /// Hand index of the card to play.
    pub card: usize,

    /// Heuristic score, played card included.
    pub score: u32,

    /// Loose cards matched directly by rank (or ace-to-ace).
    pub loose: SmallVec<[usize; 4]>,

    /// Builds whose sum matches the played value, any owner.
    pub builds: SmallVec<[usize; 2]>,

    /// Chosen disjoint sets; each inner list of loose positions sums to
    /// the played value.
    pub sets: Vec<Vec<usize>>,
}

impl CaptureChoice {
    /// Whether the capture matched nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loose.is_empty() && self.builds.is_empty() && self.sets.is_empty()
    }
}

/// How a build move changes the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildKind {
    /// Create a new single-layer build.
    Make,
    /// Append a new layer to an existing build of the same sum.
    Add,
    /// Raise a single-layer build with the played card alone.
    Increase,
}

/// A proposed build and its heuristic score.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildChoice {
    /// Hand index of the card to play.
    pub card: usize,

    /// Heuristic score, played card included.
    pub score: u32,

    /// The move's shape.
    pub kind: BuildKind,

    /// Target build position for `Add` and `Increase`.
    pub build: Option<usize>,

    /// Loose cards consumed into the new layer (`Make`/`Add`; always
    /// empty for `Increase`).
    pub loose: SmallVec<[usize; 4]>,
}

/// One player's move for a turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnMove {
    /// Play a card face-up to the table.
    Trail(usize),
    /// Execute a capture plan.
    Capture(CaptureChoice),
    /// Execute a build plan.
    Build(BuildChoice),
}
