//! Game store error types.

use crate::GameId;
use blunderbuss_board::MoveError;
use derive_more::{Display, Error, From};
use tracing::instrument;

/// What went wrong in a store operation.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum StoreErrorKind {
    /// No game is stored under the id.
    #[display("game not found: {_0}")]
    #[from(ignore)]
    GameNotFound(#[error(not(source))] GameId),
    /// The board engine rejected the move.
    #[display("invalid move: {_0}")]
    InvalidMove(MoveError),
    /// The entropy source failed while generating a game id.
    #[display("randomness unavailable: {_0}")]
    #[from(ignore)]
    RandomnessUnavailable(#[error(not(source))] String),
    /// The store already holds its configured maximum number of games.
    #[display("game store is full ({_0} games)")]
    #[from(ignore)]
    CapacityExceeded(#[error(not(source))] usize),
}

/// Store error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Store error: {} at {}:{}", kind, file, line)]
pub struct StoreError {
    /// Error category.
    pub kind: StoreErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    #[instrument(skip(kind))]
    pub fn new(kind: StoreErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// True when the id was unknown. This is an expected outcome, not a fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, StoreErrorKind::GameNotFound(_))
    }

    /// True when the board engine rejected the move.
    pub fn is_invalid_move(&self) -> bool {
        matches!(self.kind, StoreErrorKind::InvalidMove(_))
    }
}

impl From<MoveError> for StoreError {
    #[track_caller]
    fn from(err: MoveError) -> Self {
        Self::new(err.into())
    }
}
