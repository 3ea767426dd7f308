//! Move rejection errors.

use crate::Coordinate;
use derive_more::{Display, Error};

/// Reason the board engine refused a move.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum MoveError {
    /// One of the coordinates is off the board.
    #[display("coordinate {_0} must be within bounds of the board")]
    OutOfBounds(#[error(not(source))] Coordinate),
    /// The origin square is empty or the piece cannot move that way.
    #[display("{_0}")]
    NoPieceOrInvalidDirection(#[error(not(source))] String),
}
