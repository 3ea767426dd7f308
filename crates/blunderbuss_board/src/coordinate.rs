//! Board coordinates.

use serde::{Deserialize, Serialize};

/// Number of ranks and files on the board.
pub const BOARD_SIZE: i32 = 8;

/// A zero-based (rank, file) pair addressing one of the 64 squares.
///
/// `x` is the rank and `y` the file. The fields are signed so that off-board
/// input from the wire can be represented and rejected instead of wrapping.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[display("({x}, {y})")]
pub struct Coordinate {
    /// Rank, 0 (Black's back rank) to 7 (White's back rank).
    pub x: i32,
    /// File, 0 to 7.
    pub y: i32,
}

impl Coordinate {
    /// Creates a coordinate without checking bounds.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns true if both axes are within `[0, 7]`.
    pub fn is_on_board(&self) -> bool {
        (0..BOARD_SIZE).contains(&self.x) && (0..BOARD_SIZE).contains(&self.y)
    }

    /// Returns `(rank, file)` array indices, or `None` when off the board.
    pub fn indices(&self) -> Option<(usize, usize)> {
        if self.is_on_board() {
            Some((self.x as usize, self.y as usize))
        } else {
            None
        }
    }
}
