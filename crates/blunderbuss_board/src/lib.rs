//! Board engine for blunderbuss.
//!
//! Pure value types for an 8x8 chess-like board and the single operation the
//! game server needs from them: [`Board::apply_move`], which takes a board by
//! value and returns the board after the move or a [`MoveError`].
//!
//! Movement rules are deliberately thin. Unmoved pawns may not move backward;
//! every other piece may jump to any square on the board. There is no check,
//! capture, castling or turn-order logic.
//!
//! # Example
//!
//! ```
//! use blunderbuss_board::{Board, Coordinate, PieceKind, Team};
//!
//! let board = Board::default_position();
//! let board = board
//!     .apply_move(Coordinate::new(6, 0), Coordinate::new(4, 0))
//!     .unwrap();
//! let pawn = board.piece_at(Coordinate::new(4, 0)).unwrap();
//! assert_eq!((pawn.kind, pawn.team, pawn.move_count), (PieceKind::Pawn, Team::White, 1));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod coordinate;
mod error;
mod piece;

pub use board::Board;
pub use coordinate::{BOARD_SIZE, Coordinate};
pub use error::MoveError;
pub use piece::{Piece, PieceKind, Team};
