//! The 8x8 board and move application.

use crate::{Coordinate, MoveError, Piece, PieceKind, Team};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Fixed 8x8 grid of pieces indexed `[rank][file]`.
///
/// `Board` is a `Copy` value. [`Board::apply_move`] consumes a board and
/// returns a new one, so a caller's board is never modified behind its back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    squares: [[Piece; 8]; 8],
}

impl Board {
    /// Creates a board with every square empty.
    pub fn empty() -> Self {
        Self {
            squares: [[Piece::EMPTY; 8]; 8],
        }
    }

    /// Creates the standard starting position.
    ///
    /// Black occupies ranks 0 and 1, White ranks 6 and 7.
    pub fn default_position() -> Self {
        let mut board = Self::empty();
        for (file, kind) in BACK_RANK.into_iter().enumerate() {
            board.squares[0][file] = Piece::new(kind, Team::Black);
            board.squares[1][file] = Piece::new(PieceKind::Pawn, Team::Black);
            board.squares[6][file] = Piece::new(PieceKind::Pawn, Team::White);
            board.squares[7][file] = Piece::new(kind, Team::White);
        }
        board
    }

    /// Returns all squares, rank-major.
    pub fn squares(&self) -> &[[Piece; 8]; 8] {
        &self.squares
    }

    /// Returns the piece at `coord`.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::OutOfBounds`] if `coord` is off the board.
    pub fn piece_at(&self, coord: Coordinate) -> Result<Piece, MoveError> {
        let (rank, file) = coord.indices().ok_or(MoveError::OutOfBounds(coord))?;
        Ok(self.squares[rank][file])
    }

    /// Places `piece` at `coord`, replacing whatever was there.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::OutOfBounds`] if `coord` is off the board.
    pub fn set(&mut self, coord: Coordinate, piece: Piece) -> Result<(), MoveError> {
        let (rank, file) = coord.indices().ok_or(MoveError::OutOfBounds(coord))?;
        self.squares[rank][file] = piece;
        Ok(())
    }

    /// Moves the piece on `from` to `to`, returning the resulting board.
    ///
    /// Pawns that have not moved yet must head toward the opponent: White may
    /// not increase its rank and Black may not decrease it. Every other piece
    /// is relocated to any on-board square without further checks. A pawn's
    /// move count is incremented; other pieces keep theirs.
    ///
    /// # Errors
    ///
    /// - [`MoveError::OutOfBounds`] if either coordinate is off the board.
    /// - [`MoveError::NoPieceOrInvalidDirection`] if `from` is empty or an
    ///   unmoved pawn would move backward.
    #[instrument(skip(self))]
    pub fn apply_move(mut self, from: Coordinate, to: Coordinate) -> Result<Board, MoveError> {
        let mut piece = self.piece_at(from)?;
        if !to.is_on_board() {
            return Err(MoveError::OutOfBounds(to));
        }

        match piece.kind {
            PieceKind::Empty => {
                return Err(MoveError::NoPieceOrInvalidDirection(format!(
                    "no piece at {from}"
                )));
            }
            PieceKind::Pawn => {
                check_pawn_direction(&piece, from, to)?;
                piece.move_count += 1;
                debug!(move_count = piece.move_count, "Pawn moved");
            }
            PieceKind::Knight
            | PieceKind::Bishop
            | PieceKind::Rook
            | PieceKind::Queen
            | PieceKind::King => {}
        }

        self.set(from, Piece::EMPTY)?;
        self.set(to, piece)?;
        Ok(self)
    }
}

fn check_pawn_direction(pawn: &Piece, from: Coordinate, to: Coordinate) -> Result<(), MoveError> {
    if pawn.move_count > 0 {
        return Ok(());
    }
    let backward = match pawn.team {
        Team::White => to.x > from.x,
        Team::Black => to.x < from.x,
        Team::Neutral => false,
    };
    if backward {
        return Err(MoveError::NoPieceOrInvalidDirection(format!(
            "{} pawn must move forward",
            pawn.team
        )));
    }
    Ok(())
}

impl Default for Board {
    fn default() -> Self {
        Self::default_position()
    }
}

/// Text diagram with rank 7 on top, one letter per square.
///
/// Upper case is White, lower case Black and `.` an empty square.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rank) in self.squares.iter().rev().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let line: Vec<String> = rank.iter().map(|p| p.letter().to_string()).collect();
            write!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
