//! Piece, piece kind and team types.

use serde::{Deserialize, Serialize};

/// Kind of piece occupying a square.
///
/// `Empty` marks a vacant square so every square holds a [`Piece`] value.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PieceKind {
    /// Pawn.
    Pawn,
    /// Knight.
    Knight,
    /// Bishop.
    Bishop,
    /// Rook.
    Rook,
    /// Queen.
    Queen,
    /// King.
    King,
    /// No piece.
    Empty,
}

impl PieceKind {
    /// Single upper-case letter used in text diagrams (`.` for empty).
    pub fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
            PieceKind::Empty => '.',
        }
    }
}

/// Side a piece belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Team {
    /// White, starts on ranks 6 and 7 and moves toward rank 0.
    White,
    /// Black, starts on ranks 0 and 1 and moves toward rank 7.
    Black,
    /// Owner of empty squares.
    Neutral,
}

/// A piece on the board.
///
/// Pieces are plain values. A move replaces the destination square with a
/// copy of the moving piece and the origin with [`Piece::EMPTY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Piece {
    /// What kind of piece this is.
    #[serde(rename = "type")]
    pub kind: PieceKind,
    /// Which side owns it.
    pub team: Team,
    /// How many times the piece has moved. Only tracked for pawns.
    pub move_count: u32,
}

impl Piece {
    /// The vacant square.
    pub const EMPTY: Piece = Piece {
        kind: PieceKind::Empty,
        team: Team::Neutral,
        move_count: 0,
    };

    /// Creates an unmoved piece.
    pub const fn new(kind: PieceKind, team: Team) -> Self {
        Self {
            kind,
            team,
            move_count: 0,
        }
    }

    /// Returns true for the vacant square.
    pub fn is_empty(&self) -> bool {
        self.kind == PieceKind::Empty
    }

    /// Letter for text diagrams: upper case for White, lower case for Black.
    pub fn letter(&self) -> char {
        let letter = self.kind.letter();
        match self.team {
            Team::Black => letter.to_ascii_lowercase(),
            _ => letter,
        }
    }

    /// Unicode chess glyph, or a blank for an empty square.
    pub fn glyph(&self) -> char {
        match (self.team, self.kind) {
            (_, PieceKind::Empty) => ' ',
            (Team::White, PieceKind::Pawn) => '♙',
            (Team::White, PieceKind::Knight) => '♘',
            (Team::White, PieceKind::Bishop) => '♗',
            (Team::White, PieceKind::Rook) => '♖',
            (Team::White, PieceKind::Queen) => '♕',
            (Team::White, PieceKind::King) => '♔',
            (Team::Black, PieceKind::Pawn) => '♟',
            (Team::Black, PieceKind::Knight) => '♞',
            (Team::Black, PieceKind::Bishop) => '♝',
            (Team::Black, PieceKind::Rook) => '♜',
            (Team::Black, PieceKind::Queen) => '♛',
            (Team::Black, PieceKind::King) => '♚',
            (Team::Neutral, _) => '?',
        }
    }
}

impl Default for Piece {
    fn default() -> Self {
        Self::EMPTY
    }
}
