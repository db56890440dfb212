use serde::{Deserialize, Serialize};

/// The two sides of a game.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Pawn forward direction along the rank axis: White advances toward
    /// row 0, Black toward the far edge.
    pub(crate) fn pawn_direction(self) -> i32 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }
}

/// The six piece variants.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

/// Stable handle to a piece in a board's piece table. Ids stay valid for the
/// lifetime of the board, including after the piece leaves it.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PieceId(pub(crate) usize);

/// A piece's recorded state. `square` is `None` while the piece is off the
/// board.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub square: Option<(usize, usize)>,
    pub has_moved: bool,
}

impl Piece {
    pub(crate) fn new(kind: PieceKind, color: Color) -> Piece {
        Piece {
            kind,
            color,
            square: None,
            has_moved: false,
        }
    }

    pub fn on_board(&self) -> bool {
        self.square.is_some()
    }
}
