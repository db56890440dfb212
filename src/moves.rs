use serde::{Deserialize, Serialize};

use crate::piece::PieceId;

/// A resolved move: which piece goes where, and what it captures on arrival.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub piece: PieceId,
    pub from: (usize, usize),
    pub to: (usize, usize),
    pub captures: Option<PieceId>,
}
