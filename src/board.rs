use serde::{Deserialize, Serialize};

use crate::piece::{Color, Piece, PieceId, PieceKind};

/// A rectangular grid of cells plus the table of every piece ever created on
/// it. Cells record occupancy by id; the table is the single owner of piece
/// state, so a `PieceId` stays usable after its piece is captured.
///
/// Coordinate system: x is the rank/row axis (`0..width`), y the file axis
/// (`0..height`). White pawns advance toward row 0, Black toward the far edge.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Option<PieceId>>,
    pieces: Vec<Piece>,
}

impl Board {
    /// Create an empty board.
    ///
    /// Panics if either dimension is zero.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "board dimensions must be positive");
        Board {
            width,
            height,
            cells: vec![None; width * height],
            pieces: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: usize, y: usize) -> usize {
        x * self.height + y
    }

    pub fn is_in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height
    }

    /// True iff `(x, y)` is in bounds and unoccupied. An off-board coordinate
    /// is never a usable empty cell, so it reports `false`.
    pub fn is_empty_position(&self, x: i32, y: i32) -> bool {
        self.is_in_bounds(x, y) && self.cells[self.index(x as usize, y as usize)].is_none()
    }

    pub fn occupant_at(&self, x: i32, y: i32) -> Option<PieceId> {
        if !self.is_in_bounds(x, y) {
            return None;
        }
        self.cells[self.index(x as usize, y as usize)]
    }

    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.0]
    }

    /// Every piece ever created on this board, on-board or not.
    pub fn pieces(&self) -> impl Iterator<Item = (PieceId, &Piece)> {
        self.pieces
            .iter()
            .enumerate()
            .map(|(i, p)| (PieceId(i), p))
    }

    /// Create a piece and place it. Panics if `(x, y)` is out of bounds;
    /// placing onto an occupied cell evicts the previous occupant.
    pub fn add_piece(&mut self, kind: PieceKind, color: Color, x: usize, y: usize) -> PieceId {
        let id = self.add_detached(kind, color);
        self.place(id, x, y);
        id
    }

    /// Create a piece with no board position yet. It joins the board on its
    /// first `move_to`.
    pub fn add_detached(&mut self, kind: PieceKind, color: Color) -> PieceId {
        let id = PieceId(self.pieces.len());
        self.pieces.push(Piece::new(kind, color));
        id
    }

    /// Put `id` on `(x, y)`, detaching whatever occupied the cell before.
    fn place(&mut self, id: PieceId, x: usize, y: usize) {
        assert!(
            x < self.width && y < self.height,
            "placement off the board: ({x}, {y})"
        );
        if let Some((px, py)) = self.pieces[id.0].square {
            let from = self.index(px, py);
            self.cells[from] = None;
        }
        let to = self.index(x, y);
        if let Some(evicted) = self.cells[to] {
            self.pieces[evicted.0].square = None;
        }
        self.cells[to] = Some(id);
        self.pieces[id.0].square = Some((x, y));
    }

    /// Relocate `id` to `(x, y)` without any legality check; callers wanting
    /// rule enforcement ask `can_move_to` first. Marks the piece as having
    /// moved. Panics if `(x, y)` is out of bounds.
    pub fn move_to(&mut self, id: PieceId, x: usize, y: usize) {
        self.place(id, x, y);
        self.pieces[id.0].has_moved = true;
    }

    /// Capture `victim` with `attacker`: the victim is detached and the
    /// attacker relocated onto its former cell. Panics if the victim is not
    /// on the board.
    pub fn capture(&mut self, attacker: PieceId, victim: PieceId) {
        let (x, y) = self.pieces[victim.0]
            .square
            .expect("capture target is not on the board");
        self.remove(victim);
        self.move_to(attacker, x, y);
    }

    /// Detach `id` from the board; its cell reports empty afterwards.
    pub fn remove(&mut self, id: PieceId) {
        if let Some((x, y)) = self.pieces[id.0].square.take() {
            let i = self.index(x, y);
            self.cells[i] = None;
        }
    }

    /// Reinstate `id` at `square` with the given moved flag. Rollback path
    /// for trial moves; bypasses the has-moved bookkeeping of `move_to`.
    pub(crate) fn restore(&mut self, id: PieceId, square: (usize, usize), has_moved: bool) {
        self.place(id, square.0, square.1);
        self.pieces[id.0].has_moved = has_moved;
    }

    /// Pure legality predicate for relocating `id` to `(x, y)`.
    ///
    /// Shared pipeline for every variant: an off-board piece, an
    /// out-of-bounds target, a null move, and an ally-occupied target are
    /// rejected in that order before the variant geometry runs (plus the
    /// first-blocker path rule for sliders).
    pub fn can_move_to(&self, id: PieceId, x: i32, y: i32) -> bool {
        let piece = &self.pieces[id.0];
        let Some((px, py)) = piece.square else {
            return false;
        };
        if !self.is_in_bounds(x, y) {
            return false;
        }
        let from = (px as i32, py as i32);
        if (x, y) == from {
            return false;
        }
        if let Some(occupant) = self.occupant_at(x, y) {
            if self.pieces[occupant.0].color == piece.color {
                return false;
            }
        }
        let (dx, dy) = (x - from.0, y - from.1);
        match piece.kind {
            PieceKind::Pawn => self.pawn_move_ok(piece, from, dx, dy),
            PieceKind::Knight => is_knight_jump(dx, dy),
            PieceKind::Rook => is_straight(dx, dy) && self.path_is_clear(from, (x, y)),
            PieceKind::Bishop => is_diagonal(dx, dy) && self.path_is_clear(from, (x, y)),
            PieceKind::Queen => {
                (is_straight(dx, dy) || is_diagonal(dx, dy)) && self.path_is_clear(from, (x, y))
            }
            PieceKind::King => dx.abs().max(dy.abs()) == 1,
        }
    }

    fn pawn_move_ok(&self, piece: &Piece, from: (i32, i32), dx: i32, dy: i32) -> bool {
        let dir = piece.color.pawn_direction();
        if dy == 0 {
            // Straight moves never capture, so the destination must be empty.
            if dx == dir {
                return self.is_empty_position(from.0 + dx, from.1);
            }
            if dx == 2 * dir {
                return !piece.has_moved
                    && self.is_empty_position(from.0 + dir, from.1)
                    && self.is_empty_position(from.0 + dx, from.1);
            }
            false
        } else if dy.abs() == 1 && dx == dir {
            // Capture-only diagonal; the ally case was already rejected.
            self.occupant_at(from.0 + dx, from.1 + dy).is_some()
        } else {
            false
        }
    }

    /// True iff every cell strictly between `from` and `to` along a straight
    /// or diagonal line is empty. The destination itself is not inspected;
    /// capturing the first blocker is the caller's business.
    fn path_is_clear(&self, from: (i32, i32), to: (i32, i32)) -> bool {
        let step = ((to.0 - from.0).signum(), (to.1 - from.1).signum());
        let (mut x, mut y) = (from.0 + step.0, from.1 + step.1);
        while (x, y) != to {
            if !self.is_empty_position(x, y) {
                return false;
            }
            x += step.0;
            y += step.1;
        }
        true
    }

    /// True iff some on-board piece of `attacker` could legally move to
    /// `(x, y)` right now.
    pub fn is_square_attacked_by(&self, x: i32, y: i32, attacker: Color) -> bool {
        self.pieces()
            .any(|(id, p)| p.on_board() && p.color == attacker && self.can_move_to(id, x, y))
    }
}

fn is_straight(dx: i32, dy: i32) -> bool {
    (dx == 0) != (dy == 0)
}

fn is_diagonal(dx: i32, dy: i32) -> bool {
    dx != 0 && dx.abs() == dy.abs()
}

fn is_knight_jump(dx: i32, dy: i32) -> bool {
    (dx.abs() == 1 && dy.abs() == 2) || (dx.abs() == 2 && dy.abs() == 1)
}
