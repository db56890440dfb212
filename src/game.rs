// =============================================================================
// Game orchestration
//
// A Game owns the board and tracks one king per side. Check asks whether any
// enemy piece could move onto that king's square. Checkmate is brute force:
// every own piece is tried against every cell it can legally reach; each
// candidate is applied to a scratch board, the check retested, and the trial
// rolled back exactly before the next one.
//
// Coordinate system: x is the rank axis. White's home rank is row 7 and its
// pawns advance toward row 0; Black mirrors that.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::moves::Move;
use crate::piece::{Color, PieceId, PieceKind};

/// One game session: a board plus the two tracked kings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Game {
    pub board: Board,
    white_king: PieceId,
    black_king: PieceId,
}

/// Snapshot of everything a trial move touches, so the trial can be rolled
/// back exactly.
struct TrialMove {
    mover: PieceId,
    from: (usize, usize),
    had_moved: bool,
    captured: Option<(PieceId, (usize, usize), bool)>,
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

impl Game {
    /// Fresh 8×8 game holding just the two kings, each on its home rank.
    /// Callers build positions from here with `add_piece` and `move_to`.
    pub fn new() -> Game {
        let mut board = Board::new(8, 8);
        let white_king = board.add_piece(PieceKind::King, Color::White, 7, 4);
        let black_king = board.add_piece(PieceKind::King, Color::Black, 0, 4);
        Game {
            board,
            white_king,
            black_king,
        }
    }

    pub fn white_king(&self) -> PieceId {
        self.white_king
    }

    pub fn black_king(&self) -> PieceId {
        self.black_king
    }

    pub fn king(&self, color: Color) -> PieceId {
        match color {
            Color::White => self.white_king,
            Color::Black => self.black_king,
        }
    }

    /// Construct and place a queen, returning its id for later reference or
    /// removal.
    pub fn add_queen(&mut self, color: Color, x: usize, y: usize) -> PieceId {
        self.add_piece(PieceKind::Queen, color, x, y)
    }

    /// Construct and place a piece of any non-king variant. Panics on
    /// `PieceKind::King`: a game owns exactly one king per color and both
    /// already exist.
    pub fn add_piece(&mut self, kind: PieceKind, color: Color, x: usize, y: usize) -> PieceId {
        assert!(
            kind != PieceKind::King,
            "a game tracks exactly one king per color"
        );
        self.board.add_piece(kind, color, x, y)
    }

    /// Detach `id` from the board.
    pub fn remove_piece(&mut self, id: PieceId) {
        self.board.remove(id);
    }

    /// True iff some enemy piece could move onto `color`'s king right now.
    /// A king that is off the board is not in check.
    pub fn is_king_in_check(&self, color: Color) -> bool {
        king_in_check(&self.board, self.king(color), color)
    }

    /// True iff `color` is in check and no move by any of its pieces ends
    /// with its king out of check.
    ///
    /// Runs on a scratch clone of the board, so repeated calls see identical
    /// state; within the search each trial is still undone exactly so later
    /// candidates start from the real position.
    pub fn is_checkmate(&self, color: Color) -> bool {
        if !self.is_king_in_check(color) {
            return false;
        }
        let king = self.king(color);
        let mut scratch = self.board.clone();
        for id in own_piece_ids(&scratch, color) {
            let Some(from) = scratch.piece(id).square else {
                continue;
            };
            for x in 0..scratch.width() as i32 {
                for y in 0..scratch.height() as i32 {
                    if !scratch.can_move_to(id, x, y) {
                        continue;
                    }
                    let trial = apply_trial(&mut scratch, id, from, (x as usize, y as usize));
                    let escaped = !king_in_check(&scratch, king, color);
                    undo_trial(&mut scratch, trial);
                    if escaped {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Every move `color` could make right now without leaving its own king
    /// in check.
    pub fn legal_moves(&self, color: Color) -> Vec<Move> {
        let king = self.king(color);
        let mut scratch = self.board.clone();
        let mut moves = Vec::new();
        for id in own_piece_ids(&scratch, color) {
            let Some(from) = scratch.piece(id).square else {
                continue;
            };
            for x in 0..scratch.width() as i32 {
                for y in 0..scratch.height() as i32 {
                    if !scratch.can_move_to(id, x, y) {
                        continue;
                    }
                    let to = (x as usize, y as usize);
                    let captures = scratch.occupant_at(x, y);
                    let trial = apply_trial(&mut scratch, id, from, to);
                    let safe = !king_in_check(&scratch, king, color);
                    undo_trial(&mut scratch, trial);
                    if safe {
                        moves.push(Move {
                            piece: id,
                            from,
                            to,
                            captures,
                        });
                    }
                }
            }
        }
        moves
    }
}

fn own_piece_ids(board: &Board, color: Color) -> Vec<PieceId> {
    board
        .pieces()
        .filter(|(_, p)| p.on_board() && p.color == color)
        .map(|(id, _)| id)
        .collect()
}

fn king_in_check(board: &Board, king: PieceId, color: Color) -> bool {
    match board.piece(king).square {
        Some((x, y)) => board.is_square_attacked_by(x as i32, y as i32, color.opposite()),
        None => false,
    }
}

fn apply_trial(board: &mut Board, mover: PieceId, from: (usize, usize), to: (usize, usize)) -> TrialMove {
    let had_moved = board.piece(mover).has_moved;
    let captured = board
        .occupant_at(to.0 as i32, to.1 as i32)
        .map(|victim| (victim, to, board.piece(victim).has_moved));
    if let Some((victim, _, _)) = captured {
        board.remove(victim);
    }
    board.move_to(mover, to.0, to.1);
    TrialMove {
        mover,
        from,
        had_moved,
        captured,
    }
}

fn undo_trial(board: &mut Board, trial: TrialMove) {
    board.restore(trial.mover, trial.from, trial.had_moved);
    if let Some((victim, square, had_moved)) = trial.captured {
        board.restore(victim, square, had_moved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_tracks_both_kings() {
        let game = Game::new();
        assert_eq!(game.board.piece(game.white_king()).square, Some((7, 4)));
        assert_eq!(game.board.piece(game.black_king()).square, Some((0, 4)));
        assert_eq!(game.king(Color::White), game.white_king());
        assert_eq!(game.king(Color::Black), game.black_king());
    }

    #[test]
    fn king_checked() {
        let mut game = Game::new();
        let black_king = game.black_king();
        game.board.move_to(black_king, 0, 0);

        let queen = game.add_queen(Color::White, 3, 0);
        assert!(game.is_king_in_check(Color::Black));

        game.remove_piece(queen);
        assert!(!game.is_king_in_check(Color::Black));
    }

    #[test]
    fn checkmate_found() {
        let mut game = Game::new();
        let black_king = game.black_king();
        game.board.move_to(black_king, 4, 4);

        let queen1 = game.add_queen(Color::White, 3, 3);
        let _queen2 = game.add_queen(Color::White, 5, 5);
        assert!(game.is_checkmate(Color::Black));

        game.remove_piece(queen1);
        assert!(!game.is_checkmate(Color::Black));
    }

    #[test]
    fn interposing_piece_averts_checkmate() {
        let mut game = Game::new();
        let black_king = game.black_king();
        game.board.move_to(black_king, 0, 0);

        // Two-rook ladder against the edge.
        game.add_piece(PieceKind::Rook, Color::White, 0, 7);
        game.add_piece(PieceKind::Rook, Color::White, 1, 7);
        assert!(game.is_checkmate(Color::Black));

        // A rook that can interpose on the checking line saves the game.
        game.add_piece(PieceKind::Rook, Color::Black, 5, 3);
        assert!(!game.is_checkmate(Color::Black));
    }

    #[test]
    fn stalemate_is_not_checkmate() {
        // Black king cornered but not attacked: no legal moves, no mate.
        let mut game = Game::new();
        let black_king = game.black_king();
        game.board.move_to(black_king, 0, 0);
        game.add_queen(Color::White, 2, 1);

        assert!(!game.is_king_in_check(Color::Black));
        assert!(game.legal_moves(Color::Black).is_empty());
        assert!(!game.is_checkmate(Color::Black));
    }

    #[test]
    fn removed_king_is_never_in_check() {
        let mut game = Game::new();
        game.add_queen(Color::White, 0, 0);
        assert!(game.is_king_in_check(Color::Black));

        let black_king = game.black_king();
        game.board.remove(black_king);
        assert!(!game.is_king_in_check(Color::Black));
        assert!(!game.is_checkmate(Color::Black));
    }

    #[test]
    fn legal_moves_exclude_self_check() {
        let mut game = Game::new();
        let black_king = game.black_king();
        game.board.move_to(black_king, 0, 0);

        // The rook is pinned: leaving the king's file exposes it.
        let rook = game.add_piece(PieceKind::Rook, Color::Black, 1, 0);
        game.add_queen(Color::White, 5, 0);

        let moves = game.legal_moves(Color::Black);
        for mv in &moves {
            if mv.piece == rook {
                assert_eq!(mv.to.1, 0, "pinned rook left the king's file: {mv:?}");
            }
        }
        assert!(
            moves.iter().any(|m| m.piece == rook && m.to == (5, 0)),
            "capturing the pinning queen is legal"
        );
    }

    #[test]
    fn check_queries_do_not_disturb_state() {
        let mut game = Game::new();
        let black_king = game.black_king();
        game.board.move_to(black_king, 4, 4);
        game.add_queen(Color::White, 3, 3);
        game.add_queen(Color::White, 5, 5);

        let before = serde_json::to_string(&game).expect("game serializes");
        let first = game.is_checkmate(Color::Black);
        let second = game.is_checkmate(Color::Black);
        let check_first = game.is_king_in_check(Color::Black);
        let check_second = game.is_king_in_check(Color::Black);
        let after = serde_json::to_string(&game).expect("game serializes");

        assert_eq!(first, second);
        assert_eq!(check_first, check_second);
        assert_eq!(before, after, "check queries must not mutate the game");
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn kind_strategy() -> impl Strategy<Value = PieceKind> {
            prop_oneof![
                Just(PieceKind::Pawn),
                Just(PieceKind::Knight),
                Just(PieceKind::Bishop),
                Just(PieceKind::Rook),
                Just(PieceKind::Queen),
            ]
        }

        fn random_game(placements: Vec<(PieceKind, bool, usize, usize)>) -> Game {
            let mut game = Game::new();
            for (kind, white, x, y) in placements {
                let color = if white { Color::White } else { Color::Black };
                // Skip occupied cells so the kings are never evicted.
                if game.board.is_empty_position(x as i32, y as i32) {
                    game.add_piece(kind, color, x, y);
                }
            }
            game
        }

        proptest! {
            /// Check and checkmate queries leave any position untouched.
            #[test]
            fn queries_never_mutate(
                placements in prop::collection::vec(
                    (kind_strategy(), any::<bool>(), 0usize..8, 0usize..8), 0..10),
            ) {
                let game = random_game(placements);
                let before = serde_json::to_string(&game).unwrap();
                for color in [Color::White, Color::Black] {
                    game.is_king_in_check(color);
                    game.is_checkmate(color);
                    game.legal_moves(color);
                }
                prop_assert_eq!(serde_json::to_string(&game).unwrap(), before);
            }

            /// Applying any reported legal move never leaves the mover's own
            /// king in check.
            #[test]
            fn legal_moves_never_leave_check(
                placements in prop::collection::vec(
                    (kind_strategy(), any::<bool>(), 0usize..8, 0usize..8), 0..10),
            ) {
                let game = random_game(placements);
                for color in [Color::White, Color::Black] {
                    for mv in game.legal_moves(color) {
                        let mut trial = game.clone();
                        match mv.captures {
                            Some(victim) => trial.board.capture(mv.piece, victim),
                            None => trial.board.move_to(mv.piece, mv.to.0, mv.to.1),
                        }
                        prop_assert!(
                            !trial.is_king_in_check(color),
                            "legal move left the king in check: {:?}", mv
                        );
                    }
                }
            }
        }
    }
}
