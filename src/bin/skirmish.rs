use chess_rules::game::Game;
use chess_rules::piece::{Color, PieceKind};
use rand::seq::SliceRandom;

const MAX_PLIES: u32 = 200;

const BACK_RANK: [(usize, PieceKind); 7] = [
    (0, PieceKind::Rook),
    (1, PieceKind::Knight),
    (2, PieceKind::Bishop),
    (3, PieceKind::Queen),
    (5, PieceKind::Bishop),
    (6, PieceKind::Knight),
    (7, PieceKind::Rook),
];

/// Fill in the standard army around the king a new game already has.
fn deploy(game: &mut Game, color: Color) {
    let (home, pawn_rank) = match color {
        Color::White => (7, 6),
        Color::Black => (0, 1),
    };
    for (file, kind) in BACK_RANK {
        game.add_piece(kind, color, home, file);
    }
    for file in 0..8 {
        game.add_piece(PieceKind::Pawn, color, pawn_rank, file);
    }
}

fn main() {
    let mut game = Game::new();
    deploy(&mut game, Color::White);
    deploy(&mut game, Color::Black);

    let mut rng = rand::thread_rng();
    let mut turn = Color::White;
    let mut plies = 0u32;

    let outcome = loop {
        if plies >= MAX_PLIES {
            break "move cap reached";
        }
        if game.is_checkmate(turn) {
            break match turn {
                Color::White => "Black wins",
                Color::Black => "White wins",
            };
        }
        let moves = game.legal_moves(turn);
        let Some(mv) = moves.choose(&mut rng) else {
            break "no legal moves";
        };
        match mv.captures {
            Some(victim) => game.board.capture(mv.piece, victim),
            None => game.board.move_to(mv.piece, mv.to.0, mv.to.1),
        }
        plies += 1;
        turn = turn.opposite();
    };

    eprintln!("Game over after {plies} plies: {outcome}");
    println!(
        "{}",
        serde_json::to_string_pretty(&game).expect("game state serializes")
    );
}
