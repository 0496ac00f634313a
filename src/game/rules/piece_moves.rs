//! Chess piece movement rules
//!
//! Contains the rules for how each chess piece can move.
//! Pure functions with no side effects - easy to test.
//!
//! The caller has already checked that the source square holds a piece of the
//! side to move, that the destination is not occupied by a friendly piece, and
//! that it is that side's turn. There is no check awareness, no castling, no
//! en passant and no promotion.

use super::board_state::{Board, Square};
use crate::game::pieces::{Color, PieceKind};

/// Check if moving the piece on `from` to `to` follows its movement rule
pub fn is_legal(board: &Board, from: Square, to: Square) -> bool {
    // A move to the same square is not a move
    if from == to {
        return false;
    }

    let piece = board.get(from);
    let (Some(kind), Some(color)) = (piece.kind(), piece.color()) else {
        return false;
    };

    match kind {
        PieceKind::Pawn => is_valid_pawn_move(from, to, color, board),
        PieceKind::Knight => is_valid_knight_move(from, to),
        PieceKind::Bishop => is_valid_bishop_move(from, to, board),
        PieceKind::Rook => is_valid_rook_move(from, to, board),
        PieceKind::Queen => is_valid_queen_move(from, to, board),
        PieceKind::King => is_valid_king_move(from, to),
    }
}

fn is_valid_pawn_move(from: Square, to: Square, color: Color, board: &Board) -> bool {
    let direction = color.forward();
    let (dx, dy) = from.delta(to);

    // Forward move
    if dx == 0 && dy == direction {
        return board.is_empty(to);
    }

    // Double move from starting rank
    if dx == 0 && dy == 2 * direction && from.y == color.pawn_rank() {
        return match from.offset(0, direction) {
            Some(intermediate) => board.is_empty(intermediate) && board.is_empty(to),
            None => false,
        };
    }

    // Capture diagonally
    if dx.abs() == 1 && dy == direction {
        return board.get_piece_color(to) == Some(color.opponent());
    }

    false
}

fn is_valid_knight_move(from: Square, to: Square) -> bool {
    let (dx, dy) = from.delta(to);
    matches!((dx.abs(), dy.abs()), (1, 2) | (2, 1))
}

fn is_valid_bishop_move(from: Square, to: Square, board: &Board) -> bool {
    let (dx, dy) = from.delta(to);

    // Must move diagonally
    if dx == 0 || dx.abs() != dy.abs() {
        return false;
    }

    is_path_clear(from, to, board)
}

fn is_valid_rook_move(from: Square, to: Square, board: &Board) -> bool {
    let (dx, dy) = from.delta(to);

    // Exactly one axis changes
    if (dx == 0) == (dy == 0) {
        return false;
    }

    is_path_clear(from, to, board)
}

fn is_valid_queen_move(from: Square, to: Square, board: &Board) -> bool {
    is_valid_rook_move(from, to, board) || is_valid_bishop_move(from, to, board)
}

fn is_valid_king_move(from: Square, to: Square) -> bool {
    let (dx, dy) = from.delta(to);
    dx.abs().max(dy.abs()) == 1
}

/// Every square strictly between `from` and `to` is empty.
///
/// Only called for straight or diagonal lines, so the number of intermediate
/// squares is the longer axis distance minus one.
fn is_path_clear(from: Square, to: Square, board: &Board) -> bool {
    let (dx, dy) = from.delta(to);
    let (step_x, step_y) = (dx.signum(), dy.signum());
    let steps = dx.abs().max(dy.abs());

    (1..steps).all(|i| match from.offset(step_x * i, step_y * i) {
        Some(square) => board.is_empty(square),
        None => false,
    })
}
