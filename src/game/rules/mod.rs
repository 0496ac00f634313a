//! Chess rules module - pure movement logic with no session or turn coupling
//!
//! Decides whether a piece may travel from one square to another under the
//! simplified rule set this server plays: per-piece movement and path
//! blocking only. Check, checkmate, castling, en passant and promotion do not
//! exist here; a game is won by capturing the opposing king.
//!
//! # Module Structure
//!
//! - `piece_moves` - Movement rules for each piece type (pawn, knight, bishop, rook, queen, king)
//! - `board_state` - [`Board`] and [`Square`], plus the starting layout

pub mod board_state;
pub mod piece_moves;


// Re-export commonly used items
pub use board_state::{Board, Square, BOARD_SIZE};
pub use piece_moves::is_legal;
