//! Piece encoding
//!
//! A square holds a single small integer: the piece kind in the low three bits
//! and the color in bit 3. `0` is the empty square and carries no color.
//!
//! ```text
//! bit:   3     2..0
//!      color   kind     kind: 0 empty, 1 pawn, 2 knight, 3 bishop, 4 rook, 5 queen, 6 king
//!                       color: 0 white, 1 black
//! ```
//!
//! The same integer is what clients receive in serialized boards.

use std::fmt;

const KIND_MASK: u8 = 0b0111;
const COLOR_BIT: u8 = 0b1000;

/// Side to move / owner of a piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    /// The other side
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Wire value: 0 for white, 1 for black
    pub fn as_bit(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// Row delta of a forward pawn step. White starts on the high rows.
    pub fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Row the pawns of this color start on
    pub fn pawn_rank(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// Kind of a non-empty piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    fn code(self) -> u8 {
        match self {
            PieceKind::Pawn => 1,
            PieceKind::Knight => 2,
            PieceKind::Bishop => 3,
            PieceKind::Rook => 4,
            PieceKind::Queen => 5,
            PieceKind::King => 6,
        }
    }

    fn from_code(code: u8) -> Option<PieceKind> {
        match code {
            1 => Some(PieceKind::Pawn),
            2 => Some(PieceKind::Knight),
            3 => Some(PieceKind::Bishop),
            4 => Some(PieceKind::Rook),
            5 => Some(PieceKind::Queen),
            6 => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// Encoded content of one board square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Piece(u8);

impl Piece {
    pub const EMPTY: Piece = Piece(0);

    /// Pack a kind and a color into one square value
    pub fn encode(kind: PieceKind, color: Color) -> Piece {
        let color_bits = match color {
            Color::White => 0,
            Color::Black => COLOR_BIT,
        };
        Piece(kind.code() | color_bits)
    }

    /// Kind of the piece, `None` on an empty square
    pub fn kind(self) -> Option<PieceKind> {
        PieceKind::from_code(self.0 & KIND_MASK)
    }

    /// Color of the piece, `None` on an empty square
    pub fn color(self) -> Option<Color> {
        self.kind()?;
        if self.0 & COLOR_BIT == 0 {
            Some(Color::White)
        } else {
            Some(Color::Black)
        }
    }

    pub fn is_empty(self) -> bool {
        self.kind().is_none()
    }

    /// True when the square holds a piece of `color`
    pub fn is_color(self, color: Color) -> bool {
        self.color() == Some(color)
    }

    /// Raw encoded value, as sent to clients
    pub fn bits(self) -> u8 {
        self.0
    }
}
