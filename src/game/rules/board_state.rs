//! Board state representation for move validation

use crate::game::pieces::{Color, Piece, PieceKind};

/// Side length of the board
pub const BOARD_SIZE: u8 = 8;

/// Back rank layout, file 0 to file 7
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

/// A square on the board. `x` is the file (column), `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    pub x: u8,
    pub y: u8,
}

impl Square {
    /// Build a square, `None` when off the board
    pub fn new(x: u8, y: u8) -> Option<Square> {
        (x < BOARD_SIZE && y < BOARD_SIZE).then_some(Square { x, y })
    }

    /// Build a square from untrusted client coordinates
    pub fn from_coords(x: i32, y: i32) -> Option<Square> {
        let x = u8::try_from(x).ok()?;
        let y = u8::try_from(y).ok()?;
        Square::new(x, y)
    }

    /// Signed offset from `self` to `to`
    pub fn delta(self, to: Square) -> (i8, i8) {
        (to.x as i8 - self.x as i8, to.y as i8 - self.y as i8)
    }

    /// Square reached by stepping `(dx, dy)`, `None` when off the board
    pub fn offset(self, dx: i8, dy: i8) -> Option<Square> {
        let x = self.x as i8 + dx;
        let y = self.y as i8 + dy;
        if x < 0 || y < 0 {
            return None;
        }
        Square::new(x as u8, y as u8)
    }
}

/// 8×8 grid of encoded pieces, row-major.
///
/// Row 0 is black's back rank and row 7 white's in the initial layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [[Piece; 8]; 8],
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl Board {
    /// Board with no pieces
    pub fn empty() -> Board {
        Board {
            squares: [[Piece::EMPTY; 8]; 8],
        }
    }

    /// Standard starting position
    pub fn initial() -> Board {
        let mut board = Board::empty();
        for (x, kind) in BACK_RANK.iter().enumerate() {
            board.squares[0][x] = Piece::encode(*kind, Color::Black);
            board.squares[1][x] = Piece::encode(PieceKind::Pawn, Color::Black);
            board.squares[6][x] = Piece::encode(PieceKind::Pawn, Color::White);
            board.squares[7][x] = Piece::encode(*kind, Color::White);
        }
        board
    }

    pub fn get(&self, square: Square) -> Piece {
        self.squares[square.y as usize][square.x as usize]
    }

    pub fn set(&mut self, square: Square, piece: Piece) {
        self.squares[square.y as usize][square.x as usize] = piece;
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.get(square).is_empty()
    }

    pub fn get_piece_color(&self, square: Square) -> Option<Color> {
        self.get(square).color()
    }

    /// Move whatever stands on `from` to `to`, returning the previous content of `to`
    pub fn move_piece(&mut self, from: Square, to: Square) -> Piece {
        let moving = self.get(from);
        let captured = self.get(to);
        self.set(from, Piece::EMPTY);
        self.set(to, moving);
        captured
    }

    /// Encoded rows, as serialized for clients
    pub fn to_rows(&self) -> [[u8; 8]; 8] {
        self.squares.map(|row| row.map(Piece::bits))
    }
}
