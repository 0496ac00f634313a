//! Chess session logic - registry, turn controller and move legality
//!
//! Everything here is synchronous and transport-agnostic. The backend decodes
//! a request, locks the [`SharedRegistry`], calls into this module and encodes
//! whatever comes back.
//!
//! # Module Organization
//!
//! - `pieces` - Piece encoding (kind + color bit in one byte)
//! - `rules` - Pure chess logic (board layout, per-piece move legality)
//! - `types` - Validated game and player identifiers
//! - `registry` - Fixed-capacity table of games, joins and teardown
//! - `session` - Move application, state sync, heartbeats, disconnects
//! - `liveness` - Background sweeper for silent players
//! - `error` - [`GameError`] taxonomy
//!
//! # Rules Scope
//!
//! Pieces move by their basic patterns only. There is no check, castling,
//! en passant or promotion; a game is won by capturing the opposing king.

pub mod error;
pub mod liveness;
pub mod pieces;
pub mod registry;
pub mod rules;
pub mod session;
pub mod types;

pub use error::{GameError, GameResult};
pub use liveness::{sweep, LivenessSweeper, SweepReport};
pub use pieces::{Color, Piece, PieceKind};
pub use registry::{Game, GamePhase, JoinedGame, Player, Registry, SharedRegistry};
pub use rules::{is_legal, Board, Square, BOARD_SIZE};
pub use session::{MoveOutcome, RejectReason, StateSnapshot, SyncOutcome};
pub use types::{GameId, PlayerId, MAX_ID_LEN};
