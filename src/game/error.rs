//! Error types for game module
//!
//! Every variant is an expected, per-request outcome: a client asked for a
//! game that does not exist, joined a full one, or the registry ran out of
//! room. None of them is fatal to the process or to other games.
//!
//! Wrong-turn and illegal moves are not errors; they come back as
//! [`MoveOutcome::Rejected`](super::session::MoveOutcome::Rejected) with the
//! unchanged state.

/// Errors that can occur in game logic
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Identifier empty, too long, or not printable ASCII
    #[error("Invalid {kind}: {value:?}")]
    InvalidIdentifier { kind: &'static str, value: String },

    /// Both player slots of the game are taken
    #[error("Game {game_id} is full")]
    GameFull { game_id: String },

    /// No game with this identifier
    #[error("Game {game_id} not found")]
    GameNotFound { game_id: String },

    /// The game has no player with this identifier
    #[error("Player {player_id} not found in game {game_id}")]
    PlayerNotFound { game_id: String, player_id: String },

    /// Every registry slot is in use
    #[error("No free game slots (capacity {capacity})")]
    RegistryFull { capacity: usize },
}

/// Result type alias for game operations
pub type GameResult<T> = Result<T, GameError>;
