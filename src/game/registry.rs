//! Game registry - owner of every in-progress game
//!
//! The registry is a fixed-capacity table of game slots plus an index from
//! [`GameId`] to slot. It exclusively owns each [`Game`] and, through it, both
//! [`Player`] records. Callers reach games only through borrows of the
//! registry, so no reference outlives the critical section that produced it.
//!
//! # Concurrency
//!
//! The whole registry sits behind one [`parking_lot::Mutex`] ([`SharedRegistry`]).
//! Every request handler and the liveness sweeper lock it for the full
//! read-modify-write sequence. The guard is released on every exit path,
//! including early `?` returns.
//!
//! # Slot allocation
//!
//! A new game probes slots starting at a random index and wraps around. If the
//! probe comes back to its start without finding a free slot, creation fails
//! with [`GameError::RegistryFull`] and the rest of the registry is untouched.

use super::error::{GameError, GameResult};
use super::pieces::Color;
use super::rules::Board;
use super::types::{GameId, PlayerId};
use parking_lot::Mutex;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Registry guarded by the single global lock
pub type SharedRegistry = Arc<Mutex<Registry>>;

/// One side of a game
#[derive(Debug, Clone)]
pub struct Player {
    pub(crate) id: PlayerId,
    pub(crate) color: Color,
    pub(crate) disconnected: bool,
    pub(crate) last_heartbeat: Instant,
}

impl Player {
    fn new(id: PlayerId, color: Color, now: Instant) -> Self {
        Self {
            id,
            color,
            disconnected: false,
            last_heartbeat: now,
        }
    }

    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    pub fn last_heartbeat(&self) -> Instant {
        self.last_heartbeat
    }
}

/// Lifecycle stage of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Only white has joined
    Waiting,
    /// Both players present, no winner yet
    Active,
    /// A king was captured
    Finished,
}

/// One match between two players
#[derive(Debug, Clone)]
pub struct Game {
    pub(crate) id: GameId,
    pub(crate) white: Player,
    pub(crate) black: Option<Player>,
    pub(crate) current_turn: Color,
    pub(crate) board: Board,
    pub(crate) winner: Option<Color>,
}

impl Game {
    fn new(id: GameId, white: Player) -> Self {
        Self {
            id,
            white,
            black: None,
            current_turn: Color::White,
            board: Board::initial(),
            winner: None,
        }
    }

    pub fn id(&self) -> &GameId {
        &self.id
    }

    pub fn current_turn(&self) -> Color {
        self.current_turn
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn phase(&self) -> GamePhase {
        if self.winner.is_some() {
            GamePhase::Finished
        } else if self.black.is_none() {
            GamePhase::Waiting
        } else {
            GamePhase::Active
        }
    }

    /// Player holding `color`, `None` for an empty black slot
    pub fn player(&self, color: Color) -> Option<&Player> {
        match color {
            Color::White => Some(&self.white),
            Color::Black => self.black.as_ref(),
        }
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        std::iter::once(&self.white).chain(self.black.as_ref())
    }

    pub fn find_player(&self, player_id: &PlayerId) -> GameResult<&Player> {
        self.players()
            .find(|p| &p.id == player_id)
            .ok_or_else(|| self.player_not_found(player_id))
    }

    pub fn find_player_mut(&mut self, player_id: &PlayerId) -> GameResult<&mut Player> {
        if self.white.id == *player_id {
            return Ok(&mut self.white);
        }
        match self.black.as_mut() {
            Some(black) if black.id == *player_id => Ok(black),
            _ => Err(GameError::PlayerNotFound {
                game_id: self.id.to_string(),
                player_id: player_id.to_string(),
            }),
        }
    }

    /// The opponent of `player`, `None` while the black slot is empty
    pub fn other_player(&self, player: &Player) -> Option<&Player> {
        self.player(player.color.opponent())
    }

    fn player_not_found(&self, player_id: &PlayerId) -> GameError {
        GameError::PlayerNotFound {
            game_id: self.id.to_string(),
            player_id: player_id.to_string(),
        }
    }
}

/// What a join request produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedGame {
    pub player_id: PlayerId,
    pub color: Color,
    pub phase: GamePhase,
}

/// Fixed-capacity table of games keyed by identifier
#[derive(Debug)]
pub struct Registry {
    slots: Vec<Option<Game>>,
    index: HashMap<GameId, usize>,
}

impl Registry {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            index: HashMap::new(),
        }
    }

    /// Registry wrapped in the global lock, ready to hand to handlers
    pub fn shared(capacity: usize) -> SharedRegistry {
        Arc::new(Mutex::new(Self::new(capacity)))
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Join `game_id`, creating the game when it does not exist yet.
    ///
    /// The creator plays white and waits; the second caller plays black and
    /// starts the game. A third caller gets [`GameError::GameFull`] and no
    /// player is created.
    pub fn create_or_join(&mut self, game_id: &GameId, now: Instant) -> GameResult<JoinedGame> {
        if let Ok(game) = self.find_mut(game_id) {
            if game.black.is_some() {
                return Err(GameError::GameFull {
                    game_id: game_id.to_string(),
                });
            }

            let player_id = PlayerId::generate_distinct(&game.white.id);
            game.black = Some(Player::new(player_id.clone(), Color::Black, now));
            info!("[REGISTRY] Player {} joined game {} as black", player_id, game_id);

            return Ok(JoinedGame {
                player_id,
                color: Color::Black,
                phase: game.phase(),
            });
        }

        let slot = self.allocate_slot()?;
        let player_id = PlayerId::generate();
        let game = Game::new(
            game_id.clone(),
            Player::new(player_id.clone(), Color::White, now),
        );
        self.slots[slot] = Some(game);
        self.index.insert(game_id.clone(), slot);
        info!(
            "[REGISTRY] Created game {} in slot {} for white player {}",
            game_id, slot, player_id
        );

        Ok(JoinedGame {
            player_id,
            color: Color::White,
            phase: GamePhase::Waiting,
        })
    }

    /// Random start, linear probe with wraparound
    fn allocate_slot(&self) -> GameResult<usize> {
        let capacity = self.capacity();
        if capacity > 0 {
            let start = rand::rng().random_range(0..capacity);
            let free = (0..capacity)
                .map(|i| (start + i) % capacity)
                .find(|&slot| self.slots[slot].is_none());
            if let Some(slot) = free {
                return Ok(slot);
            }
        }

        warn!("[REGISTRY] No free game slots (capacity {})", capacity);
        Err(GameError::RegistryFull { capacity })
    }

    pub fn find(&self, game_id: &GameId) -> GameResult<&Game> {
        self.index
            .get(game_id)
            .and_then(|&slot| self.slots[slot].as_ref())
            .ok_or_else(|| GameError::GameNotFound {
                game_id: game_id.to_string(),
            })
    }

    pub fn find_mut(&mut self, game_id: &GameId) -> GameResult<&mut Game> {
        let game = match self.index.get(game_id) {
            Some(&slot) => self.slots[slot].as_mut(),
            None => None,
        };
        game.ok_or_else(|| GameError::GameNotFound {
            game_id: game_id.to_string(),
        })
    }

    /// Remove a game and both of its players. Deleting twice is a no-op.
    pub fn delete(&mut self, game_id: &GameId) -> Option<Game> {
        let slot = self.index.remove(game_id)?;
        let game = self.slots[slot].take();
        if game.is_some() {
            info!("[REGISTRY] Deleted game {} from slot {}", game_id, slot);
        }
        game
    }

    pub fn games(&self) -> impl Iterator<Item = &Game> {
        self.slots.iter().flatten()
    }
}
