//! Session and turn controller
//!
//! Applies client intents to a [`Game`] while the registry lock is held:
//! moves, state syncs, heartbeats and disconnects.
//!
//! # State machine
//!
//! ```text
//! Waiting (white only) ──black joins──> Active (turn = white)
//! Active ──accepted move──> Active (turn flipped)
//! Active ──king captured──> Finished (winner set)
//! any ──every occupied slot disconnected──> Deleted
//! ```
//!
//! A rejected move never touches the board or the turn; the caller receives a
//! [`StateSnapshot`] to re-render from.

use super::error::GameResult;
use super::pieces::{Color, PieceKind};
use super::registry::{Game, Player, Registry};
use super::rules::{is_legal, Board, Square};
use super::types::{GameId, PlayerId};
use std::fmt;
use std::time::Instant;
use tracing::{debug, info};

/// Why a move was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    WaitingForOpponent,
    NotYourTurn,
    OffBoard,
    NotYourPiece,
    FriendlyDestination,
    IllegalMove,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RejectReason::WaitingForOpponent => "opponent has not joined yet",
            RejectReason::NotYourTurn => "not this player's turn",
            RejectReason::OffBoard => "square outside the board",
            RejectReason::NotYourPiece => "no own piece on the source square",
            RejectReason::FriendlyDestination => "destination holds an own piece",
            RejectReason::IllegalMove => "piece cannot move that way",
        };
        f.write_str(text)
    }
}

/// What a player needs to redraw the game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    /// Color of the requesting player
    pub color: Color,
    pub current_turn: Color,
    pub board: Board,
}

/// Result of [`Game::apply_move`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Piece moved, turn passed to the opponent
    Accepted,
    /// Nothing changed
    Rejected {
        reason: RejectReason,
        snapshot: StateSnapshot,
    },
    /// The game is over, either by this move or earlier
    GameEnded { winner: Color, board: Board },
}

impl MoveOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, MoveOutcome::Accepted)
    }
}

/// Result of [`Game::sync_state`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    GameEnded { winner: Color, board: Board },
    OpponentDisconnected,
    WaitingForOpponent,
    State(StateSnapshot),
}

impl Player {
    /// Stamp the player as alive at `now`
    pub fn record_heartbeat(&mut self, now: Instant) {
        self.last_heartbeat = now;
    }

    /// Returns `true` when the player was connected until now
    pub(crate) fn mark_disconnected(&mut self) -> bool {
        !std::mem::replace(&mut self.disconnected, true)
    }
}

impl Game {
    fn snapshot(&self, color: Color) -> StateSnapshot {
        StateSnapshot {
            color,
            current_turn: self.current_turn,
            board: self.board.clone(),
        }
    }

    fn reject(&self, color: Color, reason: RejectReason) -> MoveOutcome {
        debug!("[SESSION] Rejected {} move in game {}: {}", color, self.id, reason);
        MoveOutcome::Rejected {
            reason,
            snapshot: self.snapshot(color),
        }
    }

    /// Every occupied slot is disconnected; an empty black slot counts as gone
    pub fn all_disconnected(&self) -> bool {
        self.players().all(Player::is_disconnected)
    }

    /// Validate and apply one move for `player_id`.
    ///
    /// Coordinates are `(x, y)` as sent by the client and may be off the board.
    pub fn apply_move(
        &mut self,
        player_id: &PlayerId,
        from: (i32, i32),
        to: (i32, i32),
        now: Instant,
    ) -> GameResult<MoveOutcome> {
        let player = self.find_player_mut(player_id)?;
        player.record_heartbeat(now);
        let color = player.color;

        if let Some(winner) = self.winner {
            return Ok(MoveOutcome::GameEnded {
                winner,
                board: self.board.clone(),
            });
        }
        if self.black.is_none() {
            return Ok(self.reject(color, RejectReason::WaitingForOpponent));
        }
        if color != self.current_turn {
            return Ok(self.reject(color, RejectReason::NotYourTurn));
        }

        let (Some(from), Some(to)) = (
            Square::from_coords(from.0, from.1),
            Square::from_coords(to.0, to.1),
        ) else {
            return Ok(self.reject(color, RejectReason::OffBoard));
        };

        if !self.board.get(from).is_color(color) {
            return Ok(self.reject(color, RejectReason::NotYourPiece));
        }
        if self.board.get(to).is_color(color) {
            return Ok(self.reject(color, RejectReason::FriendlyDestination));
        }
        if !is_legal(&self.board, from, to) {
            return Ok(self.reject(color, RejectReason::IllegalMove));
        }

        let captured = self.board.move_piece(from, to);
        self.current_turn = color.opponent();
        debug!(
            "[SESSION] {} moved ({}, {}) -> ({}, {}) in game {}",
            color, from.x, from.y, to.x, to.y, self.id
        );

        if captured.kind() == Some(PieceKind::King) {
            self.winner = Some(color);
            info!("[SESSION] {} captured the king in game {}", color, self.id);
            return Ok(MoveOutcome::GameEnded {
                winner: color,
                board: self.board.clone(),
            });
        }

        Ok(MoveOutcome::Accepted)
    }

    /// Report the game as `player_id` should see it, refreshing their heartbeat
    pub fn sync_state(&mut self, player_id: &PlayerId, now: Instant) -> GameResult<SyncOutcome> {
        let player = self.find_player_mut(player_id)?;
        player.record_heartbeat(now);
        let color = player.color;

        if let Some(winner) = self.winner {
            return Ok(SyncOutcome::GameEnded {
                winner,
                board: self.board.clone(),
            });
        }

        match self.player(color.opponent()) {
            None => Ok(SyncOutcome::WaitingForOpponent),
            Some(other) if other.is_disconnected() => {
                debug!(
                    "[SESSION] Opponent of {} in game {} is disconnected",
                    player_id, self.id
                );
                Ok(SyncOutcome::OpponentDisconnected)
            }
            Some(_) => Ok(SyncOutcome::State(self.snapshot(color))),
        }
    }
}

impl Registry {
    /// Mark a player disconnected and tear the game down once nobody is left.
    ///
    /// Idempotent. Returns `true` when the game was deleted.
    pub fn mark_disconnected(&mut self, game_id: &GameId, player_id: &PlayerId) -> GameResult<bool> {
        let game = self.find_mut(game_id)?;
        if game.find_player_mut(player_id)?.mark_disconnected() {
            info!("[SESSION] Player {} of game {} disconnected", player_id, game_id);
        }

        if game.all_disconnected() {
            info!("[SESSION] Every player of game {} is gone, deleting it", game_id);
            self.delete(game_id);
            return Ok(true);
        }
        Ok(false)
    }

    /// Handle an explicit disconnect request from `player_id`
    pub fn disconnect(
        &mut self,
        game_id: &GameId,
        player_id: &PlayerId,
        now: Instant,
    ) -> GameResult<bool> {
        self.find_mut(game_id)?
            .find_player_mut(player_id)?
            .record_heartbeat(now);
        self.mark_disconnected(game_id, player_id)
    }
}
