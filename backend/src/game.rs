//! Request dispatch - turns decoded wire requests into registry calls
//!
//! Each handler locks the shared registry once, runs the whole
//! read-modify-write under that guard and converts the domain outcome into a
//! wire [`Response`]. The guard is dropped before anything is serialized.

use crate::api::ApiError;
use chess_session::game::{
    Color, GameId, GamePhase, MoveOutcome, PlayerId, SharedRegistry, SyncOutcome,
};
use shared::protocol::{Request, Response, BLACK, WHITE};
use std::time::Instant;
use tracing::debug;

/// What the transport should do with a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Reply(Response),
    Shutdown,
}

pub fn color_code(color: Color) -> u8 {
    match color {
        Color::White => WHITE,
        Color::Black => BLACK,
    }
}

pub fn dispatch(
    registry: &SharedRegistry,
    request: Request,
    now: Instant,
) -> Result<Dispatch, ApiError> {
    let response = match request {
        Request::JoinGame { game_id } => join_game(registry, &GameId::parse(&game_id)?, now)?,
        Request::SyncState { game_id, player_id } => sync_state(
            registry,
            &GameId::parse(&game_id)?,
            &PlayerId::parse(&player_id)?,
            now,
        )?,
        Request::MovePiece {
            game_id,
            player_id,
            from,
            to,
        } => move_piece(
            registry,
            &GameId::parse(&game_id)?,
            &PlayerId::parse(&player_id)?,
            from,
            to,
            now,
        )?,
        Request::Disconnect { game_id, player_id } => disconnect(
            registry,
            &GameId::parse(&game_id)?,
            &PlayerId::parse(&player_id)?,
            now,
        )?,
        Request::Shutdown => return Ok(Dispatch::Shutdown),
    };
    Ok(Dispatch::Reply(response))
}

fn join_game(
    registry: &SharedRegistry,
    game_id: &GameId,
    now: Instant,
) -> Result<Response, ApiError> {
    let joined = registry.lock().create_or_join(game_id, now)?;

    let game_id = game_id.to_string();
    let player_id = joined.player_id.to_string();
    let color = color_code(joined.color);
    Ok(match joined.phase {
        GamePhase::Waiting => Response::WaitingForOpponent {
            game_id,
            player_id,
            color,
        },
        GamePhase::Active | GamePhase::Finished => Response::GameStarted {
            game_id,
            player_id,
            color,
        },
    })
}

fn sync_state(
    registry: &SharedRegistry,
    game_id: &GameId,
    player_id: &PlayerId,
    now: Instant,
) -> Result<Response, ApiError> {
    let outcome = registry
        .lock()
        .find_mut(game_id)?
        .sync_state(player_id, now)?;

    let game_id = game_id.to_string();
    let player_id = player_id.to_string();
    Ok(match outcome {
        SyncOutcome::GameEnded { winner, board } => Response::GameEnded {
            game_id,
            player_id,
            winner: color_code(winner),
            board: board.to_rows(),
        },
        SyncOutcome::OpponentDisconnected => Response::OpponentDisconnected { game_id, player_id },
        SyncOutcome::WaitingForOpponent => Response::WaitingForOpponent {
            game_id,
            player_id,
            color: WHITE,
        },
        SyncOutcome::State(snapshot) => Response::GameState {
            game_id,
            player_id,
            color: color_code(snapshot.color),
            current_turn: color_code(snapshot.current_turn),
            board: snapshot.board.to_rows(),
        },
    })
}

fn move_piece(
    registry: &SharedRegistry,
    game_id: &GameId,
    player_id: &PlayerId,
    from: (i32, i32),
    to: (i32, i32),
    now: Instant,
) -> Result<Response, ApiError> {
    let outcome = registry
        .lock()
        .find_mut(game_id)?
        .apply_move(player_id, from, to, now)?;

    let game_id = game_id.to_string();
    let player_id = player_id.to_string();
    Ok(match outcome {
        MoveOutcome::Accepted => Response::MoveAccepted { game_id, player_id },
        MoveOutcome::Rejected { reason, snapshot } => {
            debug!("[BACKEND] Move by {} rejected: {}", player_id, reason);
            Response::MoveRejected {
                game_id,
                player_id,
                color: color_code(snapshot.color),
                current_turn: color_code(snapshot.current_turn),
                board: snapshot.board.to_rows(),
            }
        }
        MoveOutcome::GameEnded { winner, board } => Response::GameEnded {
            game_id,
            player_id,
            winner: color_code(winner),
            board: board.to_rows(),
        },
    })
}

fn disconnect(
    registry: &SharedRegistry,
    game_id: &GameId,
    player_id: &PlayerId,
    now: Instant,
) -> Result<Response, ApiError> {
    registry.lock().disconnect(game_id, player_id, now)?;
    Ok(Response::PlayerDisconnected {
        game_id: game_id.to_string(),
        player_id: player_id.to_string(),
    })
}
