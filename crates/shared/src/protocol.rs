//! JSON messages exchanged with chess clients
//!
//! Every request and response is a flat JSON object tagged by an integer
//! `messageType`. Requests are decoded into [`Request`]; responses are built as
//! [`Response`] and serialized through [`WireResponse`].
//!
//! Colors travel as `0` (white) and `1` (black). Boards are eight rows of
//! eight piece codes, row 0 being black's back rank.

use serde::{Deserialize, Serialize, Serializer};

/// Board as sent on the wire, indexed `[y][x]`
pub type BoardRows = [[u8; 8]; 8];

pub const WHITE: u8 = 0;
pub const BLACK: u8 = 1;

/// Inbound message type codes
pub mod request_code {
    pub const JOIN_GAME: i64 = 128;
    pub const SYNC_STATE: i64 = 129;
    pub const MOVE_PIECE: i64 = 130;
    pub const DISCONNECT: i64 = 131;
    pub const SHUTDOWN: i64 = 42069;
}

/// Outbound message type codes
pub mod response_code {
    pub const WAITING_FOR_OPPONENT: u8 = 0;
    pub const GAME_STARTED: u8 = 1;
    pub const GAME_STATE: u8 = 2;
    pub const MOVE_ACCEPTED: u8 = 3;
    pub const GAME_ENDED: u8 = 4;
    pub const PLAYER_DISCONNECTED: u8 = 5;
    pub const OPPONENT_DISCONNECTED: u8 = 6;
    pub const ERROR: u8 = 7;
}

/// Why a request could not be decoded
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("Malformed request: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unknown message type {0}")]
    UnknownMessageType(i64),

    #[error("Missing field `{0}`")]
    MissingField(&'static str),

    #[error("Coordinates must be [x, y] integer pairs")]
    InvalidCoordinate,
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// A decoded client request. Identifiers are still unvalidated strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    JoinGame {
        game_id: String,
    },
    SyncState {
        game_id: String,
        player_id: String,
    },
    MovePiece {
        game_id: String,
        player_id: String,
        from: (i32, i32),
        to: (i32, i32),
    },
    Disconnect {
        game_id: String,
        player_id: String,
    },
    Shutdown,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRequest {
    message_type: Option<i64>,
    #[serde(alias = "game_id")]
    game_id: Option<String>,
    #[serde(alias = "player_id")]
    player_id: Option<String>,
    #[serde(rename = "move")]
    mv: Option<RawMove>,
}

#[derive(Debug, Deserialize)]
struct RawMove {
    from: Option<Vec<i64>>,
    to: Option<Vec<i64>>,
}

fn required<T>(value: Option<T>, field: &'static str) -> ProtocolResult<T> {
    value.ok_or(ProtocolError::MissingField(field))
}

fn coordinate(raw: Option<Vec<i64>>, field: &'static str) -> ProtocolResult<(i32, i32)> {
    match required(raw, field)?.as_slice() {
        &[x, y] => Ok((
            i32::try_from(x).map_err(|_| ProtocolError::InvalidCoordinate)?,
            i32::try_from(y).map_err(|_| ProtocolError::InvalidCoordinate)?,
        )),
        _ => Err(ProtocolError::InvalidCoordinate),
    }
}

impl Request {
    /// Decode one JSON request body. `null` fields count as missing.
    pub fn decode(body: &[u8]) -> ProtocolResult<Request> {
        let raw: RawRequest = serde_json::from_slice(body)?;
        let message_type = required(raw.message_type, "messageType")?;

        let request = match message_type {
            request_code::JOIN_GAME => Request::JoinGame {
                game_id: required(raw.game_id, "gameId")?,
            },
            request_code::SYNC_STATE => Request::SyncState {
                game_id: required(raw.game_id, "gameId")?,
                player_id: required(raw.player_id, "playerId")?,
            },
            request_code::MOVE_PIECE => {
                let mv = required(raw.mv, "move")?;
                Request::MovePiece {
                    game_id: required(raw.game_id, "gameId")?,
                    player_id: required(raw.player_id, "playerId")?,
                    from: coordinate(mv.from, "move.from")?,
                    to: coordinate(mv.to, "move.to")?,
                }
            }
            request_code::DISCONNECT => Request::Disconnect {
                game_id: required(raw.game_id, "gameId")?,
                player_id: required(raw.player_id, "playerId")?,
            },
            request_code::SHUTDOWN => Request::Shutdown,
            other => return Err(ProtocolError::UnknownMessageType(other)),
        };
        Ok(request)
    }

    pub fn message_type(&self) -> i64 {
        match self {
            Request::JoinGame { .. } => request_code::JOIN_GAME,
            Request::SyncState { .. } => request_code::SYNC_STATE,
            Request::MovePiece { .. } => request_code::MOVE_PIECE,
            Request::Disconnect { .. } => request_code::DISCONNECT,
            Request::Shutdown => request_code::SHUTDOWN,
        }
    }
}

/// A reply to one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    WaitingForOpponent {
        game_id: String,
        player_id: String,
        color: u8,
    },
    GameStarted {
        game_id: String,
        player_id: String,
        color: u8,
    },
    GameState {
        game_id: String,
        player_id: String,
        color: u8,
        current_turn: u8,
        board: BoardRows,
    },
    MoveAccepted {
        game_id: String,
        player_id: String,
    },
    /// Sent as a [`response_code::GAME_STATE`] so clients just redraw
    MoveRejected {
        game_id: String,
        player_id: String,
        color: u8,
        current_turn: u8,
        board: BoardRows,
    },
    GameEnded {
        game_id: String,
        player_id: String,
        winner: u8,
        board: BoardRows,
    },
    PlayerDisconnected {
        game_id: String,
        player_id: String,
    },
    OpponentDisconnected {
        game_id: String,
        player_id: String,
    },
    Error {
        message: String,
    },
}

impl Response {
    pub fn error(message: impl Into<String>) -> Response {
        Response::Error {
            message: message.into(),
        }
    }

    pub fn message_type(&self) -> u8 {
        match self {
            Response::WaitingForOpponent { .. } => response_code::WAITING_FOR_OPPONENT,
            Response::GameStarted { .. } => response_code::GAME_STARTED,
            Response::GameState { .. } | Response::MoveRejected { .. } => {
                response_code::GAME_STATE
            }
            Response::MoveAccepted { .. } => response_code::MOVE_ACCEPTED,
            Response::GameEnded { .. } => response_code::GAME_ENDED,
            Response::PlayerDisconnected { .. } => response_code::PLAYER_DISCONNECTED,
            Response::OpponentDisconnected { .. } => response_code::OPPONENT_DISCONNECTED,
            Response::Error { .. } => response_code::ERROR,
        }
    }
}

/// Flat JSON shape of every response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireResponse {
    pub message_type: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_color: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_turn: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board: Option<BoardRows>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&Response> for WireResponse {
    fn from(response: &Response) -> Self {
        let base = WireResponse {
            message_type: response.message_type(),
            ..WireResponse::default()
        };

        match response.clone() {
            Response::WaitingForOpponent {
                game_id,
                player_id,
                color,
            }
            | Response::GameStarted {
                game_id,
                player_id,
                color,
            } => WireResponse {
                game_id: Some(game_id),
                player_id: Some(player_id),
                player_color: Some(color),
                ..base
            },
            Response::GameState {
                game_id,
                player_id,
                color,
                current_turn,
                board,
            }
            | Response::MoveRejected {
                game_id,
                player_id,
                color,
                current_turn,
                board,
            } => WireResponse {
                game_id: Some(game_id),
                player_id: Some(player_id),
                player_color: Some(color),
                current_turn: Some(current_turn),
                board: Some(board),
                ..base
            },
            Response::GameEnded {
                game_id,
                player_id,
                winner,
                board,
            } => WireResponse {
                game_id: Some(game_id),
                player_id: Some(player_id),
                winner: Some(winner),
                board: Some(board),
                ..base
            },
            Response::MoveAccepted { game_id, player_id }
            | Response::PlayerDisconnected { game_id, player_id }
            | Response::OpponentDisconnected { game_id, player_id } => WireResponse {
                game_id: Some(game_id),
                player_id: Some(player_id),
                ..base
            },
            Response::Error { message } => WireResponse {
                message: Some(message),
                ..base
            },
        }
    }
}

impl Serialize for Response {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireResponse::from(self).serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> ProtocolResult<Request> {
        Request::decode(value.to_string().as_bytes())
    }

    #[test]
    fn test_decode_join_game() {
        let request = decode(json!({"messageType": 128, "gameId": "abc12"})).expect("Should decode");
        assert_eq!(
            request,
            Request::JoinGame {
                game_id: "abc12".to_string()
            }
        );
        assert_eq!(request.message_type(), request_code::JOIN_GAME);
    }

    #[test]
    fn test_decode_accepts_snake_case_game_id() {
        let request = decode(json!({"messageType": 128, "game_id": "g"})).expect("Should decode");
        assert_eq!(
            request,
            Request::JoinGame {
                game_id: "g".to_string()
            }
        );
    }

    #[test]
    fn test_decode_move_piece() {
        let request = decode(json!({
            "messageType": 130,
            "gameId": "abc12",
            "playerId": "P1ABC",
            "move": {"from": [4, 6], "to": [4, 4]}
        }))
        .expect("Should decode");

        match request {
            Request::MovePiece {
                game_id,
                player_id,
                from,
                to,
            } => {
                assert_eq!(game_id, "abc12");
                assert_eq!(player_id, "P1ABC");
                assert_eq!(from, (4, 6));
                assert_eq!(to, (4, 4));
            }
            other => panic!("Wrong request type: {:?}", other),
        }
    }

    #[test]
    fn test_decode_keeps_off_board_coordinates() {
        let request = decode(json!({
            "messageType": 130,
            "gameId": "g",
            "playerId": "p",
            "move": {"from": [-1, 6], "to": [9, 4]}
        }))
        .expect("Range is checked by the game, not the decoder");
        assert!(matches!(
            request,
            Request::MovePiece {
                from: (-1, 6),
                to: (9, 4),
                ..
            }
        ));
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            Request::decode(b"{not json"),
            Err(ProtocolError::Malformed(_))
        ));
        assert!(matches!(
            decode(json!({"gameId": "g"})),
            Err(ProtocolError::MissingField("messageType"))
        ));
        assert!(matches!(
            decode(json!({"messageType": 7})),
            Err(ProtocolError::UnknownMessageType(7))
        ));
        assert!(matches!(
            decode(json!({"messageType": 129, "gameId": "g", "playerId": null})),
            Err(ProtocolError::MissingField("playerId"))
        ));
        assert!(matches!(
            decode(json!({"messageType": 130, "gameId": "g", "playerId": "p"})),
            Err(ProtocolError::MissingField("move"))
        ));
        assert!(matches!(
            decode(json!({
                "messageType": 130, "gameId": "g", "playerId": "p",
                "move": {"from": [1, 2, 3], "to": [1, 2]}
            })),
            Err(ProtocolError::InvalidCoordinate)
        ));
        assert!(matches!(
            decode(json!({
                "messageType": 130, "gameId": "g", "playerId": "p",
                "move": {"from": [1, 2], "to": [1, 4294967296i64]}
            })),
            Err(ProtocolError::InvalidCoordinate)
        ));
    }

    #[test]
    fn test_decode_shutdown_needs_no_fields() {
        assert_eq!(
            decode(json!({"messageType": 42069})).expect("Should decode"),
            Request::Shutdown
        );
    }

    #[test]
    fn test_encode_waiting_for_opponent() {
        let response = Response::WaitingForOpponent {
            game_id: "abc12".to_string(),
            player_id: "K3J9Q".to_string(),
            color: WHITE,
        };
        let value = serde_json::to_value(&response).expect("Should serialize");
        assert_eq!(
            value,
            json!({
                "messageType": 0,
                "gameId": "abc12",
                "playerId": "K3J9Q",
                "playerColor": 0
            })
        );
    }

    #[test]
    fn test_encode_move_rejected_as_game_state() {
        let mut board = [[0u8; 8]; 8];
        board[7][4] = 6;
        let response = Response::MoveRejected {
            game_id: "g".to_string(),
            player_id: "p".to_string(),
            color: BLACK,
            current_turn: WHITE,
            board,
        };

        let wire: WireResponse =
            serde_json::from_str(&serde_json::to_string(&response).expect("Should serialize"))
                .expect("Should deserialize");
        assert_eq!(wire.message_type, response_code::GAME_STATE);
        assert_eq!(wire.player_color, Some(BLACK));
        assert_eq!(wire.current_turn, Some(WHITE));
        assert_eq!(wire.board, Some(board));
        assert_eq!(wire.winner, None);
    }

    #[test]
    fn test_encode_game_ended_and_error() {
        let ended = serde_json::to_value(Response::GameEnded {
            game_id: "g".to_string(),
            player_id: "p".to_string(),
            winner: BLACK,
            board: [[0; 8]; 8],
        })
        .expect("Should serialize");
        assert_eq!(ended["messageType"], 4);
        assert_eq!(ended["winner"], 1);
        assert!(ended.get("currentTurn").is_none());

        let error = serde_json::to_value(Response::error("game is full")).expect("Should serialize");
        assert_eq!(error, json!({"messageType": 7, "message": "game is full"}));
    }
}
