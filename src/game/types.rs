//! Game and player identifiers
//!
//! Both are short opaque strings chosen by clients (game ids) or by the
//! registry (player ids). They are validated once at the boundary so nothing
//! past it has to care about length or content.

use super::error::{GameError, GameResult};
use rand::Rng;
use std::fmt;

/// Longest accepted identifier, in bytes
pub const MAX_ID_LEN: usize = 5;

const TOKEN_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

fn validate(kind: &'static str, raw: &str) -> GameResult<()> {
    let valid = !raw.is_empty()
        && raw.len() <= MAX_ID_LEN
        && raw.bytes().all(|b| b.is_ascii_graphic());
    if valid {
        Ok(())
    } else {
        Err(GameError::InvalidIdentifier {
            kind,
            value: raw.chars().take(16).collect(),
        })
    }
}

/// Identifier of a game, unique among the games in a registry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameId(String);

impl GameId {
    pub fn parse(raw: &str) -> GameResult<GameId> {
        validate("game id", raw)?;
        Ok(GameId(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a player, unique within its game
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn parse(raw: &str) -> GameResult<PlayerId> {
        validate("player id", raw)?;
        Ok(PlayerId(raw.to_string()))
    }

    /// Random token of [`MAX_ID_LEN`] uppercase letters and digits
    pub fn generate() -> PlayerId {
        let mut rng = rand::rng();
        let token = (0..MAX_ID_LEN)
            .map(|_| TOKEN_CHARSET[rng.random_range(0..TOKEN_CHARSET.len())] as char)
            .collect();
        PlayerId(token)
    }

    /// Random token guaranteed to differ from `taken`
    pub fn generate_distinct(taken: &PlayerId) -> PlayerId {
        loop {
            let candidate = PlayerId::generate();
            if &candidate != taken {
                return candidate;
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_short_ids() {
        assert_eq!(GameId::parse("abc12").unwrap().as_str(), "abc12");
        assert_eq!(GameId::parse("x").unwrap().to_string(), "x");
        assert!(PlayerId::parse("P-1").is_ok());
    }

    #[test]
    fn test_parse_rejects_bad_ids() {
        assert!(GameId::parse("").is_err());
        assert!(GameId::parse("abcdef").is_err(), "Six bytes is too long");
        assert!(GameId::parse("a b").is_err(), "Whitespace is rejected");
        assert!(PlayerId::parse("é").is_err(), "Non-ASCII is rejected");

        match GameId::parse("toolongvalue") {
            Err(GameError::InvalidIdentifier { kind, .. }) => assert_eq!(kind, "game id"),
            other => panic!("Expected InvalidIdentifier, got {:?}", other),
        }
    }

    #[test]
    fn test_generated_token_shape() {
        let id = PlayerId::generate();
        assert_eq!(id.as_str().len(), MAX_ID_LEN);
        assert!(id
            .as_str()
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        assert!(PlayerId::parse(id.as_str()).is_ok());
    }

    #[test]
    fn test_generate_distinct_never_collides() {
        let taken = PlayerId::generate();
        for _ in 0..100 {
            assert_ne!(PlayerId::generate_distinct(&taken), taken);
        }
    }
}
