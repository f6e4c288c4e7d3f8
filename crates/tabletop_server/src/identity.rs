//! Per-board player identity.
//!
//! A player is known by an opaque token sent in the `X-Player-Token` header.
//! The server hands out a token the first time a client picks a color or
//! joins a room; the token is then bound to that seat on that board.

use crate::error::GameError;
use axum::http::HeaderMap;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Request header carrying the player token.
pub const PLAYER_TOKEN_HEADER: &str = "x-player-token";

const MAX_TOKEN_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PlayerToken(String);

impl PlayerToken {
    /// Creates a new random token.
    pub fn issue() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn parse(raw: &str) -> Result<Self, GameError> {
        let raw = raw.trim();
        if raw.is_empty() || raw.len() > MAX_TOKEN_LEN || !raw.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(GameError::InvalidRequest("malformed player token".to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// Reads the token from request headers, if one was sent.
    pub fn from_headers(headers: &HeaderMap) -> Result<Option<Self>, GameError> {
        match headers.get(PLAYER_TOKEN_HEADER) {
            None => Ok(None),
            Some(value) => {
                let raw = value
                    .to_str()
                    .map_err(|_| GameError::InvalidRequest("malformed player token".to_string()))?;
                Self::parse(raw).map(Some)
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_issued_tokens_are_unique_and_valid() {
        let a = PlayerToken::issue();
        let b = PlayerToken::issue();
        assert_ne!(a, b);
        assert_eq!(PlayerToken::parse(a.as_str()), Ok(a));
    }

    #[test]
    fn test_reads_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(PlayerToken::from_headers(&headers), Ok(None));

        headers.insert(PLAYER_TOKEN_HEADER, HeaderValue::from_static("alice-1"));
        assert_eq!(
            PlayerToken::from_headers(&headers).unwrap().map(|t| t.to_string()),
            Some("alice-1".to_string())
        );
    }

    #[test]
    fn test_rejects_blank_or_oversized_tokens() {
        assert!(PlayerToken::parse("   ").is_err());
        assert!(PlayerToken::parse(&"x".repeat(65)).is_err());
        assert!(PlayerToken::parse("two words").is_err());
    }
}
