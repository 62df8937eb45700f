//! Error types for the game server
//!
//! Defines connection-level errors, framing errors and the business
//! rejections returned by the match registry.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Connection-level errors
///
/// Any of these ends the connection it occurred on. They never touch the
/// registry or other connections.
#[derive(Debug, Error)]
pub enum AppError {
    /// IO error (fatal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The byte stream can no longer be framed
    #[error("Framing error: {0}")]
    Frame(#[from] FrameError),

    /// Channel send error (fatal - internal channel broken)
    #[error("Channel send error")]
    ChannelSend,

    /// Dictionary could not be loaded at startup
    #[error("Failed to load dictionary '{path}': {source}")]
    Dictionary {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the request framer
///
/// Each one leaves the inbound byte stream in a state where message
/// boundaries are unknown, so the connection is closed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    /// Content-Length header value is not a non-negative integer
    #[error("Invalid Content-Length: {0}")]
    InvalidContentLength(String),

    /// Declared body exceeds the configured limit
    #[error("Body of {length} bytes exceeds limit of {limit}")]
    BodyTooLarge { length: usize, limit: usize },

    /// A header line grew past the configured limit without terminating
    #[error("Header section exceeds limit of {0} bytes")]
    HeaderTooLarge(usize),

    /// Request line or header is not valid UTF-8
    #[error("Request head is not valid UTF-8")]
    InvalidUtf8,
}

/// Business rejections from registry operations
///
/// These are ordinary results, not faults. Each variant belongs to one
/// status class: input/authorization failures (403) or state conflicts (409).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    /// Nickname missing or blank
    #[error("Nickname is required")]
    InvalidNickname,

    /// Token missing, malformed or not registered
    #[error("Unknown user token")]
    UnknownUser,

    /// Requested time limit outside the accepted range
    #[error("Time limit {0} is out of range")]
    InvalidTimeLimit(i64),

    /// Word missing or blank
    #[error("Word is required")]
    InvalidWord,

    /// Caller has no pending match to cancel
    #[error("No pending match to cancel")]
    NotWaiting,

    /// Registered user who is not one of the match's players
    #[error("Not a player in this match")]
    NotAPlayer,

    /// Status requested for an id that was never issued or was cancelled
    #[error("Match not found")]
    MatchNotFound,

    /// Caller already waits in a pending match
    #[error("Already waiting for an opponent")]
    AlreadyWaiting,

    /// Match is pending, completed or unknown when a word is played
    #[error("Match is not active")]
    MatchNotActive,
}

impl GameError {
    /// Whether this rejection is a state conflict (409) rather than
    /// malformed or unauthorized input (403)
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            GameError::AlreadyWaiting | GameError::MatchNotActive | GameError::NotAPlayer
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_classification() {
        assert!(GameError::AlreadyWaiting.is_conflict());
        assert!(GameError::MatchNotActive.is_conflict());
        assert!(GameError::NotAPlayer.is_conflict());
        assert!(!GameError::InvalidNickname.is_conflict());
        assert!(!GameError::InvalidTimeLimit(4).is_conflict());
        assert!(!GameError::UnknownUser.is_conflict());
        assert!(!GameError::MatchNotFound.is_conflict());
    }

    #[test]
    fn test_frame_error_display() {
        let err = FrameError::BodyTooLarge { length: 10, limit: 5 };
        assert_eq!(err.to_string(), "Body of 10 bytes exceeds limit of 5");
    }
}
