//! Basic type definitions for the game server
//!
//! Provides newtype wrappers for type safety:
//! - `UserToken`: UUID-based opaque bearer token issued on registration
//! - `MatchId`: monotonically assigned match identifier

use std::str::FromStr;

use uuid::Uuid;

/// Opaque user token (newtype pattern)
///
/// Wraps a UUID v4. Clients only ever see the string form, so parsing is
/// lenient: anything that is not a UUID simply never matches a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserToken(pub Uuid);

impl UserToken {
    /// Create a new random user token
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a token from client input
    ///
    /// Returns None for anything that is not a well-formed UUID.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl Default for UserToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Match identifier
///
/// Assigned from a counter starting at 1 and never reused, even when a
/// pending match is cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchId(pub u64);

impl MatchId {
    /// The id following this one
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl FromStr for MatchId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(Self)
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
