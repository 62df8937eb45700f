//! Match struct definition
//!
//! Represents one Boggle match between a waiting player and the opponent
//! paired with them.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::board::Board;
use crate::types::{MatchId, UserToken};

/// Lifecycle of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchState {
    /// Waiting for a second player
    Pending,
    /// Two players, a board and a running clock
    Active,
    /// Time limit reached
    Completed,
}

/// A word recorded for a player, with the score it earned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayedWord {
    pub word: String,
    pub score: i32,
}

/// One side of a match
#[derive(Debug, Clone)]
pub struct Player {
    pub token: UserToken,
    /// Time limit this player asked for when joining
    pub requested_limit: u32,
    /// Words in the order they were played; each word appears at most once
    pub words: Vec<PlayedWord>,
}

impl Player {
    fn new(token: UserToken, requested_limit: u32) -> Self {
        Self {
            token,
            requested_limit,
            words: Vec::new(),
        }
    }

    /// Whether this player has already recorded `word`
    pub fn has_played(&self, word: &str) -> bool {
        self.words.iter().any(|w| w.word == word)
    }

    /// Sum of all recorded scores, negatives included
    pub fn total_score(&self) -> i32 {
        self.words.iter().map(|w| w.score).sum()
    }
}

/// Boggle match
///
/// Created pending with a single player. The second player's arrival rolls
/// the board and starts the clock; expiry is observed lazily by the registry.
#[derive(Debug, Clone)]
pub struct Match {
    pub id: MatchId,
    pub state: MatchState,
    pub player_one: Player,
    pub player_two: Option<Player>,
    /// Effective time limit in seconds (player one's request until paired)
    pub time_limit: u32,
    pub started_at: Option<Instant>,
    pub board: Option<Board>,
}

impl Match {
    /// Create a pending match waiting for an opponent
    pub fn new(id: MatchId, player_one: UserToken, time_limit: u32) -> Self {
        Self {
            id,
            state: MatchState::Pending,
            player_one: Player::new(player_one, time_limit),
            player_two: None,
            time_limit,
            started_at: None,
            board: None,
        }
    }

    /// Check if the match has both players
    pub fn is_full(&self) -> bool {
        self.player_two.is_some()
    }

    /// Check if a user plays in this match
    pub fn contains(&self, token: UserToken) -> bool {
        self.player(token).is_some()
    }

    /// Get the player record for a token
    pub fn player(&self, token: UserToken) -> Option<&Player> {
        if self.player_one.token == token {
            Some(&self.player_one)
        } else {
            self.player_two.as_ref().filter(|p| p.token == token)
        }
    }

    fn player_mut(&mut self, token: UserToken) -> Option<&mut Player> {
        if self.player_one.token == token {
            Some(&mut self.player_one)
        } else {
            self.player_two.as_mut().filter(|p| p.token == token)
        }
    }

    /// Seat the second player and start the match
    ///
    /// The effective time limit becomes the floored mean of both requests.
    /// Returns false, leaving the match untouched, if it is already full.
    pub fn activate(&mut self, player_two: UserToken, time_limit: u32, board: Board, now: Instant) -> bool {
        if self.is_full() {
            return false;
        }
        self.time_limit = (self.player_one.requested_limit + time_limit) / 2;
        self.player_two = Some(Player::new(player_two, time_limit));
        self.board = Some(board);
        self.started_at = Some(now);
        self.state = MatchState::Active;
        true
    }

    /// Time since the match started (zero while pending)
    pub fn elapsed(&self, now: Instant) -> Duration {
        self.started_at
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default()
    }

    /// Whole seconds remaining, floored at zero
    pub fn time_left(&self, now: Instant) -> u64 {
        u64::from(self.time_limit).saturating_sub(self.elapsed(now).as_secs())
    }

    /// Whether an active match has run out of time
    pub fn is_expired(&self, now: Instant) -> bool {
        self.state != MatchState::Pending
            && self.elapsed(now) >= Duration::from_secs(u64::from(self.time_limit))
    }

    /// Whether either player has already recorded `word`
    pub fn word_played(&self, word: &str) -> bool {
        self.player_one.has_played(word)
            || self.player_two.as_ref().is_some_and(|p| p.has_played(word))
    }

    /// Record a scored word for a player
    ///
    /// A repeat of a word the player already holds keeps the original entry.
    /// Returns false if the token is not a player or the match is not active.
    pub fn record(&mut self, token: UserToken, word: String, score: i32) -> bool {
        if self.state != MatchState::Active {
            return false;
        }
        let Some(player) = self.player_mut(token) else {
            return false;
        };
        if !player.has_played(&word) {
            player.words.push(PlayedWord { word, score });
        }
        true
    }
}
