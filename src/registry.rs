//! Match registry
//!
//! Holds every registered user and every match, split into three lifecycle
//! buckets: a FIFO queue of pending matches, and maps of active and
//! completed matches. All operations take `&mut self`; the game server actor
//! owns the registry, so each operation runs to completion before the next
//! one starts.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info};

use crate::board::Board;
use crate::clock::{Clock, SystemClock};
use crate::dictionary::Dictionary;
use crate::error::GameError;
use crate::game::{Match, MatchState, Player};
use crate::message::{PlayerStatus, StatusResponse, WordScore};
use crate::scorer::score_word;
use crate::types::{MatchId, UserToken};

/// Shortest accepted time limit, in seconds
pub const MIN_TIME_LIMIT: i64 = 5;

/// Longest accepted time limit, in seconds
pub const MAX_TIME_LIMIT: i64 = 120;

/// Produces the board for each newly activated match
pub type BoardSource = Box<dyn FnMut() -> Board + Send>;

/// Result of a successful join
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinOutcome {
    pub id: MatchId,
    /// True when the caller was seated as player two and the match started
    pub paired: bool,
}

/// Users and matches
pub struct Registry {
    /// Token -> nickname
    users: HashMap<UserToken, String>,
    /// Matches waiting for an opponent, oldest first
    pending: VecDeque<Match>,
    active: HashMap<MatchId, Match>,
    completed: HashMap<MatchId, Match>,
    next_id: MatchId,
    dictionary: Dictionary,
    clock: Arc<dyn Clock>,
    boards: BoardSource,
}

impl Registry {
    /// Create a registry using the system clock and random boards
    pub fn new(dictionary: Dictionary) -> Self {
        Self {
            users: HashMap::new(),
            pending: VecDeque::new(),
            active: HashMap::new(),
            completed: HashMap::new(),
            next_id: MatchId(1),
            dictionary,
            clock: Arc::new(SystemClock),
            boards: Box::new(Board::random),
        }
    }

    /// Replace the clock used for match timing
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the board generator
    pub fn with_boards(mut self, boards: BoardSource) -> Self {
        self.boards = boards;
        self
    }

    /// Register a user, returning their new token
    pub fn register(&mut self, nickname: Option<&str>) -> Result<UserToken, GameError> {
        let nickname = nickname
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(GameError::InvalidNickname)?;

        let token = UserToken::new();
        self.users.insert(token, nickname.to_string());
        info!("Registered user '{}' ({})", nickname, token);
        Ok(token)
    }

    /// Join the oldest waiting match, or start waiting in a new one
    pub fn join(&mut self, token: &str, time_limit: i64) -> Result<JoinOutcome, GameError> {
        let token = self.user(token)?;
        if !(MIN_TIME_LIMIT..=MAX_TIME_LIMIT).contains(&time_limit) {
            return Err(GameError::InvalidTimeLimit(time_limit));
        }
        if self.pending.iter().any(|m| m.contains(token)) {
            return Err(GameError::AlreadyWaiting);
        }
        // Range-checked above
        let time_limit = time_limit as u32;

        while let Some(mut waiting) = self.pending.pop_front() {
            let board = (self.boards)();
            let now = self.clock.now();
            if !waiting.activate(token, time_limit, board, now) {
                error!(
                    "Pending match {} already had two players; discarding it",
                    waiting.id
                );
                continue;
            }

            let id = waiting.id;
            info!(
                "Match {} started: {} vs {} for {}s",
                id, waiting.player_one.token, token, waiting.time_limit
            );
            self.active.insert(id, waiting);
            return Ok(JoinOutcome { id, paired: true });
        }

        let id = self.next_id;
        self.next_id = id.next();
        self.pending.push_back(Match::new(id, token, time_limit));
        info!("User {} waiting in match {}", token, id);
        Ok(JoinOutcome { id, paired: false })
    }

    /// Withdraw the caller's own pending match
    pub fn cancel_join(&mut self, token: &str) -> Result<MatchId, GameError> {
        let token = self.user(token)?;
        let position = self
            .pending
            .iter()
            .position(|m| m.player_one.token == token && !m.is_full())
            .ok_or(GameError::NotWaiting)?;

        // Position was just found
        let cancelled = self.pending.remove(position).ok_or(GameError::NotWaiting)?;
        info!("User {} cancelled pending match {}", token, cancelled.id);
        Ok(cancelled.id)
    }

    /// Play a word in an active match, returning the score it earned
    pub fn play_word(&mut self, id: MatchId, token: &str, word: &str) -> Result<i32, GameError> {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return Err(GameError::InvalidWord);
        }

        let token = self.user(token)?;

        let now = self.clock.now();
        self.complete_if_expired(id, now);
        let game = self.active.get_mut(&id).ok_or(GameError::MatchNotActive)?;
        if !game.contains(token) {
            return Err(GameError::NotAPlayer);
        }
        let Some(board) = game.board.as_ref() else {
            error!("Active match {} has no board", id);
            return Err(GameError::MatchNotActive);
        };

        let score = score_word(&word, game.word_played(&word), board, &self.dictionary);
        debug!("Match {}: {} played '{}' for {}", id, token, word, score);
        game.record(token, word, score);
        Ok(score)
    }

    /// Snapshot a match, completing it first if its time is up
    pub fn status(&mut self, id: MatchId, brief: bool) -> Result<StatusResponse, GameError> {
        if self.pending.iter().any(|m| m.id == id) {
            return Ok(StatusResponse::pending());
        }

        let now = self.clock.now();
        self.complete_if_expired(id, now);
        let game = self
            .active
            .get(&id)
            .or_else(|| self.completed.get(&id))
            .ok_or(GameError::MatchNotFound)?;

        Ok(StatusResponse {
            game_state: game.state,
            board: game.board.as_ref().map(Board::render),
            time_limit: Some(game.time_limit),
            time_left: Some(game.time_left(now)),
            player1: Some(self.player_status(&game.player_one, brief)),
            player2: game.player_two.as_ref().map(|p| self.player_status(p, brief)),
        })
    }

    /// Number of registered users
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Resolve a client-supplied token to a registered user
    fn user(&self, raw: &str) -> Result<UserToken, GameError> {
        UserToken::parse(raw)
            .filter(|t| self.users.contains_key(t))
            .ok_or(GameError::UnknownUser)
    }

    /// Move an active match to the completed bucket once its time is up
    fn complete_if_expired(&mut self, id: MatchId, now: Instant) {
        if !self.active.get(&id).is_some_and(|m| m.is_expired(now)) {
            return;
        }
        if let Some(mut game) = self.active.remove(&id) {
            game.state = MatchState::Completed;
            info!(
                "Match {} completed: {} to {}",
                id,
                game.player_one.total_score(),
                game.player_two.as_ref().map_or(0, Player::total_score)
            );
            self.completed.insert(id, game);
        }
    }

    fn player_status(&self, player: &Player, brief: bool) -> PlayerStatus {
        PlayerStatus {
            nickname: self.users.get(&player.token).cloned().unwrap_or_default(),
            score: player.total_score(),
            words_played: (!brief).then(|| {
                player
                    .words
                    .iter()
                    .map(|w| WordScore {
                        word: w.word.clone(),
                        score: w.score,
                    })
                    .collect()
            }),
        }
    }
}
