//! GameServer Actor implementation
//!
//! The central actor that owns the match registry. Connection handlers never
//! touch shared state directly; they send a `ServerCommand` carrying a
//! oneshot reply channel and wait for the answer. Commands are handled one at
//! a time, which makes every registry operation atomic.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::error::{AppError, GameError};
use crate::message::StatusResponse;
use crate::registry::{JoinOutcome, Registry};
use crate::types::{MatchId, UserToken};

/// Reply channel for a registry operation
pub type Reply<T> = oneshot::Sender<Result<T, GameError>>;

/// Commands sent from handlers to the GameServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// Register a new user
    Register {
        nickname: Option<String>,
        reply: Reply<UserToken>,
    },
    /// Join or create a match
    Join {
        token: String,
        time_limit: i64,
        reply: Reply<JoinOutcome>,
    },
    /// Withdraw from a pending match
    CancelJoin {
        token: String,
        reply: Reply<MatchId>,
    },
    /// Play a word in an active match
    PlayWord {
        id: MatchId,
        token: String,
        word: String,
        reply: Reply<i32>,
    },
    /// Snapshot a match
    Status {
        id: MatchId,
        brief: bool,
        reply: Reply<StatusResponse>,
    },
}

/// The main GameServer actor
pub struct GameServer {
    registry: Registry,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl GameServer {
    /// Create a new GameServer with the given registry and command receiver
    pub fn new(registry: Registry, receiver: mpsc::Receiver<ServerCommand>) -> Self {
        Self { registry, receiver }
    }

    /// Create a server together with a handle for talking to it
    pub fn channel(registry: Registry, buffer: usize) -> (Self, GameHandle) {
        let (sender, receiver) = mpsc::channel(buffer);
        (Self::new(registry, receiver), GameHandle { sender })
    }

    /// Run the GameServer event loop
    ///
    /// Continuously receives and processes commands until all handles are dropped.
    pub async fn run(mut self) {
        info!("GameServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        info!("GameServer shutting down");
    }

    /// Process a single command
    ///
    /// A dropped reply receiver only means the connection went away; the
    /// operation itself has already taken effect.
    fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Register { nickname, reply } => {
                let _ = reply.send(self.registry.register(nickname.as_deref()));
            }
            ServerCommand::Join {
                token,
                time_limit,
                reply,
            } => {
                let _ = reply.send(self.registry.join(&token, time_limit));
            }
            ServerCommand::CancelJoin { token, reply } => {
                let _ = reply.send(self.registry.cancel_join(&token));
            }
            ServerCommand::PlayWord {
                id,
                token,
                word,
                reply,
            } => {
                let _ = reply.send(self.registry.play_word(id, &token, &word));
            }
            ServerCommand::Status { id, brief, reply } => {
                let _ = reply.send(self.registry.status(id, brief));
            }
        }
        debug!("Registered users: {}", self.registry.user_count());
    }
}

/// Cloneable handle to the GameServer actor
///
/// Each method sends one command and waits for its reply. The outer `Result`
/// fails only if the actor has stopped; the inner one is the operation's own
/// outcome.
#[derive(Debug, Clone)]
pub struct GameHandle {
    sender: mpsc::Sender<ServerCommand>,
}

impl GameHandle {
    pub async fn register(&self, nickname: Option<String>) -> Result<Result<UserToken, GameError>, AppError> {
        self.call(|reply| ServerCommand::Register { nickname, reply })
            .await
    }

    pub async fn join(&self, token: String, time_limit: i64) -> Result<Result<JoinOutcome, GameError>, AppError> {
        self.call(|reply| ServerCommand::Join {
            token,
            time_limit,
            reply,
        })
        .await
    }

    pub async fn cancel_join(&self, token: String) -> Result<Result<MatchId, GameError>, AppError> {
        self.call(|reply| ServerCommand::CancelJoin { token, reply })
            .await
    }

    pub async fn play_word(
        &self,
        id: MatchId,
        token: String,
        word: String,
    ) -> Result<Result<i32, GameError>, AppError> {
        self.call(|reply| ServerCommand::PlayWord {
            id,
            token,
            word,
            reply,
        })
        .await
    }

    pub async fn status(&self, id: MatchId, brief: bool) -> Result<Result<StatusResponse, GameError>, AppError> {
        self.call(|reply| ServerCommand::Status { id, brief, reply })
            .await
    }

    async fn call<T>(
        &self,
        command: impl FnOnce(Reply<T>) -> ServerCommand,
    ) -> Result<Result<T, GameError>, AppError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(command(reply))
            .await
            .map_err(|_| AppError::ChannelSend)?;
        response.await.map_err(|_| AppError::ChannelSend)
    }
}
