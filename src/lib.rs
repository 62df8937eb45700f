//! Multiplayer Boggle Server Library
//!
//! A Boggle game server speaking a small HTTP/1.1 dialect directly over TCP.
//! Players register, get paired into timed matches on a shared 4x4 board,
//! play words for points, and poll the match status until time runs out.
//!
//! # Features
//! - Incremental request framing over raw byte streams (pipelining, partial reads)
//! - FIFO matchmaking with exactly-once pairing
//! - Lazily observed match expiry
//! - Word scoring against a dictionary and the board
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `GameServer` is the central actor owning the match `Registry`
//! - Each connection runs a reader task (framer + router) and a writer task
//! - No locks needed - all registry access goes through message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use boggle_server::{serve, Dictionary, GameServer, Registry, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:60000").await.unwrap();
//!     let dictionary = Dictionary::load("dictionary.txt").await.unwrap();
//!     let (server, game) = GameServer::channel(Registry::new(dictionary), 256);
//!
//!     tokio::spawn(server.run());
//!     serve(listener, game, ServerConfig::default()).await;
//! }
//! ```

pub mod board;
pub mod clock;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod framer;
pub mod game;
pub mod handler;
pub mod message;
pub mod registry;
pub mod response;
pub mod router;
pub mod scorer;
pub mod server;
pub mod types;

// Re-export main types for convenience
pub use board::Board;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Args, ServerConfig};
pub use dictionary::Dictionary;
pub use error::{AppError, FrameError, GameError};
pub use framer::{Request, RequestFramer};
pub use game::{Match, MatchState};
pub use handler::{handle_connection, serve};
pub use registry::{JoinOutcome, Registry};
pub use response::{Response, ResponseWriter, StatusCode};
pub use server::{GameHandle, GameServer, ServerCommand};
pub use types::{MatchId, UserToken};
