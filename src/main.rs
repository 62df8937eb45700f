//! Boggle Server - Entry Point
//!
//! Loads the dictionary, starts the GameServer actor and accepts connections
//! until interrupted.

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use boggle_server::{serve, Args, Dictionary, GameServer, Registry, ServerConfig};

/// Channel buffer size for server commands
const CHANNEL_BUFFER_SIZE: usize = 256;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=boggle_server=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("boggle_server=info")),
        )
        .init();

    let args = Args::parse();
    let config = ServerConfig::from(&args);

    let dictionary = Dictionary::load(&args.dictionary).await?;

    let listener = TcpListener::bind(&args.addr).await?;
    info!("Boggle server listening on {}", args.addr);

    let (server, game) = GameServer::channel(Registry::new(dictionary), CHANNEL_BUFFER_SIZE);
    tokio::spawn(server.run());

    tokio::select! {
        _ = serve(listener, game, config) => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Interrupted, shutting down");
        }
    }

    Ok(())
}
