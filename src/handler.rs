//! Connection handling
//!
//! Accepts TCP connections and runs each one as two tasks: a reader that
//! frames requests and routes them, and a writer that drains responses back
//! to the socket. The two communicate only through an mpsc queue.

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::error::AppError;
use crate::framer::RequestFramer;
use crate::response::{Response, ResponseWriter};
use crate::router;
use crate::server::GameHandle;

/// Size of each socket read
const READ_BUFFER_SIZE: usize = 1024;

/// Responses that may wait behind an in-flight send
const RESPONSE_QUEUE_SIZE: usize = 32;

/// Accept connections forever, spawning a handler for each
pub async fn serve(listener: TcpListener, game: GameHandle, config: ServerConfig) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                info!("New connection from {}", addr);
                let game = game.clone();

                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, game, config).await {
                        error!("Connection handler error: {}", e);
                    }
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}

/// Handle a single TCP connection until either side closes it
pub async fn handle_connection(
    stream: TcpStream,
    game: GameHandle,
    config: ServerConfig,
) -> Result<(), AppError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    let (reader, writer) = stream.into_split();
    let (response_tx, response_rx) = mpsc::channel::<Response>(RESPONSE_QUEUE_SIZE);

    let mut read_task = tokio::spawn(read_requests(reader, game, config, response_tx));
    let mut write_task = tokio::spawn(ResponseWriter::new(writer, response_rx).run());

    // Wait for either task to complete
    let result = tokio::select! {
        read = &mut read_task => {
            debug!("Read task completed for {}", peer_addr);
            // Dropping the queue sender lets the writer flush what is left and stop
            let written = write_task.await;
            flatten(read).and(flatten(written))
        }
        written = &mut write_task => {
            debug!("Write task completed for {}", peer_addr);
            read_task.abort();
            flatten(written)
        }
    };

    info!("Connection from {} closed", peer_addr);
    result
}

/// Feed socket bytes through the framer and route each complete request
///
/// Requests from one connection are routed one after another, so responses
/// are queued in request order.
async fn read_requests<R: AsyncRead + Unpin>(
    mut reader: R,
    game: GameHandle,
    config: ServerConfig,
    responses: mpsc::Sender<Response>,
) -> Result<(), AppError> {
    let mut framer = RequestFramer::new(config.max_head_bytes, config.max_body_bytes);
    let mut chunk = [0u8; READ_BUFFER_SIZE];

    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            debug!("Peer closed ({} bytes unframed)", framer.buffered());
            return Ok(());
        }

        let requests = framer.push(&chunk[..n]).map_err(|e| {
            warn!("Closing connection: {}", e);
            e
        })?;
        for request in requests {
            let response = router::route(request, &game).await?;
            if responses.send(response).await.is_err() {
                debug!("Writer gone, ending read task");
                return Ok(());
            }
        }
    }
}

fn flatten(joined: Result<Result<(), AppError>, tokio::task::JoinError>) -> Result<(), AppError> {
    match joined {
        Ok(result) => result,
        Err(e) if e.is_cancelled() => Ok(()),
        Err(e) => Err(AppError::Io(std::io::Error::other(e))),
    }
}
