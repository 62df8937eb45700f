//! Response serialization and the per-connection writer
//!
//! Every response carries an exact `Content-Length`. Rejections and the
//! "no content" result have an empty body.

use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::error::{AppError, GameError};

/// Status codes the server emits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    Created,
    Accepted,
    Forbidden,
    NotFound,
    Conflict,
}

impl StatusCode {
    pub fn code(self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::Accepted => 202,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::Conflict => 409,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::Accepted => "Accepted",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::Conflict => "Conflict",
        }
    }
}

/// A response ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    /// Serialized JSON payload; None for an empty body
    pub body: Option<String>,
}

impl Response {
    /// Response with a JSON payload
    pub fn json<T: Serialize>(status: StatusCode, payload: &T) -> Result<Self, AppError> {
        Ok(Self {
            status,
            body: Some(serde_json::to_string(payload)?),
        })
    }

    /// Response with no body
    pub fn empty(status: StatusCode) -> Self {
        Self { status, body: None }
    }

    /// Response for a rejected registry operation
    pub fn rejection(err: &GameError) -> Self {
        if err.is_conflict() {
            Self::empty(StatusCode::Conflict)
        } else {
            Self::empty(StatusCode::Forbidden)
        }
    }

    /// Response for an unroutable request
    pub fn not_found() -> Self {
        Self::empty(StatusCode::NotFound)
    }

    /// Wire form: status line, headers, blank line, body
    pub fn encode(&self) -> Vec<u8> {
        let body = self.body.as_deref().unwrap_or("");
        let mut out = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json; charset=utf-8\r\nContent-Length: {}\r\n\r\n",
            self.status.code(),
            self.status.reason(),
            body.len()
        )
        .into_bytes();
        out.extend_from_slice(body.as_bytes());
        out
    }
}

/// Drains queued responses to the socket
///
/// One writer exists per connection and it sends one response at a time, so
/// responses queued while a send is in flight simply wait their turn.
pub struct ResponseWriter<W> {
    writer: W,
    queue: mpsc::Receiver<Response>,
}

impl<W: AsyncWrite + Unpin> ResponseWriter<W> {
    pub fn new(writer: W, queue: mpsc::Receiver<Response>) -> Self {
        Self { writer, queue }
    }

    /// Write responses until the queue closes or the peer stops accepting bytes
    ///
    /// A zero-byte write surfaces as `WriteZero` and ends the connection.
    pub async fn run(mut self) -> Result<(), AppError> {
        while let Some(response) = self.queue.recv().await {
            let bytes = response.encode();
            trace!("Sending {} bytes ({})", bytes.len(), response.status.code());
            self.writer.write_all(&bytes).await?;
            self.writer.flush().await?;
        }
        debug!("Response queue closed");
        let _ = self.writer.shutdown().await;
        Ok(())
    }
}
