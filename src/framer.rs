//! Incremental request framer
//!
//! Turns an unbounded sequence of partial reads into discrete requests.
//! Chunk boundaries have no relation to message boundaries: a chunk may end
//! mid-line, mid-body, or carry several pipelined requests at once.
//!
//! ```text
//! POST /BoggleService.svc/games HTTP/1.1\r\n     request line
//! Content-Length: 51\r\n                         headers (only this one is read)
//! \r\n                                           end of headers
//! {"UserToken":"...","TimeLimit":60}             body, exactly Content-Length bytes
//! ```

use bytes::BytesMut;
use tracing::{trace, warn};

use crate::error::FrameError;

/// Supported request methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            _ => None,
        }
    }
}

/// Supported resources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Users,
    Games,
}

impl Resource {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "users" => Some(Self::Users),
            "games" => Some(Self::Games),
            _ => None,
        }
    }
}

/// A fully framed request
///
/// `method` and `resource` are None when the request line named something
/// unsupported; such requests are still framed so the stream stays aligned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Option<Method>,
    pub resource: Option<Resource>,
    /// Path segment after the resource, if any
    pub id: Option<String>,
    /// `Brief=yes` in the query string
    pub brief: bool,
    /// Raw request target, for logging
    pub target: String,
    pub body: String,
}

/// Parsed request line, waiting for its body
#[derive(Debug, Default)]
struct RequestHead {
    method: Option<Method>,
    resource: Option<Resource>,
    id: Option<String>,
    brief: bool,
    target: String,
}

impl RequestHead {
    fn parse(line: &str) -> Self {
        let mut parts = line.split_whitespace();
        let method = parts.next().and_then(Method::parse);
        let Some(target) = parts.next() else {
            warn!("Request line without target: {:?}", line);
            return Self::default();
        };

        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (target, None),
        };
        let (resource, id) = parse_path(path);

        Self {
            method,
            resource,
            id,
            brief: query.is_some_and(parse_brief),
            target: target.to_string(),
        }
    }

    fn into_request(self, body: String) -> Request {
        Request {
            method: self.method,
            resource: self.resource,
            id: self.id,
            brief: self.brief,
            target: self.target,
            body,
        }
    }
}

/// Split a path into resource and optional id
///
/// Accepts `/{resource}[/{id}]` and `/{prefix}/{resource}[/{id}]`.
fn parse_path(path: &str) -> (Option<Resource>, Option<String>) {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [resource] => (Resource::parse(resource), None),
        [first, id] if Resource::parse(first).is_some() => {
            (Resource::parse(first), Some(id.to_string()))
        }
        [_prefix, resource] => (Resource::parse(resource), None),
        [_prefix, resource, id] => (Resource::parse(resource), Some(id.to_string())),
        _ => (None, None),
    }
}

/// Read the `Brief` flag from a query string; anything but `yes` is false
fn parse_brief(query: &str) -> bool {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.eq_ignore_ascii_case("brief"))
        .is_some_and(|(_, value)| value.eq_ignore_ascii_case("yes"))
}

/// Recognize a `Content-Length: N` header, case-insensitively
fn parse_content_length(line: &str) -> Result<Option<usize>, FrameError> {
    let Some((name, value)) = line.split_once(':') else {
        return Ok(None);
    };
    if !name.trim().eq_ignore_ascii_case("content-length") {
        return Ok(None);
    }
    let value = value.trim();
    value
        .parse::<usize>()
        .map(Some)
        .map_err(|_| FrameError::InvalidContentLength(value.to_string()))
}

/// Per-connection request framer
#[derive(Debug)]
pub struct RequestFramer {
    buffer: BytesMut,
    /// Bytes at the front of `buffer` already searched for a line break
    scanned: usize,
    head: Option<RequestHead>,
    head_bytes: usize,
    content_length: usize,
    headers_complete: bool,
    max_head_bytes: usize,
    max_body_bytes: usize,
}

impl RequestFramer {
    pub fn new(max_head_bytes: usize, max_body_bytes: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(1024),
            scanned: 0,
            head: None,
            head_bytes: 0,
            content_length: 0,
            headers_complete: false,
            max_head_bytes,
            max_body_bytes,
        }
    }

    /// Feed newly received bytes, returning every request they complete
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<Request>, FrameError> {
        self.buffer.extend_from_slice(chunk);
        let mut requests = Vec::new();
        while let Some(request) = self.next_request()? {
            requests.push(request);
        }
        Ok(requests)
    }

    /// Bytes received but not yet consumed by a complete request
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    fn next_request(&mut self) -> Result<Option<Request>, FrameError> {
        while !self.headers_complete {
            let Some(line) = self.take_line()? else {
                return Ok(None);
            };
            self.handle_line(&line)?;
        }

        if self.buffer.len() < self.content_length {
            return Ok(None);
        }

        let body = self.buffer.split_to(self.content_length);
        let head = self.head.take().unwrap_or_default();
        self.reset();

        let body = std::str::from_utf8(&body)
            .map_err(|_| FrameError::InvalidUtf8)?
            .to_string();
        trace!("Framed request for {} with {} byte body", head.target, body.len());
        Ok(Some(head.into_request(body)))
    }

    /// Remove the next complete line from the buffer, without its terminator
    fn take_line(&mut self) -> Result<Option<String>, FrameError> {
        let Some(offset) = self.buffer[self.scanned..].iter().position(|&b| b == b'\n') else {
            self.scanned = self.buffer.len();
            if self.head_bytes + self.buffer.len() > self.max_head_bytes {
                return Err(FrameError::HeaderTooLarge(self.max_head_bytes));
            }
            return Ok(None);
        };

        let end = self.scanned + offset;
        let raw = self.buffer.split_to(end + 1);
        self.scanned = 0;
        self.head_bytes += raw.len();
        if self.head_bytes > self.max_head_bytes {
            return Err(FrameError::HeaderTooLarge(self.max_head_bytes));
        }

        let line = std::str::from_utf8(&raw[..end]).map_err(|_| FrameError::InvalidUtf8)?;
        Ok(Some(line.trim_end_matches('\r').to_string()))
    }

    fn handle_line(&mut self, line: &str) -> Result<(), FrameError> {
        if self.head.is_none() {
            if line.is_empty() {
                // Stray line break between requests
                self.head_bytes = 0;
                return Ok(());
            }
            self.head = Some(RequestHead::parse(line));
            return Ok(());
        }

        if line.is_empty() {
            self.headers_complete = true;
            return Ok(());
        }

        if let Some(length) = parse_content_length(line)? {
            if length > self.max_body_bytes {
                return Err(FrameError::BodyTooLarge {
                    length,
                    limit: self.max_body_bytes,
                });
            }
            self.content_length = length;
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.head_bytes = 0;
        self.content_length = 0;
        self.headers_complete = false;
    }
}
