//! End-to-end tests over real TCP connections.

use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use boggle_server::{serve, Board, Dictionary, GameServer, Registry, ServerConfig};

// S T A R
// E N O P
// D L I Q
// X Y Z W
const LETTERS: &str = "STARENOPDLIQXYZW";

/// Start a server on an ephemeral port and return its address
async fn start_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let dictionary = Dictionary::from_words(["star", "stone", "tar"]);
    let registry = Registry::new(dictionary)
        .with_boards(Box::new(|| Board::from_letters(LETTERS).unwrap_or_else(Board::random)));
    let (server, game) = GameServer::channel(registry, 64);
    tokio::spawn(server.run());
    tokio::spawn(serve(listener, game, ServerConfig::default()));

    addr
}

/// A parsed response: status code and optional JSON body
#[derive(Debug)]
struct Reply {
    status: u16,
    body: Option<Value>,
}

/// Minimal client that writes raw request text and parses responses
struct TestClient {
    stream: TcpStream,
    buffer: Vec<u8>,
}

impl TestClient {
    async fn connect(addr: &str) -> Self {
        Self {
            stream: TcpStream::connect(addr).await.unwrap(),
            buffer: Vec::new(),
        }
    }

    async fn send_raw(&mut self, raw: &str) {
        self.stream.write_all(raw.as_bytes()).await.unwrap();
    }

    async fn request(&mut self, method: &str, path: &str, body: Option<&str>) -> Reply {
        self.send_raw(&format_request(method, path, body)).await;
        self.read_reply().await
    }

    async fn read_reply(&mut self) -> Reply {
        loop {
            if let Some(reply) = self.try_parse() {
                return reply;
            }
            let mut chunk = [0u8; 1024];
            let n = tokio::time::timeout(Duration::from_secs(5), self.stream.read(&mut chunk))
                .await
                .expect("timed out waiting for response")
                .unwrap();
            assert!(n > 0, "server closed the connection");
            self.buffer.extend_from_slice(&chunk[..n]);
        }
    }

    fn try_parse(&mut self) -> Option<Reply> {
        let text = std::str::from_utf8(&self.buffer).ok()?;
        let head_end = text.find("\r\n\r\n")?;
        let head = &text[..head_end];
        let status = head.split_whitespace().nth(1)?.parse().ok()?;
        let length: usize = head
            .lines()
            .find_map(|l| l.strip_prefix("Content-Length: "))?
            .trim()
            .parse()
            .ok()?;

        let body_start = head_end + 4;
        if self.buffer.len() < body_start + length {
            return None;
        }
        let body = (length > 0)
            .then(|| serde_json::from_slice(&self.buffer[body_start..body_start + length]).unwrap());
        self.buffer.drain(..body_start + length);
        Some(Reply { status, body })
    }
}

fn format_request(method: &str, path: &str, body: Option<&str>) -> String {
    let body = body.unwrap_or("");
    format!(
        "{method} /BoggleService.svc/{path} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    )
}

async fn register(client: &mut TestClient, name: &str) -> String {
    let reply = client
        .request("POST", "users", Some(&format!(r#"{{"Nickname":"{name}"}}"#)))
        .await;
    assert_eq!(reply.status, 201);
    reply.body.unwrap()["UserToken"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_full_match_over_tcp() {
    let addr = start_server().await;
    let mut alice = TestClient::connect(&addr).await;
    let mut bob = TestClient::connect(&addr).await;

    let alice_token = register(&mut alice, "Alice").await;
    let bob_token = register(&mut bob, "Bob").await;

    let reply = alice
        .request("POST", "games", Some(&format!(r#"{{"UserToken":"{alice_token}","TimeLimit":30}}"#)))
        .await;
    assert_eq!(reply.status, 202);
    let game_id = reply.body.unwrap()["GameID"].as_str().unwrap().to_string();

    let reply = alice.request("GET", &format!("games/{game_id}"), None).await;
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body.unwrap(), serde_json::json!({"GameState": "pending"}));

    let reply = bob
        .request("POST", "games", Some(&format!(r#"{{"UserToken":"{bob_token}","TimeLimit":61}}"#)))
        .await;
    assert_eq!(reply.status, 201);
    assert_eq!(reply.body.unwrap()["GameID"], game_id.as_str());

    let play = format!(r#"{{"UserToken":"{alice_token}","Word":"stone"}}"#);
    let reply = alice.request("PUT", &format!("games/{game_id}"), Some(&play)).await;
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body.unwrap()["Score"], 2);

    let reply = alice.request("PUT", &format!("games/{game_id}"), Some(&play)).await;
    assert_eq!(reply.body.unwrap()["Score"], 0);

    let mut eve = TestClient::connect(&addr).await;
    let eve_token = register(&mut eve, "Eve").await;
    let intrude = format!(r#"{{"UserToken":"{eve_token}","Word":"tar"}}"#);
    let reply = eve.request("PUT", &format!("games/{game_id}"), Some(&intrude)).await;
    assert_eq!(reply.status, 409);

    let reply = bob.request("GET", &format!("games/{game_id}?Brief=yes"), None).await;
    assert_eq!(reply.status, 200);
    let status = reply.body.unwrap();
    assert_eq!(status["GameState"], "active");
    assert_eq!(status["Board"], LETTERS);
    assert_eq!(status["TimeLimit"], 45);
    assert_eq!(status["Player1"]["Nickname"], "Alice");
    assert_eq!(status["Player1"]["Score"], 2);
    assert!(status["Player1"].get("WordsPlayed").is_none());

    let reply = bob.request("GET", &format!("games/{game_id}"), None).await;
    let status = reply.body.unwrap();
    assert_eq!(status["Player1"]["WordsPlayed"].as_array().unwrap().len(), 1);
    assert_eq!(status["Player2"]["WordsPlayed"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_rejections_over_tcp() {
    let addr = start_server().await;
    let mut client = TestClient::connect(&addr).await;

    let reply = client.request("POST", "users", Some(r#"{"Nickname":"  "}"#)).await;
    assert_eq!(reply.status, 403);
    assert!(reply.body.is_none());

    let token = register(&mut client, "Carol").await;
    let join = |limit: i64| format!(r#"{{"UserToken":"{token}","TimeLimit":{limit}}}"#);

    assert_eq!(client.request("POST", "games", Some(&join(4))).await.status, 403);
    assert_eq!(client.request("POST", "games", Some(&join(121))).await.status, 403);
    let reply = client.request("POST", "games", Some(&join(120))).await;
    assert_eq!(reply.status, 202);
    let game_id = reply.body.unwrap()["GameID"].as_str().unwrap().to_string();
    assert_eq!(client.request("POST", "games", Some(&join(60))).await.status, 409);

    let play = format!(r#"{{"UserToken":"{token}","Word":"star"}}"#);
    assert_eq!(client.request("PUT", &format!("games/{game_id}"), Some(&play)).await.status, 409);
    assert_eq!(client.request("PUT", "games/9999", Some(&play)).await.status, 409);

    let cancel = format!(r#"{{"UserToken":"{token}"}}"#);
    assert_eq!(client.request("PUT", "games", Some(&cancel)).await.status, 200);
    assert_eq!(client.request("PUT", "games", Some(&cancel)).await.status, 403);

    assert_eq!(client.request("GET", "users", None).await.status, 404);
    assert_eq!(client.request("DELETE", "games/1", None).await.status, 404);
}

#[tokio::test]
async fn test_pipelined_and_fragmented_requests() {
    let addr = start_server().await;
    let mut client = TestClient::connect(&addr).await;

    let mut raw = format_request("POST", "users", Some(r#"{"Nickname":"One"}"#));
    raw.push_str(&format_request("POST", "users", Some(r#"{"Nickname":"Two"}"#)));
    raw.push_str(&format_request("GET", "games/77", None));

    // Send in small uneven pieces
    let bytes = raw.as_bytes();
    for piece in bytes.chunks(7) {
        client.stream.write_all(piece).await.unwrap();
        client.stream.flush().await.unwrap();
    }

    let first = client.read_reply().await;
    let second = client.read_reply().await;
    let third = client.read_reply().await;
    assert_eq!(first.status, 201);
    assert_eq!(second.status, 201);
    assert_ne!(first.body.unwrap()["UserToken"], second.body.unwrap()["UserToken"]);
    assert_eq!(third.status, 403);
}

#[tokio::test]
async fn test_bad_framing_closes_only_that_connection() {
    let addr = start_server().await;
    let mut bad = TestClient::connect(&addr).await;
    let mut good = TestClient::connect(&addr).await;

    bad.send_raw("POST /users HTTP/1.1\r\nContent-Length: huge\r\n\r\n").await;
    let mut chunk = [0u8; 64];
    let n = tokio::time::timeout(Duration::from_secs(5), bad.stream.read(&mut chunk))
        .await
        .expect("connection should close")
        .unwrap_or(0);
    assert_eq!(n, 0);

    register(&mut good, "Still here").await;
}
