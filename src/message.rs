//! Wire payload definitions
//!
//! Flat JSON objects exchanged in request and response bodies. Field names
//! are PascalCase on the wire; optional response fields are omitted rather
//! than sent as null.

use serde::{Deserialize, Serialize};

use crate::game::MatchState;

/// `POST /users` body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterRequest {
    pub nickname: Option<String>,
}

/// `POST /games` body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JoinRequest {
    pub user_token: Option<String>,
    pub time_limit: Option<i64>,
}

/// `PUT /games` body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CancelRequest {
    pub user_token: Option<String>,
}

/// `PUT /games/{id}` body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayRequest {
    pub user_token: Option<String>,
    pub word: Option<String>,
}

/// Token issued on registration
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserTokenResponse {
    pub user_token: String,
}

/// Match joined or created
#[derive(Debug, Serialize)]
pub struct GameIdResponse {
    #[serde(rename = "GameID")]
    pub game_id: String,
}

/// Score awarded for a played word
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScoreResponse {
    pub score: i32,
}

/// Match status snapshot
///
/// A pending match carries only `GameState`.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatusResponse {
    pub game_state: MatchState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_left: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player1: Option<PlayerStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player2: Option<PlayerStatus>,
}

impl StatusResponse {
    /// Snapshot of a match still waiting for an opponent
    pub fn pending() -> Self {
        Self {
            game_state: MatchState::Pending,
            board: None,
            time_limit: None,
            time_left: None,
            player1: None,
            player2: None,
        }
    }
}

/// One player's view in a status snapshot
///
/// `WordsPlayed` is omitted from brief snapshots.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayerStatus {
    pub nickname: String,
    pub score: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub words_played: Option<Vec<WordScore>>,
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WordScore {
    pub word: String,
    pub score: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_join_request_deserialize() {
        let json = r#"{"UserToken": "abc", "TimeLimit": 60}"#;
        let req: JoinRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.user_token.as_deref(), Some("abc"));
        assert_eq!(req.time_limit, Some(60));
    }

    #[test]
    fn test_register_request_missing_field() {
        let req: RegisterRequest = serde_json::from_str("{}").unwrap();
        assert!(req.nickname.is_none());
    }

    #[test]
    fn test_game_id_field_name() {
        let json = serde_json::to_value(GameIdResponse {
            game_id: "7".to_string(),
        })
        .unwrap();
        assert_eq!(json, json!({"GameID": "7"}));
    }

    #[test]
    fn test_pending_status_has_only_state() {
        let json = serde_json::to_value(StatusResponse::pending()).unwrap();
        assert_eq!(json, json!({"GameState": "pending"}));
    }

    #[test]
    fn test_brief_player_omits_words() {
        let player = PlayerStatus {
            nickname: "Alice".to_string(),
            score: 3,
            words_played: None,
        };
        let json: Value = serde_json::to_value(player).unwrap();
        assert_eq!(json, json!({"Nickname": "Alice", "Score": 3}));
    }
}
