//! Request routing
//!
//! Maps a framed request onto one registry operation and turns the outcome
//! into a response. Holds no state of its own.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{AppError, GameError};
use crate::framer::{Method, Request, Resource};
use crate::message::{
    CancelRequest, GameIdResponse, JoinRequest, PlayRequest, RegisterRequest, ScoreResponse,
    UserTokenResponse,
};
use crate::response::{Response, StatusCode};
use crate::server::GameHandle;
use crate::types::MatchId;

/// Route a request and produce its response
///
/// Only a stopped game server is an error; every other failure becomes a
/// status code.
pub async fn route(request: Request, game: &GameHandle) -> Result<Response, AppError> {
    debug!("{:?} {}", request.method, request.target);
    match (request.method, request.resource, request.id.as_deref()) {
        (Some(Method::Post), Some(Resource::Users), None) => register(&request, game).await,
        (Some(Method::Post), Some(Resource::Games), None) => join(&request, game).await,
        (Some(Method::Put), Some(Resource::Games), None) => cancel_join(&request, game).await,
        (Some(Method::Put), Some(Resource::Games), Some(id)) => play_word(id, &request, game).await,
        (Some(Method::Get), Some(Resource::Games), Some(id)) => status(id, request.brief, game).await,
        _ => {
            warn!("Unroutable request: {}", request.target);
            Ok(Response::not_found())
        }
    }
}

async fn register(request: &Request, game: &GameHandle) -> Result<Response, AppError> {
    let Some(body) = decode::<RegisterRequest>(request) else {
        return Ok(Response::empty(StatusCode::Forbidden));
    };
    match game.register(body.nickname).await? {
        Ok(token) => Response::json(
            StatusCode::Created,
            &UserTokenResponse {
                user_token: token.to_string(),
            },
        ),
        Err(err) => Ok(reject(err)),
    }
}

async fn join(request: &Request, game: &GameHandle) -> Result<Response, AppError> {
    let Some(body) = decode::<JoinRequest>(request) else {
        return Ok(Response::empty(StatusCode::Forbidden));
    };
    let token = body.user_token.unwrap_or_default();
    let time_limit = body.time_limit.unwrap_or_default();
    match game.join(token, time_limit).await? {
        Ok(outcome) => {
            let status = if outcome.paired {
                StatusCode::Created
            } else {
                StatusCode::Accepted
            };
            Response::json(
                status,
                &GameIdResponse {
                    game_id: outcome.id.to_string(),
                },
            )
        }
        Err(err) => Ok(reject(err)),
    }
}

async fn cancel_join(request: &Request, game: &GameHandle) -> Result<Response, AppError> {
    let Some(body) = decode::<CancelRequest>(request) else {
        return Ok(Response::empty(StatusCode::Forbidden));
    };
    match game.cancel_join(body.user_token.unwrap_or_default()).await? {
        Ok(_) => Ok(Response::empty(StatusCode::Ok)),
        Err(err) => Ok(reject(err)),
    }
}

async fn play_word(id: &str, request: &Request, game: &GameHandle) -> Result<Response, AppError> {
    let Some(body) = decode::<PlayRequest>(request) else {
        return Ok(Response::empty(StatusCode::Forbidden));
    };
    let word = body.word.unwrap_or_default();
    if word.trim().is_empty() {
        return Ok(reject(GameError::InvalidWord));
    }
    // An id we could never have issued names no active match
    let Ok(id) = id.parse::<MatchId>() else {
        return Ok(reject(GameError::MatchNotActive));
    };

    match game.play_word(id, body.user_token.unwrap_or_default(), word).await? {
        Ok(score) => Response::json(StatusCode::Ok, &ScoreResponse { score }),
        Err(err) => Ok(reject(err)),
    }
}

async fn status(id: &str, brief: bool, game: &GameHandle) -> Result<Response, AppError> {
    let Ok(id) = id.parse::<MatchId>() else {
        return Ok(reject(GameError::MatchNotFound));
    };
    match game.status(id, brief).await? {
        Ok(snapshot) => Response::json(StatusCode::Ok, &snapshot),
        Err(err) => Ok(reject(err)),
    }
}

/// Parse a flat JSON body, logging malformed input
fn decode<T: DeserializeOwned>(request: &Request) -> Option<T> {
    match serde_json::from_str(&request.body) {
        Ok(body) => Some(body),
        Err(e) => {
            warn!("Malformed body for {}: {}", request.target, e);
            None
        }
    }
}

fn reject(err: GameError) -> Response {
    debug!("Rejected: {}", err);
    Response::rejection(&err)
}
