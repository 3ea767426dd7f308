//! HTTP routes over a shared [`GameStore`].

use crate::wire::{
    CreateGameResponse, ErrorBody, GameListResponse, GameResponse, MoveRequest, PingResponse,
};
use crate::{GameId, GameStore, StoreError, StoreErrorKind, ws};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::{debug, error, info, instrument, warn};

/// Shared handler state.
pub type AppState = Arc<GameStore>;

/// Builds the application router.
///
/// | Route | Purpose |
/// |---|---|
/// | `GET /ping` | liveness |
/// | `POST /games`, `GET /games` | create, list |
/// | `GET /games/{id}`, `DELETE /games/{id}` | read, remove |
/// | `POST /games/{id}/move` | apply a move |
/// | `GET /ws` | WebSocket echo |
#[instrument(skip(store))]
pub fn router(store: AppState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/games", post(create_game).get(list_games))
        .route("/games/{id}", get(get_game).delete(delete_game))
        .route("/games/{id}/move", post(move_piece))
        .route("/ws", get(ws::upgrade))
        .layer(
            ServiceBuilder::new()
                .map_request(log_request)
                .map_response(log_response),
        )
        .with_state(store)
}

fn log_request(req: Request) -> Request {
    info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
    req
}

fn log_response(resp: Response) -> Response {
    debug!(status = %resp.status(), "Response sent");
    resp
}

#[instrument]
async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        message: "pong".to_string(),
    })
}

#[instrument(skip(store))]
async fn create_game(
    State(store): State<AppState>,
) -> Result<(StatusCode, Json<CreateGameResponse>), ApiError> {
    let game_id = store.create()?;
    let game = store
        .get(&game_id)
        .ok_or_else(|| ApiError::internal("game vanished after creation"))?;
    Ok((
        StatusCode::CREATED,
        Json(CreateGameResponse {
            game_id,
            board: *game.board(),
        }),
    ))
}

#[instrument(skip(store))]
async fn list_games(State(store): State<AppState>) -> Json<GameListResponse> {
    Json(GameListResponse {
        game_ids: store.list(),
    })
}

#[instrument(skip(store))]
async fn get_game(
    State(store): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GameResponse>, ApiError> {
    let id = GameId::from(id);
    let game = store.get(&id).ok_or_else(|| ApiError::not_found(&id))?;
    Ok(Json(GameResponse::from_game(id, &game)))
}

#[instrument(skip(store))]
async fn move_piece(
    State(store): State<AppState>,
    Path(id): Path<String>,
    request: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<GameResponse>, ApiError> {
    let Json(request) = request?;
    let id = GameId::from(id);
    let game = store.make_move(&id, request.from, request.to)?;
    Ok(Json(GameResponse::from_game(id, &game)))
}

#[instrument(skip(store))]
async fn delete_game(
    State(store): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = GameId::from(id);
    store.remove(&id).ok_or_else(|| ApiError::not_found(&id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// An error ready to be sent as `{"error": ...}` with a status code.
#[derive(Debug, Clone, derive_more::Display)]
#[display("{status}: {message}")]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn not_found(id: &GameId) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("game not found: {id}"),
        }
    }

    fn internal(message: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.to_string(),
        }
    }

}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: format!("invalid move request: {}", rejection.body_text()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match &err.kind {
            StoreErrorKind::GameNotFound(_) => StatusCode::NOT_FOUND,
            StoreErrorKind::InvalidMove(_) => StatusCode::BAD_REQUEST,
            StoreErrorKind::RandomnessUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            StoreErrorKind::CapacityExceeded(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self {
            status,
            message: err.kind.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, message = %self.message, "Request failed");
        } else {
            warn!(status = %self.status, message = %self.message, "Request rejected");
        }
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}
