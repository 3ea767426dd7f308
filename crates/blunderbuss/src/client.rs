//! HTTP client for the game server.

use blunderbuss_board::Coordinate;
use blunderbuss_server::GameId;
use blunderbuss_server::wire::{
    CreateGameResponse, ErrorBody, GameResponse, MoveRequest,
};
use derive_more::{Display, Error};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

/// Client error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Client error: {} at {}:{}", message, file, line)]
pub struct ClientError {
    /// Error message, the server's own text when it sent one.
    pub message: String,
    /// HTTP status, if the server answered.
    pub status: Option<u16>,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ClientError {
    /// Creates a new client error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>, status: Option<u16>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            status,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// True if the server answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

impl From<reqwest::Error> for ClientError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        Self::new(format!("HTTP request failed: {}", err), status)
    }
}

/// Typed client for the game server's REST API.
#[derive(Debug, Clone)]
pub struct GameClient {
    base_url: String,
    client: reqwest::Client,
}

impl GameClient {
    /// Creates a client for the server at `base_url`, e.g. `http://localhost:8080`.
    #[instrument(skip(base_url))]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!(base_url = %base_url, "Creating game client");
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Returns the server base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the absolute URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// URL of the server's WebSocket echo channel.
    pub fn ws_url(&self) -> String {
        let url = self.url("/ws");
        if let Some(rest) = url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            url
        }
    }

    /// Creates a new game.
    #[instrument(skip(self))]
    pub async fn create_game(&self) -> Result<CreateGameResponse, ClientError> {
        let response = self.client.post(self.url("/games")).send().await?;
        let created: CreateGameResponse = decode(response).await?;
        info!(game_id = %created.game_id, "Game created");
        Ok(created)
    }

    /// Fetches a game's current state.
    #[instrument(skip(self))]
    pub async fn get_game(&self, id: &GameId) -> Result<GameResponse, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/games/{id}")))
            .send()
            .await?;
        decode(response).await
    }

    /// Sends a move and returns the game after it.
    #[instrument(skip(self))]
    pub async fn make_move(
        &self,
        id: &GameId,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<GameResponse, ClientError> {
        let response = self
            .client
            .post(self.url(&format!("/games/{id}/move")))
            .json(&MoveRequest::new(from, to))
            .send()
            .await?;
        let game: GameResponse = decode(response).await?;
        info!(game_id = %id, turn_number = game.turn_number, "Move accepted");
        Ok(game)
    }
}

/// Decodes a success body, or turns the server's `{"error": ...}` into a [`ClientError`].
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    debug!(status = %status, "Received response");

    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let text = response.text().await?;
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    warn!(status = %status, message = %message, "Server returned error");
    Err(ClientError::new(message, Some(status.as_u16())))
}
