//! JSON request and response bodies shared by the server and its clients.

use crate::{Game, GameId};
use blunderbuss_board::{Board, Coordinate};
use serde::{Deserialize, Serialize};

/// Body of `POST /games/{id}/move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct MoveRequest {
    /// Square the piece moves from.
    pub from: Coordinate,
    /// Square the piece moves to.
    pub to: Coordinate,
}

/// Response to `POST /games`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameResponse {
    /// Id of the new game.
    pub game_id: GameId,
    /// Starting board.
    pub board: Board,
}

/// Response to `GET /games/{id}` and `POST /games/{id}/move`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    /// Game id.
    pub game_id: GameId,
    /// Current turn number.
    pub turn_number: u32,
    /// Current board.
    pub board: Board,
}

impl GameResponse {
    /// Builds the response from a store snapshot.
    pub fn from_game(game_id: GameId, game: &Game) -> Self {
        Self {
            game_id,
            turn_number: game.turn_number(),
            board: *game.board(),
        }
    }
}

/// Response to `GET /games`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameListResponse {
    /// Ids of every stored game.
    pub game_ids: Vec<GameId>,
}

/// Response to `GET /ping`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingResponse {
    /// Always `"pong"`.
    pub message: String,
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable reason.
    pub error: String,
}
