//! Client state.

use super::input::parse_move;
use crate::ConnectionStatus;
use blunderbuss_board::{Board, Coordinate};
use blunderbuss_server::GameId;
use blunderbuss_server::wire::{CreateGameResponse, GameResponse};
use tracing::debug;

/// Longest pending move, four digits.
const MOVE_INPUT_LEN: usize = 4;

/// Main application state.
#[derive(Debug, Clone, Default)]
pub struct App {
    game_id: Option<GameId>,
    board: Option<Board>,
    turn_number: u32,
    move_input: String,
    last_message: Option<String>,
    last_error: Option<String>,
    connection: ConnectionStatus,
}

impl App {
    /// Creates an application with no game.
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the current game.
    pub fn game_id(&self) -> Option<&GameId> {
        self.game_id.as_ref()
    }

    /// Board of the current game.
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// Turn number of the current game, 0 before any game.
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Digits typed so far for the next move.
    pub fn move_input(&self) -> &str {
        &self.move_input
    }

    /// Last informational message from the server.
    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }

    /// Last error, cleared by the next user action that succeeds.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// State of the echo connection.
    pub fn connection(&self) -> ConnectionStatus {
        self.connection
    }

    /// Records a change in the echo connection.
    pub fn set_connection(&mut self, status: ConnectionStatus) {
        debug!(%status, "Echo connection status");
        self.connection = status;
    }

    /// Switches to a freshly created game.
    pub fn game_created(&mut self, created: CreateGameResponse) {
        debug!(game_id = %created.game_id, "Switching to new game");
        self.last_message = Some(format!("created game {}", created.game_id));
        self.game_id = Some(created.game_id);
        self.board = Some(created.board);
        self.turn_number = 1;
        self.move_input.clear();
        self.last_error = None;
    }

    /// Installs the latest server state for the current game.
    ///
    /// Responses for any other game are ignored. The last error is kept, so
    /// background polling does not hide it.
    pub fn game_updated(&mut self, game: GameResponse) {
        if self.game_id.as_ref() != Some(&game.game_id) {
            debug!(game_id = %game.game_id, "Ignoring state for another game");
            return;
        }
        self.board = Some(game.board);
        self.turn_number = game.turn_number;
    }

    /// Records a server message.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.last_message = Some(message.into());
    }

    /// Records an error for display.
    pub fn set_error(&mut self, error: impl Into<String>) {
        self.last_error = Some(error.into());
    }

    /// Drops the displayed error.
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Appends a digit to the pending move, ignoring input past four digits.
    pub fn push_digit(&mut self, digit: u8) {
        if self.move_input.len() < MOVE_INPUT_LEN && digit < 10 {
            self.move_input.push(char::from(b'0' + digit));
        }
    }

    /// Removes the last pending digit.
    pub fn backspace(&mut self) {
        self.move_input.pop();
    }

    /// Takes the pending move, clearing the input.
    ///
    /// # Errors
    ///
    /// Returns a message if there is no game or the input is not four digits 0-7.
    pub fn take_move(&mut self) -> Result<(GameId, Coordinate, Coordinate), String> {
        let input = std::mem::take(&mut self.move_input);
        let id = self
            .game_id
            .clone()
            .ok_or_else(|| "no game started yet, press g".to_string())?;
        let (from, to) =
            parse_move(&input).ok_or_else(|| format!("enter a move as four digits 0-7, got {input:?}"))?;
        Ok((id, from, to))
    }
}
