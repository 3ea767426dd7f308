//! Keyboard mapping and move entry parsing.

use blunderbuss_board::Coordinate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Something the user asked the client to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create a new game and switch to it.
    CreateGame,
    /// Re-fetch the current game.
    Refresh,
    /// Ping the server.
    Ping,
    /// Append a digit to the pending move.
    Digit(u8),
    /// Delete the last pending digit.
    Backspace,
    /// Send the pending move.
    SubmitMove,
    /// Leave the client.
    Quit,
}

/// Maps a key press to an action.
pub fn action_for(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('g') => Some(Action::CreateGame),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Char('p') => Some(Action::Ping),
        KeyCode::Char(c) => c.to_digit(10).map(|d| Action::Digit(d as u8)),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Enter => Some(Action::SubmitMove),
        _ => None,
    }
}

/// Parses four digits `fx fy tx ty` into a (from, to) pair.
///
/// Whitespace is ignored. Each digit must be 0-7.
pub fn parse_move(input: &str) -> Option<(Coordinate, Coordinate)> {
    let digits: Vec<i32> = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_digit(8).map(|d| d as i32))
        .collect::<Option<_>>()?;

    match digits.as_slice() {
        [fx, fy, tx, ty] => Some((Coordinate::new(*fx, *fy), Coordinate::new(*tx, *ty))),
        _ => None,
    }
}
