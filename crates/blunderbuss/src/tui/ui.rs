//! Stateless UI rendering.

use super::app::App;
use blunderbuss_board::{Board, Team};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const LIGHT_SQUARE: Color = Color::Indexed(250);
const DARK_SQUARE: Color = Color::Indexed(240);

/// Renders the whole screen.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // Title
            Constraint::Length(11), // Board
            Constraint::Min(7),     // Status
            Constraint::Length(1),  // Help
        ])
        .split(frame.area());

    let title = Paragraph::new("blunderbuss")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    draw_board(frame, chunks[1], app.board());
    draw_status(frame, chunks[2], app);

    let help = Paragraph::new("[g] new game  [r] refresh  [p] ping  [0-7 x4, Enter] move  [q] quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[3]);
}

fn draw_board(frame: &mut Frame, area: Rect, board: Option<&Board>) {
    let block = Block::default().title("Board").borders(Borders::ALL);
    let Some(board) = board else {
        let empty = Paragraph::new("no game started yet")
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let mut lines: Vec<Line> = board_lines(board);
    let files: String = (0..8).map(|file| format!(" {file} ")).collect();
    lines.push(Line::from(format!("  {files}")));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// One line per rank, rank 0 at the top, each square three cells wide.
fn board_lines(board: &Board) -> Vec<Line<'static>> {
    board
        .squares()
        .iter()
        .enumerate()
        .map(|(rank, row)| {
            let mut spans = vec![Span::raw(format!("{rank} "))];
            spans.extend(row.iter().enumerate().map(|(file, piece)| {
                let bg = if (rank + file) % 2 == 0 {
                    LIGHT_SQUARE
                } else {
                    DARK_SQUARE
                };
                let fg = match piece.team {
                    Team::Black => Color::Black,
                    _ => Color::White,
                };
                Span::styled(
                    format!(" {} ", piece.glyph()),
                    Style::default().bg(bg).fg(fg).add_modifier(Modifier::BOLD),
                )
            }));
            Line::from(spans)
        })
        .collect()
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = Vec::new();
    match app.game_id() {
        Some(id) => {
            lines.push(Line::from(format!("Game: {id}")));
            lines.push(Line::from(format!("Turn: {}", app.turn_number())));
        }
        None => lines.push(Line::from("Game: none")),
    }
    lines.push(Line::from(format!("Server: {}", app.connection())));
    lines.push(Line::from(format!("Move: {}", app.move_input())));
    if let Some(message) = app.last_message() {
        lines.push(Line::from(format!("Last: {message}")));
    }
    if let Some(error) = app.last_error() {
        lines.push(Line::from(Span::styled(
            format!("Error: {error}"),
            Style::default().fg(Color::Red),
        )));
    }

    let status = Paragraph::new(lines)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().title("Status").borders(Borders::ALL));
    frame.render_widget(status, area);
}
