//! Terminal client.

mod app;
mod input;
mod ui;

pub use app::App;
pub use input::{Action, action_for, parse_move};

use crate::{ConnectionStatus, EchoChannel, GameClient};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

/// How often the current game is re-fetched.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// How long to wait for a key before redrawing.
const INPUT_TIMEOUT: Duration = Duration::from_millis(100);

/// Runs the terminal client against the server at `server_url`.
pub async fn run_tui(server_url: String) -> Result<()> {
    // Log to a file so output does not corrupt the screen
    let log_file = std::fs::File::create("blunderbuss_tui.log")?;
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init();
    if let Err(err) = subscriber {
        warn!(error = %err, "Keeping existing tracing subscriber");
    }

    info!(server_url = %server_url, "Starting terminal client");
    let client = GameClient::new(server_url);

    enable_raw_mode()?;
    let mut terminal = match enter_screen() {
        Ok(terminal) => terminal,
        Err(err) => {
            disable_raw_mode()?;
            return Err(err.into());
        }
    };

    let res = run_loop(&mut terminal, &client).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Client loop error");
    }
    res
}

fn enter_screen() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

#[instrument(skip_all, fields(base_url = %client.base_url()))]
async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    client: &GameClient,
) -> Result<()> {
    let mut app = App::new();
    let mut echo = connect_echo(&mut app, client).await;
    let mut last_poll = Instant::now();

    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        if event::poll(INPUT_TIMEOUT)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match action_for(key) {
                        Some(Action::Quit) => {
                            info!("User quit");
                            if let Some(channel) = echo.take() {
                                if let Err(e) = channel.close().await {
                                    debug!(error = %e, "Echo channel already closed");
                                }
                            }
                            return Ok(());
                        }
                        Some(action) => handle_action(&mut app, client, &mut echo, action).await,
                        None => {}
                    }
                }
            }
        }

        if last_poll.elapsed() >= POLL_INTERVAL {
            refresh(&mut app, client).await;
            last_poll = Instant::now();
        }
    }
}

/// Opens the echo channel, recording the outcome in `app`.
#[instrument(skip_all)]
pub async fn connect_echo(app: &mut App, client: &GameClient) -> Option<EchoChannel> {
    app.set_connection(ConnectionStatus::Connecting);
    match EchoChannel::connect(&client.ws_url()).await {
        Ok(channel) => {
            app.set_connection(ConnectionStatus::Connected);
            Some(channel)
        }
        Err(e) => {
            app.set_connection(ConnectionStatus::Error);
            app.set_error(format!("connect: {}", e.message));
            None
        }
    }
}

/// Performs one user action, recording the outcome in `app`.
///
/// `Ping` goes over the echo channel, reconnecting first if it is down.
#[instrument(skip(app, client, echo))]
pub async fn handle_action(
    app: &mut App,
    client: &GameClient,
    echo: &mut Option<EchoChannel>,
    action: Action,
) {
    match action {
        Action::CreateGame => match client.create_game().await {
            Ok(created) => app.game_created(created),
            Err(e) => app.set_error(format!("create game: {}", e.message)),
        },
        Action::Refresh => {
            if refresh(app, client).await {
                app.clear_error();
            }
        }
        Action::Ping => ping(app, client, echo).await,
        Action::Digit(d) => app.push_digit(d),
        Action::Backspace => app.backspace(),
        Action::SubmitMove => match app.take_move() {
            Ok((id, from, to)) => match client.make_move(&id, from, to).await {
                Ok(game) => {
                    app.set_message(format!("moved {from} -> {to}"));
                    app.game_updated(game);
                    app.clear_error();
                }
                Err(e) => app.set_error(format!("move: {}", e.message)),
            },
            Err(message) => app.set_error(message),
        },
        Action::Quit => {}
    }
}

async fn ping(app: &mut App, client: &GameClient, echo: &mut Option<EchoChannel>) {
    if echo.is_none() {
        *echo = connect_echo(app, client).await;
    }
    let Some(channel) = echo.as_mut() else {
        return;
    };
    match channel.send_text("ping").await {
        Ok(reply) => {
            app.set_message(format!("echo: {reply}"));
            app.clear_error();
        }
        Err(e) => {
            warn!(error = %e, "Echo failed");
            app.set_connection(ConnectionStatus::Disconnected);
            app.set_error(format!("ping: {}", e.message));
            *echo = None;
        }
    }
}

/// Re-fetches the current game. Returns true if the server answered.
async fn refresh(app: &mut App, client: &GameClient) -> bool {
    let Some(id) = app.game_id().cloned() else {
        return false;
    };
    debug!(game_id = %id, "Polling game");
    match client.get_game(&id).await {
        Ok(game) => {
            app.game_updated(game);
            true
        }
        Err(e) => {
            warn!(error = %e, "Failed to refresh game");
            app.set_error(format!("refresh: {}", e.message));
            false
        }
    }
}
