//! blunderbuss - a minimal networked chess-like game.
//!
//! This crate holds the `blunderbuss` binary's client side: a typed HTTP
//! client for the game server, a WebSocket client for its echo channel and
//! a terminal client built on both. The server
//! itself lives in [`blunderbuss_server`] and the board rules in
//! [`blunderbuss_board`].
//!
//! # Example
//!
//! ```no_run
//! use blunderbuss::GameClient;
//! use blunderbuss_board::Coordinate;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = GameClient::new("http://localhost:8080");
//! let created = client.create_game().await?;
//! let game = client
//!     .make_move(&created.game_id, Coordinate::new(6, 0), Coordinate::new(4, 0))
//!     .await?;
//! assert_eq!(game.turn_number, 2);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod echo;
pub mod tui;

pub use client::{ClientError, GameClient};
pub use echo::{ConnectionStatus, EchoChannel};
pub use tui::run_tui;
