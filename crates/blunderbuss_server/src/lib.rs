//! Game server for blunderbuss.
//!
//! # Architecture
//!
//! - **Store**: [`GameStore`], a concurrent registry of independently locked
//!   game sessions
//! - **API**: axum routes that call into the store and serialize the results
//! - **WebSocket**: an echo channel at `/ws`
//! - **Config**: [`ServerConfig`] and [`StoreConfig`], loadable from TOML
//!
//! # Example
//!
//! ```
//! use blunderbuss_board::Coordinate;
//! use blunderbuss_server::{GameStore, StoreConfig};
//!
//! let store = GameStore::new(StoreConfig::default());
//! let id = store.create().unwrap();
//! let game = store
//!     .make_move(&id, Coordinate::new(6, 0), Coordinate::new(4, 0))
//!     .unwrap();
//! assert_eq!(game.turn_number(), 2);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod api;
mod config;
mod error;
mod id;
mod server;
mod store;
pub mod wire;
mod ws;

pub use api::{ApiError, AppState, router};
pub use config::{ConfigError, ServerConfig, StoreConfig};
pub use error::{StoreError, StoreErrorKind};
pub use id::{EntropySource, GAME_ID_BYTES, GameId, OsEntropy};
pub use server::{run, spawn_sweeper};
pub use store::{Game, GameStore};
pub use ws::echo;
