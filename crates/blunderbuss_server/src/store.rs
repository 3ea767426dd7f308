//! Concurrent registry of game sessions.
//!
//! Locking is two-level. The directory lock (`RwLock`) guards the id → entry
//! map and is held only for the insert, lookup or removal itself. Each entry
//! carries its own `Mutex` guarding that game's board and turn number. The
//! entry lock is never taken while the directory lock is held, so a slow move
//! in one game never holds up creation of, or moves in, any other game.

use crate::{EntropySource, GAME_ID_BYTES, GameId, OsEntropy, StoreConfig, StoreError, StoreErrorKind};
use blunderbuss_board::{Board, Coordinate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Snapshot of one game's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    board: Board,
    turn_number: u32,
}

impl Game {
    /// Creates a game at the starting position on turn 1.
    pub fn new() -> Self {
        Self {
            board: Board::default_position(),
            turn_number: 1,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the turn number, starting at 1 and incremented per successful move.
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

/// A stored game with its own lock.
///
/// `last_touched` sits outside the mutex so eviction can read it under the
/// directory lock without taking entry locks.
#[derive(Debug)]
struct GameEntry {
    game: Mutex<Game>,
    last_touched: AtomicU64,
}

impl GameEntry {
    fn new(game: Game, now_ms: u64) -> Self {
        Self {
            game: Mutex::new(game),
            last_touched: AtomicU64::new(now_ms),
        }
    }

    /// A poisoned lock still guards a consistent game: state is only
    /// replaced after the board engine has returned successfully.
    fn lock(&self) -> MutexGuard<'_, Game> {
        self.game.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn touch(&self, now_ms: u64) {
        self.last_touched.fetch_max(now_ms, Ordering::Relaxed);
    }

    fn idle_since(&self) -> u64 {
        self.last_touched.load(Ordering::Relaxed)
    }
}

/// Registry mapping game ids to independently locked game sessions.
///
/// Construct one per process and share it as `Arc<GameStore>`.
pub struct GameStore {
    games: RwLock<HashMap<GameId, Arc<GameEntry>>>,
    config: StoreConfig,
    entropy: Box<dyn EntropySource>,
    epoch: Instant,
}

impl std::fmt::Debug for GameStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameStore")
            .field("games", &self.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GameStore {
    /// Creates an empty store drawing ids from the operating system.
    #[instrument]
    pub fn new(config: StoreConfig) -> Self {
        Self::with_entropy(config, OsEntropy)
    }

    /// Creates an empty store with a custom entropy source.
    #[instrument(skip(entropy))]
    pub fn with_entropy(config: StoreConfig, entropy: impl EntropySource + 'static) -> Self {
        info!(
            max_games = ?config.max_games(),
            idle_ttl_secs = ?config.idle_ttl_secs(),
            "Creating game store"
        );
        Self {
            games: RwLock::new(HashMap::new()),
            config,
            entropy: Box::new(entropy),
            epoch: Instant::now(),
        }
    }

    /// Returns the store's policy.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Creates a game at the starting position and returns its id.
    ///
    /// # Errors
    ///
    /// - [`StoreErrorKind::RandomnessUnavailable`] if the entropy source fails.
    /// - [`StoreErrorKind::CapacityExceeded`] if `max_games` games are stored.
    #[instrument(skip(self))]
    pub fn create(&self) -> Result<GameId, StoreError> {
        let id = self.generate_id()?;
        let game = Game::new();
        let entry = Arc::new(GameEntry::new(game, self.now_ms()));

        {
            let mut games = self.write_games();
            if let Some(max) = *self.config.max_games() {
                if games.len() >= max {
                    warn!(max, "Game store at capacity");
                    return Err(StoreError::new(StoreErrorKind::CapacityExceeded(max)));
                }
            }
            games.insert(id.clone(), entry);
        }

        info!(game_id = %id, "Created game");
        debug!(game_id = %id, board = %game.board(), "Initial board");
        Ok(id)
    }

    /// Returns a copy of the game's current state, or `None` if the id is unknown.
    #[instrument(skip(self))]
    pub fn get(&self, id: &GameId) -> Option<Game> {
        let Some(entry) = self.lookup(id) else {
            debug!(game_id = %id, "Game not found");
            return None;
        };
        let game = *entry.lock();
        entry.touch(self.now_ms());
        Some(game)
    }

    /// Moves the piece on `from` to `to` and returns the game after the move.
    ///
    /// The game's lock is held for the whole board engine call, so moves on
    /// the same game are serialized while moves on different games run in
    /// parallel. A rejected move leaves the game untouched.
    ///
    /// # Errors
    ///
    /// - [`StoreErrorKind::GameNotFound`] if the id is unknown.
    /// - [`StoreErrorKind::InvalidMove`] carrying the engine's error unchanged.
    #[instrument(skip(self))]
    pub fn make_move(
        &self,
        id: &GameId,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<Game, StoreError> {
        let entry = self.lookup(id).ok_or_else(|| {
            debug!(game_id = %id, "Move on unknown game");
            StoreError::new(StoreErrorKind::GameNotFound(id.clone()))
        })?;

        let mut game = entry.lock();
        entry.touch(self.now_ms());
        let board = game.board.apply_move(from, to).map_err(|e| {
            warn!(game_id = %id, error = %e, "Move rejected");
            StoreError::from(e)
        })?;
        game.board = board;
        game.turn_number += 1;

        info!(game_id = %id, turn_number = game.turn_number, "Move applied");
        Ok(*game)
    }

    /// Removes a game and returns its final state.
    #[instrument(skip(self))]
    pub fn remove(&self, id: &GameId) -> Option<Game> {
        let entry = self.write_games().remove(id)?;
        info!(game_id = %id, "Removed game");
        let game = *entry.lock();
        Some(game)
    }

    /// Lists stored game ids in sorted order.
    #[instrument(skip(self))]
    pub fn list(&self) -> Vec<GameId> {
        let mut ids: Vec<GameId> = self.read_games().keys().cloned().collect();
        ids.sort();
        debug!(count = ids.len(), "Listed games");
        ids
    }

    /// Number of stored games.
    pub fn len(&self) -> usize {
        self.read_games().len()
    }

    /// True if no games are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes games untouched for longer than the configured idle TTL.
    ///
    /// Creating a game, reading it or attempting a move on it (accepted or
    /// rejected) all count as a touch.
    ///
    /// Returns how many games were evicted. Does nothing without a TTL. A
    /// move already in flight on an evicted game completes against the
    /// detached entry and is not visible afterwards.
    #[instrument(skip(self, now))]
    pub fn evict_idle(&self, now: Instant) -> usize {
        let Some(ttl) = self.config.idle_ttl() else {
            return 0;
        };
        let now_ms = self.ms_since_epoch(now);
        let ttl_ms = duration_ms(ttl);

        let mut games = self.write_games();
        let before = games.len();
        games.retain(|_, entry| now_ms.saturating_sub(entry.idle_since()) <= ttl_ms);
        let evicted = before - games.len();

        if evicted > 0 {
            info!(evicted, remaining = games.len(), "Evicted idle games");
        }
        evicted
    }

    /// Fetches the entry under the directory read lock, releasing it on return.
    fn lookup(&self, id: &GameId) -> Option<Arc<GameEntry>> {
        self.read_games().get(id).cloned()
    }

    fn read_games(&self) -> std::sync::RwLockReadGuard<'_, HashMap<GameId, Arc<GameEntry>>> {
        self.games.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_games(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<GameId, Arc<GameEntry>>> {
        self.games.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn generate_id(&self) -> Result<GameId, StoreError> {
        let mut bytes = [0u8; GAME_ID_BYTES];
        self.entropy.fill(&mut bytes).map_err(|e| {
            warn!(error = %e, "Entropy source failed");
            StoreError::new(StoreErrorKind::RandomnessUnavailable(e))
        })?;
        Ok(GameId::from_bytes(&bytes))
    }

    fn now_ms(&self) -> u64 {
        self.ms_since_epoch(Instant::now())
    }

    fn ms_since_epoch(&self, at: Instant) -> u64 {
        duration_ms(at.saturating_duration_since(self.epoch))
    }
}

impl Default for GameStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
