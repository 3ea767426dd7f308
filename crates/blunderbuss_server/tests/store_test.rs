//! Tests for the concurrent game store.

use blunderbuss_board::{Board, Coordinate, MoveError, Piece, PieceKind, Team};
use blunderbuss_server::{
    EntropySource, GameId, GameStore, StoreConfig, StoreErrorKind,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

fn at(x: i32, y: i32) -> Coordinate {
    Coordinate::new(x, y)
}

fn store() -> GameStore {
    GameStore::new(StoreConfig::default())
}

struct BrokenEntropy;

impl EntropySource for BrokenEntropy {
    fn fill(&self, _dest: &mut [u8]) -> Result<(), String> {
        Err("entropy pool drained".to_string())
    }
}

struct CountingEntropy(AtomicU64);

impl EntropySource for CountingEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<(), String> {
        let n = self.0.fetch_add(1, Ordering::SeqCst);
        dest.copy_from_slice(&n.to_be_bytes());
        Ok(())
    }
}

#[test]
fn test_get_after_create_is_initial_state() {
    let store = store();
    let id = store.create().expect("Create failed");
    let game = store.get(&id).expect("Game missing");
    assert_eq!(game.turn_number(), 1);
    assert_eq!(*game.board(), Board::default_position());
}

#[test]
fn test_game_id_is_sixteen_hex_chars() {
    let id = store().create().expect("Create failed");
    assert_eq!(id.as_str().len(), 16);
    assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn test_ids_come_from_entropy_source() {
    let store = GameStore::with_entropy(StoreConfig::default(), CountingEntropy(AtomicU64::new(0)));
    let first = store.create().expect("Create failed");
    let second = store.create().expect("Create failed");
    assert_eq!(first.as_str(), "0000000000000000");
    assert_eq!(second.as_str(), "0000000000000001");
}

#[test]
fn test_get_unknown_id_is_none() {
    let store = store();
    store.create().expect("Create failed");
    assert!(store.get(&GameId::from("deadbeefdeadbeef")).is_none());
}

#[test]
fn test_move_unknown_id_is_not_found() {
    let store = store();
    let id = store.create().expect("Create failed");

    let err = store
        .make_move(&GameId::from("nope"), at(6, 0), at(4, 0))
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.kind, StoreErrorKind::GameNotFound(GameId::from("nope")));

    let other = store.get(&id).expect("Game missing");
    assert_eq!(other.turn_number(), 1);
    assert_eq!(*other.board(), Board::default_position());
}

#[test]
fn test_scenario_pawn_advance() {
    let store = store();
    let id = store.create().expect("Create failed");

    let before = store.get(&id).expect("Game missing");
    assert_eq!(before.turn_number(), 1);

    store
        .make_move(&id, at(6, 0), at(4, 0))
        .expect("Move failed");

    let after = store.get(&id).expect("Game missing");
    assert_eq!(after.turn_number(), 2);
    assert_eq!(after.board().piece_at(at(6, 0)).unwrap(), Piece::EMPTY);
    assert_eq!(
        after.board().piece_at(at(4, 0)).unwrap(),
        Piece {
            kind: PieceKind::Pawn,
            team: Team::White,
            move_count: 1,
        }
    );
}

#[test]
fn test_make_move_returns_new_state() {
    let store = store();
    let id = store.create().expect("Create failed");
    let game = store
        .make_move(&id, at(1, 3), at(3, 3))
        .expect("Move failed");
    assert_eq!(game, store.get(&id).expect("Game missing"));
}

#[test]
fn test_rejected_move_leaves_state_untouched() {
    let store = store();
    let id = store.create().expect("Create failed");

    let err = store.make_move(&id, at(6, 0), at(7, 0)).unwrap_err();
    assert!(err.is_invalid_move());
    assert!(matches!(
        err.kind,
        StoreErrorKind::InvalidMove(MoveError::NoPieceOrInvalidDirection(_))
    ));

    let err = store.make_move(&id, at(6, 0), at(9, 0)).unwrap_err();
    assert_eq!(
        err.kind,
        StoreErrorKind::InvalidMove(MoveError::OutOfBounds(at(9, 0)))
    );

    let game = store.get(&id).expect("Game missing");
    assert_eq!(game.turn_number(), 1);
    assert_eq!(*game.board(), Board::default_position());
}

#[test]
fn test_entropy_failure_is_reported() {
    let store = GameStore::with_entropy(StoreConfig::default(), BrokenEntropy);
    let err = store.create().unwrap_err();
    assert_eq!(
        err.kind,
        StoreErrorKind::RandomnessUnavailable("entropy pool drained".to_string())
    );
    assert!(store.is_empty());
}

#[test]
fn test_concurrent_creates_yield_distinct_games() {
    let store = store();
    let ids: Vec<GameId> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..100)
            .map(|_| s.spawn(|| store.create().expect("Create failed")))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("Thread panicked"))
            .collect()
    });

    let unique: HashSet<&GameId> = ids.iter().collect();
    assert_eq!(unique.len(), 100);
    assert_eq!(store.len(), 100);
    for id in &ids {
        let game = store.get(id).expect("Game missing");
        assert_eq!(game.turn_number(), 1);
        assert_eq!(*game.board(), Board::default_position());
    }
}

#[test]
fn test_concurrent_moves_on_different_games_do_not_mix() {
    let store = store();
    let white_game = store.create().expect("Create failed");
    let black_game = store.create().expect("Create failed");

    std::thread::scope(|s| {
        s.spawn(|| {
            for file in 0..8 {
                store
                    .make_move(&white_game, at(6, file), at(5, file))
                    .expect("White move failed");
            }
        });
        s.spawn(|| {
            for file in 0..8 {
                store
                    .make_move(&black_game, at(1, file), at(2, file))
                    .expect("Black move failed");
            }
        });
    });

    let white = store.get(&white_game).expect("Game missing");
    let black = store.get(&black_game).expect("Game missing");
    assert_eq!(white.turn_number(), 9);
    assert_eq!(black.turn_number(), 9);
    for file in 0..8 {
        assert_eq!(white.board().piece_at(at(5, file)).unwrap().team, Team::White);
        assert!(white.board().piece_at(at(2, file)).unwrap().is_empty());
        assert_eq!(
            white.board().piece_at(at(1, file)).unwrap(),
            Piece::new(PieceKind::Pawn, Team::Black)
        );
        assert_eq!(black.board().piece_at(at(2, file)).unwrap().team, Team::Black);
        assert!(black.board().piece_at(at(5, file)).unwrap().is_empty());
        assert_eq!(
            black.board().piece_at(at(6, file)).unwrap(),
            Piece::new(PieceKind::Pawn, Team::White)
        );
    }
}

#[test]
fn test_concurrent_moves_on_same_game_lose_no_updates() {
    const ROUNDS: i32 = 50;
    let store = store();
    let id = store.create().expect("Create failed");

    // Each thread shuttles its own back-rank piece, so every move succeeds
    // regardless of interleaving.
    std::thread::scope(|s| {
        for (home, away) in [(0, 3), (7, 4)] {
            for file in 0..8 {
                let store = &store;
                let id = &id;
                s.spawn(move || {
                    for round in 0..ROUNDS {
                        let (from, to) = if round % 2 == 0 { (home, away) } else { (away, home) };
                        store
                            .make_move(id, at(from, file), at(to, file))
                            .expect("Move failed");
                    }
                });
            }
        }
    });

    let game = store.get(&id).expect("Game missing");
    assert_eq!(game.turn_number(), 1 + 16 * ROUNDS as u32);
    assert_eq!(*game.board(), Board::default_position());
}

#[test]
fn test_reads_during_moves_see_whole_games() {
    const ROUNDS: i32 = 200;
    let store = store();
    let id = store.create().expect("Create failed");
    let done = std::sync::atomic::AtomicBool::new(false);

    std::thread::scope(|s| {
        let movers: Vec<_> = (0..8)
            .map(|file| {
                let (store, id) = (&store, &id);
                s.spawn(move || {
                    for round in 0..ROUNDS {
                        let (from, to) = if round % 2 == 0 { (7, 4) } else { (4, 7) };
                        store
                            .make_move(id, at(from, file), at(to, file))
                            .expect("Move failed");
                    }
                })
            })
            .collect();

        for _ in 0..4 {
            let (store, id, done) = (&store, &id, &done);
            s.spawn(move || {
                let mut last_turn = 0;
                loop {
                    let finished = done.load(Ordering::Acquire);
                    let game = store.get(id).expect("Game missing");
                    assert!(game.turn_number() >= last_turn);
                    last_turn = game.turn_number();
                    let pieces = game.board().squares().iter().flatten().filter(|p| !p.is_empty()).count();
                    assert_eq!(pieces, 32);
                    if finished {
                        break;
                    }
                }
            });
        }

        for mover in movers {
            mover.join().expect("Mover panicked");
        }
        done.store(true, Ordering::Release);
    });

    let game = store.get(&id).expect("Game missing");
    assert_eq!(game.turn_number(), 1 + 8 * ROUNDS as u32);
    assert_eq!(*game.board(), Board::default_position());
}

#[test]
fn test_rejected_move_counts_as_activity() {
    let store = GameStore::new(StoreConfig::new(None, Some(1)));
    let id = store.create().expect("Create failed");

    std::thread::sleep(Duration::from_millis(1500));
    let err = store.make_move(&id, at(4, 4), at(3, 4)).unwrap_err();
    assert!(err.is_invalid_move());

    assert_eq!(store.evict_idle(Instant::now()), 0);
    assert!(store.get(&id).is_some());
}

#[test]
fn test_capacity_limit() {
    let store = GameStore::new(StoreConfig::new(Some(2), None));
    store.create().expect("Create failed");
    store.create().expect("Create failed");
    let err = store.create().unwrap_err();
    assert_eq!(err.kind, StoreErrorKind::CapacityExceeded(2));
    assert_eq!(store.len(), 2);
}

#[test]
fn test_remove_frees_capacity() {
    let store = GameStore::new(StoreConfig::new(Some(1), None));
    let id = store.create().expect("Create failed");
    let removed = store.remove(&id).expect("Game missing");
    assert_eq!(removed.turn_number(), 1);
    assert!(store.get(&id).is_none());
    assert!(store.remove(&id).is_none());
    store.create().expect("Create after remove failed");
}

#[test]
fn test_list_returns_every_id() {
    let store = store();
    let mut ids: Vec<GameId> = (0..5).map(|_| store.create().expect("Create failed")).collect();
    ids.sort();
    assert_eq!(store.list(), ids);
}

#[test]
fn test_evict_idle_without_ttl_keeps_everything() {
    let store = store();
    store.create().expect("Create failed");
    assert_eq!(store.evict_idle(Instant::now() + Duration::from_secs(86_400)), 0);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_evict_idle_removes_stale_games() {
    let store = GameStore::new(StoreConfig::new(None, Some(60)));
    let id = store.create().expect("Create failed");

    assert_eq!(store.evict_idle(Instant::now()), 0);
    assert!(store.get(&id).is_some());

    assert_eq!(store.evict_idle(Instant::now() + Duration::from_secs(120)), 1);
    assert!(store.get(&id).is_none());
    assert!(store.is_empty());
}
