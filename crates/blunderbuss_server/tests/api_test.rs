//! Tests for the HTTP routes, driven through the router without a socket.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use blunderbuss_board::{Board, Coordinate, PieceKind, Team};
use blunderbuss_server::wire::{
    CreateGameResponse, ErrorBody, GameListResponse, GameResponse, MoveRequest, PingResponse,
};
use blunderbuss_server::{EntropySource, GameStore, StoreConfig, router};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    router(Arc::new(GameStore::new(StoreConfig::default())))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Request failed");
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("Body failed")
        .to_bytes()
        .to_vec();
    (status, body)
}

fn parse<T: DeserializeOwned>(body: &[u8]) -> T {
    serde_json::from_slice(body).expect("Invalid JSON body")
}

fn post_json(uri: &str, json: String) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json))
        .expect("Bad request")
}

async fn create(app: &Router) -> CreateGameResponse {
    let (status, body) = send(app, Request::post("/games").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::CREATED);
    parse(&body)
}

#[tokio::test]
async fn test_ping() {
    let app = app();
    let (status, body) = send(&app, Request::get("/ping").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    let pong: PingResponse = parse(&body);
    assert_eq!(pong.message, "pong");
}

#[tokio::test]
async fn test_create_returns_id_and_default_board() {
    let app = app();
    let created = create(&app).await;
    assert_eq!(created.game_id.as_str().len(), 16);
    assert_eq!(created.board, Board::default_position());
}

#[tokio::test]
async fn test_get_game() {
    let app = app();
    let created = create(&app).await;

    let uri = format!("/games/{}", created.game_id);
    let (status, body) = send(&app, Request::get(uri).body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);

    let game: GameResponse = parse(&body);
    assert_eq!(game.game_id, created.game_id);
    assert_eq!(game.turn_number, 1);
    assert_eq!(game.board, Board::default_position());
}

#[tokio::test]
async fn test_get_game_json_uses_camel_case() {
    let app = app();
    let created = create(&app).await;

    let uri = format!("/games/{}", created.game_id);
    let (_, body) = send(&app, Request::get(uri).body(Body::empty()).unwrap()).await;
    let json: serde_json::Value = parse(&body);
    assert_eq!(json["turnNumber"], 1);
    assert_eq!(json["gameId"], created.game_id.as_str());
    assert_eq!(json["board"]["squares"][7][4]["type"], "king");
    assert_eq!(json["board"]["squares"][7][4]["team"], "white");
}

#[tokio::test]
async fn test_get_unknown_game_is_404() {
    let app = app();
    let (status, body) = send(&app, Request::get("/games/missing").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let err: ErrorBody = parse(&body);
    assert!(err.error.contains("missing"));
}

#[tokio::test]
async fn test_move_applies_and_increments_turn() {
    let app = app();
    let created = create(&app).await;

    let request = MoveRequest::new(Coordinate::new(6, 0), Coordinate::new(4, 0));
    let uri = format!("/games/{}/move", created.game_id);
    let (status, body) = send(
        &app,
        post_json(&uri, serde_json::to_string(&request).unwrap()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let game: GameResponse = parse(&body);
    assert_eq!(game.turn_number, 2);
    assert!(game.board.squares()[6][0].is_empty());
    let pawn = game.board.squares()[4][0];
    assert_eq!((pawn.kind, pawn.team, pawn.move_count), (PieceKind::Pawn, Team::White, 1));
}

#[tokio::test]
async fn test_move_on_unknown_game_is_404() {
    let app = app();
    let body = r#"{"from":{"x":6,"y":0},"to":{"x":4,"y":0}}"#.to_string();
    let (status, _) = send(&app, post_json("/games/missing/move", body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rejected_move_is_400() {
    let app = app();
    let created = create(&app).await;
    let uri = format!("/games/{}/move", created.game_id);

    let body = r#"{"from":{"x":6,"y":0},"to":{"x":7,"y":0}}"#.to_string();
    let (status, body) = send(&app, post_json(&uri, body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let err: ErrorBody = parse(&body);
    assert!(err.error.contains("white pawn must move forward"));

    let body = r#"{"from":{"x":-1,"y":0},"to":{"x":4,"y":0}}"#.to_string();
    let (status, _) = send(&app, post_json(&uri, body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_move_body_is_rejected() {
    let app = app();
    let created = create(&app).await;
    let uri = format!("/games/{}/move", created.game_id);

    let (status, body) = send(&app, post_json(&uri, r#"{"from":"e2"}"#.to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let err: ErrorBody = parse(&body);
    assert!(err.error.starts_with("invalid move request"));

    let (status, body) = send(&app, post_json(&uri, "not json".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let _: ErrorBody = parse(&body);

    let untyped = Request::post(&uri)
        .body(Body::from(r#"{"from":{"x":6,"y":0},"to":{"x":4,"y":0}}"#))
        .unwrap();
    let (status, body) = send(&app, untyped).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let err: ErrorBody = parse(&body);
    assert!(err.error.contains("Content-Type"));

    let (_, body) = send(&app, Request::get(format!("/games/{}", created.game_id)).body(Body::empty()).unwrap()).await;
    let game: GameResponse = parse(&body);
    assert_eq!(game.turn_number, 1);
}

#[tokio::test]
async fn test_list_and_delete() {
    let app = app();
    let first = create(&app).await;
    let second = create(&app).await;

    let (_, body) = send(&app, Request::get("/games").body(Body::empty()).unwrap()).await;
    let list: GameListResponse = parse(&body);
    assert_eq!(list.game_ids.len(), 2);
    assert!(list.game_ids.contains(&first.game_id));
    assert!(list.game_ids.contains(&second.game_id));

    let uri = format!("/games/{}", first.game_id);
    let (status, _) = send(&app, Request::delete(&uri).body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Request::delete(&uri).body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Request::get(&uri).body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

struct BrokenEntropy;

impl EntropySource for BrokenEntropy {
    fn fill(&self, _dest: &mut [u8]) -> Result<(), String> {
        Err("no entropy".to_string())
    }
}

#[tokio::test]
async fn test_entropy_failure_is_500() {
    let app = router(Arc::new(GameStore::with_entropy(
        StoreConfig::default(),
        BrokenEntropy,
    )));
    let (status, _) = send(&app, Request::post("/games").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_full_store_is_503() {
    let app = router(Arc::new(GameStore::new(StoreConfig::new(Some(1), None))));
    create(&app).await;
    let (status, _) = send(&app, Request::post("/games").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
