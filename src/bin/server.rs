use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use clap::Parser;
use ghost_maze_server::chat::ChatLog;
use ghost_maze_server::config::ServerConfig;
use ghost_maze_server::engine::GameWorld;
use ghost_maze_server::error::{ErrorKind, GameError};
use ghost_maze_server::server_utils::non_empty;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tower_http::services::{ServeDir, ServeFile};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const ADVANCE_INTERVAL_MS: u64 = 250;

type SharedState = Arc<Mutex<ServerState>>;

struct ServerState {
    world: GameWorld,
    chat: ChatLog,
}

#[derive(Debug, Deserialize)]
struct JoinQuery {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MoveQuery {
    id: Option<String>,
    dir: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatPost {
    id: Option<String>,
    text: Option<String>,
}

struct ApiError(GameError);

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::StateConflict => StatusCode::CONFLICT,
            ErrorKind::ResourceExhausted => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        } else {
            warn!(error = %self.0, "request rejected");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult = Result<Json<Value>, ApiError>;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();
    init_tracing(&config.log_level);

    let world = match config.world_options().and_then(GameWorld::new) {
        Ok(world) => world,
        Err(err) => {
            error!(error = %err, "cannot build game world");
            std::process::exit(1);
        }
    };
    let state = Arc::new(Mutex::new(ServerState {
        world,
        chat: ChatLog::new(),
    }));
    start_tick_loop(state.clone());

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/maze", get(maze_handler))
        .route("/join", get(join_handler))
        .route("/lock", post(lock_handler))
        .route("/move", get(move_handler))
        .route("/players", get(players_handler))
        .route("/result", get(result_handler))
        .route("/status", get(status_handler))
        .route("/chat", get(chat_list_handler).post(chat_post_handler))
        .route("/chat/send", get(chat_send_handler))
        .with_state(state);

    let app = if let Some(static_dir) = resolve_static_dir(config.static_dir.clone()) {
        let index_file = static_dir.join("index.html");
        info!(root = %static_dir.to_string_lossy(), "serving static files");
        app.fallback_service(ServeDir::new(static_dir).not_found_service(ServeFile::new(index_file)))
    } else {
        warn!("static file root not found, serving API only");
        app
    };

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("failed to bind server socket");

    info!(port = config.port, "listening");
    axum::serve(listener, app)
        .await
        .expect("server runtime failed");
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

fn resolve_static_dir(configured: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = configured {
        if path.join("index.html").is_file() {
            return Some(path);
        }
    }
    [PathBuf::from("public"), PathBuf::from(".")]
        .into_iter()
        .find(|path| path.join("index.html").is_file())
}

fn start_tick_loop(state: SharedState) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(ADVANCE_INTERVAL_MS));
        loop {
            interval.tick().await;
            let mut guard = state.lock().await;
            guard.world.advance(now_ms());
        }
    });
}

async fn healthz() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

async fn maze_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let guard = state.lock().await;
    Json(guard.world.maze_snapshot())
}

async fn join_handler(State(state): State<SharedState>, Query(query): Query<JoinQuery>) -> ApiResult {
    let mut guard = state.lock().await;
    let outcome = guard.world.join(query.name.as_deref().unwrap_or_default())?;
    Ok(Json(json!({ "playerId": outcome.player_id })))
}

async fn lock_handler(State(state): State<SharedState>) -> ApiResult {
    let mut guard = state.lock().await;
    let ghosts = guard.world.lock(now_ms())?;
    Ok(Json(json!({ "ghosts": ghosts })))
}

async fn move_handler(State(state): State<SharedState>, Query(query): Query<MoveQuery>) -> ApiResult {
    let id = non_empty(query.id.as_deref()).ok_or(GameError::MissingPlayerId)?;
    let mut guard = state.lock().await;
    let player = guard
        .world
        .move_player(id, query.dir.as_deref().unwrap_or_default(), now_ms())?;
    Ok(Json(json!({ "player": player })))
}

async fn players_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let guard = state.lock().await;
    Json(guard.world.players_snapshot())
}

async fn result_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let guard = state.lock().await;
    match guard.world.result() {
        Some(result) => Json(json!({ "running": false, "result": result })),
        None => Json(json!({ "running": true })),
    }
}

async fn status_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let guard = state.lock().await;
    Json(guard.world.status(now_ms()))
}

async fn chat_list_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let guard = state.lock().await;
    Json(guard.chat.recent())
}

async fn chat_post_handler(State(state): State<SharedState>, Json(body): Json<ChatPost>) -> ApiResult {
    post_chat(&state, body.id.as_deref(), body.text.as_deref()).await
}

async fn chat_send_handler(State(state): State<SharedState>, Query(query): Query<ChatPost>) -> ApiResult {
    post_chat(&state, query.id.as_deref(), query.text.as_deref()).await
}

async fn post_chat(state: &SharedState, id: Option<&str>, text: Option<&str>) -> ApiResult {
    let id = non_empty(id).ok_or(GameError::MissingPlayerId)?;
    let mut guard = state.lock().await;
    let ServerState { world, chat } = &mut *guard;
    chat.post(world, id, text.unwrap_or_default(), now_ms())?;
    Ok(Json(json!({ "ok": true })))
}

fn now_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds_map_to_status_codes() {
        let cases = [
            (GameError::MissingPlayerId, StatusCode::BAD_REQUEST),
            (GameError::InvalidDirection("x".to_string()), StatusCode::BAD_REQUEST),
            (GameError::UnknownPlayer("p".to_string()), StatusCode::NOT_FOUND),
            (GameError::AlreadyLocked, StatusCode::CONFLICT),
            (GameError::PlayerDead, StatusCode::CONFLICT),
            (GameError::NoFreeCell, StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError(err).into_response().status(), expected);
        }
    }

    #[test]
    fn static_dir_falls_back_when_index_missing() {
        let missing = PathBuf::from("definitely/not/here");
        let resolved = resolve_static_dir(Some(missing.clone()));
        assert_ne!(resolved, Some(missing));
    }
}
