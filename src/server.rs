use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::info;
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

use crate::align;
use crate::error::SyncError;
use crate::events::{self, ChordEvent, Phrase, SyncedWord};

const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

pub struct AppState {
    /// Directory holding the bundled demo lyrics/chords files.
    pub demo_dir: PathBuf,
}

#[derive(Serialize)]
struct SyncResponse {
    synced_data: Vec<SyncedWord>,
}

// Same error body shape the original backend exposed.
#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn bad_request(detail: &str) -> HandlerError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            detail: detail.to_string(),
        }),
    )
}

fn not_found(detail: &str) -> HandlerError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            detail: detail.to_string(),
        }),
    )
}

fn internal(err: SyncError) -> HandlerError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            detail: err.to_string(),
        }),
    )
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/demo-sync", get(demo_sync))
        .route("/sync", post(sync_endpoint))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// Run the sync API until the process is stopped.
pub async fn serve(state: AppState, port: u16) -> Result<(), SyncError> {
    let app = router(Arc::new(state));
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Sync API starting on http://{}:{}", addr.ip(), addr.port());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| SyncError::Server(format!("bind {}: {}", addr, e)))?;
    axum::serve(listener, app)
        .await
        .map_err(|e| SyncError::Server(e.to_string()))
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Sync API running. Use the separate frontend and point it to this API."
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /demo-sync - align the bundled demo lyrics with the first demo chord
/// file present (guitar, then piano).
async fn demo_sync(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SyncResponse>, HandlerError> {
    let lyrics_path = state.demo_dir.join("lyrics_file.json");
    if !lyrics_path.exists() {
        return Err(not_found("Demo lyrics file not found"));
    }

    let chords_path = ["guitar_chords_file.json", "piano_chords_file.json"]
        .iter()
        .map(|name| state.demo_dir.join(name))
        .find(|path| path.exists())
        .ok_or_else(|| not_found("Demo chords file not found"))?;

    let lyrics = events::load_lyrics(&lyrics_path).map_err(internal)?;
    let chords = events::load_chords(&chords_path).map_err(internal)?;
    Ok(Json(respond(&lyrics, &chords)))
}

/// POST /sync - multipart upload with `lyrics_file` and `chords_file` JSON
/// parts. Malformed JSON is the client's fault (400), anything else is ours.
async fn sync_endpoint(mut multipart: Multipart) -> Result<Json<SyncResponse>, HandlerError> {
    let mut lyrics: Option<Vec<Phrase>> = None;
    let mut chords: Option<Vec<ChordEvent>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(&e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| bad_request(&e.to_string()))?;

        match name.as_str() {
            "lyrics_file" => {
                lyrics = Some(
                    serde_json::from_slice(&data).map_err(|_| bad_request("Invalid JSON files"))?,
                );
            }
            "chords_file" => {
                chords = Some(
                    serde_json::from_slice(&data).map_err(|_| bad_request("Invalid JSON files"))?,
                );
            }
            _ => {}
        }
    }

    let (lyrics, chords) = match (lyrics, chords) {
        (Some(lyrics), Some(chords)) => (lyrics, chords),
        _ => return Err(bad_request("Both lyrics_file and chords_file are required")),
    };

    Ok(Json(respond(&lyrics, &chords)))
}

fn respond(lyrics: &[Phrase], chords: &[ChordEvent]) -> SyncResponse {
    let synced = align::sync_lyrics_with_chords(lyrics, chords);
    SyncResponse {
        synced_data: synced.iter().map(|word| word.to_wire()).collect(),
    }
}
