//! Static HTTP server re-serving the snapshot
//!
//! `GET /player` answers with `<snapshot>/player.json`. Paths are
//! lower-cased before lookup and the query string is ignored, so clients
//! written against the real API can be pointed at the mirror unchanged.

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::EndpointName;

/// Body returned for anything that is not a cached endpoint
pub const UNKNOWN_ENDPOINT_BODY: &str = r#"{"success":false,"cause":"Unknown endpoint"}"#;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Snapshot directory to serve from
    pub snapshot_dir: PathBuf,
}

/// App state shared across handlers
#[derive(Clone)]
struct AppState {
    config: ServerConfig,
}

/// Build the router serving `config.snapshot_dir`
pub fn router(config: ServerConfig) -> Router {
    let state = AppState { config };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .fallback(serve_endpoint)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the HTTP server
pub async fn serve(config: ServerConfig, port: u16) -> Result<()> {
    let snapshot_dir = config.snapshot_dir.clone();
    let app = router(config);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(
        "Serving {} on http://{}",
        snapshot_dir.display(),
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Other(format!("Server error: {e}")))?;

    Ok(())
}

async fn serve_endpoint(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    let Some(path) = endpoint_file(&state.config.snapshot_dir, uri.path()) else {
        return unknown_endpoint();
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "application/json")], bytes).into_response(),
        Err(e) => {
            debug!("No cached endpoint at {}: {}", path.display(), e);
            unknown_endpoint()
        }
    }
}

/// Map a request path to its cached file, if the path names an endpoint
fn endpoint_file(root: &Path, request_path: &str) -> Option<PathBuf> {
    let name = request_path.trim_start_matches('/').to_lowercase();
    EndpointName::new(name).ok().map(|name| name.file_path(root))
}

fn unknown_endpoint() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        UNKNOWN_ENDPOINT_BODY,
    )
        .into_response()
}
