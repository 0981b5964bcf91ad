/**
 * Health Routes
 * Liveness and database diagnostics; none of these ever fail
 */
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::routes::AppState;

// Track server start time for uptime calculation
lazy_static::lazy_static! {
    static ref SERVER_START: Instant = Instant::now();
}

/// Initialize the server start time
pub fn init_start_time() {
    lazy_static::initialize(&SERVER_START);
}

const MAX_LISTED_COLLECTIONS: usize = 10;
const MAX_ERROR_CHARS: usize = 50;

/// Response for GET /
#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

/// Simple health response
#[derive(Debug, Serialize, Deserialize)]
pub struct SimpleHealthResponse {
    pub status: String,
    pub uptime: u64,
}

/// Database diagnostic report for GET /test
#[derive(Debug, Serialize, Deserialize)]
pub struct DiagnosticResponse {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

fn presence(set: bool) -> String {
    let label = if set { "✅ Set" } else { "❌ Not Set" };
    label.to_string()
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// GET / - Banner
pub async fn read_root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Personal Site Backend is running".to_string(),
    })
}

/// GET /health - Simple liveness ping
pub async fn health_ping() -> Json<SimpleHealthResponse> {
    Json(SimpleHealthResponse {
        status: "ok".to_string(),
        uptime: SERVER_START.elapsed().as_secs(),
    })
}

/// GET /test - Report backend and database state
///
/// Only reports whether `DATABASE_URL` / `DATABASE_NAME` were set, never
/// their values. Store errors are folded into the `database` text.
pub async fn test_database(State(state): State<AppState>) -> Json<DiagnosticResponse> {
    let env = state.env_presence();
    let mut response = DiagnosticResponse {
        backend: "✅ Running".to_string(),
        database: "❌ Not Available".to_string(),
        database_url: presence(env.database_url),
        database_name: presence(env.database_name),
        connection_status: "Not Connected".to_string(),
        collections: Vec::new(),
    };

    if let Ok(store) = state.store() {
        response.connection_status = "Connected".to_string();
        match store.list_collection_names().await {
            Ok(mut names) => {
                names.truncate(MAX_LISTED_COLLECTIONS);
                response.collections = names;
                response.database = "✅ Connected & Working".to_string();
            }
            Err(e) => {
                tracing::warn!(
                    database = %store.database_name(),
                    error = %e,
                    "collection listing failed"
                );
                response.database = format!(
                    "⚠️  Connected but Error: {}",
                    truncate_chars(&e.to_string(), MAX_ERROR_CHARS)
                );
            }
        }
    }

    Json(response)
}
