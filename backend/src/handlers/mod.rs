pub mod connections;
pub mod journal;
pub mod moderation;
pub mod peers;
pub mod session;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde::Serialize;
use sqlx::SqlitePool;
use tokio::sync::Mutex;

use crate::models::User;
use crate::services::{
    ConnectionError, ConnectionLifecycleManager, JournalError, JournalStore, PeerDirectory, SessionStore,
};
use crate::utils::Config;

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub journal: JournalStore,
    pub relationships: Arc<Mutex<ConnectionLifecycleManager>>,
    pub seed_requests: bool,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: &Config) -> Self {
        Self {
            sessions: SessionStore::new(pool.clone()),
            journal: JournalStore::new(pool),
            relationships: Arc::new(Mutex::new(ConnectionLifecycleManager::new(PeerDirectory::seeded()))),
            seed_requests: config.seed_requests,
        }
    }

    /// Replaces whatever relationships are loaded with a fresh set for `user`.
    /// Callers pass the manager they already hold locked.
    pub fn reset_workspace(&self, manager: &mut ConnectionLifecycleManager, user: &User) {
        manager.clear();
        if self.seed_requests {
            let demo = manager.demo_requests_for(user);
            manager.seed_incoming(demo);
        }
    }
}

/// Outcome of a user action. Refused actions are reported in the body rather
/// than as an HTTP error so repeated clicks stay quiet.
#[derive(Debug, Serialize)]
pub struct ActionResponse<T> {
    pub applied: bool,
    pub outcome: &'static str,
    pub message: Option<String>,
    pub record: Option<T>,
}

impl<T> ActionResponse<T> {
    fn applied(record: T) -> Self {
        Self {
            applied: true,
            outcome: "applied",
            message: None,
            record: Some(record),
        }
    }

    fn skipped(outcome: &'static str, message: String) -> Self {
        tracing::debug!("Action skipped ({}): {}", outcome, message);
        Self {
            applied: false,
            outcome,
            message: Some(message),
            record: None,
        }
    }
}

impl<T> From<Result<T, ConnectionError>> for ActionResponse<T> {
    fn from(result: Result<T, ConnectionError>) -> Self {
        match result {
            Ok(record) => Self::applied(record),
            Err(e) => Self::skipped(e.code(), e.to_string()),
        }
    }
}

impl<T> From<Result<T, JournalError>> for ActionResponse<T> {
    fn from(result: Result<T, JournalError>) -> Self {
        match result {
            Ok(record) => Self::applied(record),
            Err(e) => Self::skipped(e.code(), e.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

pub(crate) fn internal_error(e: anyhow::Error) -> ApiError {
    tracing::error!("Storage failure: {:#}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: "Internal storage error".to_string(),
        }),
    )
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Session
        .route("/api/session", get(session::current_session))
        .route("/api/session/register", post(session::register))
        .route("/api/session/login", post(session::login))
        .route("/api/session/logout", post(session::logout))
        .route("/api/session/profile", put(session::update_profile))
        .route("/api/session/picture", put(session::update_picture))
        // Directory
        .route("/api/peers", get(peers::browse_peers))
        // Relationships
        .route("/api/relationships", get(connections::get_relationships))
        .route("/api/requests", post(connections::send_request))
        .route("/api/requests/{id}/accept", post(connections::accept_request))
        .route("/api/requests/{id}/reject", post(connections::reject_request))
        .route("/api/requests/sent/{id}", delete(connections::cancel_sent_request))
        .route("/api/connections/{id}", delete(connections::remove_connection))
        // Journal
        .route("/api/journal", get(journal::list_entries).post(journal::add_entry))
        .route("/api/voice-notes", get(journal::list_voice_notes).post(journal::save_voice_note))
        .route("/api/voice-notes/{id}", delete(journal::delete_voice_note))
        // Moderation
        .route("/api/moderation/check", post(moderation::check_text))
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
