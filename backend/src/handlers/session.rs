use axum::{extract::State, http::StatusCode, response::Json};
use serde::Deserialize;

use super::{internal_error, ApiError, AppState, ErrorBody};
use crate::models::User;
use crate::services::SessionError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRequest {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PictureRequest {
    pub data_url: String,
}

fn session_error(e: SessionError) -> ApiError {
    match e {
        SessionError::MissingField(_) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody { error: e.to_string() }),
        ),
        SessionError::Storage(e) => internal_error(e),
    }
}

pub async fn current_session(State(state): State<AppState>) -> Result<Json<Option<User>>, ApiError> {
    let user = state.sessions.current_user().await.map_err(internal_error)?;
    Ok(Json(user))
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<IdentityRequest>,
) -> Result<Json<User>, ApiError> {
    let mut manager = state.relationships.lock().await;
    let user = state
        .sessions
        .register(&req.username, &req.email)
        .await
        .map_err(session_error)?;

    state.reset_workspace(&mut manager, &user);
    Ok(Json(user))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<IdentityRequest>,
) -> Result<Json<User>, ApiError> {
    let mut manager = state.relationships.lock().await;
    let user = state
        .sessions
        .login(&req.username, &req.email)
        .await
        .map_err(session_error)?;

    state.reset_workspace(&mut manager, &user);
    Ok(Json(user))
}

pub async fn logout(State(state): State<AppState>) -> Result<Json<Option<User>>, ApiError> {
    let mut manager = state.relationships.lock().await;
    let user = state.sessions.logout().await.map_err(internal_error)?;
    manager.clear();
    Ok(Json(user))
}

/// A changed handle starts a fresh workspace; handles are the only identity key.
///
/// The manager lock is held from the first read to the reset so a concurrent
/// login cannot slip in between.
pub async fn update_profile(
    State(state): State<AppState>,
    Json(req): Json<ProfileRequest>,
) -> Result<Json<Option<User>>, ApiError> {
    let mut manager = state.relationships.lock().await;
    let previous = state.sessions.current_user().await.map_err(internal_error)?;
    let updated = state
        .sessions
        .update_profile(&req.username, &req.email, &req.status)
        .await
        .map_err(session_error)?;

    if let (Some(before), Some(after)) = (&previous, &updated) {
        if before.username != after.username {
            tracing::info!("{} is now {}, resetting relationships", before.username, after.username);
            state.reset_workspace(&mut manager, after);
        }
    }

    Ok(Json(updated))
}

pub async fn update_picture(
    State(state): State<AppState>,
    Json(req): Json<PictureRequest>,
) -> Result<Json<Option<User>>, ApiError> {
    let user = state
        .sessions
        .update_profile_picture(&req.data_url)
        .await
        .map_err(internal_error)?;
    Ok(Json(user))
}
