use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Deserialize;

use super::{internal_error, ActionResponse, ApiError, AppState};
use crate::models::{Connection, ConnectionRequest, Emotion, Relationships};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequestBody {
    pub to_user: String,
    pub emotion: Emotion,
    #[serde(default)]
    pub profile_pic: Option<String>,
}

pub async fn get_relationships(State(state): State<AppState>) -> Result<Json<Relationships>, ApiError> {
    let actor = state.sessions.current_user().await.map_err(internal_error)?;
    let manager = state.relationships.lock().await;

    let view = actor.map(|user| manager.view_for(&user)).unwrap_or_default();
    Ok(Json(view))
}

pub async fn send_request(
    State(state): State<AppState>,
    Json(body): Json<SendRequestBody>,
) -> Result<Json<ActionResponse<ConnectionRequest>>, ApiError> {
    let actor = state.sessions.current_user().await.map_err(internal_error)?;
    let mut manager = state.relationships.lock().await;

    let result = manager.send_connection_request(actor.as_ref(), &body.to_user, body.emotion, body.profile_pic);
    Ok(Json(result.into()))
}

pub async fn accept_request(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> Result<Json<ActionResponse<Connection>>, ApiError> {
    let actor = state.sessions.current_user().await.map_err(internal_error)?;
    let mut manager = state.relationships.lock().await;

    Ok(Json(manager.accept_request(actor.as_ref(), &request_id).into()))
}

pub async fn reject_request(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> Result<Json<ActionResponse<ConnectionRequest>>, ApiError> {
    let actor = state.sessions.current_user().await.map_err(internal_error)?;
    let mut manager = state.relationships.lock().await;

    Ok(Json(manager.reject_request(actor.as_ref(), &request_id).into()))
}

pub async fn cancel_sent_request(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> Result<Json<ActionResponse<ConnectionRequest>>, ApiError> {
    let actor = state.sessions.current_user().await.map_err(internal_error)?;
    let mut manager = state.relationships.lock().await;

    Ok(Json(manager.cancel_sent_request(actor.as_ref(), &request_id).into()))
}

/// Responds with the pending request the connection turned back into.
pub async fn remove_connection(
    State(state): State<AppState>,
    Path(connection_id): Path<String>,
) -> Result<Json<ActionResponse<ConnectionRequest>>, ApiError> {
    let actor = state.sessions.current_user().await.map_err(internal_error)?;
    let mut manager = state.relationships.lock().await;

    Ok(Json(manager.remove_connection(actor.as_ref(), &connection_id).into()))
}
