use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Deserialize;

use super::{internal_error, ActionResponse, ApiError, AppState};
use crate::models::{Emotion, JournalEntry, VoiceNote};
use crate::services::JournalError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntryBody {
    pub content: String,
    pub emotion: Emotion,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVoiceNoteBody {
    pub url: String,
    #[serde(default)]
    pub emotion: Option<Emotion>,
}

/// Storage failures are real errors; everything else is a skipped action.
fn into_action<T>(result: Result<T, JournalError>) -> Result<Json<ActionResponse<T>>, ApiError> {
    match result {
        Err(JournalError::Storage(e)) => Err(internal_error(e)),
        other => Ok(Json(other.into())),
    }
}

pub async fn list_entries(State(state): State<AppState>) -> Result<Json<Vec<JournalEntry>>, ApiError> {
    let entries = state.journal.entries().await.map_err(internal_error)?;
    Ok(Json(entries))
}

pub async fn add_entry(
    State(state): State<AppState>,
    Json(body): Json<NewEntryBody>,
) -> Result<Json<ActionResponse<JournalEntry>>, ApiError> {
    let actor = state.sessions.current_user().await.map_err(internal_error)?;
    into_action(state.journal.add_entry(actor.as_ref(), &body.content, body.emotion).await)
}

pub async fn list_voice_notes(State(state): State<AppState>) -> Result<Json<Vec<VoiceNote>>, ApiError> {
    let notes = state.journal.voice_notes().await.map_err(internal_error)?;
    Ok(Json(notes))
}

pub async fn save_voice_note(
    State(state): State<AppState>,
    Json(body): Json<NewVoiceNoteBody>,
) -> Result<Json<ActionResponse<VoiceNote>>, ApiError> {
    into_action(state.journal.save_voice_note(&body.url, body.emotion).await)
}

pub async fn delete_voice_note(
    State(state): State<AppState>,
    Path(note_id): Path<String>,
) -> Result<Json<ActionResponse<VoiceNote>>, ApiError> {
    into_action(state.journal.delete_voice_note(&note_id).await)
}
