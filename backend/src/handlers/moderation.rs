use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::utils::moderation::{contains_offensive_content, filter_offensive_content};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ModerationResponse {
    pub filtered: String,
    pub flagged: bool,
}

/// Lets the chat views mask text before sending and warn the author.
pub async fn check_text(Json(req): Json<ModerationRequest>) -> Json<ModerationResponse> {
    Json(ModerationResponse {
        flagged: contains_offensive_content(&req.text),
        filtered: filter_offensive_content(&req.text),
    })
}
