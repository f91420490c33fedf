use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};

use super::{internal_error, ApiError, AppState};
use crate::models::{Emotion, Peer};

#[derive(Debug, Deserialize)]
pub struct PeersQuery {
    #[serde(default)]
    pub emotion: Option<Emotion>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerView {
    #[serde(flatten)]
    pub peer: Peer,
    pub connected: bool,
    pub request_sent: bool,
}

/// Directory listing for the current user, flagged with relationship state.
pub async fn browse_peers(
    State(state): State<AppState>,
    Query(query): Query<PeersQuery>,
) -> Result<Json<Vec<PeerView>>, ApiError> {
    let actor = state.sessions.current_user().await.map_err(internal_error)?;
    let me = actor.as_ref().map(|u| u.username.as_str());
    let manager = state.relationships.lock().await;

    let peers = manager
        .directory()
        .browse(query.emotion, me)
        .into_iter()
        .map(|peer| PeerView {
            connected: me.is_some_and(|me| manager.is_connected(me, &peer.name)),
            request_sent: me.is_some_and(|me| manager.has_pending_request(me, &peer.name)),
            peer: peer.clone(),
        })
        .collect();

    Ok(Json(peers))
}
