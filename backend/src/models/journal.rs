use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::users::Emotion;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    pub author: String,
    pub content: String,
    pub emotion: Emotion,
    pub timestamp: DateTime<Utc>,
    pub reactions: u32,
}

/// A saved recording. `url` points at audio captured by the client; the
/// emotion is whatever the client tagged it with, if anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceNote {
    pub id: String,
    pub url: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub emotion: Option<Emotion>,
}
