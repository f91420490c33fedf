use std::sync::Arc;

use anyhow::Result;
use chrono::{Duration, Utc};
use serde::{de::DeserializeOwned, Serialize};
use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::constants::{JOURNAL_ENTRIES_KEY, MOCK_JOURNAL_ENTRIES, VOICE_NOTES_KEY};
use crate::db::kv;
use crate::models::{Emotion, JournalEntry, User, VoiceNote};

#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("no user is signed in")]
    Unauthenticated,
    #[error("journal entry must not be empty")]
    EmptyContent,
    #[error("voice note has no recording")]
    MissingRecording,
    #[error("no voice note with id {0}")]
    VoiceNoteNotFound(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl JournalError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::EmptyContent | Self::MissingRecording => "invalid",
            Self::VoiceNoteNotFound(_) => "not_found",
            Self::Storage(_) => "storage",
        }
    }
}

/// Journal feed and voice notes, each kept as one JSON list in the
/// key-value store. Newest records come first.
#[derive(Debug, Clone)]
pub struct JournalStore {
    pool: SqlitePool,
    // Serializes read-modify-write cycles on the stored lists
    write_lock: Arc<Mutex<()>>,
}

impl JournalStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// The feed, or the built-in community entries if nothing was ever written.
    pub async fn entries(&self) -> Result<Vec<JournalEntry>> {
        Ok(self
            .load_list(JOURNAL_ENTRIES_KEY)
            .await?
            .unwrap_or_else(seed_entries))
    }

    pub async fn add_entry(
        &self,
        actor: Option<&User>,
        content: &str,
        emotion: Emotion,
    ) -> Result<JournalEntry, JournalError> {
        let me = actor.ok_or(JournalError::Unauthenticated)?;
        if content.trim().is_empty() {
            return Err(JournalError::EmptyContent);
        }

        let _guard = self.write_lock.lock().await;
        let mut entries = self.entries().await?;
        let entry = JournalEntry {
            id: Uuid::new_v4().to_string(),
            author: me.username.clone(),
            content: content.to_string(),
            emotion,
            timestamp: Utc::now(),
            reactions: 0,
        };

        entries.insert(0, entry.clone());
        self.save_list(JOURNAL_ENTRIES_KEY, &entries).await?;
        info!("{} added a journal entry", me.username);
        Ok(entry)
    }

    pub async fn voice_notes(&self) -> Result<Vec<VoiceNote>> {
        Ok(self.load_list(VOICE_NOTES_KEY).await?.unwrap_or_default())
    }

    pub async fn save_voice_note(
        &self,
        url: &str,
        emotion: Option<Emotion>,
    ) -> Result<VoiceNote, JournalError> {
        if url.trim().is_empty() {
            return Err(JournalError::MissingRecording);
        }

        let _guard = self.write_lock.lock().await;
        let mut notes = self.voice_notes().await?;
        let note = VoiceNote {
            id: Uuid::new_v4().to_string(),
            url: url.to_string(),
            timestamp: Utc::now(),
            emotion,
        };

        notes.insert(0, note.clone());
        self.save_list(VOICE_NOTES_KEY, &notes).await?;
        Ok(note)
    }

    pub async fn delete_voice_note(&self, id: &str) -> Result<VoiceNote, JournalError> {
        let _guard = self.write_lock.lock().await;
        let mut notes = self.voice_notes().await?;
        let index = notes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| JournalError::VoiceNoteNotFound(id.to_string()))?;

        let note = notes.remove(index);
        self.save_list(VOICE_NOTES_KEY, &notes).await?;
        Ok(note)
    }

    async fn load_list<T: DeserializeOwned>(&self, key: &str) -> Result<Option<Vec<T>>> {
        let Some(raw) = kv::get(&self.pool, key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(list) => Ok(Some(list)),
            Err(e) => {
                warn!("Ignoring unreadable {} record: {}", key, e);
                Ok(None)
            }
        }
    }

    async fn save_list<T: Serialize>(&self, key: &str, list: &[T]) -> Result<()> {
        let raw = serde_json::to_string(list)?;
        kv::set(&self.pool, key, &raw).await
    }
}

fn seed_entries() -> Vec<JournalEntry> {
    let now = Utc::now();
    MOCK_JOURNAL_ENTRIES
        .iter()
        .map(|seed| JournalEntry {
            id: seed.id.to_string(),
            author: seed.author.to_string(),
            content: seed.content.to_string(),
            emotion: seed.emotion,
            timestamp: now - Duration::hours(seed.age_hours),
            reactions: seed.reactions,
        })
        .collect()
}
