use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::users::Emotion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRequest {
    pub id: String,
    pub from_user: String,
    pub to_user: String,
    pub status: RequestStatus,
    pub timestamp: DateTime<Utc>,
    pub emotion: Emotion,
    /// Avatar of `from_user`, shown to the receiver.
    pub profile_pic: Option<String>,
}

/// A mutual relationship. `users` and `profile_pics` are index-aligned and
/// never change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    pub users: [String; 2],
    pub profile_pics: [String; 2],
    pub timestamp: DateTime<Utc>,
    pub emotion: Emotion,
}

impl Connection {
    pub fn involves(&self, username: &str) -> bool {
        self.users.iter().any(|u| u == username)
    }

    pub fn is_between(&self, a: &str, b: &str) -> bool {
        self.involves(a) && self.involves(b)
    }

    /// Slot index of the member that is not `username`.
    pub fn other_member_index(&self, username: &str) -> Option<usize> {
        self.users.iter().position(|u| u != username)
    }
}

/// Everything one user is party to, ready for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationships {
    pub incoming: Vec<ConnectionRequest>,
    pub outgoing: Vec<ConnectionRequest>,
    pub connections: Vec<Connection>,
}
