use serde::{Deserialize, Serialize};

/// Self-declared mood attached to journal entries, requests and connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Emotion {
    Happy,
    Sad,
    Anxious,
    Stressed,
    Grateful,
    Lonely,
    Overwhelmed,
}

/// The signed-in identity. `username` doubles as the peer handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub email: String,
    pub profile_pic: String,
    pub status: String,
}

/// Entry in the static directory of people a user can reach out to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Peer {
    pub id: String,
    pub name: String,
    pub emotion: Emotion,
    pub snippet: String,
    pub profile_pic: String,
}
