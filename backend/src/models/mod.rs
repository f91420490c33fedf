pub mod connections;
pub mod journal;
pub mod users;

pub use connections::{Connection, ConnectionRequest, Relationships, RequestStatus};
pub use journal::{JournalEntry, VoiceNote};
pub use users::{Emotion, Peer, User};
