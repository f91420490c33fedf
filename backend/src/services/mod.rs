pub mod connections;
pub mod directory;
pub mod journal;
pub mod session;

pub use connections::{ConnectionError, ConnectionLifecycleManager};
pub use directory::PeerDirectory;
pub use journal::{JournalError, JournalStore};
pub use session::{SessionError, SessionStore};
