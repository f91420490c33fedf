// =============================================================================
// Reflecta Backend Constants
// =============================================================================
// Static data and tunables used throughout the backend, kept in one place so
// the directory, demo data and filters can be adjusted without touching logic.

use crate::models::Emotion;

// =============================================================================
// AVATARS
// =============================================================================

/// Avatar used when a user or peer has none on record
pub const DEFAULT_PROFILE_PIC: &str = "https://images.pexels.com/photos/18059128/pexels-photo-18059128/free-photo-of-a-woman-with-colorful-hair-and-a-black-jacket.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2";

// =============================================================================
// SESSION STORAGE KEYS
// =============================================================================

/// Key holding the JSON-serialized signed-in user
pub const SESSION_USER_KEY: &str = "reflectaUser";

/// Suffix of the per-user key remembering an avatar across logins
pub const PROFILE_PIC_KEY_SUFFIX: &str = "-pic";

/// Status given to a freshly registered user
pub const REGISTERED_STATUS: &str = "Just joined! Looking to connect.";

/// Status given on login
pub const LOGIN_STATUS: &str = "Available to connect";

/// Key holding the JSON list of journal entries
pub const JOURNAL_ENTRIES_KEY: &str = "reflectaJournalEntries";

/// Key holding the JSON list of saved voice notes
pub const VOICE_NOTES_KEY: &str = "reflectaVoiceNotes";

// =============================================================================
// PEER DIRECTORY
// =============================================================================

pub struct SeedPeer {
    pub id: &'static str,
    pub name: &'static str,
    pub emotion: Emotion,
    pub snippet: &'static str,
    pub profile_pic: &'static str,
}

/// Candidates shown on the connections page
pub const POTENTIAL_CONNECTIONS: &[SeedPeer] = &[
    SeedPeer {
        id: "user1",
        name: "AquaSoul7",
        emotion: Emotion::Grateful,
        snippet: "Finding joy in the little moments. Let's share some positivity.",
        profile_pic: "https://images.pexels.com/photos/415829/pexels-photo-415829.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2",
    },
    SeedPeer {
        id: "user2",
        name: "StarGazer",
        emotion: Emotion::Anxious,
        snippet: "My mind races a lot, especially at night. Looking for someone who gets it.",
        profile_pic: "https://images.pexels.com/photos/1065084/pexels-photo-1065084.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2",
    },
    SeedPeer {
        id: "user3",
        name: "Wanderer",
        emotion: Emotion::Lonely,
        snippet: "Sometimes the world feels big and I feel small. Just want to find a real connection.",
        profile_pic: "https://images.pexels.com/photos/733872/pexels-photo-733872.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2",
    },
    SeedPeer {
        id: "user4",
        name: "RockClimber",
        emotion: Emotion::Stressed,
        snippet: "Feeling overwhelmed with work and life. Need to vent to someone who won't judge.",
        profile_pic: "https://images.pexels.com/photos/1181686/pexels-photo-1181686.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2",
    },
    SeedPeer {
        id: "user5",
        name: "BookwormBree",
        emotion: Emotion::Happy,
        snippet: "Just finished a great book and feeling inspired! Happy to chat about anything and everything.",
        profile_pic: "https://images.pexels.com/photos/1587009/pexels-photo-1587009.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2",
    },
    SeedPeer {
        id: "user6",
        name: "OceanEyes",
        emotion: Emotion::Sad,
        snippet: "Going through a tough time and could really use a friend to talk to. Feeling pretty down.",
        profile_pic: "https://images.pexels.com/photos/1239291/pexels-photo-1239291.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2",
    },
];

// =============================================================================
// JOURNAL
// =============================================================================

pub struct SeedJournalEntry {
    pub id: &'static str,
    pub author: &'static str,
    pub content: &'static str,
    pub emotion: Emotion,
    pub age_hours: i64,
    pub reactions: u32,
}

/// Community entries shown before anything has been written
pub const MOCK_JOURNAL_ENTRIES: &[SeedJournalEntry] = &[
    SeedJournalEntry {
        id: "1",
        author: "AquaSoul7",
        content: "Felt a wave of gratitude today. The sun was shining and I had a really nice conversation with a stranger. It's the small things that make a big difference.",
        emotion: Emotion::Grateful,
        age_hours: 2,
        reactions: 12,
    },
    SeedJournalEntry {
        id: "2",
        author: "StarGazer",
        content: "Work has been so stressful lately. I feel like I'm drowning in deadlines and expectations. Trying to remember to breathe and take it one step at a time.",
        emotion: Emotion::Stressed,
        age_hours: 8,
        reactions: 25,
    },
    SeedJournalEntry {
        id: "3",
        author: "Wanderer",
        content: "Feeling a bit lonely tonight. Scrolling through social media and seeing everyone out with friends. Sometimes it's hard to feel like you belong.",
        emotion: Emotion::Lonely,
        age_hours: 24,
        reactions: 42,
    },
];

// =============================================================================
// DEMO REQUESTS
// =============================================================================

/// Incoming requests waiting for a user right after sign-in: (id, from, emotion, age in hours)
pub const SEED_INCOMING_REQUESTS: &[(&str, &str, Emotion, i64)] = &[
    ("req1", "Wanderer", Emotion::Lonely, 2),
    ("req2", "RockClimber", Emotion::Stressed, 24),
];

/// Prefix of ids given to requests the user sends
pub const SENT_REQUEST_ID_PREFIX: &str = "sent_";

// =============================================================================
// MODERATION
// =============================================================================

/// Words masked by the keyword filter (matched case-insensitively, whole words)
pub const BANNED_WORDS: &[&str] = &["offensive", "inappropriate", "badword", "hate"];

// =============================================================================
// SERVER CONFIGURATION
// =============================================================================

/// Default server port if not specified in environment
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Default SQLite location for the key-value store
pub const DEFAULT_DATABASE_URL: &str = "sqlite://reflecta.db?mode=rwc";

/// Default pool size for the key-value store
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

// =============================================================================
// HELPER FUNCTIONS FOR VALIDATION
// =============================================================================

/// A handle or email must contain something other than whitespace
pub fn is_valid_identity_field(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Storage key remembering `username`'s avatar
pub fn profile_pic_key(username: &str) -> String {
    format!("{}{}", username, PROFILE_PIC_KEY_SUFFIX)
}
