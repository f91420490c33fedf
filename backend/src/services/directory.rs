use crate::constants::POTENTIAL_CONNECTIONS;
use crate::models::{Emotion, Peer};

/// Read-only lookup of the peers a user can browse and connect with.
#[derive(Debug, Clone, Default)]
pub struct PeerDirectory {
    peers: Vec<Peer>,
}

impl PeerDirectory {
    pub fn new(peers: Vec<Peer>) -> Self {
        Self { peers }
    }

    /// Directory seeded from the built-in candidate list.
    pub fn seeded() -> Self {
        let peers = POTENTIAL_CONNECTIONS
            .iter()
            .map(|seed| Peer {
                id: seed.id.to_string(),
                name: seed.name.to_string(),
                emotion: seed.emotion,
                snippet: seed.snippet.to_string(),
                profile_pic: seed.profile_pic.to_string(),
            })
            .collect();
        Self { peers }
    }

    pub fn find(&self, handle: &str) -> Option<&Peer> {
        self.peers.iter().find(|p| p.name == handle)
    }

    pub fn avatar_for(&self, handle: &str) -> Option<&str> {
        self.find(handle).map(|p| p.profile_pic.as_str())
    }

    /// Peers matching `emotion` (all when `None`), never including `exclude`.
    pub fn browse(&self, emotion: Option<Emotion>, exclude: Option<&str>) -> Vec<&Peer> {
        self.peers
            .iter()
            .filter(|p| Some(p.name.as_str()) != exclude)
            .filter(|p| emotion.is_none_or(|e| p.emotion == e))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_directory_resolves_avatars() {
        let directory = PeerDirectory::seeded();
        assert_eq!(directory.len(), POTENTIAL_CONNECTIONS.len());

        let wanderer = directory.avatar_for("Wanderer").unwrap();
        assert!(wanderer.contains("733872"));
        assert!(directory.avatar_for("Nobody").is_none());
    }

    #[test]
    fn test_browse_filters_by_emotion_and_excludes_self() {
        let directory = PeerDirectory::seeded();

        let everyone_but_me = directory.browse(None, Some("AquaSoul7"));
        assert_eq!(everyone_but_me.len(), directory.len() - 1);
        assert!(everyone_but_me.iter().all(|p| p.name != "AquaSoul7"));

        let lonely = directory.browse(Some(Emotion::Lonely), None);
        assert_eq!(lonely.len(), 1);
        assert_eq!(lonely[0].name, "Wanderer");

        let lonely_without_wanderer = directory.browse(Some(Emotion::Lonely), Some("Wanderer"));
        assert!(lonely_without_wanderer.is_empty());
    }
}
