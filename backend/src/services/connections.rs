use chrono::{Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::constants::{DEFAULT_PROFILE_PIC, SEED_INCOMING_REQUESTS, SENT_REQUEST_ID_PREFIX};
use crate::models::{Connection, ConnectionRequest, Emotion, Relationships, RequestStatus, User};
use crate::services::directory::PeerDirectory;

/// Why a lifecycle operation left the state untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    #[error("no user is signed in")]
    Unauthenticated,
    #[error("no pending request with id {0}")]
    RequestNotFound(String),
    #[error("no connection with id {0}")]
    ConnectionNotFound(String),
    #[error("already connected with {0}")]
    AlreadyConnected(String),
    #[error("a request to {0} is already pending")]
    AlreadyRequested(String),
    #[error("cannot send a connection request to yourself")]
    SelfRequest,
}

impl ConnectionError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::RequestNotFound(_) | Self::ConnectionNotFound(_) => "not_found",
            Self::AlreadyConnected(_) => "already_connected",
            Self::AlreadyRequested(_) => "already_requested",
            Self::SelfRequest => "self_request",
        }
    }
}

/// Owns one user's pending requests and connections and every transition
/// between them.
///
/// Every operation either applies fully or returns an error without touching
/// any list, so a repeated UI action (double-clicking "accept") is harmless.
#[derive(Debug, Clone, Default)]
pub struct ConnectionLifecycleManager {
    directory: PeerDirectory,
    incoming: Vec<ConnectionRequest>,
    outgoing: Vec<ConnectionRequest>,
    connections: Vec<Connection>,
}

impl ConnectionLifecycleManager {
    pub fn new(directory: PeerDirectory) -> Self {
        Self {
            directory,
            incoming: Vec::new(),
            outgoing: Vec::new(),
            connections: Vec::new(),
        }
    }

    pub fn directory(&self) -> &PeerDirectory {
        &self.directory
    }

    pub fn incoming(&self) -> &[ConnectionRequest] {
        &self.incoming
    }

    pub fn outgoing(&self) -> &[ConnectionRequest] {
        &self.outgoing
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn is_connected(&self, a: &str, b: &str) -> bool {
        self.connections.iter().any(|c| c.is_between(a, b))
    }

    pub fn has_pending_request(&self, from: &str, to: &str) -> bool {
        self.outgoing
            .iter()
            .any(|r| r.from_user == from && r.to_user == to)
    }

    /// Records `user` is party to, for display.
    pub fn view_for(&self, user: &User) -> Relationships {
        let me = user.username.as_str();
        Relationships {
            incoming: self.incoming.iter().filter(|r| r.to_user == me).cloned().collect(),
            outgoing: self.outgoing.iter().filter(|r| r.from_user == me).cloned().collect(),
            connections: self.connections.iter().filter(|c| c.involves(me)).cloned().collect(),
        }
    }

    pub fn seed_incoming(&mut self, requests: impl IntoIterator<Item = ConnectionRequest>) {
        self.incoming.extend(requests);
    }

    /// Demo requests from the directory addressed to `user`.
    pub fn demo_requests_for(&self, user: &User) -> Vec<ConnectionRequest> {
        let now = Utc::now();
        SEED_INCOMING_REQUESTS
            .iter()
            .filter(|(_, from, _, _)| *from != user.username)
            .map(|(id, from, emotion, age_hours)| ConnectionRequest {
                id: id.to_string(),
                from_user: from.to_string(),
                to_user: user.username.clone(),
                status: RequestStatus::Pending,
                timestamp: now - Duration::hours(*age_hours),
                emotion: *emotion,
                profile_pic: self.directory.avatar_for(from).map(str::to_string),
            })
            .collect()
    }

    /// Drops every request and connection; the directory is kept.
    pub fn clear(&mut self) {
        self.incoming.clear();
        self.outgoing.clear();
        self.connections.clear();
    }

    pub fn send_connection_request(
        &mut self,
        actor: Option<&User>,
        to_user: &str,
        emotion: Emotion,
        avatar_ref: Option<String>,
    ) -> Result<ConnectionRequest, ConnectionError> {
        let me = actor.ok_or(ConnectionError::Unauthenticated)?;

        if me.username == to_user {
            return Err(ConnectionError::SelfRequest);
        }
        if self.is_connected(&me.username, to_user) {
            return Err(ConnectionError::AlreadyConnected(to_user.to_string()));
        }
        if self.has_pending_request(&me.username, to_user) {
            return Err(ConnectionError::AlreadyRequested(to_user.to_string()));
        }

        let request = ConnectionRequest {
            id: format!("{}{}", SENT_REQUEST_ID_PREFIX, Uuid::new_v4()),
            from_user: me.username.clone(),
            to_user: to_user.to_string(),
            status: RequestStatus::Pending,
            timestamp: Utc::now(),
            emotion,
            profile_pic: Some(avatar_ref.unwrap_or_else(|| me.profile_pic.clone())),
        };

        info!("{} sent a connection request to {}", me.username, to_user);
        self.outgoing.push(request.clone());
        Ok(request)
    }

    pub fn accept_request(
        &mut self,
        actor: Option<&User>,
        request_id: &str,
    ) -> Result<Connection, ConnectionError> {
        let me = actor.ok_or(ConnectionError::Unauthenticated)?;
        let index = self
            .incoming_index(&me.username, request_id)
            .ok_or_else(|| ConnectionError::RequestNotFound(request_id.to_string()))?;

        let from_user = self.incoming[index].from_user.clone();
        if self.is_connected(&me.username, &from_user) {
            return Err(ConnectionError::AlreadyConnected(from_user));
        }

        let request = self.incoming.remove(index);
        let peer_pic = self
            .directory
            .avatar_for(&request.from_user)
            .unwrap_or(DEFAULT_PROFILE_PIC)
            .to_string();

        let connection = Connection {
            id: request.id,
            users: [me.username.clone(), request.from_user],
            profile_pics: [me.profile_pic.clone(), peer_pic],
            timestamp: Utc::now(),
            emotion: request.emotion,
        };

        info!("{} accepted a connection with {}", me.username, connection.users[1]);
        self.connections.push(connection.clone());
        Ok(connection)
    }

    /// Returns the dropped request marked `Rejected`.
    pub fn reject_request(
        &mut self,
        actor: Option<&User>,
        request_id: &str,
    ) -> Result<ConnectionRequest, ConnectionError> {
        let me = actor.ok_or(ConnectionError::Unauthenticated)?;
        let index = self
            .incoming_index(&me.username, request_id)
            .ok_or_else(|| ConnectionError::RequestNotFound(request_id.to_string()))?;

        let mut request = self.incoming.remove(index);
        request.status = RequestStatus::Rejected;
        debug!("{} rejected request {} from {}", me.username, request.id, request.from_user);
        Ok(request)
    }

    pub fn cancel_sent_request(
        &mut self,
        actor: Option<&User>,
        request_id: &str,
    ) -> Result<ConnectionRequest, ConnectionError> {
        let me = actor.ok_or(ConnectionError::Unauthenticated)?;
        let index = self
            .outgoing
            .iter()
            .position(|r| r.id == request_id && r.from_user == me.username)
            .ok_or_else(|| ConnectionError::RequestNotFound(request_id.to_string()))?;

        let request = self.outgoing.remove(index);
        debug!("{} withdrew request {} to {}", me.username, request.id, request.to_user);
        Ok(request)
    }

    /// Turns a connection back into a pending request from the other member.
    ///
    /// The request reuses the connection id and keeps its emotion, so the
    /// number of records (requests plus connections) is unchanged.
    pub fn remove_connection(
        &mut self,
        actor: Option<&User>,
        connection_id: &str,
    ) -> Result<ConnectionRequest, ConnectionError> {
        let me = actor.ok_or(ConnectionError::Unauthenticated)?;
        let not_found = || ConnectionError::ConnectionNotFound(connection_id.to_string());

        let index = self
            .connections
            .iter()
            .position(|c| c.id == connection_id && c.involves(&me.username))
            .ok_or_else(not_found)?;
        let other = self.connections[index]
            .other_member_index(&me.username)
            .ok_or_else(not_found)?;

        let connection = self.connections.remove(index);
        let [first_user, second_user] = connection.users;
        let [first_pic, second_pic] = connection.profile_pics;
        let (other_user, other_pic) = if other == 0 {
            (first_user, first_pic)
        } else {
            (second_user, second_pic)
        };

        let request = ConnectionRequest {
            id: connection.id,
            from_user: other_user,
            to_user: me.username.clone(),
            status: RequestStatus::Pending,
            timestamp: Utc::now(),
            emotion: connection.emotion,
            profile_pic: Some(other_pic),
        };

        info!("{} removed the connection with {}", me.username, request.from_user);
        self.incoming.insert(0, request.clone());
        Ok(request)
    }

    fn incoming_index(&self, me: &str, request_id: &str) -> Option<usize> {
        self.incoming
            .iter()
            .position(|r| r.id == request_id && r.to_user == me)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> User {
        User {
            username: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            profile_pic: format!("https://pics.example/{}.jpg", name),
            status: "Available to connect".to_string(),
        }
    }

    fn pending(id: &str, from: &str, to: &str, emotion: Emotion) -> ConnectionRequest {
        ConnectionRequest {
            id: id.to_string(),
            from_user: from.to_string(),
            to_user: to.to_string(),
            status: RequestStatus::Pending,
            timestamp: Utc::now(),
            emotion,
            profile_pic: None,
        }
    }

    fn manager_with(incoming: Vec<ConnectionRequest>) -> ConnectionLifecycleManager {
        let mut manager = ConnectionLifecycleManager::new(PeerDirectory::seeded());
        manager.seed_incoming(incoming);
        manager
    }

    fn record_count(manager: &ConnectionLifecycleManager) -> usize {
        manager.incoming().len() + manager.outgoing().len() + manager.connections().len()
    }

    #[test]
    fn test_accept_then_remove_scenario() {
        let me = user("Me");
        let mut manager = manager_with(vec![pending("r1", "Wanderer", "Me", Emotion::Lonely)]);

        let connection = manager.accept_request(Some(&me), "r1").unwrap();
        assert!(manager.incoming().is_empty());
        assert_eq!(manager.connections().len(), 1);
        assert_eq!(connection.id, "r1");
        assert_eq!(connection.users, ["Me".to_string(), "Wanderer".to_string()]);
        assert_eq!(connection.profile_pics[0], me.profile_pic);
        assert!(connection.profile_pics[1].contains("733872"));
        assert_eq!(connection.emotion, Emotion::Lonely);

        let reverted = manager.remove_connection(Some(&me), "r1").unwrap();
        assert!(manager.connections().is_empty());
        assert_eq!(manager.incoming(), &[reverted.clone()]);
        assert_eq!(reverted.from_user, "Wanderer");
        assert_eq!(reverted.to_user, "Me");
        assert_eq!(reverted.status, RequestStatus::Pending);
        assert_eq!(reverted.emotion, Emotion::Lonely);
        assert_eq!(reverted.profile_pic.as_deref(), Some(connection.profile_pics[1].as_str()));
    }

    #[test]
    fn test_reverted_request_can_be_accepted_again() {
        let me = user("Me");
        let mut manager = manager_with(vec![pending("r1", "StarGazer", "Me", Emotion::Anxious)]);

        manager.accept_request(Some(&me), "r1").unwrap();
        let reverted = manager.remove_connection(Some(&me), "r1").unwrap();
        let again = manager.accept_request(Some(&me), &reverted.id).unwrap();

        assert!(again.is_between("Me", "StarGazer"));
        assert_eq!(manager.connections().len(), 1);
        assert!(manager.incoming().is_empty());
    }

    #[test]
    fn test_accept_unknown_peer_falls_back_to_default_avatar() {
        let me = user("Me");
        let mut manager = manager_with(vec![pending("r9", "Stranger", "Me", Emotion::Sad)]);

        let connection = manager.accept_request(Some(&me), "r9").unwrap();
        assert_eq!(connection.profile_pics[1], DEFAULT_PROFILE_PIC);
    }

    #[test]
    fn test_accept_twice_creates_one_connection() {
        let me = user("Me");
        let mut manager = manager_with(vec![pending("r1", "Wanderer", "Me", Emotion::Lonely)]);

        manager.accept_request(Some(&me), "r1").unwrap();
        let second = manager.accept_request(Some(&me), "r1");

        assert_eq!(second, Err(ConnectionError::RequestNotFound("r1".to_string())));
        assert_eq!(manager.connections().len(), 1);
    }

    #[test]
    fn test_reject_leaves_connections_and_outgoing_alone() {
        let me = user("Me");
        let mut manager = manager_with(vec![
            pending("r1", "Wanderer", "Me", Emotion::Lonely),
            pending("r2", "RockClimber", "Me", Emotion::Stressed),
        ]);
        manager.accept_request(Some(&me), "r2").unwrap();
        manager
            .send_connection_request(Some(&me), "OceanEyes", Emotion::Sad, None)
            .unwrap();
        let connections_before = manager.connections().to_vec();
        let outgoing_before = manager.outgoing().to_vec();

        let rejected = manager.reject_request(Some(&me), "r1").unwrap();

        assert_eq!(rejected.status, RequestStatus::Rejected);
        assert!(manager.incoming().is_empty());
        assert_eq!(manager.connections(), connections_before.as_slice());
        assert_eq!(manager.outgoing(), outgoing_before.as_slice());
    }

    #[test]
    fn test_send_carries_sender_avatar() {
        let me = user("Me");
        let mut manager = manager_with(Vec::new());

        let request = manager
            .send_connection_request(Some(&me), "BookwormBree", Emotion::Happy, None)
            .unwrap();

        assert!(request.id.starts_with(SENT_REQUEST_ID_PREFIX));
        assert_eq!(request.from_user, "Me");
        assert_eq!(request.to_user, "BookwormBree");
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.profile_pic.as_deref(), Some(me.profile_pic.as_str()));
        assert_eq!(manager.outgoing(), &[request]);
    }

    #[test]
    fn test_send_to_connected_peer_is_refused() {
        let me = user("Me");
        let mut manager = manager_with(vec![pending("r1", "Wanderer", "Me", Emotion::Lonely)]);
        manager.accept_request(Some(&me), "r1").unwrap();

        let result = manager.send_connection_request(Some(&me), "Wanderer", Emotion::Lonely, None);

        assert_eq!(result, Err(ConnectionError::AlreadyConnected("Wanderer".to_string())));
        assert!(manager.outgoing().is_empty());
    }

    #[test]
    fn test_one_pending_request_per_peer() {
        let me = user("Me");
        let mut manager = manager_with(Vec::new());

        manager
            .send_connection_request(Some(&me), "StarGazer", Emotion::Anxious, None)
            .unwrap();
        let duplicate = manager.send_connection_request(Some(&me), "StarGazer", Emotion::Sad, None);

        assert_eq!(duplicate, Err(ConnectionError::AlreadyRequested("StarGazer".to_string())));
        assert_eq!(manager.outgoing().len(), 1);
    }

    #[test]
    fn test_cannot_request_self() {
        let me = user("Me");
        let mut manager = manager_with(Vec::new());

        let result = manager.send_connection_request(Some(&me), "Me", Emotion::Happy, None);
        assert_eq!(result, Err(ConnectionError::SelfRequest));
        assert!(manager.outgoing().is_empty());
    }

    #[test]
    fn test_signed_out_actor_changes_nothing() {
        let me = user("Me");
        let mut manager = manager_with(vec![pending("r1", "Wanderer", "Me", Emotion::Lonely)]);
        manager
            .send_connection_request(Some(&me), "OceanEyes", Emotion::Sad, None)
            .unwrap();

        assert_eq!(
            manager.send_connection_request(None, "StarGazer", Emotion::Anxious, None),
            Err(ConnectionError::Unauthenticated)
        );
        assert_eq!(manager.accept_request(None, "r1"), Err(ConnectionError::Unauthenticated));
        assert_eq!(manager.reject_request(None, "r1"), Err(ConnectionError::Unauthenticated));
        let sent_id = manager.outgoing()[0].id.clone();
        assert_eq!(manager.cancel_sent_request(None, &sent_id), Err(ConnectionError::Unauthenticated));
        assert_eq!(manager.remove_connection(None, "r1"), Err(ConnectionError::Unauthenticated));

        assert_eq!(manager.incoming().len(), 1);
        assert_eq!(manager.outgoing().len(), 1);
    }

    #[test]
    fn test_unknown_ids_change_nothing() {
        let me = user("Me");
        let mut manager = manager_with(vec![
            pending("r1", "Wanderer", "Me", Emotion::Lonely),
            pending("r2", "RockClimber", "Me", Emotion::Stressed),
        ]);
        manager.accept_request(Some(&me), "r2").unwrap();
        manager
            .send_connection_request(Some(&me), "OceanEyes", Emotion::Sad, None)
            .unwrap();
        let before = manager.view_for(&me);

        assert!(matches!(
            manager.accept_request(Some(&me), "missing"),
            Err(ConnectionError::RequestNotFound(_))
        ));
        assert!(manager.reject_request(Some(&me), "missing").is_err());
        assert!(manager.cancel_sent_request(Some(&me), "missing").is_err());
        assert!(matches!(
            manager.remove_connection(Some(&me), "missing"),
            Err(ConnectionError::ConnectionNotFound(_))
        ));

        assert_eq!(manager.view_for(&me), before);
    }

    #[test]
    fn test_requests_for_someone_else_are_out_of_reach() {
        let me = user("Me");
        let mut manager = manager_with(vec![pending("r1", "Wanderer", "SomeoneElse", Emotion::Lonely)]);

        assert!(manager.accept_request(Some(&me), "r1").is_err());
        assert!(manager.reject_request(Some(&me), "r1").is_err());
        assert_eq!(manager.incoming().len(), 1);
        assert!(manager.view_for(&me).incoming.is_empty());

        let other = user("Other");
        manager
            .send_connection_request(Some(&other), "StarGazer", Emotion::Anxious, None)
            .unwrap();
        let sent_id = manager.outgoing()[0].id.clone();
        assert!(manager.cancel_sent_request(Some(&me), &sent_id).is_err());
        assert_eq!(manager.outgoing().len(), 1);
    }

    #[test]
    fn test_cancel_removes_only_outgoing_copy() {
        let me = user("Me");
        let mut manager = manager_with(vec![pending("r1", "Wanderer", "Me", Emotion::Lonely)]);
        let sent = manager
            .send_connection_request(Some(&me), "StarGazer", Emotion::Anxious, None)
            .unwrap();

        let cancelled = manager.cancel_sent_request(Some(&me), &sent.id).unwrap();

        assert_eq!(cancelled.id, sent.id);
        assert!(manager.outgoing().is_empty());
        assert_eq!(manager.incoming().len(), 1);
        // After cancelling, the same peer can be asked again.
        assert!(manager
            .send_connection_request(Some(&me), "StarGazer", Emotion::Anxious, None)
            .is_ok());
    }

    #[test]
    fn test_remove_conserves_record_count() {
        let me = user("Me");
        let mut manager = manager_with(vec![
            pending("r1", "Wanderer", "Me", Emotion::Lonely),
            pending("r2", "RockClimber", "Me", Emotion::Stressed),
        ]);
        manager.accept_request(Some(&me), "r1").unwrap();
        let before = record_count(&manager);

        let reverted = manager.remove_connection(Some(&me), "r1").unwrap();

        assert_eq!(record_count(&manager), before);
        assert_eq!(manager.incoming()[0], reverted, "reverted request goes first");
    }

    #[test]
    fn test_remove_resolves_other_member_from_either_slot() {
        let me = user("Me");
        let mut manager = ConnectionLifecycleManager::new(PeerDirectory::seeded());
        manager.connections.push(Connection {
            id: "c1".to_string(),
            users: ["OceanEyes".to_string(), "Me".to_string()],
            profile_pics: ["ocean.jpg".to_string(), "me.jpg".to_string()],
            timestamp: Utc::now(),
            emotion: Emotion::Sad,
        });

        let reverted = manager.remove_connection(Some(&me), "c1").unwrap();

        assert_eq!(reverted.from_user, "OceanEyes");
        assert_eq!(reverted.profile_pic.as_deref(), Some("ocean.jpg"));
    }

    #[test]
    fn test_demo_requests_skip_the_user_themself() {
        let manager = ConnectionLifecycleManager::new(PeerDirectory::seeded());

        let for_me = manager.demo_requests_for(&user("Me"));
        assert_eq!(for_me.len(), SEED_INCOMING_REQUESTS.len());
        assert!(for_me.iter().all(|r| r.to_user == "Me" && r.profile_pic.is_some()));

        let for_wanderer = manager.demo_requests_for(&user("Wanderer"));
        assert!(for_wanderer.iter().all(|r| r.from_user != "Wanderer"));
    }

    #[test]
    fn test_clear_keeps_directory() {
        let me = user("Me");
        let mut manager = manager_with(vec![pending("r1", "Wanderer", "Me", Emotion::Lonely)]);
        manager.accept_request(Some(&me), "r1").unwrap();

        manager.clear();

        assert_eq!(record_count(&manager), 0);
        assert!(!manager.directory().is_empty());
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(ConnectionError::Unauthenticated.code(), "unauthenticated");
        assert_eq!(ConnectionError::RequestNotFound("x".into()).code(), "not_found");
        assert_eq!(ConnectionError::ConnectionNotFound("x".into()).code(), "not_found");
        assert_eq!(ConnectionError::AlreadyConnected("x".into()).code(), "already_connected");
        assert_eq!(ConnectionError::AlreadyRequested("x".into()).code(), "already_requested");
        assert_eq!(ConnectionError::SelfRequest.code(), "self_request");
    }
}
