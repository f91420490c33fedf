use anyhow::Result;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::constants::{
    is_valid_identity_field, profile_pic_key, DEFAULT_PROFILE_PIC, LOGIN_STATUS,
    REGISTERED_STATUS, SESSION_USER_KEY,
};
use crate::db::kv;
use crate::models::User;
use crate::utils::moderation::filter_offensive_content;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("{0} must not be empty")]
    MissingField(&'static str),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Identity provider backed by the key-value store.
///
/// Identity is self-asserted: logging in with a handle is enough to act as it.
#[derive(Debug, Clone)]
pub struct SessionStore {
    pool: SqlitePool,
}

impl SessionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn current_user(&self) -> Result<Option<User>> {
        let Some(raw) = kv::get(&self.pool, SESSION_USER_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                // A corrupt record is the same as being signed out.
                warn!("Discarding unreadable session record: {}", e);
                kv::remove(&self.pool, SESSION_USER_KEY).await?;
                Ok(None)
            }
        }
    }

    pub async fn register(&self, username: &str, email: &str) -> Result<User, SessionError> {
        let (username, email) = validate_identity(username, email)?;
        let user = User {
            username,
            email,
            profile_pic: DEFAULT_PROFILE_PIC.to_string(),
            status: REGISTERED_STATUS.to_string(),
        };

        self.save(&user).await?;
        kv::set(&self.pool, &profile_pic_key(&user.username), &user.profile_pic).await?;
        info!("Registered {}", user.username);
        Ok(user)
    }

    /// Signs in, restoring the avatar remembered for this handle if any.
    pub async fn login(&self, username: &str, email: &str) -> Result<User, SessionError> {
        let (username, email) = validate_identity(username, email)?;
        let profile_pic = kv::get(&self.pool, &profile_pic_key(&username))
            .await?
            .unwrap_or_else(|| DEFAULT_PROFILE_PIC.to_string());

        let user = User {
            username,
            email,
            profile_pic,
            status: LOGIN_STATUS.to_string(),
        };

        self.save(&user).await?;
        info!("{} signed in", user.username);
        Ok(user)
    }

    /// Returns the user that was signed in, if any.
    pub async fn logout(&self) -> Result<Option<User>> {
        let user = self.current_user().await?;
        kv::remove(&self.pool, SESSION_USER_KEY).await?;
        if let Some(user) = &user {
            info!("{} signed out", user.username);
        }
        Ok(user)
    }

    pub async fn update_profile_picture(&self, data_url: &str) -> Result<Option<User>> {
        let Some(mut user) = self.current_user().await? else {
            return Ok(None);
        };

        user.profile_pic = data_url.to_string();
        self.save(&user).await?;
        kv::set(&self.pool, &profile_pic_key(&user.username), data_url).await?;
        Ok(Some(user))
    }

    /// Overwrites the profile fields. The status text is passed through the
    /// keyword filter since it is shown to other users.
    pub async fn update_profile(
        &self,
        username: &str,
        email: &str,
        status: &str,
    ) -> Result<Option<User>, SessionError> {
        let (username, email) = validate_identity(username, email)?;
        let Some(mut user) = self.current_user().await? else {
            return Ok(None);
        };

        if user.username != username {
            // The remembered avatar follows the handle
            kv::set(&self.pool, &profile_pic_key(&username), &user.profile_pic).await?;
        }

        user.username = username;
        user.email = email;
        user.status = filter_offensive_content(status);
        self.save(&user).await?;
        Ok(Some(user))
    }

    async fn save(&self, user: &User) -> Result<()> {
        let raw = serde_json::to_string(user)?;
        kv::set(&self.pool, SESSION_USER_KEY, &raw).await
    }
}

fn validate_identity(username: &str, email: &str) -> Result<(String, String), SessionError> {
    if !is_valid_identity_field(username) {
        return Err(SessionError::MissingField("username"));
    }
    if !is_valid_identity_field(email) {
        return Err(SessionError::MissingField("email"));
    }
    Ok((username.trim().to_string(), email.trim().to_string()))
}
