use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::storage::{KeyValueStore, StoreError};

/// Prefix of the per-token session records.
pub const SESSION_KEY: &str = "login_user";

/// Opaque handle a caller presents to reach its own session record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Accepts only the 32-digit hex form handed out by [`SessionToken::generate`].
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let valid = raw.len() == 32 && raw.chars().all(|c| c.is_ascii_hexdigit());
        valid.then(|| Self(raw.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn storage_key(&self) -> String {
        format!("{SESSION_KEY}_{}", self.0)
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The signed-in user as returned by the account service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: u64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("could not encode session user: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Signed-in users, one record per issued token.
pub struct Session<S> {
    store: Arc<S>,
}

impl<S> Clone for Session<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// No token, an unknown token, or a malformed record all read as signed out.
    pub fn current_user(
        &self,
        token: Option<&SessionToken>,
    ) -> Result<Option<SessionUser>, SessionError> {
        let Some(token) = token else {
            return Ok(None);
        };
        let Some(raw) = self.store.get(&token.storage_key())? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(err) => {
                warn!(error = %err, "ignoring unreadable session record");
                Ok(None)
            }
        }
    }

    pub fn is_signed_in(&self, token: Option<&SessionToken>) -> Result<bool, SessionError> {
        Ok(self.current_user(token)?.is_some())
    }

    pub fn sign_in(&self, user: &SessionUser) -> Result<SessionToken, SessionError> {
        let token = SessionToken::generate();
        let encoded = serde_json::to_string(user)?;
        self.store.set(&token.storage_key(), encoded)?;
        info!(user_id = user.id, "session started");
        Ok(token)
    }

    pub fn logout(&self, token: &SessionToken) -> Result<(), SessionError> {
        self.store.remove(&token.storage_key())?;
        info!("session ended");
        Ok(())
    }
}
