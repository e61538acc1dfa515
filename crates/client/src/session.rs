use crate::storage::{MemoryStorage, Storage};
use crate::types::{PendingPlaylistSave, UserRecord};
use std::sync::Arc;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";
pub const PENDING_PLAYLIST_KEY: &str = "pending_playlist_save";

/// Durable record of "who is logged in": the token/user pair plus the
/// parked pending-playlist request. Writes that fail are logged and
/// swallowed; a broken store must never abort an auth flow that the
/// backend already committed.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY)
    }

    pub fn set_token(&self, token: &str) {
        if let Err(e) = self.storage.set(TOKEN_KEY, token) {
            tracing::warn!("Failed to persist token: {e}");
        }
    }

    pub fn user(&self) -> Option<UserRecord> {
        let raw = self.storage.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::error!("Failed to parse stored user: {e}");
                None
            }
        }
    }

    pub fn set_user(&self, user: &UserRecord) {
        match serde_json::to_string(user) {
            Ok(json) => {
                if let Err(e) = self.storage.set(USER_KEY, &json) {
                    tracing::warn!("Failed to persist user: {e}");
                }
            }
            Err(e) => tracing::warn!("Failed to serialize user: {e}"),
        }
    }

    pub fn remove_user(&self) {
        if let Err(e) = self.storage.remove(USER_KEY) {
            tracing::warn!("Failed to remove stored user: {e}");
        }
    }

    /// Persist whichever halves of a token/user pair the backend returned.
    pub fn save_session(&self, token: Option<&str>, user: Option<&UserRecord>) {
        if let Some(token) = token {
            self.set_token(token);
        }
        if let Some(user) = user {
            self.set_user(user);
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.storage.remove(TOKEN_KEY) {
            tracing::warn!("Failed to remove token: {e}");
        }
        self.remove_user();
    }

    pub fn pending_playlist(&self) -> Option<PendingPlaylistSave> {
        let raw = self.storage.get(PENDING_PLAYLIST_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(pending) => Some(pending),
            Err(e) => {
                tracing::error!("Failed to parse pending playlist record: {e}");
                None
            }
        }
    }

    pub fn set_pending_playlist(&self, pending: &PendingPlaylistSave) {
        match serde_json::to_string(pending) {
            Ok(json) => {
                if let Err(e) = self.storage.set(PENDING_PLAYLIST_KEY, &json) {
                    tracing::warn!("Failed to persist pending playlist: {e}");
                }
            }
            Err(e) => tracing::warn!("Failed to serialize pending playlist: {e}"),
        }
    }

    pub fn clear_pending_playlist(&self) {
        if let Err(e) = self.storage.remove(PENDING_PLAYLIST_KEY) {
            tracing::warn!("Failed to remove pending playlist: {e}");
        }
    }

    /// Raw access for keys outside the session contract (callback markers
    /// use their own store; this exists for diagnostics).
    pub fn raw(&self) -> &Arc<dyn Storage> {
        &self.storage
    }
}
