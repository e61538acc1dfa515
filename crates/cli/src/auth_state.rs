use crate::ports::AuthApi;
use anima_client::{
    LoginRequest, Outcome, RegisterRequest, RegistrationResult, SessionStore, TokenResponse,
    UserRecord,
};
use std::sync::Arc;

/// In-memory holder of the current user, kept in sync with the session
/// store. Injected into the flows that need it instead of living as
/// ambient global state; initialization from storage is an explicit call.
pub struct AuthState {
    client: Arc<dyn AuthApi>,
    store: SessionStore,
    user: Option<UserRecord>,
    hydrated: bool,
}

impl AuthState {
    pub fn new(client: Arc<dyn AuthApi>, store: SessionStore) -> Self {
        Self {
            client,
            store,
            user: None,
            hydrated: false,
        }
    }

    /// Synchronous hydration from the session store; no network call.
    pub fn hydrate(&mut self) {
        self.user = self.store.user();
        self.hydrated = true;
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    pub fn user(&self) -> Option<&UserRecord> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub async fn login(&mut self, credentials: &LoginRequest) -> Outcome<TokenResponse> {
        match self.client.login(credentials).await {
            Ok(session) => {
                if let Some(user) = &session.user {
                    self.user = Some(user.clone());
                }
                Outcome::Success(session)
            }
            Err(e) => Outcome::Failure(e.detail().to_string()),
        }
    }

    pub async fn register(&mut self, payload: &RegisterRequest) -> Outcome<RegistrationResult> {
        Outcome::from_result(self.client.register(payload).await)
    }

    /// Re-fetch the canonical user. `None` means the identity could not be
    /// fetched and is treated as logged out.
    pub async fn refresh_user(&mut self) -> Option<UserRecord> {
        match self.client.me().await {
            Ok(user) => {
                self.set_user(Some(user.clone()));
                Some(user)
            }
            Err(e) => {
                tracing::warn!("Failed to refresh user: {e}");
                self.set_user(None);
                None
            }
        }
    }

    pub fn logout(&mut self) {
        self.client.logout();
        self.user = None;
    }

    /// Direct setter for flows that already hold a server-confirmed user.
    /// Mirrors to the session store: JSON on `Some`, key removal on `None`.
    pub fn set_user(&mut self, user: Option<UserRecord>) {
        match &user {
            Some(u) => self.store.set_user(u),
            None => self.store.remove_user(),
        }
        self.user = user;
    }
}
