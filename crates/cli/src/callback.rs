use crate::auth_state::AuthState;
use crate::navigator::{Navigator, Route};
use crate::ports::{AuthApi, HistoryApi, MusicApi};
use anima_client::{CreatePlaylistRequest, MemoryStorage, SessionStore, Storage, UserRecord};
use anyhow::Result;
use std::sync::Arc;
use url::Url;

/// `state` values carrying this prefix mark an account-linking flow
/// started from an authenticated profile, as opposed to login/registration
/// through Spotify.
pub const LINK_STATE_PREFIX: &str = "link:";

const PROCESSED_KEY_PREFIX: &str = "oauth_processed:";

/// Query parameters of one callback URL. Lives only for the duration of a
/// single invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallbackParams {
    pub token: Option<String>,
    pub error: Option<String>,
    pub code: Option<String>,
    pub state: Option<String>,
    raw_query: String,
}

impl CallbackParams {
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self {
            raw_query: query.to_string(),
            ..Self::default()
        };
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                "token" => &mut params.token,
                "error" => &mut params.error,
                "code" => &mut params.code,
                "state" => &mut params.state,
                _ => continue,
            };
            // First occurrence wins, like URLSearchParams.get.
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }

    pub fn from_url(input: &str) -> Result<Self> {
        let url = Url::parse(input)?;
        Ok(Self::from_query(url.query().unwrap_or("")))
    }

    pub fn raw_query(&self) -> &str {
        &self.raw_query
    }
}

/// The mutually exclusive sub-flows a callback URL can describe, in
/// dispatch precedence order (the already-processed guard sits above these
/// and is owned by the handler).
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackKind {
    ProviderError(String),
    DirectToken(String),
    LinkCode { code: String, state: String },
    BareCode(String),
    Empty,
}

pub fn classify(params: &CallbackParams) -> CallbackKind {
    if let Some(error) = &params.error {
        return CallbackKind::ProviderError(error.clone());
    }
    if let Some(token) = &params.token {
        return CallbackKind::DirectToken(token.clone());
    }
    if let Some(code) = &params.code {
        if let Some(state) = &params.state {
            if state.starts_with(LINK_STATE_PREFIX) {
                return CallbackKind::LinkCode {
                    code: code.clone(),
                    state: state.clone(),
                };
            }
        }
        return CallbackKind::BareCode(code.clone());
    }
    CallbackKind::Empty
}

/// Consumes one OAuth redirect and brings the session to a consistent
/// state, then hands control back to the shell through the navigator.
/// Every network call is made at most once per invocation; there are no
/// retries.
pub struct CallbackHandler {
    auth: Arc<dyn AuthApi>,
    history: Arc<dyn HistoryApi>,
    music: Arc<dyn MusicApi>,
    session: SessionStore,
    /// Process-lifetime idempotency markers, keyed by exact query string.
    processed: Arc<MemoryStorage>,
    navigator: Arc<dyn Navigator>,
}

impl CallbackHandler {
    pub fn new(
        auth: Arc<dyn AuthApi>,
        history: Arc<dyn HistoryApi>,
        music: Arc<dyn MusicApi>,
        session: SessionStore,
        processed: Arc<MemoryStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            auth,
            history,
            music,
            session,
            processed,
            navigator,
        }
    }

    /// Entry point. Never fails and never leaves the shell without a
    /// destination: any unexpected error lands on the login route.
    pub async fn handle(&self, state: &mut AuthState, params: &CallbackParams) {
        let marker_key = format!("{PROCESSED_KEY_PREFIX}{}", params.raw_query);
        if self.processed.get(&marker_key).is_some() {
            tracing::debug!("Callback already processed, ignoring");
            return;
        }
        // Written before the first await so a duplicate invocation for the
        // same query string bails out above instead of racing this one.
        if let Err(e) = self.processed.set(&marker_key, "1") {
            tracing::warn!("Failed to record callback marker: {e}");
        }

        if let Err(e) = self.dispatch(state, params).await {
            tracing::error!("OAuth callback failed: {e}");
            self.navigator.navigate(Route::Login);
        }
    }

    async fn dispatch(&self, state: &mut AuthState, params: &CallbackParams) -> Result<()> {
        match classify(params) {
            CallbackKind::ProviderError(error) => {
                self.handle_provider_error(&error);
                Ok(())
            }
            CallbackKind::DirectToken(token) => self.handle_direct_token(state, &token).await,
            CallbackKind::LinkCode { code, .. } => self.handle_link_code(state, &code).await,
            CallbackKind::BareCode(code) => self.handle_bare_code(&code).await,
            CallbackKind::Empty => {
                self.navigator.navigate(Route::Login);
                Ok(())
            }
        }
    }

    /// The provider denied or cancelled the flow. Terminal: no network
    /// calls; an existing session stays untouched.
    fn handle_provider_error(&self, error: &str) {
        tracing::warn!("OAuth error from Spotify: {error}");
        if self.session.token().is_some() {
            self.navigator.notify("Spotify authentication was cancelled.");
            self.navigator.navigate(Route::Home);
        } else {
            self.navigator
                .notify("Spotify authentication was cancelled. You can sign in normally.");
            self.navigator.navigate(Route::Login);
        }
    }

    /// The backend already minted a session token and embedded it in the
    /// redirect (login/registration via Spotify). A failing user fetch is
    /// logged, not surfaced; the token is kept either way.
    async fn handle_direct_token(&self, state: &mut AuthState, token: &str) -> Result<()> {
        self.session.set_token(token);
        match self.auth.me().await {
            Ok(user) => state.set_user(Some(user)),
            Err(e) => tracing::error!("Failed to fetch user after OAuth: {e}"),
        }
        self.navigator.navigate(Route::Home);
        Ok(())
    }

    /// Account-linking flow. The exchange failing is a soft failure: the
    /// existing session is untouched and the user still lands home.
    async fn handle_link_code(&self, state: &mut AuthState, code: &str) -> Result<()> {
        match self.auth.link_spotify(code).await {
            Ok(_) => {
                self.navigator.notify("Spotify account linked successfully.");
                match self.refresh_and_reconcile(state).await {
                    Ok(()) => self.navigator.navigate(Route::Home),
                    Err(e) => {
                        // Soft navigation is no longer trustworthy; force a
                        // full re-bootstrap from server-verified state.
                        tracing::error!("Post-link reconciliation failed: {e}");
                        self.navigator.hard_reload(Route::Home);
                    }
                }
            }
            Err(e) => {
                tracing::error!("Failed to link Spotify account: {e}");
                self.navigator.notify(e.detail());
                self.navigator.navigate(Route::Home);
            }
        }
        Ok(())
    }

    /// Refresh the in-memory user from the server, then settle a pending
    /// playlist parked before the link.
    async fn refresh_and_reconcile(&self, state: &mut AuthState) -> Result<()> {
        let refreshed = state.refresh_user().await;
        self.process_pending(refreshed.as_ref()).await?;
        Ok(())
    }

    async fn process_pending(&self, refreshed: Option<&UserRecord>) -> Result<()> {
        let Some(pending) = self.session.pending_playlist() else {
            return Ok(());
        };

        let payload = serde_json::to_value(&pending)?;
        match self.history.save_playlist(&payload).await {
            anima_client::Outcome::Failure(error) => {
                // Keep the record so the user can retry; the Spotify-side
                // creation is skipped entirely.
                tracing::warn!("Could not save the pending playlist: {error}");
            }
            anima_client::Outcome::Success(_) => {
                let current = refreshed.cloned().or_else(|| self.session.user());
                if current.is_some_and(|u| u.spotify_connected) {
                    let request = CreatePlaylistRequest {
                        name: pending.playlist_name.clone(),
                        description: pending.description.clone().unwrap_or_default(),
                        tracks: pending.track_ids(),
                        public: false,
                    };
                    if let anima_client::Outcome::Failure(error) =
                        self.music.create_playlist(&request).await
                    {
                        tracing::warn!("Could not create the playlist on Spotify: {error}");
                        self.navigator.notify(
                            "Playlist saved in Anima, but it could not be created on Spotify \
                             automatically. You can create it manually.",
                        );
                    }
                }
                // Settled in Anima; the Spotify outcome does not bring it
                // back.
                self.session.clear_pending_playlist();
            }
        }
        Ok(())
    }

    /// Direct login/registration via authorization code. The exchange
    /// itself persists whatever session the backend returns.
    async fn handle_bare_code(&self, code: &str) -> Result<()> {
        match self.auth.exchange_spotify_code(code).await {
            Ok(_) => self.navigator.navigate(Route::Home),
            Err(e) => {
                tracing::error!("Spotify code exchange failed: {e}");
                self.navigator.notify(e.detail());
                self.navigator.navigate(Route::Login);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anima_client::{
        ApiError, ApiResult, LoginRequest, Outcome, PendingPlaylistSave, RegisterRequest,
        RegistrationResult, TokenResponse,
    };
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn sample_user(username: &str, spotify_connected: bool) -> UserRecord {
        serde_json::from_value(serde_json::json!({
            "username": username,
            "spotify_connected": spotify_connected,
        }))
        .unwrap()
    }

    #[derive(Default)]
    struct FakeAuth {
        store: Option<SessionStore>,
        me_calls: AtomicUsize,
        exchange_calls: AtomicUsize,
        link_calls: AtomicUsize,
        me_fails: bool,
        exchange_fails: bool,
        link_fails: bool,
        me_user_connected: bool,
    }

    #[async_trait]
    impl AuthApi for FakeAuth {
        async fn login(&self, _credentials: &LoginRequest) -> ApiResult<TokenResponse> {
            unreachable!("not exercised here")
        }

        async fn register(&self, _payload: &RegisterRequest) -> ApiResult<RegistrationResult> {
            unreachable!("not exercised here")
        }

        async fn me(&self) -> ApiResult<UserRecord> {
            self.me_calls.fetch_add(1, Ordering::SeqCst);
            if self.me_fails {
                Err(ApiError::Server("me failed".to_string()))
            } else {
                Ok(sample_user("fresh", self.me_user_connected))
            }
        }

        async fn exchange_spotify_code(&self, _code: &str) -> ApiResult<TokenResponse> {
            self.exchange_calls.fetch_add(1, Ordering::SeqCst);
            if self.exchange_fails {
                return Err(ApiError::BadRequest("invalid code".to_string()));
            }
            let user = sample_user("exchanged", false);
            if let Some(store) = &self.store {
                store.save_session(Some("exchanged-token"), Some(&user));
            }
            Ok(TokenResponse {
                access_token: Some("exchanged-token".to_string()),
                user: Some(user),
            })
        }

        async fn link_spotify(&self, _code: &str) -> ApiResult<TokenResponse> {
            self.link_calls.fetch_add(1, Ordering::SeqCst);
            if self.link_fails {
                return Err(ApiError::BadRequest("link rejected".to_string()));
            }
            let user = sample_user("linked", true);
            if let Some(store) = &self.store {
                store.save_session(Some("linked-token"), Some(&user));
            }
            Ok(TokenResponse {
                access_token: Some("linked-token".to_string()),
                user: Some(user),
            })
        }

        fn logout(&self) {
            if let Some(store) = &self.store {
                store.clear();
            }
        }
    }

    #[derive(Default)]
    struct FakeHistory {
        save_calls: AtomicUsize,
        fail: bool,
        last_payload: Mutex<Option<Value>>,
    }

    #[async_trait]
    impl HistoryApi for FakeHistory {
        async fn save_playlist(&self, playlist: &Value) -> Outcome<Value> {
            self.save_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_payload.lock().unwrap() = Some(playlist.clone());
            if self.fail {
                Outcome::Failure("save failed".to_string())
            } else {
                Outcome::Success(serde_json::json!({ "id": "p1" }))
            }
        }
    }

    #[derive(Default)]
    struct FakeMusic {
        create_calls: AtomicUsize,
        fail: bool,
        last_request: Mutex<Option<CreatePlaylistRequest>>,
    }

    #[async_trait]
    impl MusicApi for FakeMusic {
        async fn create_playlist(&self, playlist: &CreatePlaylistRequest) -> Outcome<Value> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(playlist.clone());
            if self.fail {
                Outcome::Failure("spotify says no".to_string())
            } else {
                Outcome::Success(serde_json::json!({ "id": "sp1" }))
            }
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        navigations: Mutex<Vec<Route>>,
        notices: Mutex<Vec<String>>,
        reloads: Mutex<Vec<Route>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, route: Route) {
            self.navigations.lock().unwrap().push(route);
        }

        fn notify(&self, message: &str) {
            self.notices.lock().unwrap().push(message.to_string());
        }

        fn hard_reload(&self, route: Route) {
            self.reloads.lock().unwrap().push(route);
        }
    }

    struct Harness {
        auth: Arc<FakeAuth>,
        history: Arc<FakeHistory>,
        music: Arc<FakeMusic>,
        navigator: Arc<RecordingNavigator>,
        session: SessionStore,
        handler: CallbackHandler,
        state: AuthState,
    }

    impl Harness {
        fn new(mut auth: FakeAuth, history: FakeHistory, music: FakeMusic) -> Self {
            let session = SessionStore::in_memory();
            auth.store = Some(session.clone());
            let auth = Arc::new(auth);
            let history = Arc::new(history);
            let music = Arc::new(music);
            let navigator = Arc::new(RecordingNavigator::default());
            let handler = CallbackHandler::new(
                Arc::clone(&auth) as Arc<dyn AuthApi>,
                Arc::clone(&history) as Arc<dyn HistoryApi>,
                Arc::clone(&music) as Arc<dyn MusicApi>,
                session.clone(),
                Arc::new(MemoryStorage::new()),
                Arc::clone(&navigator) as Arc<dyn Navigator>,
            );
            let state = AuthState::new(Arc::clone(&auth) as Arc<dyn AuthApi>, session.clone());
            Self {
                auth,
                history,
                music,
                navigator,
                session,
                handler,
                state,
            }
        }

        fn plain() -> Self {
            Self::new(FakeAuth::default(), FakeHistory::default(), FakeMusic::default())
        }

        async fn run(&mut self, query: &str) {
            let params = CallbackParams::from_query(query);
            self.handler.handle(&mut self.state, &params).await;
        }

        fn navigations(&self) -> Vec<Route> {
            self.navigator.navigations.lock().unwrap().clone()
        }

        fn notices(&self) -> Vec<String> {
            self.navigator.notices.lock().unwrap().clone()
        }

        fn seed_pending(&self) {
            let pending: PendingPlaylistSave = serde_json::from_value(serde_json::json!({
                "playlist_name": "Calm",
                "description": "after a rough day",
                "tracks": [
                    { "id": "t1" },
                    { "id": "" },
                    { "name": "no id at all" },
                    { "id": "t2" }
                ]
            }))
            .unwrap();
            self.session.set_pending_playlist(&pending);
        }
    }

    #[test]
    fn classify_checks_error_before_token_before_code() {
        let params = CallbackParams::from_query("error=denied&token=t&code=c&state=link:x");
        assert_eq!(classify(&params), CallbackKind::ProviderError("denied".to_string()));

        let params = CallbackParams::from_query("token=t&code=c&state=link:x");
        assert_eq!(classify(&params), CallbackKind::DirectToken("t".to_string()));

        let params = CallbackParams::from_query("code=c&state=link:x");
        assert_eq!(
            classify(&params),
            CallbackKind::LinkCode {
                code: "c".to_string(),
                state: "link:x".to_string()
            }
        );

        let params = CallbackParams::from_query("code=c&state=other");
        assert_eq!(classify(&params), CallbackKind::BareCode("c".to_string()));

        assert_eq!(classify(&CallbackParams::from_query("")), CallbackKind::Empty);
    }

    #[test]
    fn params_decode_url_encoding_and_accept_full_urls() {
        let params =
            CallbackParams::from_url("http://localhost:3000/auth/callback?code=a%2Bb&state=link%3Axyz")
                .unwrap();
        assert_eq!(params.code.as_deref(), Some("a+b"));
        assert_eq!(params.state.as_deref(), Some("link:xyz"));

        let params = CallbackParams::from_query("?token=abc");
        assert_eq!(params.token.as_deref(), Some("abc"));
        assert_eq!(params.raw_query(), "token=abc");
    }

    #[tokio::test]
    async fn direct_token_persists_and_fetches_user_once() {
        let mut h = Harness::plain();
        h.run("token=T").await;

        assert_eq!(h.session.token(), Some("T".to_string()));
        assert_eq!(h.auth.me_calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.navigations(), vec![Route::Home]);
        assert_eq!(h.state.user().unwrap().username, "fresh");
        assert_eq!(h.session.user().unwrap().username, "fresh");
    }

    #[tokio::test]
    async fn direct_token_keeps_token_and_reaches_home_when_me_fails() {
        let mut h = Harness::new(
            FakeAuth {
                me_fails: true,
                ..FakeAuth::default()
            },
            FakeHistory::default(),
            FakeMusic::default(),
        );
        h.run("token=T").await;

        assert_eq!(h.session.token(), Some("T".to_string()));
        assert_eq!(h.navigations(), vec![Route::Home]);
        assert!(h.state.user().is_none());
    }

    #[tokio::test]
    async fn bare_code_exchanges_once_and_navigates_home() {
        let mut h = Harness::plain();
        h.run("code=C").await;

        assert_eq!(h.auth.exchange_calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.session.token(), Some("exchanged-token".to_string()));
        assert_eq!(h.navigations(), vec![Route::Home]);
    }

    #[tokio::test]
    async fn bare_code_failure_surfaces_detail_and_goes_to_login() {
        let mut h = Harness::new(
            FakeAuth {
                exchange_fails: true,
                ..FakeAuth::default()
            },
            FakeHistory::default(),
            FakeMusic::default(),
        );
        h.run("code=C").await;

        assert_eq!(h.navigations(), vec![Route::Login]);
        assert!(h.notices().iter().any(|n| n.contains("invalid code")));
        assert_eq!(h.session.token(), None);
    }

    #[tokio::test]
    async fn link_code_saves_pending_and_creates_on_spotify() {
        let mut h = Harness::new(
            FakeAuth {
                me_user_connected: true,
                ..FakeAuth::default()
            },
            FakeHistory::default(),
            FakeMusic::default(),
        );
        h.seed_pending();
        h.run("code=C&state=link:xyz").await;

        assert_eq!(h.auth.link_calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.history.save_calls.load(Ordering::SeqCst), 1);
        let saved = h.history.last_payload.lock().unwrap().clone().unwrap();
        assert_eq!(saved.get("playlist_name").and_then(|v| v.as_str()), Some("Calm"));

        assert_eq!(h.music.create_calls.load(Ordering::SeqCst), 1);
        let created = h.music.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(created.tracks, vec!["t1".to_string(), "t2".to_string()]);
        assert!(!created.public);

        assert!(h.session.pending_playlist().is_none());
        assert_eq!(h.navigations(), vec![Route::Home]);
    }

    #[tokio::test]
    async fn link_history_failure_keeps_pending_and_skips_spotify() {
        let mut h = Harness::new(
            FakeAuth {
                me_user_connected: true,
                ..FakeAuth::default()
            },
            FakeHistory {
                fail: true,
                ..FakeHistory::default()
            },
            FakeMusic::default(),
        );
        h.seed_pending();
        h.run("code=C&state=link:xyz").await;

        assert_eq!(h.history.save_calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.music.create_calls.load(Ordering::SeqCst), 0);
        assert!(h.session.pending_playlist().is_some());
        assert_eq!(h.navigations(), vec![Route::Home]);
    }

    #[tokio::test]
    async fn link_spotify_create_failure_still_clears_pending() {
        let mut h = Harness::new(
            FakeAuth {
                me_user_connected: true,
                ..FakeAuth::default()
            },
            FakeHistory::default(),
            FakeMusic {
                fail: true,
                ..FakeMusic::default()
            },
        );
        h.seed_pending();
        h.run("code=C&state=link:xyz").await;

        assert_eq!(h.music.create_calls.load(Ordering::SeqCst), 1);
        assert!(h.session.pending_playlist().is_none());
        assert!(h.notices().iter().any(|n| n.contains("could not be created on Spotify")));
        assert_eq!(h.navigations(), vec![Route::Home]);
    }

    #[tokio::test]
    async fn link_skips_spotify_when_user_not_connected() {
        let mut h = Harness::plain();
        h.seed_pending();
        h.run("code=C&state=link:xyz").await;

        assert_eq!(h.history.save_calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.music.create_calls.load(Ordering::SeqCst), 0);
        assert!(h.session.pending_playlist().is_none());
    }

    #[tokio::test]
    async fn link_exchange_failure_soft_fails_to_home() {
        let mut h = Harness::new(
            FakeAuth {
                link_fails: true,
                ..FakeAuth::default()
            },
            FakeHistory::default(),
            FakeMusic::default(),
        );
        h.session.set_token("existing");
        h.seed_pending();
        h.run("code=C&state=link:xyz").await;

        assert_eq!(h.auth.link_calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.history.save_calls.load(Ordering::SeqCst), 0);
        assert!(h.notices().iter().any(|n| n.contains("link rejected")));
        assert_eq!(h.navigations(), vec![Route::Home]);
        // The existing session is untouched.
        assert_eq!(h.session.token(), Some("existing".to_string()));
    }

    #[tokio::test]
    async fn provider_error_goes_home_with_a_session_and_to_login_without() {
        let mut h = Harness::plain();
        h.session.set_token("t1");
        h.run("error=access_denied").await;
        assert_eq!(h.navigations(), vec![Route::Home]);
        assert_eq!(h.auth.me_calls.load(Ordering::SeqCst), 0);

        let mut h = Harness::plain();
        h.run("error=access_denied").await;
        assert_eq!(h.navigations(), vec![Route::Login]);
        assert!(h.notices().iter().any(|n| n.contains("sign in normally")));
    }

    #[tokio::test]
    async fn empty_params_go_to_login() {
        let mut h = Harness::plain();
        h.run("").await;
        assert_eq!(h.navigations(), vec![Route::Login]);
    }

    #[tokio::test]
    async fn second_run_of_the_same_query_is_a_no_op() {
        let mut h = Harness::plain();
        h.run("token=T").await;
        let token_after_first = h.session.token();
        let user_after_first = h.session.user();

        h.run("token=T").await;

        assert_eq!(h.auth.me_calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.navigations().len(), 1);
        assert_eq!(h.session.token(), token_after_first);
        assert_eq!(h.session.user(), user_after_first);
    }

    #[tokio::test]
    async fn distinct_query_strings_are_processed_independently() {
        let mut h = Harness::plain();
        h.run("token=T1").await;
        h.run("token=T2").await;

        assert_eq!(h.auth.me_calls.load(Ordering::SeqCst), 2);
        assert_eq!(h.session.token(), Some("T2".to_string()));
    }

    #[tokio::test]
    async fn preseeded_marker_means_zero_calls_and_zero_navigations() {
        let mut h = Harness::plain();
        h.handler
            .processed
            .set(&format!("{PROCESSED_KEY_PREFIX}token=T"), "1")
            .unwrap();

        h.run("token=T").await;

        assert_eq!(h.auth.me_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.auth.exchange_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.auth.link_calls.load(Ordering::SeqCst), 0);
        assert!(h.navigations().is_empty());
        assert_eq!(h.session.token(), None);
    }
}
