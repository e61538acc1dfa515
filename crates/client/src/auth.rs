use crate::error::{ApiError, ApiResult, Outcome};
use crate::http::{
    build_client, error_from_response, expect_json, extract_detail, status_error, with_bearer,
};
use crate::session::SessionStore;
use crate::types::{
    LoginRequest, RegisterRequest, RegistrationResult, ResetPasswordRequest, TokenResponse,
    UserRecord,
};
use reqwest::Client;
use serde_json::{json, Value};

/// Client for the backend auth endpoints. Persists the session store on the
/// calls that mint or replace a session; the store is the durable record,
/// this type is stateless beyond it.
#[derive(Clone)]
pub struct AuthClient {
    http: Client,
    base_url: String,
    store: SessionStore,
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>, store: SessionStore) -> Self {
        Self {
            http: build_client(),
            base_url: base_url.into(),
            store,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Posts credentials; on success persists the returned session.
    /// Network, timeout, 401, 400 and 5xx each map to their own category;
    /// anything else surfaces as the raw API error.
    pub async fn login(&self, credentials: &LoginRequest) -> ApiResult<TokenResponse> {
        tracing::debug!(user = %credentials.username_or_email, "Logging in");
        let response = self
            .http
            .post(format!("{}/api/auth/login", self.base_url))
            .json(credentials)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response
                .json::<Value>()
                .await
                .ok()
                .as_ref()
                .and_then(extract_detail);
            return Err(match status.as_u16() {
                401 => ApiError::Unauthorized(
                    detail.unwrap_or_else(|| "Incorrect username or password.".to_string()),
                ),
                400 => ApiError::BadRequest(
                    detail.unwrap_or_else(|| "Invalid login data.".to_string()),
                ),
                _ => status_error(status, detail),
            });
        }

        let session: TokenResponse = response.json().await?;
        self.store
            .save_session(session.access_token.as_deref(), session.user.as_ref());
        Ok(session)
    }

    /// Registration does not log the user in; no session is persisted.
    /// A 400 with an array of field errors is flattened into one message.
    pub async fn register(&self, payload: &RegisterRequest) -> ApiResult<RegistrationResult> {
        tracing::debug!(user = %payload.username, "Registering");
        let response = self
            .http
            .post(format!("{}/api/auth/register", self.base_url))
            .json(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let error = error_from_response(response).await;
            return Err(match error {
                // 422 keeps a generic message; the field errors are not
                // user-appropriate here.
                ApiError::Validation(_) => ApiError::Validation(
                    "Validation failed. Check the submitted fields.".to_string(),
                ),
                other => other,
            });
        }

        Ok(response_body(response).await?)
    }

    /// Canonical current user. Fails loudly; callers decide what a missing
    /// identity means.
    pub async fn me(&self) -> ApiResult<UserRecord> {
        let request = with_bearer(
            self.http.get(format!("{}/api/auth/me", self.base_url)),
            &self.store,
        );
        expect_json(request.send().await?).await
    }

    /// Exchange an authorization code without an existing session (direct
    /// login/registration via Spotify). Persists whatever session comes
    /// back, which may be partial.
    pub async fn exchange_spotify_code(&self, code: &str) -> ApiResult<TokenResponse> {
        let response = self
            .http
            .post(format!("{}/api/auth/spotify/exchange", self.base_url))
            .json(&json!({ "code": code }))
            .send()
            .await?;

        let session: TokenResponse = expect_json(response).await?;
        if session.access_token.is_some() {
            self.store
                .save_session(session.access_token.as_deref(), session.user.as_ref());
        }
        Ok(session)
    }

    /// Link a Spotify account to the already-authenticated user. The
    /// backend returns a fresh token/user pair reflecting the link.
    pub async fn link_spotify(&self, code: &str) -> ApiResult<TokenResponse> {
        let request = with_bearer(
            self.http
                .post(format!("{}/api/auth/spotify/link/callback", self.base_url))
                .query(&[("code", code)]),
            &self.store,
        );
        let session: TokenResponse = expect_json(request.send().await?).await?;
        self.store
            .save_session(session.access_token.as_deref(), session.user.as_ref());
        Ok(session)
    }

    /// Public authorization URL, used to start login/registration via
    /// Spotify.
    pub async fn get_spotify_auth_url(&self) -> ApiResult<String> {
        let response = self
            .http
            .get(format!("{}/api/auth/spotify/login", self.base_url))
            .send()
            .await?;
        let body: Value = expect_json(response).await?;
        authorization_url(&body)
    }

    /// Authenticated variant for linking. The backend may respond 200 with
    /// an `error` field; that still counts as a failure.
    pub async fn get_spotify_link_url(&self) -> ApiResult<String> {
        let request = with_bearer(
            self.http
                .get(format!("{}/api/auth/spotify/link", self.base_url)),
            &self.store,
        );
        let body: Value = expect_json(request.send().await?).await?;
        if let Some(error) = body.get("error").and_then(|v| v.as_str()) {
            return Err(ApiError::Api(error.to_string()));
        }
        authorization_url(&body)
    }

    pub async fn disconnect_spotify(&self) -> ApiResult<Value> {
        let request = with_bearer(
            self.http
                .post(format!("{}/api/auth/spotify/disconnect", self.base_url)),
            &self.store,
        );
        expect_json(request.send().await?).await
    }

    /// Patch the profile; the backend echoes the updated user, which is
    /// persisted as the new stored user.
    pub async fn update_profile(&self, patch: &Value) -> ApiResult<UserRecord> {
        let request = with_bearer(
            self.http
                .patch(format!("{}/api/auth/me", self.base_url))
                .json(patch),
            &self.store,
        );
        let user: UserRecord = expect_json(request.send().await?).await?;
        self.store.set_user(&user);
        Ok(user)
    }

    /// Result-object convention: a handful of failure statuses still
    /// surface as `Err` (the call sites historically caught those), the
    /// rest come back as `Outcome::Failure`.
    pub async fn request_password_reset(&self, email: &str) -> ApiResult<Outcome<Value>> {
        tracing::debug!(%email, "Requesting password reset code");
        let response = self
            .http
            .post(format!("{}/api/auth/forgot-password", self.base_url))
            .json(&json!({ "email": email }))
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(Outcome::Success(response_body(response).await?));
        }

        let status = response.status().as_u16();
        let detail = response
            .json::<Value>()
            .await
            .ok()
            .as_ref()
            .and_then(extract_detail);
        classify_forgot_password(status, detail)
    }

    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> ApiResult<Outcome<Value>> {
        tracing::debug!(email = %request.email, "Resetting password");
        let response = self
            .http
            .post(format!("{}/api/auth/reset-password", self.base_url))
            .json(request)
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(Outcome::Success(response_body(response).await?));
        }

        let status = response.status().as_u16();
        let detail = response
            .json::<Value>()
            .await
            .ok()
            .as_ref()
            .and_then(extract_detail);
        classify_reset_password(status, detail)
    }

    /// Clears the persisted session. Purely local.
    pub fn logout(&self) {
        tracing::debug!("Clearing session");
        self.store.clear();
    }
}

async fn response_body(response: reqwest::Response) -> ApiResult<Value> {
    Ok(response.json::<Value>().await.unwrap_or(Value::Null))
}

fn authorization_url(body: &Value) -> ApiResult<String> {
    body.get("authorization_url")
        .and_then(|v| v.as_str())
        .map(String::from)
        .ok_or_else(|| ApiError::Api("No authorization URL in response".to_string()))
}

fn classify_forgot_password(status: u16, detail: Option<String>) -> ApiResult<Outcome<Value>> {
    match status {
        404 => Err(ApiError::NotFound(
            "No account exists with that email.".to_string(),
        )),
        400 => Err(ApiError::BadRequest(match detail {
            Some(d) if d.contains("Spotify") => {
                "This account signs in with Spotify and has no password to recover.".to_string()
            }
            Some(d) => d,
            None => "Invalid email.".to_string(),
        })),
        _ => Ok(Outcome::Failure(
            detail.unwrap_or_else(|| "Could not send the reset code.".to_string()),
        )),
    }
}

fn classify_reset_password(status: u16, detail: Option<String>) -> ApiResult<Outcome<Value>> {
    match status {
        400 => Err(ApiError::BadRequest(
            detail.unwrap_or_else(|| "Invalid or expired code.".to_string()),
        )),
        _ => Ok(Outcome::Failure(
            detail.unwrap_or_else(|| "Could not change the password.".to_string()),
        )),
    }
}
