//! Service contracts for the flows in this crate. The concrete clients
//! implement them by delegation; tests swap in counting fakes.

use anima_client::{
    ApiResult, AuthClient, CreatePlaylistRequest, HistoryClient, LoginRequest, MusicClient,
    Outcome, RegisterRequest, RegistrationResult, TokenResponse, UserRecord,
};
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &LoginRequest) -> ApiResult<TokenResponse>;
    async fn register(&self, payload: &RegisterRequest) -> ApiResult<RegistrationResult>;
    async fn me(&self) -> ApiResult<UserRecord>;
    async fn exchange_spotify_code(&self, code: &str) -> ApiResult<TokenResponse>;
    async fn link_spotify(&self, code: &str) -> ApiResult<TokenResponse>;
    fn logout(&self);
}

#[async_trait]
pub trait HistoryApi: Send + Sync {
    async fn save_playlist(&self, playlist: &Value) -> Outcome<Value>;
}

#[async_trait]
pub trait MusicApi: Send + Sync {
    async fn create_playlist(&self, playlist: &CreatePlaylistRequest) -> Outcome<Value>;
}

#[async_trait]
impl AuthApi for AuthClient {
    async fn login(&self, credentials: &LoginRequest) -> ApiResult<TokenResponse> {
        AuthClient::login(self, credentials).await
    }

    async fn register(&self, payload: &RegisterRequest) -> ApiResult<RegistrationResult> {
        AuthClient::register(self, payload).await
    }

    async fn me(&self) -> ApiResult<UserRecord> {
        AuthClient::me(self).await
    }

    async fn exchange_spotify_code(&self, code: &str) -> ApiResult<TokenResponse> {
        AuthClient::exchange_spotify_code(self, code).await
    }

    async fn link_spotify(&self, code: &str) -> ApiResult<TokenResponse> {
        AuthClient::link_spotify(self, code).await
    }

    fn logout(&self) {
        AuthClient::logout(self);
    }
}

#[async_trait]
impl HistoryApi for HistoryClient {
    async fn save_playlist(&self, playlist: &Value) -> Outcome<Value> {
        HistoryClient::save_playlist(self, playlist).await
    }
}

#[async_trait]
impl MusicApi for MusicClient {
    async fn create_playlist(&self, playlist: &CreatePlaylistRequest) -> Outcome<Value> {
        MusicClient::create_playlist(self, playlist).await
    }
}
