use crate::error::Outcome;
use crate::http::{build_client, send_json, with_bearer};
use crate::session::SessionStore;
use crate::types::CreatePlaylistRequest;
use reqwest::Client;
use serde_json::Value;

/// Spotify-side playlist operations, proxied through the backend. Requires
/// a linked Spotify account; the backend enforces that.
#[derive(Clone)]
pub struct MusicClient {
    http: Client,
    base_url: String,
    store: SessionStore,
}

impl MusicClient {
    pub fn new(base_url: impl Into<String>, store: SessionStore) -> Self {
        Self {
            http: build_client(),
            base_url: base_url.into(),
            store,
        }
    }

    pub async fn get_user_playlists(&self, limit: u32) -> Outcome<Value> {
        let request = with_bearer(
            self.http
                .get(format!("{}/api/spotify/playlists", self.base_url))
                .query(&[("limit", limit.to_string())]),
            &self.store,
        );
        Outcome::from_result(send_json(request).await)
    }

    pub async fn create_playlist(&self, playlist: &CreatePlaylistRequest) -> Outcome<Value> {
        let request = with_bearer(
            self.http
                .post(format!("{}/api/spotify/playlists", self.base_url))
                .json(playlist),
            &self.store,
        );
        Outcome::from_result(send_json(request).await)
    }
}
