use crate::error::Outcome;
use crate::http::{build_client, send_json, with_bearer};
use crate::session::SessionStore;
use crate::types::{AnalysisFilters, AnalysisRecord, Page, PlaylistFilters, PlaylistRecord};
use reqwest::Client;
use serde_json::Value;

/// Saved playlists and emotion-analysis history. Every method follows the
/// result-object convention; callers match on `Outcome` instead of
/// propagating errors.
#[derive(Clone)]
pub struct HistoryClient {
    http: Client,
    base_url: String,
    store: SessionStore,
}

impl HistoryClient {
    pub fn new(base_url: impl Into<String>, store: SessionStore) -> Self {
        Self {
            http: build_client(),
            base_url: base_url.into(),
            store,
        }
    }

    pub async fn save_playlist(&self, playlist: &Value) -> Outcome<Value> {
        let request = with_bearer(
            self.http
                .post(format!("{}/api/history/playlists", self.base_url))
                .json(playlist),
            &self.store,
        );
        Outcome::from_result(send_json(request).await)
    }

    pub async fn get_playlists(&self, filters: &PlaylistFilters) -> Outcome<Page<PlaylistRecord>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(page) = filters.page {
            query.push(("page", page.to_string()));
        }
        if let Some(page_size) = filters.page_size {
            query.push(("page_size", page_size.to_string()));
        }
        if let Some(ref emotion) = filters.emotion {
            query.push(("emotion", emotion.clone()));
        }
        if let Some(is_favorite) = filters.is_favorite {
            query.push(("is_favorite", is_favorite.to_string()));
        }

        let request = with_bearer(
            self.http
                .get(format!("{}/api/history/playlists", self.base_url))
                .query(&query),
            &self.store,
        );
        Outcome::from_result(send_json(request).await)
    }

    pub async fn get_playlist(&self, id: &str) -> Outcome<Value> {
        let request = with_bearer(
            self.http
                .get(format!("{}/api/history/playlists/{id}", self.base_url)),
            &self.store,
        );
        Outcome::from_result(send_json(request).await)
    }

    pub async fn update_playlist(&self, id: &str, patch: &Value) -> Outcome<Value> {
        let request = with_bearer(
            self.http
                .patch(format!("{}/api/history/playlists/{id}", self.base_url))
                .json(patch),
            &self.store,
        );
        Outcome::from_result(send_json(request).await)
    }

    pub async fn delete_playlist(&self, id: &str) -> Outcome<Value> {
        let request = with_bearer(
            self.http
                .delete(format!("{}/api/history/playlists/{id}", self.base_url)),
            &self.store,
        );
        Outcome::from_result(send_json(request).await)
    }

    pub async fn get_analyses(&self, filters: &AnalysisFilters) -> Outcome<Page<AnalysisRecord>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(page) = filters.page {
            query.push(("page", page.to_string()));
        }
        if let Some(page_size) = filters.page_size {
            query.push(("page_size", page_size.to_string()));
        }
        if let Some(ref emotion) = filters.emotion {
            query.push(("emotion", emotion.clone()));
        }

        let request = with_bearer(
            self.http
                .get(format!("{}/api/history/analyses", self.base_url))
                .query(&query),
            &self.store,
        );
        Outcome::from_result(send_json(request).await)
    }

    pub async fn get_stats(&self) -> Outcome<Value> {
        let request = with_bearer(
            self.http
                .get(format!("{}/api/history/stats", self.base_url)),
            &self.store,
        );
        Outcome::from_result(send_json(request).await)
    }
}
