use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The user object as returned by the backend. The backend owns the schema;
/// unknown fields ride along in `extra` instead of being rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub spotify_connected: bool,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            _ => self.username.clone(),
        }
    }
}

/// Token/user pair returned by login and the Spotify exchange/link
/// endpoints. Either half may be absent depending on the endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub user: Option<UserRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username_or_email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Registration does not imply login; the backend's response body is
/// returned as-is.
pub type RegistrationResult = Value;

#[derive(Debug, Clone, Serialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

/// A playlist the user asked to save before being authenticated/linked,
/// parked in storage until the linking flow completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingPlaylistSave {
    pub playlist_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tracks: Vec<PendingTrack>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingTrack {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PendingPlaylistSave {
    /// Track ids suitable for the Spotify create call: present and non-empty.
    pub fn track_ids(&self) -> Vec<String> {
        self.tracks
            .iter()
            .filter_map(|t| t.id.clone())
            .filter(|id| !id.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub tracks: Vec<String>,
    pub public: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PlaylistFilters {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub emotion: Option<String>,
    pub is_favorite: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisFilters {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub emotion: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub emotion: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub has_saved_playlist: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub playlist_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub emotion: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
}
