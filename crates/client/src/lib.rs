pub mod auth;
pub mod error;
pub mod history;
pub mod http;
pub mod music;
pub mod session;
pub mod storage;
pub mod types;

pub use auth::AuthClient;
pub use error::{ApiError, ApiResult, Outcome};
pub use history::HistoryClient;
pub use http::DEFAULT_BASE_URL;
pub use music::MusicClient;
pub use session::SessionStore;
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use types::*;
