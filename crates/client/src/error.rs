use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("API error: {0}")]
    Api(String),
}

impl ApiError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::Network(_) => "Could not reach the server. Check your connection.",
            ApiError::Timeout(_) => "The request took too long. Try again.",
            ApiError::BadRequest(_) => "Invalid input. Check the submitted data.",
            ApiError::Unauthorized(_) => "Authentication failed. Please sign in again.",
            ApiError::Forbidden(_) => "This account is not allowed to do that.",
            ApiError::NotFound(_) => "The requested resource was not found.",
            ApiError::Validation(_) => "Validation failed. Check the submitted fields.",
            ApiError::Server(_) => "Server error. Try again later.",
            ApiError::Api(_) => "Something went wrong. Try again.",
        }
    }

    /// The server-provided detail (or the fallback text the variant was
    /// built with). Call sites that surface errors to the user prefer this
    /// over the generic category text.
    pub fn detail(&self) -> &str {
        match self {
            ApiError::Network(msg)
            | ApiError::Timeout(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Validation(msg)
            | ApiError::Server(msg)
            | ApiError::Api(msg) => msg,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ApiError::Timeout("The request took too long. Try again.".to_string())
        } else if error.is_connect() {
            ApiError::Network(
                "Could not reach the server. Check that the backend is running.".to_string(),
            )
        } else if error.is_decode() {
            ApiError::Api("Unexpected response from the server.".to_string())
        } else {
            ApiError::Network(error.to_string())
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The `{success, data} / {success, error}` convention used by the
/// history/music clients and the password-reset endpoints. Call sites match
/// on it instead of catching; `from_result` is the adapter from the
/// throw-style core.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    Failure(String),
}

impl<T> Outcome<T> {
    pub fn from_result(result: ApiResult<T>) -> Self {
        match result {
            Ok(data) => Outcome::Success(data),
            Err(e) => Outcome::Failure(e.detail().to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Outcome::Success(data) => Some(data),
            Outcome::Failure(_) => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Outcome::Success(data) => Some(data),
            Outcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(msg) => Some(msg),
        }
    }
}
