use crate::error::ApiError;
use crate::session::SessionStore;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Fixed 10 s request timeout; there is no client-side retry anywhere, a
/// timed-out call surfaces as `ApiError::Timeout` and that attempt is over.
pub(crate) fn build_client() -> Client {
    Client::builder()
        .user_agent("anima/0.1")
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Attach the stored bearer token when one exists. Public endpoints call
/// the request builder directly instead.
pub(crate) fn with_bearer(request: RequestBuilder, store: &SessionStore) -> RequestBuilder {
    match store.token() {
        Some(token) => request.header("Authorization", format!("Bearer {token}")),
        None => request,
    }
}

/// FastAPI error bodies carry `detail` as either a string or an array of
/// field errors with `msg` entries.
pub(crate) fn extract_detail(body: &Value) -> Option<String> {
    match body.get("detail") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| {
                    item.get("msg")
                        .or_else(|| item.get("message"))
                        .and_then(|v| v.as_str())
                })
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join(", "))
            }
        }
        _ => None,
    }
}

pub(crate) fn status_error(status: StatusCode, detail: Option<String>) -> ApiError {
    match status.as_u16() {
        400 => ApiError::BadRequest(detail.unwrap_or_else(|| "Invalid request data.".to_string())),
        401 => {
            ApiError::Unauthorized(detail.unwrap_or_else(|| "Incorrect credentials.".to_string()))
        }
        403 => ApiError::Forbidden(
            detail.unwrap_or_else(|| "This account is inactive or not allowed.".to_string()),
        ),
        404 => ApiError::NotFound(detail.unwrap_or_else(|| "Not found.".to_string())),
        422 => ApiError::Validation(
            detail.unwrap_or_else(|| "Validation failed. Check the submitted fields.".to_string()),
        ),
        s if s >= 500 => {
            ApiError::Server(detail.unwrap_or_else(|| "Server error. Try again later.".to_string()))
        }
        s => ApiError::Api(detail.unwrap_or_else(|| format!("Unexpected response status {s}"))),
    }
}

pub(crate) async fn error_from_response(response: Response) -> ApiError {
    let status = response.status();
    let detail = response
        .json::<Value>()
        .await
        .ok()
        .as_ref()
        .and_then(extract_detail);
    status_error(status, detail)
}

pub(crate) async fn expect_json<T: serde::de::DeserializeOwned>(
    response: Response,
) -> Result<T, ApiError> {
    if response.status().is_success() {
        Ok(response.json::<T>().await?)
    } else {
        Err(error_from_response(response).await)
    }
}

pub(crate) async fn send_json<T: serde::de::DeserializeOwned>(
    request: RequestBuilder,
) -> Result<T, ApiError> {
    expect_json(request.send().await?).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detail_as_string_passes_through() {
        let body = json!({ "detail": "Incorrect credentials" });
        assert_eq!(extract_detail(&body), Some("Incorrect credentials".to_string()));
    }

    #[test]
    fn detail_as_field_errors_is_joined() {
        let body = json!({
            "detail": [
                { "msg": "username too short" },
                { "message": "email invalid" },
                { "loc": ["body", "password"] }
            ]
        });
        assert_eq!(
            extract_detail(&body),
            Some("username too short, email invalid".to_string())
        );
    }

    #[test]
    fn missing_detail_is_none() {
        assert_eq!(extract_detail(&json!({})), None);
        assert_eq!(extract_detail(&json!({ "detail": 42 })), None);
    }

    #[test]
    fn statuses_map_to_distinct_categories() {
        assert!(matches!(
            status_error(StatusCode::BAD_REQUEST, None),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, Some("nope".into())),
            ApiError::Unauthorized(msg) if msg == "nope"
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, None),
            ApiError::Forbidden(_)
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, None),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            status_error(StatusCode::UNPROCESSABLE_ENTITY, None),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, None),
            ApiError::Server(_)
        ));
        assert!(matches!(
            status_error(StatusCode::IM_A_TEAPOT, None),
            ApiError::Api(_)
        ));
    }
}
