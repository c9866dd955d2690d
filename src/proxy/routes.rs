//! Route handlers for the analysis proxy.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use super::ProxyState;
use crate::analysis::{error_text, ErrorReply, ANALYZE_PATH};

/// Shown when the backend cannot be reached or replies with garbage.
pub const GENERIC_FAILURE: &str = "Failed to analyze the image. Please try again.";
/// Shown when the backend reports a failure without saying why.
pub const BACKEND_FAILURE: &str = "Failed to analyze image";
/// Shown when the request carries no image.
pub const MISSING_IMAGE: &str = "No image data provided";

fn reply(status: StatusCode, body: impl serde::Serialize) -> Response {
    (status, Json(body)).into_response()
}

fn generic_failure(details: impl Into<String>) -> Response {
    let details = details.into();
    error!(%details, "analysis proxy failed");
    reply(StatusCode::INTERNAL_SERVER_ERROR, ErrorReply::new(GENERIC_FAILURE).with_details(details))
}

/// Error text from a failed backend reply: its `error`, else its `detail`.
fn backend_error_text(value: &Value) -> Option<String> {
    error_text(value).or_else(|| match value.get("detail")? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    })
}

fn has_image(image: &Value) -> bool {
    match image {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// POST /api/analyze
pub async fn post_analyze(
    Extension(state): Extension<ProxyState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            let details = rejection.body_text();
            warn!(%details, "analysis request body rejected");
            return reply(
                rejection.status(),
                ErrorReply::new(GENERIC_FAILURE).with_details(details),
            );
        }
    };
    let request: Value = match serde_json::from_slice::<Value>(&body) {
        Ok(value) if value.is_object() => value,
        Ok(_) => return generic_failure("request body is not a JSON object"),
        Err(e) => return generic_failure(e.to_string()),
    };

    let image = request.get("image").cloned().unwrap_or(Value::Null);
    if !has_image(&image) {
        warn!("analysis request without image data");
        return reply(StatusCode::BAD_REQUEST, ErrorReply::new(MISSING_IMAGE));
    }

    let url = state.analyze_url();
    debug!(%url, "forwarding drawing to backend");
    let response = match state.http.post(&url).json(&json!({ "image": image })).send().await {
        Ok(response) => response,
        Err(e) => return generic_failure(e.to_string()),
    };

    let status = StatusCode::from_u16(response.status().as_u16())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let payload: Value = match response.bytes().await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => return generic_failure(e.to_string()),
        },
        Err(e) => return generic_failure(e.to_string()),
    };

    if !status.is_success() {
        let message = backend_error_text(&payload).unwrap_or_else(|| BACKEND_FAILURE.to_string());
        warn!(status = status.as_u16(), %message, "backend rejected drawing");
        return reply(status, ErrorReply::new(message));
    }

    info!(status = status.as_u16(), "analysis relayed");
    reply(status, payload)
}

/// OPTIONS /api/analyze
pub async fn options_analyze() -> Response {
    let mut response = StatusCode::OK.into_response();
    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization"),
    );
    response
}

/// GET /
pub async fn get_information() -> Html<String> {
    Html(format!("<h1>ChalkX {}</h1>", env!("CARGO_PKG_VERSION")))
}

pub fn routes() -> Router {
    Router::new()
        .route(ANALYZE_PATH, post(post_analyze).options(options_analyze))
        .route("/", get(get_information))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_prefers_error_field() {
        let value = json!({"error": "bad image", "detail": "ignored"});
        assert_eq!(backend_error_text(&value), Some("bad image".to_string()));
    }

    #[test]
    fn test_backend_error_falls_back_to_detail() {
        let value = json!({"detail": "Invalid base64 image data"});
        assert_eq!(backend_error_text(&value), Some("Invalid base64 image data".to_string()));
        assert_eq!(backend_error_text(&json!({})), None);
    }

    #[test]
    fn test_has_image() {
        assert!(has_image(&json!("iVBOR")));
        assert!(!has_image(&json!("")));
        assert!(!has_image(&Value::Null));
        assert!(!has_image(&json!(false)));
    }

    #[tokio::test]
    async fn test_options_sets_cors_headers() {
        let response = options_analyze().await;
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET, POST, OPTIONS");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type, Authorization");
    }
}
