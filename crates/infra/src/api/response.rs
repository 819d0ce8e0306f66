//! Response handling shared by every request path

use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode};
use serde_json::Value;

use super::errors::ApiError;
use super::request::Payload;

/// Turn a response into a payload, or into `ApiError::Request` for non-2xx.
pub(crate) async fn read_payload(response: Response) -> Result<Payload, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(request_error(response).await);
    }

    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(is_json_content_type);

    let text = response.text().await?;
    if is_json && !text.trim().is_empty() {
        serde_json::from_str(&text)
            .map(Payload::Json)
            .map_err(|e| ApiError::Decode(format!("Invalid JSON body ({}): {}", status, e)))
    } else {
        Ok(Payload::Text(text))
    }
}

/// Build `ApiError::Request` from a non-2xx response.
///
/// An unreadable body falls back to the synthesized status line.
pub(crate) async fn request_error(response: Response) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    ApiError::Request { status, message: error_message(status, &body) }
}

/// Message precedence: `detail` → `message` → `"HTTP <status>: <reason>"`.
///
/// A non-string `detail` (e.g. a validation error list) is used only when
/// no `message` string is present, rendered as compact JSON.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let field = |name: &str| parsed.as_ref().and_then(|value| value.get(name));

    if let Some(Value::String(detail)) = field("detail") {
        return detail.clone();
    }
    if let Some(Value::String(message)) = field("message") {
        return message.clone();
    }
    match field("detail") {
        Some(detail) if !detail.is_null() => detail.to_string(),
        _ => status_line(status),
    }
}

fn status_line(status: StatusCode) -> String {
    format!("HTTP {}: {}", status.as_u16(), status.canonical_reason().unwrap_or("Unknown Status"))
}

fn is_json_content_type(value: &str) -> bool {
    let essence = value.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}
