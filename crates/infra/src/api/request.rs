//! Request descriptors and response payloads

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::errors::ApiError;

/// Per-call request descriptor
///
/// Built for one call and dropped afterwards. The body is kept as text so
/// the unauthorized-retry path can resend it unchanged.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    /// Caller headers; these override the default `Content-Type`.
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::GET)
    }
}

impl RequestOptions {
    /// Create options for the given method with no headers or body
    pub fn new(method: Method) -> Self {
        Self { method, headers: HeaderMap::new(), body: None }
    }

    /// Add a caller-supplied header
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set a raw text body
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `body` to JSON and use it as the request body
    ///
    /// # Errors
    /// Returns `ApiError::InvalidRequest` if serialization fails
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let encoded = serde_json::to_string(body)
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to serialize body: {}", e)))?;
        self.body = Some(encoded);
        Ok(self)
    }
}

/// Successful response body
///
/// JSON when the response declared a JSON content type, raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    /// Decode the payload into `T`
    ///
    /// Text payloads are parsed as JSON; an empty text payload (e.g. 204 No
    /// Content) decodes from `null`, so `()` and `Option<_>` work.
    ///
    /// # Errors
    /// Returns `ApiError::Decode` if the payload does not match `T`
    pub fn json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let result = match self {
            Self::Json(value) => serde_json::from_value(value),
            Self::Text(text) if text.trim().is_empty() => serde_json::from_value(Value::Null),
            Self::Text(text) => serde_json::from_str(&text),
        };
        result.map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Borrow the JSON value, if this is a JSON payload
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Borrow the text, if this is a text payload
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Json(_) => None,
        }
    }
}
