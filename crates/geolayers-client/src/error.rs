//! Error types for GeoLayers client operations.
//!
//! Every fallible call returns [`GeoLayersError`], which has three kinds:
//! configuration problems, API failures (with HTTP status and body) and
//! validation failures (with one entry per offending field).

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::normalize::is_truthy;

/// Result type alias using GeoLayersError.
pub type GeoLayersResult<T> = Result<T, GeoLayersError>;

/// Root error type for all client operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoLayersError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl GeoLayersError {
    /// Human-readable message, whatever the kind.
    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn is_config(&self) -> bool {
        matches!(self, GeoLayersError::Config(_))
    }

    pub fn is_api(&self) -> bool {
        matches!(self, GeoLayersError::Api(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, GeoLayersError::Validation(_))
    }

    /// HTTP status for API errors. `Some(0)` means no response was received.
    pub fn status_code(&self) -> Option<u16> {
        self.as_api().map(ApiError::status_code)
    }

    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            GeoLayersError::Api(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            GeoLayersError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

/// Configuration and programming errors. Never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid configuration value for '{field}': {message}")]
    Invalid { field: &'static str, message: String },

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error("No Tokio runtime available: {0}")]
    Runtime(String),

    /// An endpoint descriptor had neither a legacy nor a current path.
    #[error("No endpoint available for either API version")]
    NoEndpointAvailable,
}

/// An HTTP request that failed for good, after any retries.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    /// HTTP status, or 0 when no response was received.
    pub status_code: u16,
    /// Decoded error body, when the server sent one.
    pub response: Option<Value>,
}

impl ApiError {
    pub fn new(message: impl Into<String>, status_code: u16, response: Option<Value>) -> Self {
        Self {
            message: message.into(),
            status_code,
            response,
        }
    }

    /// Failure where the server never answered (connect error, timeout).
    pub fn no_response(message: impl Into<String>) -> Self {
        Self::new(message, 0, None)
    }

    /// Failure with an HTTP response. The message is extracted from the body
    /// when possible, else the transport message is used.
    pub fn from_response(status_code: u16, body: Option<Value>, transport_message: &str) -> Self {
        let message = extract_error_message(body.as_ref(), transport_message);
        Self::new(message, status_code, body)
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn is_no_response(&self) -> bool {
        self.status_code == 0
    }

    /// Whether the status is one a caller could sensibly retry
    /// (no response, 429, or 5xx).
    pub fn is_retryable_status(&self) -> bool {
        self.status_code == 0 || self.status_code == 429 || self.status_code >= 500
    }
}

/// Pick the most useful message from an error response body.
///
/// Precedence: string `message`, array `message` joined with `"; "`,
/// string `error`, `error.message`, the transport message, then
/// `"Unknown error"`.
pub fn extract_error_message(body: Option<&Value>, transport_message: &str) -> String {
    if let Some(body) = body {
        match body.get("message") {
            Some(Value::String(message)) => return message.clone(),
            Some(Value::Array(parts)) => {
                return parts
                    .iter()
                    .map(|part| match part {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join("; ");
            }
            _ => {}
        }

        match body.get("error") {
            Some(Value::String(error)) => return error.clone(),
            Some(error) => {
                if let Some(message) = error.get("message").and_then(non_empty_message) {
                    return message;
                }
            }
            None => {}
        }
    }

    if transport_message.is_empty() {
        "Unknown error".to_string()
    } else {
        transport_message.to_string()
    }
}

/// Falsy values (`""`, `0`, `false`, `null`) do not count as a message.
fn non_empty_message(value: &Value) -> Option<String> {
    if !is_truthy(Some(value)) {
        return None;
    }
    match value {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// One decode failure, located by a JSON path such as `data.features[3]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// A response that did not match the expected shape.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Summarize a non-empty list of field errors for `what` was decoded.
    pub fn new(what: &str, errors: Vec<FieldError>) -> Self {
        let message = match errors.as_slice() {
            [] => format!("Invalid {}", what),
            [only] => format!("Invalid {}: {}", what, only),
            [first, rest @ ..] => format!(
                "Invalid {}: {} (and {} more)",
                what,
                first,
                rest.len()
            ),
        };
        Self { message, errors }
    }

    /// A single failure at `path`.
    pub fn single(what: &str, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(what, vec![FieldError::new(path, message)])
    }
}
