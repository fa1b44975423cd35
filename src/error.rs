//! Error types for the GoCardless API client.
//!
//! Every operation returns [`Result`], whose error side is [`Error`]. API
//! failures reported by the server carry a decoded [`ApiError`].

use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// A specialized `Result` type for GoCardless operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all GoCardless API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport failure (connection, DNS, timeout) or request build failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error envelope or a non-success status
    #[error("API error: {0}")]
    Api(ApiError),

    /// The response envelope carried neither an error nor the expected payload
    #[error("missing result: response has no `{resource}` payload")]
    MissingResult {
        /// Envelope key that was expected
        resource: &'static str,
    },

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid input provided to a function
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns `true` if this error is potentially transient.
    ///
    /// Used by [`RetryPolicy::TransientOnly`](crate::RetryPolicy::TransientOnly);
    /// the default policy retries every error regardless.
    ///
    /// # Example
    ///
    /// ```
    /// use gocardless_rs::Error;
    ///
    /// let err = Error::MissingResult { resource: "creditor_bank_accounts" };
    /// assert!(err.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => !e.is_builder(),
            Error::Api(api) => api.code == 429 || api.code >= 500,
            Error::MissingResult { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a client-side issue
    /// (invalid input, validation failure, bad request, etc.).
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Api(api) => (400..500).contains(&api.code),
            Error::InvalidInput(_) | Error::Config(_) | Error::UrlParse(_) => true,
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a server-side issue.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Api(api) if api.code >= 500)
    }

    /// Returns `true` if the server answered without the expected payload.
    pub fn is_missing_result(&self) -> bool {
        matches!(self, Error::MissingResult { .. })
    }

    /// The decoded API error, if this is one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(api) => Some(api),
            _ => None,
        }
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Error::Api(err)
    }
}

/// Error object returned in the `error` field of a response envelope.
///
/// ```json
/// {
///   "error": {
///     "message": "Bank account already disabled",
///     "type": "invalid_state",
///     "code": 422,
///     "request_id": "0AA0...",
///     "documentation_url": "https://developer.gocardless.com/api-reference#disable_failed",
///     "errors": [{ "reason": "disable_failed", "message": "Bank account already disabled" }]
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    /// Human-readable error message
    #[serde(default)]
    pub message: String,
    /// Broad error category
    #[serde(rename = "type", default)]
    pub error_type: ApiErrorType,
    /// HTTP status code of the failure
    #[serde(default)]
    pub code: u16,
    /// Server-side request identifier, useful for support requests
    #[serde(default)]
    pub request_id: Option<String>,
    /// Link to the documentation for this error
    #[serde(default)]
    pub documentation_url: Option<String>,
    /// Individual errors, one per offending field or condition
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

impl ApiError {
    /// Build an error for a non-success response that carried no error object.
    pub(crate) fn from_status(status: StatusCode, body: &str) -> Self {
        let message = if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("Unknown API error")
                .to_string()
        } else {
            body.trim().to_string()
        };

        let error_type = if status.is_server_error() {
            ApiErrorType::GoCardless
        } else {
            ApiErrorType::InvalidApiUsage
        };

        ApiError {
            message,
            error_type,
            code: status.as_u16(),
            request_id: None,
            documentation_url: None,
            errors: Vec::new(),
        }
    }

    /// Machine-readable reasons of the individual errors (e.g. `disable_failed`).
    pub fn reasons(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().filter_map(|e| e.reason.as_deref())
    }

    /// Returns `true` if any individual error carries the given reason.
    pub fn has_reason(&self, reason: &str) -> bool {
        self.reasons().any(|r| r == reason)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status={}, type={}, message={}", self.code, self.error_type, self.message)?;
        if let Some(ref id) = self.request_id {
            write!(f, ", request_id={}", id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Broad category of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    /// Internal error on the provider's side
    #[serde(rename = "gocardless")]
    GoCardless,
    /// Malformed request, bad authentication, missing headers
    InvalidApiUsage,
    /// Request conflicts with the current state of the resource
    InvalidState,
    /// One or more parameters failed validation
    ValidationFailed,
    /// A category this client does not know about
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ApiErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ApiErrorType::GoCardless => "gocardless",
            ApiErrorType::InvalidApiUsage => "invalid_api_usage",
            ApiErrorType::InvalidState => "invalid_state",
            ApiErrorType::ValidationFailed => "validation_failed",
            ApiErrorType::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// A single entry of [`ApiError::errors`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorDetail {
    /// Machine-readable reason, e.g. `disable_failed`
    #[serde(default)]
    pub reason: Option<String>,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
    /// Offending field for validation errors
    #[serde(default)]
    pub field: Option<String>,
    /// JSON pointer into the request body for validation errors
    #[serde(default)]
    pub request_pointer: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(code: u16) -> Error {
        Error::Api(ApiError::from_status(
            StatusCode::from_u16(code).unwrap(),
            "",
        ))
    }

    #[test]
    fn test_error_retryable() {
        assert!(api_error(500).is_retryable());
        assert!(api_error(429).is_retryable());
        assert!(Error::MissingResult { resource: "creditor_bank_accounts" }.is_retryable());
        assert!(!api_error(422).is_retryable());
        assert!(!Error::InvalidInput("bad".into()).is_retryable());
    }

    #[test]
    fn test_error_classification() {
        assert!(api_error(404).is_client_error());
        assert!(!api_error(404).is_server_error());
        assert!(api_error(503).is_server_error());
        assert!(Error::Config("missing".into()).is_client_error());
        assert!(Error::MissingResult { resource: "x" }.is_missing_result());
    }

    #[test]
    fn test_decode_api_error() {
        let body = serde_json::json!({
            "message": "Bank account already disabled",
            "type": "invalid_state",
            "code": 422,
            "request_id": "req_123",
            "documentation_url": "https://developer.gocardless.com/api-reference#disable_failed",
            "errors": [
                { "reason": "disable_failed", "message": "Bank account already disabled" }
            ]
        });

        let err: ApiError = serde_json::from_value(body).unwrap();
        assert_eq!(err.code, 422);
        assert_eq!(err.error_type, ApiErrorType::InvalidState);
        assert_eq!(err.request_id.as_deref(), Some("req_123"));
        assert!(err.has_reason("disable_failed"));
        assert_eq!(err.reasons().collect::<Vec<_>>(), vec!["disable_failed"]);
    }

    #[test]
    fn test_unknown_error_type() {
        let err: ApiError = serde_json::from_value(serde_json::json!({
            "message": "new kind",
            "type": "brand_new_category",
            "code": 400
        }))
        .unwrap();
        assert_eq!(err.error_type, ApiErrorType::Unknown);
        assert!(err.errors.is_empty());
    }

    #[test]
    fn test_from_status() {
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, "");
        assert_eq!(err.code, 502);
        assert_eq!(err.message, "Bad Gateway");
        assert_eq!(err.error_type, ApiErrorType::GoCardless);

        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, "not json");
        assert_eq!(err.message, "not json");
        assert_eq!(err.error_type, ApiErrorType::InvalidApiUsage);
    }
}
