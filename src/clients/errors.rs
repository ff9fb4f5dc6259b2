//! HTTP-specific error types for the AWeber API client.
//!
//! # Error Handling
//!
//! - [`ServiceError`]: Non-2xx HTTP responses from the API
//! - [`MaxHttpRetriesExceededError`]: When retry attempts are exhausted
//! - [`InvalidHttpRequestError`]: When a request fails validation before sending
//! - [`HttpError`]: Unified error type encompassing all HTTP-related errors
//!
//! # Example
//!
//! ```rust,ignore
//! use aweber_api::clients::{HttpError, Transport};
//!
//! match client.request(request).await {
//!     Ok(response) => println!("Success: {}", response.body),
//!     Err(HttpError::Service(e)) => {
//!         println!("AWeber rejected the request ({}): {}", e.code, e);
//!     }
//!     Err(e) => println!("Transport error: {e}"),
//! }
//! ```

use serde_json::Value;
use thiserror::Error;

/// Error returned when the AWeber API answers with a non-successful status.
///
/// AWeber error bodies have the shape
/// `{"error": {"type": "...", "message": "...", "documentation_url": "..."}}`.
/// The error displays as `"{type}: {message}"`.
///
/// # Example
///
/// ```rust
/// use aweber_api::clients::ServiceError;
///
/// let error = ServiceError {
///     code: 403,
///     error_type: "UnauthorizedError".to_string(),
///     message: "Method requires access to Subscriber information.".to_string(),
///     documentation_url: None,
/// };
///
/// assert_eq!(
///     error.to_string(),
///     "UnauthorizedError: Method requires access to Subscriber information."
/// );
/// ```
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{error_type}: {message}")]
pub struct ServiceError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// The AWeber error type, e.g. `NotFoundError`.
    pub error_type: String,
    /// Human readable error message.
    pub message: String,
    /// Link to the error documentation, when the API provides one.
    pub documentation_url: Option<String>,
}

impl ServiceError {
    /// Builds a `ServiceError` from a response status and body.
    ///
    /// Bodies that do not carry the usual `error` object fall back to a
    /// generic type and, for string bodies, use the body text as the message.
    #[must_use]
    pub fn from_response(code: u16, body: &Value) -> Self {
        let error = body.get("error");
        let field = |name: &str| {
            error
                .and_then(|e| e.get(name))
                .and_then(Value::as_str)
                .map(String::from)
        };

        let message = field("message").unwrap_or_else(|| match body {
            Value::String(text) if !text.is_empty() => text.clone(),
            _ => format!("HTTP status {code}"),
        });

        Self {
            code,
            error_type: field("type").unwrap_or_else(|| "APIException".to_string()),
            message,
            documentation_url: field("documentation_url"),
        }
    }
}

/// Error returned when maximum retry attempts have been exhausted.
#[derive(Debug, Error)]
#[error("Exceeded maximum retry count of {tries}. Last error: {last}")]
pub struct MaxHttpRetriesExceededError {
    /// The number of tries that were attempted.
    pub tries: u32,
    /// The error from the last response.
    pub last: ServiceError,
}

/// Error returned when an HTTP request fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// The URL is empty or cannot be parsed after expansion against the API base.
    #[error("Invalid request URL '{url}'.")]
    InvalidUrl {
        /// The URL that was provided.
        url: String,
    },

    /// A request must be attempted at least once.
    #[error("A request must be attempted at least once (tries >= 1).")]
    InvalidTries,
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The API answered with a non-2xx status code.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Maximum retry attempts exhausted.
    #[error(transparent)]
    MaxRetries(#[from] MaxHttpRetriesExceededError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl HttpError {
    /// Returns the service error carried by this error, if the API answered.
    #[must_use]
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            Self::Service(e) => Some(e),
            Self::MaxRetries(e) => Some(&e.last),
            Self::InvalidRequest(_) | Self::Network(_) => None,
        }
    }
}
