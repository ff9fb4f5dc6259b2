//! Error types for resource operations.
//!
//! [`ResourceError`] covers everything that can go wrong while navigating the
//! AWeber resource graph: structural mistakes made by the caller (unknown
//! attributes, offsets past the end of a collection, named operations on the
//! wrong resource type), payloads that do not look like AWeber resources, and
//! failures reported by the transport.
//!
//! Service errors are never swallowed: a non-2xx answer surfaces as
//! [`ResourceError::Http`] with the original [`ServiceError`] inside.
//!
//! # Example
//!
//! ```rust,ignore
//! use aweber_api::rest::ResourceError;
//!
//! match subscriber.save().await {
//!     Ok(()) => println!("saved"),
//!     Err(ResourceError::Http(e)) => {
//!         if let Some(service) = e.service_error() {
//!             println!("AWeber refused ({}): {}", service.code, service);
//!         }
//!     }
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```
//!
//! [`ServiceError`]: crate::clients::ServiceError

use thiserror::Error;

use crate::clients::{HttpError, InvalidHttpRequestError};

/// Error type for resource operations.
///
/// # Example
///
/// ```rust
/// use aweber_api::rest::ResourceError;
///
/// let error = ResourceError::InvalidOperation {
///     operation: "getActivity",
///     required_type: "subscriber",
///     actual_type: "list".to_string(),
/// };
/// assert!(error.to_string().contains("getActivity"));
/// assert!(error.to_string().contains("subscriber"));
/// ```
#[derive(Debug, Error)]
pub enum ResourceError {
    /// A named operation was invoked on a resource of the wrong type.
    #[error("{operation} can only be called on {required_type} resources, not {actual_type}")]
    InvalidOperation {
        /// The `ws.op` name of the operation.
        operation: &'static str,
        /// The resource type the operation requires.
        required_type: &'static str,
        /// The type of the resource it was called on.
        actual_type: String,
    },

    /// The name is neither a field of the entry nor one of its child collections.
    #[error("Unknown attribute: {name}")]
    UnknownAttribute {
        /// The requested attribute name.
        name: String,
    },

    /// The attribute exists but is not a JSON object.
    #[error("Attribute {name} is not an object")]
    NotAnObject {
        /// The requested attribute name.
        name: String,
    },

    /// The offset is outside `0..total_size`.
    #[error("Offset {offset} is out of range for a collection of {total_size} entries")]
    OutOfRange {
        /// The requested offset.
        offset: usize,
        /// The collection's total size.
        total_size: usize,
    },

    /// The collection has no further page to load for this offset.
    #[error("No page available for offset {offset}")]
    PagesExhausted {
        /// The offset that could not be loaded.
        offset: usize,
    },

    /// The payload lacks a field the operation depends on.
    #[error("Response is missing the {field} field")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// The response lacks a header the operation depends on.
    #[error("Response is missing the {header} header")]
    MissingHeader {
        /// Name of the missing header.
        header: &'static str,
    },

    /// The body returned for a URL is not an AWeber resource.
    #[error("Malformed payload from {url}: {reason}")]
    MalformedPayload {
        /// The URL that was requested.
        url: String,
        /// What was wrong with the payload.
        reason: String,
    },

    /// The URL resolved to an entry where a collection was expected, or vice versa.
    #[error("Expected {url} to be a {expected}")]
    UnexpectedShape {
        /// The URL that was requested.
        url: String,
        /// `"entry"` or `"collection"`.
        expected: &'static str,
    },

    /// The transport or the AWeber API reported an error.
    #[error(transparent)]
    Http(#[from] HttpError),
}

impl From<InvalidHttpRequestError> for ResourceError {
    fn from(error: InvalidHttpRequestError) -> Self {
        Self::Http(HttpError::InvalidRequest(error))
    }
}

impl ResourceError {
    /// Returns the HTTP status of a service error, if this is one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.service_error().map(|s| s.code),
            _ => None,
        }
    }
}

// Verify ResourceError implements std::error::Error
const _: fn() = || {
    const fn assert_error<T: std::error::Error + Send + Sync>() {}
    assert_error::<ResourceError>();
};
