//! HTTP client types for AWeber API communication.
//!
//! This module provides the transport layer between the resource objects and
//! the AWeber API: request/response types, the [`Transport`] seam, and the
//! OAuth-signing [`HttpClient`].
//!
//! # Overview
//!
//! - [`Transport`]: the trait entries and collections send requests through
//! - [`HttpClient`]: the reqwest-based, OAuth 1.0a signed implementation
//! - [`HttpRequest`]: a request to be sent to the API
//! - [`HttpResponse`]: a parsed response from the API
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PATCH, DELETE)
//! - [`HttpError`] / [`ServiceError`]: transport and API failures
//!
//! # Retry Behavior
//!
//! - **429 (Rate Limited)**: Retries using `Retry-After` header value, or 1 second if not present
//! - **500 (Server Error)**: Retries with fixed 1-second delay
//! - **Other errors (4xx)**: Returns immediately without retry
//!
//! The default `tries` is 1, meaning no automatic retries. The resource layer
//! never retries on its own.

mod errors;
mod http_client;
mod http_request;
mod http_response;
mod transport;

pub use errors::{HttpError, InvalidHttpRequestError, MaxHttpRetriesExceededError, ServiceError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{param_value, HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;
pub use transport::Transport;
