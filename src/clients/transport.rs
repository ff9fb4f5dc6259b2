//! The seam between the resource layer and the wire.
//!
//! Entries and collections never talk to `reqwest` directly; they hold a
//! shared [`Transport`] and hand it [`HttpRequest`]s. [`HttpClient`] is the
//! production implementation. Tests substitute an in-memory one.
//!
//! [`HttpClient`]: crate::clients::HttpClient

use crate::clients::errors::HttpError;
use crate::clients::http_request::HttpRequest;
use crate::clients::http_response::HttpResponse;

/// Sends requests to the AWeber API on behalf of the resource layer.
///
/// Implementations expand relative URLs against [`api_base`](Self::api_base),
/// encode `data` according to the method, authenticate the request, and
/// turn any non-2xx answer into [`HttpError::Service`].
#[allow(async_fn_in_trait)]
pub trait Transport: Send + Sync {
    /// Base URL that relative resource URLs are resolved against,
    /// e.g. `https://api.aweber.com/1.0`.
    fn api_base(&self) -> &str;

    /// Sends a request and returns the full response.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request cannot be sent or the API
    /// answers with an error status.
    async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}
