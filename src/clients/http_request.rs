//! HTTP request types for the AWeber API client.
//!
//! This module provides the [`HttpRequest`] type and its builder for
//! constructing requests to the AWeber API.

use std::fmt;

use serde_json::{Map, Value};

use crate::clients::errors::InvalidHttpRequestError;

/// HTTP methods used by the AWeber API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources. Data is sent as query parameters.
    Get,
    /// HTTP POST method for creating resources and invoking operations.
    /// Data is sent form encoded.
    Post,
    /// HTTP PATCH method for partial updates. Data is sent as a JSON body.
    Patch,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    /// Returns the uppercase method name used on the wire and in OAuth signatures.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders a request parameter for a query string or a form body.
///
/// Strings are sent as-is; lists and objects are sent as their JSON text.
///
/// ```rust
/// use aweber_api::clients::param_value;
/// use serde_json::json;
///
/// assert_eq!(param_value(&json!("bob")), "bob");
/// assert_eq!(param_value(&json!(["a", "b"])), r#"["a","b"]"#);
/// ```
#[must_use]
pub fn param_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// An HTTP request to be sent to the AWeber API.
///
/// The `url` may be absolute or relative to the configured API base
/// (e.g. `/accounts/1/lists`). How `data` is transmitted depends on the
/// method: query parameters for GET, a form body for POST, a JSON body
/// for PATCH. DELETE ignores it.
///
/// # Example
///
/// ```rust
/// use aweber_api::clients::{HttpRequest, HttpMethod};
///
/// let request = HttpRequest::builder(HttpMethod::Get, "/accounts/1/lists")
///     .param("ws.start", 20)
///     .param("ws.size", 20)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.data.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// Absolute URL, or a path relative to the API base.
    pub url: String,
    /// Request parameters, in insertion order.
    pub data: Map<String, Value>,
    /// Number of times to attempt the request (default: 1).
    pub tries: u32,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, url: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, url)
    }

    /// Validates the request, ensuring it meets all requirements.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if:
    /// - `url` is empty
    /// - `tries` is zero
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if self.url.trim().is_empty() {
            return Err(InvalidHttpRequestError::InvalidUrl {
                url: self.url.clone(),
            });
        }
        if self.tries == 0 {
            return Err(InvalidHttpRequestError::InvalidTries);
        }
        Ok(())
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    url: String,
    data: Map<String, Value>,
    tries: u32,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            http_method: method,
            url: url.into(),
            data: Map::new(),
            tries: 1,
        }
    }

    /// Adds a single request parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Sets all request parameters at once, replacing previously added ones.
    #[must_use]
    pub fn data(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    /// Sets the number of times to attempt the request.
    ///
    /// Default is 1 (no retries). Set to a higher value to enable
    /// automatic retries for 429 and 500 responses.
    #[must_use]
    pub const fn tries(mut self, tries: u32) -> Self {
        self.tries = tries;
        self
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        let request = HttpRequest {
            http_method: self.http_method,
            url: self.url,
            data: self.data,
            tries: self.tries,
        };
        request.verify()?;
        Ok(request)
    }
}
