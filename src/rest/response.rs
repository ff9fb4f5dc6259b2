//! The decoded payload shared by entries and collections.
//!
//! An [`Envelope`] pairs a resource URL with the JSON object the API returned
//! for it and the [`Transport`] used to fetch it. Entries and collections are
//! thin layers over an envelope; everything that needs the network goes
//! through the envelope's adapter.
//!
//! The envelope also hosts the helpers shared by named operations: the
//! resource-type guard, conversion of a bare JSON array into entries, and the
//! exact-count query (`ws.show=total_size`).

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::clients::{HttpClient, HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::rest::collection::Collection;
use crate::rest::entry::Entry;
use crate::rest::path::{relative_url, total_size_url};
use crate::rest::resource::Resource;
use crate::rest::ResourceError;

/// A resource URL, its raw payload, and the transport that produced it.
///
/// The payload is only ever replaced wholesale by a re-fetch; field writes go
/// through [`Entry::set`](crate::rest::Entry::set).
#[derive(Debug)]
pub struct Envelope<A: Transport = HttpClient> {
    url: String,
    data: Map<String, Value>,
    adapter: Arc<A>,
}

impl<A: Transport> Envelope<A> {
    /// Wraps a payload fetched from `url`.
    #[must_use]
    pub fn new(url: impl Into<String>, data: Map<String, Value>, adapter: Arc<A>) -> Self {
        Self {
            url: url.into(),
            data,
            adapter,
        }
    }

    /// The URL the payload was loaded from.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The raw payload.
    #[must_use]
    pub const fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// The shared transport.
    #[must_use]
    pub const fn adapter(&self) -> &Arc<A> {
        &self.adapter
    }

    /// The resource `type` reported by the payload, e.g. `"subscriber"`.
    #[must_use]
    pub fn resource_type(&self) -> Option<&str> {
        self.data.get("type").and_then(Value::as_str)
    }

    /// The canonical absolute URL of the resource.
    #[must_use]
    pub fn self_link(&self) -> Option<&str> {
        self.data.get("self_link").and_then(Value::as_str)
    }

    /// Looks up a raw payload field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    pub(crate) fn data_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.data
    }

    /// Replaces URL and payload after a hard reload.
    pub(crate) fn replace(&mut self, url: String, data: Map<String, Value>) {
        self.url = url;
        self.data = data;
    }

    pub(crate) async fn send(
        &self,
        method: HttpMethod,
        url: &str,
        data: Map<String, Value>,
    ) -> Result<HttpResponse, ResourceError> {
        send(self.adapter.as_ref(), method, url, data).await
    }

    /// Loads any resource through this envelope's transport.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails or the body is not an
    /// AWeber resource.
    pub async fn load_from_url(&self, url: &str) -> Result<Resource<A>, ResourceError> {
        Resource::load(Arc::clone(&self.adapter), url).await
    }

    /// Checks that this resource may run the named operation `operation`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidOperation`] unless the payload's `type`
    /// is `required_type`.
    pub fn named_operation_for(
        &self,
        operation: &'static str,
        required_type: &'static str,
    ) -> Result<(), ResourceError> {
        match self.resource_type() {
            Some(t) if t == required_type => Ok(()),
            other => Err(ResourceError::InvalidOperation {
                operation,
                required_type,
                actual_type: other.unwrap_or_default().to_string(),
            }),
        }
    }

    /// Turns a flat JSON array of entry payloads into entries, in order.
    ///
    /// Each entry's URL is derived from its own `self_link`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedPayload`] if the body is not an
    /// array of objects, or [`ResourceError::MissingField`] if an element has
    /// no `self_link`.
    pub fn parse_named_operation(&self, body: Value) -> Result<Vec<Entry<A>>, ResourceError> {
        let Value::Array(items) = body else {
            return Err(ResourceError::MalformedPayload {
                url: self.url.clone(),
                reason: "expected a list of entries".to_string(),
            });
        };

        items
            .into_iter()
            .map(|item| match item {
                Value::Object(data) => entry_from_self_link(data, Arc::clone(&self.adapter)),
                _ => Err(ResourceError::MalformedPayload {
                    url: self.url.clone(),
                    reason: "list element is not an object".to_string(),
                }),
            })
            .collect()
    }

    /// Asks the API for the exact number of results behind a query URL.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails or the answer is not a
    /// non-negative integer.
    pub async fn total_size_for(&self, url: &str) -> Result<usize, ResourceError> {
        let count_url = total_size_url(url);
        let response = self.send(HttpMethod::Get, &count_url, Map::new()).await?;
        parse_count(&count_url, &response.body)
    }

    /// Loads a collection from a query URL and fixes its size with the
    /// exact-count query.
    pub(crate) async fn counted_collection(&self, url: &str) -> Result<Collection<A>, ResourceError> {
        let mut collection = Resource::load_uncounted(Arc::clone(&self.adapter), url)
            .await?
            .into_collection()?;
        let total_size = self.total_size_for(url).await?;
        collection.set_total_size(total_size);
        Ok(collection)
    }
}

/// Builds and sends a request through a transport.
pub(crate) async fn send<A: Transport>(
    adapter: &A,
    method: HttpMethod,
    url: &str,
    data: Map<String, Value>,
) -> Result<HttpResponse, ResourceError> {
    let request = HttpRequest::builder(method, url).data(data).build()?;
    Ok(adapter.request(request).await?)
}

/// Reads a count returned as a JSON number or a numeric string.
pub(crate) fn parse_count(url: &str, body: &Value) -> Result<usize, ResourceError> {
    let count = match body {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    count
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| ResourceError::MalformedPayload {
            url: url.to_string(),
            reason: format!("expected a total size, got {body}"),
        })
}

/// Wraps an entry payload whose URL is given by its `self_link`.
pub(crate) fn entry_from_self_link<A: Transport>(
    data: Map<String, Value>,
    adapter: Arc<A>,
) -> Result<Entry<A>, ResourceError> {
    let url = data
        .get("self_link")
        .and_then(Value::as_str)
        .map(|link| relative_url(link, adapter.api_base()))
        .ok_or(ResourceError::MissingField { field: "self_link" })?;
    Ok(Entry::new(url, data, adapter))
}
