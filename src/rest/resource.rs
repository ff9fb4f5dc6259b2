//! Turning raw payloads into entries and collections.
//!
//! Every AWeber URL answers with one of two shapes: a collection page
//! (`entries`, `start`, paging links) or a single entry (`self_link`,
//! `type`, fields). [`Payload::classify`] decides which one a body is, and
//! [`Resource`] wraps the result.
//!
//! # Example
//!
//! ```rust,ignore
//! use aweber_api::rest::Resource;
//!
//! let lists = Resource::load(adapter.clone(), "/accounts/1/lists")
//!     .await?
//!     .into_collection()?;
//! println!("{} lists", lists.len());
//! ```

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::clients::{HttpClient, HttpMethod, Transport};
use crate::rest::collection::Collection;
use crate::rest::entry::Entry;
use crate::rest::response::{parse_count, send};
use crate::rest::ResourceError;

/// A JSON object classified by shape.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// A single resource.
    Entry(Map<String, Value>),
    /// One page of a collection.
    Collection(Map<String, Value>),
}

impl Payload {
    /// Classifies a response body fetched from `url`.
    ///
    /// An object with an `entries` array and a `start` offset is a collection
    /// page. Any other object is an entry.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedPayload`] if the body is not a JSON
    /// object.
    ///
    /// # Example
    ///
    /// ```rust
    /// use aweber_api::rest::Payload;
    /// use serde_json::json;
    ///
    /// let page = json!({"entries": [], "start": 0, "total_size": 0});
    /// assert!(matches!(Payload::classify("/accounts", page), Ok(Payload::Collection(_))));
    ///
    /// let entry = json!({"id": 1, "type": "account"});
    /// assert!(matches!(Payload::classify("/accounts/1", entry), Ok(Payload::Entry(_))));
    /// ```
    pub fn classify(url: &str, body: Value) -> Result<Self, ResourceError> {
        match body {
            Value::Object(data) => {
                let is_page = data.get("entries").is_some_and(Value::is_array)
                    && data.contains_key("start");
                Ok(if is_page {
                    Self::Collection(data)
                } else {
                    Self::Entry(data)
                })
            }
            other => Err(ResourceError::MalformedPayload {
                url: url.to_string(),
                reason: format!("expected a JSON object, got {other}"),
            }),
        }
    }
}

/// Either kind of AWeber resource.
#[derive(Debug)]
pub enum Resource<A: Transport = HttpClient> {
    /// A single resource.
    Entry(Entry<A>),
    /// A paginated set of resources.
    Collection(Collection<A>),
}

impl<A: Transport> Resource<A> {
    /// Fetches `url` and wraps the answer as an entry or a collection.
    ///
    /// A collection page that carries no `total_size` but a
    /// `total_size_link` gets its size from that link.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if a request fails, or
    /// [`ResourceError::MalformedPayload`] if the body is not a resource.
    pub async fn load(adapter: Arc<A>, url: &str) -> Result<Self, ResourceError> {
        Self::fetch(adapter, url, true).await
    }

    /// Fetches `url` like [`Resource::load`] but leaves a collection's
    /// `total_size_link` unfollowed, for callers that issue their own count
    /// query.
    pub(crate) async fn load_uncounted(adapter: Arc<A>, url: &str) -> Result<Self, ResourceError> {
        Self::fetch(adapter, url, false).await
    }

    async fn fetch(adapter: Arc<A>, url: &str, follow_size_link: bool) -> Result<Self, ResourceError> {
        debug!("Loading resource {url}");
        let response = send(adapter.as_ref(), HttpMethod::Get, url, Map::new()).await?;
        let mut payload = Payload::classify(url, response.body)?;

        if let (true, Payload::Collection(data)) = (follow_size_link, &mut payload) {
            let size_link = if data.contains_key("total_size") {
                None
            } else {
                data.get("total_size_link")
                    .and_then(Value::as_str)
                    .map(String::from)
            };
            if let Some(link) = size_link {
                debug!("Fetching total size for {url}");
                let response = send(adapter.as_ref(), HttpMethod::Get, &link, Map::new()).await?;
                let total_size = parse_count(&link, &response.body)?;
                data.insert("total_size".to_string(), Value::from(total_size));
            }
        }

        Ok(Self::build(url, payload, adapter))
    }

    /// Wraps an already classified payload.
    #[must_use]
    pub fn build(url: impl Into<String>, payload: Payload, adapter: Arc<A>) -> Self {
        match payload {
            Payload::Entry(data) => Self::Entry(Entry::new(url, data, adapter)),
            Payload::Collection(data) => Self::Collection(Collection::new(url, data, adapter)),
        }
    }

    /// The URL the resource was loaded from.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Entry(entry) => entry.url(),
            Self::Collection(collection) => collection.url(),
        }
    }

    /// Returns the entry.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedShape`] for a collection.
    pub fn into_entry(self) -> Result<Entry<A>, ResourceError> {
        match self {
            Self::Entry(entry) => Ok(entry),
            Self::Collection(collection) => Err(ResourceError::UnexpectedShape {
                url: collection.url().to_string(),
                expected: "entry",
            }),
        }
    }

    /// Returns the collection.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedShape`] for an entry.
    pub fn into_collection(self) -> Result<Collection<A>, ResourceError> {
        match self {
            Self::Collection(collection) => Ok(collection),
            Self::Entry(entry) => Err(ResourceError::UnexpectedShape {
                url: entry.url().to_string(),
                expected: "collection",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_requires_entries_array_and_start() {
        let no_start = json!({"entries": [], "total_size": 0});
        assert!(matches!(
            Payload::classify("/x", no_start),
            Ok(Payload::Entry(_))
        ));

        let entries_not_array = json!({"entries": "none", "start": 0});
        assert!(matches!(
            Payload::classify("/x", entries_not_array),
            Ok(Payload::Entry(_))
        ));
    }

    #[test]
    fn test_classify_rejects_non_objects() {
        for body in [json!([1, 2]), json!("Not Found"), json!(3), json!(null)] {
            assert!(matches!(
                Payload::classify("/accounts/1", body),
                Err(ResourceError::MalformedPayload { .. })
            ));
        }
    }
}
