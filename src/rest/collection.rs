//! A paginated set of sibling AWeber resources.
//!
//! A [`Collection`] starts out with the first page the API returned and
//! fetches further pages on demand, keyed by absolute offset. Entries are
//! materialized once per offset: asking for the same offset twice returns the
//! same [`Entry`], with any unsaved changes it carries.
//!
//! # Paging
//!
//! The page size is taken from the `ws.size` parameter of the collection's
//! `next_collection_link` (100 when the link does not say). To reach offset
//! `o`, the page starting at `floor(o / size) * size` is requested. A
//! collection without a `next_collection_link` has no further pages.
//!
//! # Example
//!
//! ```rust,ignore
//! let lists = account.collection("lists").await?;
//!
//! while let Some(list) = lists.next_entry().await? {
//!     println!("{}", list.field("name")?);
//! }
//!
//! // Iteration restarts after reaching the end
//! let first = lists.next_entry().await?;
//! ```

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

use reqwest::Url;
use serde_json::{Map, Value};
use tracing::debug;

use crate::clients::{HttpClient, HttpMethod, Transport};
use crate::rest::entry::{collect_params, Entry};
use crate::rest::path::{child_url, parent_url, partition, relative_url, with_query};
use crate::rest::resource::Resource;
use crate::rest::response::{entry_from_self_link, Envelope};
use crate::rest::ResourceError;

/// Page size assumed until a `next_collection_link` says otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// A paginated set of sibling resources.
#[derive(Debug)]
pub struct Collection<A: Transport = HttpClient> {
    envelope: Envelope<A>,
    entries: HashMap<usize, Entry<A>>,
    entry_data: HashMap<usize, Map<String, Value>>,
    total_size: usize,
    page_size: usize,
    cursor: usize,
}

impl<A: Transport> Collection<A> {
    /// Wraps a collection page loaded from `url`.
    ///
    /// The page's entries are keyed at `start + index`. Without a
    /// `total_size` in the payload, the collection is assumed to end with
    /// this page.
    #[must_use]
    pub fn new(url: impl Into<String>, data: Map<String, Value>, adapter: Arc<A>) -> Self {
        let start = data
            .get("start")
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);

        let entry_data: HashMap<usize, Map<String, Value>> = page_entries(&data)
            .enumerate()
            .map(|(index, entry)| (start + index, entry))
            .collect();

        let total_size = data
            .get("total_size")
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(start + entry_data.len());

        Self {
            envelope: Envelope::new(url, data, adapter),
            entries: HashMap::new(),
            entry_data,
            total_size,
            page_size: DEFAULT_PAGE_SIZE,
            cursor: 0,
        }
    }

    /// The URL the collection was loaded from.
    #[must_use]
    pub fn url(&self) -> &str {
        self.envelope.url()
    }

    /// The payload of the first page.
    #[must_use]
    pub const fn data(&self) -> &Map<String, Value> {
        self.envelope.data()
    }

    /// Number of entries in the collection. Never touches the network.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.total_size
    }

    /// Returns `true` if the collection has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_size == 0
    }

    /// The authoritative number of entries.
    #[must_use]
    pub const fn total_size(&self) -> usize {
        self.total_size
    }

    /// The page size used for the next page request.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    pub(crate) fn set_total_size(&mut self, total_size: usize) {
        self.total_size = total_size;
    }

    /// Returns the entry at `offset`, loading its page if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::OutOfRange`] unless `offset < total_size`,
    /// [`ResourceError::PagesExhausted`] if no page holds the offset, or the
    /// error of the page request.
    pub async fn at(&mut self, offset: usize) -> Result<&mut Entry<A>, ResourceError> {
        self.materialize(offset).await?;
        self.entries
            .get_mut(&offset)
            .ok_or(ResourceError::OutOfRange {
                offset,
                total_size: self.total_size,
            })
    }

    /// Materializes the entry at `offset` and takes ownership of it.
    ///
    /// # Errors
    ///
    /// Same as [`at`](Self::at).
    pub async fn into_entry_at(mut self, offset: usize) -> Result<Entry<A>, ResourceError> {
        self.materialize(offset).await?;
        self.entries
            .remove(&offset)
            .ok_or(ResourceError::OutOfRange {
                offset,
                total_size: self.total_size,
            })
    }

    async fn materialize(&mut self, offset: usize) -> Result<(), ResourceError> {
        if offset >= self.total_size {
            return Err(ResourceError::OutOfRange {
                offset,
                total_size: self.total_size,
            });
        }
        if self.entries.contains_key(&offset) {
            return Ok(());
        }
        if !self.entry_data.contains_key(&offset) {
            self.load_page_for_offset(offset).await?;
        }

        let data = self
            .entry_data
            .get(&offset)
            .cloned()
            .ok_or(ResourceError::PagesExhausted { offset })?;
        let entry = entry_from_self_link(data, Arc::clone(self.envelope.adapter()))?;
        self.entries.insert(offset, entry);
        Ok(())
    }

    /// Computes the `ws.start` / `ws.size` parameters of the page holding `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::PagesExhausted`] if the collection has no
    /// `next_collection_link`.
    pub fn page_params(&mut self, offset: usize) -> Result<Map<String, Value>, ResourceError> {
        let link = self
            .envelope
            .get("next_collection_link")
            .and_then(Value::as_str)
            .ok_or(ResourceError::PagesExhausted { offset })?;

        if let Some(size) = link_page_size(link) {
            self.page_size = size;
        }
        let start = offset / self.page_size * self.page_size;

        let mut params = Map::new();
        params.insert("ws.start".to_string(), Value::from(start));
        params.insert("ws.size".to_string(), Value::from(self.page_size));
        Ok(params)
    }

    /// Fetches the page holding `offset` and keys its entries by absolute offset.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::PagesExhausted`] if there is no further page,
    /// [`ResourceError::MalformedPayload`] if the answer is not a page, or
    /// the error of the request.
    pub async fn load_page_for_offset(&mut self, offset: usize) -> Result<(), ResourceError> {
        let params = self.page_params(offset)?;
        let start = params
            .get("ws.start")
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);

        debug!("Loading page at {start} of {}", self.url());
        let response = self.envelope.send(HttpMethod::Get, self.url(), params).await?;
        let page = match response.body {
            Value::Object(page) if page.get("entries").is_some_and(Value::is_array) => page,
            _ => {
                return Err(ResourceError::MalformedPayload {
                    url: self.url().to_string(),
                    reason: "expected a collection page".to_string(),
                })
            }
        };

        for (index, entry) in page_entries(&page).enumerate() {
            self.entry_data.insert(start + index, entry);
        }
        Ok(())
    }

    /// Returns the entry under the cursor and advances it.
    ///
    /// Returns `None` once every entry has been visited (or no further page
    /// can be loaded), and rewinds so the next call starts over.
    ///
    /// # Errors
    ///
    /// Returns the error of a page request.
    pub async fn next_entry(&mut self) -> Result<Option<&mut Entry<A>>, ResourceError> {
        if self.cursor >= self.total_size {
            self.cursor = 0;
            return Ok(None);
        }

        let offset = self.cursor;
        match self.materialize(offset).await {
            Ok(()) => {}
            Err(ResourceError::PagesExhausted { .. }) => {
                self.cursor = 0;
                return Ok(None);
            }
            Err(e) => return Err(e),
        }

        self.cursor += 1;
        Ok(self.entries.get_mut(&offset))
    }

    /// Moves the cursor back to the first entry.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Creates a resource in this collection and loads it.
    ///
    /// The returned entry's URL is the `Location` the API answers with, made
    /// relative to the API base.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingHeader`] if the API does not report a
    /// location, or the error of either request.
    pub async fn create<I, K, V>(&self, fields: I) -> Result<Entry<A>, ResourceError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut data = Map::new();
        data.insert("ws.op".to_string(), Value::from("create"));
        data.extend(collect_params(fields));

        let response = self.envelope.send(HttpMethod::Post, self.url(), data).await?;
        let location = response
            .location()
            .ok_or(ResourceError::MissingHeader { header: "location" })?;
        let location = relative_url(location, self.envelope.adapter().api_base());

        self.envelope.load_from_url(&location).await?.into_entry()
    }

    /// Searches the collection.
    ///
    /// The result's size comes from a separate exact-count query.
    ///
    /// # Errors
    ///
    /// Returns the error of either request; a rejected search is an error,
    /// never an empty result.
    pub async fn find<I, K, V>(&self, filters: I) -> Result<Collection<A>, ResourceError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut params = vec![("ws.op".to_string(), Value::from("find"))];
        params.extend(collect_params(filters));
        let url = with_query(self.url(), params);
        self.envelope.counted_collection(&url).await
    }

    /// Loads one member of the collection by id.
    ///
    /// # Errors
    ///
    /// Returns the error of the request, or [`ResourceError::UnexpectedShape`]
    /// if the URL does not name an entry.
    pub async fn get_by_id(&self, id: impl Display) -> Result<Entry<A>, ResourceError> {
        let url = child_url(self.url(), &id.to_string());
        self.envelope.load_from_url(&url).await?.into_entry()
    }

    /// Loads the entry owning this collection, e.g. a list's `subscribers`
    /// belong to the list.
    ///
    /// Returns `None` for top-level collections.
    ///
    /// # Errors
    ///
    /// Returns the error of the fetch.
    pub async fn get_parent_entry(&self) -> Result<Option<Entry<A>>, ResourceError> {
        let Some(segments) = partition(Some(self.url())) else {
            return Ok(None);
        };
        let url = parent_url(&segments, 1);
        match self.envelope.load_from_url(&url).await? {
            Resource::Entry(entry) => Ok(Some(entry)),
            Resource::Collection(_) => Ok(None),
        }
    }
}

fn page_entries(page: &Map<String, Value>) -> impl Iterator<Item = Map<String, Value>> + '_ {
    page.get("entries")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|entry| entry.as_object().cloned())
}

/// Reads `ws.size` from a paging link.
fn link_page_size(link: &str) -> Option<usize> {
    let url = Url::parse(link).ok()?;
    let size = url
        .query_pairs()
        .find(|(key, _)| key == "ws.size")?
        .1
        .parse::<usize>()
        .ok()?;
    (size > 0).then_some(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_page_size() {
        assert_eq!(
            link_page_size("https://api.aweber.com/1.0/accounts/1/lists?ws.start=20&ws.size=20"),
            Some(20)
        );
        assert_eq!(
            link_page_size("https://api.aweber.com/1.0/accounts/1/lists?ws.start=100"),
            None
        );
        assert_eq!(link_page_size("https://api.aweber.com/1.0/x?ws.size=0"), None);
        assert_eq!(link_page_size("/accounts/1/lists?ws.size=20"), None);
    }
}
