//! URL arithmetic for the AWeber resource hierarchy.
//!
//! AWeber resources are addressed by nested paths such as
//! `/accounts/1/lists/303449/subscribers/1`, alternating collection names
//! and ids. Parent and child relationships are derived purely from that
//! structure:
//!
//! - an entry's parent entry is two segments up (skip its id and the
//!   collection it lives in)
//! - a collection's parent entry is one segment up
//! - a child collection is `{entry_url}/{relation}`
//!
//! # Example
//!
//! ```rust
//! use aweber_api::rest::path::{child_url, parent_url, partition};
//!
//! let segments = partition(Some("/accounts/1/lists/303449")).unwrap();
//! assert_eq!(parent_url(&segments, 2), "/accounts/1");
//! assert_eq!(child_url("/accounts/1", "lists"), "/accounts/1/lists");
//!
//! // Top-level resources have no parent
//! assert!(partition(Some("/accounts")).is_none());
//! ```

use serde_json::Value;

use crate::clients::param_value;

/// Splits a URL on `/`.
///
/// Returns `None` when the URL is absent or has too few segments to have a
/// parent (three or fewer, e.g. `/accounts` or `/accounts/1`).
#[must_use]
pub fn partition(url: Option<&str>) -> Option<Vec<&str>> {
    let segments: Vec<&str> = url?.split('/').collect();
    if segments.len() <= 3 {
        return None;
    }
    Some(segments)
}

/// Drops the trailing `levels` segments and joins the rest with `/`.
#[must_use]
pub fn parent_url(segments: &[&str], levels: usize) -> String {
    let keep = segments.len().saturating_sub(levels);
    segments[..keep].join("/")
}

/// Joins a relation name onto a resource URL.
#[must_use]
pub fn child_url(base: &str, relation: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), relation)
}

/// Turns an absolute `self_link` into a URL relative to the API base.
///
/// Links outside the API base are returned unchanged.
///
/// ```rust
/// use aweber_api::rest::path::relative_url;
///
/// assert_eq!(
///     relative_url("https://api.aweber.com/1.0/accounts/1", "https://api.aweber.com/1.0"),
///     "/accounts/1"
/// );
/// ```
#[must_use]
pub fn relative_url(self_link: &str, api_base: &str) -> String {
    self_link
        .strip_prefix(api_base)
        .unwrap_or(self_link)
        .to_string()
}

/// Appends percent-encoded parameters to a URL, keeping their order.
///
/// ```rust
/// use aweber_api::rest::path::with_query;
/// use serde_json::json;
///
/// let url = with_query(
///     "/accounts/1/lists/303449/subscribers",
///     [("ws.op", json!("find")), ("email", json!("joe@example.com"))],
/// );
/// assert_eq!(url, "/accounts/1/lists/303449/subscribers?ws.op=find&email=joe%40example.com");
/// ```
#[must_use]
pub fn with_query<I, K>(url: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, Value)>,
    K: AsRef<str>,
{
    let query = params
        .into_iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key.as_ref()),
                urlencoding::encode(&param_value(&value))
            )
        })
        .collect::<Vec<_>>()
        .join("&");

    if query.is_empty() {
        url.to_string()
    } else if url.contains('?') {
        format!("{url}&{query}")
    } else {
        format!("{url}?{query}")
    }
}

/// Appends the exact-count flag to a query URL.
#[must_use]
pub fn total_size_url(url: &str) -> String {
    with_query(url, [("ws.show", Value::from("total_size"))])
}
