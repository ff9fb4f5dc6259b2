//! The AWeber resource graph.
//!
//! AWeber exposes its data as a hypermedia tree: an account has lists, a
//! list has subscribers, campaigns and web forms, a campaign has links and
//! messages. This module maps that tree onto two kinds of local objects:
//!
//! - **[`Entry`]**: one resource, with its fields, its lazily fetched child
//!   collections, local change tracking and the named operations
//!   (`ws.op=...`) its type supports
//! - **[`Collection`]**: a paginated set of sibling resources, addressed by
//!   offset and fetched page by page
//!
//! Both are generic over the [`Transport`](crate::clients::Transport) they
//! talk through, defaulting to the OAuth-signing
//! [`HttpClient`](crate::clients::HttpClient).
//!
//! # Example
//!
//! ```rust,ignore
//! use aweber_api::AWeberApi;
//!
//! let mut account = api.get_account(None).await?;
//!
//! // Child collections are fetched on first access
//! let lists = account.collection("lists").await?;
//! let list = lists.at(0).await?;
//!
//! // Search a list's subscribers
//! let subscribers = list.collection("subscribers").await?;
//! let mut found = subscribers.find([("email", "joe@example.com")]).await?;
//! println!("{} matches", found.len());
//!
//! // Change a subscriber and send the diff
//! if let Some(subscriber) = found.next_entry().await? {
//!     subscriber.nested("custom_fields")?.set("Color", "Red")?;
//!     subscriber.save().await?;
//! }
//!
//! // Named operations are guarded by resource type
//! let forms = account.get_web_forms().await?;
//! ```
//!
//! # Key Types
//!
//! - [`Envelope`]: URL, raw payload and transport shared by entries and collections
//! - [`Resource`] and [`Payload`]: classification of a fetched payload
//! - [`NestedValue`] and [`PendingChanges`]: change tracking
//! - [`ResourceError`]: errors of resource operations
//! - [`path`] and [`registry`]: URL arithmetic and the type table

mod collection;
mod entry;
mod errors;
pub mod path;
pub mod registry;
mod resource;
mod response;
mod tracking;

pub use collection::{Collection, DEFAULT_PAGE_SIZE};
pub use entry::{Attribute, Entry};
pub use errors::ResourceError;
pub use resource::{Payload, Resource};
pub use response::Envelope;
pub use tracking::{NestedValue, PendingChanges};
