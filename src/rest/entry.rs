//! A single AWeber resource.
//!
//! An [`Entry`] is the local proxy for one addressable resource: an account,
//! a list, a subscriber, a campaign, and so on. Its fields are read from the
//! payload the API returned; its child collections (a list's `subscribers`,
//! an account's `lists`) are fetched on first access and cached for the
//! entry's lifetime.
//!
//! # Reading
//!
//! [`Entry::get`] looks a name up in two tiers: payload fields first, then the
//! child relations the resource type permits. Typed shortcuts exist for each
//! tier: [`field`](Entry::field), [`nested`](Entry::nested) and
//! [`collection`](Entry::collection).
//!
//! # Writing
//!
//! [`Entry::set`] changes a field locally and records it in the entry's
//! pending changes; [`Entry::save`] sends exactly those changes with a
//! `PATCH`. Only fields already present in the payload may be written.
//!
//! # Example
//!
//! ```rust,ignore
//! use aweber_api::AWeberApi;
//!
//! let mut account = api.get_account(None).await?;
//! let lists = account.collection("lists").await?;
//! let list = lists.at(0).await?;
//!
//! let subscribers = list.collection("subscribers").await?;
//! let subscriber = subscribers.at(0).await?;
//! subscriber.set("name", "Joseph Jones")?;
//! subscriber.save().await?;
//! ```

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::clients::{HttpClient, HttpMethod, Transport};
use crate::rest::collection::Collection;
use crate::rest::path::{child_url, parent_url, partition, relative_url, with_query};
use crate::rest::registry;
use crate::rest::resource::Resource;
use crate::rest::response::Envelope;
use crate::rest::tracking::{NestedValue, PendingChanges};
use crate::rest::ResourceError;

/// The result of [`Entry::get`].
#[derive(Debug)]
pub enum Attribute<'a, A: Transport = HttpClient> {
    /// A plain payload field.
    Value(&'a Value),
    /// An object-valued payload field, writable key by key.
    Nested(NestedValue<'a, A>),
    /// A child collection.
    Collection(&'a mut Collection<A>),
}

impl<'a, A: Transport> Attribute<'a, A> {
    /// Returns the plain value, if this is one.
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the nested value proxy, if this is one.
    #[must_use]
    pub fn into_nested(self) -> Option<NestedValue<'a, A>> {
        match self {
            Self::Nested(nested) => Some(nested),
            _ => None,
        }
    }

    /// Returns the child collection, if this is one.
    #[must_use]
    pub fn into_collection(self) -> Option<&'a mut Collection<A>> {
        match self {
            Self::Collection(collection) => Some(collection),
            _ => None,
        }
    }
}

/// A single AWeber resource.
#[derive(Debug)]
pub struct Entry<A: Transport = HttpClient> {
    envelope: Envelope<A>,
    pending_changes: PendingChanges,
    child_collections: HashMap<String, Collection<A>>,
}

impl<A: Transport> Entry<A> {
    /// Wraps an entry payload loaded from `url`.
    #[must_use]
    pub fn new(url: impl Into<String>, data: Map<String, Value>, adapter: Arc<A>) -> Self {
        Self {
            envelope: Envelope::new(url, data, adapter),
            pending_changes: PendingChanges::new(),
            child_collections: HashMap::new(),
        }
    }

    /// The URL this entry is addressed by.
    #[must_use]
    pub fn url(&self) -> &str {
        self.envelope.url()
    }

    /// The current payload, including unsaved writes.
    #[must_use]
    pub const fn data(&self) -> &Map<String, Value> {
        self.envelope.data()
    }

    /// The underlying envelope.
    #[must_use]
    pub const fn envelope(&self) -> &Envelope<A> {
        &self.envelope
    }

    /// The resource type, e.g. `"list"`.
    #[must_use]
    pub fn resource_type(&self) -> Option<&str> {
        self.envelope.resource_type()
    }

    /// The canonical absolute URL of the resource.
    #[must_use]
    pub fn self_link(&self) -> Option<&str> {
        self.envelope.self_link()
    }

    /// Fields changed since the last save.
    #[must_use]
    pub const fn pending_changes(&self) -> &PendingChanges {
        &self.pending_changes
    }

    /// Reads a payload field.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownAttribute`] if the payload has no such field.
    pub fn field(&self, name: &str) -> Result<&Value, ResourceError> {
        self.envelope
            .get(name)
            .ok_or_else(|| ResourceError::UnknownAttribute {
                name: name.to_string(),
            })
    }

    /// Looks up a field or a child collection by name.
    ///
    /// Payload fields win over relation names. Object-valued fields come back
    /// wrapped in a [`NestedValue`]; child collections are fetched on first
    /// access.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownAttribute`] if the name is neither a
    /// field nor a child relation of this resource type, or the error of the
    /// collection fetch.
    pub async fn get(&mut self, name: &str) -> Result<Attribute<'_, A>, ResourceError> {
        match self.envelope.get(name).map(Value::is_object) {
            Some(true) => Ok(Attribute::Nested(NestedValue::new(self, name))),
            Some(false) => self.field(name).map(Attribute::Value),
            None => self.collection(name).await.map(Attribute::Collection),
        }
    }

    /// Wraps an object-valued field for key-level writes.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownAttribute`] for a missing field and
    /// [`ResourceError::NotAnObject`] for a field that is not an object.
    pub fn nested(&mut self, name: &str) -> Result<NestedValue<'_, A>, ResourceError> {
        if !self.field(name)?.is_object() {
            return Err(ResourceError::NotAnObject {
                name: name.to_string(),
            });
        }
        Ok(NestedValue::new(self, name))
    }

    /// Returns a child collection, fetching it on first access.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownAttribute`] if the resource type has no
    /// such relation, or the error of the fetch.
    pub async fn collection(&mut self, name: &str) -> Result<&mut Collection<A>, ResourceError> {
        if !self.child_collections.contains_key(name) {
            let permitted = self
                .resource_type()
                .is_some_and(|t| registry::is_child_collection(t, name));
            if !permitted {
                return Err(ResourceError::UnknownAttribute {
                    name: name.to_string(),
                });
            }

            let url = child_url(self.url(), name);
            debug!("Fetching child collection {url}");
            let collection = self.envelope.load_from_url(&url).await?.into_collection()?;
            self.child_collections.insert(name.to_string(), collection);
        }

        self.child_collections
            .get_mut(name)
            .ok_or_else(|| ResourceError::UnknownAttribute {
                name: name.to_string(),
            })
    }

    /// Changes a field locally and records it for the next [`save`](Self::save).
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownAttribute`] if the payload has no such field.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ResourceError> {
        let Some(slot) = self.envelope.data_mut().get_mut(name) else {
            return Err(ResourceError::UnknownAttribute {
                name: name.to_string(),
            });
        };
        let value = value.into();
        *slot = value.clone();
        self.pending_changes.insert(name, value);
        Ok(())
    }

    /// Sends the pending changes with a `PATCH` and clears them.
    ///
    /// The request is sent even when nothing changed.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the API rejects the update; the
    /// pending changes are kept in that case.
    pub async fn save(&mut self) -> Result<(), ResourceError> {
        self.envelope
            .send(HttpMethod::Patch, self.url(), self.pending_changes.to_map())
            .await?;
        self.pending_changes.clear();
        Ok(())
    }

    /// Deletes the resource.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the API refuses.
    pub async fn delete(&self) -> Result<(), ResourceError> {
        self.envelope
            .send(HttpMethod::Delete, self.url(), Map::new())
            .await?;
        Ok(())
    }

    /// Moves the resource into another collection's parent, e.g. a subscriber
    /// into another list.
    ///
    /// The entry is reloaded from the location the API reports, which becomes
    /// its new URL, and pending changes are discarded. If the reload fails the
    /// entry keeps its old URL, payload, and pending changes.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingField`] if `destination` has no
    /// `self_link`, [`ResourceError::MissingHeader`] if the API does not
    /// answer with a `Location`, or the error of either request.
    pub async fn move_to<I, K, V>(&mut self, destination: &Entry<A>, extra: I) -> Result<(), ResourceError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let list_link = destination
            .self_link()
            .ok_or(ResourceError::MissingField { field: "self_link" })?;

        let mut data = Map::new();
        data.insert("ws.op".to_string(), Value::from("move"));
        data.insert("list_link".to_string(), Value::from(list_link));
        data.extend(extra.into_iter().map(|(k, v)| (k.into(), v.into())));

        let response = self.envelope.send(HttpMethod::Post, self.url(), data).await?;
        let location = response
            .location()
            .ok_or(ResourceError::MissingHeader { header: "location" })?;
        let location = relative_url(location, self.envelope.adapter().api_base());

        debug!("Reloading moved resource from {location}");
        let response = self.envelope.send(HttpMethod::Get, &location, Map::new()).await?;
        let Value::Object(data) = response.body else {
            return Err(ResourceError::MalformedPayload {
                url: location,
                reason: "expected an entry".to_string(),
            });
        };
        // The diff only goes away together with a successful reload.
        self.pending_changes.clear();
        self.envelope.replace(location, data);
        Ok(())
    }

    /// Loads the entry this one belongs to, e.g. a list's account.
    ///
    /// Returns `None` for top-level resources.
    ///
    /// # Errors
    ///
    /// Returns the error of the fetch.
    pub async fn get_parent_entry(&self) -> Result<Option<Entry<A>>, ResourceError> {
        let Some(segments) = partition(Some(self.url())) else {
            return Ok(None);
        };
        let url = parent_url(&segments, 2);
        match self.envelope.load_from_url(&url).await? {
            Resource::Entry(entry) => Ok(Some(entry)),
            Resource::Collection(_) => Ok(None),
        }
    }

    /// Returns the activity history of a subscriber.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidOperation`] unless this is a subscriber,
    /// or the error of the request.
    pub async fn get_activity(&self) -> Result<Collection<A>, ResourceError> {
        self.envelope.named_operation_for("getActivity", "subscriber")?;
        let url = self.operation_url("getActivity", Vec::new());
        self.envelope.counted_collection(&url).await
    }

    /// Searches every list of an account for matching subscribers.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidOperation`] unless this is an account,
    /// or the error of the request.
    pub async fn find_subscribers<I, K, V>(&self, filters: I) -> Result<Collection<A>, ResourceError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.envelope
            .named_operation_for("findSubscribers", "account")?;
        let url = self.operation_url("findSubscribers", collect_params(filters));
        self.envelope.counted_collection(&url).await
    }

    /// Returns every web form of an account.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidOperation`] unless this is an account,
    /// or the error of the request.
    pub async fn get_web_forms(&self) -> Result<Vec<Entry<A>>, ResourceError> {
        self.envelope.named_operation_for("getWebForms", "account")?;
        self.entry_list_operation("getWebForms").await
    }

    /// Returns every web form split test of an account.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidOperation`] unless this is an account,
    /// or the error of the request.
    pub async fn get_web_form_split_tests(&self) -> Result<Vec<Entry<A>>, ResourceError> {
        self.envelope
            .named_operation_for("getWebFormSplitTests", "account")?;
        self.entry_list_operation("getWebFormSplitTests").await
    }

    /// Returns a list's broadcasts with the given status (`draft`,
    /// `scheduled` or `sent`).
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidOperation`] unless this is a list,
    /// or the error of the request.
    pub async fn get_broadcasts<I, K, V>(&self, status: &str, filters: I) -> Result<Collection<A>, ResourceError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.envelope.named_operation_for("getBroadcasts", "list")?;
        let mut params = vec![("status".to_string(), Value::from(status))];
        params.extend(collect_params(filters));
        let url = with_query(&child_url(self.url(), "broadcasts"), params);
        self.envelope.counted_collection(&url).await
    }

    /// Schedules a broadcast of this list and returns the response status.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidOperation`] unless this is a list,
    /// or the error of the request.
    pub async fn schedule_broadcast(&self, id: impl Display, scheduled_for: &str) -> Result<u16, ResourceError> {
        self.envelope
            .named_operation_for("scheduleBroadcast", "list")?;
        let url = child_url(self.url(), &format!("broadcasts/{id}/schedule"));
        let mut data = Map::new();
        data.insert("scheduled_for".to_string(), Value::from(scheduled_for));
        let response = self.envelope.send(HttpMethod::Post, &url, data).await?;
        Ok(response.code)
    }

    /// Cancels a scheduled broadcast of this list and returns the response status.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidOperation`] unless this is a list,
    /// or the error of the request.
    pub async fn cancel_broadcast(&self, id: impl Display) -> Result<u16, ResourceError> {
        self.envelope
            .named_operation_for("cancelBroadcast", "list")?;
        let url = child_url(self.url(), &format!("broadcasts/{id}/cancel"));
        let response = self.envelope.send(HttpMethod::Post, &url, Map::new()).await?;
        Ok(response.code)
    }

    fn operation_url(&self, operation: &str, params: Vec<(String, Value)>) -> String {
        let mut query = vec![("ws.op".to_string(), Value::from(operation))];
        query.extend(params);
        with_query(self.url(), query)
    }

    async fn entry_list_operation(&self, operation: &str) -> Result<Vec<Entry<A>>, ResourceError> {
        let url = self.operation_url(operation, Vec::new());
        let response = self.envelope.send(HttpMethod::Get, &url, Map::new()).await?;
        self.envelope.parse_named_operation(response.body)
    }
}

pub(crate) fn collect_params<I, K, V>(params: I) -> Vec<(String, Value)>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    params.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct Offline;

    impl Transport for Offline {
        fn api_base(&self) -> &str {
            "https://api.aweber.com/1.0"
        }

        async fn request(
            &self,
            request: crate::clients::HttpRequest,
        ) -> Result<crate::clients::HttpResponse, crate::clients::HttpError> {
            Err(crate::clients::ServiceError::from_response(
                404,
                &json!({"error": {"type": "NotFoundError", "message": request.url}}),
            )
            .into())
        }
    }

    fn subscriber() -> Entry<Offline> {
        let data = json!({
            "id": 1,
            "name": "Joe Jones",
            "type": "subscriber",
            "custom_fields": {"Color": "blue", "Walruses": ""},
            "self_link": "https://api.aweber.com/1.0/accounts/1/lists/303449/subscribers/1"
        });
        let Value::Object(data) = data else {
            unreachable!()
        };
        Entry::new("/accounts/1/lists/303449/subscribers/1", data, Arc::new(Offline))
    }

    #[test]
    fn test_set_updates_field_and_diff() {
        let mut entry = subscriber();
        entry.set("name", "Joseph").unwrap();

        assert_eq!(entry.field("name").unwrap(), &json!("Joseph"));
        assert_eq!(entry.pending_changes().len(), 1);
        assert_eq!(entry.pending_changes()["name"], json!("Joseph"));
    }

    #[test]
    fn test_set_rejects_unknown_fields() {
        let mut entry = subscriber();
        let result = entry.set("walruses", "many");

        assert!(matches!(result, Err(ResourceError::UnknownAttribute { .. })));
        assert!(entry.pending_changes().is_empty());
        assert!(entry.field("walruses").is_err());
    }

    #[test]
    fn test_nested_write_records_whole_field() {
        let mut entry = subscriber();
        entry.nested("custom_fields").unwrap().set("Color", "Red").unwrap();

        assert_eq!(entry.field("custom_fields").unwrap()["Color"], json!("Red"));
        assert_eq!(
            entry.pending_changes()["custom_fields"],
            json!({"Color": "Red", "Walruses": ""})
        );
    }

    #[test]
    fn test_nested_rejects_plain_fields() {
        let mut entry = subscriber();
        assert!(matches!(
            entry.nested("name"),
            Err(ResourceError::NotAnObject { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_dispatches_on_field_kind() {
        let mut entry = subscriber();

        let name = entry.get("name").await.unwrap();
        assert_eq!(name.as_value(), Some(&json!("Joe Jones")));

        let nested = entry.get("custom_fields").await.unwrap().into_nested().unwrap();
        assert_eq!(nested.get("Color"), Some(&json!("blue")));
    }

    #[tokio::test]
    async fn test_subscriber_has_no_child_collections() {
        let mut entry = subscriber();
        let result = entry.get("lists").await;
        assert!(matches!(result, Err(ResourceError::UnknownAttribute { .. })));
    }

    #[tokio::test]
    async fn test_named_operation_on_wrong_type() {
        let entry = subscriber();
        let result = entry.get_web_forms().await;
        assert!(matches!(
            result,
            Err(ResourceError::InvalidOperation {
                operation: "getWebForms",
                required_type: "account",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_service_errors_propagate_from_save() {
        let mut entry = subscriber();
        entry.set("name", "Joseph").unwrap();

        let error = entry.save().await.unwrap_err();
        assert_eq!(error.status(), Some(404));
        assert_eq!(entry.pending_changes().len(), 1);
    }
}
