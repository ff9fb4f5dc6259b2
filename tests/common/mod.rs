//! In-memory transport serving canned AWeber payloads.
//!
//! Routes are keyed by method and URL; GET parameters are folded into the
//! URL's query string in the order they were added. Every request is
//! recorded so tests can assert on what was sent.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use aweber_api::clients::{HttpError, HttpMethod, HttpRequest, HttpResponse, ServiceError, Transport};
use aweber_api::rest::path::{relative_url, with_query};
use aweber_api::Entry;
use serde_json::{json, Map, Value};

pub const API_BASE: &str = "https://api.aweber.com/1.0";

pub const LIST_COUNT: usize = 24;
pub const LIST_PAGE_SIZE: usize = 20;

/// Absolute link for a relative resource path.
pub fn link(path: &str) -> String {
    format!("{API_BASE}{path}")
}

#[derive(Clone, Debug)]
struct Fixture {
    code: u16,
    location: Option<String>,
    body: Value,
}

#[derive(Debug)]
pub struct MockAdapter {
    routes: HashMap<String, Fixture>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl Transport for MockAdapter {
    fn api_base(&self) -> &str {
        API_BASE
    }

    async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;
        let key = route_key(&request);
        self.requests
            .lock()
            .expect("request log poisoned")
            .push(request);

        let fixture = self.routes.get(&key).cloned().unwrap_or(Fixture {
            code: 404,
            location: None,
            body: json!({"error": {"type": "NotFoundError", "message": format!("No route for {key}")}}),
        });

        if !(200..300).contains(&fixture.code) {
            return Err(ServiceError::from_response(fixture.code, &fixture.body).into());
        }

        let mut headers = HashMap::new();
        if let Some(location) = fixture.location {
            headers.insert("location".to_string(), vec![location]);
        }
        Ok(HttpResponse::new(fixture.code, headers, fixture.body))
    }
}

pub fn route_key(request: &HttpRequest) -> String {
    let mut url = relative_url(&request.url, API_BASE);
    if request.http_method == HttpMethod::Get && !request.data.is_empty() {
        url = with_query(&url, request.data.iter().map(|(k, v)| (k.as_str(), v.clone())));
    }
    format!("{} {}", request.http_method, url)
}

impl MockAdapter {
    pub fn new() -> Arc<Self> {
        let mut adapter = Self {
            routes: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        };
        adapter.load_fixtures();
        Arc::new(adapter)
    }

    fn ok(&mut self, method: HttpMethod, url: &str, body: Value) {
        self.respond(method, url, 200, None, body);
    }

    fn respond(&mut self, method: HttpMethod, url: &str, code: u16, location: Option<&str>, body: Value) {
        self.routes.insert(
            format!("{method} {url}"),
            Fixture {
                code,
                location: location.map(String::from),
                body,
            },
        );
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("request log poisoned").clone()
    }

    /// Route keys of every request received so far.
    pub fn request_keys(&self) -> Vec<String> {
        self.requests().iter().map(route_key).collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("request log poisoned").len()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests().pop()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().expect("request log poisoned").clear();
    }

    fn load_fixtures(&mut self) {
        use HttpMethod::{Delete, Get, Patch, Post};

        // Accounts
        self.ok(Get, "/accounts", collection_page(vec![account()], 0, Some(1), None));
        self.ok(Get, "/accounts/1", account());

        // Lists, paginated 20 per page
        let lists: Vec<Value> = (0..LIST_COUNT).map(list_at).collect();
        self.ok(
            Get,
            "/accounts/1/lists",
            collection_page(
                lists[..LIST_PAGE_SIZE].to_vec(),
                0,
                Some(LIST_COUNT),
                Some(link("/accounts/1/lists?ws.start=20&ws.size=20")),
            ),
        );
        self.ok(
            Get,
            "/accounts/1/lists?ws.start=20&ws.size=20",
            collection_page(lists[LIST_PAGE_SIZE..].to_vec(), 20, Some(LIST_COUNT), None),
        );
        self.ok(Get, "/accounts/1/lists/303449", list_at(0));
        self.ok(Get, "/accounts/1/lists/505454", list_at(1));

        // Integrations, sized through a total_size_link
        self.ok(
            Get,
            "/accounts/1/integrations",
            json!({
                "entries": [integration(1)],
                "start": 0,
                "total_size_link": link("/accounts/1/integrations?ws.show=total_size"),
                "resource_type_link": link("/#integration-page-resource"),
            }),
        );
        self.ok(Get, "/accounts/1/integrations?ws.show=total_size", json!(1));

        // Subscribers
        self.ok(
            Get,
            "/accounts/1/lists/303449/subscribers",
            collection_page(vec![subscriber_joe(), subscriber_locked()], 0, Some(2), None),
        );
        self.ok(Get, "/accounts/1/lists/303449/subscribers/1", subscriber_joe());
        self.ok(Get, "/accounts/1/lists/303449/subscribers/2", subscriber_locked());
        self.respond(Patch, "/accounts/1/lists/303449/subscribers/1", 209, None, json!({}));
        self.respond(Delete, "/accounts/1/lists/303449/subscribers/1", 200, None, json!({}));
        let forbidden = json!({
            "error": {
                "status": 403,
                "type": "UnauthorizedError",
                "message": "Method requires access to Subscriber information.",
                "documentation_url": "https://labs.aweber.com/docs/troubleshooting#unauthorized"
            }
        });
        self.respond(Patch, "/accounts/1/lists/303449/subscribers/2", 403, None, forbidden.clone());
        self.respond(Delete, "/accounts/1/lists/303449/subscribers/2", 403, None, forbidden);

        // Move
        self.respond(
            Post,
            "/accounts/1/lists/303449/subscribers/1",
            201,
            Some(link("/accounts/1/lists/505454/subscribers/3").as_str()),
            json!(""),
        );
        self.ok(Get, "/accounts/1/lists/505454/subscribers/3", subscriber_moved());
        // Moved, but the new location cannot be loaded
        self.respond(
            Post,
            "/accounts/1/lists/303449/subscribers/2",
            201,
            Some(link("/accounts/1/lists/505454/subscribers/4").as_str()),
            json!(""),
        );

        // Find
        let find = "/accounts/1/lists/303449/subscribers?ws.op=find&email=joe%40example.com";
        self.ok(Get, find, collection_page(vec![subscriber_joe()], 0, None, None));
        self.ok(Get, &format!("{find}&ws.show=total_size"), json!(1));

        let find_by_name = "/accounts/1/lists/303449/subscribers?ws.op=find&name=Joe";
        self.ok(
            Get,
            find_by_name,
            json!({
                "entries": [subscriber_joe()],
                "start": 0,
                "total_size_link": link(&format!("{find_by_name}&ws.show=total_size")),
            }),
        );
        self.ok(Get, &format!("{find_by_name}&ws.show=total_size"), json!(1));

        let find_subscribers = "/accounts/1?ws.op=findSubscribers&name=bob";
        self.ok(
            Get,
            find_subscribers,
            collection_page(vec![subscriber_joe()], 0, None, None),
        );
        self.ok(Get, &format!("{find_subscribers}&ws.show=total_size"), json!("1"));

        // Activity
        let activity = "/accounts/1/lists/303449/subscribers/1?ws.op=getActivity";
        self.ok(
            Get,
            activity,
            collection_page(vec![activity_item(1, "opened"), activity_item(2, "clicked")], 0, None, None),
        );
        self.ok(Get, &format!("{activity}&ws.show=total_size"), json!(2));

        // Web forms
        let web_forms: Vec<Value> = (1..=181).map(|id| web_form(id, "web_form")).collect();
        self.ok(Get, "/accounts/1?ws.op=getWebForms", Value::Array(web_forms));
        let split_tests: Vec<Value> = (1..=10)
            .map(|id| web_form(id, "web_form_split_test"))
            .collect();
        self.ok(
            Get,
            "/accounts/1?ws.op=getWebFormSplitTests",
            Value::Array(split_tests),
        );

        // Custom fields
        self.ok(
            Get,
            "/accounts/1/lists/303449/custom_fields",
            collection_page(vec![custom_field(1, "Color")], 0, Some(1), None),
        );
        self.respond(
            Post,
            "/accounts/1/lists/303449/custom_fields",
            201,
            Some(link("/accounts/1/lists/303449/custom_fields/2").as_str()),
            json!(""),
        );
        self.ok(
            Get,
            "/accounts/1/lists/303449/custom_fields/2",
            custom_field(2, "Wedding Song"),
        );

        // Campaigns
        self.ok(
            Get,
            "/accounts/1/lists/303449/campaigns",
            collection_page(vec![campaign(50_000_047)], 0, Some(1), None),
        );

        // Broadcasts
        let broadcasts = "/accounts/1/lists/303449/broadcasts?status=sent";
        self.ok(
            Get,
            broadcasts,
            json!({"entries": [broadcast(5), broadcast(6)], "start": 0, "total_size": 0}),
        );
        self.ok(Get, &format!("{broadcasts}&ws.show=total_size"), json!(2));
        self.respond(Post, "/accounts/1/lists/303449/broadcasts/5/schedule", 201, None, json!(""));
        self.respond(Post, "/accounts/1/lists/303449/broadcasts/5/cancel", 204, None, json!({}));
    }
}

/// Wraps a fixture payload as an entry served by `adapter`.
pub fn entry_from(adapter: &Arc<MockAdapter>, url: &str, data: Value) -> Entry<MockAdapter> {
    let Value::Object(data) = data else {
        panic!("fixture is not an object");
    };
    Entry::new(url, data, Arc::clone(adapter))
}

pub fn collection_page(
    entries: Vec<Value>,
    start: usize,
    total_size: Option<usize>,
    next_collection_link: Option<String>,
) -> Value {
    let mut page = Map::new();
    page.insert("entries".to_string(), Value::Array(entries));
    page.insert("start".to_string(), json!(start));
    if let Some(total_size) = total_size {
        page.insert("total_size".to_string(), json!(total_size));
    }
    if let Some(next) = next_collection_link {
        page.insert("next_collection_link".to_string(), json!(next));
    }
    Value::Object(page)
}

pub fn account() -> Value {
    json!({
        "id": 1,
        "type": "account",
        "http_etag": "\"1-account\"",
        "self_link": link("/accounts/1"),
        "lists_collection_link": link("/accounts/1/lists"),
        "integrations_collection_link": link("/accounts/1/integrations"),
        "resource_type_link": link("/#account")
    })
}

/// The list stored at `offset` of `/accounts/1/lists`.
pub fn list_at(offset: usize) -> Value {
    let id = match offset {
        0 => 303_449,
        1 => 505_454,
        n => 1_000 + n,
    };
    json!({
        "id": id,
        "name": format!("default{id}"),
        "type": "list",
        "total_subscribers": 1,
        "self_link": link(&format!("/accounts/1/lists/{id}")),
        "subscribers_collection_link": link(&format!("/accounts/1/lists/{id}/subscribers")),
        "resource_type_link": link("/#list")
    })
}

pub fn integration(id: u64) -> Value {
    json!({
        "id": id,
        "type": "integration",
        "service_name": "twitter",
        "self_link": link(&format!("/accounts/1/integrations/{id}"))
    })
}

pub fn subscriber_joe() -> Value {
    json!({
        "id": 1,
        "type": "subscriber",
        "name": "Joe Jones",
        "email": "joe@example.com",
        "status": "subscribed",
        "custom_fields": {"Color": "blue", "Walruses": ""},
        "self_link": link("/accounts/1/lists/303449/subscribers/1")
    })
}

pub fn subscriber_locked() -> Value {
    json!({
        "id": 2,
        "type": "subscriber",
        "name": "Locked Out",
        "email": "locked@example.com",
        "status": "subscribed",
        "custom_fields": {},
        "self_link": link("/accounts/1/lists/303449/subscribers/2")
    })
}

pub fn subscriber_moved() -> Value {
    json!({
        "id": 3,
        "type": "subscriber",
        "name": "Joe Jones",
        "email": "joe@example.com",
        "status": "subscribed",
        "custom_fields": {"Color": "blue", "Walruses": ""},
        "self_link": link("/accounts/1/lists/505454/subscribers/3")
    })
}

pub fn activity_item(id: u64, kind: &str) -> Value {
    json!({
        "id": id,
        "type": kind,
        "event_time": "2011-07-10 15:21:00-04:00",
        "self_link": link(&format!("/accounts/1/lists/303449/subscribers/1/activity/{id}"))
    })
}

pub fn web_form(id: u64, kind: &str) -> Value {
    let collection = if kind == "web_form" {
        "web_forms"
    } else {
        "web_form_split_tests"
    };
    json!({
        "id": id,
        "type": kind,
        "name": format!("Form {id}"),
        "self_link": link(&format!("/accounts/1/lists/303449/{collection}/{id}"))
    })
}

pub fn custom_field(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "type": "custom_field",
        "name": name,
        "is_subscriber_updateable": false,
        "self_link": link(&format!("/accounts/1/lists/303449/custom_fields/{id}"))
    })
}

pub fn campaign(id: u64) -> Value {
    json!({
        "id": id,
        "type": "broadcast_campaign",
        "subject": "Welcome",
        "self_link": link(&format!("/accounts/1/lists/303449/campaigns/b{id}"))
    })
}

pub fn broadcast(id: u64) -> Value {
    json!({
        "broadcast_id": id,
        "type": "broadcast",
        "subject": format!("Broadcast {id}"),
        "self_link": link(&format!("/accounts/1/lists/303449/broadcasts/{id}"))
    })
}
