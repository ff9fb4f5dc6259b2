//! Static table of AWeber resource types and their child collections.
//!
//! Every AWeber entry reports its `type` in its payload. The table below lists,
//! per type, which relation names may be fetched as child collections by
//! joining them onto the entry's URL. Types not listed have none.

/// `(type name, child relation names)` in the order the API documents them.
const CHILD_COLLECTIONS: &[(&str, &[&str])] = &[
    ("account", &["lists", "integrations"]),
    ("broadcast_campaign", &["links", "messages", "stats"]),
    ("component", &[]),
    ("custom_field", &[]),
    ("followup_campaign", &["links", "messages", "stats"]),
    ("integration", &[]),
    ("link", &["clicks"]),
    (
        "list",
        &[
            "campaigns",
            "custom_fields",
            "subscribers",
            "web_forms",
            "web_form_split_tests",
        ],
    ),
    ("message", &["opens", "tracked_events"]),
    ("service-root", &["accounts"]),
    ("subscriber", &[]),
    ("tracked_events", &[]),
    ("web_form", &[]),
    ("web_form_split_test", &["components"]),
];

/// Returns the child relation names permitted for a resource type.
///
/// ```rust
/// use aweber_api::rest::registry::child_collections;
///
/// assert_eq!(child_collections("account"), &["lists", "integrations"]);
/// assert!(child_collections("unknown").is_empty());
/// ```
#[must_use]
pub fn child_collections(type_name: &str) -> &'static [&'static str] {
    CHILD_COLLECTIONS
        .iter()
        .find(|(name, _)| *name == type_name)
        .map(|&(_, relations)| relations)
        .unwrap_or_default()
}

/// Returns `true` if `relation` is a child collection of `type_name`.
#[must_use]
pub fn is_child_collection(type_name: &str, relation: &str) -> bool {
    child_collections(type_name).iter().any(|r| *r == relation)
}
