//! # AWeber API Rust Client
//!
//! A Rust client for the AWeber REST API, mapping its paginated hypermedia
//! resources onto local objects that can be navigated, searched and edited.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`AWeberConfig`] and [`AWeberConfigBuilder`]
//! - The OAuth 1.0a handshake (request token, authorization, access token)
//!   via [`AWeberApi`]
//! - An OAuth-signed async HTTP client with retry handling
//! - [`Entry`] and [`Collection`] proxies over AWeber resources, with lazy
//!   child collections, offset-based paging and change tracking
//!
//! ## Quick Start
//!
//! ```rust
//! use aweber_api::{AWeberApi, AWeberConfig, ConsumerKey, ConsumerSecret};
//!
//! let config = AWeberConfig::builder()
//!     .consumer_key(ConsumerKey::new("consumer-key").unwrap())
//!     .consumer_secret(ConsumerSecret::new("consumer-secret").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let api = AWeberApi::new(config);
//! assert_eq!(api.authorize_url(), "https://auth.aweber.com/1.0/oauth/authorize");
//! ```
//!
//! ## Authorization
//!
//! ```rust,ignore
//! // Step 1: obtain a request token and send the user to AWeber
//! api.get_request_token("https://example.com/callback").await?;
//! let redirect_to = api.authorize_url();
//!
//! // Step 2: on the callback, store the verifier and get the access token
//! api.session_mut().verifier = Some(oauth_verifier);
//! let access = api.get_access_token().await?;
//!
//! // The session can be stored and restored later
//! let json = serde_json::to_string(api.session())?;
//! ```
//!
//! ## Navigating Resources
//!
//! ```rust,ignore
//! use aweber_api::TokenPair;
//!
//! let mut account = api
//!     .get_account(Some(TokenPair::new("access-token", "access-secret")))
//!     .await?;
//!
//! let lists = account.collection("lists").await?;
//! while let Some(list) = lists.next_entry().await? {
//!     println!("{}", list.field("name")?);
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration and sessions are passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Errors, not sentinels**: Every failed request surfaces as an error
//! - **Async-first**: Designed for use with the Tokio async runtime

mod api;
pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

pub use api::AWeberApi;

// Re-export public types at crate root for convenience
pub use auth::{OAuthSession, TokenPair};
pub use config::{AWeberConfig, AWeberConfigBuilder, BaseUrl, ConsumerKey, ConsumerSecret};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ServiceError, Transport,
};

// Re-export resource types
pub use rest::{Attribute, Collection, Entry, NestedValue, Resource, ResourceError};

// Re-export OAuth types for convenience
pub use auth::oauth::{AccessKeys, AuthorizationCode, OAuthError};
