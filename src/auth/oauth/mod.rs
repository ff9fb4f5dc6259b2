//! OAuth 1.0a support for the AWeber API.
//!
//! AWeber authenticates every request with OAuth 1.0a HMAC-SHA1
//! signatures. This module provides:
//!
//! - [`signature`]: request signing, used by [`HttpClient`](crate::clients::HttpClient)
//!   for every request it sends
//! - [`AuthorizationCode`]: parsing of the single-string authorization code
//!   produced by AWeber's app authorization page
//! - [`parse_token_response`]: decoding of request/access token responses
//! - [`OAuthError`]: failures during the handshake
//!
//! The handshake itself is driven through [`AWeberApi`](crate::AWeberApi):
//!
//! ```rust,ignore
//! use aweber_api::{AWeberApi, AWeberConfig, ConsumerKey, ConsumerSecret};
//!
//! let config = AWeberConfig::builder()
//!     .consumer_key(ConsumerKey::new("consumer-key").unwrap())
//!     .consumer_secret(ConsumerSecret::new("consumer-secret").unwrap())
//!     .build()
//!     .unwrap();
//! let mut api = AWeberApi::new(config);
//!
//! // 1. Obtain a request token and send the user to AWeber
//! api.get_request_token("https://example.com/callback").await?;
//! let redirect_to = api.authorize_url();
//!
//! // 2. On the callback, store the verifier and obtain the access token
//! api.session_mut().verifier = Some(verifier_from_callback);
//! let access = api.get_access_token().await?;
//! ```

mod authorization;
mod error;
pub mod signature;

pub use authorization::{parse_token_response, AccessKeys, AuthorizationCode};
pub use error::OAuthError;
