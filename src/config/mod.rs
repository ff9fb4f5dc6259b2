//! Configuration types for the AWeber API client.
//!
//! # Overview
//!
//! - [`AWeberConfig`]: The main configuration struct holding all client settings
//! - [`AWeberConfigBuilder`]: A builder for constructing [`AWeberConfig`] instances
//! - [`ConsumerKey`]: A validated consumer key newtype
//! - [`ConsumerSecret`]: A validated consumer secret newtype with masked debug output
//! - [`BaseUrl`]: A validated base URL for the API or the authorization server
//!
//! # Example
//!
//! ```rust
//! use aweber_api::{AWeberConfig, ConsumerKey, ConsumerSecret};
//!
//! let config = AWeberConfig::builder()
//!     .consumer_key(ConsumerKey::new("consumer-key").unwrap())
//!     .consumer_secret(ConsumerSecret::new("consumer-secret").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.api_base().as_ref(), "https://api.aweber.com/1.0");
//! ```

mod newtypes;

pub use newtypes::{BaseUrl, ConsumerKey, ConsumerSecret};

use crate::error::ConfigError;

/// Default base URL of the AWeber API.
pub const DEFAULT_API_BASE: &str = "https://api.aweber.com/1.0";

/// Default base URL of the AWeber OAuth endpoints.
pub const DEFAULT_AUTH_BASE: &str = "https://auth.aweber.com/1.0";

/// Configuration for the AWeber API client.
///
/// `AWeberConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
#[derive(Clone, Debug)]
pub struct AWeberConfig {
    consumer_key: ConsumerKey,
    consumer_secret: ConsumerSecret,
    api_base: BaseUrl,
    auth_base: BaseUrl,
    user_agent_prefix: Option<String>,
}

impl AWeberConfig {
    /// Creates a new builder for constructing an `AWeberConfig`.
    #[must_use]
    pub fn builder() -> AWeberConfigBuilder {
        AWeberConfigBuilder::new()
    }

    /// Returns the consumer key.
    #[must_use]
    pub const fn consumer_key(&self) -> &ConsumerKey {
        &self.consumer_key
    }

    /// Returns the consumer secret.
    #[must_use]
    pub const fn consumer_secret(&self) -> &ConsumerSecret {
        &self.consumer_secret
    }

    /// Returns the API base URL that relative resource URLs expand against.
    #[must_use]
    pub const fn api_base(&self) -> &BaseUrl {
        &self.api_base
    }

    /// Returns the base URL of the OAuth endpoints.
    #[must_use]
    pub const fn auth_base(&self) -> &BaseUrl {
        &self.auth_base
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the URL used to obtain a request token.
    #[must_use]
    pub fn request_token_url(&self) -> String {
        self.auth_base.join("oauth/request_token")
    }

    /// Returns the URL used to exchange a verified request token for an access token.
    #[must_use]
    pub fn access_token_url(&self) -> String {
        self.auth_base.join("oauth/access_token")
    }

    /// Returns the URL a user visits to authorize a request token.
    #[must_use]
    pub fn authorize_url(&self) -> String {
        self.auth_base.join("oauth/authorize")
    }
}

// Verify AWeberConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AWeberConfig>();
};

/// Builder for constructing [`AWeberConfig`] instances.
///
/// Required fields are `consumer_key` and `consumer_secret`.
///
/// # Defaults
///
/// - `api_base`: [`DEFAULT_API_BASE`]
/// - `auth_base`: [`DEFAULT_AUTH_BASE`]
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct AWeberConfigBuilder {
    consumer_key: Option<ConsumerKey>,
    consumer_secret: Option<ConsumerSecret>,
    api_base: Option<BaseUrl>,
    auth_base: Option<BaseUrl>,
    user_agent_prefix: Option<String>,
}

impl AWeberConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the consumer key (required).
    #[must_use]
    pub fn consumer_key(mut self, key: ConsumerKey) -> Self {
        self.consumer_key = Some(key);
        self
    }

    /// Sets the consumer secret (required).
    #[must_use]
    pub fn consumer_secret(mut self, secret: ConsumerSecret) -> Self {
        self.consumer_secret = Some(secret);
        self
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn api_base(mut self, url: BaseUrl) -> Self {
        self.api_base = Some(url);
        self
    }

    /// Overrides the base URL of the OAuth endpoints.
    #[must_use]
    pub fn auth_base(mut self, url: BaseUrl) -> Self {
        self.auth_base = Some(url);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`AWeberConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `consumer_key` or
    /// `consumer_secret` are not set.
    pub fn build(self) -> Result<AWeberConfig, ConfigError> {
        let consumer_key = self.consumer_key.ok_or(ConfigError::MissingRequiredField {
            field: "consumer_key",
        })?;
        let consumer_secret = self
            .consumer_secret
            .ok_or(ConfigError::MissingRequiredField {
                field: "consumer_secret",
            })?;

        let api_base = match self.api_base {
            Some(url) => url,
            None => BaseUrl::new(DEFAULT_API_BASE)?,
        };
        let auth_base = match self.auth_base {
            Some(url) => url,
            None => BaseUrl::new(DEFAULT_AUTH_BASE)?,
        };

        Ok(AWeberConfig {
            consumer_key,
            consumer_secret,
            api_base,
            auth_base,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
