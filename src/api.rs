//! The root client.
//!
//! [`AWeberApi`] holds the application's configuration and the OAuth session
//! of one AWeber user. It drives the authorization handshake and is the entry
//! point into the resource graph: [`get_account`](AWeberApi::get_account)
//! returns the user's account, from which every list, subscriber and
//! campaign can be reached.
//!
//! # Example
//!
//! ```rust,ignore
//! use aweber_api::{AWeberApi, AWeberConfig, ConsumerKey, ConsumerSecret, TokenPair};
//!
//! let config = AWeberConfig::builder()
//!     .consumer_key(ConsumerKey::new("consumer-key")?)
//!     .consumer_secret(ConsumerSecret::new("consumer-secret")?)
//!     .build()?;
//! let mut api = AWeberApi::new(config);
//!
//! let mut account = api
//!     .get_account(Some(TokenPair::new("access-token", "access-secret")))
//!     .await?;
//! let lists = account.collection("lists").await?;
//! println!("{} lists", lists.len());
//! ```

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::auth::oauth::{parse_token_response, AccessKeys, AuthorizationCode, OAuthError};
use crate::auth::{OAuthSession, TokenPair};
use crate::clients::{HttpClient, HttpError, HttpMethod, HttpRequest, Transport};
use crate::config::{AWeberConfig, AWeberConfigBuilder, ConsumerKey, ConsumerSecret};
use crate::rest::{Entry, Resource, ResourceError};

/// Client for one AWeber user.
#[derive(Clone, Debug)]
pub struct AWeberApi {
    config: AWeberConfig,
    session: OAuthSession,
}

// Verify AWeberApi is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AWeberApi>();
};

impl AWeberApi {
    /// Creates a client with an empty session.
    #[must_use]
    pub fn new(config: AWeberConfig) -> Self {
        Self {
            config,
            session: OAuthSession::default(),
        }
    }

    /// Creates a client for a user whose tokens are already known.
    #[must_use]
    pub const fn with_session(config: AWeberConfig, session: OAuthSession) -> Self {
        Self { config, session }
    }

    /// The application configuration.
    #[must_use]
    pub const fn config(&self) -> &AWeberConfig {
        &self.config
    }

    /// The OAuth session.
    #[must_use]
    pub const fn session(&self) -> &OAuthSession {
        &self.session
    }

    /// Mutable access to the OAuth session, e.g. to store the verifier.
    pub fn session_mut(&mut self) -> &mut OAuthSession {
        &mut self.session
    }

    /// URL the user must visit to authorize the application.
    ///
    /// Carries the request token once one has been obtained.
    #[must_use]
    pub fn authorize_url(&self) -> String {
        let url = self.config.authorize_url();
        match &self.session.request_token {
            Some(token) => format!("{url}?oauth_token={}", urlencoding::encode(token)),
            None => url,
        }
    }

    /// Obtains a request token and stores it in the session.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::Http`] if the request fails, or
    /// [`OAuthError::UnexpectedTokenResponse`] if the answer lacks the tokens.
    pub async fn get_request_token(&mut self, callback_url: &str) -> Result<TokenPair, OAuthError> {
        let client = HttpClient::new(&self.config, None, None)?;
        let request = HttpRequest::builder(HttpMethod::Post, self.config.request_token_url())
            .param("oauth_callback", callback_url)
            .build()
            .map_err(HttpError::from)?;

        let response = client.request(request).await?;
        let pair = parse_token_response(&response.body)?;
        debug!("Obtained request token");

        self.session.request_token = Some(pair.token.clone());
        self.session.token_secret = Some(pair.secret.clone());
        Ok(pair)
    }

    /// Exchanges the authorized request token for an access token and stores
    /// it in the session.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::MissingToken`] if the session has no request
    /// token or verifier, or the error of the exchange.
    pub async fn get_access_token(&mut self) -> Result<TokenPair, OAuthError> {
        let request_token = self
            .session
            .request_token
            .clone()
            .ok_or(OAuthError::MissingToken {
                token: "request_token",
            })?;
        let verifier = self
            .session
            .verifier
            .clone()
            .ok_or(OAuthError::MissingToken { token: "verifier" })?;

        let client = HttpClient::new(
            &self.config,
            Some(&request_token),
            self.session.token_secret.as_deref(),
        )?;
        let request = HttpRequest::builder(HttpMethod::Post, self.config.access_token_url())
            .param("oauth_verifier", verifier)
            .build()
            .map_err(HttpError::from)?;

        let response = client.request(request).await?;
        let pair = parse_token_response(&response.body)?;
        debug!("Obtained access token");

        self.session.access_token = Some(pair.token.clone());
        self.session.token_secret = Some(pair.secret.clone());
        Ok(pair)
    }

    /// Exchanges an authorization code from AWeber's app authorization page
    /// for access credentials.
    ///
    /// The consumer credentials come from the code; `builder` supplies any
    /// other configuration, such as a non-default auth base.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::InvalidAuthorizationCode`] for a malformed code,
    /// [`OAuthError::Config`] if the code carries empty credentials, or the
    /// error of the exchange.
    pub async fn exchange_authorization_code(
        code: &str,
        builder: AWeberConfigBuilder,
    ) -> Result<AccessKeys, OAuthError> {
        let code: AuthorizationCode = code.parse()?;
        let config = builder
            .consumer_key(ConsumerKey::new(code.consumer_key.clone())?)
            .consumer_secret(ConsumerSecret::new(code.consumer_secret.clone())?)
            .build()?;

        let mut api = Self::new(config);
        api.session.request_token = Some(code.request_token);
        api.session.token_secret = Some(code.token_secret);
        api.session.verifier = Some(code.verifier);

        let access = api.get_access_token().await?;
        Ok(AccessKeys {
            consumer_key: code.consumer_key,
            consumer_secret: code.consumer_secret,
            access_token: access.token,
            access_token_secret: access.secret,
        })
    }

    /// Builds a transport signing with the session's current token.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the HTTP client cannot be created.
    pub fn adapter(&self) -> Result<Arc<HttpClient>, HttpError> {
        let client = HttpClient::new(
            &self.config,
            self.session.highest_priority_token(),
            self.session.token_secret.as_deref(),
        )?;
        Ok(Arc::new(client))
    }

    /// Loads the user's account.
    ///
    /// `tokens`, when given, replace the session's access credentials first.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the accounts cannot be loaded or the user
    /// has none.
    pub async fn get_account(&mut self, tokens: Option<TokenPair>) -> Result<Entry, ResourceError> {
        if let Some(tokens) = tokens {
            self.session.access_token = Some(tokens.token);
            self.session.token_secret = Some(tokens.secret);
        }

        let accounts = self.load_from_url("/accounts").await?.into_collection()?;
        accounts.into_entry_at(0).await
    }

    /// Loads any resource by URL, relative to the API base or absolute.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails or the body is not a
    /// resource.
    pub async fn load_from_url(&self, url: &str) -> Result<Resource, ResourceError> {
        Resource::load(self.adapter()?, url).await
    }

    /// Wraps a payload obtained elsewhere (e.g. a webhook body) as an entry.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the HTTP client cannot be created.
    pub fn entry_from_payload(&self, url: &str, data: Map<String, Value>) -> Result<Entry, HttpError> {
        Ok(Entry::new(url, data, self.adapter()?))
    }
}
