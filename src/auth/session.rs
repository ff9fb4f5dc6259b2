//! OAuth session state for the AWeber authorization handshake.
//!
//! This module provides the [`OAuthSession`] type that accumulates the
//! tokens obtained while a user authorizes an application.

use serde::{Deserialize, Serialize};

/// A token and its secret, as returned by the AWeber OAuth endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// The OAuth token.
    pub token: String,
    /// The secret paired with the token.
    pub secret: String,
}

impl TokenPair {
    /// Creates a token pair.
    #[must_use]
    pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            secret: secret.into(),
        }
    }
}

/// Tokens gathered during the three-legged OAuth 1.0a handshake.
///
/// The handshake proceeds as:
/// 1. obtain a request token (`request_token`, `token_secret` are set),
/// 2. the user authorizes it and the application receives a `verifier`,
/// 3. exchange it for an access token (`access_token`, `token_secret` are replaced).
///
/// `OAuthSession` is serializable so applications can persist it between
/// the redirect to AWeber and the callback.
///
/// # Example
///
/// ```rust
/// use aweber_api::OAuthSession;
///
/// let mut session = OAuthSession::default();
/// assert!(session.highest_priority_token().is_none());
///
/// session.request_token = Some("request".to_string());
/// assert_eq!(session.highest_priority_token(), Some("request"));
///
/// session.access_token = Some("access".to_string());
/// assert_eq!(session.highest_priority_token(), Some("access"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthSession {
    /// The request token obtained at the start of the handshake.
    pub request_token: Option<String>,

    /// Secret of the most recently obtained token.
    pub token_secret: Option<String>,

    /// The access token, once the handshake has completed.
    pub access_token: Option<String>,

    /// The verifier AWeber hands back after the user authorizes the request token.
    pub verifier: Option<String>,
}

impl OAuthSession {
    /// Creates a session that already holds access credentials.
    #[must_use]
    pub fn with_access_token(token: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
            token_secret: Some(secret.into()),
            ..Self::default()
        }
    }

    /// Returns the token requests should be signed with: the access token
    /// when present, otherwise the request token.
    #[must_use]
    pub fn highest_priority_token(&self) -> Option<&str> {
        self.access_token
            .as_deref()
            .or(self.request_token.as_deref())
    }

    /// Returns `true` once an access token has been obtained.
    #[must_use]
    pub const fn is_authorized(&self) -> bool {
        self.access_token.is_some()
    }
}

// Verify OAuthSession is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuthSession>();
};
