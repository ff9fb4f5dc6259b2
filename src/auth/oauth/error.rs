//! OAuth-specific error types for the AWeber API client.
//!
//! # Example
//!
//! ```rust
//! use aweber_api::auth::oauth::OAuthError;
//!
//! let error = OAuthError::InvalidAuthorizationCode { parts: 3 };
//! assert!(error.to_string().contains("3"));
//! ```

use crate::clients::HttpError;
use crate::error::ConfigError;
use thiserror::Error;

/// Errors that can occur during the OAuth 1.0a handshake.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// An authorization code did not contain the five `|` separated parts
    /// (consumer key, consumer secret, request token, token secret, verifier).
    #[error("Invalid authorization code: expected at least 5 '|' separated parts, found {parts}")]
    InvalidAuthorizationCode {
        /// The number of parts that were found.
        parts: usize,
    },

    /// The token endpoint answered with something other than
    /// `oauth_token=...&oauth_token_secret=...`.
    #[error("Unexpected token response: {reason}")]
    UnexpectedTokenResponse {
        /// Why the response was rejected.
        reason: String,
    },

    /// A step of the handshake was attempted before the token it depends on was obtained.
    #[error("Missing OAuth token: {token} must be obtained first")]
    MissingToken {
        /// The name of the missing token.
        token: &'static str,
    },

    /// The credentials embedded in an authorization code are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Wrapped HTTP client error.
    #[error(transparent)]
    Http(#[from] HttpError),
}

// Verify OAuthError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuthError>();
};
