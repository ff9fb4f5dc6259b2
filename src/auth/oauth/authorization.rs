//! Parsing helpers for the AWeber authorization handshake.
//!
//! - [`AuthorizationCode`]: the `|` separated code produced by AWeber's
//!   "authorize app" page, bundling consumer credentials, a request token
//!   and its verifier.
//! - [`parse_token_response`]: decodes the form-encoded body returned by the
//!   request-token and access-token endpoints.
//! - [`AccessKeys`]: the four credentials an authorization code is exchanged for.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::auth::oauth::OAuthError;
use crate::auth::session::TokenPair;

/// An authorization code of the form
/// `consumer_key|consumer_secret|request_token|token_secret|verifier`.
///
/// Codes may carry additional trailing parts; only the first five are used.
///
/// # Example
///
/// ```rust
/// use aweber_api::auth::oauth::AuthorizationCode;
///
/// let code: AuthorizationCode = "ck|cs|rt|ts|verifier".parse().unwrap();
/// assert_eq!(code.consumer_key, "ck");
/// assert_eq!(code.verifier, "verifier");
///
/// assert!("ck|cs|rt".parse::<AuthorizationCode>().is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationCode {
    /// Consumer key of the application.
    pub consumer_key: String,
    /// Consumer secret of the application.
    pub consumer_secret: String,
    /// The authorized request token.
    pub request_token: String,
    /// Secret of the request token.
    pub token_secret: String,
    /// The verifier proving the user's authorization.
    pub verifier: String,
}

impl FromStr for AuthorizationCode {
    type Err = OAuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('|').collect();
        if parts.len() < 5 {
            return Err(OAuthError::InvalidAuthorizationCode { parts: parts.len() });
        }

        Ok(Self {
            consumer_key: parts[0].to_string(),
            consumer_secret: parts[1].to_string(),
            request_token: parts[2].to_string(),
            token_secret: parts[3].to_string(),
            verifier: parts[4].to_string(),
        })
    }
}

/// Consumer and access credentials obtained from an authorization code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessKeys {
    /// Consumer key of the application.
    pub consumer_key: String,
    /// Consumer secret of the application.
    pub consumer_secret: String,
    /// The access token.
    pub access_token: String,
    /// Secret of the access token.
    pub access_token_secret: String,
}

/// Parses a token endpoint body such as
/// `oauth_token=abc&oauth_token_secret=def&oauth_callback_confirmed=true`.
///
/// # Errors
///
/// Returns [`OAuthError::UnexpectedTokenResponse`] if the body is not a
/// string or lacks `oauth_token` or `oauth_token_secret`.
///
/// # Example
///
/// ```rust
/// use aweber_api::auth::oauth::parse_token_response;
/// use serde_json::json;
///
/// let pair = parse_token_response(&json!("oauth_token=a&oauth_token_secret=b")).unwrap();
/// assert_eq!(pair.token, "a");
/// assert_eq!(pair.secret, "b");
/// ```
pub fn parse_token_response(body: &serde_json::Value) -> Result<TokenPair, OAuthError> {
    let text = body
        .as_str()
        .ok_or_else(|| OAuthError::UnexpectedTokenResponse {
            reason: format!("expected a form-encoded string, got {body}"),
        })?;

    let mut token = None;
    let mut secret = None;
    for pair in text.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = decode_form_value(value);
        match key {
            "oauth_token" if token.is_none() => token = Some(value),
            "oauth_token_secret" if secret.is_none() => secret = Some(value),
            _ => {}
        }
    }

    match (token, secret) {
        (Some(token), Some(secret)) => Ok(TokenPair { token, secret }),
        _ => Err(OAuthError::UnexpectedTokenResponse {
            reason: "OAuth parameters not returned".to_string(),
        }),
    }
}

fn decode_form_value(value: &str) -> String {
    let spaced = value.replace('+', " ");
    urlencoding::decode(&spaced).map_or(spaced.clone(), |decoded| decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_authorization_code_keeps_first_five_parts() {
        let code: AuthorizationCode = "ck|cs|rt|ts|verifier|extra".parse().unwrap();
        assert_eq!(code.consumer_secret, "cs");
        assert_eq!(code.request_token, "rt");
        assert_eq!(code.token_secret, "ts");
        assert_eq!(code.verifier, "verifier");
    }

    #[test]
    fn test_authorization_code_rejects_short_codes() {
        let result = "ck|cs|rt|ts".parse::<AuthorizationCode>();
        assert!(matches!(
            result,
            Err(OAuthError::InvalidAuthorizationCode { parts: 4 })
        ));
    }

    #[test]
    fn test_parse_token_response_decodes_values() {
        let body = json!("oauth_token=a%2Bb&oauth_token_secret=c+d&oauth_callback_confirmed=true");
        let pair = parse_token_response(&body).unwrap();
        assert_eq!(pair.token, "a+b");
        assert_eq!(pair.secret, "c d");
    }

    #[test]
    fn test_parse_token_response_requires_both_values() {
        let result = parse_token_response(&json!("oauth_token=a"));
        assert!(matches!(
            result,
            Err(OAuthError::UnexpectedTokenResponse { .. })
        ));
    }

    #[test]
    fn test_parse_token_response_rejects_json_bodies() {
        let result = parse_token_response(&json!({"oauth_token": "a"}));
        assert!(matches!(
            result,
            Err(OAuthError::UnexpectedTokenResponse { .. })
        ));
    }
}
