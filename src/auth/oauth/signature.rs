//! OAuth 1.0a request signing (HMAC-SHA1).
//!
//! Every request to the AWeber API and to its OAuth endpoints carries an
//! `Authorization: OAuth ...` header. The signature covers the request
//! method, the base URL (scheme, host and path) and every query and form
//! parameter together with the `oauth_*` protocol parameters.
//!
//! # Example
//!
//! ```rust
//! use aweber_api::auth::oauth::signature::{sign, signature_base_string};
//!
//! let params = vec![("a".to_string(), "1".to_string())];
//! let base = signature_base_string("GET", "https://api.aweber.com/1.0/accounts", &params);
//! assert_eq!(base, "GET&https%3A%2F%2Fapi.aweber.com%2F1.0%2Faccounts&a%3D1");
//!
//! let signature = sign(&base, "consumer-secret", "");
//! assert_eq!(signature.len(), 28); // SHA1 produces 20 bytes = 28 base64 chars
//! ```

use base64::prelude::*;
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// The only signature method AWeber accepts.
pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";

/// Protocol version sent with every signed request.
pub const OAUTH_VERSION: &str = "1.0";

const NONCE_LENGTH: usize = 32;

/// Percent-encodes a value as required by OAuth 1.0a (RFC 3986 unreserved set).
#[must_use]
pub fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Generates a random alphanumeric nonce.
#[must_use]
pub fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LENGTH)
        .map(char::from)
        .collect()
}

/// Encodes, sorts and joins parameters into the normalized parameter string.
#[must_use]
pub fn normalize_parameters(params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();

    encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Builds the signature base string `METHOD&base_url&params`.
///
/// `base_url` must not contain a query string; query parameters belong in `params`.
#[must_use]
pub fn signature_base_string(method: &str, base_url: &str, params: &[(String, String)]) -> String {
    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(base_url),
        percent_encode(&normalize_parameters(params))
    )
}

/// Signs a base string with HMAC-SHA1, returning the base64 signature.
///
/// The key is `consumer_secret&token_secret`; `token_secret` is empty
/// before a request token has been obtained.
#[must_use]
#[allow(clippy::missing_panics_doc)] // HMAC accepts any key size, so this never panics
pub fn sign(base_string: &str, consumer_secret: &str, token_secret: &str) -> String {
    let key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );
    let mut mac = HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC can take key of any size");
    mac.update(base_string.as_bytes());
    BASE64_STANDARD.encode(mac.finalize().into_bytes())
}

/// Computes the `Authorization` header for a single request.
///
/// A fresh nonce and timestamp are generated on every call, so a retried
/// request must be signed again.
#[derive(Clone, Copy, Debug)]
pub struct RequestSigner<'a> {
    consumer_key: &'a str,
    consumer_secret: &'a str,
    token: Option<&'a str>,
    token_secret: &'a str,
}

impl<'a> RequestSigner<'a> {
    /// Creates a signer for the given consumer and optional token credentials.
    #[must_use]
    pub const fn new(
        consumer_key: &'a str,
        consumer_secret: &'a str,
        token: Option<&'a str>,
        token_secret: Option<&'a str>,
    ) -> Self {
        let token_secret = match token_secret {
            Some(secret) => secret,
            None => "",
        };
        Self {
            consumer_key,
            consumer_secret,
            token,
            token_secret,
        }
    }

    /// Returns the `Authorization` header value for a request.
    ///
    /// `base_url` excludes the query string; `params` holds every query
    /// and form parameter of the request.
    #[must_use]
    pub fn authorization_header(
        &self,
        method: &str,
        base_url: &str,
        params: &[(String, String)],
    ) -> String {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        self.authorization_header_with(method, base_url, params, &generate_nonce(), &timestamp)
    }

    /// Same as [`authorization_header`](Self::authorization_header) with a fixed
    /// nonce and timestamp.
    #[must_use]
    pub fn authorization_header_with(
        &self,
        method: &str,
        base_url: &str,
        params: &[(String, String)],
        nonce: &str,
        timestamp: &str,
    ) -> String {
        let mut oauth_params = vec![
            ("oauth_consumer_key".to_string(), self.consumer_key.to_string()),
            ("oauth_nonce".to_string(), nonce.to_string()),
            (
                "oauth_signature_method".to_string(),
                SIGNATURE_METHOD.to_string(),
            ),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            ("oauth_version".to_string(), OAUTH_VERSION.to_string()),
        ];
        if let Some(token) = self.token {
            oauth_params.push(("oauth_token".to_string(), token.to_string()));
        }

        let mut all_params = oauth_params.clone();
        all_params.extend_from_slice(params);
        let base_string = signature_base_string(method, base_url, &all_params);
        let signature = sign(&base_string, self.consumer_secret, self.token_secret);

        oauth_params.push(("oauth_signature".to_string(), signature));
        oauth_params.sort();

        let fields = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");
        format!("OAuth {fields}")
    }
}
