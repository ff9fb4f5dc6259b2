//! HTTP client for AWeber API communication.
//!
//! This module provides the [`HttpClient`] type, the OAuth-signing
//! [`Transport`] used against the live API.

use std::collections::HashMap;

use reqwest::Url;
use serde_json::Value;

use crate::auth::oauth::signature::RequestSigner;
use crate::clients::errors::{
    HttpError, InvalidHttpRequestError, MaxHttpRetriesExceededError, ServiceError,
};
use crate::clients::http_request::{param_value, HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::clients::transport::Transport;
use crate::config::AWeberConfig;

/// Fixed retry wait time in seconds.
pub const RETRY_WAIT_TIME: u64 = 1;

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making signed requests to the AWeber API.
///
/// The client handles:
/// - Expansion of relative URLs against the configured API base
/// - Parameter encoding per method (query for GET, form for POST, JSON for PATCH)
/// - OAuth 1.0a HMAC-SHA1 signing of every attempt
/// - Parsing AWeber error bodies into [`ServiceError`]
/// - Automatic retry logic for 429 and 500 responses
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use aweber_api::clients::{HttpClient, HttpMethod, HttpRequest, Transport};
///
/// let client = HttpClient::new(&config, Some("access-token"), Some("token-secret"))?;
///
/// let request = HttpRequest::builder(HttpMethod::Get, "/accounts")
///     .build()
///     .unwrap();
///
/// let response = client.request(request).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    api_base: String,
    consumer_key: String,
    consumer_secret: String,
    token: Option<String>,
    token_secret: Option<String>,
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// `token` and `token_secret` are the OAuth token credentials: a request
    /// token during the authorization handshake, an access token afterwards,
    /// or `None` when obtaining a request token.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying reqwest client cannot
    /// be created (e.g., TLS initialization failure).
    pub fn new(
        config: &AWeberConfig,
        token: Option<&str>,
        token_secret: Option<&str>,
    ) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}AWeber API Library v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        let client = reqwest::Client::builder().use_rustls_tls().build()?;

        Ok(Self {
            client,
            api_base: config.api_base().as_ref().to_string(),
            consumer_key: config.consumer_key().as_ref().to_string(),
            consumer_secret: config.consumer_secret().as_ref().to_string(),
            token: token.map(String::from),
            token_secret: token_secret.map(String::from),
            default_headers,
        })
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the OAuth token this client signs with, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Expands a relative URL against the API base.
    ///
    /// URLs that already start with `http` are returned unchanged.
    #[must_use]
    pub fn expand_url(&self, url: &str) -> String {
        if url.starts_with("http") {
            url.to_string()
        } else {
            format!("{}/{}", self.api_base, url.trim_start_matches('/'))
        }
    }

    fn signer(&self) -> RequestSigner<'_> {
        RequestSigner::new(
            &self.consumer_key,
            &self.consumer_secret,
            self.token.as_deref(),
            self.token_secret.as_deref(),
        )
    }

    /// Sends a single attempt of a prepared request.
    async fn send_once(
        &self,
        method: HttpMethod,
        url: &Url,
        form: &[(String, String)],
        json_body: Option<&Value>,
    ) -> Result<HttpResponse, HttpError> {
        let mut signed_params: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        signed_params.extend_from_slice(form);

        let authorization =
            self.signer()
                .authorization_header(method.as_str(), &signature_base_url(url), &signed_params);

        let mut req_builder = match method {
            HttpMethod::Get => self.client.get(url.clone()),
            HttpMethod::Post => self.client.post(url.clone()),
            HttpMethod::Patch => self.client.patch(url.clone()),
            HttpMethod::Delete => self.client.delete(url.clone()),
        };

        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }
        req_builder = req_builder.header("Authorization", authorization);

        if method == HttpMethod::Post {
            req_builder = req_builder.form(form);
        }
        if let Some(body) = json_body {
            req_builder = req_builder.json(body);
        }

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await.unwrap_or_default();

        let body = if body_text.trim().is_empty() {
            serde_json::json!({})
        } else {
            serde_json::from_str(&body_text).unwrap_or(Value::String(body_text))
        };

        Ok(HttpResponse::new(code, res_headers, body))
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Calculates the retry delay based on response and status code.
    fn calculate_retry_delay(response: &HttpResponse, status: u16) -> std::time::Duration {
        // 429 honors Retry-After; 500 always waits the fixed delay
        if status == 429 {
            if let Some(retry_after) = response.retry_request_after {
                return std::time::Duration::from_secs_f64(retry_after);
            }
        }
        std::time::Duration::from_secs(RETRY_WAIT_TIME)
    }
}

impl Transport for HttpClient {
    fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Sends an HTTP request to the AWeber API.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails or the URL cannot be parsed (`InvalidRequest`)
    /// - Network error occurs (`Network`)
    /// - Non-2xx response received (`Service`)
    /// - Max retries exceeded (`MaxRetries`)
    async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let expanded = self.expand_url(&request.url);
        let mut url = Url::parse(&expanded)
            .map_err(|_| InvalidHttpRequestError::InvalidUrl { url: expanded.clone() })?;

        let params: Vec<(String, String)> = request
            .data
            .iter()
            .map(|(k, v)| (k.clone(), param_value(v)))
            .collect();

        let (form, json_body) = match request.http_method {
            HttpMethod::Get => {
                if !params.is_empty() {
                    url.query_pairs_mut().extend_pairs(params.iter());
                }
                (Vec::new(), None)
            }
            HttpMethod::Post => (params, None),
            HttpMethod::Patch => (Vec::new(), Some(Value::Object(request.data.clone()))),
            HttpMethod::Delete => (Vec::new(), None),
        };

        let mut tries: u32 = 0;
        loop {
            tries += 1;
            tracing::debug!("{} {}", request.http_method, url);

            let response = self
                .send_once(request.http_method, &url, &form, json_body.as_ref())
                .await?;

            if response.is_ok() {
                return Ok(response);
            }

            let code = response.code;
            let error = ServiceError::from_response(code, &response.body);

            let should_retry = code == 429 || code == 500;
            if !should_retry || request.tries == 1 {
                return Err(HttpError::Service(error));
            }
            if tries >= request.tries {
                return Err(HttpError::MaxRetries(MaxHttpRetriesExceededError {
                    tries: request.tries,
                    last: error,
                }));
            }

            let delay = Self::calculate_retry_delay(&response, code);
            tracing::warn!(
                "Retrying {} {} after status {} (attempt {} of {})",
                request.http_method,
                url,
                code,
                tries,
                request.tries
            );
            tokio::time::sleep(delay).await;
        }
    }
}

/// Scheme, host, non-default port and path of a URL, as signed by OAuth 1.0a.
fn signature_base_url(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    let port = url.port().map_or(String::new(), |port| format!(":{port}"));
    format!("{}://{host}{port}{}", url.scheme(), url.path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BaseUrl, ConsumerKey, ConsumerSecret};

    fn create_test_config() -> AWeberConfig {
        AWeberConfig::builder()
            .consumer_key(ConsumerKey::new("consumer-key").unwrap())
            .consumer_secret(ConsumerSecret::new("consumer-secret").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_expand_url_prefixes_api_base() {
        let client = HttpClient::new(&create_test_config(), None, None).unwrap();

        assert_eq!(
            client.expand_url("/accounts/1/lists"),
            "https://api.aweber.com/1.0/accounts/1/lists"
        );
        assert_eq!(
            client.expand_url("https://api.aweber.com/1.0/accounts"),
            "https://api.aweber.com/1.0/accounts"
        );
    }

    #[test]
    fn test_user_agent_header_format() {
        let client = HttpClient::new(&create_test_config(), None, None).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.contains("AWeber API Library v"));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = AWeberConfig::builder()
            .consumer_key(ConsumerKey::new("key").unwrap())
            .consumer_secret(ConsumerSecret::new("secret").unwrap())
            .user_agent_prefix("MyApp/1.0")
            .build()
            .unwrap();
        let client = HttpClient::new(&config, None, None).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("MyApp/1.0 | "));
    }

    #[test]
    fn test_api_base_follows_config() {
        let config = AWeberConfig::builder()
            .consumer_key(ConsumerKey::new("key").unwrap())
            .consumer_secret(ConsumerSecret::new("secret").unwrap())
            .api_base(BaseUrl::new("http://127.0.0.1:8080/1.0").unwrap())
            .build()
            .unwrap();
        let client = HttpClient::new(&config, Some("token"), Some("secret")).unwrap();

        assert_eq!(client.api_base(), "http://127.0.0.1:8080/1.0");
        assert_eq!(client.token(), Some("token"));
    }

    #[test]
    fn test_signature_base_url_drops_query_and_default_port() {
        let url = Url::parse("https://API.aweber.com:443/1.0/accounts?ws.op=find").unwrap();
        assert_eq!(signature_base_url(&url), "https://api.aweber.com/1.0/accounts");

        let url = Url::parse("http://127.0.0.1:8080/1.0/accounts").unwrap();
        assert_eq!(signature_base_url(&url), "http://127.0.0.1:8080/1.0/accounts");
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }
}
