//! Integration tests for the OAuth 1.0a handshake against a mock
//! authorization server.

use aweber_api::{AWeberApi, AWeberConfig, BaseUrl, ConsumerKey, ConsumerSecret, OAuthError, OAuthSession};
use wiremock::matchers::{body_string_contains, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn builder_for(server: &MockServer) -> aweber_api::AWeberConfigBuilder {
    AWeberConfig::builder().auth_base(BaseUrl::new(server.uri()).unwrap())
}

fn api_for(server: &MockServer) -> AWeberApi {
    let config = builder_for(server)
        .consumer_key(ConsumerKey::new("consumer-key").unwrap())
        .consumer_secret(ConsumerSecret::new("consumer-secret").unwrap())
        .build()
        .unwrap();
    AWeberApi::new(config)
}

async fn mount_access_token(server: &MockServer, verifier: &str) {
    Mock::given(method("POST"))
        .and(path("/oauth/access_token"))
        .and(body_string_contains(format!("oauth_verifier={verifier}")))
        .and(header_exists("Authorization"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("oauth_token=access-token&oauth_token_secret=access-secret"),
        )
        .expect(1)
        .mount(server)
        .await;
}

// ============================================================================
// Request token
// ============================================================================

#[tokio::test]
async fn test_request_token_is_stored_in_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/request_token"))
        .and(body_string_contains(
            "oauth_callback=https%3A%2F%2Fexample.com%2Fcallback",
        ))
        .and(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "oauth_token=request-token&oauth_token_secret=request-secret&oauth_callback_confirmed=true",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let mut api = api_for(&server);
    let pair = api
        .get_request_token("https://example.com/callback")
        .await
        .unwrap();

    assert_eq!(pair.token, "request-token");
    assert_eq!(pair.secret, "request-secret");
    assert_eq!(api.session().request_token.as_deref(), Some("request-token"));
    assert_eq!(api.session().token_secret.as_deref(), Some("request-secret"));
    assert!(!api.session().is_authorized());
    assert_eq!(
        api.authorize_url(),
        format!("{}/oauth/authorize?oauth_token=request-token", server.uri())
    );
}

#[tokio::test]
async fn test_request_token_without_tokens_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/request_token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("oauth_problem=nonce_used"))
        .mount(&server)
        .await;

    let mut api = api_for(&server);
    let result = api.get_request_token("oob").await;

    assert!(matches!(
        result,
        Err(OAuthError::UnexpectedTokenResponse { .. })
    ));
    assert!(api.session().request_token.is_none());
}

#[tokio::test]
async fn test_request_token_rejected_by_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/request_token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": {"type": "UnauthorizedError", "message": "Invalid consumer key."}
        })))
        .mount(&server)
        .await;

    let mut api = api_for(&server);
    let error = api.get_request_token("oob").await.unwrap_err();

    let OAuthError::Http(http) = &error else {
        panic!("expected an HTTP error, got {error:?}");
    };
    assert_eq!(http.service_error().map(|e| e.code), Some(401));
    assert_eq!(error.to_string(), "UnauthorizedError: Invalid consumer key.");
}

// ============================================================================
// Access token
// ============================================================================

#[tokio::test]
async fn test_access_token_completes_session() {
    let server = MockServer::start().await;
    mount_access_token(&server, "verifier-123").await;

    let mut api = api_for(&server);
    *api.session_mut() = OAuthSession {
        request_token: Some("request-token".to_string()),
        token_secret: Some("request-secret".to_string()),
        access_token: None,
        verifier: Some("verifier-123".to_string()),
    };

    let pair = api.get_access_token().await.unwrap();

    assert_eq!(pair.token, "access-token");
    assert!(api.session().is_authorized());
    assert_eq!(api.session().highest_priority_token(), Some("access-token"));
    assert_eq!(api.session().token_secret.as_deref(), Some("access-secret"));
    assert_eq!(api.adapter().unwrap().token(), Some("access-token"));
}

#[tokio::test]
async fn test_authorization_code_exchange() {
    let server = MockServer::start().await;
    mount_access_token(&server, "verifier-456").await;

    let keys = AWeberApi::exchange_authorization_code(
        "consumer-key|consumer-secret|request-token|request-secret|verifier-456",
        builder_for(&server),
    )
    .await
    .unwrap();

    assert_eq!(keys.consumer_key, "consumer-key");
    assert_eq!(keys.consumer_secret, "consumer-secret");
    assert_eq!(keys.access_token, "access-token");
    assert_eq!(keys.access_token_secret, "access-secret");
}

#[tokio::test]
async fn test_authorization_code_with_empty_credentials() {
    let server = MockServer::start().await;

    let result = AWeberApi::exchange_authorization_code(
        "|consumer-secret|request-token|request-secret|verifier",
        builder_for(&server),
    )
    .await;

    assert!(matches!(result, Err(OAuthError::Config(_))));
}

#[test]
fn test_session_survives_serialization() {
    let session = OAuthSession::with_access_token("access-token", "access-secret");
    let json = serde_json::to_string(&session).unwrap();
    let restored: OAuthSession = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, session);
}
