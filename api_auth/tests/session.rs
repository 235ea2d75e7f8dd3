use api_auth::{MemoryTokenStore, Session, SessionState, TokenStore};
use common::{error::AppError, http::ApiClient};
use jsonwebtoken::{EncodingKey, Header};
use models::models::user::{SubscriptionStatus, Tier, UserPatch};
use serde::Serialize;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Serialize)]
struct Claims {
    id: u64,
    exp: i64,
}

fn jwt(exp: i64) -> String {
    jsonwebtoken::encode(
        &Header::default(),
        &Claims { id: 7, exp },
        &EncodingKey::from_secret(b"server-secret"),
    )
    .unwrap()
}

fn user_json() -> serde_json::Value {
    json!({
        "id": 7,
        "name": "Ada",
        "email": "ada@example.com",
        "subscription_tier": "free",
        "subscription_status": null
    })
}

fn api(server: &MockServer) -> ApiClient {
    ApiClient::new(Url::parse(&server.uri()).unwrap())
}

#[tokio::test]
async fn login_persists_token_and_survives_reload() {
    let server = MockServer::start().await;
    let token = jwt(chrono::Utc::now().timestamp() + 3600);

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "ada@example.com", "password": "hunter22" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "token": token, "user": user_json() })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": user_json() })))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryTokenStore::new();
    let mut session = Session::new(api(&server), store.clone());
    let user = session.login(" ada@example.com ", "hunter22").await.unwrap();
    assert_eq!(user.name, "Ada");
    assert_eq!(session.state(), SessionState::Authenticated);
    assert_eq!(store.load().unwrap().as_deref(), Some(token.as_str()));

    let reloaded = Session::init(api(&server), store).await;
    assert!(reloaded.is_authenticated());
    assert_eq!(reloaded.user().unwrap().email, "ada@example.com");
}

#[tokio::test]
async fn rejected_login_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let store = MemoryTokenStore::new();
    let mut session = Session::new(api(&server), store.clone());
    let err = session.login("ada@example.com", "wrong-pass").await.unwrap_err();

    assert!(matches!(&err, AppError::Unauthorized(msg) if msg == "Invalid credentials"));
    assert_eq!(session.state(), SessionState::Anonymous);
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn register_with_mismatched_passwords_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = Session::new(api(&server), MemoryTokenStore::new());
    let err = session
        .register("Ada", "ada@example.com", "longenough", "different1")
        .await
        .unwrap_err();

    match err {
        AppError::Validation { fields, .. } => assert!(fields.contains_key("confirmPassword")),
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn register_sends_only_name_email_password() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(body_json(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "longenough"
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "token": "opaque", "user": user_json() })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryTokenStore::new();
    let mut session = Session::new(api(&server), store.clone());
    session
        .register("Ada", "ada@example.com", "longenough", "longenough")
        .await
        .unwrap();
    assert_eq!(session.token(), Some("opaque"));
    assert_eq!(store.load().unwrap().as_deref(), Some("opaque"));
}

#[tokio::test]
async fn logout_clears_storage_without_server_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "token": "opaque", "user": user_json() })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": user_json() })))
        .expect(0)
        .mount(&server)
        .await;

    let store = MemoryTokenStore::new();
    let mut session = Session::new(api(&server), store.clone());
    session.login("ada@example.com", "hunter22").await.unwrap();
    session.logout();

    assert!(session.user().is_none());
    assert!(session.token().is_none());
    assert_eq!(store.load().unwrap(), None);

    let reloaded = Session::init(api(&server), store).await;
    assert_eq!(reloaded.state(), SessionState::Anonymous);
}

#[tokio::test]
async fn rejected_stored_token_is_discarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Token expired" })))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryTokenStore::with_token("revoked");
    let session = Session::init(api(&server), store.clone()).await;

    assert_eq!(session.state(), SessionState::Anonymous);
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn expired_jwt_is_dropped_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": user_json() })))
        .expect(0)
        .mount(&server)
        .await;

    let store = MemoryTokenStore::with_token(&jwt(chrono::Utc::now().timestamp() - 60));
    let session = Session::init(api(&server), store.clone()).await;

    assert!(!session.is_authenticated());
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn server_outage_keeps_stored_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = MemoryTokenStore::with_token("opaque");
    let session = Session::init(api(&server), store.clone()).await;

    assert_eq!(session.state(), SessionState::Anonymous);
    assert_eq!(store.load().unwrap().as_deref(), Some("opaque"));
}

#[tokio::test]
async fn guard_logs_out_on_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": user_json() })))
        .mount(&server)
        .await;

    let store = MemoryTokenStore::with_token("opaque");
    let mut session = Session::init(api(&server), store.clone()).await;
    assert!(session.is_authenticated());

    let res: Result<(), AppError> = Err(AppError::Unauthorized("Session expired".into()));
    assert!(session.guard(res).is_err());
    assert!(!session.is_authenticated());
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn local_patch_updates_cached_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": user_json() })))
        .mount(&server)
        .await;

    let mut session = Session::init(api(&server), MemoryTokenStore::with_token("opaque")).await;
    session.update_user(UserPatch::subscription(Tier::Pro, SubscriptionStatus::Active));

    let user = session.require_user().unwrap();
    assert_eq!(user.subscription_tier, Tier::Pro);
    assert!(user.has_active_subscription());
}
