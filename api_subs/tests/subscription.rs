use api_auth::{MemoryTokenStore, Session};
use api_subs::misc::pay::CardDetails;
use api_subs::services::{pay, sub};
use chrono::NaiveDate;
use common::error::AppError;
use common::http::ApiClient;
use models::Id;
use models::models::subscription::BillingCycle;
use models::models::user::{SubscriptionStatus, Tier};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api(server: &MockServer) -> ApiClient {
    ApiClient::new(Url::parse(&server.uri()).unwrap())
}

async fn signed_in(server: &MockServer, tier: &str) -> Session {
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {
                "id": 7,
                "name": "Ada",
                "email": "ada@example.com",
                "subscription_tier": tier,
                "subscription_status": "active"
            }
        })))
        .mount(server)
        .await;
    Session::init(api(server), MemoryTokenStore::with_token("tok")).await
}

#[tokio::test]
async fn plans_are_ordered_by_tier() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/subscriptions/plans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "plans": [
                { "id": 3, "name": "enterprise", "monthly_price": "99.00", "form_limit": 100 },
                { "id": 1, "name": "free", "monthly_price": 0, "form_limit": 3 },
                { "id": 2, "name": "pro", "monthly_price": 19, "form_limit": 20,
                  "features": { "file_uploads": 1 } }
            ]
        })))
        .mount(&server)
        .await;

    let plans = sub::fetch_plans(&api(&server)).await.unwrap();
    let tiers: Vec<Tier> = plans.iter().map(|p| p.name).collect();
    assert_eq!(tiers, [Tier::Free, Tier::Pro, Tier::Enterprise]);
    assert!(plans[1].features.file_uploads);
    assert_eq!(plans[2].monthly_price, 99.0);
}

#[tokio::test]
async fn missing_subscription_is_free() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/subscriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "subscription": null })))
        .mount(&server)
        .await;

    let subscription = sub::fetch_subscription(&api(&server)).await.unwrap();
    assert_eq!(subscription.tier, Tier::Free);
    assert!(!subscription.is_active());
}

#[tokio::test]
async fn subscribe_patches_cached_user() {
    let server = MockServer::start().await;
    let mut session = signed_in(&server, "free").await;
    Mock::given(method("POST"))
        .and(path("/api/subscriptions"))
        .and(body_json(json!({
            "plan_id": 2,
            "billing_cycle": "yearly",
            "payment_method_id": 5
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "subscription": { "tier": "pro", "status": "active", "billing_cycle": "yearly" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let subscription = sub::subscribe_to_plan(
        &mut session,
        Id::Num(2),
        BillingCycle::Yearly,
        Some(Id::Num(5)),
    )
    .await
    .unwrap();

    assert_eq!(subscription.billing_cycle, Some(BillingCycle::Yearly));
    assert_eq!(session.user().unwrap().subscription_tier, Tier::Pro);
}

#[tokio::test]
async fn subscribe_failure_keeps_user() {
    let server = MockServer::start().await;
    let mut session = signed_in(&server, "free").await;
    Mock::given(method("POST"))
        .and(path("/api/subscriptions"))
        .respond_with(
            ResponseTemplate::new(402).set_body_json(json!({ "message": "Card was declined" })),
        )
        .mount(&server)
        .await;

    let err = sub::subscribe_to_plan(&mut session, Id::Num(2), BillingCycle::Monthly, None)
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Card was declined");
    assert_eq!(session.user().unwrap().subscription_tier, Tier::Free);
}

#[tokio::test]
async fn cancel_requires_confirmation() {
    let server = MockServer::start().await;
    let mut session = signed_in(&server, "pro").await;
    Mock::given(method("POST"))
        .and(path("/api/subscriptions/cancel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(!sub::cancel_subscription(&mut session, false).await.unwrap());
    assert_eq!(session.user().unwrap().subscription_tier, Tier::Pro);

    assert!(sub::cancel_subscription(&mut session, true).await.unwrap());
    let user = session.user().unwrap();
    assert_eq!(user.subscription_tier, Tier::Free);
    assert_eq!(user.subscription_status, SubscriptionStatus::Cancelled);
}

#[tokio::test]
async fn unauthorized_cancel_signs_out() {
    let server = MockServer::start().await;
    let mut session = signed_in(&server, "pro").await;
    Mock::given(method("POST"))
        .and(path("/api/subscriptions/downgrade"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Expired" })))
        .mount(&server)
        .await;

    let err = sub::downgrade_to_free(&mut session, true).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn invalid_card_is_never_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/payment-methods"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let card = CardDetails {
        number: "4242 4242 4242 4241".into(),
        holder: "Ada".into(),
        expiry_month: 12,
        expiry_year: 2030,
        cvv: "123".into(),
        is_default: false,
    };
    let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let err = pay::add_payment_method(&api(&server), card, today)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));
}

#[tokio::test]
async fn payment_methods_lifecycle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/payment-methods"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "payment_method": {
                "id": 11, "card_type": "visa", "last4": "4242",
                "expiry_month": 12, "expiry_year": 2030, "is_default": 1
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/payment-methods/11/default"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/payment-methods/11"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let api = api(&server);
    let card = CardDetails {
        number: "4242-4242-4242-4242".into(),
        holder: "Ada".into(),
        expiry_month: 12,
        expiry_year: 30,
        cvv: "123".into(),
        is_default: true,
    };
    let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let saved = pay::add_payment_method(&api, card, today).await.unwrap();
    assert!(saved.is_default);
    assert_eq!(saved.expiry(), "12/30");

    pay::set_default_payment_method(&api, &saved.id).await.unwrap();
    assert!(!pay::delete_payment_method(&api, &saved.id, false).await.unwrap());
    assert!(pay::delete_payment_method(&api, &saved.id, true).await.unwrap());
}

#[tokio::test]
async fn payment_history() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/payments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "payments": [
                { "id": 1, "amount": "19.00", "currency": "USD", "status": "completed" },
                { "id": 2, "amount": 19 }
            ]
        })))
        .mount(&server)
        .await;

    let payments = pay::list_payments(&api(&server)).await.unwrap();
    assert_eq!(payments.len(), 2);
    assert!(payments[0].is_completed());
    assert_eq!(payments[1].status(), "unknown");
}
