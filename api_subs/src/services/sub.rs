use api_auth::Session;
use common::error::{AppError, Res};
use common::http::ApiClient;
use log::info;
use models::Id;
use models::dtos::sub::{PlansResponse, SubscribeRequest, SubscribeResponse, SubscriptionResponse};
use models::models::plan::Plan;
use models::models::subscription::{BillingCycle, Subscription};
use models::models::user::{SubscriptionStatus, Tier, UserPatch};

/// Gets the plan catalog, ordered free, pro, enterprise.
pub async fn fetch_plans(api: &ApiClient) -> Res<Vec<Plan>> {
    let res: PlansResponse = api
        .get("/api/subscriptions/plans", "Failed to load plans")
        .await?;
    let mut plans = res.plans;
    plans.sort_by_key(|plan| plan.name);
    Ok(plans)
}

/// Gets the caller's subscription.
/// Returns the free-tier default if the caller has none.
pub async fn fetch_subscription(api: &ApiClient) -> Res<Subscription> {
    let res: SubscriptionResponse = api
        .get("/api/subscriptions", "Failed to load subscription details")
        .await?;
    Ok(res.subscription.unwrap_or_else(Subscription::free))
}

/// Subscribes with a saved payment method.
///
/// On success the cached user is replaced (or patched when the backend
/// returns no user) and the new subscription is returned for the caller to
/// cache. Failures are returned once; nothing is retried.
pub async fn subscribe_to_plan(
    session: &mut Session,
    plan_id: Id,
    billing_cycle: BillingCycle,
    payment_method_id: Option<Id>,
) -> Res<Subscription> {
    session.require_user()?;

    let req = SubscribeRequest {
        plan_id,
        billing_cycle,
        payment_method_id,
    };
    let res: Res<SubscribeResponse> = session
        .api()
        .post("/api/subscriptions", &req, "Failed to subscribe to plan")
        .await;
    let res = session.guard(res)?;

    let subscription = res.subscription.ok_or_else(|| {
        AppError::InvalidServerResponse("subscription missing from response".to_string())
    })?;

    match res.user {
        Some(user) => session.set_user(user),
        None => session.update_user(UserPatch::subscription(
            subscription.tier,
            subscription.status,
        )),
    }
    info!("Subscribed to {} ({})", subscription.tier, billing_cycle);
    Ok(subscription)
}

/// Cancels the paid subscription. Nothing is sent unless `confirmed`.
///
/// Returns whether the call was made. The cached user drops to free and
/// cancelled until the next authoritative fetch.
pub async fn cancel_subscription(session: &mut Session, confirmed: bool) -> Res<bool> {
    end_subscription(
        session,
        confirmed,
        "/api/subscriptions/cancel",
        "Failed to cancel subscription",
    )
    .await
}

/// Moves the caller back to the free plan. Nothing is sent unless
/// `confirmed`.
pub async fn downgrade_to_free(session: &mut Session, confirmed: bool) -> Res<bool> {
    end_subscription(
        session,
        confirmed,
        "/api/subscriptions/downgrade",
        "Failed to downgrade subscription",
    )
    .await
}

async fn end_subscription(
    session: &mut Session,
    confirmed: bool,
    path: &str,
    fallback: &str,
) -> Res<bool> {
    session.require_user()?;
    if !confirmed {
        return Ok(false);
    }

    let res: Res<serde_json::Value> = session
        .api()
        .post(path, &serde_json::json!({}), fallback)
        .await;
    session.guard(res)?;

    session.update_user(UserPatch::subscription(
        Tier::Free,
        SubscriptionStatus::Cancelled,
    ));
    info!("Subscription ended via {}", path);
    Ok(true)
}
