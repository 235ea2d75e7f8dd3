use serde::{Deserialize, Serialize};

use crate::de::{self, Id};
use crate::models::plan::Plan;
use crate::models::subscription::{BillingCycle, Subscription};
use crate::models::user::User;

#[derive(Debug, Deserialize)]
pub struct PlansResponse {
    #[serde(default)]
    pub plans: Vec<Plan>,
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionResponse {
    #[serde(default)]
    pub subscription: Option<Subscription>,
}

#[derive(Debug, Serialize)]
pub struct SubscribeRequest {
    pub plan_id: Id,
    pub billing_cycle: BillingCycle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method_id: Option<Id>,
}

#[derive(Debug, Deserialize)]
pub struct SubscribeResponse {
    #[serde(default)]
    pub subscription: Option<Subscription>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /api/subscriptions/create`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub plan_id: Id,
    pub interval: BillingCycle,
}

/// Provider order created by the backend. `amount` is in the currency's
/// minor unit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Order {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de::u64_lenient")]
    pub amount: u64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "INR".to_string()
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderResponse {
    #[serde(default)]
    pub order: Option<Order>,
    #[serde(default)]
    pub key_id: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// Provider callback values, forwarded verbatim for signature verification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerifyPaymentRequest {
    pub razorpay_payment_id: String,
    pub razorpay_order_id: String,
    pub razorpay_signature: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyPaymentResponse {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub subscription: Option<Subscription>,
}

/// Failed-payment record posted after a provider decline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordPaymentRequest {
    pub order_id: String,
    pub amount: f64,
    pub currency: String,
    pub payment_method: String,
    pub payment_id: String,
    pub status: String,
}
