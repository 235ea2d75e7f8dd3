use chrono::NaiveDate;
use common::error::Res;
use common::http::ApiClient;
use log::{info, warn};
use models::Id;
use models::dtos::pay::{PaymentMethodResponse, PaymentMethodsResponse, PaymentsResponse};
use models::dtos::sub::{Order, RecordPaymentRequest};
use models::models::payment::{Payment, PaymentMethod};

use crate::misc::pay::CardDetails;

/// Gets the caller's payment history, newest first as served.
pub async fn list_payments(api: &ApiClient) -> Res<Vec<Payment>> {
    let res: PaymentsResponse = api
        .get("/api/payments", "Failed to load payment history")
        .await?;
    Ok(res.payments)
}

/// Records a declined checkout.
///
/// # Arguments
///
/// * `order_id` - Id of the declined order
/// * `order` - Order the provider declined; its amount is in minor units
/// * `payment_id` - Provider payment id, when the widget reported one
pub async fn record_failed_payment(
    api: &ApiClient,
    order_id: &str,
    order: &Order,
    payment_id: Option<&str>,
) -> Res<()> {
    let req = RecordPaymentRequest {
        order_id: order_id.to_string(),
        amount: order.amount as f64 / 100.0,
        currency: order.currency.clone(),
        payment_method: "razorpay".to_string(),
        payment_id: payment_id.unwrap_or("unknown").to_string(),
        status: "failed".to_string(),
    };
    let _: serde_json::Value = api
        .post("/api/payments", &req, "Failed to record payment")
        .await?;
    warn!("Recorded failed payment for order {}", order_id);
    Ok(())
}

pub async fn list_payment_methods(api: &ApiClient) -> Res<Vec<PaymentMethod>> {
    let res: PaymentMethodsResponse = api
        .get("/api/payment-methods", "Failed to load payment methods")
        .await?;
    Ok(res.payment_methods)
}

/// Validates the card locally, then saves it.
/// Invalid input never reaches the backend.
pub async fn add_payment_method(
    api: &ApiClient,
    card: CardDetails,
    today: NaiveDate,
) -> Res<PaymentMethod> {
    let req = card.into_request(today)?;
    let res: PaymentMethodResponse = api
        .post("/api/payment-methods", &req, "Failed to add payment method")
        .await?;
    info!(
        "Added {} card ending {}",
        res.payment_method.card_type, res.payment_method.last4
    );
    Ok(res.payment_method)
}

/// Deletes a saved card. Nothing is sent unless `confirmed`.
pub async fn delete_payment_method(api: &ApiClient, id: &Id, confirmed: bool) -> Res<bool> {
    if !confirmed {
        return Ok(false);
    }
    let _: serde_json::Value = api
        .delete(
            &format!("/api/payment-methods/{}", id),
            "Failed to delete payment method",
        )
        .await?;
    Ok(true)
}

pub async fn set_default_payment_method(api: &ApiClient, id: &Id) -> Res<()> {
    let _: serde_json::Value = api
        .put(
            &format!("/api/payment-methods/{}/default", id),
            &serde_json::json!({}),
            "Failed to update default payment method",
        )
        .await?;
    Ok(())
}
