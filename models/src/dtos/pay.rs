use serde::{Deserialize, Serialize};

use crate::models::payment::{Payment, PaymentMethod};

#[derive(Debug, Deserialize)]
pub struct PaymentsResponse {
    #[serde(default)]
    pub payments: Vec<Payment>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentMethodsResponse {
    #[serde(default, alias = "paymentMethods")]
    pub payment_methods: Vec<PaymentMethod>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentMethodResponse {
    #[serde(alias = "paymentMethod")]
    pub payment_method: PaymentMethod,
}

/// Raw card details as sent to the backend after client-side formatting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatePaymentMethodRequest {
    pub card_number: String,
    pub card_holder: String,
    pub card_type: String,
    pub expiry_month: u32,
    pub expiry_year: u32,
    pub cvv: String,
    pub is_default: bool,
}
