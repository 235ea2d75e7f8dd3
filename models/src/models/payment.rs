use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::de::{self, Id};

/// Entry of the payment history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: Id,
    #[serde(default, deserialize_with = "de::f64_lenient")]
    pub amount: f64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de::opt_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Payment {
    pub fn currency(&self) -> &str {
        self.currency.as_deref().unwrap_or("USD")
    }

    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or("unknown")
    }

    pub fn is_completed(&self) -> bool {
        self.status() == "completed"
    }
}

/// Saved card. Only the last four digits ever come back from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: Id,
    #[serde(default, alias = "cardType", alias = "brand")]
    pub card_type: String,
    #[serde(alias = "last_four", alias = "lastFour")]
    pub last4: String,
    #[serde(default, alias = "expiryMonth", deserialize_with = "de::u64_lenient")]
    pub expiry_month: u64,
    #[serde(default, alias = "expiryYear", deserialize_with = "de::u64_lenient")]
    pub expiry_year: u64,
    #[serde(default, alias = "isDefault", alias = "default", deserialize_with = "de::bool_or_int")]
    pub is_default: bool,
}

impl PaymentMethod {
    /// `MM/YY` form shown next to the card.
    pub fn expiry(&self) -> String {
        format!("{:02}/{:02}", self.expiry_month, self.expiry_year % 100)
    }
}
