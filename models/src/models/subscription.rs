use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::de;
use crate::models::user::{SubscriptionStatus, Tier};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    #[default]
    #[serde(alias = "month")]
    Monthly,
    #[serde(alias = "year", alias = "annual")]
    Yearly,
}

impl BillingCycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "monthly",
            BillingCycle::Yearly => "yearly",
        }
    }

    /// Unit shown after a price: `/month` or `/year`.
    pub fn unit(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "month",
            BillingCycle::Yearly => "year",
        }
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BillingCycle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" | "month" => Ok(BillingCycle::Monthly),
            "yearly" | "year" | "annual" => Ok(BillingCycle::Yearly),
            other => Err(format!("unknown billing cycle: {}", other)),
        }
    }
}

/// The caller's subscription as last fetched or locally patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(default, deserialize_with = "de::null_default")]
    pub tier: Tier,
    #[serde(default, deserialize_with = "de::null_default")]
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub billing_cycle: Option<BillingCycle>,
    #[serde(default, deserialize_with = "de::opt_datetime")]
    pub next_billing_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::opt_datetime")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(
        default,
        alias = "razorpay_subscription_id",
        alias = "razorpaySubscriptionId",
        alias = "order_id"
    )]
    pub provider_subscription_id: Option<String>,
}

impl Subscription {
    /// Default for callers without a subscription record.
    pub fn free() -> Self {
        Subscription::default()
    }

    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }

    /// Next charge date, falling back to the period end.
    pub fn renews_on(&self) -> Option<DateTime<Utc>> {
        self.next_billing_date.or(self.end_date)
    }

    /// Local state after a successful cancellation.
    pub fn cancel_locally(&mut self) {
        self.tier = Tier::Free;
        self.status = SubscriptionStatus::Cancelled;
        self.provider_subscription_id = None;
    }
}
