use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::de::{self, Id};
use crate::models::subscription::BillingCycle;
use crate::models::user::Tier;

/// Feature flags unlocked by a plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanFeatures {
    pub custom_redirect: bool,
    pub file_uploads: bool,
    pub priority_support: bool,
}

/// Catalog entry. Read-only from the client's point of view.
///
/// The backend has served two shapes over time: flags as top-level fields,
/// or nested under a `features` object (or a list of feature names). Both
/// decode to the same value; nested flags win when both are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPlan")]
pub struct Plan {
    pub id: Id,
    pub name: Tier,
    pub monthly_price: f64,
    pub yearly_price: f64,
    pub form_limit: u64,
    pub submission_limit_monthly: u64,
    pub features: PlanFeatures,
}

impl Plan {
    pub fn price(&self, cycle: BillingCycle) -> f64 {
        match cycle {
            BillingCycle::Monthly => self.monthly_price,
            BillingCycle::Yearly => self.yearly_price,
        }
    }
}

#[derive(Deserialize)]
struct RawPlan {
    #[serde(default)]
    id: Option<Id>,
    name: Tier,
    #[serde(default, deserialize_with = "de::f64_lenient")]
    monthly_price: f64,
    #[serde(default, deserialize_with = "de::f64_lenient")]
    yearly_price: f64,
    #[serde(default, deserialize_with = "de::u64_lenient")]
    form_limit: u64,
    #[serde(default, deserialize_with = "de::u64_lenient")]
    submission_limit_monthly: u64,
    #[serde(default, deserialize_with = "de::bool_or_int")]
    custom_redirect: bool,
    #[serde(default, deserialize_with = "de::bool_or_int")]
    file_uploads: bool,
    #[serde(default, deserialize_with = "de::bool_or_int")]
    priority_support: bool,
    #[serde(default)]
    features: Option<Value>,
}

impl From<RawPlan> for Plan {
    fn from(raw: RawPlan) -> Self {
        let mut features = PlanFeatures {
            custom_redirect: raw.custom_redirect,
            file_uploads: raw.file_uploads,
            priority_support: raw.priority_support,
        };

        match raw.features {
            Some(Value::Object(map)) => {
                let flag = |key: &str, current: bool| {
                    map.get(key).map(de::value_to_bool).unwrap_or(current)
                };
                features = PlanFeatures {
                    custom_redirect: flag("custom_redirect", features.custom_redirect),
                    file_uploads: flag("file_uploads", features.file_uploads),
                    priority_support: flag("priority_support", features.priority_support),
                };
            }
            Some(Value::Array(names)) => {
                let has = |key: &str| names.iter().any(|n| n.as_str() == Some(key));
                features.custom_redirect |= has("custom_redirect");
                features.file_uploads |= has("file_uploads");
                features.priority_support |= has("priority_support");
            }
            _ => {}
        }

        Plan {
            id: raw.id.unwrap_or_else(|| Id::Str(raw.name.to_string())),
            name: raw.name,
            monthly_price: raw.monthly_price,
            yearly_price: raw.yearly_price,
            form_limit: raw.form_limit,
            submission_limit_monthly: raw.submission_limit_monthly,
            features,
        }
    }
}
