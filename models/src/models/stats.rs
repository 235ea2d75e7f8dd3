use serde::{Deserialize, Serialize};

use crate::de;
use crate::models::user::Tier;

/// Dashboard usage summary as computed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOverview {
    #[serde(default, deserialize_with = "de::u64_lenient")]
    pub total_forms: u64,
    #[serde(default, deserialize_with = "de::u64_lenient")]
    pub total_submissions: u64,
    #[serde(default, deserialize_with = "de::u64_lenient")]
    pub current_month_submissions: u64,
    #[serde(default, deserialize_with = "de::null_default")]
    pub subscription_tier: Tier,
    #[serde(default = "default_form_limit", deserialize_with = "de::u64_lenient")]
    pub form_limit: u64,
    #[serde(
        default = "default_submission_limit",
        deserialize_with = "de::u64_lenient"
    )]
    pub submission_limit_monthly: u64,
    #[serde(default, deserialize_with = "de::u64_lenient")]
    pub form_usage_percentage: u64,
    #[serde(default, deserialize_with = "de::u64_lenient")]
    pub submission_usage_percentage: u64,
}

fn default_form_limit() -> u64 {
    3
}

fn default_submission_limit() -> u64 {
    100
}

impl Default for StatsOverview {
    fn default() -> Self {
        StatsOverview {
            total_forms: 0,
            total_submissions: 0,
            current_month_submissions: 0,
            subscription_tier: Tier::Free,
            form_limit: default_form_limit(),
            submission_limit_monthly: default_submission_limit(),
            form_usage_percentage: 0,
            submission_usage_percentage: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub overview: StatsOverview,
}
