//! Usage derived from a plan and the caller's current counts.
//!
//! Everything here is a pure function. The color thresholds are a display
//! contract: above 90% is danger, above 70% is warning, anything else is
//! normal. Boundaries are exclusive, so exactly 90% is still a warning.

use models::models::plan::{Plan, PlanFeatures};
use models::models::stats::StatsOverview;
use models::models::user::Tier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageLevel {
    Success,
    Warning,
    Danger,
}

impl UsageLevel {
    pub fn for_percentage(percentage: u64) -> Self {
        if percentage > 90 {
            UsageLevel::Danger
        } else if percentage > 70 {
            UsageLevel::Warning
        } else {
            UsageLevel::Success
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UsageLevel::Success => "success",
            UsageLevel::Warning => "warning",
            UsageLevel::Danger => "danger",
        }
    }
}

/// `min(100, round(used / limit * 100))`.
///
/// A zero limit means nothing is allowed: any use is reported as 100%.
pub fn usage_percentage(used: u64, limit: u64) -> u64 {
    if limit == 0 {
        return if used > 0 { 100 } else { 0 };
    }
    let pct = (used as f64 / limit as f64 * 100.0).round() as u64;
    pct.min(100)
}

/// What the caller's plan allows and how much of it is used.
#[derive(Debug, Clone, PartialEq)]
pub struct Entitlement {
    pub tier: Tier,
    pub form_limit: u64,
    pub submission_limit_monthly: u64,
    pub forms_used: u64,
    pub submissions_used: u64,
    pub features: PlanFeatures,
}

impl Entitlement {
    pub fn new(plan: &Plan, forms_used: u64, submissions_used: u64) -> Self {
        Entitlement {
            tier: plan.name,
            form_limit: plan.form_limit,
            submission_limit_monthly: plan.submission_limit_monthly,
            forms_used,
            submissions_used,
            features: plan.features,
        }
    }

    /// Built from the dashboard summary when the plan record is not at hand.
    pub fn from_overview(overview: &StatsOverview) -> Self {
        Entitlement {
            tier: overview.subscription_tier,
            form_limit: overview.form_limit,
            submission_limit_monthly: overview.submission_limit_monthly,
            forms_used: overview.total_forms,
            submissions_used: overview.current_month_submissions,
            features: PlanFeatures::default(),
        }
    }

    pub fn form_usage_percentage(&self) -> u64 {
        usage_percentage(self.forms_used, self.form_limit)
    }

    pub fn submission_usage_percentage(&self) -> u64 {
        usage_percentage(self.submissions_used, self.submission_limit_monthly)
    }

    pub fn form_usage_level(&self) -> UsageLevel {
        UsageLevel::for_percentage(self.form_usage_percentage())
    }

    pub fn submission_usage_level(&self) -> UsageLevel {
        UsageLevel::for_percentage(self.submission_usage_percentage())
    }

    pub fn can_create_form(&self) -> bool {
        self.forms_used < self.form_limit
    }

    pub fn forms_remaining(&self) -> u64 {
        self.form_limit.saturating_sub(self.forms_used)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::Id;

    fn plan(form_limit: u64, submission_limit: u64) -> Plan {
        Plan {
            id: Id::from("pro"),
            name: Tier::Pro,
            monthly_price: 19.0,
            yearly_price: 190.0,
            form_limit,
            submission_limit_monthly: submission_limit,
            features: PlanFeatures {
                custom_redirect: true,
                file_uploads: true,
                priority_support: false,
            },
        }
    }

    #[test]
    fn percentage_rounds_and_caps() {
        assert_eq!(usage_percentage(1, 3), 33);
        assert_eq!(usage_percentage(2, 3), 67);
        assert_eq!(usage_percentage(5, 3), 100);
        assert_eq!(usage_percentage(0, 0), 0);
        assert_eq!(usage_percentage(1, 0), 100);
    }

    #[test]
    fn thresholds_are_exclusive() {
        assert_eq!(UsageLevel::for_percentage(70), UsageLevel::Success);
        assert_eq!(UsageLevel::for_percentage(71), UsageLevel::Warning);
        assert_eq!(UsageLevel::for_percentage(90), UsageLevel::Warning);
        assert_eq!(UsageLevel::for_percentage(91), UsageLevel::Danger);
        assert_eq!(UsageLevel::for_percentage(100), UsageLevel::Danger);
    }

    #[test]
    fn entitlement_from_plan() {
        let e = Entitlement::new(&plan(10, 1000), 9, 950);
        assert_eq!(e.form_usage_percentage(), 90);
        assert_eq!(e.form_usage_level(), UsageLevel::Warning);
        assert_eq!(e.submission_usage_level(), UsageLevel::Danger);
        assert!(e.can_create_form());
        assert_eq!(e.forms_remaining(), 1);
        assert!(e.features.file_uploads);
    }

    #[test]
    fn limit_reached_blocks_creation() {
        let e = Entitlement::from_overview(&StatsOverview {
            total_forms: 3,
            ..Default::default()
        });
        assert_eq!(e.form_limit, 3);
        assert!(!e.can_create_form());
        assert_eq!(e.form_usage_level(), UsageLevel::Danger);
    }
}
