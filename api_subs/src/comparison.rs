//! Plan catalog presentation: feature lines, prices and the action offered
//! on each plan card.

use common::misc::{capitalize, format_thousands};
use models::models::plan::Plan;
use models::models::subscription::BillingCycle;
use models::models::user::{Tier, User};

/// One line of a plan card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureLine {
    pub label: String,
    pub included: bool,
}

impl FeatureLine {
    fn new(label: impl Into<String>, included: bool) -> Self {
        FeatureLine {
            label: label.into(),
            included,
        }
    }
}

/// What a plan card lets the caller do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanAction {
    /// Anonymous caller; sign in first.
    SignIn,
    CurrentPlan,
    Subscribe,
    DowngradeToFree,
}

pub fn plan_features(plan: &Plan) -> Vec<FeatureLine> {
    vec![
        FeatureLine::new(format!("{} forms", plan.form_limit), true),
        FeatureLine::new(
            format!(
                "{} submissions/month",
                format_thousands(plan.submission_limit_monthly)
            ),
            true,
        ),
        FeatureLine::new("Custom redirect URLs", plan.features.custom_redirect),
        FeatureLine::new("File uploads", plan.features.file_uploads),
        FeatureLine::new("Priority support", plan.features.priority_support),
        FeatureLine::new("No EasyForms branding", plan.name.is_paid()),
        FeatureLine::new("Dedicated account manager", plan.name == Tier::Enterprise),
    ]
}

/// Price with its unit, e.g. `$19.00/month`.
pub fn plan_price(plan: &Plan, cycle: BillingCycle) -> String {
    format!("{}/{}", format_currency(plan.price(cycle), "USD"), cycle.unit())
}

pub fn plan_title(plan: &Plan) -> String {
    capitalize(plan.name.as_str())
}

pub fn plan_description(tier: Tier) -> &'static str {
    match tier {
        Tier::Free => "Perfect for individuals just getting started with form collection",
        Tier::Pro => "Ideal for professionals who need more forms and advanced features",
        Tier::Enterprise => "For businesses with high volume needs and premium support",
    }
}

pub fn plan_action(plan: &Plan, user: Option<&User>) -> PlanAction {
    let Some(user) = user else {
        return PlanAction::SignIn;
    };
    if plan.name == user.subscription_tier {
        PlanAction::CurrentPlan
    } else if plan.name == Tier::Free {
        PlanAction::DowngradeToFree
    } else {
        PlanAction::Subscribe
    }
}

/// Formats an amount in major units: `1234.5, "USD"` becomes `$1,234.50`.
/// Unknown currencies are prefixed with their code.
pub fn format_currency(amount: f64, currency: &str) -> String {
    let code = currency.trim().to_uppercase();
    let symbol = match code.as_str() {
        "USD" => "$",
        "INR" => "₹",
        "EUR" => "€",
        "GBP" => "£",
        _ => "",
    };

    let cents = (amount.abs() * 100.0).round() as u64;
    let body = format!("{}.{:02}", format_thousands(cents / 100), cents % 100);
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };

    if symbol.is_empty() {
        format!("{}{} {}", sign, code, body)
    } else {
        format!("{}{}{}", sign, symbol, body)
    }
}
