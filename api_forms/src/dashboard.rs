use api_subs::entitlement::{Entitlement, usage_percentage};
use api_subs::services::sub;
use common::error::Res;
use common::http::ApiClient;
use log::warn;
use models::Id;
use models::models::form::Form;
use models::models::plan::Plan;
use models::models::stats::Stats;

use crate::services::{form, stats};

/// Forms plus the usage summary, loaded together.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    pub forms: Vec<Form>,
    pub stats: Stats,
    pub plans: Vec<Plan>,
}

impl Dashboard {
    /// Fetches forms, stats and the plan catalog concurrently.
    ///
    /// Forms and stats are required. Without the catalog the entitlement
    /// falls back to the limits in the stats summary.
    pub async fn load(api: &ApiClient) -> Res<Self> {
        let (forms, stats, plans) = futures::join!(
            form::list_forms(api),
            stats::fetch_stats(api),
            sub::fetch_plans(api)
        );
        let plans = plans.unwrap_or_else(|err| {
            warn!("Plan catalog unavailable: {}", err);
            Vec::new()
        });
        Ok(Dashboard {
            forms: forms?,
            stats: stats?,
            plans,
        })
    }

    /// The caller's plan, matched on the tier reported by the stats.
    pub fn plan(&self) -> Option<&Plan> {
        let tier = self.stats.overview.subscription_tier;
        self.plans.iter().find(|p| p.name == tier)
    }

    pub fn entitlement(&self) -> Entitlement {
        let overview = &self.stats.overview;
        match self.plan() {
            Some(plan) => Entitlement::new(
                plan,
                overview.total_forms,
                overview.current_month_submissions,
            ),
            None => Entitlement::from_overview(overview),
        }
    }

    /// Deletes a form after `confirm` approves and patches the local
    /// counts instead of reloading the stats.
    pub async fn delete_form(
        &mut self,
        api: &ApiClient,
        id: &Id,
        confirm: impl FnOnce() -> bool,
    ) -> Res<bool> {
        if !form::delete_form(api, id, confirm).await? {
            return Ok(false);
        }
        self.forms.retain(|f| &f.id != id);

        let overview = &mut self.stats.overview;
        overview.total_forms = overview.total_forms.saturating_sub(1);
        overview.form_usage_percentage = usage_percentage(overview.total_forms, overview.form_limit);
        Ok(true)
    }
}
