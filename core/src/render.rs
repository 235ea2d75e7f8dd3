//! Terminal output.

use api_forms::SubmissionBrowser;
use api_subs::comparison::{
    PlanAction, format_currency, plan_action, plan_description, plan_features, plan_price,
    plan_title,
};
use api_subs::{Entitlement, UsageLevel};
use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use common::misc::capitalize;
use models::models::form::Form;
use models::models::payment::{Payment, PaymentMethod};
use models::models::plan::Plan;
use models::models::submission::{Submission, SubmissionData};
use models::models::subscription::{BillingCycle, Subscription};
use models::models::user::User;

pub fn date(at: Option<DateTime<Utc>>) -> String {
    at.map(|at| at.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn usage(label: &str, used: u64, limit: u64, percentage: u64, level: UsageLevel) {
    let pct = format!("{:>3}%", percentage);
    let pct = match level {
        UsageLevel::Danger => pct.red().bold(),
        UsageLevel::Warning => pct.yellow(),
        UsageLevel::Success => pct.green(),
    };
    println!("  {:<22} {} {} / {}", label, pct, used, limit);
}

pub fn user(user: &User) {
    println!("{} <{}>", user.name.bold(), user.email);
    println!(
        "  Plan: {} ({})",
        capitalize(user.subscription_tier.as_str()),
        user.subscription_status
    );
}

pub fn entitlement(e: &Entitlement) {
    println!("{} plan", capitalize(e.tier.as_str()).bold());
    usage(
        "Forms",
        e.forms_used,
        e.form_limit,
        e.form_usage_percentage(),
        e.form_usage_level(),
    );
    usage(
        "Submissions this month",
        e.submissions_used,
        e.submission_limit_monthly,
        e.submission_usage_percentage(),
        e.submission_usage_level(),
    );
    let features = [
        ("Custom redirect", e.features.custom_redirect),
        ("File uploads", e.features.file_uploads),
        ("Priority support", e.features.priority_support),
    ];
    let line: Vec<String> = features
        .iter()
        .map(|(label, on)| {
            let mark = if *on { "✓".green() } else { "✗".dimmed() };
            format!("{} {}", mark, label)
        })
        .collect();
    println!("  {}", line.join("   "));
    if !e.can_create_form() {
        println!("  {}", "Form limit reached. Upgrade to create more forms.".yellow());
    }
}

pub fn forms(forms: &[Form]) {
    if forms.is_empty() {
        println!("No forms yet. Create one with `easyforms forms create --name <name>`.");
        return;
    }
    println!(
        "{:<8} {:<28} {:<20} {:>11}  {}",
        "ID".bold(),
        "NAME".bold(),
        "ENDPOINT".bold(),
        "SUBMISSIONS".bold(),
        "CREATED".bold()
    );
    for form in forms {
        println!(
            "{:<8} {:<28} {:<20} {:>11}  {}",
            form.id.to_string(),
            form.display_name(),
            form.endpoint_id,
            form.submission_count,
            date(form.created_at)
        );
    }
}

pub fn form(form: &Form, public_url: &str) {
    println!("{}", form.display_name().bold());
    println!("  ID:                  {}", form.id);
    println!("  Endpoint:            {}", public_url);
    println!(
        "  Redirect URL:        {}",
        form.redirect_url.as_deref().unwrap_or("-")
    );
    println!("  Email notifications: {}", on_off(form.email_notifications));
    println!("  Spam protection:     {}", on_off(form.spam_protection));
    println!("  Submissions:         {}", form.submission_count);
    println!("  Created:             {}", date(form.created_at));
}

fn on_off(flag: bool) -> ColoredString {
    if flag { "on".green() } else { "off".dimmed() }
}

pub fn submissions(browser: &SubmissionBrowser) {
    let rows = browser.submissions();
    if rows.is_empty() {
        println!("No submissions.");
    }
    for s in rows {
        println!(
            "{:<8} {:<14} {}",
            s.id.to_string().bold(),
            date(s.created_at),
            preview(&s.data)
        );
    }
    let total = browser
        .total_submissions()
        .map(|t| format!(", {} total", t))
        .unwrap_or_default();
    println!(
        "{}",
        format!("Page {} of {}{}", browser.page(), browser.total_pages(), total).dimmed()
    );
}

/// First few fields of a submission on one line.
pub fn preview(data: &SubmissionData) -> String {
    let mut parts: Vec<String> = data
        .iter()
        .take(3)
        .map(|(k, v)| format!("{}={}", k, SubmissionData::display_value(v)))
        .collect();
    if data.field_count() > 3 {
        parts.push(format!("(+{} more)", data.field_count() - 3));
    }
    parts.join("  ")
}

pub fn submission(s: &Submission) {
    println!("{} {}", "Submission".bold(), s.id);
    println!("  Received: {}", date(s.created_at));
    for (key, value) in s.data.iter() {
        println!("  {:<16} {}", format!("{}:", key), SubmissionData::display_value(value));
    }
    if let Some(ip) = &s.ip_address {
        println!("  {:<16} {}", "IP address:", ip);
    }
    if let Some(agent) = &s.user_agent {
        println!("  {:<16} {}", "User agent:", agent);
    }
    if let Some(referrer) = &s.referrer {
        println!("  {:<16} {}", "Referrer:", referrer);
    }
}

pub fn plans(plans: &[Plan], cycle: BillingCycle, user: Option<&User>) {
    for plan in plans {
        println!(
            "{}  {}",
            plan_title(plan).bold(),
            plan_price(plan, cycle).cyan()
        );
        println!("  {}", plan_description(plan.name).dimmed());
        for line in plan_features(plan) {
            let mark = if line.included { "✓".green() } else { "✗".red() };
            println!("  {} {}", mark, line.label);
        }
        let action = match plan_action(plan, user) {
            PlanAction::CurrentPlan => "Current Plan".green().bold(),
            PlanAction::Subscribe => format!("easyforms subscribe {}", plan.name).normal(),
            PlanAction::DowngradeToFree => "easyforms downgrade".normal(),
            PlanAction::SignIn => "Sign in to subscribe".dimmed(),
        };
        println!("  {}", action);
        println!();
    }
}

pub fn subscription(sub: &Subscription, plan: Option<&Plan>) {
    println!("{} plan", capitalize(sub.tier.as_str()).bold());
    println!("  Status:        {}", sub.status);
    if let Some(cycle) = sub.billing_cycle {
        println!("  Billing cycle: {}", capitalize(cycle.as_str()));
        if let Some(plan) = plan {
            println!(
                "  Price:         {} / {}",
                format_currency(plan.price(cycle), "USD"),
                cycle.unit()
            );
        }
    }
    if sub.renews_on().is_some() {
        println!("  Next billing:  {}", date(sub.renews_on()));
    }
}

pub fn payments(payments: &[Payment]) {
    if payments.is_empty() {
        println!("No payments yet.");
        return;
    }
    for p in payments {
        let status = capitalize(p.status());
        let status = if p.is_completed() {
            status.green()
        } else {
            status.yellow()
        };
        println!(
            "{:<14} {:>12}  {:<10} {}",
            date(p.created_at),
            format_currency(p.amount, p.currency()),
            status,
            p.description.as_deref().unwrap_or("")
        );
    }
}

pub fn payment_methods(methods: &[PaymentMethod]) {
    if methods.is_empty() {
        println!("No saved payment methods.");
        return;
    }
    for m in methods {
        let default = if m.is_default { " (default)".green() } else { "".normal() };
        println!(
            "{:<6} {:<11} •••• {}  exp {}{}",
            m.id.to_string(),
            capitalize(&m.card_type),
            m.last4,
            m.expiry(),
            default
        );
    }
}
