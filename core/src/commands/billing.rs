use anyhow::bail;
use api_subs::misc::pay::CardDetails;
use api_subs::services::{pay, sub};
use api_subs::{CheckoutOrchestrator, Settlement};
use colored::Colorize;
use models::models::plan::Plan;
use models::models::subscription::BillingCycle;
use models::models::user::Tier;

use super::{Context, id};
use crate::cli::PaymentMethodsCommand;
use crate::render;
use crate::widget::TerminalWidget;

pub async fn plans(ctx: &mut Context, cycle: BillingCycle) -> anyhow::Result<()> {
    let res = sub::fetch_plans(ctx.session.api()).await;
    let plans = ctx.guard(res)?;
    render::plans(&plans, cycle, ctx.session.user());
    Ok(())
}

pub async fn subscription(ctx: &mut Context) -> anyhow::Result<()> {
    ctx.session.require_user()?;
    let res = sub::fetch_subscription(ctx.session.api()).await;
    let current = ctx.guard(res)?;
    let res = sub::fetch_plans(ctx.session.api()).await;
    let plans = ctx.guard(res)?;

    let plan = plans.iter().find(|p| p.name == current.tier);
    render::subscription(&current, plan);
    Ok(())
}

/// Subscribes to a paid plan: charges a saved card when one is given,
/// otherwise runs the hosted checkout.
pub async fn subscribe(
    ctx: &mut Context,
    plan_arg: &str,
    cycle: BillingCycle,
    payment_method: Option<&str>,
) -> anyhow::Result<()> {
    let current_tier = ctx.session.require_user()?.subscription_tier;
    let res = sub::fetch_plans(ctx.session.api()).await;
    let plans = ctx.guard(res)?;

    let Some(plan) = find_plan(&plans, plan_arg) else {
        bail!("Unknown plan: {}", plan_arg);
    };
    if plan.name == Tier::Free {
        bail!("Use `easyforms downgrade` to move to the free plan");
    }
    if plan.name == current_tier {
        println!("You are already on the {} plan.", plan.name);
        return Ok(());
    }

    if let Some(method_id) = payment_method {
        let subscription =
            sub::subscribe_to_plan(&mut ctx.session, plan.id.clone(), cycle, Some(id(method_id)))
                .await?;
        println!(
            "{} Subscribed to {} ({})",
            "✓".green(),
            subscription.tier,
            cycle
        );
        return Ok(());
    }

    let mut checkout = CheckoutOrchestrator::from_config(&ctx.config);
    match checkout
        .run(&mut ctx.session, plan, cycle, &TerminalWidget)
        .await?
    {
        Settlement::Success => {
            println!(
                "{} Payment successful! Your subscription is now active.",
                "✓".green()
            );
            if let Some(user) = ctx.session.user() {
                render::user(user);
            }
            Ok(())
        }
        Settlement::Failure(reason) => bail!("{}", reason),
    }
}

pub async fn cancel(ctx: &mut Context) -> anyhow::Result<()> {
    ctx.session.require_user()?;
    let confirmed = ctx.confirm(
        "Are you sure you want to cancel your subscription? This action cannot be undone.",
    );
    if sub::cancel_subscription(&mut ctx.session, confirmed).await? {
        println!("{} Subscription cancelled", "✓".green());
    }
    Ok(())
}

pub async fn downgrade(ctx: &mut Context) -> anyhow::Result<()> {
    ctx.session.require_user()?;
    let confirmed = ctx.confirm("Downgrade to the free plan? Paid features stop immediately.");
    if sub::downgrade_to_free(&mut ctx.session, confirmed).await? {
        println!("{} You are now on the free plan", "✓".green());
    }
    Ok(())
}

pub async fn payments(ctx: &mut Context) -> anyhow::Result<()> {
    ctx.session.require_user()?;
    let res = pay::list_payments(ctx.session.api()).await;
    render::payments(&ctx.guard(res)?);
    Ok(())
}

pub async fn payment_methods(ctx: &mut Context, cmd: PaymentMethodsCommand) -> anyhow::Result<()> {
    ctx.session.require_user()?;

    match cmd {
        PaymentMethodsCommand::List => {
            let res = pay::list_payment_methods(ctx.session.api()).await;
            render::payment_methods(&ctx.guard(res)?);
        }
        PaymentMethodsCommand::Add {
            number,
            holder,
            month,
            year,
            cvv,
            default,
        } => {
            let card = CardDetails {
                number,
                holder,
                expiry_month: month,
                expiry_year: year,
                cvv,
                is_default: default,
            };
            let today = chrono::Utc::now().date_naive();
            let res = pay::add_payment_method(ctx.session.api(), card, today).await;
            let saved = ctx.guard(res)?;
            println!("{} Card ending {} saved", "✓".green(), saved.last4);
        }
        PaymentMethodsCommand::Delete { id: raw } => {
            let confirmed = ctx.confirm("Remove this payment method?");
            let res = pay::delete_payment_method(ctx.session.api(), &id(&raw), confirmed).await;
            if ctx.guard(res)? {
                println!("{} Payment method removed", "✓".green());
            }
        }
        PaymentMethodsCommand::Default { id: raw } => {
            let res = pay::set_default_payment_method(ctx.session.api(), &id(&raw)).await;
            ctx.guard(res)?;
            println!("{} Default payment method updated", "✓".green());
        }
    }
    Ok(())
}

/// Matches a plan by tier name first, then by id.
fn find_plan<'a>(plans: &'a [Plan], arg: &str) -> Option<&'a Plan> {
    match arg.parse::<Tier>() {
        Ok(tier) => plans.iter().find(|p| p.name == tier),
        Err(_) => plans.iter().find(|p| p.id == id(arg)),
    }
}
