use api_forms::Dashboard;
use api_forms::misc::embed::{form_url, html_snippet};
use api_forms::services::form;
use colored::Colorize;
use models::dtos::form::{CreateFormRequest, UpdateFormRequest};

use super::{Context, id};
use crate::cli::FormsCommand;
use crate::render;

pub async fn dashboard(ctx: &mut Context) -> anyhow::Result<()> {
    ctx.session.require_user()?;
    let res = Dashboard::load(ctx.session.api()).await;
    let dashboard = ctx.guard(res)?;

    render::entitlement(&dashboard.entitlement());
    println!();
    render::forms(&dashboard.forms);
    Ok(())
}

pub async fn run(ctx: &mut Context, cmd: FormsCommand) -> anyhow::Result<()> {
    ctx.session.require_user()?;

    match cmd {
        FormsCommand::List => {
            let res = form::list_forms(ctx.session.api()).await;
            render::forms(&ctx.guard(res)?);
        }
        FormsCommand::Show { id: raw } => {
            let res = form::get_form(ctx.session.api(), &id(&raw)).await;
            let form = ctx.guard(res)?;
            render::form(&form, &form_url(ctx.session.api().base_str(), &form.endpoint_id));
        }
        FormsCommand::Create(args) => {
            let req = CreateFormRequest {
                name: args.name,
                redirect_url: args.redirect_url,
                email_notifications: !args.no_email_notifications,
                spam_protection: !args.no_spam_protection,
            };
            let res = form::create_form(ctx.session.api(), &req).await;
            let form = ctx.guard(res)?;
            let url = form_url(ctx.session.api().base_str(), &form.endpoint_id);
            println!("{} Form created", "✓".green());
            render::form(&form, &url);
            println!();
            println!("{}", html_snippet(&url));
        }
        FormsCommand::Update { id: raw, form: args } => {
            let form_id = id(&raw);
            let res = form::get_form(ctx.session.api(), &form_id).await;
            let current = ctx.guard(res)?;

            let mut req = UpdateFormRequest::from(&current);
            if let Some(name) = args.name {
                req.name = name;
            }
            if let Some(url) = args.redirect_url {
                req.redirect_url = Some(url);
            }
            if let Some(flag) = args.email_notifications {
                req.email_notifications = flag;
            }
            if let Some(flag) = args.spam_protection {
                req.spam_protection = flag;
            }

            let res = form::update_form(ctx.session.api(), &form_id, &req).await;
            let form = ctx.guard(res)?;
            println!("{} Form updated", "✓".green());
            render::form(&form, &form_url(ctx.session.api().base_str(), &form.endpoint_id));
        }
        FormsCommand::Delete { id: raw } => {
            let res = Dashboard::load(ctx.session.api()).await;
            let mut dashboard = ctx.guard(res)?;
            let res = dashboard
                .delete_form(ctx.session.api(), &id(&raw), || {
                    ctx.confirm("Are you sure you want to delete this form? All submissions will be lost.")
                })
                .await;
            if ctx.guard(res)? {
                println!("{} Form deleted", "✓".green());
                render::entitlement(&dashboard.entitlement());
            }
        }
        FormsCommand::Snippet { id: raw } => {
            let res = form::get_form(ctx.session.api(), &id(&raw)).await;
            let form = ctx.guard(res)?;
            let url = form_url(ctx.session.api().base_str(), &form.endpoint_id);
            println!("{}", url);
            println!();
            println!("{}", html_snippet(&url));
        }
    }
    Ok(())
}
