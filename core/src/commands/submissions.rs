use api_forms::SubmissionBrowser;
use api_forms::services::{form, submission};
use colored::Colorize;
use common::error::AppError;
use models::dtos::submission::SubmissionFilters;

use super::{Context, id};
use crate::cli::{FilterArgs, PageArgs, SubmissionsCommand};
use crate::render;

impl From<FilterArgs> for SubmissionFilters {
    fn from(args: FilterArgs) -> Self {
        SubmissionFilters {
            date_from: args.from,
            date_to: args.to,
            search: args.search,
            sort_by: args.sort_by,
            sort_order: args.order,
        }
    }
}

pub async fn run(ctx: &mut Context, cmd: SubmissionsCommand) -> anyhow::Result<()> {
    ctx.session.require_user()?;

    match cmd {
        SubmissionsCommand::List { form_id, page } => {
            let browser = open(ctx, &form_id, page).await?;
            render::submissions(&browser);
        }
        SubmissionsCommand::Show {
            form_id,
            submission_id,
            page,
        } => {
            let browser = open(ctx, &form_id, page).await?;
            let sid = id(&submission_id);
            let found = browser.get_submission(&sid).ok_or_else(|| {
                AppError::NotFound(format!(
                    "Submission {} is not on page {}",
                    sid,
                    browser.page()
                ))
            })?;
            render::submission(found);
        }
        SubmissionsCommand::Delete {
            form_id,
            submission_id,
            page,
        } => {
            let mut browser = open(ctx, &form_id, page).await?;
            let res = browser
                .delete(ctx.session.api(), &id(&submission_id), || {
                    ctx.confirm("Are you sure you want to delete this submission?")
                })
                .await;
            if ctx.guard(res)? {
                println!("{} Submission deleted", "✓".green());
                render::submissions(&browser);
            }
        }
        SubmissionsCommand::Export {
            form_id,
            output,
            filters,
        } => {
            let form_id = id(&form_id);
            let res = form::get_form(ctx.session.api(), &form_id).await;
            let form = ctx.guard(res)?;
            let res = submission::export_csv(ctx.session.api(), &form_id, &filters.into()).await;
            let bytes = ctx.guard(res)?;

            let path = output.unwrap_or_else(|| submission::export_file_name(&form));
            std::fs::write(&path, &bytes).map_err(AppError::from)?;
            println!("{} Exported {} bytes to {}", "✓".green(), bytes.len(), path);
        }
    }
    Ok(())
}

/// Loads the requested page. An unknown form shows the forms listing
/// before failing with not found.
async fn open(ctx: &mut Context, form_id: &str, args: PageArgs) -> anyhow::Result<SubmissionBrowser> {
    let form_id = id(form_id);
    let res = form::get_form(ctx.session.api(), &form_id).await;
    let form = match ctx.guard(res) {
        Ok(form) => form,
        Err(AppError::NotFound(msg)) => {
            let res = form::list_forms(ctx.session.api()).await;
            render::forms(&ctx.guard(res)?);
            println!();
            return Err(AppError::NotFound(msg).into());
        }
        Err(err) => return Err(err.into()),
    };
    println!("{}", form.display_name().bold());

    let per_page = args
        .per_page
        .unwrap_or(ctx.config.submissions_per_page)
        .max(1);
    let mut browser = SubmissionBrowser::new(form_id, per_page).with_filters(args.filters.into());
    let res = browser.goto(ctx.session.api(), args.page).await;
    ctx.guard(res)?;
    Ok(browser)
}
