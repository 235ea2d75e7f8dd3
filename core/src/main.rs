mod cli;
mod commands;
mod prompt;
mod render;
mod widget;

use std::process::ExitCode;
use std::sync::Arc;

use api_auth::{FileTokenStore, Session};
use clap::Parser;
use colored::Colorize;
use common::env_config::Config;
use common::error::AppError;
use common::http::ApiClient;
use log::debug;

use cli::Cli;
use commands::Context;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match start(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

async fn start(cli: Cli) -> anyhow::Result<()> {
    // get env vars
    let mut config = Config::clone(&*Config::from_env()?);
    if let Some(api_url) = &cli.api_url {
        config.api_url = url::Url::parse(api_url).map_err(AppError::from)?;
    }
    let config = Arc::new(config);

    // init logger
    if config.console_logging_enabled {
        logger::setup(logger::parse_level(&config.log_level), &config.log_file)?;
    }
    debug!("Using backend {}", config.api_url);

    // restore the previous session, if any
    let api = ApiClient::from_config(&config);
    let store = FileTokenStore::new(config.token_file.clone());
    let session = Session::init(api, store).await;

    let mut ctx = Context {
        config,
        session,
        assume_yes: cli.yes,
    };
    commands::run(&mut ctx, cli.command).await
}

/// Prints a failure the way the user should see it.
fn report(err: &anyhow::Error) {
    let Some(app_err) = err.downcast_ref::<AppError>() else {
        eprintln!("{} {}", "error:".red().bold(), err);
        return;
    };

    eprintln!("{} {}", "error:".red().bold(), app_err.user_message());
    match app_err {
        AppError::LimitReached(_) => {
            eprintln!("Run `easyforms plans` to compare plans and upgrade.");
        }
        AppError::Validation { fields, .. } => {
            for (field, message) in fields {
                eprintln!("  {}: {}", field.yellow(), message);
            }
        }
        AppError::Unauthorized(_) => {
            eprintln!("Please log in: `easyforms login --email <EMAIL>`");
        }
        _ => {}
    }
}
