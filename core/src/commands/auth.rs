use colored::Colorize;

use super::Context;
use crate::prompt::ask;
use crate::render;

pub async fn login(ctx: &mut Context, email: &str, password: Option<String>) -> anyhow::Result<()> {
    let password = match password {
        Some(password) => password,
        None => ask("Password")?,
    };
    let user = ctx.session.login(email, &password).await?;
    println!("{} Signed in as {}", "✓".green(), user.email);
    Ok(())
}

pub async fn register(
    ctx: &mut Context,
    name: &str,
    email: &str,
    password: Option<String>,
    confirm_password: Option<String>,
) -> anyhow::Result<()> {
    let password = match password {
        Some(password) => password,
        None => ask("Password")?,
    };
    let confirm_password = match confirm_password {
        Some(confirm) => confirm,
        None => ask("Confirm password")?,
    };
    let user = ctx
        .session
        .register(name, email, &password, &confirm_password)
        .await?;
    println!("{} Account created for {}", "✓".green(), user.email);
    Ok(())
}

pub fn logout(ctx: &mut Context) -> anyhow::Result<()> {
    ctx.session.logout();
    println!("Signed out.");
    Ok(())
}

pub fn whoami(ctx: &mut Context) -> anyhow::Result<()> {
    render::user(ctx.session.require_user()?);
    Ok(())
}

pub async fn profile(ctx: &mut Context, name: &str, email: &str) -> anyhow::Result<()> {
    let user = ctx.session.update_profile(name, email).await?;
    println!("{} Profile updated", "✓".green());
    render::user(user);
    Ok(())
}
