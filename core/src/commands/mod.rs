use std::sync::Arc;

use api_auth::Session;
use common::env_config::Config;
use common::error::Res;
use models::Id;

use crate::cli::Command;

mod auth;
mod billing;
mod forms;
mod submissions;

pub struct Context {
    pub config: Arc<Config>,
    pub session: Session,
    pub assume_yes: bool,
}

impl Context {
    /// Passes `res` through the session so an expired token signs out.
    pub fn guard<T>(&mut self, res: Res<T>) -> Res<T> {
        self.session.guard(res)
    }

    pub fn confirm(&self, question: &str) -> bool {
        crate::prompt::confirm(question, self.assume_yes)
    }
}

pub async fn run(ctx: &mut Context, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { email, password } => auth::login(ctx, &email, password).await,
        Command::Register {
            name,
            email,
            password,
            confirm_password,
        } => auth::register(ctx, &name, &email, password, confirm_password).await,
        Command::Logout => auth::logout(ctx),
        Command::Whoami => auth::whoami(ctx),
        Command::Profile { name, email } => auth::profile(ctx, &name, &email).await,
        Command::Dashboard => forms::dashboard(ctx).await,
        Command::Forms(cmd) => forms::run(ctx, cmd).await,
        Command::Submissions(cmd) => submissions::run(ctx, cmd).await,
        Command::Plans { cycle } => billing::plans(ctx, cycle.into()).await,
        Command::Subscription => billing::subscription(ctx).await,
        Command::Subscribe {
            plan,
            cycle,
            payment_method,
        } => billing::subscribe(ctx, &plan, cycle.into(), payment_method.as_deref()).await,
        Command::Cancel => billing::cancel(ctx).await,
        Command::Downgrade => billing::downgrade(ctx).await,
        Command::Payments => billing::payments(ctx).await,
        Command::PaymentMethods(cmd) => billing::payment_methods(ctx, cmd).await,
    }
}

fn id(raw: &str) -> Id {
    Id::parse(raw)
}
