use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use models::dtos::submission::SortOrder;
use models::models::subscription::BillingCycle;

#[derive(Parser, Debug)]
#[command(name = "easyforms", author, version, about = "Manage EasyForms form backends", long_about = None)]
pub struct Cli {
    /// Backend base URL, overriding API_URL.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Answer yes to every confirmation prompt.
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and remember the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "EASYFORMS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Create an account.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "EASYFORMS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        #[arg(long)]
        confirm_password: Option<String>,
    },
    /// Forget the stored session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Update name and email.
    Profile {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Forms and plan usage.
    Dashboard,
    #[command(subcommand)]
    Forms(FormsCommand),
    #[command(subcommand)]
    Submissions(SubmissionsCommand),
    /// Compare plans.
    Plans {
        #[arg(long, value_enum, default_value_t = CycleArg::Monthly)]
        cycle: CycleArg,
    },
    /// Show the current subscription.
    Subscription,
    /// Subscribe to a paid plan.
    Subscribe {
        /// Plan tier (`pro`, `enterprise`) or plan id.
        plan: String,
        #[arg(long, value_enum, default_value_t = CycleArg::Monthly)]
        cycle: CycleArg,
        /// Charge a saved payment method instead of opening checkout.
        #[arg(long)]
        payment_method: Option<String>,
    },
    /// Cancel the paid subscription.
    Cancel,
    /// Move back to the free plan.
    Downgrade,
    /// Payment history.
    Payments,
    #[command(subcommand)]
    PaymentMethods(PaymentMethodsCommand),
}

#[derive(Subcommand, Debug)]
pub enum FormsCommand {
    List,
    Show { id: String },
    Create(FormArgs),
    Update {
        id: String,
        #[command(flatten)]
        form: FormUpdateArgs,
    },
    Delete { id: String },
    /// Print the public URL and an HTML snippet.
    Snippet { id: String },
}

#[derive(Args, Debug)]
pub struct FormArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub redirect_url: Option<String>,
    #[arg(long)]
    pub no_email_notifications: bool,
    #[arg(long)]
    pub no_spam_protection: bool,
}

#[derive(Args, Debug)]
pub struct FormUpdateArgs {
    #[arg(long)]
    pub name: Option<String>,
    /// Empty string removes the redirect.
    #[arg(long)]
    pub redirect_url: Option<String>,
    #[arg(long)]
    pub email_notifications: Option<bool>,
    #[arg(long)]
    pub spam_protection: Option<bool>,
}

#[derive(Subcommand, Debug)]
pub enum SubmissionsCommand {
    List {
        form_id: String,
        #[command(flatten)]
        page: PageArgs,
    },
    Show {
        form_id: String,
        submission_id: String,
        #[command(flatten)]
        page: PageArgs,
    },
    Delete {
        form_id: String,
        submission_id: String,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Download the CSV export.
    Export {
        form_id: String,
        /// Defaults to `<form name>-submissions.csv`.
        #[arg(short, long)]
        output: Option<String>,
        #[command(flatten)]
        filters: FilterArgs,
    },
}

#[derive(Args, Debug)]
pub struct PageArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long)]
    pub per_page: Option<u32>,
    #[command(flatten)]
    pub filters: FilterArgs,
}

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// YYYY-MM-DD
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub to: Option<NaiveDate>,
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub sort_by: Option<String>,
    #[arg(long, default_value_t = SortOrder::Desc)]
    pub order: SortOrder,
}

#[derive(Subcommand, Debug)]
pub enum PaymentMethodsCommand {
    List,
    Add {
        #[arg(long)]
        number: String,
        #[arg(long)]
        holder: String,
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: u32,
        #[arg(long)]
        cvv: String,
        #[arg(long)]
        default: bool,
    },
    Delete { id: String },
    Default { id: String },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleArg {
    Monthly,
    Yearly,
}

impl From<CycleArg> for BillingCycle {
    fn from(cycle: CycleArg) -> Self {
        match cycle {
            CycleArg::Monthly => BillingCycle::Monthly,
            CycleArg::Yearly => BillingCycle::Yearly,
        }
    }
}
