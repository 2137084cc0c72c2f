use clap::{Args, Subcommand};
use lookout_core::QueryKind;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create an account and store its session token.
    Register(RegisterArgs),
    /// Store a session token.
    Login(LoginArgs),
    /// Clear stored credentials.
    Logout,
    /// Show credential and gateway status.
    Status,
    /// Show remaining credits.
    Credits,
    /// List past searches.
    History(HistoryArgs),
    /// Run a search (costs one credit).
    Search {
        #[command(subcommand)]
        target: SearchCommands,
    },
    /// Show what a text selection looks like and which searches apply.
    Classify(ClassifyArgs),
    /// Search a text selection as the given kind.
    Trigger(TriggerArgs),
}

/// What to search for.
#[derive(Clone, Debug, Subcommand)]
pub enum SearchCommands {
    /// Look a username up across social and gaming platforms.
    Username(UsernameArgs),
    /// Analyze an email address.
    Email(EmailArgs),
    /// Look a phone number up.
    Phone(PhoneArgs),
    /// Search a person or company by full name.
    Fullname(FullnameArgs),
}

/// Arguments for `lko register`.
#[derive(Clone, Debug, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub email: String,
    /// At least 4 characters.
    #[arg(long)]
    pub password: String,
    /// Repeat of `--password`.
    #[arg(long)]
    pub confirm_password: String,
    /// Accept the privacy policy and terms of service.
    #[arg(long)]
    pub accept_terms: bool,
}

/// Arguments for `lko login`.
#[derive(Clone, Debug, Args)]
pub struct LoginArgs {
    /// Session token issued by the gateway.
    #[arg(long)]
    pub token: String,
    /// Display name to remember alongside the token.
    #[arg(long, default_value = "")]
    pub username: String,
}

/// Arguments for `lko history`.
#[derive(Clone, Debug, Args)]
pub struct HistoryArgs {
    /// Show at most this many entries, newest first.
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Source selection shared by every search.
#[derive(Clone, Debug, Default, Args)]
pub struct SourceArgs {
    /// Only query these sources (comma-separated ids).
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,
    /// Skip speculative candidates for platforms that cannot be queried.
    #[arg(long)]
    pub no_speculative: bool,
}

#[derive(Clone, Debug, Args)]
pub struct UsernameArgs {
    pub value: String,
    #[command(flatten)]
    pub sources: SourceArgs,
}

#[derive(Clone, Debug, Args)]
pub struct EmailArgs {
    pub value: String,
    #[command(flatten)]
    pub sources: SourceArgs,
}

#[derive(Clone, Debug, Args)]
pub struct PhoneArgs {
    pub value: String,
    /// Dialing prefix, with or without `+`.
    #[arg(long)]
    pub country_code: Option<String>,
    #[command(flatten)]
    pub sources: SourceArgs,
}

#[derive(Clone, Debug, Args)]
pub struct FullnameArgs {
    pub value: String,
    /// Backend: insee or facebook.
    #[arg(long, default_value = "insee")]
    pub r#type: String,
    #[arg(long)]
    pub postal_code: Option<String>,
    #[command(flatten)]
    pub sources: SourceArgs,
}

/// Arguments for `lko classify`.
#[derive(Clone, Debug, Args)]
pub struct ClassifyArgs {
    pub text: String,
}

/// Arguments for `lko trigger`.
#[derive(Clone, Debug, Args)]
pub struct TriggerArgs {
    pub text: String,
    /// Search kind: username, email or phone.
    #[arg(long = "as")]
    pub kind: QueryKind,
    #[command(flatten)]
    pub sources: SourceArgs,
}
