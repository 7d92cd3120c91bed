//! CLI entry point for Uruti.

pub mod auth;
pub mod request;

use std::io::IsTerminal;
use std::sync::Once;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "URUTI_LOG";

/// UrutiIQ API CLI
#[derive(Parser, Debug)]
#[command(name = "uruti", version, about = "UrutiIQ accounting API CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Session management
    Auth(AuthArgs),
    /// Active company selection
    Company(CompanyArgs),
    /// GET an endpoint
    Get(PathArgs),
    /// POST to an endpoint
    Post(BodyArgs),
    /// PUT to an endpoint
    Put(BodyArgs),
    /// PATCH an endpoint
    Patch(BodyArgs),
    /// DELETE an endpoint
    Delete(PathArgs),
}

/// Arguments for the `auth` subcommand group.
#[derive(Parser, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommands,
}

/// Auth subcommands.
#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Login with email and password
    Login(LoginArgs),
    /// Create an account and log in
    Register(RegisterArgs),
    /// Start a demo session
    Demo,
    /// Show session status
    Status,
    /// Logout and forget local tokens
    Logout,
}

/// Arguments for `uruti auth login`.
#[derive(Parser, Debug)]
pub struct LoginArgs {
    pub email: String,
    /// Password (prompted on stdin when omitted)
    #[arg(long, env = "URUTI_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
    /// One-time code, if the account uses MFA
    #[arg(long)]
    pub mfa_code: Option<String>,
}

/// Arguments for `uruti auth register`.
#[derive(Parser, Debug)]
pub struct RegisterArgs {
    pub email: String,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long, env = "URUTI_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Arguments for the `company` subcommand group.
#[derive(Parser, Debug)]
pub struct CompanyArgs {
    #[command(subcommand)]
    pub command: CompanyCommands,
}

#[derive(Subcommand, Debug)]
pub enum CompanyCommands {
    /// Persist the company sent as x-company-id
    Set { company_id: String },
    /// Print the active company
    Show,
}

/// An endpoint path such as `/invoices?companyId=c1`.
#[derive(Parser, Debug)]
pub struct PathArgs {
    pub path: String,
    /// Print the whole response body instead of its `data` member
    #[arg(long)]
    pub raw: bool,
}

/// An endpoint path plus a JSON body.
#[derive(Parser, Debug)]
pub struct BodyArgs {
    pub path: String,
    /// JSON request body
    #[arg(short, long)]
    pub data: Option<String>,
    #[arg(long)]
    pub raw: bool,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Install a stderr fmt subscriber filtered by `URUTI_LOG` (default `warn`).
pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .init();
    });
}
