#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::extractor::TokenPolicy;
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "upload-assist")]
#[command(about = "Fill upload forms from document filenames and submit them")]
pub struct CliConfig {
    #[arg(long, global = true, help = "TOML settings file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, value_enum, help = "Which repeated numeric token is kept")]
    pub token_policy: Option<TokenPolicy>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the fields recovered from each filename as JSON
    Extract {
        #[arg(required = true)]
        filenames: Vec<String>,
    },
    /// Drop a file on the form, fill it, and submit it
    Submit(SubmitArgs),
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct SubmitArgs {
    /// File to upload; more than one is refused like a multi-file drop
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    #[arg(long, help = "Form action URL")]
    pub endpoint: Option<String>,

    #[arg(long)]
    pub trans_num: Option<String>,

    #[arg(long)]
    pub ccd_num: Option<String>,

    #[arg(long)]
    pub port_of_entry: Option<String>,

    #[arg(long, help = "YYYY-MM-DD")]
    pub eta_date: Option<String>,

    #[arg(long, help = "HH:MM")]
    pub eta_time: Option<String>,

    #[arg(long, help = "Cookie string holding the CSRF token, e.g. 'csrftoken=abc'")]
    pub csrf_cookie: Option<String>,

    #[arg(long, help = "GET the form page first to obtain the CSRF cookie")]
    pub fetch_csrf: bool,

    #[arg(long, help = "Request timeout in seconds")]
    pub timeout: Option<u64>,
}
