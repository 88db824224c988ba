use clap::Parser;
use clap_complete::Shell;
use std::path::PathBuf;

/// CLI arguments for bubblechat
#[derive(Parser, Debug)]
#[command(name = "bubblechat")]
#[command(about = "Bubble Chat - terminal front end for the chat widget API")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Path to a TOML config file (default: bubblechat.toml if present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Base URL of the chat API (e.g., https://chat.example.com)
    #[arg(long, value_name = "URL", env = "BUBBLECHAT_BASE_URL")]
    pub base_url: Option<String>,

    /// Username used for the automatic login
    #[arg(long, value_name = "USER", env = "BUBBLECHAT_USERNAME")]
    pub username: Option<String>,

    /// Password used for the automatic login
    #[arg(long, value_name = "PASSWORD", env = "BUBBLECHAT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Open the chat panel immediately instead of waiting for /open
    #[arg(long)]
    pub open: bool,

    /// Send a single query, print the reply and exit
    #[arg(short, long, value_name = "TEXT")]
    pub query: Option<String>,

    /// Show HTTP request/response debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// Write every HTTP request/response to ~/.bubblechat/logs
    #[arg(long)]
    pub log_requests: bool,

    /// Generate shell completions
    #[arg(long, value_enum)]
    pub generate: Option<Shell>,
}
