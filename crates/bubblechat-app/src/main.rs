use anyhow::Result;
use clap::{CommandFactory, Parser};

use bubblechat::app::{build_backend, init_logging, request_log_settings, run_query_mode, run_repl_mode};
use bubblechat::{Cli, WidgetConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(shell) = cli.generate {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "bubblechat", &mut std::io::stdout());
        return Ok(());
    }

    let config = WidgetConfig::load(&cli)?;
    let backend = build_backend(&config, request_log_settings(&cli)?);

    if let Some(query) = cli.query.as_deref() {
        let reply = run_query_mode(&config, backend, query).await?;
        println!("{}", reply);
        return Ok(());
    }

    run_repl_mode(&cli, config, backend).await
}
