use anyhow::{Context, Result};
use bubblechat_api::{ChatBackend, HttpChatBackend};
use bubblechat_logging::{get_logs_dir, RequestLogSettings};
use std::sync::Arc;

use crate::cli::Cli;
use crate::config::WidgetConfig;

/// Initialize env_logger; `RUST_LOG` wins over the verbosity default
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .try_init();
}

/// Request logging settings derived from CLI flags
pub fn request_log_settings(cli: &Cli) -> Result<RequestLogSettings> {
    let logs_dir = if cli.log_requests {
        Some(get_logs_dir().context("Failed to prepare request log directory")?)
    } else {
        None
    };

    Ok(RequestLogSettings {
        verbose: cli.verbose,
        logs_dir,
    })
}

/// HTTP backend for the configured API
pub fn build_backend(config: &WidgetConfig, logging: RequestLogSettings) -> Arc<dyn ChatBackend> {
    log::debug!("Using chat API at {}", config.base_url);
    Arc::new(HttpChatBackend::new(&config.base_url).with_logging(logging))
}
