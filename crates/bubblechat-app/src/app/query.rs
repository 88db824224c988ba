use anyhow::{bail, Context, Result};
use bubblechat_api::{ChatBackend, MessageExchanger, SessionManager};
use std::sync::Arc;

use crate::config::WidgetConfig;

/// Log in, send `query` once and return the reply text
pub async fn run_query_mode(config: &WidgetConfig, backend: Arc<dyn ChatBackend>, query: &str) -> Result<String> {
    let mut sessions = SessionManager::new(backend.clone());
    sessions
        .ensure_authenticated(&config.credentials)
        .await
        .context("Authentication failed")?;

    let exchanger = MessageExchanger::new(backend);
    match exchanger
        .send(query, sessions.session())
        .await
        .context("Query failed")?
    {
        Some(reply) => Ok(reply),
        None => bail!("Nothing to send: the query is empty"),
    }
}
