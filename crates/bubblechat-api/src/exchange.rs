use std::sync::Arc;

use bubblechat_types::{QueryRequest, FALLBACK_REPLY};

use crate::backend::ChatBackend;
use crate::error::QueryError;
use crate::session::Session;

/// Sends user queries on behalf of an authenticated session
pub struct MessageExchanger {
    backend: Arc<dyn ChatBackend>,
}

impl MessageExchanger {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    /// Send `query` and return the text to show as the reply.
    ///
    /// Returns `Ok(None)` without touching the network when the session has
    /// no token or the trimmed query is empty.
    pub async fn send(&self, query: &str, session: &Session) -> Result<Option<String>, QueryError> {
        let query = query.trim();
        let Some(token) = session.token() else {
            log::debug!("Dropping query: no session token");
            return Ok(None);
        };
        if query.is_empty() {
            return Ok(None);
        }

        let request = QueryRequest { query: query.to_string() };
        let response = self.backend.query(token, &request).await.map_err(|e| {
            log::warn!("Query failed: {}", e);
            e
        })?;

        Ok(Some(
            response
                .reply_text()
                .unwrap_or_else(|| FALLBACK_REPLY.to_string()),
        ))
    }
}
