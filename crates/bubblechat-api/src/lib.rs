//! # bubblechat-api
//!
//! Client side of the bubblechat protocol: a one-time login that yields a
//! bearer token, followed by any number of authenticated queries.
//!
//! - [`SessionManager`] owns the [`Session`] and performs the login.
//! - [`MessageExchanger`] sends queries using a borrowed [`Session`].
//! - [`ChatBackend`] is the transport seam; [`HttpChatBackend`] is the
//!   reqwest implementation.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bubblechat_api::{ChatBackend, HttpChatBackend, MessageExchanger, SessionManager};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend: Arc<dyn ChatBackend> = Arc::new(HttpChatBackend::new("https://chat.example.com"));
//!     let mut sessions = SessionManager::new(backend.clone());
//!     let exchanger = MessageExchanger::new(backend);
//!
//!     sessions.authenticate("alice", "secret").await?;
//!     if let Some(reply) = exchanger.send("hello", sessions.session()).await? {
//!         println!("{}", reply);
//!     }
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod error;
pub mod exchange;
pub mod session;

pub use backend::{normalize_base_url, ChatBackend, HttpChatBackend};
pub use error::{AuthError, QueryError};
pub use exchange::MessageExchanger;
pub use session::{AuthOutcome, Session, SessionManager};

#[cfg(test)]
pub use backend::MockChatBackend;
