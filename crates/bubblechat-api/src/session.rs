use std::fmt;
use std::sync::Arc;

use bubblechat_logging::redact_token;
use bubblechat_types::{AuthRequest, Credentials};

use crate::backend::ChatBackend;
use crate::error::AuthError;

/// Client-side record of a successful login.
///
/// Starts out empty and holds the bearer token once [`SessionManager`]
/// authenticates. Tokens are never refreshed or expired.
#[derive(Clone, Default)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn establish(&mut self, token: String) -> &str {
        self.token.insert(token)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_deref().map(redact_token))
            .finish()
    }
}

/// Result of [`SessionManager::ensure_authenticated`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// A token was already present; nothing was sent
    AlreadyAuthenticated,
    /// A login round-trip just succeeded
    Authenticated,
}

/// Owns the session and is the only writer of its token
pub struct SessionManager {
    backend: Arc<dyn ChatBackend>,
    session: Session,
}

impl SessionManager {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            session: Session::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Log in once and store the issued token.
    ///
    /// Empty credentials fail before anything is sent. A failed attempt
    /// leaves the session as it was.
    pub async fn authenticate(&mut self, username: &str, password: &str) -> Result<&str, AuthError> {
        if username.is_empty() || password.is_empty() {
            log::warn!("Refusing to authenticate without a username and password");
            return Err(AuthError::MissingCredentials);
        }

        let request = AuthRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        log::debug!("Authenticating as {}", username);
        match self.backend.authenticate(&request).await {
            Ok(token) => {
                log::info!("Authenticated as {}", username);
                Ok(self.session.establish(token))
            }
            Err(e) => {
                log::warn!("Authentication failed: {}", e);
                Err(e)
            }
        }
    }

    /// Authenticate unless a token is already held
    pub async fn ensure_authenticated(&mut self, credentials: &Credentials) -> Result<AuthOutcome, AuthError> {
        if self.session.is_authenticated() {
            return Ok(AuthOutcome::AlreadyAuthenticated);
        }

        self.authenticate(&credentials.username, &credentials.password).await?;
        Ok(AuthOutcome::Authenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockChatBackend;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn manager_with(mock: MockChatBackend) -> SessionManager {
        SessionManager::new(Arc::new(mock))
    }

    #[tokio::test]
    async fn test_authenticate_stores_token() {
        let mut mock = MockChatBackend::new();
        mock.expect_authenticate()
            .withf(|req| req.username == "alice" && req.password == "secret")
            .times(1)
            .returning(|_| Ok("T".to_string()));

        let mut manager = manager_with(mock);
        assert!(!manager.session().is_authenticated());

        let token = manager.authenticate("alice", "secret").await.unwrap();
        assert_eq!(token, "T");
        assert_eq!(manager.session().token(), Some("T"));
    }

    #[tokio::test]
    async fn test_rejected_login_keeps_session_empty() {
        let mut mock = MockChatBackend::new();
        mock.expect_authenticate().times(1).returning(|_| {
            Err(AuthError::Rejected { status: 401, detail: "bad creds".to_string() })
        });

        let mut manager = manager_with(mock);
        let err = manager.authenticate("alice", "wrong").await.unwrap_err();

        assert_eq!(err.to_string(), "bad creds");
        assert!(!manager.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_ensure_authenticated_short_circuits() {
        let mut mock = MockChatBackend::new();
        mock.expect_authenticate().times(1).returning(|_| Ok("T".to_string()));

        let mut manager = manager_with(mock);
        let credentials = Credentials::new("alice", "secret");

        assert_eq!(manager.ensure_authenticated(&credentials).await.unwrap(), AuthOutcome::Authenticated);
        assert_eq!(manager.ensure_authenticated(&credentials).await.unwrap(), AuthOutcome::AlreadyAuthenticated);
        assert_eq!(manager.session().token(), Some("T"));
    }

    #[tokio::test]
    async fn test_ensure_authenticated_retries_after_failure() {
        let mut mock = MockChatBackend::new();
        let mut seq = mockall::Sequence::new();
        mock.expect_authenticate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(AuthError::MissingToken));
        mock.expect_authenticate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("second".to_string()));

        let mut manager = manager_with(mock);
        let credentials = Credentials::new("alice", "secret");

        assert!(manager.ensure_authenticated(&credentials).await.is_err());
        assert_eq!(manager.ensure_authenticated(&credentials).await.unwrap(), AuthOutcome::Authenticated);
        assert_eq!(manager.session().token(), Some("second"));
    }

    #[test]
    fn test_session_debug_redacts_token() {
        let mut session = Session::default();
        session.establish("eyJhbGciOiJIUzI1NiJ9.secret".to_string());
        let debug_str = format!("{:?}", session);
        assert!(debug_str.contains("eyJhbG***"));
        assert!(!debug_str.contains("secret"));
    }

    fn credential_pair() -> impl Strategy<Value = (String, String)> {
        prop_oneof![
            ("", "\\PC{0,12}"),
            ("\\PC{0,12}", ""),
        ]
    }

    proptest! {
        #[test]
        fn prop_empty_credentials_never_reach_backend((username, password) in credential_pair()) {
            let mut mock = MockChatBackend::new();
            mock.expect_authenticate().never();
            let mut manager = manager_with(mock);

            let result = tokio_test::block_on(manager.authenticate(&username, &password));

            prop_assert!(matches!(result, Err(AuthError::MissingCredentials)));
            prop_assert!(!manager.session().is_authenticated());
        }
    }
}
