//! Core types and structures for bubblechat
//!
//! This crate provides the wire format and chat types shared by all bubblechat crates.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Constants
// ============================================================================

/// Path of the authentication endpoint, relative to the base URL
pub const AUTH_PATH: &str = "/auth";

/// Path of the query endpoint, relative to the base URL
pub const QUERY_PATH: &str = "/query";

/// Reply shown when the server answers without any `results`
pub const FALLBACK_REPLY: &str = "I received your message, but I'm not sure how to respond.";

/// Error shown when authentication is attempted without credentials
pub const MISSING_CREDENTIALS_MESSAGE: &str = "Username and password are required";

/// Error shown when the auth endpoint rejects the request without a detail
pub const GENERIC_AUTH_FAILURE: &str = "Authentication failed";

/// Error shown when the query endpoint rejects the request without a detail
pub const GENERIC_QUERY_FAILURE: &str = "Failed to get response";

/// Status line shown while authentication is in progress
pub const CONNECTING_MESSAGE: &str = "Connecting to the server...";

/// Status line shown once a session is established
pub const CONNECTED_MESSAGE: &str = "Connected! You can now send messages.";

// ============================================================================
// Credentials
// ============================================================================

/// Static login credentials, read once at startup.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both fields must be non-empty before a login can be attempted
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

// ============================================================================
// Chat Types
// ============================================================================

/// Who a rendered chat bubble belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Bot => "bot",
        }
    }
}

/// A single chat bubble. Only lives as long as the UI that renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            text: text.into(),
        }
    }
}

// ============================================================================
// Wire Types
// ============================================================================

/// Body of `POST {base}/auth`
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AuthRequest {
    pub username: String,
    pub password: String,
}

impl From<&Credentials> for AuthRequest {
    fn from(credentials: &Credentials) -> Self {
        Self {
            username: credentials.username.clone(),
            password: credentials.password.clone(),
        }
    }
}

impl fmt::Debug for AuthRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthRequest")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Successful auth response
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct AuthResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Body of `POST {base}/query`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub query: String,
}

/// Successful query response. `results` is not guaranteed to be a string.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Option<serde_json::Value>,
}

impl QueryResponse {
    /// Text to render for this response, if the server sent anything usable
    pub fn reply_text(&self) -> Option<String> {
        self.results.as_ref().and_then(value_to_text)
    }
}

/// Error body returned by both endpoints on failure
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Parse an error body, ignoring anything that is not JSON
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    /// Server-provided detail message, or `fallback` when none was given
    pub fn message_or(&self, fallback: &str) -> String {
        self.detail
            .as_ref()
            .and_then(value_to_text)
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Strings are used verbatim. Falsy values (null, "", false, 0) count as
/// absent; anything else is rendered as compact JSON.
fn value_to_text(value: &serde_json::Value) -> Option<String> {
    use serde_json::Value;

    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
