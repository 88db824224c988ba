// Logging module - HTTP request/response debug logging
pub mod request_logger;

use anyhow::{Context, Result};
use std::path::PathBuf;

pub use request_logger::{
    log_request,
    log_request_to_file,
    log_response,
    log_response_to_file,
    redact_body,
    request_log_stamp,
    RequestLogSettings,
};

/// Keys whose values never reach a log line
const SECRET_KEYS: &[&str] = &["password", "access_token"];

/// Number of token characters kept visible in logs
const TOKEN_PREFIX_CHARS: usize = 6;

/// Cut `s` to at most `max_chars` characters, marking the cut with "..."
pub fn safe_truncate(s: &str, max_chars: usize) -> String {
    if s.char_indices().nth(max_chars).is_none() {
        return s.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let end = s.char_indices().nth(keep).map_or(s.len(), |(idx, _)| idx);
    format!("{}...", &s[..end])
}

/// Shorten a bearer token to a recognizable prefix.
/// Tokens too short to leave anything hidden are masked entirely.
pub fn redact_token(token: &str) -> String {
    if token.chars().count() <= TOKEN_PREFIX_CHARS * 2 {
        "***".to_string()
    } else {
        format!("{}***", token.chars().take(TOKEN_PREFIX_CHARS).collect::<String>())
    }
}

/// `~/.bubblechat` joined with `parts`, created if missing
fn bubblechat_path(parts: &[&str]) -> Result<PathBuf> {
    let home = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .context("Failed to get home directory")?;

    let dir = parts
        .iter()
        .fold(PathBuf::from(home).join(".bubblechat"), |dir, part| dir.join(part));
    std::fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    Ok(dir)
}

/// Request/response log files go here (`~/.bubblechat/logs`)
pub fn get_logs_dir() -> Result<PathBuf> {
    bubblechat_path(&["logs"])
}
