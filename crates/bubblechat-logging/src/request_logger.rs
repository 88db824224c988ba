use anyhow::{Context, Result};
use colored::Colorize;
use reqwest::StatusCode;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{redact_token, safe_truncate, SECRET_KEYS};

/// Bodies longer than this are truncated on the console
const MAX_CONSOLE_BODY_CHARS: usize = 5000;

/// How HTTP exchanges are logged
#[derive(Debug, Clone, Default)]
pub struct RequestLogSettings {
    /// Dump requests and responses to the console
    pub verbose: bool,
    /// Also write each request/response to a file in this directory
    pub logs_dir: Option<PathBuf>,
}

impl RequestLogSettings {
    pub fn is_enabled(&self) -> bool {
        self.verbose || self.logs_dir.is_some()
    }
}

/// Exchanges logged by this process so far
static LOG_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Pairs a request log file with its response. The sequence number keeps
/// stamps unique within a process, even inside one millisecond.
pub fn request_log_stamp() -> String {
    let seq = LOG_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}-{:05}", chrono::Local::now().format("%Y%m%d-%H%M%S%.3f"), seq)
}

/// Copy of `body` with every secret value masked
pub fn redact_body(body: &Value) -> Value {
    match body {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| {
                    if SECRET_KEYS.contains(&key.as_str()) {
                        (key.clone(), Value::String("***".to_string()))
                    } else {
                        (key.clone(), redact_body(value))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact_body).collect()),
        other => other.clone(),
    }
}

/// Pretty JSON for a (possibly non-JSON) response body, secrets masked
fn pretty_body(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => serde_json::to_string_pretty(&redact_body(&json)).unwrap_or_else(|_| body.to_string()),
        Err(_) => body.to_string(),
    }
}

fn format_request(url: &str, body: &Value, token: Option<&str>) -> String {
    let mut log_content = String::new();
    log_content.push_str(&format!("URL: {}\n", url));
    if let Ok(parsed_url) = reqwest::Url::parse(url) {
        log_content.push_str(&format!("Host: {}\n", parsed_url.host_str().unwrap_or("unknown")));
        log_content.push_str(&format!("Scheme: {}\n", parsed_url.scheme()));
    }

    log_content.push_str("\nHeaders:\n");
    log_content.push_str("  Content-Type: application/json\n");
    if let Some(token) = token {
        log_content.push_str(&format!("  Authorization: Bearer {}\n", redact_token(token)));
    }

    log_content.push_str("\nRequest Body:\n");
    match serde_json::to_string_pretty(&redact_body(body)) {
        Ok(json) => log_content.push_str(&json),
        Err(e) => log_content.push_str(&format!("Error serializing request: {}", e)),
    }
    log_content.push('\n');
    log_content
}

/// Log HTTP request details for debugging (console output)
pub fn log_request(url: &str, body: &Value, token: Option<&str>, verbose: bool) {
    if !verbose {
        return;
    }

    println!("\n{}", "═".repeat(80).bright_cyan());
    println!("{}", "🔍 HTTP REQUEST DEBUG".bright_cyan().bold());
    println!("{}", "═".repeat(80).bright_cyan());
    println!("{}", format_request(url, body, token));
    println!("{}", "═".repeat(80).bright_cyan());
}

/// Log HTTP request to file for persistent debugging
pub fn log_request_to_file(
    logs_dir: &Path,
    stamp: &str,
    endpoint: &str,
    url: &str,
    body: &Value,
    token: Option<&str>,
) -> Result<PathBuf> {
    fs::create_dir_all(logs_dir)
        .with_context(|| format!("Failed to create logs directory {}", logs_dir.display()))?;

    let file_path = logs_dir.join(format!("req-{}-{}.txt", stamp, endpoint));

    let mut log_content = String::new();
    log_content.push_str("HTTP REQUEST LOG\n");
    log_content.push_str("================\n\n");
    log_content.push_str(&format!("Timestamp: {}\n", stamp));
    log_content.push_str(&format!("Endpoint: {}\n\n", endpoint));
    log_content.push_str(&format_request(url, body, token));

    fs::write(&file_path, log_content)
        .with_context(|| format!("Failed to write request log to {}", file_path.display()))?;

    log::info!("Request logged to {}", file_path.display());
    Ok(file_path)
}

/// Log HTTP response details for debugging (console output)
pub fn log_response(status: StatusCode, body: &str, verbose: bool) {
    if !verbose {
        return;
    }

    println!("\n{}", "═".repeat(80).bright_green());
    println!("{}", "📥 HTTP RESPONSE DEBUG".bright_green().bold());
    println!("{}", "═".repeat(80).bright_green());

    println!(
        "{}: {} {}",
        "Status".bright_yellow(),
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    );

    println!("\n{}", "Response Body:".bright_yellow());
    let pretty = pretty_body(body);
    if pretty.chars().count() > MAX_CONSOLE_BODY_CHARS {
        println!("{}", safe_truncate(&pretty, MAX_CONSOLE_BODY_CHARS));
        println!("\n{}", format!("... (truncated, total {} bytes)", pretty.len()).bright_black());
    } else {
        println!("{}", pretty);
    }

    println!("{}", "═".repeat(80).bright_green());
    println!();
}

/// Log HTTP response to file, paired with its request by `stamp`
pub fn log_response_to_file(
    logs_dir: &Path,
    stamp: &str,
    endpoint: &str,
    status: StatusCode,
    body: &str,
) -> Result<PathBuf> {
    fs::create_dir_all(logs_dir)
        .with_context(|| format!("Failed to create logs directory {}", logs_dir.display()))?;

    let file_path = logs_dir.join(format!("resp-{}-{}.txt", stamp, endpoint));

    let mut log_content = String::new();
    log_content.push_str("HTTP RESPONSE LOG\n");
    log_content.push_str("=================\n\n");
    log_content.push_str(&format!("Timestamp: {}\n", stamp));
    log_content.push_str(&format!("Endpoint: {}\n\n", endpoint));
    log_content.push_str(&format!(
        "Status: {} {}\n\n",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    ));
    log_content.push_str("Response Body:\n");
    log_content.push_str(&pretty_body(body));
    log_content.push_str(&format!("\n\n---\nResponse Size: {} bytes\n", body.len()));

    fs::write(&file_path, log_content)
        .with_context(|| format!("Failed to write response log to {}", file_path.display()))?;

    log::info!("Response logged to {}", file_path.display());
    Ok(file_path)
}
