use async_trait::async_trait;
use bubblechat_logging::{
    log_request, log_request_to_file, log_response, log_response_to_file, request_log_stamp,
    RequestLogSettings,
};
use bubblechat_types::{
    AuthRequest, AuthResponse, ErrorBody, QueryRequest, QueryResponse, AUTH_PATH,
    GENERIC_AUTH_FAILURE, GENERIC_QUERY_FAILURE, QUERY_PATH,
};
use reqwest::StatusCode;
use serde::Serialize;

use crate::error::{AuthError, QueryError};

/// Transport for the two chat endpoints
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Exchange credentials for a bearer token
    async fn authenticate(&self, request: &AuthRequest) -> Result<String, AuthError>;

    /// Run one query with an already issued token
    async fn query(&self, token: &str, request: &QueryRequest) -> Result<QueryResponse, QueryError>;
}

/// Strip trailing slashes so endpoint paths can be appended directly
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Chat backend speaking JSON over HTTP(S)
pub struct HttpChatBackend {
    base_url: String,
    client: reqwest::Client,
    logging: RequestLogSettings,
}

impl HttpChatBackend {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl AsRef<str>, client: reqwest::Client) -> Self {
        Self {
            base_url: normalize_base_url(base_url.as_ref()),
            client,
            logging: RequestLogSettings::default(),
        }
    }

    pub fn with_logging(mut self, logging: RequestLogSettings) -> Self {
        self.logging = logging;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a JSON body and return the status with the raw response text
    async fn post_json<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        path: &str,
        body: &T,
        token: Option<&str>,
    ) -> Result<(StatusCode, String), reqwest::Error> {
        let url = self.endpoint_url(path);
        let stamp = self.logging.is_enabled().then(request_log_stamp);

        if let Some(stamp) = &stamp {
            let logged = serde_json::to_value(body).unwrap_or_default();
            log_request(&url, &logged, token, self.logging.verbose);
            if let Some(dir) = &self.logging.logs_dir {
                if let Err(e) = log_request_to_file(dir, stamp, endpoint, &url, &logged, token) {
                    log::warn!("Failed to log {} request: {:#}", endpoint, e);
                }
            }
        }

        let mut request = self.client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body);
        if let Some(token) = token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        log::debug!("POST {} -> {}", url, status);

        if let Some(stamp) = &stamp {
            log_response(status, &text, self.logging.verbose);
            if let Some(dir) = &self.logging.logs_dir {
                if let Err(e) = log_response_to_file(dir, stamp, endpoint, status, &text) {
                    log::warn!("Failed to log {} response: {:#}", endpoint, e);
                }
            }
        }

        Ok((status, text))
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn authenticate(&self, request: &AuthRequest) -> Result<String, AuthError> {
        let (status, text) = self
            .post_json("auth", AUTH_PATH, request, None)
            .await
            .map_err(AuthError::Transport)?;

        if !status.is_success() {
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                detail: ErrorBody::parse(&text).message_or(GENERIC_AUTH_FAILURE),
            });
        }

        let response: AuthResponse = serde_json::from_str(&text).map_err(AuthError::InvalidResponse)?;
        response
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingToken)
    }

    async fn query(&self, token: &str, request: &QueryRequest) -> Result<QueryResponse, QueryError> {
        let (status, text) = self
            .post_json("query", QUERY_PATH, request, Some(token))
            .await
            .map_err(QueryError::Transport)?;

        if !status.is_success() {
            return Err(QueryError::Rejected {
                status: status.as_u16(),
                detail: ErrorBody::parse(&text).message_or(GENERIC_QUERY_FAILURE),
            });
        }

        serde_json::from_str(&text).map_err(QueryError::InvalidResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("https://chat.example.com/"), "https://chat.example.com");
        assert_eq!(normalize_base_url("https://chat.example.com//"), "https://chat.example.com");
        assert_eq!(normalize_base_url(" https://chat.example.com/api "), "https://chat.example.com/api");
    }

    #[test]
    fn test_endpoint_urls_have_single_slash() {
        let backend = HttpChatBackend::new("https://chat.example.com/");
        assert_eq!(backend.base_url(), "https://chat.example.com");
        assert_eq!(backend.endpoint_url(AUTH_PATH), "https://chat.example.com/auth");
        assert_eq!(backend.endpoint_url(QUERY_PATH), "https://chat.example.com/query");
    }
}
