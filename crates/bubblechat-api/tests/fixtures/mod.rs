#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::*;
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_USERNAME: &str = "widget-user";
pub const TEST_PASSWORD: &str = "widget-pass";
pub const TEST_TOKEN: &str = "test-access-token-0123456789";

/// Mock server for the chat API's `/auth` and `/query` endpoints
pub struct ChatApiMockServer {
    server: MockServer,
}

impl ChatApiMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Mock a successful login for the test credentials
    pub async fn mock_auth_success(&self, token: &str) {
        Mock::given(method("POST"))
            .and(path("/auth"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "username": TEST_USERNAME,
                "password": TEST_PASSWORD
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": token,
                "token_type": "bearer"
            })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Mock a login rejection with the given status and JSON body
    pub async fn mock_auth_error(&self, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path("/auth"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Mock a raw auth response, for malformed bodies
    pub async fn mock_auth_raw(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path("/auth"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Mock a query answered with `body`, requiring the bearer token
    pub async fn mock_query(&self, token: &str, query: &str, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path("/query"))
            .and(header("authorization", format!("Bearer {}", token).as_str()))
            .and(body_json(json!({ "query": query })))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Mock a raw query response, for malformed bodies
    pub async fn mock_query_raw(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Number of requests the server has seen so far
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}

/// A base URL nothing listens on
pub fn unreachable_base_url() -> String {
    "http://127.0.0.1:9".to_string()
}
