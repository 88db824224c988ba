#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bubblechat::{ChatWidget, UiSink};
use bubblechat_api::{AuthError, ChatBackend, QueryError};
use bubblechat_types::{AuthRequest, ChatMessage, Credentials, QueryRequest, QueryResponse};
use serde_json::json;
use tokio::sync::Notify;

pub const TOKEN: &str = "fake-token";

/// In-memory backend with scripted answers
#[derive(Default)]
pub struct FakeBackend {
    auth_results: Mutex<VecDeque<Result<String, AuthError>>>,
    query_results: Mutex<VecDeque<Result<QueryResponse, QueryError>>>,
    auth_calls: AtomicUsize,
    queries: Mutex<Vec<(String, String)>>,
    /// When set, every login waits for a notification before answering
    auth_release: Option<Arc<Notify>>,
    /// When set, every query waits for a notification before answering
    release: Option<Arc<Notify>>,
    pub auth_started: Notify,
    pub query_started: Notify,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn holding_queries(release: Arc<Notify>) -> Self {
        Self {
            release: Some(release),
            ..Self::default()
        }
    }

    pub fn holding_auth(release: Arc<Notify>) -> Self {
        Self {
            auth_release: Some(release),
            ..Self::default()
        }
    }

    pub fn push_auth(&self, result: Result<String, AuthError>) {
        self.auth_results.lock().unwrap().push_back(result);
    }

    pub fn push_query(&self, result: Result<QueryResponse, QueryError>) {
        self.query_results.lock().unwrap().push_back(result);
    }

    pub fn auth_calls(&self) -> usize {
        self.auth_calls.load(Ordering::SeqCst)
    }

    /// (token, query) pairs in the order they were received
    pub fn queries(&self) -> Vec<(String, String)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for FakeBackend {
    async fn authenticate(&self, _request: &AuthRequest) -> Result<String, AuthError> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        self.auth_started.notify_one();

        if let Some(release) = &self.auth_release {
            release.notified().await;
        }

        let scripted = self.auth_results.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(TOKEN.to_string()))
    }

    async fn query(&self, token: &str, request: &QueryRequest) -> Result<QueryResponse, QueryError> {
        self.queries
            .lock()
            .unwrap()
            .push((token.to_string(), request.query.clone()));
        self.query_started.notify_one();

        if let Some(release) = &self.release {
            release.notified().await;
        }

        let scripted = self.query_results.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(QueryResponse { results: Some(json!("R")) }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiOp {
    Panel(bool),
    LoginForm(bool),
    Input(bool),
    SendEnabled(bool),
    Message(ChatMessage),
    TypingShown,
    TypingHidden,
    ClearInput,
}

/// UI sink that records every call
#[derive(Default)]
pub struct RecordingUi {
    ops: Mutex<Vec<UiOp>>,
}

impl RecordingUi {
    fn record(&self, op: UiOp) {
        self.ops.lock().unwrap().push(op);
    }

    pub fn ops(&self) -> Vec<UiOp> {
        self.ops.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                UiOp::Message(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &UiOp) -> usize {
        self.ops().iter().filter(|op| *op == wanted).count()
    }

    /// Position of the first recorded `wanted`
    pub fn position(&self, wanted: &UiOp) -> Option<usize> {
        self.ops().iter().position(|op| op == wanted)
    }
}

impl UiSink for RecordingUi {
    fn set_panel_visible(&self, visible: bool) {
        self.record(UiOp::Panel(visible));
    }

    fn set_input_visible(&self, visible: bool) {
        self.record(UiOp::Input(visible));
    }

    fn set_send_enabled(&self, enabled: bool) {
        self.record(UiOp::SendEnabled(enabled));
    }

    fn append_message(&self, message: &ChatMessage) {
        self.record(UiOp::Message(message.clone()));
    }

    fn show_typing_indicator(&self) {
        self.record(UiOp::TypingShown);
    }

    fn hide_typing_indicator(&self) {
        self.record(UiOp::TypingHidden);
    }

    fn set_login_form_visible(&self, visible: bool) {
        self.record(UiOp::LoginForm(visible));
    }

    fn clear_input(&self) {
        self.record(UiOp::ClearInput);
    }
}

pub fn test_credentials() -> Credentials {
    Credentials::new("widget-user", "widget-pass")
}

pub fn widget_with(backend: Arc<FakeBackend>, credentials: Credentials) -> (ChatWidget, Arc<RecordingUi>) {
    let ui = Arc::new(RecordingUi::default());
    let widget = ChatWidget::new(backend, credentials, ui.clone());
    (widget, ui)
}

/// Poll the recorded UI until `condition` holds
pub async fn wait_until(ui: &RecordingUi, condition: impl Fn(&[UiOp]) -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition(&ui.ops()) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("timed out waiting for the UI");
}
