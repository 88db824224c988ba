//! Chat widget controller.
//!
//! A [`ChatWidget`] turns [`WidgetEvent`]s into calls on the session manager
//! and message exchanger, and reports everything visible through a
//! [`UiSink`]. Events are handled one at a time on a single task, so UI
//! updates never interleave.

mod ui;

pub use ui::{TypingIndicator, UiSink};

use std::future::Future;
use std::sync::Arc;

use bubblechat_api::{AuthError, ChatBackend, MessageExchanger, QueryError, Session, SessionManager};
use bubblechat_types::{ChatMessage, Credentials, CONNECTED_MESSAGE, CONNECTING_MESSAGE};
use tokio::sync::mpsc;

/// Input from the widget surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// Open the chat panel
    Open,
    /// Hide the chat panel
    Close,
    /// Bubble click: open when closed, close when open
    Toggle,
    /// Send the typed text
    Send(String),
}

/// Login progress of an open panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Unauthenticated,
    Authenticating,
    Ready,
    AuthFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    Closed,
    Open(ConnectionState),
}

/// Panel visibility plus login progress
struct Panel {
    open: bool,
    connection: ConnectionState,
}

impl Panel {
    /// Returns true if the panel was closed before
    fn show(&mut self, ui: &dyn UiSink) -> bool {
        if self.open {
            return false;
        }
        self.open = true;
        ui.set_panel_visible(true);
        true
    }

    fn hide(&mut self, ui: &dyn UiSink) {
        if self.open {
            self.open = false;
            ui.set_panel_visible(false);
        }
    }

    /// Apply an event that arrived while the widget was busy. Sends are
    /// dropped and opening never starts a second login.
    fn apply_while_busy(&mut self, ui: &dyn UiSink, event: WidgetEvent) {
        match event {
            WidgetEvent::Send(dropped) => log::info!("Widget busy, dropping send {:?}", dropped),
            WidgetEvent::Close => self.hide(ui),
            WidgetEvent::Open => {
                self.show(ui);
            }
            WidgetEvent::Toggle if self.open => self.hide(ui),
            WidgetEvent::Toggle => {
                self.show(ui);
            }
        }
    }
}

/// Drive `work` to completion while draining `events` into `panel`
async fn while_listening<T>(
    work: impl Future<Output = T>,
    panel: &mut Panel,
    ui: &dyn UiSink,
    events: &mut mpsc::Receiver<WidgetEvent>,
) -> T {
    tokio::pin!(work);
    let mut listening = true;

    loop {
        tokio::select! {
            result = &mut work => return result,
            event = events.recv(), if listening => match event {
                Some(event) => panel.apply_while_busy(ui, event),
                None => listening = false,
            },
        }
    }
}

pub struct ChatWidget {
    credentials: Credentials,
    sessions: SessionManager,
    exchanger: MessageExchanger,
    ui: Arc<dyn UiSink>,
    panel: Panel,
}

impl ChatWidget {
    /// Create a closed widget. The panel, login form and input start hidden.
    pub fn new(backend: Arc<dyn ChatBackend>, credentials: Credentials, ui: Arc<dyn UiSink>) -> Self {
        ui.set_panel_visible(false);
        ui.set_login_form_visible(false);
        ui.set_input_visible(false);

        Self {
            credentials,
            sessions: SessionManager::new(backend.clone()),
            exchanger: MessageExchanger::new(backend),
            ui,
            panel: Panel {
                open: false,
                connection: ConnectionState::Unauthenticated,
            },
        }
    }

    pub fn state(&self) -> WidgetState {
        if self.panel.open {
            WidgetState::Open(self.panel.connection)
        } else {
            WidgetState::Closed
        }
    }

    pub fn session(&self) -> &Session {
        self.sessions.session()
    }

    /// Handle a single event to completion
    pub async fn handle_event(&mut self, event: WidgetEvent) {
        log::debug!("Widget event: {:?}", event);
        match event {
            WidgetEvent::Open => self.open().await,
            WidgetEvent::Close => self.panel.hide(self.ui.as_ref()),
            WidgetEvent::Toggle => {
                if self.panel.open {
                    self.panel.hide(self.ui.as_ref());
                } else {
                    self.open().await;
                }
            }
            WidgetEvent::Send(text) => {
                let Some(query) = self.prepare_send(&text) else {
                    return;
                };
                let typing = self.begin_send();
                let result = self.exchanger.send(&query, self.sessions.session()).await;
                self.finish_send(typing, result);
            }
        }
    }

    /// Consume events until the channel closes.
    ///
    /// While a login or a query is in flight, `Send` events are dropped
    /// rather than queued; panel events are still applied.
    pub async fn run(mut self, mut events: mpsc::Receiver<WidgetEvent>) {
        while let Some(event) = events.recv().await {
            match event {
                WidgetEvent::Send(text) => self.send_while_listening(&text, &mut events).await,
                WidgetEvent::Open => self.open_while_listening(&mut events).await,
                WidgetEvent::Toggle if !self.panel.open => self.open_while_listening(&mut events).await,
                other => self.handle_event(other).await,
            }
        }
        log::debug!("Widget event channel closed");
    }

    async fn send_while_listening(&mut self, text: &str, events: &mut mpsc::Receiver<WidgetEvent>) {
        let Some(query) = self.prepare_send(text) else {
            return;
        };
        let typing = self.begin_send();

        let exchange = self.exchanger.send(&query, self.sessions.session());
        let result = while_listening(exchange, &mut self.panel, self.ui.as_ref(), events).await;

        self.finish_send(typing, result);
    }

    async fn open_while_listening(&mut self, events: &mut mpsc::Receiver<WidgetEvent>) {
        if !self.begin_open() {
            return;
        }

        let login = self
            .sessions
            .authenticate(&self.credentials.username, &self.credentials.password);
        let result = while_listening(login, &mut self.panel, self.ui.as_ref(), events)
            .await
            .map(|_| ());

        self.finish_open(result);
    }

    /// Open the panel, logging in if there is no session yet
    async fn open(&mut self) {
        if !self.begin_open() {
            return;
        }

        let result = self
            .sessions
            .authenticate(&self.credentials.username, &self.credentials.password)
            .await
            .map(|_| ());

        self.finish_open(result);
    }

    /// Show the panel; returns true if a login should follow
    fn begin_open(&mut self) -> bool {
        if !self.panel.show(self.ui.as_ref()) || self.sessions.session().is_authenticated() {
            return false;
        }

        self.ui.set_login_form_visible(false);
        self.ui.append_message(&ChatMessage::bot(CONNECTING_MESSAGE));
        self.panel.connection = ConnectionState::Authenticating;
        true
    }

    fn finish_open(&mut self, result: Result<(), AuthError>) {
        match result {
            Ok(()) => {
                self.panel.connection = ConnectionState::Ready;
                self.ui.set_input_visible(true);
                self.ui.set_send_enabled(true);
                self.ui.append_message(&ChatMessage::bot(CONNECTED_MESSAGE));
            }
            Err(e) => {
                self.panel.connection = ConnectionState::AuthFailed;
                self.ui.append_message(&ChatMessage::bot(format!(
                    "Authentication failed: {}. Please contact support.",
                    e
                )));
            }
        }
    }

    /// Render the user's message if it can be sent; returns the trimmed query
    fn prepare_send(&self, text: &str) -> Option<String> {
        let query = text.trim();
        if !self.panel.open || query.is_empty() || !self.sessions.session().is_authenticated() {
            log::debug!("Ignoring send request");
            return None;
        }

        self.ui.append_message(&ChatMessage::user(query));
        self.ui.clear_input();
        Some(query.to_string())
    }

    fn begin_send(&self) -> TypingIndicator {
        self.ui.set_send_enabled(false);
        TypingIndicator::show(self.ui.clone())
    }

    fn finish_send(&self, typing: TypingIndicator, result: Result<Option<String>, QueryError>) {
        typing.dismiss();
        self.ui.set_send_enabled(true);

        match result {
            Ok(Some(reply)) => self.ui.append_message(&ChatMessage::bot(reply)),
            Ok(None) => {}
            Err(e) => self.ui.append_message(&ChatMessage::bot(format!("Error: {}", e))),
        }
    }
}
