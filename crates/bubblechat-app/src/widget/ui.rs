use std::sync::Arc;

use bubblechat_types::ChatMessage;

/// Everything the widget can change on screen.
///
/// Implementations must be cheap and non-blocking; they are called from the
/// widget task between network calls.
pub trait UiSink: Send + Sync {
    fn set_panel_visible(&self, visible: bool);

    fn set_input_visible(&self, visible: bool);

    fn set_send_enabled(&self, enabled: bool);

    fn append_message(&self, message: &ChatMessage);

    fn show_typing_indicator(&self);

    fn hide_typing_indicator(&self);

    /// Manual login form; the widget only ever hides it
    fn set_login_form_visible(&self, _visible: bool) {}

    fn clear_input(&self) {}
}

/// Typing indicator that is removed exactly once, when dismissed or dropped
pub struct TypingIndicator {
    ui: Arc<dyn UiSink>,
    shown: bool,
}

impl TypingIndicator {
    pub fn show(ui: Arc<dyn UiSink>) -> Self {
        ui.show_typing_indicator();
        Self { ui, shown: true }
    }

    pub fn dismiss(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if std::mem::take(&mut self.shown) {
            self.ui.hide_typing_indicator();
        }
    }
}

impl Drop for TypingIndicator {
    fn drop(&mut self) {
        self.remove();
    }
}
