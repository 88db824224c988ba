use colored::Colorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use bubblechat_types::{ChatMessage, Role};

use crate::widget::UiSink;

/// Renders the widget as lines of terminal output
#[derive(Default)]
pub struct TerminalUi {
    panel_open: AtomicBool,
    typing: AtomicBool,
}

impl TerminalUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text printed for a chat bubble, without colors
    pub fn format_message(message: &ChatMessage) -> String {
        match message.role {
            Role::User => format!("you › {}", message.text),
            Role::Bot => format!("bot › {}", message.text),
        }
    }

    /// Banner for a panel visibility change. Hiding a panel that was never
    /// shown (the widget does this on startup) prints nothing.
    fn panel_notice(&self, visible: bool) -> Option<&'static str> {
        let was_open = self.panel_open.swap(visible, Ordering::SeqCst);
        match (was_open, visible) {
            (false, true) => Some("💬 Chat opened"),
            (true, false) => Some("Chat closed. Type /open to reopen."),
            _ => None,
        }
    }
}

impl UiSink for TerminalUi {
    fn set_panel_visible(&self, visible: bool) {
        match self.panel_notice(visible) {
            Some(notice) if visible => println!("{}", notice.bright_cyan().bold()),
            Some(notice) => println!("{}", notice.bright_black()),
            None => {}
        }
    }

    fn set_input_visible(&self, visible: bool) {
        if visible {
            println!("{}", "Type a message and press Enter. /help lists commands.".bright_black());
        }
    }

    fn set_send_enabled(&self, enabled: bool) {
        log::debug!("Send action {}", if enabled { "enabled" } else { "disabled" });
    }

    fn append_message(&self, message: &ChatMessage) {
        let line = Self::format_message(message);
        match message.role {
            Role::User => println!("{}", line.bright_blue()),
            Role::Bot => println!("{}", line.bright_green()),
        }
    }

    fn show_typing_indicator(&self) {
        if !self.typing.swap(true, Ordering::SeqCst) {
            print!("{}", "bot is typing...".bright_black().italic());
            let _ = io::stdout().flush();
        }
    }

    fn hide_typing_indicator(&self) {
        if self.typing.swap(false, Ordering::SeqCst) {
            // Erase the indicator line
            print!("\r\x1b[2K");
            let _ = io::stdout().flush();
        }
    }
}
