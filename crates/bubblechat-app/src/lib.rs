//! Bubble Chat: a chat widget front end for a token-authenticated query API.
//!
//! The widget logic lives in [`widget`] and talks to the outside world only
//! through [`widget::UiSink`]; [`terminal::TerminalUi`] renders it in a
//! terminal for the `bubblechat` binary.

pub mod app;
pub mod cli;
pub mod config;
pub mod terminal;
pub mod widget;

pub use cli::Cli;
pub use config::{FileConfig, WidgetConfig, DEFAULT_CONFIG_FILE};
pub use terminal::TerminalUi;
pub use widget::{ChatWidget, ConnectionState, TypingIndicator, UiSink, WidgetEvent, WidgetState};
