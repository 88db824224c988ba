use anyhow::{Context, Result};
use bubblechat_api::ChatBackend;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::cli::Cli;
use crate::config::WidgetConfig;
use crate::terminal::TerminalUi;
use crate::widget::{ChatWidget, UiSink, WidgetEvent};

/// Events typed ahead of the widget are buffered up to this many
const EVENT_QUEUE_CAPACITY: usize = 32;

/// What a line of REPL input means
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    Event(WidgetEvent),
    Help,
    Quit,
    Unknown(String),
    Empty,
}

/// Interpret one line of input. Lines starting with `//` are sent as
/// messages with the first slash removed.
pub fn parse_repl_line(line: &str) -> ReplInput {
    let line = line.trim();
    if line.is_empty() {
        return ReplInput::Empty;
    }

    if let Some(escaped) = line.strip_prefix("//") {
        return ReplInput::Event(WidgetEvent::Send(format!("/{}", escaped)));
    }

    match line {
        "/open" => ReplInput::Event(WidgetEvent::Open),
        "/close" => ReplInput::Event(WidgetEvent::Close),
        "/toggle" | "/bubble" => ReplInput::Event(WidgetEvent::Toggle),
        "/help" | "/?" => ReplInput::Help,
        "/quit" | "/exit" | "exit" | "quit" => ReplInput::Quit,
        command if command.starts_with('/') => ReplInput::Unknown(command.to_string()),
        text => ReplInput::Event(WidgetEvent::Send(text.to_string())),
    }
}

fn print_help() {
    println!("{}", "Commands:".bright_yellow());
    println!("  /open      open the chat panel (logs in on first open)");
    println!("  /close     close the chat panel");
    println!("  /toggle    click the chat bubble");
    println!("  /help      show this help");
    println!("  /quit      exit");
    println!("{}", "Anything else is sent as a message; start with // to send a leading slash.".bright_black());
}

/// Run interactive REPL mode
pub async fn run_repl_mode(cli: &Cli, config: WidgetConfig, backend: Arc<dyn ChatBackend>) -> Result<()> {
    println!("{}", "💬 Bubble Chat".bright_cyan().bold());
    println!("{}", format!("Server: {}", config.base_url).bright_black());
    println!("{}", "Type /open to start chatting, /help for commands.\n".bright_black());

    let ui: Arc<dyn UiSink> = Arc::new(TerminalUi::new());
    let widget = ChatWidget::new(backend, config.credentials, ui);

    let (events, receiver) = mpsc::channel(EVENT_QUEUE_CAPACITY);
    let widget_task = tokio::spawn(widget.run(receiver));

    if cli.open {
        events
            .send(WidgetEvent::Open)
            .await
            .context("Widget stopped before the panel could open")?;
    }

    let input_result = tokio::task::spawn_blocking(move || read_input(events))
        .await
        .context("Input thread panicked")?;

    // The sender is gone; the widget finishes any in-flight send and stops
    widget_task.await.context("Widget task panicked")?;
    input_result
}

/// Read lines until quit/EOF, forwarding widget events
fn read_input(events: mpsc::Sender<WidgetEvent>) -> Result<()> {
    let mut rl = DefaultEditor::new().context("Failed to initialize line editor")?;

    loop {
        match rl.readline("› ") {
            Ok(line) => {
                let input = parse_repl_line(&line);
                if input != ReplInput::Empty {
                    let _ = rl.add_history_entry(line.trim());
                }

                match input {
                    ReplInput::Event(event) => {
                        if events.blocking_send(event).is_err() {
                            log::warn!("Widget stopped; leaving REPL");
                            break;
                        }
                    }
                    ReplInput::Help => print_help(),
                    ReplInput::Quit => {
                        println!("{}", "Goodbye!".bright_cyan());
                        break;
                    }
                    ReplInput::Unknown(command) => {
                        println!("{}", format!("Unknown command: {} (try /help)", command).yellow());
                    }
                    ReplInput::Empty => {}
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".bright_black());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".bright_cyan());
                break;
            }
            Err(err) => {
                eprintln!("{} {}", "Error:".bright_red().bold(), err);
                return Err(err).context("Failed to read input");
            }
        }
    }

    Ok(())
}
