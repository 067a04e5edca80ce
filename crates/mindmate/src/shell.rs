// SPDX-FileCopyrightText: 2026 MindMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `mindmate chat` command implementation.
//!
//! Launches an interactive REPL with a colored prompt and readline history.
//! Each invocation starts a fresh conversation; nothing is persisted except
//! the API key, and only on explicit `/key`.

use std::io::Write;
use std::sync::Arc;

use colored::Colorize;
use mindmate_agent::{
    load_system_prompt, ChatController, ChatState, InterruptHandle, SubmitOutcome,
};
use mindmate_config::MindmateConfig;
use mindmate_core::{CompletionProvider, Message, MindmateError, Sender, Sentiment};
use mindmate_credential::{mask_secret, resolve_credential, CredentialStore, OPENAI_API_KEY};
use mindmate_openai::OpenAiProvider;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// A parsed line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Quit,
    Help,
    History,
    SetKey(String),
    ForgetKey,
    Unknown(String),
    Say(String),
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<ShellCommand> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    if !trimmed.starts_with('/') {
        return Some(ShellCommand::Say(trimmed.to_string()));
    }

    let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (trimmed, ""),
    };
    Some(match cmd {
        "/quit" | "/exit" => ShellCommand::Quit,
        "/help" => ShellCommand::Help,
        "/history" => ShellCommand::History,
        "/forget" => ShellCommand::ForgetKey,
        "/key" => ShellCommand::SetKey(arg.to_string()),
        other => ShellCommand::Unknown(other.to_string()),
    })
}

/// Runs the `mindmate chat` interactive REPL.
pub async fn run_chat(
    config: MindmateConfig,
    mut store: CredentialStore,
) -> Result<(), MindmateError> {
    let provider: Arc<dyn CompletionProvider> = Arc::new(OpenAiProvider::new(&config.openai)?);
    let system_prompt = load_system_prompt(&config.companion).await;

    let credential = resolve_credential(&config.openai, &store).map(|(credential, source)| {
        info!(%source, "using stored API key for remote replies");
        credential
    });

    let mut chat = ChatController::from_config(&config, Some(provider), system_prompt)
        .with_credential(credential);
    let name = config.companion.name.clone();
    let interrupts = tokio::spawn(watch_interrupts(chat.subscribe(), chat.interrupt_handle()));

    let mut rl = DefaultEditor::new()
        .map_err(|e| MindmateError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "mindmate".bold().green());
    let mode = if chat.has_credential() {
        "remote replies"
    } else {
        "local replies, use /key <api-key> for remote"
    };
    println!("Type {} for commands, {} to exit ({mode}).\n", "/help".yellow(), "/quit".yellow());
    if let Some(greeting) = chat.messages().first() {
        print_bot(&name, &greeting.content);
    }

    let prompt = format!("{}> ", "you".cyan());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let Some(command) = parse_line(&line) else {
                    continue;
                };
                let _ = rl.add_history_entry(line.as_str());

                match command {
                    ShellCommand::Quit => break,
                    ShellCommand::Help => print_help(),
                    ShellCommand::History => print_history(&name, chat.messages()),
                    ShellCommand::SetKey(value) => match store.set(OPENAI_API_KEY, &value) {
                        Ok(credential) => {
                            println!("{}", format!("API key {} saved", mask_secret(credential.expose())).dimmed());
                            chat.set_credential(credential);
                        }
                        Err(e) => eprintln!("{}: {e}", "error".red()),
                    },
                    ShellCommand::ForgetKey => {
                        if let Err(e) = store.remove(OPENAI_API_KEY) {
                            eprintln!("{}: {e}", "error".red());
                        }
                        chat.clear_credential();
                        println!("{}", "API key forgotten, using local replies".dimmed());
                    }
                    ShellCommand::Unknown(cmd) => {
                        eprintln!("{}: unknown command {cmd}, try /help", "error".red());
                    }
                    ShellCommand::Say(text) => {
                        show_typing(&name);
                        let outcome = chat.submit(&text).await;
                        clear_typing();
                        if let SubmitOutcome::Replied { user, bot, .. } = outcome {
                            if let Some(sentiment) = user.sentiment {
                                println!("{}", sentiment_marker(sentiment));
                            }
                            print_bot(&name, &bot.content);
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C
                break;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D
                break;
            }
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    interrupts.abort();
    println!("{}", "Take care of yourself.".dimmed());
    Ok(())
}

/// Interrupts the pending remote reply on Ctrl+C.
///
/// The line editor reads in raw mode, so Ctrl+C at the prompt still arrives
/// as `ReadlineError::Interrupted`. This task only sees it while a reply is
/// being produced.
async fn watch_interrupts(rx: watch::Receiver<ChatState>, handle: InterruptHandle) {
    loop {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            break;
        }
        if *rx.borrow() == ChatState::AwaitingReply {
            info!("interrupting pending reply");
            handle.interrupt();
        } else {
            debug!("Ctrl+C ignored while idle");
        }
    }
}

fn show_typing(name: &str) {
    let mut out = std::io::stdout();
    let _ = write!(out, "{}", format!("{name} is typing...").dimmed());
    if let Err(e) = out.flush() {
        warn!(error = %e, "failed to flush typing indicator");
    }
}

fn clear_typing() {
    let mut out = std::io::stdout();
    let _ = write!(out, "\r\x1b[2K");
    if let Err(e) = out.flush() {
        warn!(error = %e, "failed to flush typing indicator");
    }
}

fn sentiment_marker(sentiment: Sentiment) -> String {
    let tag = format!("[{sentiment}]");
    match sentiment {
        Sentiment::Positive => tag.green().dimmed().to_string(),
        Sentiment::Negative => tag.magenta().dimmed().to_string(),
        Sentiment::Neutral => tag.dimmed().to_string(),
    }
}

fn print_bot(name: &str, content: &str) {
    println!("{} {content}\n", format!("{name}:").green().bold());
}

fn print_history(name: &str, messages: &[Message]) {
    for message in messages {
        let time = message.created_at.format("%H:%M:%S");
        match message.sender {
            Sender::User => {
                let tag = message
                    .sentiment
                    .map(|s| format!(" ({s})"))
                    .unwrap_or_default();
                println!("{} {}{} {}", time.to_string().dimmed(), "you".cyan(), tag.dimmed(), message.content);
            }
            Sender::Bot => {
                println!("{} {} {}", time.to_string().dimmed(), name.green(), message.content);
            }
        }
    }
    println!();
}

fn print_help() {
    println!("  {}   save an API key for remote replies", "/key <api-key>".yellow());
    println!("  {}          remove the saved API key", "/forget".yellow());
    println!("  {}         show this conversation", "/history".yellow());
    println!("  {}      leave the chat", "/quit, /exit".yellow());
    println!();
}
