//! Interactive chat REPL.

use std::borrow::Cow::{self, Borrowed, Owned};

use anyhow::{Result, bail};
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use buddy_application::{BuddyApp, SendOutcome};
use buddy_core::chat::{ChatMessage, Sender};

use super::print_details;

const COMMANDS: &[&str] = &["/settings", "/back"];

/// rustyline helper completing and highlighting slash commands.
#[derive(Clone, Default)]
struct ChatHelper;

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }

        let candidates = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return None;
        }
        COMMANDS
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Validator for ChatHelper {}

fn print_message(message: &ChatMessage, buddy_name: &str) {
    match message.sender {
        Sender::User => println!("{}", format!("> {}", message.text).green()),
        Sender::Buddy => {
            println!("{}", format!("[{}]", buddy_name).bright_magenta());
            for line in message.text.lines() {
                println!("{}", line.bright_blue());
            }
        }
    }
}

/// Runs the chat loop with buddy `id` until the user leaves.
pub async fn run(app: &BuddyApp, id: &str) -> Result<()> {
    if !app.select_buddy(id).await.is_applied() {
        bail!("No buddy with id {}", id);
    }
    let Some(buddy) = app.active_buddy().await else {
        bail!("No buddy with id {}", id);
    };

    let mut rl = Editor::new()?;
    rl.set_helper(Some(ChatHelper));

    println!(
        "{}",
        format!("=== Chat with {} ===", buddy.name).bright_magenta().bold()
    );
    println!(
        "{}",
        "Type a message, '/settings' to view settings, '/back' or 'quit' to leave.".bright_black()
    );
    println!();
    for message in app.messages().await {
        print_message(&message, &buddy.name);
    }

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                match trimmed {
                    "quit" | "exit" | "/back" => break,
                    "/settings" => {
                        app.open_settings().await;
                        if let Some(current) = app.active_buddy().await {
                            print_details(&current);
                        }
                        app.back_from_settings().await;
                        continue;
                    }
                    _ => {}
                }

                match app.send_message(trimmed).await {
                    SendOutcome::Sent => {
                        println!(
                            "{}",
                            format!("{} is typing...", buddy.name).bright_black()
                        );
                        app.settle().await;
                        if let Some(reply) = app.messages().await.last() {
                            print_message(reply, &buddy.name);
                        }
                    }
                    SendOutcome::Busy => {
                        println!("{}", "Still waiting for a reply.".yellow());
                    }
                    SendOutcome::Blank => {}
                    SendOutcome::NoSession => {
                        println!("{}", "This chat has ended.".yellow());
                        break;
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    app.back_from_chat().await;
    println!("{}", "Goodbye!".bright_green());
    Ok(())
}
