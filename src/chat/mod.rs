//! Interactive chat session
//!
//! Line-oriented loop: read user input, send the running history to the
//! server, print the reply, repeat. One request in flight at a time.

pub mod console;

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::client::{ChatClient, ClientError};
use crate::types::{Message, ModelPreset};

/// Maximum history length, in messages (user and assistant combined).
const HISTORY_LIMIT: usize = 20;

/// Words that end the session.
const QUIT_WORDS: &[&str] = &["quit", "exit", "bye"];

/// Drop the oldest messages once the history exceeds the limit.
///
/// Runs after the assistant turn is appended, so the trimmed history always
/// ends on an assistant message.
pub fn trim_history(history: &mut Vec<Message>) {
    if history.len() > HISTORY_LIMIT {
        let excess = history.len() - HISTORY_LIMIT;
        history.drain(..excess);
    }
}

fn is_quit_word(input: &str) -> bool {
    QUIT_WORDS.contains(&input.to_lowercase().as_str())
}

/// Warn about CPU latency and ask for confirmation before launching.
///
/// Returns false when the user declines. Default (empty input) is yes.
pub fn confirm_cpu_mode(preset: &ModelPreset) -> bool {
    console::print_warning(&format!(
        "Running {} on CPU will be slow!",
        preset.name
    ));
    console::print_info(&format!(
        "Each response may take {}",
        preset.cpu_latency_hint
    ));

    print!("Continue? [Y/n]: ");
    let _ = std::io::stdout().flush();

    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    !matches!(answer.trim().to_lowercase().as_str(), "n" | "no")
}

/// Run the chat loop until the user quits or stdin closes.
pub async fn run_chat_loop(client: &ChatClient, preset: &ModelPreset) {
    console::print_info("Ready to chat! Type 'quit' or 'exit' to stop.");
    println!("{}", "-".repeat(60));

    let mut history: Vec<Message> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{}", console::user_prompt());
        let _ = std::io::stdout().flush();

        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = tokio::signal::ctrl_c() => {
                println!();
                console::print_info("Goodbye!");
                return;
            }
        };

        let input = match line {
            Ok(Some(text)) => text.trim().to_string(),
            // stdin closed or unreadable, same as quitting
            Ok(None) | Err(_) => {
                println!();
                console::print_info("Goodbye!");
                return;
            }
        };

        if input.is_empty() {
            continue;
        }
        if is_quit_word(&input) {
            console::print_info("Goodbye!");
            return;
        }

        history.push(Message::user(input));
        console::print_assistant(preset.name, "Thinking...");

        match client.chat_completion(&history, preset).await {
            Ok(reply) => {
                console::print_assistant(preset.name, &reply);
                history.push(Message::assistant(reply));
                trim_history(&mut history);
            }
            Err(e @ ClientError::Timeout) => {
                console::print_error(&e.to_string());
            }
            Err(ClientError::Http { status, body }) => {
                console::print_error(&format!("Server error: {status}"));
                console::print_error(&format!("Response: {body}"));
            }
            Err(e) => {
                console::print_error(&e.to_string());
            }
        }
    }
}
