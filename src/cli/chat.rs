//! Interactive chat about a single file
//!
//! Each file keeps its own history inside the [`Session`], so switching files
//! with `/file` and coming back resumes the earlier conversation.

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;

use super::{
    build_guide, choose_file, colors, open_session, print_error, print_success, symbols,
};
use crate::ai::guide::FileContext;
use crate::ai::{AzureOpenAiClient, CodeGuide};
use crate::config::Config;
use crate::prompt::{read_file_content, ChatMessage, Role};
use crate::scan as scanner;
use crate::session::Session;

/// What the loop should do after a slash command
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
    SwitchFile,
    Rescan,
}

/// Print a horizontal divider
fn print_divider() {
    println!("{}{}{}", colors::MUTED, "─".repeat(55), colors::RESET);
}

/// Print one chat message bubble
fn print_message(message: &ChatMessage) {
    let (label, color) = match message.role {
        Role::Assistant => (format!("{} Assistant", symbols::AI_ICON), colors::AI_ACCENT),
        _ => ("You".to_string(), colors::PRIMARY),
    };
    println!();
    println!("{}{}  {} {}", color, colors::BOLD, label, colors::RESET);
    for line in message.content.lines() {
        println!("{}  │ {}{}", colors::MUTED, colors::FG, line);
    }
    println!("{}  ╰{}─{}", colors::MUTED, "─".repeat(50), colors::RESET);
}

/// Print thinking indicator
fn print_thinking() {
    print!(
        "\r{}  {} Thinking ⠋{}",
        colors::AI_ACCENT, symbols::AI_ICON, colors::RESET
    );
    io::stdout().flush().ok();
}

/// Clear thinking indicator
fn clear_thinking() {
    print!("\r{}\r", " ".repeat(50));
    io::stdout().flush().ok();
}

/// Print help information
fn print_help() {
    println!();
    println!(
        "{}{}  Available Commands:{}",
        colors::PRIMARY, colors::BOLD, colors::RESET
    );
    println!("{}  /help{}    - Show this help message", colors::FG, colors::MUTED);
    println!("{}  /clear{}   - Clear this file's conversation", colors::FG, colors::MUTED);
    println!("{}  /file{}    - Switch to another file", colors::FG, colors::MUTED);
    println!("{}  /rescan{}  - Rescan the folder", colors::FG, colors::MUTED);
    println!("{}  /exit{}    - Exit the chat", colors::FG, colors::MUTED);
    println!();
    println!(
        "{}  Type your message and press Enter twice to send{}",
        colors::MUTED, colors::RESET
    );
    println!();
}

/// Read multi-line input from user; a blank line ends the message
fn read_input(file: &str) -> Option<String> {
    print!(
        "\n{}  {} > {}",
        colors::PRIMARY, file, colors::RESET
    );
    io::stdout().flush().ok();

    let mut lines = Vec::new();

    loop {
        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {
                let trimmed = line.trim_end();
                if trimmed.is_empty() {
                    if !lines.is_empty() {
                        break;
                    }
                } else {
                    lines.push(trimmed.to_string());
                    // Slash commands are single-line
                    if lines.len() == 1 && trimmed.starts_with('/') {
                        break;
                    }
                    print!("{}  . {}", colors::MUTED, colors::RESET);
                    io::stdout().flush().ok();
                }
            }
            Err(_) => return None,
        }
    }

    let input = lines.join("\n").trim().to_string();
    if input.is_empty() {
        None
    } else {
        Some(input)
    }
}

/// Interpret a slash command; `None` if `input` is a normal message
fn handle_command(input: &str, session: &mut Session, file: &str) -> Option<Flow> {
    if !input.starts_with('/') {
        return None;
    }

    let flow = match input.to_lowercase().as_str() {
        "/exit" | "/quit" | "/q" => {
            print_success("Goodbye! Happy learning!");
            Flow::Exit
        }
        "/help" | "/h" | "/?" => {
            print_help();
            Flow::Continue
        }
        "/clear" | "/c" => {
            session.clear_chat(file);
            print_success("Conversation cleared");
            Flow::Continue
        }
        "/file" | "/f" => Flow::SwitchFile,
        "/rescan" | "/r" => Flow::Rescan,
        _ => {
            print_error(&format!("Unknown command: {}", input));
            println!("{}  Type /help for available commands{}", colors::MUTED, colors::RESET);
            Flow::Continue
        }
    };
    Some(flow)
}

pub async fn run(config: Config, root: &str, file: Option<&str>, extensions: Option<&str>) -> Result<()> {
    let mut session = open_session(&config, root, extensions)?;
    let guide = build_guide(&config)?;

    let Some(mut current) = choose_file(&mut session, file)? else {
        print_error("No file selected");
        return Ok(());
    };

    print_banner(guide.model_name(), session.files().len());

    loop {
        print_divider();
        for message in session.chat(&current).iter() {
            print_message(message);
        }

        match converse(&guide, &mut session, &current).await? {
            Flow::Exit => break,
            Flow::SwitchFile => {
                if let Some(next) = choose_file(&mut session, None)? {
                    current = next;
                }
            }
            Flow::Rescan => {
                let filter = session.filter().clone();
                let outcome = scanner::scan(session.root(), &filter)
                    .with_context(|| format!("Failed to rescan {}", session.root().display()))?;
                print_success(&format!("Rescanned {} code files", outcome.files.len()));
                session.replace_scan(outcome, filter);
                if session.selected().is_none() {
                    match choose_file(&mut session, None)? {
                        Some(next) => current = next,
                        None => break,
                    }
                }
            }
            Flow::Continue => {}
        }
    }

    println!();
    Ok(())
}

/// Chat about `file` until a command asks to leave this file
async fn converse(guide: &CodeGuide<AzureOpenAiClient>, session: &mut Session, file: &str) -> Result<Flow> {
    loop {
        let Some(input) = read_input(file) else {
            return Ok(Flow::Exit);
        };

        if let Some(flow) = handle_command(&input, session, file) {
            if flow == Flow::Continue {
                continue;
            }
            return Ok(flow);
        }

        // Re-read every turn so edits made while chatting are picked up
        let content = match read_file_content(session.root(), Path::new(file)) {
            Ok(c) => c,
            Err(e) => {
                print_error(&e.to_string());
                continue;
            }
        };

        let history = session.chat(file).clone();
        let ctx = FileContext {
            root: session.root(),
            relative_path: file,
            summary: session.records(),
            content: &content,
        };

        print_thinking();
        let reply = guide.ask(ctx, &input, &history).await;
        clear_thinking();

        match reply {
            Ok(response) => {
                let question = ChatMessage::user(input);
                let answer = ChatMessage::assistant(response);
                print_message(&answer);
                let chat = session.chat(file);
                chat.push(question);
                chat.push(answer);
            }
            Err(e) => print_error(&format!("AI error: {:#}", e)),
        }
    }
}

fn print_banner(model: &str, file_count: usize) {
    println!();
    println!(
        "{}{}╭─────────────────────────────────────────────────────╮{}",
        colors::PRIMARY, colors::BOLD, colors::RESET
    );
    println!(
        "{}│{}  {} rampup chat                                      {}│{}",
        colors::PRIMARY, colors::RESET, symbols::AI_ICON, colors::PRIMARY, colors::RESET
    );
    println!(
        "{}╰─────────────────────────────────────────────────────╯{}",
        colors::PRIMARY, colors::RESET
    );
    println!(
        "{}  Model: {} · {} files in scope{}",
        colors::AI_ACCENT, model, file_count, colors::RESET
    );
    println!(
        "{}  Commands: /help, /clear, /file, /rescan, /exit{}",
        colors::MUTED, colors::RESET
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::{ScanFilterConfig, ScanOutcome};
    use std::path::PathBuf;

    fn session() -> Session {
        Session::new(
            ScanOutcome {
                root: PathBuf::from("/repo"),
                files: vec!["main.py".to_string()],
                records: Vec::new(),
                skipped: Vec::new(),
                entries_seen: 1,
            },
            ScanFilterConfig::default(),
        )
    }

    #[test]
    fn test_plain_text_is_not_a_command() {
        let mut s = session();
        assert_eq!(handle_command("what does main do?", &mut s, "main.py"), None);
    }

    #[test]
    fn test_commands_map_to_flow() {
        let mut s = session();
        assert_eq!(handle_command("/exit", &mut s, "main.py"), Some(Flow::Exit));
        assert_eq!(handle_command("/FILE", &mut s, "main.py"), Some(Flow::SwitchFile));
        assert_eq!(handle_command("/rescan", &mut s, "main.py"), Some(Flow::Rescan));
        assert_eq!(handle_command("/bogus", &mut s, "main.py"), Some(Flow::Continue));
    }

    #[test]
    fn test_clear_resets_history() {
        let mut s = session();
        s.chat("main.py").push(ChatMessage::user("hi"));
        assert_eq!(handle_command("/clear", &mut s, "main.py"), Some(Flow::Continue));
        assert_eq!(s.chat("main.py").len(), 1);
    }
}
