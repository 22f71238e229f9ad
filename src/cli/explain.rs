//! Explain and learn commands - analysis or learning resources for one file

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;

use super::{build_guide, choose_file, colors, open_session, print_block, print_error, symbols};
use crate::ai::guide::FileContext;
use crate::config::Config;
use crate::prompt::read_file_content;

/// What to ask the model about the selected file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Analyze,
    Learn,
}

impl Mode {
    fn title(self) -> &'static str {
        match self {
            Mode::Analyze => "Code Analysis",
            Mode::Learn => "Learning Resources",
        }
    }
}

pub async fn run(
    config: Config,
    root: &str,
    file: Option<&str>,
    extensions: Option<&str>,
    mode: Mode,
) -> Result<()> {
    let mut session = open_session(&config, root, extensions)?;

    let Some(selected) = choose_file(&mut session, file)? else {
        print_error("No file selected");
        return Ok(());
    };

    print_header(&selected, mode);

    let guide = build_guide(&config)?;
    let content = read_file_content(session.root(), Path::new(&selected))
        .with_context(|| format!("Failed to read {}", selected))?;

    let ctx = FileContext {
        root: session.root(),
        relative_path: &selected,
        summary: session.records(),
        content: &content,
    };

    print_thinking();
    let reply = match mode {
        Mode::Analyze => guide.analyze(ctx).await,
        Mode::Learn => guide.learning_resources(ctx).await,
    };
    clear_line();

    match reply {
        Ok(text) => print_block(symbols::AI_ICON, mode.title(), &text),
        Err(e) => print_error(&format!("AI error: {:#}", e)),
    }

    Ok(())
}

fn print_header(target: &str, mode: Mode) {
    println!();
    println!(
        "{}{}  {} {}{}",
        colors::PRIMARY, colors::BOLD, symbols::FILE, target, colors::RESET
    );
    println!(
        "{}  │ Mode: {}{}{}",
        colors::MUTED, colors::FG, mode.title(), colors::RESET
    );
    println!("{}  ╰{}─{}", colors::MUTED, "─".repeat(50), colors::RESET);
}

/// Print thinking indicator
fn print_thinking() {
    print!(
        "\r{}  {} Analyzing code ⠋{}",
        colors::AI_ACCENT,
        symbols::AI_ICON,
        colors::RESET
    );
    io::stdout().flush().ok();
}

/// Clear the current line
fn clear_line() {
    print!("\r{}\r", " ".repeat(60));
    io::stdout().flush().ok();
}
