//! CLI command implementations

pub mod chat;
pub mod explain;
pub mod files;
pub mod info;
pub mod scan;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::ai::{AzureOpenAiClient, CodeGuide};
use crate::config::Config;
use crate::prompt::PromptBuilder;
use crate::scan::{self as scanner, ScanFilterConfig};
use crate::session::Session;
use crate::ui;

// ANSI color codes shared by all commands
pub(crate) mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const PRIMARY: &str = "\x1b[38;2;100;181;246m";      // #64B5F6
    pub const SUCCESS: &str = "\x1b[38;2;165;214;167m";      // #A5D6A7
    pub const WARNING: &str = "\x1b[38;2;255;245;157m";      // #FFF59D
    pub const ERROR: &str = "\x1b[38;2;239;154;154m";        // #EF9A9A
    pub const AI_ACCENT: &str = "\x1b[38;2;255;202;40m";     // #FFCA28
    pub const MUTED: &str = "\x1b[38;2;84;110;122m";         // #546E7A
    pub const FG: &str = "\x1b[38;2;212;212;215m";           // #D4D4D7
}

pub(crate) mod symbols {
    pub const AI_ICON: &str = "󰌤";
    pub const FILE: &str = "󰈙";
    pub const SUCCESS: &str = "󰄂";
    pub const WARNING: &str = "⚠";
    pub const ERROR: &str = "󰅚";
}

/// Resolve a user-supplied root to an absolute path where possible.
///
/// A path that cannot be canonicalized is passed through unchanged so the
/// scanner reports it as invalid input.
pub(crate) fn resolve_root(root: &str) -> PathBuf {
    let path = Path::new(root);
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Scan `root` with the configured filter and wrap the result in a session
pub(crate) fn open_session(config: &Config, root: &str, extensions: Option<&str>) -> Result<Session> {
    let root = resolve_root(root);
    let filter: ScanFilterConfig = config.scan.filter(extensions);
    let outcome = scanner::scan(&root, &filter)
        .with_context(|| format!("Failed to scan {}", root.display()))?;
    Ok(Session::new(outcome, filter))
}

/// Select `file` in the session, or ask the user to pick one when absent.
///
/// Only files from the current scan results can be selected. Returns `None`
/// if the user cancels the picker.
pub(crate) fn choose_file(session: &mut Session, file: Option<&str>) -> Result<Option<String>> {
    let chosen = match file {
        Some(f) => f.trim_start_matches("./").to_string(),
        None => match ui::pick_file("Choose a file", &session.filter_files(""))? {
            Some(f) => f,
            None => return Ok(None),
        },
    };

    if !session.select(&chosen) {
        anyhow::bail!(
            "{} is not part of the scan results for {}",
            chosen,
            session.root().display()
        );
    }
    Ok(session.selected().map(str::to_string))
}

/// Build the assistant from the Azure settings and prompt cap in `config`
pub(crate) fn build_guide(config: &Config) -> Result<CodeGuide<AzureOpenAiClient>> {
    let client = AzureOpenAiClient::from_config(&config.azure)?;
    Ok(CodeGuide::new(client)
        .with_prompt_builder(PromptBuilder::new().with_content_limit(config.prompt.max_content_bytes)))
}

/// Print a titled, bordered block of text
pub(crate) fn print_block(icon: &str, title: &str, body: &str) {
    println!();
    println!(
        "{}{}  {} {} {}",
        colors::AI_ACCENT, colors::BOLD, icon, title, colors::RESET
    );
    println!("{}  ╭{}─{}", colors::MUTED, "─".repeat(50), colors::RESET);
    for line in body.lines() {
        println!("{}  │ {}{}", colors::MUTED, colors::FG, line);
    }
    println!("{}  ╰{}─{}", colors::MUTED, "─".repeat(50), colors::RESET);
    println!();
}

/// Print error message
pub(crate) fn print_error(message: &str) {
    println!(
        "\n{}  {} Error: {}{}",
        colors::ERROR, symbols::ERROR, message, colors::RESET
    );
}

/// Print warning message
pub(crate) fn print_warning(message: &str) {
    println!(
        "{}  {} {}{}",
        colors::WARNING, symbols::WARNING, message, colors::RESET
    );
}

/// Print success message
pub(crate) fn print_success(message: &str) {
    println!(
        "\n{}  {} {}{}",
        colors::SUCCESS, symbols::SUCCESS, message, colors::RESET
    );
}
