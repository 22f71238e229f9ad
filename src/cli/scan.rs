//! Scan command - walk a folder, write the summary, optionally prime the model

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;

use super::{build_guide, colors, print_block, print_success, print_warning, resolve_root, symbols};
use crate::config::Config;
use crate::scan::{self as scanner, FailurePolicy, IgnoreMatch, ScanOutcome};
use crate::summary;

/// Options for a single scan run
#[derive(Debug, Default)]
pub struct ScanArgs {
    pub root: String,
    pub extensions: Option<String>,
    pub output: Option<String>,
    pub segment_match: bool,
    pub skip_unreadable: bool,
    pub prime: bool,
}

pub async fn run(config: Config, args: ScanArgs) -> Result<()> {
    let start_time = Instant::now();
    let root = resolve_root(&args.root);

    let mut filter = config.scan.filter(args.extensions.as_deref());
    if args.segment_match {
        filter = filter.with_ignore_match(IgnoreMatch::Segment);
    }
    if args.skip_unreadable {
        filter = filter.with_failure_policy(FailurePolicy::SkipAndLog);
    }

    print_header(&root.display().to_string(), &filter.allowed_extensions.iter().cloned().collect::<Vec<_>>());

    let pb = create_progress_bar();
    let outcome = scanner::scan_with_progress(&root, &filter, |percent| pb.set_position(percent as u64));
    pb.finish_and_clear();
    let outcome = outcome.with_context(|| format!("Failed to scan {}", root.display()))?;

    let destination = args.output.as_deref().unwrap_or(&config.scan.summary_file);
    let summary_path = summary::persist(&outcome.records, destination)?;

    print_summary(&outcome, &summary_path.display().to_string(), start_time.elapsed().as_millis());

    if args.prime {
        let guide = build_guide(&config)?;
        tracing::info!("Priming {} with {} records", guide.model_name(), outcome.records.len());
        let ack = guide
            .prime(&outcome.records)
            .await
            .context("Failed to send repository summary to the model")?;
        print_block(symbols::AI_ICON, "Assistant ready", &ack);
    }

    Ok(())
}

/// Create a styled progress bar counting to 100%
fn create_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(100);

    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.cyan} {prefix:.bold} [{bar:40.cyan/dim}] {pos}%")
    {
        pb.set_style(
            style
                .progress_chars("█▓░")
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
    }

    pb.set_prefix("Scanning");
    pb.enable_steady_tick(std::time::Duration::from_millis(80));

    pb
}

fn print_header(root: &str, extensions: &[String]) {
    println!();
    println!(
        "{}{}  {} Scanning: {}{}",
        colors::PRIMARY, colors::BOLD, symbols::FILE, root, colors::RESET
    );
    println!(
        "{}  │ Extensions: {}{}{}",
        colors::MUTED, colors::FG, extensions.join(", "), colors::RESET
    );
    println!("{}  ╰{}─{}", colors::MUTED, "─".repeat(50), colors::RESET);
}

fn print_summary(outcome: &ScanOutcome, summary_path: &str, elapsed_ms: u128) {
    print_success(&format!("Scanned {} code files", outcome.files.len()));
    println!(
        "{}  │ Entries seen: {}{}{}",
        colors::MUTED, colors::FG, outcome.entries_seen, colors::RESET
    );
    println!(
        "{}  │ Summary:      {}{}{}",
        colors::MUTED, colors::FG, summary_path, colors::RESET
    );
    println!(
        "{}  │ Time:         {}{:.2}s{}",
        colors::MUTED, colors::FG, elapsed_ms as f64 / 1000.0, colors::RESET
    );
    println!("{}  ╰{}─{}", colors::MUTED, "─".repeat(50), colors::RESET);

    for file in &outcome.files {
        println!("{}    {}{}", colors::FG, file, colors::RESET);
    }

    if !outcome.skipped.is_empty() {
        println!();
        print_warning(&format!("Skipped {} unreadable files", outcome.skipped.len()));
        for skipped in &outcome.skipped {
            println!(
                "{}    {} ({}){}",
                colors::MUTED,
                skipped.path.display(),
                skipped.reason,
                colors::RESET
            );
        }
    }
    println!();
}
