//! Files command - list and filter files from a persisted summary

use anyhow::{Context, Result};
use std::path::PathBuf;

use super::{colors, print_warning};
use crate::config::Config;
use crate::summary;

pub fn run(config: &Config, summary_path: Option<&str>, filter: Option<&str>) -> Result<()> {
    let path = PathBuf::from(summary_path.unwrap_or(&config.scan.summary_file));
    let records = summary::load(&path)
        .with_context(|| format!("Failed to load summary {}; run `rampup scan` first", path.display()))?;

    let query = filter.unwrap_or("").to_lowercase();
    let matching: Vec<_> = records
        .iter()
        .filter(|r| r.relative_path.to_lowercase().contains(&query))
        .collect();

    if matching.is_empty() {
        print_warning("No matching files found.");
        return Ok(());
    }

    println!(
        "{}Showing {} of {} files{}",
        colors::MUTED,
        matching.len(),
        records.len(),
        colors::RESET
    );
    for record in matching {
        println!(
            "{}{:<60}{} {}{:>10} B{}",
            colors::FG,
            record.relative_path,
            colors::RESET,
            colors::MUTED,
            record.metadata.size_bytes,
            colors::RESET
        );
    }

    Ok(())
}
