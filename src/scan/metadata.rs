//! Per-file metadata extraction
//!
//! Reads filesystem stat information only, never file content.

use std::path::{Component, Path};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::{RampUpError, Result};

/// Timestamp layout used in the summary, e.g. `2024-01-15T10:23:04.120000`
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Filesystem facts about one file, taken at scan time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub size_bytes: u64,
    pub last_modified: String,
    pub created_at: String,
    /// Extension with its leading dot, or empty for extensionless files
    pub file_type: String,
}

/// The persisted description of one matched file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub file_name: String,
    pub relative_path: String,
    pub metadata: FileMetadata,
}

/// Build a [`FileRecord`] for `root / relative_path`.
///
/// Fails with [`RampUpError::NotFound`] if the path is missing or is not a
/// regular file.
pub fn extract(root: &Path, relative_path: &Path) -> Result<FileRecord> {
    let full_path = root.join(relative_path);
    let stat = std::fs::metadata(&full_path).map_err(|e| RampUpError::from_io(&full_path, e))?;

    if !stat.is_file() {
        return Err(RampUpError::NotFound { path: full_path });
    }

    let modified = stat
        .modified()
        .map_err(|e| RampUpError::from_io(&full_path, e))?;
    // Not every filesystem records a birth time
    let created = stat.created().unwrap_or(modified);

    let file_name = full_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(FileRecord {
        file_name,
        relative_path: display_relative(relative_path),
        metadata: FileMetadata {
            size_bytes: stat.len(),
            last_modified: format_timestamp(modified),
            created_at: format_timestamp(created),
            file_type: suffix_of(&full_path),
        },
    })
}

/// The extension of `path` including its leading dot, or `""`.
pub fn suffix_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// Render a root-relative path with `/` separators so summaries are identical
/// across platforms.
pub fn display_relative(relative_path: &Path) -> String {
    relative_path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format(TIMESTAMP_FORMAT)
        .to_string()
}
