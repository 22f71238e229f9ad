//! Repository scanning
//!
//! Walks a directory tree, filters entries by extension allow-list and ignore
//! list, and collects a [`FileRecord`] for every match.

pub mod metadata;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::{RampUpError, Result};

pub use metadata::{extract, FileMetadata, FileRecord};

/// Extensions scanned when the user supplies none
pub const DEFAULT_EXTENSIONS: [&str; 8] = [".py", ".js", ".ts", ".html", ".css", ".java", ".cpp", ".cs"];

/// Path fragments excluded from every scan by default
pub const DEFAULT_IGNORE: [&str; 10] = [
    "venv",
    "__pycache__",
    ".git",
    ".idea",
    ".vscode",
    "node_modules",
    ".venv",
    "env",
    ".env",
    ".azure",
];

/// How ignore-list entries are compared against paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IgnoreMatch {
    /// Exclude a file if any fragment occurs anywhere in its full path string.
    /// Note that `env` also excludes `myenvelope/`.
    #[default]
    Substring,
    /// Exclude a file if any path component below the root equals a fragment.
    /// Ignored directories are not descended into.
    Segment,
}

/// What to do when a single file cannot be stat'ed during a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Abort the whole scan with the first error
    #[default]
    FailFast,
    /// Leave the file out, log it, and keep going
    #[serde(rename = "skip")]
    SkipAndLog,
}

/// Inclusion and exclusion rules for a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFilterConfig {
    pub allowed_extensions: BTreeSet<String>,
    pub ignored_substrings: Vec<String>,
    pub ignore_match: IgnoreMatch,
    pub failure_policy: FailurePolicy,
}

impl Default for ScanFilterConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: default_extensions(),
            ignored_substrings: DEFAULT_IGNORE.iter().map(|s| s.to_string()).collect(),
            ignore_match: IgnoreMatch::default(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl ScanFilterConfig {
    /// Replace the allowed extensions with a normalized copy of `extensions`.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let normalized: BTreeSet<String> = extensions
            .into_iter()
            .filter_map(|ext| normalize_extension(ext.as_ref()))
            .collect();
        self.allowed_extensions = if normalized.is_empty() {
            default_extensions()
        } else {
            normalized
        };
        self
    }

    /// Replace the allowed extensions from comma-separated user input.
    pub fn with_extensions_input(mut self, input: &str) -> Self {
        self.allowed_extensions = normalize_extensions(input);
        self
    }

    pub fn with_ignored<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_substrings = fragments.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ignore_match(mut self, mode: IgnoreMatch) -> Self {
        self.ignore_match = mode;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.allowed_extensions.is_empty() {
            return Err(RampUpError::invalid_input("no file extensions to scan for"));
        }
        if let Some(bad) = self.allowed_extensions.iter().find(|e| !e.starts_with('.') || e.len() < 2) {
            return Err(RampUpError::invalid_input(format!("malformed extension {:?}", bad)));
        }
        if self.ignored_substrings.iter().any(|s| s.is_empty()) {
            // An empty fragment would match every path
            return Err(RampUpError::invalid_input("empty entry in ignore list"));
        }
        Ok(())
    }

    /// Whether the file at `path` (under `root`) is excluded by the ignore list
    fn is_ignored(&self, root: &Path, path: &Path) -> bool {
        match self.ignore_match {
            IgnoreMatch::Substring => {
                let full = path.to_string_lossy();
                self.ignored_substrings.iter().any(|s| full.contains(s.as_str()))
            }
            IgnoreMatch::Segment => self.has_ignored_segment(root, path),
        }
    }

    fn has_ignored_segment(&self, root: &Path, path: &Path) -> bool {
        let relative = path.strip_prefix(root).unwrap_or(path);
        relative.iter().any(|part| {
            let part = part.to_string_lossy();
            self.ignored_substrings.iter().any(|s| *s == part)
        })
    }

    fn allows(&self, path: &Path) -> bool {
        self.allowed_extensions.contains(&metadata::suffix_of(path))
    }
}

/// Parse comma-separated extension input such as `"py, .js,ts"`.
///
/// Items are trimmed, empty items dropped, and a leading `.` added where
/// missing. Case is preserved. Falls back to [`DEFAULT_EXTENSIONS`] when
/// nothing usable remains.
pub fn normalize_extensions(input: &str) -> BTreeSet<String> {
    let set: BTreeSet<String> = input.split(',').filter_map(normalize_extension).collect();
    if set.is_empty() {
        default_extensions()
    } else {
        set
    }
}

fn normalize_extension(raw: &str) -> Option<String> {
    let ext = raw.trim();
    match ext {
        "" | "." => None,
        e if e.starts_with('.') => Some(e.to_string()),
        e => Some(format!(".{}", e)),
    }
}

fn default_extensions() -> BTreeSet<String> {
    DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

/// A file left out under [`FailurePolicy::SkipAndLog`]
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of a scan
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub root: PathBuf,
    /// Matched relative paths, sorted lexicographically
    pub files: Vec<String>,
    /// One record per matched file, in the same order as `files`
    pub records: Vec<FileRecord>,
    pub skipped: Vec<SkippedFile>,
    /// Every entry enumerated, directories included
    pub entries_seen: usize,
}

/// Scan `root` without progress reporting.
pub fn scan(root: &Path, config: &ScanFilterConfig) -> Result<ScanOutcome> {
    scan_with_progress(root, config, |_| {})
}

/// Scan `root`, calling `on_progress` with a percentage (0..=100) after
/// every enumerated entry.
pub fn scan_with_progress<F>(root: &Path, config: &ScanFilterConfig, mut on_progress: F) -> Result<ScanOutcome>
where
    F: FnMut(u8),
{
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(RampUpError::invalid_input(format!("{} is not a directory", root.display())));
        }
        Err(_) => {
            return Err(RampUpError::invalid_input(format!("{} does not exist", root.display())));
        }
    }
    config.validate()?;

    debug!(
        root = %root.display(),
        extensions = ?config.allowed_extensions,
        mode = ?config.ignore_match,
        "Starting scan"
    );

    let (entries, mut skipped) = enumerate(root, config)?;
    let total = entries.len();

    let mut records = Vec::new();

    for (processed, entry) in entries.iter().enumerate() {
        let path = entry.path();
        let is_candidate = is_file_entry(entry);

        if is_candidate && config.is_ignored(root, path) {
            debug!(path = %path.display(), "Ignored");
        } else if is_candidate && config.allows(path) {
            let relative = path.strip_prefix(root).unwrap_or(path);
            match extract(root, relative) {
                Ok(record) => records.push(record),
                Err(e) => match config.failure_policy {
                    FailurePolicy::FailFast => return Err(e),
                    FailurePolicy::SkipAndLog => {
                        warn!(path = %path.display(), error = %e, "Skipping unreadable file");
                        skipped.push(SkippedFile {
                            path: path.to_path_buf(),
                            reason: e.to_string(),
                        });
                    }
                },
            }
        }

        on_progress(percent(processed + 1, total));
    }
    on_progress(100);

    records.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    let files = records.iter().map(|r| r.relative_path.clone()).collect();

    info!(
        matched = records.len(),
        skipped = skipped.len(),
        entries = total,
        "Scan complete"
    );

    Ok(ScanOutcome {
        root: root.to_path_buf(),
        files,
        records,
        skipped,
        entries_seen: total,
    })
}

/// Whether `entry` should be treated as a file.
///
/// Decided from the type recorded during the walk, so a file removed since
/// then still reaches [`extract`] and fails there. Symlinks count unless they
/// point at a directory.
fn is_file_entry(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && !entry.path().is_dir())
}

/// Enumerate every entry below `root`, directories included, along with
/// the entries that could not be read under [`FailurePolicy::SkipAndLog`]
fn enumerate(root: &Path, config: &ScanFilterConfig) -> Result<(Vec<DirEntry>, Vec<SkippedFile>)> {
    let walker = WalkDir::new(root).min_depth(1).follow_links(false).into_iter();

    match config.ignore_match {
        IgnoreMatch::Substring => collect_entries(walker, root, config.failure_policy),
        IgnoreMatch::Segment => collect_entries(
            walker.filter_entry(|e| !(e.file_type().is_dir() && config.has_ignored_segment(root, e.path()))),
            root,
            config.failure_policy,
        ),
    }
}

fn collect_entries<I>(iter: I, root: &Path, policy: FailurePolicy) -> Result<(Vec<DirEntry>, Vec<SkippedFile>)>
where
    I: Iterator<Item = walkdir::Result<DirEntry>>,
{
    let mut entries = Vec::new();
    let mut skipped = Vec::new();
    for item in iter {
        match item {
            Ok(entry) => entries.push(entry),
            Err(err) => {
                let (path, err) = walk_error(root, err);
                match policy {
                    FailurePolicy::FailFast => return Err(err),
                    FailurePolicy::SkipAndLog => {
                        warn!(path = %path.display(), error = %err, "Skipping unreadable entry");
                        skipped.push(SkippedFile {
                            path,
                            reason: err.to_string(),
                        });
                    }
                }
            }
        }
    }
    Ok((entries, skipped))
}

fn walk_error(root: &Path, err: walkdir::Error) -> (PathBuf, RampUpError) {
    let path = err.path().unwrap_or(root).to_path_buf();
    let err = match err.into_io_error() {
        Some(source) => RampUpError::from_io(&path, source),
        None => RampUpError::Io {
            path: path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "filesystem loop detected"),
        },
    };
    (path, err)
}

fn percent(processed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (processed * 100 / total).min(100) as u8
}
