//! Repository summary persistence
//!
//! The summary is a pretty-printed JSON array of [`FileRecord`]s, rewritten
//! wholesale on every scan.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{RampUpError, Result};
use crate::scan::FileRecord;

pub const DEFAULT_SUMMARY_FILE: &str = "repo_summary.json";

/// Write `records` to `destination` (relative names resolve against the
/// current directory) and return the absolute path written.
///
/// Existing files are overwritten. The write is not atomic; a crash mid-write
/// can leave a truncated file behind.
pub fn persist(records: &[FileRecord], destination: &str) -> Result<PathBuf> {
    let path = resolve(destination)?;

    let json = serde_json::to_string_pretty(records).map_err(|source| RampUpError::Serialization {
        path: path.clone(),
        source,
    })?;

    std::fs::write(&path, json).map_err(|source| RampUpError::Io {
        path: path.clone(),
        source,
    })?;

    debug!(path = %path.display(), records = records.len(), "Summary written");
    Ok(path)
}

/// Read a summary written by [`persist`].
pub fn load(path: &Path) -> Result<Vec<FileRecord>> {
    let content = std::fs::read_to_string(path).map_err(|e| RampUpError::from_io(path, e))?;
    serde_json::from_str(&content).map_err(|source| RampUpError::Serialization {
        path: path.to_path_buf(),
        source,
    })
}

/// Render records the way they are embedded in prompts
pub fn to_pretty_json(records: &[FileRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).map_err(|source| RampUpError::Render {
        what: "repository summary".to_string(),
        source,
    })
}

fn resolve(destination: &str) -> Result<PathBuf> {
    if destination.trim().is_empty() {
        return Err(RampUpError::invalid_input("summary file name is empty"));
    }
    let path = Path::new(destination);
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|source| RampUpError::Io {
        path: PathBuf::from("."),
        source,
    })?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::FileMetadata;
    use tempfile::TempDir;

    fn record(name: &str, size: u64) -> FileRecord {
        FileRecord {
            file_name: name.to_string(),
            relative_path: format!("azure_agents/{}", name),
            metadata: FileMetadata {
                size_bytes: size,
                last_modified: "2024-01-15T10:23:04.120000".to_string(),
                created_at: "2024-01-10T08:00:00.000000".to_string(),
                file_type: ".py".to_string(),
            },
        }
    }

    #[test]
    fn test_persist_then_load_is_lossless() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("summary.json");
        let records = vec![record("agents.py", 4312), record("__init__.py", 0)];

        let written = persist(&records, target.to_str().unwrap()).unwrap();
        assert_eq!(written, target);
        assert_eq!(load(&written).unwrap(), records);
    }

    #[test]
    fn test_persisted_layout() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("repo_summary.json");
        persist(&[record("agents.py", 4312)], target.to_str().unwrap()).unwrap();

        let raw = std::fs::read_to_string(&target).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let first = &value.as_array().unwrap()[0];
        assert_eq!(first["file_name"], "agents.py");
        assert_eq!(first["relative_path"], "azure_agents/agents.py");
        assert_eq!(first["metadata"]["size_bytes"], 4312);
        assert_eq!(first["metadata"]["file_type"], ".py");
        // Indented for humans
        assert!(raw.contains("\n  {"));
    }

    #[test]
    fn test_persist_overwrites() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("repo_summary.json");
        let name = target.to_str().unwrap();
        persist(&[record("a.py", 1), record("b.py", 2)], name).unwrap();
        persist(&[record("c.py", 3)], name).unwrap();

        let loaded = load(&target).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].file_name, "c.py");
    }

    #[test]
    fn test_unwritable_destination_is_io_error() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("missing-dir").join("summary.json");
        let err = persist(&[], target.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, RampUpError::Io { .. }));
    }

    #[test]
    fn test_relative_name_resolves_to_absolute() {
        let path = resolve(DEFAULT_SUMMARY_FILE).unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with(DEFAULT_SUMMARY_FILE));
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("broken.json");
        std::fs::write(&target, "[{\"file_name\": ").unwrap();
        let err = load(&target).unwrap_err();
        assert!(matches!(err, RampUpError::Serialization { .. }));
    }
}
