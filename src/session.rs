//! Interactive session state
//!
//! Holds the latest scan, the selected file and per-file chat histories for
//! one interactive run. Passed explicitly to the command handlers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::prompt::ChatMessage;
use crate::scan::{FileRecord, ScanFilterConfig, ScanOutcome};

pub struct Session {
    root: PathBuf,
    filter: ScanFilterConfig,
    files: Vec<String>,
    records: Vec<FileRecord>,
    selected: Option<String>,
    chats: HashMap<String, Vec<ChatMessage>>,
}

impl Session {
    pub fn new(outcome: ScanOutcome, filter: ScanFilterConfig) -> Self {
        Self {
            root: outcome.root,
            filter,
            files: outcome.files,
            records: outcome.records,
            selected: None,
            chats: HashMap::new(),
        }
    }

    /// Replace scan results wholesale, keeping the selection only if the file
    /// is still present. Chat histories for vanished files are dropped.
    pub fn replace_scan(&mut self, outcome: ScanOutcome, filter: ScanFilterConfig) {
        self.root = outcome.root;
        self.filter = filter;
        self.files = outcome.files;
        self.records = outcome.records;

        let files = &self.files;
        if let Some(sel) = &self.selected {
            if !files.contains(sel) {
                self.selected = None;
            }
        }
        self.chats.retain(|path, _| files.contains(path));
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn filter(&self) -> &ScanFilterConfig {
        &self.filter
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    /// Files whose path contains `query`, ignoring case
    pub fn filter_files(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();
        self.files
            .iter()
            .filter(|f| f.to_lowercase().contains(&query))
            .map(String::as_str)
            .collect()
    }

    /// Select `file`; returns false if it is not part of the current scan
    pub fn select(&mut self, file: &str) -> bool {
        if self.files.iter().any(|f| f == file) {
            self.selected = Some(file.to_string());
            true
        } else {
            false
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Chat history for `file`, seeded with a greeting on first use
    pub fn chat(&mut self, file: &str) -> &mut Vec<ChatMessage> {
        self.chats.entry(file.to_string()).or_insert_with(|| {
            vec![ChatMessage::user(format!(
                "Hi! I'm analyzing the file `{}`. What would you like to know about this code?",
                file
            ))]
        })
    }

    pub fn clear_chat(&mut self, file: &str) {
        self.chats.remove(file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(files: &[&str]) -> ScanOutcome {
        ScanOutcome {
            root: PathBuf::from("/repo"),
            files: files.iter().map(|s| s.to_string()).collect(),
            records: Vec::new(),
            skipped: Vec::new(),
            entries_seen: files.len(),
        }
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let session = Session::new(outcome(&["src/Agents.py", "main.py", "util/helpers.js"]), ScanFilterConfig::default());
        assert_eq!(session.filter_files("AGENT"), vec!["src/Agents.py"]);
        assert_eq!(session.filter_files("").len(), 3);
        assert!(session.filter_files("zzz").is_empty());
    }

    #[test]
    fn test_select_requires_known_file() {
        let mut session = Session::new(outcome(&["main.py"]), ScanFilterConfig::default());
        assert!(!session.select("other.py"));
        assert!(session.select("main.py"));
        assert_eq!(session.selected(), Some("main.py"));
    }

    #[test]
    fn test_chat_histories_are_per_file() {
        let mut session = Session::new(outcome(&["a.py", "b.py"]), ScanFilterConfig::default());
        session.chat("a.py").push(ChatMessage::user("question"));
        assert_eq!(session.chat("a.py").len(), 2);
        assert_eq!(session.chat("b.py").len(), 1);
        assert!(session.chat("b.py")[0].content.contains("`b.py`"));

        session.clear_chat("a.py");
        assert_eq!(session.chat("a.py").len(), 1);
    }

    #[test]
    fn test_rescan_drops_stale_state() {
        let mut session = Session::new(outcome(&["a.py", "b.py"]), ScanFilterConfig::default());
        session.select("a.py");
        session.chat("a.py");
        session.chat("b.py");

        session.replace_scan(outcome(&["b.py"]), ScanFilterConfig::default());
        assert_eq!(session.selected(), None);
        assert_eq!(session.files(), ["b.py".to_string()]);
        assert_eq!(session.chat("b.py").len(), 1);
    }
}
