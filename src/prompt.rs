//! Context prompt construction
//!
//! Turns the repository summary plus one selected file into a message payload
//! for a chat-completion call. Builds data only; nothing here talks to the
//! network.

#![allow(dead_code)]

use std::borrow::Cow;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RampUpError, Result};
use crate::scan::{extract, FileRecord};
use crate::summary;

const SYSTEM_PROMPT: &str = "You are an AI code assistant.";

/// Message role in a chat payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in a chat payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered role/content sequence handed to a chat model
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessagePayload {
    pub messages: Vec<ChatMessage>,
}

impl MessagePayload {
    /// Content of the first user message
    pub fn user_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }
}

/// Builds the context payload for a selected file
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    max_content_bytes: Option<usize>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap embedded file content at `max_bytes`. Zero means no cap.
    pub fn with_content_limit(mut self, max_bytes: usize) -> Self {
        self.max_content_bytes = (max_bytes > 0).then_some(max_bytes);
        self
    }

    /// Build a two-message payload: the system role, then one user message
    /// holding the summary, the selected file's fresh record, and its content.
    ///
    /// The record is re-extracted from disk instead of looked up in
    /// `overall_summary` so that it reflects the file as it is now.
    pub fn build(
        &self,
        root: &Path,
        selected: &Path,
        overall_summary: &[FileRecord],
        file_content: &str,
    ) -> Result<MessagePayload> {
        let detail = extract(root, selected)?;
        let summary_json = summary::to_pretty_json(overall_summary)?;
        let metadata_json = serde_json::to_string_pretty(&detail.metadata).map_err(|source| RampUpError::Render {
            what: format!("metadata for {}", detail.relative_path),
            source,
        })?;

        let content = match self.max_content_bytes {
            Some(max) => truncate_content(file_content, max),
            None => Cow::Borrowed(file_content),
        };

        let user = format!(
            "Here is the summary of the overall repo:\n{}\n\n\
             Now analyze this selected file:\n\n\
             File name: {}\n\
             Relative path: {}\n\
             Metadata: {}\n\
             Content:\n{}",
            summary_json, detail.file_name, detail.relative_path, metadata_json, content
        );

        Ok(MessagePayload {
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(user)],
        })
    }
}

/// Build an uncapped payload for `selected`. See [`PromptBuilder::build`].
pub fn build_prompt(
    root: &Path,
    selected: &Path,
    overall_summary: &[FileRecord],
    file_content: &str,
) -> Result<MessagePayload> {
    PromptBuilder::new().build(root, selected, overall_summary, file_content)
}

/// Read a scanned file as UTF-8 text.
pub fn read_file_content(root: &Path, relative_path: &Path) -> Result<String> {
    let path = root.join(relative_path);
    std::fs::read_to_string(&path).map_err(|e| RampUpError::from_io(&path, e))
}

/// Cut `content` to at most `max_bytes` on a char boundary and append a marker
/// saying how much was dropped.
fn truncate_content(content: &str, max_bytes: usize) -> Cow<'_, str> {
    if content.len() <= max_bytes {
        return Cow::Borrowed(content);
    }
    let mut end = max_bytes;
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    Cow::Owned(format!(
        "{}\n[... truncated {} bytes ...]",
        &content[..end],
        content.len() - end
    ))
}
