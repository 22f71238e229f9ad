//! Chat-completion capability and the assistant built on it

pub mod azure;
pub mod guide;

use anyhow::Result;
use async_trait::async_trait;

use crate::prompt::ChatMessage;

pub use azure::AzureOpenAiClient;
pub use guide::CodeGuide;

/// Anything that can answer an ordered message sequence with free text.
///
/// The reply is treated as opaque; nothing parses its structure.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send `messages` and return the model's reply
    async fn send(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Human-readable model name for display
    fn name(&self) -> &str;
}
