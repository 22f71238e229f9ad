//! Codebase ramp-up assistant
//!
//! Wraps a [`ChatModel`] with the task prompts used to explain a file, suggest
//! learning material for it, and answer questions about it. Every request
//! starts from the context payload so the model always sees the repository
//! summary next to the selected file.

use anyhow::Result;
use std::path::Path;

use super::ChatModel;
use crate::prompt::{ChatMessage, PromptBuilder};
use crate::scan::FileRecord;
use crate::summary;

/// The selected file and the scan it came from
#[derive(Debug, Clone, Copy)]
pub struct FileContext<'a> {
    pub root: &'a Path,
    pub relative_path: &'a str,
    pub summary: &'a [FileRecord],
    pub content: &'a str,
}

/// Assistant that answers questions about a scanned repository
pub struct CodeGuide<M> {
    model: M,
    builder: PromptBuilder,
}

impl<M: ChatModel> CodeGuide<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            builder: PromptBuilder::new(),
        }
    }

    /// Use `builder` (e.g. one with a content cap) for the context payload
    pub fn with_prompt_builder(mut self, builder: PromptBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Hand the whole summary to the model and return its acknowledgement
    pub async fn prime(&self, records: &[FileRecord]) -> Result<String> {
        let summary_json = summary::to_pretty_json(records)?;
        let messages = vec![
            ChatMessage::system(prompts::PRIME),
            ChatMessage::user(format!(
                "Repository structure:\n{}\n\n\
                 Acknowledge that you have processed this repository context and are \
                 ready to answer questions about this codebase.",
                summary_json
            )),
        ];
        self.model.send(&messages).await
    }

    /// Explain purpose, flow and quality of the selected file
    pub async fn analyze(&self, ctx: FileContext<'_>) -> Result<String> {
        let messages = self.compose(ctx, prompts::ANALYZE_ROLE, &[], prompts::ANALYZE_TASK)?;
        self.model.send(&messages).await
    }

    /// Suggest learning material for the concepts the selected file relies on
    pub async fn learning_resources(&self, ctx: FileContext<'_>) -> Result<String> {
        let messages = self.compose(ctx, prompts::LEARN_ROLE, &[], prompts::LEARN_TASK)?;
        self.model.send(&messages).await
    }

    /// Answer `question` about the selected file, given that file's chat so far
    pub async fn ask(&self, ctx: FileContext<'_>, question: &str, history: &[ChatMessage]) -> Result<String> {
        let instruction = format!(
            "{}\n\nFile: {}\n\n{}",
            prompts::ASK_TASK,
            ctx.relative_path,
            question
        );
        let messages = self.compose(ctx, prompts::ASK_ROLE, history, &instruction)?;
        self.model.send(&messages).await
    }

    /// Context payload, then the task persona, the history, and the instruction
    fn compose(
        &self,
        ctx: FileContext<'_>,
        role: &str,
        history: &[ChatMessage],
        instruction: &str,
    ) -> Result<Vec<ChatMessage>> {
        let payload = self.builder.build(
            ctx.root,
            Path::new(ctx.relative_path),
            ctx.summary,
            ctx.content,
        )?;

        let mut messages = payload.messages;
        messages.insert(1, ChatMessage::system(role));
        messages.extend(history.iter().cloned());
        messages.push(ChatMessage::user(instruction));
        Ok(messages)
    }
}

/// Task prompts
pub mod prompts {
    pub const PRIME: &str = "You are an assistant that helps developers ramp up on an unfamiliar repository.";

    pub const ANALYZE_ROLE: &str =
        "You are an assistant that helps a developer understand the given code and briefly explains its flow.";

    pub const ANALYZE_TASK: &str = r#"Using the repository summary and the selected file above, give an analysis covering:

1. **Purpose & Functionality**: what this file does within the repository
2. **Code Flow**: the execution flow and key logic steps
3. **Dependencies**: how it relates to other components in the repository
4. **Key Components**: important classes, functions and variables, and their roles
5. **Potential Issues**: code smells, likely bugs, areas for improvement
6. **Best Practices**: code quality and adherence to security practices

Keep it clear and concise, for a developer who needs to understand this code quickly."#;

    pub const LEARN_ROLE: &str = "You are an assistant that picks out the important technical topics in a piece of code \
and suggests hands-on tutorials so a developer can understand them.";

    pub const LEARN_TASK: &str = r#"Identify the key concepts, frameworks and technologies used in the selected file and across the repository. For each one give:

1. **Concept**: the technology, framework, pattern or idea
2. **Learning Priority**: High, Medium or Low for understanding this codebase
3. **Reference Material**: official documentation, best-practice guides, API references
4. **Video Tutorials**: beginner courses, implementation walkthroughs, conference talks
5. **Hands-on Practice**: step-by-step tutorials, code-along projects, exercises
6. **Code Examples**: repositories or snippets showing the same patterns

Organize the answer by concept and favour practical, actionable resources."#;

    pub const ASK_ROLE: &str = "You are an assistant that answers a developer's questions. \
The context of each question is the repository summary and the selected file shared earlier.";

    pub const ASK_TASK: &str = "Using the repository summary and the selected file above, answer the following.";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::Role;
    use crate::scan::{scan, ScanFilterConfig};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Records every request and answers with a fixed reply
    struct EchoModel {
        requests: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl EchoModel {
        fn new() -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
            }
        }

        fn last(&self) -> Vec<ChatMessage> {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl ChatModel for EchoModel {
        async fn send(&self, messages: &[ChatMessage]) -> Result<String> {
            self.requests.lock().unwrap().push(messages.to_vec());
            Ok("ok".to_string())
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    fn fixture() -> (TempDir, Vec<FileRecord>) {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("app.py"), "print('hi')\n").unwrap();
        let records = scan(dir.path(), &ScanFilterConfig::default()).unwrap().records;
        (dir, records)
    }

    #[tokio::test]
    async fn test_analyze_sends_context_then_task() {
        let (dir, records) = fixture();
        let guide = CodeGuide::new(EchoModel::new());
        let ctx = FileContext {
            root: dir.path(),
            relative_path: "app.py",
            summary: &records,
            content: "print('hi')\n",
        };

        assert_eq!(guide.analyze(ctx).await.unwrap(), "ok");

        let sent = guide.model.last();
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[0].role, Role::System);
        assert_eq!(sent[1].content, prompts::ANALYZE_ROLE);
        assert!(sent[2].content.contains("print('hi')"));
        assert_eq!(sent[3].content, prompts::ANALYZE_TASK);
    }

    #[tokio::test]
    async fn test_ask_includes_history_before_question() {
        let (dir, records) = fixture();
        let guide = CodeGuide::new(EchoModel::new());
        let ctx = FileContext {
            root: dir.path(),
            relative_path: "app.py",
            summary: &records,
            content: "",
        };
        let history = vec![
            ChatMessage::user("what does it print?"),
            ChatMessage::assistant("hi"),
        ];

        guide.ask(ctx, "and why?", &history).await.unwrap();

        let sent = guide.model.last();
        assert_eq!(sent[3], history[0]);
        assert_eq!(sent[4], history[1]);
        let question = sent.last().unwrap();
        assert_eq!(question.role, Role::User);
        assert!(question.content.ends_with("and why?"));
        assert!(question.content.contains("File: app.py"));
    }

    #[tokio::test]
    async fn test_prime_embeds_summary() {
        let (_dir, records) = fixture();
        let guide = CodeGuide::new(EchoModel::new());
        guide.prime(&records).await.unwrap();

        let sent = guide.model.last();
        assert_eq!(sent.len(), 2);
        assert!(sent[1].content.contains("\"file_name\": \"app.py\""));
    }

    #[tokio::test]
    async fn test_learning_resources_uses_learn_prompts() {
        let (dir, records) = fixture();
        let guide = CodeGuide::new(EchoModel::new());
        let ctx = FileContext {
            root: dir.path(),
            relative_path: "app.py",
            summary: &records,
            content: "",
        };
        guide.learning_resources(ctx).await.unwrap();

        let sent = guide.model.last();
        assert_eq!(sent[1].content, prompts::LEARN_ROLE);
        assert_eq!(sent.last().unwrap().content, prompts::LEARN_TASK);
    }
}
