//! Azure OpenAI chat-completions client
//!
//! Single request per call. No retries or backoff; the request timeout comes
//! from the config.

#![allow(dead_code)]

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::ChatModel;
use crate::config::AzureConfig;
use crate::prompt::ChatMessage;

/// Azure OpenAI client bound to one deployment
pub struct AzureOpenAiClient {
    client: Client,
    endpoint: String,
    deployment: String,
    api_version: String,
    api_key: String,
}

/// Request body for the chat-completions API
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    messages: &'a [ChatMessage],
}

/// Response from the chat-completions API
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Error envelope returned on non-2xx statuses
#[derive(Debug, Deserialize)]
struct AzureError {
    error: ErrorDetails,
}

#[derive(Debug, Deserialize)]
struct ErrorDetails {
    #[serde(default)]
    code: Option<String>,
    message: String,
}

impl AzureOpenAiClient {
    /// Create a new client
    pub fn new(endpoint: &str, deployment: &str, api_version: &str, api_key: String) -> Result<Self> {
        Self::with_timeout(endpoint, deployment, api_version, api_key, Duration::from_secs(120))
    }

    fn with_timeout(
        endpoint: &str,
        deployment: &str,
        api_version: &str,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self> {
        if endpoint.trim().is_empty() {
            anyhow::bail!("Azure OpenAI endpoint is not configured (azure.endpoint)");
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("rampup/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            deployment: deployment.to_string(),
            api_version: api_version.to_string(),
            api_key,
        })
    }

    /// Create client from config, resolving the API key from the environment first
    pub fn from_config(config: &AzureConfig) -> Result<Self> {
        let api_key = config.resolve_api_key()?;
        Self::with_timeout(
            &config.endpoint,
            &config.deployment_name,
            &config.api_version,
            api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }
}

#[async_trait]
impl ChatModel for AzureOpenAiClient {
    async fn send(&self, messages: &[ChatMessage]) -> Result<String> {
        tracing::debug!(
            deployment = %self.deployment,
            messages = messages.len(),
            "Sending chat completion"
        );

        let response = self
            .client
            .post(self.completions_url())
            .header(header::CONTENT_TYPE, "application/json")
            .header("api-key", &self.api_key)
            .json(&ChatCompletionRequest { messages })
            .send()
            .await
            .context("Failed to send request to Azure OpenAI")?;

        let status = response.status();

        if status.is_success() {
            let body: ChatCompletionResponse = response
                .json()
                .await
                .context("Failed to parse Azure OpenAI response")?;

            body.choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
                .ok_or_else(|| anyhow::anyhow!("No content in Azure OpenAI response"))
        } else {
            let error_text = response.text().await.unwrap_or_default();

            if let Ok(azure_error) = serde_json::from_str::<AzureError>(&error_text) {
                anyhow::bail!(
                    "Azure OpenAI error ({}{}): {}",
                    status,
                    azure_error.error.code.map(|c| format!(", {}", c)).unwrap_or_default(),
                    azure_error.error.message
                );
            }

            anyhow::bail!("Azure OpenAI error ({}): {}", status, error_text);
        }
    }

    fn name(&self) -> &str {
        &self.deployment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> AzureOpenAiClient {
        AzureOpenAiClient::new(&server.uri(), "gpt-4o", "2024-02-15-preview", "secret".to_string()).unwrap()
    }

    #[test]
    fn test_completions_url() {
        let client =
            AzureOpenAiClient::new("https://res.openai.azure.com/", "dep", "2024-02-15-preview", "k".into()).unwrap();
        assert_eq!(
            client.completions_url(),
            "https://res.openai.azure.com/openai/deployments/dep/chat/completions?api-version=2024-02-15-preview"
        );
    }

    #[test]
    fn test_empty_endpoint_rejected() {
        assert!(AzureOpenAiClient::new("  ", "dep", "v", "k".into()).is_err());
    }

    #[tokio::test]
    async fn test_send_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/openai/deployments/gpt-4o/chat/completions"))
            .and(query_param("api-version", "2024-02-15-preview"))
            .and(header("api-key", "secret"))
            .and(body_json(serde_json::json!({
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "hello"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"index": 0, "message": {"role": "assistant", "content": "hi there"}}]
            })))
            .mount(&server)
            .await;

        let reply = client_for(&server)
            .send(&[ChatMessage::system("be brief"), ChatMessage::user("hello")])
            .await
            .unwrap();
        assert_eq!(reply, "hi there");
    }

    #[tokio::test]
    async fn test_error_message_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"code": "401", "message": "Access denied due to invalid subscription key"}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .send(&[ChatMessage::user("hello")])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("invalid subscription key"));
    }

    #[tokio::test]
    async fn test_empty_choices_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })))
            .mount(&server)
            .await;

        assert!(client_for(&server).send(&[ChatMessage::user("x")]).await.is_err());
    }
}
