//! OpenAI integration
//!
//! [`Summarizer`] is the seam used by the context composer and the summary
//! endpoints; [`OpenAIAgent`] implements it with chat completions.

use async_openai::config::OpenAIConfig;
use async_openai::types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs};
use async_openai::Client;
use async_trait::async_trait;
use tracing::debug;

use crate::config::OpenAiConfig;
use crate::error::{NavigatorError, Result};

/// Turns a natural-language prompt into a short answer
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Sends `prompt` and returns the trimmed answer
    async fn summarize(&self, prompt: &str) -> Result<String>;
}

/// Generation settings for the agent
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Model to use
    pub model: String,
    /// Maximum completion tokens per request
    pub max_tokens: u32,
    /// Temperature for response generation
    pub temperature: f32,
}

/// OpenAI chat completion client
///
/// Without an API key the agent still constructs, but every call fails with a
/// configuration error before any network traffic.
#[derive(Clone)]
pub struct OpenAIAgent {
    client: Option<Client<OpenAIConfig>>,
    config: AgentConfig,
}

impl OpenAIAgent {
    /// Creates an agent from the AI section of the configuration
    pub fn new(config: &OpenAiConfig) -> Self {
        let client = config.api_key.as_ref().map(|key| {
            let mut openai = OpenAIConfig::new().with_api_key(key);
            if let Some(base) = &config.api_base {
                openai = openai.with_api_base(base);
            }
            Client::with_config(openai)
        });

        Self {
            client,
            config: AgentConfig {
                model: config.model.clone(),
                max_tokens: config.max_tokens,
                temperature: config.temperature,
            },
        }
    }

    /// Whether an API key was supplied
    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Generation settings in use
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }
}

#[async_trait]
impl Summarizer for OpenAIAgent {
    async fn summarize(&self, prompt: &str) -> Result<String> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| NavigatorError::Config("OpenAI API key not configured.".into()))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.model)
            .messages([ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()?
                .into()])
            .max_completion_tokens(self.config.max_tokens)
            .temperature(self.config.temperature)
            .build()?;

        debug!(model = %self.config.model, prompt_chars = prompt.len(), "chat completion request");
        let response = client
            .chat()
            .create(request)
            .await
            .map_err(|e| NavigatorError::ExternalApi(format!("OpenAI API error: {}", e)))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| {
                NavigatorError::ExternalApi("OpenAI returned an empty completion".into())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn test_unconfigured_agent_fails_without_calling_out() {
        let agent = OpenAIAgent::new(&OpenAiConfig::default());
        assert!(!agent.is_configured());

        let err = agent.summarize("hello").await.unwrap_err();
        assert!(matches!(err, NavigatorError::Config(_)));
        assert_eq!(err.kind(), ErrorKind::ExternalApiError);
        assert_eq!(err.to_string(), "Config error: OpenAI API key not configured.");
    }

    #[test]
    fn test_configured_agent() {
        let config = OpenAiConfig {
            api_key: Some("sk-test".into()),
            api_base: Some("http://127.0.0.1:9/v1".into()),
            model: "gpt-4o-mini".into(),
            ..OpenAiConfig::default()
        };
        let agent = OpenAIAgent::new(&config);
        assert!(agent.is_configured());
        assert_eq!(agent.config().model, "gpt-4o-mini");
        assert_eq!(agent.config().max_tokens, 128);
    }
}
