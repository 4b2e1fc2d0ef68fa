//! LLM API client supporting Anthropic and OpenAI-compatible backends
//!
//! Uses ureq (sync HTTP), no async runtime needed.

use crate::ai::{AiError, AiResult};
use crate::config::{GenerationConfig, UserConfig};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use tracing::debug;

/// Supported LLM backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmBackend {
    #[default]
    Anthropic,
    OpenAi,
}

impl LlmBackend {
    pub fn env_key(&self) -> &'static str {
        match self {
            LlmBackend::Anthropic => "ANTHROPIC_API_KEY",
            LlmBackend::OpenAi => "OPENAI_API_KEY",
        }
    }

    pub fn signup_url(&self) -> &'static str {
        match self {
            LlmBackend::Anthropic => "https://console.anthropic.com/settings/keys",
            LlmBackend::OpenAi => "https://platform.openai.com/api-keys",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            LlmBackend::Anthropic => "claude-sonnet-4-20250514",
            LlmBackend::OpenAi => "gpt-4o",
        }
    }

    pub fn api_url(&self) -> &'static str {
        match self {
            LlmBackend::Anthropic => "https://api.anthropic.com/v1/messages",
            LlmBackend::OpenAi => "https://api.openai.com/v1/chat/completions",
        }
    }
}

impl FromStr for LlmBackend {
    type Err = AiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(LlmBackend::Anthropic),
            "openai" => Ok(LlmBackend::OpenAi),
            other => Err(AiError::ConfigError(format!(
                "Unknown AI backend '{}' (expected anthropic or openai)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub backend: LlmBackend,
    pub model: Option<String>,
    /// Override for OpenAI-compatible servers, e.g. `http://localhost:8080/v1`
    pub base_url: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            backend: LlmBackend::default(),
            model: None,
            base_url: None,
            max_tokens: 8192,
            temperature: 0.7,
        }
    }
}

impl AiConfig {
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.backend.default_model())
    }

    pub fn api_url(&self) -> String {
        match (&self.base_url, self.backend) {
            (Some(base), LlmBackend::OpenAi) => {
                format!("{}/chat/completions", base.trim_end_matches('/'))
            }
            (Some(base), LlmBackend::Anthropic) => {
                format!("{}/messages", base.trim_end_matches('/'))
            }
            (None, backend) => backend.api_url().to_string(),
        }
    }
}

/// Unified LLM client, sync HTTP via ureq
pub struct AiClient {
    config: AiConfig,
    api_key: String,
    agent: ureq::Agent,
}

fn make_agent() -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // Status codes are mapped to AiError below
        .timeout_global(Some(std::time::Duration::from_secs(180))) // Full posts take a while
        .build()
        .new_agent()
}

impl AiClient {
    pub fn new(config: AiConfig, api_key: impl Into<String>) -> Self {
        Self {
            config,
            api_key: api_key.into(),
            agent: make_agent(),
        }
    }

    pub fn from_env(backend: LlmBackend) -> AiResult<Self> {
        let config = AiConfig {
            backend,
            ..Default::default()
        };
        let env_key = backend.env_key();
        let api_key = env::var(env_key).map_err(|_| missing_key(backend))?;
        Ok(Self::new(config, api_key))
    }

    /// Build from user config (keys, backend) and project generation defaults
    pub fn from_config(user: &UserConfig, generation: &GenerationConfig) -> AiResult<Self> {
        let backend: LlmBackend = user.ai_backend().parse()?;
        let api_key = user.ai_api_key().ok_or_else(|| missing_key(backend))?;
        let config = AiConfig {
            backend,
            model: generation.model.clone().or_else(|| user.ai.model.clone()),
            base_url: user.ai.base_url.clone(),
            max_tokens: generation.max_tokens,
            ..Default::default()
        };
        Ok(Self::new(config, api_key))
    }

    pub fn backend(&self) -> LlmBackend {
        self.config.backend
    }

    pub fn model(&self) -> &str {
        self.config.model()
    }

    /// Generate a response (sync)
    pub fn generate(&self, messages: Vec<Message>, system: Option<&str>) -> AiResult<String> {
        debug!(
            "Requesting completion from {:?} ({})",
            self.config.backend,
            self.model()
        );
        match self.config.backend {
            LlmBackend::OpenAi => self.generate_openai(messages, system),
            LlmBackend::Anthropic => self.generate_anthropic(messages, system),
        }
    }

    fn generate_openai(
        &self,
        mut messages: Vec<Message>,
        system: Option<&str>,
    ) -> AiResult<String> {
        if let Some(sys) = system {
            messages.insert(0, Message::system(sys));
        }

        let body = OpenAiRequest {
            model: self.config.model().to_string(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self
            .agent
            .post(&self.config.api_url())
            .header("Content-Type", "application/json")
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(&body)
            .map_err(|e| AiError::RequestFailed(e.to_string()))?;

        let resp: OpenAiResponse = read_checked(response)?;
        resp.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AiError::ParseError("No response choices".to_string()))
    }

    fn generate_anthropic(&self, messages: Vec<Message>, system: Option<&str>) -> AiResult<String> {
        let messages: Vec<_> = messages
            .into_iter()
            .filter(|m| m.role != Role::System)
            .collect();

        let body = AnthropicRequest {
            model: self.config.model().to_string(),
            max_tokens: self.config.max_tokens,
            messages,
            system: system.map(|s| s.to_string()),
            temperature: Some(self.config.temperature),
        };

        let response = self
            .agent
            .post(&self.config.api_url())
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .send_json(&body)
            .map_err(|e| AiError::RequestFailed(e.to_string()))?;

        let resp: AnthropicResponse = read_checked(response)?;
        resp.content
            .into_iter()
            .find(|c| c.content_type == "text")
            .map(|c| c.text)
            .ok_or_else(|| AiError::ParseError("No text content in response".to_string()))
    }
}

fn missing_key(backend: LlmBackend) -> AiError {
    AiError::MissingApiKey {
        env_var: backend.env_key().to_string(),
        signup_url: backend.signup_url().to_string(),
    }
}

fn read_checked<T: serde::de::DeserializeOwned>(
    response: ureq::http::Response<ureq::Body>,
) -> AiResult<T> {
    let status = response.status().as_u16();
    if status >= 400 {
        let error_text = response.into_body().read_to_string().unwrap_or_default();
        return Err(AiError::ApiError {
            status,
            message: error_text,
        });
    }
    response
        .into_body()
        .read_json()
        .map_err(|e| AiError::ParseError(e.to_string()))
}

// OpenAI API types
#[derive(Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: String,
}

// Anthropic API types
#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

#[derive(Deserialize)]
struct AnthropicContent {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_defaults() {
        assert_eq!(LlmBackend::OpenAi.default_model(), "gpt-4o");
        assert_eq!(
            LlmBackend::Anthropic.default_model(),
            "claude-sonnet-4-20250514"
        );
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("Claude".parse::<LlmBackend>().unwrap(), LlmBackend::Anthropic);
        assert_eq!("openai".parse::<LlmBackend>().unwrap(), LlmBackend::OpenAi);
        assert!(matches!(
            "ollama".parse::<LlmBackend>(),
            Err(AiError::ConfigError(_))
        ));
    }

    #[test]
    fn test_config_model_and_url() {
        let config = AiConfig::default();
        assert_eq!(config.model(), "claude-sonnet-4-20250514");
        assert_eq!(config.api_url(), "https://api.anthropic.com/v1/messages");

        let config = AiConfig {
            backend: LlmBackend::OpenAi,
            model: Some("custom-model".to_string()),
            base_url: Some("http://localhost:8080/v1/".to_string()),
            ..Default::default()
        };
        assert_eq!(config.model(), "custom-model");
        assert_eq!(config.api_url(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_from_config_requires_key() {
        let user = UserConfig::default();
        let err = AiClient::from_config(&user, &GenerationConfig::default()).err();
        assert!(matches!(err, Some(AiError::MissingApiKey { .. })));
    }

    #[test]
    fn test_from_config_prefers_project_model() {
        let mut user = UserConfig::default();
        user.ai.anthropic_api_key = Some("sk-ant-test".into());
        user.ai.model = Some("user-model".into());
        let generation = GenerationConfig {
            model: Some("project-model".into()),
            max_tokens: 1024,
        };
        let client = AiClient::from_config(&user, &generation).unwrap();
        assert_eq!(client.backend(), LlmBackend::Anthropic);
        assert_eq!(client.model(), "project-model");
    }

    #[test]
    fn test_unreachable_server_is_request_error() {
        let config = AiConfig {
            backend: LlmBackend::OpenAi,
            base_url: Some("http://127.0.0.1:1".into()),
            ..Default::default()
        };
        let client = AiClient::new(config, "key");
        let err = client.generate(vec![Message::user("hi")], None).unwrap_err();
        assert!(matches!(err, AiError::RequestFailed(_)));
    }
}
