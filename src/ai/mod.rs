//! LLM-backed post generation
//!
//! Supports Anthropic and OpenAI-compatible backends. Uses BYOK (bring your
//! own key): API keys come from the user config or environment variables.
//!
//! # Environment Variables
//!
//! - `ANTHROPIC_API_KEY`: Required for the Anthropic backend
//! - `OPENAI_API_KEY`: Required for the OpenAI backend
//!
//! # Example
//!
//! ```rust,ignore
//! use blogforge::ai::{AiClient, ContentGenerator, LlmBackend, LlmGenerator};
//!
//! let client = AiClient::from_env(LlmBackend::Anthropic)?;
//! let post = LlmGenerator::new(client).generate(&blog, &input)?;
//! ```

mod client;
mod generator;
mod prompts;

pub use client::{AiClient, AiConfig, LlmBackend, Message, Role};
pub use generator::{extract_json_object, ContentGenerator, LlmGenerator};
pub use prompts::{GenerationPromptBuilder, PromptTemplate};

use thiserror::Error;

/// Errors that can occur in the AI module
#[derive(Error, Debug)]
pub enum AiError {
    #[error("Missing API key: {env_var} not set. Get your key at {signup_url}")]
    MissingApiKey { env_var: String, signup_url: String },

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

pub type AiResult<T> = Result<T, AiError>;
