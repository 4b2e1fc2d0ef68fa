//! Post document generation
//!
//! A generator turns a blog plus a generation request into a post document
//! following the v2.0 contract. The document is returned as raw JSON; it is
//! scored, not validated.

use crate::ai::{AiClient, AiError, AiResult, GenerationPromptBuilder, Message, PromptTemplate};
use crate::models::BlogConfig;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::{debug, info};

/// Produces a post document for a blog
pub trait ContentGenerator: Send + Sync {
    fn generate(&self, blog: &BlogConfig, input: &Value) -> AiResult<Value>;
}

/// Generator backed by an LLM
pub struct LlmGenerator {
    client: AiClient,
}

impl LlmGenerator {
    pub fn new(client: AiClient) -> Self {
        Self { client }
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }
}

impl ContentGenerator for LlmGenerator {
    fn generate(&self, blog: &BlogConfig, input: &Value) -> AiResult<Value> {
        let system = PromptTemplate::system_prompt(&blog.system_prompt_key);
        let prompt = GenerationPromptBuilder::new(blog, input).build();

        info!("Generating post for '{}' with {}", blog.name, self.client.model());
        let response = self.client.generate(vec![Message::user(prompt)], Some(&system))?;
        debug!("Received {} chars from model", response.len());

        extract_json_object(&response)
    }
}

/// Pull the JSON object out of a model response
///
/// Accepts a bare object, an object inside a ```json fence, or an object
/// surrounded by prose.
pub fn extract_json_object(response: &str) -> AiResult<Value> {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    // (?s) so the fenced body can span lines; lazy so each fence is its own block
    let fence = FENCE
        .get_or_init(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("valid regex"));

    // First fenced block holding a JSON object wins
    let fenced = fence
        .captures_iter(response)
        .filter_map(|c| c.get(1))
        .filter_map(|m| serde_json::from_str::<Value>(m.as_str()).ok())
        .find(Value::is_object);
    if let Some(value) = fenced {
        return Ok(value);
    }

    let candidate = match (response.find('{'), response.rfind('}')) {
        (Some(start), Some(end)) if start < end => &response[start..=end],
        _ => {
            return Err(AiError::ParseError(
                "No JSON object found in model response".to_string(),
            ))
        }
    };

    let value: Value = serde_json::from_str(candidate)
        .map_err(|e| AiError::ParseError(format!("Failed to parse JSON response: {}", e)))?;
    if !value.is_object() {
        return Err(AiError::ParseError(
            "Model response is not a JSON object".to_string(),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_bare_object() {
        let value = extract_json_object(r#"{"content": {"title": "Hi"}}"#).unwrap();
        assert_eq!(value["content"]["title"], "Hi");
    }

    #[test]
    fn test_extract_fenced_object() {
        let response = "Here is your post:\n```json\n{\"content\": {\"tldr\": [\"a\", \"b\"]}}\n```\nEnjoy!";
        let value = extract_json_object(response).unwrap();
        assert_eq!(value["content"]["tldr"], json!(["a", "b"]));
    }

    #[test]
    fn test_extract_first_of_several_fences() {
        let response = "Post:\n```json\n{\"content\": {\"title\": \"First\"}}\n```\n\nSchema example:\n```json\n{\"@type\": \"BlogPosting\"}\n```\n";
        let value = extract_json_object(response).unwrap();
        assert_eq!(value["content"]["title"], "First");
    }

    #[test]
    fn test_extract_skips_fences_without_objects() {
        let response = "```bash\ncargo run\n```\nthen\n```json\n{\"metadata\": {}}\n```";
        let value = extract_json_object(response).unwrap();
        assert!(value["metadata"].is_object());
    }

    #[test]
    fn test_extract_object_in_prose() {
        let response = "Sure! {\"metadata\": {\"language\": \"en\"}} Let me know.";
        let value = extract_json_object(response).unwrap();
        assert_eq!(value["metadata"]["language"], "en");
    }

    #[test]
    fn test_extract_rejects_non_json() {
        assert!(matches!(
            extract_json_object("I cannot help with that."),
            Err(AiError::ParseError(_))
        ));
        assert!(matches!(
            extract_json_object("{not json}"),
            Err(AiError::ParseError(_))
        ));
        assert!(matches!(
            extract_json_object("} backwards {"),
            Err(AiError::ParseError(_))
        ));
    }
}
