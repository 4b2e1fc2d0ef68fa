//! Prompt templates for post generation
//!
//! The system prompt pins the v2.0 output contract; the user prompt carries
//! the blog and the generation request (topic, search targets, requirements).

use crate::models::{BlogConfig, CONTRACT_VERSION};
use crate::scoring::Fields;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// System prompts keyed by a blog's `system_prompt_key`
pub struct PromptTemplate;

impl PromptTemplate {
    pub fn system_prompt(key: &str) -> String {
        let voice = match key {
            "TECHNICAL_PROMPT" => {
                "You are a senior technical writer. Prefer precise terminology, concrete \
                 examples, and short code or configuration snippets where they help."
            }
            "REVIEW_PROMPT" => {
                "You are an independent product reviewer. Compare options fairly, state \
                 trade-offs plainly, and never invent specifications or prices."
            }
            _ => {
                "You are an expert blogger writing for readers and for answer engines. \
                 Write clearly, answer questions directly, and stay on the blog's theme."
            }
        };
        format!("{}\n\n{}", voice, Self::contract())
    }

    /// Description of the JSON document the model must return
    pub fn contract() -> String {
        format!(
            r##"Respond with a single JSON object and nothing else. It must follow output contract v{version}:

{{
  "contract_version": "{version}",
  "content": {{
    "title": "...",
    "slug": "kebab-case-slug",
    "markdown_body": "# Title\n\n## Section\n...",
    "tldr": ["3-5 short bullets"],
    "faq": [{{"question": "...", "answer": "..."}}],
    "howto": null,
    "tables": [{{"title": "...", "columns": ["..."], "rows": [["..."]]}}],
    "glossary": [{{"term": "...", "definition": "..."}}]
  }},
  "metadata": {{
    "meta_title": "...",
    "meta_description": "...",
    "canonical_url": "https://...",
    "tags": ["..."],
    "entities": [{{"name": "...", "type": "..."}}],
    "language": "en"
  }},
  "schema": {{
    "json_ld": [{{"@type": "BlogPosting"}}, {{"@type": "FAQPage"}}]
  }},
  "citations": {{
    "enabled": false,
    "references": [{{"title": "...", "url": "...", "publisher": "...", "published_date": "YYYY-MM-DD", "used_in": "section"}}]
  }},
  "distribution": {{
    "llm_snippet_pack": {{
      "one_paragraph_summary": "...",
      "key_takeaways": ["3-7 items"],
      "recommended_when_asked": [{{"question": "...", "answer": "..."}}]
    }}
  }}
}}

Rules:
- markdown_body has exactly one H1 and at least three H2 sections.
- Every entity in metadata.entities is mentioned by name in markdown_body and defined in the glossary.
- Answer every requested question in the FAQ, using the question text as written.
- Include a FAQPage JSON-LD object when there is a FAQ and a HowTo object when howto is set.
- Only cite sources you are certain exist."##,
            version = CONTRACT_VERSION
        )
    }
}

/// Builds the user prompt for one generation request
///
/// Recognised request fields: `topic`, `audience`,
/// `search_targets.{primary_query, questions_to_win, key_terms}`,
/// `content_requirements.structure.comparison_table`,
/// `content_requirements.citations`.
pub struct GenerationPromptBuilder<'a> {
    blog: &'a BlogConfig,
    input: Fields<'a>,
    extra_instructions: Option<String>,
}

impl<'a> GenerationPromptBuilder<'a> {
    pub fn new(blog: &'a BlogConfig, input: &'a Value) -> Self {
        Self {
            blog,
            input: Fields::of(input),
            extra_instructions: None,
        }
    }

    pub fn extra_instructions(mut self, text: impl Into<String>) -> Self {
        self.extra_instructions = Some(text.into());
        self
    }

    pub fn build(self) -> String {
        let targets = self.input.obj("search_targets");
        let requirements = self.input.obj("content_requirements");

        let mut prompt = format!("# Blog post request\n\nBlog: {}\n", sanitize_text(&self.blog.name));

        let topic = self.input.text("topic");
        if topic.is_empty() {
            prompt.push_str("Topic: choose a timely topic that fits the blog's theme.\n");
        } else {
            prompt.push_str(&format!("Topic: {}\n", sanitize_text(topic)));
        }

        let audience = self.input.text("audience");
        if !audience.is_empty() {
            prompt.push_str(&format!("Audience: {}\n", sanitize_text(audience)));
        }

        let primary = targets.text("primary_query");
        if !primary.is_empty() {
            prompt.push_str(&format!("Primary query: {}\n", sanitize_text(primary)));
        }

        push_list(&mut prompt, "Questions to win", &targets.list("questions_to_win"));
        push_list(&mut prompt, "Key terms to use", &targets.list("key_terms"));

        prompt.push_str("\n## Requirements\n");
        if requirements.obj("structure").is_true("comparison_table") {
            prompt.push_str("- Include at least one comparison table in content.tables.\n");
        }
        if requirements.truthy("citations") {
            prompt.push_str(
                "- Set citations.enabled to true and list at least 3 dated references with publisher and used_in.\n",
            );
        } else {
            prompt.push_str("- Citations are optional; set citations.enabled to false if you add none.\n");
        }
        if !self.blog.affiliate_tag.is_empty() {
            prompt.push_str(&format!(
                "- Product links use the affiliate tag `{}`.\n",
                sanitize_text(&self.blog.affiliate_tag)
            ));
        }
        if self.blog.domain != "localhost" {
            prompt.push_str(&format!(
                "- canonical_url lives under https://{}/.\n",
                self.blog.domain
            ));
        }

        if let Some(extra) = self.extra_instructions {
            prompt.push_str(&format!("\n{}\n", sanitize_text(&extra)));
        }

        prompt.push_str("\nReturn only the JSON object.");
        prompt
    }
}

fn push_list(prompt: &mut String, label: &str, items: &[Value]) {
    let items: Vec<_> = crate::scoring::strings(items).collect();
    if items.is_empty() {
        return;
    }
    prompt.push_str(&format!("{}:\n", label));
    for item in items {
        prompt.push_str(&format!("- {}\n", sanitize_text(item)));
    }
}

/// Strip instruction-like phrases from user-supplied text
fn sanitize_text(text: &str) -> String {
    static INJECTION_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

    let patterns = INJECTION_PATTERNS.get_or_init(|| {
        vec![
            Regex::new(r"(?i)ignore\s+(all\s+)?previous\s+instructions?").expect("valid regex"),
            Regex::new(r"(?i)disregard\s+(all\s+)?previous").expect("valid regex"),
            Regex::new(r"(?i)<\s*/?\s*system\s*>").expect("valid regex"),
            Regex::new(r"(?i)^\s*(system|assistant|human)\s*:\s*").expect("valid regex"),
        ]
    });

    let mut result = text.to_string();
    for pattern in patterns {
        result = pattern.replace_all(&result, "[REDACTED]").to_string();
    }

    if result.len() > 500 {
        let mut cut = 500;
        while !result.is_char_boundary(cut) {
            cut -= 1;
        }
        result.truncate(cut);
        result.push_str("... [truncated]");
    }
    result
}
