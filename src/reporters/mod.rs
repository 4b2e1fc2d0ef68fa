//! Output reporters for readiness reports
//!
//! Supports multiple output formats:
//! - `text` - Terminal output with colors
//! - `json` - Machine-readable JSON (the report exactly as scored)
//! - `markdown` - GitHub-flavored Markdown

mod json;
mod markdown;
mod text;

use crate::models::QaReport;
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, json, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// A scored post and where it came from
#[derive(Debug, Clone, Serialize)]
pub struct ScoredPost {
    /// File path or record id
    pub source: String,
    pub report: QaReport,
}

impl ScoredPost {
    pub fn new(source: impl Into<String>, report: QaReport) -> Self {
        Self {
            source: source.into(),
            report,
        }
    }
}

/// Render scored posts in the specified format
pub fn report(posts: &[ScoredPost], format: &str) -> Result<String> {
    let fmt = OutputFormat::from_str(format)?;
    report_with_format(posts, fmt)
}

/// Render scored posts using an OutputFormat enum
pub fn report_with_format(posts: &[ScoredPost], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(posts),
        OutputFormat::Json => json::render(posts),
        OutputFormat::Markdown => markdown::render(posts),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    /// An empty post (35/100) and a partially filled one
    pub(crate) fn test_posts() -> Vec<ScoredPost> {
        let empty = crate::scoring::score(&json!({}), &json!({}));
        let partial = crate::scoring::score(
            &json!({
                "content": {"tldr": ["a", "b", "c"], "markdown_body": "# T\n## a\n## b\n## c"},
                "metadata": {"meta_title": "T", "meta_description": "D"}
            }),
            &json!({}),
        );
        vec![
            ScoredPost::new("posts/empty.json", empty),
            ScoredPost::new("posts/partial.json", partial),
        ]
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(
            OutputFormat::from_str("md").unwrap(),
            OutputFormat::Markdown
        );
        assert!(OutputFormat::from_str("sarif").is_err());
        assert_eq!(OutputFormat::Markdown.to_string(), "markdown");
    }

    #[test]
    fn test_report_by_name() {
        let posts = test_posts();
        assert!(report(&posts, "json").is_ok());
        assert!(report(&posts, "html").is_err());
    }
}
