//! JSON reporter
//!
//! One post renders as its report object, unchanged. Several posts render
//! as an array of `{source, report}` entries.

use super::ScoredPost;
use anyhow::Result;

/// Render posts as pretty-printed JSON
pub fn render(posts: &[ScoredPost]) -> Result<String> {
    match posts {
        [single] => Ok(serde_json::to_string_pretty(&single.report)?),
        _ => Ok(serde_json::to_string_pretty(posts)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_posts;

    #[test]
    fn test_single_post_is_bare_report() {
        let posts = test_posts();
        let json_str = render(&posts[..1]).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["qa_version"], "1.0");
        assert_eq!(parsed["geo_aeo_score"], 35);
        assert!(parsed["checks"]["question_coverage"].is_object());
    }

    #[test]
    fn test_many_posts_are_tagged_with_source() {
        let json_str = render(&test_posts()).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        let entries = parsed.as_array().expect("array");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1]["source"], "posts/partial.json");
        assert!(entries[1]["report"]["warnings"].is_array());
    }
}
