//! Core data models for blogforge
//!
//! The readiness report produced by the scorer, plus the blog and draft
//! records the pipeline reads from and writes to the entity store.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Version tag stamped on every readiness report
pub const QA_VERSION: &str = "1.0";

/// Output contract version requested from the generator
pub const CONTRACT_VERSION: &str = "2.0";

/// GEO/AEO readiness report for a single generated post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaReport {
    pub qa_version: String,
    /// Overall score, always within 0-100
    pub geo_aeo_score: u32,
    /// Failed sub-checks, in evaluation order (A through F)
    pub warnings: Vec<String>,
    pub checks: Checks,
}

impl QaReport {
    /// Whether the post clears a review gate
    pub fn passes(&self, threshold: u32) -> bool {
        self.geo_aeo_score >= threshold
    }

    /// Points earned per rubric category, with the category maximum
    pub fn category_points(&self) -> Vec<(&'static str, u32, u32)> {
        use crate::scoring::{
            ANSWER_PACKAGING_MAX, ENTITY_COVERAGE_MAX, EXTRACTION_PACK_MAX, METADATA_MAX,
            SCHEMA_COMPLETENESS_MAX, TRUST_MAX,
        };
        let c = &self.checks;
        vec![
            ("Answer packaging", c.aeo_answer_packaging.score, ANSWER_PACKAGING_MAX),
            ("Entity coverage", c.entity_coverage.score, ENTITY_COVERAGE_MAX),
            ("Structured data", c.schema_completeness.score, SCHEMA_COMPLETENESS_MAX),
            ("Trust & verifiability", c.trust_verifiability.score, TRUST_MAX),
            ("Metadata", c.metadata.score, METADATA_MAX),
            ("LLM extraction pack", c.llm_extraction_pack.score, EXTRACTION_PACK_MAX),
        ]
    }

    /// Letter grade for display, same bands as a school report
    pub fn grade(&self) -> &'static str {
        match self.geo_aeo_score {
            90..=100 => "A",
            80..=89 => "B",
            70..=79 => "C",
            60..=69 => "D",
            _ => "F",
        }
    }
}

/// Per-category audit records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Checks {
    pub aeo_answer_packaging: AnswerPackagingCheck,
    pub entity_coverage: EntityCoverageCheck,
    pub schema_completeness: SchemaCompletenessCheck,
    pub trust_verifiability: TrustCheck,
    pub metadata: MetadataCheck,
    pub llm_extraction_pack: ExtractionPackCheck,
    pub question_coverage: QuestionCoverage,
}

/// Category A inputs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerPackagingCheck {
    pub score: u32,
    pub tldr_len: usize,
    pub faq_len: usize,
    /// FAQ entries needed: max(3, requested questions)
    pub faq_target: usize,
    pub h1: usize,
    pub h2: usize,
    pub comparison_table_required: bool,
    pub tables_len: usize,
}

/// Category B inputs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityCoverageCheck {
    pub score: u32,
    pub entities_count: usize,
    pub entities_missing_in_body: Vec<String>,
    pub glossary_coverage_ratio: f64,
    pub key_terms_requested: usize,
    pub key_terms_found: usize,
}

/// Category C inputs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaCompletenessCheck {
    pub score: u32,
    pub has_blogposting: bool,
    pub has_faqpage: bool,
    pub has_howto: bool,
    pub parse_errors: Vec<String>,
}

/// Category D inputs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrustCheck {
    pub score: u32,
    pub citations_enabled: bool,
    pub references_count: usize,
    pub used_in_count: usize,
    pub dated_count: usize,
}

/// Category E inputs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataCheck {
    pub score: u32,
    pub has_meta_title: bool,
    pub has_meta_description: bool,
    pub has_canonical_url: bool,
    pub has_language: bool,
}

/// Category F inputs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionPackCheck {
    pub score: u32,
    pub has_summary: bool,
    pub key_takeaways_len: usize,
    pub recommended_when_asked_len: usize,
}

/// Informational only, never weighted into the score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionCoverage {
    pub questions_requested: usize,
    pub questions_answered: usize,
}

/// Status a generated draft is saved with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PostStatus {
    #[default]
    Draft,
    /// Scored below the review gate
    NeedsReview,
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PostStatus::Draft => "Draft",
            PostStatus::NeedsReview => "NeedsReview",
        };
        write!(f, "{}", s)
    }
}

/// A blog served by the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogConfig {
    pub id: String,
    pub name: String,
    #[serde(default = "default_domain")]
    pub domain: String,
    #[serde(default = "default_posts_table")]
    pub posts_table: String,
    /// Base holding the posts table; None means the default base
    #[serde(default)]
    pub base_id: Option<String>,
    #[serde(default = "default_prompt_key")]
    pub system_prompt_key: String,
    #[serde(default)]
    pub affiliate_tag: String,
    #[serde(default = "default_contract")]
    pub generation_contract: String,
}

fn default_domain() -> String {
    "localhost".to_string()
}

fn default_posts_table() -> String {
    "Posts".to_string()
}

fn default_prompt_key() -> String {
    "DEFAULT_PROMPT".to_string()
}

fn default_contract() -> String {
    format!("v{}", CONTRACT_VERSION)
}

impl BlogConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            domain: domain.into(),
            posts_table: default_posts_table(),
            base_id: None,
            system_prompt_key: default_prompt_key(),
            affiliate_tag: String::new(),
            generation_contract: default_contract(),
        }
    }
}

/// An agency owning one or more blogs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agency {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub blog_ids: Vec<String>,
}

/// Fields written to the posts table for a generated draft
#[derive(Debug, Clone, PartialEq)]
pub struct DraftRecord {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub meta_description: String,
    pub status: PostStatus,
    pub published_date: String,
    pub qa_score: u32,
    pub qa_report: QaReport,
}

impl DraftRecord {
    /// Store field map using the posts table's column names
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("Title".into(), Value::String(self.title.clone()));
        fields.insert("Slug".into(), Value::String(self.slug.clone()));
        fields.insert("Content".into(), Value::String(self.content.clone()));
        fields.insert(
            "Meta_Description".into(),
            Value::String(self.meta_description.clone()),
        );
        fields.insert("Status".into(), Value::String(self.status.to_string()));
        fields.insert(
            "PublishedDate".into(),
            Value::String(self.published_date.clone()),
        );
        fields.insert("QA_Score".into(), Value::from(self.qa_score));
        // Serializing plain structs of strings and numbers cannot fail
        let report = serde_json::to_string(&self.qa_report).unwrap_or_default();
        fields.insert("QA_Report".into(), Value::String(report));
        fields.insert(
            "Contract_Version".into(),
            Value::String(CONTRACT_VERSION.to_string()),
        );
        fields
    }
}

/// Turn a title into a URL slug (lowercase, hyphen-separated)
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(score: u32) -> QaReport {
        QaReport {
            qa_version: QA_VERSION.to_string(),
            geo_aeo_score: score,
            warnings: vec![],
            checks: Checks::default(),
        }
    }

    #[test]
    fn test_passes_threshold_is_inclusive() {
        assert!(report(70).passes(70));
        assert!(!report(69).passes(70));
    }

    #[test]
    fn test_grade_bands() {
        assert_eq!(report(100).grade(), "A");
        assert_eq!(report(85).grade(), "B");
        assert_eq!(report(35).grade(), "F");
    }

    #[test]
    fn test_category_points_max_sums_to_100() {
        let total: u32 = report(0).category_points().iter().map(|(_, _, max)| max).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust 2024: What's New  "), "rust-2024-what-s-new");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_checks_serialize_with_category_keys() {
        let json = serde_json::to_value(report(35)).unwrap();
        let checks = json["checks"].as_object().unwrap();
        for key in [
            "aeo_answer_packaging",
            "entity_coverage",
            "schema_completeness",
            "trust_verifiability",
            "metadata",
            "llm_extraction_pack",
            "question_coverage",
        ] {
            assert!(checks.contains_key(key), "missing {key}");
        }
    }

    #[test]
    fn test_blog_config_defaults_from_toml() {
        let blog: BlogConfig = toml::from_str("id = \"b1\"\nname = \"Tech\"").unwrap();
        assert_eq!(blog.domain, "localhost");
        assert_eq!(blog.posts_table, "Posts");
        assert_eq!(blog.generation_contract, "v2.0");
    }

    #[test]
    fn test_draft_record_fields() {
        let record = DraftRecord {
            title: "T".into(),
            slug: "t".into(),
            content: "body".into(),
            meta_description: String::new(),
            status: PostStatus::NeedsReview,
            published_date: "2026-01-01T00:00:00Z".into(),
            qa_score: 42,
            qa_report: report(42),
        };
        let fields = record.to_fields();
        assert_eq!(fields["Status"], "NeedsReview");
        assert_eq!(fields["QA_Score"], 42);
        let parsed: QaReport =
            serde_json::from_str(fields["QA_Report"].as_str().unwrap()).unwrap();
        assert_eq!(parsed.geo_aeo_score, 42);
    }
}
