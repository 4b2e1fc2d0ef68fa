//! The six rubric categories
//!
//! Each category reads its inputs through [`Fields`] defaults, pushes one
//! warning per failed sub-check, and returns its audit record with the
//! points earned.

use super::fields::{strings, truthy, Fields};
use super::matching::{contains_word, heading_counts, question_matches};
use crate::models::{
    AnswerPackagingCheck, EntityCoverageCheck, ExtractionPackCheck, MetadataCheck,
    QuestionCoverage, SchemaCompletenessCheck, TrustCheck,
};
use serde_json::Value;
use std::collections::HashSet;

/// Category maximums (sum to 100)
pub const ANSWER_PACKAGING_MAX: u32 = 25;
pub const ENTITY_COVERAGE_MAX: u32 = 20;
pub const SCHEMA_COMPLETENESS_MAX: u32 = 20;
pub const TRUST_MAX: u32 = 15;
pub const METADATA_MAX: u32 = 10;
pub const EXTRACTION_PACK_MAX: u32 = 10;

const GLOSSARY_RATIO_MIN: f64 = 0.60;
const KEY_TERM_RATIO_MIN: f64 = 0.70;
const MAX_LISTED_MISSING: usize = 8;

/// The post sections and scoring context every category reads from
pub(super) struct Document<'a> {
    content: Fields<'a>,
    metadata: Fields<'a>,
    schema: Fields<'a>,
    citations: Fields<'a>,
    distribution: Fields<'a>,
    body: &'a str,
    questions: &'a [Value],
    key_terms: &'a [Value],
    comparison_required: bool,
}

impl<'a> Document<'a> {
    pub(super) fn new(output: &'a Value, input: &'a Value) -> Self {
        let root = Fields::of(output);
        let content = root.obj("content");
        let input = Fields::of(input);
        let targets = input.obj("search_targets");

        Self {
            content,
            metadata: root.obj("metadata"),
            schema: root.obj_any(&["schema", "schema_data"]),
            citations: root.obj("citations"),
            distribution: root.obj("distribution"),
            body: content.text_any(&["markdown_body", "body"]),
            questions: targets.list("questions_to_win"),
            key_terms: targets.list("key_terms"),
            comparison_required: input
                .obj("content_requirements")
                .obj("structure")
                .is_true("comparison_table"),
        }
    }
}

/// A) TL;DR, FAQ depth, heading structure, comparison table
pub(super) fn answer_packaging(doc: &Document<'_>, warnings: &mut Vec<String>) -> AnswerPackagingCheck {
    let mut score = 0;
    let tldr_len = doc.content.list("tldr").len();
    let faq_len = doc.content.list("faq").len();
    let tables_len = doc.content.list("tables").len();
    let faq_target = doc.questions.len().max(3);
    let (h1, h2) = heading_counts(doc.body);

    if (3..=5).contains(&tldr_len) {
        score += 5;
    } else {
        warnings.push("TL;DR should be 3-5 bullets.".to_string());
    }

    if faq_len >= faq_target {
        score += 10;
    } else {
        warnings.push(format!(
            "FAQ count is low: {} of {} needed (questions_to_win, minimum 3).",
            faq_len, faq_target
        ));
    }

    if h1 >= 1 && h2 >= 3 {
        score += 5;
    } else {
        warnings.push("Heading structure weak (need 1 H1 and >=3 H2s).".to_string());
    }

    if !doc.comparison_required || tables_len >= 1 {
        score += 5;
    } else {
        warnings.push("Comparison table requested but missing.".to_string());
    }

    AnswerPackagingCheck {
        score,
        tldr_len,
        faq_len,
        faq_target,
        h1,
        h2,
        comparison_table_required: doc.comparison_required,
        tables_len,
    }
}

/// B) Entities listed, mentioned in the body, defined in the glossary; key terms used
pub(super) fn entity_coverage(doc: &Document<'_>, warnings: &mut Vec<String>) -> EntityCoverageCheck {
    let mut score = 0;
    let names: Vec<&str> = doc
        .metadata
        .list("entities")
        .iter()
        .map(|e| Fields::of(e).text("name"))
        .filter(|name| !name.is_empty())
        .collect();

    if names.len() >= 3 {
        score += 5;
    } else {
        warnings.push("metadata.entities should include >=3 entities.".to_string());
    }

    let missing: Vec<String> = names
        .iter()
        .filter(|name| !contains_word(doc.body, name))
        .map(|name| name.to_string())
        .collect();
    if names.is_empty() {
        warnings.push("No entities listed, so none can be found in the body.".to_string());
    } else if missing.is_empty() {
        score += 5;
    } else {
        let shown: Vec<&str> = missing
            .iter()
            .take(MAX_LISTED_MISSING)
            .map(String::as_str)
            .collect();
        warnings.push(format!(
            "Some entities not mentioned in body: {}",
            shown.join(", ")
        ));
    }

    let glossary: HashSet<&str> = doc
        .content
        .list("glossary")
        .iter()
        .map(|g| Fields::of(g).text("term"))
        .filter(|term| !term.is_empty())
        .collect();
    let glossary_ratio = if names.is_empty() {
        0.0
    } else {
        let defined = names.iter().filter(|n| glossary.contains(*n)).count();
        defined as f64 / names.len() as f64
    };
    if glossary_ratio >= GLOSSARY_RATIO_MIN {
        score += 5;
    } else {
        warnings.push("Glossary coverage < 60% of entities.".to_string());
    }

    let key_terms_requested = doc.key_terms.len();
    let key_terms_found = strings(doc.key_terms)
        .filter(|term| contains_word(doc.body, term))
        .count();
    if key_terms_requested == 0 {
        score += 5;
    } else {
        let ratio = key_terms_found as f64 / key_terms_requested as f64;
        if ratio >= KEY_TERM_RATIO_MIN {
            score += 5;
        } else {
            warnings.push(format!(
                "Key terms coverage low: {}/{}.",
                key_terms_found, key_terms_requested
            ));
        }
    }

    EntityCoverageCheck {
        score,
        entities_count: names.len(),
        entities_missing_in_body: missing,
        glossary_coverage_ratio: (glossary_ratio * 100.0).round() / 100.0,
        key_terms_requested,
        key_terms_found,
    }
}

/// C) JSON-LD types for the post, its FAQ, and its how-to (warn-only)
pub(super) fn schema_completeness(
    doc: &Document<'_>,
    warnings: &mut Vec<String>,
) -> SchemaCompletenessCheck {
    let mut check = SchemaCompletenessCheck::default();

    // A lone object stands in for a one-item list
    let items: &[Value] = match doc.schema.raw("json_ld") {
        Some(Value::Array(items)) => items.as_slice(),
        Some(single @ Value::Object(_)) => std::slice::from_ref(single),
        Some(other) if truthy(other) => {
            check.parse_errors.push("json_ld is not a list".to_string());
            &[]
        }
        _ => &[],
    };

    for (i, item) in items.iter().enumerate() {
        let Some(obj) = item.as_object() else {
            check.parse_errors.push(format!("json_ld[{}] is not an object", i));
            continue;
        };
        match obj.get("@type").and_then(Value::as_str) {
            Some("BlogPosting") => check.has_blogposting = true,
            Some("FAQPage") => check.has_faqpage = true,
            Some("HowTo") => check.has_howto = true,
            _ => {}
        }
    }

    // No structured data at all is not held against the post
    let json_ld_absent = !doc.schema.truthy("json_ld");
    if json_ld_absent || check.has_blogposting {
        check.score += 8;
    } else {
        warnings.push("Schema missing BlogPosting (warn-only).".to_string());
    }

    if !doc.content.truthy("faq") || check.has_faqpage {
        check.score += 6;
    } else {
        warnings.push("FAQ present but Schema missing FAQPage (warn-only).".to_string());
    }

    if !doc.content.truthy("howto") || check.has_howto {
        check.score += 6;
    } else {
        warnings.push("HowTo present but Schema missing HowTo (warn-only).".to_string());
    }

    check
}

/// D) Citations: count, `used_in` pointers, publisher and date
///
/// Enabled citations always earn a 5-point baseline, so enabled-but-empty
/// scores the same as disabled.
pub(super) fn trust_verifiability(doc: &Document<'_>, warnings: &mut Vec<String>) -> TrustCheck {
    let enabled = doc.citations.truthy("enabled");
    let refs = doc.citations.list("references");
    let mut check = TrustCheck {
        citations_enabled: enabled,
        references_count: refs.len(),
        ..Default::default()
    };

    if !enabled {
        check.score = 5;
        return check;
    }

    if refs.len() >= 3 {
        check.score += 5;
    } else {
        warnings.push("Citations enabled but <3 references provided.".to_string());
    }

    for r in refs.iter().map(Fields::of) {
        if r.truthy("used_in") {
            check.used_in_count += 1;
        }
        if r.truthy("published_date") && r.truthy("publisher") {
            check.dated_count += 1;
        }
    }

    if !refs.is_empty() {
        if check.used_in_count == refs.len() {
            check.score += 3;
        } else {
            warnings.push("Some citations missing used_in pointers.".to_string());
        }
        if check.dated_count >= (refs.len() / 2).max(1) {
            check.score += 2;
        } else {
            warnings.push("Many citations missing publisher/date.".to_string());
        }
    }

    check.score += 5;
    check
}

/// E) Meta title, description, canonical URL, language
pub(super) fn metadata(doc: &Document<'_>, warnings: &mut Vec<String>) -> MetadataCheck {
    let m = &doc.metadata;
    let check = MetadataCheck {
        score: 0,
        has_meta_title: m.truthy("meta_title"),
        has_meta_description: m.truthy("meta_description"),
        has_canonical_url: m.truthy("canonical_url"),
        has_language: m.truthy("language"),
    };

    let mut score = 0;
    for (present, points, field) in [
        (check.has_meta_title, 4, "meta_title"),
        (check.has_meta_description, 4, "meta_description"),
        (check.has_canonical_url, 1, "canonical_url"),
        (check.has_language, 1, "language"),
    ] {
        if present {
            score += points;
        } else {
            warnings.push(format!("Missing {}.", field));
        }
    }

    MetadataCheck { score, ..check }
}

/// F) Snippet pack for downstream LLM consumers
pub(super) fn extraction_pack(doc: &Document<'_>, warnings: &mut Vec<String>) -> ExtractionPackCheck {
    let pack = doc.distribution.obj("llm_snippet_pack");
    let mut check = ExtractionPackCheck {
        score: 0,
        has_summary: pack.truthy("one_paragraph_summary"),
        key_takeaways_len: pack.list("key_takeaways").len(),
        recommended_when_asked_len: pack.list("recommended_when_asked").len(),
    };

    if check.has_summary {
        check.score += 3;
    } else {
        warnings.push("Snippet pack missing one_paragraph_summary.".to_string());
    }

    if (3..=7).contains(&check.key_takeaways_len) {
        check.score += 3;
    } else {
        warnings.push("Snippet pack key_takeaways should be 3-7.".to_string());
    }

    if check.recommended_when_asked_len >= 2 {
        check.score += 4;
    } else {
        warnings.push(
            "Snippet pack recommended_when_asked should include >=2 Q->A pairs.".to_string(),
        );
    }

    check
}

/// Requested questions answered by some FAQ entry (informational)
pub(super) fn question_coverage(doc: &Document<'_>) -> QuestionCoverage {
    let asked: Vec<&str> = doc
        .content
        .list("faq")
        .iter()
        .map(|entry| Fields::of(entry).text("question"))
        // Blank questions would count as answering anything
        .filter(|q| !q.trim().is_empty())
        .collect();

    let answered = strings(doc.questions)
        .filter(|requested| asked.iter().any(|q| question_matches(requested, q)))
        .count();

    QuestionCoverage {
        questions_requested: doc.questions.len(),
        questions_answered: answered,
    }
}
