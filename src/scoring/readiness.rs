//! Readiness scorer entry point
//!
//! Pure and side-effect free: the same document and input always produce
//! the same report, and nothing here touches the network or disk.

use super::rubric::{self, Document};
use crate::models::{Checks, QaReport, QA_VERSION};
use serde_json::Value;
use tracing::debug;

/// Upper bound of the overall score
const MAX_SCORE: u32 = 100;

/// Scores one generated post against the GEO/AEO rubric
pub struct ReadinessScorer<'a> {
    output: &'a Value,
    input: &'a Value,
}

impl<'a> ReadinessScorer<'a> {
    /// `output` is the generated post document, `input` the optional
    /// scoring context (`Value::Null` when there is none)
    pub fn new(output: &'a Value, input: &'a Value) -> Self {
        Self { output, input }
    }

    /// Run every category and assemble the report
    pub fn calculate(&self) -> QaReport {
        let doc = Document::new(self.output, self.input);
        let mut warnings = Vec::new();

        let checks = Checks {
            aeo_answer_packaging: rubric::answer_packaging(&doc, &mut warnings),
            entity_coverage: rubric::entity_coverage(&doc, &mut warnings),
            schema_completeness: rubric::schema_completeness(&doc, &mut warnings),
            trust_verifiability: rubric::trust_verifiability(&doc, &mut warnings),
            metadata: rubric::metadata(&doc, &mut warnings),
            llm_extraction_pack: rubric::extraction_pack(&doc, &mut warnings),
            question_coverage: rubric::question_coverage(&doc),
        };

        let total = checks.aeo_answer_packaging.score
            + checks.entity_coverage.score
            + checks.schema_completeness.score
            + checks.trust_verifiability.score
            + checks.metadata.score
            + checks.llm_extraction_pack.score;

        debug!(
            "Readiness: A={} B={} C={} D={} E={} F={} ({} warnings)",
            checks.aeo_answer_packaging.score,
            checks.entity_coverage.score,
            checks.schema_completeness.score,
            checks.trust_verifiability.score,
            checks.metadata.score,
            checks.llm_extraction_pack.score,
            warnings.len()
        );

        QaReport {
            qa_version: QA_VERSION.to_string(),
            geo_aeo_score: total.min(MAX_SCORE),
            warnings,
            checks,
        }
    }
}

/// Score a generated post against the readiness rubric
pub fn score(output: &Value, input: &Value) -> QaReport {
    ReadinessScorer::new(output, input).calculate()
}
