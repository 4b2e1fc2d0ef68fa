//! Draft generation pipeline
//!
//! Orchestrates one draft:
//! 1. Generate a post document for the blog
//! 2. Score it for GEO/AEO readiness
//! 3. Build the draft record (status depends on the review gate)
//! 4. Write it to the blog's posts table (skipped on dry runs)

use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::ai::ContentGenerator;
use crate::models::{slugify, BlogConfig, DraftRecord, PostStatus, QaReport};
use crate::scoring::{self, Fields};
use crate::store::{EntityStore, RecordId};

const UNTITLED: &str = "Untitled";

/// One draft generation run
pub struct DraftJob {
    store: Arc<dyn EntityStore>,
    generator: Arc<dyn ContentGenerator>,
    /// Minimum score for a draft to skip manual review
    min_score: u32,
    dry_run: bool,
}

/// Result of a draft run
#[derive(Debug, Clone)]
pub struct DraftOutcome {
    pub record: DraftRecord,
    /// Generated post document
    pub document: Value,
    /// Store id of the created record; None on dry runs
    pub record_id: Option<RecordId>,
}

impl DraftOutcome {
    pub fn report(&self) -> &QaReport {
        &self.record.qa_report
    }
}

impl DraftJob {
    pub fn new(
        store: Arc<dyn EntityStore>,
        generator: Arc<dyn ContentGenerator>,
        min_score: u32,
    ) -> Self {
        Self {
            store,
            generator,
            min_score,
            dry_run: false,
        }
    }

    /// Generate and score, but don't write to the store.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run the pipeline for one blog.
    ///
    /// # Arguments
    /// * `blog` - Target blog; its posts table receives the draft
    /// * `input` - Generation request (topic, search targets, requirements)
    pub fn run(&self, blog: &BlogConfig, input: &Value) -> Result<DraftOutcome> {
        let document = self
            .generator
            .generate(blog, input)
            .with_context(|| format!("Failed to generate post for blog '{}'", blog.id))?;

        let report = scoring::score(&document, input);
        info!(
            "Scored draft for '{}': {}/100 ({} warnings)",
            blog.name,
            report.geo_aeo_score,
            report.warnings.len()
        );

        let record = self.build_record(&document, report);
        if record.status == PostStatus::NeedsReview {
            warn!(
                "Draft '{}' scored below the review gate ({} < {})",
                record.title, record.qa_score, self.min_score
            );
        }

        if self.dry_run {
            debug!("Dry run, not writing draft to {}", blog.posts_table);
            return Ok(DraftOutcome {
                record,
                document,
                record_id: None,
            });
        }

        let record_id = self
            .store
            .create(&blog.posts_table, record.to_fields())
            .with_context(|| format!("Failed to save draft to table '{}'", blog.posts_table))?;
        info!("Created draft {} in {}", record_id, blog.posts_table);

        Ok(DraftOutcome {
            record,
            document,
            record_id: Some(record_id),
        })
    }

    fn build_record(&self, document: &Value, report: QaReport) -> DraftRecord {
        let doc = Fields::of(document);
        let content = doc.obj("content");
        let metadata = doc.obj("metadata");

        let title = match content.text("title") {
            "" => metadata.text("meta_title"),
            t => t,
        };
        let title = if title.is_empty() { UNTITLED } else { title };
        let slug = match content.text("slug") {
            "" => slugify(title),
            s => s.to_string(),
        };

        let status = if report.passes(self.min_score) {
            PostStatus::Draft
        } else {
            PostStatus::NeedsReview
        };

        DraftRecord {
            title: title.to_string(),
            slug,
            content: content.text_any(&["markdown_body", "body"]).to_string(),
            meta_description: metadata.text("meta_description").to_string(),
            status,
            published_date: chrono::Utc::now().to_rfc3339(),
            qa_score: report.geo_aeo_score,
            qa_report: report,
        }
    }
}
