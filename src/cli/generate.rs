//! Generate command - draft, score and save a post for one blog

use anyhow::{anyhow, bail, Context, Result};
use console::style;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

use super::{airtable_store, load_configs, shared};
use crate::ai::{AiClient, LlmGenerator};
use crate::blogs::BlogDirectory;
use crate::models::BlogConfig;
use crate::pipeline::DraftJob;
use crate::reporters::{self, OutputFormat, ScoredPost};
use crate::store::{AirtableStore, EntityStore, MemoryStore};

pub fn run(
    config_path: Option<&Path>,
    blog_id: &str,
    input: Option<&Path>,
    dry_run: bool,
) -> Result<()> {
    let (user, project) = load_configs(config_path)?;
    let airtable = airtable_store(&user);

    let directory = BlogDirectory::new(shared(airtable.clone()), &project);
    let blog = directory
        .blog(blog_id)
        .ok_or_else(|| anyhow!("Blog ID '{}' not found. Run `blogforge blogs` to list blogs.", blog_id))?;

    let input = match input {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("{} is not valid JSON", path.display()))?
        }
        None => Value::Object(Default::default()),
    };

    let posts_store = posts_store(airtable.as_ref(), &blog, dry_run)?;
    let client = AiClient::from_config(&user, &project.generation)?;
    let generator = Arc::new(LlmGenerator::new(client));

    eprintln!(
        "{} Generating post for: {} ({})",
        style("⚡").cyan(),
        style(&blog.name).bold(),
        generator.model()
    );

    let job = DraftJob::new(posts_store, generator, project.review.min_score).dry_run(dry_run);
    let outcome = job.run(&blog, &input)?;

    let summary = reporters::report_with_format(
        &[ScoredPost::new(outcome.record.title.clone(), outcome.report().clone())],
        OutputFormat::Text,
    )?;
    eprintln!("{}", summary);

    match outcome.record_id {
        Some(id) => println!(
            "Created record {} in {} (status: {})",
            id, blog.posts_table, outcome.record.status
        ),
        None => {
            println!("{}", serde_json::to_string_pretty(&outcome.document)?);
            eprintln!(
                "{}",
                style(format!("Dry run: not saved (would be {})", outcome.record.status)).dim()
            );
        }
    }
    Ok(())
}

/// Store receiving the draft: the blog's own base when it names one
fn posts_store(
    airtable: Option<&AirtableStore>,
    blog: &BlogConfig,
    dry_run: bool,
) -> Result<Arc<dyn EntityStore>> {
    if dry_run {
        return Ok(Arc::new(MemoryStore::new()));
    }
    let Some(store) = airtable else {
        bail!(
            "No entity store configured. Set AIRTABLE_API_KEY and AIRTABLE_BASE_ID, or use --dry-run."
        );
    };
    let store = match &blog.base_id {
        Some(base) if base != store.base_id() => store.with_base(base.clone()),
        _ => store.clone(),
    };
    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posts_store_requires_airtable_unless_dry_run() {
        let blog = BlogConfig::new("b1", "Tech", "localhost");
        assert!(posts_store(None, &blog, true).is_ok());
        let err = posts_store(None, &blog, false).err().unwrap();
        assert!(err.to_string().contains("--dry-run"));
        assert!(posts_store(Some(&AirtableStore::new("k", "appA")), &blog, false).is_ok());
    }
}
