//! Score command - grade post documents from disk

use anyhow::{Context, Result};
use console::style;
use rayon::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::reporters::{self, ScoredPost};
use crate::scoring;

pub fn run(
    posts: &[PathBuf],
    input: Option<&Path>,
    format: &str,
    output: Option<&Path>,
    fail_under: Option<u32>,
) -> Result<()> {
    let input = match input {
        Some(path) => read_json(path)?,
        None => Value::Object(Default::default()),
    };

    let scored = score_files(posts, &input)?;
    info!("Scored {} post(s)", scored.len());

    let rendered = reporters::report(&scored, format)?;
    match output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            eprintln!(
                "\n📄 Report written to: {}",
                style(path.display()).cyan()
            );
        }
        None => println!("{}", rendered),
    }

    check_fail_threshold(fail_under, &scored);
    Ok(())
}

/// Score every file in parallel; results keep the argument order
pub(crate) fn score_files(posts: &[PathBuf], input: &Value) -> Result<Vec<ScoredPost>> {
    posts
        .par_iter()
        .map(|path| -> Result<ScoredPost> {
            let document = read_json(path)?;
            let report = scoring::score(&document, input);
            debug!("{}: {}/100", path.display(), report.geo_aeo_score);
            Ok(ScoredPost::new(path.display().to_string(), report))
        })
        .collect()
}

fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Posts scoring below the threshold
fn below_threshold(threshold: u32, scored: &[ScoredPost]) -> Vec<&ScoredPost> {
    scored
        .iter()
        .filter(|p| !p.report.passes(threshold))
        .collect()
}

/// Exit with code 1 if any post is below `--fail-under`
fn check_fail_threshold(fail_under: Option<u32>, scored: &[ScoredPost]) {
    let Some(threshold) = fail_under else {
        return;
    };
    let failing = below_threshold(threshold, scored);
    if failing.is_empty() {
        return;
    }
    for post in &failing {
        eprintln!(
            "{} {} scored {} (below --fail-under {})",
            style("✗").red(),
            post.source,
            post.report.geo_aeo_score,
            threshold
        );
    }
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, value: &Value) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_score_files_keeps_order() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.json", &json!({}));
        let b = write(
            &dir,
            "b.json",
            &json!({"metadata": {"meta_title": "t", "meta_description": "d"}}),
        );

        let scored = score_files(&[a, b], &json!({})).unwrap();
        assert_eq!(scored.len(), 2);
        assert!(scored[0].source.ends_with("a.json"));
        assert_eq!(scored[0].report.geo_aeo_score, 35);
        assert_eq!(scored[1].report.geo_aeo_score, 43);
    }

    #[test]
    fn test_input_affects_score() {
        let dir = TempDir::new().unwrap();
        let post = write(&dir, "p.json", &json!({}));
        let input = json!({"content_requirements": {"structure": {"comparison_table": true}}});
        let scored = score_files(&[post], &input).unwrap();
        assert_eq!(scored[0].report.geo_aeo_score, 30);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = score_files(&[path], &json!({})).unwrap_err();
        assert!(err.to_string().contains("is not valid JSON"));
    }

    #[test]
    fn test_below_threshold() {
        let dir = TempDir::new().unwrap();
        let post = write(&dir, "p.json", &json!({}));
        let scored = score_files(&[post], &json!({})).unwrap();
        assert_eq!(below_threshold(36, &scored).len(), 1);
        assert!(below_threshold(35, &scored).is_empty());
    }
}
