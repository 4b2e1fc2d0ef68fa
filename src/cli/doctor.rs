//! Doctor command - check environment

use anyhow::Result;
use std::path::Path;

use super::load_configs;
use crate::config::{UserConfig, PROJECT_CONFIG_FILE};

pub fn run(config_path: Option<&Path>) -> Result<()> {
    println!("🩺 blogforge doctor\n");
    let (user, project) = load_configs(config_path)?;
    let mut problems = 0;

    // Scoring is local and always available
    println!("✓ Readiness scorer: OK");

    let user_path = config_path
        .map(Path::to_path_buf)
        .or_else(UserConfig::user_config_path);
    match user_path.filter(|p| p.exists()) {
        Some(path) => println!("✓ User config: {}", path.display()),
        None => println!("○ User config: not found (run `blogforge config init`)"),
    }

    if Path::new(PROJECT_CONFIG_FILE).exists() {
        println!(
            "✓ Project config: {} ({} fallback blogs, review gate {})",
            PROJECT_CONFIG_FILE,
            project.blogs.len(),
            project.review.min_score
        );
    } else {
        println!("○ Project config: ./{} not found, using defaults", PROJECT_CONFIG_FILE);
    }

    if user.has_ai_key() {
        println!("✓ AI provider: {} (generation enabled)", user.ai_backend());
    } else {
        problems += 1;
        println!("✗ AI provider: no key for '{}'", user.ai_backend());
        println!("  Set ANTHROPIC_API_KEY or OPENAI_API_KEY to generate drafts");
    }

    match user.airtable() {
        Some((_, base)) => println!("✓ Airtable: base {}", base),
        None if project.blogs.is_empty() => {
            problems += 1;
            println!("✗ Airtable: not configured and no blogs in {}", PROJECT_CONFIG_FILE);
            println!("  Set AIRTABLE_API_KEY and AIRTABLE_BASE_ID");
        }
        None => println!("○ Airtable: not configured (drafts need --dry-run)"),
    }

    if problems == 0 {
        println!("\n✅ All checks passed!");
    } else {
        println!("\n⚠️  {} problem(s) found. Scoring still works offline.", problems);
    }
    Ok(())
}
