//! CLI command definitions and handlers

mod blogs;
mod doctor;
mod generate;
mod score;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{load_project_config, ProjectConfig, UserConfig, PROJECT_CONFIG_FILE};
use crate::store::{AirtableStore, EntityStore};

/// blogforge - draft blog posts with an LLM and score their GEO/AEO readiness
#[derive(Parser, Debug)]
#[command(name = "blogforge")]
#[command(
    version,
    about = "Draft blog posts with an LLM and score how ready they are for answer engines",
    long_about = "blogforge generates structured blog drafts (output contract v2.0) for the \
blogs in your Airtable base and grades every draft on a 100-point GEO/AEO readiness \
rubric: answer packaging, entity coverage, structured data, trust, metadata and the \
LLM extraction pack.\n\n\
Scoring is fully local. Generation uses your own Anthropic or OpenAI key.",
    after_help = "\
Examples:
  blogforge score post.json                      Score a generated post
  blogforge score posts/*.json -f json           JSON reports for scripting
  blogforge score post.json --input req.json     Score against the generation request
  blogforge score posts/*.json --fail-under 70   Exit code 1 if any post scores below 70
  blogforge generate --blog-id recXXXX --dry-run Draft a post without saving it
  blogforge blogs                                List configured blogs
  blogforge blogs --agency recXXXX               List one agency's blogs"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// User config file (default: ~/.config/blogforge/config.toml)
    #[arg(long, global = true, env = "BLOGFORGE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score post documents for GEO/AEO readiness
    #[command(after_help = "\
Examples:
  blogforge score post.json                          Text report
  blogforge score a.json b.json -f markdown -o qa.md Markdown report to a file
  blogforge score post.json --input request.json     Use questions/key terms from the request
  blogforge score posts/*.json --fail-under 80       CI gate")]
    Score {
        /// Post document files (JSON, output contract v2.0)
        #[arg(required = true)]
        posts: Vec<PathBuf>,

        /// Generation request the posts were produced from (JSON)
        #[arg(long, short = 'i')]
        input: Option<PathBuf>,

        /// Output format: text, json, markdown (or md)
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json", "markdown", "md"])]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Exit with code 1 if any post scores below this
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
        fail_under: Option<u32>,
    },

    /// Generate a draft post for a blog, score it and save it
    Generate {
        /// Blog record id (or id from blogforge.toml)
        #[arg(long)]
        blog_id: String,

        /// Generation request (JSON): topic, search_targets, content_requirements
        #[arg(long, short = 'i')]
        input: Option<PathBuf>,

        /// Print the generated document instead of saving it
        #[arg(long)]
        dry_run: bool,
    },

    /// List configured blogs
    Blogs {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Show the blog that would serve this host
        #[arg(long, conflicts_with = "agency")]
        domain: Option<String>,

        /// Only blogs owned by this agency (record id)
        #[arg(long)]
        agency: Option<String>,
    },

    /// Manage configuration (init or show)
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Check environment and configuration
    Doctor,

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Initialize user config file with example settings
    Init,
    /// Show current config and paths
    Show,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Score {
            posts,
            input,
            format,
            output,
            fail_under,
        } => score::run(&posts, input.as_deref(), &format, output.as_deref(), fail_under),

        Commands::Generate {
            blog_id,
            input,
            dry_run,
        } => generate::run(config_path, &blog_id, input.as_deref(), dry_run),

        Commands::Blogs {
            json,
            domain,
            agency,
        } => blogs::run(config_path, json, domain.as_deref(), agency.as_deref()),

        Commands::Config { action } => run_config_action(config_path, action),

        Commands::Doctor => doctor::run(config_path),

        Commands::Version => {
            println!("blogforge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// User and project configuration for the current directory
fn load_configs(config_path: Option<&Path>) -> Result<(UserConfig, ProjectConfig)> {
    let user = UserConfig::load(config_path)?;
    let project = load_project_config(Path::new("."));
    Ok((user, project))
}

/// Airtable store for the default base, when credentials are configured
fn airtable_store(user: &UserConfig) -> Option<AirtableStore> {
    user.airtable()
        .map(|(key, base)| AirtableStore::new(key, base))
}

fn shared(store: Option<AirtableStore>) -> Option<Arc<dyn EntityStore>> {
    store.map(|s| Arc::new(s) as Arc<dyn EntityStore>)
}

fn run_config_action(config_path: Option<&Path>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = UserConfig::init_user_config()?;
            println!("✅ Config initialized at: {}", path.display());
            println!("\nEdit to add your API keys:");
            println!("  {}", path.display());
            println!("\nOr set via environment:");
            println!("  export ANTHROPIC_API_KEY=\"sk-ant-...\"");
            println!("  export AIRTABLE_API_KEY=\"pat...\" AIRTABLE_BASE_ID=\"app...\"");
            Ok(())
        }
        ConfigAction::Show => show_config(config_path),
    }
}

fn show_config(config_path: Option<&Path>) -> Result<()> {
    let (user, project) = load_configs(config_path)?;

    println!("📁 Config paths:");
    let user_path = config_path
        .map(Path::to_path_buf)
        .or_else(UserConfig::user_config_path);
    if let Some(user_path) = user_path {
        let status = if user_path.exists() { "✓" } else { "(not found)" };
        println!("  User:    {} {}", user_path.display(), status);
    }
    let proj_status = if Path::new(PROJECT_CONFIG_FILE).exists() {
        "✓"
    } else {
        "(not found)"
    };
    println!("  Project: ./{} {}", PROJECT_CONFIG_FILE, proj_status);
    println!();

    println!("🤖 AI Backend: {}", user.ai_backend());
    let key_status = if user.has_ai_key() { "✓ configured" } else { "✗ not set" };
    println!("  API key: {}", key_status);
    if let Some(model) = project.generation.model.as_ref().or(user.ai.model.as_ref()) {
        println!("  Model:   {}", model);
    }
    println!();

    println!("🗄  Store:");
    match user.airtable() {
        Some((_, base)) => println!("  Airtable base: {}", base),
        None => println!("  Airtable: ✗ not configured"),
    }
    println!();

    println!("📝 Review gate: {}/100", project.review.min_score);
    println!("⏱  Blog cache TTL: {}s", project.cache.ttl_secs);
    println!("📚 Fallback blogs: {}", project.blogs.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_score_args() {
        let cli = Cli::try_parse_from([
            "blogforge", "score", "a.json", "b.json", "-f", "md", "--fail-under", "70",
        ])
        .unwrap();
        match cli.command {
            Commands::Score {
                posts,
                format,
                fail_under,
                ..
            } => {
                assert_eq!(posts.len(), 2);
                assert_eq!(format, "md");
                assert_eq!(fail_under, Some(70));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_fail_under_is_bounded() {
        assert!(Cli::try_parse_from(["blogforge", "score", "a.json", "--fail-under", "101"]).is_err());
        assert!(Cli::try_parse_from(["blogforge", "score"]).is_err());
    }

    #[test]
    fn test_blogs_domain_and_agency_conflict() {
        let cli = Cli::try_parse_from(["blogforge", "blogs", "--agency", "rec1"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Blogs { agency: Some(ref id), .. } if id == "rec1"
        ));
        assert!(Cli::try_parse_from([
            "blogforge", "blogs", "--agency", "rec1", "--domain", "a.com"
        ])
        .is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["blogforge", "blogs", "--log-level", "debug", "--json"]).unwrap();
        assert_eq!(cli.log_level, "debug");
        assert!(matches!(cli.command, Commands::Blogs { json: true, .. }));
    }
}
