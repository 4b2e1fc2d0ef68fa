//! Project configuration (`blogforge.toml`)
//!
//! ```toml
//! [review]
//! min_score = 75
//!
//! [cache]
//! ttl_secs = 120
//!
//! [generation]
//! model = "claude-sonnet-4-20250514"
//! max_tokens = 8192
//!
//! [[blogs]]
//! id = "tech"
//! name = "Tech Notes"
//! domain = "tech.example.com"
//! ```
//!
//! Blogs listed here are only used when the entity store has none.

use crate::models::BlogConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

pub const PROJECT_CONFIG_FILE: &str = "blogforge.toml";
const PROJECT_CONFIG_JSON: &str = ".blogforgerc.json";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub review: ReviewConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub tables: TablesConfig,

    /// Fallback blogs
    #[serde(default)]
    pub blogs: Vec<BlogConfig>,
}

/// Review gate applied to freshly generated drafts
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReviewConfig {
    /// Drafts scoring below this are marked NeedsReview
    #[serde(default = "default_min_score")]
    pub min_score: u32,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
        }
    }
}

fn default_min_score() -> u32 {
    70
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// How long blog and agency listings stay fresh
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationConfig {
    /// Model override; the backend default is used when unset
    #[serde(default)]
    pub model: Option<String>,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_max_tokens() -> u32 {
    8192
}

/// Store table names
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TablesConfig {
    #[serde(default = "default_blogs_table")]
    pub blogs: String,

    #[serde(default = "default_agencies_table")]
    pub agencies: String,
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            blogs: default_blogs_table(),
            agencies: default_agencies_table(),
        }
    }
}

fn default_blogs_table() -> String {
    "Blogs".to_string()
}

fn default_agencies_table() -> String {
    "Agencies".to_string()
}

/// Load project configuration from `dir`
///
/// Tries `blogforge.toml`, then `.blogforgerc.json`. Unreadable files are
/// logged and skipped; with nothing found the defaults apply.
pub fn load_project_config(dir: &Path) -> ProjectConfig {
    let toml_path = dir.join(PROJECT_CONFIG_FILE);
    if toml_path.exists() {
        match load_toml_config(&toml_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", toml_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", toml_path.display(), e);
            }
        }
    }

    let json_path = dir.join(PROJECT_CONFIG_JSON);
    if json_path.exists() {
        match load_json_config(&json_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", json_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", json_path.display(), e);
            }
        }
    }

    debug!("No project config found, using defaults");
    ProjectConfig::default()
}

fn load_toml_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

fn load_json_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

impl ProjectConfig {
    /// Look up a fallback blog by id
    pub fn blog(&self, id: &str) -> Option<&BlogConfig> {
        self.blogs.iter().find(|b| b.id == id)
    }
}
