//! Configuration module for blogforge
//!
//! This module handles:
//! - User-level configuration (API keys, `~/.config/blogforge/config.toml`)
//! - Project-level configuration (`blogforge.toml`): fallback blogs,
//!   review gate, cache TTL, generation defaults

mod project_config;
mod user_config;

pub use project_config::{
    load_project_config, CacheConfig, GenerationConfig, ProjectConfig, ReviewConfig, TablesConfig,
    PROJECT_CONFIG_FILE,
};
pub use user_config::{AiConfig, StoreConfig, UserConfig};
