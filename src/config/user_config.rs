//! User-level configuration for blogforge
//!
//! Supports loading config from:
//! - Environment variables
//! - ~/.config/blogforge/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct UserConfig {
    #[serde(default)]
    pub ai: AiConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct AiConfig {
    /// Anthropic API key
    pub anthropic_api_key: Option<String>,

    /// OpenAI (or compatible) API key
    pub openai_api_key: Option<String>,

    /// Model override for the selected backend
    pub model: Option<String>,

    /// AI backend: "anthropic" (default), "openai"
    pub backend: Option<String>,

    /// Base URL for OpenAI-compatible servers
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Airtable personal access token
    pub airtable_api_key: Option<String>,

    /// Default Airtable base
    pub airtable_base_id: Option<String>,
}

impl UserConfig {
    /// Load config from all sources, with priority:
    /// 1. Environment variables (highest)
    /// 2. `path` if given, else the user config (~/.config/blogforge/config.toml)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = UserConfig::default();

        let file = path.map(Path::to_path_buf).or_else(Self::user_config_path);
        if let Some(file) = file.filter(|p| p.exists()) {
            match std::fs::read_to_string(&file)
                .map_err(anyhow::Error::from)
                .and_then(|content| Ok(toml::from_str::<UserConfig>(&content)?))
            {
                Ok(user_config) => {
                    debug!("Loaded user config from {}", file.display());
                    config.merge(user_config);
                }
                Err(e) => warn!("Ignoring user config {}: {}", file.display(), e),
            }
        }

        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Get the user config directory path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("blogforge").join("config.toml"))
    }

    /// Environment variables override everything
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(key) = var("ANTHROPIC_API_KEY") {
            self.ai.anthropic_api_key = Some(key);
        }
        if let Some(key) = var("OPENAI_API_KEY") {
            self.ai.openai_api_key = Some(key);
        }
        if let Some(key) = var("AIRTABLE_API_KEY") {
            self.store.airtable_api_key = Some(key);
        }
        if let Some(base) = var("AIRTABLE_BASE_ID") {
            self.store.airtable_base_id = Some(base);
        }
    }

    /// Merge another config into this one (other takes priority)
    fn merge(&mut self, other: UserConfig) {
        fn take(dst: &mut Option<String>, src: Option<String>) {
            if src.is_some() {
                *dst = src;
            }
        }
        take(&mut self.ai.anthropic_api_key, other.ai.anthropic_api_key);
        take(&mut self.ai.openai_api_key, other.ai.openai_api_key);
        take(&mut self.ai.model, other.ai.model);
        take(&mut self.ai.backend, other.ai.backend);
        take(&mut self.ai.base_url, other.ai.base_url);
        take(&mut self.store.airtable_api_key, other.store.airtable_api_key);
        take(&mut self.store.airtable_base_id, other.store.airtable_base_id);
    }

    /// Get the AI backend (anthropic or openai)
    pub fn ai_backend(&self) -> &str {
        self.ai.backend.as_deref().unwrap_or("anthropic")
    }

    /// API key for the selected backend
    pub fn ai_api_key(&self) -> Option<&str> {
        match self.ai_backend() {
            "openai" => self.ai.openai_api_key.as_deref(),
            _ => self.ai.anthropic_api_key.as_deref(),
        }
    }

    pub fn has_ai_key(&self) -> bool {
        self.ai_api_key().is_some()
    }

    /// Airtable key and base, when both are configured
    pub fn airtable(&self) -> Option<(&str, &str)> {
        Some((
            self.store.airtable_api_key.as_deref()?,
            self.store.airtable_base_id.as_deref()?,
        ))
    }

    /// Initialize user config directory and create example config
    pub fn init_user_config() -> Result<PathBuf> {
        let config_path = Self::user_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        if !config_path.exists() {
            let example = r#"# blogforge user configuration

[ai]
# Backend: "anthropic" (default) or "openai" (any OpenAI-compatible server)
# backend = "anthropic"
# anthropic_api_key = "sk-ant-..."
# openai_api_key = "sk-..."
# base_url = "https://api.openai.com/v1"
# model = "claude-sonnet-4-20250514"

[store]
# airtable_api_key = "pat..."
# airtable_base_id = "app..."
"#;
            std::fs::write(&config_path, example)?;
        }

        Ok(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = UserConfig::default();
        assert!(!config.has_ai_key());
        assert_eq!(config.ai_backend(), "anthropic");
        assert!(config.airtable().is_none());
    }

    #[test]
    fn test_toml_parsing() {
        let toml_str = r#"
[ai]
openai_api_key = "sk-openai"
backend = "openai"
base_url = "http://localhost:8080/v1"

[store]
airtable_api_key = "pat123"
airtable_base_id = "appXYZ"
"#;
        let config: UserConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.ai_backend(), "openai");
        assert_eq!(config.ai_api_key(), Some("sk-openai"));
        assert_eq!(config.airtable(), Some(("pat123", "appXYZ")));
    }

    #[test]
    fn test_toml_parsing_minimal() {
        let config: UserConfig = toml::from_str("").unwrap();
        assert!(!config.has_ai_key());
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config: UserConfig =
            toml::from_str("[ai]\nanthropic_api_key = \"from-file\"").unwrap();
        config.apply_env(|name| match name {
            "ANTHROPIC_API_KEY" => Some("from-env".to_string()),
            "AIRTABLE_BASE_ID" => Some("appEnv".to_string()),
            _ => None,
        });
        assert_eq!(config.ai_api_key(), Some("from-env"));
        assert_eq!(config.store.airtable_base_id.as_deref(), Some("appEnv"));
        assert!(config.airtable().is_none());
    }

    #[test]
    fn test_merge_preserves_base_when_other_is_none() {
        let mut base = UserConfig::default();
        base.ai.anthropic_api_key = Some("sk-original".to_string());
        base.merge(UserConfig::default());
        assert_eq!(base.ai_api_key(), Some("sk-original"));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ai]\nmodel = \"gpt-4o-mini\"\n").unwrap();
        let config = UserConfig::load(Some(&path)).unwrap();
        assert_eq!(config.ai.model.as_deref(), Some("gpt-4o-mini"));
    }

    #[test]
    fn test_invalid_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is [[ not valid toml").unwrap();
        assert!(UserConfig::load(Some(&path)).is_ok());
    }
}
