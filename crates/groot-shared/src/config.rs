//! Groot configuration.
//!
//! Config file: ~/.config/groot/config.toml or /etc/groot/config.toml.
//! `GROOT_*` environment variables override file values.

use crate::knowledge::KnowledgeStore;
use crate::DEFAULT_NAMESPACE;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_KNOWLEDGE_DIR: &str = "GROOT_KNOWLEDGE_DIR";
pub const ENV_DEFAULT_NAMESPACE: &str = "GROOT_DEFAULT_NAMESPACE";
pub const ENV_LOG_LEVEL: &str = "GROOT_LOG_LEVEL";

/// Where the knowledge base lives
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Unset means ~/.groot/knowledge_base
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

/// Seed values for the ambient cluster context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterConfig {
    #[serde(default = "default_namespace")]
    pub default_namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            default_namespace: default_namespace(),
            cluster_name: None,
            region: None,
            zone: None,
            project_id: None,
            resource_group: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// tracing filter directive, e.g. "warn" or "groot_shared=debug"
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrootConfig {
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    #[serde(default)]
    pub cluster: ClusterConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GrootConfig {
    /// Get default user config path: ~/.config/groot/config.toml
    pub fn user_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Cannot determine config directory")?;
        Ok(config_dir.join("groot").join("config.toml"))
    }

    /// Get system config path: /etc/groot/config.toml
    pub fn system_config_path() -> PathBuf {
        PathBuf::from("/etc/groot/config.toml")
    }

    /// Load configuration, then apply environment overrides.
    ///
    /// Priority:
    /// 1. User config (~/.config/groot/config.toml)
    /// 2. System config (/etc/groot/config.toml)
    /// 3. Defaults
    pub fn load() -> Result<Self> {
        let mut config = Self::load_files()?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_files() -> Result<Self> {
        if let Ok(user_path) = Self::user_config_path() {
            if user_path.exists() {
                return Self::load_from_path(&user_path);
            }
        }

        let system_path = Self::system_config_path();
        if system_path.exists() {
            return Self::load_from_path(&system_path);
        }

        Ok(Self::default())
    }

    /// Load one specific file, without environment overrides
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Apply `GROOT_*` overrides; empty values are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = get(ENV_KNOWLEDGE_DIR) {
            self.knowledge.dir = Some(PathBuf::from(dir));
        }
        if let Some(namespace) = get(ENV_DEFAULT_NAMESPACE) {
            self.cluster.default_namespace = namespace;
        }
        if let Some(level) = get(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
    }

    /// Configured knowledge directory or ~/.groot/knowledge_base
    pub fn knowledge_dir(&self) -> PathBuf {
        self.knowledge
            .dir
            .clone()
            .unwrap_or_else(KnowledgeStore::default_dir)
    }

    /// Save configuration to user config file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::user_config_path()?)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let toml_string = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, toml_string).with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = GrootConfig::default();
        assert_eq!(config.cluster.default_namespace, "default");
        assert_eq!(config.logging.level, "warn");
        assert!(config.knowledge.dir.is_none());
        assert!(config.knowledge_dir().ends_with(".groot/knowledge_base"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: GrootConfig = toml::from_str(
            r#"
            [cluster]
            cluster_name = "prod-eks"
            region = "us-east-1"
            "#,
        )
        .unwrap();
        assert_eq!(config.cluster.default_namespace, "default");
        assert_eq!(config.cluster.cluster_name.as_deref(), Some("prod-eks"));
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_KNOWLEDGE_DIR, "/srv/groot/kb"),
            (ENV_DEFAULT_NAMESPACE, "staging"),
            (ENV_LOG_LEVEL, "  "),
        ]
        .into_iter()
        .collect();

        let mut config = GrootConfig::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.knowledge_dir(), PathBuf::from("/srv/groot/kb"));
        assert_eq!(config.cluster.default_namespace, "staging");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_save_and_load_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = GrootConfig::default();
        config.cluster.zone = Some("europe-west1-b".into());
        config.save_to_path(&path).unwrap();

        let loaded = GrootConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_malformed_file_names_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[cluster\n").unwrap();

        let err = GrootConfig::load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }
}
