//! Configuration loading and management
//!
//! Handles parsing of `.tanamao.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Actor configuration
    #[serde(default)]
    pub actor: ActorConfig,

    /// Lifecycle rule configuration
    #[serde(default)]
    pub lifecycle: LifecycleConfig,

    /// Task id configuration
    #[serde(default)]
    pub tasks: TasksConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            actor: ActorConfig::default(),
            lifecycle: LifecycleConfig::default(),
            tasks: TasksConfig::default(),
        }
    }
}

/// Actor-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorConfig {
    /// Default acting user id when none specified
    #[serde(default = "default_actor")]
    pub default: String,
}

fn default_actor() -> String {
    String::new()
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            default: default_actor(),
        }
    }
}

/// Lifecycle rule toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Allow `pendente -> concluida` without an intervening start.
    /// Off by default: the skip must be an explicit site decision.
    #[serde(default)]
    pub allow_complete_from_pending: bool,

    /// Require a confirmation token when completing a task.
    #[serde(default = "default_true")]
    pub require_confirmation: bool,
}

fn default_true() -> bool {
    true
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            allow_complete_from_pending: false,
            require_confirmation: true,
        }
    }
}

/// Task id configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Prefix for generated task ids
    #[serde(default = "default_task_id_prefix")]
    pub id_prefix: String,

    /// Minimum task id suffix length
    #[serde(default = "default_task_id_min_len")]
    pub id_min_len: usize,
}

fn default_task_id_prefix() -> String {
    "task".to_string()
}

fn default_task_id_min_len() -> usize {
    4
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            id_prefix: default_task_id_prefix(),
            id_min_len: default_task_id_min_len(),
        }
    }
}

impl Config {
    /// Load configuration from a `.tanamao.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the workspace root, or return defaults
    pub fn load_from_root(root: &Path) -> Self {
        let config_path = root.join(".tanamao.toml");
        if config_path.exists() {
            Self::load(&config_path).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &PathBuf) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> crate::error::Result<()> {
        self.tasks.validate()
    }
}

impl TasksConfig {
    fn validate(&self) -> crate::error::Result<()> {
        let prefix = self.id_prefix.trim();
        if prefix.is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "tasks.id_prefix cannot be empty".to_string(),
            ));
        }
        if !prefix.chars().all(|ch| ch.is_ascii_alphanumeric()) {
            return Err(crate::error::Error::InvalidConfig(
                "tasks.id_prefix must be alphanumeric".to_string(),
            ));
        }
        if self.id_min_len < 3 {
            return Err(crate::error::Error::InvalidConfig(
                "tasks.id_min_len must be >= 3".to_string(),
            ));
        }
        if self.id_min_len > 16 {
            return Err(crate::error::Error::InvalidConfig(
                "tasks.id_min_len must be <= 16".to_string(),
            ));
        }
        Ok(())
    }
}
