use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Project-level configuration, read from `.lectio/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub plan: PlanConfig,
    #[serde(default)]
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Plan opened when no `--plan` is given.
    #[serde(default = "default_plan")]
    pub default: String,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            default: default_plan(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Activity feed page size.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// User-level configuration, read from the platform config directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    /// Preferred output mode name (`"pretty"`, `"text"`, `"json"`).
    #[serde(default)]
    pub output: Option<String>,
}

fn default_plan() -> String {
    crate::plan::mcheyne::PLAN_ID.to_string()
}

const fn default_page_size() -> usize {
    crate::feed::DEFAULT_PAGE_SIZE
}

/// Load the project config, treating an absent file as defaults.
///
/// # Errors
///
/// Returns an error when the file exists but cannot be read or parsed;
/// a broken config should be fixed, not silently ignored.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(".lectio/config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("read config file {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parse config file {}", path.display()))
}

/// Load the user config from the platform config directory, if any.
#[must_use]
pub fn load_user_config() -> UserConfig {
    let Some(path) = dirs::config_dir().map(|dir| dir.join("lectio/config.toml")) else {
        return UserConfig::default();
    };
    let Ok(raw) = std::fs::read_to_string(&path) else {
        return UserConfig::default();
    };
    match toml::from_str(&raw) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("ignoring unparseable user config {}: {e}", path.display());
            UserConfig::default()
        }
    }
}
