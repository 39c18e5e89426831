//! Configuration loading for the Gwydion core.
//!
//! TOML-based configuration for the knowledge store, retrieval engine, and
//! reasoning controller. Resolution order:
//!
//! 1. `./gwydion.toml` (project-local), when present
//! 2. `~/.config/gwydion/config.toml` (user config)
//! 3. Built-in defaults
//!
//! The first file found wins; every field is optional within it.

pub mod error;
pub mod types;

use std::path::{Path, PathBuf};

pub use error::{ConfigError, Result};
pub use types::{
    ControllerSettings, GwydionConfig, KnowledgeSettings, LlmSettings, RetrievalSettings,
};

/// Default config filename for project-local config.
const PROJECT_CONFIG_FILE: &str = "gwydion.toml";

/// Default config filename within the user config directory.
const USER_CONFIG_FILE: &str = "config.toml";

/// Application name for config directory resolution.
const APP_NAME: &str = "gwydion";

/// The user-level config path (`~/.config/gwydion/config.toml` on Linux),
/// when a config directory can be resolved.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME).join(USER_CONFIG_FILE))
}

/// Load and parse one config file.
pub fn load_config_file(path: impl AsRef<Path>) -> Result<GwydionConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;
    Ok(toml::from_str(&text)?)
}

/// Discover and load configuration: the project-local file first, then the
/// user config, then built-in defaults. A present-but-broken file is an
/// error, not a silent fallback.
pub fn load_config(project_dir: Option<&Path>) -> Result<GwydionConfig> {
    let project_path = project_dir
        .map(|d| d.join(PROJECT_CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG_FILE));

    if project_path.is_file() {
        return load_config_file(&project_path);
    }

    if let Some(user_path) = user_config_path()
        && user_path.is_file()
    {
        return load_config_file(&user_path);
    }

    Ok(GwydionConfig::default())
}
