//! Configuration model.

use super::plan::{OperationKind, PathMapping};
use crate::generators::filename::{DEFAULT_MOVIE_FORMAT, DEFAULT_TV_FORMAT};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
///
/// Every key is optional in the file; missing keys take the built-in default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Global output directory.
    pub output_dir: Option<PathBuf>,
    /// Copy or move.
    pub mode: OperationKind,
    /// Episode filename template.
    pub tv_format: String,
    /// Movie filename template.
    pub movie_format: String,
    /// Path prefix recorded by the server.
    pub path_map_from: Option<String>,
    /// Locally reachable replacement prefix.
    pub path_map_to: Option<String>,
    /// Script dialect: cmd, powershell or bash.
    pub shell: String,
    /// Skip all interactive prompts.
    pub auto_approve: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: None,
            mode: OperationKind::Move,
            tv_format: DEFAULT_TV_FORMAT.to_string(),
            movie_format: DEFAULT_MOVIE_FORMAT.to_string(),
            path_map_from: None,
            path_map_to: None,
            shell: "cmd".to_string(),
            auto_approve: false,
        }
    }
}

impl Config {
    /// Path mapping, when both prefixes are configured and non-empty.
    pub fn path_mapping(&self) -> Option<PathMapping> {
        match (&self.path_map_from, &self.path_map_to) {
            (Some(from), Some(to)) if !from.is_empty() && !to.is_empty() => Some(PathMapping {
                from: from.clone(),
                to: to.clone(),
            }),
            _ => None,
        }
    }
}

/// Get the configuration directory path.
fn dirs_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("plex_renamer")
}

/// Default location of the config file.
pub fn default_config_path() -> PathBuf {
    dirs_config_path().join("config.toml")
}

/// Parse configuration from TOML text.
pub fn parse_config(content: &str, origin: &Path) -> Result<Config> {
    toml::from_str(content).map_err(|source| crate::Error::ConfigParse {
        path: origin.to_path_buf(),
        source,
    })
}

/// Load configuration.
///
/// An explicit path must exist and parse. The default path is optional:
/// when it is missing, built-in defaults are returned.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let (path, required) = match explicit {
        Some(p) => (p.to_path_buf(), true),
        None => (default_config_path(), false),
    };

    if !path.exists() {
        if required {
            return Err(crate::Error::PathNotFound(path.display().to_string()));
        }
        tracing::debug!("No config file at {:?}, using defaults", path);
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(&path)?;
    let config = parse_config(&content, &path)?;
    tracing::debug!("Loaded config from {:?}", path);
    Ok(config)
}
