//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/topictree/topictree.toml`
//! 3. Local config: `<source_dir>/.topictree.toml`
//! 4. Environment variables: `TOPICTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::infrastructure::sources::is_http_source;

/// Raw settings for intermediate parsing (all optional to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub source: Option<String>,
    pub nodes_file: Option<String>,
    pub meta_file: Option<String>,
    pub search_path: Option<String>,
    pub max_documents: Option<usize>,
    pub color: Option<bool>,
}

/// Unified configuration for topictree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory or http(s) base URL holding the documents (default: ".")
    pub source: String,
    /// Hierarchy document, relative to `source`
    pub nodes_file: String,
    /// Summary metadata document, relative to `source`
    pub meta_file: String,
    /// Prefix of per-node document lookups, relative to `source`
    pub search_path: String,
    /// Documents listed in a node's detail view
    pub max_documents: usize,
    /// Colored terminal output
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: ".".into(),
            nodes_file: "sample.nodes.js".into(),
            meta_file: "sample.meta.json".into(),
            search_path: "search".into(),
            max_documents: 500,
            color: true,
        }
    }
}

/// Get the XDG config directory for topictree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "topictree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("topictree.toml"))
}

/// Get the path to the local config file in a source directory.
pub fn local_config_path(source_dir: &Path) -> PathBuf {
    source_dir.join(".topictree.toml")
}

/// Expand shell variables and tilde in a path-like string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand shell variables and tilde in `source` unless it is a URL.
    fn expand_paths(&mut self) {
        if !is_http_source(&self.source) {
            self.source = expand_env_vars(&self.source);
        }
    }

    /// Merge overlay config onto self (base): overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            source: overlay
                .source
                .clone()
                .unwrap_or_else(|| self.source.clone()),
            nodes_file: overlay
                .nodes_file
                .clone()
                .unwrap_or_else(|| self.nodes_file.clone()),
            meta_file: overlay
                .meta_file
                .clone()
                .unwrap_or_else(|| self.meta_file.clone()),
            search_path: overlay
                .search_path
                .clone()
                .unwrap_or_else(|| self.search_path.clone()),
            max_documents: overlay.max_documents.unwrap_or(self.max_documents),
            color: overlay.color.unwrap_or(self.color),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `source_dir` - Optional source directory for local config
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/topictree/topictree.toml`
    /// 3. Local config: `<source_dir>/.topictree.toml`
    /// 4. Environment variables: `TOPICTREE_*` prefix
    pub fn load(source_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config next to the documents
        if let Some(dir) = source_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply TOPICTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("TOPICTREE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("source") {
            settings.source = val;
        }
        if let Ok(val) = config.get_string("nodes_file") {
            settings.nodes_file = val;
        }
        if let Ok(val) = config.get_string("meta_file") {
            settings.meta_file = val;
        }
        if let Ok(val) = config.get_string("search_path") {
            settings.search_path = val;
        }
        if let Ok(val) = config.get_int("max_documents") {
            settings.max_documents = usize::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("max_documents must not be negative: {}", val),
            })?;
        }
        if let Ok(val) = config.get_bool("color") {
            settings.color = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# topictree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/topictree/topictree.toml
#   Local:  <source_dir>/.topictree.toml
#   Env:    TOPICTREE_* environment variables

# Directory or http(s) base URL holding the documents
# source = "."

# Hierarchy document (JSON array or `var nodes = [...]` script)
# nodes_file = "sample.nodes.js"

# Summary metadata document ({"minYear": .., "maxYear": ..})
# meta_file = "sample.meta.json"

# Per-node document lookups: <search_path>/<node id>
# search_path = "search"

# Documents listed per node
# max_documents = 500

# color = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
