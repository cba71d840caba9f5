//! Search configuration.
//!
//! Precedence, lowest first: built-in defaults, a TOML file, `FOS_*`
//! environment variables (a `.env` file is honored), then CLI flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::search::request::DEFAULT_MAX_RESULTS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Index root; requests go to `{root}/_search/`.
    pub root: String,
    /// Result cap when a search does not supply one.
    pub default_max_results: usize,
    /// Advisory backend timeout hint, in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Fuzziness edit distance; unset lets the backend decide.
    pub edit_distance: Option<u8>,
    /// Hard limit on the HTTP round trip itself.
    pub request_timeout_ms: u64,
    /// JSON object snapshot used by the CLI as its object service.
    pub objects_path: Option<PathBuf>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            root: "http://localhost:9200".to_string(),
            default_max_results: DEFAULT_MAX_RESULTS.get(),
            timeout_ms: None,
            edit_distance: None,
            request_timeout_ms: 10_000,
            objects_path: None,
        }
    }
}

impl SearchConfig {
    /// Load from `path` if given, else from the default location if that file
    /// exists, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_toml_file(&path)?,
                _ => Self::default(),
            },
        };
        cfg.apply_env();
        Ok(cfg)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load config from environment variables on top of the defaults.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.apply_env();
        cfg
    }

    /// Unparseable values are ignored and the current setting kept.
    pub fn apply_env(&mut self) {
        if let Ok(root) = dotenvy::var("FOS_SEARCH_ROOT") {
            self.root = root;
        }

        if let Ok(val) = dotenvy::var("FOS_MAX_RESULTS")
            && let Ok(n) = val.parse::<usize>()
        {
            self.default_max_results = n;
        }

        if let Ok(val) = dotenvy::var("FOS_TIMEOUT_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            self.timeout_ms = Some(ms);
        }

        if let Ok(val) = dotenvy::var("FOS_EDIT_DISTANCE")
            && let Ok(distance) = val.parse::<u8>()
        {
            self.edit_distance = Some(distance);
        }

        if let Ok(val) = dotenvy::var("FOS_REQUEST_TIMEOUT_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            self.request_timeout_ms = ms;
        }

        if let Ok(path) = dotenvy::var("FOS_OBJECTS") {
            self.objects_path = Some(PathBuf::from(path));
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "fuzzy-object-search", "fuzzy-object-search")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
