use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config missing required strategy '{0}'")]
    MissingStrategy(String),
    #[error("strategy '{0}' has no extensions defined")]
    NoExtensions(String),
}

/// One format strategy: the file extensions it claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Strategy {
    pub extensions: Vec<String>,
}

/// Maps strategy names to extension lists; used only to build the
/// extension-to-segmenter dispatch table. Invalid configuration is fatal
/// before any segmenter runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub strategies: BTreeMap<String, Strategy>,
}

impl Default for Config {
    fn default() -> Self {
        let mut strategies = BTreeMap::new();
        let mut add = |name: &str, extensions: &[&str]| {
            strategies.insert(
                name.to_string(),
                Strategy {
                    extensions: extensions.iter().map(|e| e.to_string()).collect(),
                },
            );
        };

        add("text", &[".txt", ".text"]);
        add("markdown", &[".md", ".markdown", ".mdx"]);
        add("latex", &[".tex"]);
        add("html", &[".html", ".htm", ".xml"]);
        add("json", &[".json"]);
        add("css", &[".css", ".scss", ".sass", ".less"]);
        add(
            "code",
            &[
                ".py", ".js", ".ts", ".jsx", ".tsx", ".java", ".c", ".h", ".cpp", ".hpp", ".cs",
                ".rb", ".go", ".rs", ".swift", ".kt",
            ],
        );

        Self { strategies }
    }
}

impl Config {
    /// Load configuration with priority: explicit path > local file >
    /// global file > built-in defaults. The result is always validated.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = if let Some(path) = explicit {
            Self::from_file(path)?
        } else {
            let local = PathBuf::from(".britfix.toml");
            let global = Self::global_config_path();

            if local.exists() {
                Self::from_file(&local)?
            } else if let Some(path) = global.filter(|p| p.exists()) {
                Self::from_file(&path)?
            } else {
                Self::default()
            }
        };

        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// The `text` and `code` strategies must be present, and every strategy
    /// must claim at least one extension.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        for required in ["text", "code"] {
            if !self.strategies.contains_key(required) {
                return Err(ConfigError::MissingStrategy(required.to_string()));
            }
        }
        for (name, strategy) in &self.strategies {
            if strategy.extensions.is_empty() {
                return Err(ConfigError::NoExtensions(name.clone()));
            }
        }
        Ok(())
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "britfix").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Every extension claimed by any strategy.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.strategies
            .values()
            .flat_map(|s| s.extensions.iter().map(String::as_str))
    }
}
