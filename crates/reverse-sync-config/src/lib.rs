mod pages;

pub use pages::{PageEntry, PageIndex, content_path};

use relative_path::RelativePathBuf;
use reverse_sync_engine::MatchOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to read page index at {index_path}: {source}")]
    IndexRead {
        index_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse page index at {index_path}: {source}")]
    IndexParse {
        index_path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("No page for {mdx_path} in {index_path}")]
    PageNotFound {
        mdx_path: String,
        index_path: PathBuf,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the per-page working directories and `pages.yaml`.
    pub var_dir: PathBuf,
    /// Prefix of MDX paths listed in the page index.
    pub content_root: RelativePathBuf,
    pub converter: ConverterConfig,
    pub matching: MatchingConfig,
}

/// The forward converter command.
///
/// `args` may contain `{input}`, `{output}`, `{page_dir}` and `{page_id}`
/// placeholders, substituted per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub program: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub min_prefix_chars: usize,
    pub min_containment_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            var_dir: PathBuf::from("var"),
            content_root: RelativePathBuf::from("src/content/ko"),
            converter: ConverterConfig::default(),
            matching: MatchingConfig::default(),
        }
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        ConverterConfig {
            program: "python3".to_string(),
            args: [
                "bin/confluence_xhtml_to_markdown.py",
                "--log-level",
                "warning",
                "{input}",
                "{output}",
                "--attachment-dir",
                "/{page_id}/verify",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        let options = MatchOptions::default();
        MatchingConfig {
            min_prefix_chars: options.min_prefix_chars,
            min_containment_chars: options.min_containment_chars,
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the var directory
        config.var_dir = Self::expand_path(&config.var_dir).unwrap_or(config.var_dir);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/reverse-sync");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Matcher thresholds for the engine.
    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            min_prefix_chars: self.matching.min_prefix_chars,
            min_containment_chars: self.matching.min_containment_chars,
        }
    }

    /// Working directory of one page: `<var_dir>/<page_id>`.
    pub fn page_dir(&self, page_id: &str) -> PathBuf {
        self.var_dir.join(page_id)
    }

    pub fn page_index_path(&self) -> PathBuf {
        self.var_dir.join("pages.yaml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
