//! The page index: `<var_dir>/pages.yaml`, mapping content paths to
//! Confluence page ids.

use relative_path::{Component, RelativePath, RelativePathBuf};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

use crate::ConfigError;

/// One page of the index. Other keys in the file are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEntry {
    #[serde(deserialize_with = "string_or_number")]
    pub page_id: String,
    /// Path segments below the content root, without the `.mdx` extension.
    #[serde(default)]
    pub path: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PageIndex {
    index_path: PathBuf,
    entries: Vec<PageEntry>,
}

impl PageIndex {
    pub fn load_from_path<P: AsRef<Path>>(index_path: P) -> Result<Self, ConfigError> {
        let index_path = index_path.as_ref();
        let content =
            std::fs::read_to_string(index_path).map_err(|source| ConfigError::IndexRead {
                index_path: index_path.to_path_buf(),
                source,
            })?;
        let entries: Vec<PageEntry> =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::IndexParse {
                index_path: index_path.to_path_buf(),
                source,
            })?;
        Ok(PageIndex {
            index_path: index_path.to_path_buf(),
            entries,
        })
    }

    pub fn entries(&self) -> &[PageEntry] {
        &self.entries
    }

    /// Page id of the MDX file at `mdx_path`.
    ///
    /// `mdx_path` must contain `content_root` somewhere along it (a checkout
    /// prefix before it is fine) and end in `.mdx`.
    pub fn resolve(
        &self,
        mdx_path: &RelativePath,
        content_root: &RelativePath,
    ) -> Result<&str, ConfigError> {
        let not_found = || ConfigError::PageNotFound {
            mdx_path: mdx_path.to_string(),
            index_path: self.index_path.clone(),
        };
        let segments = page_segments(mdx_path, content_root).ok_or_else(not_found)?;
        self.entries
            .iter()
            .find(|entry| entry.path == segments)
            .map(|entry| entry.page_id.as_str())
            .ok_or_else(not_found)
    }
}

/// The part of `mdx_path` from `content_root` on, e.g.
/// `src/content/ko/user-manual/intro.mdx` out of a longer checkout path.
pub fn content_path(mdx_path: &RelativePath, content_root: &RelativePath) -> Option<RelativePathBuf> {
    let parts = normal_components(mdx_path);
    let start = root_position(&parts, content_root)?;
    Some(RelativePathBuf::from(parts[start..].join("/")))
}

/// Segments of `mdx_path` after `content_root`, extension dropped.
fn page_segments(mdx_path: &RelativePath, content_root: &RelativePath) -> Option<Vec<String>> {
    if mdx_path.extension() != Some("mdx") {
        return None;
    }
    let parts = normal_components(mdx_path);
    let start = root_position(&parts, content_root)? + normal_components(content_root).len();
    let mut segments: Vec<String> = parts[start..].iter().map(|s| s.to_string()).collect();
    let last = segments.pop()?;
    segments.push(last.strip_suffix(".mdx").unwrap_or(&last).to_string());
    Some(segments)
}

fn root_position(parts: &[&str], content_root: &RelativePath) -> Option<usize> {
    let root = normal_components(content_root);
    if root.is_empty() {
        return None;
    }
    parts.windows(root.len()).position(|w| w == root.as_slice())
}

fn normal_components(path: &RelativePath) -> Vec<&str> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s),
            _ => None,
        })
        .collect()
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(u64),
    }
    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
