//! Engine configuration.
//!
//! Values are layered: defaults, then an optional JSON file, then environment
//! variables. Command-line front ends apply their own flags last.

use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default preview window, in characters.
pub const DEFAULT_PREVIEW_LENGTH: usize = 100;

/// Characters of context taken on each side of a phrase occurrence when
/// verifying it against the query's stems.
pub const DEFAULT_PHRASE_CONTEXT: usize = 30;

pub const ENV_PREVIEW_LENGTH: &str = "QUILL_PREVIEW_LENGTH";
pub const ENV_FILE_TYPES: &str = "QUILL_FILE_TYPES";
pub const ENV_PHRASE_CONTEXT: &str = "QUILL_PHRASE_CONTEXT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum preview length in characters
    pub preview_length: usize,

    /// File extensions to index, with or without the leading dot
    pub file_types: Vec<String>,

    /// Context width in characters used by phrase verification; 0 checks
    /// only the matched text
    pub phrase_context: usize,

    /// Follow symbolic links while walking the root directory
    pub follow_links: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            preview_length: DEFAULT_PREVIEW_LENGTH,
            file_types: vec![".txt".to_string()],
            phrase_context: DEFAULT_PHRASE_CONTEXT,
            follow_links: false,
        }
    }
}

impl SearchConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: SearchConfig = serde_json::from_str(&text)?;
        Ok(config)
    }

    /// Apply `QUILL_*` environment overrides on top of this config.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(ENV_PREVIEW_LENGTH) {
            self.preview_length = parse_usize(ENV_PREVIEW_LENGTH, &val)?;
        }
        if let Some(val) = lookup(ENV_PHRASE_CONTEXT) {
            self.phrase_context = parse_usize(ENV_PHRASE_CONTEXT, &val)?;
        }
        if let Some(val) = lookup(ENV_FILE_TYPES) {
            let types: Vec<String> = val
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if !types.is_empty() {
                self.file_types = types;
            }
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.preview_length == 0 {
            return Err(SearchError::InvalidConfig(
                "preview_length must be greater than zero".into(),
            ));
        }
        if self.file_types.iter().all(|ext| ext.trim_start_matches('.').is_empty()) {
            return Err(SearchError::InvalidConfig(
                "file_types must name at least one extension".into(),
            ));
        }
        Ok(())
    }

    /// Whether `path` has one of the configured extensions (case-insensitive).
    pub fn allows_extension(&self, path: &Path) -> bool {
        let ext = match path.extension().and_then(|s| s.to_str()) {
            Some(ext) => ext,
            None => return false,
        };
        self.file_types
            .iter()
            .map(|allowed| allowed.trim_start_matches('.'))
            .any(|allowed| !allowed.is_empty() && allowed.eq_ignore_ascii_case(ext))
    }
}

fn parse_usize(key: &str, val: &str) -> Result<usize> {
    val.trim()
        .parse()
        .map_err(|_| SearchError::InvalidConfig(format!("{key} must be a non-negative integer, got {val:?}")))
}
