use ahash::AHashSet;
use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::helpers;

pub const CONFIG_FILE_NAME: &str = "strip-comments.json";

/// Contents of `strip-comments.json`. Every field is optional.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// File extensions to strip, with or without the leading dot.
    pub extensions: Option<Vec<String>>,
    /// Directory names that are never descended into, e.g. `vendor`.
    pub ignore: Option<Vec<String>>,
    /// Regex a file name must match to be stripped.
    pub filter: Option<String>,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Config> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&contents).with_context(|| format!("Could not parse {}", path.display()))
    }

    /// Read `strip-comments.json` from `dir`, or fall back to the defaults
    /// when there is none.
    pub fn discover(dir: &Path) -> Result<Config> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            log::debug!("Using config {}", path.display());
            Config::from_file(&path)
        } else {
            Ok(Config::default())
        }
    }

    /// Command line values replace the ones from the file.
    pub fn with_overrides(mut self, extensions: &[String], filter: Option<String>) -> Config {
        if !extensions.is_empty() {
            self.extensions = Some(extensions.to_vec());
        }
        if filter.is_some() {
            self.filter = filter;
        }
        self
    }

    pub fn extension_set(&self) -> AHashSet<String> {
        match &self.extensions {
            Some(extensions) if !extensions.is_empty() => extensions
                .iter()
                .map(|ext| helpers::normalize_extension(ext))
                .collect(),
            _ => helpers::DEFAULT_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }

    pub fn ignored_dirs(&self) -> AHashSet<String> {
        self.ignore.iter().flatten().cloned().collect()
    }

    pub fn filter_regex(&self) -> Result<Option<Regex>> {
        self.filter
            .as_deref()
            .map(|filter| Regex::new(filter).with_context(|| format!("Invalid filter regex: {filter}")))
            .transpose()
    }
}
