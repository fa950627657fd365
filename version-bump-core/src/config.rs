//! `version-bump.toml` loading.
//!
//! The config file is optional. It can replace the candidate file list and add
//! (or override) file name -> regex entries in the pattern registry.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::patterns::{CHANGELOG_FILE, PatternRegistry, README_FILE, VersionPattern};

/// looked up in the project root when no explicit path is given
pub const CONFIG_FILE_NAME: &str = "version-bump.toml";

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct VersionBumpConfig {
    /// candidate files relative to the project root; `None` keeps the defaults
    pub files: Option<Vec<PathBuf>>,

    /// extra patterns keyed by base file name, registered over the builtins
    pub patterns: BTreeMap<String, String>,
}

impl VersionBumpConfig {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("failed to parse version-bump config")
    }

    /// load the config for `root`.
    ///
    /// an explicit `path` must exist; the default `<root>/version-bump.toml` may be absent.
    pub fn load(root: &Path, path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (root.join(CONFIG_FILE_NAME), false),
        };

        if !required && !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::parse(&text).with_context(|| format!("in {}", path.display()))?;
        debug!(path = %path.display(), patterns = config.patterns.len(), "loaded config");
        Ok(config)
    }

    /// candidate list, falling back to the changelog and readme
    pub fn candidate_files(&self) -> Vec<PathBuf> {
        match &self.files {
            Some(files) => files.clone(),
            None => default_candidates(),
        }
    }

    /// builtin registry plus every configured pattern
    pub fn registry(&self) -> Result<PatternRegistry> {
        let mut registry = PatternRegistry::builtin();
        for (file_name, pattern) in &self.patterns {
            if let Some(previous) = registry.register(VersionPattern::new(file_name, pattern)?) {
                debug!(file = %file_name, old = previous.as_str(), new = %pattern, "pattern overridden");
            }
        }
        Ok(registry)
    }
}

pub fn default_candidates() -> Vec<PathBuf> {
    vec![PathBuf::from(CHANGELOG_FILE), PathBuf::from(README_FILE)]
}
