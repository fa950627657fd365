use anyhow::{Context, Result};
use regex::Captures;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::patterns::PatternRegistry;

/// outcome of rewriting one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateResult {
    /// content changed and the file was (or, in a dry run, would be) rewritten
    Updated,
    /// no pattern for this file name, no match, or the version was already current
    Unchanged,
}

impl UpdateResult {
    pub fn is_updated(self) -> bool {
        self == UpdateResult::Updated
    }
}

/// swaps the captured version token in files whose name has a registered pattern
#[derive(Debug, Clone)]
pub struct VersionRewriter {
    registry: PatternRegistry,
}

impl Default for VersionRewriter {
    fn default() -> Self {
        Self::new(PatternRegistry::builtin())
    }
}

impl VersionRewriter {
    pub fn new(registry: PatternRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    /// rewrite every match in `content`, returning `None` when `file_name` has no pattern.
    ///
    /// only the capture span is replaced; the rest of each match is kept as-is and
    /// `new_version` is inserted literally.
    pub fn rewrite_content(
        &self,
        file_name: &str,
        content: &str,
        new_version: &str,
    ) -> Option<String> {
        let pattern = self.registry.get(file_name)?;
        let rewritten = pattern.regex().replace_all(content, |caps: &Captures| {
            match (caps.get(0), caps.get(1)) {
                (Some(whole), Some(version)) => {
                    let text = whole.as_str();
                    let start = version.start() - whole.start();
                    let end = version.end() - whole.start();
                    format!("{}{}{}", &text[..start], new_version, &text[end..])
                }
                // optional group that did not take part in this match
                _ => caps[0].to_string(),
            }
        });
        Some(rewritten.into_owned())
    }

    /// every version token the file's pattern captures, in order of appearance
    pub fn detect_versions(&self, file_name: &str, content: &str) -> Option<Vec<String>> {
        let pattern = self.registry.get(file_name)?;
        Some(
            pattern
                .regex()
                .captures_iter(content)
                .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
                .collect(),
        )
    }

    /// rewrite the file at `path` in place; the file is only written when its content changes
    pub fn rewrite_version(&self, path: &Path, new_version: &str) -> Result<UpdateResult> {
        self.apply(path, new_version, true)
    }

    /// same decision as `rewrite_version` without touching the file
    pub fn preview_version(&self, path: &Path, new_version: &str) -> Result<UpdateResult> {
        self.apply(path, new_version, false)
    }

    fn apply(&self, path: &Path, new_version: &str, write: bool) -> Result<UpdateResult> {
        // a lookup miss never touches the file, whatever it holds
        let file_name = file_name_of(path);
        if self.registry.get(&file_name).is_none() {
            debug!(file = %file_name, "no version pattern registered");
            return Ok(UpdateResult::Unchanged);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let updated = self
            .rewrite_content(&file_name, &content, new_version)
            .unwrap_or_else(|| content.clone());

        if updated == content {
            debug!(file = %file_name, version = new_version, "content already current");
            return Ok(UpdateResult::Unchanged);
        }

        if write {
            fs::write(path, updated)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), version = new_version, "rewrote version");
        } else {
            debug!(path = %path.display(), version = new_version, "dry run, not writing");
        }
        Ok(UpdateResult::Updated)
    }
}

/// base name used for pattern lookup
pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
