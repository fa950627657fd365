// pattern registry - maps a file's base name to the regex that locates its version

use anyhow::{Context, Result, bail};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;

pub const CHANGELOG_FILE: &str = "CHANGELOG.md";
pub const README_FILE: &str = "README.md";

lazy_static! {
    // `## [1.2.3]` release headings
    static ref CHANGELOG_HEADING: Regex = Regex::new(r"## \[([\d.]+)\]").unwrap();
    // `Version: 1.2.3` label anywhere in the readme
    static ref README_LABEL: Regex = Regex::new(r"Version: ([\d.]+)").unwrap();
}

/// a regex bound to one file name, with exactly one capture group for the version token
#[derive(Debug, Clone)]
pub struct VersionPattern {
    file_name: String,
    regex: Regex,
}

impl VersionPattern {
    /// compile `pattern` for `file_name`, rejecting regexes without exactly one capture group
    pub fn new(file_name: impl Into<String>, pattern: &str) -> Result<Self> {
        let file_name = file_name.into();
        let regex = Regex::new(pattern)
            .with_context(|| format!("invalid version pattern for {file_name}"))?;
        Self::from_regex(file_name, regex)
    }

    pub fn from_regex(file_name: impl Into<String>, regex: Regex) -> Result<Self> {
        let file_name = file_name.into();
        if file_name.is_empty() {
            bail!("version pattern needs a file name");
        }
        // captures_len counts the implicit whole-match group
        let groups = regex.captures_len() - 1;
        if groups != 1 {
            bail!(
                "version pattern for {file_name} must have exactly one capture group, found {groups}"
            );
        }
        Ok(Self { file_name, regex })
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// file name -> pattern table consulted by the rewriter
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    patterns: BTreeMap<String, VersionPattern>,
}

impl PatternRegistry {
    /// an empty registry; every lookup misses
    pub fn new() -> Self {
        Self::default()
    }

    /// the changelog and readme patterns
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for (name, regex) in [
            (CHANGELOG_FILE, &*CHANGELOG_HEADING),
            (README_FILE, &*README_LABEL),
        ] {
            registry.patterns.insert(
                name.to_string(),
                VersionPattern {
                    file_name: name.to_string(),
                    regex: regex.clone(),
                },
            );
        }
        registry
    }

    /// add a pattern, replacing (and returning) any existing one for the same file name
    pub fn register(&mut self, pattern: VersionPattern) -> Option<VersionPattern> {
        self.patterns.insert(pattern.file_name.clone(), pattern)
    }

    pub fn get(&self, file_name: &str) -> Option<&VersionPattern> {
        self.patterns.get(file_name)
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.patterns.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_knows_changelog_and_readme() {
        let registry = PatternRegistry::builtin();
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.file_names().collect::<Vec<_>>(),
            vec![CHANGELOG_FILE, README_FILE]
        );
        assert_eq!(registry.get(CHANGELOG_FILE).unwrap().as_str(), r"## \[([\d.]+)\]");
        assert!(registry.get("LICENSE").is_none());
        assert!(!registry.is_empty());
        assert!(PatternRegistry::new().is_empty());
    }

    #[test]
    fn lookup_is_exact_on_file_name() {
        let registry = PatternRegistry::builtin();
        assert!(registry.get("changelog.md").is_none());
        assert!(registry.get("docs/README.md").is_none());
    }

    #[test]
    fn rejects_patterns_without_a_single_capture_group() {
        let err = VersionPattern::new("VERSION", r"\d+\.\d+").unwrap_err();
        assert!(err.to_string().contains("found 0"));

        let err = VersionPattern::new("VERSION", r"(\d+)\.(\d+)").unwrap_err();
        assert!(err.to_string().contains("found 2"));

        assert!(VersionPattern::new("VERSION", r"(?:v)?(\d+\.\d+)").is_ok());
    }

    #[test]
    fn rejects_invalid_regex() {
        let err = VersionPattern::new("VERSION", r"([\d.]+").unwrap_err();
        assert!(err.to_string().contains("invalid version pattern for VERSION"));
    }

    #[test]
    fn register_replaces_existing_entry() {
        let mut registry = PatternRegistry::builtin();
        let custom = VersionPattern::new(README_FILE, r"v([\d.]+)").unwrap();
        let previous = registry.register(custom).expect("builtin readme pattern");
        assert_eq!(previous.as_str(), r"Version: ([\d.]+)");
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(README_FILE).unwrap().as_str(), r"v([\d.]+)");

        let added = VersionPattern::new("pyproject.toml", r#"version = "([\d.]+)""#).unwrap();
        assert!(registry.register(added).is_none());
        assert_eq!(registry.len(), 3);
    }
}
