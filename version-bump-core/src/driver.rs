use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::default_candidates;
use crate::rewriter::{UpdateResult, VersionRewriter, file_name_of};

/// the project root and the candidate files below it
#[derive(Debug, Clone)]
pub struct ProjectFiles {
    root: PathBuf,
    candidates: Vec<PathBuf>,
}

impl ProjectFiles {
    /// `candidates` are joined onto `root`; absolute candidates are used as-is
    pub fn new(root: impl Into<PathBuf>, candidates: Vec<PathBuf>) -> Self {
        Self {
            root: root.into(),
            candidates,
        }
    }

    /// the changelog and readme directly under `root`
    pub fn with_defaults(root: impl Into<PathBuf>) -> Self {
        Self::new(root, default_candidates())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// full paths of every candidate, existing or not
    pub fn paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.candidates.iter().map(|c| self.root.join(c))
    }

    /// candidates present on disk, in list order.
    ///
    /// anything that exists is kept, so a directory in a candidate's place fails on read.
    pub fn existing(&self) -> Vec<PathBuf> {
        self.paths()
            .filter(|p| {
                let present = p.exists();
                if !present {
                    debug!(path = %p.display(), "candidate missing, skipping");
                }
                present
            })
            .collect()
    }
}

/// per-file result of an update run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub file_name: String,
    pub result: UpdateResult,
}

/// versions detected in one file during a check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileVersions {
    pub path: PathBuf,
    pub file_name: String,
    pub versions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub files: Vec<FileVersions>,
}

impl CheckReport {
    /// every distinct token seen across all files, sorted
    pub fn distinct_versions(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self
            .files
            .iter()
            .flat_map(|f| f.versions.iter().map(String::as_str))
            .collect();
        set.into_iter().collect()
    }

    /// true when at most one distinct version was found
    pub fn is_consistent(&self) -> bool {
        self.distinct_versions().len() <= 1
    }
}

/// drives the rewriter over the project's candidate files
#[derive(Debug, Clone)]
pub struct VersionUpdater {
    files: ProjectFiles,
    rewriter: VersionRewriter,
}

impl VersionUpdater {
    pub fn new(files: ProjectFiles, rewriter: VersionRewriter) -> Self {
        Self { files, rewriter }
    }

    /// rewrite each existing candidate to `version`; missing candidates are skipped silently.
    ///
    /// with `dry_run` nothing is written but the reports say what would change.
    pub fn update(&self, version: &str, dry_run: bool) -> Result<Vec<FileReport>> {
        let mut reports = Vec::new();
        for path in self.files.existing() {
            let result = if dry_run {
                self.rewriter.preview_version(&path, version)?
            } else {
                self.rewriter.rewrite_version(&path, version)?
            };
            reports.push(FileReport {
                file_name: file_name_of(&path),
                path,
                result,
            });
        }
        Ok(reports)
    }

    /// read-only scan of the versions currently present in each existing candidate
    pub fn check(&self) -> Result<CheckReport> {
        self.scan(None)
    }

    /// the versions each candidate would hold after updating to `version`; nothing is written
    pub fn check_preview(&self, version: &str) -> Result<CheckReport> {
        self.scan(Some(version))
    }

    fn scan(&self, pending: Option<&str>) -> Result<CheckReport> {
        let mut report = CheckReport::default();
        for path in self.files.existing() {
            let file_name = file_name_of(&path);
            if self.rewriter.registry().get(&file_name).is_none() {
                debug!(file = %file_name, "no version pattern registered, not checked");
                continue;
            }
            let mut content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            if let Some(updated) =
                pending.and_then(|v| self.rewriter.rewrite_content(&file_name, &content, v))
            {
                content = updated;
            }
            let versions = self
                .rewriter
                .detect_versions(&file_name, &content)
                .unwrap_or_default();
            report.files.push(FileVersions {
                path,
                file_name,
                versions,
            });
        }
        Ok(report)
    }
}
