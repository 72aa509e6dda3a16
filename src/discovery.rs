//! Log Locators
//!
//! Resolves the well-known locations of the three input sources under the
//! Claude Code home directory. Every category tolerates absence: a missing
//! file or an empty glob is valid input for the rest of the pipeline, never
//! an error.

use crate::config::get_config;
use glob::glob;
use std::path::{Path, PathBuf};

/// Handles file system traversal and discovery of Claude Code log files.
pub struct LogLocator {
    base: PathBuf,
}

impl Default for LogLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl LogLocator {
    /// Locator rooted at the configured Claude home (respects CLAUDE_HOME).
    pub fn new() -> Self {
        Self {
            base: get_config().paths.claude_home.clone(),
        }
    }

    /// Locator rooted at an explicit base directory.
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Path to stats-cache.json, if present and a regular file.
    pub fn cache_file(&self) -> Option<PathBuf> {
        let path = self.base.join("stats-cache.json");
        path.is_file().then_some(path)
    }

    /// Path to history.jsonl, if present and a regular file.
    pub fn history_file(&self) -> Option<PathBuf> {
        let path = self.base.join("history.jsonl");
        path.is_file().then_some(path)
    }

    /// All per-project transcript files (`projects/*/*.jsonl`). Hidden
    /// project directories are skipped; results are sorted so repeated runs
    /// visit files in the same order.
    pub fn transcript_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let pattern = self.base.join("projects").join("*").join("*.jsonl");
        if let Ok(paths) = glob(&pattern.to_string_lossy()) {
            for entry in paths.flatten() {
                if Self::in_hidden_project_dir(&entry) {
                    continue;
                }
                files.push(entry);
            }
        }

        files.sort();
        files
    }

    fn in_hidden_project_dir(path: &Path) -> bool {
        path.parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with('.'))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_empty_base_yields_nothing() {
        let temp = TempDir::new().unwrap();
        let locator = LogLocator::with_base(temp.path());
        assert!(locator.cache_file().is_none());
        assert!(locator.history_file().is_none());
        assert!(locator.transcript_files().is_empty());
    }

    #[test]
    fn test_discovers_all_sources() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("stats-cache.json"), "{}").unwrap();
        fs::write(temp.path().join("history.jsonl"), "").unwrap();

        let proj = temp.path().join("projects").join("-home-user-app");
        fs::create_dir_all(&proj).unwrap();
        fs::write(proj.join("a.jsonl"), "").unwrap();
        fs::write(proj.join("b.jsonl"), "").unwrap();

        let hidden = temp.path().join("projects").join(".internal");
        fs::create_dir_all(&hidden).unwrap();
        fs::write(hidden.join("c.jsonl"), "").unwrap();

        let locator = LogLocator::with_base(temp.path());
        assert!(locator.cache_file().is_some());
        assert!(locator.history_file().is_some());

        let transcripts = locator.transcript_files();
        assert_eq!(transcripts.len(), 2);
        assert!(transcripts[0] < transcripts[1]);
    }
}
