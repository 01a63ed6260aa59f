// Author: kelexine (https://github.com/kelexine)
// models/mod.rs — Core data structures for the miner

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::locator::DeclarationKind;

/// Source text of one declaration recovered from a diff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodImplementation {
    pub name: String,
    pub kind: DeclarationKind,
    /// 1-indexed, inclusive.
    pub line_start: usize,
    pub line_end: usize,
    pub body: String,
    /// False when the braces never balanced and the body runs to end of file.
    pub terminated: bool,
}

impl MethodImplementation {
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_end.saturating_sub(self.line_start) + 1
    }
}

/// Everything mined from one `<java file> → <diff>` entry.
#[derive(Debug, Clone, Serialize)]
pub struct MethodReport {
    /// The diff JSON this entry came from.
    pub diff_file: PathBuf,
    /// The Java file named by the entry.
    pub file: String,
    pub implementations: Vec<MethodImplementation>,
    /// Candidates the structural index could not place.
    pub unresolved: Vec<String>,
}

impl MethodReport {
    pub fn new(diff_file: PathBuf, file: impl Into<String>) -> Self {
        Self {
            diff_file,
            file: file.into(),
            implementations: Vec::new(),
            unresolved: Vec::new(),
        }
    }

    #[inline]
    pub fn method_count(&self) -> usize {
        self.implementations.len()
    }
}

/// Result of a whole `methods` run.
#[derive(Debug, Default)]
pub struct MiningResult {
    pub reports: Vec<MethodReport>,
    /// Entries that failed outright (unreadable JSON, unparsable source).
    pub skipped: usize,
}

impl MiningResult {
    pub fn total_methods(&self) -> usize {
        self.reports.iter().map(|r| r.method_count()).sum()
    }

    pub fn total_unresolved(&self) -> usize {
        self.reports.iter().map(|r| r.unresolved.len()).sum()
    }

    pub fn unterminated(&self) -> usize {
        self.reports
            .iter()
            .flat_map(|r| &r.implementations)
            .filter(|m| !m.terminated)
            .count()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dataset inputs
// ─────────────────────────────────────────────────────────────────────────────

/// One bug entry of `metadata.json`, keyed by `<project>-<n>`.
#[derive(Debug, Clone, Deserialize)]
pub struct BugRecord {
    pub buggy_commit: String,
    #[serde(default)]
    pub merge_commit: Option<String>,
    #[serde(default)]
    pub execution_result: ExecutionResult,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecutionResult {
    #[serde(default)]
    pub valid_tests: Vec<String>,
    #[serde(default)]
    pub success_tests: Vec<String>,
}

pub type Metadata = BTreeMap<String, BugRecord>;

/// One project entry of `config.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    pub repo_path: PathBuf,
    pub test_prefix: String,
}

pub type ProjectConfigs = BTreeMap<String, ProjectConfig>;

/// Project id of a bug key: everything before the last `-`.
pub fn project_id(bug_key: &str) -> &str {
    bug_key.rsplit_once('-').map_or(bug_key, |(project, _)| project)
}

/// A test identifier split into class and method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestId {
    /// Fully qualified class name.
    pub class: String,
    pub method: String,
}

impl TestId {
    /// Accepts Maven's `pkg.Class#method` as well as `pkg.Class.method`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (class, method) = raw.split_once('#').or_else(|| raw.rsplit_once('.'))?;
        if class.is_empty() || method.is_empty() {
            return None;
        }
        Some(Self {
            class: class.to_string(),
            method: method.to_string(),
        })
    }

    /// `pkg.sub.Class` → `pkg/sub/Class.java`
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.java", self.class.replace('.', "/")))
    }
}

/// Test bodies mined for one bug entry.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectTests {
    pub bug: String,
    pub tests: BTreeMap<String, String>,
    pub missing: Vec<String>,
}

#[derive(Debug, Default)]
pub struct TestMiningResult {
    pub projects: Vec<ProjectTests>,
    pub skipped: usize,
}

impl TestMiningResult {
    pub fn total_tests(&self) -> usize {
        self.projects.iter().map(|p| p.tests.len()).sum()
    }

    pub fn total_missing(&self) -> usize {
        self.projects.iter().map(|p| p.missing.len()).sum()
    }
}
