// Author: kelexine (https://github.com/kelexine)
// miner.rs — Diff discovery, changed-method extraction, test-method extraction

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::cli::{MethodsArgs, TestsArgs};
use crate::config::GlobalConfig;
use crate::diff::reconstruct_buggy_source;
use crate::export;
use crate::locator::{DeclarationCandidate, DeclarationRules, changed_declarations};
use crate::models::{
    BugRecord, Metadata, MethodImplementation, MethodReport, MiningResult, ProjectConfig,
    ProjectConfigs, ProjectTests, TestId, TestMiningResult, project_id,
};
use crate::resolver::{JavaIndex, StructuralIndex};
use crate::span::{
    ExtractedSpan, Position, SourceBuffer, SpanError, extract_span, extract_span_from,
};

/// Below this many inputs the rayon pool costs more than it saves.
const PARALLEL_THRESHOLD: usize = 8;

/// Configuration for a `methods` run.
#[derive(Clone, Debug)]
pub struct MethodsConfig {
    pub diff_dir: PathBuf,
    pub output_dir: PathBuf,
    pub export: Option<PathBuf>,
    pub rules: DeclarationRules,
    pub parallel: bool,
    pub verbose: bool,
}

impl MethodsConfig {
    pub fn from_args(args: &MethodsArgs) -> Result<Self> {
        let diff_dir = args
            .diff_dir
            .canonicalize()
            .with_context(|| format!("Cannot resolve directory: {}", args.diff_dir.display()))?;

        if !diff_dir.is_dir() {
            anyhow::bail!("Not a directory: {}", diff_dir.display());
        }

        let global_config = GlobalConfig::load();
        let output_dir = args
            .output
            .clone()
            .or_else(|| global_config.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from("method_implementations"));

        Ok(Self {
            diff_dir,
            output_dir,
            export: args.export.clone(),
            rules: global_config.rules(&args.locator.type_markers),
            parallel: !args.no_parallel && !global_config.no_parallel.unwrap_or(false),
            verbose: args.verbose,
        })
    }
}

/// Configuration for a `tests` run.
#[derive(Clone, Debug)]
pub struct TestsConfig {
    pub metadata: PathBuf,
    pub config: PathBuf,
    pub output: PathBuf,
    pub parallel: bool,
    pub verbose: bool,
}

impl TestsConfig {
    pub fn from_args(args: &TestsArgs) -> Self {
        let global_config = GlobalConfig::load();
        Self {
            metadata: args.metadata.clone(),
            config: args.config.clone(),
            output: args.output.clone(),
            parallel: !args.no_parallel && !global_config.no_parallel.unwrap_or(false),
            verbose: args.verbose,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Changed methods
// ─────────────────────────────────────────────────────────────────────────────

/// Resolve each candidate through `index` and extract its block from `source`.
///
/// Candidates the index cannot place are returned by name in the second list.
pub fn extract_declarations<I>(
    index: &dyn StructuralIndex,
    source: &str,
    candidates: I,
) -> Result<(Vec<MethodImplementation>, Vec<String>), SpanError>
where
    I: IntoIterator<Item = DeclarationCandidate>,
{
    let buffer = SourceBuffer::from_text(source);
    let mut found = Vec::new();
    let mut unresolved = Vec::new();

    for candidate in candidates {
        let Some(site) = index.locate(&candidate) else {
            unresolved.push(candidate.name);
            continue;
        };
        let first_line = site.start.to_position()?.line;
        let span = extract_span_from(&buffer, first_line, site.scan_from.to_position()?)?;
        found.push(MethodImplementation {
            name: candidate.name,
            kind: candidate.kind,
            line_start: first_line + 1,
            line_end: span.end.line + 1,
            body: span.text,
            terminated: span.terminated,
        });
    }

    Ok((found, unresolved))
}

/// Mine one `<java file> → <diff>` entry.
pub fn mine_diff(
    diff_file: &Path,
    file: &str,
    diff: &str,
    rules: &DeclarationRules,
) -> Result<MethodReport> {
    let mut report = MethodReport::new(diff_file.to_path_buf(), file);
    let candidates = changed_declarations(diff, rules);
    if candidates.is_empty() {
        return Ok(report);
    }

    let source = reconstruct_buggy_source(diff);
    let index = JavaIndex::parse(&source)
        .with_context(|| format!("Cannot parse buggy side of {}", file))?;
    let (implementations, unresolved) = extract_declarations(&index, &source, candidates)?;
    report.implementations = implementations;
    report.unresolved = unresolved;
    Ok(report)
}

/// Read a diff JSON: `{ "<java file>": "<diff text>", ... }`.
pub fn load_diff_file(path: &Path) -> Result<BTreeMap<String, String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Malformed diff JSON {}", path.display()))
}

/// All `*.json` files under `dir`, sorted.
pub fn find_diff_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|x| x.to_str())
                .is_some_and(|x| x.eq_ignore_ascii_case("json"))
        })
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort_unstable();
    files
}

fn process_diff_file(path: &Path, config: &MethodsConfig) -> Result<(Vec<MethodReport>, usize)> {
    let entries = load_diff_file(path)?;
    let mut reports = Vec::with_capacity(entries.len());
    let mut skipped = 0;

    for (file, diff) in &entries {
        match mine_diff(path, file, diff, &config.rules) {
            Ok(report) => {
                if config.verbose {
                    eprintln!(
                        "{} {}: {} method(s), {} unresolved",
                        "[INFO]".cyan(),
                        file,
                        report.method_count(),
                        report.unresolved.len()
                    );
                }
                reports.push(report);
            }
            Err(e) => {
                eprintln!("{} Skipped {} in {}: {:#}", "[WARN]".yellow(), file, path.display(), e);
                skipped += 1;
            }
        }
    }

    Ok((reports, skipped))
}

/// Run the full `methods` pipeline and write one CSV per diff entry.
pub fn run_methods(config: &MethodsConfig) -> Result<MiningResult> {
    let files = find_diff_files(&config.diff_dir);

    let handle = |path: &PathBuf| match process_diff_file(path, config) {
        Ok(out) => Some(out),
        Err(e) => {
            eprintln!("{} Skipped {}: {:#}", "[WARN]".yellow(), path.display(), e);
            None
        }
    };

    let outcomes: Vec<Option<(Vec<MethodReport>, usize)>> =
        if config.parallel && files.len() > PARALLEL_THRESHOLD {
            files.par_iter().map(handle).collect()
        } else {
            files.iter().map(handle).collect()
        };

    let mut result = MiningResult::default();
    for outcome in outcomes {
        match outcome {
            Some((reports, skipped)) => {
                result.reports.extend(reports);
                result.skipped += skipped;
            }
            None => result.skipped += 1,
        }
    }

    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("Cannot create {}", config.output_dir.display()))?;
    for report in &result.reports {
        let path = export::csv::csv_path(&config.output_dir, report);
        export::csv::export_method_csv(report, &path)?;
    }

    Ok(result)
}

// ─────────────────────────────────────────────────────────────────────────────
// Single spans
// ─────────────────────────────────────────────────────────────────────────────

/// Extract the block at a 1-indexed line/column of a file on disk.
pub fn extract_file_span(path: &Path, line: usize, column: usize) -> Result<ExtractedSpan> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    let start = Position::from_one_based(line, column)?;
    Ok(extract_span(&SourceBuffer::from_text(&content), start)?)
}

// ─────────────────────────────────────────────────────────────────────────────
// Test methods
// ─────────────────────────────────────────────────────────────────────────────

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Malformed JSON {}", path.display()))
}

/// Where a test class lives. A relative `test_prefix` is taken from the repo root.
pub fn test_file_path(project: &ProjectConfig, id: &TestId) -> PathBuf {
    let prefix = Path::new(&project.test_prefix);
    let base = if prefix.is_absolute() {
        prefix.to_path_buf()
    } else {
        project.repo_path.join(prefix)
    };
    base.join(id.relative_path())
}

/// Extract one method by name from a Java file. `Ok(None)` when the file
/// parses but has no such method.
pub fn extract_test_method(test_file: &Path, method: &str) -> Result<Option<String>> {
    let source = std::fs::read_to_string(test_file)
        .with_context(|| format!("Cannot read {}", test_file.display()))?;
    let index = JavaIndex::parse(&source)
        .with_context(|| format!("Cannot parse {}", test_file.display()))?;
    let (mut found, _) =
        extract_declarations(&index, &source, [DeclarationCandidate::method(method)])?;
    Ok(found.pop().map(|m| m.body))
}

/// Mine the success tests of one bug. `None` when the project has no config.
pub fn mine_project_tests(
    bug_key: &str,
    bug: &BugRecord,
    projects: &ProjectConfigs,
    verbose: bool,
) -> Option<ProjectTests> {
    let project = projects.get(project_id(bug_key));
    let Some(project) = project else {
        eprintln!(
            "{} Config not found for project {}. Skipping {}",
            "[WARN]".yellow(),
            project_id(bug_key),
            bug_key
        );
        return None;
    };

    let results = &bug.execution_result;
    if results.valid_tests.len() > 1 {
        eprintln!(
            "{} {}: {} valid tests, expected one",
            "[WARNING]".yellow(),
            bug_key,
            results.valid_tests.len()
        );
    }

    let mut mined = ProjectTests {
        bug: bug_key.to_string(),
        ..Default::default()
    };

    for test in &results.success_tests {
        if !results.valid_tests.contains(test) {
            eprintln!("{} {}: {} is not a valid test", "[WARN]".yellow(), bug_key, test);
            mined.missing.push(test.clone());
            continue;
        }
        let Some(id) = TestId::parse(test) else {
            eprintln!("{} {}: cannot split test id {}", "[WARN]".yellow(), bug_key, test);
            mined.missing.push(test.clone());
            continue;
        };

        let path = test_file_path(project, &id);
        match extract_test_method(&path, &id.method) {
            Ok(Some(body)) => {
                if verbose {
                    eprintln!("{} {}: {} ({} lines)", "[INFO]".cyan(), bug_key, test, body.lines().count());
                }
                mined.tests.insert(test.clone(), body);
            }
            Ok(None) => {
                eprintln!(
                    "{} {}: test method {} not found in {}",
                    "[WARN]".yellow(),
                    bug_key,
                    id.method,
                    path.display()
                );
                mined.missing.push(test.clone());
            }
            Err(e) => {
                eprintln!("{} {}: {:#}", "[WARN]".yellow(), bug_key, e);
                mined.missing.push(test.clone());
            }
        }
    }

    Some(mined)
}

/// Run the full `tests` pipeline and write the JSON output.
pub fn run_tests(config: &TestsConfig) -> Result<TestMiningResult> {
    let metadata: Metadata = load_json(&config.metadata)?;
    let projects: ProjectConfigs = load_json(&config.config)?;

    let bugs: Vec<(&String, &BugRecord)> = metadata.iter().collect();
    let handle = |(key, bug): &(&String, &BugRecord)| {
        mine_project_tests(key, bug, &projects, config.verbose)
    };

    let mined: Vec<Option<ProjectTests>> = if config.parallel && bugs.len() > PARALLEL_THRESHOLD {
        bugs.par_iter().map(handle).collect()
    } else {
        bugs.iter().map(handle).collect()
    };

    let mut result = TestMiningResult::default();
    for entry in mined {
        match entry {
            Some(project) => result.projects.push(project),
            None => result.skipped += 1,
        }
    }

    export::json::export_tests(&result, &config.output)?;
    Ok(result)
}
