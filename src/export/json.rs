// Author: kelexine (https://github.com/kelexine)
// export/json.rs — JSON and JSONL export logic

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use serde_json::json;

use crate::models::{MethodReport, MiningResult, TestMiningResult};

fn create(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create {}", parent.display()))?;
    }
    let f = File::create(path).with_context(|| format!("Cannot create {}", path.display()))?;
    Ok(BufWriter::new(f))
}

pub fn export_summary(result: &MiningResult, path: &Path) -> Result<()> {
    let data = json!({
        "metadata": {
            "total_files": result.reports.len(),
            "total_methods": result.total_methods(),
            "total_unresolved": result.total_unresolved(),
            "unterminated": result.unterminated(),
            "skipped": result.skipped,
            "timestamp": Utc::now().to_rfc3339(),
            "generator": concat!("fixmine v", env!("CARGO_PKG_VERSION"), " by kelexine (https://github.com/kelexine)"),
        },
        "files": result.reports.iter().map(report_to_value).collect::<Vec<_>>(),
    });

    serde_json::to_writer_pretty(create(path)?, &data)
        .with_context(|| "Failed to serialize JSON")?;

    eprintln!("{} Exported JSON → {}", "[SUCCESS]".green(), path.display());
    Ok(())
}

pub fn export_summary_jsonl(result: &MiningResult, path: &Path) -> Result<()> {
    let mut writer = create(path)?;

    for report in &result.reports {
        let line = serde_json::to_string(&report_to_value(report))
            .with_context(|| "Failed to serialize JSONL record")?;
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;

    eprintln!("{} Exported JSONL → {}", "[SUCCESS]".green(), path.display());
    Ok(())
}

pub fn report_to_value(report: &MethodReport) -> serde_json::Value {
    json!({
        "diff_file": report.diff_file.to_string_lossy(),
        "file": report.file,
        "method_count": report.method_count(),
        "methods": report.implementations.iter().map(|m| {
            json!({
                "name": m.name,
                "kind": m.kind,
                "line_start": m.line_start,
                "line_end": m.line_end,
                "line_count": m.line_count(),
                "terminated": m.terminated,
                "body": m.body,
            })
        }).collect::<Vec<_>>(),
        "unresolved": report.unresolved,
    })
}

/// `{ "<bug>": { "<test id>": "<body>", ... }, ... }`
pub fn export_tests(result: &TestMiningResult, path: &Path) -> Result<()> {
    let data: serde_json::Map<String, serde_json::Value> = result
        .projects
        .iter()
        .map(|p| (p.bug.clone(), json!(p.tests)))
        .collect();

    serde_json::to_writer_pretty(create(path)?, &data)
        .with_context(|| "Failed to serialize JSON")?;

    eprintln!("{} Exported test methods → {}", "[SUCCESS]".green(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProjectTests;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_summary_shape() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/summary.json");
        let mut report = MethodReport::new(PathBuf::from("a.json"), "A.java");
        report.unresolved.push("ghost".into());
        let result = MiningResult {
            reports: vec![report],
            skipped: 2,
        };

        export_summary(&result, &path).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["metadata"]["total_files"], 1);
        assert_eq!(parsed["metadata"]["skipped"], 2);
        assert_eq!(parsed["files"][0]["unresolved"][0], "ghost");
    }

    #[test]
    fn test_tests_export_shape() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tests.json");
        let mut project = ProjectTests {
            bug: "demo-1".into(),
            ..Default::default()
        };
        project.tests.insert("a.BTest#t".into(), "void t() {}".into());
        let result = TestMiningResult {
            projects: vec![project],
            skipped: 0,
        };

        export_tests(&result, &path).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["demo-1"]["a.BTest#t"], "void t() {}");
    }
}
