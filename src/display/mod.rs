// Author: kelexine (https://github.com/kelexine)
// display/mod.rs — Colored terminal reports for mining runs

use std::collections::BTreeSet;
use std::path::Path;

use colored::*;

use crate::locator::{DeclarationCandidate, DeclarationKind};
use crate::models::{MiningResult, TestMiningResult};
use crate::span::ExtractedSpan;

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn fmt_num(n: usize) -> String {
    // Thousands-separator formatting
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let tail: String = s.chars().rev().take(max.saturating_sub(3)).collect();
        format!("...{}", tail.chars().rev().collect::<String>())
    }
}

fn kind_label(kind: DeclarationKind) -> &'static str {
    match kind {
        DeclarationKind::MethodOrConstructor => "method",
        DeclarationKind::Class => "class",
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// methods
// ─────────────────────────────────────────────────────────────────────────────

pub fn display_method_results(result: &MiningResult, root: &Path, output_dir: &Path) {
    println!();
    println!("{}", "Changed Methods:".bold());
    println!();
    println!("{:<28} {:<44} {:>8} {:>11}", "Diff", "File", "Methods", "Unresolved");
    println!("{}", "-".repeat(94));

    for report in &result.reports {
        let diff = report
            .diff_file
            .strip_prefix(root)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| report.diff_file.display().to_string());

        let count = format!("{:>8}", fmt_num(report.method_count()));
        let count = if report.method_count() == 0 {
            count.cyan().to_string()
        } else {
            count.green().to_string()
        };
        let unresolved = format!("{:>11}", report.unresolved.len());
        let unresolved = if report.unresolved.is_empty() {
            unresolved.normal().to_string()
        } else {
            unresolved.yellow().to_string()
        };

        println!(
            "{:<28} {:<44} {} {}",
            truncate(&diff, 26),
            truncate(&report.file, 42),
            count,
            unresolved
        );
        for name in &report.unresolved {
            println!("    {} {}", "unresolved:".yellow(), name);
        }
    }

    println!();
    println!("{}", "=".repeat(70));
    println!(
        "{} {}",
        "[SUCCESS]".green().bold(),
        format!("Methods Extracted: {}", fmt_num(result.total_methods())).bold()
    );
    println!(
        "{} Diff Entries: {}",
        "[INFO]   ".blue(),
        fmt_num(result.reports.len())
    );
    println!("{} CSV Output:   {}", "[INFO]   ".blue(), output_dir.display());

    if result.total_unresolved() > 0 {
        println!(
            "{} {} candidate(s) not found in the reconstructed source",
            "[WARN]   ".yellow(),
            fmt_num(result.total_unresolved())
        );
    }
    if result.unterminated() > 0 {
        println!(
            "{} {} method(s) never closed their braces",
            "[WARN]   ".yellow(),
            fmt_num(result.unterminated())
        );
    }
    if result.skipped > 0 {
        println!(
            "{} {} entries skipped",
            "[WARN]   ".yellow(),
            fmt_num(result.skipped)
        );
    }

    println!("{}", "=".repeat(70));
    println!();
}

// ─────────────────────────────────────────────────────────────────────────────
// changed
// ─────────────────────────────────────────────────────────────────────────────

pub fn display_changed(file: &str, candidates: &BTreeSet<DeclarationCandidate>) {
    println!("{}", file.blue().bold());
    if candidates.is_empty() {
        println!("    {}", "(no declarations found)".dimmed());
        return;
    }
    for candidate in candidates {
        println!("    {:<7} {}", kind_label(candidate.kind), candidate.name.green());
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// span
// ─────────────────────────────────────────────────────────────────────────────

/// The block goes to stdout untouched so it can be piped.
pub fn display_span(span: &ExtractedSpan) {
    println!("{}", span.text);
    if !span.terminated {
        eprintln!(
            "{} Braces never balanced; block runs to end of file (line {})",
            "[WARN]".yellow(),
            span.end.line + 1
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// tests
// ─────────────────────────────────────────────────────────────────────────────

pub fn display_test_results(result: &TestMiningResult, output: &Path) {
    println!();
    println!("{:<32} {:>8} {:>9}", "Bug", "Tests", "Missing");
    println!("{}", "-".repeat(51));

    for project in &result.projects {
        let missing = format!("{:>9}", project.missing.len());
        let missing = if project.missing.is_empty() {
            missing.normal().to_string()
        } else {
            missing.yellow().to_string()
        };
        println!(
            "{:<32} {:>8} {}",
            truncate(&project.bug, 30),
            fmt_num(project.tests.len()),
            missing
        );
    }

    println!();
    println!("{}", "=".repeat(70));
    println!(
        "{} {}",
        "[SUCCESS]".green().bold(),
        format!("Test Methods Extracted: {}", fmt_num(result.total_tests())).bold()
    );
    println!("{} Output: {}", "[INFO]   ".blue(), output.display());
    if result.total_missing() > 0 {
        println!(
            "{} {} test(s) could not be extracted",
            "[WARN]   ".yellow(),
            fmt_num(result.total_missing())
        );
    }
    if result.skipped > 0 {
        println!(
            "{} {} bug(s) skipped for missing project config",
            "[WARN]   ".yellow(),
            fmt_num(result.skipped)
        );
    }
    println!("{}", "=".repeat(70));
    println!();
}
