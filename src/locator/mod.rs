// Author: kelexine (https://github.com/kelexine)
// locator/mod.rs — Heuristic lookup of the declaration a deleted diff line belongs to
//
// This is keyword matching, not parsing. It misses multi-line signatures and
// unusual constructs; callers treat both a missing candidate and an
// unresolvable one as non-fatal.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::diff::{DiffLine, parse_diff};

// ─────────────────────────────────────────────────────────────────────────────
// Pre-compiled patterns
// ─────────────────────────────────────────────────────────────────────────────

static RE_MODIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:private|protected|public|static|void)\b").expect("modifier regex")
});

static RE_CLASS_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bclass\b").expect("class keyword regex"));

static RE_CLASS_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bclass\s+(?P<name>[A-Za-z_$][A-Za-z0-9_$]*)").expect("class name regex")
});

static RE_CALL_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<name>[A-Za-z_$][A-Za-z0-9_$]*)\s*\(").expect("call name regex")
});

/// Marker used by the Closure Compiler code base, where type declarations
/// read `JSType foo(...) {` with no modifier keyword.
pub const DEFAULT_TYPE_MARKERS: &[&str] = &["JSType"];

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeclarationKind {
    MethodOrConstructor,
    Class,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeclarationCandidate {
    pub name: String,
    pub kind: DeclarationKind,
}

impl DeclarationCandidate {
    pub fn method(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DeclarationKind::MethodOrConstructor,
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DeclarationKind::Class,
        }
    }
}

/// Result of classifying one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    Declaration(DeclarationKind),
    Other,
}

/// Classification rules. The type-marker list is the project-specific part.
#[derive(Debug, Clone)]
pub struct DeclarationRules {
    type_markers: Vec<String>,
}

impl Default for DeclarationRules {
    fn default() -> Self {
        Self::new(DEFAULT_TYPE_MARKERS.iter().copied())
    }
}

impl DeclarationRules {
    pub fn new<I, S>(type_markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            type_markers: type_markers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn type_markers(&self) -> &[String] {
        &self.type_markers
    }

    /// Whole-token match, so `JSTypeRegistry` does not count as `JSType`.
    fn has_type_marker(&self, line: &str) -> bool {
        line.split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
            .any(|token| self.type_markers.iter().any(|m| m == token))
    }

    pub fn classify(&self, line: &str) -> LineClass {
        let trimmed = line.trim();
        if trimmed.starts_with("//") {
            return LineClass::Other;
        }

        let opens_block = trimmed.contains('{');
        let is_declaration = (trimmed.contains('(') && RE_MODIFIER.is_match(trimmed))
            || (opens_block && self.has_type_marker(trimmed))
            || (opens_block && RE_CLASS_KEYWORD.is_match(trimmed));

        if !is_declaration {
            LineClass::Other
        } else if RE_CLASS_NAME.is_match(trimmed) {
            LineClass::Declaration(DeclarationKind::Class)
        } else {
            LineClass::Declaration(DeclarationKind::MethodOrConstructor)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Lookup
// ─────────────────────────────────────────────────────────────────────────────

/// Pull the declared name out of a declaration line.
///
/// Classes take the word after `class`; everything else takes the name right
/// before the first `(`.
pub fn extract_identifier(line: &str, kind: DeclarationKind) -> Option<String> {
    let trimmed = line.trim();
    let re = match kind {
        DeclarationKind::Class => &*RE_CLASS_NAME,
        DeclarationKind::MethodOrConstructor => &*RE_CALL_NAME,
    };
    re.captures(trimmed)
        .and_then(|cap| cap.name("name"))
        .map(|m| m.as_str().to_string())
}

/// Walk upward from `deletion_index` (inclusive) to the nearest declaration
/// line and return its identifier.
///
/// Returns `None` when no declaration line exists at or above the index, when
/// the nearest one yields no identifier, or when the index is past the end.
pub fn find_enclosing_declaration(
    lines: &[DiffLine<'_>],
    deletion_index: usize,
    rules: &DeclarationRules,
) -> Option<DeclarationCandidate> {
    let window = lines.get(..=deletion_index)?;
    for line in window.iter().rev().filter(|l| !l.is_header()) {
        if let LineClass::Declaration(kind) = rules.classify(line.content()) {
            return extract_identifier(line.content(), kind)
                .map(|name| DeclarationCandidate { name, kind });
        }
    }
    None
}

/// Every declaration touched by a removed line of `diff`, de-duplicated.
pub fn changed_declarations(diff: &str, rules: &DeclarationRules) -> BTreeSet<DeclarationCandidate> {
    let lines = parse_diff(diff);
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.is_removal())
        .filter_map(|(i, _)| find_enclosing_declaration(&lines, i, rules))
        .collect()
}
