// Author: kelexine (https://github.com/kelexine)
// resolver/mod.rs — Name-to-position lookup over a parsed source file

pub mod java;

pub use java::JavaIndex;

use serde::Serialize;
use thiserror::Error;

use crate::locator::DeclarationCandidate;
use crate::span::{Position, SpanError};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to load the Java grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("parser produced no syntax tree")]
    Parse,
}

/// A 1-indexed line/column as reported by a structural parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourcePoint {
    pub line: usize,
    pub column: usize,
}

impl SourcePoint {
    /// Hand the point to the span extractor, which addresses 0-indexed.
    pub fn to_position(self) -> Result<Position, SpanError> {
        Position::from_one_based(self.line, self.column)
    }
}

/// Where a declaration sits in its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeclarationSite {
    /// Start of the declaration, annotations included.
    pub start: SourcePoint,
    /// Where brace counting begins: just past annotations and modifiers.
    pub scan_from: SourcePoint,
}

impl DeclarationSite {
    /// A site with nothing ahead of the declaration head.
    pub fn at(point: SourcePoint) -> Self {
        Self {
            start: point,
            scan_from: point,
        }
    }
}

/// Anything that can turn a declaration candidate into the place where
/// that declaration starts.
pub trait StructuralIndex {
    fn locate(&self, candidate: &DeclarationCandidate) -> Option<DeclarationSite>;
}
