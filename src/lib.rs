// Author: kelexine (https://github.com/kelexine)
// lib.rs — Library surface of the fixmine miner

pub mod cli;
pub mod config;
pub mod diff;
pub mod display;
pub mod export;
pub mod locator;
pub mod miner;
pub mod models;
pub mod resolver;
pub mod span;

pub use locator::{DeclarationCandidate, DeclarationKind, DeclarationRules, changed_declarations};
pub use resolver::{DeclarationSite, JavaIndex, SourcePoint, StructuralIndex};
pub use span::{
    ExtractedSpan, Position, SourceBuffer, SpanError, extract_block, extract_span,
    extract_span_from,
};
