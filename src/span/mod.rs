// Author: kelexine (https://github.com/kelexine)
// span/mod.rs — Brace-exact block extraction from raw source text
//
// The block is bounded by brace balance, not by grammar: inputs are often one
// side of a diff and need not compile. Braces inside string literals, char
// literals, line comments and block comments are never counted.

pub mod lexer;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use lexer::LexState;

/// Precondition violations. Unbalanced input is not an error (see
/// [`ExtractedSpan::terminated`]).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpanError {
    #[error("start line {line} is outside the buffer ({len} lines)")]
    LineOutOfRange { line: usize, len: usize },

    #[error("positions are 1-indexed, got line {line} column {column}")]
    ZeroCoordinate { line: usize, column: usize },
}

/// One file's content as 0-indexed lines. Borrowed from the caller.
#[derive(Debug, Clone)]
pub struct SourceBuffer<'a> {
    lines: Vec<&'a str>,
}

impl<'a> SourceBuffer<'a> {
    /// Split on `\n` only, so a `\r` stays part of its line and comes back out verbatim.
    pub fn from_text(text: &'a str) -> Self {
        Self {
            lines: text.split('\n').collect(),
        }
    }

    pub fn from_lines(lines: Vec<&'a str>) -> Self {
        Self { lines }
    }

    #[inline]
    pub fn lines(&self) -> &[&'a str] {
        &self.lines
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A 0-indexed `(line, column)` pair. The column is a byte offset into the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Build a 0-indexed position directly.
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Convert the 1-indexed line/column reported by structural parsers.
    ///
    /// `(1, 1)` becomes `Position { line: 0, column: 0 }`. Zero in either
    /// coordinate is rejected.
    pub fn from_one_based(line: usize, column: usize) -> Result<Self, SpanError> {
        if line == 0 || column == 0 {
            return Err(SpanError::ZeroCoordinate { line, column });
        }
        Ok(Self::new(line - 1, column - 1))
    }

    /// The inverse of [`Position::from_one_based`].
    pub const fn to_one_based(self) -> (usize, usize) {
        (self.line + 1, self.column + 1)
    }
}

/// Result of one extraction call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSpan {
    /// Whole lines from the start line through the closing brace, joined with `\n`.
    pub text: String,
    pub start: Position,
    /// Position of the closing brace, or end of buffer when unterminated.
    pub end: Position,
    /// False when the buffer ran out before the depth returned to zero.
    pub terminated: bool,
}

/// Extract the brace-delimited block that begins at or after `start`.
///
/// Scanning starts at `start.column` on the first line and at column 0 on
/// every later line. Emitted lines are whole lines: text before the start
/// column is kept, and the last line is cut right after the closing brace.
/// If the braces never balance, everything from the start line to the end
/// of the buffer is returned with `terminated == false`.
pub fn extract_span(buffer: &SourceBuffer<'_>, start: Position) -> Result<ExtractedSpan, SpanError> {
    extract_span_from(buffer, start.line, start)
}

/// Like [`extract_span`], but lines `first_line..start.line` are emitted
/// ahead of the block without being scanned.
///
/// Used for declarations whose annotations may carry braces of their own
/// (`@SuppressWarnings({"a", "b"})`): the annotation lines belong to the
/// text, the brace count starts after them.
pub fn extract_span_from(
    buffer: &SourceBuffer<'_>,
    first_line: usize,
    start: Position,
) -> Result<ExtractedSpan, SpanError> {
    let lines = buffer.lines();
    if start.line >= lines.len() {
        return Err(SpanError::LineOutOfRange {
            line: start.line,
            len: lines.len(),
        });
    }
    let first_line = first_line.min(start.line);

    let mut state = LexState::default();
    let mut collected: Vec<&str> = lines[first_line..start.line].to_vec();
    let mut column = start.column;

    for (line_idx, line) in lines.iter().enumerate().skip(start.line) {
        if let Some(close) = state.scan_line(line, column) {
            collected.push(&line[..=close]);
            return Ok(ExtractedSpan {
                text: collected.join("\n"),
                start,
                end: Position::new(line_idx, close),
                terminated: true,
            });
        }
        collected.push(line);
        state.end_line();
        column = 0;
    }

    let last = lines.len() - 1;
    Ok(ExtractedSpan {
        text: collected.join("\n"),
        start,
        end: Position::new(last, lines[last].len()),
        terminated: false,
    })
}

/// Convenience wrapper over raw text and a 1-indexed line/column.
pub fn extract_block(text: &str, line: usize, column: usize) -> Result<String, SpanError> {
    let start = Position::from_one_based(line, column)?;
    extract_span(&SourceBuffer::from_text(text), start).map(|span| span.text)
}

/// Net brace depth of `text` under the same lexical rules as [`extract_span`].
///
/// Unlike extraction this never clamps, so a stray `}` makes it negative.
pub fn brace_balance(text: &str) -> isize {
    let mut state = LexState::default();
    let mut balance = 0isize;
    for line in text.split('\n') {
        let bytes = line.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            let (brace, width) = state.step(bytes, i);
            match brace {
                Some(lexer::Brace::Open) => balance += 1,
                Some(lexer::Brace::Close) => balance -= 1,
                None => {}
            }
            i += width;
        }
        state.end_line();
    }
    balance
}
