// Author: kelexine (https://github.com/kelexine)
// span/lexer.rs — Lexical state machine shared by span extraction and brace balancing

/// Interpretation mode of the scanner at the current byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexMode {
    #[default]
    Normal,
    InString,
    InChar,
    InLineComment,
    InBlockComment,
}

/// A brace that is significant in code (not inside a literal or comment).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Brace {
    Open,
    Close,
}

/// Transient scanner state for one extraction call.
#[derive(Debug, Clone, Default)]
pub struct LexState {
    pub mode: LexMode,
    pub escape_pending: bool,
    pub depth: usize,
}

impl LexState {
    /// Advance over the byte at `i`.
    ///
    /// Returns the code-level brace found there, if any, and the number of
    /// bytes consumed (2 for `//`, `/*` and `*/`, otherwise 1).
    pub fn step(&mut self, bytes: &[u8], i: usize) -> (Option<Brace>, usize) {
        let ch = bytes[i];
        let next = bytes.get(i + 1).copied();

        if self.escape_pending {
            self.escape_pending = false;
            return (None, 1);
        }
        if ch == b'\\' {
            self.escape_pending = true;
            return (None, 1);
        }

        match self.mode {
            LexMode::InString => {
                if ch == b'"' {
                    self.mode = LexMode::Normal;
                }
                (None, 1)
            }
            LexMode::InChar => {
                if ch == b'\'' {
                    self.mode = LexMode::Normal;
                }
                (None, 1)
            }
            LexMode::InLineComment => (None, 1),
            LexMode::InBlockComment => {
                if ch == b'*' && next == Some(b'/') {
                    self.mode = LexMode::Normal;
                    (None, 2)
                } else {
                    (None, 1)
                }
            }
            LexMode::Normal => match (ch, next) {
                (b'"', _) => {
                    self.mode = LexMode::InString;
                    (None, 1)
                }
                (b'\'', _) => {
                    self.mode = LexMode::InChar;
                    (None, 1)
                }
                (b'/', Some(b'/')) => {
                    self.mode = LexMode::InLineComment;
                    (None, 2)
                }
                (b'/', Some(b'*')) => {
                    self.mode = LexMode::InBlockComment;
                    (None, 2)
                }
                (b'{', _) => (Some(Brace::Open), 1),
                (b'}', _) => (Some(Brace::Close), 1),
                _ => (None, 1),
            },
        }
    }

    /// Apply a brace to the depth counter. Returns true when a closing brace
    /// brings the depth back to zero.
    ///
    /// A `}` at depth 0 closes the block the scan started inside of, so it
    /// terminates too and the depth never goes negative.
    pub fn apply(&mut self, brace: Brace) -> bool {
        match brace {
            Brace::Open => {
                self.depth += 1;
                false
            }
            Brace::Close if self.depth == 0 => true,
            Brace::Close => {
                self.depth -= 1;
                self.depth == 0
            }
        }
    }

    /// Scan `line` from byte `from`. Returns the byte index of the brace that
    /// closes the block, if it is on this line.
    pub fn scan_line(&mut self, line: &str, from: usize) -> Option<usize> {
        let bytes = line.as_bytes();
        let mut i = from;
        while i < bytes.len() {
            let (brace, width) = self.step(bytes, i);
            if let Some(brace) = brace
                && self.apply(brace)
            {
                return Some(i);
            }
            i += width;
        }
        None
    }

    /// Line comments end with the line. A pending escape does not: a trailing
    /// `\` swallows the first byte of the next line.
    pub fn end_line(&mut self) {
        if self.mode == LexMode::InLineComment {
            self.mode = LexMode::Normal;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modes_after(line: &str) -> LexMode {
        let mut state = LexState::default();
        state.scan_line(line, 0);
        state.mode
    }

    #[test]
    fn test_string_and_char_modes() {
        assert_eq!(modes_after("x = \"open"), LexMode::InString);
        assert_eq!(modes_after("x = \"closed\""), LexMode::Normal);
        assert_eq!(modes_after("c = '"), LexMode::InChar);
        assert_eq!(modes_after("c = '\\''"), LexMode::Normal);
    }

    #[test]
    fn test_comment_modes() {
        assert_eq!(modes_after("int x; // trailing"), LexMode::InLineComment);
        assert_eq!(modes_after("/* open"), LexMode::InBlockComment);
        assert_eq!(modes_after("/* closed */"), LexMode::Normal);
        // `/*/` opens and does not close
        assert_eq!(modes_after("/*/"), LexMode::InBlockComment);
    }

    #[test]
    fn test_end_line_resets_line_comment_keeps_escape() {
        let mut state = LexState::default();
        state.scan_line("// note \\", 0);
        assert_eq!(state.mode, LexMode::InLineComment);
        assert!(state.escape_pending);
        state.end_line();
        assert_eq!(state.mode, LexMode::Normal);
        assert!(state.escape_pending);

        // The carried escape eats the `}` opening the next line
        assert_eq!(state.scan_line("}", 0), None);
        assert!(!state.escape_pending);

        // Block comments survive the line break
        state.scan_line("/* multi", 0);
        state.end_line();
        assert_eq!(state.mode, LexMode::InBlockComment);
    }

    #[test]
    fn test_unmatched_close_terminates() {
        let mut state = LexState::default();
        assert!(state.apply(Brace::Close));
        assert_eq!(state.depth, 0);

        let mut state = LexState::default();
        assert!(!state.apply(Brace::Open));
        assert!(!state.apply(Brace::Open));
        assert!(!state.apply(Brace::Close));
        assert!(state.apply(Brace::Close));
        assert_eq!(state.depth, 0);
    }
}
