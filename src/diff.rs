// Author: kelexine (https://github.com/kelexine)
// diff.rs — Unified diff line tagging and buggy-side source reconstruction

/// Prefixes of lines that describe the diff itself rather than file content.
const HEADER_PREFIXES: &[&str] = &[
    "@@",
    "diff --git ",
    "--- a/",
    "--- /dev/null",
    "+++ b/",
    "+++ /dev/null",
    "\\ No newline at end of file",
];

/// One line of unified diff text, tagged by its leading marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLine<'a> {
    /// `+` line; the payload is the text after the marker.
    Added(&'a str),
    /// `-` line; the payload is the text after the marker.
    Removed(&'a str),
    /// Any other line, kept as-is.
    Context(&'a str),
    /// Hunk or file header.
    Header(&'a str),
}

impl<'a> DiffLine<'a> {
    pub fn parse(raw: &'a str) -> Self {
        if HEADER_PREFIXES.iter().any(|p| raw.starts_with(p)) {
            return Self::Header(raw);
        }
        if let Some(rest) = raw.strip_prefix('+') {
            Self::Added(rest)
        } else if let Some(rest) = raw.strip_prefix('-') {
            Self::Removed(rest)
        } else {
            Self::Context(raw)
        }
    }

    /// Line text without the diff marker.
    pub fn content(&self) -> &'a str {
        match *self {
            Self::Added(s) | Self::Removed(s) | Self::Context(s) | Self::Header(s) => s,
        }
    }

    #[inline]
    pub fn is_removal(&self) -> bool {
        matches!(self, Self::Removed(_))
    }

    #[inline]
    pub fn is_header(&self) -> bool {
        matches!(self, Self::Header(_))
    }
}

/// Tag every line of `diff`. A trailing newline does not produce an empty line.
pub fn parse_diff(diff: &str) -> Vec<DiffLine<'_>> {
    diff.split_terminator('\n').map(DiffLine::parse).collect()
}

/// Rebuild the pre-fix side of a diff: `+` lines are dropped, `-` lines lose
/// their marker, context lines are kept as-is and headers are dropped.
pub fn reconstruct_buggy_source(diff: &str) -> String {
    let mut source = String::with_capacity(diff.len());
    for line in parse_diff(diff) {
        match line {
            DiffLine::Added(_) | DiffLine::Header(_) => continue,
            DiffLine::Removed(text) | DiffLine::Context(text) => {
                source.push_str(text);
                source.push('\n');
            }
        }
    }
    source
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_markers() {
        assert_eq!(DiffLine::parse("+  int a;"), DiffLine::Added("  int a;"));
        assert_eq!(DiffLine::parse("-  int b;"), DiffLine::Removed("  int b;"));
        assert_eq!(DiffLine::parse("   int c;"), DiffLine::Context("   int c;"));
        assert_eq!(DiffLine::parse(""), DiffLine::Context(""));
    }

    #[test]
    fn test_parse_headers() {
        for raw in [
            "@@ -1,4 +1,5 @@ public class A {",
            "diff --git a/A.java b/A.java",
            "--- a/src/A.java",
            "+++ b/src/A.java",
            "--- /dev/null",
            "\\ No newline at end of file",
        ] {
            assert!(DiffLine::parse(raw).is_header(), "{raw} should be a header");
        }
        // A removed line whose content happens to start with dashes
        assert!(DiffLine::parse("--i;").is_removal());
    }

    #[test]
    fn test_parse_diff_ignores_trailing_newline() {
        let lines = parse_diff(" a\n-b\n+c\n");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].is_removal());
        assert_eq!(lines[2].content(), "c");
    }

    #[test]
    fn test_reconstruct_buggy_source() {
        let diff = "\
@@ -1,5 +1,5 @@
 class A {
   int f() {
-    return 1;
+    return 2;
   }
 }
";
        let source = reconstruct_buggy_source(diff);
        assert_eq!(source, " class A {\n   int f() {\n    return 1;\n   }\n }\n");
    }
}
