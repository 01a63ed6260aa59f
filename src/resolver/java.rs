// Author: kelexine (https://github.com/kelexine)
// resolver/java.rs — tree-sitter backed declaration lookup for Java

use tree_sitter::{Node, Parser, Tree};

use super::{DeclarationSite, ResolveError, SourcePoint, StructuralIndex};
use crate::locator::{DeclarationCandidate, DeclarationKind};

const METHOD_KINDS: &[&str] = &["method_declaration", "constructor_declaration"];
const TYPE_KINDS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
];

/// A parsed Java file. tree-sitter recovers from syntax errors, so one side
/// of a diff still yields a usable tree.
pub struct JavaIndex<'s> {
    source: &'s str,
    tree: Tree,
}

impl<'s> JavaIndex<'s> {
    pub fn parse(source: &'s str) -> Result<Self, ResolveError> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_java::LANGUAGE.into())?;
        let tree = parser.parse(source, None).ok_or(ResolveError::Parse)?;
        Ok(Self { source, tree })
    }

    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// First node in document order whose kind is one of `kinds` and whose
    /// `name` field reads `name`. Nodes with a `body` win over body-less ones
    /// (interface and abstract methods), which are only a fallback.
    fn find(&self, kinds: &[&str], name: &str) -> Option<Node<'_>> {
        let mut fallback = None;
        let mut stack = vec![self.tree.root_node()];
        while let Some(node) = stack.pop() {
            if kinds.contains(&node.kind()) && self.name_of(node) == Some(name) {
                if node.child_by_field_name("body").is_some() {
                    return Some(node);
                }
                fallback.get_or_insert(node);
            }
            let mut cursor = node.walk();
            let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
        fallback
    }

    fn name_of(&self, node: Node<'_>) -> Option<&'s str> {
        node.child_by_field_name("name")?
            .utf8_text(self.source.as_bytes())
            .ok()
    }
}

fn point(p: tree_sitter::Point) -> SourcePoint {
    SourcePoint {
        line: p.row + 1,
        column: p.column + 1,
    }
}

impl StructuralIndex for JavaIndex<'_> {
    /// The site starts at the whole declaration node, annotations and
    /// modifiers included; brace counting starts where the `modifiers` child
    /// ends, so braces inside annotation arguments are never counted.
    fn locate(&self, candidate: &DeclarationCandidate) -> Option<DeclarationSite> {
        let kinds = match candidate.kind {
            DeclarationKind::MethodOrConstructor => METHOD_KINDS,
            DeclarationKind::Class => TYPE_KINDS,
        };
        let node = self.find(kinds, &candidate.name)?;
        let mut cursor = node.walk();
        let modifiers = node
            .children(&mut cursor)
            .find(|child| child.kind() == "modifiers");

        Some(DeclarationSite {
            start: point(node.start_position()),
            scan_from: point(modifiers.map_or(node.start_position(), |m| m.end_position())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "\
package demo;

public class Calc {
    private int base;

    public Calc(int base) {
        this.base = base;
    }

    @Override
    public int add(int a) {
        return base + a;
    }

    int add(int a, int b) {
        return a + b;
    }

    interface Op {
        int apply(int x);
    }
}
";

    fn index() -> JavaIndex<'static> {
        JavaIndex::parse(SOURCE).unwrap()
    }

    fn sp(line: usize, column: usize) -> SourcePoint {
        SourcePoint { line, column }
    }

    #[test]
    fn test_locate_method_includes_annotation() {
        let site = index().locate(&DeclarationCandidate::method("add")).unwrap();
        // First overload, starting at its `@Override` line
        assert_eq!(site.start, sp(10, 5));
        // Counting starts after `public` on the next line
        assert_eq!(site.scan_from, sp(11, 11));
    }

    #[test]
    fn test_locate_constructor() {
        let site = index().locate(&DeclarationCandidate::method("Calc")).unwrap();
        assert_eq!(site.start, sp(6, 5));
        assert_eq!(site.scan_from, sp(6, 11));
    }

    #[test]
    fn test_locate_types() {
        let idx = index();
        let calc = idx.locate(&DeclarationCandidate::class("Calc")).unwrap();
        assert_eq!(calc.start, sp(3, 1));
        assert_eq!(calc.scan_from, sp(3, 7));
        // No modifiers: counting starts at the node itself
        assert_eq!(
            idx.locate(&DeclarationCandidate::class("Op")),
            Some(DeclarationSite::at(sp(19, 5)))
        );
    }

    #[test]
    fn test_annotation_braces_are_skipped() {
        let source = "class A {\n    @SuppressWarnings({\"unchecked\"})\n    public void run() {\n    }\n}\n";
        let idx = JavaIndex::parse(source).unwrap();
        let site = idx.locate(&DeclarationCandidate::method("run")).unwrap();
        assert_eq!(site.start, sp(2, 5));
        assert_eq!(site.scan_from, sp(3, 11));
    }

    #[test]
    fn test_prefers_declaration_with_body() {
        let source = "\
interface Op { int apply(int x); }
class Impl implements Op {
    public int apply(int x) {
        return x;
    }
}
";
        let idx = JavaIndex::parse(source).unwrap();
        let site = idx.locate(&DeclarationCandidate::method("apply")).unwrap();
        assert_eq!(site.start, sp(3, 5));
    }

    #[test]
    fn test_bodyless_declaration_is_fallback() {
        let idx = JavaIndex::parse("abstract class A {\n    abstract void f();\n}\n").unwrap();
        let site = idx.locate(&DeclarationCandidate::method("f")).unwrap();
        assert_eq!(site.start, sp(2, 5));
    }

    #[test]
    fn test_kind_must_match() {
        let idx = index();
        assert_eq!(idx.locate(&DeclarationCandidate::class("add")), None);
        assert_eq!(idx.locate(&DeclarationCandidate::method("missing")), None);
        // Fields are not declarations we resolve
        assert_eq!(idx.locate(&DeclarationCandidate::method("base")), None);
    }

    #[test]
    fn test_parses_fragments() {
        let idx = JavaIndex::parse("  void lonely() {\n    call(;\n").unwrap();
        assert!(idx.has_errors());
    }
}
