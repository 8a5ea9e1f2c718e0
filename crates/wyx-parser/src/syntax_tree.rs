//! Owning handle for one file's parse product.
//!
//! A [`SyntaxTree`] bundles the arena with the tree allocated inside it so
//! the pair can move across threads and sit in caches without lifetime
//! plumbing. Internally the root and the token tables are raw pointers
//! into the arena; bumpalo never moves or frees a chunk while the `Bump`
//! is alive, so the pointers stay valid wherever the struct goes.

use crate::arena::Arena;
use crate::ast::{CompilationUnit, TokenRange};
use crate::diagnostics::Diagnostics;
use crate::parser::parse_compilation_unit;
use crate::span::Span;
use crate::token::{LiteralValue, SyntaxToken};
use crate::tokenizer::tokenize;

pub struct SyntaxTree {
    root: *const CompilationUnit<'static>,
    tokens: *const [SyntaxToken],
    texts: *const [&'static str],
    offsets: *const [u32],
    values: *const [LiteralValue],
    source: *const str,
    diagnostics: Diagnostics,
    // Dropped last; every pointer above targets its chunks.
    arena: Arena,
}

// The arena is written only during `parse_in`, before the tree is shared.
// Afterwards every access goes through &self and reads immutable data, and
// the `Bump`'s interior mutability is never reachable from outside.
unsafe impl Send for SyntaxTree {}
unsafe impl Sync for SyntaxTree {}

impl SyntaxTree {
    /// Tokenizes and parses `source` into a fresh arena.
    pub fn parse(source: &str) -> SyntaxTree {
        Self::parse_in(source, Arena::with_capacity(source.len() * 4))
    }

    /// Same as [`parse`](Self::parse) but reuses an arena, typically one
    /// recovered with [`into_arena`](Self::into_arena) and reset.
    pub fn parse_in(source: &str, arena: Arena) -> SyntaxTree {
        let mut diagnostics = Diagnostics::new();
        let (root, tokens, texts, offsets, values, source_copy);
        {
            let source_ref = arena.alloc_str(source);
            let lexed = tokenize(source_ref, &mut diagnostics, &arena);
            let output = parse_compilation_unit(lexed, &mut diagnostics, &arena);
            root = output.root as *const CompilationUnit<'_> as *const CompilationUnit<'static>;
            tokens = output.tokens as *const [SyntaxToken];
            texts = output.texts as *const [&str] as *const [&'static str];
            offsets = output.offsets as *const [u32];
            values = output.values as *const [LiteralValue];
            source_copy = source_ref as *const str;
        }
        SyntaxTree { root, tokens, texts, offsets, values, source: source_copy, diagnostics, arena }
    }

    pub fn root(&self) -> &CompilationUnit<'_> {
        unsafe { &*self.root }
    }

    pub fn tokens(&self) -> &[SyntaxToken] {
        unsafe { &*self.tokens }
    }

    /// Token texts, indexed by token id. Missing and omitted tokens have
    /// empty text.
    pub fn texts(&self) -> &[&str] {
        unsafe { &*self.texts }
    }

    /// Byte offset of each token, indexed by token id.
    pub fn offsets(&self) -> &[u32] {
        unsafe { &*self.offsets }
    }

    /// Classified numeric literal values, indexed by token id;
    /// `LiteralValue::None` for non-numeric tokens.
    pub fn values(&self) -> &[LiteralValue] {
        unsafe { &*self.values }
    }

    pub fn literal_value(&self, id: u32) -> LiteralValue {
        self.values()[id as usize]
    }

    pub fn source(&self) -> &str {
        unsafe { &*self.source }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn token_text(&self, id: u32) -> &str {
        self.texts()[id as usize]
    }

    /// Byte span of one token.
    pub fn token_span(&self, id: u32) -> Span {
        let start = self.offsets()[id as usize];
        Span::new(start, start + self.token_text(id).len() as u32)
    }

    /// Byte span covered by a node's token range, trivia included.
    pub fn span_of(&self, range: TokenRange) -> Span {
        if range.is_empty() {
            let at = range.start as usize;
            let offsets = self.offsets();
            let offset = offsets.get(at).copied().unwrap_or(self.source().len() as u32);
            return Span::empty(offset);
        }
        let first = self.token_span(range.start);
        let last = self.token_span(range.end - 1);
        Span::new(first.start, last.end)
    }

    /// Bytes the parse allocated, source copy included.
    pub fn allocated_bytes(&self) -> usize {
        self.arena.allocated_bytes()
    }

    /// Tears the tree down and hands the arena back for reuse. Call
    /// `reset` on it before the next parse.
    pub fn into_arena(self) -> Arena {
        self.arena
    }
}

impl std::fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("tokens", &self.tokens().len())
            .field("diagnostics", &self.diagnostics.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Member, MemberKind, Stmt, StmtKind};
    use crate::kind::SyntaxKind;
    use crate::token::TokenKind;

    #[test]
    fn tree_outlives_scope_and_moves() {
        let tree = {
            let source = String::from("class C { int x; }");
            SyntaxTree::parse(&source)
        };
        let moved = tree;
        assert_eq!(moved.root().members.len(), 1);
        assert_eq!(moved.source(), "class C { int x; }");
    }

    #[test]
    fn tree_is_usable_from_another_thread() {
        let tree = SyntaxTree::parse("class C { int x; }");
        let handle = std::thread::spawn(move || tree.root().members.len());
        assert_eq!(handle.join().unwrap(), 1);
    }

    #[test]
    fn lossless_token_stream() {
        let source = "class C {\n    // note\n    int x = 1;\n}\n";
        let tree = SyntaxTree::parse(source);
        let rebuilt: String = tree.texts().concat();
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn token_ids_match_indices() {
        let tree = SyntaxTree::parse("if (  \n");
        for (i, token) in tree.tokens().iter().enumerate() {
            assert_eq!(token.id as usize, i);
        }
        assert_eq!(tree.tokens().len(), tree.texts().len());
        assert_eq!(tree.tokens().len(), tree.offsets().len());
        assert_eq!(tree.tokens().len(), tree.values().len());
    }

    #[test]
    fn literal_values_survive_into_the_tree() {
        let tree = SyntaxTree::parse("var x = 4294967296;");
        let id = tree
            .tokens()
            .iter()
            .find(|t| t.kind == TokenKind::NumericLiteral)
            .unwrap()
            .id;
        assert_eq!(tree.literal_value(id), LiteralValue::Int64(4_294_967_296));
    }

    fn check_member_containment(member: &Member<'_>, parent: TokenRange) {
        assert!(
            parent.contains(member.range),
            "{:?} escapes {:?} in {:?}",
            member.range,
            parent,
            member.kind()
        );
        match member.kind {
            MemberKind::Namespace { members, .. } | MemberKind::TypeDecl { members, .. } => {
                for child in members {
                    check_member_containment(child, member.range);
                }
            }
            MemberKind::GlobalStatement { statement } => {
                check_stmt_containment(statement, member.range);
            }
            _ => {}
        }
    }

    fn check_stmt_containment(stmt: &Stmt<'_>, parent: TokenRange) {
        assert!(parent.contains(stmt.range));
        if let StmtKind::Block { statements, .. } = stmt.kind {
            for child in statements {
                check_stmt_containment(child, stmt.range);
            }
        }
    }

    #[test]
    fn child_ranges_nest_inside_parents() {
        let tree = SyntaxTree::parse(
            "namespace app {
                class C {
                    int Sum(int a, int b) { return a + b; }
                }
            }
            { var x = 1; x = x + 1; }",
        );
        let root = tree.root();
        for member in root.members {
            check_member_containment(member, root.range);
        }
    }

    #[test]
    fn malformed_input_never_loses_text() {
        let source = "class { if ( %% ) \"unterminated";
        let tree = SyntaxTree::parse(source);
        assert!(tree.diagnostics().len() > 0);
        let rebuilt: String = tree.texts().concat();
        assert_eq!(rebuilt, source);
        assert_eq!(
            tree.tokens().last().map(|t| t.kind),
            Some(TokenKind::EndOfFile)
        );
    }

    #[test]
    fn span_of_maps_token_ranges_to_bytes() {
        let source = "int x;";
        let tree = SyntaxTree::parse(source);
        let root = tree.root();
        assert_eq!(tree.span_of(root.range), Span::new(0, source.len() as u32));
        match root.members[0].kind {
            MemberKind::GlobalStatement { statement } => {
                let span = tree.span_of(statement.range);
                assert_eq!(&source[span.start as usize..span.end as usize], "int x;");
            }
            _ => panic!("expected global statement"),
        }
    }

    #[test]
    fn arena_round_trips_through_reuse() {
        let tree = SyntaxTree::parse("class A { }");
        let mut arena = tree.into_arena();
        arena.reset();
        let tree = SyntaxTree::parse_in("class B { }", arena);
        match tree.root().members[0].kind {
            MemberKind::TypeDecl { kind, identifier, .. } => {
                assert_eq!(kind, SyntaxKind::ClassDeclaration);
                assert_eq!(tree.token_text(identifier), "B");
            }
            _ => panic!("expected class declaration"),
        }
    }
}
