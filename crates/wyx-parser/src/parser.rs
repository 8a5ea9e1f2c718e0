//! Parser state and token-level machinery.
//!
//! The grammar itself lives in sibling modules (`exprs`, `stmts`, `decls`,
//! `types`, `patterns`), all as `impl Parser` blocks. This module owns the
//! cursor, error recovery primitives and the list-parsing loop they share.
//!
//! Recovery contract: a mismatched token either gets skipped (SKIPPED flag
//! plus one diagnostic) or a zero-width MISSING token of the expected kind
//! is synthesized in its place, so node fields the grammar requires are
//! always present. Every recovery loop is guarded by a forward-progress
//! check; failing it is an internal invariant violation, not an input
//! error.

use crate::arena::{Arena, Vec as ArenaVec};
use crate::ast::*;
use crate::diagnostics::{Diagnostics, ErrorCode};
use crate::span::Span;
use crate::token::{LiteralValue, SyntaxToken, TokenFlags, TokenKind};
use crate::tokenizer::TokenizerResult;

/// Everything a finished parse hands back; slices all live in the arena
/// the parser was given.
pub struct ParseOutput<'a> {
    pub root: &'a CompilationUnit<'a>,
    pub tokens: &'a [SyntaxToken],
    pub texts: &'a [&'a str],
    pub offsets: &'a [u32],
    pub values: &'a [LiteralValue],
}

/// Parses one file's token stream into a compilation unit.
pub fn parse_compilation_unit<'a>(
    tokens: TokenizerResult<'a>,
    diagnostics: &mut Diagnostics,
    arena: &'a Arena,
) -> ParseOutput<'a> {
    let mut parser = Parser::new(tokens, diagnostics, arena);
    let root = parser.parse_compilation_unit_root();
    let Parser { tokens, texts, offsets, values, .. } = parser;
    ParseOutput {
        root,
        tokens: tokens.into_bump_slice(),
        texts: texts.into_bump_slice(),
        offsets: offsets.into_bump_slice(),
        values: values.into_bump_slice(),
    }
}

/// Saved cursor position for rewindable speculation. Scanning functions
/// never allocate or report diagnostics, so restoring the cursor undoes
/// them completely.
#[derive(Clone, Copy)]
pub(crate) struct ResetPoint {
    ptr: usize,
    last_consumed: usize,
    consumed_any: bool,
}

/// Outcome of skipping unexpected tokens inside a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PostSkipAction {
    Continue,
    Abort,
}

pub(crate) struct Parser<'a, 'd> {
    pub(crate) arena: &'a Arena,
    pub(crate) tokens: ArenaVec<'a, SyntaxToken>,
    pub(crate) texts: ArenaVec<'a, &'a str>,
    pub(crate) offsets: ArenaVec<'a, u32>,
    pub(crate) values: ArenaVec<'a, LiteralValue>,
    pub(crate) diagnostics: &'d mut Diagnostics,
    /// Index of the current (non-trivia) token.
    ptr: usize,
    /// Index of the most recently consumed token; meaningless until
    /// `consumed_any` is set.
    last_consumed: usize,
    consumed_any: bool,
}

impl<'a, 'd> Parser<'a, 'd> {
    pub(crate) fn new(
        result: TokenizerResult<'a>,
        diagnostics: &'d mut Diagnostics,
        arena: &'a Arena,
    ) -> Self {
        let TokenizerResult { tokens, texts, offsets, values } = result;
        debug_assert!(matches!(tokens.last(), Some(t) if t.kind == TokenKind::EndOfFile));
        let mut parser = Parser {
            arena,
            tokens,
            texts,
            offsets,
            values,
            diagnostics,
            ptr: 0,
            last_consumed: 0,
            consumed_any: false,
        };
        parser.ptr = parser.next_non_trivia(0);
        parser
    }

    // ========================================================================
    // Cursor
    // ========================================================================

    fn next_non_trivia(&self, mut i: usize) -> usize {
        while i < self.tokens.len() - 1 && self.tokens[i].kind.is_trivia() {
            i += 1;
        }
        i
    }

    #[inline]
    pub(crate) fn current(&self) -> SyntaxToken {
        self.tokens[self.ptr]
    }

    #[inline]
    pub(crate) fn current_kind(&self) -> TokenKind {
        self.tokens[self.ptr].kind
    }

    pub(crate) fn current_text(&self) -> &'a str {
        self.texts[self.ptr]
    }

    /// The nth non-trivia token after the current one (0 = current).
    pub(crate) fn peek(&self, n: usize) -> SyntaxToken {
        let mut i = self.ptr;
        for _ in 0..n {
            i = self.next_non_trivia(i + 1);
        }
        self.tokens[i]
    }

    /// Raw array neighbor, trivia included. Used for `>` `>` adjacency
    /// when building shift operators.
    pub(crate) fn raw_kind_after_current(&self, n: usize) -> TokenKind {
        self.tokens.get(self.ptr + n).map(|t| t.kind).unwrap_or(TokenKind::EndOfFile)
    }

    /// Consumes the current token and returns its id.
    pub(crate) fn advance(&mut self) -> TokenId {
        let id = self.ptr as TokenId;
        self.last_consumed = self.ptr;
        self.consumed_any = true;
        if self.ptr < self.tokens.len() - 1 {
            self.ptr = self.next_non_trivia(self.ptr + 1);
        }
        id
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    pub(crate) fn at_contextual(&self, kind: TokenKind) -> bool {
        self.current().is_contextual(kind)
    }

    pub(crate) fn try_eat(&mut self, kind: TokenKind) -> Option<TokenId> {
        if self.at(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.current_kind() == TokenKind::EndOfFile
    }

    // ========================================================================
    // Spans and ranges
    // ========================================================================

    pub(crate) fn token_span(&self, id: TokenId) -> Span {
        let start = self.offsets[id as usize];
        Span::new(start, start + self.texts[id as usize].len() as u32)
    }

    /// Where a synthesized token anchors its diagnostic: immediately after
    /// the last consumed token, or the start of the file when nothing has
    /// been consumed yet.
    fn missing_anchor(&self) -> Span {
        if !self.consumed_any {
            return Span::empty(0);
        }
        let end = self.token_span(self.last_consumed as TokenId).end;
        Span::empty(end)
    }

    /// Token id the next consumed token will get; marks a node start.
    pub(crate) fn mark_start(&self) -> TokenId {
        self.ptr as TokenId
    }

    /// Node range from `start` through the last consumed token.
    pub(crate) fn range_from(&self, start: TokenId) -> TokenRange {
        let end = (self.last_consumed + 1) as TokenId;
        if end <= start {
            TokenRange::new(start, start)
        } else {
            TokenRange::new(start, end)
        }
    }

    // ========================================================================
    // Missing tokens and recovery
    // ========================================================================

    fn expected_code(kind: TokenKind) -> ErrorCode {
        match kind {
            TokenKind::Identifier => ErrorCode::IdentifierExpected,
            TokenKind::Semicolon => ErrorCode::SemicolonExpected,
            TokenKind::CloseParen => ErrorCode::CloseParenExpected,
            TokenKind::OpenBrace => ErrorCode::OpenBraceExpected,
            TokenKind::CloseBrace => ErrorCode::CloseBraceExpected,
            other => ErrorCode::TokenExpected(other),
        }
    }

    /// Inserts a zero-width MISSING token of `kind` at the cursor and
    /// consumes it. Later token ids shift by one; nothing already built
    /// can reference them yet, so ids stay equal to array indexes.
    pub(crate) fn create_missing_token(&mut self, kind: TokenKind) -> TokenId {
        let at = self.ptr;
        let offset = self.offsets[at];
        let mut token = SyntaxToken::new(kind, TokenKind::None, 0, at as u32);
        token.flags = TokenFlags::MISSING;
        self.tokens.insert(at, token);
        self.texts.insert(at, "");
        self.offsets.insert(at, offset);
        self.values.insert(at, LiteralValue::None);
        for i in (at + 1)..self.tokens.len() {
            self.tokens[i].id += 1;
        }
        self.last_consumed = at;
        self.consumed_any = true;
        self.ptr = self.next_non_trivia(at + 1);
        at as TokenId
    }

    /// Consumes a token of `kind`, or reports it and synthesizes a missing
    /// one.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> TokenId {
        if self.at(kind) {
            return self.advance();
        }
        self.diagnostics.add(Self::expected_code(kind), self.missing_anchor());
        self.create_missing_token(kind)
    }

    /// Like [`eat`](Self::eat) for contextual keywords spelled as
    /// identifiers.
    pub(crate) fn eat_contextual(&mut self, kind: TokenKind) -> TokenId {
        if self.at_contextual(kind) {
            return self.advance();
        }
        self.diagnostics.add(ErrorCode::IdentifierExpected, self.missing_anchor());
        self.create_missing_token(TokenKind::Identifier)
    }

    /// Marks the current token skipped and steps past it.
    pub(crate) fn skip_token(&mut self) {
        debug_assert!(!self.at_eof());
        self.tokens[self.ptr].flags.insert(TokenFlags::SKIPPED);
        self.advance();
    }

    /// `IdentifierName` node wrapping a synthesized identifier, used where
    /// an expression or name is required but absent.
    pub(crate) fn create_missing_identifier_name(&mut self, code: ErrorCode) -> &'a TypeSyntax<'a> {
        self.diagnostics.add(code, self.missing_anchor());
        let id = self.create_missing_token(TokenKind::Identifier);
        self.arena.alloc(TypeSyntax {
            kind: TypeKind::IdentifierName { identifier: id },
            range: TokenRange::new(id, id + 1),
        })
    }

    pub(crate) fn create_missing_identifier_expr(&mut self, code: ErrorCode) -> &'a Expr<'a> {
        let name = self.create_missing_identifier_name(code);
        self.arena.alloc(Expr { kind: ExprKind::Name { name }, range: name.range })
    }

    // ========================================================================
    // Speculation
    // ========================================================================

    pub(crate) fn reset_point(&self) -> ResetPoint {
        ResetPoint {
            ptr: self.ptr,
            last_consumed: self.last_consumed,
            consumed_any: self.consumed_any,
        }
    }

    pub(crate) fn rewind(&mut self, point: ResetPoint) {
        self.ptr = point.ptr;
        self.last_consumed = point.last_consumed;
        self.consumed_any = point.consumed_any;
    }

    /// Forward-progress guard for recovery loops. Returns false when the
    /// cursor has not moved since the last check, which is a parser bug.
    pub(crate) fn is_making_progress(&self, last_ptr: &mut usize) -> bool {
        if self.ptr > *last_ptr {
            *last_ptr = self.ptr;
            true
        } else {
            false
        }
    }

    // ========================================================================
    // List parsing
    // ========================================================================

    /// Skips tokens that can neither start an element nor close the list.
    /// The first skipped token gets one diagnostic; the rest are silent.
    pub(crate) fn skip_bad_list_tokens(
        &mut self,
        is_possible: fn(&mut Self) -> bool,
        is_close: fn(&mut Self) -> bool,
        code: ErrorCode,
    ) -> PostSkipAction {
        let mut reported = false;
        let mut last_ptr = usize::MAX;
        loop {
            if is_possible(self) {
                return PostSkipAction::Continue;
            }
            if is_close(self) || self.at_eof() {
                return PostSkipAction::Abort;
            }
            if last_ptr != usize::MAX && !self.is_making_progress(&mut last_ptr) {
                debug_assert!(false, "list recovery failed to make progress");
                return PostSkipAction::Abort;
            }
            last_ptr = self.ptr;
            if !reported {
                reported = true;
                let span = self.token_span(self.ptr as TokenId);
                self.diagnostics.add(code, span);
            }
            self.skip_token();
        }
    }

    /// Comma-separated list with skip-or-missing-token recovery. The close
    /// token is left for the caller to eat.
    pub(crate) fn parse_separated_list<T: 'a>(
        &mut self,
        mut parse_item: impl FnMut(&mut Self) -> &'a T,
        is_possible: fn(&mut Self) -> bool,
        is_close: fn(&mut Self) -> bool,
        code: ErrorCode,
        allow_trailing_separator: bool,
    ) -> SeparatedList<'a, T> {
        let arena = self.arena;
        let mut items = arena.vec();
        let mut separators = arena.vec();

        if is_close(self) {
            return SeparatedList::empty();
        }

        let mut last_ptr = usize::MAX;
        loop {
            if last_ptr != usize::MAX && !self.is_making_progress(&mut last_ptr) {
                debug_assert!(false, "separated list failed to make progress");
                break;
            }
            last_ptr = self.ptr;

            if is_possible(self) {
                items.push(parse_item(self));
            } else if self.skip_bad_list_tokens(is_possible, is_close, code)
                == PostSkipAction::Abort
            {
                break;
            } else {
                continue;
            }

            if is_close(self) || self.at_eof() {
                break;
            }
            if self.at(TokenKind::Comma) {
                separators.push(self.advance());
                if allow_trailing_separator && is_close(self) {
                    break;
                }
                continue;
            }
            if is_possible(self) {
                // element follows with no separator: synthesize the comma
                separators.push(self.eat(TokenKind::Comma));
                continue;
            }
            if self.skip_bad_list_tokens(is_possible, is_close, code) == PostSkipAction::Abort {
                break;
            }
            // a separator may have been skipped over; resume with the next
            // element
            if self.at(TokenKind::Comma) {
                separators.push(self.advance());
            } else {
                separators.push(self.eat(TokenKind::Comma));
            }
        }

        SeparatedList {
            items: items.into_bump_slice(),
            separators: separators.into_bump_slice(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn with_parser<R>(source: &str, f: impl FnOnce(&mut Parser<'_, '_>) -> R) -> R {
        let arena = Arena::new();
        let mut diags = Diagnostics::new();
        let result = tokenize(source, &mut diags, &arena);
        let mut parser = Parser::new(result, &mut diags, &arena);
        f(&mut parser)
    }

    #[test]
    fn cursor_skips_trivia() {
        with_parser("a  /* c */ b", |p| {
            assert_eq!(p.current_kind(), TokenKind::Identifier);
            assert_eq!(p.current_text(), "a");
            assert_eq!(p.peek(1).kind, TokenKind::Identifier);
            p.advance();
            assert_eq!(p.current_text(), "b");
        });
    }

    #[test]
    fn eat_synthesizes_missing_token() {
        with_parser("a b", |p| {
            p.advance();
            let before = p.tokens.len();
            let id = p.eat(TokenKind::Semicolon);
            assert_eq!(p.tokens.len(), before + 1);
            let tok = p.tokens[id as usize];
            assert_eq!(tok.kind, TokenKind::Semicolon);
            assert!(tok.is_missing());
            assert_eq!(tok.text_len, 0);
            // the values table stays parallel to the token array
            assert_eq!(p.values.len(), p.tokens.len());
            // ids still equal indexes after the insertion
            for (i, t) in p.tokens.iter().enumerate() {
                assert_eq!(t.id as usize, i);
            }
            // cursor moved past the synthesized token to `b`
            assert_eq!(p.current_text(), "b");
        });
    }

    #[test]
    fn missing_token_diagnostic_anchors_after_previous_token() {
        with_parser("ab   cd", |p| {
            p.advance();
            p.eat(TokenKind::Semicolon);
            let diag = p.diagnostics.iter().next().unwrap().clone();
            assert_eq!(diag.code, ErrorCode::SemicolonExpected);
            assert_eq!(diag.span, Span::empty(2));
        });
    }

    #[test]
    fn missing_token_before_any_consumption_anchors_at_file_start() {
        with_parser("   a", |p| {
            p.eat(TokenKind::Semicolon);
            let diag = p.diagnostics.iter().next().unwrap().clone();
            assert_eq!(diag.code, ErrorCode::SemicolonExpected);
            assert_eq!(diag.span, Span::empty(0));
        });
    }

    #[test]
    fn rewind_restores_cursor() {
        with_parser("a + b", |p| {
            let point = p.reset_point();
            p.advance();
            p.advance();
            assert_eq!(p.current_text(), "b");
            p.rewind(point);
            assert_eq!(p.current_text(), "a");
        });
    }

    #[test]
    fn skip_token_sets_flag() {
        with_parser("@ a", |p| {
            // `@` lexes as an invalid token
            p.skip_token();
            assert!(p.tokens[0].is_skipped());
            assert_eq!(p.current_text(), "a");
        });
    }

    #[test]
    fn eof_cursor_is_stable() {
        with_parser("a", |p| {
            p.advance();
            assert!(p.at_eof());
            p.advance();
            assert!(p.at_eof());
        });
    }
}
