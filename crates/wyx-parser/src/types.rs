//! Type parsing and the rewindable type/expression disambiguation scans.
//!
//! `scan_type` and `scan_possible_type_argument_list` walk the token
//! cursor without allocating or reporting; callers rewind to the saved
//! reset point when the scan says "not a type". Committed parsing happens
//! afterwards in `parse_type` and friends.

use crate::ast::*;
use crate::diagnostics::ErrorCode;
use crate::facts;
use crate::kind::SyntaxKind;
use crate::parser::Parser;
use crate::token::TokenKind;

/// Classification produced by `scan_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanTypeFlags {
    /// Definitely not a type.
    NotType,
    /// Unambiguously a type (predefined, nullable, array, tuple, …).
    MustBeType,
    /// `a<b,c>`: a generic name, or a pair of comparisons.
    GenericTypeOrExpression,
    /// A bare identifier or dotted name: type or expression.
    NonGenericTypeOrExpression,
    TupleType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanTypeArgumentListKind {
    NotTypeArgumentList,
    PossibleTypeArgumentList,
    DefiniteTypeArgumentList,
}

/// Contexts that change what a type scan accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParseTypeMode {
    Normal,
    /// Inside a pattern: `?` stays with the pattern, not the type.
    Pattern,
    /// After `new`: array ranks may carry size expressions.
    NewExpression,
}

impl<'a, 'd> Parser<'a, 'd> {
    // ========================================================================
    // Scanning (rewindable, no allocation)
    // ========================================================================

    /// Scans over one type. Leaves the cursor after the scanned type on
    /// success; the caller rewinds when the answer is `NotType` or when it
    /// only wanted classification.
    pub(crate) fn scan_type(&mut self, mode: ParseTypeMode) -> ScanTypeFlags {
        if self.at(TokenKind::RefKeyword) {
            self.advance();
            if self.at(TokenKind::ReadOnlyKeyword) {
                self.advance();
            }
        }

        let mut result = if facts::is_predefined_type(self.current_kind())
            || self.at(TokenKind::VarKeyword)
        {
            self.advance();
            ScanTypeFlags::MustBeType
        } else if self.at(TokenKind::Identifier) {
            let mut flags = self.scan_named_type_part();
            if flags == ScanTypeFlags::NotType {
                return ScanTypeFlags::NotType;
            }
            // qualified name: a.b.c<d>
            while self.at(TokenKind::Dot) && self.peek(1).kind == TokenKind::Identifier {
                self.advance();
                flags = self.scan_named_type_part();
                if flags == ScanTypeFlags::NotType {
                    return ScanTypeFlags::NotType;
                }
            }
            flags
        } else if self.at(TokenKind::OpenParen) {
            if !self.scan_tuple_type() {
                return ScanTypeFlags::NotType;
            }
            ScanTypeFlags::TupleType
        } else {
            return ScanTypeFlags::NotType;
        };

        loop {
            match self.current_kind() {
                // no `T??`; the second `?` belongs to a conditional
                TokenKind::Question
                    if result != ScanTypeFlags::NotType
                        && !matches!(mode, ParseTypeMode::Pattern)
                        && self.peek(1).kind != TokenKind::Question =>
                {
                    self.advance();
                    result = ScanTypeFlags::MustBeType;
                }
                TokenKind::OpenBracket => {
                    // array rank: commas and close bracket only
                    self.advance();
                    while self.at(TokenKind::Comma) {
                        self.advance();
                    }
                    if !self.at(TokenKind::CloseBracket) {
                        return ScanTypeFlags::NotType;
                    }
                    self.advance();
                    result = ScanTypeFlags::MustBeType;
                }
                _ => break,
            }
        }
        result
    }

    /// One dotted segment: identifier with an optional type argument list.
    fn scan_named_type_part(&mut self) -> ScanTypeFlags {
        debug_assert!(self.at(TokenKind::Identifier));
        self.advance();
        if !self.at(TokenKind::LessThan) {
            return ScanTypeFlags::NonGenericTypeOrExpression;
        }
        match self.scan_possible_type_argument_list() {
            ScanTypeArgumentListKind::NotTypeArgumentList => ScanTypeFlags::NotType,
            ScanTypeArgumentListKind::PossibleTypeArgumentList => {
                ScanTypeFlags::GenericTypeOrExpression
            }
            ScanTypeArgumentListKind::DefiniteTypeArgumentList => ScanTypeFlags::MustBeType,
        }
    }

    /// Scans `<…>` after a name. Definite when some argument can only be
    /// a type (predefined types, nullables, arrays, nested definite
    /// generics); otherwise merely possible, and the caller decides from
    /// context.
    pub(crate) fn scan_possible_type_argument_list(&mut self) -> ScanTypeArgumentListKind {
        debug_assert!(self.at(TokenKind::LessThan));
        let mut definite = false;
        loop {
            // consumes `<` first time, `,` on later iterations
            self.advance();
            if self.at(TokenKind::GreaterThan) {
                // empty list `<>` is never a type argument list here
                return ScanTypeArgumentListKind::NotTypeArgumentList;
            }
            match self.scan_type(ParseTypeMode::Normal) {
                ScanTypeFlags::NotType => {
                    return ScanTypeArgumentListKind::NotTypeArgumentList;
                }
                ScanTypeFlags::MustBeType | ScanTypeFlags::TupleType => definite = true,
                ScanTypeFlags::GenericTypeOrExpression
                | ScanTypeFlags::NonGenericTypeOrExpression => {}
            }
            if !self.at(TokenKind::Comma) {
                break;
            }
        }
        if !self.at(TokenKind::GreaterThan) {
            return ScanTypeArgumentListKind::NotTypeArgumentList;
        }
        self.advance();
        if definite {
            ScanTypeArgumentListKind::DefiniteTypeArgumentList
        } else {
            ScanTypeArgumentListKind::PossibleTypeArgumentList
        }
    }

    /// `(T a, U)` with at least two elements.
    fn scan_tuple_type(&mut self) -> bool {
        debug_assert!(self.at(TokenKind::OpenParen));
        let mut elements = 0;
        loop {
            self.advance(); // `(` or `,`
            if self.scan_type(ParseTypeMode::Normal) == ScanTypeFlags::NotType {
                return false;
            }
            if self.at(TokenKind::Identifier) {
                self.advance();
            }
            elements += 1;
            if !self.at(TokenKind::Comma) {
                break;
            }
        }
        if elements < 2 || !self.at(TokenKind::CloseParen) {
            return false;
        }
        self.advance();
        true
    }

    /// After a closing `>` in expression context, these tokens keep the
    /// generic reading; anything else makes `<` a comparison.
    pub(crate) fn can_follow_type_argument_list_in_expression(kind: TokenKind) -> bool {
        use TokenKind::*;
        matches!(
            kind,
            OpenParen
                | CloseParen
                | CloseBracket
                | CloseBrace
                | Colon
                | Semicolon
                | Comma
                | Dot
                | Question
                | EqualsEquals
                | ExclamationEquals
                | Bar
                | Caret
                | AmpersandAmpersand
                | BarBar
                | Ampersand
                | OpenBracket
                | EndOfFile
                | FatArrow
        )
    }

    // ========================================================================
    // Committed parsing
    // ========================================================================

    pub(crate) fn parse_type(&mut self, mode: ParseTypeMode) -> &'a TypeSyntax<'a> {
        let arena = self.arena;
        let start = self.mark_start();

        if self.at(TokenKind::RefKeyword) {
            let ref_token = self.advance();
            let readonly = self.try_eat(TokenKind::ReadOnlyKeyword);
            let inner = self.parse_type(mode);
            return arena.alloc(TypeSyntax {
                kind: TypeKind::Ref { ref_token, readonly, inner },
                range: self.range_from(start),
            });
        }

        let mut ty = self.parse_core_type(mode);

        loop {
            match self.current_kind() {
                TokenKind::Question
                    if !matches!(mode, ParseTypeMode::Pattern)
                        && self.peek(1).kind != TokenKind::Question =>
                {
                    let question = self.advance();
                    ty = arena.alloc(TypeSyntax {
                        kind: TypeKind::Nullable { inner: ty, question },
                        range: self.range_from(start),
                    });
                }
                TokenKind::OpenBracket => {
                    let mut ranks = arena.vec();
                    while self.at(TokenKind::OpenBracket) {
                        ranks.push(&*arena.alloc(self.parse_array_rank(mode)));
                    }
                    ty = arena.alloc(TypeSyntax {
                        kind: TypeKind::Array { element: ty, ranks: ranks.into_bump_slice() },
                        range: self.range_from(start),
                    });
                }
                _ => break,
            }
        }
        ty
    }

    fn parse_core_type(&mut self, mode: ParseTypeMode) -> &'a TypeSyntax<'a> {
        let arena = self.arena;
        let start = self.mark_start();

        if facts::is_predefined_type(self.current_kind()) {
            let keyword = self.advance();
            return arena.alloc(TypeSyntax {
                kind: TypeKind::Predefined { keyword },
                range: self.range_from(start),
            });
        }
        if self.at(TokenKind::VarKeyword) {
            let identifier = self.advance();
            return arena.alloc(TypeSyntax {
                kind: TypeKind::IdentifierName { identifier },
                range: self.range_from(start),
            });
        }
        if self.at(TokenKind::OpenParen) {
            return self.parse_tuple_type(mode);
        }
        if self.at(TokenKind::Identifier) {
            return self.parse_qualified_name();
        }
        self.create_missing_identifier_name(ErrorCode::TypeExpected)
    }

    fn parse_tuple_type(&mut self, mode: ParseTypeMode) -> &'a TypeSyntax<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let open = self.eat(TokenKind::OpenParen);
        let elements = self.parse_separated_list(
            |p| {
                let e_start = p.mark_start();
                let ty = p.parse_type(mode);
                let name = p.try_eat(TokenKind::Identifier);
                &*p.arena.alloc(TupleElement { ty, name, range: p.range_from(e_start) })
            },
            |p| facts::can_start_type(p.current_kind()),
            |p| p.at(TokenKind::CloseParen),
            ErrorCode::TypeExpected,
            false,
        );
        let close = self.eat(TokenKind::CloseParen);
        if elements.len() < 2 {
            let span = self.token_span(open);
            self.diagnostics.add(ErrorCode::TupleTooFewElements, span);
        }
        arena.alloc(TypeSyntax {
            kind: TypeKind::Tuple { open, elements, close },
            range: self.range_from(start),
        })
    }

    /// `a.b<c>.d` as a left-nested qualified name.
    pub(crate) fn parse_qualified_name(&mut self) -> &'a TypeSyntax<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let mut name = self.parse_simple_name_in_type();
        while self.at(TokenKind::Dot) && self.peek(1).kind == TokenKind::Identifier {
            let dot = self.advance();
            let right = self.parse_simple_name_in_type();
            name = arena.alloc(TypeSyntax {
                kind: TypeKind::QualifiedName { left: name, dot, right },
                range: self.range_from(start),
            });
        }
        name
    }

    /// Identifier with type arguments in type context, where `<` always
    /// opens an argument list if it scans as one.
    pub(crate) fn parse_simple_name_in_type(&mut self) -> &'a TypeSyntax<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let identifier = self.eat(TokenKind::Identifier);
        if self.at(TokenKind::LessThan) {
            let point = self.reset_point();
            let scan = self.scan_possible_type_argument_list();
            self.rewind(point);
            if scan != ScanTypeArgumentListKind::NotTypeArgumentList {
                let (open, args, close) = self.parse_type_argument_list();
                return arena.alloc(TypeSyntax {
                    kind: TypeKind::GenericName { identifier, open, args, close },
                    range: self.range_from(start),
                });
            }
        }
        arena.alloc(TypeSyntax {
            kind: TypeKind::IdentifierName { identifier },
            range: self.range_from(start),
        })
    }

    /// Commits `<T, U>`; the caller has already decided this is a type
    /// argument list.
    pub(crate) fn parse_type_argument_list(
        &mut self,
    ) -> (TokenId, SeparatedList<'a, TypeSyntax<'a>>, TokenId) {
        let open = self.eat(TokenKind::LessThan);
        let args = self.parse_separated_list(
            |p| p.parse_type(ParseTypeMode::Normal),
            |p| facts::can_start_type(p.current_kind()),
            |p| p.at(TokenKind::GreaterThan),
            ErrorCode::TypeExpected,
            false,
        );
        let close = self.eat(TokenKind::GreaterThan);
        (open, args, close)
    }

    fn parse_array_rank(&mut self, mode: ParseTypeMode) -> ArrayRank<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let open = self.eat(TokenKind::OpenBracket);
        let mut sizes = arena.vec();
        let mut separators = arena.vec();
        while !self.at(TokenKind::CloseBracket) && !self.at_eof() {
            if self.at(TokenKind::Comma) {
                sizes.push(&*self.omitted_array_size());
                separators.push(self.advance());
                continue;
            }
            if matches!(mode, ParseTypeMode::NewExpression)
                && facts::can_start_expression(self.current_kind())
            {
                sizes.push(self.parse_expression());
            } else {
                sizes.push(&*self.omitted_array_size());
            }
            if self.at(TokenKind::Comma) {
                separators.push(self.advance());
            } else {
                break;
            }
        }
        // a lone `[]` has one omitted size
        if sizes.is_empty() {
            sizes.push(&*self.omitted_array_size());
        }
        let close = self.eat(TokenKind::CloseBracket);
        ArrayRank {
            open,
            sizes: SeparatedList {
                items: sizes.into_bump_slice(),
                separators: separators.into_bump_slice(),
            },
            close,
            range: self.range_from(start),
        }
    }

    /// Zero-width omitted-size token wrapped as a literal expression.
    fn omitted_array_size(&mut self) -> &'a Expr<'a> {
        let id = self.create_missing_token(TokenKind::OmittedArraySize);
        // omitted is not an error; replace the MISSING flag outright
        self.tokens[id as usize].flags = crate::token::TokenFlags::OMITTED;
        self.arena.alloc(Expr {
            kind: ExprKind::Literal { kind: SyntaxKind::NumericLiteralExpression, token: id },
            range: TokenRange::new(id, id + 1),
        })
    }
}
