//! Pattern parsing for `is` expressions, switch arms and case labels.
//!
//! Patterns reuse the type scanner in `Pattern` mode, which leaves a
//! trailing `?` alone so `a is B ? x : y` stays a conditional expression
//! over an is-type test.

use crate::ast::*;
use crate::diagnostics::ErrorCode;
use crate::facts::{self, Precedence};
use crate::parser::Parser;
use crate::token::TokenKind;
use crate::types::{ParseTypeMode, ScanTypeFlags};

impl<'a, 'd> Parser<'a, 'd> {
    pub(crate) fn is_possible_pattern(&mut self) -> bool {
        facts::can_start_expression(self.current_kind())
            || self.at_contextual(TokenKind::NotKeyword)
            || matches!(
                self.current_kind(),
                TokenKind::LessThan
                    | TokenKind::LessThanEquals
                    | TokenKind::GreaterThan
                    | TokenKind::GreaterThanEquals
                    | TokenKind::OpenBrace
            )
    }

    /// Full pattern grammar: `or` weakest, then `and`, then `not`, then
    /// the primary forms.
    pub(crate) fn parse_pattern(&mut self) -> &'a Pattern<'a> {
        self.parse_disjunctive_pattern()
    }

    fn parse_disjunctive_pattern(&mut self) -> &'a Pattern<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let mut left = self.parse_conjunctive_pattern();
        while self.at_contextual(TokenKind::OrKeyword) {
            let operator = self.advance();
            let right = self.parse_conjunctive_pattern();
            left = arena.alloc(Pattern {
                kind: PatternKind::Or { left, operator, right },
                range: self.range_from(start),
            });
        }
        left
    }

    fn parse_conjunctive_pattern(&mut self) -> &'a Pattern<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let mut left = self.parse_negated_pattern();
        while self.at_contextual(TokenKind::AndKeyword) {
            let operator = self.advance();
            let right = self.parse_negated_pattern();
            left = arena.alloc(Pattern {
                kind: PatternKind::And { left, operator, right },
                range: self.range_from(start),
            });
        }
        left
    }

    fn parse_negated_pattern(&mut self) -> &'a Pattern<'a> {
        if self.at_contextual(TokenKind::NotKeyword) {
            let arena = self.arena;
            let start = self.mark_start();
            let operator = self.advance();
            let pattern = self.parse_negated_pattern();
            return arena.alloc(Pattern {
                kind: PatternKind::Not { operator, pattern },
                range: self.range_from(start),
            });
        }
        self.parse_primary_pattern()
    }

    fn parse_primary_pattern(&mut self) -> &'a Pattern<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        match self.current_kind() {
            TokenKind::LessThan
            | TokenKind::LessThanEquals
            | TokenKind::GreaterThan
            | TokenKind::GreaterThanEquals => {
                let operator = self.advance();
                let expr = self.parse_sub_expression(Precedence::Relational);
                arena.alloc(Pattern {
                    kind: PatternKind::Relational { operator, expr },
                    range: self.range_from(start),
                })
            }
            TokenKind::Underscore => {
                let token = self.advance();
                arena.alloc(Pattern {
                    kind: PatternKind::Discard { token },
                    range: self.range_from(start),
                })
            }
            TokenKind::VarKeyword => {
                let var_token = self.advance();
                let designation = self.parse_designation();
                arena.alloc(Pattern {
                    kind: PatternKind::Var { var_token, designation },
                    range: self.range_from(start),
                })
            }
            TokenKind::DotDot => {
                let dots = self.advance();
                let pattern = if self.is_possible_pattern() {
                    Some(self.parse_negated_pattern())
                } else {
                    None
                };
                arena.alloc(Pattern {
                    kind: PatternKind::Slice { dots, pattern },
                    range: self.range_from(start),
                })
            }
            TokenKind::OpenBrace => self.parse_recursive_pattern(start, None, None),
            TokenKind::OpenBracket => self.parse_list_pattern(start),
            TokenKind::OpenParen => self.parse_parenthesized_or_positional(start),
            kind if facts::can_start_type(kind) => self.parse_type_led_pattern(start),
            _ => self.parse_constant_pattern(start),
        }
    }

    /// Patterns that open with something type-shaped: declaration, type,
    /// recursive with a named type, or a constant after all.
    fn parse_type_led_pattern(&mut self, start: TokenId) -> &'a Pattern<'a> {
        let arena = self.arena;
        let point = self.reset_point();
        let flags = self.scan_type(ParseTypeMode::Pattern);
        let next = self.current_kind();
        self.rewind(point);

        if flags == ScanTypeFlags::NotType {
            return self.parse_constant_pattern(start);
        }
        match next {
            TokenKind::OpenParen | TokenKind::OpenBrace => {
                let ty = self.parse_type(ParseTypeMode::Pattern);
                self.parse_recursive_pattern(start, Some(ty), None)
            }
            TokenKind::Identifier => {
                let ty = self.parse_type(ParseTypeMode::Pattern);
                let designation = self.parse_designation();
                arena.alloc(Pattern {
                    kind: PatternKind::Declaration { ty, designation },
                    range: self.range_from(start),
                })
            }
            TokenKind::Underscore => {
                let ty = self.parse_type(ParseTypeMode::Pattern);
                let designation = self.parse_designation();
                arena.alloc(Pattern {
                    kind: PatternKind::Declaration { ty, designation },
                    range: self.range_from(start),
                })
            }
            _ if flags == ScanTypeFlags::MustBeType || flags == ScanTypeFlags::TupleType => {
                let ty = self.parse_type(ParseTypeMode::Pattern);
                arena.alloc(Pattern {
                    kind: PatternKind::Type { ty },
                    range: self.range_from(start),
                })
            }
            // ambiguous names read as constants, which covers qualified
            // enum members like `Color.Red`
            _ => self.parse_constant_pattern(start),
        }
    }

    fn parse_constant_pattern(&mut self, start: TokenId) -> &'a Pattern<'a> {
        let arena = self.arena;
        // stay below the conditional so `?` binds outside the pattern
        let expr = self.parse_sub_expression(Precedence::Coalescing);
        arena.alloc(Pattern {
            kind: PatternKind::Constant { expr },
            range: self.range_from(start),
        })
    }

    /// Positional and/or property clauses, with an optional designation.
    /// `ty` is present when the pattern named a type first.
    fn parse_recursive_pattern(
        &mut self,
        start: TokenId,
        ty: Option<&'a TypeSyntax<'a>>,
        positional: Option<&'a PositionalPatternClause<'a>>,
    ) -> &'a Pattern<'a> {
        let arena = self.arena;
        let positional = if positional.is_none() && self.at(TokenKind::OpenParen) {
            Some(self.parse_positional_clause())
        } else {
            positional
        };
        let property = if self.at(TokenKind::OpenBrace) {
            Some(self.parse_property_clause())
        } else {
            None
        };
        let designation = if matches!(
            self.current_kind(),
            TokenKind::Identifier | TokenKind::Underscore
        ) {
            Some(self.parse_designation())
        } else {
            None
        };
        arena.alloc(Pattern {
            kind: PatternKind::Recursive { ty, positional, property, designation },
            range: self.range_from(start),
        })
    }

    /// `(p)` folds to a parenthesized pattern; anything else inside the
    /// parens is a positional clause.
    fn parse_parenthesized_or_positional(&mut self, start: TokenId) -> &'a Pattern<'a> {
        let arena = self.arena;
        let clause = self.parse_positional_clause();
        let bare_single = clause.subpatterns.len() == 1
            && clause.subpatterns.items[0].name_colon.is_none()
            && !self.at(TokenKind::OpenBrace)
            && !matches!(self.current_kind(), TokenKind::Identifier | TokenKind::Underscore);
        if bare_single {
            return arena.alloc(Pattern {
                kind: PatternKind::Parenthesized {
                    open: clause.open,
                    pattern: clause.subpatterns.items[0].pattern,
                    close: clause.close,
                },
                range: self.range_from(start),
            });
        }
        self.parse_recursive_pattern(start, None, Some(clause))
    }

    fn parse_positional_clause(&mut self) -> &'a PositionalPatternClause<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let open = self.eat(TokenKind::OpenParen);
        let subpatterns = self.parse_separated_list(
            |p| p.parse_subpattern(),
            |p| p.is_possible_pattern() || p.peek(1).kind == TokenKind::Colon,
            |p| p.at(TokenKind::CloseParen),
            ErrorCode::SyntaxError,
            false,
        );
        let close = self.eat(TokenKind::CloseParen);
        arena.alloc(PositionalPatternClause {
            open,
            subpatterns,
            close,
            range: self.range_from(start),
        })
    }

    fn parse_property_clause(&mut self) -> &'a PropertyPatternClause<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let open = self.eat(TokenKind::OpenBrace);
        let subpatterns = self.parse_separated_list(
            |p| p.parse_subpattern(),
            |p| p.is_possible_pattern() || p.at(TokenKind::Identifier),
            |p| p.at(TokenKind::CloseBrace),
            ErrorCode::SyntaxError,
            true,
        );
        let close = self.eat(TokenKind::CloseBrace);
        arena.alloc(PropertyPatternClause {
            open,
            subpatterns,
            close,
            range: self.range_from(start),
        })
    }

    fn parse_subpattern(&mut self) -> &'a Subpattern<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let name_colon = if self.at(TokenKind::Identifier)
            && self.peek(1).kind == TokenKind::Colon
        {
            let name = self.advance();
            let colon = self.advance();
            Some((name, colon))
        } else {
            None
        };
        let pattern = self.parse_pattern();
        arena.alloc(Subpattern { name_colon, pattern, range: self.range_from(start) })
    }

    fn parse_list_pattern(&mut self, start: TokenId) -> &'a Pattern<'a> {
        let arena = self.arena;
        let open = self.eat(TokenKind::OpenBracket);
        let patterns = self.parse_separated_list(
            |p| p.parse_pattern(),
            |p| p.is_possible_pattern(),
            |p| p.at(TokenKind::CloseBracket),
            ErrorCode::SyntaxError,
            true,
        );
        let close = self.eat(TokenKind::CloseBracket);
        let designation = if matches!(
            self.current_kind(),
            TokenKind::Identifier | TokenKind::Underscore
        ) {
            Some(self.parse_designation())
        } else {
            None
        };
        arena.alloc(Pattern {
            kind: PatternKind::ListPattern { open, patterns, close, designation },
            range: self.range_from(start),
        })
    }

    /// `_`, a single identifier, or a parenthesized list of designations.
    pub(crate) fn parse_designation(&mut self) -> &'a Designation<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let kind = match self.current_kind() {
            TokenKind::Underscore => DesignationKind::Discard { token: self.advance() },
            TokenKind::OpenParen => {
                let open = self.advance();
                let items = self.parse_separated_list(
                    |p| p.parse_designation(),
                    |p| {
                        matches!(
                            p.current_kind(),
                            TokenKind::Identifier | TokenKind::Underscore | TokenKind::OpenParen
                        )
                    },
                    |p| p.at(TokenKind::CloseParen),
                    ErrorCode::IdentifierExpected,
                    false,
                );
                let close = self.eat(TokenKind::CloseParen);
                DesignationKind::Parenthesized { open, items, close }
            }
            _ => DesignationKind::Single { identifier: self.eat(TokenKind::Identifier) },
        };
        arena.alloc(Designation { kind, range: self.range_from(start) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::diagnostics::Diagnostics;
    use crate::kind::SyntaxKind;
    use crate::tokenizer::tokenize;

    fn parse_pattern_of<R>(source: &str, f: impl FnOnce(&Pattern<'_>) -> R) -> R {
        let arena = Arena::new();
        let mut diags = Diagnostics::new();
        let result = tokenize(source, &mut diags, &arena);
        let mut parser = Parser::new(result, &mut diags, &arena);
        let pattern = parser.parse_pattern();
        f(pattern)
    }

    fn parse_expr_of<R>(source: &str, f: impl FnOnce(&Expr<'_>) -> R) -> R {
        let arena = Arena::new();
        let mut diags = Diagnostics::new();
        let result = tokenize(source, &mut diags, &arena);
        let mut parser = Parser::new(result, &mut diags, &arena);
        let expr = parser.parse_expression();
        f(expr)
    }

    #[test]
    fn basic_pattern_kinds() {
        parse_pattern_of("_", |p| assert_eq!(p.kind(), SyntaxKind::DiscardPattern));
        parse_pattern_of("var x", |p| assert_eq!(p.kind(), SyntaxKind::VarPattern));
        parse_pattern_of("42", |p| assert_eq!(p.kind(), SyntaxKind::ConstantPattern));
        parse_pattern_of("int x", |p| assert_eq!(p.kind(), SyntaxKind::DeclarationPattern));
        parse_pattern_of("int[]", |p| assert_eq!(p.kind(), SyntaxKind::TypePattern));
        parse_pattern_of("> 0", |p| assert_eq!(p.kind(), SyntaxKind::RelationalPattern));
    }

    #[test]
    fn or_and_not_precedence() {
        parse_pattern_of("not null and > 0 or < 10", |p| {
            // `or` is weakest: ((not null) and (> 0)) or (< 10)
            assert_eq!(p.kind(), SyntaxKind::OrPattern);
            match p.kind {
                PatternKind::Or { left, right, .. } => {
                    assert_eq!(left.kind(), SyntaxKind::AndPattern);
                    assert_eq!(right.kind(), SyntaxKind::RelationalPattern);
                }
                _ => panic!("expected or pattern"),
            }
        });
    }

    #[test]
    fn qualified_name_is_constant_pattern() {
        parse_pattern_of("Color.Red", |p| {
            assert_eq!(p.kind(), SyntaxKind::ConstantPattern);
        });
    }

    #[test]
    fn recursive_patterns() {
        parse_pattern_of("Point(1, 2)", |p| {
            assert_eq!(p.kind(), SyntaxKind::RecursivePattern);
            match p.kind {
                PatternKind::Recursive { ty, positional, .. } => {
                    assert!(ty.is_some());
                    assert_eq!(positional.unwrap().subpatterns.len(), 2);
                }
                _ => panic!("expected recursive pattern"),
            }
        });
        parse_pattern_of("{ X: 1, Y: > 2 }", |p| {
            match p.kind {
                PatternKind::Recursive { ty, property, .. } => {
                    assert!(ty.is_none());
                    let subs = property.unwrap().subpatterns;
                    assert_eq!(subs.len(), 2);
                    assert!(subs.items[0].name_colon.is_some());
                }
                _ => panic!("expected recursive pattern"),
            }
        });
        parse_pattern_of("Point { X: 0 } p", |p| {
            match p.kind {
                PatternKind::Recursive { ty, property, designation, .. } => {
                    assert!(ty.is_some());
                    assert!(property.is_some());
                    assert!(designation.is_some());
                }
                _ => panic!("expected recursive pattern"),
            }
        });
    }

    #[test]
    fn list_and_slice_patterns() {
        parse_pattern_of("[1, .., var last]", |p| {
            match p.kind {
                PatternKind::ListPattern { patterns, .. } => {
                    assert_eq!(patterns.len(), 3);
                    assert_eq!(patterns.items[1].kind(), SyntaxKind::SlicePattern);
                }
                _ => panic!("expected list pattern"),
            }
        });
    }

    #[test]
    fn parenthesized_pattern() {
        parse_pattern_of("(not null)", |p| {
            assert_eq!(p.kind(), SyntaxKind::ParenthesizedPattern);
        });
    }

    #[test]
    fn is_type_folds_and_conditional_survives() {
        parse_expr_of("a is int", |e| {
            assert_eq!(e.kind(), SyntaxKind::IsExpression);
        });
        parse_expr_of("a is not null", |e| {
            assert_eq!(e.kind(), SyntaxKind::IsPatternExpression);
        });
        // the `?` after the type belongs to the conditional, not the type
        parse_expr_of("a is B ? x : y", |e| {
            assert_eq!(e.kind(), SyntaxKind::ConditionalExpression);
            match e.kind {
                ExprKind::Conditional { condition, .. } => {
                    assert_eq!(condition.kind(), SyntaxKind::IsExpression);
                }
                _ => panic!("expected conditional"),
            }
        });
    }

    #[test]
    fn designations() {
        let arena = Arena::new();
        let mut diags = Diagnostics::new();
        let result = tokenize("(a, (_, b))", &mut diags, &arena);
        let mut parser = Parser::new(result, &mut diags, &arena);
        let d = parser.parse_designation();
        match d.kind {
            DesignationKind::Parenthesized { items, .. } => {
                assert_eq!(items.len(), 2);
                assert_eq!(items.items[1].kind(), SyntaxKind::ParenthesizedVariableDesignation);
            }
            _ => panic!("expected parenthesized designation"),
        }
    }
}
