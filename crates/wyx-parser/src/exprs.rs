//! Expression parsing: precedence climbing over the operator table plus
//! the primary/postfix grammar.
//!
//! `>` never arrives pre-merged from the tokenizer; shift operators are
//! built here from raw-adjacent `>` tokens so `A<B<C>>` closes two
//! generic argument lists instead of shifting.

use crate::ast::*;
use crate::diagnostics::ErrorCode;
use crate::facts::{self, Precedence};
use crate::kind::SyntaxKind;
use crate::parser::Parser;
use crate::token::TokenKind;
use crate::types::{ParseTypeMode, ScanTypeArgumentListKind, ScanTypeFlags};

impl<'a, 'd> Parser<'a, 'd> {
    pub(crate) fn parse_expression(&mut self) -> &'a Expr<'a> {
        self.parse_sub_expression(Precedence::Expression)
    }

    /// The operator token the binary loop sees, with how many raw tokens
    /// spell it. Only `>` starts multi-token operators.
    fn merged_operator(&self) -> (TokenKind, usize) {
        let kind = self.current_kind();
        if kind != TokenKind::GreaterThan {
            return (kind, 1);
        }
        match self.raw_kind_after_current(1) {
            TokenKind::GreaterThan => match self.raw_kind_after_current(2) {
                TokenKind::GreaterThan => (TokenKind::GreaterThanGreaterThanGreaterThan, 3),
                TokenKind::GreaterThanEquals => {
                    (TokenKind::GreaterThanGreaterThanGreaterThanEquals, 3)
                }
                _ => (TokenKind::GreaterThanGreaterThan, 2),
            },
            TokenKind::GreaterThanEquals => (TokenKind::GreaterThanGreaterThanEquals, 2),
            _ => (TokenKind::GreaterThan, 1),
        }
    }

    /// Consumes the raw tokens of a merged operator; the returned id is
    /// the first of them.
    fn eat_merged(&mut self, count: usize) -> TokenId {
        let id = self.advance();
        for _ in 1..count {
            self.advance();
        }
        id
    }

    pub(crate) fn parse_sub_expression(&mut self, min: Precedence) -> &'a Expr<'a> {
        let arena = self.arena;
        let start = self.mark_start();

        let mut left = if self.at(TokenKind::ThrowKeyword) {
            let throw_token = self.advance();
            let expr = self.parse_sub_expression(Precedence::Coalescing);
            return arena.alloc(Expr {
                kind: ExprKind::Throw { throw_token, expr },
                range: self.range_from(start),
            });
        } else if self.at(TokenKind::RefKeyword) {
            let ref_token = self.advance();
            let expr = self.parse_sub_expression(Precedence::Expression);
            return arena.alloc(Expr {
                kind: ExprKind::Ref { ref_token, expr },
                range: self.range_from(start),
            });
        } else if let Some(kind) = facts::prefix_unary_op(self.current_kind()) {
            let operator = self.advance();
            let operand = self.parse_sub_expression(Precedence::Unary);
            arena.alloc(Expr {
                kind: ExprKind::Unary { kind, operator, operand },
                range: self.range_from(start),
            })
        } else if self.at(TokenKind::DotDot) {
            let operator = self.advance();
            let right = if facts::can_start_expression(self.current_kind()) {
                Some(self.parse_sub_expression(Precedence::Range))
            } else {
                None
            };
            arena.alloc(Expr {
                kind: ExprKind::Range { left: None, operator, right },
                range: self.range_from(start),
            })
        } else {
            self.parse_term()
        };

        loop {
            // switch and with bind tighter than any binary operator
            if self.at(TokenKind::SwitchKeyword) && self.peek(1).kind == TokenKind::OpenBrace {
                if Precedence::Switch < min {
                    break;
                }
                left = self.parse_switch_expression(left, start);
                continue;
            }
            if self.at_contextual(TokenKind::WithKeyword)
                && self.peek(1).kind == TokenKind::OpenBrace
            {
                if Precedence::Switch < min {
                    break;
                }
                left = self.parse_with_expression(left, start);
                continue;
            }

            let (op_kind, consumed) = self.merged_operator();
            let (node_kind, prec, is_assignment) =
                if let Some(kind) = facts::assignment_op(op_kind) {
                    (kind, Precedence::Expression, true)
                } else if let Some((kind, prec)) = facts::binary_op(op_kind) {
                    (kind, prec, false)
                } else {
                    break;
                };
            if prec < min || (prec == min && !facts::is_right_associative(node_kind)) {
                break;
            }

            match op_kind {
                TokenKind::IsKeyword => {
                    left = self.parse_is_expression(left, start);
                }
                TokenKind::AsKeyword => {
                    let as_token = self.advance();
                    let ty = self.parse_type(ParseTypeMode::Normal);
                    left = arena.alloc(Expr {
                        kind: ExprKind::As { left, as_token, ty },
                        range: self.range_from(start),
                    });
                }
                TokenKind::DotDot => {
                    let operator = self.advance();
                    let right = if facts::can_start_expression(self.current_kind()) {
                        Some(self.parse_sub_expression(Precedence::Range))
                    } else {
                        None
                    };
                    left = arena.alloc(Expr {
                        kind: ExprKind::Range { left: Some(left), operator, right },
                        range: self.range_from(start),
                    });
                }
                _ => {
                    let operator = self.eat_merged(consumed);
                    let right = self.parse_sub_expression(prec);
                    let kind = if is_assignment {
                        ExprKind::Assignment { kind: node_kind, left, operator, right }
                    } else {
                        ExprKind::Binary { kind: node_kind, left, operator, right }
                    };
                    left = arena.alloc(Expr { kind, range: self.range_from(start) });
                }
            }
        }

        if min <= Precedence::Conditional && self.at(TokenKind::Question) {
            let question = self.advance();
            let when_true = self.parse_sub_expression(Precedence::Conditional);
            let colon = self.eat(TokenKind::Colon);
            let when_false = self.parse_sub_expression(Precedence::Conditional);
            left = arena.alloc(Expr {
                kind: ExprKind::Conditional { condition: left, question, when_true, colon, when_false },
                range: self.range_from(start),
            });
        }

        left
    }

    /// `left is <pattern>`; a bare type pattern folds to an is-type node.
    fn parse_is_expression(&mut self, left: &'a Expr<'a>, start: TokenId) -> &'a Expr<'a> {
        let arena = self.arena;
        let is_token = self.advance();
        let pattern = self.parse_pattern();
        let kind = match pattern.kind {
            PatternKind::Type { ty } => ExprKind::IsType { left, is_token, ty },
            // a bare name after `is` reads as a type test
            PatternKind::Constant { expr } => match expr.kind {
                ExprKind::Name { name } if name.is_name() => {
                    ExprKind::IsType { left, is_token, ty: name }
                }
                _ => ExprKind::IsPattern { left, is_token, pattern },
            },
            _ => ExprKind::IsPattern { left, is_token, pattern },
        };
        arena.alloc(Expr { kind, range: self.range_from(start) })
    }

    fn parse_switch_expression(&mut self, governing: &'a Expr<'a>, start: TokenId) -> &'a Expr<'a> {
        let arena = self.arena;
        let switch_token = self.advance();
        let open = self.eat(TokenKind::OpenBrace);
        let arms = self.parse_separated_list(
            |p| p.parse_switch_arm(),
            |p| p.is_possible_pattern(),
            |p| p.at(TokenKind::CloseBrace),
            ErrorCode::SyntaxError,
            true,
        );
        let close = self.eat(TokenKind::CloseBrace);
        arena.alloc(Expr {
            kind: ExprKind::Switch { governing, switch_token, open, arms, close },
            range: self.range_from(start),
        })
    }

    fn parse_switch_arm(&mut self) -> &'a SwitchArm<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let pattern = self.parse_pattern();
        let when = self.parse_when_clause();
        let arrow = self.eat(TokenKind::FatArrow);
        let body = self.parse_expression();
        arena.alloc(SwitchArm { pattern, when, arrow, body, range: self.range_from(start) })
    }

    pub(crate) fn parse_when_clause(&mut self) -> Option<&'a WhenClause<'a>> {
        if !self.at_contextual(TokenKind::WhenKeyword) {
            return None;
        }
        let arena = self.arena;
        let start = self.mark_start();
        let when_token = self.advance();
        let condition = self.parse_sub_expression(Precedence::Conditional);
        Some(arena.alloc(WhenClause { when_token, condition, range: self.range_from(start) }))
    }

    fn parse_with_expression(&mut self, left: &'a Expr<'a>, start: TokenId) -> &'a Expr<'a> {
        let arena = self.arena;
        let with_token = self.advance();
        let initializer = self.parse_initializer(Some(SyntaxKind::WithInitializerExpression));
        arena.alloc(Expr {
            kind: ExprKind::With { left, with_token, initializer },
            range: self.range_from(start),
        })
    }

    // ========================================================================
    // Terms
    // ========================================================================

    fn parse_term(&mut self) -> &'a Expr<'a> {
        let start = self.mark_start();
        let expr = self.parse_primary();
        self.parse_postfix(expr, start)
    }

    fn parse_postfix(&mut self, mut expr: &'a Expr<'a>, start: TokenId) -> &'a Expr<'a> {
        let arena = self.arena;
        loop {
            match self.current_kind() {
                TokenKind::OpenParen => {
                    let args = self.parse_argument_list();
                    expr = arena.alloc(Expr {
                        kind: ExprKind::Invocation { target: expr, args },
                        range: self.range_from(start),
                    });
                }
                TokenKind::OpenBracket => {
                    let args = self.parse_bracketed_argument_list();
                    expr = arena.alloc(Expr {
                        kind: ExprKind::ElementAccess { target: expr, args },
                        range: self.range_from(start),
                    });
                }
                TokenKind::Dot => {
                    let dot = self.advance();
                    let name = self.parse_simple_name_in_expression();
                    expr = arena.alloc(Expr {
                        kind: ExprKind::MemberAccess { target: expr, dot, name },
                        range: self.range_from(start),
                    });
                }
                TokenKind::Question
                    if matches!(
                        self.peek(1).kind,
                        TokenKind::Dot | TokenKind::OpenBracket
                    ) =>
                {
                    let question = self.advance();
                    let access = self.parse_conditional_access_rest();
                    expr = arena.alloc(Expr {
                        kind: ExprKind::ConditionalAccess { target: expr, question, access },
                        range: self.range_from(start),
                    });
                }
                TokenKind::PlusPlus | TokenKind::MinusMinus => {
                    let kind = facts::postfix_unary_op(self.current_kind())
                        .unwrap_or(SyntaxKind::PostIncrementExpression);
                    let operator = self.advance();
                    expr = arena.alloc(Expr {
                        kind: ExprKind::Postfix { kind, operand: expr, operator },
                        range: self.range_from(start),
                    });
                }
                TokenKind::Exclamation => {
                    let operator = self.advance();
                    expr = arena.alloc(Expr {
                        kind: ExprKind::Bang { operand: expr, operator },
                        range: self.range_from(start),
                    });
                }
                _ => break,
            }
        }
        expr
    }

    /// The expression after `?.` or `?[`, rooted at a binding node.
    fn parse_conditional_access_rest(&mut self) -> &'a Expr<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let binding = if self.at(TokenKind::Dot) {
            let dot = self.advance();
            let name = self.parse_simple_name_in_expression();
            arena.alloc(Expr {
                kind: ExprKind::MemberBinding { dot, name },
                range: self.range_from(start),
            })
        } else {
            let args = self.parse_bracketed_argument_list();
            arena.alloc(Expr {
                kind: ExprKind::ElementBinding { args },
                range: self.range_from(start),
            })
        };
        self.parse_postfix(binding, start)
    }

    /// Identifier possibly followed by type arguments, in expression
    /// position. `a < b` stays a comparison unless the scan is definite or
    /// the token after the would-be argument list keeps the generic
    /// reading.
    pub(crate) fn parse_simple_name_in_expression(&mut self) -> &'a TypeSyntax<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let identifier = self.eat(TokenKind::Identifier);
        if self.at(TokenKind::LessThan) {
            let point = self.reset_point();
            let scan = self.scan_possible_type_argument_list();
            let commit = match scan {
                ScanTypeArgumentListKind::DefiniteTypeArgumentList => true,
                ScanTypeArgumentListKind::PossibleTypeArgumentList => {
                    Self::can_follow_type_argument_list_in_expression(self.current_kind())
                }
                ScanTypeArgumentListKind::NotTypeArgumentList => false,
            };
            self.rewind(point);
            if commit {
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

    // ========================================================================
    // Primary expressions
    // ========================================================================

    fn parse_primary(&mut self) -> &'a Expr<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        match self.current_kind() {
            TokenKind::NumericLiteral => {
                let token = self.advance();
                arena.alloc(Expr {
                    kind: ExprKind::Literal {
                        kind: SyntaxKind::NumericLiteralExpression,
                        token,
                    },
                    range: self.range_from(start),
                })
            }
            TokenKind::TrueKeyword => self.literal(SyntaxKind::TrueLiteralExpression, start),
            TokenKind::FalseKeyword => self.literal(SyntaxKind::FalseLiteralExpression, start),
            TokenKind::NullKeyword => self.literal(SyntaxKind::NullLiteralExpression, start),
            TokenKind::StringLiteralEmpty => {
                self.literal(SyntaxKind::EmptyStringLiteralExpression, start)
            }
            TokenKind::StringLiteralStart => self.parse_string_literal(start, false),
            TokenKind::RawStringLiteralStart => self.parse_string_literal(start, true),
            TokenKind::CharLiteralStart => self.parse_char_literal(start),
            TokenKind::DefaultKeyword => {
                if self.peek(1).kind == TokenKind::OpenParen {
                    let keyword = self.advance();
                    let open = self.eat(TokenKind::OpenParen);
                    let ty = self.parse_type(ParseTypeMode::Normal);
                    let close = self.eat(TokenKind::CloseParen);
                    arena.alloc(Expr {
                        kind: ExprKind::Default { keyword, open, ty, close },
                        range: self.range_from(start),
                    })
                } else {
                    self.literal(SyntaxKind::DefaultLiteralExpression, start)
                }
            }
            TokenKind::TypeofKeyword => {
                let keyword = self.advance();
                let open = self.eat(TokenKind::OpenParen);
                let ty = self.parse_type(ParseTypeMode::Normal);
                let close = self.eat(TokenKind::CloseParen);
                arena.alloc(Expr {
                    kind: ExprKind::TypeOf { keyword, open, ty, close },
                    range: self.range_from(start),
                })
            }
            TokenKind::ThisKeyword => {
                let token = self.advance();
                arena.alloc(Expr { kind: ExprKind::This { token }, range: self.range_from(start) })
            }
            TokenKind::BaseKeyword => {
                let token = self.advance();
                arena.alloc(Expr { kind: ExprKind::Base { token }, range: self.range_from(start) })
            }
            TokenKind::NewKeyword => self.parse_new_expression(start),
            TokenKind::OpenBracket => self.parse_collection_expression(start),
            TokenKind::OpenParen => self.parse_paren_tuple_cast_or_lambda(start),
            TokenKind::Identifier if self.peek(1).kind == TokenKind::FatArrow => {
                self.parse_simple_lambda(start)
            }
            TokenKind::Identifier => {
                let name = self.parse_simple_name_in_expression();
                arena.alloc(Expr { kind: ExprKind::Name { name }, range: name.range })
            }
            TokenKind::Underscore => {
                let identifier = self.advance();
                let name = arena.alloc(TypeSyntax {
                    kind: TypeKind::IdentifierName { identifier },
                    range: self.range_from(start),
                });
                arena.alloc(Expr { kind: ExprKind::Name { name }, range: name.range })
            }
            TokenKind::VarKeyword
                if matches!(
                    self.peek(1).kind,
                    TokenKind::Identifier | TokenKind::Underscore | TokenKind::OpenParen
                ) =>
            {
                self.parse_declaration_expression()
            }
            kind if facts::is_predefined_type(kind) => {
                let keyword = self.advance();
                let name = arena.alloc(TypeSyntax {
                    kind: TypeKind::Predefined { keyword },
                    range: self.range_from(start),
                });
                arena.alloc(Expr { kind: ExprKind::Name { name }, range: name.range })
            }
            _ => self.create_missing_identifier_expr(ErrorCode::ValueExpected),
        }
    }

    fn literal(&mut self, kind: SyntaxKind, start: TokenId) -> &'a Expr<'a> {
        let token = self.advance();
        self.arena.alloc(Expr {
            kind: ExprKind::Literal { kind, token },
            range: self.range_from(start),
        })
    }

    /// A string literal is a token run; interpolations re-enter the full
    /// expression grammar between `${` and `}`.
    fn parse_string_literal(&mut self, start: TokenId, raw: bool) -> &'a Expr<'a> {
        let arena = self.arena;
        let open = self.advance();
        let mut parts = arena.vec();
        let mut interpolated = false;
        let end_kind = if raw {
            TokenKind::RawStringLiteralEnd
        } else {
            TokenKind::StringLiteralEnd
        };
        let end = loop {
            match self.current_kind() {
                TokenKind::StringLiteralPart => {
                    parts.push(StringPart::Text(self.advance()));
                }
                TokenKind::InterpolatedIdentifier => {
                    interpolated = true;
                    parts.push(StringPart::Identifier(self.advance()));
                }
                TokenKind::InterpolatedExpressionStart => {
                    interpolated = true;
                    let open = self.advance();
                    let expr = self.parse_expression();
                    let close = self.eat(TokenKind::InterpolatedExpressionEnd);
                    parts.push(StringPart::Interpolation { open, expr, close });
                }
                kind if kind == end_kind => break Some(self.advance()),
                // unterminated: the tokenizer already reported it
                _ => break None,
            }
        };
        let kind = if raw {
            SyntaxKind::RawStringLiteralExpression
        } else if interpolated {
            SyntaxKind::InterpolatedStringExpression
        } else {
            SyntaxKind::StringLiteralExpression
        };
        arena.alloc(Expr {
            kind: ExprKind::StringLiteral { kind, start: open, parts: parts.into_bump_slice(), end },
            range: self.range_from(start),
        })
    }

    fn parse_char_literal(&mut self, start: TokenId) -> &'a Expr<'a> {
        let open = self.advance();
        let content = self.try_eat(TokenKind::CharLiteralContent);
        let end = self.try_eat(TokenKind::CharLiteralEnd);
        self.arena.alloc(Expr {
            kind: ExprKind::CharLiteral { start: open, content, end },
            range: self.range_from(start),
        })
    }

    fn parse_simple_lambda(&mut self, start: TokenId) -> &'a Expr<'a> {
        let param = self.advance();
        let arrow = self.eat(TokenKind::FatArrow);
        let body = self.parse_lambda_body();
        self.arena.alloc(Expr {
            kind: ExprKind::Lambda { params: LambdaParams::Single(param), arrow, body },
            range: self.range_from(start),
        })
    }

    fn parse_lambda_body(&mut self) -> LambdaBody<'a> {
        if self.at(TokenKind::OpenBrace) {
            LambdaBody::Block(self.parse_block())
        } else {
            LambdaBody::Expr(self.parse_expression())
        }
    }

    // ========================================================================
    // Parenthesized forms
    // ========================================================================

    fn parse_paren_tuple_cast_or_lambda(&mut self, start: TokenId) -> &'a Expr<'a> {
        let point = self.reset_point();
        if self.scan_parenthesized_lambda() {
            self.rewind(point);
            return self.parse_parenthesized_lambda(start);
        }
        self.rewind(point);

        if self.scan_cast() {
            self.rewind(point);
            let open = self.advance();
            let ty = self.parse_type(ParseTypeMode::Normal);
            let close = self.eat(TokenKind::CloseParen);
            let expr = self.parse_sub_expression(Precedence::Cast);
            return self.arena.alloc(Expr {
                kind: ExprKind::Cast { open, ty, close, expr },
                range: self.range_from(start),
            });
        }
        self.rewind(point);

        self.parse_paren_or_tuple(start)
    }

    /// Walks to the matching `)` and peeks for `=>`. Gives up at tokens
    /// that cannot sit inside a parameter list boundary.
    fn scan_parenthesized_lambda(&mut self) -> bool {
        debug_assert!(self.at(TokenKind::OpenParen));
        let mut depth = 0usize;
        loop {
            match self.current_kind() {
                TokenKind::OpenParen => depth += 1,
                TokenKind::CloseParen => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return self.at(TokenKind::FatArrow);
                    }
                }
                TokenKind::EndOfFile
                | TokenKind::Semicolon
                | TokenKind::OpenBrace
                | TokenKind::CloseBrace => return false,
                _ => {}
            }
            self.advance();
        }
    }

    /// `(T)x` only when what is inside the parens scans as a type and the
    /// token after `)` keeps the cast reading. Ambiguous names get the
    /// stricter test so `(a) + b` stays an addition.
    fn scan_cast(&mut self) -> bool {
        debug_assert!(self.at(TokenKind::OpenParen));
        self.advance();
        let flags = self.scan_type(ParseTypeMode::Normal);
        if flags == ScanTypeFlags::NotType || !self.at(TokenKind::CloseParen) {
            return false;
        }
        self.advance();
        let next = self.current_kind();
        match flags {
            ScanTypeFlags::MustBeType | ScanTypeFlags::TupleType => facts::can_follow_cast(next),
            _ => {
                facts::is_predefined_type(next)
                    || matches!(
                        next,
                        TokenKind::Identifier
                            | TokenKind::NumericLiteral
                            | TokenKind::StringLiteralStart
                            | TokenKind::StringLiteralEmpty
                            | TokenKind::RawStringLiteralStart
                            | TokenKind::CharLiteralStart
                            | TokenKind::TrueKeyword
                            | TokenKind::FalseKeyword
                            | TokenKind::NullKeyword
                            | TokenKind::NewKeyword
                            | TokenKind::ThisKeyword
                            | TokenKind::BaseKeyword
                            | TokenKind::DefaultKeyword
                            | TokenKind::TypeofKeyword
                    )
            }
        }
    }

    fn parse_parenthesized_lambda(&mut self, start: TokenId) -> &'a Expr<'a> {
        let params = self.parse_lambda_parameter_list();
        let arrow = self.eat(TokenKind::FatArrow);
        let body = self.parse_lambda_body();
        self.arena.alloc(Expr {
            kind: ExprKind::Lambda { params: LambdaParams::List(params), arrow, body },
            range: self.range_from(start),
        })
    }

    /// Lambda parameters may be typed or bare identifiers; a rewindable
    /// type scan decides per parameter.
    fn parse_lambda_parameter_list(&mut self) -> &'a ParameterList<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let open = self.eat(TokenKind::OpenParen);
        let params = self.parse_separated_list(
            |p| p.parse_lambda_parameter(),
            |p| {
                facts::can_start_type(p.current_kind())
                    || matches!(p.current_kind(), TokenKind::OutKeyword | TokenKind::Underscore)
            },
            |p| p.at(TokenKind::CloseParen),
            ErrorCode::IdentifierExpected,
            false,
        );
        let close = self.eat(TokenKind::CloseParen);
        arena.alloc(ParameterList { open, params, close, range: self.range_from(start) })
    }

    fn parse_lambda_parameter(&mut self) -> &'a Parameter<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let mut modifiers = arena.vec();
        while matches!(self.current_kind(), TokenKind::RefKeyword | TokenKind::OutKeyword) {
            modifiers.push(self.advance());
        }
        let point = self.reset_point();
        let ty = if facts::can_start_type(self.current_kind()) {
            let flags = self.scan_type(ParseTypeMode::Normal);
            let typed = flags != ScanTypeFlags::NotType && self.at(TokenKind::Identifier);
            self.rewind(point);
            if typed {
                Some(self.parse_type(ParseTypeMode::Normal))
            } else {
                None
            }
        } else {
            None
        };
        let identifier = self.eat(TokenKind::Identifier);
        arena.alloc(Parameter {
            modifiers: modifiers.into_bump_slice(),
            ty,
            identifier,
            default: None,
            range: self.range_from(start),
        })
    }

    fn parse_paren_or_tuple(&mut self, start: TokenId) -> &'a Expr<'a> {
        let arena = self.arena;
        let open = self.eat(TokenKind::OpenParen);
        let first = self.parse_argument();
        if !self.at(TokenKind::Comma) {
            let close = self.eat(TokenKind::CloseParen);
            // a lone unnamed plain argument is just parentheses
            if first.name_colon.is_none() && first.ref_kind.is_none() {
                return arena.alloc(Expr {
                    kind: ExprKind::Paren { open, expr: first.expr, close },
                    range: self.range_from(start),
                });
            }
            let span = self.token_span(open);
            self.diagnostics.add(ErrorCode::TupleTooFewElements, span);
            let args = SeparatedList { items: arena.alloc_slice(&[first]), separators: &[] };
            return arena.alloc(Expr {
                kind: ExprKind::Tuple { open, args, close },
                range: self.range_from(start),
            });
        }

        let mut items = arena.vec();
        let mut separators = arena.vec();
        items.push(first);
        while self.at(TokenKind::Comma) {
            separators.push(self.advance());
            items.push(self.parse_argument());
        }
        let close = self.eat(TokenKind::CloseParen);
        let args = SeparatedList {
            items: items.into_bump_slice(),
            separators: separators.into_bump_slice(),
        };
        arena.alloc(Expr {
            kind: ExprKind::Tuple { open, args, close },
            range: self.range_from(start),
        })
    }

    // ========================================================================
    // Creation expressions
    // ========================================================================

    fn parse_new_expression(&mut self, start: TokenId) -> &'a Expr<'a> {
        let arena = self.arena;
        let new_token = self.advance();

        // `new(…)`: target-typed creation
        if self.at(TokenKind::OpenParen) {
            let args = Some(self.parse_argument_list());
            let initializer = if self.at(TokenKind::OpenBrace) {
                Some(self.parse_initializer(None))
            } else {
                None
            };
            return arena.alloc(Expr {
                kind: ExprKind::New { new_token, ty: None, args, initializer },
                range: self.range_from(start),
            });
        }

        if !facts::can_start_type(self.current_kind()) {
            self.diagnostics.add(ErrorCode::BadNewExpression, self.token_span(new_token));
            let ty = self.create_missing_identifier_name(ErrorCode::TypeExpected);
            return arena.alloc(Expr {
                kind: ExprKind::New { new_token, ty: Some(ty), args: None, initializer: None },
                range: self.range_from(start),
            });
        }

        let ty = self.parse_type(ParseTypeMode::NewExpression);
        let is_array = matches!(ty.kind, TypeKind::Array { .. });
        let args = if !is_array && self.at(TokenKind::OpenParen) {
            Some(self.parse_argument_list())
        } else {
            None
        };
        let initializer = if self.at(TokenKind::OpenBrace) {
            let fixed = is_array.then_some(SyntaxKind::ArrayInitializerExpression);
            Some(self.parse_initializer(fixed))
        } else {
            None
        };
        arena.alloc(Expr {
            kind: ExprKind::New { new_token, ty: Some(ty), args, initializer },
            range: self.range_from(start),
        })
    }

    /// `[a, b, ..rest]`
    fn parse_collection_expression(&mut self, start: TokenId) -> &'a Expr<'a> {
        let arena = self.arena;
        let open = self.advance();
        let mut elements = arena.vec();
        let mut last_ptr = usize::MAX;
        while !self.at(TokenKind::CloseBracket) && !self.at_eof() {
            if last_ptr != usize::MAX && !self.is_making_progress(&mut last_ptr) {
                debug_assert!(false, "collection element loop failed to make progress");
                break;
            }
            last_ptr = self.mark_start() as usize;
            if self.at(TokenKind::DotDot) {
                let dots = self.advance();
                let expr = self.parse_expression();
                elements.push(CollectionElement::Spread { dots, expr });
            } else if facts::can_start_expression(self.current_kind()) {
                elements.push(CollectionElement::Expression(self.parse_expression()));
            } else {
                let span = self.token_span(self.mark_start());
                self.diagnostics.add(ErrorCode::ValueExpected, span);
                self.skip_token();
                continue;
            }
            if self.try_eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        let close = self.eat(TokenKind::CloseBracket);
        arena.alloc(Expr {
            kind: ExprKind::Collection { open, elements: elements.into_bump_slice(), close },
            range: self.range_from(start),
        })
    }

    /// Brace initializer for creation, `with`, and array forms. When
    /// `fixed` is none the element shapes pick object vs collection.
    pub(crate) fn parse_initializer(&mut self, fixed: Option<SyntaxKind>) -> &'a Initializer<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let open = self.eat(TokenKind::OpenBrace);
        let elements = self.parse_separated_list(
            |p| p.parse_expression(),
            |p| facts::can_start_expression(p.current_kind()),
            |p| p.at(TokenKind::CloseBrace),
            ErrorCode::ValueExpected,
            true,
        );
        let close = self.eat(TokenKind::CloseBrace);
        let kind = fixed.unwrap_or_else(|| {
            let all_assignments = !elements.is_empty()
                && elements
                    .iter()
                    .all(|e| e.kind() == SyntaxKind::SimpleAssignmentExpression);
            if all_assignments {
                SyntaxKind::ObjectInitializerExpression
            } else {
                SyntaxKind::CollectionInitializerExpression
            }
        });
        arena.alloc(Initializer { kind, open, elements, close, range: self.range_from(start) })
    }

    // ========================================================================
    // Arguments
    // ========================================================================

    pub(crate) fn parse_argument_list(&mut self) -> &'a ArgumentList<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let open = self.eat(TokenKind::OpenParen);
        let args = self.parse_separated_list(
            |p| p.parse_argument(),
            Self::is_possible_argument,
            |p| p.at(TokenKind::CloseParen),
            ErrorCode::ValueExpected,
            false,
        );
        let close = self.eat(TokenKind::CloseParen);
        arena.alloc(ArgumentList { open, args, close, range: self.range_from(start) })
    }

    pub(crate) fn parse_bracketed_argument_list(&mut self) -> &'a BracketedArgumentList<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let open = self.eat(TokenKind::OpenBracket);
        let args = self.parse_separated_list(
            |p| p.parse_argument(),
            Self::is_possible_argument,
            |p| p.at(TokenKind::CloseBracket),
            ErrorCode::ValueExpected,
            false,
        );
        let close = self.eat(TokenKind::CloseBracket);
        arena.alloc(BracketedArgumentList { open, args, close, range: self.range_from(start) })
    }

    fn is_possible_argument(&mut self) -> bool {
        facts::can_start_expression(self.current_kind())
            || matches!(
                self.current_kind(),
                TokenKind::RefKeyword | TokenKind::OutKeyword | TokenKind::InKeyword
            )
    }

    fn parse_argument(&mut self) -> &'a Argument<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let name_colon = if self.at(TokenKind::Identifier)
            && self.peek(1).kind == TokenKind::Colon
            && self.peek(2).kind != TokenKind::Colon
        {
            let name = self.advance();
            let colon = self.advance();
            Some((name, colon))
        } else {
            None
        };
        let ref_kind = if matches!(
            self.current_kind(),
            TokenKind::RefKeyword | TokenKind::OutKeyword | TokenKind::InKeyword
        ) {
            Some(self.advance())
        } else {
            None
        };
        let expr = if self.at_possible_declaration_expression(ref_kind.is_some()) {
            self.parse_declaration_expression()
        } else {
            self.parse_expression()
        };
        arena.alloc(Argument { name_colon, ref_kind, expr, range: self.range_from(start) })
    }

    /// `out var x`, `out int x`, `var (a, b)`: a type scan followed by a
    /// designation shape.
    fn at_possible_declaration_expression(&mut self, after_ref_kind: bool) -> bool {
        if !after_ref_kind && !self.at(TokenKind::VarKeyword) {
            return false;
        }
        if !facts::can_start_type(self.current_kind()) && !self.at(TokenKind::VarKeyword) {
            return false;
        }
        let point = self.reset_point();
        let flags = self.scan_type(ParseTypeMode::Normal);
        let ok = flags != ScanTypeFlags::NotType
            && matches!(
                self.current_kind(),
                TokenKind::Identifier | TokenKind::Underscore | TokenKind::OpenParen
            );
        self.rewind(point);
        ok
    }

    pub(crate) fn parse_declaration_expression(&mut self) -> &'a Expr<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let ty = self.parse_type(ParseTypeMode::Normal);
        let designation = self.parse_designation();
        arena.alloc(Expr {
            kind: ExprKind::Declaration { ty, designation },
            range: self.range_from(start),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::diagnostics::Diagnostics;
    use crate::tokenizer::tokenize;

    fn parse_expr<R>(source: &str, f: impl FnOnce(&Expr<'_>, &Diagnostics) -> R) -> R {
        let arena = Arena::new();
        let mut diags = Diagnostics::new();
        let result = tokenize(source, &mut diags, &arena);
        let mut parser = Parser::new(result, &mut diags, &arena);
        let expr = parser.parse_expression();
        f(expr, parser.diagnostics)
    }

    #[test]
    fn precedence_shapes_the_tree() {
        parse_expr("1 + 2 * 3", |e, _| {
            assert_eq!(e.kind(), SyntaxKind::AddExpression);
            match e.kind {
                ExprKind::Binary { right, .. } => {
                    assert_eq!(right.kind(), SyntaxKind::MultiplyExpression);
                }
                _ => panic!("expected binary"),
            }
        });
    }

    #[test]
    fn addition_is_left_associative() {
        parse_expr("a - b - c", |e, _| {
            match e.kind {
                ExprKind::Binary { left, .. } => {
                    assert_eq!(left.kind(), SyntaxKind::SubtractExpression);
                }
                _ => panic!("expected binary"),
            }
        });
    }

    #[test]
    fn assignment_is_right_associative() {
        parse_expr("a = b = c", |e, _| {
            assert_eq!(e.kind(), SyntaxKind::SimpleAssignmentExpression);
            match e.kind {
                ExprKind::Assignment { right, .. } => {
                    assert_eq!(right.kind(), SyntaxKind::SimpleAssignmentExpression);
                }
                _ => panic!("expected assignment"),
            }
        });
    }

    #[test]
    fn adjacent_greater_thans_merge_into_shift() {
        parse_expr("a >> 2", |e, _| {
            assert_eq!(e.kind(), SyntaxKind::RightShiftExpression);
        });
        parse_expr("a >>> 2", |e, _| {
            assert_eq!(e.kind(), SyntaxKind::UnsignedRightShiftExpression);
        });
        parse_expr("a >>= 2", |e, _| {
            assert_eq!(e.kind(), SyntaxKind::RightShiftAssignmentExpression);
        });
    }

    #[test]
    fn separated_greater_thans_stay_relational() {
        // `a > > b` has trivia between the tokens, so no shift forms
        parse_expr("a > > b", |e, _| {
            assert_eq!(e.kind(), SyntaxKind::GreaterThanExpression);
        });
    }

    #[test]
    fn generic_name_vs_comparison_by_follow_token() {
        parse_expr("f(a < b, c > d)", |e, _| {
            match e.kind {
                ExprKind::Invocation { args, .. } => {
                    assert_eq!(args.args.len(), 2);
                    assert_eq!(args.args.items[0].expr.kind(), SyntaxKind::LessThanExpression);
                    assert_eq!(args.args.items[1].expr.kind(), SyntaxKind::GreaterThanExpression);
                }
                _ => panic!("expected invocation"),
            }
        });
        parse_expr("f(a<b, c>(d))", |e, _| {
            // `(` after `>` keeps the generic reading, one argument
            match e.kind {
                ExprKind::Invocation { args, .. } => assert_eq!(args.args.len(), 1),
                _ => panic!("expected invocation"),
            }
        });
    }

    #[test]
    fn conditional_expression_nests_right() {
        parse_expr("a ? b : c ? d : e", |e, _| {
            assert_eq!(e.kind(), SyntaxKind::ConditionalExpression);
            match e.kind {
                ExprKind::Conditional { when_false, .. } => {
                    assert_eq!(when_false.kind(), SyntaxKind::ConditionalExpression);
                }
                _ => panic!("expected conditional"),
            }
        });
    }

    #[test]
    fn conditional_access_chain() {
        parse_expr("a?.b.c", |e, _| {
            assert_eq!(e.kind(), SyntaxKind::ConditionalAccessExpression);
            match e.kind {
                ExprKind::ConditionalAccess { access, .. } => {
                    assert_eq!(access.kind(), SyntaxKind::SimpleMemberAccessExpression);
                }
                _ => panic!("expected conditional access"),
            }
        });
    }

    #[test]
    fn cast_vs_parenthesized() {
        parse_expr("(int)x", |e, _| {
            assert_eq!(e.kind(), SyntaxKind::CastExpression);
        });
        parse_expr("(a) + b", |e, _| {
            assert_eq!(e.kind(), SyntaxKind::AddExpression);
        });
        parse_expr("(a)b", |e, _| {
            assert_eq!(e.kind(), SyntaxKind::CastExpression);
        });
    }

    #[test]
    fn tuple_and_paren() {
        parse_expr("(a, b)", |e, _| {
            assert_eq!(e.kind(), SyntaxKind::TupleExpression);
        });
        parse_expr("(a)", |e, _| {
            assert_eq!(e.kind(), SyntaxKind::ParenthesizedExpression);
        });
    }

    #[test]
    fn lambdas() {
        parse_expr("x => x + 1", |e, _| {
            assert_eq!(e.kind(), SyntaxKind::SimpleLambdaExpression);
        });
        parse_expr("(a, b) => a", |e, _| {
            assert_eq!(e.kind(), SyntaxKind::ParenthesizedLambdaExpression);
        });
        parse_expr("(int a) => { return a; }", |e, _| {
            assert_eq!(e.kind(), SyntaxKind::ParenthesizedLambdaExpression);
            match e.kind {
                ExprKind::Lambda { params: LambdaParams::List(list), body, .. } => {
                    assert!(list.params.items[0].ty.is_some());
                    assert!(matches!(body, LambdaBody::Block(_)));
                }
                _ => panic!("expected lambda"),
            }
        });
    }

    #[test]
    fn creation_expressions() {
        parse_expr("new Foo(1, 2)", |e, _| {
            assert_eq!(e.kind(), SyntaxKind::ObjectCreationExpression);
        });
        parse_expr("new int[3]", |e, _| {
            assert_eq!(e.kind(), SyntaxKind::ArrayCreationExpression);
        });
        parse_expr("new(1)", |e, _| {
            assert_eq!(e.kind(), SyntaxKind::ImplicitObjectCreationExpression);
        });
        parse_expr("new Foo { A = 1, B = 2 }", |e, _| {
            match e.kind {
                ExprKind::New { initializer: Some(init), .. } => {
                    assert_eq!(init.kind, SyntaxKind::ObjectInitializerExpression);
                }
                _ => panic!("expected initializer"),
            }
        });
    }

    #[test]
    fn collection_expression() {
        parse_expr("[1, 2, ..rest]", |e, _| {
            assert_eq!(e.kind(), SyntaxKind::CollectionExpression);
            match e.kind {
                ExprKind::Collection { elements, .. } => {
                    assert_eq!(elements.len(), 3);
                    assert!(matches!(elements[2], CollectionElement::Spread { .. }));
                }
                _ => panic!("expected collection"),
            }
        });
    }

    #[test]
    fn interpolated_string_run() {
        parse_expr("\"a ${x + 1} b\"", |e, _| {
            assert_eq!(e.kind(), SyntaxKind::InterpolatedStringExpression);
            match e.kind {
                ExprKind::StringLiteral { parts, end, .. } => {
                    assert_eq!(parts.len(), 3);
                    assert!(matches!(parts[1], StringPart::Interpolation { .. }));
                    assert!(end.is_some());
                }
                _ => panic!("expected string literal"),
            }
        });
    }

    #[test]
    fn out_var_argument_is_declaration() {
        parse_expr("f(out var x)", |e, _| {
            match e.kind {
                ExprKind::Invocation { args, .. } => {
                    let arg = args.args.items[0];
                    assert!(arg.ref_kind.is_some());
                    assert_eq!(arg.expr.kind(), SyntaxKind::DeclarationExpression);
                }
                _ => panic!("expected invocation"),
            }
        });
    }

    #[test]
    fn range_expressions() {
        parse_expr("a..b", |e, _| {
            assert_eq!(e.kind(), SyntaxKind::RangeExpression);
        });
        parse_expr("..b", |e, _| {
            match e.kind {
                ExprKind::Range { left, right, .. } => {
                    assert!(left.is_none());
                    assert!(right.is_some());
                }
                _ => panic!("expected range"),
            }
        });
    }

    #[test]
    fn missing_operand_recovers_with_diagnostic() {
        parse_expr("a + ;", |e, diags| {
            assert_eq!(e.kind(), SyntaxKind::AddExpression);
            assert!(diags.iter().any(|d| d.code == ErrorCode::ValueExpected));
        });
    }

    #[test]
    fn expression_range_contains_children() {
        parse_expr("a + b * c", |e, _| {
            match e.kind {
                ExprKind::Binary { left, right, .. } => {
                    assert!(e.range.contains(left.range));
                    assert!(e.range.contains(right.range));
                }
                _ => panic!("expected binary"),
            }
        });
    }
}
