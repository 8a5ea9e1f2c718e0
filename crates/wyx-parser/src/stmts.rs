//! Statement parsing.
//!
//! The declaration-vs-expression fork runs a rewindable type scan: a
//! type shape followed by an identifier commits to a local declaration
//! (so `List<int> x;` declares), anything else falls back to an
//! expression statement (so `a < b` compares).

use crate::ast::*;
use crate::diagnostics::ErrorCode;
use crate::facts;
use crate::parser::Parser;
use crate::token::TokenKind;
use crate::types::{ParseTypeMode, ScanTypeFlags};

impl<'a, 'd> Parser<'a, 'd> {
    pub(crate) fn parse_block(&mut self) -> &'a Stmt<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let open = self.eat(TokenKind::OpenBrace);
        let statements = self.parse_statements_until(|p| p.at(TokenKind::CloseBrace));
        let close = self.eat(TokenKind::CloseBrace);
        arena.alloc(Stmt {
            kind: StmtKind::Block { open, statements, close },
            range: self.range_from(start),
        })
    }

    /// Statement list with skip recovery; the first token of each skipped
    /// run gets one diagnostic.
    fn parse_statements_until(&mut self, stop: fn(&mut Self) -> bool) -> List<'a, Stmt<'a>> {
        let arena = self.arena;
        let mut statements = arena.vec();
        let mut last_ptr = usize::MAX;
        let mut reported = false;
        loop {
            if stop(self) || self.at_eof() {
                break;
            }
            if last_ptr != usize::MAX && !self.is_making_progress(&mut last_ptr) {
                debug_assert!(false, "statement list failed to make progress");
                break;
            }
            last_ptr = self.mark_start() as usize;
            if facts::can_start_statement(self.current_kind()) {
                reported = false;
                statements.push(&*self.parse_statement());
            } else {
                if !reported {
                    reported = true;
                    let span = self.token_span(self.mark_start());
                    self.diagnostics.add(ErrorCode::SyntaxError, span);
                }
                self.skip_token();
            }
        }
        statements.into_bump_slice()
    }

    pub(crate) fn parse_statement(&mut self) -> &'a Stmt<'a> {
        match self.current_kind() {
            TokenKind::OpenBrace => self.parse_block(),
            TokenKind::Semicolon => {
                let start = self.mark_start();
                let semicolon = self.advance();
                self.arena.alloc(Stmt {
                    kind: StmtKind::Empty { semicolon },
                    range: self.range_from(start),
                })
            }
            TokenKind::IfKeyword => self.parse_if_statement(),
            TokenKind::SwitchKeyword => self.parse_switch_statement(),
            TokenKind::WhileKeyword => self.parse_while_statement(),
            TokenKind::DoKeyword => self.parse_do_statement(),
            TokenKind::ForKeyword => self.parse_for_statement(),
            TokenKind::ForEachKeyword => self.parse_foreach_statement(),
            TokenKind::TryKeyword => self.parse_try_statement(),
            TokenKind::BreakKeyword => self.parse_jump(StmtJump::Break),
            TokenKind::ContinueKeyword => self.parse_jump(StmtJump::Continue),
            TokenKind::ReturnKeyword => self.parse_jump(StmtJump::Return),
            TokenKind::ThrowKeyword => self.parse_jump(StmtJump::Throw),
            TokenKind::GotoKeyword => self.parse_goto_statement(),
            TokenKind::UsingKeyword if self.peek(1).kind == TokenKind::OpenParen => {
                self.parse_using_statement()
            }
            TokenKind::UsingKeyword | TokenKind::ConstKeyword => {
                self.parse_local_declaration_with_modifiers()
            }
            TokenKind::Identifier
                if self.peek(1).kind == TokenKind::Colon
                    && self.peek(2).kind != TokenKind::Colon =>
            {
                self.parse_labeled_statement()
            }
            _ => self.parse_declaration_or_expression_statement(),
        }
    }

    // ========================================================================
    // Declaration vs expression
    // ========================================================================

    fn parse_declaration_or_expression_statement(&mut self) -> &'a Stmt<'a> {
        if facts::can_start_type(self.current_kind()) || self.at(TokenKind::VarKeyword) {
            let point = self.reset_point();
            let flags = self.scan_type(ParseTypeMode::Normal);
            let next = self.current_kind();
            let after = self.peek(1).kind;
            self.rewind(point);
            if flags != ScanTypeFlags::NotType && next == TokenKind::Identifier {
                // `T f(` / `T f<` opens a local function, `T x` a local
                if matches!(after, TokenKind::OpenParen | TokenKind::LessThan) {
                    return self.parse_local_function(&[]);
                }
                return self.parse_local_declaration(&[]);
            }
        }
        self.parse_expression_statement()
    }

    fn parse_expression_statement(&mut self) -> &'a Stmt<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let expr = self.parse_expression();
        let semicolon = self.eat(TokenKind::Semicolon);
        arena.alloc(Stmt {
            kind: StmtKind::Expression { expr, semicolon },
            range: self.range_from(start),
        })
    }

    fn parse_local_declaration_with_modifiers(&mut self) -> &'a Stmt<'a> {
        let arena = self.arena;
        let mut modifiers = arena.vec();
        while matches!(
            self.current_kind(),
            TokenKind::ConstKeyword | TokenKind::UsingKeyword | TokenKind::RefKeyword
        ) {
            modifiers.push(self.advance());
        }
        let modifiers = modifiers.into_bump_slice();
        self.parse_local_declaration(modifiers)
    }

    fn parse_local_declaration(&mut self, modifiers: &'a [TokenId]) -> &'a Stmt<'a> {
        let arena = self.arena;
        let start = modifiers.first().copied().unwrap_or_else(|| self.mark_start());
        let declaration = self.parse_variable_declaration();
        let semicolon = self.eat(TokenKind::Semicolon);
        arena.alloc(Stmt {
            kind: StmtKind::LocalDeclaration { modifiers, declaration, semicolon },
            range: self.range_from(start),
        })
    }

    /// `T x = e, y;`
    pub(crate) fn parse_variable_declaration(&mut self) -> &'a VariableDeclaration<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let ty = self.parse_type(ParseTypeMode::Normal);
        let variables = self.parse_separated_list(
            |p| p.parse_variable_declarator(),
            |p| p.at(TokenKind::Identifier),
            |p| !p.at(TokenKind::Identifier) && !p.at(TokenKind::Comma),
            ErrorCode::IdentifierExpected,
            false,
        );
        arena.alloc(VariableDeclaration { ty, variables, range: self.range_from(start) })
    }

    fn parse_variable_declarator(&mut self) -> &'a VariableDeclarator<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let identifier = self.eat(TokenKind::Identifier);
        let initializer = self.parse_equals_value_clause();
        arena.alloc(VariableDeclarator { identifier, initializer, range: self.range_from(start) })
    }

    pub(crate) fn parse_equals_value_clause(&mut self) -> Option<&'a EqualsValueClause<'a>> {
        if !self.at(TokenKind::Equals) {
            return None;
        }
        let arena = self.arena;
        let start = self.mark_start();
        let equals = self.advance();
        let value = self.parse_expression();
        Some(arena.alloc(EqualsValueClause { equals, value, range: self.range_from(start) }))
    }

    fn parse_local_function(&mut self, modifiers: &'a [TokenId]) -> &'a Stmt<'a> {
        let arena = self.arena;
        let start = modifiers.first().copied().unwrap_or_else(|| self.mark_start());
        let return_type = self.parse_type(ParseTypeMode::Normal);
        let identifier = self.eat(TokenKind::Identifier);
        let type_params = self.parse_optional_type_parameter_list();
        let params = self.parse_parameter_list();
        let constraints = self.parse_constraint_clauses();
        let body = self.parse_function_body();
        arena.alloc(Stmt {
            kind: StmtKind::LocalFunction {
                modifiers,
                return_type,
                identifier,
                type_params,
                params,
                constraints,
                body,
            },
            range: self.range_from(start),
        })
    }

    // ========================================================================
    // Control flow
    // ========================================================================

    fn parse_if_statement(&mut self) -> &'a Stmt<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let if_token = self.advance();
        let open = self.eat(TokenKind::OpenParen);
        let condition = if self.at(TokenKind::CloseParen) {
            self.create_missing_identifier_expr(ErrorCode::ValueExpected)
        } else {
            self.parse_expression()
        };
        let close = self.eat(TokenKind::CloseParen);
        let statement = self.parse_embedded_statement();
        let else_clause = self.parse_else_clause();
        arena.alloc(Stmt {
            kind: StmtKind::If { if_token, open, condition, close, statement, else_clause },
            range: self.range_from(start),
        })
    }

    fn parse_else_clause(&mut self) -> Option<&'a ElseClause<'a>> {
        if !self.at(TokenKind::ElseKeyword) {
            return None;
        }
        let arena = self.arena;
        let start = self.mark_start();
        let else_token = self.advance();
        let statement = self.parse_embedded_statement();
        Some(arena.alloc(ElseClause { else_token, statement, range: self.range_from(start) }))
    }

    /// Statement position inside control flow; a missing body becomes an
    /// empty statement over a synthesized semicolon.
    fn parse_embedded_statement(&mut self) -> &'a Stmt<'a> {
        if self.at_eof() || self.at(TokenKind::CloseBrace) {
            let start = self.mark_start();
            let semicolon = self.eat(TokenKind::Semicolon);
            return self.arena.alloc(Stmt {
                kind: StmtKind::Empty { semicolon },
                range: self.range_from(start),
            });
        }
        self.parse_statement()
    }

    fn parse_while_statement(&mut self) -> &'a Stmt<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let while_token = self.advance();
        let open = self.eat(TokenKind::OpenParen);
        let condition = self.parse_expression();
        let close = self.eat(TokenKind::CloseParen);
        let body = self.parse_embedded_statement();
        arena.alloc(Stmt {
            kind: StmtKind::While { while_token, open, condition, close, body },
            range: self.range_from(start),
        })
    }

    fn parse_do_statement(&mut self) -> &'a Stmt<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let do_token = self.advance();
        let body = self.parse_embedded_statement();
        let while_token = self.eat(TokenKind::WhileKeyword);
        let open = self.eat(TokenKind::OpenParen);
        let condition = self.parse_expression();
        let close = self.eat(TokenKind::CloseParen);
        let semicolon = self.eat(TokenKind::Semicolon);
        arena.alloc(Stmt {
            kind: StmtKind::Do { do_token, body, while_token, open, condition, close, semicolon },
            range: self.range_from(start),
        })
    }

    fn parse_for_statement(&mut self) -> &'a Stmt<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let for_token = self.advance();
        let open = self.eat(TokenKind::OpenParen);

        let initializer = if self.at(TokenKind::Semicolon) {
            None
        } else if self.at_local_declaration() {
            Some(ForInitializer::Declaration(self.parse_variable_declaration()))
        } else {
            Some(ForInitializer::Expressions(self.parse_expression_list()))
        };
        let first_semicolon = self.eat(TokenKind::Semicolon);

        let condition = if self.at(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression())
        };
        let second_semicolon = self.eat(TokenKind::Semicolon);

        let incrementors = if self.at(TokenKind::CloseParen) {
            SeparatedList::empty()
        } else {
            self.parse_expression_list()
        };
        let close = self.eat(TokenKind::CloseParen);
        let body = self.parse_embedded_statement();
        arena.alloc(Stmt {
            kind: StmtKind::For {
                for_token,
                open,
                initializer,
                first_semicolon,
                condition,
                second_semicolon,
                incrementors,
                close,
                body,
            },
            range: self.range_from(start),
        })
    }

    fn at_local_declaration(&mut self) -> bool {
        if !facts::can_start_type(self.current_kind()) && !self.at(TokenKind::VarKeyword) {
            return false;
        }
        let point = self.reset_point();
        let flags = self.scan_type(ParseTypeMode::Normal);
        let ok = flags != ScanTypeFlags::NotType && self.at(TokenKind::Identifier);
        self.rewind(point);
        ok
    }

    fn parse_expression_list(&mut self) -> SeparatedList<'a, Expr<'a>> {
        self.parse_separated_list(
            |p| p.parse_expression(),
            |p| facts::can_start_expression(p.current_kind()),
            |p| matches!(p.current_kind(), TokenKind::Semicolon | TokenKind::CloseParen),
            ErrorCode::ValueExpected,
            false,
        )
    }

    fn parse_foreach_statement(&mut self) -> &'a Stmt<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let foreach_token = self.advance();
        let open = self.eat(TokenKind::OpenParen);
        let ty = self.parse_type(ParseTypeMode::Normal);
        let variable = if self.at(TokenKind::OpenParen) || self.at(TokenKind::Underscore) {
            ForEachVariable::Designation(self.parse_designation())
        } else {
            ForEachVariable::Identifier(self.eat(TokenKind::Identifier))
        };
        let in_token = self.eat(TokenKind::InKeyword);
        let expr = self.parse_expression();
        let close = self.eat(TokenKind::CloseParen);
        let body = self.parse_embedded_statement();
        arena.alloc(Stmt {
            kind: StmtKind::ForEach { foreach_token, open, ty, variable, in_token, expr, close, body },
            range: self.range_from(start),
        })
    }

    fn parse_switch_statement(&mut self) -> &'a Stmt<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let switch_token = self.advance();
        let open_paren = self.eat(TokenKind::OpenParen);
        let governing = self.parse_expression();
        let close_paren = self.eat(TokenKind::CloseParen);
        let open_brace = self.eat(TokenKind::OpenBrace);

        let mut sections = arena.vec();
        let mut last_ptr = usize::MAX;
        while !self.at(TokenKind::CloseBrace) && !self.at_eof() {
            if last_ptr != usize::MAX && !self.is_making_progress(&mut last_ptr) {
                debug_assert!(false, "switch section loop failed to make progress");
                break;
            }
            last_ptr = self.mark_start() as usize;
            if matches!(self.current_kind(), TokenKind::CaseKeyword | TokenKind::DefaultKeyword) {
                sections.push(&*self.parse_switch_section());
            } else {
                let span = self.token_span(self.mark_start());
                self.diagnostics.add(ErrorCode::SyntaxError, span);
                self.skip_token();
            }
        }

        let close_brace = self.eat(TokenKind::CloseBrace);
        arena.alloc(Stmt {
            kind: StmtKind::Switch {
                switch_token,
                open_paren,
                governing,
                close_paren,
                open_brace,
                sections: sections.into_bump_slice(),
                close_brace,
            },
            range: self.range_from(start),
        })
    }

    fn parse_switch_section(&mut self) -> &'a SwitchSection<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let mut labels = arena.vec();
        while matches!(self.current_kind(), TokenKind::CaseKeyword | TokenKind::DefaultKeyword) {
            labels.push(&*self.parse_switch_label());
        }
        let statements = self.parse_statements_until(|p| {
            matches!(
                p.current_kind(),
                TokenKind::CaseKeyword | TokenKind::DefaultKeyword | TokenKind::CloseBrace
            )
        });
        arena.alloc(SwitchSection {
            labels: labels.into_bump_slice(),
            statements,
            range: self.range_from(start),
        })
    }

    fn parse_switch_label(&mut self) -> &'a SwitchLabel<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let (keyword, kind) = if self.at(TokenKind::DefaultKeyword) {
            (self.advance(), SwitchLabelKind::Default)
        } else {
            let keyword = self.advance();
            let pattern = self.parse_pattern();
            let when = self.parse_when_clause();
            (keyword, SwitchLabelKind::Case { pattern, when })
        };
        let colon = self.eat(TokenKind::Colon);
        arena.alloc(SwitchLabel { kind, keyword, colon, range: self.range_from(start) })
    }

    fn parse_try_statement(&mut self) -> &'a Stmt<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let try_token = self.advance();
        let block = self.parse_block();
        let mut catches = arena.vec();
        while self.at(TokenKind::CatchKeyword) {
            catches.push(&*self.parse_catch_clause());
        }
        let finally = if self.at(TokenKind::FinallyKeyword) {
            let f_start = self.mark_start();
            let finally_token = self.advance();
            let block = self.parse_block();
            Some(&*arena.alloc(FinallyClause {
                finally_token,
                block,
                range: self.range_from(f_start),
            }))
        } else {
            None
        };
        if catches.is_empty() && finally.is_none() {
            self.diagnostics.add(ErrorCode::SyntaxError, self.token_span(try_token));
        }
        arena.alloc(Stmt {
            kind: StmtKind::Try { try_token, block, catches: catches.into_bump_slice(), finally },
            range: self.range_from(start),
        })
    }

    fn parse_catch_clause(&mut self) -> &'a CatchClause<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let catch_token = self.advance();
        let declaration = if self.at(TokenKind::OpenParen) {
            let d_start = self.mark_start();
            let open = self.advance();
            let ty = self.parse_type(ParseTypeMode::Normal);
            let identifier = self.try_eat(TokenKind::Identifier);
            let close = self.eat(TokenKind::CloseParen);
            Some(&*arena.alloc(CatchDeclaration {
                open,
                ty,
                identifier,
                close,
                range: self.range_from(d_start),
            }))
        } else {
            None
        };
        let filter = if self.at_contextual(TokenKind::WhenKeyword) {
            let f_start = self.mark_start();
            let when_token = self.advance();
            let open = self.eat(TokenKind::OpenParen);
            let condition = self.parse_expression();
            let close = self.eat(TokenKind::CloseParen);
            Some(&*arena.alloc(CatchFilterClause {
                when_token,
                open,
                condition,
                close,
                range: self.range_from(f_start),
            }))
        } else {
            None
        };
        let block = self.parse_block();
        arena.alloc(CatchClause {
            catch_token,
            declaration,
            filter,
            block,
            range: self.range_from(start),
        })
    }

    fn parse_using_statement(&mut self) -> &'a Stmt<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let using_token = self.advance();
        let open = self.eat(TokenKind::OpenParen);
        let resource = if self.at_local_declaration() {
            UsingResource::Declaration(self.parse_variable_declaration())
        } else {
            UsingResource::Expression(self.parse_expression())
        };
        let close = self.eat(TokenKind::CloseParen);
        let body = self.parse_embedded_statement();
        arena.alloc(Stmt {
            kind: StmtKind::Using { using_token, open, resource, close, body },
            range: self.range_from(start),
        })
    }

    fn parse_goto_statement(&mut self) -> &'a Stmt<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let goto_token = self.advance();
        let target = match self.current_kind() {
            TokenKind::CaseKeyword => {
                let case_token = self.advance();
                let expr = self.parse_expression();
                GotoTarget::Case { case_token, expr }
            }
            TokenKind::DefaultKeyword => GotoTarget::Default { default_token: self.advance() },
            _ => GotoTarget::Label(self.eat(TokenKind::Identifier)),
        };
        let semicolon = self.eat(TokenKind::Semicolon);
        arena.alloc(Stmt {
            kind: StmtKind::Goto { goto_token, target, semicolon },
            range: self.range_from(start),
        })
    }

    fn parse_labeled_statement(&mut self) -> &'a Stmt<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let label = self.advance();
        let colon = self.advance();
        let statement = self.parse_embedded_statement();
        arena.alloc(Stmt {
            kind: StmtKind::Labeled { label, colon, statement },
            range: self.range_from(start),
        })
    }

    fn parse_jump(&mut self, which: StmtJump) -> &'a Stmt<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let keyword = self.advance();
        let expr = match which {
            StmtJump::Return | StmtJump::Throw
                if !self.at(TokenKind::Semicolon)
                    && facts::can_start_expression(self.current_kind()) =>
            {
                Some(self.parse_expression())
            }
            _ => None,
        };
        let semicolon = self.eat(TokenKind::Semicolon);
        let kind = match which {
            StmtJump::Break => StmtKind::Break { keyword, semicolon },
            StmtJump::Continue => StmtKind::Continue { keyword, semicolon },
            StmtJump::Return => StmtKind::Return { keyword, expr, semicolon },
            StmtJump::Throw => StmtKind::Throw { keyword, expr, semicolon },
        };
        arena.alloc(Stmt { kind, range: self.range_from(start) })
    }
}

#[derive(Clone, Copy)]
enum StmtJump {
    Break,
    Continue,
    Return,
    Throw,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::diagnostics::Diagnostics;
    use crate::kind::SyntaxKind;
    use crate::span::Span;
    use crate::tokenizer::tokenize;

    fn parse_stmt<R>(source: &str, f: impl FnOnce(&Stmt<'_>, &Diagnostics) -> R) -> R {
        let arena = Arena::new();
        let mut diags = Diagnostics::new();
        let result = tokenize(source, &mut diags, &arena);
        let mut parser = Parser::new(result, &mut diags, &arena);
        let stmt = parser.parse_statement();
        f(stmt, parser.diagnostics)
    }

    #[test]
    fn statement_kinds() {
        parse_stmt("{ }", |s, _| assert_eq!(s.kind(), SyntaxKind::Block));
        parse_stmt(";", |s, _| assert_eq!(s.kind(), SyntaxKind::EmptyStatement));
        parse_stmt("f(1);", |s, _| assert_eq!(s.kind(), SyntaxKind::ExpressionStatement));
        parse_stmt("break;", |s, _| assert_eq!(s.kind(), SyntaxKind::BreakStatement));
        parse_stmt("continue;", |s, _| assert_eq!(s.kind(), SyntaxKind::ContinueStatement));
        parse_stmt("return a + b;", |s, _| assert_eq!(s.kind(), SyntaxKind::ReturnStatement));
        parse_stmt("throw e;", |s, _| assert_eq!(s.kind(), SyntaxKind::ThrowStatement));
        parse_stmt("goto done;", |s, _| assert_eq!(s.kind(), SyntaxKind::GotoStatement));
        parse_stmt("goto case 1;", |s, _| assert_eq!(s.kind(), SyntaxKind::GotoCaseStatement));
        parse_stmt("done: return;", |s, _| assert_eq!(s.kind(), SyntaxKind::LabeledStatement));
    }

    #[test]
    fn generic_declaration_vs_comparison() {
        parse_stmt("List<int> x;", |s, _| {
            assert_eq!(s.kind(), SyntaxKind::LocalDeclarationStatement);
            match s.kind {
                StmtKind::LocalDeclaration { declaration, .. } => {
                    assert_eq!(declaration.ty.kind(), SyntaxKind::GenericName);
                    assert_eq!(declaration.variables.len(), 1);
                }
                _ => panic!("expected declaration"),
            }
        });
        parse_stmt("a < b;", |s, _| {
            assert_eq!(s.kind(), SyntaxKind::ExpressionStatement);
            match s.kind {
                StmtKind::Expression { expr, .. } => {
                    assert_eq!(expr.kind(), SyntaxKind::LessThanExpression);
                }
                _ => panic!("expected expression statement"),
            }
        });
    }

    #[test]
    fn declaration_with_initializers() {
        parse_stmt("var x = 1, y = 2;", |s, diags| {
            assert_eq!(diags.len(), 0);
            match s.kind {
                StmtKind::LocalDeclaration { declaration, .. } => {
                    assert_eq!(declaration.variables.len(), 2);
                    assert!(declaration.variables.items[0].initializer.is_some());
                }
                _ => panic!("expected declaration"),
            }
        });
    }

    #[test]
    fn bare_if_open_paren_synthesizes_condition_and_close() {
        parse_stmt("if (", |s, diags| {
            assert_eq!(s.kind(), SyntaxKind::IfStatement);
            match s.kind {
                StmtKind::If { condition, .. } => {
                    // the condition exists as a zero-width missing name
                    assert!(condition.range.is_empty() || condition.range.len() == 1);
                }
                _ => panic!("expected if"),
            }
            assert!(diags.iter().any(|d| d.code == ErrorCode::ValueExpected));
            assert!(diags.iter().any(|d| d.code == ErrorCode::CloseParenExpected));
        });
    }

    #[test]
    fn if_else_chain() {
        parse_stmt("if (a) x(); else if (b) y(); else z();", |s, _| {
            match s.kind {
                StmtKind::If { else_clause, .. } => {
                    let inner = else_clause.unwrap().statement;
                    assert_eq!(inner.kind(), SyntaxKind::IfStatement);
                }
                _ => panic!("expected if"),
            }
        });
    }

    #[test]
    fn for_statement_pieces() {
        parse_stmt("for (int i = 0; i < n; i++) { }", |s, _| {
            match s.kind {
                StmtKind::For { initializer, condition, incrementors, .. } => {
                    assert!(matches!(initializer, Some(ForInitializer::Declaration(_))));
                    assert!(condition.is_some());
                    assert_eq!(incrementors.len(), 1);
                }
                _ => panic!("expected for"),
            }
        });
        parse_stmt("for (;;) { }", |s, diags| {
            assert_eq!(diags.len(), 0);
            match s.kind {
                StmtKind::For { initializer, condition, incrementors, .. } => {
                    assert!(initializer.is_none());
                    assert!(condition.is_none());
                    assert!(incrementors.is_empty());
                }
                _ => panic!("expected for"),
            }
        });
    }

    #[test]
    fn foreach_forms() {
        parse_stmt("foreach (int x in xs) { }", |s, _| {
            assert_eq!(s.kind(), SyntaxKind::ForEachStatement);
        });
        parse_stmt("foreach (var (a, b) in pairs) { }", |s, _| {
            assert_eq!(s.kind(), SyntaxKind::ForEachVariableStatement);
        });
    }

    #[test]
    fn switch_sections_and_labels() {
        parse_stmt(
            "switch (x) { case 1: case 2: f(); break; case int n when n > 0: g(); break; default: break; }",
            |s, _| {
                match s.kind {
                    StmtKind::Switch { sections, .. } => {
                        assert_eq!(sections.len(), 3);
                        assert_eq!(sections[0].labels.len(), 2);
                        assert_eq!(sections[0].labels[0].kind(), SyntaxKind::CaseSwitchLabel);
                        assert_eq!(
                            sections[1].labels[0].kind(),
                            SyntaxKind::CasePatternSwitchLabel
                        );
                        assert_eq!(sections[2].labels[0].kind(), SyntaxKind::DefaultSwitchLabel);
                    }
                    _ => panic!("expected switch"),
                }
            },
        );
    }

    #[test]
    fn try_catch_finally() {
        parse_stmt("try { f(); } catch (Error e) when (e.Fatal) { } finally { }", |s, _| {
            match s.kind {
                StmtKind::Try { catches, finally, .. } => {
                    assert_eq!(catches.len(), 1);
                    assert!(catches[0].declaration.is_some());
                    assert!(catches[0].filter.is_some());
                    assert!(finally.is_some());
                }
                _ => panic!("expected try"),
            }
        });
    }

    #[test]
    fn using_statement_and_declaration() {
        parse_stmt("using (var f = Open()) { }", |s, _| {
            assert_eq!(s.kind(), SyntaxKind::UsingStatement);
        });
        parse_stmt("using var f = Open();", |s, _| {
            assert_eq!(s.kind(), SyntaxKind::LocalDeclarationStatement);
        });
    }

    #[test]
    fn local_function() {
        parse_stmt("int add(int a, int b) => a + b;", |s, _| {
            assert_eq!(s.kind(), SyntaxKind::LocalFunctionStatement);
            match s.kind {
                StmtKind::LocalFunction { params, body, .. } => {
                    assert_eq!(params.params.len(), 2);
                    assert!(matches!(body, FunctionBody::Arrow { .. }));
                }
                _ => panic!("expected local function"),
            }
        });
    }

    #[test]
    fn missing_semicolon_anchors_after_expression() {
        parse_stmt("f()", |s, diags| {
            assert_eq!(s.kind(), SyntaxKind::ExpressionStatement);
            let diag = diags.iter().find(|d| d.code == ErrorCode::SemicolonExpected).unwrap();
            assert_eq!(diag.span, Span::empty(3));
        });
    }

    #[test]
    fn statement_range_contains_children() {
        parse_stmt("while (a) { b(); }", |s, _| {
            match s.kind {
                StmtKind::While { condition, body, .. } => {
                    assert!(s.range.contains(condition.range));
                    assert!(s.range.contains(body.range));
                }
                _ => panic!("expected while"),
            }
        });
    }
}
