//! Declarations: compilation unit, namespaces, types and their members.

use crate::ast::*;
use crate::diagnostics::ErrorCode;
use crate::facts;
use crate::kind::SyntaxKind;
use crate::parser::Parser;
use crate::token::TokenKind;
use crate::types::ParseTypeMode;

impl<'a, 'd> Parser<'a, 'd> {
    pub(crate) fn parse_compilation_unit_root(&mut self) -> &'a CompilationUnit<'a> {
        let arena = self.arena;
        let members = self.parse_member_list(|p| p.at_eof(), true);
        let eof = self.advance();
        arena.alloc(CompilationUnit {
            members,
            eof,
            range: TokenRange::new(0, eof + 1),
        })
    }

    /// Member loop shared by the file level, namespaces and type bodies.
    /// At the file level loose statements become global statements.
    fn parse_member_list(
        &mut self,
        stop: fn(&mut Self) -> bool,
        allow_globals: bool,
    ) -> List<'a, Member<'a>> {
        let arena = self.arena;
        let mut members = arena.vec();
        let mut last_ptr = usize::MAX;
        loop {
            if stop(self) || self.at_eof() {
                break;
            }
            if last_ptr != usize::MAX && !self.is_making_progress(&mut last_ptr) {
                debug_assert!(false, "member list failed to make progress");
                break;
            }
            last_ptr = self.mark_start() as usize;

            // At the file level a typed line like `int x = 1;` is a global
            // statement; only declaration keywords and modifiers open members.
            let member_here = if allow_globals {
                self.at_file_level_member_start()
            } else {
                self.at_member_start()
            };
            if member_here {
                members.push(&*self.parse_member());
            } else if allow_globals && facts::can_start_statement(self.current_kind()) {
                let start = self.mark_start();
                let statement = self.parse_statement();
                members.push(&*arena.alloc(Member {
                    kind: MemberKind::GlobalStatement { statement },
                    range: self.range_from(start),
                }));
            } else {
                members.push(&*self.skip_incomplete_member(stop, allow_globals));
            }
        }
        members.into_bump_slice()
    }

    /// One diagnostic per run of tokens the member loop cannot use; the
    /// run is kept in the tree as an incomplete member. Always consumes at
    /// least one token.
    fn skip_incomplete_member(
        &mut self,
        stop: fn(&mut Self) -> bool,
        allow_globals: bool,
    ) -> &'a Member<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let span = self.token_span(start);
        self.diagnostics.add(ErrorCode::InvalidMemberDeclaration, span);
        self.skip_token();
        while !self.at_eof() && !stop(self) && !self.can_resume_member_loop(allow_globals) {
            self.skip_token();
        }
        arena.alloc(Member { kind: MemberKind::Incomplete, range: self.range_from(start) })
    }

    fn can_resume_member_loop(&mut self, allow_globals: bool) -> bool {
        if allow_globals {
            self.at_file_level_member_start() || facts::can_start_statement(self.current_kind())
        } else {
            self.at_member_start()
        }
    }

    fn at_file_level_member_start(&mut self) -> bool {
        facts::is_modifier(self.current_kind())
            || matches!(
                self.current_kind(),
                TokenKind::UsingKeyword
                    | TokenKind::NamespaceKeyword
                    | TokenKind::ClassKeyword
                    | TokenKind::StructKeyword
                    | TokenKind::InterfaceKeyword
                    | TokenKind::EnumKeyword
                    | TokenKind::DelegateKeyword
            )
    }

    fn at_member_start(&mut self) -> bool {
        facts::is_modifier(self.current_kind())
            || facts::can_start_type(self.current_kind())
            || matches!(
                self.current_kind(),
                TokenKind::UsingKeyword
                    | TokenKind::NamespaceKeyword
                    | TokenKind::ClassKeyword
                    | TokenKind::StructKeyword
                    | TokenKind::InterfaceKeyword
                    | TokenKind::EnumKeyword
                    | TokenKind::DelegateKeyword
                    | TokenKind::ConstructorKeyword
                    | TokenKind::ThisKeyword
            )
            || self.at_contextual(TokenKind::RequiredKeyword)
    }

    fn parse_member(&mut self) -> &'a Member<'a> {
        match self.current_kind() {
            TokenKind::UsingKeyword => self.parse_using_directive(),
            TokenKind::NamespaceKeyword => self.parse_namespace(),
            _ => {
                let start = self.mark_start();
                let modifiers = self.parse_modifiers();
                match self.current_kind() {
                    TokenKind::ClassKeyword
                    | TokenKind::StructKeyword
                    | TokenKind::InterfaceKeyword => self.parse_type_declaration(start, modifiers),
                    TokenKind::EnumKeyword => self.parse_enum_declaration(start, modifiers),
                    TokenKind::DelegateKeyword => self.parse_delegate_declaration(start, modifiers),
                    TokenKind::ConstructorKeyword => {
                        self.parse_constructor_declaration(start, modifiers)
                    }
                    _ => self.parse_typed_member(start, modifiers),
                }
            }
        }
    }

    /// `using a.b.c;` at file or namespace level.
    fn parse_using_directive(&mut self) -> &'a Member<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let using_token = self.advance();
        let name = self.parse_qualified_name();
        let semicolon = self.eat(TokenKind::Semicolon);
        arena.alloc(Member {
            kind: MemberKind::UsingNamespace { using_token, name, semicolon },
            range: self.range_from(start),
        })
    }

    fn parse_namespace(&mut self) -> &'a Member<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let keyword = self.advance();
        let name = self.parse_qualified_name();
        let open = self.eat(TokenKind::OpenBrace);
        let members = self.parse_member_list(|p| p.at(TokenKind::CloseBrace), false);
        let close = self.eat(TokenKind::CloseBrace);
        arena.alloc(Member {
            kind: MemberKind::Namespace { keyword, name, open, members, close },
            range: self.range_from(start),
        })
    }

    /// Modifier run with duplicate detection. `required` counts only when
    /// something member-like follows it.
    fn parse_modifiers(&mut self) -> &'a [TokenId] {
        let arena = self.arena;
        let mut modifiers = arena.vec();
        loop {
            let kind = self.current_kind();
            let is_required = self.at_contextual(TokenKind::RequiredKeyword)
                && (facts::is_modifier(self.peek(1).kind)
                    || facts::can_start_type(self.peek(1).kind));
            if !facts::is_modifier(kind) && !is_required {
                break;
            }
            // `ref` here only when a type follows; `ref x = y;` is a statement
            if kind == TokenKind::RefKeyword
                && !facts::can_start_type(self.peek(1).kind)
                && self.peek(1).kind != TokenKind::ReadOnlyKeyword
            {
                break;
            }
            let duplicate = modifiers.iter().any(|&id| self.tokens[id as usize].kind == kind);
            if duplicate {
                let span = self.token_span(self.mark_start());
                self.diagnostics.add(ErrorCode::DuplicateModifier, span);
            }
            modifiers.push(self.advance());
        }
        modifiers.into_bump_slice()
    }

    fn parse_type_declaration(&mut self, start: TokenId, modifiers: &'a [TokenId]) -> &'a Member<'a> {
        let arena = self.arena;
        let kind = match self.current_kind() {
            TokenKind::ClassKeyword => SyntaxKind::ClassDeclaration,
            TokenKind::StructKeyword => SyntaxKind::StructDeclaration,
            _ => SyntaxKind::InterfaceDeclaration,
        };
        let keyword = self.advance();
        let identifier = self.eat(TokenKind::Identifier);
        let type_params = self.parse_optional_type_parameter_list();
        let base_list = self.parse_optional_base_list();
        let constraints = self.parse_constraint_clauses();
        let open = self.eat(TokenKind::OpenBrace);
        let members = self.parse_member_list(|p| p.at(TokenKind::CloseBrace), false);
        let close = self.eat(TokenKind::CloseBrace);
        arena.alloc(Member {
            kind: MemberKind::TypeDecl {
                kind,
                modifiers,
                keyword,
                identifier,
                type_params,
                base_list,
                constraints,
                open,
                members,
                close,
            },
            range: self.range_from(start),
        })
    }

    fn parse_enum_declaration(&mut self, start: TokenId, modifiers: &'a [TokenId]) -> &'a Member<'a> {
        let arena = self.arena;
        let keyword = self.advance();
        let identifier = self.eat(TokenKind::Identifier);
        let base_list = self.parse_optional_base_list();
        let open = self.eat(TokenKind::OpenBrace);
        let members = self.parse_separated_list(
            |p| p.parse_enum_member(),
            |p| p.at(TokenKind::Identifier),
            |p| p.at(TokenKind::CloseBrace),
            ErrorCode::IdentifierExpected,
            true,
        );
        let close = self.eat(TokenKind::CloseBrace);
        arena.alloc(Member {
            kind: MemberKind::Enum { modifiers, keyword, identifier, base_list, open, members, close },
            range: self.range_from(start),
        })
    }

    fn parse_enum_member(&mut self) -> &'a EnumMember<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let identifier = self.eat(TokenKind::Identifier);
        let initializer = self.parse_equals_value_clause();
        arena.alloc(EnumMember { identifier, initializer, range: self.range_from(start) })
    }

    fn parse_delegate_declaration(
        &mut self,
        start: TokenId,
        modifiers: &'a [TokenId],
    ) -> &'a Member<'a> {
        let arena = self.arena;
        let keyword = self.advance();
        let return_type = self.parse_return_type();
        let identifier = self.eat(TokenKind::Identifier);
        let type_params = self.parse_optional_type_parameter_list();
        let params = self.parse_parameter_list();
        let semicolon = self.eat(TokenKind::Semicolon);
        arena.alloc(Member {
            kind: MemberKind::Delegate {
                modifiers,
                keyword,
                return_type,
                identifier,
                type_params,
                params,
                semicolon,
            },
            range: self.range_from(start),
        })
    }

    fn parse_constructor_declaration(
        &mut self,
        start: TokenId,
        modifiers: &'a [TokenId],
    ) -> &'a Member<'a> {
        let arena = self.arena;
        let keyword = self.advance();
        let params = self.parse_parameter_list();
        let initializer = if self.at(TokenKind::Colon) {
            let i_start = self.mark_start();
            let colon = self.advance();
            let keyword = if self.at(TokenKind::BaseKeyword) || self.at(TokenKind::ThisKeyword) {
                self.advance()
            } else {
                self.diagnostics.add(
                    ErrorCode::TokenExpected(TokenKind::BaseKeyword),
                    self.token_span(self.mark_start()),
                );
                self.create_missing_token(TokenKind::BaseKeyword)
            };
            let args = self.parse_argument_list();
            Some(&*arena.alloc(ConstructorInitializer {
                colon,
                keyword,
                args,
                range: self.range_from(i_start),
            }))
        } else {
            None
        };
        let body = self.parse_function_body();
        arena.alloc(Member {
            kind: MemberKind::Constructor { modifiers, keyword, params, initializer, body },
            range: self.range_from(start),
        })
    }

    /// Members that open with a type: fields, methods, properties and
    /// indexers.
    fn parse_typed_member(&mut self, start: TokenId, modifiers: &'a [TokenId]) -> &'a Member<'a> {
        let arena = self.arena;
        let ty_start = self.mark_start();
        let ty = self.parse_return_type();

        if self.at(TokenKind::ThisKeyword) {
            let this_token = self.advance();
            let params = self.parse_bracketed_parameter_list();
            let body = self.parse_property_body();
            return arena.alloc(Member {
                kind: MemberKind::Indexer { modifiers, ty, this_token, params, body },
                range: self.range_from(start),
            });
        }

        let identifier = self.eat(TokenKind::Identifier);
        match self.current_kind() {
            TokenKind::OpenParen | TokenKind::LessThan => {
                let type_params = self.parse_optional_type_parameter_list();
                let params = self.parse_parameter_list();
                let constraints = self.parse_constraint_clauses();
                let body = self.parse_function_body();
                arena.alloc(Member {
                    kind: MemberKind::Method {
                        modifiers,
                        return_type: ty,
                        identifier,
                        type_params,
                        params,
                        constraints,
                        body,
                    },
                    range: self.range_from(start),
                })
            }
            TokenKind::OpenBrace | TokenKind::FatArrow => {
                let body = self.parse_property_body();
                let initializer = self.parse_equals_value_clause();
                let semicolon = if initializer.is_some() || matches!(body, PropertyBody::Arrow(_)) {
                    Some(self.eat(TokenKind::Semicolon))
                } else {
                    self.try_eat(TokenKind::Semicolon)
                };
                arena.alloc(Member {
                    kind: MemberKind::Property { modifiers, ty, identifier, body, initializer, semicolon },
                    range: self.range_from(start),
                })
            }
            _ => {
                self.check_no_void_field(ty);
                let declaration = self.parse_field_declarators(ty_start, ty, identifier);
                let semicolon = self.eat(TokenKind::Semicolon);
                arena.alloc(Member {
                    kind: MemberKind::Field { modifiers, declaration, semicolon },
                    range: self.range_from(start),
                })
            }
        }
    }

    fn check_no_void_field(&mut self, ty: &'a TypeSyntax<'a>) {
        if let TypeKind::Predefined { keyword } = ty.kind {
            if self.tokens[keyword as usize].kind == TokenKind::VoidKeyword {
                self.diagnostics.add(ErrorCode::NoVoidHere, self.token_span(keyword));
            }
        }
    }

    /// Declarator list for a field whose type and first identifier are
    /// already consumed.
    fn parse_field_declarators(
        &mut self,
        ty_start: TokenId,
        ty: &'a TypeSyntax<'a>,
        first_identifier: TokenId,
    ) -> &'a VariableDeclaration<'a> {
        let arena = self.arena;
        let d_start = first_identifier;
        let initializer = self.parse_equals_value_clause();
        let first = arena.alloc(VariableDeclarator {
            identifier: first_identifier,
            initializer,
            range: self.range_from(d_start),
        });
        let mut items = arena.vec();
        let mut separators = arena.vec();
        items.push(&*first);
        while self.at(TokenKind::Comma) {
            separators.push(self.advance());
            let start = self.mark_start();
            let identifier = self.eat(TokenKind::Identifier);
            let initializer = self.parse_equals_value_clause();
            items.push(&*arena.alloc(VariableDeclarator {
                identifier,
                initializer,
                range: self.range_from(start),
            }));
        }
        arena.alloc(VariableDeclaration {
            ty,
            variables: SeparatedList {
                items: items.into_bump_slice(),
                separators: separators.into_bump_slice(),
            },
            range: self.range_from(ty_start),
        })
    }

    /// Return types allow `void`; everything else goes through the normal
    /// type grammar.
    fn parse_return_type(&mut self) -> &'a TypeSyntax<'a> {
        self.parse_type(ParseTypeMode::Normal)
    }

    // ========================================================================
    // Member pieces (shared with local functions)
    // ========================================================================

    pub(crate) fn parse_function_body(&mut self) -> FunctionBody<'a> {
        match self.current_kind() {
            TokenKind::OpenBrace => FunctionBody::Block(self.parse_block()),
            TokenKind::FatArrow => {
                let clause = self.parse_arrow_clause();
                let semicolon = self.eat(TokenKind::Semicolon);
                FunctionBody::Arrow { clause, semicolon }
            }
            _ => FunctionBody::None { semicolon: self.eat(TokenKind::Semicolon) },
        }
    }

    fn parse_arrow_clause(&mut self) -> &'a ArrowClause<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let arrow = self.eat(TokenKind::FatArrow);
        let expr = self.parse_expression();
        arena.alloc(ArrowClause { arrow, expr, range: self.range_from(start) })
    }

    fn parse_property_body(&mut self) -> PropertyBody<'a> {
        if self.at(TokenKind::FatArrow) {
            PropertyBody::Arrow(self.parse_arrow_clause())
        } else {
            PropertyBody::Accessors(self.parse_accessor_list())
        }
    }

    fn parse_accessor_list(&mut self) -> &'a AccessorList<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let open = self.eat(TokenKind::OpenBrace);
        let mut accessors = arena.vec();
        let mut last_ptr = usize::MAX;
        while !self.at(TokenKind::CloseBrace) && !self.at_eof() {
            if last_ptr != usize::MAX && !self.is_making_progress(&mut last_ptr) {
                debug_assert!(false, "accessor list failed to make progress");
                break;
            }
            last_ptr = self.mark_start() as usize;
            if self.at_accessor() {
                accessors.push(&*self.parse_accessor());
            } else {
                let span = self.token_span(self.mark_start());
                self.diagnostics.add(ErrorCode::SyntaxError, span);
                self.skip_token();
            }
        }
        let close = self.eat(TokenKind::CloseBrace);
        arena.alloc(AccessorList {
            open,
            accessors: accessors.into_bump_slice(),
            close,
            range: self.range_from(start),
        })
    }

    /// A modifier run counts as accessor-shaped only when `get`, `set` or
    /// `init` follows it.
    fn at_accessor(&mut self) -> bool {
        let mut i = 0;
        while facts::is_modifier(self.peek(i).kind) {
            i += 1;
        }
        let token = self.peek(i);
        token.is_contextual(TokenKind::GetKeyword)
            || token.is_contextual(TokenKind::SetKeyword)
            || token.is_contextual(TokenKind::InitKeyword)
    }

    fn parse_accessor(&mut self) -> &'a Accessor<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let mut modifiers = arena.vec();
        while facts::is_modifier(self.current_kind()) {
            modifiers.push(self.advance());
        }
        let (kind, keyword) = if self.at_contextual(TokenKind::GetKeyword) {
            (SyntaxKind::GetAccessorDeclaration, self.advance())
        } else if self.at_contextual(TokenKind::SetKeyword) {
            (SyntaxKind::SetAccessorDeclaration, self.advance())
        } else {
            (SyntaxKind::InitAccessorDeclaration, self.eat_contextual(TokenKind::InitKeyword))
        };
        let body = self.parse_function_body();
        arena.alloc(Accessor {
            kind,
            modifiers: modifiers.into_bump_slice(),
            keyword,
            body,
            range: self.range_from(start),
        })
    }

    pub(crate) fn parse_optional_type_parameter_list(&mut self) -> Option<&'a TypeParameterList<'a>> {
        if !self.at(TokenKind::LessThan) {
            return None;
        }
        let arena = self.arena;
        let start = self.mark_start();
        let open = self.advance();
        let params = self.parse_separated_list(
            |p| {
                let start = p.mark_start();
                let identifier = p.eat(TokenKind::Identifier);
                &*p.arena.alloc(TypeParameter { identifier, range: p.range_from(start) })
            },
            |p| p.at(TokenKind::Identifier),
            |p| p.at(TokenKind::GreaterThan),
            ErrorCode::IdentifierExpected,
            false,
        );
        let close = self.eat(TokenKind::GreaterThan);
        Some(arena.alloc(TypeParameterList { open, params, close, range: self.range_from(start) }))
    }

    fn parse_optional_base_list(&mut self) -> Option<&'a BaseList<'a>> {
        if !self.at(TokenKind::Colon) {
            return None;
        }
        let arena = self.arena;
        let start = self.mark_start();
        let colon = self.advance();
        let types = self.parse_separated_list(
            |p| p.parse_type(ParseTypeMode::Normal),
            |p| facts::can_start_type(p.current_kind()),
            |p| {
                matches!(
                    p.current_kind(),
                    TokenKind::OpenBrace | TokenKind::Semicolon | TokenKind::CloseBrace
                ) || p.at_contextual(TokenKind::WhereKeyword)
            },
            ErrorCode::TypeExpected,
            false,
        );
        Some(arena.alloc(BaseList { colon, types, range: self.range_from(start) }))
    }

    pub(crate) fn parse_constraint_clauses(&mut self) -> List<'a, ConstraintClause<'a>> {
        let arena = self.arena;
        let mut clauses = arena.vec();
        while self.at_contextual(TokenKind::WhereKeyword) {
            let start = self.mark_start();
            let where_token = self.advance();
            let name = self.eat(TokenKind::Identifier);
            let colon = self.eat(TokenKind::Colon);
            let constraints = self.parse_separated_list(
                |p| p.parse_constraint(),
                |p| {
                    facts::can_start_type(p.current_kind())
                        || matches!(
                            p.current_kind(),
                            TokenKind::ClassKeyword | TokenKind::StructKeyword | TokenKind::NewKeyword
                        )
                },
                |p| {
                    matches!(p.current_kind(), TokenKind::OpenBrace | TokenKind::Semicolon)
                        || p.at_contextual(TokenKind::WhereKeyword)
                },
                ErrorCode::TypeExpected,
                false,
            );
            clauses.push(&*arena.alloc(ConstraintClause {
                where_token,
                name,
                colon,
                constraints,
                range: self.range_from(start),
            }));
        }
        clauses.into_bump_slice()
    }

    fn parse_constraint(&mut self) -> &'a Constraint<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let kind = match self.current_kind() {
            TokenKind::ClassKeyword => ConstraintKind::Class { token: self.advance() },
            TokenKind::StructKeyword => ConstraintKind::Struct { token: self.advance() },
            TokenKind::NewKeyword => {
                let new_token = self.advance();
                let open = self.eat(TokenKind::OpenParen);
                let close = self.eat(TokenKind::CloseParen);
                ConstraintKind::Constructor { new_token, open, close }
            }
            _ => ConstraintKind::Type(self.parse_type(ParseTypeMode::Normal)),
        };
        arena.alloc(Constraint { kind, range: self.range_from(start) })
    }

    pub(crate) fn parse_parameter_list(&mut self) -> &'a ParameterList<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let open = self.eat(TokenKind::OpenParen);
        let params = self.parse_separated_list(
            |p| p.parse_parameter(),
            Self::is_possible_parameter,
            |p| p.at(TokenKind::CloseParen),
            ErrorCode::TypeExpected,
            false,
        );
        let close = self.eat(TokenKind::CloseParen);
        arena.alloc(ParameterList { open, params, close, range: self.range_from(start) })
    }

    fn parse_bracketed_parameter_list(&mut self) -> &'a BracketedParameterList<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let open = self.eat(TokenKind::OpenBracket);
        let params = self.parse_separated_list(
            |p| p.parse_parameter(),
            Self::is_possible_parameter,
            |p| p.at(TokenKind::CloseBracket),
            ErrorCode::TypeExpected,
            false,
        );
        let close = self.eat(TokenKind::CloseBracket);
        arena.alloc(BracketedParameterList { open, params, close, range: self.range_from(start) })
    }

    fn is_possible_parameter(&mut self) -> bool {
        facts::can_start_type(self.current_kind())
            || matches!(
                self.current_kind(),
                TokenKind::OutKeyword | TokenKind::InKeyword | TokenKind::ParamsKeyword
            )
    }

    fn parse_parameter(&mut self) -> &'a Parameter<'a> {
        let arena = self.arena;
        let start = self.mark_start();
        let mut modifiers = arena.vec();
        while matches!(
            self.current_kind(),
            TokenKind::RefKeyword
                | TokenKind::OutKeyword
                | TokenKind::InKeyword
                | TokenKind::ParamsKeyword
                | TokenKind::ReadOnlyKeyword
        ) {
            modifiers.push(self.advance());
        }
        let ty = self.parse_type(ParseTypeMode::Normal);
        self.check_no_void_parameter(ty);
        let identifier = self.eat(TokenKind::Identifier);
        let default = self.parse_equals_value_clause();
        arena.alloc(Parameter {
            modifiers: modifiers.into_bump_slice(),
            ty: Some(ty),
            identifier,
            default,
            range: self.range_from(start),
        })
    }

    fn check_no_void_parameter(&mut self, ty: &'a TypeSyntax<'a>) {
        if let TypeKind::Predefined { keyword } = ty.kind {
            if self.tokens[keyword as usize].kind == TokenKind::VoidKeyword {
                self.diagnostics.add(ErrorCode::NoVoidParameter, self.token_span(keyword));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::diagnostics::Diagnostics;
    use crate::parser::parse_compilation_unit;
    use crate::tokenizer::tokenize;

    fn parse<R>(source: &str, f: impl FnOnce(&CompilationUnit<'_>, &Diagnostics) -> R) -> R {
        let arena = Arena::new();
        let mut diags = Diagnostics::new();
        let tokens = tokenize(source, &mut diags, &arena);
        let output = parse_compilation_unit(tokens, &mut diags, &arena);
        f(output.root, &diags)
    }

    #[test]
    fn class_with_members() {
        parse(
            "namespace app {
                public class Point {
                    int x;
                    int y = 1;
                    public int Sum() { return x + y; }
                    int Value { get; set; }
                    constructor(int x) { }
                }
            }",
            |unit, diags| {
                assert_eq!(diags.len(), 0);
                assert_eq!(unit.members.len(), 1);
                match unit.members[0].kind {
                    MemberKind::Namespace { members, .. } => {
                        match members[0].kind {
                            MemberKind::TypeDecl { kind, members, .. } => {
                                assert_eq!(kind, SyntaxKind::ClassDeclaration);
                                let kinds: Vec<_> = members.iter().map(|m| m.kind()).collect();
                                assert_eq!(
                                    kinds,
                                    vec![
                                        SyntaxKind::FieldDeclaration,
                                        SyntaxKind::FieldDeclaration,
                                        SyntaxKind::MethodDeclaration,
                                        SyntaxKind::PropertyDeclaration,
                                        SyntaxKind::ConstructorDeclaration,
                                    ]
                                );
                            }
                            _ => panic!("expected type declaration"),
                        }
                    }
                    _ => panic!("expected namespace"),
                }
            },
        );
    }

    #[test]
    fn field_missing_semicolon_recovers_once() {
        parse("class C { int x public int y; }", |unit, diags| {
            let semicolon_errors = diags
                .iter()
                .filter(|d| d.code == ErrorCode::SemicolonExpected)
                .count();
            assert_eq!(semicolon_errors, 1);
            match unit.members[0].kind {
                MemberKind::TypeDecl { members, .. } => {
                    assert_eq!(members.len(), 2);
                    assert_eq!(members[0].kind(), SyntaxKind::FieldDeclaration);
                    assert_eq!(members[1].kind(), SyntaxKind::FieldDeclaration);
                }
                _ => panic!("expected type declaration"),
            }
        });
    }

    #[test]
    fn missing_semicolon_diagnostic_anchors_after_first_field_name() {
        parse("class C { int x public int y; }", |_, diags| {
            let diag = diags
                .iter()
                .find(|d| d.code == ErrorCode::SemicolonExpected)
                .unwrap();
            // immediately after `x`, before the whitespace
            assert_eq!(diag.span.start, 15);
            assert_eq!(diag.span.len(), 0);
        });
    }

    #[test]
    fn enum_and_delegate() {
        parse(
            "enum Color : byte { Red, Green = 2, Blue, }
             delegate int Op<T>(T a, T b);",
            |unit, diags| {
                assert_eq!(diags.len(), 0);
                assert_eq!(unit.members.len(), 2);
                match unit.members[0].kind {
                    MemberKind::Enum { members, base_list, .. } => {
                        assert_eq!(members.len(), 3);
                        assert!(base_list.is_some());
                        assert!(members.items[1].initializer.is_some());
                    }
                    _ => panic!("expected enum"),
                }
                assert_eq!(unit.members[1].kind(), SyntaxKind::DelegateDeclaration);
            },
        );
    }

    #[test]
    fn generic_method_with_constraints() {
        parse(
            "class C { T Pick<T>(T a, T b) where T : class, new() { return a; } }",
            |unit, diags| {
                assert_eq!(diags.len(), 0);
                match unit.members[0].kind {
                    MemberKind::TypeDecl { members, .. } => match members[0].kind {
                        MemberKind::Method { type_params, constraints, .. } => {
                            assert_eq!(type_params.unwrap().params.len(), 1);
                            assert_eq!(constraints.len(), 1);
                            assert_eq!(constraints[0].constraints.len(), 2);
                        }
                        _ => panic!("expected method"),
                    },
                    _ => panic!("expected type declaration"),
                }
            },
        );
    }

    #[test]
    fn class_type_parameter_list_records_each_name() {
        parse("class Map<K, V> { }", |unit, diags| {
            assert_eq!(diags.len(), 0);
            match unit.members[0].kind {
                MemberKind::TypeDecl { type_params, .. } => {
                    let list = type_params.unwrap();
                    assert_eq!(list.params.len(), 2);
                    for param in list.params.items {
                        assert!(!param.range.is_empty());
                    }
                }
                _ => panic!("expected type declaration"),
            }
        });
    }

    #[test]
    fn properties_and_indexer() {
        parse(
            "class C {
                int Area => w * h;
                int Value { get => v; private set { v = value; } }
                required int Count { get; init; }
                int this[int i] { get { return data[i]; } }
            }",
            |unit, diags| {
                assert_eq!(diags.len(), 0);
                match unit.members[0].kind {
                    MemberKind::TypeDecl { members, .. } => {
                        assert_eq!(members[0].kind(), SyntaxKind::PropertyDeclaration);
                        assert_eq!(members[1].kind(), SyntaxKind::PropertyDeclaration);
                        assert_eq!(members[2].kind(), SyntaxKind::PropertyDeclaration);
                        assert_eq!(members[3].kind(), SyntaxKind::IndexerDeclaration);
                        match members[1].kind {
                            MemberKind::Property { body: PropertyBody::Accessors(list), .. } => {
                                assert_eq!(list.accessors.len(), 2);
                                assert_eq!(
                                    list.accessors[1].kind,
                                    SyntaxKind::SetAccessorDeclaration
                                );
                                assert_eq!(list.accessors[1].modifiers.len(), 1);
                            }
                            _ => panic!("expected accessor property"),
                        }
                    }
                    _ => panic!("expected type declaration"),
                }
            },
        );
    }

    #[test]
    fn global_statements_at_file_level() {
        parse("var x = 1; Print(x);", |unit, diags| {
            assert_eq!(diags.len(), 0);
            assert_eq!(unit.members.len(), 2);
            assert_eq!(unit.members[0].kind(), SyntaxKind::GlobalStatement);
        });
    }

    #[test]
    fn duplicate_modifier_reported() {
        parse("public public class C { }", |_, diags| {
            assert!(diags.iter().any(|d| d.code == ErrorCode::DuplicateModifier));
        });
    }

    #[test]
    fn garbage_becomes_incomplete_member_with_one_diagnostic() {
        parse("class C { %% int x; }", |unit, diags| {
            let invalid = diags
                .iter()
                .filter(|d| d.code == ErrorCode::InvalidMemberDeclaration)
                .count();
            assert_eq!(invalid, 1);
            match unit.members[0].kind {
                MemberKind::TypeDecl { members, .. } => {
                    assert_eq!(members[0].kind(), SyntaxKind::IncompleteMember);
                    assert_eq!(members[1].kind(), SyntaxKind::FieldDeclaration);
                }
                _ => panic!("expected type declaration"),
            }
        });
    }

    #[test]
    fn root_range_spans_every_member() {
        parse("using a.b; class C { int x; }", |unit, _| {
            for member in unit.members {
                assert!(unit.range.contains(member.range));
            }
        });
    }
}
