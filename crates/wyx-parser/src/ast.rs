//! Arena-allocated syntax tree nodes.
//!
//! Nodes are plain `Copy` structs with a payload enum and a token range;
//! the node's `SyntaxKind` is derived from the variant, never stored
//! redundantly where the variant already says it. Children are `&'a`
//! references into the same arena. Token fields are ids into the token
//! array (`TokenId`); the texts table and offsets recover source text and
//! byte spans.
//!
//! Invariant: a parent's token range spans every child's range. Fields the
//! grammar requires are never optional; the parser synthesizes missing
//! tokens and missing identifier names instead.

use crate::kind::SyntaxKind;

/// Index into the token array (equal to `SyntaxToken::id`).
pub type TokenId = u32;

/// Half-open range of token ids covered by a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenRange {
    pub start: TokenId,
    pub end: TokenId,
}

impl TokenRange {
    pub const fn new(start: TokenId, end: TokenId) -> Self {
        TokenRange { start, end }
    }

    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Does this range span `other` entirely?
    pub const fn contains(&self, other: TokenRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// Homogeneous list of nodes.
pub type List<'a, T> = &'a [&'a T];

/// List of nodes with separator tokens between them (commas, usually).
/// `separators.len()` is `items.len() - 1` or `items.len()` when a
/// trailing separator was present.
#[derive(Debug, Clone, Copy)]
pub struct SeparatedList<'a, T> {
    pub items: &'a [&'a T],
    pub separators: &'a [TokenId],
}

impl<'a, T> SeparatedList<'a, T> {
    pub const fn empty() -> Self {
        SeparatedList { items: &[], separators: &[] }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.items.iter().copied()
    }
}

// ============================================================================
// Types and names
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct TypeSyntax<'a> {
    pub kind: TypeKind<'a>,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub enum TypeKind<'a> {
    /// `int`, `float3`, `string`, …
    Predefined { keyword: TokenId },
    IdentifierName { identifier: TokenId },
    GenericName {
        identifier: TokenId,
        open: TokenId,
        args: SeparatedList<'a, TypeSyntax<'a>>,
        close: TokenId,
    },
    /// `left.right`; `right` is a simple or generic name.
    QualifiedName { left: &'a TypeSyntax<'a>, dot: TokenId, right: &'a TypeSyntax<'a> },
    Nullable { inner: &'a TypeSyntax<'a>, question: TokenId },
    Ref { ref_token: TokenId, readonly: Option<TokenId>, inner: &'a TypeSyntax<'a> },
    Tuple {
        open: TokenId,
        elements: SeparatedList<'a, TupleElement<'a>>,
        close: TokenId,
    },
    /// Element type plus one rank specifier per `[…]`.
    Array { element: &'a TypeSyntax<'a>, ranks: List<'a, ArrayRank<'a>> },
}

impl<'a> TypeSyntax<'a> {
    pub fn kind(&self) -> SyntaxKind {
        match self.kind {
            TypeKind::Predefined { .. } => SyntaxKind::PredefinedType,
            TypeKind::IdentifierName { .. } => SyntaxKind::IdentifierName,
            TypeKind::GenericName { .. } => SyntaxKind::GenericName,
            TypeKind::QualifiedName { .. } => SyntaxKind::QualifiedName,
            TypeKind::Nullable { .. } => SyntaxKind::NullableType,
            TypeKind::Ref { .. } => SyntaxKind::RefType,
            TypeKind::Tuple { .. } => SyntaxKind::TupleType,
            TypeKind::Array { .. } => SyntaxKind::ArrayType,
        }
    }

    pub fn is_name(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::IdentifierName { .. }
                | TypeKind::GenericName { .. }
                | TypeKind::QualifiedName { .. }
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TupleElement<'a> {
    pub ty: &'a TypeSyntax<'a>,
    pub name: Option<TokenId>,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub struct ArrayRank<'a> {
    pub open: TokenId,
    /// Size expressions; omitted sizes are omitted-size tokens wrapped in
    /// literal expressions.
    pub sizes: SeparatedList<'a, Expr<'a>>,
    pub close: TokenId,
    pub range: TokenRange,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct Expr<'a> {
    pub kind: ExprKind<'a>,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub enum ExprKind<'a> {
    /// Single-token literals; `kind` is the literal expression kind.
    Literal { kind: SyntaxKind, token: TokenId },
    /// `'x'`: start, content, end token run. Content and end may be absent
    /// in malformed source.
    CharLiteral { start: TokenId, content: Option<TokenId>, end: Option<TokenId> },
    /// String literal (plain, raw or interpolated); `kind` distinguishes.
    StringLiteral {
        kind: SyntaxKind,
        start: TokenId,
        parts: &'a [StringPart<'a>],
        end: Option<TokenId>,
    },
    /// A name used in expression position.
    Name { name: &'a TypeSyntax<'a> },
    This { token: TokenId },
    Base { token: TokenId },
    Paren { open: TokenId, expr: &'a Expr<'a>, close: TokenId },
    Tuple {
        open: TokenId,
        args: SeparatedList<'a, Argument<'a>>,
        close: TokenId,
    },
    Unary { kind: SyntaxKind, operator: TokenId, operand: &'a Expr<'a> },
    Postfix { kind: SyntaxKind, operand: &'a Expr<'a>, operator: TokenId },
    /// Binary operators including `??`; `operator` is the first operator
    /// token (shifts built from adjacent `>`s span two).
    Binary { kind: SyntaxKind, left: &'a Expr<'a>, operator: TokenId, right: &'a Expr<'a> },
    Assignment { kind: SyntaxKind, left: &'a Expr<'a>, operator: TokenId, right: &'a Expr<'a> },
    Conditional {
        condition: &'a Expr<'a>,
        question: TokenId,
        when_true: &'a Expr<'a>,
        colon: TokenId,
        when_false: &'a Expr<'a>,
    },
    IsType { left: &'a Expr<'a>, is_token: TokenId, ty: &'a TypeSyntax<'a> },
    IsPattern { left: &'a Expr<'a>, is_token: TokenId, pattern: &'a Pattern<'a> },
    As { left: &'a Expr<'a>, as_token: TokenId, ty: &'a TypeSyntax<'a> },
    Range { left: Option<&'a Expr<'a>>, operator: TokenId, right: Option<&'a Expr<'a>> },
    Switch {
        governing: &'a Expr<'a>,
        switch_token: TokenId,
        open: TokenId,
        arms: SeparatedList<'a, SwitchArm<'a>>,
        close: TokenId,
    },
    With { left: &'a Expr<'a>, with_token: TokenId, initializer: &'a Initializer<'a> },
    Throw { throw_token: TokenId, expr: &'a Expr<'a> },
    Ref { ref_token: TokenId, expr: &'a Expr<'a> },
    TypeOf { keyword: TokenId, open: TokenId, ty: &'a TypeSyntax<'a>, close: TokenId },
    /// `default(T)`; the bare `default` literal is a `Literal`.
    Default { keyword: TokenId, open: TokenId, ty: &'a TypeSyntax<'a>, close: TokenId },
    Cast { open: TokenId, ty: &'a TypeSyntax<'a>, close: TokenId, expr: &'a Expr<'a> },
    Invocation { target: &'a Expr<'a>, args: &'a ArgumentList<'a> },
    ElementAccess { target: &'a Expr<'a>, args: &'a BracketedArgumentList<'a> },
    MemberAccess { target: &'a Expr<'a>, dot: TokenId, name: &'a TypeSyntax<'a> },
    /// `a?.b` / `a?[i]`; `access` is a member- or element-binding chain.
    ConditionalAccess { target: &'a Expr<'a>, question: TokenId, access: &'a Expr<'a> },
    MemberBinding { dot: TokenId, name: &'a TypeSyntax<'a> },
    ElementBinding { args: &'a BracketedArgumentList<'a> },
    /// Postfix `!`.
    Bang { operand: &'a Expr<'a>, operator: TokenId },
    New {
        new_token: TokenId,
        ty: Option<&'a TypeSyntax<'a>>,
        args: Option<&'a ArgumentList<'a>>,
        initializer: Option<&'a Initializer<'a>>,
    },
    /// `[a, b, ..rest]`
    Collection {
        open: TokenId,
        elements: &'a [CollectionElement<'a>],
        close: TokenId,
    },
    /// `T x` / `var (a, b)` in out-arguments and deconstruction.
    Declaration { ty: &'a TypeSyntax<'a>, designation: &'a Designation<'a> },
    Lambda {
        params: LambdaParams<'a>,
        arrow: TokenId,
        body: LambdaBody<'a>,
    },
}

#[derive(Debug, Clone, Copy)]
pub enum StringPart<'a> {
    /// A literal run of the string's text.
    Text(TokenId),
    /// `$ident`
    Identifier(TokenId),
    /// `${ expr }`
    Interpolation { open: TokenId, expr: &'a Expr<'a>, close: TokenId },
}

#[derive(Debug, Clone, Copy)]
pub enum CollectionElement<'a> {
    Expression(&'a Expr<'a>),
    Spread { dots: TokenId, expr: &'a Expr<'a> },
}

#[derive(Debug, Clone, Copy)]
pub enum LambdaParams<'a> {
    Single(TokenId),
    List(&'a ParameterList<'a>),
}

#[derive(Debug, Clone, Copy)]
pub enum LambdaBody<'a> {
    Expr(&'a Expr<'a>),
    Block(&'a Stmt<'a>),
}

impl<'a> Expr<'a> {
    pub fn kind(&self) -> SyntaxKind {
        use ExprKind::*;
        match self.kind {
            Literal { kind, .. } => kind,
            CharLiteral { .. } => SyntaxKind::CharacterLiteralExpression,
            StringLiteral { kind, .. } => kind,
            Name { name } => name.kind(),
            This { .. } => SyntaxKind::ThisExpression,
            Base { .. } => SyntaxKind::BaseExpression,
            Paren { .. } => SyntaxKind::ParenthesizedExpression,
            Tuple { .. } => SyntaxKind::TupleExpression,
            Unary { kind, .. } => kind,
            Postfix { kind, .. } => kind,
            Binary { kind, .. } => kind,
            Assignment { kind, .. } => kind,
            Conditional { .. } => SyntaxKind::ConditionalExpression,
            IsType { .. } => SyntaxKind::IsExpression,
            IsPattern { .. } => SyntaxKind::IsPatternExpression,
            As { .. } => SyntaxKind::AsExpression,
            Range { .. } => SyntaxKind::RangeExpression,
            Switch { .. } => SyntaxKind::SwitchExpression,
            With { .. } => SyntaxKind::WithExpression,
            Throw { .. } => SyntaxKind::ThrowExpression,
            Ref { .. } => SyntaxKind::RefExpression,
            TypeOf { .. } => SyntaxKind::TypeOfExpression,
            Default { .. } => SyntaxKind::DefaultExpression,
            Cast { .. } => SyntaxKind::CastExpression,
            Invocation { .. } => SyntaxKind::InvocationExpression,
            ElementAccess { .. } => SyntaxKind::ElementAccessExpression,
            MemberAccess { .. } => SyntaxKind::SimpleMemberAccessExpression,
            ConditionalAccess { .. } => SyntaxKind::ConditionalAccessExpression,
            MemberBinding { .. } => SyntaxKind::MemberBindingExpression,
            ElementBinding { .. } => SyntaxKind::ElementBindingExpression,
            Bang { .. } => SyntaxKind::BangExpression,
            New { ty: Some(t), .. } => match t.kind {
                TypeKind::Array { .. } => SyntaxKind::ArrayCreationExpression,
                _ => SyntaxKind::ObjectCreationExpression,
            },
            New { ty: None, .. } => SyntaxKind::ImplicitObjectCreationExpression,
            Collection { .. } => SyntaxKind::CollectionExpression,
            Declaration { .. } => SyntaxKind::DeclarationExpression,
            Lambda { params: LambdaParams::Single(_), .. } => SyntaxKind::SimpleLambdaExpression,
            Lambda { .. } => SyntaxKind::ParenthesizedLambdaExpression,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ArgumentList<'a> {
    pub open: TokenId,
    pub args: SeparatedList<'a, Argument<'a>>,
    pub close: TokenId,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub struct BracketedArgumentList<'a> {
    pub open: TokenId,
    pub args: SeparatedList<'a, Argument<'a>>,
    pub close: TokenId,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub struct Argument<'a> {
    /// `name:` prefix, as (identifier, colon).
    pub name_colon: Option<(TokenId, TokenId)>,
    /// `ref` / `out` / `in` token.
    pub ref_kind: Option<TokenId>,
    pub expr: &'a Expr<'a>,
    pub range: TokenRange,
}

/// `{ … }` initializer used by object creation and `with`.
#[derive(Debug, Clone, Copy)]
pub struct Initializer<'a> {
    pub kind: SyntaxKind,
    pub open: TokenId,
    pub elements: SeparatedList<'a, Expr<'a>>,
    pub close: TokenId,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub struct SwitchArm<'a> {
    pub pattern: &'a Pattern<'a>,
    pub when: Option<&'a WhenClause<'a>>,
    pub arrow: TokenId,
    pub body: &'a Expr<'a>,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub struct WhenClause<'a> {
    pub when_token: TokenId,
    pub condition: &'a Expr<'a>,
    pub range: TokenRange,
}

// ============================================================================
// Patterns
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct Pattern<'a> {
    pub kind: PatternKind<'a>,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub enum PatternKind<'a> {
    Discard { token: TokenId },
    Var { var_token: TokenId, designation: &'a Designation<'a> },
    Declaration { ty: &'a TypeSyntax<'a>, designation: &'a Designation<'a> },
    Type { ty: &'a TypeSyntax<'a> },
    Constant { expr: &'a Expr<'a> },
    Relational { operator: TokenId, expr: &'a Expr<'a> },
    Parenthesized { open: TokenId, pattern: &'a Pattern<'a>, close: TokenId },
    Or { left: &'a Pattern<'a>, operator: TokenId, right: &'a Pattern<'a> },
    And { left: &'a Pattern<'a>, operator: TokenId, right: &'a Pattern<'a> },
    Not { operator: TokenId, pattern: &'a Pattern<'a> },
    Recursive {
        ty: Option<&'a TypeSyntax<'a>>,
        positional: Option<&'a PositionalPatternClause<'a>>,
        property: Option<&'a PropertyPatternClause<'a>>,
        designation: Option<&'a Designation<'a>>,
    },
    Slice { dots: TokenId, pattern: Option<&'a Pattern<'a>> },
    ListPattern {
        open: TokenId,
        patterns: SeparatedList<'a, Pattern<'a>>,
        close: TokenId,
        designation: Option<&'a Designation<'a>>,
    },
}

impl<'a> Pattern<'a> {
    pub fn kind(&self) -> SyntaxKind {
        use PatternKind::*;
        match self.kind {
            Discard { .. } => SyntaxKind::DiscardPattern,
            Var { .. } => SyntaxKind::VarPattern,
            Declaration { .. } => SyntaxKind::DeclarationPattern,
            Type { .. } => SyntaxKind::TypePattern,
            Constant { .. } => SyntaxKind::ConstantPattern,
            Relational { .. } => SyntaxKind::RelationalPattern,
            Parenthesized { .. } => SyntaxKind::ParenthesizedPattern,
            Or { .. } => SyntaxKind::OrPattern,
            And { .. } => SyntaxKind::AndPattern,
            Not { .. } => SyntaxKind::NotPattern,
            Recursive { .. } => SyntaxKind::RecursivePattern,
            Slice { .. } => SyntaxKind::SlicePattern,
            ListPattern { .. } => SyntaxKind::ListPattern,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Designation<'a> {
    pub kind: DesignationKind<'a>,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub enum DesignationKind<'a> {
    Discard { token: TokenId },
    Single { identifier: TokenId },
    Parenthesized {
        open: TokenId,
        items: SeparatedList<'a, Designation<'a>>,
        close: TokenId,
    },
}

impl<'a> Designation<'a> {
    pub fn kind(&self) -> SyntaxKind {
        match self.kind {
            DesignationKind::Discard { .. } => SyntaxKind::DiscardDesignation,
            DesignationKind::Single { .. } => SyntaxKind::SingleVariableDesignation,
            DesignationKind::Parenthesized { .. } => {
                SyntaxKind::ParenthesizedVariableDesignation
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PositionalPatternClause<'a> {
    pub open: TokenId,
    pub subpatterns: SeparatedList<'a, Subpattern<'a>>,
    pub close: TokenId,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub struct PropertyPatternClause<'a> {
    pub open: TokenId,
    pub subpatterns: SeparatedList<'a, Subpattern<'a>>,
    pub close: TokenId,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub struct Subpattern<'a> {
    pub name_colon: Option<(TokenId, TokenId)>,
    pub pattern: &'a Pattern<'a>,
    pub range: TokenRange,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct Stmt<'a> {
    pub kind: StmtKind<'a>,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub enum StmtKind<'a> {
    Block { open: TokenId, statements: List<'a, Stmt<'a>>, close: TokenId },
    Empty { semicolon: TokenId },
    Expression { expr: &'a Expr<'a>, semicolon: TokenId },
    LocalDeclaration {
        /// `const` / `using` / `ref` tokens, in source order.
        modifiers: &'a [TokenId],
        declaration: &'a VariableDeclaration<'a>,
        semicolon: TokenId,
    },
    LocalFunction {
        modifiers: &'a [TokenId],
        return_type: &'a TypeSyntax<'a>,
        identifier: TokenId,
        type_params: Option<&'a TypeParameterList<'a>>,
        params: &'a ParameterList<'a>,
        constraints: List<'a, ConstraintClause<'a>>,
        body: FunctionBody<'a>,
    },
    If {
        if_token: TokenId,
        open: TokenId,
        condition: &'a Expr<'a>,
        close: TokenId,
        statement: &'a Stmt<'a>,
        else_clause: Option<&'a ElseClause<'a>>,
    },
    Switch {
        switch_token: TokenId,
        open_paren: TokenId,
        governing: &'a Expr<'a>,
        close_paren: TokenId,
        open_brace: TokenId,
        sections: List<'a, SwitchSection<'a>>,
        close_brace: TokenId,
    },
    While {
        while_token: TokenId,
        open: TokenId,
        condition: &'a Expr<'a>,
        close: TokenId,
        body: &'a Stmt<'a>,
    },
    Do {
        do_token: TokenId,
        body: &'a Stmt<'a>,
        while_token: TokenId,
        open: TokenId,
        condition: &'a Expr<'a>,
        close: TokenId,
        semicolon: TokenId,
    },
    For {
        for_token: TokenId,
        open: TokenId,
        initializer: Option<ForInitializer<'a>>,
        first_semicolon: TokenId,
        condition: Option<&'a Expr<'a>>,
        second_semicolon: TokenId,
        incrementors: SeparatedList<'a, Expr<'a>>,
        close: TokenId,
        body: &'a Stmt<'a>,
    },
    ForEach {
        foreach_token: TokenId,
        open: TokenId,
        ty: &'a TypeSyntax<'a>,
        variable: ForEachVariable<'a>,
        in_token: TokenId,
        expr: &'a Expr<'a>,
        close: TokenId,
        body: &'a Stmt<'a>,
    },
    Break { keyword: TokenId, semicolon: TokenId },
    Continue { keyword: TokenId, semicolon: TokenId },
    Return { keyword: TokenId, expr: Option<&'a Expr<'a>>, semicolon: TokenId },
    Throw { keyword: TokenId, expr: Option<&'a Expr<'a>>, semicolon: TokenId },
    Try {
        try_token: TokenId,
        block: &'a Stmt<'a>,
        catches: List<'a, CatchClause<'a>>,
        finally: Option<&'a FinallyClause<'a>>,
    },
    Using {
        using_token: TokenId,
        open: TokenId,
        resource: UsingResource<'a>,
        close: TokenId,
        body: &'a Stmt<'a>,
    },
    Goto { goto_token: TokenId, target: GotoTarget<'a>, semicolon: TokenId },
    Labeled { label: TokenId, colon: TokenId, statement: &'a Stmt<'a> },
}

#[derive(Debug, Clone, Copy)]
pub enum ForInitializer<'a> {
    Declaration(&'a VariableDeclaration<'a>),
    Expressions(SeparatedList<'a, Expr<'a>>),
}

#[derive(Debug, Clone, Copy)]
pub enum ForEachVariable<'a> {
    /// `foreach (T x in e)`
    Identifier(TokenId),
    /// `foreach ((var a, var b) in e)` and friends
    Designation(&'a Designation<'a>),
}

#[derive(Debug, Clone, Copy)]
pub enum UsingResource<'a> {
    Declaration(&'a VariableDeclaration<'a>),
    Expression(&'a Expr<'a>),
}

#[derive(Debug, Clone, Copy)]
pub enum GotoTarget<'a> {
    Label(TokenId),
    Case { case_token: TokenId, expr: &'a Expr<'a> },
    Default { default_token: TokenId },
}

impl<'a> Stmt<'a> {
    pub fn kind(&self) -> SyntaxKind {
        use StmtKind::*;
        match self.kind {
            Block { .. } => SyntaxKind::Block,
            Empty { .. } => SyntaxKind::EmptyStatement,
            Expression { .. } => SyntaxKind::ExpressionStatement,
            LocalDeclaration { .. } => SyntaxKind::LocalDeclarationStatement,
            LocalFunction { .. } => SyntaxKind::LocalFunctionStatement,
            If { .. } => SyntaxKind::IfStatement,
            Switch { .. } => SyntaxKind::SwitchStatement,
            While { .. } => SyntaxKind::WhileStatement,
            Do { .. } => SyntaxKind::DoStatement,
            For { .. } => SyntaxKind::ForStatement,
            ForEach { variable: ForEachVariable::Identifier(_), .. } => {
                SyntaxKind::ForEachStatement
            }
            ForEach { .. } => SyntaxKind::ForEachVariableStatement,
            Break { .. } => SyntaxKind::BreakStatement,
            Continue { .. } => SyntaxKind::ContinueStatement,
            Return { .. } => SyntaxKind::ReturnStatement,
            Throw { .. } => SyntaxKind::ThrowStatement,
            Try { .. } => SyntaxKind::TryStatement,
            Using { .. } => SyntaxKind::UsingStatement,
            Goto { target: GotoTarget::Case { .. }, .. } => SyntaxKind::GotoCaseStatement,
            Goto { target: GotoTarget::Default { .. }, .. } => SyntaxKind::GotoDefaultStatement,
            Goto { .. } => SyntaxKind::GotoStatement,
            Labeled { .. } => SyntaxKind::LabeledStatement,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct VariableDeclaration<'a> {
    pub ty: &'a TypeSyntax<'a>,
    pub variables: SeparatedList<'a, VariableDeclarator<'a>>,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub struct VariableDeclarator<'a> {
    pub identifier: TokenId,
    pub initializer: Option<&'a EqualsValueClause<'a>>,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub struct EqualsValueClause<'a> {
    pub equals: TokenId,
    pub value: &'a Expr<'a>,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub struct ElseClause<'a> {
    pub else_token: TokenId,
    pub statement: &'a Stmt<'a>,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub struct SwitchSection<'a> {
    pub labels: List<'a, SwitchLabel<'a>>,
    pub statements: List<'a, Stmt<'a>>,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub struct SwitchLabel<'a> {
    pub kind: SwitchLabelKind<'a>,
    pub keyword: TokenId,
    pub colon: TokenId,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub enum SwitchLabelKind<'a> {
    Case { pattern: &'a Pattern<'a>, when: Option<&'a WhenClause<'a>> },
    Default,
}

impl<'a> SwitchLabel<'a> {
    pub fn kind(&self) -> SyntaxKind {
        match self.kind {
            SwitchLabelKind::Case { pattern, when: None }
                if matches!(pattern.kind, PatternKind::Constant { .. }) =>
            {
                SyntaxKind::CaseSwitchLabel
            }
            SwitchLabelKind::Case { .. } => SyntaxKind::CasePatternSwitchLabel,
            SwitchLabelKind::Default => SyntaxKind::DefaultSwitchLabel,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CatchClause<'a> {
    pub catch_token: TokenId,
    pub declaration: Option<&'a CatchDeclaration<'a>>,
    pub filter: Option<&'a CatchFilterClause<'a>>,
    pub block: &'a Stmt<'a>,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub struct CatchDeclaration<'a> {
    pub open: TokenId,
    pub ty: &'a TypeSyntax<'a>,
    pub identifier: Option<TokenId>,
    pub close: TokenId,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub struct CatchFilterClause<'a> {
    pub when_token: TokenId,
    pub open: TokenId,
    pub condition: &'a Expr<'a>,
    pub close: TokenId,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub struct FinallyClause<'a> {
    pub finally_token: TokenId,
    pub block: &'a Stmt<'a>,
    pub range: TokenRange,
}

// ============================================================================
// Declarations and members
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct Member<'a> {
    pub kind: MemberKind<'a>,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub enum MemberKind<'a> {
    Namespace {
        keyword: TokenId,
        name: &'a TypeSyntax<'a>,
        open: TokenId,
        members: List<'a, Member<'a>>,
        close: TokenId,
    },
    UsingNamespace { using_token: TokenId, name: &'a TypeSyntax<'a>, semicolon: TokenId },
    /// Class, struct or interface; `kind` picks the declaration kind.
    TypeDecl {
        kind: SyntaxKind,
        modifiers: &'a [TokenId],
        keyword: TokenId,
        identifier: TokenId,
        type_params: Option<&'a TypeParameterList<'a>>,
        base_list: Option<&'a BaseList<'a>>,
        constraints: List<'a, ConstraintClause<'a>>,
        open: TokenId,
        members: List<'a, Member<'a>>,
        close: TokenId,
    },
    Enum {
        modifiers: &'a [TokenId],
        keyword: TokenId,
        identifier: TokenId,
        base_list: Option<&'a BaseList<'a>>,
        open: TokenId,
        members: SeparatedList<'a, EnumMember<'a>>,
        close: TokenId,
    },
    Delegate {
        modifiers: &'a [TokenId],
        keyword: TokenId,
        return_type: &'a TypeSyntax<'a>,
        identifier: TokenId,
        type_params: Option<&'a TypeParameterList<'a>>,
        params: &'a ParameterList<'a>,
        semicolon: TokenId,
    },
    Field {
        modifiers: &'a [TokenId],
        declaration: &'a VariableDeclaration<'a>,
        semicolon: TokenId,
    },
    Method {
        modifiers: &'a [TokenId],
        return_type: &'a TypeSyntax<'a>,
        identifier: TokenId,
        type_params: Option<&'a TypeParameterList<'a>>,
        params: &'a ParameterList<'a>,
        constraints: List<'a, ConstraintClause<'a>>,
        body: FunctionBody<'a>,
    },
    Constructor {
        modifiers: &'a [TokenId],
        keyword: TokenId,
        params: &'a ParameterList<'a>,
        initializer: Option<&'a ConstructorInitializer<'a>>,
        body: FunctionBody<'a>,
    },
    Property {
        modifiers: &'a [TokenId],
        ty: &'a TypeSyntax<'a>,
        identifier: TokenId,
        body: PropertyBody<'a>,
        initializer: Option<&'a EqualsValueClause<'a>>,
        semicolon: Option<TokenId>,
    },
    Indexer {
        modifiers: &'a [TokenId],
        ty: &'a TypeSyntax<'a>,
        this_token: TokenId,
        params: &'a BracketedParameterList<'a>,
        body: PropertyBody<'a>,
    },
    GlobalStatement { statement: &'a Stmt<'a> },
    /// Tokens that did not form a member; kept so nothing is dropped.
    Incomplete,
}

impl<'a> Member<'a> {
    pub fn kind(&self) -> SyntaxKind {
        use MemberKind::*;
        match self.kind {
            Namespace { .. } => SyntaxKind::NamespaceDeclaration,
            UsingNamespace { .. } => SyntaxKind::UsingNamespaceDeclaration,
            TypeDecl { kind, .. } => kind,
            Enum { .. } => SyntaxKind::EnumDeclaration,
            Delegate { .. } => SyntaxKind::DelegateDeclaration,
            Field { .. } => SyntaxKind::FieldDeclaration,
            Method { .. } => SyntaxKind::MethodDeclaration,
            Constructor { .. } => SyntaxKind::ConstructorDeclaration,
            Property { .. } => SyntaxKind::PropertyDeclaration,
            Indexer { .. } => SyntaxKind::IndexerDeclaration,
            GlobalStatement { .. } => SyntaxKind::GlobalStatement,
            Incomplete => SyntaxKind::IncompleteMember,
        }
    }
}

/// `: base(...)` / `: this(...)` on a constructor.
#[derive(Debug, Clone, Copy)]
pub struct ConstructorInitializer<'a> {
    pub colon: TokenId,
    /// `base` or `this` keyword.
    pub keyword: TokenId,
    pub args: &'a ArgumentList<'a>,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub enum FunctionBody<'a> {
    Block(&'a Stmt<'a>),
    Arrow { clause: &'a ArrowClause<'a>, semicolon: TokenId },
    /// Abstract or interface member; just the terminator.
    None { semicolon: TokenId },
}

#[derive(Debug, Clone, Copy)]
pub enum PropertyBody<'a> {
    Accessors(&'a AccessorList<'a>),
    Arrow(&'a ArrowClause<'a>),
}

#[derive(Debug, Clone, Copy)]
pub struct ArrowClause<'a> {
    pub arrow: TokenId,
    pub expr: &'a Expr<'a>,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub struct AccessorList<'a> {
    pub open: TokenId,
    pub accessors: List<'a, Accessor<'a>>,
    pub close: TokenId,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub struct Accessor<'a> {
    /// Get/Set/Init accessor declaration kind.
    pub kind: SyntaxKind,
    pub modifiers: &'a [TokenId],
    pub keyword: TokenId,
    pub body: FunctionBody<'a>,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub struct EnumMember<'a> {
    pub identifier: TokenId,
    pub initializer: Option<&'a EqualsValueClause<'a>>,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub struct BaseList<'a> {
    pub colon: TokenId,
    pub types: SeparatedList<'a, TypeSyntax<'a>>,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub struct TypeParameterList<'a> {
    pub open: TokenId,
    pub params: SeparatedList<'a, TypeParameter>,
    pub close: TokenId,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub struct TypeParameter {
    pub identifier: TokenId,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub struct ConstraintClause<'a> {
    pub where_token: TokenId,
    pub name: TokenId,
    pub colon: TokenId,
    pub constraints: SeparatedList<'a, Constraint<'a>>,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub struct Constraint<'a> {
    pub kind: ConstraintKind<'a>,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub enum ConstraintKind<'a> {
    Type(&'a TypeSyntax<'a>),
    Constructor { new_token: TokenId, open: TokenId, close: TokenId },
    Class { token: TokenId },
    Struct { token: TokenId },
}

#[derive(Debug, Clone, Copy)]
pub struct ParameterList<'a> {
    pub open: TokenId,
    pub params: SeparatedList<'a, Parameter<'a>>,
    pub close: TokenId,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub struct BracketedParameterList<'a> {
    pub open: TokenId,
    pub params: SeparatedList<'a, Parameter<'a>>,
    pub close: TokenId,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy)]
pub struct Parameter<'a> {
    /// `ref` / `out` / `params` / `readonly` tokens.
    pub modifiers: &'a [TokenId],
    /// Absent for untyped lambda parameters.
    pub ty: Option<&'a TypeSyntax<'a>>,
    pub identifier: TokenId,
    pub default: Option<&'a EqualsValueClause<'a>>,
    pub range: TokenRange,
}

/// Root of one file's tree.
#[derive(Debug, Clone, Copy)]
pub struct CompilationUnit<'a> {
    pub members: List<'a, Member<'a>>,
    pub eof: TokenId,
    pub range: TokenRange,
}

impl<'a> CompilationUnit<'a> {
    pub fn kind(&self) -> SyntaxKind {
        SyntaxKind::CompilationUnit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_range_containment() {
        let parent = TokenRange::new(0, 10);
        let child = TokenRange::new(3, 7);
        assert!(parent.contains(child));
        assert!(!child.contains(parent));
        assert!(parent.contains(parent));
    }

    #[test]
    fn separated_list_shape() {
        let list: SeparatedList<'_, Expr<'_>> = SeparatedList::empty();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
    }
}
