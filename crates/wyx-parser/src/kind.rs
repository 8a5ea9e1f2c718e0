//! Syntax node kinds.
//!
//! Every node the parser builds names its shape with one of these kinds.
//! Family membership (expression, pattern, type) is answered by predicate
//! functions rather than numeric ranges so an exhaustive `match` keeps the
//! sets honest when variants move.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SyntaxKind {
    None,
    List,

    // Unary and binary expressions
    UnaryPlusExpression,
    UnaryMinusExpression,
    BitwiseNotExpression,
    LogicalNotExpression,
    PreIncrementExpression,
    PreDecrementExpression,
    PostIncrementExpression,
    PostDecrementExpression,
    IndexExpression,
    CoalesceExpression,
    IsExpression,
    AsExpression,
    BitwiseOrExpression,
    ExclusiveOrExpression,
    BitwiseAndExpression,
    EqualsExpression,
    NotEqualsExpression,
    LessThanExpression,
    LessThanOrEqualExpression,
    GreaterThanExpression,
    GreaterThanOrEqualExpression,
    LeftShiftExpression,
    RightShiftExpression,
    UnsignedRightShiftExpression,
    AddExpression,
    SubtractExpression,
    MultiplyExpression,
    DivideExpression,
    ModuloExpression,
    LogicalAndExpression,
    LogicalOrExpression,
    RangeExpression,
    RefExpression,
    SwitchExpression,
    SwitchExpressionArm,

    // Assignments
    SimpleAssignmentExpression,
    AddAssignmentExpression,
    SubtractAssignmentExpression,
    MultiplyAssignmentExpression,
    DivideAssignmentExpression,
    ModuloAssignmentExpression,
    AndAssignmentExpression,
    ExclusiveOrAssignmentExpression,
    OrAssignmentExpression,
    LeftShiftAssignmentExpression,
    RightShiftAssignmentExpression,
    UnsignedRightShiftAssignmentExpression,
    CoalesceAssignmentExpression,

    // Primary expressions
    IdentifierName,
    QualifiedName,
    GenericName,
    SimpleName,
    ThisExpression,
    BaseExpression,
    NumericLiteralExpression,
    CharacterLiteralExpression,
    StringLiteralExpression,
    EmptyStringLiteralExpression,
    RawStringLiteralExpression,
    InterpolatedStringExpression,
    StringLiteralPart,
    InterpolatedIdentifierPart,
    TrueLiteralExpression,
    FalseLiteralExpression,
    NullLiteralExpression,
    DefaultLiteralExpression,
    DefaultExpression,
    TypeOfExpression,
    SizeOfExpression,
    CastExpression,
    ConditionalExpression,
    ThrowExpression,
    IsPatternExpression,
    WithExpression,
    ParenthesizedExpression,
    TupleExpression,
    InvocationExpression,
    ElementAccessExpression,
    SimpleMemberAccessExpression,
    ConditionalAccessExpression,
    MemberBindingExpression,
    ElementBindingExpression,
    BangExpression,
    ObjectCreationExpression,
    ImplicitObjectCreationExpression,
    ArrayCreationExpression,
    ImplicitArrayCreationExpression,
    CollectionExpression,
    SpreadElement,
    ExpressionElement,
    DeclarationExpression,
    ParenthesizedLambdaExpression,
    SimpleLambdaExpression,

    // Initializers
    ArrayInitializerExpression,
    ObjectInitializerExpression,
    CollectionInitializerExpression,
    ComplexElementInitializerExpression,
    WithInitializerExpression,

    // Patterns
    DeclarationPattern,
    ConstantPattern,
    DiscardPattern,
    VarPattern,
    TypePattern,
    RelationalPattern,
    ParenthesizedPattern,
    OrPattern,
    AndPattern,
    NotPattern,
    RecursivePattern,
    PropertyPatternClause,
    PositionalPatternClause,
    Subpattern,
    SlicePattern,
    ListPattern,
    WhenClause,
    DiscardDesignation,
    SingleVariableDesignation,
    ParenthesizedVariableDesignation,

    // Types
    PredefinedType,
    NullableType,
    RefType,
    TupleType,
    ArrayType,
    ArrayRankSpecifier,
    TupleElement,
    TypeArgumentList,

    // Statements
    Block,
    EmptyStatement,
    ExpressionStatement,
    LocalDeclarationStatement,
    LocalFunctionStatement,
    IfStatement,
    ElseClause,
    SwitchStatement,
    SwitchSection,
    CaseSwitchLabel,
    CasePatternSwitchLabel,
    DefaultSwitchLabel,
    WhileStatement,
    DoStatement,
    ForStatement,
    ForEachStatement,
    ForEachVariableStatement,
    BreakStatement,
    ContinueStatement,
    ReturnStatement,
    ThrowStatement,
    TryStatement,
    CatchClause,
    CatchDeclaration,
    CatchFilterClause,
    FinallyClause,
    UsingStatement,
    GotoStatement,
    GotoCaseStatement,
    GotoDefaultStatement,
    LabeledStatement,

    // Declarations
    CompilationUnit,
    NamespaceDeclaration,
    UsingNamespaceDeclaration,
    UsingDeclaration,
    ExternDeclaration,
    ClassDeclaration,
    StructDeclaration,
    InterfaceDeclaration,
    EnumDeclaration,
    EnumMemberDeclaration,
    DelegateDeclaration,
    GlobalStatement,
    IncompleteMember,
    FieldDeclaration,
    MethodDeclaration,
    ConstructorDeclaration,
    PropertyDeclaration,
    IndexerDeclaration,
    AccessorList,
    GetAccessorDeclaration,
    SetAccessorDeclaration,
    InitAccessorDeclaration,
    ArrowExpressionClause,
    VariableDeclaration,
    VariableDeclarator,
    EqualsValueClause,
    BaseList,
    BaseType,
    TypeParameterList,
    TypeParameter,
    TypeParameterConstraintClause,
    TypeConstraint,
    ConstructorConstraint,
    ClassConstraint,
    StructConstraint,
    ParameterList,
    BracketedParameterList,
    Parameter,
    ArgumentList,
    BracketedArgumentList,
    Argument,
    NameColon,
    NameEquals,
    ConstructorInitializer,
    BaseConstructorInitializer,
    ThisConstructorInitializer,
}

impl SyntaxKind {
    /// Variant name, for dumps and test assertions.
    pub fn name(self) -> String {
        format!("{self:?}")
    }
}

/// True for every pattern node kind.
pub fn is_pattern_kind(kind: SyntaxKind) -> bool {
    use SyntaxKind::*;
    matches!(
        kind,
        DeclarationPattern
            | ConstantPattern
            | DiscardPattern
            | VarPattern
            | TypePattern
            | RelationalPattern
            | ParenthesizedPattern
            | OrPattern
            | AndPattern
            | NotPattern
            | RecursivePattern
            | SlicePattern
            | ListPattern
    )
}

/// True for every type node kind. Name kinds double as types when they
/// appear in type position.
pub fn is_type_kind(kind: SyntaxKind) -> bool {
    use SyntaxKind::*;
    matches!(
        kind,
        PredefinedType
            | NullableType
            | RefType
            | TupleType
            | ArrayType
            | IdentifierName
            | QualifiedName
            | GenericName
    )
}

/// True for name kinds (`a`, `a.b`, `a<T>`).
pub fn is_name_kind(kind: SyntaxKind) -> bool {
    use SyntaxKind::*;
    matches!(kind, IdentifierName | QualifiedName | GenericName | SimpleName)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn families_are_disjoint() {
        assert!(is_pattern_kind(SyntaxKind::OrPattern));
        assert!(!is_type_kind(SyntaxKind::OrPattern));
        assert!(is_type_kind(SyntaxKind::NullableType));
        assert!(!is_pattern_kind(SyntaxKind::NullableType));
    }

    #[test]
    fn names_double_as_types() {
        assert!(is_type_kind(SyntaxKind::QualifiedName));
        assert!(is_name_kind(SyntaxKind::QualifiedName));
    }

    #[test]
    fn kind_names_match_variants() {
        assert_eq!(SyntaxKind::IfStatement.name(), "IfStatement");
        assert_eq!(SyntaxKind::CoalesceExpression.name(), "CoalesceExpression");
    }
}
