//! Language facts: keyword tables, operator precedence and operator to
//! node-kind classification.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use crate::kind::SyntaxKind;
use crate::token::TokenKind;

/// Binding strength of operators, weakest first. Assignment and lambdas
/// share the floor with `Expression`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Precedence {
    Expression = 0,
    Conditional,
    Coalescing,
    ConditionalOr,
    ConditionalAnd,
    LogicalOr,
    LogicalXor,
    LogicalAnd,
    Equality,
    Relational,
    Shift,
    Additive,
    Multiplicative,
    Switch,
    Range,
    Unary,
    Cast,
    Primary,
}

static KEYWORDS: OnceLock<FxHashMap<&'static str, TokenKind>> = OnceLock::new();
static CONTEXTUAL: OnceLock<FxHashMap<&'static str, TokenKind>> = OnceLock::new();

/// Reserved keyword spelled by `text`, if any.
pub fn keyword_from_str(text: &str) -> Option<TokenKind> {
    use TokenKind::*;
    let table = KEYWORDS.get_or_init(|| {
        let entries: &[(&str, TokenKind)] = &[
            ("bool", BoolKeyword),
            ("byte", ByteKeyword),
            ("sbyte", SByteKeyword),
            ("short", ShortKeyword),
            ("ushort", UShortKeyword),
            ("int", IntKeyword),
            ("uint", UIntKeyword),
            ("long", LongKeyword),
            ("ulong", ULongKeyword),
            ("float", FloatKeyword),
            ("double", DoubleKeyword),
            ("string", StringKeyword),
            ("char", CharKeyword),
            ("void", VoidKeyword),
            ("object", ObjectKeyword),
            ("dynamic", DynamicKeyword),
            ("tuple", TupleKeyword),
            ("int2", Int2Keyword),
            ("int3", Int3Keyword),
            ("int4", Int4Keyword),
            ("uint2", Uint2Keyword),
            ("uint3", Uint3Keyword),
            ("uint4", Uint4Keyword),
            ("float2", Float2Keyword),
            ("float3", Float3Keyword),
            ("float4", Float4Keyword),
            ("color8", Color8Keyword),
            ("color16", Color16Keyword),
            ("color32", Color32Keyword),
            ("null", NullKeyword),
            ("true", TrueKeyword),
            ("false", FalseKeyword),
            ("typeof", TypeofKeyword),
            ("new", NewKeyword),
            ("this", ThisKeyword),
            ("base", BaseKeyword),
            ("is", IsKeyword),
            ("as", AsKeyword),
            ("in", InKeyword),
            ("if", IfKeyword),
            ("else", ElseKeyword),
            ("while", WhileKeyword),
            ("for", ForKeyword),
            ("foreach", ForEachKeyword),
            ("do", DoKeyword),
            ("switch", SwitchKeyword),
            ("case", CaseKeyword),
            ("default", DefaultKeyword),
            ("try", TryKeyword),
            ("catch", CatchKeyword),
            ("finally", FinallyKeyword),
            ("break", BreakKeyword),
            ("continue", ContinueKeyword),
            ("return", ReturnKeyword),
            ("throw", ThrowKeyword),
            ("yield", YieldKeyword),
            ("goto", GotoKeyword),
            ("using", UsingKeyword),
            ("var", VarKeyword),
            ("namespace", NamespaceKeyword),
            ("class", ClassKeyword),
            ("struct", StructKeyword),
            ("interface", InterfaceKeyword),
            ("enum", EnumKeyword),
            ("delegate", DelegateKeyword),
            ("constructor", ConstructorKeyword),
            ("export", ExportKeyword),
            ("public", PublicKeyword),
            ("private", PrivateKeyword),
            ("protected", ProtectedKeyword),
            ("internal", InternalKeyword),
            ("static", StaticKeyword),
            ("readonly", ReadOnlyKeyword),
            ("sealed", SealedKeyword),
            ("const", ConstKeyword),
            ("override", OverrideKeyword),
            ("abstract", AbstractKeyword),
            ("virtual", VirtualKeyword),
            ("extern", ExternKeyword),
            ("implicit", ImplicitKeyword),
            ("ref", RefKeyword),
            ("out", OutKeyword),
            ("params", ParamsKeyword),
            ("operator", OperatorKeyword),
        ];
        entries.iter().copied().collect()
    });
    table.get(text).copied()
}

/// Contextual keyword spelled by `text`, if any. These stay identifiers;
/// the parser consults the contextual kind where the grammar allows them.
pub fn contextual_from_str(text: &str) -> Option<TokenKind> {
    use TokenKind::*;
    let table = CONTEXTUAL.get_or_init(|| {
        let entries: &[(&str, TokenKind)] = &[
            ("get", GetKeyword),
            ("set", SetKeyword),
            ("init", InitKeyword),
            ("where", WhereKeyword),
            ("when", WhenKeyword),
            ("or", OrKeyword),
            ("and", AndKeyword),
            ("not", NotKeyword),
            ("with", WithKeyword),
            ("required", RequiredKeyword),
            ("from", FromKeyword),
        ];
        entries.iter().copied().collect()
    });
    table.get(text).copied()
}

pub fn is_predefined_type(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        BoolKeyword
            | ByteKeyword
            | SByteKeyword
            | ShortKeyword
            | UShortKeyword
            | IntKeyword
            | UIntKeyword
            | LongKeyword
            | ULongKeyword
            | FloatKeyword
            | DoubleKeyword
            | StringKeyword
            | CharKeyword
            | VoidKeyword
            | ObjectKeyword
            | DynamicKeyword
            | Int2Keyword
            | Int3Keyword
            | Int4Keyword
            | Uint2Keyword
            | Uint3Keyword
            | Uint4Keyword
            | Float2Keyword
            | Float3Keyword
            | Float4Keyword
            | Color8Keyword
            | Color16Keyword
            | Color32Keyword
    )
}

/// Binary operator token to node kind plus its precedence.
pub fn binary_op(kind: TokenKind) -> Option<(SyntaxKind, Precedence)> {
    use Precedence as P;
    use SyntaxKind as S;
    use TokenKind as T;
    Some(match kind {
        T::QuestionQuestion => (S::CoalesceExpression, P::Coalescing),
        T::BarBar => (S::LogicalOrExpression, P::ConditionalOr),
        T::AmpersandAmpersand => (S::LogicalAndExpression, P::ConditionalAnd),
        T::Bar => (S::BitwiseOrExpression, P::LogicalOr),
        T::Caret => (S::ExclusiveOrExpression, P::LogicalXor),
        T::Ampersand => (S::BitwiseAndExpression, P::LogicalAnd),
        T::EqualsEquals => (S::EqualsExpression, P::Equality),
        T::ExclamationEquals => (S::NotEqualsExpression, P::Equality),
        T::LessThan => (S::LessThanExpression, P::Relational),
        T::LessThanEquals => (S::LessThanOrEqualExpression, P::Relational),
        T::GreaterThan => (S::GreaterThanExpression, P::Relational),
        T::GreaterThanEquals => (S::GreaterThanOrEqualExpression, P::Relational),
        T::IsKeyword => (S::IsExpression, P::Relational),
        T::AsKeyword => (S::AsExpression, P::Relational),
        T::LessThanLessThan => (S::LeftShiftExpression, P::Shift),
        T::GreaterThanGreaterThan => (S::RightShiftExpression, P::Shift),
        T::GreaterThanGreaterThanGreaterThan => (S::UnsignedRightShiftExpression, P::Shift),
        T::Plus => (S::AddExpression, P::Additive),
        T::Minus => (S::SubtractExpression, P::Additive),
        T::Asterisk => (S::MultiplyExpression, P::Multiplicative),
        T::Slash => (S::DivideExpression, P::Multiplicative),
        T::Percent => (S::ModuloExpression, P::Multiplicative),
        T::DotDot => (S::RangeExpression, P::Range),
        _ => return None,
    })
}

/// Assignment operator token to node kind. All bind at `Expression` and
/// associate to the right.
pub fn assignment_op(kind: TokenKind) -> Option<SyntaxKind> {
    use SyntaxKind as S;
    use TokenKind as T;
    Some(match kind {
        T::Equals => S::SimpleAssignmentExpression,
        T::PlusEquals => S::AddAssignmentExpression,
        T::MinusEquals => S::SubtractAssignmentExpression,
        T::AsteriskEquals => S::MultiplyAssignmentExpression,
        T::SlashEquals => S::DivideAssignmentExpression,
        T::PercentEquals => S::ModuloAssignmentExpression,
        T::AmpersandEquals => S::AndAssignmentExpression,
        T::CaretEquals => S::ExclusiveOrAssignmentExpression,
        T::BarEquals => S::OrAssignmentExpression,
        T::LessThanLessThanEquals => S::LeftShiftAssignmentExpression,
        T::GreaterThanGreaterThanEquals => S::RightShiftAssignmentExpression,
        T::GreaterThanGreaterThanGreaterThanEquals => S::UnsignedRightShiftAssignmentExpression,
        T::QuestionQuestionEquals => S::CoalesceAssignmentExpression,
        _ => return None,
    })
}

pub fn prefix_unary_op(kind: TokenKind) -> Option<SyntaxKind> {
    use SyntaxKind as S;
    use TokenKind as T;
    Some(match kind {
        T::Plus => S::UnaryPlusExpression,
        T::Minus => S::UnaryMinusExpression,
        T::Tilde => S::BitwiseNotExpression,
        T::Exclamation => S::LogicalNotExpression,
        T::PlusPlus => S::PreIncrementExpression,
        T::MinusMinus => S::PreDecrementExpression,
        T::Caret => S::IndexExpression,
        _ => return None,
    })
}

pub fn postfix_unary_op(kind: TokenKind) -> Option<SyntaxKind> {
    use SyntaxKind as S;
    use TokenKind as T;
    Some(match kind {
        T::PlusPlus => S::PostIncrementExpression,
        T::MinusMinus => S::PostDecrementExpression,
        _ => return None,
    })
}

pub fn is_right_associative(kind: SyntaxKind) -> bool {
    use SyntaxKind::*;
    matches!(
        kind,
        SimpleAssignmentExpression
            | AddAssignmentExpression
            | SubtractAssignmentExpression
            | MultiplyAssignmentExpression
            | DivideAssignmentExpression
            | ModuloAssignmentExpression
            | AndAssignmentExpression
            | ExclusiveOrAssignmentExpression
            | OrAssignmentExpression
            | LeftShiftAssignmentExpression
            | RightShiftAssignmentExpression
            | UnsignedRightShiftAssignmentExpression
            | CoalesceAssignmentExpression
            | CoalesceExpression
    )
}

/// Tokens that rule out the cast reading of `(T)x`. After a closing paren
/// that might end a cast, the next token decides: anything that can begin
/// a term keeps the cast, these do not.
pub fn can_follow_cast(kind: TokenKind) -> bool {
    use TokenKind::*;
    !matches!(
        kind,
        EndOfFile
            | Semicolon
            | CloseParen
            | CloseBracket
            | CloseBrace
            | OpenBrace
            | Comma
            | Colon
            | Question
            | QuestionQuestion
            | FatArrow
            | Equals
            | PlusEquals
            | MinusEquals
            | AsteriskEquals
            | SlashEquals
            | PercentEquals
            | AmpersandEquals
            | CaretEquals
            | BarEquals
            | LessThanLessThanEquals
            | GreaterThanGreaterThanEquals
            | GreaterThanGreaterThanGreaterThanEquals
            | QuestionQuestionEquals
            | EqualsEquals
            | ExclamationEquals
            | LessThan
            | LessThanEquals
            | GreaterThan
            | GreaterThanEquals
            | Asterisk
            | Slash
            | Percent
            | PlusPlus
            | MinusMinus
            | Ampersand
            | AmpersandAmpersand
            | Bar
            | BarBar
            | Caret
            | Dot
            | DotDot
            | OpenBracket
            | IsKeyword
            | AsKeyword
            | SwitchKeyword
            | InKeyword
    )
}

/// Can `kind` begin an expression term? Used by recovery predicates and
/// the invalid-sub-expression check.
pub fn can_start_expression(kind: TokenKind) -> bool {
    use TokenKind::*;
    is_predefined_type(kind)
        || matches!(
            kind,
            Identifier
                | NumericLiteral
                | StringLiteralStart
                | StringLiteralEmpty
                | RawStringLiteralStart
                | CharLiteralStart
                | TrueKeyword
                | FalseKeyword
                | NullKeyword
                | DefaultKeyword
                | TypeofKeyword
                | NewKeyword
                | ThisKeyword
                | BaseKeyword
                | RefKeyword
                | OutKeyword
                | VarKeyword
                | ThrowKeyword
                | OpenParen
                | OpenBracket
                | Plus
                | Minus
                | Tilde
                | Exclamation
                | PlusPlus
                | MinusMinus
                | DotDot
                | Underscore
        )
}

/// Can `kind` begin a statement? Drives statement-list recovery.
pub fn can_start_statement(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        OpenBrace
            | Semicolon
            | IfKeyword
            | WhileKeyword
            | DoKeyword
            | ForKeyword
            | ForEachKeyword
            | SwitchKeyword
            | TryKeyword
            | BreakKeyword
            | ContinueKeyword
            | ReturnKeyword
            | ThrowKeyword
            | GotoKeyword
            | UsingKeyword
            | ConstKeyword
            | VarKeyword
            | RefKeyword
    ) || can_start_expression(kind)
}

pub fn is_modifier(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        PublicKeyword
            | PrivateKeyword
            | ProtectedKeyword
            | InternalKeyword
            | StaticKeyword
            | ReadOnlyKeyword
            | SealedKeyword
            | ConstKeyword
            | OverrideKeyword
            | AbstractKeyword
            | VirtualKeyword
            | ExternKeyword
            | ExportKeyword
            | ImplicitKeyword
            | RefKeyword
    )
}

/// Can `kind` begin a type? (Conservative; `scan_type` gives the real
/// answer.)
pub fn can_start_type(kind: TokenKind) -> bool {
    use TokenKind::*;
    is_predefined_type(kind)
        || matches!(kind, Identifier | OpenParen | RefKeyword | ReadOnlyKeyword | TupleKeyword)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup() {
        assert_eq!(keyword_from_str("foreach"), Some(TokenKind::ForEachKeyword));
        assert_eq!(keyword_from_str("float3"), Some(TokenKind::Float3Keyword));
        assert_eq!(keyword_from_str("forEach"), None);
        assert_eq!(keyword_from_str("where"), None);
        assert_eq!(contextual_from_str("where"), Some(TokenKind::WhereKeyword));
    }

    #[test]
    fn precedence_ladder_is_ordered() {
        assert!(Precedence::Expression < Precedence::Conditional);
        assert!(Precedence::Coalescing < Precedence::ConditionalOr);
        assert!(Precedence::Equality < Precedence::Relational);
        assert!(Precedence::Shift < Precedence::Additive);
        assert!(Precedence::Additive < Precedence::Multiplicative);
        assert!(Precedence::Range < Precedence::Unary);
        assert!(Precedence::Cast < Precedence::Primary);
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let (_, add) = binary_op(TokenKind::Plus).unwrap();
        let (_, mul) = binary_op(TokenKind::Asterisk).unwrap();
        assert!(mul > add);
    }

    #[test]
    fn coalesce_is_right_associative() {
        let (kind, _) = binary_op(TokenKind::QuestionQuestion).unwrap();
        assert!(is_right_associative(kind));
        let (kind, _) = binary_op(TokenKind::Plus).unwrap();
        assert!(!is_right_associative(kind));
    }

    #[test]
    fn cast_follow_set() {
        assert!(can_follow_cast(TokenKind::Identifier));
        assert!(can_follow_cast(TokenKind::NumericLiteral));
        assert!(can_follow_cast(TokenKind::OpenParen));
        assert!(!can_follow_cast(TokenKind::Semicolon));
        assert!(!can_follow_cast(TokenKind::Asterisk));
    }
}
