//! Token kinds and the compact token record.
//!
//! The tokenizer is total: every byte of the input belongs to exactly one
//! token, including whitespace, newlines and comments (the trivia kinds).
//! Tokens do not store their text; `texts[token.id]` in the tokenizer
//! result holds the source slice for each token.

/// Every kind of token the tokenizer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenKind {
    /// Absence of a token; also the contextual kind of most tokens.
    None,
    /// End of file marker, always the last token.
    EndOfFile,
    /// A character (or run of characters) no rule matched.
    Invalid,

    Identifier,
    /// `_` alone; a discard in patterns and designations.
    Underscore,
    NumericLiteral,

    // Keywords: primitive types
    BoolKeyword,
    ByteKeyword,
    SByteKeyword,
    ShortKeyword,
    UShortKeyword,
    IntKeyword,
    UIntKeyword,
    LongKeyword,
    ULongKeyword,
    FloatKeyword,
    DoubleKeyword,
    StringKeyword,
    CharKeyword,
    VoidKeyword,
    ObjectKeyword,
    DynamicKeyword,
    TupleKeyword,
    // Vector / color primitives
    Int2Keyword,
    Int3Keyword,
    Int4Keyword,
    Uint2Keyword,
    Uint3Keyword,
    Uint4Keyword,
    Float2Keyword,
    Float3Keyword,
    Float4Keyword,
    Color8Keyword,
    Color16Keyword,
    Color32Keyword,

    // Keywords: literals
    NullKeyword,
    TrueKeyword,
    FalseKeyword,

    // Keywords: expressions and statements
    TypeofKeyword,
    NewKeyword,
    ThisKeyword,
    BaseKeyword,
    IsKeyword,
    AsKeyword,
    InKeyword,
    IfKeyword,
    ElseKeyword,
    WhileKeyword,
    ForKeyword,
    ForEachKeyword,
    DoKeyword,
    SwitchKeyword,
    CaseKeyword,
    DefaultKeyword,
    TryKeyword,
    CatchKeyword,
    FinallyKeyword,
    BreakKeyword,
    ContinueKeyword,
    ReturnKeyword,
    ThrowKeyword,
    YieldKeyword,
    GotoKeyword,
    UsingKeyword,
    VarKeyword,

    // Keywords: declarations and modifiers
    NamespaceKeyword,
    ClassKeyword,
    StructKeyword,
    InterfaceKeyword,
    EnumKeyword,
    DelegateKeyword,
    ConstructorKeyword,
    ExportKeyword,
    PublicKeyword,
    PrivateKeyword,
    ProtectedKeyword,
    InternalKeyword,
    StaticKeyword,
    ReadOnlyKeyword,
    SealedKeyword,
    ConstKeyword,
    OverrideKeyword,
    AbstractKeyword,
    VirtualKeyword,
    ExternKeyword,
    ImplicitKeyword,
    RefKeyword,
    OutKeyword,
    ParamsKeyword,
    OperatorKeyword,

    // Contextual keywords. Tokenized as `Identifier` with the contextual
    // kind set; the parser decides where they act as keywords.
    GetKeyword,
    SetKeyword,
    InitKeyword,
    WhereKeyword,
    WhenKeyword,
    OrKeyword,
    AndKeyword,
    NotKeyword,
    WithKeyword,
    RequiredKeyword,
    FromKeyword,

    // Punctuation
    Dot,
    DotDot,
    DotDotDot,
    Comma,
    Colon,
    ColonColon,
    Semicolon,
    Question,
    QuestionQuestion,
    QuestionQuestionEquals,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Tilde,
    Exclamation,
    ExclamationEquals,
    Equals,
    EqualsEquals,
    /// `=>`
    FatArrow,
    /// `->`
    ThinArrow,
    Plus,
    PlusPlus,
    PlusEquals,
    Minus,
    MinusMinus,
    MinusEquals,
    Asterisk,
    AsteriskEquals,
    Slash,
    SlashEquals,
    Percent,
    PercentEquals,
    Ampersand,
    AmpersandAmpersand,
    AmpersandEquals,
    Bar,
    BarBar,
    BarEquals,
    Caret,
    CaretEquals,
    LessThan,
    LessThanEquals,
    LessThanLessThan,
    LessThanLessThanEquals,
    GreaterThan,
    GreaterThanEquals,
    GreaterThanGreaterThan,
    GreaterThanGreaterThanEquals,
    GreaterThanGreaterThanGreaterThan,
    GreaterThanGreaterThanGreaterThanEquals,
    Dollar,
    Hash,
    Backslash,
    /// Zero-width placeholder for an omitted array size, as in `int[,]`.
    OmittedArraySize,

    // String and char literal pieces. A string literal is a run of these
    // tokens so interpolations can nest full expressions.
    StringLiteralEmpty,
    StringLiteralStart,
    StringLiteralPart,
    StringLiteralEnd,
    RawStringLiteralStart,
    RawStringLiteralEnd,
    /// `$ident` inside a string.
    InterpolatedIdentifier,
    /// `${` opening a full interpolated expression.
    InterpolatedExpressionStart,
    /// `}` closing an interpolated expression.
    InterpolatedExpressionEnd,
    CharLiteralStart,
    CharLiteralContent,
    CharLiteralEnd,

    // Trivia
    Whitespace,
    NewLine,
    SingleLineComment,
    MultiLineComment,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::NewLine
                | TokenKind::SingleLineComment
                | TokenKind::MultiLineComment
        )
    }

    pub fn is_contextual_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::GetKeyword
                | TokenKind::SetKeyword
                | TokenKind::InitKeyword
                | TokenKind::WhereKeyword
                | TokenKind::WhenKeyword
                | TokenKind::OrKeyword
                | TokenKind::AndKeyword
                | TokenKind::NotKeyword
                | TokenKind::WithKeyword
                | TokenKind::RequiredKeyword
                | TokenKind::FromKeyword
        )
    }

    pub fn is_reserved_keyword(self) -> bool {
        // The keyword block is contiguous between these two variants.
        (self as u8) >= (TokenKind::BoolKeyword as u8)
            && (self as u8) <= (TokenKind::OperatorKeyword as u8)
    }
}

/// Per-token flag bits. A plain field on [`SyntaxToken`], not packed into
/// the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenFlags(u8);

impl TokenFlags {
    pub const NONE: TokenFlags = TokenFlags(0);
    /// The token or its literal value is malformed; a diagnostic exists.
    pub const ERROR: TokenFlags = TokenFlags(1 << 0);
    /// Trivia tokens precede this token on the same logical position.
    pub const LEADING_TRIVIA: TokenFlags = TokenFlags(1 << 1);
    /// Trivia tokens follow this token before the next real one.
    pub const TRAILING_TRIVIA: TokenFlags = TokenFlags(1 << 2);
    /// Synthesized by the parser; zero-width, not present in the source.
    pub const MISSING: TokenFlags = TokenFlags(1 << 3);
    /// Present in the source but skipped over by error recovery.
    pub const SKIPPED: TokenFlags = TokenFlags(1 << 4);
    /// Grammar position deliberately left empty (omitted array sizes).
    pub const OMITTED: TokenFlags = TokenFlags(1 << 5);

    pub const fn contains(self, other: TokenFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: TokenFlags) -> TokenFlags {
        TokenFlags(self.0 | other.0)
    }

    pub fn insert(&mut self, other: TokenFlags) {
        self.0 |= other.0;
    }

    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl std::ops::BitOr for TokenFlags {
    type Output = TokenFlags;
    fn bitor(self, rhs: TokenFlags) -> TokenFlags {
        self.union(rhs)
    }
}

/// Classified value of a numeric literal, fixed at scan time. The type
/// comes from the suffix (`u`, `l`, `ul`, `f`, `d` in either case); an
/// unsuffixed integer takes the smallest of int32, uint32, int64, uint64
/// its value fits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralValue {
    /// Not a numeric literal, or one whose value did not scan cleanly.
    None,
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float(f32),
    Double(f64),
}

/// A single token. Small and `Copy`; the text lives in the texts table
/// under this token's id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxToken {
    pub kind: TokenKind,
    /// For identifiers that spell a contextual keyword, the keyword kind;
    /// otherwise `TokenKind::None`.
    pub contextual_kind: TokenKind,
    /// Text length in bytes, saturated at `u16::MAX`; the texts table is
    /// authoritative.
    pub text_len: u16,
    /// Index into the token array and the texts table.
    pub id: u32,
    pub flags: TokenFlags,
}

impl SyntaxToken {
    pub fn new(kind: TokenKind, contextual_kind: TokenKind, text_len: usize, id: u32) -> Self {
        SyntaxToken {
            kind,
            contextual_kind,
            text_len: text_len.min(u16::MAX as usize) as u16,
            id,
            flags: TokenFlags::NONE,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.flags.contains(TokenFlags::MISSING)
    }

    pub fn is_skipped(&self) -> bool {
        self.flags.contains(TokenFlags::SKIPPED)
    }

    /// True when the identifier spells the given contextual keyword.
    pub fn is_contextual(&self, kind: TokenKind) -> bool {
        self.kind == TokenKind::Identifier && self.contextual_kind == kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_independent_bits() {
        let mut f = TokenFlags::NONE;
        f.insert(TokenFlags::MISSING);
        f.insert(TokenFlags::ERROR);
        assert!(f.contains(TokenFlags::MISSING));
        assert!(f.contains(TokenFlags::ERROR));
        assert!(!f.contains(TokenFlags::SKIPPED));
    }

    #[test]
    fn trivia_classification() {
        assert!(TokenKind::Whitespace.is_trivia());
        assert!(TokenKind::MultiLineComment.is_trivia());
        assert!(!TokenKind::Identifier.is_trivia());
        assert!(!TokenKind::EndOfFile.is_trivia());
    }

    #[test]
    fn contextual_check_requires_identifier() {
        let tok = SyntaxToken::new(TokenKind::Identifier, TokenKind::WhereKeyword, 5, 0);
        assert!(tok.is_contextual(TokenKind::WhereKeyword));
        let kw = SyntaxToken::new(TokenKind::ClassKeyword, TokenKind::None, 5, 1);
        assert!(!kw.is_contextual(TokenKind::WhereKeyword));
    }
}
