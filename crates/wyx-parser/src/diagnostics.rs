//! Per-file diagnostics.
//!
//! Lexical and syntactic errors never abort a parse; they append here and
//! the front end recovers locally. Internal invariant violations are the
//! only fatal class and they assert instead.

use std::fmt;

use crate::span::Span;
use crate::token::TokenKind;

/// Stable diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    IllegalEscape,
    OpenEndedComment,
    UnexpectedCharacter,
    TooManyBadTokens,
    UnterminatedString,
    UnterminatedChar,
    InvalidReal,
    InvalidNumber,
    IntOverflow,

    IdentifierExpected,
    IdentifierExpectedKeyword,
    SemicolonExpected,
    CloseParenExpected,
    OpenBraceExpected,
    CloseBraceExpected,
    TokenExpected(TokenKind),
    SyntaxError,
    ValueExpected,
    TypeExpected,
    NoVoidHere,
    NoVoidParameter,
    BadNewExpression,
    TupleTooFewElements,
    InvalidMemberDeclaration,
    DuplicateModifier,
}

impl ErrorCode {
    pub fn message(&self) -> String {
        use ErrorCode::*;
        match self {
            IllegalEscape => "unrecognized escape sequence".to_string(),
            OpenEndedComment => "end-of-file found, '*/' expected".to_string(),
            UnexpectedCharacter => "unexpected character in input".to_string(),
            TooManyBadTokens => {
                "too many unrecognized characters; giving up on the rest of the file".to_string()
            }
            UnterminatedString => "unterminated string literal".to_string(),
            UnterminatedChar => "unterminated character literal".to_string(),
            InvalidReal => "invalid real literal".to_string(),
            InvalidNumber => "invalid number".to_string(),
            IntOverflow => "integral constant is too large".to_string(),
            IdentifierExpected => "identifier expected".to_string(),
            IdentifierExpectedKeyword => {
                "identifier expected; keyword cannot be used here".to_string()
            }
            SemicolonExpected => "; expected".to_string(),
            CloseParenExpected => ") expected".to_string(),
            OpenBraceExpected => "{ expected".to_string(),
            CloseBraceExpected => "} expected".to_string(),
            TokenExpected(kind) => format!("{kind:?} expected"),
            SyntaxError => "syntax error".to_string(),
            ValueExpected => "expression expected".to_string(),
            TypeExpected => "type expected".to_string(),
            NoVoidHere => "'void' cannot be used here".to_string(),
            NoVoidParameter => "parameters cannot be of type 'void'".to_string(),
            BadNewExpression => "a new expression requires an argument list or initializer".to_string(),
            TupleTooFewElements => "a tuple must contain at least two elements".to_string(),
            InvalidMemberDeclaration => "invalid token in a member declaration".to_string(),
            DuplicateModifier => "duplicate modifier".to_string(),
        }
    }

    /// Stable short name, used as the `error[...]` tag in CLI output.
    pub fn name(&self) -> &'static str {
        use ErrorCode::*;
        match self {
            IllegalEscape => "IllegalEscape",
            OpenEndedComment => "OpenEndedComment",
            UnexpectedCharacter => "UnexpectedCharacter",
            TooManyBadTokens => "TooManyBadTokens",
            UnterminatedString => "UnterminatedString",
            UnterminatedChar => "UnterminatedChar",
            InvalidReal => "InvalidReal",
            InvalidNumber => "InvalidNumber",
            IntOverflow => "IntOverflow",
            IdentifierExpected => "IdentifierExpected",
            IdentifierExpectedKeyword => "IdentifierExpectedKeyword",
            SemicolonExpected => "SemicolonExpected",
            CloseParenExpected => "CloseParenExpected",
            OpenBraceExpected => "OpenBraceExpected",
            CloseBraceExpected => "CloseBraceExpected",
            TokenExpected(_) => "TokenExpected",
            SyntaxError => "SyntaxError",
            ValueExpected => "ValueExpected",
            TypeExpected => "TypeExpected",
            NoVoidHere => "NoVoidHere",
            NoVoidParameter => "NoVoidParameter",
            BadNewExpression => "BadNewExpression",
            TupleTooFewElements => "TupleTooFewElements",
            InvalidMemberDeclaration => "InvalidMemberDeclaration",
            DuplicateModifier => "DuplicateModifier",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub span: Span,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error at {}..{}: {}", self.span.start, self.span.end, self.code.message())
    }
}

/// Append-only list of diagnostics for one file.
#[derive(Debug, Default)]
pub struct Diagnostics {
    list: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics { list: Vec::new() }
    }

    pub fn add(&mut self, code: ErrorCode, span: Span) {
        self.list.push(Diagnostic { code, span });
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.list.iter()
    }

    pub fn clear(&mut self) {
        self.list.clear();
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_iterate() {
        let mut diags = Diagnostics::new();
        diags.add(ErrorCode::SemicolonExpected, Span::new(3, 4));
        diags.add(ErrorCode::TypeExpected, Span::empty(9));
        assert_eq!(diags.len(), 2);
        let codes: Vec<_> = diags.iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![ErrorCode::SemicolonExpected, ErrorCode::TypeExpected]);
    }

    #[test]
    fn expected_token_message_names_the_kind() {
        let msg = ErrorCode::TokenExpected(TokenKind::CloseBracket).message();
        assert!(msg.contains("CloseBracket"));
    }
}
