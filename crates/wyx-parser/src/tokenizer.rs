//! The tokenizer: source text to a flat token array plus a texts table.
//!
//! Total and non-aborting. Trivia (whitespace, newlines, comments) are
//! ordinary tokens, so concatenating `texts[0..n]` reproduces the input
//! byte for byte. String literals tokenize as runs of start/part/end
//! tokens so interpolated expressions can hold arbitrary nested syntax.

use crate::arena::{Arena, Vec as ArenaVec};
use crate::diagnostics::{Diagnostics, ErrorCode};
use crate::facts;
use crate::scanning;
use crate::span::Span;
use crate::text_window::TextWindow;
use crate::token::{LiteralValue, SyntaxToken, TokenFlags, TokenKind};

/// Stop producing per-character diagnostics after this many bad tokens;
/// the remainder of the file becomes a single invalid token.
const MAX_BAD_TOKENS: u32 = 200;

pub struct TokenizerResult<'a> {
    pub tokens: ArenaVec<'a, SyntaxToken>,
    /// `texts[token.id]` is the token's source text.
    pub texts: ArenaVec<'a, &'a str>,
    /// `offsets[token.id]` is the token's start byte offset.
    pub offsets: ArenaVec<'a, u32>,
    /// `values[token.id]` is a numeric literal's classified value;
    /// `LiteralValue::None` for every other token.
    pub values: ArenaVec<'a, LiteralValue>,
}

impl<'a> TokenizerResult<'a> {
    pub fn span_of(&self, id: u32) -> Span {
        let start = self.offsets[id as usize];
        Span::new(start, start + self.texts[id as usize].len() as u32)
    }
}

/// Tokenizes `text`, which must outlive the arena-backed result (the
/// caller normally copies the source into the same arena first).
pub fn tokenize<'a>(
    text: &'a str,
    diagnostics: &mut Diagnostics,
    arena: &'a Arena,
) -> TokenizerResult<'a> {
    let mut tokenizer = Tokenizer {
        window: TextWindow::new(text),
        diagnostics,
        tokens: arena.vec(),
        texts: arena.vec(),
        offsets: arena.vec(),
        values: arena.vec(),
        modes: Vec::new(),
        bad_token_count: 0,
    };
    tokenizer.run();
    let mut result = TokenizerResult {
        tokens: tokenizer.tokens,
        texts: tokenizer.texts,
        offsets: tokenizer.offsets,
        values: tokenizer.values,
    };
    mark_trivia_adjacency(&mut result.tokens);
    result
}

/// What the cursor is inside of, innermost last.
enum Mode {
    String,
    RawString,
    /// Inside `${ … }`; tracks nested braces so the right `}` closes it.
    Interpolation { braces: u32 },
}

struct Tokenizer<'a, 'd> {
    window: TextWindow<'a>,
    diagnostics: &'d mut Diagnostics,
    tokens: ArenaVec<'a, SyntaxToken>,
    texts: ArenaVec<'a, &'a str>,
    offsets: ArenaVec<'a, u32>,
    values: ArenaVec<'a, LiteralValue>,
    modes: Vec<Mode>,
    bad_token_count: u32,
}

impl<'a, 'd> Tokenizer<'a, 'd> {
    fn run(&mut self) {
        while self.window.has_more_content() {
            match self.modes.last() {
                Some(Mode::String) => self.scan_string_piece(),
                Some(Mode::RawString) => self.scan_raw_string_piece(),
                _ => self.scan_token(),
            }
        }
        let pos = self.window.position();
        self.emit_at(TokenKind::EndOfFile, pos);
    }

    fn emit_at(&mut self, kind: TokenKind, start: usize) -> u32 {
        self.emit_full(kind, TokenKind::None, TokenFlags::NONE, start)
    }

    fn emit_full(
        &mut self,
        kind: TokenKind,
        contextual: TokenKind,
        flags: TokenFlags,
        start: usize,
    ) -> u32 {
        let end = self.window.position();
        let id = self.tokens.len() as u32;
        let text = self.window.slice(start, end);
        let mut token = SyntaxToken::new(kind, contextual, text.len(), id);
        token.flags = flags;
        self.tokens.push(token);
        self.texts.push(text);
        self.offsets.push(start as u32);
        self.values.push(LiteralValue::None);
        id
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start as u32, self.window.position() as u32)
    }

    // ========================================================================
    // Normal mode
    // ========================================================================

    fn scan_token(&mut self) {
        use TokenKind::*;
        let start = self.window.position();
        let w = &mut self.window;

        match w.peek() {
            b' ' | b'\t' | 0x0B | 0x0C => {
                scanning::scan_whitespace(w);
                self.emit_at(Whitespace, start);
            }
            b'\r' | b'\n' => {
                scanning::scan_newline(w);
                self.emit_at(NewLine, start);
            }
            b'/' => match w.peek_ahead(1) {
                b'/' => {
                    scanning::scan_single_line_comment(w);
                    self.emit_at(SingleLineComment, start);
                }
                b'*' => {
                    scanning::scan_multi_line_comment(w, self.diagnostics);
                    self.emit_at(MultiLineComment, start);
                }
                b'=' => {
                    w.advance(2);
                    self.emit_at(SlashEquals, start);
                }
                _ => {
                    w.advance(1);
                    self.emit_at(Slash, start);
                }
            },
            b'0'..=b'9' => {
                let (ok, value) = scanning::scan_numeric_literal(w, self.diagnostics);
                let flags = if ok { TokenFlags::NONE } else { TokenFlags::ERROR };
                let id = self.emit_full(NumericLiteral, TokenKind::None, flags, start);
                self.values[id as usize] = value;
            }
            b'"' => self.scan_string_start(),
            b'\'' => self.scan_char_literal(),
            b'.' => {
                w.advance(1);
                let kind = if w.try_advance(b'.') {
                    if w.try_advance(b'.') {
                        DotDotDot
                    } else {
                        DotDot
                    }
                } else {
                    Dot
                };
                self.emit_at(kind, start);
            }
            b',' => {
                w.advance(1);
                self.emit_at(Comma, start);
            }
            b':' => {
                w.advance(1);
                let kind = if w.try_advance(b':') { ColonColon } else { Colon };
                self.emit_at(kind, start);
            }
            b';' => {
                w.advance(1);
                self.emit_at(Semicolon, start);
            }
            b'~' => {
                w.advance(1);
                self.emit_at(Tilde, start);
            }
            b'!' => {
                w.advance(1);
                let kind = if w.try_advance(b'=') { ExclamationEquals } else { Exclamation };
                self.emit_at(kind, start);
            }
            b'=' => {
                w.advance(1);
                let kind = if w.try_advance(b'=') {
                    EqualsEquals
                } else if w.try_advance(b'>') {
                    FatArrow
                } else {
                    Equals
                };
                self.emit_at(kind, start);
            }
            b'*' => {
                w.advance(1);
                let kind = if w.try_advance(b'=') { AsteriskEquals } else { Asterisk };
                self.emit_at(kind, start);
            }
            b'(' => {
                w.advance(1);
                self.emit_at(OpenParen, start);
            }
            b')' => {
                w.advance(1);
                self.emit_at(CloseParen, start);
            }
            b'{' => {
                w.advance(1);
                if let Some(Mode::Interpolation { braces }) = self.modes.last_mut() {
                    *braces += 1;
                }
                self.emit_at(OpenBrace, start);
            }
            b'}' => {
                w.advance(1);
                match self.modes.last_mut() {
                    Some(Mode::Interpolation { braces: 0 }) => {
                        self.modes.pop();
                        self.emit_at(InterpolatedExpressionEnd, start);
                    }
                    Some(Mode::Interpolation { braces }) => {
                        *braces -= 1;
                        self.emit_at(CloseBrace, start);
                    }
                    _ => {
                        self.emit_at(CloseBrace, start);
                    }
                }
            }
            b'[' => {
                w.advance(1);
                self.emit_at(OpenBracket, start);
            }
            b']' => {
                w.advance(1);
                self.emit_at(CloseBracket, start);
            }
            b'?' => {
                w.advance(1);
                let kind = if w.try_advance(b'?') {
                    if w.try_advance(b'=') {
                        QuestionQuestionEquals
                    } else {
                        QuestionQuestion
                    }
                } else {
                    Question
                };
                self.emit_at(kind, start);
            }
            b'+' => {
                w.advance(1);
                let kind = if w.try_advance(b'+') {
                    PlusPlus
                } else if w.try_advance(b'=') {
                    PlusEquals
                } else {
                    Plus
                };
                self.emit_at(kind, start);
            }
            b'-' => {
                w.advance(1);
                let kind = if w.try_advance(b'-') {
                    MinusMinus
                } else if w.try_advance(b'=') {
                    MinusEquals
                } else if w.try_advance(b'>') {
                    ThinArrow
                } else {
                    Minus
                };
                self.emit_at(kind, start);
            }
            b'%' => {
                w.advance(1);
                let kind = if w.try_advance(b'=') { PercentEquals } else { Percent };
                self.emit_at(kind, start);
            }
            b'&' => {
                w.advance(1);
                let kind = if w.try_advance(b'&') {
                    AmpersandAmpersand
                } else if w.try_advance(b'=') {
                    AmpersandEquals
                } else {
                    Ampersand
                };
                self.emit_at(kind, start);
            }
            b'|' => {
                w.advance(1);
                let kind = if w.try_advance(b'|') {
                    BarBar
                } else if w.try_advance(b'=') {
                    BarEquals
                } else {
                    Bar
                };
                self.emit_at(kind, start);
            }
            b'^' => {
                w.advance(1);
                let kind = if w.try_advance(b'=') { CaretEquals } else { Caret };
                self.emit_at(kind, start);
            }
            b'<' => {
                w.advance(1);
                let kind = if w.try_advance(b'=') {
                    LessThanEquals
                } else if w.try_advance(b'<') {
                    if w.try_advance(b'=') {
                        LessThanLessThanEquals
                    } else {
                        LessThanLessThan
                    }
                } else {
                    LessThan
                };
                self.emit_at(kind, start);
            }
            // `>` never merges here; the parser joins adjacent tokens into
            // shifts so `List<List<int>>` closes two argument lists.
            b'>' => {
                w.advance(1);
                let kind = if w.try_advance(b'=') { GreaterThanEquals } else { GreaterThan };
                self.emit_at(kind, start);
            }
            b'$' => {
                w.advance(1);
                self.emit_at(Dollar, start);
            }
            b'#' => {
                w.advance(1);
                self.emit_at(Hash, start);
            }
            b'\\' => {
                w.advance(1);
                self.emit_at(Backslash, start);
            }
            _ => self.scan_identifier_or_bad_token(),
        }
    }

    fn scan_identifier_or_bad_token(&mut self) {
        let start = self.window.position();
        if let Some(text) = scanning::scan_identifier(&mut self.window) {
            if text == "_" {
                self.emit_at(TokenKind::Underscore, start);
            } else if let Some(kw) = facts::keyword_from_str(text) {
                self.emit_at(kw, start);
            } else {
                let contextual = facts::contextual_from_str(text).unwrap_or(TokenKind::None);
                self.emit_full(TokenKind::Identifier, contextual, TokenFlags::NONE, start);
            }
            return;
        }

        // Whitespace outside ASCII also lands here from the dispatch.
        let (c, width) = self.window.peek_char32();
        if scanning::is_newline_char(c) {
            scanning::scan_newline(&mut self.window);
            self.emit_at(TokenKind::NewLine, start);
            return;
        }
        if c.is_whitespace() {
            scanning::scan_whitespace(&mut self.window);
            self.emit_at(TokenKind::Whitespace, start);
            return;
        }

        self.bad_token_count += 1;
        if self.bad_token_count >= MAX_BAD_TOKENS {
            // Pathological input; swallow the rest of the file as one token
            // so tokenizing stays linear.
            let len = self.window.text().len();
            self.window.seek(len);
            self.diagnostics.add(ErrorCode::TooManyBadTokens, self.span_from(start));
        } else {
            self.window.advance(width);
            self.diagnostics.add(ErrorCode::UnexpectedCharacter, self.span_from(start));
        }
        self.emit_full(TokenKind::Invalid, TokenKind::None, TokenFlags::ERROR, start);
    }

    // ========================================================================
    // Strings and chars
    // ========================================================================

    fn scan_string_start(&mut self) {
        let start = self.window.position();
        if self.window.peek_ahead(1) == b'"' && self.window.peek_ahead(2) == b'"' {
            self.window.advance(3);
            self.emit_at(TokenKind::RawStringLiteralStart, start);
            self.modes.push(Mode::RawString);
        } else if self.window.peek_ahead(1) == b'"' {
            self.window.advance(2);
            self.emit_at(TokenKind::StringLiteralEmpty, start);
        } else {
            self.window.advance(1);
            self.emit_at(TokenKind::StringLiteralStart, start);
            self.modes.push(Mode::String);
        }
    }

    /// One piece of a `"…"` literal: the closing quote, an interpolation,
    /// or a literal part up to whichever comes first.
    fn scan_string_piece(&mut self) {
        let start = self.window.position();
        match self.window.peek() {
            b'"' => {
                self.window.advance(1);
                self.emit_at(TokenKind::StringLiteralEnd, start);
                self.modes.pop();
                return;
            }
            b'$' => {
                let next = self.window.peek_ahead(1);
                if next == b'{' {
                    self.window.advance(2);
                    self.emit_at(TokenKind::InterpolatedExpressionStart, start);
                    self.modes.push(Mode::Interpolation { braces: 0 });
                    return;
                }
                if next == b'_' || next.is_ascii_alphabetic() || next >= 0x80 {
                    self.window.advance(1);
                    if scanning::scan_identifier(&mut self.window).is_some() {
                        self.emit_at(TokenKind::InterpolatedIdentifier, start);
                        return;
                    }
                    // lone `$`: fold it into the literal part below
                    self.window.seek(start);
                }
            }
            _ => {}
        }

        // Literal part: runs to the quote, the next interpolation, or the
        // end of the line.
        loop {
            if !self.window.has_more_content() {
                self.diagnostics.add(ErrorCode::UnterminatedString, self.span_from(start));
                self.modes.pop();
                break;
            }
            match self.window.peek() {
                b'"' => break,
                b'$' => {
                    let next = self.window.peek_ahead(1);
                    if next == b'{' || next == b'_' || next.is_ascii_alphabetic() || next >= 0x80 {
                        break;
                    }
                    self.window.advance(1);
                }
                b'\\' => scanning::scan_escape_sequence(&mut self.window, self.diagnostics),
                b'\r' | b'\n' => {
                    self.diagnostics.add(ErrorCode::UnterminatedString, self.span_from(start));
                    self.modes.pop();
                    break;
                }
                b if b >= 0x80 => {
                    let (c, width) = self.window.peek_char32();
                    if scanning::is_newline_char(c) {
                        self.diagnostics.add(ErrorCode::UnterminatedString, self.span_from(start));
                        self.modes.pop();
                        break;
                    }
                    self.window.advance(width);
                }
                _ => self.window.advance(1),
            }
        }
        if self.window.position() > start {
            self.emit_at(TokenKind::StringLiteralPart, start);
        }
    }

    /// Raw strings run to the next `"""`, newlines included, no escapes.
    fn scan_raw_string_piece(&mut self) {
        let start = self.window.position();
        loop {
            if !self.window.has_more_content() {
                self.diagnostics.add(ErrorCode::UnterminatedString, self.span_from(start));
                self.modes.pop();
                if self.window.position() > start {
                    self.emit_at(TokenKind::StringLiteralPart, start);
                }
                return;
            }
            if self.window.peek() == b'"'
                && self.window.peek_ahead(1) == b'"'
                && self.window.peek_ahead(2) == b'"'
            {
                if self.window.position() > start {
                    self.emit_at(TokenKind::StringLiteralPart, start);
                }
                let end_start = self.window.position();
                self.window.advance(3);
                self.emit_at(TokenKind::RawStringLiteralEnd, end_start);
                self.modes.pop();
                return;
            }
            self.window.advance(1);
        }
    }

    fn scan_char_literal(&mut self) {
        let start = self.window.position();
        self.window.advance(1);
        self.emit_at(TokenKind::CharLiteralStart, start);

        let content_start = self.window.position();
        match self.window.peek() {
            b'\'' => {
                // empty literal: ''
                self.window.advance(1);
                self.emit_at(TokenKind::CharLiteralEnd, content_start);
                self.diagnostics.add(ErrorCode::ValueExpected, self.span_from(start));
                return;
            }
            b'\\' => scanning::scan_escape_sequence(&mut self.window, self.diagnostics),
            b'\r' | b'\n' | crate::text_window::EOF_BYTE => {
                self.diagnostics.add(ErrorCode::UnterminatedChar, self.span_from(start));
                return;
            }
            _ => {
                let (_, width) = self.window.peek_char32();
                self.window.advance(width);
            }
        }
        self.emit_at(TokenKind::CharLiteralContent, content_start);

        let end_start = self.window.position();
        if self.window.try_advance(b'\'') {
            self.emit_at(TokenKind::CharLiteralEnd, end_start);
        } else {
            self.diagnostics.add(ErrorCode::UnterminatedChar, self.span_from(start));
        }
    }
}

/// Sets LEADING/TRAILING trivia flags on non-trivia tokens from their
/// neighbors in the array.
fn mark_trivia_adjacency(tokens: &mut [SyntaxToken]) {
    for i in 0..tokens.len() {
        if tokens[i].kind.is_trivia() {
            continue;
        }
        if i > 0 && tokens[i - 1].kind.is_trivia() {
            tokens[i].flags.insert(TokenFlags::LEADING_TRIVIA);
        }
        if i + 1 < tokens.len() && tokens[i + 1].kind.is_trivia() {
            tokens[i].flags.insert(TokenFlags::TRAILING_TRIVIA);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let arena = Arena::new();
        let mut diags = Diagnostics::new();
        let result = tokenize(source, &mut diags, &arena);
        result.tokens.iter().map(|t| t.kind).collect()
    }

    fn roundtrip(source: &str) -> String {
        let arena = Arena::new();
        let mut diags = Diagnostics::new();
        let result = tokenize(source, &mut diags, &arena);
        result.texts.iter().copied().collect()
    }

    #[test]
    fn keywords_and_identifiers() {
        use TokenKind::*;
        assert_eq!(
            kinds("class Foo"),
            vec![ClassKeyword, Whitespace, Identifier, EndOfFile]
        );
    }

    #[test]
    fn contextual_keywords_stay_identifiers() {
        let arena = Arena::new();
        let mut diags = Diagnostics::new();
        let result = tokenize("where", &mut diags, &arena);
        assert_eq!(result.tokens[0].kind, TokenKind::Identifier);
        assert_eq!(result.tokens[0].contextual_kind, TokenKind::WhereKeyword);
    }

    #[test]
    fn compound_operators_munch_maximally() {
        use TokenKind::*;
        assert_eq!(kinds("??="), vec![QuestionQuestionEquals, EndOfFile]);
        assert_eq!(kinds("<<="), vec![LessThanLessThanEquals, EndOfFile]);
        assert_eq!(kinds("..."), vec![DotDotDot, EndOfFile]);
        assert_eq!(kinds("=>"), vec![FatArrow, EndOfFile]);
        assert_eq!(kinds("->"), vec![ThinArrow, EndOfFile]);
    }

    #[test]
    fn greater_than_never_merges() {
        use TokenKind::*;
        assert_eq!(kinds(">>"), vec![GreaterThan, GreaterThan, EndOfFile]);
        assert_eq!(kinds(">="), vec![GreaterThanEquals, EndOfFile]);
    }

    #[test]
    fn lossless_round_trip() {
        let sources = [
            "class C { int x = 1; }\n",
            "  // comment\n/* block */ x+=2;\r\n",
            "a?.b ?? c[1..2]",
            "\"hi $name and ${a + b}!\"",
            "'x' '\\n' \"\"\"raw \" text\"\"\"",
            "0xFF 1_000 2.5e-3f",
            "bad \u{0001} bytes",
        ];
        for src in sources {
            assert_eq!(roundtrip(src), *src, "round trip failed for {src:?}");
        }
    }

    #[test]
    fn tokenizer_never_aborts() {
        let arena = Arena::new();
        let mut diags = Diagnostics::new();
        let noise: String = ('\u{0000}'..'\u{0300}').filter(|c| *c != '\r').collect();
        let result = tokenize(&noise, &mut diags, &arena);
        assert_eq!(result.tokens.last().unwrap().kind, TokenKind::EndOfFile);
        let text: String = result.texts.iter().copied().collect();
        assert_eq!(text, noise);
    }

    #[test]
    fn interpolated_string_token_run() {
        use TokenKind::*;
        assert_eq!(
            kinds("\"a $b ${c}d\""),
            vec![
                StringLiteralStart,
                StringLiteralPart,
                InterpolatedIdentifier,
                StringLiteralPart,
                InterpolatedExpressionStart,
                Identifier,
                InterpolatedExpressionEnd,
                StringLiteralPart,
                StringLiteralEnd,
                EndOfFile,
            ]
        );
    }

    #[test]
    fn nested_braces_inside_interpolation() {
        use TokenKind::*;
        assert_eq!(
            kinds("\"${ new C { } }\""),
            vec![
                StringLiteralStart,
                InterpolatedExpressionStart,
                Whitespace,
                NewKeyword,
                Whitespace,
                Identifier,
                Whitespace,
                OpenBrace,
                Whitespace,
                CloseBrace,
                Whitespace,
                InterpolatedExpressionEnd,
                StringLiteralEnd,
                EndOfFile,
            ]
        );
    }

    #[test]
    fn empty_string_literal() {
        use TokenKind::*;
        assert_eq!(kinds("\"\""), vec![StringLiteralEmpty, EndOfFile]);
    }

    #[test]
    fn unterminated_string_at_newline() {
        let arena = Arena::new();
        let mut diags = Diagnostics::new();
        let result = tokenize("\"abc\nx", &mut diags, &arena);
        assert_eq!(diags.len(), 1);
        assert_eq!(result.tokens.last().unwrap().kind, TokenKind::EndOfFile);
        let text: String = result.texts.iter().copied().collect();
        assert_eq!(text, "\"abc\nx");
    }

    #[test]
    fn char_literal_tokens() {
        use TokenKind::*;
        assert_eq!(
            kinds("'a'"),
            vec![CharLiteralStart, CharLiteralContent, CharLiteralEnd, EndOfFile]
        );
        assert_eq!(
            kinds("'\\n'"),
            vec![CharLiteralStart, CharLiteralContent, CharLiteralEnd, EndOfFile]
        );
    }

    #[test]
    fn bad_token_cap_swallows_rest_of_file() {
        let arena = Arena::new();
        let mut diags = Diagnostics::new();
        let noise = "\u{0001}".repeat(500);
        let result = tokenize(&noise, &mut diags, &arena);
        // 199 per-character diagnostics, then one cap diagnostic
        assert_eq!(diags.len(), 200);
        assert!(diags.iter().any(|d| d.code == ErrorCode::TooManyBadTokens));
        assert_eq!(result.tokens.len(), 201);
        let text: String = result.texts.iter().copied().collect();
        assert_eq!(text, noise);
    }

    #[test]
    fn trivia_adjacency_flags() {
        let arena = Arena::new();
        let mut diags = Diagnostics::new();
        let result = tokenize("a b", &mut diags, &arena);
        let a = result.tokens[0];
        let b = result.tokens[2];
        assert!(a.flags.contains(TokenFlags::TRAILING_TRIVIA));
        assert!(!a.flags.contains(TokenFlags::LEADING_TRIVIA));
        assert!(b.flags.contains(TokenFlags::LEADING_TRIVIA));
    }

    #[test]
    fn token_ids_are_sequential() {
        let arena = Arena::new();
        let mut diags = Diagnostics::new();
        let result = tokenize("a + b", &mut diags, &arena);
        for (i, tok) in result.tokens.iter().enumerate() {
            assert_eq!(tok.id as usize, i);
        }
        assert_eq!(result.span_of(2), Span::new(2, 3));
    }

    #[test]
    fn numeric_literal_values_fill_the_values_table() {
        let arena = Arena::new();
        let mut diags = Diagnostics::new();
        let result = tokenize("x = 300 + 1.5f;", &mut diags, &arena);
        assert_eq!(result.values.len(), result.tokens.len());
        let numbers: Vec<_> = result
            .tokens
            .iter()
            .filter(|t| t.kind == TokenKind::NumericLiteral)
            .map(|t| result.values[t.id as usize])
            .collect();
        assert_eq!(numbers, vec![LiteralValue::Int32(300), LiteralValue::Float(1.5)]);
        assert_eq!(result.values[0], LiteralValue::None);
    }
}
