//! Low-level scanners used by the tokenizer: whitespace, newlines,
//! comments, identifiers, numbers and escape sequences.
//!
//! Scanners advance the window past the text they recognize and report
//! malformed input to the diagnostics list. They never fail; the worst
//! input still yields a token with the ERROR flag.

use crate::diagnostics::{Diagnostics, ErrorCode};
use crate::span::Span;
use crate::text_window::TextWindow;
use crate::token::LiteralValue;

pub fn is_newline_byte(b: u8) -> bool {
    b == b'\n' || b == b'\r'
}

/// Full newline set: \n, \r, NEL, LS, PS.
pub fn is_newline_char(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{0085}' | '\u{2028}' | '\u{2029}')
}

fn is_whitespace_char(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{000B}' | '\u{000C}' | '\u{00A0}' | '\u{FEFF}')
        || (c > '\u{00FF}' && c.is_whitespace() && !is_newline_char(c))
}

/// Advances over a run of whitespace (not newlines). Returns true if any
/// was consumed.
pub fn scan_whitespace(window: &mut TextWindow<'_>) -> bool {
    let start = window.position();
    loop {
        match window.peek() {
            b' ' | b'\t' | 0x0B | 0x0C => window.advance(1),
            b if b >= 0x80 => {
                let (c, width) = window.peek_char32();
                if is_whitespace_char(c) {
                    window.advance(width);
                } else {
                    break;
                }
            }
            _ => break,
        }
    }
    window.position() > start
}

/// Advances over one newline sequence (\r\n counts as one). Returns true
/// if one was consumed.
pub fn scan_newline(window: &mut TextWindow<'_>) -> bool {
    match window.peek() {
        b'\r' => {
            window.advance(1);
            window.try_advance(b'\n');
            true
        }
        b'\n' => {
            window.advance(1);
            true
        }
        b if b >= 0x80 => {
            let (c, width) = window.peek_char32();
            if is_newline_char(c) {
                window.advance(width);
                true
            } else {
                false
            }
        }
        _ => false,
    }
}

/// `//` to end of line, exclusive of the newline.
pub fn scan_single_line_comment(window: &mut TextWindow<'_>) {
    debug_assert!(window.peek() == b'/' && window.peek_ahead(1) == b'/');
    window.advance(2);
    while window.has_more_content() {
        let b = window.peek();
        if is_newline_byte(b) {
            break;
        }
        if b >= 0x80 {
            let (c, width) = window.peek_char32();
            if is_newline_char(c) {
                break;
            }
            window.advance(width);
        } else {
            window.advance(1);
        }
    }
}

/// `/*` to `*/`; unterminated comments run to end of file with a
/// diagnostic.
pub fn scan_multi_line_comment(window: &mut TextWindow<'_>, diagnostics: &mut Diagnostics) {
    debug_assert!(window.peek() == b'/' && window.peek_ahead(1) == b'*');
    let start = window.position();
    window.advance(2);
    loop {
        if !window.has_more_content() {
            diagnostics.add(
                ErrorCode::OpenEndedComment,
                Span::new(start as u32, window.position() as u32),
            );
            return;
        }
        if window.peek() == b'*' && window.peek_ahead(1) == b'/' {
            window.advance(2);
            return;
        }
        window.advance(1);
    }
}

pub fn is_identifier_start_char(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic() || (c > '\u{007F}' && c.is_alphabetic())
}

pub fn is_identifier_part_char(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric() || (c > '\u{007F}' && c.is_alphanumeric())
}

/// Scans an identifier and returns its text, or `None` when the window is
/// not at an identifier start. ASCII runs take the byte path; anything
/// else decodes.
pub fn scan_identifier<'a>(window: &mut TextWindow<'a>) -> Option<&'a str> {
    let start = window.position();
    let first = window.peek();
    if first.is_ascii() {
        if !(first == b'_' || first.is_ascii_alphabetic()) {
            return None;
        }
        window.advance(1);
    } else {
        let (c, width) = window.peek_char32();
        if !is_identifier_start_char(c) {
            return None;
        }
        window.advance(width);
    }
    loop {
        let b = window.peek();
        if b == b'_' || b.is_ascii_alphanumeric() {
            window.advance(1);
        } else if b >= 0x80 {
            let (c, width) = window.peek_char32();
            if is_identifier_part_char(c) {
                window.advance(width);
            } else {
                break;
            }
        } else {
            break;
        }
    }
    Some(window.slice(start, window.position()))
}

/// Consumes one escape sequence after the backslash position. The window
/// sits on the `\`. Reports illegal escapes.
pub fn scan_escape_sequence(window: &mut TextWindow<'_>, diagnostics: &mut Diagnostics) {
    debug_assert!(window.peek() == b'\\');
    let start = window.position();
    window.advance(1);
    match window.peek() {
        b'\'' | b'"' | b'\\' | b'0' | b'a' | b'b' | b'f' | b'n' | b'r' | b't' | b'v' | b'$' => {
            window.advance(1);
        }
        b'u' => {
            window.advance(1);
            let mut digits = 0;
            while digits < 4 && window.peek().is_ascii_hexdigit() {
                window.advance(1);
                digits += 1;
            }
            if digits != 4 {
                diagnostics.add(
                    ErrorCode::IllegalEscape,
                    Span::new(start as u32, window.position() as u32),
                );
            }
        }
        b'x' => {
            window.advance(1);
            let mut digits = 0;
            while digits < 4 && window.peek().is_ascii_hexdigit() {
                window.advance(1);
                digits += 1;
            }
            if digits == 0 {
                diagnostics.add(
                    ErrorCode::IllegalEscape,
                    Span::new(start as u32, window.position() as u32),
                );
            }
        }
        _ => {
            if window.has_more_content() {
                let (_, width) = window.peek_char32();
                window.advance(width);
            }
            diagnostics.add(
                ErrorCode::IllegalEscape,
                Span::new(start as u32, window.position() as u32),
            );
        }
    }
}

/// Scans a numeric literal: decimal or real, `0x` hex, `0b` binary, digit
/// underscores, integer suffixes (`u`, `l`, `ul` in either case) and real
/// suffixes (`f`, `d`). The token text is everything consumed; validity
/// problems are reported and reflected in the bool. A clean scan also
/// yields the literal's classified value.
pub fn scan_numeric_literal(
    window: &mut TextWindow<'_>,
    diagnostics: &mut Diagnostics,
) -> (bool, LiteralValue) {
    let start = window.position();
    let mut ok = true;
    let mut is_real = false;

    if window.peek() == b'0' && matches!(window.peek_ahead(1), b'x' | b'X') {
        window.advance(2);
        ok &= scan_integer_digits(window, diagnostics, start, 16);
        scan_integer_suffix(window);
    } else if window.peek() == b'0' && matches!(window.peek_ahead(1), b'b' | b'B') {
        window.advance(2);
        ok &= scan_integer_digits(window, diagnostics, start, 2);
        scan_integer_suffix(window);
    } else {
        ok &= scan_decimal_digits(window, diagnostics, start);
        // A dot begins the fraction only when a digit follows; `1..2` is a
        // range over integers.
        if window.peek() == b'.' && window.peek_ahead(1).is_ascii_digit() {
            is_real = true;
            window.advance(1);
            ok &= scan_decimal_digits(window, diagnostics, start);
        }
        if matches!(window.peek(), b'e' | b'E') {
            let mark = window.position();
            window.advance(1);
            if matches!(window.peek(), b'+' | b'-') {
                window.advance(1);
            }
            if window.peek().is_ascii_digit() {
                is_real = true;
                ok &= scan_decimal_digits(window, diagnostics, start);
            } else {
                // `1e` with no exponent digits; the e belongs to whatever
                // follows.
                window.seek(mark);
            }
        }
        if matches!(window.peek(), b'f' | b'F' | b'd' | b'D') {
            is_real = true;
            window.advance(1);
        } else if !is_real {
            scan_integer_suffix(window);
        }
    }

    if !ok {
        return (false, LiteralValue::None);
    }

    let text = window.slice(start, window.position());
    let value = if is_real {
        real_value(text, diagnostics, start, window.position())
    } else {
        integer_value(text, diagnostics, start, window.position())
    };
    match value {
        Some(value) => (true, value),
        None => (false, LiteralValue::None),
    }
}

fn scan_integer_suffix(window: &mut TextWindow<'_>) {
    match window.peek() {
        b'u' | b'U' => {
            window.advance(1);
            if matches!(window.peek(), b'l' | b'L') {
                window.advance(1);
            }
        }
        b'l' | b'L' => {
            window.advance(1);
            if matches!(window.peek(), b'u' | b'U') {
                window.advance(1);
            }
        }
        _ => {}
    }
}

/// Digits in the given radix with `_` separators. Underscores must sit
/// between digits.
fn scan_integer_digits(
    window: &mut TextWindow<'_>,
    diagnostics: &mut Diagnostics,
    literal_start: usize,
    radix: u32,
) -> bool {
    let mut any = false;
    let mut last_was_underscore = false;
    let mut first = true;
    let mut ok = true;
    loop {
        let b = window.peek();
        if b == b'_' {
            if first || !any {
                ok = false;
            }
            last_was_underscore = true;
            window.advance(1);
        } else if (b as char).is_digit(radix) {
            any = true;
            last_was_underscore = false;
            window.advance(1);
        } else {
            break;
        }
        first = false;
    }
    if !any || last_was_underscore {
        ok = false;
    }
    if !ok {
        diagnostics.add(
            ErrorCode::InvalidNumber,
            Span::new(literal_start as u32, window.position() as u32),
        );
    }
    ok
}

fn scan_decimal_digits(
    window: &mut TextWindow<'_>,
    diagnostics: &mut Diagnostics,
    literal_start: usize,
) -> bool {
    scan_integer_digits(window, diagnostics, literal_start, 10)
}

/// Computes an integer literal's value (which must fit 64 unsigned bits)
/// and classifies its type from the suffix. Unsuffixed literals take the
/// smallest fitting type: int32, uint32, int64, then uint64.
fn integer_value(
    text: &str,
    diagnostics: &mut Diagnostics,
    start: usize,
    end: usize,
) -> Option<LiteralValue> {
    let (body, radix) = if let Some(rest) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        (rest, 16)
    } else if let Some(rest) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {
        (rest, 2)
    } else {
        (text, 10)
    };
    let mut unsigned = false;
    let mut long = false;
    let digits = body.trim_end_matches(|c: char| match c {
        'u' | 'U' => {
            unsigned = true;
            true
        }
        'l' | 'L' => {
            long = true;
            true
        }
        _ => false,
    });
    let mut value: u64 = 0;
    for c in digits.chars() {
        if c == '_' {
            continue;
        }
        let d = c.to_digit(radix).unwrap_or(0) as u64;
        value = match value.checked_mul(radix as u64).and_then(|v| v.checked_add(d)) {
            Some(v) => v,
            None => {
                diagnostics.add(ErrorCode::IntOverflow, Span::new(start as u32, end as u32));
                return None;
            }
        };
    }
    Some(match (unsigned, long) {
        (true, true) => LiteralValue::UInt64(value),
        (true, false) => match u32::try_from(value) {
            Ok(v) => LiteralValue::UInt32(v),
            Err(_) => LiteralValue::UInt64(value),
        },
        (false, true) => match i64::try_from(value) {
            Ok(v) => LiteralValue::Int64(v),
            Err(_) => LiteralValue::UInt64(value),
        },
        (false, false) => {
            if let Ok(v) = i32::try_from(value) {
                LiteralValue::Int32(v)
            } else if let Ok(v) = u32::try_from(value) {
                LiteralValue::UInt32(v)
            } else if let Ok(v) = i64::try_from(value) {
                LiteralValue::Int64(v)
            } else {
                LiteralValue::UInt64(value)
            }
        }
    })
}

/// Parses a real literal; the `f` suffix selects 32-bit. Values that do
/// not round to a finite double are invalid.
fn real_value(
    text: &str,
    diagnostics: &mut Diagnostics,
    start: usize,
    end: usize,
) -> Option<LiteralValue> {
    let is_float = matches!(text.as_bytes().last(), Some(b'f' | b'F'));
    let digits: String = text
        .chars()
        .filter(|c| !matches!(c, '_' | 'f' | 'F' | 'd' | 'D'))
        .collect();
    match digits.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(if is_float {
            LiteralValue::Float(v as f32)
        } else {
            LiteralValue::Double(v)
        }),
        _ => {
            diagnostics.add(ErrorCode::InvalidReal, Span::new(start as u32, end as u32));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_number(src: &str) -> (String, usize) {
        let mut window = TextWindow::new(src);
        let mut diags = Diagnostics::new();
        scan_numeric_literal(&mut window, &mut diags);
        (src[..window.position()].to_string(), diags.len())
    }

    fn number_value(src: &str) -> LiteralValue {
        let mut window = TextWindow::new(src);
        let mut diags = Diagnostics::new();
        scan_numeric_literal(&mut window, &mut diags).1
    }

    #[test]
    fn decimal_and_suffixes() {
        assert_eq!(scan_number("123 + x"), ("123".to_string(), 0));
        assert_eq!(scan_number("123ul;"), ("123ul".to_string(), 0));
        assert_eq!(scan_number("1_000_000"), ("1_000_000".to_string(), 0));
    }

    #[test]
    fn hex_and_binary() {
        assert_eq!(scan_number("0xFF_EC"), ("0xFF_EC".to_string(), 0));
        assert_eq!(scan_number("0b1010u"), ("0b1010u".to_string(), 0));
        // no digits after the prefix
        assert_eq!(scan_number("0x;").1, 1);
    }

    #[test]
    fn reals() {
        assert_eq!(scan_number("1.5f"), ("1.5f".to_string(), 0));
        assert_eq!(scan_number("2e10"), ("2e10".to_string(), 0));
        assert_eq!(scan_number("2.5e-3d"), ("2.5e-3d".to_string(), 0));
    }

    #[test]
    fn dot_without_digit_is_not_fraction() {
        // the range operator must survive: 1..2
        assert_eq!(scan_number("1..2"), ("1".to_string(), 0));
    }

    #[test]
    fn trailing_underscore_is_invalid() {
        assert_eq!(scan_number("12_;").1, 1);
        assert_eq!(scan_number("_12").0, "".to_string());
    }

    #[test]
    fn integer_overflow_reported() {
        // u64::MAX is 18446744073709551615
        assert_eq!(scan_number("18446744073709551616").1, 1);
        assert_eq!(scan_number("18446744073709551615").1, 0);
        assert_eq!(number_value("18446744073709551616"), LiteralValue::None);
    }

    #[test]
    fn unsuffixed_integers_take_the_smallest_fitting_type() {
        assert_eq!(number_value("0"), LiteralValue::Int32(0));
        assert_eq!(number_value("2147483647"), LiteralValue::Int32(i32::MAX));
        assert_eq!(number_value("2147483648"), LiteralValue::UInt32(2_147_483_648));
        assert_eq!(number_value("4294967296"), LiteralValue::Int64(4_294_967_296));
        assert_eq!(
            number_value("9223372036854775808"),
            LiteralValue::UInt64(9_223_372_036_854_775_808)
        );
        assert_eq!(number_value("0xFF"), LiteralValue::Int32(255));
        assert_eq!(number_value("0xFFFF_FFFF_FFFF_FFFF"), LiteralValue::UInt64(u64::MAX));
        assert_eq!(number_value("0b1010"), LiteralValue::Int32(10));
    }

    #[test]
    fn suffixes_pick_the_literal_type() {
        assert_eq!(number_value("1u"), LiteralValue::UInt32(1));
        assert_eq!(number_value("5000000000u"), LiteralValue::UInt64(5_000_000_000));
        assert_eq!(number_value("1L"), LiteralValue::Int64(1));
        assert_eq!(number_value("1ul"), LiteralValue::UInt64(1));
        assert_eq!(number_value("1lu"), LiteralValue::UInt64(1));
        assert_eq!(number_value("0b1010u"), LiteralValue::UInt32(10));
        assert_eq!(number_value("1.5f"), LiteralValue::Float(1.5));
        assert_eq!(number_value("1.5"), LiteralValue::Double(1.5));
        assert_eq!(number_value("2d"), LiteralValue::Double(2.0));
        assert_eq!(number_value("2.5e-3"), LiteralValue::Double(2.5e-3));
    }

    #[test]
    fn unterminated_block_comment() {
        let mut window = TextWindow::new("/* never ends");
        let mut diags = Diagnostics::new();
        scan_multi_line_comment(&mut window, &mut diags);
        assert_eq!(diags.len(), 1);
        assert!(!window.has_more_content());
    }

    #[test]
    fn identifiers_allow_unicode() {
        let mut window = TextWindow::new("héllo = 1");
        assert_eq!(scan_identifier(&mut window), Some("héllo"));
        let mut window = TextWindow::new("9bad");
        assert_eq!(scan_identifier(&mut window), None);
    }

    #[test]
    fn newline_forms() {
        for src in ["\n", "\r", "\r\n", "\u{2028}"] {
            let mut window = TextWindow::new(src);
            assert!(scan_newline(&mut window), "failed on {src:?}");
            assert!(!window.has_more_content());
        }
    }
}
