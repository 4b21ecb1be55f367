//! Backslash-escape decoding for string token bodies.

use std::iter::Peekable;
use std::str::Chars;

/// Decode the escape sequences of a captured string body.
///
/// Recognised: `\a \b \e \f \n \r \t`, octal `\0`/`\NNN` (one to three
/// octal digits), hex `\xNN` (one or two hex digits) and `\x{N...}`. Any
/// other `\X` yields the literal `X`.
pub(crate) fn decode_escapes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            None => out.push('\\'),
            Some('a') => out.push('\x07'),
            Some('b') => out.push('\x08'),
            Some('e') => out.push('\x1b'),
            Some('f') => out.push('\x0c'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('x') => push_hex(&mut out, &mut chars),
            Some(d) if matches!(d, '0'..='7') => push_octal(&mut out, d, &mut chars),
            Some(other) => out.push(other),
        }
    }
    out
}

fn push_hex(out: &mut String, chars: &mut Peekable<Chars<'_>>) {
    let mut value: u32 = 0;
    let mut digits = 0;
    if chars.peek() == Some(&'{') {
        chars.next();
        while let Some(c) = chars.next() {
            if c == '}' {
                break;
            }
            match c.to_digit(16) {
                Some(d) => {
                    value = value.saturating_mul(16).saturating_add(d);
                    digits += 1;
                }
                None => {
                    // Malformed body; emit nothing for it.
                    digits = 0;
                    break;
                }
            }
        }
    } else {
        while digits < 2 {
            match chars.peek().and_then(|c| c.to_digit(16)) {
                Some(d) => {
                    value = value * 16 + d;
                    digits += 1;
                    chars.next();
                }
                None => break,
            }
        }
        if digits == 0 {
            out.push('x');
            return;
        }
    }
    if digits > 0 {
        out.push(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER));
    }
}

fn push_octal(out: &mut String, first: char, chars: &mut Peekable<Chars<'_>>) {
    let mut value = first.to_digit(8).expect("caller checked the octal digit");
    let mut digits = 1;
    while digits < 3 {
        match chars.peek().and_then(|c| c.to_digit(8)) {
            Some(d) => {
                value = value * 8 + d;
                digits += 1;
                chars.next();
            }
            None => break,
        }
    }
    out.push(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER));
}
