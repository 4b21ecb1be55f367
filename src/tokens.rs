//! Primitive token readers.
//!
//! Every reader follows the same discipline: skip whitespace and comments,
//! fail with the reader's message when the input is at end-of-text or at
//! the current end-of-scope marker, then try its pattern anchored at the
//! cursor. A failing reader is atomic: the cursor goes back to where the
//! reader was entered, even across skipped whitespace, while the failure
//! it raises still points at the first unskippable character.

use crate::failure::ParseResult;
use crate::parser::Parser;
use crate::patterns::IntoPattern;
use crate::unescape::decode_escapes;

/// A numeric token value: [`Parser::token_number`] yields whichever of the
/// two forms matched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

impl Parser {
    /// Match a literal string or regex at the cursor and return the
    /// matched text.
    pub fn expect<P: IntoPattern>(&mut self, pattern: P) -> ParseResult<String> {
        self.expect_with_captures(pattern).map(|(text, _)| text)
    }

    /// [`expect`](Parser::expect), additionally returning the pattern's
    /// capture groups in input order.
    ///
    /// Unlike the `token_*` readers, `expect` does not treat the current
    /// end-of-scope marker as end-of-input: `scope_of` closes nested
    /// scopes through this method, and the closer of an inner scope must
    /// still match while an identical outer closer is on the stack.
    pub fn expect_with_captures<P: IntoPattern>(
        &mut self,
        pattern: P,
    ) -> ParseResult<(String, Vec<Option<String>>)> {
        let re = pattern.into_pattern()?;
        let entry = self.pos();
        self.skip_ws();
        match self.input.match_at(&re) {
            Some(found) => Ok(found),
            None => self.fail_token(entry, format!("Expected {}", re.as_str())),
        }
    }

    /// Like [`expect`](Parser::expect), but a non-match consumes nothing
    /// and returns `None` instead of failing, so the caller needs no
    /// cursor snapshot.
    pub fn maybe_expect<P: IntoPattern>(&mut self, pattern: P) -> ParseResult<Option<String>> {
        let re = pattern.into_pattern()?;
        let entry = self.pos();
        self.skip_ws();
        match self.input.match_at(&re) {
            Some((text, _)) => Ok(Some(text)),
            None => {
                self.set_pos(entry);
                Ok(None)
            }
        }
    }

    /// Consume and return everything up to (excluding) the next occurrence
    /// of `pattern`, the next match of the current end-of-scope marker, or
    /// end of text, whichever comes first.
    ///
    /// Does not skip whitespace; an empty result is not a failure.
    pub fn substring_before<P: IntoPattern>(&mut self, pattern: P) -> ParseResult<String> {
        let re = pattern.into_pattern()?;
        let mut stop = self.input.find_from(&re).unwrap_or(self.input.len());
        if let Some(closer) = self.current_scope() {
            if let Some(at) = self.input.find_from(closer) {
                stop = stop.min(at);
            }
        }
        Ok(self.input.take_to(stop))
    }

    /// Signed integer token: decimal, `0x...` hex, leading-zero octal, and
    /// `0o...` octal when enabled at construction.
    pub fn token_int(&mut self) -> ParseResult<i64> {
        let entry = self.pos();
        if self.at_eos() {
            return self.fail_token(entry, "Expected integer");
        }
        let matched = self.input.match_at(&self.patterns.int);
        match matched {
            Some((text, _)) => match parse_int(&text) {
                Some(value) => Ok(value),
                None => self.fail_token(entry, "Expected integer"),
            },
            None => self.fail_token(entry, "Expected integer"),
        }
    }

    /// Floating-point token.
    pub fn token_float(&mut self) -> ParseResult<f64> {
        let entry = self.pos();
        if self.at_eos() {
            return self.fail_token(entry, "Expected float");
        }
        let matched = self.input.match_at(&self.patterns.float);
        match matched {
            Some((text, _)) => match text.parse::<f64>() {
                Ok(value) => Ok(value),
                Err(_) => self.fail_token(entry, "Expected float"),
            },
            None => self.fail_token(entry, "Expected float"),
        }
    }

    /// Numeric token. The float form is tried first so a decimal point or
    /// exponent is never split off as trailing input; plain integers fall
    /// through to [`token_int`](Parser::token_int).
    pub fn token_number(&mut self) -> ParseResult<Number> {
        let entry = self.pos();
        if self.at_eos() {
            return self.fail_token(entry, "Expected number");
        }
        match self.token_float() {
            Ok(value) => Ok(Number::Float(value)),
            Err(e) if e.is_recoverable() => match self.token_int() {
                Ok(value) => Ok(Number::Int(value)),
                Err(e) if e.is_recoverable() => self.fail_token(entry, "Expected number"),
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        }
    }

    /// Quoted string token: an opening delimiter matched by the
    /// `string_delim` pattern, a body tolerating backslash escapes, then
    /// the same delimiter again. The body is returned with its escapes
    /// decoded.
    pub fn token_string(&mut self) -> ParseResult<String> {
        let entry = self.pos();
        if self.at_eos() {
            return self.fail_token(entry, "Expected string delimiter");
        }
        let start = self.pos();
        let matched = self.input.match_at(&self.patterns.string_delim);
        let delim = match matched {
            Some((delim, _)) => delim,
            None => return self.fail_token(entry, "Expected string delimiter"),
        };
        let body = self.string_body_pattern(&delim)?;
        match self.input.match_at(&body) {
            Some((_, mut groups)) => {
                let raw = groups.remove(0).unwrap_or_default();
                Ok(decode_escapes(&raw))
            }
            None => {
                self.set_pos(start);
                self.fail_token(entry, "Expected string")
            }
        }
    }

    /// Identifier token.
    pub fn token_ident(&mut self) -> ParseResult<String> {
        let entry = self.pos();
        if self.at_eos() {
            return self.fail_token(entry, "Expected identifier");
        }
        let matched = self.input.match_at(&self.patterns.ident);
        match matched {
            Some((text, _)) => Ok(text),
            None => self.fail_token(entry, "Expected identifier"),
        }
    }

    /// Identifier restricted to a keyword list. The cursor is restored to
    /// before the identifier when it is not one of the listed keywords.
    pub fn token_kw(&mut self, keywords: &[&str]) -> ParseResult<String> {
        let entry = self.pos();
        self.skip_ws();
        let start = self.pos();
        let ident = self.token_ident()?;
        if keywords.contains(&ident.as_str()) {
            Ok(ident)
        } else {
            self.set_pos(start);
            self.fail_token(entry, format!("Expected any of {}", keywords.join(", ")))
        }
    }

    /// A reader for a caller-defined token: skip, test for end-of-input,
    /// match `pattern`, and hand the matched text to `convert`. The
    /// failure message names the token.
    pub fn generic_token<T, P, F>(&mut self, name: &str, pattern: P, convert: F) -> ParseResult<T>
    where
        P: IntoPattern,
        F: FnOnce(&mut Parser, &str) -> ParseResult<T>,
    {
        let re = pattern.into_pattern()?;
        let entry = self.pos();
        if self.at_eos() {
            return self.fail_token(entry, format!("Expected {}", name));
        }
        match self.input.match_at(&re) {
            Some((text, _)) => {
                let converted = convert(self, &text);
                if let Err(e) = &converted {
                    if e.is_recoverable() {
                        self.set_pos(entry);
                    }
                }
                converted
            }
            None => self.fail_token(entry, format!("Expected {}", name)),
        }
    }
}

fn parse_int(text: &str) -> Option<i64> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let magnitude = if let Some(hex) = digits.strip_prefix("0x") {
        i64::from_str_radix(hex, 16).ok()?
    } else if let Some(oct) = digits.strip_prefix("0o") {
        i64::from_str_radix(oct, 8).ok()?
    } else if digits.len() > 1 && digits.starts_with('0') {
        i64::from_str_radix(&digits[1..], 8).ok()?
    } else {
        digits.parse::<i64>().ok()?
    };
    Some(if negative { -magnitude } else { magnitude })
}
