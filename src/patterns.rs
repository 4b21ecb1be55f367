//! Pattern configuration: the named patterns a parser runs with, their
//! defaults, override layering, and the literal-vs-regex argument
//! conversion used by the token readers and combinators.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::failure::{Error, ParseResult};

pub(crate) const DEFAULT_WS: &str = r"\s+";
pub(crate) const DEFAULT_INT: &str = r"0x[0-9a-fA-F]+|[0-9]+";
pub(crate) const DEFAULT_FLOAT: &str = r"(?i)-?(?:(?:\d*\.\d+|\d+\.)(?:e-?\d+)?|\d+e-?\d+)";
pub(crate) const DEFAULT_IDENT: &str = r"[A-Za-z_]\w*";
pub(crate) const DEFAULT_STRING_DELIM: &str = r#"["']"#;

/// Pattern overrides. `None` fields fall through to the next layer:
/// caller options, then grammar-level overrides, then the built-in
/// defaults. Only `comment` defaults to absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternOverrides {
    pub ws: Option<String>,
    pub comment: Option<String>,
    pub int: Option<String>,
    pub float: Option<String>,
    pub ident: Option<String>,
    pub string_delim: Option<String>,
}

impl PatternOverrides {
    /// Layer `self` above `under`: fields set here win.
    pub fn over(self, under: PatternOverrides) -> PatternOverrides {
        PatternOverrides {
            ws: self.ws.or(under.ws),
            comment: self.comment.or(under.comment),
            int: self.int.or(under.int),
            float: self.float.or(under.float),
            ident: self.ident.or(under.ident),
            string_delim: self.string_delim.or(under.string_delim),
        }
    }
}

/// Construction-time options for a [`Parser`](crate::Parser).
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub patterns: PatternOverrides,
    /// Also accept `0o7…` octal integers in addition to the `0…` form.
    pub accept_0o_oct: bool,
}

/// The compiled pattern set a parser runs with.
#[derive(Debug, Clone)]
pub(crate) struct PatternSet {
    pub(crate) ws: Regex,
    pub(crate) comment: Option<Regex>,
    /// Signed form used by `token_int`: `-?(?:<int>)`.
    pub(crate) int: Regex,
    pub(crate) float: Regex,
    pub(crate) ident: Regex,
    pub(crate) string_delim: Regex,
}

static DEFAULT_SET: Lazy<PatternSet> = Lazy::new(|| {
    PatternSet::compile(&PatternOverrides::default(), false).expect("default patterns compile")
});

impl PatternSet {
    pub(crate) fn default_set() -> PatternSet {
        DEFAULT_SET.clone()
    }

    pub(crate) fn compile(
        overrides: &PatternOverrides,
        accept_0o_oct: bool,
    ) -> ParseResult<PatternSet> {
        let int_src = overrides.int.as_deref().unwrap_or(DEFAULT_INT);
        let int_src = if accept_0o_oct {
            format!("0o[0-7]+|{}", int_src)
        } else {
            int_src.to_string()
        };
        Ok(PatternSet {
            ws: compile_pattern(overrides.ws.as_deref().unwrap_or(DEFAULT_WS))?,
            comment: overrides
                .comment
                .as_deref()
                .map(compile_pattern)
                .transpose()?,
            int: compile_pattern(&format!("-?(?:{})", int_src))?,
            float: compile_pattern(overrides.float.as_deref().unwrap_or(DEFAULT_FLOAT))?,
            ident: compile_pattern(overrides.ident.as_deref().unwrap_or(DEFAULT_IDENT))?,
            string_delim: compile_pattern(
                overrides.string_delim.as_deref().unwrap_or(DEFAULT_STRING_DELIM),
            )?,
        })
    }
}

fn compile_pattern(src: &str) -> ParseResult<Regex> {
    Regex::new(src).map_err(Error::Pattern)
}

/// Argument conversion for operations that accept either a literal string
/// or a prebuilt regex: literals are regex-escaped, `Regex` values pass
/// through unchanged.
pub trait IntoPattern {
    fn into_pattern(self) -> ParseResult<Regex>;
}

impl IntoPattern for &str {
    fn into_pattern(self) -> ParseResult<Regex> {
        compile_pattern(&regex::escape(self))
    }
}

impl IntoPattern for String {
    fn into_pattern(self) -> ParseResult<Regex> {
        self.as_str().into_pattern()
    }
}

impl IntoPattern for Regex {
    fn into_pattern(self) -> ParseResult<Regex> {
        Ok(self)
    }
}

impl IntoPattern for &Regex {
    fn into_pattern(self) -> ParseResult<Regex> {
        Ok(self.clone())
    }
}
