//! The grammar descriptor: a value carrying the toplevel rule and
//! grammar-level pattern overrides, with driver methods provided.

use std::io::Read;
use std::path::Path;

use crate::failure::ParseResult;
use crate::parser::Parser;
use crate::patterns::{Options, PatternOverrides};

/// A reusable grammar packaged as a value.
///
/// Implementors supply the toplevel rule and, optionally, the pattern
/// overrides and flags the grammar wants; the provided methods build a
/// [`Parser`] and drive it. The `_with` variants layer caller options
/// above the grammar's own: caller overrides win, grammar overrides beat
/// the built-in defaults.
pub trait Grammar {
    type Output;

    /// The toplevel rule.
    fn parse(&self, p: &mut Parser) -> ParseResult<Self::Output>;

    /// Grammar-level pattern overrides.
    fn patterns(&self) -> PatternOverrides {
        PatternOverrides::default()
    }

    /// Whether `0o...` octal integers are accepted.
    fn accept_0o_oct(&self) -> bool {
        false
    }

    /// Build a parser for this grammar, layering `options` above the
    /// grammar-level overrides.
    fn build_parser(&self, options: Options) -> ParseResult<Parser> {
        let merged = Options {
            patterns: options.patterns.over(self.patterns()),
            accept_0o_oct: options.accept_0o_oct || self.accept_0o_oct(),
        };
        Parser::with_options(merged)
    }

    fn parse_string(&self, text: &str) -> ParseResult<Self::Output> {
        self.parse_string_with(text, Options::default())
    }

    fn parse_string_with(&self, text: &str, options: Options) -> ParseResult<Self::Output> {
        let mut parser = self.build_parser(options)?;
        parser.from_string(text, |p| self.parse(p))
    }

    fn parse_file(&self, path: impl AsRef<Path>) -> ParseResult<Self::Output>
    where
        Self: Sized,
    {
        let mut parser = self.build_parser(Options::default())?;
        parser.from_file(path, |p| self.parse(p))
    }

    fn parse_read(&self, handle: impl Read) -> ParseResult<Self::Output>
    where
        Self: Sized,
    {
        let mut parser = self.build_parser(Options::default())?;
        parser.from_read(handle, |p| self.parse(p))
    }

    fn parse_reader<R>(&self, reader: R) -> ParseResult<Self::Output>
    where
        R: FnMut() -> Option<String> + 'static,
        Self: Sized,
    {
        let mut parser = self.build_parser(Options::default())?;
        parser.from_reader(reader, |p| self.parse(p))
    }
}
