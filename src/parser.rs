//! The parser core: cursor state, the skipper, the scope and commit
//! stacks, failure raising, and the driver entry points.

use std::fs;
use std::io::Read;
use std::path::Path;

use regex::Regex;

use crate::failure::{Error, Failure, ParseResult};
use crate::input::{InputBuffer, Location};
use crate::patterns::{Options, PatternSet};

/// A recursive-descent parser with backtracking over a single input
/// string.
///
/// A `Parser` is the state machine a grammar runs against: grammar rules
/// are ordinary functions receiving `&mut Parser` and composing the token
/// readers and combinators. One instance is reusable; each
/// `from_string`/`from_file`/`from_reader` call reseats the input and
/// clears all per-parse state.
pub struct Parser {
    pub(crate) input: InputBuffer,
    pub(crate) patterns: PatternSet,
    /// End-of-scope patterns pushed by `scope_of`; the top entry doubles as
    /// an end-of-input marker for everything inside the scope.
    scopes: Vec<Regex>,
    /// One flag per backtrackable frame; `commit` sets the innermost.
    commits: Vec<bool>,
    reader: Option<Box<dyn FnMut() -> Option<String>>>,
    /// Compiled string-body patterns, one per delimiter seen.
    string_bodies: Vec<(String, Regex)>,
}

impl Parser {
    /// A parser with the default pattern set.
    pub fn new() -> Parser {
        Parser {
            input: InputBuffer::new(String::new()),
            patterns: PatternSet::default_set(),
            scopes: Vec::new(),
            commits: Vec::new(),
            reader: None,
            string_bodies: Vec::new(),
        }
    }

    /// A parser with pattern overrides and flags applied.
    pub fn with_options(options: Options) -> ParseResult<Parser> {
        let patterns = PatternSet::compile(&options.patterns, options.accept_0o_oct)?;
        let mut parser = Parser::new();
        parser.patterns = patterns;
        Ok(parser)
    }

    /// Current cursor offset.
    pub fn pos(&self) -> usize {
        self.input.position()
    }

    /// Line, column and line text at the cursor.
    pub fn location(&self) -> Location {
        self.input.location()
    }

    /// Number of scopes entered through `scope_of` (the root not counted).
    pub fn scope_level(&self) -> usize {
        self.scopes.len()
    }

    /// Raise a recoverable failure at the current cursor.
    pub fn fail<T>(&self, message: impl Into<String>) -> ParseResult<T> {
        Err(self.failure_at(self.input.position(), message.into()))
    }

    /// Raise a recoverable failure at a position previously obtained from
    /// [`pos`](Parser::pos).
    pub fn fail_from<T>(&self, pos: usize, message: impl Into<String>) -> ParseResult<T> {
        Err(self.failure_at(pos, message.into()))
    }

    pub(crate) fn failure_at(&self, pos: usize, message: String) -> Error {
        Error::Failure(Failure::new(message, self.input.location_at(pos)))
    }

    /// Fail a token reader: the failure points at the current (post-skip)
    /// cursor, but the cursor itself is put back at `entry` so a failing
    /// reader is atomic even across skipped whitespace.
    pub(crate) fn fail_token<T>(&mut self, entry: usize, message: impl Into<String>) -> ParseResult<T> {
        let err = self.failure_at(self.input.position(), message.into());
        self.input.set_position(entry);
        Err(err)
    }

    /// Skip whitespace and comments at the cursor.
    ///
    /// This is the only place the streaming reader is consulted: once the
    /// skippable prefix is exhausted at end-of-text, the reader is asked
    /// for more. A whitespace boundary is the one append point that cannot
    /// split a token. A reader that returns `None` is detached and never
    /// asked again.
    pub fn skip_ws(&mut self) {
        loop {
            loop {
                let mut advanced = false;
                if let Some((text, _)) = self.input.match_at(&self.patterns.ws) {
                    advanced |= !text.is_empty();
                }
                if let Some(comment) = &self.patterns.comment {
                    if let Some((text, _)) = self.input.match_at(comment) {
                        advanced |= !text.is_empty();
                    }
                }
                if !advanced {
                    break;
                }
            }
            if !self.input.at_end_of_text() {
                return;
            }
            let pulled = match self.reader.as_mut() {
                Some(pull) => pull(),
                None => return,
            };
            match pulled {
                Some(more) => self.input.append(&more),
                None => {
                    self.reader = None;
                    return;
                }
            }
        }
    }

    /// End-of-input test: true at end of text, or, inside a scope, at a
    /// position where the current end-of-scope pattern matches. Skips
    /// whitespace first.
    pub fn at_eos(&mut self) -> bool {
        self.skip_ws();
        if self.input.at_end_of_text() {
            return true;
        }
        match self.scopes.last() {
            Some(closer) => self.input.peek_at(closer),
            None => false,
        }
    }

    /// Disable backtracking in the innermost `maybe`/`any_of`/`list_of`
    /// frame: a recoverable failure there now propagates outward instead
    /// of selecting another alternative.
    pub fn commit(&mut self) -> ParseResult<()> {
        match self.commits.last_mut() {
            Some(flag) => {
                *flag = true;
                Ok(())
            }
            None => Err(Error::Usage(
                "cannot commit outside a backtrackable frame".to_string(),
            )),
        }
    }

    pub(crate) fn set_pos(&mut self, pos: usize) {
        self.input.set_position(pos);
    }

    pub(crate) fn push_scope(&mut self, closer: Regex) {
        self.scopes.push(closer);
    }

    pub(crate) fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    pub(crate) fn current_scope(&self) -> Option<&Regex> {
        self.scopes.last()
    }

    pub(crate) fn push_frame(&mut self) {
        self.commits.push(false);
    }

    pub(crate) fn pop_frame(&mut self) -> bool {
        self.commits.pop().unwrap_or(false)
    }

    pub(crate) fn string_body_pattern(&mut self, delim: &str) -> ParseResult<Regex> {
        if let Some((_, re)) = self.string_bodies.iter().find(|(d, _)| d == delim) {
            return Ok(re.clone());
        }
        let re = Regex::new(&format!(r"(?s)((?:\\.|[^\\])*?){}", regex::escape(delim)))
            .map_err(Error::Pattern)?;
        self.string_bodies.push((delim.to_string(), re.clone()));
        Ok(re)
    }

    fn reset(&mut self, text: String) {
        self.input = InputBuffer::new(text);
        self.scopes.clear();
        self.commits.clear();
        self.reader = None;
    }

    fn finish<T>(&mut self, value: T) -> ParseResult<T> {
        if self.at_eos() {
            Ok(value)
        } else {
            self.fail("Expected end of input")
        }
    }

    /// Parse `text` with `rule` as the toplevel rule, requiring it to
    /// consume the entire input.
    pub fn from_string<T, F>(&mut self, text: impl Into<String>, rule: F) -> ParseResult<T>
    where
        F: FnOnce(&mut Parser) -> ParseResult<T>,
    {
        self.reset(text.into());
        let value = rule(self)?;
        self.finish(value)
    }

    /// Read `path` in full (UTF-8) and parse it like
    /// [`from_string`](Parser::from_string).
    pub fn from_file<T, F>(&mut self, path: impl AsRef<Path>, rule: F) -> ParseResult<T>
    where
        F: FnOnce(&mut Parser) -> ParseResult<T>,
    {
        let text = fs::read_to_string(path).map_err(Error::Io)?;
        self.from_string(text, rule)
    }

    /// Drain an already-opened handle and parse its contents. Invalid
    /// UTF-8 surfaces as [`Error::Io`].
    pub fn from_read<T, F>(&mut self, mut handle: impl Read, rule: F) -> ParseResult<T>
    where
        F: FnOnce(&mut Parser) -> ParseResult<T>,
    {
        let mut text = String::new();
        handle.read_to_string(&mut text).map_err(Error::Io)?;
        self.from_string(text, rule)
    }

    /// Parse input pulled on demand from `reader`.
    ///
    /// The reader is consulted only while skipping whitespace at
    /// end-of-text; returning `None` detaches it for the remainder of the
    /// parse.
    pub fn from_reader<T, F, R>(&mut self, reader: R, rule: F) -> ParseResult<T>
    where
        F: FnOnce(&mut Parser) -> ParseResult<T>,
        R: FnMut() -> Option<String> + 'static,
    {
        self.reset(String::new());
        self.reader = Some(Box::new(reader));
        let result = match rule(self) {
            Ok(value) => self.finish(value),
            Err(e) => Err(e),
        };
        self.reader = None;
        result
    }
}

impl Default for Parser {
    fn default() -> Self {
        Parser::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_ws_consumes_whitespace_runs() {
        let mut p = Parser::new();
        let pos = p
            .from_string("  \t\n  x", |p| {
                p.skip_ws();
                let at = p.pos();
                p.expect("x")?;
                Ok(at)
            })
            .unwrap();
        assert_eq!(pos, 6);
    }

    #[test]
    fn skip_ws_is_idempotent() {
        let mut p = Parser::new();
        p.from_string("   abc", |p| {
            p.skip_ws();
            let first = p.pos();
            p.skip_ws();
            assert_eq!(p.pos(), first);
            p.expect("abc")
        })
        .unwrap();
    }

    #[test]
    fn skip_ws_interleaves_comments() {
        let options = Options {
            patterns: crate::PatternOverrides {
                comment: Some(r"#[^\n]*".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let mut p = Parser::with_options(options).unwrap();
        let value = p
            .from_string("  # one\n # two\n 7 # trailing", |p| p.token_int())
            .unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn commit_outside_a_frame_is_fatal() {
        let mut p = Parser::new();
        let err = p.from_string("x", |p| p.commit()).unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn end_of_input_is_required() {
        let mut p = Parser::new();
        let err = p.from_string("12 extra", |p| p.token_int()).unwrap_err();
        let failure = err.failure().expect("formatted failure");
        assert_eq!(failure.message, "Expected end of input");
        assert_eq!((failure.line, failure.column), (1, 3));
    }

    #[test]
    fn parser_instances_are_reusable() {
        let mut p = Parser::new();
        assert_eq!(p.from_string("1", |p| p.token_int()).unwrap(), 1);
        assert_eq!(p.from_string("2", |p| p.token_int()).unwrap(), 2);
        assert_eq!(p.scope_level(), 0);
    }
}
