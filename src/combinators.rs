//! Backtracking combinators.
//!
//! Each combinator snapshots the cursor and pushes a fresh commit frame
//! before invoking grammar code, and restores the snapshot when a
//! recoverable failure arrives with the frame uncommitted. A committed
//! frame re-raises instead, which is how a grammar turns "try the next
//! alternative" into a hard parse error. Fatal errors propagate untouched.
//!
//! Frames and scope entries are popped on every exit path, so the stacks
//! stay balanced whether the body succeeds or fails.

use crate::failure::ParseResult;
use crate::parser::Parser;
use crate::patterns::IntoPattern;

/// One alternative handed to [`Parser::any_of`].
pub type Alternative<'a, T> = &'a mut dyn FnMut(&mut Parser) -> ParseResult<T>;

impl Parser {
    /// Try `body`; on an uncommitted recoverable failure, restore the
    /// cursor and return `None`.
    pub fn maybe<T, F>(&mut self, body: F) -> ParseResult<Option<T>>
    where
        F: FnOnce(&mut Parser) -> ParseResult<T>,
    {
        let start = self.pos();
        self.push_frame();
        let result = body(self);
        let committed = self.pop_frame();
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_recoverable() && !committed => {
                self.set_pos(start);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Try each alternative in order and return the first success. An
    /// alternative that fails recoverably without committing has the
    /// cursor restored before the next one runs; exhaustion fails with
    /// `Found nothing parseable` at the original cursor.
    pub fn any_of<T>(&mut self, alternatives: &mut [Alternative<'_, T>]) -> ParseResult<T> {
        let start = self.pos();
        for alternative in alternatives.iter_mut() {
            self.push_frame();
            let result = alternative(self);
            let committed = self.pop_frame();
            match result {
                Ok(value) => return Ok(value),
                Err(e) if e.is_recoverable() && !committed => self.set_pos(start),
                Err(e) => return Err(e),
            }
        }
        self.fail("Found nothing parseable")
    }

    /// Parse a possibly-empty separated list.
    ///
    /// The list ends at end-of-scope or end-of-text, on an uncommitted
    /// body failure (rolled back, keeping what was accumulated), or when
    /// the separator is absent after an element.
    pub fn list_of<T, P, F>(&mut self, separator: P, mut body: F) -> ParseResult<Vec<T>>
    where
        P: IntoPattern,
        F: FnMut(&mut Parser) -> ParseResult<T>,
    {
        let separator = separator.into_pattern()?;
        let mut items = Vec::new();
        while !self.at_eos() {
            let start = self.pos();
            self.push_frame();
            let result = body(self);
            let committed = self.pop_frame();
            match result {
                Ok(value) => items.push(value),
                Err(e) if e.is_recoverable() && !committed => {
                    self.set_pos(start);
                    break;
                }
                Err(e) => return Err(e),
            }
            self.skip_ws();
            if self.input.match_at(&separator).is_none() {
                break;
            }
        }
        Ok(items)
    }

    /// [`list_of`](Parser::list_of) with an empty separator: repeat `body`
    /// until end-of-scope, end-of-text or an uncommitted body failure.
    pub fn sequence_of<T, F>(&mut self, body: F) -> ParseResult<Vec<T>>
    where
        F: FnMut(&mut Parser) -> ParseResult<T>,
    {
        self.list_of("", body)
    }

    /// Parse a delimited scope: consume `start` (when given), make `stop`
    /// the implicit end-of-input for `body`, then consume `stop`.
    ///
    /// While the scope is open, `at_eos` is true at any position where
    /// `stop` matches, so token readers inside the body fail cleanly there
    /// and enclosing lists and sequences terminate. The scope entry is
    /// popped on every exit path, before the closing `expect`.
    pub fn scope_of<T, S, P, F>(&mut self, start: Option<S>, stop: P, body: F) -> ParseResult<T>
    where
        S: IntoPattern,
        P: IntoPattern,
        F: FnOnce(&mut Parser) -> ParseResult<T>,
    {
        let stop = stop.into_pattern()?;
        if let Some(opener) = start {
            self.expect(opener)?;
        }
        self.push_scope(stop.clone());
        let result = body(self);
        self.pop_scope();
        let value = result?;
        self.expect(&stop)?;
        Ok(value)
    }
}
