//! Parse failures and the crate error type.
//!
//! Two kinds of errors flow out of a grammar. A recoverable [`Failure`] is
//! raised by `fail`/`fail_from` and by any primitive whose pattern does not
//! match; the nearest uncommitted `maybe`/`any_of`/`list_of` frame catches
//! it and backtracks. Everything else is fatal and propagates through the
//! combinators unchanged.

use std::fmt;
use std::io;

use crate::input::Location;

/// A recoverable parse failure: what was expected and where.
///
/// Renders as
///
/// ```text
/// <message> on line <N> at:
/// <line text>
/// <indent>^
/// ```
///
/// where `<indent>` reproduces the failing line's prefix with every non-tab
/// character blanked to a space, so the caret lines up under the failing
/// column in a monospaced rendering even when the line contains tabs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
    /// 1-based line number.
    pub line: usize,
    /// 0-based column, in characters.
    pub column: usize,
    /// Full text of the failing line.
    pub line_text: String,
}

impl Failure {
    pub(crate) fn new(message: String, at: Location) -> Self {
        Failure {
            message,
            line: at.line,
            column: at.column,
            line_text: at.line_text,
        }
    }

    fn caret_indent(&self) -> String {
        self.line_text
            .chars()
            .take(self.column)
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on line {} at:\n{}\n{}^\n",
            self.message,
            self.line,
            self.line_text,
            self.caret_indent()
        )
    }
}

/// Error type for every parser entry point.
///
/// Only the `Failure` variant participates in backtracking; the other
/// variants are fatal.
#[derive(Debug)]
pub enum Error {
    /// A recoverable parse failure.
    Failure(Failure),
    /// A dynamic pattern failed to compile.
    Pattern(regex::Error),
    /// File or handle input failed (including invalid UTF-8).
    Io(io::Error),
    /// The framework was misused, e.g. `commit` outside a backtrackable
    /// frame.
    Usage(String),
}

impl Error {
    /// Whether a backtracking frame may catch this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Failure(_))
    }

    /// The structured failure, when this is a recoverable parse failure.
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Error::Failure(failure) => Some(failure),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Failure(failure) => fmt::Display::fmt(failure, f),
            Error::Pattern(e) => write!(f, "invalid pattern: {}", e),
            Error::Io(e) => write!(f, "input error: {}", e),
            Error::Usage(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Pattern(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<regex::Error> for Error {
    fn from(e: regex::Error) -> Self {
        Error::Pattern(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

/// Result alias used throughout the crate.
pub type ParseResult<T> = Result<T, Error>;
