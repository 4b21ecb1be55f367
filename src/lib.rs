//! # descent
//!
//! A toolkit for writing recursive-descent parsers with backtracking over a
//! single input string. A grammar is ordinary Rust: functions receiving
//! `&mut Parser` and composing the crate's token readers (`expect`,
//! `token_int`, `token_string`, ...) and combinators (`maybe`, `any_of`,
//! `list_of`, `scope_of`). The parser owns the cursor, skips whitespace and
//! comments between tokens, backtracks through cursor snapshots unless the
//! grammar commits, treats the closer of a `scope_of` as an implicit
//! end-of-input for the rules inside it, and reports failures with the
//! offending line, column and source text.
//!
//! ```
//! use descent::Parser;
//!
//! let mut parser = Parser::new();
//! let numbers = parser
//!     .from_string("1, 2, 3", |p| p.list_of(",", |p| p.token_int()))
//!     .unwrap();
//! assert_eq!(numbers, vec![1, 2, 3]);
//! ```
//!
//! Input can also be pulled on demand: [`Parser::from_reader`] installs a
//! callback that is consulted while skipping whitespace, the one point
//! where appending text cannot split a token already being matched.
//!
//! Reusable grammars implement the [`Grammar`] trait, which carries the
//! toplevel rule plus grammar-level pattern overrides and provides the
//! driver methods (`parse_string`, `parse_file`, ...) ready-made.

mod combinators;
mod failure;
mod grammar;
mod input;
mod parser;
mod patterns;
mod tokens;
mod unescape;

pub use combinators::Alternative;
pub use failure::{Error, Failure, ParseResult};
pub use grammar::Grammar;
pub use input::Location;
pub use parser::Parser;
pub use patterns::{IntoPattern, Options, PatternOverrides};
pub use tokens::Number;
