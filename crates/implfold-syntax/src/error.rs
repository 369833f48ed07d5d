use std::collections::BTreeSet;
use std::fmt;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Where in the input a parse stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Byte offset into the input.
    pub offset: usize,
    /// 1-based line.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
}

impl Position {
    /// Locate the `char_index`-th character of `source`.
    pub fn from_char_index(source: &str, char_index: usize) -> Self {
        let mut line = 1;
        let mut column = 1;
        let mut offset = source.len();
        for (i, (byte, ch)) in source.char_indices().enumerate() {
            if i == char_index {
                offset = byte;
                break;
            }
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Position {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A signature that does not match the grammar.
///
/// The parser never recovers, so there is exactly one error per failed input:
/// the first point where no alternative could continue.
#[derive(Debug, Clone, Error, Diagnostic, PartialEq, Eq)]
#[error("Syntax error at {position}: expected {}, found {}", display_expected(.expected), display_found(.found))]
#[diagnostic(code(implfold_syntax::parse_error))]
pub struct ParseError {
    pub position: Position,
    /// Human readable descriptions of what would have been accepted.
    pub expected: BTreeSet<String>,
    /// What was found instead. `None` at end of input.
    pub found: Option<String>,
    #[label("parsing stopped here")]
    pub span: SourceSpan,
}

impl ParseError {
    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn column(&self) -> usize {
        self.position.column
    }
}

fn display_expected(expected: &BTreeSet<String>) -> String {
    if expected.is_empty() {
        return "something else".to_string();
    }
    expected.iter().cloned().collect::<Vec<_>>().join(", ")
}

fn display_found(found: &Option<String>) -> String {
    match found {
        Some(found) => found.clone(),
        None => "end of input".to_string(),
    }
}
