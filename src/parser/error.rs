//! Parse errors (spec §4.2's "fatal, report `{file, line, offset,
//! near-token lexeme, message}`"), grounded on `original_source`'s parser
//! diagnostics and why_lib's `TypeCheckError`-style hand-rolled `Display`.

use std::fmt::{self, Display};

use crate::lexer::Token;

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub file_path: String,
    pub line: usize,
    pub offset: usize,
    pub near: String,
    pub message: String,
}

impl ParseError {
    pub fn at(token: &Token, message: impl Into<String>) -> Self {
        ParseError {
            file_path: token.file_path.clone(),
            line: token.line,
            offset: token.offset,
            near: token.lexeme.clone(),
            message: message.into(),
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} (near '{}')",
            self.file_path, self.line, self.offset, self.message, self.near
        )
    }
}

impl std::error::Error for ParseError {}
