//! Lexical analysis (spec §4.1).
//!
//! Grounded on `original_source/src/lexer.c`: a hand-written, single-pass
//! scanner over a read-only source buffer that tracks line/offset as it
//! goes, rather than the teacher's own `lex_derive`/regex-table approach —
//! spec's `Token` is a flat `{line, offset, kind, lexeme, file_path}`
//! struct, not one enum variant per terminal, so a regex-per-variant
//! derive macro doesn't fit the target data model (see DESIGN.md for the
//! full rationale).

mod token;

pub use token::{lookup_keyword, Token, TokenKind, KEYWORDS};

use std::fmt::{self, Display};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub file_path: String,
    pub line: usize,
    pub offset: usize,
    pub message: String,
}

impl Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}: {}", self.file_path, self.line, self.offset, self.message)
    }
}

impl std::error::Error for LexError {}

pub type LexResult<T> = Result<T, LexError>;

struct Lexer<'a> {
    input: &'a [u8],
    file_path: &'a str,
    pos: usize,
    line: usize,
    offset: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str, file_path: &'a str) -> Self {
        Lexer {
            input: input.as_bytes(),
            file_path,
            pos: 0,
            line: 1,
            offset: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.input.get(self.pos + ahead).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.pos += 1;
        if c == b'\n' {
            self.line += 1;
            self.offset = 0;
        } else {
            self.offset += 1;
        }
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> LexError {
        LexError {
            file_path: self.file_path.to_string(),
            line: self.line,
            offset: self.offset,
            message: message.into(),
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_ascii_whitespace() => {
                    self.advance();
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while !matches!(self.peek(), None | Some(b'\n')) {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn make(&self, line: usize, offset: usize, kind: TokenKind, lexeme: String) -> Token {
        Token {
            line,
            offset,
            kind,
            lexeme,
            file_path: self.file_path.to_string(),
        }
    }

    fn lex_identifier_or_keyword(&mut self) -> Token {
        let (line, offset) = (self.line, self.offset);
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == b'_') {
            self.advance();
        }
        let lexeme = String::from_utf8_lossy(&self.input[start..self.pos]).into_owned();
        let kind = lookup_keyword(&lexeme).unwrap_or(TokenKind::Identifier);
        self.make(line, offset, kind, lexeme)
    }

    /// Builtin names (`@sizeOf`) lex as a single identifier token whose
    /// lexeme keeps the leading `@`, rather than a separate punctuation
    /// token, since the builtin table keys on the name verbatim.
    fn lex_builtin_name(&mut self) -> LexResult<Token> {
        let (line, offset) = (self.line, self.offset);
        let start = self.pos;
        self.advance(); // '@'
        if !matches!(self.peek(), Some(c) if c.is_ascii_alphabetic() || c == b'_') {
            return Err(self.error("'@' must be followed by a builtin name"));
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == b'_') {
            self.advance();
        }
        let lexeme = String::from_utf8_lossy(&self.input[start..self.pos]).into_owned();
        Ok(self.make(line, offset, TokenKind::Identifier, lexeme))
    }

    fn lex_number(&mut self) -> LexResult<Token> {
        let (line, offset) = (self.line, self.offset);
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some(b'.') {
            self.advance();
            if !matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                return Err(self.error("malformed float literal: '.' with no digits after it"));
            }
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }
        if self.peek() == Some(b'f') {
            self.advance();
        }
        let lexeme = String::from_utf8_lossy(&self.input[start..self.pos]).into_owned();
        Ok(self.make(line, offset, TokenKind::Number, lexeme))
    }

    fn lex_string(&mut self) -> LexResult<Token> {
        let (line, offset) = (self.line, self.offset);
        self.advance(); // opening quote
        let mut decoded = String::new();
        loop {
            match self.advance() {
                None => return Err(self.error("unterminated string literal")),
                Some(b'"') => break,
                Some(b'\\') => match self.advance() {
                    Some(b'n') => decoded.push('\n'),
                    Some(b't') => decoded.push('\t'),
                    Some(b'\\') => decoded.push('\\'),
                    Some(b'"') => decoded.push('"'),
                    Some(other) => {
                        return Err(self.error(format!("invalid escape sequence '\\{}'", other as char)))
                    }
                    None => return Err(self.error("unterminated escape sequence")),
                },
                Some(c) => decoded.push(c as char),
            }
        }
        Ok(self.make(line, offset, TokenKind::String, decoded))
    }

    fn lex_operator_or_punctuation(&mut self) -> LexResult<Token> {
        let (line, offset) = (self.line, self.offset);
        let c = self.advance().expect("caller checked peek()");

        macro_rules! two_char {
            ($second:expr, $two:expr, $one:expr) => {{
                if self.peek() == Some($second) {
                    self.advance();
                    $two
                } else {
                    $one
                }
            }};
        }

        let kind = match c {
            b'(' => TokenKind::OpenParen,
            b')' => TokenKind::CloseParen,
            b'{' => TokenKind::OpenBrace,
            b'}' => TokenKind::CloseBrace,
            b'[' => TokenKind::OpenBracket,
            b']' => TokenKind::CloseBracket,
            b';' => TokenKind::SemiColon,
            b',' => TokenKind::Comma,
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'%' => TokenKind::Percent,
            b'&' => TokenKind::Ampersand,
            b'!' => two_char!(b'=', TokenKind::Neq, TokenKind::Bang),
            b'=' => two_char!(b'=', TokenKind::EqEq, TokenKind::Equals),
            b'<' => two_char!(b'=', TokenKind::Leq, TokenKind::OpenAngle),
            b'>' => two_char!(b'=', TokenKind::Geq, TokenKind::CloseAngle),
            b':' => two_char!(b':', TokenKind::DoubleColon, TokenKind::Colon),
            b'.' => {
                if self.peek() == Some(b'.') && self.peek_at(1) == Some(b'.') {
                    self.advance();
                    self.advance();
                    TokenKind::ThreeDots
                } else {
                    TokenKind::Dot
                }
            }
            other => {
                return Err(self.error(format!("unrecognized character '{}'", other as char)));
            }
        };

        let lexeme = match kind {
            TokenKind::Neq => "!=",
            TokenKind::EqEq => "==",
            TokenKind::Leq => "<=",
            TokenKind::Geq => ">=",
            TokenKind::DoubleColon => "::",
            TokenKind::ThreeDots => "...",
            _ => std::str::from_utf8(&[c]).unwrap_or("?"),
        }
        .to_string();

        Ok(self.make(line, offset, kind, lexeme))
    }

    fn next_token(&mut self) -> LexResult<Option<Token>> {
        self.skip_whitespace_and_comments();
        let Some(c) = self.peek() else {
            return Ok(None);
        };

        if c.is_ascii_alphabetic() || c == b'_' {
            return Ok(Some(self.lex_identifier_or_keyword()));
        }
        if c.is_ascii_digit() {
            return Ok(Some(self.lex_number()?));
        }
        if c == b'"' {
            return Ok(Some(self.lex_string()?));
        }
        if c == b'@' {
            return Ok(Some(self.lex_builtin_name()?));
        }
        Ok(Some(self.lex_operator_or_punctuation()?))
    }
}

/// Tokenizes `source`, returning an ordered stream ending with an explicit
/// [`TokenKind::Eof`] token, or the first lexical error encountered.
pub fn lex(source: &str, file_path: &str) -> LexResult<Vec<Token>> {
    let mut lexer = Lexer::new(source, file_path);
    let mut tokens = Vec::new();

    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }

    tokens.push(Token::eof(lexer.line, lexer.offset, file_path));
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source, "<test>").unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn keywords_lex_to_their_own_kind() {
        assert_eq!(kinds("fn"), vec![TokenKind::Fn, TokenKind::Eof]);
        assert_eq!(kinds("struct"), vec![TokenKind::Struct, TokenKind::Eof]);
    }

    #[test]
    fn multi_char_operators_are_greedy() {
        assert_eq!(
            kinds("== != <= >= :: ..."),
            vec![
                TokenKind::EqEq,
                TokenKind::Neq,
                TokenKind::Leq,
                TokenKind::Geq,
                TokenKind::DoubleColon,
                TokenKind::ThreeDots,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn integer_and_float_literals() {
        let tokens = lex("42 3.14 2f 1.5f", "<test>").unwrap();
        let lexemes: Vec<_> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(lexemes, vec!["42", "3.14", "2f", "1.5f", ""]);
        assert!(tokens[..4].iter().all(|t| t.kind == TokenKind::Number));
    }

    #[test]
    fn float_embedded_in_larger_source() {
        let tokens = lex("let x = 3.14;", "<test>").unwrap();
        let number = tokens.iter().find(|t| t.kind == TokenKind::Number).unwrap();
        assert_eq!(number.lexeme, "3.14");
    }

    #[test]
    fn dot_with_no_digits_is_a_lex_error() {
        assert!(lex("3.", "<test>").is_err());
    }

    #[test]
    fn string_escapes_decode() {
        let tokens = lex(r#""a\nb\tc\\d\"e""#, "<test>").unwrap();
        assert_eq!(tokens[0].lexeme, "a\nb\tc\\d\"e");
    }

    #[test]
    fn invalid_escape_is_a_lex_error() {
        assert!(lex(r#""bad\x"#, "<test>").is_err());
    }

    #[test]
    fn unrecognized_character_is_a_lex_error() {
        assert!(lex("`", "<test>").is_err());
    }

    #[test]
    fn builtin_name_lexes_as_one_identifier_token() {
        let tokens = lex("@sizeOf(s32)", "<test>").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].lexeme, "@sizeOf");
    }

    #[test]
    fn bare_at_sign_is_a_lex_error() {
        assert!(lex("@ ", "<test>").is_err());
    }

    #[test]
    fn line_comment_is_discarded() {
        assert_eq!(kinds("// hi\nfn"), vec![TokenKind::Fn, TokenKind::Eof]);
    }
}
