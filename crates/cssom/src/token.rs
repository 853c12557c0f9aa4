//! CSS tokens as produced by the [`Tokenizer`](crate::tokenizer::Tokenizer).
//!
//! A [`Token`] carries its payload (identifier text, numeric value, ...),
//! while [`TokenType`] is the payload-free tag. Boundary tracking in
//! [`BoundedSource`](crate::source::BoundedSource) only ever looks at the tag.

use std::fmt;

/// A lexical token.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Whitespace,
    /// Comment text without the `/*` and `*/` delimiters.
    Comment(String),
    Ident(String),
    /// A function name; the opening parenthesis is part of the token.
    Function(String),
    AtKeyword(String),
    Hash(String),
    String(String),
    BadString,
    Url(String),
    BadUrl,
    Delim(char),
    Number(f64),
    Percentage(f64),
    Dimension(f64, String),
    Colon,
    Semicolon,
    Comma,
    OpenParens,
    CloseParens,
    OpenSquare,
    CloseSquare,
    OpenCurly,
    CloseCurly,
    Cdo,
    Cdc,
    Eof,
}

/// The tag of a [`Token`], without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenType {
    Whitespace,
    Comment,
    Ident,
    Function,
    AtKeyword,
    Hash,
    String,
    BadString,
    Url,
    BadUrl,
    Delim,
    Number,
    Percentage,
    Dimension,
    Colon,
    Semicolon,
    Comma,
    OpenParens,
    CloseParens,
    OpenSquare,
    CloseSquare,
    OpenCurly,
    CloseCurly,
    Cdo,
    Cdc,
    Eof,
}

impl TokenType {
    /// For tokens that open a nesting context, the tag of the token closing it.
    ///
    /// A function token is closed by a plain `)`.
    pub fn closing(self) -> Option<TokenType> {
        match self {
            TokenType::Function | TokenType::OpenParens => Some(TokenType::CloseParens),
            TokenType::OpenSquare => Some(TokenType::CloseSquare),
            TokenType::OpenCurly => Some(TokenType::CloseCurly),
            _ => None,
        }
    }

    pub fn is_closing(self) -> bool {
        matches!(
            self,
            TokenType::CloseParens | TokenType::CloseSquare | TokenType::CloseCurly
        )
    }
}

impl Token {
    pub fn token_type(&self) -> TokenType {
        match self {
            Token::Whitespace => TokenType::Whitespace,
            Token::Comment(_) => TokenType::Comment,
            Token::Ident(_) => TokenType::Ident,
            Token::Function(_) => TokenType::Function,
            Token::AtKeyword(_) => TokenType::AtKeyword,
            Token::Hash(_) => TokenType::Hash,
            Token::String(_) => TokenType::String,
            Token::BadString => TokenType::BadString,
            Token::Url(_) => TokenType::Url,
            Token::BadUrl => TokenType::BadUrl,
            Token::Delim(_) => TokenType::Delim,
            Token::Number(_) => TokenType::Number,
            Token::Percentage(_) => TokenType::Percentage,
            Token::Dimension(_, _) => TokenType::Dimension,
            Token::Colon => TokenType::Colon,
            Token::Semicolon => TokenType::Semicolon,
            Token::Comma => TokenType::Comma,
            Token::OpenParens => TokenType::OpenParens,
            Token::CloseParens => TokenType::CloseParens,
            Token::OpenSquare => TokenType::OpenSquare,
            Token::CloseSquare => TokenType::CloseSquare,
            Token::OpenCurly => TokenType::OpenCurly,
            Token::CloseCurly => TokenType::CloseCurly,
            Token::Cdo => TokenType::Cdo,
            Token::Cdc => TokenType::Cdc,
            Token::Eof => TokenType::Eof,
        }
    }

    pub fn is(&self, token_type: TokenType) -> bool {
        self.token_type() == token_type
    }

    /// Whitespace and comments, which most parsers skip.
    pub fn is_trivia(&self) -> bool {
        matches!(self, Token::Whitespace | Token::Comment(_))
    }

    /// Returns `true` if this is the identifier `name`, compared ASCII case-insensitively.
    pub fn is_ident(&self, name: &str) -> bool {
        matches!(self, Token::Ident(ident) if ident.eq_ignore_ascii_case(name))
    }

    pub fn is_function(&self, name: &str) -> bool {
        matches!(self, Token::Function(function) if function.eq_ignore_ascii_case(name))
    }

    pub fn is_delim(&self, c: char) -> bool {
        matches!(self, Token::Delim(d) if *d == c)
    }
}

/// Writes `value` the way it would appear in a stylesheet.
pub(crate) fn write_number(f: &mut impl fmt::Write, value: f64) -> fmt::Result {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        write!(f, "{}", value as i64)
    } else {
        write!(f, "{}", value)
    }
}

pub(crate) fn write_string(f: &mut impl fmt::Write, value: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in value.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\A ")?,
            _ => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

/// Joins tokens into CSS text, collapsing whitespace and dropping comments.
pub(crate) fn serialize_tokens(tokens: &[Token]) -> String {
    let mut value = String::new();
    let mut pending_space = false;
    for token in tokens {
        match token {
            Token::Whitespace | Token::Comment(_) => pending_space = true,
            _ => {
                if pending_space && !value.is_empty() {
                    value.push(' ');
                }
                pending_space = false;
                value.push_str(&token.to_string());
            }
        }
    }
    value
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Whitespace => f.write_str(" "),
            Token::Comment(text) => write!(f, "/*{}*/", text),
            Token::Ident(name) => f.write_str(name),
            Token::Function(name) => write!(f, "{}(", name),
            Token::AtKeyword(name) => write!(f, "@{}", name),
            Token::Hash(name) => write!(f, "#{}", name),
            Token::String(value) => write_string(f, value),
            Token::BadString => f.write_str("\"\n"),
            Token::Url(url) => write!(f, "url({})", url),
            Token::BadUrl => f.write_str("url()"),
            Token::Delim(c) => write!(f, "{}", c),
            Token::Number(value) => write_number(f, *value),
            Token::Percentage(value) => {
                write_number(f, *value)?;
                f.write_str("%")
            }
            Token::Dimension(value, unit) => {
                write_number(f, *value)?;
                f.write_str(unit)
            }
            Token::Colon => f.write_str(":"),
            Token::Semicolon => f.write_str(";"),
            Token::Comma => f.write_str(","),
            Token::OpenParens => f.write_str("("),
            Token::CloseParens => f.write_str(")"),
            Token::OpenSquare => f.write_str("["),
            Token::CloseSquare => f.write_str("]"),
            Token::OpenCurly => f.write_str("{"),
            Token::CloseCurly => f.write_str("}"),
            Token::Cdo => f.write_str("<!--"),
            Token::Cdc => f.write_str("-->"),
            Token::Eof => Ok(()),
        }
    }
}

/// Position of a token in its input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Location {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number in characters (1-indexed)
    pub column: usize,
    /// Byte offset from the start of the input
    pub offset: usize,
}

impl Location {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new(1, 1, 0)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closing_pairs() {
        assert_eq!(TokenType::Function.closing(), Some(TokenType::CloseParens));
        assert_eq!(TokenType::OpenParens.closing(), Some(TokenType::CloseParens));
        assert_eq!(TokenType::OpenSquare.closing(), Some(TokenType::CloseSquare));
        assert_eq!(TokenType::OpenCurly.closing(), Some(TokenType::CloseCurly));
        assert_eq!(TokenType::Semicolon.closing(), None);
        assert!(TokenType::CloseCurly.is_closing());
        assert!(!TokenType::OpenCurly.is_closing());
    }

    #[test]
    fn test_display() {
        assert_eq!(Token::Function("url".into()).to_string(), "url(");
        assert_eq!(Token::AtKeyword("import".into()).to_string(), "@import");
        assert_eq!(Token::Percentage(50.0).to_string(), "50%");
        assert_eq!(Token::Dimension(1.5, "em".into()).to_string(), "1.5em");
        assert_eq!(Token::String("a\"b".into()).to_string(), "\"a\\\"b\"");
        assert_eq!(Token::Eof.to_string(), "");
    }

    #[test]
    fn test_ident_matching_is_case_insensitive() {
        assert!(Token::Ident("FROM".into()).is_ident("from"));
        assert!(!Token::Function("from".into()).is_ident("from"));
        assert!(Token::Function("RGBA".into()).is_function("rgba"));
    }
}
