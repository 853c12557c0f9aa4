//! A lazy CSS tokenizer.
//!
//! Each call to [`Tokenizer::next_token`] runs one `nom` parser against the
//! remaining input. String escapes, hex escapes included, are decoded;
//! escapes inside identifiers are not. Everything the tokenizer does not
//! recognise becomes a [`Token::Delim`], so tokenizing never fails.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_until, take_while},
    character::complete::{anychar, char, digit1, multispace1, one_of, satisfy},
    combinator::{map, opt, recognize, rest, value},
    sequence::{pair, preceded, terminated, tuple},
};

use crate::token::{Location, Token};

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '-'
}

/// Parses an identifier: `--custom`, `-webkit-foo`, `name`.
fn ident(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((
            tag("--"),
            recognize(pair(opt(char('-')), satisfy(is_name_start))),
        )),
        take_while(is_name_char),
    ))(input)
}

fn comment(input: &str) -> IResult<&str, Token> {
    map(
        preceded(
            tag("/*"),
            alt((terminated(take_until("*/"), tag("*/")), rest)),
        ),
        |text: &str| Token::Comment(text.to_string()),
    )(input)
}

fn whitespace(input: &str) -> IResult<&str, Token> {
    value(Token::Whitespace, multispace1)(input)
}

fn number(input: &str) -> IResult<&str, Token> {
    let (input, repr) = recognize(tuple((
        opt(one_of("+-")),
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit1)))),
            recognize(pair(char('.'), digit1)),
        )),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    )))(input)?;
    // The recognized text is always a valid float literal.
    let number = repr.parse::<f64>().unwrap_or_default();

    if let Some(input) = input.strip_prefix('%') {
        return Ok((input, Token::Percentage(number)));
    }
    if let Ok((input, unit)) = ident(input) {
        return Ok((input, Token::Dimension(number, unit.to_string())));
    }
    Ok((input, Token::Number(number)))
}

/// Decodes a `\41 `-style escape: 1 to 6 hex digits and one optional
/// whitespace, starting right after the backslash.
fn hex_escape(input: &str) -> Option<(char, &str)> {
    let digits = input
        .char_indices()
        .take(6)
        .take_while(|(_, c)| c.is_ascii_hexdigit())
        .count();
    if digits == 0 {
        return None;
    }

    let code = u32::from_str_radix(&input[..digits], 16).ok()?;
    let decoded = match char::from_u32(code) {
        Some('\0') | None => char::REPLACEMENT_CHARACTER,
        Some(c) => c,
    };

    let rest = &input[digits..];
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix([' ', '\t', '\n', '\r', '\x0c']))
        .unwrap_or(rest);
    Some((decoded, rest))
}

/// Parses a quoted string. An unescaped newline ends it as a bad string,
/// leaving the newline in the input.
fn string(input: &str) -> IResult<&str, Token> {
    let (mut remaining, quote) = one_of("\"'")(input)?;
    let mut text = String::new();

    loop {
        let mut chars = remaining.chars();
        match chars.next() {
            None => return Ok((remaining, Token::String(text))),
            Some(c) if c == quote => return Ok((chars.as_str(), Token::String(text))),
            Some('\n') => return Ok((remaining, Token::BadString)),
            Some('\\') => {
                let after_backslash = chars.as_str();
                if let Some((decoded, rest)) = hex_escape(after_backslash) {
                    text.push(decoded);
                    remaining = rest;
                    continue;
                }
                match chars.next() {
                    None => return Ok((chars.as_str(), Token::String(text))),
                    Some('\n') => remaining = chars.as_str(),
                    Some(escaped) => {
                        text.push(escaped);
                        remaining = chars.as_str();
                    }
                }
            }
            Some(c) => {
                text.push(c);
                remaining = chars.as_str();
            }
        }
    }
}

/// The body of an unquoted `url(...)`, after the opening parenthesis.
fn url_body(input: &str) -> (&str, Token) {
    let input = input.trim_start();
    let end = input.find(')').unwrap_or(input.len());
    let body = input[..end].trim_end();
    let after = input.get(end + 1..).unwrap_or("");

    let bad = body
        .chars()
        .any(|c| c.is_whitespace() || c == '"' || c == '\'' || c == '(');
    if bad {
        (after, Token::BadUrl)
    } else {
        (after, Token::Url(body.to_string()))
    }
}

/// Identifiers, functions and `url(...)` tokens.
fn ident_like(input: &str) -> IResult<&str, Token> {
    let (input, name) = ident(input)?;
    let Some(after_parens) = input.strip_prefix('(') else {
        return Ok((input, Token::Ident(name.to_string())));
    };

    if name.eq_ignore_ascii_case("url") {
        let quoted = after_parens.trim_start().starts_with(['"', '\'']);
        if !quoted {
            return Ok(url_body(after_parens));
        }
    }
    Ok((after_parens, Token::Function(name.to_string())))
}

fn at_keyword(input: &str) -> IResult<&str, Token> {
    map(preceded(char('@'), ident), |name| {
        Token::AtKeyword(name.to_string())
    })(input)
}

fn hash(input: &str) -> IResult<&str, Token> {
    map(
        preceded(char('#'), recognize(pair(satisfy(is_name_char), take_while(is_name_char)))),
        |name: &str| Token::Hash(name.to_string()),
    )(input)
}

fn punctuation(input: &str) -> IResult<&str, Token> {
    alt((
        value(Token::Cdo, tag("<!--")),
        value(Token::Cdc, tag("-->")),
        value(Token::Colon, char(':')),
        value(Token::Semicolon, char(';')),
        value(Token::Comma, char(',')),
        value(Token::OpenParens, char('(')),
        value(Token::CloseParens, char(')')),
        value(Token::OpenSquare, char('[')),
        value(Token::CloseSquare, char(']')),
        value(Token::OpenCurly, char('{')),
        value(Token::CloseCurly, char('}')),
    ))(input)
}

fn token(input: &str) -> IResult<&str, Token> {
    alt((
        whitespace,
        comment,
        string,
        punctuation,
        number,
        ident_like,
        at_keyword,
        hash,
        map(anychar, Token::Delim),
    ))(input)
}

/// Produces tokens from a string one at a time.
///
/// # Examples
///
/// ```rust
/// use cssom::tokenizer::Tokenizer;
/// use cssom::token::Token;
///
/// let mut tokenizer = Tokenizer::new("@import url(x);");
/// assert_eq!(tokenizer.next_token().0, Token::AtKeyword("import".into()));
/// assert_eq!(tokenizer.next_token().0, Token::Whitespace);
/// assert_eq!(tokenizer.next_token().0, Token::Url("x".into()));
/// assert_eq!(tokenizer.next_token().0, Token::Semicolon);
/// assert_eq!(tokenizer.next_token().0, Token::Eof);
/// ```
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    location: Location,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            location: Location::default(),
        }
    }

    /// Location of the next token.
    pub fn location(&self) -> Location {
        self.location
    }

    /// Returns the next token and where it starts. Returns [`Token::Eof`]
    /// forever once the input is exhausted.
    pub fn next_token(&mut self) -> (Token, Location) {
        let start = self.location;
        if self.input.is_empty() {
            return (Token::Eof, start);
        }

        let (remaining, token) = match token(self.input) {
            Ok(result) => result,
            // The final `anychar` alternative only fails on empty input.
            Err(_) => ("", Token::Eof),
        };
        let consumed = &self.input[..self.input.len() - remaining.len()];
        self.advance(consumed);
        self.input = remaining;

        (token, start)
    }

    fn advance(&mut self, consumed: &str) {
        for c in consumed.chars() {
            if c == '\n' {
                self.location.line += 1;
                self.location.column = 1;
            } else {
                self.location.column += 1;
            }
        }
        self.location.offset += consumed.len();
    }
}

/// Tokenizes the whole input, without the trailing [`Token::Eof`].
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new(input);
    let mut tokens = Vec::new();
    loop {
        match tokenizer.next_token().0 {
            Token::Eof => return tokens,
            token => tokens.push(token),
        }
    }
}
