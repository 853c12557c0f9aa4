//! Property declarations inside `{ }` blocks.
//!
//! Property value grammar is not interpreted: a [`Declaration`] keeps the
//! value as normalized CSS text, which is all style and keyframe rules need
//! to print themselves back.

use std::fmt;

use crate::source::{TokenRole, TokenSource};
use crate::token::{Token, TokenType, serialize_tokens};

/// A property-value pair like `color: red`.
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    pub name: String,
    /// The value as CSS text, whitespace collapsed and comments removed.
    pub value: String,
    pub important: bool,
}

impl Declaration {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            important: false,
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)?;
        if self.important {
            f.write_str(" !important")?;
        }
        f.write_str(";")
    }
}

/// Parses a `{ ... }` block of declarations, including both braces.
///
/// Malformed declarations are reported and skipped. A block cut short by end
/// of input is accepted with the declarations read so far.
pub(crate) fn parse_declaration_block(source: &mut dyn TokenSource) -> Option<Vec<Declaration>> {
    if !source.consume_if(TokenType::OpenCurly, TokenRole::Punctuation) {
        source.error("Expected '{'");
        return None;
    }

    let mut declarations = Vec::new();
    loop {
        match source.get_token() {
            Token::Eof => break,
            Token::CloseCurly => {
                source.consume_token_as(TokenRole::Punctuation);
                break;
            }
            Token::Semicolon => source.consume_token_as(TokenRole::Punctuation),
            Token::Ident(_) => {
                if let Some(declaration) = parse_declaration(source) {
                    declarations.push(declaration);
                }
            }
            _ => {
                source.error("Expected a property name");
                skip_declaration(source);
            }
        }
    }
    Some(declarations)
}

fn parse_declaration(source: &mut dyn TokenSource) -> Option<Declaration> {
    let name = match source.get_token() {
        Token::Ident(name) => name.clone(),
        _ => return None,
    };
    source.consume_token_as(TokenRole::Property);

    if !source.consume_if(TokenType::Colon, TokenRole::Punctuation) {
        source.error(&format!("Expected ':' after '{}'", name));
        skip_declaration(source);
        return None;
    }

    let mut tokens = collect_value(source);
    source.consume_if(TokenType::Semicolon, TokenRole::Punctuation);

    let important = strip_important(&mut tokens);
    let value = serialize_tokens(&tokens);
    if value.is_empty() {
        source.error(&format!("Expected a value for '{}'", name));
        return None;
    }

    Some(Declaration {
        name,
        value,
        important,
    })
}

/// Consumes the tokens of a value, stopping before a `;` or `}` that is not
/// nested inside brackets.
fn collect_value(source: &mut dyn TokenSource) -> Vec<Token> {
    let mut depth = 0usize;
    let mut tokens = Vec::new();
    loop {
        let token = source.peek_token();
        let token_type = token.token_type();
        match token_type {
            TokenType::Eof => break,
            TokenType::Semicolon | TokenType::CloseCurly if depth == 0 => break,
            _ if token_type.closing().is_some() => depth += 1,
            _ if token_type.is_closing() => depth = depth.saturating_sub(1),
            _ => {}
        }
        tokens.push(token.clone());
        source.consume_token_as(TokenRole::Value);
    }
    tokens
}

fn skip_declaration(source: &mut dyn TokenSource) {
    for _ in collect_value(source) {}
    source.consume_if(TokenType::Semicolon, TokenRole::Punctuation);
}

/// Removes a trailing `! important` from `tokens`, returning whether it was there.
fn strip_important(tokens: &mut Vec<Token>) -> bool {
    let significant: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| !token.is_trivia())
        .map(|(index, _)| index)
        .collect();

    match significant[..] {
        [.., bang, important]
            if tokens[bang].is_delim('!') && tokens[important].is_ident("important") =>
        {
            tokens.truncate(bang);
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::TokenizerSource;

    fn parse_block(input: &str) -> (Option<Vec<Declaration>>, usize) {
        let mut source = TokenizerSource::new(input);
        let block = parse_declaration_block(&mut source);
        (block, source.diagnostics().len())
    }

    #[test]
    fn test_simple_block() {
        let (block, errors) = parse_block("{ color: red; width: 100%; }");
        assert_eq!(errors, 0);
        assert_eq!(
            block,
            Some(vec![
                Declaration::new("color", "red"),
                Declaration::new("width", "100%"),
            ])
        );
    }

    #[test]
    fn test_value_keeps_nested_structure() {
        let (block, _) = parse_block("{ transform: rotate( 360deg )  scale(1.5, 2) ; }");
        let block = block.unwrap();
        assert_eq!(block[0].value, "rotate( 360deg ) scale(1.5, 2)");
    }

    #[test]
    fn test_semicolon_inside_brackets_does_not_end_value() {
        let (block, _) = parse_block("{ content: [a; b]; x: y }");
        let block = block.unwrap();
        assert_eq!(block.len(), 2);
        assert_eq!(block[0].value, "[a; b]");
        assert_eq!(block[1], Declaration::new("x", "y"));
    }

    #[test]
    fn test_important() {
        let (block, _) = parse_block("{ color: red !important; }");
        let declaration = &block.unwrap()[0];
        assert!(declaration.important);
        assert_eq!(declaration.value, "red");
        assert_eq!(declaration.to_string(), "color: red !important;");
    }

    #[test]
    fn test_errors_are_skipped() {
        let (block, errors) = parse_block("{ 12: x; color red; ok: 1; empty: ; }");
        assert_eq!(block, Some(vec![Declaration::new("ok", "1")]));
        assert_eq!(errors, 3);
    }

    #[test]
    fn test_unterminated_block() {
        let (block, errors) = parse_block("{ a: b");
        assert_eq!(block, Some(vec![Declaration::new("a", "b")]));
        assert_eq!(errors, 0);
    }

    #[test]
    fn test_missing_open_brace() {
        let (block, errors) = parse_block("a: b }");
        assert_eq!(block, None);
        assert_eq!(errors, 1);
    }
}
