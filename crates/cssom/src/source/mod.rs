//! Pull-based token sources.
//!
//! Parsers never see a tokenizer directly; they pull tokens from a
//! [`TokenSource`]. This lets the at-rule dispatcher hand a sub-parser a
//! [`BoundedSource`] that looks like a complete input but ends at the rule's
//! terminator.
//!
//! - [`TokenizerSource`]: the root source over a string, collecting diagnostics
//! - [`BoundedSource`]: a truncated view ending at the enclosing rule's end

mod bounded;
mod tokenizer_source;

pub use bounded::BoundedSource;
pub use tokenizer_source::{ConsumedToken, TokenizerSource};

use crate::error::CssError;
use crate::token::{Location, Token, TokenType};

/// What a consumed token was used for.
///
/// Sources that record consumption (see [`TokenizerSource::recording`]) keep
/// this next to each token, which is enough to drive syntax highlighting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TokenRole {
    #[default]
    Unclaimed,
    /// Whitespace and comments skipped between meaningful tokens.
    Trivia,
    /// An at-rule keyword such as `@import`.
    Keyword,
    /// A name introduced by a rule (color name, keyframes name).
    Name,
    Url,
    Color,
    Selector,
    Property,
    Value,
    Punctuation,
    /// Tokens drained while recovering from an error.
    Junk,
}

/// A source of CSS tokens.
///
/// Implementations must be usable as `&mut dyn TokenSource` so that sources
/// can wrap each other.
pub trait TokenSource {
    /// Returns the next token without consuming it. Whitespace and comments
    /// are returned like any other token.
    fn peek_token(&mut self) -> &Token;

    /// Consumes the next token, recording `role` as what it was used for.
    /// Consuming at end of input does nothing.
    fn consume_token_as(&mut self, role: TokenRole);

    /// Reports an error on the shared error channel.
    fn emit_error(&mut self, error: CssError);

    /// Location of the next token.
    fn location(&mut self) -> Location;

    fn consume_token(&mut self) {
        self.consume_token_as(TokenRole::Unclaimed);
    }

    /// Skips whitespace and comments, then peeks the next token.
    fn get_token(&mut self) -> &Token {
        while self.peek_token().is_trivia() {
            self.consume_token_as(TokenRole::Trivia);
        }
        self.peek_token()
    }

    /// Consumes the next significant token if it has type `token_type`.
    fn consume_if(&mut self, token_type: TokenType, role: TokenRole) -> bool {
        if self.get_token().is(token_type) {
            self.consume_token_as(role);
            true
        } else {
            false
        }
    }

    /// Consumes everything up to end of input.
    fn consume_all(&mut self) {
        while !self.peek_token().is(TokenType::Eof) {
            self.consume_token_as(TokenRole::Junk);
        }
    }

    fn error(&mut self, message: &str) {
        self.emit_error(CssError::InvalidSyntax(message.to_string()));
    }

    fn unknown(&mut self, message: &str) {
        self.emit_error(CssError::UnknownValue(message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_token_skips_trivia() {
        let mut source = TokenizerSource::new("  /* c */ foo").recording();
        assert_eq!(source.get_token(), &Token::Ident("foo".into()));

        let roles: Vec<TokenRole> = source.consumed().iter().map(|c| c.role).collect();
        assert_eq!(roles, vec![TokenRole::Trivia; 3]);
    }

    #[test]
    fn test_consume_if() {
        let mut source = TokenizerSource::new(" ; x");
        assert!(!source.consume_if(TokenType::Colon, TokenRole::Punctuation));
        assert!(source.consume_if(TokenType::Semicolon, TokenRole::Punctuation));
        assert_eq!(source.get_token(), &Token::Ident("x".into()));
    }

    #[test]
    fn test_consume_all_stops_at_eof() {
        let mut source = TokenizerSource::new("a b { c }");
        source.consume_all();
        assert_eq!(source.peek_token(), &Token::Eof);
        source.consume_all();
        assert_eq!(source.peek_token(), &Token::Eof);
    }

    #[test]
    fn test_error_helpers() {
        let mut source = TokenizerSource::new("x");
        source.error("bad thing");
        source.unknown("odd thing");

        let diagnostics = source.take_diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert!(matches!(&diagnostics[0].error, CssError::InvalidSyntax(m) if m == "bad thing"));
        assert!(diagnostics[1].error.is_warning());
    }
}
