use std::path::PathBuf;

use crate::error::{CssError, Diagnostic};
use crate::source::{TokenRole, TokenSource};
use crate::token::{Location, Token, TokenType};
use crate::tokenizer::Tokenizer;

/// A token consumed from a recording [`TokenizerSource`].
#[derive(Clone, Debug, PartialEq)]
pub struct ConsumedToken {
    pub token_type: TokenType,
    pub role: TokenRole,
    pub location: Location,
}

/// The root token source: tokenizes a string lazily and collects every
/// error reported through it, including errors forwarded by wrapping sources.
#[derive(Debug)]
pub struct TokenizerSource<'a> {
    tokenizer: Tokenizer<'a>,
    lookahead: Option<(Token, Location)>,
    file: Option<PathBuf>,
    diagnostics: Vec<Diagnostic>,
    consumed: Option<Vec<ConsumedToken>>,
}

impl<'a> TokenizerSource<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            tokenizer: Tokenizer::new(input),
            lookahead: None,
            file: None,
            diagnostics: Vec::new(),
            consumed: None,
        }
    }

    /// Attributes diagnostics to `file`.
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Keeps a log of every consumed token and the role it was consumed as.
    pub fn recording(mut self) -> Self {
        self.consumed = Some(Vec::new());
        self
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// The consumption log. Empty unless the source is [recording](Self::recording).
    pub fn consumed(&self) -> &[ConsumedToken] {
        self.consumed.as_deref().unwrap_or(&[])
    }

    fn fill(&mut self) -> &(Token, Location) {
        let tokenizer = &mut self.tokenizer;
        self.lookahead.get_or_insert_with(|| tokenizer.next_token())
    }
}

impl TokenSource for TokenizerSource<'_> {
    fn peek_token(&mut self) -> &Token {
        &self.fill().0
    }

    fn consume_token_as(&mut self, role: TokenRole) {
        let token_type = self.fill().0.token_type();
        if token_type == TokenType::Eof {
            return;
        }

        if let Some((_, location)) = self.lookahead.take() {
            if let Some(consumed) = self.consumed.as_mut() {
                consumed.push(ConsumedToken {
                    token_type,
                    role,
                    location,
                });
            }
        }
    }

    fn emit_error(&mut self, error: CssError) {
        let location = self.location();
        match &self.file {
            Some(file) => log::warn!("{}:{}: {}", file.display(), location, error),
            None => log::warn!("{}: {}", location, error),
        }
        self.diagnostics.push(Diagnostic {
            error,
            location,
            file: self.file.clone(),
        });
    }

    fn location(&mut self) -> Location {
        self.fill().1
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_peek_does_not_consume() {
        let mut source = TokenizerSource::new("a b");
        assert_eq!(source.peek_token(), &Token::Ident("a".into()));
        assert_eq!(source.peek_token(), &Token::Ident("a".into()));
        source.consume_token();
        assert_eq!(source.peek_token(), &Token::Whitespace);
    }

    #[test]
    fn test_consume_at_eof_is_noop() {
        let mut source = TokenizerSource::new("").recording();
        source.consume_token_as(TokenRole::Junk);
        assert_eq!(source.peek_token(), &Token::Eof);
        assert!(source.consumed().is_empty());
    }

    #[test]
    fn test_recording_roles_and_locations() {
        let mut source = TokenizerSource::new("@import\nx").recording();
        source.consume_token_as(TokenRole::Keyword);
        source.consume_token_as(TokenRole::Trivia);
        source.consume_token_as(TokenRole::Url);

        let consumed = source.consumed();
        assert_eq!(consumed.len(), 3);
        assert_eq!(consumed[0].token_type, TokenType::AtKeyword);
        assert_eq!(consumed[0].role, TokenRole::Keyword);
        assert_eq!(consumed[2].location, Location::new(2, 1, 8));
    }

    #[test]
    fn test_errors_carry_location_and_file() {
        let mut source = TokenizerSource::new("a\n  b").with_file("theme.css");
        source.consume_token();
        source.consume_token();
        source.error("oops");

        let diagnostic = &source.diagnostics()[0];
        assert_eq!(diagnostic.location, Location::new(2, 3, 4));
        assert_eq!(diagnostic.file.as_deref(), Some(Path::new("theme.css")));
        assert_eq!(diagnostic.to_string(), "theme.css:2:3: CSS syntax error: oops");
    }
}
