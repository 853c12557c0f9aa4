use crate::error::CssError;
use crate::source::{TokenRole, TokenSource};
use crate::token::{Location, Token, TokenType};

/// Returned by every peek once a [`BoundedSource`] is done.
static EOF_TOKEN: Token = Token::Eof;

/// A view of another source that ends where the current rule ends.
///
/// The rule ends at a `;` outside of any brackets, or at the `}` that closes
/// the first top-level block. The terminator itself is consumed from the
/// wrapped source; after that every peek returns [`Token::Eof`] and the
/// wrapped source is never advanced again.
///
/// Closing brackets that do not match the innermost open one are passed
/// through without affecting the nesting state, so malformed input cannot
/// make the view end early.
///
/// # Examples
///
/// ```rust
/// use cssom::source::{BoundedSource, TokenSource, TokenizerSource};
/// use cssom::token::Token;
///
/// let mut source = TokenizerSource::new("@import url(x); a { }");
/// {
///     let mut rule = BoundedSource::new(&mut source);
///     rule.consume_all();
///     assert!(rule.is_done());
/// }
/// assert_eq!(source.get_token(), &Token::Ident("a".into()));
/// ```
pub struct BoundedSource<'a> {
    source: &'a mut dyn TokenSource,
    /// Expected closing token types, innermost last.
    blocks: Vec<TokenType>,
    done: bool,
}

impl<'a> BoundedSource<'a> {
    pub fn new(source: &'a mut dyn TokenSource) -> Self {
        Self {
            source,
            blocks: Vec::new(),
            done: false,
        }
    }

    /// Number of currently open brackets, braces and functions.
    pub fn depth(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the rule's terminator has been consumed.
    pub fn is_done(&self) -> bool {
        self.done
    }

    fn track(&mut self, token_type: TokenType) {
        if let Some(closing) = token_type.closing() {
            self.blocks.push(closing);
        } else if token_type.is_closing() {
            if self.blocks.last() == Some(&token_type) {
                self.blocks.pop();
                if token_type == TokenType::CloseCurly && self.blocks.is_empty() {
                    self.latch();
                }
            }
        } else if token_type == TokenType::Semicolon && self.blocks.is_empty() {
            self.latch();
        }
    }

    fn latch(&mut self) {
        log::trace!("bounded source done at {}", self.source.location());
        self.done = true;
    }
}

impl TokenSource for BoundedSource<'_> {
    fn peek_token(&mut self) -> &Token {
        if self.done {
            return &EOF_TOKEN;
        }
        self.source.peek_token()
    }

    fn consume_token_as(&mut self, role: TokenRole) {
        if self.done {
            return;
        }

        let token_type = self.source.peek_token().token_type();
        self.track(token_type);
        self.source.consume_token_as(role);
    }

    fn emit_error(&mut self, error: CssError) {
        self.source.emit_error(error);
    }

    fn location(&mut self) -> Location {
        self.source.location()
    }
}
